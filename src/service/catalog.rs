//! Loading of RFPs, products and the pricing table from the data directory
//!
//! Layout:
//! - `rfps/<rfp_id>.json`
//! - `products.json` (array of products)
//! - `pricing.json` (array of test prices)

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::model::{
    DuplicateRequirementId, EvaluationConfig, PricingTable, Product, Rfp, RfpDocument, TestPricing,
};

const RFP_DIR: &str = "rfps";
const PRODUCTS_FILE: &str = "products.json";
const PRICING_FILE: &str = "pricing.json";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("RFP not found: {0}")]
    RfpNotFound(String),

    #[error("Invalid RFP id: {0}")]
    InvalidRfpId(String),

    #[error("Invalid RFP {rfp_id}: {source}")]
    InvalidRfp {
        rfp_id: String,
        #[source]
        source: DuplicateRequirementId,
    },

    #[error("Duplicate product id in catalog: {0}")]
    DuplicateProductId(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reference data shared read-only by all runs
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub pricing: PricingTable,
}

impl Catalog {
    pub fn new(products: Vec<Product>, pricing: PricingTable) -> Self {
        Self { products, pricing }
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// Reads the JSON data directory
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    data_dir: PathBuf,
}

impl CatalogRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load products and pricing
    ///
    /// A missing pricing file yields an empty table; any product requiring a test will
    /// then fail pricing with an unknown-test error.
    pub async fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        let products: Vec<Product> = read_json(&self.data_dir.join(PRODUCTS_FILE)).await?;
        if let Some(id) = duplicate_product_id(&products) {
            return Err(CatalogError::DuplicateProductId(id.to_string()));
        }

        let pricing_path = self.data_dir.join(PRICING_FILE);
        let tests: Vec<TestPricing> = if tokio::fs::try_exists(&pricing_path).await.unwrap_or(false) {
            read_json(&pricing_path).await?
        } else {
            tracing::warn!(path = %pricing_path.display(), "Pricing file not found, using empty pricing table");
            Vec::new()
        };

        tracing::info!(
            products = products.len(),
            tests = tests.len(),
            data_dir = %self.data_dir.display(),
            "Catalog loaded"
        );

        Ok(Catalog::new(products, PricingTable::new(tests)))
    }

    /// Load an RFP by id, resolving requirement ids and criticality
    pub async fn load_rfp(&self, rfp_id: &str, config: &EvaluationConfig) -> Result<Rfp, CatalogError> {
        if !is_safe_id(rfp_id) {
            return Err(CatalogError::InvalidRfpId(rfp_id.to_string()));
        }

        let path = self.data_dir.join(RFP_DIR).join(format!("{}.json", rfp_id));
        let document: RfpDocument = read_json(&path).await.map_err(|e| match e {
            CatalogError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                CatalogError::RfpNotFound(rfp_id.to_string())
            }
            other => other,
        })?;

        let rfp = document
            .into_rfp(config)
            .map_err(|source| CatalogError::InvalidRfp {
                rfp_id: rfp_id.to_string(),
                source,
            })?;
        tracing::info!(
            rfp = %rfp.id,
            title = %rfp.title,
            requirements = rfp.requirements.len(),
            critical = rfp.requirements.iter().filter(|r| r.is_critical).count(),
            "RFP loaded"
        );

        Ok(rfp)
    }
}

/// Runs look the winning product up by id, so ids must be unique
fn duplicate_product_id(products: &[Product]) -> Option<&str> {
    let mut seen = HashSet::new();
    products
        .iter()
        .map(|p| p.id.as_str())
        .find(|id| !seen.insert(*id))
}

/// Ids become file names, so only plain names are accepted
fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) {
        let path = dir.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn data_dir() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write(
            dir.path(),
            "products.json",
            r#"[{"id": "prod-001", "name": "CloudGuard", "specs": ["firewall"], "base_price": 15000}]"#,
        );
        write(
            dir.path(),
            "pricing.json",
            r#"[{"test_name": "security_audit", "cost": 2500, "description": "Audit"}]"#,
        );
        write(
            dir.path(),
            "rfps/rfp1.json",
            r#"{"id": "rfp1", "title": "Security", "description": "d", "requirements": ["firewall", "SOC2 audit"], "deadline": "2026-04-15"}"#,
        );
        dir
    }

    #[tokio::test]
    async fn test_load_catalog() {
        let dir = data_dir();
        let catalog = CatalogRepository::new(dir.path()).load_catalog().await.unwrap();

        assert_eq!(catalog.products.len(), 1);
        assert!(catalog.product("prod-001").is_some());
        assert!(catalog.product("missing").is_none());
        assert_eq!(catalog.pricing.get("security_audit").map(|t| t.cost), Some(2500.0));
    }

    #[tokio::test]
    async fn test_duplicate_product_ids_rejected() {
        let dir = data_dir();
        write(
            dir.path(),
            "products.json",
            r#"[
                {"id": "dup", "name": "Printer", "specs": ["printer"], "base_price": 1},
                {"id": "dup", "name": "Vault", "specs": ["encryption"], "base_price": 1000}
            ]"#,
        );

        let result = CatalogRepository::new(dir.path()).load_catalog().await;
        assert!(matches!(result, Err(CatalogError::DuplicateProductId(id)) if id == "dup"));
    }

    #[tokio::test]
    async fn test_missing_pricing_file_is_empty_table() {
        let dir = data_dir();
        std::fs::remove_file(dir.path().join("pricing.json")).unwrap();

        let catalog = CatalogRepository::new(dir.path()).load_catalog().await.unwrap();
        assert!(catalog.pricing.is_empty());
    }

    #[tokio::test]
    async fn test_load_rfp_infers_critical() {
        let dir = data_dir();
        let rfp = CatalogRepository::new(dir.path())
            .load_rfp("rfp1", &EvaluationConfig::default())
            .await
            .unwrap();

        assert_eq!(rfp.requirements.len(), 2);
        assert!(!rfp.requirements[0].is_critical);
        assert!(rfp.requirements[1].is_critical);
    }

    #[tokio::test]
    async fn test_load_rfp_errors() {
        let dir = data_dir();
        let repo = CatalogRepository::new(dir.path());
        let config = EvaluationConfig::default();

        assert!(matches!(
            repo.load_rfp("rfp404", &config).await,
            Err(CatalogError::RfpNotFound(_))
        ));
        assert!(matches!(
            repo.load_rfp("../products", &config).await,
            Err(CatalogError::InvalidRfpId(_))
        ));

        write(
            dir.path(),
            "rfps/dup.json",
            r#"{"id": "dup", "title": "t", "requirements": [{"id": "R-1", "text": "a"}, {"id": "R-1", "text": "b"}]}"#,
        );
        assert!(matches!(
            repo.load_rfp("dup", &config).await,
            Err(CatalogError::InvalidRfp { .. })
        ));

        write(dir.path(), "rfps/broken.json", "{ not json");
        assert!(matches!(
            repo.load_rfp("broken", &config).await,
            Err(CatalogError::Parse { .. })
        ));
    }
}
