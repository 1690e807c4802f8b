use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::config::EvaluationConfig;

/// A single RFP need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Requirement {
    pub id: String,
    pub text: String,
    /// Security, compliance or mandatory requirement whose absence disqualifies a product
    pub is_critical: bool,
}

impl Requirement {
    pub fn new(id: impl Into<String>, text: impl Into<String>, is_critical: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_critical,
        }
    }
}

/// Request for Proposal, immutable for the duration of a run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Rfp {
    pub id: String,
    pub title: String,
    pub description: String,
    pub requirements: Vec<Requirement>,
    pub deadline: Option<String>,
    pub budget: Option<f64>,
    #[serde(default)]
    pub evaluation_criteria: Vec<String>,
}

impl Rfp {
    /// Look up a requirement by id
    pub fn requirement(&self, id: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.id == id)
    }

    /// Texts for a list of requirement ids, in the given order
    pub fn requirement_texts<'a>(&'a self, ids: &'a [String]) -> impl Iterator<Item = &'a str> {
        ids.iter()
            .map(|id| self.requirement(id).map(|r| r.text.as_str()).unwrap_or(id.as_str()))
    }
}

/// Requirement as written in an RFP file: either a bare string or an object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RequirementEntry {
    Text(String),
    Detailed {
        id: Option<String>,
        text: String,
        #[serde(alias = "is_critical")]
        critical: Option<bool>,
    },
}

/// RFP file format
#[derive(Debug, Clone, Deserialize)]
pub struct RfpDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub requirements: Vec<RequirementEntry>,
    pub deadline: Option<String>,
    pub budget: Option<f64>,
    #[serde(default)]
    pub evaluation_criteria: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
#[error("duplicate requirement id {0}")]
pub struct DuplicateRequirementId(pub String);

impl RfpDocument {
    /// Resolve requirement ids and criticality
    ///
    /// Entries without an id get `REQ-001`, `REQ-002`, ... by position, skipping ids that
    /// another entry already uses. Entries without an explicit critical flag are critical
    /// when their text contains a configured keyword. Two entries with the same explicit
    /// id are rejected.
    pub fn into_rfp(self, config: &EvaluationConfig) -> Result<Rfp, DuplicateRequirementId> {
        let mut taken = HashSet::new();
        for entry in &self.requirements {
            if let RequirementEntry::Detailed { id: Some(id), .. } = entry
                && !taken.insert(id.clone())
            {
                return Err(DuplicateRequirementId(id.clone()));
            }
        }

        let mut requirements = Vec::with_capacity(self.requirements.len());
        for (index, entry) in self.requirements.into_iter().enumerate() {
            let (id, text, critical) = match entry {
                RequirementEntry::Text(text) => (None, text, None),
                RequirementEntry::Detailed { id, text, critical } => (id, text, critical),
            };
            let id = id.unwrap_or_else(|| free_id(index + 1, &mut taken));
            let is_critical = critical.unwrap_or_else(|| config.is_critical_text(&text));
            requirements.push(Requirement::new(id, text, is_critical));
        }

        Ok(Rfp {
            id: self.id,
            title: self.title,
            description: self.description,
            requirements,
            deadline: self.deadline,
            budget: self.budget,
            evaluation_criteria: self.evaluation_criteria.unwrap_or_default(),
        })
    }
}

/// First `REQ-nnn` at or after `position` that is not taken yet; marks it taken
fn free_id(position: usize, taken: &mut HashSet<String>) -> String {
    (position..)
        .map(|n| format!("REQ-{:03}", n))
        .find(|id| taken.insert(id.clone()))
        .unwrap_or_default()
}
