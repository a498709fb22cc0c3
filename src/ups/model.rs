use serde::Serialize;

/// a normalized address suggestion returned by the validation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub address1: String,
}

/// Outcome of a validation call. Exactly one variant is produced per call;
/// failures carry human-readable messages and are never raised as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationResult {
    Success { candidates: Vec<Candidate> },
    Failure { messages: Vec<String> },
}

impl ValidationResult {
    pub fn success(candidates: Vec<Candidate>) -> Self {
        ValidationResult::Success { candidates }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ValidationResult::Failure {
            messages: vec![message.into()],
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success { .. })
    }
}
