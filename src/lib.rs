pub mod ups;

pub use ups::{Candidate, UpsClient, UpsConfig, ValidationResult};
