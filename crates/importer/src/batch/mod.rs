pub mod models;
pub mod validator;

pub use models::{FORMAT_VERSION, ResultBatch, SourceMetadata, SourceType};
pub use validator::{BatchValidator, ValidationReport};
