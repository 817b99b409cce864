pub mod batch;
pub mod error;
pub mod importer;

pub use batch::{BatchValidator, ResultBatch, ValidationReport};
pub use error::{ImporterError, Result};
pub use importer::BatchImporter;
