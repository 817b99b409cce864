mod deletion;
mod ingestion;
mod retrieval;

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{Result, StorageError};

/// Runs a store call under a deadline.
///
/// Dropping the store future on expiry drops its open transaction, which rolls
/// it back.
pub(crate) async fn timed<T>(
    operation: &'static str,
    after: Duration,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(after, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!("{} timed out after {:?}, rolled back", operation, after);
            Err(StorageError::Timeout { operation, after })
        }
    }
}
