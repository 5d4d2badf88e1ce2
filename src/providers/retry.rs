// Bounded retry for provider calls

use std::future::Future;
use std::time::Duration;

use crate::errors::ProviderError;

const MAX_ATTEMPTS: u32 = 3;
const BASE_DELAY_MS: u64 = 250;

/// Retry `op` on retryable provider errors with exponential backoff.
/// Quota and auth failures surface immediately.
pub async fn with_retry<T, F, Fut>(mut op: F) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt + 1 < MAX_ATTEMPTS => {
                let delay = Duration::from_millis(BASE_DELAY_MS << attempt);
                tracing::warn!(error = %err, attempt = attempt + 1, "Provider call failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
