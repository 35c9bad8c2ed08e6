//! Fixed-delay retry on transient CLI failures

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::classify::{classify, ErrorClass};
use super::invoker::{execute_with_timeout, CliInvoker, Output};
use crate::credentials::AuthEnv;
use crate::error::{IronicError, Result};

/// Seconds between attempts after a transient failure
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 10;

/// Retries allowed after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub delay_secs: u64,
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay_secs: DEFAULT_RETRY_DELAY_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

/// Run the same invocation until it succeeds, fails non-transiently, or the
/// retry budget is spent
pub async fn invoke_with_retry(
    invoker: &dyn CliInvoker,
    args: &[String],
    env: &AuthEnv,
    policy: &RetryPolicy,
    timeout: Duration,
) -> Result<Output> {
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        debug!(attempt, args = ?args, env = ?env, "invoking ironic");

        let err = match execute_with_timeout(invoker, args, env, timeout).await {
            Ok(output) => return Ok(output),
            Err(err) => err,
        };

        match classify(&err) {
            ErrorClass::Transient if attempt <= policy.max_retries => {
                warn!(
                    attempt,
                    delay_secs = policy.delay_secs,
                    error = %err.message(),
                    "transient ironic failure, retrying"
                );
                tokio::time::sleep(policy.delay()).await;
            }
            ErrorClass::Transient => {
                return Err(IronicError::RetriesExhausted {
                    attempts: attempt,
                    last: err,
                });
            }
            ErrorClass::Fatal | ErrorClass::Unknown => return Err(err.into()),
        }
    }
}
