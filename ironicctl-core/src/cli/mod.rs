//! ironic CLI execution
//!
//! Provides a testable interface for invoking the `ironic` executable with
//! Keystone credentials and retrying transient failures.

pub mod classify;
pub mod invoker;
pub mod retry;

pub use classify::{classify, classify_message, ErrorClass};
pub use invoker::{
    execute_with_timeout, CliInvoker, InvokeError, MockInvoker, Output, RealInvoker,
    RecordedCall, CLI_TIMEOUT_SECS, DEFAULT_PROGRAM,
};
pub use retry::{invoke_with_retry, RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_SECS};
