// ABOUTME: Generic retry engine with a pluggable sleeper for deterministic tests.
// ABOUTME: Runs an operation until success, an abort verdict, or budget exhaustion.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Suspension point between attempts. Injected so tests can count sleeps
/// instead of waiting them out.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, interval: Duration);
}

/// Production sleeper backed by the tokio timer; parks the task, not the thread.
#[derive(Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

/// Whether a failed attempt is worth another try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Retry,
    Abort,
}

/// How a retried operation ultimately failed.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The budget ran out. `source` is the error from the final attempt;
    /// `None` when that attempt only failed the success predicate.
    #[error("operation did not succeed after {retries} retries")]
    Exhausted {
        retries: u32,
        #[source]
        source: Option<E>,
    },

    /// The classifier judged the error non-retryable.
    #[error(transparent)]
    Aborted(E),
}

/// Retries an async operation with a fixed interval between attempts.
///
/// `max_retries` bounds the number of *re*-tries: an operation that never
/// succeeds is attempted `max_retries + 1` times with `max_retries` sleeps
/// in between. No sleep precedes the first attempt or follows the last.
#[derive(Clone)]
pub struct Retrier {
    max_retries: u32,
    interval: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl Retrier {
    pub fn new(max_retries: u32, interval: Duration) -> Self {
        Self::with_sleeper(max_retries, interval, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(max_retries: u32, interval: Duration, sleeper: Arc<dyn Sleeper>) -> Self {
        Retrier {
            max_retries,
            interval,
            sleeper,
        }
    }

    /// `run_until` with an always-true success predicate: any `Ok` outcome
    /// ends the loop.
    pub async fn run<T, E>(
        &self,
        operation: impl AsyncFnMut() -> Result<T, E>,
        classify: impl Fn(&E) -> Verdict,
    ) -> Result<T, RetryError<E>>
    where
        E: std::fmt::Display,
    {
        self.run_until(operation, classify, |_| true).await
    }

    /// Runs `operation` until `is_success` accepts its result.
    ///
    /// Per attempt, in order: an acceptable `Ok` returns immediately; an
    /// exhausted budget returns [`RetryError::Exhausted`] carrying the final
    /// attempt's error, if any; an error classified [`Verdict::Abort`]
    /// returns [`RetryError::Aborted`] with the original error; otherwise
    /// the retrier sleeps one interval and goes again. `classify` is only
    /// consulted for errors, `is_success` only for `Ok` results.
    pub async fn run_until<T, E>(
        &self,
        mut operation: impl AsyncFnMut() -> Result<T, E>,
        classify: impl Fn(&E) -> Verdict,
        is_success: impl Fn(&T) -> bool,
    ) -> Result<T, RetryError<E>>
    where
        E: std::fmt::Display,
    {
        let mut retries = 0u32;
        loop {
            let error = match operation().await {
                Ok(value) => {
                    if is_success(&value) {
                        return Ok(value);
                    }
                    None
                }
                Err(error) => {
                    tracing::debug!(%error, retries, "attempt failed");
                    Some(error)
                }
            };

            if retries >= self.max_retries {
                return Err(RetryError::Exhausted {
                    retries: self.max_retries,
                    source: error,
                });
            }

            if let Some(error) = error {
                if classify(&error) == Verdict::Abort {
                    return Err(RetryError::Aborted(error));
                }
            }

            retries += 1;
            self.sleeper.sleep(self.interval).await;
        }
    }
}
