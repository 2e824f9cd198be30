//! Повторные попытки с экспоненциальным backoff для обращений
//! к внешним сервисам. Политика отделена от логики секвенирования:
//! композер сам ничего не повторяет.

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::error::{DictationError, Result};

/// Выполняет операцию с повторами по заданной политике
///
/// Фабрика `operation` вызывается на каждую попытку заново.
pub async fn retry_with_backoff<T, F, Fut>(
    config: &RetryConfig,
    op_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut delay = config.initial_delay_secs;

    for attempt in 1..=max_attempts {
        log::info!("Attempt {}/{} for {}", attempt, max_attempts, op_name);

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    log::info!("{} succeeded on attempt {}", op_name, attempt);
                }
                return Ok(value);
            }
            Err(e) => {
                if attempt == max_attempts {
                    log::error!("{} failed after {} attempts: {}", op_name, max_attempts, e);
                    return Err(e);
                }

                log::warn!("{} failed on attempt {}: {}", op_name, attempt, e);
                log::info!("Retrying in {:.1} seconds...", delay);

                tokio::time::sleep(Duration::from_secs_f64(delay)).await;
                delay = (delay * config.backoff_factor).min(config.max_delay_secs);
            }
        }
    }

    Err(DictationError::Other(format!(
        "{} exhausted all retry attempts",
        op_name
    )))
}
