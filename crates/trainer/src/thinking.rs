//! Simulated opponent thinking time.

use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;

use crate::config::TrainerConfig;
use crate::error::TrainerError;

/// Pause (longer right after a human error) + minimum think time + jitter.
pub fn thinking_time<R: Rng + ?Sized>(config: &TrainerConfig, punish: bool, rng: &mut R) -> Duration {
    let pause = if punish {
        config.punish_pause
    } else {
        config.reply_pause
    };
    let jitter_ms = config.think_jitter.as_millis() as u64;
    let jitter = Duration::from_millis(rng.gen_range(0..=jitter_ms));
    pause + config.think_min + jitter
}

/// Sleep for `delay` unless cancelled first. The wait is cancelled when the
/// channel holds `true` or its sender is dropped.
pub async fn wait_or_cancel(
    delay: Duration,
    cancel: &mut watch::Receiver<bool>,
) -> Result<(), TrainerError> {
    if *cancel.borrow_and_update() {
        return Err(TrainerError::Cancelled);
    }

    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return Ok(()),
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow_and_update() {
                    return Err(TrainerError::Cancelled);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_thinking_time_bounds() {
        let config = TrainerConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..50 {
            let calm = thinking_time(&config, false, &mut rng);
            assert!(calm >= Duration::from_millis(1500));
            assert!(calm <= Duration::from_millis(3000));

            let punish = thinking_time(&config, true, &mut rng);
            assert!(punish >= Duration::from_millis(1800));
            assert!(punish <= Duration::from_millis(3300));
        }
    }

    #[test]
    fn test_zero_jitter() {
        let config = TrainerConfig {
            reply_pause: Duration::ZERO,
            think_min: Duration::from_millis(5),
            think_jitter: Duration::ZERO,
            ..TrainerConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            thinking_time(&config, false, &mut rng),
            Duration::from_millis(5)
        );
    }

    #[tokio::test]
    async fn test_wait_completes() {
        let (_tx, mut rx) = watch::channel(false);
        wait_or_cancel(Duration::from_millis(5), &mut rx).await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_cancelled_by_signal() {
        let (tx, mut rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            tx.send(true).unwrap();
            // keep the sender alive past the signal
            tokio::time::sleep(Duration::from_secs(5)).await;
        });
        let result = wait_or_cancel(Duration::from_secs(30), &mut rx).await;
        assert!(matches!(result, Err(TrainerError::Cancelled)));
    }

    #[tokio::test]
    async fn test_wait_cancelled_when_sender_dropped() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        let result = wait_or_cancel(Duration::from_secs(30), &mut rx).await;
        assert!(matches!(result, Err(TrainerError::Cancelled)));
    }
}
