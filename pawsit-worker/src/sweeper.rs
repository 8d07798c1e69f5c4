/// Booking expiry sweeper
///
/// Periodically cancels `pending` bookings whose start time is more than
/// 24 hours in the past. Each stale booking goes through the same guarded
/// transition as a user-initiated cancel, so a booking confirmed while the
/// sweep runs is left alone.
///
/// # Example
///
/// ```no_run
/// use pawsit_shared::services::Services;
/// use pawsit_worker::sweeper::{ExpirySweeper, SweeperConfig};
///
/// # async fn example(services: Services) {
/// let sweeper = ExpirySweeper::new(services.bookings, SweeperConfig::default());
/// let shutdown = sweeper.shutdown_token();
///
/// let handle = tokio::spawn(async move { sweeper.run().await });
///
/// shutdown.cancel();
/// let _ = handle.await;
/// # }
/// ```

use chrono::Utc;
use pawsit_shared::error::ServiceResult;
use pawsit_shared::services::BookingService;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Sweeper configuration
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Seconds between sweeps
    pub interval_secs: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        SweeperConfig {
            interval_secs: 3600,
        }
    }
}

pub struct ExpirySweeper {
    bookings: BookingService,
    config: SweeperConfig,
    shutdown_token: CancellationToken,
}

impl ExpirySweeper {
    pub fn new(bookings: BookingService, config: SweeperConfig) -> Self {
        ExpirySweeper {
            bookings,
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Uses an externally owned token, e.g. the server's shutdown token
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown_token = token;
        self
    }

    /// Cancelling this token stops [`ExpirySweeper::run`]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs one sweep immediately, then one per interval, until shutdown
    ///
    /// A failed sweep is logged and retried on the next tick.
    pub async fn run(&self) {
        let period = Duration::from_secs(self.config.interval_secs.max(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_secs = period.as_secs(), "Expiry sweeper started");

        loop {
            tokio::select! {
                _ = self.shutdown_token.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep_once().await {
                        tracing::error!(error = %e, "Expiry sweep failed");
                    }
                }
            }
        }

        tracing::info!("Expiry sweeper stopped");
    }

    /// Cancels every stale pending booking; returns how many were cancelled
    pub async fn sweep_once(&self) -> ServiceResult<usize> {
        let cancelled = self.bookings.expire_stale(Utc::now()).await?;

        if cancelled > 0 {
            tracing::info!(cancelled, "Expired stale pending bookings");
        } else {
            tracing::debug!("No stale pending bookings");
        }

        Ok(cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use pawsit_shared::models::booking::{Booking, BookingStatus};
    use pawsit_shared::repository::memory::InMemoryStore;
    use pawsit_shared::services::Services;

    fn stale_booking(id: i64, status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id,
            owner_id: 1,
            sitter_id: 2,
            pet_id: 3,
            service_id: 4,
            start_time: now - ChronoDuration::hours(26),
            end_time: now - ChronoDuration::hours(25),
            status,
            created_at: now - ChronoDuration::hours(40),
            updated_at: now - ChronoDuration::hours(40),
        }
    }

    fn sweeper(store: &InMemoryStore, interval_secs: u64) -> ExpirySweeper {
        let services = Services::in_memory(store.clone(), "test-secret-key-that-is-long-enough");
        ExpirySweeper::new(services.bookings, SweeperConfig { interval_secs })
    }

    #[test]
    fn test_sweeper_config_default() {
        assert_eq!(SweeperConfig::default().interval_secs, 3600);
    }

    #[tokio::test]
    async fn test_sweep_once_cancels_stale_pending() {
        let store = InMemoryStore::new();
        store.insert_booking(stale_booking(1, BookingStatus::Pending));
        store.insert_booking(stale_booking(2, BookingStatus::Confirmed));

        let sweeper = sweeper(&store, 3600);
        assert_eq!(sweeper.sweep_once().await.unwrap(), 1);
        assert_eq!(sweeper.sweep_once().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let store = InMemoryStore::new();
        store.insert_booking(stale_booking(1, BookingStatus::Pending));

        let sweeper = sweeper(&store, 3600);
        let token = sweeper.shutdown_token();
        let handle = tokio::spawn(async move { sweeper.run().await });

        // the first tick fires immediately
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should stop promptly")
            .unwrap();

        let services = Services::in_memory(store, "test-secret-key-that-is-long-enough");
        assert_eq!(
            services.bookings.get(1).await.unwrap().status,
            BookingStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_parent_token_stops_run() {
        let store = InMemoryStore::new();
        let server_shutdown = CancellationToken::new();
        let sweeper =
            sweeper(&store, 3600).with_shutdown_token(server_shutdown.child_token());
        let handle = tokio::spawn(async move { sweeper.run().await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        server_shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should follow the parent token")
            .unwrap();
    }
}
