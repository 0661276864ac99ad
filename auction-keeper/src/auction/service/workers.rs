use {
    super::{
        complete_expired_auctions::CompleteExpiredAuctionsInput,
        Service,
    },
    crate::{
        kernel::context::OperationContext,
        per_metrics::{
            AUCTIONS_COMPLETED_TOTAL,
            AUCTION_COMPLETION_FAILURES_TOTAL,
            SWEEP_DURATION_METRIC,
        },
        server::{
            EXIT_CHECK_INTERVAL,
            SHOULD_EXIT,
        },
    },
    axum_prometheus::metrics,
    std::{
        sync::atomic::Ordering,
        time::{
            Duration,
            Instant,
        },
    },
};

pub async fn run_expiration_loop(service: Service, sweep_interval: Duration) -> anyhow::Result<()> {
    tracing::info!(
        sweep_interval = ?sweep_interval,
        expiration_interval = ?service.config().expiration_interval.as_duration(),
        "Starting expiration sweeper..."
    );
    let mut exit_check_interval = tokio::time::interval(EXIT_CHECK_INTERVAL);
    let mut sweep_timer = tokio::time::interval(sweep_interval);
    sweep_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    while !SHOULD_EXIT.load(Ordering::Acquire) {
        tokio::select! {
            _ = sweep_timer.tick() => {
                service.sweep_expired_auctions(sweep_interval).await;
            }
            _ = exit_check_interval.tick() => {}
        }
    }
    tracing::info!("Shutting down expiration sweeper...");
    Ok(())
}

impl Service {
    /// Runs one sweep pass bounded by `timeout` and records its metrics.
    pub async fn sweep_expired_auctions(&self, timeout: Duration) {
        let started_at = Instant::now();
        let result = self
            .complete_expired_auctions(CompleteExpiredAuctionsInput {
                context: OperationContext::new().with_timeout(timeout),
            })
            .await;
        let labels = [(
            "result",
            if result.is_ok() { "success" } else { "error" }.to_string(),
        )];
        metrics::histogram!(SWEEP_DURATION_METRIC, &labels)
            .record(started_at.elapsed().as_secs_f64());

        match result {
            Ok(result) => {
                metrics::counter!(AUCTIONS_COMPLETED_TOTAL).increment(result.completed_count as u64);
                for error in result.errors.iter() {
                    metrics::counter!(
                        AUCTION_COMPLETION_FAILURES_TOTAL,
                        &[("error", error.error.kind().to_string())]
                    )
                    .increment(1);
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, "Expiration sweep failed, retrying on next tick");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::auction::{
            entities,
            repository::{
                test_utils::make_auction,
                MockDatabase,
            },
            service::get_auction_by_id::GetAuctionByIdInput,
        },
        time::OffsetDateTime,
    };

    #[tokio::test]
    async fn test_sweep_completes_expired_auctions() {
        let service = Service::new_in_memory(Default::default());
        let expired = make_auction(
            "expired",
            entities::AuctionStatus::Active,
            OffsetDateTime::now_utc() - time::Duration::hours(1),
        );
        service
            .repo
            .add_auction(&OperationContext::new(), expired)
            .await
            .unwrap();

        service.sweep_expired_auctions(Duration::from_secs(5)).await;

        let stored = service
            .get_auction_by_id(GetAuctionByIdInput {
                context:    OperationContext::new(),
                auction_id: "expired".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, entities::AuctionStatus::Completed);
    }

    #[tokio::test]
    async fn test_failed_sweep_does_not_panic() {
        let mut db = MockDatabase::new();
        db.expect_get_auctions()
            .times(1)
            .returning(|_| Err(entities::StoreError::Unavailable));
        let service = Service::new_with_mocks(db);

        service.sweep_expired_auctions(Duration::from_secs(5)).await;
    }
}
