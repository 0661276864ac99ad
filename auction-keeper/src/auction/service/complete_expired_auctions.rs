use {
    super::Service,
    crate::{
        auction::entities::{
            self,
            StoreError,
        },
        kernel::context::OperationContext,
    },
    std::{
        collections::HashSet,
        sync::Arc,
        time::Duration,
    },
    time::OffsetDateTime,
    tokio::{
        sync::Semaphore,
        task::JoinSet,
    },
};

pub struct CompleteExpiredAuctionsInput {
    pub context: OperationContext,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionUpdateError {
    pub auction_id: entities::AuctionId,
    pub error:      StoreError,
}

/// Outcome of one sweep pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepResult {
    /// Active auctions returned by the listing
    pub examined:        usize,
    pub completed_count: usize,
    /// Auctions that were not expired yet
    pub skipped:         usize,
    /// Failed completions, ordered by auction id
    pub errors:          Vec<AuctionUpdateError>,
}

#[derive(Debug)]
enum AuctionOutcome {
    Skipped,
    Completed,
    Failed(StoreError),
}

impl Service {
    /// Completes every active auction whose expiration interval has elapsed.
    ///
    /// Fails only when the active auctions cannot be listed. Each auction is handled by its own
    /// task and a failed completion is reported in [`SweepResult::errors`] without affecting the
    /// others. All tasks are joined before this returns.
    pub async fn complete_expired_auctions(
        &self,
        input: CompleteExpiredAuctionsInput,
    ) -> Result<SweepResult, StoreError> {
        let context = input.context;
        let auctions = self
            .repo
            .get_auctions(&context, &entities::AuctionFilter::active())
            .await
            .inspect_err(|err| {
                tracing::error!(error = ?err, "Failed to list active auctions");
            })?;

        let interval = self.repo.expiration_interval().as_duration();
        let now = OffsetDateTime::now_utc();
        let examined = auctions.len();
        let permits = Arc::new(Semaphore::new(
            self.config.max_concurrent_updates.min(examined).max(1),
        ));

        let mut outstanding: HashSet<entities::AuctionId> = HashSet::with_capacity(examined);
        let mut tasks = JoinSet::new();
        for auction in auctions {
            outstanding.insert(auction.id.clone());
            tasks.spawn({
                let service = self.clone();
                let context = context.clone();
                let permits = permits.clone();
                async move {
                    let auction_id = auction.id.clone();
                    let outcome = service
                        .complete_auction_if_expired(&context, &permits, auction, interval, now)
                        .await;
                    (auction_id, outcome)
                }
            });
        }

        let mut outcomes = Vec::with_capacity(examined);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((auction_id, outcome)) => {
                    outstanding.remove(&auction_id);
                    outcomes.push((auction_id, outcome));
                }
                Err(err) => {
                    tracing::error!(error = ?err, "Auction expiration task did not finish");
                }
            }
        }
        // A task that panicked or was aborted never reported back.
        outcomes.extend(
            outstanding
                .into_iter()
                .map(|auction_id| (auction_id, AuctionOutcome::Failed(StoreError::Unavailable))),
        );

        let result = summarize(examined, outcomes);
        tracing::info!(
            examined = result.examined,
            completed = result.completed_count,
            skipped = result.skipped,
            failed = result.errors.len(),
            "Expiration sweep finished"
        );
        Ok(result)
    }

    async fn complete_auction_if_expired(
        &self,
        context: &OperationContext,
        permits: &Semaphore,
        auction: entities::Auction,
        interval: Duration,
        now: OffsetDateTime,
    ) -> AuctionOutcome {
        if !entities::is_expired(auction.creation_time, interval, now) {
            return AuctionOutcome::Skipped;
        }

        let _permit = match context
            .run(async {
                permits
                    .acquire()
                    .await
                    .map_err(|_| StoreError::Unavailable)
            })
            .await
        {
            Ok(permit) => permit,
            Err(err) => return AuctionOutcome::Failed(err),
        };

        match self
            .repo
            .update_auction_status(
                context,
                &auction,
                entities::AuctionStatus::Completed,
                entities::AuctionStatus::Active,
            )
            .await
        {
            Ok(()) => {
                tracing::info!(auction_id = auction.id, "Auction completed");
                AuctionOutcome::Completed
            }
            Err(err) => {
                tracing::error!(
                    error = ?err,
                    auction_id = auction.id,
                    "Failed to complete expired auction"
                );
                AuctionOutcome::Failed(err)
            }
        }
    }
}

fn summarize(
    examined: usize,
    outcomes: Vec<(entities::AuctionId, AuctionOutcome)>,
) -> SweepResult {
    let mut result = SweepResult {
        examined,
        ..Default::default()
    };
    for (auction_id, outcome) in outcomes {
        match outcome {
            AuctionOutcome::Skipped => result.skipped += 1,
            AuctionOutcome::Completed => result.completed_count += 1,
            AuctionOutcome::Failed(error) => {
                result.errors.push(AuctionUpdateError { auction_id, error })
            }
        }
    }
    result
        .errors
        .sort_by(|a, b| a.auction_id.cmp(&b.auction_id));
    result
}
