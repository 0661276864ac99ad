use {
    super::{
        entities::{
            self,
            StoreError,
        },
        Repository,
    },
    crate::kernel::context::OperationContext,
    time::OffsetDateTime,
};

impl Repository {
    /// Writes `new_status` only if the stored status still equals `expected_prior_status`.
    ///
    /// Only the status and its update time are written. The other fields of `auction` are the
    /// caller's snapshot and are never written back, so a stale snapshot can at worst have its
    /// status write rejected with [`StoreError::Conflict`].
    pub async fn update_auction_status(
        &self,
        context: &OperationContext,
        auction: &entities::Auction,
        new_status: entities::AuctionStatus,
        expected_prior_status: entities::AuctionStatus,
    ) -> Result<(), StoreError> {
        if !expected_prior_status.can_transition_to(new_status) {
            return Err(StoreError::InvalidTransition {
                from: expected_prior_status,
                to:   new_status,
            });
        }

        let updated = context
            .run(self.db.update_auction_status(
                &auction.id,
                new_status,
                expected_prior_status,
                OffsetDateTime::now_utc(),
            ))
            .await?;
        if updated {
            tracing::debug!(
                auction_id = auction.id,
                status = %new_status,
                "Auction status updated"
            );
            return Ok(());
        }

        // Nothing matched the id and prior status. Tell a missing record from a concurrent change.
        match context.run(self.db.get_auction(&auction.id)).await? {
            None => Err(StoreError::NotFound),
            Some(current) => {
                tracing::warn!(
                    auction_id = auction.id,
                    expected_status = %expected_prior_status,
                    stored_status = current.status,
                    "Auction status changed concurrently"
                );
                Err(StoreError::Conflict)
            }
        }
    }
}
