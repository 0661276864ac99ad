use {
    super::{
        entities::{
            self,
            StoreError,
        },
        Repository,
    },
    crate::kernel::context::OperationContext,
};

impl Repository {
    /// Results are ordered by creation time. A row that cannot be mapped fails the whole listing.
    pub async fn get_auctions(
        &self,
        context: &OperationContext,
        filter: &entities::AuctionFilter,
    ) -> Result<Vec<entities::Auction>, StoreError> {
        context
            .run(self.db.get_auctions(filter))
            .await?
            .into_iter()
            .map(|auction| {
                let auction_id = auction.id.clone();
                entities::Auction::try_from(auction).inspect_err(|e| {
                    tracing::error!(
                        error = ?e,
                        auction_id,
                        "Failed to convert database auction to entity auction"
                    );
                })
            })
            .collect()
    }
}
