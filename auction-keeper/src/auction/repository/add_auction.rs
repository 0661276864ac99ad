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
    pub async fn add_auction(
        &self,
        context: &OperationContext,
        auction: entities::Auction,
    ) -> Result<entities::Auction, StoreError> {
        context.run(self.db.add_auction(&auction)).await?;
        tracing::debug!(auction_id = auction.id, "Auction added");
        Ok(auction)
    }
}
