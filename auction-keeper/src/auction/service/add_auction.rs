use {
    super::Service,
    crate::{
        auction::entities::{
            self,
            StoreError,
        },
        kernel::context::OperationContext,
    },
};

pub struct AddAuctionInput {
    pub context: OperationContext,
    pub auction: entities::AuctionCreate,
}

impl Service {
    /// Creates an active auction with a fresh id and the current time as its creation time.
    pub async fn add_auction(&self, input: AddAuctionInput) -> Result<entities::Auction, StoreError> {
        let auction = entities::Auction::new(input.auction);
        tracing::info!(
            auction_id = auction.id,
            category = auction.category,
            "Adding auction"
        );
        self.repo.add_auction(&input.context, auction).await
    }
}
