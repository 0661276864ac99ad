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

pub struct GetAuctionByIdInput {
    pub context:    OperationContext,
    pub auction_id: entities::AuctionId,
}

impl Service {
    pub async fn get_auction_by_id(
        &self,
        input: GetAuctionByIdInput,
    ) -> Result<Option<entities::Auction>, StoreError> {
        self.repo
            .get_auction_by_id(&input.context, &input.auction_id)
            .await
    }
}
