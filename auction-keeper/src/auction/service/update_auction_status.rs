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

pub struct UpdateAuctionStatusInput {
    pub context:               OperationContext,
    pub auction:               entities::Auction,
    pub new_status:            entities::AuctionStatus,
    pub expected_prior_status: entities::AuctionStatus,
}

impl Service {
    pub async fn update_auction_status(
        &self,
        input: UpdateAuctionStatusInput,
    ) -> Result<(), StoreError> {
        self.repo
            .update_auction_status(
                &input.context,
                &input.auction,
                input.new_status,
                input.expected_prior_status,
            )
            .await
    }
}
