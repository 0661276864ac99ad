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

pub struct GetAuctionsInput {
    pub context: OperationContext,
    pub filter:  entities::AuctionFilter,
}

impl Service {
    pub async fn get_auctions(
        &self,
        input: GetAuctionsInput,
    ) -> Result<Vec<entities::Auction>, StoreError> {
        self.repo.get_auctions(&input.context, &input.filter).await
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::auction::service::add_auction::AddAuctionInput,
    };

    #[tokio::test]
    async fn test_raw_filter_lists_matching_auctions() {
        let service = Service::new_in_memory(Default::default());
        for (product_name, category) in [
            ("Mountain Bike", "Sports"),
            ("Bike Helmet", "Sports"),
            ("Bike Poster", "Art"),
        ] {
            service
                .add_auction(AddAuctionInput {
                    context: OperationContext::new(),
                    auction: entities::AuctionCreate {
                        product_name: product_name.to_string(),
                        category:     category.to_string(),
                        description:  String::new(),
                        condition:    entities::ProductCondition::New,
                    },
                })
                .await
                .unwrap();
        }

        let mut names: Vec<String> = service
            .get_auctions(GetAuctionsInput {
                context: OperationContext::new(),
                filter:  entities::AuctionFilter::from_raw(-1, "Sports", "bike").unwrap(),
            })
            .await
            .unwrap()
            .into_iter()
            .map(|auction| auction.product_name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Bike Helmet", "Mountain Bike"]);
    }
}
