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
    pub async fn get_auction_by_id(
        &self,
        context: &OperationContext,
        auction_id: &str,
    ) -> Result<Option<entities::Auction>, StoreError> {
        context
            .run(self.db.get_auction(auction_id))
            .await?
            .map(entities::Auction::try_from)
            .transpose()
            .inspect_err(|e| {
                tracing::error!(
                    error = ?e,
                    auction_id,
                    "Failed to convert database auction to entity auction"
                );
            })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::auction::repository::{
            InMemoryDatabase,
            MockDatabase,
        },
        tokio::time::Instant,
    };

    #[tokio::test]
    async fn test_missing_auction_is_none() {
        let repo = Repository::new(InMemoryDatabase::new(), Default::default());
        let found = repo
            .get_auction_by_id(&OperationContext::new(), "missing")
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_malformed_row_is_reported() {
        let db = InMemoryDatabase::new();
        db.insert_row(crate::auction::repository::Auction {
            id:           "broken".to_string(),
            product_name: "Lamp".to_string(),
            category:     "Home".to_string(),
            description:  "".to_string(),
            condition:    42,
            status:       0,
            timestamp:    1709288130,
            updated_at:   None,
        });
        let repo = Repository::new(db, Default::default());

        let result = repo
            .get_auction_by_id(&OperationContext::new(), "broken")
            .await;
        assert!(matches!(result, Err(StoreError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_expired_deadline_is_timeout() {
        let mut db = MockDatabase::new();
        db.expect_get_auction().never();
        let repo = Repository::new(db, Default::default());
        let context = OperationContext::new().with_deadline(Instant::now());

        let result = repo.get_auction_by_id(&context, "a1").await;
        assert_eq!(result, Err(StoreError::Timeout));
    }
}
