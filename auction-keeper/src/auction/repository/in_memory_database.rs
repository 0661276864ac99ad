use {
    super::{
        entities::{
            self,
            StoreError,
        },
        models::{
            self,
            Database,
        },
    },
    axum::async_trait,
    dashmap::{
        mapref::entry::Entry,
        DashMap,
    },
    time::OffsetDateTime,
};

/// Process-local auction table. Used when no database url is configured and in tests.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    auctions: DashMap<entities::AuctionId, models::Auction>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_row(&self, auction_id: &str) -> Option<models::Auction> {
        self.auctions.get(auction_id).map(|row| row.clone())
    }

    /// Stores a row as is, bypassing the entity mapping.
    pub fn insert_row(&self, row: models::Auction) {
        self.auctions.insert(row.id.clone(), row);
    }
}

#[async_trait]
impl Database for InMemoryDatabase {
    async fn add_auction(&self, auction: &entities::Auction) -> Result<(), StoreError> {
        match self.auctions.entry(auction.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(entry) => {
                entry.insert(models::Auction::from(auction));
                Ok(())
            }
        }
    }

    async fn get_auction(&self, auction_id: &str) -> Result<Option<models::Auction>, StoreError> {
        Ok(self.get_row(auction_id))
    }

    async fn get_auctions(
        &self,
        filter: &entities::AuctionFilter,
    ) -> Result<Vec<models::Auction>, StoreError> {
        let mut auctions: Vec<models::Auction> = self
            .auctions
            .iter()
            .filter(|row| row.matches(filter))
            .map(|row| row.clone())
            .collect();
        auctions.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(auctions)
    }

    async fn update_auction_status(
        &self,
        auction_id: &str,
        new_status: entities::AuctionStatus,
        expected_prior_status: entities::AuctionStatus,
        updated_at: OffsetDateTime,
    ) -> Result<bool, StoreError> {
        // The shard stays write-locked between the status check and the write.
        match self.auctions.get_mut(auction_id) {
            Some(mut row) if row.status == models::encode_status(expected_prior_status) => {
                row.status = models::encode_status(new_status);
                row.updated_at = Some(updated_at.unix_timestamp());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
