use super::entities::{
    self,
    ExpirationInterval,
};

mod add_auction;
mod get_auction_by_id;
mod get_auctions;
mod in_memory_database;
mod models;
mod update_auction_status;

pub use {
    in_memory_database::*,
    models::*,
};

#[derive(Debug)]
pub struct Repository {
    pub db:              Box<dyn Database>,
    expiration_interval: ExpirationInterval,
}

impl Repository {
    /// The expiration interval is fixed for the lifetime of the repository.
    pub fn new(db: impl Database, expiration_interval: ExpirationInterval) -> Self {
        Self {
            db: Box::new(db),
            expiration_interval,
        }
    }

    pub fn expiration_interval(&self) -> ExpirationInterval {
        self.expiration_interval
    }
}
