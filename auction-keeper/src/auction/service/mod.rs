use {
    super::{
        entities::ExpirationInterval,
        repository::{
            Database,
            Repository,
        },
    },
    std::sync::Arc,
};

pub mod add_auction;
pub mod complete_expired_auctions;
pub mod get_auction_by_id;
pub mod get_auctions;
pub mod update_auction_status;
pub mod workers;

pub const DEFAULT_MAX_CONCURRENT_UPDATES: usize = 32;

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub expiration_interval:    ExpirationInterval,
    /// Upper bound on auction updates in flight during one sweep pass
    pub max_concurrent_updates: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expiration_interval:    ExpirationInterval::default(),
            max_concurrent_updates: DEFAULT_MAX_CONCURRENT_UPDATES,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Service(Arc<ServiceInner>);
impl std::ops::Deref for Service {
    type Target = ServiceInner;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub struct ServiceInner {
    repo:   Arc<Repository>,
    config: Config,
}

impl Service {
    pub fn new(db: impl Database, config: Config) -> Self {
        Self(Arc::new(ServiceInner {
            repo: Arc::new(Repository::new(db, config.expiration_interval)),
            config,
        }))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
pub mod tests {
    use {
        super::*,
        crate::auction::repository::{
            InMemoryDatabase,
            MockDatabase,
        },
    };

    impl Service {
        pub fn new_with_mocks(db: MockDatabase) -> Self {
            Service::new(db, Config::default())
        }

        pub fn new_in_memory(config: Config) -> Self {
            Service::new(InMemoryDatabase::new(), config)
        }
    }
}
