#[cfg(test)]
use mockall::automock;
use {
    super::entities::{
        self,
        StoreError,
    },
    crate::kernel::db::DB,
    axum::async_trait,
    sqlx::{
        FromRow,
        Postgres,
        QueryBuilder,
    },
    std::fmt::Debug,
    time::OffsetDateTime,
    tracing::instrument,
};

const STATUS_ACTIVE: i16 = 0;
const STATUS_COMPLETED: i16 = 1;

const CONDITION_NEW: i16 = 1;
const CONDITION_USED: i16 = 2;
const CONDITION_REFURBISHED: i16 = 3;

/// Row layout of the `auction` table.
#[derive(Clone, FromRow, Debug, PartialEq, Eq)]
pub struct Auction {
    pub id:           String,
    pub product_name: String,
    pub category:     String,
    pub description:  String,
    pub condition:    i16,
    pub status:       i16,
    /// Creation time in unix seconds
    pub timestamp:    i64,
    /// Unix seconds of the last status change
    pub updated_at:   Option<i64>,
}

pub fn encode_status(status: entities::AuctionStatus) -> i16 {
    match status {
        entities::AuctionStatus::Active => STATUS_ACTIVE,
        entities::AuctionStatus::Completed => STATUS_COMPLETED,
    }
}

pub fn decode_status(code: i16) -> Result<entities::AuctionStatus, StoreError> {
    match code {
        STATUS_ACTIVE => Ok(entities::AuctionStatus::Active),
        STATUS_COMPLETED => Ok(entities::AuctionStatus::Completed),
        code => Err(StoreError::Malformed(format!(
            "unknown auction status code {}",
            code
        ))),
    }
}

pub fn encode_condition(condition: entities::ProductCondition) -> i16 {
    match condition {
        entities::ProductCondition::New => CONDITION_NEW,
        entities::ProductCondition::Used => CONDITION_USED,
        entities::ProductCondition::Refurbished => CONDITION_REFURBISHED,
    }
}

pub fn decode_condition(code: i16) -> Result<entities::ProductCondition, StoreError> {
    match code {
        CONDITION_NEW => Ok(entities::ProductCondition::New),
        CONDITION_USED => Ok(entities::ProductCondition::Used),
        CONDITION_REFURBISHED => Ok(entities::ProductCondition::Refurbished),
        code => Err(StoreError::Malformed(format!(
            "unknown product condition code {}",
            code
        ))),
    }
}

impl From<&entities::Auction> for Auction {
    fn from(auction: &entities::Auction) -> Self {
        Self {
            id:           auction.id.clone(),
            product_name: auction.product_name.clone(),
            category:     auction.category.clone(),
            description:  auction.description.clone(),
            condition:    encode_condition(auction.condition),
            status:       encode_status(auction.status),
            timestamp:    auction.creation_time.unix_timestamp(),
            updated_at:   None,
        }
    }
}

impl TryFrom<Auction> for entities::Auction {
    type Error = StoreError;

    fn try_from(auction: Auction) -> Result<Self, Self::Error> {
        let creation_time = OffsetDateTime::from_unix_timestamp(auction.timestamp).map_err(|e| {
            StoreError::Malformed(format!(
                "invalid creation timestamp {} for auction {}: {}",
                auction.timestamp, auction.id, e
            ))
        })?;
        Ok(Self {
            condition: decode_condition(auction.condition)?,
            status: decode_status(auction.status)?,
            creation_time,
            id: auction.id,
            product_name: auction.product_name,
            category: auction.category,
            description: auction.description,
        })
    }
}

impl Auction {
    /// Rows with an unknown status code never match a status predicate.
    pub fn matches(&self, filter: &entities::AuctionFilter) -> bool {
        let status_matches = match filter.status {
            Some(expected) => decode_status(self.status).is_ok_and(|status| status == expected),
            None => true,
        };
        status_matches && filter.matches_attributes(&self.category, &self.product_name)
    }
}

pub(super) fn to_store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict,
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::PoolTimedOut => StoreError::Timeout,
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::TypeNotFound { .. } => StoreError::Malformed(err.to_string()),
        _ => StoreError::Unavailable,
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Database: Debug + Send + Sync + 'static {
    async fn add_auction(&self, auction: &entities::Auction) -> Result<(), StoreError>;
    async fn get_auction(&self, auction_id: &str) -> Result<Option<Auction>, StoreError>;
    async fn get_auctions(
        &self,
        filter: &entities::AuctionFilter,
    ) -> Result<Vec<Auction>, StoreError>;
    /// Sets the status only if the stored status equals `expected_prior_status`.
    /// Returns whether a record was updated.
    async fn update_auction_status(
        &self,
        auction_id: &str,
        new_status: entities::AuctionStatus,
        expected_prior_status: entities::AuctionStatus,
        updated_at: OffsetDateTime,
    ) -> Result<bool, StoreError>;
}

#[async_trait]
impl Database for DB {
    #[instrument(
        target = "metrics",
        name = "db_add_auction",
        fields(
            category = "db_queries",
            result = "success",
            name = "add_auction",
            tracing_enabled
        ),
        skip_all
    )]
    async fn add_auction(&self, auction: &entities::Auction) -> Result<(), StoreError> {
        let row = Auction::from(auction);
        sqlx::query(
            "INSERT INTO auction (id, product_name, category, description, condition, status, timestamp) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&row.id)
        .bind(&row.product_name)
        .bind(&row.category)
        .bind(&row.description)
        .bind(row.condition)
        .bind(row.status)
        .bind(row.timestamp)
        .execute(self)
        .await
        .map_err(|e| {
            tracing::Span::current().record("result", "error");
            tracing::error!(auction_id = %row.id, "DB: Failed to insert auction: {}", e);
            to_store_error(e)
        })?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_get_auction",
        fields(
            category = "db_queries",
            result = "success",
            name = "get_auction",
            tracing_enabled
        ),
        skip_all
    )]
    async fn get_auction(&self, auction_id: &str) -> Result<Option<Auction>, StoreError> {
        sqlx::query_as("SELECT * FROM auction WHERE id = $1")
            .bind(auction_id)
            .fetch_optional(self)
            .await
            .map_err(|e| {
                tracing::Span::current().record("result", "error");
                tracing::error!(auction_id, "DB: Failed to get auction: {}", e);
                to_store_error(e)
            })
    }

    #[instrument(
        target = "metrics",
        name = "db_get_auctions",
        fields(
            category = "db_queries",
            result = "success",
            name = "get_auctions",
            tracing_enabled
        ),
        skip_all
    )]
    async fn get_auctions(
        &self,
        filter: &entities::AuctionFilter,
    ) -> Result<Vec<Auction>, StoreError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM auction WHERE TRUE");
        if let Some(status) = filter.status {
            query.push(" AND status = ");
            query.push_bind(encode_status(status));
        }
        if let Some(category) = filter.category.clone() {
            query.push(" AND category = ");
            query.push_bind(category);
        }
        query.push(" ORDER BY timestamp ASC, id ASC");
        let auctions: Vec<Auction> = query.build_query_as().fetch_all(self).await.map_err(|e| {
            tracing::Span::current().record("result", "error");
            tracing::error!(filter = ?filter, "DB: Failed to fetch auctions: {}", e);
            to_store_error(e)
        })?;

        // Product name matching is done here, not in SQL.
        Ok(match &filter.product_name {
            Some(product_name) => auctions
                .into_iter()
                .filter(|auction| product_name.matches(&auction.product_name))
                .collect(),
            None => auctions,
        })
    }

    #[instrument(
        target = "metrics",
        name = "db_update_auction_status",
        fields(
            category = "db_queries",
            result = "success",
            name = "update_auction_status",
            tracing_enabled
        ),
        skip_all
    )]
    async fn update_auction_status(
        &self,
        auction_id: &str,
        new_status: entities::AuctionStatus,
        expected_prior_status: entities::AuctionStatus,
        updated_at: OffsetDateTime,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE auction SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4",
        )
        .bind(encode_status(new_status))
        .bind(updated_at.unix_timestamp())
        .bind(auction_id)
        .bind(encode_status(expected_prior_status))
        .execute(self)
        .await
        .map_err(|e| {
            tracing::Span::current().record("result", "error");
            tracing::error!(auction_id, "DB: Failed to update auction status: {}", e);
            to_store_error(e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
