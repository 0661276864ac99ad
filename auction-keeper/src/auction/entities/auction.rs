use {
    serde::{
        Deserialize,
        Serialize,
    },
    strum::Display,
    time::{
        Duration,
        OffsetDateTime,
    },
    uuid::Uuid,
};

pub type AuctionId = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductCondition {
    New,
    Used,
    Refurbished,
}

/// Lifecycle state of an auction.
///
/// `Active` is the initial state and `Completed` is terminal. The only legal
/// transition is `Active -> Completed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    Active,
    Completed,
}

impl AuctionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AuctionStatus::Completed)
    }

    pub fn can_transition_to(&self, next: AuctionStatus) -> bool {
        !self.is_terminal() && matches!((self, next), (AuctionStatus::Active, AuctionStatus::Completed))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id:            AuctionId,
    pub product_name:  String,
    pub category:      String,
    pub description:   String,
    pub condition:     ProductCondition,
    pub status:        AuctionStatus,
    #[serde(with = "time::serde::timestamp")]
    pub creation_time: OffsetDateTime,
}

#[derive(Clone, Debug)]
pub struct AuctionCreate {
    pub product_name: String,
    pub category:     String,
    pub description:  String,
    pub condition:    ProductCondition,
}

impl Auction {
    pub fn new(auction: AuctionCreate) -> Self {
        Self::new_with_time(auction, OffsetDateTime::now_utc())
    }

    /// The creation time is truncated to whole seconds, the precision it is stored with.
    pub fn new_with_time(auction: AuctionCreate, creation_time: OffsetDateTime) -> Self {
        Self {
            id:            Uuid::new_v4().to_string(),
            product_name:  auction.product_name,
            category:      auction.category,
            description:   auction.description,
            condition:     auction.condition,
            status:        AuctionStatus::Active,
            creation_time: creation_time
                - Duration::nanoseconds(creation_time.nanosecond() as i64),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AuctionStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        time::macros::datetime,
    };

    fn auction_create() -> AuctionCreate {
        AuctionCreate {
            product_name: "Vintage Camera".to_string(),
            category:     "Photography".to_string(),
            description:  "Rangefinder, 1962".to_string(),
            condition:    ProductCondition::Used,
        }
    }

    #[test]
    fn test_only_active_to_completed_is_allowed() {
        assert!(AuctionStatus::Active.can_transition_to(AuctionStatus::Completed));
        assert!(!AuctionStatus::Completed.can_transition_to(AuctionStatus::Active));
        assert!(!AuctionStatus::Active.can_transition_to(AuctionStatus::Active));
        assert!(!AuctionStatus::Completed.can_transition_to(AuctionStatus::Completed));
    }

    #[test]
    fn test_completed_is_terminal() {
        assert!(AuctionStatus::Completed.is_terminal());
        assert!(!AuctionStatus::Active.is_terminal());
    }

    #[test]
    fn test_new_auction_is_active_with_whole_second_creation_time() {
        let auction = Auction::new_with_time(
            auction_create(),
            datetime!(2024-03-01 10:15:30.750 UTC),
        );
        assert!(auction.is_active());
        assert_eq!(auction.creation_time, datetime!(2024-03-01 10:15:30 UTC));
        assert!(!auction.id.is_empty());
    }

    #[test]
    fn test_new_auctions_get_distinct_ids() {
        let first = Auction::new(auction_create());
        let second = Auction::new(auction_create());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_creation_time_serializes_as_unix_timestamp() {
        let auction = Auction::new_with_time(
            auction_create(),
            datetime!(2024-03-01 10:15:30 UTC),
        );
        let json = serde_json::to_value(&auction).unwrap();
        assert_eq!(json["creation_time"], 1709288130);
        assert_eq!(json["status"], "active");
        assert_eq!(json["condition"], "used");
    }
}
