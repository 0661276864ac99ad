use {
    super::{
        Auction,
        AuctionStatus,
        StoreError,
    },
    serde::{
        Deserialize,
        Serialize,
    },
};

/// Raw status code meaning "any status".
pub const ANY_STATUS_CODE: i32 = -1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Substring,
    Prefix,
}

/// Literal match against the product name. No pattern syntax is interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductNameFilter {
    pub pattern:        String,
    pub match_mode:     MatchMode,
    pub case_sensitive: bool,
}

impl ProductNameFilter {
    /// Case-insensitive substring match.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern:        pattern.into(),
            match_mode:     MatchMode::Substring,
            case_sensitive: false,
        }
    }

    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn matches(&self, product_name: &str) -> bool {
        if self.case_sensitive {
            self.matches_literal(product_name, &self.pattern)
        } else {
            self.matches_literal(&product_name.to_lowercase(), &self.pattern.to_lowercase())
        }
    }

    fn matches_literal(&self, product_name: &str, pattern: &str) -> bool {
        match self.match_mode {
            MatchMode::Substring => product_name.contains(pattern),
            MatchMode::Prefix => product_name.starts_with(pattern),
        }
    }
}

/// Predicates for listing auctions. Every present predicate must hold.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionFilter {
    pub status:       Option<AuctionStatus>,
    pub category:     Option<String>,
    pub product_name: Option<ProductNameFilter>,
}

impl AuctionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn active() -> Self {
        Self {
            status: Some(AuctionStatus::Active),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_product_name(mut self, product_name: ProductNameFilter) -> Self {
        self.product_name = Some(product_name);
        self
    }

    /// Builds a filter from untyped caller input.
    ///
    /// `status_code` is `-1` for any status, `0` for active and `1` for completed.
    /// Empty `category` and `product_name` mean the predicate is not applied.
    pub fn from_raw(status_code: i32, category: &str, product_name: &str) -> Result<Self, StoreError> {
        let status = match status_code {
            ANY_STATUS_CODE => None,
            0 => Some(AuctionStatus::Active),
            1 => Some(AuctionStatus::Completed),
            code => {
                return Err(StoreError::Malformed(format!(
                    "unknown auction status code {}",
                    code
                )))
            }
        };
        if product_name.chars().any(char::is_control) {
            return Err(StoreError::Malformed(
                "product name filter contains control characters".to_string(),
            ));
        }

        Ok(Self {
            status,
            category: (!category.is_empty()).then(|| category.to_string()),
            product_name: (!product_name.is_empty()).then(|| ProductNameFilter::new(product_name)),
        })
    }

    pub fn matches_fields(&self, status: AuctionStatus, category: &str, product_name: &str) -> bool {
        self.status.map_or(true, |expected| expected == status)
            && self.matches_attributes(category, product_name)
    }

    /// Category and product name predicates only.
    pub fn matches_attributes(&self, category: &str, product_name: &str) -> bool {
        self.category
            .as_deref()
            .map_or(true, |expected| expected == category)
            && self
                .product_name
                .as_ref()
                .map_or(true, |filter| filter.matches(product_name))
    }

    pub fn matches(&self, auction: &Auction) -> bool {
        self.matches_fields(auction.status, &auction.category, &auction.product_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match_ignores_case_by_default() {
        let filter = ProductNameFilter::new("camera");
        assert!(filter.matches("Vintage Camera"));
        assert!(filter.matches("CAMERA bag"));
        assert!(!filter.matches("Tripod"));
    }

    #[test]
    fn test_prefix_match() {
        let filter = ProductNameFilter::new("vint").with_match_mode(MatchMode::Prefix);
        assert!(filter.matches("Vintage Camera"));
        assert!(!filter.matches("A vintage camera"));
    }

    #[test]
    fn test_case_sensitive_match() {
        let filter = ProductNameFilter::new("Camera").with_case_sensitive(true);
        assert!(filter.matches("Vintage Camera"));
        assert!(!filter.matches("vintage camera"));
    }

    #[test]
    fn test_pattern_is_literal() {
        let filter = ProductNameFilter::new("c.*a");
        assert!(!filter.matches("camera"));
        assert!(filter.matches("model c.*a"));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let filter = AuctionFilter::active()
            .with_category("Photography")
            .with_product_name(ProductNameFilter::new("camera"));
        assert!(filter.matches_fields(AuctionStatus::Active, "Photography", "Old Camera"));
        assert!(!filter.matches_fields(AuctionStatus::Completed, "Photography", "Old Camera"));
        assert!(!filter.matches_fields(AuctionStatus::Active, "photography", "Old Camera"));
        assert!(!filter.matches_fields(AuctionStatus::Active, "Photography", "Lens"));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = AuctionFilter::all();
        assert!(filter.matches_fields(AuctionStatus::Active, "", ""));
        assert!(filter.matches_fields(AuctionStatus::Completed, "Books", "Atlas"));
    }

    #[test]
    fn test_from_raw_decodes_status_codes() {
        assert_eq!(AuctionFilter::from_raw(-1, "", "").unwrap(), AuctionFilter::all());
        assert_eq!(
            AuctionFilter::from_raw(0, "", "").unwrap().status,
            Some(AuctionStatus::Active)
        );
        assert_eq!(
            AuctionFilter::from_raw(1, "", "").unwrap().status,
            Some(AuctionStatus::Completed)
        );
        assert!(matches!(
            AuctionFilter::from_raw(7, "", ""),
            Err(StoreError::Malformed(_))
        ));
    }

    #[test]
    fn test_from_raw_treats_empty_strings_as_absent() {
        let filter = AuctionFilter::from_raw(-1, "Books", "").unwrap();
        assert_eq!(filter.category.as_deref(), Some("Books"));
        assert_eq!(filter.product_name, None);

        let filter = AuctionFilter::from_raw(-1, "", "atlas").unwrap();
        assert_eq!(filter.category, None);
        assert_eq!(filter.product_name, Some(ProductNameFilter::new("atlas")));
    }

    #[test]
    fn test_from_raw_rejects_control_characters() {
        assert!(matches!(
            AuctionFilter::from_raw(-1, "", "atlas\n"),
            Err(StoreError::Malformed(_))
        ));
    }
}
