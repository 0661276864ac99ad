use {
    std::time::Duration,
    time::OffsetDateTime,
};

pub const DEFAULT_EXPIRATION_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// How long an auction stays active after its creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpirationInterval(Duration);

impl ExpirationInterval {
    pub fn new(interval: Duration) -> Self {
        Self(interval)
    }

    /// Parses a duration such as `"90s"`, `"5m"` or `"1h30m"`.
    /// Missing and unparsable values fall back to five minutes.
    pub fn from_config(raw: Option<&str>) -> Self {
        let parsed = raw
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| match humantime::parse_duration(raw) {
                Ok(interval) => Some(interval),
                Err(err) => {
                    tracing::warn!(
                        error = ?err,
                        value = raw,
                        "Invalid auction expiration interval, using default"
                    );
                    None
                }
            });
        Self(parsed.unwrap_or(DEFAULT_EXPIRATION_INTERVAL))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for ExpirationInterval {
    fn default() -> Self {
        Self(DEFAULT_EXPIRATION_INTERVAL)
    }
}

/// True once `now` is strictly after `creation_time + interval`.
/// An end time that cannot be represented never expires.
pub fn is_expired(creation_time: OffsetDateTime, interval: Duration, now: OffsetDateTime) -> bool {
    time::Duration::try_from(interval)
        .ok()
        .and_then(|interval| creation_time.checked_add(interval))
        .is_some_and(|end_time| now > end_time)
}
