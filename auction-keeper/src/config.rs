use {
    crate::auction::service::DEFAULT_MAX_CONCURRENT_UPDATES,
    clap::{
        crate_authors,
        crate_description,
        crate_name,
        crate_version,
        Args,
        Parser,
    },
    std::time::Duration,
};

pub mod server;

#[derive(Parser, Debug)]
#[command(name = crate_name!())]
#[command(author = crate_authors!())]
#[command(about = crate_description!())]
#[command(version = crate_version!())]
pub enum Options {
    /// Run the auction keeper service.
    Run(RunOptions),
}

#[derive(Args, Clone, Debug)]
pub struct RunOptions {
    /// Server Options
    #[command(flatten)]
    pub server: server::Options,

    #[command(flatten)]
    pub expiration: ExpirationOptions,
}

#[derive(Args, Clone, Debug)]
#[command(next_help_heading = "Expiration Options")]
#[group(id = "Expiration")]
pub struct ExpirationOptions {
    /// How long an auction stays active after creation, e.g. `90s`, `20m` or `1h30m`.
    /// Missing or invalid values fall back to five minutes.
    #[arg(long = "auction-interval")]
    #[arg(env = "AUCTION_INTERVAL")]
    pub auction_interval: Option<String>,

    /// How often expired auctions are swept.
    #[arg(long = "sweep-interval")]
    #[arg(env = "SWEEP_INTERVAL")]
    #[arg(default_value = "10s")]
    #[arg(value_parser = humantime::parse_duration)]
    pub sweep_interval: Duration,

    /// Maximum number of auction updates in flight during one sweep.
    #[arg(long = "max-concurrent-updates")]
    #[arg(env = "MAX_CONCURRENT_UPDATES")]
    #[arg(default_value_t = DEFAULT_MAX_CONCURRENT_UPDATES)]
    pub max_concurrent_updates: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_options_from_arguments() {
        let Options::Run(options) = Options::try_parse_from([
            "auction-keeper",
            "run",
            "--database-url",
            "postgres://keeper@localhost/auctions",
            "--auction-interval",
            "20m",
            "--sweep-interval",
            "1m 30s",
            "--max-concurrent-updates",
            "4",
        ])
        .unwrap();
        assert_eq!(
            options.server.database_url.as_deref(),
            Some("postgres://keeper@localhost/auctions")
        );
        assert_eq!(options.expiration.auction_interval.as_deref(), Some("20m"));
        assert_eq!(options.expiration.sweep_interval, Duration::from_secs(90));
        assert_eq!(options.expiration.max_concurrent_updates, 4);
    }

    #[test]
    fn test_invalid_sweep_interval_is_rejected() {
        assert!(Options::try_parse_from([
            "auction-keeper",
            "run",
            "--sweep-interval",
            "often"
        ])
        .is_err());
    }
}
