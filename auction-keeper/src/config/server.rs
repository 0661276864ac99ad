use {
    clap::Args,
    std::net::SocketAddr,
};

const DEFAULT_METRICS_ADDR: &str = "127.0.0.1:9001";

#[derive(Args, Clone, Debug)]
#[command(next_help_heading = "Server Options")]
#[group(id = "Server")]
pub struct Options {
    /// database url for persistent storage. Auctions are kept in memory when it is not set.
    #[arg(long = "database-url")]
    #[arg(env = "DATABASE_URL")]
    pub database_url: Option<String>,
    /// Address and port the metrics will bind to.
    #[arg(long = "metrics-addr")]
    #[arg(default_value = DEFAULT_METRICS_ADDR)]
    #[arg(env = "METRICS_ADDR")]
    pub metrics_addr: SocketAddr,
}
