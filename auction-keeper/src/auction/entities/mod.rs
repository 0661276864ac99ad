mod auction;
mod error;
mod expiration;
mod filter;

pub use {
    auction::*,
    error::*,
    expiration::*,
    filter::*,
};
