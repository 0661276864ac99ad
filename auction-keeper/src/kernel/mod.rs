pub mod context;
pub mod db;
