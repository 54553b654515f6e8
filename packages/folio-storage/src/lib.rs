pub mod audit;
pub mod db;
pub mod listing;
pub mod models;
pub mod profile;
pub mod records;
pub mod schema;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
