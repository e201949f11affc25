pub mod access;
pub mod db;
pub mod schema;
pub mod scoped;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
