pub mod connection;
pub mod reports;
pub mod schema;
pub mod seed;

pub use connection::Database;
