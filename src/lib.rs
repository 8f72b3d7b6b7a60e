pub mod config;
pub mod driver;
pub mod error;
pub mod executor;
pub mod parser;

pub use error::ReplayError;
