// Service exports
pub mod cache;
pub mod fixtures;
pub mod postgres;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use fixtures::{Fixture, FixtureError};
pub use postgres::{AnswerCounts, PostgresClient, PostgresError};
