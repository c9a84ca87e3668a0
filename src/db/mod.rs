pub mod mongo;
pub mod query;

pub use mongo::{DbError, DbResult, MongoRepository};
pub use query::QueryError;
