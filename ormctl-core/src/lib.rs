//! Shared building blocks for the ormctl services: records and their
//! validation, the row mapping used by both storage backends, and the
//! chunk producers behind the streaming endpoint.

pub mod error;
pub mod mapping;
pub mod models;
pub mod patch;
pub mod stream;

pub use error::MappingError;
pub use mapping::{fold_request_rows, Assignments, ItemRow, RequestTrainingRow, SqlValue};
pub use models::ValidationError;
pub use patch::Patch;
pub use stream::{BlockingFeed, FeedSettings, StreamKind};

#[cfg(feature = "rt")]
pub use stream::async_feed;
