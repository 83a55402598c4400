//! Domain records with validation at construction
//!
//! Payload structs (`Create*`, `*Patch`, `ItemReplace`) mirror the JSON the
//! API accepts. Calling `validate()` turns them into the typed values the
//! repositories take (`New*`, `*Changes`). Invalid input returns
//! ValidationError, not panic.

pub mod item;
pub mod name;
pub mod request;
pub mod search;
pub mod training;
pub mod user;
pub mod validation;

pub use item::{CreateItem, Item, ItemChanges, ItemPatch, ItemReplace, NewItem};
pub use name::Name;
pub use request::{
    CreateRequest, NewRequest, Request, RequestChanges, RequestPatch, RequestSummary,
    RequestWithTrainings,
};
pub use training::{
    CreateTraining, NewTraining, Training, TrainingChanges, TrainingPatch, TrainingSummary,
};
pub use search::{FilterType, SearchParams, SearchTerms};
pub use user::{parse_website, Email, ResponseFormat, SubmitForm, User, Username};
pub use validation::ValidationError;
