pub mod content;
pub mod fetch;
pub mod session;

pub use crate::domain::model::{Collection, Document, FieldValue, Fields, RecordDate};
pub use crate::domain::ports::{AuthService, DocumentStore, MediaUploader};
pub use crate::utils::error::Result;
