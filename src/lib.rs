pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;
pub use config::AdminConfig;

pub use adapters::{
    cloudinary::CloudinaryUploader, firebase_auth::FirebaseAuth, firestore::FirestoreStore,
    memory::MemoryStore,
};
pub use crate::core::{
    content::ContentService,
    fetch::{CollectionAdapter, FetchState},
    session::{SessionHandle, SessionManager},
};
pub use domain::media::{ResourceType, UploadFile, UploadResult};
pub use domain::records::{
    BlogDraft, BlogPost, Entity, Highlight, HighlightCategory, HighlightDraft, Message,
    StudyMaterial,
};
pub use utils::error::{AdminError, Result};
