use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration field: {field}")]
    MissingConfig { field: String },

    #[error("Document store returned {status}: {message}")]
    Store { status: u16, message: String },

    #[error("Document '{id}' not found in '{collection}'")]
    NotFound { collection: String, id: String },

    #[error("File upload failed")]
    Upload,

    #[error("Sign-in failed")]
    Auth,

    #[error("No user is signed in")]
    NotAuthenticated,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Could not decode document: {message}")]
    Decode { message: String },
}

impl AdminError {
    /// Text shown to the admin as a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Upload => "Upload failed. Please try again.".to_string(),
            AdminError::Auth => "Invalid email or password.".to_string(),
            AdminError::NotAuthenticated => "Please sign in first.".to_string(),
            AdminError::NotFound { .. } => {
                "That record no longer exists. Nothing was deleted.".to_string()
            }
            AdminError::Validation { message } => message.clone(),
            AdminError::Config { .. }
            | AdminError::InvalidConfigValue { .. }
            | AdminError::MissingConfig { .. } => format!("{self}"),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
