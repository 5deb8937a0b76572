use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Odoo fault {code}: {message}")]
    Fault { code: String, message: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Authentication failed for user {0}")]
    AuthenticationFailed(String),

    #[error("Unable to create {model} in Odoo")]
    CreateFailed { model: String },

    #[error("Multiple {model} records found for {field} = {value}")]
    MultipleResults {
        model: String,
        field: String,
        value: String,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Failures caused by Odoo or the network rather than by the request.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            StoreError::Transport(_)
                | StoreError::Xml(_)
                | StoreError::Fault { .. }
                | StoreError::Protocol(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
