use thiserror::Error;

/// Result type alias for rateport operations
pub type Result<T> = std::result::Result<T, ConverterError>;

/// Errors that can occur during rateport operations
#[derive(Error, Debug)]
pub enum ConverterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The local store could not be opened or migrated
    #[error("Failed to open local store: {0}")]
    StoreOpen(String),

    /// A transaction referenced a collection the schema does not define
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// A write was attempted inside a read-only transaction
    #[error("Cannot write to '{0}' in a read-only transaction")]
    ReadOnlyTransaction(String),

    /// A record had no usable primary key
    #[error("Record in '{collection}' has no '{key_path}' key")]
    MissingKey { collection: String, key_path: String },

    /// API error with HTTP status
    #[error("Currency API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered successfully but without the expected data
    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),

    /// JSON parsing error
    #[error("Failed to parse data: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Failed to write config file: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Amount entered before a currency pair was resolved
    #[error("Select both currencies before entering an amount")]
    InputDisabled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Environment variable error
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),
}

impl ConverterError {
    /// Create an API error from HTTP status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a store-open error from any displayable cause
    pub fn store_open(cause: impl std::fmt::Display) -> Self {
        Self::StoreOpen(cause.to_string())
    }

    /// Whether this error came from talking to the currency API
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::Http(_) | Self::UnexpectedResponse(_)
        )
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidArgument(_) | Self::Toml(_) | Self::Env(_) => 2,
            e if e.is_network() => 3,
            Self::StoreOpen(_) | Self::UnknownCollection(_) | Self::ReadOnlyTransaction(_) => 4,
            _ => 1,
        }
    }
}
