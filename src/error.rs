use thiserror::Error;

#[derive(Error, Debug)]
pub enum RgpError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The caller asked for something the client never supports, such as a
    /// non-GET method or an empty path.
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{}", transport_message(.status, .reason, .message))]
    Transport {
        status: u16,
        reason: Option<&'static str>,
        message: Option<String>,
    },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Writing a result out as JSON failed.
    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// HTTP succeeded but the envelope reported a failure.
    #[error("{status} - {message}")]
    Api { status: String, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl RgpError {
    /// Builds a transport error for a non-2xx status, looking up the
    /// standard reason phrase for the code.
    pub fn transport(status: u16, message: Option<String>) -> Self {
        let reason = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason());

        RgpError::Transport {
            status,
            reason,
            message: message.filter(|m| !m.is_empty()),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            RgpError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn transport_message(status: &u16, reason: &Option<&'static str>, message: &Option<String>) -> String {
    let mut out = match reason {
        Some(reason) => format!("{} - {}", status, reason),
        None => status.to_string(),
    };
    if let Some(message) = message {
        out.push_str(" - ");
        out.push_str(message);
    }
    out
}

pub type Result<T> = std::result::Result<T, RgpError>;
