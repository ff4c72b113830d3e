use std::fmt;

/// A request that did not produce a readable answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Network(String),
    Timeout { after_ms: u32 },
    Status(u16),
    Decode(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(e) => write!(f, "fetch error: {e}"),
            TransportError::Timeout { after_ms } => write!(f, "timed out after {after_ms}ms"),
            TransportError::Status(code) => write!(f, "HTTP {code}"),
            TransportError::Decode(e) => write!(f, "parse error: {e}"),
        }
    }
}

impl std::error::Error for TransportError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleError {
    /// Server processed the request and answered with a non-"ok" status.
    Rejected { status: String },
    Transport(TransportError),
}

impl fmt::Display for ToggleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleError::Rejected { status } => write!(f, "favorite rejected (status {status:?})"),
            ToggleError::Transport(e) => write!(f, "favorite request failed: {e}"),
        }
    }
}

impl std::error::Error for ToggleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToggleError::Transport(e) => Some(e),
            ToggleError::Rejected { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    MissingTarget,
    Rejected { message: Option<String> },
    Transport(TransportError),
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::MissingTarget => f.write_str("review form has no target id"),
            ReviewError::Rejected { message: Some(m) } => write!(f, "review rejected: {m}"),
            ReviewError::Rejected { message: None } => f.write_str("review rejected"),
            ReviewError::Transport(e) => write!(f, "review request failed: {e}"),
        }
    }
}

impl std::error::Error for ReviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReviewError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    SurfaceMissing(String),
    Backend(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::SurfaceMissing(id) => write!(f, "map surface #{id} not found"),
            MapError::Backend(e) => write!(f, "map library error: {e}"),
        }
    }
}

impl std::error::Error for MapError {}

/// Required page structure is missing. Raised at construction, never caught here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingModal,
    MissingForm,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingModal => f.write_str("review modal element is required"),
            ConfigError::MissingForm => f.write_str("review form element is required"),
        }
    }
}

impl std::error::Error for ConfigError {}
