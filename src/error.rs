// Small error types; each variant says where things went wrong.
use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),                  // JSON did not deserialize
    Invalid(&'static str, f64),     // field name, offending value
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(s) => write!(f, "Config parse error: {s}"),
            ConfigError::Invalid(field, v) => {
                write!(f, "Config error: `{field}` must be positive and finite, got {v}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    NoContext,           // canvas returned no 2d context
    Js(String),          // browser threw while acquiring the context
}

impl Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::NoContext => write!(f, "Surface error: 2d context unavailable"),
            SurfaceError::Js(s) => write!(f, "Surface error: {s}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Why the browser engine could not be mounted on a canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum MountError {
    Config(ConfigError),
    Surface(SurfaceError),
}

impl Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::Config(e) => write!(f, "Mount failed: {e}"),
            MountError::Surface(e) => write!(f, "Mount failed: {e}"),
        }
    }
}

impl std::error::Error for MountError {}

impl From<ConfigError> for MountError {
    fn from(e: ConfigError) -> Self {
        MountError::Config(e)
    }
}

impl From<SurfaceError> for MountError {
    fn from(e: SurfaceError) -> Self {
        MountError::Surface(e)
    }
}
