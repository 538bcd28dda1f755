use thiserror::Error;

/// Errors produced while loading a configuration document or binding it
/// into a destination.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("failed to read configuration: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("{path}: path not found")]
    PathNotFound { path: String },

    #[error("{path}: field {field} not present in target record")]
    FieldNotFound { path: String, field: String },

    #[error("{path}: target type {expected} != conf type {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{path}: map key is not a string")]
    NonStringKey { path: String },

    #[error("{path}: conf type {kind} not handled")]
    UnsupportedType { path: String, kind: String },

    #[error("failed to resolve hostname: {0}")]
    HostnameResolution(String),

    #[error("{path}: path already registered")]
    DuplicatePath { path: String },

    #[error("{} configuration error(s)", .0.len())]
    Batch(Vec<ConfigError>),
}

impl ConfigError {
    /// Whether the error is skippable under the lenient strictness policy.
    ///
    /// Structural and type errors are always fatal; only missing record
    /// fields, non-string mapping keys, and duplicate registrations are
    /// soft.
    pub const fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::FieldNotFound { .. } | Self::NonStringKey { .. } | Self::DuplicatePath { .. }
        )
    }
}
