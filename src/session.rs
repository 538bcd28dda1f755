//! Explicit configuration session: loaded document, identity tag, and bind
//! options.
//!
//! A [`Session`] replaces the process-wide loaded-document and identity
//! globals of classic config binders. The document is immutable after
//! load; identity filtering produces a fresh tree per `configure` call, so
//! a shared `&Session` is safe to use from multiple threads.

use std::path::Path;

use tracing::debug;

use crate::bind::{Bind, BindContext, BindOptions};
use crate::document::Node;
use crate::error::ConfigError;
use crate::filter::filter_identities;
use crate::path::resolve;

/// Environment variable naming the configuration file for
/// [`Session::from_env`].
pub const CONFIG_ENV: &str = "CONFIT_CONFIG";

/// Environment variable naming the identity tag for [`Session::from_env`].
pub const IDENTITY_ENV: &str = "CONFIT_IDENTITY";

/// A loaded configuration document plus the identity tag and bind options
/// applied to every [`configure`](Session::configure) call.
#[derive(Debug, Clone)]
pub struct Session {
    root: Node,
    identity: String,
    options: BindOptions,
}

impl Session {
    fn new(root: Node) -> Self {
        // an empty document behaves as an empty mapping: every path
        // resolves to nothing instead of failing
        let root = if root.is_null() {
            Node::Mapping(Vec::new())
        } else {
            root
        };
        Self {
            root,
            identity: String::new(),
            options: BindOptions::default(),
        }
    }

    /// Parse a YAML document into a session with an empty identity tag.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(Node::parse(yaml)?))
    }

    /// Load and parse the YAML document at `file`.
    pub fn from_file(file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = file.as_ref();
        if !file.exists() {
            return Err(ConfigError::FileNotFound(file.display().to_string()));
        }
        let contents = std::fs::read_to_string(file)?;
        Self::from_yaml(&contents)
    }

    /// Build a session from the environment: the configuration file named
    /// by `CONFIT_CONFIG` (required) and the identity tag from
    /// `CONFIT_IDENTITY` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        let file =
            std::env::var(CONFIG_ENV).map_err(|_| ConfigError::MissingEnv(CONFIG_ENV))?;
        let mut session = Self::from_file(&file)?;
        if let Ok(identity) = std::env::var(IDENTITY_ENV) {
            session.identity = identity;
        }
        Ok(session)
    }

    /// Set the identity tag used to resolve `key[identity]` alternatives.
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    /// Replace the bind options applied to every `configure` call.
    #[must_use]
    pub fn with_options(mut self, options: BindOptions) -> Self {
        self.options = options;
        self
    }

    /// The identity tag in effect.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Bind the sub-tree at `path` into `dest`.
    ///
    /// A path that resolves to nothing leaves `dest` untouched and
    /// succeeds. Structural and type errors abort the bind; `dest` may be
    /// partially populated up to the failure point.
    pub fn configure(&self, path: &str, dest: &mut dyn Bind) -> Result<(), ConfigError> {
        let filtered = filter_identities(&self.root, &self.identity);
        let Some(node) = resolve(&filtered, path)? else {
            debug!(path, "no configuration sub-tree, skipping");
            return Ok(());
        };
        let mut cx = BindContext::new(&self.options);
        dest.bind(path, Some(node), &mut cx)?;
        cx.finish()
    }
}

/// Load a fresh document from `file` and bind the sub-tree at `path` into
/// `dest`. Load failures are returned, never aborted on.
pub fn configure_from_file(
    file: impl AsRef<Path>,
    path: &str,
    dest: &mut dyn Bind,
) -> Result<(), ConfigError> {
    Session::from_file(file)?.configure(path, dest)
}
