//! Registration-based binding: collect `(path, destination)` pairs, then
//! bind them all against a session in one pass.

use std::collections::HashSet;

use tracing::debug;

use crate::bind::Bind;
use crate::error::ConfigError;
use crate::session::Session;

/// An ordered set of `(path, destination)` registrations bound together by
/// [`configure_all`](Registry::configure_all).
#[derive(Default)]
pub struct Registry<'a> {
    entries: Vec<(String, &'a mut dyn Bind)>,
}

impl<'a> Registry<'a> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a destination for the sub-tree at `path`.
    pub fn register(&mut self, path: impl Into<String>, dest: &'a mut dyn Bind) -> &mut Self {
        self.entries.push((path.into(), dest));
        self
    }

    /// Bind every registration against `session`, in registration order.
    ///
    /// Duplicate paths and soft bind diagnostics accumulate across the
    /// whole pass and are reported together as [`ConfigError::Batch`];
    /// the first fatal error aborts the pass.
    pub fn configure_all(self, session: &Session) -> Result<(), ConfigError> {
        let mut diagnostics = Vec::new();
        let mut seen = HashSet::new();
        for (path, dest) in self.entries {
            if !seen.insert(path.clone()) {
                diagnostics.push(ConfigError::DuplicatePath { path });
                continue;
            }
            debug!(%path, "configuring registration");
            match session.configure(&path, dest) {
                Ok(()) => {}
                Err(ConfigError::Batch(errors)) => diagnostics.extend(errors),
                Err(err) => return Err(err),
            }
        }
        if diagnostics.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Batch(diagnostics))
        }
    }
}
