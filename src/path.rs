//! Dotted-path resolution into the document tree.

use crate::document::Node;
use crate::error::ConfigError;

/// Resolve a dot-separated `path` against `root`, left to right.
///
/// An empty path yields the root. A segment whose key is absent yields
/// `Ok(None)` so the caller can skip binding; descending into a
/// non-mapping node is a [`ConfigError::PathNotFound`].
///
/// Identity filtering must already have been applied to `root`, otherwise
/// bracketed keys will not match their unbracketed segments.
pub fn resolve<'a>(root: &'a Node, path: &str) -> Result<Option<&'a Node>, ConfigError> {
    if path.is_empty() {
        return Ok(Some(root));
    }
    let mut current = root;
    for segment in path.split('.') {
        if !matches!(current, Node::Mapping(_)) {
            return Err(ConfigError::PathNotFound {
                path: path.to_string(),
            });
        }
        match current.get(segment) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}
