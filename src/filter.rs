//! Identity-tag filtering of the document tree.
//!
//! Mapping keys of the form `name[tag]` declare per-identity alternatives:
//! the entry is kept under `name` when `tag` equals the session identity
//! and dropped otherwise. Keys without a bracket suffix always pass. An
//! unset identity behaves as the tag `""`.

use crate::document::{Node, Scalar};

/// Split a bracketed key into `(name, tag)`, where `tag` is the content
/// between the last `[` and a trailing `]`.
fn split_bracketed(key: &str) -> Option<(&str, &str)> {
    let stripped = key.strip_suffix(']')?;
    let open = stripped.rfind('[')?;
    Some((&stripped[..open], &stripped[open + 1..]))
}

/// Produce a copy of `node` with every identity-tagged mapping entry
/// resolved against `identity`.
///
/// Filtering recurses through mappings and sequences; scalars pass through
/// unchanged. Once applied the bracket suffixes are gone, so reapplying is
/// a no-op.
pub fn filter_identities(node: &Node, identity: &str) -> Node {
    match node {
        Node::Mapping(pairs) => {
            let mut filtered = Vec::with_capacity(pairs.len());
            for (key, value) in pairs {
                if let Node::Scalar(Scalar::Str(k)) = key {
                    match split_bracketed(k) {
                        Some((name, tag)) if tag == identity => {
                            filtered.push((
                                Node::Scalar(Scalar::Str(name.to_string())),
                                filter_identities(value, identity),
                            ));
                        }
                        // alternative for another identity
                        Some(_) => {}
                        None => {
                            filtered.push((key.clone(), filter_identities(value, identity)));
                        }
                    }
                } else {
                    filtered.push((key.clone(), filter_identities(value, identity)));
                }
            }
            Node::Mapping(filtered)
        }
        Node::Sequence(items) => Node::Sequence(
            items
                .iter()
                .map(|item| filter_identities(item, identity))
                .collect(),
        ),
        Node::Scalar(_) => node.clone(),
    }
}
