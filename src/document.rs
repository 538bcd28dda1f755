//! Dynamic document tree produced from parsed YAML.
//!
//! The binder never touches `serde_yaml` types directly; parsing produces a
//! [`Node`] tree up front and everything downstream (filtering, path
//! resolution, binding) works on that.

use crate::error::ConfigError;

/// A scalar leaf of the document tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Kind name used in mismatch diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }
}

/// A node of the dynamic configuration tree: exactly one of a mapping, a
/// sequence, or a scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Key/value pairs. Keys are arbitrary nodes so that non-string keys
    /// survive parsing and can be diagnosed at bind time; entry order is
    /// preserved for iteration but carries no meaning.
    Mapping(Vec<(Node, Node)>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

impl Node {
    /// Parse a YAML document into a tree.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        Self::from_yaml(value)
    }

    /// Convert a parsed YAML value into the document model.
    ///
    /// YAML tagged values have no counterpart in the model and are
    /// rejected, as are integers outside the `i64` range.
    pub fn from_yaml(value: serde_yaml::Value) -> Result<Self, ConfigError> {
        Self::from_yaml_at(value, "")
    }

    fn from_yaml_at(value: serde_yaml::Value, path: &str) -> Result<Self, ConfigError> {
        use serde_yaml::Value;

        Ok(match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Scalar(Scalar::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Self::Scalar(Scalar::Float(f))
                } else {
                    return Err(ConfigError::UnsupportedType {
                        path: path.to_string(),
                        kind: format!("number {n}"),
                    });
                }
            }
            Value::String(s) => Self::Scalar(Scalar::Str(s)),
            Value::Sequence(items) => {
                let mut nodes = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    nodes.push(Self::from_yaml_at(item, &format!("{path}.{index}"))?);
                }
                Self::Sequence(nodes)
            }
            Value::Mapping(mapping) => {
                let mut pairs = Vec::with_capacity(mapping.len());
                for (key, value) in mapping {
                    let key = Self::from_yaml_at(key, path)?;
                    let value = Self::from_yaml_at(value, path)?;
                    pairs.push((key, value));
                }
                Self::Mapping(pairs)
            }
            Value::Tagged(tagged) => {
                return Err(ConfigError::UnsupportedType {
                    path: path.to_string(),
                    kind: format!("tagged value {}", tagged.tag),
                });
            }
        })
    }

    /// Kind name used in mismatch diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Mapping(_) => "mapping",
            Self::Sequence(_) => "sequence",
            Self::Scalar(s) => s.kind(),
        }
    }

    /// Look up a string key in a mapping node. Returns `None` for
    /// non-mapping nodes and for keys that are absent or not strings.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Mapping(pairs) => pairs.iter().find_map(|(k, v)| match k {
                Self::Scalar(Scalar::Str(s)) if s == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }

    pub(crate) const fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        let node = Node::parse("a: 1\nb: 2.5\nc: true\nd: text\ne: ~").unwrap();
        assert_eq!(node.get("a"), Some(&Node::Scalar(Scalar::Int(1))));
        assert_eq!(node.get("b"), Some(&Node::Scalar(Scalar::Float(2.5))));
        assert_eq!(node.get("c"), Some(&Node::Scalar(Scalar::Bool(true))));
        assert_eq!(
            node.get("d"),
            Some(&Node::Scalar(Scalar::Str("text".to_string())))
        );
        assert_eq!(node.get("e"), Some(&Node::Scalar(Scalar::Null)));
    }

    #[test]
    fn test_parse_nested_containers() {
        let node = Node::parse("outer:\n  items:\n    - 1\n    - 2\n").unwrap();
        let items = node.get("outer").and_then(|n| n.get("items")).unwrap();
        assert_eq!(
            items,
            &Node::Sequence(vec![
                Node::Scalar(Scalar::Int(1)),
                Node::Scalar(Scalar::Int(2)),
            ])
        );
    }

    #[test]
    fn test_non_string_keys_survive_parsing() {
        let node = Node::parse("1: one\ntwo: 2\n").unwrap();
        let Node::Mapping(pairs) = &node else {
            panic!("expected mapping");
        };
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, Node::Scalar(Scalar::Int(1)));
        assert_eq!(node.get("two"), Some(&Node::Scalar(Scalar::Int(2))));
        assert_eq!(node.get("1"), None, "integer key is not a string key");
    }

    #[test]
    fn test_empty_document_is_null() {
        let node = Node::parse("").unwrap();
        assert!(node.is_null());
    }

    #[test]
    fn test_tagged_value_is_unsupported() {
        let err = Node::parse("a: !custom 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedType { .. }));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Node::parse("- 1").unwrap().kind(), "sequence");
        assert_eq!(Node::parse("a: 1").unwrap().kind(), "mapping");
        assert_eq!(Scalar::Int(3).kind(), "integer");
        assert_eq!(Scalar::Str(String::new()).kind(), "string");
    }
}
