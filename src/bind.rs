//! Type-directed recursive binding of document nodes into destinations.
//!
//! The binder dispatches on the destination shape: records (via the
//! [`record!`](crate::record) macro), `Option`/`Box` indirection,
//! primitives, the [`Scalar`] any-slot, vectors, and string-keyed maps.
//! Structural and type errors abort the walk; missing record fields and
//! non-string mapping keys are soft diagnostics handled per
//! [`Strictness`].

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::document::{Node, Scalar};
use crate::error::ConfigError;
use crate::subst;

/// How soft diagnostics (missing fields, non-string mapping keys) are
/// handled during a bind walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Log the diagnostic and keep binding.
    #[default]
    Lenient,
    /// Fail the bind on the first diagnostic.
    Strict,
    /// Complete the walk, then report every diagnostic at once as
    /// [`ConfigError::Batch`].
    Batch,
}

/// Options governing a bind walk.
#[derive(Debug, Clone)]
pub struct BindOptions {
    /// Soft-diagnostic policy.
    pub strictness: Strictness,

    /// File whose trimmed contents replace `$public_hostname` in string
    /// values.
    pub public_hostname_file: PathBuf,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            public_hostname_file: PathBuf::from(subst::DEFAULT_PUBLIC_HOSTNAME_FILE),
        }
    }
}

/// Per-walk state threaded through the recursion.
pub struct BindContext<'a> {
    options: &'a BindOptions,
    diagnostics: Vec<ConfigError>,
}

impl<'a> BindContext<'a> {
    pub(crate) fn new(options: &'a BindOptions) -> Self {
        Self {
            options,
            diagnostics: Vec::new(),
        }
    }

    /// Record a soft diagnostic according to the configured strictness.
    fn soft(&mut self, err: ConfigError) -> Result<(), ConfigError> {
        match self.options.strictness {
            Strictness::Lenient => {
                warn!(%err, "skipping");
                Ok(())
            }
            Strictness::Strict => Err(err),
            Strictness::Batch => {
                self.diagnostics.push(err);
                Ok(())
            }
        }
    }

    /// Surface accumulated diagnostics after a completed walk.
    pub(crate) fn finish(self) -> Result<(), ConfigError> {
        if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Batch(self.diagnostics))
        }
    }
}

/// A typed destination the binder can populate from a document node.
///
/// Implementations exist for primitives, `String`, [`Scalar`] (the
/// any-slot), `Option<T>`, `Box<T>`, `Vec<T>`, and string-keyed maps;
/// record types get theirs from the [`record!`](crate::record) macro.
pub trait Bind {
    /// Assign the content of `node` into `self`. An absent node is a no-op.
    fn bind(
        &mut self,
        path: &str,
        node: Option<&Node>,
        cx: &mut BindContext<'_>,
    ) -> Result<(), ConfigError>;
}

/// A struct-like destination with a static registry of named fields.
///
/// Implemented by the [`record!`](crate::record) macro. Field names are the
/// declared Rust identifiers; lookup compares their normalized form against
/// the normalized document key.
pub trait Record {
    /// The field registry: declared name plus a mutable handle, per field.
    fn fields_mut(&mut self) -> Vec<(&'static str, &mut dyn Bind)>;
}

/// Normalize a key to the record field-naming convention: split on `_`,
/// title-case each part, concatenate.
///
/// `max_retry_count` becomes `MaxRetryCount`, `id` becomes `Id`. The same
/// normalization is applied to document keys and to declared field names,
/// so either spelling matches.
pub fn normalize_key(key: &str) -> String {
    let mut normalized = String::with_capacity(key.len());
    for part in key.split('_') {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            normalized.extend(first.to_uppercase());
            normalized.extend(chars);
        }
    }
    normalized
}

fn join_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

/// Bind a mapping node into a record destination.
///
/// Called by [`record!`](crate::record)-generated `Bind` impls; rarely
/// useful directly.
pub fn bind_record<R: Record + ?Sized>(
    record: &mut R,
    path: &str,
    node: Option<&Node>,
    cx: &mut BindContext<'_>,
) -> Result<(), ConfigError> {
    let Some(node) = node else {
        return Ok(());
    };
    if node.is_null() {
        return Ok(());
    }
    let Node::Mapping(pairs) = node else {
        return Err(ConfigError::TypeMismatch {
            path: path.to_string(),
            expected: "mapping",
            found: node.kind(),
        });
    };

    for (key, value) in pairs {
        let Node::Scalar(Scalar::Str(key)) = key else {
            cx.soft(ConfigError::NonStringKey {
                path: path.to_string(),
            })?;
            continue;
        };
        let normalized = normalize_key(key);
        let child_path = join_path(path, key);
        let mut fields = record.fields_mut();
        match fields
            .iter_mut()
            .find(|(name, _)| normalize_key(name) == normalized)
        {
            Some((_, field)) => {
                debug!(path = %child_path, "binding field");
                field.bind(&child_path, Some(value), cx)?;
            }
            None => {
                cx.soft(ConfigError::FieldNotFound {
                    path: path.to_string(),
                    field: key.clone(),
                })?;
            }
        }
    }
    Ok(())
}

fn expect_scalar<'n>(
    path: &str,
    node: &'n Node,
    expected: &'static str,
) -> Result<&'n Scalar, ConfigError> {
    match node {
        Node::Scalar(scalar) => Ok(scalar),
        other => Err(ConfigError::TypeMismatch {
            path: path.to_string(),
            expected,
            found: other.kind(),
        }),
    }
}

macro_rules! bind_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl Bind for $ty {
            fn bind(
                &mut self,
                path: &str,
                node: Option<&Node>,
                _cx: &mut BindContext<'_>,
            ) -> Result<(), ConfigError> {
                let Some(node) = node else {
                    return Ok(());
                };
                let scalar = expect_scalar(path, node, stringify!($ty))?;
                let Scalar::Int(value) = scalar else {
                    return Err(ConfigError::TypeMismatch {
                        path: path.to_string(),
                        expected: stringify!($ty),
                        found: scalar.kind(),
                    });
                };
                // out-of-range literals are a kind mismatch for the target
                *self = <$ty>::try_from(*value).map_err(|_| ConfigError::TypeMismatch {
                    path: path.to_string(),
                    expected: stringify!($ty),
                    found: "integer",
                })?;
                Ok(())
            }
        }
    )*};
}

bind_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

macro_rules! bind_float {
    ($($ty:ty),* $(,)?) => {$(
        impl Bind for $ty {
            fn bind(
                &mut self,
                path: &str,
                node: Option<&Node>,
                _cx: &mut BindContext<'_>,
            ) -> Result<(), ConfigError> {
                let Some(node) = node else {
                    return Ok(());
                };
                let scalar = expect_scalar(path, node, stringify!($ty))?;
                let Scalar::Float(value) = scalar else {
                    return Err(ConfigError::TypeMismatch {
                        path: path.to_string(),
                        expected: stringify!($ty),
                        found: scalar.kind(),
                    });
                };
                #[allow(clippy::cast_possible_truncation)]
                {
                    *self = *value as $ty;
                }
                Ok(())
            }
        }
    )*};
}

bind_float!(f32, f64);

impl Bind for bool {
    fn bind(
        &mut self,
        path: &str,
        node: Option<&Node>,
        _cx: &mut BindContext<'_>,
    ) -> Result<(), ConfigError> {
        let Some(node) = node else {
            return Ok(());
        };
        let scalar = expect_scalar(path, node, "bool")?;
        let Scalar::Bool(value) = scalar else {
            return Err(ConfigError::TypeMismatch {
                path: path.to_string(),
                expected: "bool",
                found: scalar.kind(),
            });
        };
        *self = *value;
        Ok(())
    }
}

impl Bind for String {
    fn bind(
        &mut self,
        path: &str,
        node: Option<&Node>,
        cx: &mut BindContext<'_>,
    ) -> Result<(), ConfigError> {
        let Some(node) = node else {
            return Ok(());
        };
        let scalar = expect_scalar(path, node, "string")?;
        let Scalar::Str(value) = scalar else {
            return Err(ConfigError::TypeMismatch {
                path: path.to_string(),
                expected: "string",
                found: scalar.kind(),
            });
        };
        *self = subst::substitute_value(value, &cx.options.public_hostname_file);
        Ok(())
    }
}

/// The any-slot: accepts any scalar as-is, no further recursion.
impl Bind for Scalar {
    fn bind(
        &mut self,
        path: &str,
        node: Option<&Node>,
        _cx: &mut BindContext<'_>,
    ) -> Result<(), ConfigError> {
        let Some(node) = node else {
            return Ok(());
        };
        *self = expect_scalar(path, node, "scalar")?.clone();
        Ok(())
    }
}

impl<T: Bind + Default> Bind for Option<T> {
    fn bind(
        &mut self,
        path: &str,
        node: Option<&Node>,
        cx: &mut BindContext<'_>,
    ) -> Result<(), ConfigError> {
        let Some(node) = node else {
            return Ok(());
        };
        // a null node leaves the slot unallocated
        if node.is_null() {
            return Ok(());
        }
        self.get_or_insert_with(T::default)
            .bind(path, Some(node), cx)
    }
}

impl<T: Bind> Bind for Box<T> {
    fn bind(
        &mut self,
        path: &str,
        node: Option<&Node>,
        cx: &mut BindContext<'_>,
    ) -> Result<(), ConfigError> {
        (**self).bind(path, node, cx)
    }
}

impl<T: Bind + Default> Bind for Vec<T> {
    fn bind(
        &mut self,
        path: &str,
        node: Option<&Node>,
        cx: &mut BindContext<'_>,
    ) -> Result<(), ConfigError> {
        let Some(node) = node else {
            return Ok(());
        };
        self.clear();
        if node.is_null() {
            return Ok(());
        }
        let Node::Sequence(items) = node else {
            return Err(ConfigError::TypeMismatch {
                path: path.to_string(),
                expected: "sequence",
                found: node.kind(),
            });
        };
        for (index, item) in items.iter().enumerate() {
            let child_path = join_path(path, &index.to_string());
            let mut element = T::default();
            element.bind(&child_path, Some(item), cx)?;
            self.push(element);
        }
        Ok(())
    }
}

macro_rules! bind_string_map {
    ($($map:ident),* $(,)?) => {$(
        impl<T: Bind + Default> Bind for $map<String, T> {
            fn bind(
                &mut self,
                path: &str,
                node: Option<&Node>,
                cx: &mut BindContext<'_>,
            ) -> Result<(), ConfigError> {
                let Some(node) = node else {
                    return Ok(());
                };
                self.clear();
                if node.is_null() {
                    return Ok(());
                }
                let Node::Mapping(pairs) = node else {
                    return Err(ConfigError::TypeMismatch {
                        path: path.to_string(),
                        expected: "mapping",
                        found: node.kind(),
                    });
                };
                for (key, value) in pairs {
                    let Node::Scalar(Scalar::Str(key)) = key else {
                        cx.soft(ConfigError::NonStringKey {
                            path: path.to_string(),
                        })?;
                        continue;
                    };
                    let key = subst::substitute_key(key)?;
                    let child_path = join_path(path, &key);
                    let mut entry = T::default();
                    entry.bind(&child_path, Some(value), cx)?;
                    self.insert(key, entry);
                }
                Ok(())
            }
        }
    )*};
}

bind_string_map!(HashMap, BTreeMap);

/// Define a struct whose fields the binder can populate.
///
/// Expands to the struct as written plus [`Record`] and [`Bind`]
/// implementations backed by a static field registry:
///
/// ```
/// confit::record! {
///     #[derive(Debug, Default)]
///     pub struct Endpoint {
///         pub host: String,
///         pub max_retry_count: i64,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident: $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            fn fields_mut(
                &mut self,
            ) -> ::std::vec::Vec<(&'static str, &mut dyn $crate::Bind)> {
                ::std::vec![
                    $((
                        ::core::stringify!($field),
                        &mut self.$field as &mut dyn $crate::Bind,
                    ),)*
                ]
            }
        }

        impl $crate::Bind for $name {
            fn bind(
                &mut self,
                path: &str,
                node: ::std::option::Option<&$crate::Node>,
                cx: &mut $crate::BindContext<'_>,
            ) -> ::std::result::Result<(), $crate::ConfigError> {
                $crate::bind_record(self, path, node, cx)
            }
        }
    };
}
