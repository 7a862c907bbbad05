//! Reviver pass.
//!
//! After a successful parse the value tree can be handed to a callback that
//! sees every member bottom-up: children before their container, and the
//! root last under the empty key. The callback either keeps a (possibly
//! replaced) value or removes the member from its container.

use crate::value::{Map, Value};
use std::fmt;

/// The position of a value inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    /// Object member name. The root is passed as `Name("")`.
    Name(&'a str),
    /// Array element index, as it was in the parsed array.
    Index(usize),
}

impl Key<'_> {
    /// The member name, if this key is one.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }

    /// The array index, if this key is one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Name(_) => None,
            Key::Index(i) => Some(*i),
        }
    }

    /// Returns `true` for the synthetic root key. An object member named
    /// with the empty string looks the same.
    pub fn is_root(&self) -> bool {
        matches!(self, Key::Name(""))
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Index(i) => write!(f, "{}", i),
        }
    }
}

/// What a reviver decided for one member.
#[derive(Debug, Clone, PartialEq)]
pub enum Revived {
    /// Keep the member with this value.
    Keep(Value),
    /// Delete the member from its container.
    Remove,
}

impl From<Value> for Revived {
    fn from(value: Value) -> Self {
        Revived::Keep(value)
    }
}

/// Run `reviver` over `root` bottom-up. Returns `None` when the reviver
/// removes the root itself.
pub fn revive<F>(root: Value, mut reviver: F) -> Option<Value>
where
    F: FnMut(Key<'_>, Value) -> Revived,
{
    tracing::trace!("running reviver pass");
    match walk(Key::Name(""), root, &mut reviver) {
        Revived::Keep(value) => Some(value),
        Revived::Remove => None,
    }
}

fn walk<F>(key: Key<'_>, value: Value, reviver: &mut F) -> Revived
where
    F: FnMut(Key<'_>, Value) -> Revived,
{
    let value = match value {
        Value::Array(items) => {
            let mut kept = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                if let Revived::Keep(v) = walk(Key::Index(i), item, reviver) {
                    kept.push(v);
                }
            }
            Value::Array(kept)
        }
        Value::Object(members) => {
            let mut kept = Map::with_capacity(members.len());
            for (name, member) in members {
                if let Revived::Keep(v) = walk(Key::Name(name.as_str()), member, reviver) {
                    kept.insert(name, v);
                }
            }
            Value::Object(kept)
        }
        leaf => leaf,
    };
    reviver(key, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        [
            ("a", Value::from(1)),
            (
                "b",
                [("c", Value::from(2)), ("d", Value::from(vec![Value::from(3)]))]
                    .into_iter()
                    .collect(),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_identity_keeps_tree() {
        let revived = revive(sample(), |_, v| Revived::Keep(v));
        assert_eq!(revived, Some(sample()));
    }

    #[test]
    fn test_visit_order_is_bottom_up() {
        let mut seen = Vec::new();
        revive(sample(), |k, v| {
            seen.push(k.to_string());
            v.into()
        });
        assert_eq!(seen, ["a", "c", "0", "d", "b", ""]);
    }

    #[test]
    fn test_remove_member() {
        let revived = revive(sample(), |k, v| {
            if k == Key::Name("c") {
                Revived::Remove
            } else {
                Revived::Keep(v)
            }
        })
        .unwrap();
        let b = revived.get("b").unwrap();
        assert!(b.get("c").is_none());
        assert!(b.get("d").is_some());
        assert_eq!(revived.get("a"), Some(&Value::from(1)));
    }

    #[test]
    fn test_remove_array_elements_shifts_rest() {
        let items = Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]);
        let mut indexes = Vec::new();
        let revived = revive(items, |k, v| {
            if let Some(i) = k.as_index() {
                indexes.push(i);
                if i == 1 {
                    return Revived::Remove;
                }
            }
            Revived::Keep(v)
        });
        assert_eq!(indexes, [0, 1, 2]);
        assert_eq!(
            revived,
            Some(Value::from(vec![Value::from(1), Value::from(3)]))
        );
    }

    #[test]
    fn test_replace_sees_revived_children() {
        // Numbers are doubled, then the container sees the doubled values.
        let revived = revive(sample(), |k, v| {
            if let Value::Number(n) = v {
                return Revived::Keep(Value::Number(n * 2.0));
            }
            if k.as_name() == Some("b") {
                assert_eq!(v.get("c"), Some(&Value::from(4)));
            }
            Revived::Keep(v)
        })
        .unwrap();
        assert_eq!(revived.get("a"), Some(&Value::from(2)));
    }

    #[test]
    fn test_remove_root() {
        assert_eq!(
            revive(sample(), |k, v| if k.is_root() {
                Revived::Remove
            } else {
                Revived::Keep(v)
            }),
            None
        );
    }

    #[test]
    fn test_leaf_root_is_visited_once() {
        let mut calls = 0;
        let revived = revive(Value::from("x"), |k, v| {
            calls += 1;
            assert!(k.is_root());
            Revived::Keep(v)
        });
        assert_eq!(calls, 1);
        assert_eq!(revived, Some(Value::from("x")));
    }
}
