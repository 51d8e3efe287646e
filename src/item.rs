//! Items and identity keys.
//!
//! An [`Item`] is an opaque record mapping field names to JSON values. Items
//! are cheap handles: cloning one shares the underlying record, so the
//! loader, the grouping pass and the selection all point at the same data
//! instead of copying it.
//!
//! Identity is resolved through a [`KeyExpr`], either a field lookup or an
//! arbitrary function. When neither yields a value the record's own identity
//! is used, so two clones of the same item compare equal while two distinct
//! records with identical content do not.
//!
//! # Examples
//!
//! ```rust
//! use bubbletea_lazylist::item::{Item, ItemKey, KeyExpr};
//! use serde_json::json;
//!
//! let item = Item::from(json!({ "id": 7, "name": "Ada" }));
//! assert_eq!(KeyExpr::default().key_of(&item), ItemKey::Int(7));
//!
//! let by_name = KeyExpr::field("name");
//! assert_eq!(by_name.key_of(&item), ItemKey::Str("Ada".into()));
//! ```

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A single row of list data.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    record: Arc<Map<String, Value>>,
}

impl Item {
    /// Wraps a JSON object as an item.
    pub fn new(record: Map<String, Value>) -> Self {
        Self {
            record: Arc::new(record),
        }
    }

    /// Returns the value of `field`, treating JSON `null` as absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self.record.get(field) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    /// Returns the value of `field` as a string slice, if it is a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Borrows the underlying record.
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    /// Returns `true` when the item carries a truthy `disabled` field.
    pub fn is_disabled(&self) -> bool {
        self.get("disabled").is_some_and(is_truthy)
    }

    /// Returns `true` if both handles point at the same record.
    pub fn same_record(&self, other: &Item) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
    }

    fn identity(&self) -> usize {
        Arc::as_ptr(&self.record) as usize
    }
}

impl From<Map<String, Value>> for Item {
    fn from(record: Map<String, Value>) -> Self {
        Self::new(record)
    }
}

impl From<Value> for Item {
    /// Objects become items directly; any other value is stored under `"value"`.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::new(map),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                Self::new(map)
            }
        }
    }
}

/// JavaScript-style truthiness for JSON values.
///
/// `null`, `false`, `0`, `NaN` and the empty string are falsy; everything
/// else, including empty arrays and objects, is truthy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Stable identity of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKey {
    /// Integer key, the common case for database ids.
    Int(i64),
    /// String key.
    Str(String),
    /// Any other JSON value, keyed by its serialized form.
    Other(String),
    /// Fallback: the address of the shared record.
    Identity(usize),
}

impl ItemKey {
    /// Converts a JSON value to a key. `null` has no key.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => Some(
                n.as_i64()
                    .map(ItemKey::Int)
                    .unwrap_or_else(|| ItemKey::Other(n.to_string())),
            ),
            Value::String(s) => Some(ItemKey::Str(s.clone())),
            other => Some(ItemKey::Other(other.to_string())),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::Int(n) => write!(f, "{}", n),
            ItemKey::Str(s) | ItemKey::Other(s) => write!(f, "{}", s),
            ItemKey::Identity(addr) => write!(f, "#{:x}", addr),
        }
    }
}

impl From<i64> for ItemKey {
    fn from(n: i64) -> Self {
        ItemKey::Int(n)
    }
}

impl From<&str> for ItemKey {
    fn from(s: &str) -> Self {
        ItemKey::Str(s.to_string())
    }
}

impl From<String> for ItemKey {
    fn from(s: String) -> Self {
        ItemKey::Str(s)
    }
}

/// Function form of a key extractor.
pub type KeyFn = Arc<dyn Fn(&Item) -> Option<ItemKey> + Send + Sync>;

/// How to derive an [`ItemKey`] from an item.
#[derive(Clone)]
pub enum KeyExpr {
    /// Read the key from a named field.
    Field(String),
    /// Compute the key with a function.
    Func(KeyFn),
}

impl KeyExpr {
    /// Key extractor reading `name` from each item.
    pub fn field(name: impl Into<String>) -> Self {
        KeyExpr::Field(name.into())
    }

    /// Key extractor backed by a function.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Item) -> Option<ItemKey> + Send + Sync + 'static,
    {
        KeyExpr::Func(Arc::new(f))
    }

    /// Resolves the key of `item`, falling back to record identity.
    pub fn key_of(&self, item: &Item) -> ItemKey {
        let key = match self {
            KeyExpr::Field(name) => item.get(name).and_then(ItemKey::from_value),
            KeyExpr::Func(f) => f(item),
        };
        key.unwrap_or_else(|| ItemKey::Identity(item.identity()))
    }
}

impl Default for KeyExpr {
    fn default() -> Self {
        KeyExpr::Field("id".to_string())
    }
}

impl From<&str> for KeyExpr {
    fn from(name: &str) -> Self {
        KeyExpr::field(name)
    }
}

impl fmt::Debug for KeyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyExpr::Field(name) => f.debug_tuple("Field").field(name).finish(),
            KeyExpr::Func(_) => f.write_str("Func(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_fields_are_absent() {
        let item = Item::from(json!({ "id": null, "name": "x" }));
        assert!(item.get("id").is_none());
        assert_eq!(item.get_str("name"), Some("x"));
    }

    #[test]
    fn test_non_object_values_are_wrapped() {
        let item = Item::from(json!("plain"));
        assert_eq!(item.get_str("value"), Some("plain"));
    }

    #[test]
    fn test_key_kinds() {
        assert_eq!(ItemKey::from_value(&json!(12)), Some(ItemKey::Int(12)));
        assert_eq!(ItemKey::from_value(&json!("a")), Some(ItemKey::Str("a".into())));
        assert_eq!(ItemKey::from_value(&json!(1.5)), Some(ItemKey::Other("1.5".into())));
        assert_eq!(ItemKey::from_value(&json!(true)), Some(ItemKey::Other("true".into())));
        assert_eq!(ItemKey::from_value(&Value::Null), None);
    }

    #[test]
    fn test_function_key_expr() {
        let expr = KeyExpr::func(|item| item.get_str("email").map(|e| e.to_lowercase().into()));
        let item = Item::from(json!({ "email": "Ada@Example.com" }));
        assert_eq!(expr.key_of(&item), ItemKey::Str("ada@example.com".into()));
    }

    #[test]
    fn test_identity_fallback() {
        let a = Item::from(json!({ "name": "same" }));
        let b = Item::from(json!({ "name": "same" }));
        let expr = KeyExpr::default();

        assert!(matches!(expr.key_of(&a), ItemKey::Identity(_)));
        assert_eq!(expr.key_of(&a), expr.key_of(&a.clone()));
        assert_ne!(expr.key_of(&a), expr.key_of(&b));
        assert!(a.same_record(&a.clone()));
        assert!(!a.same_record(&b));
    }

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(""), json!(0.0)] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!("a"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn test_disabled_flag() {
        assert!(Item::from(json!({ "disabled": true })).is_disabled());
        assert!(!Item::from(json!({ "disabled": false })).is_disabled());
        assert!(!Item::from(json!({})).is_disabled());
    }
}
