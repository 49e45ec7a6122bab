//! Ordered property storage shared by every builder.

use crate::naming::NamingConvention;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Ordered mapping from wire key to JSON value.
///
/// Insertion order is kept and shows up in the serialized output. Writing an
/// existing key replaces its value in place.
///
/// There are two write primitives: [`PropertyBag::insert`] stores the key
/// exactly as given, [`PropertyBag::set`] runs the logical name through the
/// bag's [`NamingConvention`] first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    convention: NamingConvention,
    entries: Map<String, Value>,
}

impl PropertyBag {
    /// Create an empty bag using the snake case convention.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bag with an explicit convention.
    pub fn with_convention(convention: NamingConvention) -> Self {
        Self {
            convention,
            entries: Map::new(),
        }
    }

    /// Wrap an existing JSON object.
    pub fn from_map(convention: NamingConvention, entries: Map<String, Value>) -> Self {
        Self {
            convention,
            entries,
        }
    }

    /// The bag's naming convention.
    pub fn convention(&self) -> NamingConvention {
        self.convention
    }

    /// Wire key a logical name maps to in this bag.
    pub fn key_for(&self, name: &str) -> String {
        self.convention.apply(name)
    }

    /// Store `value` under the literal `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Store `value` under the convention-converted `name`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        let key = self.key_for(name);
        self.insert(key, value)
    }

    /// Value stored under the literal `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Mutable value stored under the literal `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Whether the literal `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Copy of the bag as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }

    /// Consume the bag into its JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }
}

impl Serialize for PropertyBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl From<PropertyBag> for Value {
    fn from(bag: PropertyBag) -> Self {
        Value::Object(bag.entries)
    }
}

/// A typed builder backed by a [`PropertyBag`].
///
/// Nested builders are stored in their parent as plain JSON objects and
/// rebuilt with [`DslObject::from_bag`] when read back, so assigning a child
/// copies it: later changes to the child are not seen by the parent unless it
/// is assigned again.
pub trait DslObject: Sized {
    /// Convention used for the builder's own keys.
    fn convention() -> NamingConvention;

    /// Rebuild the builder from stored properties.
    fn from_bag(bag: PropertyBag) -> Self;

    /// Backing properties.
    fn bag(&self) -> &PropertyBag;

    /// Mutable backing properties.
    fn bag_mut(&mut self) -> &mut PropertyBag;

    /// JSON form of the builder.
    fn to_value(&self) -> Value {
        self.bag().to_value()
    }
}

impl DslObject for PropertyBag {
    fn convention() -> NamingConvention {
        NamingConvention::SnakeCase
    }

    fn from_bag(bag: PropertyBag) -> Self {
        bag
    }

    fn bag(&self) -> &PropertyBag {
        self
    }

    fn bag_mut(&mut self) -> &mut PropertyBag {
        self
    }
}

/// Declare a newtype builder over [`PropertyBag`].
///
/// ```
/// quarry_dsl::dsl_object! {
///     /// Index settings.
///     pub struct Settings: SnakeCase;
/// }
///
/// let settings = Settings::new();
/// assert!(quarry_dsl::DslObject::bag(&settings).is_empty());
/// ```
#[macro_export]
macro_rules! dsl_object {
    ($(#[$meta:meta])* $vis:vis struct $name:ident : $convention:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name($crate::PropertyBag);

        impl $name {
            /// Create an empty builder.
            pub fn new() -> Self {
                Self($crate::PropertyBag::with_convention(
                    $crate::NamingConvention::$convention,
                ))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::DslObject for $name {
            fn convention() -> $crate::NamingConvention {
                $crate::NamingConvention::$convention
            }

            fn from_bag(bag: $crate::PropertyBag) -> Self {
                Self(bag)
            }

            fn bag(&self) -> &$crate::PropertyBag {
                &self.0
            }

            fn bag_mut(&mut self) -> &mut $crate::PropertyBag {
                &mut self.0
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::__private::serde::Serialize::serialize(&self.0, serializer)
            }
        }

        impl From<$name> for $crate::__private::serde_json::Value {
            fn from(object: $name) -> Self {
                object.0.into()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insertion_order_is_kept() {
        let mut bag = PropertyBag::new();
        bag.insert("zeta", 1).insert("alpha", 2).insert("mid", 3);

        let keys: Vec<&String> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(bag.to_value().to_string(), r#"{"zeta":1,"alpha":2,"mid":3}"#);
    }

    #[test]
    fn test_last_write_wins_in_place() {
        let mut bag = PropertyBag::new();
        bag.insert("a", 1).insert("b", 2).insert("a", 3);

        assert_eq!(bag.len(), 2);
        assert_eq!(bag.to_value(), json!({"a": 3, "b": 2}));
        assert_eq!(bag.to_value().to_string(), r#"{"a":3,"b":2}"#);
    }

    #[test]
    fn test_literal_and_converted_writes() {
        let mut bag = PropertyBag::with_convention(NamingConvention::SnakeCase);
        bag.set("maxNumSegments", 1);
        bag.insert("maxAge", "7d");

        assert_eq!(bag.get("max_num_segments"), Some(&json!(1)));
        assert_eq!(bag.get("maxAge"), Some(&json!("7d")));
        assert!(!bag.contains_key("max_age"));
    }

    #[test]
    fn test_as_is_convention_keeps_names() {
        let mut bag = PropertyBag::with_convention(NamingConvention::AsIs);
        bag.set("postFilter", true);
        assert_eq!(bag.key_for("postFilter"), "postFilter");
        assert!(bag.contains_key("postFilter"));
    }

    #[test]
    fn test_different_casings_do_not_merge() {
        let mut bag = PropertyBag::new();
        bag.insert("trackTotalHits", "true");
        bag.set("trackTotalHits", "false");

        assert_eq!(bag.len(), 2);
        assert_eq!(bag.get("trackTotalHits"), Some(&json!("true")));
        assert_eq!(bag.get("track_total_hits"), Some(&json!("false")));
    }

    crate::dsl_object! {
        struct Probe: AsIs;
    }

    #[test]
    fn test_dsl_object_macro() {
        let mut probe = Probe::new();
        probe.bag_mut().set("someKey", 1);
        assert_eq!(Probe::convention(), NamingConvention::AsIs);
        assert_eq!(serde_json::to_string(&probe).unwrap(), r#"{"someKey":1}"#);
        assert_eq!(Value::from(probe), json!({"someKey": 1}));
    }
}
