//! Typed field descriptors over a [`PropertyBag`].
//!
//! A builder declares one `const` descriptor per field. The descriptor knows
//! the logical name, an optional literal wire name, an optional default and
//! how to translate between the Rust type and its JSON form. The state itself
//! always lives in the bag passed at call time.

use crate::bag::{DslObject, PropertyBag};
use crate::error::{DslError, Result};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::time::Duration;

/// Translation between a Rust value and its JSON representation.
pub trait PropertyValue: Sized {
    /// JSON shape used in error messages.
    const EXPECTED: &'static str;

    /// Encode for storage.
    fn to_json(self) -> Value;

    /// Decode a stored value. `None` when the shape does not match.
    fn from_json(value: &Value) -> Option<Self>;
}

impl PropertyValue for bool {
    const EXPECTED: &'static str = "a boolean";

    fn to_json(self) -> Value {
        Value::Bool(self)
    }

    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

macro_rules! integer_property {
    ($as_int:ident => $($ty:ty),*) => {
        $(
            impl PropertyValue for $ty {
                const EXPECTED: &'static str = "an integer";

                fn to_json(self) -> Value {
                    Value::from(self)
                }

                fn from_json(value: &Value) -> Option<Self> {
                    value.$as_int().and_then(|n| <$ty>::try_from(n).ok())
                }
            }
        )*
    };
}

integer_property!(as_i64 => i32, i64);
integer_property!(as_u64 => u32, u64, usize);

/// JSON has no NaN or infinity: non-finite values are stored as `null`,
/// which then reads back as [`DslError::UnexpectedType`].
impl PropertyValue for f64 {
    const EXPECTED: &'static str = "a number";

    fn to_json(self) -> Value {
        Value::from(self)
    }

    fn from_json(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl PropertyValue for String {
    const EXPECTED: &'static str = "a string";

    fn to_json(self) -> Value {
        Value::String(self)
    }

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl PropertyValue for Vec<String> {
    const EXPECTED: &'static str = "an array of strings";

    fn to_json(self) -> Value {
        Value::Array(self.into_iter().map(Value::String).collect())
    }

    fn from_json(value: &Value) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }
}

impl PropertyValue for Value {
    const EXPECTED: &'static str = "any JSON value";

    fn to_json(self) -> Value {
        self
    }

    fn from_json(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl PropertyValue for Duration {
    const EXPECTED: &'static str = "a duration string";

    fn to_json(self) -> Value {
        Value::String(encode_duration(self))
    }

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().and_then(decode_duration)
    }
}

/// Encode a duration the way index lifecycle `min_age` expects it.
///
/// More than a day of whole minutes is written in days, more than an hour in
/// hours, anything else in seconds. Units are truncated, not rounded.
pub fn encode_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    let minutes = seconds / 60;

    if minutes > 60 * 24 {
        format!("{}d", seconds / 86_400)
    } else if minutes > 60 {
        format!("{}h", seconds / 3_600)
    } else {
        format!("{}s", seconds)
    }
}

/// Parse a duration literal such as `30d`, `12h`, `5m`, `90s` or `250ms`.
pub fn decode_duration(literal: &str) -> Option<Duration> {
    let literal = literal.trim();
    let split = literal.find(|c: char| !c.is_ascii_digit())?;
    let (number, unit) = literal.split_at(split);
    let n: u64 = number.parse().ok()?;

    match unit {
        "d" => Some(Duration::from_secs(n.checked_mul(86_400)?)),
        "h" => Some(Duration::from_secs(n.checked_mul(3_600)?)),
        "m" => Some(Duration::from_secs(n.checked_mul(60)?)),
        "s" => Some(Duration::from_secs(n)),
        "ms" => Some(Duration::from_millis(n)),
        _ => None,
    }
}

/// An enum with fixed wire literals.
pub trait WireEnum: Sized + Copy + 'static {
    /// Every variant.
    const VARIANTS: &'static [Self];

    /// Declared literal of the variant.
    fn name(&self) -> &'static str;

    /// Look a variant up by literal, ignoring case.
    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(name))
    }
}

/// Declare a [`WireEnum`] and its [`PropertyValue`] encoding.
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $literal:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::WireEnum for $name {
            const VARIANTS: &'static [Self] = &[$($name::$variant),+];

            fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $literal),+
                }
            }
        }

        impl $crate::PropertyValue for $name {
            const EXPECTED: &'static str = concat!("one of", $(" ", $literal),+);

            fn to_json(self) -> $crate::__private::serde_json::Value {
                $crate::__private::serde_json::Value::String(
                    <Self as $crate::WireEnum>::name(&self).to_string(),
                )
            }

            fn from_json(value: &$crate::__private::serde_json::Value) -> ::core::option::Option<Self> {
                value.as_str().and_then(<Self as $crate::WireEnum>::from_name)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(<Self as $crate::WireEnum>::name(self))
            }
        }
    };
}

/// How a string value is cased on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Exact,
    Lower,
}

/// Descriptor for a scalar field.
pub struct Field<T> {
    name: &'static str,
    wire_name: Option<&'static str>,
    default: Option<fn() -> T>,
    case: Case,
    _type: PhantomData<fn() -> T>,
}

impl<T> Field<T> {
    /// Field named `name`, converted by the bag's convention.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            wire_name: None,
            default: None,
            case: Case::Exact,
            _type: PhantomData,
        }
    }

    /// Use `wire_name` verbatim instead of converting the logical name.
    pub const fn wire(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    /// Value returned when the field has not been set.
    pub const fn with_default(mut self, default: fn() -> T) -> Self {
        self.default = Some(default);
        self
    }

    /// Lower-case string values on write.
    pub const fn lowercase(mut self) -> Self {
        self.case = Case::Lower;
        self
    }

    /// Logical name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wire key in `bag`.
    pub fn key(&self, bag: &PropertyBag) -> String {
        match self.wire_name {
            Some(wire) => wire.to_string(),
            None => bag.key_for(self.name),
        }
    }
}

impl<T: PropertyValue> Field<T> {
    /// Read the field, falling back to the declared default.
    pub fn get(&self, bag: &PropertyBag) -> Result<T> {
        let key = self.key(bag);
        match bag.get(&key) {
            Some(value) => T::from_json(value).ok_or(DslError::UnexpectedType {
                key,
                expected: T::EXPECTED,
            }),
            None => self
                .default
                .map(|default| default())
                .ok_or(DslError::MissingProperty { key }),
        }
    }

    /// Read the field if it was set.
    pub fn get_opt(&self, bag: &PropertyBag) -> Result<Option<T>> {
        match self.get(bag) {
            Ok(value) => Ok(Some(value)),
            Err(DslError::MissingProperty { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write the field.
    pub fn set(&self, bag: &mut PropertyBag, value: impl Into<T>) {
        let key = self.key(bag);
        let json = match (value.into().to_json(), self.case) {
            (Value::String(s), Case::Lower) => Value::String(s.to_lowercase()),
            (json, _) => json,
        };
        bag.insert(key, json);
    }
}

/// Descriptor for a field holding a nested builder.
pub struct ObjectField<T> {
    name: &'static str,
    wire_name: Option<&'static str>,
    default: Option<fn() -> T>,
}

impl<T: DslObject> ObjectField<T> {
    /// Field named `name`, converted by the bag's convention.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            wire_name: None,
            default: None,
        }
    }

    /// Use `wire_name` verbatim.
    pub const fn wire(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    /// Factory for the child created on first access.
    pub const fn with_default(mut self, default: fn() -> T) -> Self {
        self.default = Some(default);
        self
    }

    /// Wire key in `bag`.
    pub fn key(&self, bag: &PropertyBag) -> String {
        match self.wire_name {
            Some(wire) => wire.to_string(),
            None => bag.key_for(self.name),
        }
    }

    /// Read a copy of the child.
    pub fn get(&self, bag: &PropertyBag) -> Result<T> {
        let key = self.key(bag);
        match bag.get(&key) {
            Some(Value::Object(map)) => Ok(T::from_bag(PropertyBag::from_map(
                T::convention(),
                map.clone(),
            ))),
            Some(_) => Err(DslError::UnexpectedType {
                key,
                expected: "an object",
            }),
            None => self
                .default
                .map(|default| default())
                .ok_or(DslError::MissingProperty { key }),
        }
    }

    /// Read a copy of the child if it was set.
    pub fn get_opt(&self, bag: &PropertyBag) -> Result<Option<T>> {
        match self.get(bag) {
            Ok(value) => Ok(Some(value)),
            Err(DslError::MissingProperty { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Store a copy of `value`. Later changes to `value` are not reflected.
    pub fn set(&self, bag: &mut PropertyBag, value: &T) {
        let key = self.key(bag);
        bag.insert(key, value.to_value());
    }

    /// Mutate the child in place, creating it from the default if needed.
    pub fn update<R>(
        &self,
        bag: &mut PropertyBag,
        f: impl FnOnce(&mut T) -> Result<R>,
    ) -> Result<R> {
        let mut child = self.get(bag)?;
        let result = f(&mut child)?;
        let key = self.key(bag);
        bag.insert(key, Value::Object(child.bag().clone().into_map()));
        Ok(result)
    }
}

/// Merge the entries of `extra` into `target`, replacing existing keys.
pub(crate) fn merge_into(target: &mut Map<String, Value>, extra: PropertyBag) {
    for (key, value) in extra.into_map() {
        target.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::NamingConvention;
    use proptest::prelude::*;
    use serde_json::json;

    crate::wire_enum! {
        enum Color {
            Red => "RED",
            Green => "green",
        }
    }

    #[test]
    fn test_missing_property_without_default() {
        let bag = PropertyBag::new();
        let field: Field<i64> = Field::new("resultSize").wire("size");

        match field.get(&bag) {
            Err(DslError::MissingProperty { key }) => assert_eq!(key, "size"),
            other => panic!("expected MissingProperty, got {:?}", other),
        }
        assert!(field.get_opt(&bag).unwrap().is_none());
    }

    #[test]
    fn test_unsigned_extremes_read_back() {
        let mut bag = PropertyBag::new();
        let big: Field<u64> = Field::new("big");
        big.set(&mut bag, u64::MAX);
        assert_eq!(bag.get("big"), Some(&json!(u64::MAX)));
        assert_eq!(big.get(&bag).unwrap(), u64::MAX);

        let count: Field<usize> = Field::new("count");
        count.set(&mut bag, usize::MAX);
        assert_eq!(count.get(&bag).unwrap(), usize::MAX);

        bag.insert("negative", -1);
        let negative: Field<u32> = Field::new("negative");
        assert!(matches!(
            negative.get(&bag),
            Err(DslError::UnexpectedType { expected: "an integer", .. })
        ));
    }

    #[test]
    fn test_non_finite_float_is_stored_as_null() {
        let mut bag = PropertyBag::new();
        let boost: Field<f64> = Field::new("boost");

        boost.set(&mut bag, 1.5);
        assert_eq!(boost.get(&bag).unwrap(), 1.5);

        boost.set(&mut bag, f64::NAN);
        assert_eq!(bag.get("boost"), Some(&Value::Null));
        assert!(matches!(
            boost.get(&bag),
            Err(DslError::UnexpectedType { expected: "a number", .. })
        ));
    }

    #[test]
    fn test_default_is_returned_when_unset() {
        let bag = PropertyBag::new();
        let field: Field<String> = Field::new("trackTotalHits").with_default(|| "true".to_string());
        assert_eq!(field.get(&bag).unwrap(), "true");
    }

    #[test]
    fn test_set_applies_convention() {
        let mut bag = PropertyBag::new();
        let field: Field<u32> = Field::new("maxNumSegments");
        field.set(&mut bag, 1u32);

        assert_eq!(bag.get("max_num_segments"), Some(&json!(1)));
        assert_eq!(field.get(&bag).unwrap(), 1);
    }

    #[test]
    fn test_unexpected_type() {
        let mut bag = PropertyBag::new();
        bag.insert("from", "ten");
        let field: Field<i64> = Field::new("from");

        assert!(matches!(
            field.get(&bag),
            Err(DslError::UnexpectedType { expected: "an integer", .. })
        ));
    }

    #[test]
    fn test_enum_case_policy_is_per_field() {
        let exact: Field<Color> = Field::new("order");
        let lower: Field<Color> = Field::new("mode").lowercase();
        let mut bag = PropertyBag::with_convention(NamingConvention::AsIs);

        exact.set(&mut bag, Color::Red);
        lower.set(&mut bag, Color::Red);

        assert_eq!(bag.to_value(), json!({"order": "RED", "mode": "red"}));
        assert_eq!(lower.get(&bag).unwrap(), Color::Red);
        assert_eq!(Color::Green.to_string(), "green");
    }

    #[test]
    fn test_duration_field_round_trip() {
        let mut bag = PropertyBag::new();
        let field: Field<Duration> = Field::new("minAge");
        field.set(&mut bag, Duration::from_secs(3 * 86_400));

        assert_eq!(bag.get("min_age"), Some(&json!("3d")));
        assert_eq!(field.get(&bag).unwrap(), Duration::from_secs(3 * 86_400));
    }

    #[test]
    fn test_encode_duration_thresholds() {
        assert_eq!(encode_duration(Duration::from_secs(59)), "59s");
        assert_eq!(encode_duration(Duration::from_secs(60 * 60)), "3600s");
        assert_eq!(encode_duration(Duration::from_secs(61 * 60)), "1h");
        assert_eq!(encode_duration(Duration::from_secs(24 * 3_600)), "24h");
        assert_eq!(encode_duration(Duration::from_secs(24 * 3_600 + 60)), "1d");
        assert_eq!(encode_duration(Duration::from_secs(30 * 86_400)), "30d");
    }

    #[test]
    fn test_decode_duration() {
        assert_eq!(decode_duration("7d"), Some(Duration::from_secs(7 * 86_400)));
        assert_eq!(decode_duration("12h"), Some(Duration::from_secs(12 * 3_600)));
        assert_eq!(decode_duration("5m"), Some(Duration::from_secs(300)));
        assert_eq!(decode_duration("90s"), Some(Duration::from_secs(90)));
        assert_eq!(decode_duration("250ms"), Some(Duration::from_millis(250)));
        assert_eq!(decode_duration("soon"), None);
        assert_eq!(decode_duration("10y"), None);
    }

    #[test]
    fn test_object_field_copies_on_set() {
        let field: ObjectField<PropertyBag> = ObjectField::new("innerHits");
        let mut parent = PropertyBag::new();
        let mut child = PropertyBag::new();
        child.insert("name", "first");

        field.set(&mut parent, &child);
        child.insert("name", "second");

        assert_eq!(parent.to_value(), json!({"inner_hits": {"name": "first"}}));
    }

    #[test]
    fn test_object_field_update_creates_default() {
        let field: ObjectField<PropertyBag> =
            ObjectField::new("actions").with_default(PropertyBag::new);
        let mut parent = PropertyBag::new();

        field
            .update(&mut parent, |actions| {
                actions.insert("delete", json!({}));
                Ok(())
            })
            .unwrap();
        field
            .update(&mut parent, |actions| {
                actions.insert("shrink", json!({"number_of_shards": 1}));
                Ok(())
            })
            .unwrap();

        assert_eq!(
            parent.to_value().to_string(),
            r#"{"actions":{"delete":{},"shrink":{"number_of_shards":1}}}"#
        );
    }

    #[test]
    fn test_object_field_rejects_non_object() {
        let field: ObjectField<PropertyBag> = ObjectField::new("collapse");
        let mut parent = PropertyBag::new();
        parent.insert("collapse", "user");

        assert!(matches!(
            field.get(&parent),
            Err(DslError::UnexpectedType { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_encode_duration_unit_matches_minutes(secs in 0u64..10_000_000) {
            let encoded = encode_duration(Duration::from_secs(secs));
            let minutes = secs / 60;
            let (number, unit) = encoded.split_at(encoded.len() - 1);
            let n: u64 = number.parse().unwrap();

            if minutes > 1_440 {
                prop_assert_eq!(unit, "d");
                prop_assert_eq!(n, secs / 86_400);
            } else if minutes > 60 {
                prop_assert_eq!(unit, "h");
                prop_assert_eq!(n, secs / 3_600);
            } else {
                prop_assert_eq!(unit, "s");
                prop_assert_eq!(n, secs);
            }
        }
    }
}
