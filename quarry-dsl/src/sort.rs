//! Sort specification builder.

use crate::bag::PropertyBag;
use crate::field::{Field, merge_into};
use crate::naming::NamingConvention;
use serde_json::{Map, Value};

crate::wire_enum! {
    /// Sort direction. Written upper case.
    pub enum SortOrder {
        /// Ascending.
        Asc => "ASC",
        /// Descending.
        Desc => "DESC",
    }
}

crate::wire_enum! {
    /// How multi-valued fields are reduced before sorting. Written lower case.
    pub enum SortMode {
        /// Lowest value.
        Min => "MIN",
        /// Highest value.
        Max => "MAX",
        /// Sum of values.
        Sum => "SUM",
        /// Average of values.
        Avg => "AVG",
        /// Median of values.
        Median => "MEDIAN",
    }
}

const ORDER: Field<SortOrder> = Field::new("order");
const MODE: Field<SortMode> = Field::new("mode").lowercase();
const MISSING: Field<String> = Field::new("missing");

/// A structured sort entry.
///
/// Order defaults to descending. `mode` and `missing` are left out of the
/// output entirely unless set.
#[derive(Debug, Clone)]
pub struct SortField {
    field: String,
    order: SortOrder,
    mode: Option<SortMode>,
    missing: Option<String>,
    extra: Option<PropertyBag>,
}

impl SortField {
    /// Sort on `field`, descending.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
            mode: None,
            missing: None,
            extra: None,
        }
    }

    /// Set the direction.
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the multi-value mode.
    pub fn mode(mut self, mode: SortMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Where documents without the field go, e.g. `_last`.
    pub fn missing(mut self, missing: impl Into<String>) -> Self {
        self.missing = Some(missing.into());
        self
    }

    /// Add arbitrary keys such as `unmapped_type` or `nested`. Keys are
    /// written verbatim and may override the standard ones.
    pub fn with(mut self, block: impl FnOnce(&mut PropertyBag)) -> Self {
        let extra = self
            .extra
            .get_or_insert_with(|| PropertyBag::with_convention(NamingConvention::AsIs));
        block(extra);
        self
    }

    fn to_value(&self) -> Value {
        let mut options = PropertyBag::with_convention(NamingConvention::AsIs);
        ORDER.set(&mut options, self.order);
        if let Some(mode) = self.mode {
            MODE.set(&mut options, mode);
        }
        if let Some(missing) = &self.missing {
            MISSING.set(&mut options, missing.as_str());
        }

        let mut options = options.into_map();
        if let Some(extra) = &self.extra {
            merge_into(&mut options, extra.clone());
        }

        let mut entry = Map::new();
        entry.insert(self.field.clone(), Value::Object(options));
        Value::Object(entry)
    }
}

impl From<&str> for SortField {
    fn from(field: &str) -> Self {
        SortField::new(field)
    }
}

impl From<String> for SortField {
    fn from(field: String) -> Self {
        SortField::new(field)
    }
}

/// Accumulates sort entries in priority order.
///
/// ```
/// use quarry_dsl::{SortBuilder, SortField, SortMode, SortOrder};
///
/// let mut sort = SortBuilder::new();
/// sort.push("-score")
///     .add(SortField::new("age").order(SortOrder::Desc).mode(SortMode::Avg).missing("_last"));
///
/// assert_eq!(
///     sort.to_value().to_string(),
///     r#"["-score",{"age":{"order":"DESC","mode":"avg","missing":"_last"}}]"#
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct SortBuilder {
    fields: Vec<Value>,
}

impl SortBuilder {
    /// Create an empty sort.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bare field name, serialized as a plain string.
    pub fn push(&mut self, field: impl Into<String>) -> &mut Self {
        self.fields.push(Value::String(field.into()));
        self
    }

    /// Add a structured entry. A bare name sorts descending.
    pub fn add(&mut self, field: impl Into<SortField>) -> &mut Self {
        self.fields.push(field.into().to_value());
        self
    }

    /// Entries so far.
    pub fn sort_fields(&self) -> &[Value] {
        &self.fields
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no entries were added.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The `sort` array.
    pub fn to_value(&self) -> Value {
        Value::Array(self.fields.clone())
    }

    /// Consume into the `sort` array.
    pub fn into_value(self) -> Value {
        Value::Array(self.fields)
    }
}

/// Run `block` against a fresh builder and store the result under `sort`.
pub(crate) fn write_sort(bag: &mut PropertyBag, block: impl FnOnce(&mut SortBuilder)) {
    let mut builder = SortBuilder::new();
    block(&mut builder);
    bag.insert("sort", builder.into_value());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_order_is_descending() {
        let mut sort = SortBuilder::new();
        sort.add("age");
        assert_eq!(sort.to_value(), json!([{"age": {"order": "DESC"}}]));
    }

    #[test]
    fn test_explicit_ascending() {
        let mut sort = SortBuilder::new();
        sort.add(SortField::new("age").order(SortOrder::Asc));
        assert_eq!(sort.to_value(), json!([{"age": {"order": "ASC"}}]));
    }

    #[test]
    fn test_bare_entries_are_strings() {
        let mut sort = SortBuilder::new();
        sort.push("_score").push(String::from("timestamp"));
        assert_eq!(sort.to_value(), json!(["_score", "timestamp"]));
        assert!(sort.sort_fields().iter().all(Value::is_string));
    }

    #[test]
    fn test_mixed_entries_keep_call_order() {
        let mut sort = SortBuilder::new();
        sort.push("-score").add(
            SortField::new("age")
                .order(SortOrder::Desc)
                .mode(SortMode::Avg)
                .missing("_last"),
        );

        assert_eq!(
            serde_json::to_string(&sort.to_value()).unwrap(),
            r#"["-score",{"age":{"order":"DESC","mode":"avg","missing":"_last"}}]"#
        );
    }

    #[test]
    fn test_extra_keys_are_appended() {
        let mut sort = SortBuilder::new();
        sort.add(SortField::new("price").with(|b| {
            b.insert("unmapped_type", "long");
        }));

        assert_eq!(
            sort.to_value().to_string(),
            r#"[{"price":{"order":"DESC","unmapped_type":"long"}}]"#
        );
    }

    #[test]
    fn test_write_sort_replaces_previous() {
        let mut bag = PropertyBag::new();
        write_sort(&mut bag, |s| {
            s.push("a");
        });
        write_sort(&mut bag, |s| {
            s.push("b").push("c");
        });
        assert_eq!(bag.to_value(), json!({"sort": ["b", "c"]}));
    }
}
