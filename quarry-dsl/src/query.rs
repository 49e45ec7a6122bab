//! Single-key query clauses.
//!
//! Every clause serializes as an object with exactly one key naming the
//! clause kind, e.g. `{"match": {...}}`. Index lifecycle actions use the same
//! shape.

use crate::bag::PropertyBag;
use crate::error::{DslError, Result};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

/// A clause of kind `kind` with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EsQuery {
    kind: String,
    params: PropertyBag,
}

impl EsQuery {
    /// Clause with no parameters, e.g. `{"match_all": {}}`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: PropertyBag::new(),
        }
    }

    /// Clause with the given parameters.
    pub fn with_params(kind: impl Into<String>, params: PropertyBag) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }

    /// Clause kind.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Clause parameters.
    pub fn params(&self) -> &PropertyBag {
        &self.params
    }

    /// Mutable clause parameters.
    pub fn params_mut(&mut self) -> &mut PropertyBag {
        &mut self.params
    }

    /// `{kind: params}`.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(self.kind.clone(), self.params.to_value());
        Value::Object(map)
    }

    /// Read a clause back from its wire form.
    ///
    /// `key` names the parent entry and is only used for the error. Anything
    /// other than an object with exactly one object-valued entry is rejected.
    pub fn from_value(key: &str, value: &Value) -> Result<Self> {
        let malformed = |entries| DslError::MalformedQuery {
            key: key.to_string(),
            entries,
        };

        let map = value.as_object().ok_or_else(|| malformed(0))?;
        if map.len() != 1 {
            return Err(malformed(map.len()));
        }

        match map.iter().next() {
            Some((kind, Value::Object(params))) => Ok(Self::with_params(
                kind.clone(),
                PropertyBag::from_map(Default::default(), params.clone()),
            )),
            _ => Err(malformed(1)),
        }
    }
}

impl Serialize for EsQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.kind, &self.params)?;
        map.end()
    }
}

impl From<EsQuery> for Value {
    fn from(query: EsQuery) -> Self {
        query.to_value()
    }
}

/// Descriptor for a field holding a single-key clause.
pub struct QueryField {
    name: &'static str,
    wire_name: Option<&'static str>,
}

impl QueryField {
    /// Field named `name`, converted by the bag's convention.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            wire_name: None,
        }
    }

    /// Use `wire_name` verbatim.
    pub const fn wire(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    fn key(&self, bag: &PropertyBag) -> String {
        match self.wire_name {
            Some(wire) => wire.to_string(),
            None => bag.key_for(self.name),
        }
    }

    /// Read the clause.
    pub fn get(&self, bag: &PropertyBag) -> Result<EsQuery> {
        let key = self.key(bag);
        match bag.get(&key) {
            Some(value) => EsQuery::from_value(&key, value),
            None => Err(DslError::MissingProperty { key }),
        }
    }

    /// Write the clause.
    pub fn set(&self, bag: &mut PropertyBag, query: &EsQuery) {
        let key = self.key(bag);
        bag.insert(key, query.to_value());
    }
}

/// Build a clause of any kind by filling in its parameters.
///
/// ```
/// use quarry_dsl::custom_query;
///
/// let q = custom_query("match_phrase", |p| {
///     p.insert("title", "quick brown fox");
/// });
/// assert_eq!(q.to_value().to_string(), r#"{"match_phrase":{"title":"quick brown fox"}}"#);
/// ```
pub fn custom_query(kind: impl Into<String>, block: impl FnOnce(&mut PropertyBag)) -> EsQuery {
    let mut query = EsQuery::new(kind);
    block(&mut query.params);
    query
}

/// `{"match_all": {}}`.
pub fn match_all() -> EsQuery {
    EsQuery::new("match_all")
}

/// Full-text match on one field.
pub fn match_query(field: impl Into<String>, text: impl Into<String>) -> EsQuery {
    let text: String = text.into();
    custom_query("match", |p| {
        p.insert(field, json!({ "query": text }));
    })
}

/// Exact match on one field.
pub fn term(field: impl Into<String>, value: impl Into<Value>) -> EsQuery {
    let value: Value = value.into();
    custom_query("term", |p| {
        p.insert(field, json!({ "value": value }));
    })
}

/// Exact match against any of several values.
pub fn terms<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> EsQuery {
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    custom_query("terms", |p| {
        p.insert(field, values);
    })
}

/// Documents where `field` has a value.
pub fn exists(field: impl Into<String>) -> EsQuery {
    custom_query("exists", |p| {
        p.insert("field", field.into());
    })
}

/// Range on one field. The block receives the bounds object (`gt`, `gte`,
/// `lt`, `lte`, `format`, ...).
pub fn range(field: impl Into<String>, block: impl FnOnce(&mut PropertyBag)) -> EsQuery {
    let mut bounds = PropertyBag::new();
    block(&mut bounds);
    custom_query("range", |p| {
        p.insert(field, bounds);
    })
}

/// Builder for `bool` clauses.
#[derive(Debug, Clone, Default)]
pub struct BoolQuery {
    must: Vec<Value>,
    should: Vec<Value>,
    must_not: Vec<Value>,
    filter: Vec<Value>,
    minimum_should_match: Option<Value>,
}

impl BoolQuery {
    /// Create an empty bool clause.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scoring clause that must match.
    pub fn must(&mut self, query: EsQuery) -> &mut Self {
        self.must.push(query.to_value());
        self
    }

    /// Add a clause that should match.
    pub fn should(&mut self, query: EsQuery) -> &mut Self {
        self.should.push(query.to_value());
        self
    }

    /// Add a clause that must not match.
    pub fn must_not(&mut self, query: EsQuery) -> &mut Self {
        self.must_not.push(query.to_value());
        self
    }

    /// Add a non-scoring clause that must match.
    pub fn filter(&mut self, query: EsQuery) -> &mut Self {
        self.filter.push(query.to_value());
        self
    }

    /// Set `minimum_should_match` (a count or a percentage string).
    pub fn minimum_should_match(&mut self, value: impl Into<Value>) -> &mut Self {
        self.minimum_should_match = Some(value.into());
        self
    }

    /// Finish as a single-key clause. Empty clause lists are omitted.
    pub fn build(self) -> EsQuery {
        custom_query("bool", |p| {
            for (key, clauses) in [
                ("must", self.must),
                ("should", self.should),
                ("must_not", self.must_not),
                ("filter", self.filter),
            ] {
                if !clauses.is_empty() {
                    p.insert(key, clauses);
                }
            }
            if let Some(min) = self.minimum_should_match {
                p.insert("minimum_should_match", min);
            }
        })
    }
}

/// Build a `bool` clause.
pub fn bool_query(block: impl FnOnce(&mut BoolQuery)) -> EsQuery {
    let mut query = BoolQuery::new();
    block(&mut query);
    query.build()
}
