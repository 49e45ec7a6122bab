//! Typed builders for Elasticsearch and OpenSearch request bodies.
//!
//! Every builder is a thin typed view over a [`PropertyBag`], an
//! insertion-ordered JSON object. Typed accessors read and write named
//! entries of the bag, converting logical names to wire keys with the
//! builder's [`NamingConvention`]. What you build is exactly what goes on
//! the wire.
//!
//! This crate provides:
//! - Single-key query clauses ([`EsQuery`]) and common clause helpers
//! - Search bodies with sort, collapse and inner hits
//! - Multi-search NDJSON batches
//! - Index lifecycle management policies
//!
//! # Example
//!
//! ```rust
//! use quarry_dsl::prelude::*;
//!
//! let mut search = SearchDsl::new();
//! search
//!     .set_query(&match_query("title", "rust"))
//!     .sort(|s| {
//!         s.push("-score")
//!             .add(SortField::new("age").mode(SortMode::Avg).missing("_last"));
//!     })
//!     .collapse("user.id", |c| {
//!         c.with_inner_hits("latest", |ih| {
//!             ih.set_result_size(3);
//!         });
//!     });
//!
//! let json = search.to_json();
//! assert!(json.starts_with(r#"{"query":{"match":{"title":{"query":"rust"}}},"sort":["-score","#));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bag;
mod collapse;
mod error;
mod field;
mod ilm;
mod msearch;
mod naming;
mod query;
mod search;
pub mod serializer;
mod sort;

pub use bag::{DslObject, PropertyBag};
pub use collapse::{Collapse, InnerHits};
pub use error::{DslError, Result};
pub use field::{Field, ObjectField, PropertyValue, WireEnum, decode_duration, encode_duration};
pub use ilm::{IlmActions, IlmConfiguration, IlmPhaseConfiguration, IlmPhases, IlmPolicy};
pub use msearch::{ExpandWildcards, MultiSearchDsl, MultiSearchHeader, SearchType};
pub use naming::{NamingConvention, to_snake_case};
pub use query::{
    BoolQuery, EsQuery, QueryField, bool_query, custom_query, exists, match_all, match_query,
    range, term, terms,
};
pub use search::SearchDsl;
pub use sort::{SortBuilder, SortField, SortMode, SortOrder};

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        BoolQuery, Collapse, DslError, DslObject, EsQuery, IlmConfiguration, InnerHits,
        MultiSearchDsl, MultiSearchHeader, PropertyBag, Result, SearchDsl, SortBuilder, SortField,
        SortMode, SortOrder, bool_query, custom_query, match_all, match_query, term,
    };
}
