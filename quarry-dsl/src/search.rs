//! Search request body.

use crate::bag::DslObject;
use crate::collapse::Collapse;
use crate::error::Result;
use crate::field::{Field, ObjectField};
use crate::query::{EsQuery, QueryField};
use crate::sort::{SortBuilder, write_sort};

crate::dsl_object! {
    /// Body of a `_search` request.
    ///
    /// ```
    /// use quarry_dsl::{SearchDsl, match_all};
    ///
    /// let mut search = SearchDsl::new();
    /// search.set_result_size(10).set_query(&match_all());
    /// assert_eq!(search.to_json(), r#"{"size":10,"query":{"match_all":{}}}"#);
    /// ```
    pub struct SearchDsl: SnakeCase;
}

const FROM: Field<i64> = Field::new("from");
const TRACK_TOTAL_HITS: Field<String> = Field::new("trackTotalHits");
// `size` would read like a collection length, hence the longer name.
const RESULT_SIZE: Field<i64> = Field::new("resultSize").wire("size");
const QUERY: QueryField = QueryField::new("query");
const POST_FILTER: QueryField = QueryField::new("postFilter");
const COLLAPSE: ObjectField<Collapse> = ObjectField::new("collapse");

impl SearchDsl {
    /// Offset of the first hit.
    pub fn from(&self) -> Result<i64> {
        FROM.get(self.bag())
    }

    /// Set the offset of the first hit.
    pub fn set_from(&mut self, from: i64) -> &mut Self {
        FROM.set(self.bag_mut(), from);
        self
    }

    /// `track_total_hits` as sent (`"true"`, `"false"` or a count).
    pub fn track_total_hits(&self) -> Result<String> {
        TRACK_TOTAL_HITS.get(self.bag())
    }

    /// Set `track_total_hits`.
    pub fn set_track_total_hits(&mut self, track: impl Into<String>) -> &mut Self {
        TRACK_TOTAL_HITS.set(self.bag_mut(), track);
        self
    }

    /// Number of hits to return.
    pub fn result_size(&self) -> Result<i64> {
        RESULT_SIZE.get(self.bag())
    }

    /// Set the number of hits to return.
    pub fn set_result_size(&mut self, size: i64) -> &mut Self {
        RESULT_SIZE.set(self.bag_mut(), size);
        self
    }

    /// The main query clause.
    pub fn query(&self) -> Result<EsQuery> {
        QUERY.get(self.bag())
    }

    /// Set the main query clause.
    pub fn set_query(&mut self, query: &EsQuery) -> &mut Self {
        QUERY.set(self.bag_mut(), query);
        self
    }

    /// Filter applied after aggregations.
    pub fn post_filter(&self) -> Result<EsQuery> {
        POST_FILTER.get(self.bag())
    }

    /// Set the post filter.
    pub fn set_post_filter(&mut self, query: &EsQuery) -> &mut Self {
        POST_FILTER.set(self.bag_mut(), query);
        self
    }

    /// Replace the sort with the entries added in `block`.
    pub fn sort(&mut self, block: impl FnOnce(&mut SortBuilder)) -> &mut Self {
        write_sort(self.bag_mut(), block);
        self
    }

    /// Collapse results on `field`, configured by `block`.
    pub fn collapse(&mut self, field: impl Into<String>, block: impl FnOnce(&mut Collapse)) -> &mut Self {
        let mut collapse = Collapse::on(field);
        block(&mut collapse);
        COLLAPSE.set(self.bag_mut(), &collapse);
        self
    }

    /// Copy of the collapse section.
    pub fn collapse_section(&self) -> Result<Collapse> {
        COLLAPSE.get(self.bag())
    }

    /// Compact JSON text of the body.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}
