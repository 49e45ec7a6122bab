//! Multi-search batch body (`_msearch`).

use crate::bag::DslObject;
use crate::error::Result;
use crate::field::Field;
use crate::search::SearchDsl;
use std::fmt;

crate::wire_enum! {
    /// Which index states wildcard expressions expand to.
    pub enum ExpandWildcards {
        /// Open and closed, including hidden.
        All => "all",
        /// Open indices.
        Open => "open",
        /// Closed indices.
        Closed => "closed",
        /// Hidden indices.
        Hidden => "hidden",
        /// No expansion.
        None => "none",
    }
}

crate::wire_enum! {
    /// Scoring strategy for distributed search.
    pub enum SearchType {
        /// Score with shard-local term frequencies.
        QueryThenFetch => "query_then_fetch",
        /// Gather global term frequencies first.
        DfsQueryThenFetch => "dfs_query_then_fetch",
    }
}

crate::dsl_object! {
    /// Header line preceding each search in a multi-search body.
    pub struct MultiSearchHeader: SnakeCase;
}

const INDEX: Field<String> = Field::new("index");
const ALLOW_NO_INDICES: Field<bool> = Field::new("allowNoIndices");
const CCS_MINIMIZE_ROUNDTRIPS: Field<bool> = Field::new("ccsMinimizeRoundtrips");
const EXPAND_WILDCARDS: Field<ExpandWildcards> = Field::new("expandWildcards");
const IGNORE_THROTTLED: Field<bool> = Field::new("ignoreThrottled");
const IGNORE_UNAVAILABLE: Field<bool> = Field::new("ignoreUnavailable");
const MAX_CONCURRENT_SEARCHES: Field<i64> = Field::new("maxConcurrentSearches");
const MAX_CONCURRENT_SHARD_REQUESTS: Field<i64> = Field::new("maxConcurrentShardRequests");
const PRE_FILTER_SHARD_SIZE: Field<i64> = Field::new("preFilterShardSize");
const REST_TOTAL_HITS_AS_INT: Field<bool> = Field::new("restTotalHitsAsInt");
const ROUTING: Field<String> = Field::new("routing");
const SEARCH_TYPE: Field<SearchType> = Field::new("searchType");
const TYPED_KEYS: Field<bool> = Field::new("typedKeys");

macro_rules! header_field {
    ($get:ident, $set:ident, $field:ident, $ty:ty, $doc:literal) => {
        #[doc = $doc]
        pub fn $get(&self) -> Result<$ty> {
            $field.get(self.bag())
        }

        #[doc = concat!("Set: ", $doc)]
        pub fn $set(&mut self, value: $ty) -> &mut Self {
            $field.set(self.bag_mut(), value);
            self
        }
    };
}

impl MultiSearchHeader {
    /// Header targeting `index`.
    pub fn for_index(index: impl Into<String>) -> Self {
        let mut header = Self::new();
        header.set_index(index);
        header
    }

    /// Target index of this search.
    pub fn index(&self) -> Result<String> {
        INDEX.get(self.bag())
    }

    /// Set the target index.
    pub fn set_index(&mut self, index: impl Into<String>) -> &mut Self {
        INDEX.set(self.bag_mut(), index);
        self
    }

    /// Routing value.
    pub fn routing(&self) -> Result<String> {
        ROUTING.get(self.bag())
    }

    /// Set the routing value.
    pub fn set_routing(&mut self, routing: impl Into<String>) -> &mut Self {
        ROUTING.set(self.bag_mut(), routing);
        self
    }

    header_field!(allow_no_indices, set_allow_no_indices, ALLOW_NO_INDICES, bool,
        "Whether a wildcard matching nothing is an error.");
    header_field!(ccs_minimize_roundtrips, set_ccs_minimize_roundtrips, CCS_MINIMIZE_ROUNDTRIPS, bool,
        "Minimize round trips for cross-cluster search.");
    header_field!(expand_wildcards, set_expand_wildcards, EXPAND_WILDCARDS, ExpandWildcards,
        "Index states wildcards expand to.");
    header_field!(ignore_throttled, set_ignore_throttled, IGNORE_THROTTLED, bool,
        "Skip frozen indices.");
    header_field!(ignore_unavailable, set_ignore_unavailable, IGNORE_UNAVAILABLE, bool,
        "Skip missing or closed indices.");
    header_field!(max_concurrent_searches, set_max_concurrent_searches, MAX_CONCURRENT_SEARCHES, i64,
        "Concurrent searches the batch may run.");
    header_field!(max_concurrent_shard_requests, set_max_concurrent_shard_requests,
        MAX_CONCURRENT_SHARD_REQUESTS, i64, "Concurrent shard requests per node.");
    header_field!(pre_filter_shard_size, set_pre_filter_shard_size, PRE_FILTER_SHARD_SIZE, i64,
        "Shard count above which a pre-filter round runs.");
    header_field!(rest_total_hits_as_int, set_rest_total_hits_as_int, REST_TOTAL_HITS_AS_INT, bool,
        "Report total hits as a plain integer.");
    header_field!(search_type, set_search_type, SEARCH_TYPE, SearchType,
        "Scoring strategy.");
    header_field!(typed_keys, set_typed_keys, TYPED_KEYS, bool,
        "Prefix aggregation names with their type.");
}

/// Accumulates header/body pairs for `_msearch`.
///
/// Every header is immediately followed by its body; the payload is
/// newline-delimited JSON and ends with a newline.
#[derive(Debug, Clone, Default)]
pub struct MultiSearchDsl {
    lines: Vec<String>,
}

impl MultiSearchDsl {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a search with a prebuilt body.
    pub fn add(&mut self, header: &MultiSearchHeader, query: &SearchDsl) -> &mut Self {
        self.lines.push(header.to_value().to_string());
        self.lines.push(query.to_json());
        self
    }

    /// Add a search whose body is built by `block`.
    pub fn add_with(
        &mut self,
        header: &MultiSearchHeader,
        block: impl FnOnce(&mut SearchDsl),
    ) -> &mut Self {
        let mut query = SearchDsl::new();
        block(&mut query);
        self.add(header, &query)
    }

    /// Build a header for a later [`MultiSearchDsl::with_query`].
    pub fn header(&self, block: impl FnOnce(&mut MultiSearchHeader)) -> MultiSearchHeader {
        let mut header = MultiSearchHeader::new();
        block(&mut header);
        header
    }

    /// Pair `header` with a body built by `block`.
    pub fn with_query(
        &mut self,
        header: MultiSearchHeader,
        block: impl FnOnce(&mut SearchDsl),
    ) -> &mut Self {
        self.add_with(&header, block)
    }

    /// Add a search with an empty header.
    pub fn with_default_header(&mut self, block: impl FnOnce(&mut SearchDsl)) -> &mut Self {
        self.add_with(&MultiSearchHeader::new(), block)
    }

    /// Number of searches in the batch.
    pub fn len(&self) -> usize {
        self.lines.len() / 2
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// NDJSON payload with a trailing newline.
    pub fn request_body(&self) -> String {
        let mut body = self.lines.join("\n");
        body.push('\n');
        body
    }
}

impl fmt::Display for MultiSearchDsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.request_body())
    }
}
