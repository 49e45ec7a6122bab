//! Field collapsing and inner hits.

use crate::bag::DslObject;
use crate::error::Result;
use crate::field::{Field, ObjectField};
use crate::sort::{SortBuilder, write_sort};

crate::dsl_object! {
    /// `collapse` section of a search body.
    pub struct Collapse: SnakeCase;
}

crate::dsl_object! {
    /// `inner_hits` of a collapse.
    pub struct InnerHits: SnakeCase;
}

const FIELD: Field<String> = Field::new("field");
const INNER_HITS: ObjectField<InnerHits> = ObjectField::new("innerHits");

const NAME: Field<String> = Field::new("name");
const RESULT_SIZE: Field<i64> = Field::new("resultSize").wire("size");
const NESTED_COLLAPSE: ObjectField<Collapse> = ObjectField::new("collapse");
const MAX_CONCURRENT_GROUP_SEARCHES: Field<i64> = Field::new("maxConcurrentGroupSearches");

impl Collapse {
    /// Collapse on `field`.
    pub fn on(field: impl Into<String>) -> Self {
        let mut collapse = Self::new();
        collapse.set_field(field);
        collapse
    }

    /// Field results are collapsed on.
    pub fn field(&self) -> Result<String> {
        FIELD.get(self.bag())
    }

    /// Set the field results are collapsed on.
    pub fn set_field(&mut self, field: impl Into<String>) -> &mut Self {
        FIELD.set(self.bag_mut(), field);
        self
    }

    /// Copy of the inner hits section.
    pub fn inner_hits(&self) -> Result<InnerHits> {
        INNER_HITS.get(self.bag())
    }

    /// Store a copy of `inner_hits`.
    pub fn set_inner_hits(&mut self, inner_hits: &InnerHits) -> &mut Self {
        INNER_HITS.set(self.bag_mut(), inner_hits);
        self
    }

    /// Build a fresh inner hits section called `name` and attach it.
    pub fn with_inner_hits(
        &mut self,
        name: impl Into<String>,
        block: impl FnOnce(&mut InnerHits),
    ) -> &mut Self {
        let mut inner_hits = InnerHits::named(name);
        block(&mut inner_hits);
        self.set_inner_hits(&inner_hits)
    }
}

impl InnerHits {
    /// Inner hits called `name`.
    pub fn named(name: impl Into<String>) -> Self {
        let mut inner_hits = Self::new();
        inner_hits.set_name(name);
        inner_hits
    }

    /// Name of the inner hits section in the response.
    pub fn name(&self) -> Result<String> {
        NAME.get(self.bag())
    }

    /// Set the name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        NAME.set(self.bag_mut(), name);
        self
    }

    /// Hits returned per group (`size`).
    pub fn result_size(&self) -> Result<i64> {
        RESULT_SIZE.get(self.bag())
    }

    /// Set hits returned per group.
    pub fn set_result_size(&mut self, size: i64) -> &mut Self {
        RESULT_SIZE.set(self.bag_mut(), size);
        self
    }

    /// Parallel group searches.
    pub fn max_concurrent_group_searches(&self) -> Result<i64> {
        MAX_CONCURRENT_GROUP_SEARCHES.get(self.bag())
    }

    /// Set parallel group searches.
    pub fn set_max_concurrent_group_searches(&mut self, searches: i64) -> &mut Self {
        MAX_CONCURRENT_GROUP_SEARCHES.set(self.bag_mut(), searches);
        self
    }

    /// Copy of the second-level collapse, if any.
    pub fn collapse(&self) -> Result<Option<Collapse>> {
        NESTED_COLLAPSE.get_opt(self.bag())
    }

    /// Collapse the inner hits again on `field`.
    pub fn with_collapse(
        &mut self,
        field: impl Into<String>,
        block: impl FnOnce(&mut Collapse),
    ) -> &mut Self {
        let mut collapse = Collapse::on(field);
        block(&mut collapse);
        NESTED_COLLAPSE.set(self.bag_mut(), &collapse);
        self
    }

    /// Sort the hits within each group.
    pub fn sort(&mut self, block: impl FnOnce(&mut SortBuilder)) -> &mut Self {
        write_sort(self.bag_mut(), block);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{SortField, SortOrder};
    use crate::DslError;
    use serde_json::json;

    #[test]
    fn test_field_only() {
        let collapse = Collapse::on("user.id");
        assert_eq!(collapse.to_value(), json!({"field": "user.id"}));
        assert_eq!(collapse.field().unwrap(), "user.id");
        assert!(matches!(
            collapse.inner_hits(),
            Err(DslError::MissingProperty { .. })
        ));
    }

    #[test]
    fn test_nested_inner_hits_collapse() {
        let mut collapse = Collapse::on("user.id");
        collapse.with_inner_hits("by_location", |ih| {
            ih.set_result_size(3)
                .with_collapse("user.location", |_| {})
                .set_max_concurrent_group_searches(4);
        });

        assert_eq!(
            serde_json::to_string(&collapse).unwrap(),
            r#"{"field":"user.id","inner_hits":{"name":"by_location","size":3,"collapse":{"field":"user.location"},"max_concurrent_group_searches":4}}"#
        );

        let inner = collapse.inner_hits().unwrap();
        assert_eq!(inner.name().unwrap(), "by_location");
        assert_eq!(inner.result_size().unwrap(), 3);
        assert_eq!(inner.max_concurrent_group_searches().unwrap(), 4);
        assert_eq!(
            inner.collapse().unwrap().unwrap().field().unwrap(),
            "user.location"
        );
    }

    #[test]
    fn test_inner_hits_assignment_is_a_copy() {
        let mut inner = InnerHits::named("latest");
        let mut collapse = Collapse::on("thread");
        collapse.set_inner_hits(&inner);

        inner.set_result_size(10);
        assert!(collapse.inner_hits().unwrap().result_size().is_err());

        collapse.set_inner_hits(&inner);
        assert_eq!(collapse.inner_hits().unwrap().result_size().unwrap(), 10);
    }

    #[test]
    fn test_inner_hits_sort() {
        let mut inner = InnerHits::named("recent");
        inner.sort(|s| {
            s.add(SortField::new("date").order(SortOrder::Asc));
        });
        assert_eq!(
            inner.to_value(),
            json!({"name": "recent", "sort": [{"date": {"order": "ASC"}}]})
        );
    }
}
