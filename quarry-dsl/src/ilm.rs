//! Index lifecycle management policy builders.
//!
//! A policy body has the shape
//! `{"policy": {"phases": {"hot": {"min_age": "0s", "actions": {...}}}}}`.
//! Every action is a single-key clause merged into the phase's `actions`
//! object.

use crate::bag::{DslObject, PropertyBag};
use crate::error::{DslError, Result};
use crate::field::{Field, ObjectField, encode_duration};
use crate::query::{EsQuery, custom_query};
use serde_json::Value;
use std::time::Duration;

crate::dsl_object! {
    /// Actions run in a phase.
    pub struct IlmActions: SnakeCase;
}

crate::dsl_object! {
    /// Configuration of one lifecycle phase.
    pub struct IlmPhaseConfiguration: SnakeCase;
}

crate::dsl_object! {
    /// Phases keyed by name.
    pub struct IlmPhases: SnakeCase;
}

crate::dsl_object! {
    /// The `policy` object.
    pub struct IlmPolicy: SnakeCase;
}

crate::dsl_object! {
    /// Request body for `PUT _ilm/policy/{id}`.
    pub struct IlmConfiguration: SnakeCase;
}

impl IlmActions {
    /// Add `action`, replacing an earlier action of the same kind.
    pub fn action(&mut self, action: EsQuery) -> &mut Self {
        let (kind, params) = (action.kind().to_string(), action.params().to_value());
        self.bag_mut().insert(kind, params);
        self
    }

    /// Roll over once the primary shard reaches `max_primary_shard_size_gb`.
    pub fn roll_over(&mut self, max_primary_shard_size_gb: u32) -> &mut Self {
        self.action(custom_query("rollover", |p| {
            p.insert(
                "max_primary_shard_size",
                format!("{}gb", max_primary_shard_size_gb),
            );
        }))
    }

    /// Shrink to `number_of_shards` primaries.
    pub fn shrink(&mut self, number_of_shards: u32) -> &mut Self {
        self.action(custom_query("shrink", |p| {
            p.insert("number_of_shards", number_of_shards);
        }))
    }

    /// Force merge down to `number_of_segments` segments.
    pub fn force_merge(&mut self, number_of_segments: u32) -> &mut Self {
        self.action(custom_query("forcemerge", |p| {
            p.insert("max_num_segments", number_of_segments);
        }))
    }

    /// Delete the index.
    pub fn delete(&mut self) -> &mut Self {
        self.action(EsQuery::new("delete"))
    }

    /// Read back the action of `kind`.
    pub fn get(&self, kind: &str) -> Option<EsQuery> {
        let params = self.bag().get(kind)?;
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(kind.to_string(), params.clone());
        EsQuery::from_value(kind, &serde_json::Value::Object(wrapper)).ok()
    }
}

const MIN_AGE: Field<String> = Field::new("minAge");
const ACTIONS: ObjectField<IlmActions> = ObjectField::new("actions").with_default(IlmActions::new);

impl IlmPhaseConfiguration {
    /// Age at which the index enters the phase, as sent.
    pub fn min_age(&self) -> Result<String> {
        MIN_AGE.get(self.bag())
    }

    /// Set the minimum age literally, e.g. `"30d"`.
    pub fn set_min_age(&mut self, min_age: impl Into<String>) -> &mut Self {
        MIN_AGE.set(self.bag_mut(), min_age);
        self
    }

    /// Set the minimum age from a duration, in days, hours or seconds.
    pub fn set_min_age_duration(&mut self, min_age: Duration) -> &mut Self {
        self.set_min_age(encode_duration(min_age))
    }

    /// Copy of the phase's actions.
    pub fn actions(&self) -> Result<IlmActions> {
        ACTIONS.get(self.bag())
    }

    /// Add actions to the phase.
    pub fn with_actions(&mut self, block: impl FnOnce(&mut IlmActions)) -> Result<&mut Self> {
        ACTIONS.update(self.bag_mut(), |actions| {
            block(actions);
            Ok(())
        })?;
        Ok(self)
    }
}

impl IlmPhases {
    fn phase(
        &mut self,
        name: &str,
        block: impl FnOnce(&mut IlmPhaseConfiguration) -> Result<()>,
    ) -> Result<&mut Self> {
        let mut phase = IlmPhaseConfiguration::new();
        block(&mut phase)?;
        self.bag_mut().insert(name, phase);
        Ok(self)
    }

    /// Configure the `hot` phase.
    pub fn hot(
        &mut self,
        block: impl FnOnce(&mut IlmPhaseConfiguration) -> Result<()>,
    ) -> Result<&mut Self> {
        self.phase("hot", block)
    }

    /// Configure the `warm` phase.
    pub fn warm(
        &mut self,
        block: impl FnOnce(&mut IlmPhaseConfiguration) -> Result<()>,
    ) -> Result<&mut Self> {
        self.phase("warm", block)
    }

    /// Configure the `cold` phase.
    pub fn cold(
        &mut self,
        block: impl FnOnce(&mut IlmPhaseConfiguration) -> Result<()>,
    ) -> Result<&mut Self> {
        self.phase("cold", block)
    }

    /// Configure the `frozen` phase.
    pub fn frozen(
        &mut self,
        block: impl FnOnce(&mut IlmPhaseConfiguration) -> Result<()>,
    ) -> Result<&mut Self> {
        self.phase("frozen", block)
    }

    /// Configure the `delete` phase.
    pub fn delete(
        &mut self,
        block: impl FnOnce(&mut IlmPhaseConfiguration) -> Result<()>,
    ) -> Result<&mut Self> {
        self.phase("delete", block)
    }

    /// Copy of the phase called `name`.
    pub fn get(&self, name: &str) -> Result<Option<IlmPhaseConfiguration>> {
        match self.bag().get(name) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(IlmPhaseConfiguration::from_bag(
                PropertyBag::from_map(IlmPhaseConfiguration::convention(), map.clone()),
            ))),
            Some(_) => Err(DslError::UnexpectedType {
                key: name.to_string(),
                expected: "an object",
            }),
        }
    }
}

const PHASES: ObjectField<IlmPhases> = ObjectField::new("phases").with_default(IlmPhases::new);
const POLICY: ObjectField<IlmPolicy> = ObjectField::new("policy").with_default(IlmPolicy::new);

impl IlmPolicy {
    /// Copy of the phases.
    pub fn phases(&self) -> Result<IlmPhases> {
        PHASES.get(self.bag())
    }

    /// Configure phases in place.
    pub fn with_phases<R>(&mut self, block: impl FnOnce(&mut IlmPhases) -> Result<R>) -> Result<R> {
        PHASES.update(self.bag_mut(), block)
    }
}

impl IlmConfiguration {
    /// Build a policy body from a phases block.
    pub fn build(block: impl FnOnce(&mut IlmPhases) -> Result<()>) -> Result<Self> {
        let mut config = Self::new();
        config.with_phases(block)?;
        Ok(config)
    }

    /// Copy of the policy.
    pub fn policy(&self) -> Result<IlmPolicy> {
        POLICY.get(self.bag())
    }

    /// Configure the policy's phases in place.
    pub fn with_phases<R>(&mut self, block: impl FnOnce(&mut IlmPhases) -> Result<R>) -> Result<R> {
        POLICY.update(self.bag_mut(), |policy| policy.with_phases(block))
    }
}
