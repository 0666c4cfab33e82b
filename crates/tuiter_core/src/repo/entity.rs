//! Generic single-entity CRUD contract.
//!
//! # Responsibility
//! - Give every referenced entity type the same access vocabulary.
//! - Provide batch lookup by id, which the like service uses to expand
//!   foreign references.
//!
//! # Invariants
//! - Only `update_by_id` reports `NotFound`; other misses are empty/zero.
//! - `delete_by_filter` removes at most the first matching row.

use super::RepoResult;
use std::collections::HashMap;
use std::hash::Hash;

/// CRUD over one entity table, parameterized by typed id, patch and filter.
pub trait EntityRepository {
    type Entity;
    type Id: Copy + Eq + Hash;
    /// Partial field set merged by `update_by_id`.
    type Patch;
    /// Closed set of lookup predicates.
    type Filter;

    fn find_all(&self) -> RepoResult<Vec<Self::Entity>>;
    fn find_by_id(&self, id: Self::Id) -> RepoResult<Option<Self::Entity>>;
    /// Resolves many ids in one pass. Missing ids are simply absent.
    fn find_by_ids(&self, ids: &[Self::Id]) -> RepoResult<HashMap<Self::Id, Self::Entity>>;
    fn find_one(&self, filter: &Self::Filter) -> RepoResult<Option<Self::Entity>>;
    fn create(&self, entity: &Self::Entity) -> RepoResult<Self::Entity>;
    /// Merges `patch` into the stored entity and returns the result.
    fn update_by_id(&self, id: Self::Id, patch: &Self::Patch) -> RepoResult<Self::Entity>;
    fn delete_by_id(&self, id: Self::Id) -> RepoResult<usize>;
    fn delete_by_filter(&self, filter: &Self::Filter) -> RepoResult<usize>;
    fn delete_all(&self) -> RepoResult<usize>;
}
