//! Memoizing wrapper around a [`GitOracle`]
//!
//! Git queries are pure relative to a fixed repository state, so a single
//! invocation may cache every `(query, args)` pair. The cache is an explicit
//! per-invocation object rather than a process-global: callers that mutate the
//! repository between derivations (tests mostly) call [`CachedOracle::invalidate`]
//! or build a fresh instance.

use crate::core::error::StampResult;
use crate::core::vcs::{GitOracle, TagFact};
use std::cell::RefCell;
use std::collections::HashMap;

/// Caches every oracle query for the lifetime of one invocation.
pub struct CachedOracle<O> {
  inner: O,
  modifying: RefCell<HashMap<Vec<String>, Option<String>>>,
  tag_facts: RefCell<HashMap<String, TagFact>>,
  counts: RefCell<HashMap<String, u64>>,
  ancestry: RefCell<HashMap<(String, String), bool>>,
  resolved: RefCell<HashMap<String, Option<String>>>,
}

impl<O: GitOracle> CachedOracle<O> {
  pub fn new(inner: O) -> Self {
    Self {
      inner,
      modifying: RefCell::new(HashMap::new()),
      tag_facts: RefCell::new(HashMap::new()),
      counts: RefCell::new(HashMap::new()),
      ancestry: RefCell::new(HashMap::new()),
      resolved: RefCell::new(HashMap::new()),
    }
  }

  /// Drop all memoized answers.
  ///
  /// Required after the underlying repository state changes.
  #[allow(dead_code)] // Kept as API for callers testing successive repository states
  pub fn invalidate(&self) {
    self.modifying.borrow_mut().clear();
    self.tag_facts.borrow_mut().clear();
    self.counts.borrow_mut().clear();
    self.ancestry.borrow_mut().clear();
    self.resolved.borrow_mut().clear();
  }

  /// Unwrap the inner oracle.
  #[allow(dead_code)] // Kept as convenience API
  pub fn into_inner(self) -> O {
    self.inner
  }
}

impl<O: GitOracle> GitOracle for CachedOracle<O> {
  fn latest_commit_modifying(&self, paths: &[String]) -> StampResult<Option<String>> {
    if let Some(hit) = self.modifying.borrow().get(paths) {
      return Ok(hit.clone());
    }
    let answer = self.inner.latest_commit_modifying(paths)?;
    self.modifying.borrow_mut().insert(paths.to_vec(), answer.clone());
    Ok(answer)
  }

  fn latest_tag_and_count(&self, reference: &str) -> StampResult<TagFact> {
    if let Some(hit) = self.tag_facts.borrow().get(reference) {
      return Ok(hit.clone());
    }
    let answer = self.inner.latest_tag_and_count(reference)?;
    self.tag_facts.borrow_mut().insert(reference.to_string(), answer.clone());
    Ok(answer)
  }

  fn commit_count(&self, reference: &str) -> StampResult<u64> {
    if let Some(hit) = self.counts.borrow().get(reference) {
      return Ok(*hit);
    }
    let answer = self.inner.commit_count(reference)?;
    self.counts.borrow_mut().insert(reference.to_string(), answer);
    Ok(answer)
  }

  fn is_ancestor(&self, ancestor: &str, descendant: &str) -> StampResult<bool> {
    let key = (ancestor.to_string(), descendant.to_string());
    if let Some(hit) = self.ancestry.borrow().get(&key) {
      return Ok(*hit);
    }
    let answer = self.inner.is_ancestor(ancestor, descendant)?;
    self.ancestry.borrow_mut().insert(key, answer);
    Ok(answer)
  }

  fn resolve_commit(&self, reference: &str) -> StampResult<Option<String>> {
    if let Some(hit) = self.resolved.borrow().get(reference) {
      return Ok(hit.clone());
    }
    let answer = self.inner.resolve_commit(reference)?;
    self.resolved.borrow_mut().insert(reference.to_string(), answer.clone());
    Ok(answer)
  }
}
