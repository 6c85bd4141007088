//! In-memory branch record store.
//!
//! Keyed by the absolute URL of a branch's detail page. Branch stubs are
//! created by the listing handler; staff rosters arrive later from about
//! pages and are merged under the same key.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{Branch, Person};

/// Mutex-guarded map of branch records accumulated during a crawl.
#[derive(Debug, Default)]
pub struct BranchStore {
    inner: Mutex<HashMap<String, Branch>>,
}

impl BranchStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Branch>> {
        // The map is never left logically torn by a panicking writer, so a
        // poisoned lock is safe to recover.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace the branch stored under `key`.
    pub fn upsert(&self, key: &str, branch: Branch) {
        self.lock().insert(key.to_string(), branch);
    }

    /// Replace the staff roster of the branch under `key`. Returns whether
    /// a branch existed to merge into.
    ///
    /// A missing key is a no-op: the about page was reached without a
    /// corresponding listing entry. The dropped roster is logged rather
    /// than buffered.
    pub fn attach_staff(&self, key: &str, staff: Vec<Person>) -> bool {
        let mut map = self.lock();
        match map.get_mut(key) {
            Some(branch) => {
                branch.staff = staff;
                true
            }
            None => {
                log::warn!(
                    "Dropping staff roster ({} entries) for unknown branch {}",
                    staff.len(),
                    key
                );
                false
            }
        }
    }

    /// Number of branches currently stored.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no branches have been stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clone out all branch records. Order is unspecified, matching the
    /// non-deterministic completion order of the crawl.
    pub fn snapshot(&self) -> Vec<Branch> {
        self.lock().values().cloned().collect()
    }
}
