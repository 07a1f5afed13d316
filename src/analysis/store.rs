//! In-memory analysis job store
//!
//! This module holds the job records for the lifetime of the process. There
//! is deliberately no persistence: jobs vanish on restart.
//!
//! The store is the sole owner of the records. Every accessor returns a
//! clone, so callers can never mutate a stored job in place; all writes go
//! through [`JobStore::insert`] and [`JobStore::update`].

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::job::{AnalysisJob, JobStatus, JobUpdate};

/// Counts of stored jobs broken down by status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobStats {
    pub total: usize,
    pub completed: usize,
    pub analyzing: usize,
    pub failed: usize,
}

/// A keyed mapping from job id to job record
///
/// The handle is cheap to clone; all clones share the same underlying map.
/// The map is guarded by a mutex because job updates arrive from spawned
/// background tasks running on a multi-threaded runtime, and a partial-field
/// merge must not race with another writer.
///
/// The lock is never held across an await point, so contention is limited
/// to the map operations themselves.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<Mutex<HashMap<String, AnalysisJob>>>,
}

impl JobStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a job to the store, overwriting any record with the same id
    pub fn insert(&self, job: AnalysisJob) {
        let mut jobs = self.jobs.lock().unwrap();
        jobs.insert(job.id.clone(), job);
    }

    /// Returns a snapshot of the job with the given id, or `None` if absent
    ///
    /// An unknown id is a normal outcome, not an error.
    pub fn get(&self, id: &str) -> Option<AnalysisJob> {
        let jobs = self.jobs.lock().unwrap();
        jobs.get(id).cloned()
    }

    /// Returns true if a job with the given id exists
    pub fn exists(&self, id: &str) -> bool {
        let jobs = self.jobs.lock().unwrap();
        jobs.contains_key(id)
    }

    /// Returns a page of jobs, newest first
    ///
    /// All jobs are sorted by `created_at` descending (ties broken by id so
    /// the order is stable). With a `limit`, the slice
    /// `[offset.unwrap_or(0), offset + limit)` is returned; without one, the
    /// full sorted list is returned and `offset` is ignored. An offset past
    /// the end yields an empty page.
    pub fn list_page(&self, limit: Option<usize>, offset: Option<usize>) -> Vec<AnalysisJob> {
        let all = self.sorted_snapshot();

        match limit {
            Some(limit) => {
                let start = offset.unwrap_or(0).min(all.len());
                let end = start.saturating_add(limit).min(all.len());
                all[start..end].to_vec()
            }
            None => all,
        }
    }

    /// Returns all jobs with the given status, newest first
    pub fn find_by_status(&self, status: JobStatus) -> Vec<AnalysisJob> {
        let mut matching: Vec<AnalysisJob> = {
            let jobs = self.jobs.lock().unwrap();
            jobs.values()
                .filter(|job| job.status == status)
                .cloned()
                .collect()
        };

        sort_newest_first(&mut matching);
        matching
    }

    /// Merges a partial update into the job with the given id
    ///
    /// Only the update's `Some` fields are applied. Returns the merged
    /// snapshot, or `None` if the id is absent (a no-op, not an error).
    pub fn update(&self, id: &str, update: JobUpdate) -> Option<AnalysisJob> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(id)?;

        if let Some(status) = update.status {
            job.status = status;
        }
        if let Some(technologies) = update.technologies {
            job.technologies = technologies;
        }
        if let Some(link_count) = update.link_count {
            job.link_count = link_count;
        }
        if let Some(completed_at) = update.completed_at {
            job.completed_at = Some(completed_at);
        }
        if let Some(error) = update.error {
            job.error = Some(error);
        }

        Some(job.clone())
    }

    /// Removes the job with the given id, returning whether it existed
    pub fn delete(&self, id: &str) -> bool {
        let mut jobs = self.jobs.lock().unwrap();
        jobs.remove(id).is_some()
    }

    /// Returns the total number of stored jobs
    pub fn count(&self) -> usize {
        let jobs = self.jobs.lock().unwrap();
        jobs.len()
    }

    /// Returns per-status counts computed from one snapshot of the map
    pub fn stats(&self) -> JobStats {
        let jobs = self.jobs.lock().unwrap();

        let mut stats = JobStats {
            total: jobs.len(),
            completed: 0,
            analyzing: 0,
            failed: 0,
        };

        for job in jobs.values() {
            match job.status {
                JobStatus::Analyzing => stats.analyzing += 1,
                JobStatus::Completed => stats.completed += 1,
                JobStatus::Failed => stats.failed += 1,
            }
        }

        stats
    }

    /// Removes all jobs (test/admin reset)
    pub fn clear(&self) {
        let mut jobs = self.jobs.lock().unwrap();
        jobs.clear();
    }

    /// Clones every record and sorts the result newest first
    fn sorted_snapshot(&self) -> Vec<AnalysisJob> {
        let mut all: Vec<AnalysisJob> = {
            let jobs = self.jobs.lock().unwrap();
            jobs.values().cloned().collect()
        };

        sort_newest_first(&mut all);
        all
    }
}

/// Sorts jobs by `created_at` descending, ties broken by id
fn sort_newest_first(jobs: &mut [AnalysisJob]) {
    jobs.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
