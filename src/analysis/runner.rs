//! Analysis job runner - orchestrates one analysis end to end
//!
//! The runner owns the submission path and the fire-and-forget background
//! work: create the record, return the id immediately, and let a spawned
//! task move the job to its terminal state while the client polls.
//!
//! Per job the state machine is `Analyzing -> Completed` on success and
//! `Analyzing -> Failed` on any lookup failure, each exactly once. There are
//! no retries, no cancellation, and no cap on the number of jobs analyzing
//! at the same time.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::job::{AnalysisJob, JobUpdate};
use super::links::LinkCounter;
use super::lookup::TechnologyLookup;
use super::store::JobStore;
use crate::url::normalize_url;

/// Orchestrates analysis jobs: submission, background work, terminal update
///
/// Cheap to clone; clones share the same store and collaborators. The
/// service is constructed once at startup and injected wherever jobs are
/// submitted or read - there is no global instance.
#[derive(Clone)]
pub struct AnalysisService {
    store: JobStore,
    lookup: Arc<dyn TechnologyLookup>,
    links: Arc<LinkCounter>,
    pacing_delay: Duration,
}

impl AnalysisService {
    /// Creates a new service around the given store and collaborators
    ///
    /// # Arguments
    ///
    /// * `store` - The job store this service writes to
    /// * `lookup` - Technology lookup collaborator
    /// * `links` - Link counter collaborator
    /// * `pacing_delay` - Fixed delay before background work begins
    pub fn new(
        store: JobStore,
        lookup: Arc<dyn TechnologyLookup>,
        links: Arc<LinkCounter>,
        pacing_delay: Duration,
    ) -> Self {
        Self {
            store,
            lookup,
            links,
            pacing_delay,
        }
    }

    /// Submits a new analysis job and returns its id immediately
    ///
    /// The raw URL is normalized, a record is inserted in the `Analyzing`
    /// state, and the completion work is spawned onto the runtime. The
    /// caller never waits on the analysis itself; results arrive via
    /// subsequent [`JobStore::get`] polls.
    ///
    /// Input validation belongs to the API boundary - by the time a URL
    /// reaches this method it is assumed well-formed.
    pub fn submit(&self, raw_url: &str) -> String {
        let url = normalize_url(raw_url);
        let id = Uuid::new_v4().to_string();

        self.store.insert(AnalysisJob::new(id.clone(), url.clone()));
        tracing::info!("analysis {} submitted for {}", id, url);

        let service = self.clone();
        let job_id = id.clone();
        tokio::spawn(async move {
            service.run_analysis(&job_id).await;
        });

        id
    }

    /// Returns the store this service writes to
    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Background completion work for one job
    ///
    /// Collaborator failures never escape this task: a lookup failure is
    /// recorded on the job as `Failed`, and link-count failures have already
    /// degraded to zero inside the counter.
    async fn run_analysis(&self, id: &str) {
        let Some(job) = self.store.get(id) else {
            // The submitter inserts before spawning, so a missing record
            // here is a programming error upstream.
            tracing::error!("analysis {} missing from store, aborting", id);
            return;
        };

        tokio::time::sleep(self.pacing_delay).await;

        match self.lookup.detect(&job.url).await {
            Ok(technologies) => {
                let link_count = self.links.count_links(&job.url).await;

                self.store
                    .update(id, JobUpdate::completed(technologies, link_count));
                tracing::info!("analysis {} completed ({} links)", id, link_count);
            }
            Err(e) => {
                let message = format!("{:#}", e);
                tracing::warn!("analysis {} failed: {}", id, message);

                self.store.update(id, JobUpdate::failed(message));
            }
        }
    }
}
