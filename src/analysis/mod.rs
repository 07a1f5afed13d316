//! Analysis module for Stacksight
//!
//! This module contains the core of the service:
//! - Job records and the forward-only status state machine
//! - The in-memory job store
//! - The runner that schedules and completes background analysis work
//! - The technology lookup and link counter collaborators

mod job;
mod links;
mod lookup;
mod runner;
mod store;

pub use job::{AnalysisJob, JobStatus, JobUpdate, Technology};
pub use links::LinkCounter;
pub use lookup::{lookup_from_config, ApiTechnologyLookup, MockTechnologyLookup, TechnologyLookup};
pub use runner::AnalysisService;
pub use store::{JobStats, JobStore};
