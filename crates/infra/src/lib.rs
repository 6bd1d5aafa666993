//! Infrastructure layer: database access, refresh cycle, configuration.

pub mod config;
pub mod fetch;
pub mod refresh;
pub mod runner;
pub mod snapshot_store;
pub mod source;

pub use config::{ConfigError, DashboardConfig};
pub use refresh::{refresh_snapshot, RefreshOutcome, RefreshReport, RefreshSettings, SectionFailure};
pub use runner::{RefreshRunner, RefreshRunnerHandle, Refresher};
pub use snapshot_store::{RefreshNotice, SnapshotStore};
pub use source::{DashboardSource, InMemoryDashboardSource, PostgresDashboardSource, SourceError, Table};
