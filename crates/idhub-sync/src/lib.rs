pub mod aggregator;
pub mod error;
pub mod gateway;
pub mod job_queue;
pub mod producer;
pub mod worker;
pub mod workflow;

pub use aggregator::{AggregatedPage, AggregatorQuery, NodeError, RequestAggregator};
pub use error::{Result, SyncError};
pub use gateway::{
    FailureNotifier, HttpHubGateway, HttpNodeGateway, HubGateway, LogNotifier, NodeGateway,
};
pub use job_queue::{JobQueue, SqliteJobQueue};
pub use producer::{BackfillReport, SyncProducer, UserDirectory};
pub use worker::SyncWorker;
pub use workflow::{ChangeRequestService, RaiseOutcome};
