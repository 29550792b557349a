pub mod error;
pub mod node_client;
pub mod types;

pub use error::{ClientError, Result};
pub use node_client::NodeClient;
pub use types::{DecisionAck, IngestAck, RemoteChangeRequest, RemoteRequestPage};
