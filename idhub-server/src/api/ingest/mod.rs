pub mod ingest;
pub mod ingest_request;
pub mod ingest_response;
