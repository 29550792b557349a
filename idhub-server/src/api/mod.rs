pub mod brand_requests;
pub mod decisions;
pub mod error;
pub mod extractors;
pub mod identities;
pub mod ingest;
pub mod local_users;
pub mod profile_requests;
pub mod sites;
