pub mod list_requests_query;
pub mod profile_requests;
