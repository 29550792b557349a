pub mod backfill_response;
pub mod create_user_request;
pub mod edit_profile_request;
pub mod edit_profile_response;
pub mod local_users;
pub mod user_response;
