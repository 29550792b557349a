pub mod change_request;
pub mod change_request_status;
pub mod identity;
pub mod local_user;
pub mod membership;
pub mod patch_field;
pub mod site_registration;
pub mod sync_job;
pub mod sync_status;
pub mod user_record;
