pub mod error;
pub mod repositories;

#[cfg(test)]
mod tests;

pub use error::{DbError, Result};
pub use repositories::change_request_repository::{ChangeRequestRepository, RequestFilter};
pub use repositories::identity_repository::IdentityRepository;
pub use repositories::local_user_repository::LocalUserRepository;
pub use repositories::site_registration_repository::SiteRegistrationRepository;
pub use repositories::sync_job_repository::SyncJobRepository;
pub use repositories::sync_status_repository::SyncStatusRepository;
