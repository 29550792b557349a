pub mod diff;
pub mod error;
pub mod models;
pub mod normalize;


pub use diff::{ProposedProfile, compute_profile_diff};
pub use error::{CoreError, ErrorLocation, Result};
pub use models::change_request::{ChangeRequest, FieldChange};
pub use models::change_request_status::ChangeRequestStatus;
pub use models::identity::{DeduplicatedIdentity, IdentityFilter};
pub use models::local_user::LocalUser;
pub use models::membership::SiteMembership;
pub use models::patch_field::PatchField;
pub use models::site_registration::SiteRegistration;
pub use models::sync_job::{SyncAction, SyncJob};
pub use models::sync_status::SyncStatus;
pub use models::user_record::{UserRecord, is_well_formed_email};
pub use normalize::{normalize_site_url, urls_match};
