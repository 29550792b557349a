mod change_request_repository_tests;
mod identity_repository_tests;
mod local_user_repository_tests;
mod site_registration_repository_tests;
mod sync_job_repository_tests;
mod sync_status_repository_tests;
