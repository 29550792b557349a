pub mod identities;
pub mod identity_list_response;
pub mod list_identities_query;
