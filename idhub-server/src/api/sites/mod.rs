pub mod register_site_request;
pub mod site_response;
pub mod sites;
