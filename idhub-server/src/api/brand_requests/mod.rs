pub mod brand_request_dto;
pub mod brand_requests;
pub mod list_query;
pub mod list_response;
