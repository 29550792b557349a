pub mod decision_request;
pub mod decision_response;
pub mod decisions;
