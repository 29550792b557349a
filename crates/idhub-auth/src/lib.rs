pub mod error;
pub mod site_authorizer;

pub use error::{AuthError, Result};
pub use site_authorizer::{CallerHeaders, authorize_brand, authorize_governing, constant_time_eq};

#[cfg(test)]
mod tests;
