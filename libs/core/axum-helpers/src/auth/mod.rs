//! Authentication middleware.

pub mod bearer;

pub use bearer::{AuthPrincipal, bearer_auth_middleware};
