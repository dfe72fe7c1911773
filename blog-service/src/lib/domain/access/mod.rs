//! Authentication and authorization.
//!
//! Two [`ports::AuthStrategy`] implementations turn raw credentials into an
//! [`models::AuthenticatedContext`]:
//! - [`credentials::CredentialVerifier`] checks a username and password (login)
//! - [`bearer::RequestAuthenticator`] checks the bearer token of a request
//!
//! [`gate::AuthorizationGate`] wraps protected operations with a strategy, and
//! [`gate::ensure_owner`] is the ownership check applied before mutations.

pub mod bearer;
pub mod credentials;
pub mod errors;
pub mod gate;
pub mod models;
pub mod ports;
