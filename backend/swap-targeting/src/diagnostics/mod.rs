//! Development diagnostics.
//!
//! Targeting calls have been seen to fail authentication while the standard
//! endpoints accept the same token, which the browser surfaced as a logout.
//! [`AuthDiagnosticSession`] probes both kinds of endpoint with one token and
//! records where they disagree.

pub mod auth_session;
pub mod token;

pub use auth_session::{
    AuthDiagnosticSession, DiagnosticReport, EndpointComparison, EndpointKind, ProbeEndpoint,
    ProbeResult,
};
pub use token::{inspect_token, JwtClaims, TokenInspection};
