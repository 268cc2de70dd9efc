//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain service and remain testable without I/O.

use std::sync::Arc;

use crate::domain::IdentityService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// The identity orchestration service backing both endpoints.
    pub identity: Arc<IdentityService>,
}

impl HttpState {
    /// Construct state around a wired identity service.
    pub fn new(identity: IdentityService) -> Self {
        Self {
            identity: Arc::new(identity),
        }
    }
}
