//! Observability sink for authentication events
//!
//! Claim rejections indicate attack attempts or clock/config drift; hook
//! outcomes distinguish "declined access" from "faulted". Deployments inject
//! their own sink for metrics; the default reports through `tracing`.

use tracing::{error, info, warn};
use wl_oidc::ClaimError;
use wl_types::AppError;

pub trait AuthObserver: Send + Sync {
    /// A token failed one of the ordered claim checks.
    fn claim_rejected(&self, reason: &ClaimError);

    /// The login hook deliberately denied access.
    fn hook_declined(&self, sub: &str);

    /// The login hook returned an error; the pre-hook session was kept.
    fn hook_faulted(&self, error: &AppError);
}

/// Default sink backed by `tracing`.
pub struct TracingObserver;

impl AuthObserver for TracingObserver {
    fn claim_rejected(&self, reason: &ClaimError) {
        warn!("ID token rejected: {}", reason.message());
    }

    fn hook_declined(&self, sub: &str) {
        info!("login hook denied access for {}", sub);
    }

    fn hook_faulted(&self, error: &AppError) {
        error!("login hook faulted: {}", error);
    }
}
