use crate::decision::{Decision, Denial};

/// Structured logging of authorization decisions.
///
/// `DecisionLog` is created per request by the
/// [`Authorizer`](crate::Authorizer) and attaches the caller and request path
/// to every event it emits. Grants and ordinary denials are logged at debug
/// level; a denial caused by the node inventory being unavailable is logged
/// as a warning, since it may lock out legitimate callers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DecisionLog<'a> {
    principal: &'a str,
    path: &'a str,
}

impl<'a> DecisionLog<'a> {
    pub(crate) fn new(principal: &'a str, path: &'a str) -> Self {
        Self { principal, path }
    }

    /// Logs `decision` and returns it.
    pub(crate) fn record(&self, decision: Decision) -> Decision {
        match &decision {
            Decision::TrustedService => self.granted("trusted_service"),
            Decision::Owner => self.granted("owner"),
            Decision::Denied(denial) => self.denied(denial),
        }
        decision
    }

    fn granted(&self, reason: &'static str) {
        tracing::debug!(
            principal = %self.principal,
            path = %self.path,
            reason,
            "access granted"
        );
    }

    fn denied(&self, denial: &Denial) {
        let hostname = denial.hostname().unwrap_or_default();
        match denial {
            Denial::InventoryUnavailable { message, .. } => tracing::warn!(
                principal = %self.principal,
                path = %self.path,
                hostname,
                error = %message,
                "node inventory unavailable, access denied"
            ),
            _ => tracing::debug!(
                principal = %self.principal,
                path = %self.path,
                hostname,
                reason = denial.reason(),
                "access denied"
            ),
        }
    }
}
