//! Admin session handed to the screens.
//!
//! Screens never read a global "is admin" flag. They get an [`AdminSession`]
//! at construction and ask it; the session defers to whatever
//! [`AccessPolicy`] it was built with.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Route unauthenticated users are sent to
pub const LOGIN_ROUTE: &str = "/login";

/// Capability check behind the session
pub trait AccessPolicy: Send + Sync {
    fn is_admin(&self) -> bool;

    /// Drop the capability. Policies that cannot be revoked ignore this.
    fn revoke(&self) {}
}

/// Policy backed by a plain flag, set once at sign-in
#[derive(Debug, Default)]
pub struct StaticAccess {
    granted: AtomicBool,
}

impl StaticAccess {
    pub fn new(granted: bool) -> Self {
        Self {
            granted: AtomicBool::new(granted),
        }
    }
}

impl AccessPolicy for StaticAccess {
    fn is_admin(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn revoke(&self) {
        self.granted.store(false, Ordering::SeqCst);
    }
}

/// The session was not allowed to open a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied {
    /// Where the caller should navigate instead
    pub redirect: &'static str,
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Admin access required, redirecting to {}", self.redirect)
    }
}

impl std::error::Error for AccessDenied {}

#[derive(Clone)]
pub struct AdminSession {
    policy: Arc<dyn AccessPolicy>,
}

impl AdminSession {
    pub fn new(policy: Arc<dyn AccessPolicy>) -> Self {
        Self { policy }
    }

    /// Session backed by a [`StaticAccess`] flag
    pub fn with_flag(granted: bool) -> Self {
        Self::new(Arc::new(StaticAccess::new(granted)))
    }

    pub fn is_admin(&self) -> bool {
        self.policy.is_admin()
    }

    pub fn require_admin(&self) -> Result<(), AccessDenied> {
        if self.policy.is_admin() {
            Ok(())
        } else {
            tracing::warn!("Admin screen requested without admin access");
            Err(AccessDenied {
                redirect: LOGIN_ROUTE,
            })
        }
    }

    /// Sign out and return the route to show next
    pub fn sign_out(&self) -> &'static str {
        self.policy.revoke();
        tracing::info!("Admin signed out");
        LOGIN_ROUTE
    }
}

impl fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSession")
            .field("is_admin", &self.is_admin())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_session_gate() {
        assert!(AdminSession::with_flag(true).require_admin().is_ok());

        let denied = AdminSession::with_flag(false).require_admin().unwrap_err();
        assert_eq!(denied.redirect, "/login");
    }

    #[test]
    fn test_sign_out_revokes_shared_policy() {
        let session = AdminSession::with_flag(true);
        let other_view = session.clone();

        assert_eq!(session.sign_out(), LOGIN_ROUTE);
        assert!(!other_view.is_admin());
    }

    struct AlwaysAdmin;

    impl AccessPolicy for AlwaysAdmin {
        fn is_admin(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_irrevocable_policy_survives_sign_out() {
        let session = AdminSession::new(Arc::new(AlwaysAdmin));
        session.sign_out();
        assert!(session.is_admin());
    }
}
