//! Admin route gate: no admin data is fetched until the profile says admin.

use std::future::Future;

use tracing::{debug, warn};

use super::SessionContext;
use crate::error::ClientError;
use crate::model::Profile;

pub const ADMIN_PREFIX: &str = "/admin";
pub const HOME: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(String),
}

pub fn is_admin_route(path: &str) -> bool {
    path == ADMIN_PREFIX
        || path
            .strip_prefix(ADMIN_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub struct AdminGate;

impl AdminGate {
    /// Decide whether the signed-in user may open an admin page.
    ///
    /// Without a token the answer is a redirect and `load_profile` is never
    /// called. Otherwise the profile of the stored user decides; a refused
    /// profile request also redirects, any other failure is returned.
    pub async fn check<F, Fut>(session: &SessionContext, load_profile: F) -> Result<GateDecision, ClientError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Profile, ClientError>>,
    {
        let current = session.current()?;
        if !current.is_authenticated() {
            debug!("no session token, redirecting away from admin");
            return Ok(GateDecision::Redirect(HOME.to_string()));
        }
        let Some(user_id) = current.user_id else {
            warn!("session token without user id, redirecting away from admin");
            return Ok(GateDecision::Redirect(HOME.to_string()));
        };

        match load_profile(user_id).await {
            Ok(profile) => {
                session.set_admin(profile.is_admin)?;
                if profile.is_admin {
                    Ok(GateDecision::Allow)
                } else {
                    debug!("profile is not admin, redirecting");
                    Ok(GateDecision::Redirect(HOME.to_string()))
                }
            }
            Err(ClientError::Unauthorized(reason)) => {
                warn!(%reason, "profile request refused, redirecting");
                Ok(GateDecision::Redirect(HOME.to_string()))
            }
            Err(err) => Err(err),
        }
    }
}

/// Gate `path` if it is an admin route; every other route is allowed as is.
pub async fn guard_route<F, Fut>(
    path: &str,
    session: &SessionContext,
    load_profile: F,
) -> Result<GateDecision, ClientError>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<Profile, ClientError>>,
{
    if !is_admin_route(path) {
        return Ok(GateDecision::Allow);
    }
    AdminGate::check(session, load_profile).await
}
