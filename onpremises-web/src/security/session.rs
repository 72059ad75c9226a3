use super::{Authentication, User};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use tower_sessions::Session;

const USER_KEY: &str = "user";

/// Stores the signed-in user; the session id is cycled to prevent fixation.
pub async fn sign_in(session: &Session, user: &User) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(USER_KEY, user).await?;
    tracing::info!(username = %user.username, "User signed in");
    Ok(())
}

pub async fn sign_out(session: &Session) {
    session.clear().await;
}

/// A session with no stored user yields the anonymous placeholder.
pub async fn authentication_from_session(session: &Session) -> Authentication {
    match session.get::<User>(USER_KEY).await {
        Ok(Some(user)) => Authentication::for_user(user),
        Ok(None) => Authentication::anonymous(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read user from session");
            Authentication::anonymous()
        }
    }
}

/// Authentication resolved from the request's session; `None` when the request
/// carries no session layer at all.
pub struct SessionAuthentication(pub Option<Authentication>);

#[async_trait]
impl<S> FromRequestParts<S> for SessionAuthentication
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authentication = match Session::from_request_parts(parts, state).await {
            Ok(session) => Some(authentication_from_session(&session).await),
            Err(_) => None,
        };
        Ok(SessionAuthentication(authentication))
    }
}
