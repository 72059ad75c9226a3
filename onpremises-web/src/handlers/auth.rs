use crate::security::session::sign_out;
use axum::response::{IntoResponse, Redirect};
use tower_sessions::Session;

pub async fn sign_out_handler(session: Session) -> impl IntoResponse {
    sign_out(&session).await;
    tracing::info!("Session cleared");
    Redirect::to("/")
}
