use crate::context::RequestContextEnricher;
use crate::models::PageModel;
use crate::security::{session::SessionAuthentication, Authentication};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::sync::Arc;

/// Applies the security headers and frame options to every page, and leaves the
/// nonce-bearing [`PageModel`] in the request extensions for [`PageRequest`].
pub async fn page_context_middleware(
    State(enricher): State<Arc<RequestContextEnricher>>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut model = PageModel::default();
    let mut security_headers = HeaderMap::new();

    enricher.apply_security_headers(&mut security_headers, &mut model);
    enricher.apply_frame_options_header(&request, &mut security_headers);
    enricher.apply_configuration(&mut model);

    request.extensions_mut().insert(model);

    let mut response = next.run(request).await;
    response.headers_mut().extend(security_headers);
    response
}

/// The page model prepared by [`page_context_middleware`] and the caller's authentication.
///
/// `authentication` is `None` when the request carries no session at all.
pub struct PageRequest {
    pub model: PageModel,
    pub authentication: Option<Authentication>,
}

#[async_trait]
impl<S> FromRequestParts<S> for PageRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let model = parts.extensions.remove::<PageModel>().unwrap_or_default();

        let SessionAuthentication(authentication) =
            SessionAuthentication::from_request_parts(parts, state).await?;

        Ok(PageRequest {
            model,
            authentication,
        })
    }
}
