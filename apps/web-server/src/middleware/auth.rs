//! Session extraction.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::convert::Infallible;
use std::future::{Ready, ready};

use yatube_core::domain::Principal;
use yatube_core::ports::{AuthError, TokenService};

use crate::state::AppState;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "yatube_session";

/// The logged-in user, if any.
///
/// Never rejects a request: a missing, expired or forged session simply
/// yields an anonymous visitor.
/// ```ignore
/// async fn page(identity: OptionalIdentity) -> impl Responder {
///     match identity.principal() { ... }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<Principal>);

impl OptionalIdentity {
    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }
}

/// Session token from the cookie, or from an `Authorization: Bearer` header.
fn session_token(req: &HttpRequest) -> Result<String, AuthError> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Ok(cookie.value().to_string());
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

fn authenticate(req: &HttpRequest, tokens: &dyn TokenService) -> Result<Principal, AuthError> {
    let token = session_token(req)?;
    tokens.validate_token(&token).map(Principal::from)
}

impl FromRequest for OptionalIdentity {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Ok(OptionalIdentity(None)));
        };

        match authenticate(req, state.tokens.as_ref()) {
            Ok(principal) => ready(Ok(OptionalIdentity(Some(principal)))),
            Err(AuthError::MissingAuth) => ready(Ok(OptionalIdentity(None))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session");
                ready(Ok(OptionalIdentity(None)))
            }
        }
    }
}
