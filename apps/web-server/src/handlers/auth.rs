//! Signup, login and logout pages.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, web};

use yatube_core::DomainError;
use yatube_core::services::Session;
use yatube_shared::{LoginForm, NextQuery, SignupForm};

use super::redirect;
use crate::middleware::{AppResult, SESSION_COOKIE};
use crate::state::AppState;
use crate::{urls, views};

const BAD_CREDENTIALS: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

fn session_cookie(session: &Session) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, session.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(session.expires_in))
        .finish()
}

/// Redirect that also starts the session.
fn logged_in(session: &Session, to: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((actix_web::http::header::LOCATION, to))
        .cookie(session_cookie(session))
        .finish()
}

/// GET /auth/signup/
pub async fn signup_form() -> HttpResponse {
    views::html(views::signup_page("", None))
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    form: web::Form<SignupForm>,
) -> AppResult<HttpResponse> {
    match state.accounts.signup(&form.username, &form.password).await {
        Ok(session) => Ok(logged_in(&session, urls::INDEX)),
        Err(DomainError::Validation(msg) | DomainError::Duplicate(msg)) => Ok(views::html(
            views::signup_page(&form.username, Some(&msg)),
        )),
        Err(e) => Err(e.into()),
    }
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    let next = urls::safe_next(query.next.as_deref());
    views::html(views::login_page("", next, None))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let next = urls::safe_next(form.next.as_deref());
    match state.accounts.login(&form.username, &form.password).await {
        Ok(session) => {
            tracing::info!(username = %session.principal.username, "User logged in");
            Ok(logged_in(&session, next))
        }
        Err(DomainError::Unauthorized) => Ok(views::html(views::login_page(
            &form.username,
            next,
            Some(BAD_CREDENTIALS),
        ))),
        Err(e) => Err(e.into()),
    }
}

/// GET /auth/logout/
pub async fn logout() -> HttpResponse {
    let mut expired = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    expired.make_removal();

    let mut response = redirect(urls::INDEX);
    if let Err(e) = response.add_cookie(&expired) {
        tracing::error!("Failed to clear session cookie: {}", e);
    }
    response
}
