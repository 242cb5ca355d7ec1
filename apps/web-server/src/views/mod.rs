//! Server-rendered HTML pages.

mod auth;
mod posts;

pub use auth::{login_page, signup_page};
pub use posts::{detail_page, group_page, index_page, post_form_page, profile_page};

use std::fmt::Write;

use actix_web::{HttpResponse, http::header::ContentType};
use yatube_core::domain::Principal;
use yatube_shared::ErrorResponse;

use crate::urls;

/// Escape text for use in HTML content and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Wrap a page body with the site chrome. The navigation depends on who is
/// looking.
pub fn layout(title: &str, viewer: Option<&Principal>, body: &str) -> String {
    let mut nav = format!(r#"<a href="{}">Yatube</a>"#, urls::INDEX);
    match viewer {
        Some(user) => {
            let _ = write!(
                nav,
                r#" <a href="{}">New post</a> <a href="{}">{}</a> <a href="{}">Log out</a>"#,
                urls::CREATE,
                escape(&urls::profile(&user.username)),
                escape(&user.username),
                urls::LOGOUT,
            );
        }
        None => {
            let _ = write!(
                nav,
                r#" <a href="{}">Log in</a> <a href="{}">Sign up</a>"#,
                urls::LOGIN,
                urls::SIGNUP,
            );
        }
    }
    chrome(title, &nav, body)
}

fn chrome(title: &str, nav: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<nav>{nav}</nav>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        escape(title),
    )
}

/// 200 HTML response.
pub fn html(page: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page)
}

/// Error page for a problem detail. The viewer is unknown here, so the nav
/// carries only the home link.
pub fn error_page(problem: &ErrorResponse) -> String {
    let mut body = format!("<h1>{} {}</h1>", problem.status, escape(&problem.title));
    if let Some(detail) = &problem.detail {
        let _ = write!(body, "\n<p>{}</p>", escape(detail));
    }
    let _ = write!(body, "\n<p><a href=\"{}\">Back to the main page</a></p>", urls::INDEX);
    let nav = format!(r#"<a href="{}">Yatube</a>"#, urls::INDEX);
    chrome(&problem.title, &nav, &body)
}
