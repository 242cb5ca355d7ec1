//! Paths of the site's pages.

use uuid::Uuid;

pub const INDEX: &str = "/";
pub const CREATE: &str = "/create/";
pub const LOGIN: &str = "/auth/login/";
pub const SIGNUP: &str = "/auth/signup/";
pub const LOGOUT: &str = "/auth/logout/";

pub fn group(slug: &str) -> String {
    format!("/group/{}/", encode(slug))
}

pub fn profile(username: &str) -> String {
    format!("/profile/{}/", encode(username))
}

pub fn post_detail(post_id: Uuid) -> String {
    format!("/posts/{post_id}/")
}

pub fn post_edit(post_id: Uuid) -> String {
    format!("/posts/{post_id}/edit/")
}

/// Login page that sends the user back to `next` afterwards.
pub fn login(next: &str) -> String {
    format!("{LOGIN}?next={}", encode_keep_slash(next))
}

/// Page to continue to after login: only local absolute paths are followed,
/// anything else falls back to the index.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => INDEX,
    }
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

fn percent_encode(raw: &str, keep: impl Fn(u8) -> bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        if keep(b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// Percent-encode a single path segment.
fn encode(segment: &str) -> String {
    percent_encode(segment, is_unreserved)
}

fn encode_keep_slash(path: &str) -> String {
    percent_encode(path, |b| is_unreserved(b) || b == b'/')
}
