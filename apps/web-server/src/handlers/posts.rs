//! Feed, detail and authoring pages.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use yatube_core::domain::Principal;
use yatube_core::forms::PostFormInput;
use yatube_core::services::WriteOutcome;
use yatube_shared::PageQuery;

use super::redirect;
use crate::middleware::{AppError, AppResult, OptionalIdentity};
use crate::state::AppState;
use crate::{urls, views};

/// Raw query pairs; unlike a typed `web::Query`, a repeated `page` is not
/// a 400.
type QueryPairs = web::Query<Vec<(String, String)>>;

fn page_of(query: QueryPairs) -> PageQuery {
    PageQuery::from_pairs(query.into_inner())
}

/// Post ids that do not parse are treated like unknown ones.
fn parse_post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(format!("Post {raw} not found")))
}

/// Turn a write outcome into a response. `saved_to` picks where a saved post
/// leads.
fn respond(
    req: &HttpRequest,
    viewer: Option<&Principal>,
    outcome: WriteOutcome,
    saved_to: impl FnOnce(Uuid) -> String,
) -> HttpResponse {
    match outcome {
        WriteOutcome::LoginRequired => {
            let here = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or(req.path());
            redirect(&urls::login(here))
        }
        WriteOutcome::NotAuthor { post_id } => redirect(&urls::post_detail(post_id)),
        WriteOutcome::Form(form) => views::html(views::post_form_page(&form, viewer)),
        WriteOutcome::Saved(post) => redirect(&saved_to(post.id)),
    }
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: QueryPairs,
) -> AppResult<HttpResponse> {
    let query = page_of(query);
    let page = state.feeds.index(query.page.as_deref()).await?;
    Ok(views::html(views::index_page(&page, identity.principal())))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    slug: web::Path<String>,
    query: QueryPairs,
) -> AppResult<HttpResponse> {
    let query = page_of(query);
    let feed = state
        .feeds
        .group_posts(&slug, query.page.as_deref())
        .await?;
    Ok(views::html(views::group_page(&feed, identity.principal())))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    username: web::Path<String>,
    query: QueryPairs,
) -> AppResult<HttpResponse> {
    let query = page_of(query);
    let feed = state
        .feeds
        .profile(&username, query.page.as_deref())
        .await?;
    Ok(views::html(views::profile_page(&feed, identity.principal())))
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&post_id)?;
    let detail = state.feeds.post_detail(post_id).await?;
    Ok(views::html(views::detail_page(
        &detail,
        identity.principal(),
        state.post_preview_chars,
    )))
}

/// GET /create/
pub async fn create_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let viewer = identity.principal();
    let outcome = state.authoring.create_form(viewer).await?;
    Ok(respond(&req, viewer, outcome, urls::post_detail))
}

/// POST /create/
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    form: web::Form<PostFormInput>,
) -> AppResult<HttpResponse> {
    let viewer = identity.principal();
    let outcome = state.authoring.create(viewer, form.into_inner()).await?;
    let profile = viewer.map(|p| urls::profile(&p.username)).unwrap_or_default();
    Ok(respond(&req, viewer, outcome, |_| profile))
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&post_id)?;
    let viewer = identity.principal();
    let outcome = state.authoring.edit_form(viewer, post_id).await?;
    Ok(respond(&req, viewer, outcome, urls::post_detail))
}

/// POST /posts/{post_id}/edit/
pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<String>,
    form: web::Form<PostFormInput>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&post_id)?;
    let viewer = identity.principal();
    let outcome = state
        .authoring
        .edit(viewer, post_id, form.into_inner())
        .await?;
    Ok(respond(&req, viewer, outcome, urls::post_detail))
}
