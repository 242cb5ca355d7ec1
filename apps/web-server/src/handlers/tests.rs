use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use uuid::Uuid;

use yatube_core::domain::{Group, Post, Principal, User};
use yatube_core::ports::BaseRepository;
use yatube_infra::InMemoryStore;

use super::configure_routes;
use crate::config::AppConfig;
use crate::middleware::SESSION_COOKIE;
use crate::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};
use crate::state::AppState;

struct Site {
    store: InMemoryStore,
    state: AppState,
}

impl Site {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let state = AppState::in_memory(&store, &AppConfig::default());
        Self { store, state }
    }

    async fn user(&self, username: &str) -> Principal {
        let user = self
            .store
            .users()
            .insert(User::new(username.to_string(), "hash".to_string()))
            .await
            .unwrap();
        Principal::new(user.id, user.username)
    }

    async fn group(&self, slug: &str) -> Group {
        self.store
            .groups()
            .insert(Group::new("Test group", slug, "Test description").unwrap())
            .await
            .unwrap()
    }

    async fn post(&self, author: &Principal, text: &str, group: Option<&Group>) -> Post {
        self.store
            .posts()
            .insert(Post::new(author.user_id, text.to_string(), group.map(|g| g.id)))
            .await
            .unwrap()
    }

    fn session(&self, user: &Principal) -> Cookie<'static> {
        let token = self
            .state
            .tokens
            .generate_token(user.user_id, &user.username)
            .unwrap();
        Cookie::new(SESSION_COOKIE, token)
    }

    async fn get(&self, uri: &str, as_user: Option<&Principal>) -> ServiceResponse {
        let mut req = test::TestRequest::get().uri(uri);
        if let Some(user) = as_user {
            req = req.cookie(self.session(user));
        }
        self.call(req).await
    }

    async fn post_form(
        &self,
        uri: &str,
        as_user: Option<&Principal>,
        fields: &[(&str, &str)],
    ) -> ServiceResponse {
        let mut req = test::TestRequest::post().uri(uri).set_form(fields);
        if let Some(user) = as_user {
            req = req.cookie(self.session(user));
        }
        self.call(req).await
    }

    async fn call(&self, req: test::TestRequest) -> ServiceResponse {
        let app = test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(self.state.clone()))
                .configure(configure_routes),
        )
        .await;
        test::call_service(&app, req.to_request()).await
    }
}

fn location(resp: &ServiceResponse) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn body(resp: ServiceResponse) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

async fn cards(resp: ServiceResponse) -> usize {
    assert_eq!(resp.status(), StatusCode::OK);
    body(resp).await.matches("class=\"post\"").count()
}

#[actix_web::test]
async fn public_pages_are_available_to_anonymous_users() {
    let site = Site::new();
    let author = site.user("auth").await;
    let group = site.group("test-slug").await;
    let post = site.post(&author, "Test post", Some(&group)).await;

    for uri in [
        "/".to_string(),
        "/group/test-slug/".to_string(),
        "/profile/auth/".to_string(),
        format!("/posts/{}/", post.id),
    ] {
        let resp = site.get(&uri, None).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }
}

#[actix_web::test]
async fn unknown_pages_are_not_found() {
    let site = Site::new();
    let missing_post = format!("/posts/{}/", Uuid::new_v4());

    for uri in [
        "/unexisting_page/",
        "/group/no-such-group/",
        "/profile/nobody/",
        "/posts/not-a-uuid/",
        missing_post.as_str(),
    ] {
        let resp = site.get(uri, None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert!(body(resp).await.contains("404"));
    }
}

#[actix_web::test]
async fn not_found_page_hides_login_links_from_signed_in_user() {
    let site = Site::new();
    let user = site.user("leo").await;

    let resp = site.get("/unexisting_page/", Some(&user)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let page = body(resp).await;
    assert!(!page.contains("Log in"));
    assert!(!page.contains("Sign up"));
}

#[actix_web::test]
async fn feeds_paginate_ten_then_three() {
    let site = Site::new();
    let author = site.user("auth").await;
    let group = site.group("test-slug").await;
    for i in 0..13 {
        site.post(&author, &format!("Post {i}"), Some(&group)).await;
    }

    for path in ["/", "/group/test-slug/", "/profile/auth/"] {
        assert_eq!(cards(site.get(path, None).await).await, 10, "{path}");
        let second = format!("{path}?page=2");
        assert_eq!(cards(site.get(&second, None).await).await, 3, "{second}");
    }
}

#[actix_web::test]
async fn out_of_range_page_shows_last_page() {
    let site = Site::new();
    let author = site.user("auth").await;
    for i in 0..13 {
        site.post(&author, &format!("Post {i}"), None).await;
    }

    assert_eq!(cards(site.get("/?page=99", None).await).await, 3);
    assert_eq!(cards(site.get("/?page=abc", None).await).await, 10);
}

#[actix_web::test]
async fn repeated_page_parameter_uses_last_value() {
    let site = Site::new();
    let author = site.user("auth").await;
    for i in 0..13 {
        site.post(&author, &format!("Post {i}"), None).await;
    }

    assert_eq!(cards(site.get("/?page=1&page=2", None).await).await, 3);
    assert_eq!(cards(site.get("/profile/auth/?page=2&page=1", None).await).await, 10);
}

#[actix_web::test]
async fn group_feed_excludes_other_groups() {
    let site = Site::new();
    let author = site.user("auth").await;
    let group = site.group("test-slug").await;
    let other = site.group("other-slug").await;
    site.post(&author, "In the group", Some(&group)).await;
    site.post(&author, "Elsewhere", Some(&other)).await;

    let page = body(site.get("/group/test-slug/", None).await).await;
    assert!(page.contains("In the group"));
    assert!(!page.contains("Elsewhere"));
}

#[actix_web::test]
async fn anonymous_writes_redirect_to_login() {
    let site = Site::new();
    let author = site.user("auth").await;
    let post = site.post(&author, "Test post", None).await;

    let resp = site.get("/create/", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");

    let edit = format!("/posts/{}/edit/", post.id);
    let resp = site.post_form(&edit, None, &[("text", "Changed")]).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/auth/login/?next={edit}"));

    let stored = site.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Test post");
}

#[actix_web::test]
async fn non_author_is_sent_back_to_the_post() {
    let site = Site::new();
    let author = site.user("auth").await;
    let other = site.user("not_author").await;
    let post = site.post(&author, "Test post", None).await;
    let edit = format!("/posts/{}/edit/", post.id);

    let resp = site.get(&edit, Some(&other)).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let resp = site.post_form(&edit, Some(&other), &[("text", "Hijacked")]).await;
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let stored = site.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Test post");
}

#[actix_web::test]
async fn create_saves_post_and_redirects_to_profile() {
    let site = Site::new();
    let author = site.user("auth").await;
    let group = site.group("test-slug").await;
    let group_id = group.id.to_string();

    let form = site.get("/create/", Some(&author)).await;
    assert_eq!(form.status(), StatusCode::OK);
    assert!(body(form).await.contains("name=\"text\""));

    let resp = site
        .post_form(
            "/create/",
            Some(&author),
            &[("text", "Brand new post"), ("group", group_id.as_str())],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/auth/");

    let page = body(site.get("/group/test-slug/", None).await).await;
    assert!(page.contains("Brand new post"));
}

#[actix_web::test]
async fn invalid_create_rerenders_form_with_errors() {
    let site = Site::new();
    let author = site.user("auth").await;

    let resp = site
        .post_form("/create/", Some(&author), &[("text", "   "), ("group", "")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body(resp).await.contains("This field is required."));

    assert_eq!(cards(site.get("/", None).await).await, 0);
}

#[actix_web::test]
async fn author_edit_redirects_to_detail() {
    let site = Site::new();
    let author = site.user("auth").await;
    let post = site.post(&author, "Test post", None).await;
    let edit = format!("/posts/{}/edit/", post.id);

    let form = body(site.get(&edit, Some(&author)).await).await;
    assert!(form.contains("Test post"));

    let resp = site
        .post_form(&edit, Some(&author), &[("text", "Edited text"), ("group", "")])
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let stored = site.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Edited text");
    assert_eq!(stored.author_id, author.user_id);
    assert_eq!(stored.pub_date, post.pub_date);
}

#[actix_web::test]
async fn signup_then_login_sets_session_cookie() {
    let site = Site::new();

    let resp = site
        .post_form(
            "/auth/signup/",
            None,
            &[("username", "newbie"), ("password", "correct horse")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(resp.response().cookies().any(|c| c.name() == SESSION_COOKIE));

    let resp = site
        .post_form(
            "/auth/login/",
            None,
            &[
                ("username", "newbie"),
                ("password", "correct horse"),
                ("next", "/create/"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/create/");
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap();
    assert_eq!(cookie.http_only(), Some(true));

    let resp = site
        .post_form(
            "/auth/login/",
            None,
            &[("username", "newbie"), ("password", "wrong password")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body(resp).await.contains("correct username and password"));
}

#[actix_web::test]
async fn login_ignores_foreign_next() {
    let site = Site::new();
    site.post_form(
        "/auth/signup/",
        None,
        &[("username", "newbie"), ("password", "correct horse")],
    )
    .await;

    let resp = site
        .post_form(
            "/auth/login/",
            None,
            &[
                ("username", "newbie"),
                ("password", "correct horse"),
                ("next", "//evil.example/"),
            ],
        )
        .await;
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn forged_session_is_treated_as_anonymous() {
    let site = Site::new();
    let req = test::TestRequest::get()
        .uri("/create/")
        .cookie(Cookie::new(SESSION_COOKIE, "not-a-token"));

    let resp = site.call(req).await;
    assert_eq!(location(&resp), "/auth/login/?next=/create/");
}

#[actix_web::test]
async fn health_reports_ok_and_echoes_request_id() {
    let site = Site::new();
    let req = test::TestRequest::get()
        .uri("/health/")
        .insert_header((REQUEST_ID_HEADER, "req-42"));

    let resp = site.call(req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-42");

    let json: serde_json::Value = serde_json::from_str(&body(resp).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["posts_per_page"], 10);
}
