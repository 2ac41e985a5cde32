use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use scribe_core::domain::{Comment, Post, Tag};
use scribe_core::ports::{BaseRepository, TagRepository};
use scribe_infra::{InMemoryBlogStore, InMemoryMailer};

use super::configure_routes;
use crate::config::AppConfig;
use crate::state::AppState;

struct Fixture {
    store: Arc<InMemoryBlogStore>,
    mailer: Arc<InMemoryMailer>,
    state: AppState,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(InMemoryBlogStore::new());
        let mailer = Arc::new(InMemoryMailer::new());
        let config = AppConfig {
            sender: "blog@example.com".into(),
            ..AppConfig::default()
        };
        let state = AppState::in_memory(store.clone(), mailer.clone(), &config);
        Self {
            store,
            mailer,
            state,
        }
    }

    async fn post(&self, title: &str, slug: &str, body: &str) -> Post {
        let publish = Utc.with_ymd_and_hms(2024, 2, 9, 8, 0, 0).unwrap();
        let post = Post::new(Uuid::new_v4(), title.into(), slug.into(), body.into())
            .publish_at(publish);
        self.store.insert(post).await.unwrap()
    }
}

macro_rules! service {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($fixture.state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_list_posts_json() {
    let fixture = Fixture::new();
    fixture.post("Hello", "hello", "Some *markdown*").await;
    let app = service!(fixture);

    let req = test::TestRequest::get().uri("/blog?page=abc").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["page"]["number"], 1);
    assert_eq!(body["page"]["items"][0]["title"], "Hello");
    assert_eq!(body["page"]["items"][0]["url"], "/blog/2024/2/9/hello");
    assert!(body.get("tag").is_none());
}

#[actix_web::test]
async fn test_unknown_tag_is_404() {
    let fixture = Fixture::new();
    let app = service!(fixture);

    let req = test::TestRequest::get().uri("/blog/tag/cobol").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
}

#[actix_web::test]
async fn test_post_detail() {
    let fixture = Fixture::new();
    let post = fixture.post("Hello", "hello", "# Title").await;
    let tag = fixture.store.insert(Tag::new("Intro")).await.unwrap();
    fixture.store.attach(post.id, &[tag.id]).await.unwrap();
    fixture
        .store
        .insert(Comment::new(post.id, "Ada".into(), "ada@example.com".into(), "Hi".into()))
        .await
        .unwrap();
    let app = service!(fixture);

    let req = test::TestRequest::get()
        .uri("/blog/2024/2/9/hello")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["body_html"], "<h1>Title</h1>\n");
    assert_eq!(body["tags"][0]["slug"], "intro");
    assert_eq!(body["comments"][0]["name"], "Ada");
    assert!(body["comments"][0].get("email").is_none());
}

#[actix_web::test]
async fn test_post_detail_wrong_day_is_404() {
    let fixture = Fixture::new();
    fixture.post("Hello", "hello", "").await;
    let app = service!(fixture);

    let req = test::TestRequest::get()
        .uri("/blog/2024/2/8/hello")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_share_post_sends_mail() {
    let fixture = Fixture::new();
    let post = fixture.post("Ownership", "ownership", "").await;
    let app = service!(fixture);

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/share", post.id))
        .insert_header(("host", "blog.example.com"))
        .set_form([
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("to", "bob@example.com"),
            ("comments", "Read it"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let sent = fixture.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["bob@example.com".to_string()]);
    assert!(sent[0].body.contains("http://blog.example.com/blog/2024/2/9/ownership"));
}

#[actix_web::test]
async fn test_invalid_share_is_422_and_sends_nothing() {
    let fixture = Fixture::new();
    let post = fixture.post("Ownership", "ownership", "").await;
    let app = service!(fixture);

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/share", post.id))
        .set_json(serde_json::json!({ "name": "Ada", "email": "nope", "to": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "to"]);
    assert!(fixture.mailer.sent().await.is_empty());
}

#[actix_web::test]
async fn test_add_comment_is_201() {
    let fixture = Fixture::new();
    let post = fixture.post("Ownership", "ownership", "").await;
    let app = service!(fixture);

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/comment", post.id))
        .set_json(serde_json::json!({
            "name": "Bob",
            "email": "bob@example.com",
            "body": "Thanks"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["comment"]["body"], "Thanks");
}

#[actix_web::test]
async fn test_search_without_query_is_empty() {
    let fixture = Fixture::new();
    fixture.post("Ownership", "ownership", "").await;
    let app = service!(fixture);

    let req = test::TestRequest::get().uri("/blog/search").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["results"], serde_json::json!([]));

    let req = test::TestRequest::get()
        .uri("/blog/search?query=ownrship")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["results"][0]["post"]["title"], "Ownership");
}

#[actix_web::test]
async fn test_widgets() {
    let fixture = Fixture::new();
    let post = fixture.post("Ownership", "ownership", "").await;
    fixture
        .store
        .insert(Comment::new(post.id, "Ada".into(), "ada@example.com".into(), "Hi".into()))
        .await
        .unwrap();
    let app = service!(fixture);

    let req = test::TestRequest::get().uri("/blog/widgets").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total_posts"], 1);
    assert_eq!(body["latest_posts"][0]["title"], "Ownership");
    assert_eq!(body["most_commented"][0]["total_comments"], 1);
}

#[actix_web::test]
async fn test_feed_is_rss() {
    let fixture = Fixture::new();
    fixture.post("Tom & Jerry", "tom-and-jerry", "Cat <em>and</em> mouse").await;
    let draft = Post::new(Uuid::new_v4(), "Hidden".into(), "hidden".into(), String::new());
    fixture.store.insert(draft).await.unwrap();
    let future = Post::new(Uuid::new_v4(), "Later".into(), "later".into(), String::new())
        .publish_at(Utc::now() + Duration::days(1));
    fixture.store.insert(future).await.unwrap();
    let app = service!(fixture);

    let req = test::TestRequest::get()
        .uri("/blog/feed")
        .insert_header(("host", "blog.example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/rss+xml; charset=utf-8"
    );

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.starts_with("<?xml"));
    assert!(body.contains("<title>Tom &amp; Jerry</title>"));
    assert!(body.contains("<link>http://blog.example.com/blog/2024/2/9/tom-and-jerry</link>"));
    assert!(body.contains("<pubDate>Fri, "));
    assert!(body.contains("Feb 2024 08:00:00 +0000</pubDate>"));
    assert!(!body.contains("Hidden"));
    assert!(!body.contains("Later"));
}

#[actix_web::test]
async fn test_health() {
    let fixture = Fixture::new();
    let app = service!(fixture);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["published_posts"], 0);
}
