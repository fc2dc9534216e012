//! Render service: turns posted code XML into display markup over HTTP.
//!
//! - `POST /render_body`: raw XML body, `text/html` body markup back
//! - `POST /render`: JSON `{document, path?, overrides?}`, JSON `{title, html, groups}` back
//! - `GET /health`: liveness

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ServerError;
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/render_body", post(handlers::render_body))
        .route("/render", post(handlers::render))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use dccode_render::citation::LinkerConfig;
    use dccode_render::index::Location;
    use dccode_render::source::{DocumentSource, FsSource, MemorySource};
    use dccode_render::types::DocNode;
    use dccode_render::SectionIndex;
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    const SECTION: &str = "<level><type>Section</type><num>1-101</num><heading>Definitions</heading>\
        <level><num>(a)</num><text>See § 1-102.</text></level></level>";

    struct PanickingSource;

    impl DocumentSource for PanickingSource {
        fn load(&self, _relative: &str) -> dccode_render::Result<DocNode> {
            panic!("storage exploded");
        }
    }

    fn test_state(source: Arc<dyn DocumentSource>) -> AppState {
        let mut index = SectionIndex::default();
        index.insert_location(
            "1-102",
            Location {
                source: "Title-1/1-102.xml".to_string(),
                output: "Title-1/1-102.html".to_string(),
                title: "§ 1-102. Scope".to_string(),
                span: Some(("1-102".to_string(), "1-102".to_string())),
            },
        );
        AppState::new(index, source, LinkerConfig::default().with_link_root("/dc"))
    }

    fn app() -> Router {
        router(test_state(Arc::new(MemorySource::new())))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        (status, String::from_utf8(bytes.to_vec()).expect("utf-8"))
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn post_xml(uri: &str, xml: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::from(xml.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let request = Request::builder().uri("/health").body(Body::empty()).expect("request");
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn render_body_returns_markup() {
        let (status, body) = send(app(), post_xml("/render_body", SECTION)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<div class=\"group\">"));
        assert!(body.contains("<span class=\"level-num\">(a) </span>"));
        assert!(body.contains("<a href='/dc/Title-1/1-102.html'>§&nbsp;1&#8209;102</a>"));
    }

    #[tokio::test]
    async fn malformed_xml_is_a_bad_request() {
        let (status, body) = send(app(), post_xml("/render_body", "<level><text>")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: Value = serde_json::from_str(&body).expect("json");
        assert!(error["error"].as_str().expect("message").contains("XML parsing failed"));
    }

    #[tokio::test]
    async fn render_returns_title_and_groups() {
        let request = post_json(
            "/render",
            &json!({ "document": SECTION, "path": "Title-1/1-101.xml" }),
        );
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(response["title"], "§ 1-101. Definitions");
        assert_eq!(response["groups"].as_array().expect("groups").len(), 1);
        assert!(response["html"].as_str().expect("html").contains("(a) "));
    }

    #[tokio::test]
    async fn overrides_stand_in_for_stored_documents() {
        let request = post_json(
            "/render",
            &json!({
                "document": "<level><type>Chapter</type><num>1</num><include href=\"1-103.xml\"/></level>",
                "path": "Title-1/Chapter-1/index.xml",
                "overrides": {
                    "Title-1/Chapter-1/1-103.xml":
                        "<level><type>Section</type><num>1-103</num><heading>Draft</heading></level>"
                }
            }),
        );
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_str(&body).expect("json");
        let html = response["html"].as_str().expect("html");
        assert!(html.contains("child-link"));
        assert!(html.contains("§ 1-103. Draft"));
    }

    #[tokio::test]
    async fn empty_document_is_rejected() {
        let (status, _) = send(app(), post_json("/render", &json!({ "document": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn paths_outside_the_code_dir_are_rejected() {
        let outer = tempfile::TempDir::new().expect("tempdir");
        let code = outer.path().join("code");
        std::fs::create_dir_all(&code).expect("code dir");
        std::fs::write(
            outer.path().join("secret.xml"),
            "<level><type>Section</type><num>9-999</num><heading>SECRET</heading></level>",
        )
        .expect("secret");

        let app = router(test_state(Arc::new(FsSource::new(&code))));
        let xml = "<level><type>Title</type><num>1</num><include href=\"secret.xml\"/></level>";

        let (status, body) = send(app.clone(), post_xml("/render_body?path=../x.xml", xml)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.contains("SECRET"));

        let absolute = code.join("x.xml");
        let request = post_json(
            "/render",
            &json!({ "document": xml, "path": absolute.to_str().expect("utf-8 path") }),
        );
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.contains("SECRET"));

        let climbing = "<level><type>Title</type><num>1</num><include href=\"../secret.xml\"/></level>";
        let (status, body) = send(app, post_xml("/render_body?path=x.xml", climbing)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.contains("SECRET"));
    }

    #[tokio::test]
    async fn panicking_render_is_contained() {
        let app = router(test_state(Arc::new(PanickingSource)));
        let xml = "<level><type>Title</type><num>1</num><include href=\"1-101.xml\"/></level>";

        let (status, body) = send(app.clone(), post_xml("/render_body", xml)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("\"error\""));

        let request = Request::builder().uri("/health").body(Body::empty()).expect("request");
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
    }
}
