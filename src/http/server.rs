//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, CORS)
//! - Serve static files for paths no route claims
//! - Bind to a listener and shut down gracefully

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{JokesConfig, ServerConfig};
use crate::http::request::{request_id_header, request_id_of, MakeRequestUuidV4};
use crate::http::{jokes, users};
use crate::jokes::{JokeBook, LikeCounter};
use crate::observability::metrics;
use crate::users::UserStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub jokes: Arc<JokeBook>,
    pub likes: Arc<LikeCounter>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(config: &JokesConfig, users: Arc<dyn UserStore>) -> Self {
        Self {
            jokes: Arc::new(JokeBook::new(config.sentinel.clone(), config.seed.clone())),
            likes: Arc::new(LikeCounter::new(config.initial_likes)),
            users,
        }
    }
}

/// HTTP server for the jokes API.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and user store.
    pub fn new(config: ServerConfig, users: Arc<dyn UserStore>) -> Self {
        let state = AppState::new(&config.jokes, users);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Routes only, without middleware or static files.
    pub fn api_routes(state: AppState) -> Router {
        Router::new()
            .route("/joke", get(jokes::sentinel_joke).post(jokes::create_joke))
            .route("/joke/{id}", get(jokes::get_joke))
            .route("/all", get(jokes::list_jokes))
            .route("/likes", get(jokes::get_likes).post(jokes::set_likes))
            .route(
                "/user",
                get(users::find_users)
                    .post(users::create_user)
                    .put(users::update_users)
                    .delete(users::delete_users),
            )
            .route_layer(middleware::from_fn(metrics::track_requests))
            .with_state(state)
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mut router = Self::api_routes(state);

        if config.static_files.enabled {
            let dir = Path::new(&config.static_files.dir);
            if dir.is_dir() {
                tracing::info!(dir = %dir.display(), "Serving static files");
            } else {
                tracing::warn!(dir = %dir.display(), "Static file directory does not exist");
            }
            router = router.fallback_service(ServeDir::new(dir));
        }

        let x_request_id = request_id_header();
        router = router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        request_id = %request_id_of(request),
                        method = %request.method(),
                        path = %request.uri().path()
                    )
                }))
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        );

        if config.cors.enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router
    }

    /// A clone of the fully layered router, for driving without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::{InMemoryUserStore, User};
    use axum::body::to_bytes;
    use axum::http::{header, Method, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = ServerConfig::default();
        config.static_files.enabled = false;
        HttpServer::new(config, Arc::new(InMemoryUserStore::new()))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(router, request).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn test_sentinel_joke_is_plain_text() {
        let router = server().router();
        let response = router.oneshot(get("/joke")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            body,
            "What happens to a frog's car when it breaks down? It gets toad away."
        );
    }

    #[tokio::test]
    async fn test_list_all_seeded() {
        let router = server().router();
        let (status, body) = send_json(&router, get("/all")).await;
        assert_eq!(status, StatusCode::OK);
        let jokes = body.as_array().unwrap();
        assert_eq!(jokes.len(), 3);
        assert_eq!(jokes[1]["id"], 1);
        assert_eq!(
            jokes[1]["text"],
            "Why was six scared of seven? Because seven 'ate' nine."
        );
    }

    #[tokio::test]
    async fn test_get_joke_by_id() {
        let router = server().router();
        let (status, body) = send_json(&router, get("/joke/2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 2);
        assert!(body["text"].as_str().unwrap().contains("derive"));
    }

    #[tokio::test]
    async fn test_get_joke_not_found() {
        let router = server().router();
        for uri in ["/joke/3", "/joke/-1", "/joke/facade", "/joke/1.5", "/joke/%FF"] {
            let (status, body) = send(&router, get(uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, "Joke not found!");
        }
    }

    #[tokio::test]
    async fn test_create_joke() {
        let router = server().router();
        let (status, body) =
            send_json(&router, json_request(Method::POST, "/joke", json!({ "text": "X" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "We have added your joke", "id": 3, "text": "X" })
        );

        let (_, all) = send_json(&router, get("/all")).await;
        assert_eq!(all[3], json!({ "id": 3, "text": "X" }));
    }

    #[tokio::test]
    async fn test_create_joke_rejects_bad_bodies() {
        let router = server().router();
        let bodies = [json!({}), json!({ "text": "" }), json!({ "text": null }), json!({ "joke": "X" })];
        for body in bodies {
            let (status, text) = send(&router, json_request(Method::POST, "/joke", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(text, "Invalid request body");
        }

        let no_body = Request::builder()
            .method(Method::POST)
            .uri("/joke")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, no_body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, all) = send_json(&router, get("/all")).await;
        assert_eq!(all.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_likes_roundtrip() {
        let router = server().router();
        let (_, body) = send_json(&router, get("/likes")).await;
        assert_eq!(body, json!({ "likes": 15 }));

        let (status, body) =
            send_json(&router, json_request(Method::POST, "/likes", json!({ "likes": 42 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "success", "likes": 42 }));

        let (_, body) = send_json(&router, get("/likes")).await;
        assert_eq!(body, json!({ "likes": 42 }));
    }

    #[tokio::test]
    async fn test_user_crud() {
        let store = Arc::new(InMemoryUserStore::with_users(vec![User::new("Kid", 10)]));
        let mut config = ServerConfig::default();
        config.static_files.enabled = false;
        let router = HttpServer::new(config, store.clone()).router();

        let (status, body) = send_json(
            &router,
            json_request(Method::POST, "/user", json!({ "name": "Alice", "age": 30 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "message": "User created successfully." }));

        let (_, found) = send_json(&router, get("/user?name=Alice&age=30")).await;
        assert_eq!(found, json!([{ "name": "Alice", "age": 30 }]));

        let (status, body) = send_json(
            &router,
            json_request(Method::PUT, "/user", json!({ "name": "Alice", "age": 31 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Updated successfully");
        assert_eq!(body["updated"]["modifiedCount"], 1);

        let (_, old) = send_json(&router, get("/user?name=Alice&age=30")).await;
        assert_eq!(old, json!([]));

        let (status, body) =
            send_json(&router, json_request(Method::DELETE, "/user", json!({ "age": 18 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "message": "Deleted successfully",
                "deleted": { "acknowledged": true, "deletedCount": 1 }
            })
        );
        assert_eq!(store.len().await, 1);
    }

    fn empty(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_set_likes_without_body_stores_null() {
        let router = server().router();
        let (status, body) = send_json(&router, empty(Method::POST, "/likes")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "success", "likes": null }));

        let (_, body) = send_json(&router, get("/likes")).await;
        assert_eq!(body, json!({ "likes": null }));
    }

    #[tokio::test]
    async fn test_set_likes_ignores_non_json_content_type() {
        let router = server().router();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/likes")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("42"))
            .unwrap();
        let (status, body) = send_json(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["likes"], Value::Null);
    }

    #[tokio::test]
    async fn test_broken_json_is_rejected() {
        let router = server().router();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/likes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"likes\":"))
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid request body");
    }

    #[tokio::test]
    async fn test_user_routes_without_body_forward_missing_fields() {
        let store = Arc::new(InMemoryUserStore::with_users(vec![User::new("Kid", 10)]));
        let mut config = ServerConfig::default();
        config.static_files.enabled = false;
        let router = HttpServer::new(config, store.clone()).router();

        let (status, body) = send_json(&router, empty(Method::DELETE, "/user")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"]["deletedCount"], 0);
        assert_eq!(store.len().await, 1);

        let (status, body) = send_json(&router, empty(Method::PUT, "/user")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updated"]["matchedCount"], 0);

        let (status, _) = send_json(&router, empty(Method::POST, "/user")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_find_users_rejects_bad_age() {
        let router = server().router();
        let (status, body) = send(&router, get("/user?name=Alice&age=old")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid age query parameter");
    }

    #[tokio::test]
    async fn test_request_id_is_returned() {
        let router = server().router();
        let response = router.oneshot(get("/likes")).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}
