//! Router assembly

use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, chat, games, library, meta};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/me", get(auth::me))
        .route("/api/games", get(games::list).post(games::add))
        .route("/api/games/{id}", get(games::get))
        .route("/api/games/{id}/play", post(games::play))
        .route("/api/library", get(library::list))
        .route(
            "/api/library/{id}",
            post(library::add).delete(library::remove),
        )
        .route("/api/chat/messages", get(chat::history).post(chat::send))
        .route("/api/chat/messages/{id}", delete(chat::delete))
        .route("/api/categories", get(meta::categories))
        .route("/api/stats", get(meta::stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_core::Database;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::ServerConfig;

    fn test_app() -> Router {
        let db = Database::open_in_memory().unwrap();
        router(AppState::new(db, ServerConfig::default()))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Log in and return the session cookie pair ("name=token")
    async fn login(app: &Router, login: &str, password: &str) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/login",
                json!({ "login": login, "password": password }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_register_login_me_flow() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/register",
                json!({ "username": "bob3", "email": "bob3@x.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert!(body["timestamp"].is_string());
        assert_eq!(body["data"]["username"], "bob3");

        // Wrong password is a 401, not an error body with detail
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/login",
                json!({ "login": "bob3", "password": "wrong" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);

        let cookie = login(&app, "bob3", "secret1").await;

        let response = app
            .clone()
            .oneshot(get_request("/api/me", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["user"]["username"], "bob3");
        assert_eq!(body["data"]["user"]["is_admin"], false);
        // The public view never carries the credential hash
        assert!(body["data"]["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_400() {
        let app = test_app();

        let request = json!({ "username": "bob3", "email": "bob3@x.com", "password": "secret1" });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/register", request.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/register", request))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_authenticated_routes_require_session() {
        let app = test_app();

        for (method, uri) in [
            ("GET", "/api/me"),
            ("GET", "/api/library"),
            ("POST", "/api/chat/messages"),
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from("{}"))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let app = test_app();
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/register",
                json!({ "username": "bob3", "email": "bob3@x.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        let cookie = login(&app, "bob3", "secret1").await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/logout")
                    .header(header::COOKIE, cookie.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cleared.contains("Max-Age=0"));

        let response = app
            .clone()
            .oneshot(get_request("/api/me", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_game_catalog_and_library_flow() {
        let app = test_app();
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/register",
                json!({ "username": "bob3", "email": "bob3@x.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        let cookie = login(&app, "bob3", "secret1").await;

        // Creating a game requires a session
        let game = json!({
            "title": "Puzzle X",
            "description": "A puzzle game",
            "category": "puzzle",
            "image_url": "https://img.example/x.png",
            "game_url": "https://play.example/x"
        });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/games", game.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let mut request = json_request("POST", "/api/games", game);
        request
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let game_id = body["data"]["game"]["id"].as_str().unwrap().to_string();

        // Browsing is public and filterable
        let response = app
            .clone()
            .oneshot(get_request("/api/games?category=puzzle", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["count"], 1);
        assert_eq!(body["data"]["games"][0]["title"], "Puzzle X");

        // Playing records the play and pulls the game into the library
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/games/{game_id}/play"))
                    .header(header::COOKIE, cookie.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get_request("/api/library", Some(&cookie)))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["count"], 1);
        assert_eq!(body["data"]["games"][0]["game_id"], game_id.as_str());

        // Removing twice: second attempt is a 404
        let remove = |app: &Router| {
            app.clone().oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/library/{game_id}"))
                    .header(header::COOKIE, cookie.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
        };
        assert_eq!(remove(&app).await.unwrap().status(), StatusCode::OK);
        assert_eq!(remove(&app).await.unwrap().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_moderation_is_admin_only() {
        let app = test_app();
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/register",
                json!({ "username": "bob3", "email": "bob3@x.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        let user_cookie = login(&app, "bob3", "secret1").await;

        let mut request = json_request("POST", "/api/chat/messages", json!({ "message": "hello" }));
        request
            .headers_mut()
            .insert(header::COOKIE, user_cookie.parse().unwrap());
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get_request("/api/chat/messages", None))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["count"], 1);
        let message_id = body["data"]["messages"][0]["id"].as_i64().unwrap();

        // A regular user is forbidden
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/chat/messages/{message_id}"))
                    .header(header::COOKIE, user_cookie.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // The seeded administrator may moderate
        let admin_cookie = login(&app, "admin", "admin123").await;
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/chat/messages/{message_id}"))
                    .header(header::COOKIE, admin_cookie.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get_request("/api/chat/messages", None))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["count"], 0);
    }

    #[tokio::test]
    async fn test_public_catalog_routes() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(get_request("/api/categories", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 8);

        let response = app
            .clone()
            .oneshot(get_request("/api/stats", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["total_games"], 0);

        let response = app
            .clone()
            .oneshot(get_request("/api/games/not-a-uuid", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
