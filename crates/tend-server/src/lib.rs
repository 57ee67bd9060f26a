//! HTTP server layer for Tend.
//!
//! Wires the `tend-api` router behind HTTP Basic auth, adds an
//! unauthenticated health probe, and traces every request.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, middleware, routing::get};
use serde::Deserialize;
use serde_json::json;
use tend_core::store::HabitStore;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the router.
#[derive(Clone)]
pub struct AppState<S: HabitStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full server router: `/health` open, `/api/*` behind Basic auth.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: HabitStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let api = tend_api::api_router(state.store.clone()).route_layer(
    middleware::from_fn_with_state(state.auth.clone(), auth::require_auth),
  );

  Router::new()
    .route("/health", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
  Json(json!({ "status": "OK" }))
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use rand_core::OsRng;
  use tend_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState {
      store:  Arc::new(store),
      config: Arc::new(ServerConfig {
        host:               "127.0.0.1".to_string(),
        port:               4000,
        store_path:         PathBuf::from(":memory:"),
        auth_username:      "user".to_string(),
        auth_password_hash: hash.clone(),
      }),
      auth:   Arc::new(AuthConfig {
        username:      "user".to_string(),
        password_hash: hash,
      }),
    }
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn health_is_open() {
    let state = make_state("secret").await;
    let resp  = oneshot_raw(state, "GET", "/health", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn api_requires_auth() {
    let state = make_state("secret").await;
    let resp  = oneshot_raw(state, "GET", "/api/habits", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn wrong_password_is_rejected() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "wrong");
    let resp  = oneshot_raw(
      state,
      "GET",
      "/api/habits",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn create_then_list_habits() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/api/habits",
      vec![
        (header::AUTHORIZATION, auth.as_str()),
        (header::CONTENT_TYPE, "application/json"),
      ],
      r#"{"name":"Read","category":"learning"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["name"], "Read");
    assert_eq!(created["streak"]["current"], 0);

    let resp = oneshot_raw(
      state,
      "GET",
      "/api/habits",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn toggling_a_completion_updates_the_streak() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/api/habits",
      vec![
        (header::AUTHORIZATION, auth.as_str()),
        (header::CONTENT_TYPE, "application/json"),
      ],
      r#"{"name":"Run"}"#,
    )
    .await;
    let habit = body_json(resp).await;
    let id = habit["id"].as_str().unwrap().to_owned();

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      &format!("/api/habits/{id}/complete"),
      vec![
        (header::AUTHORIZATION, auth.as_str()),
        (header::CONTENT_TYPE, "application/json"),
      ],
      "{}",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let toggled = body_json(resp).await;
    assert_eq!(toggled["is_completed"], true);
    assert_eq!(toggled["habit"]["streak"]["current"], 1);

    let resp = oneshot_raw(
      state,
      "GET",
      "/api/habits/stats",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let stats = body_json(resp).await;
    assert_eq!(stats["series"].as_array().unwrap().len(), 30);
    assert_eq!(stats["completed_today"], 1);
  }

  #[tokio::test]
  async fn unknown_habit_returns_404() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");
    let resp  = oneshot_raw(
      state,
      "POST",
      "/api/habits/00000000-0000-0000-0000-000000000000/complete",
      vec![
        (header::AUTHORIZATION, auth.as_str()),
        (header::CONTENT_TYPE, "application/json"),
      ],
      "{}",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn goal_progress_derives_over_http() {
    let state = make_state("secret").await;
    let auth  = auth_header("user", "secret");
    let today = chrono::Utc::now().date_naive();

    let body = format!(
      r#"{{"title":"Ship","status":"in_progress",
           "start_date":"{today}","target_date":"{today}",
           "sub_tasks":[{{"title":"a"}},{{"title":"b"}}]}}"#,
    );
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/api/goals",
      vec![
        (header::AUTHORIZATION, auth.as_str()),
        (header::CONTENT_TYPE, "application/json"),
      ],
      &body,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let goal = body_json(resp).await;
    let goal_id = goal["id"].as_str().unwrap().to_owned();
    let task_id = goal["sub_tasks"][0]["id"].as_str().unwrap().to_owned();

    let resp = oneshot_raw(
      state,
      "PUT",
      &format!("/api/goals/{goal_id}/subtasks/{task_id}"),
      vec![
        (header::AUTHORIZATION, auth.as_str()),
        (header::CONTENT_TYPE, "application/json"),
      ],
      r#"{"is_completed":true}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["progress"], 50);
    assert_eq!(updated["status"], "in_progress");
  }
}
