//! Joke and like endpoints.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::extract::JsonBody;
use crate::http::server::AppState;
use crate::jokes::Joke;

pub const JOKE_ADDED: &str = "We have added your joke";

#[derive(Debug, Serialize)]
pub struct JokeCreated {
    pub status: &'static str,
    #[serde(flatten)]
    pub joke: Joke,
}

#[derive(Debug, Serialize)]
pub struct LikesView {
    pub likes: Value,
}

#[derive(Debug, Serialize)]
pub struct LikesUpdated {
    pub status: &'static str,
    pub likes: Value,
}

#[derive(Debug, Deserialize)]
pub struct LikesUpdate {
    #[serde(default)]
    pub likes: Value,
}

/// `GET /joke`
pub async fn sentinel_joke(State(state): State<AppState>) -> String {
    state.jokes.sentinel().to_string()
}

/// `GET /all`
pub async fn list_jokes(State(state): State<AppState>) -> Json<Vec<Joke>> {
    Json(state.jokes.list_all().await)
}

/// `GET /joke/{id}`
pub async fn get_joke(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Joke>, ApiError> {
    let Path(id) = id.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Undecodable joke id");
        ApiError::joke_not_found()
    })?;
    match state.jokes.get(&id).await {
        Some(joke) => Ok(Json(joke)),
        None => {
            tracing::debug!(id = %id, "Joke lookup missed");
            Err(ApiError::joke_not_found())
        }
    }
}

/// `POST /joke`
pub async fn create_joke(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<JokeCreated>, ApiError> {
    let text = body
        .get("text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .ok_or_else(ApiError::invalid_body)?;

    let joke = state.jokes.append(text.to_string()).await;
    tracing::info!(id = joke.id, "Joke added");

    Ok(Json(JokeCreated {
        status: JOKE_ADDED,
        joke,
    }))
}

/// `GET /likes`
pub async fn get_likes(State(state): State<AppState>) -> Json<LikesView> {
    Json(LikesView {
        likes: state.likes.get().await,
    })
}

/// `POST /likes`
pub async fn set_likes(
    State(state): State<AppState>,
    JsonBody(update): JsonBody<LikesUpdate>,
) -> Json<LikesUpdated> {
    let likes = state.likes.set(update.likes).await;
    tracing::info!(likes = %likes, "Likes replaced");

    Json(LikesUpdated {
        status: "success",
        likes,
    })
}
