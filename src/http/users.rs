//! User directory endpoints.
//!
//! Request values are forwarded to the store without transformation apart
//! from parsing the `age` query parameter.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::error::{ApiError, INVALID_AGE};
use crate::http::extract::JsonBody;
use crate::http::server::AppState;
use crate::users::{DeleteSummary, UpdateSummary, User, UserFilter};

#[derive(Debug, Deserialize)]
pub struct UserBody {
    pub name: Option<String>,
    pub age: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AgeThreshold {
    pub age: Option<i64>,
}

/// Query parameters arrive as strings; `age` is parsed by the handler.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub name: Option<String>,
    pub age: Option<String>,
}

impl UserQuery {
    pub fn into_filter(self) -> Result<UserFilter, ApiError> {
        let age = self
            .age
            .map(|raw| raw.parse::<i64>())
            .transpose()
            .map_err(|_| ApiError::InvalidRequest(INVALID_AGE.to_string()))?;
        Ok(UserFilter {
            name: self.name,
            age,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Updated {
    pub message: &'static str,
    pub updated: UpdateSummary,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
    pub deleted: DeleteSummary,
}

/// `POST /user`
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UserBody>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    state
        .users
        .create_user(User {
            name: body.name,
            age: body.age,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "User created successfully.",
        }),
    ))
}

/// `GET /user`
pub async fn find_users(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Vec<User>>, ApiError> {
    let Query(query) = query?;
    let filter = query.into_filter()?;
    let users = state.users.find_users(filter).await?;
    Ok(Json(users))
}

/// `PUT /user`
pub async fn update_users(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UserBody>,
) -> Result<Json<Updated>, ApiError> {
    tracing::debug!(name = ?body.name, age = ?body.age, "Updating user ages");
    let updated = state.users.update_users_age(body.name, body.age).await?;
    tracing::info!(
        matched = updated.matched_count,
        modified = updated.modified_count,
        "Users updated"
    );

    Ok(Json(Updated {
        message: "Updated successfully",
        updated,
    }))
}

/// `DELETE /user`
pub async fn delete_users(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AgeThreshold>,
) -> Result<Json<Deleted>, ApiError> {
    let deleted = state.users.delete_users_below_age(body.age).await?;
    tracing::info!(threshold = ?body.age, deleted = deleted.deleted_count, "Users deleted");

    Ok(Json(Deleted {
        message: "Deleted successfully",
        deleted,
    }))
}
