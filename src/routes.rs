use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{CreateMovie, DeleteResponse, Movie, MoviePatch},
};

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.movies.ping().await {
        Ok(db) => Json(json!({
            "status": "ok",
            "db": db,
            "timestamp": jiff::Timestamp::now(),
        }))
        .into_response(),
        Err(err) => {
            tracing::error!(error = ?err, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": err.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn list_movies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Movie>>> {
    let movies =
        state.movies.list().await?.into_iter().map(Movie::try_from).collect::<AppResult<_>>()?;
    Ok(Json(movies))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Movie>> {
    let movie = state.movies.get(parse_id(&id)?).await?;
    Ok(Json(movie.try_into()?))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateMovie>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let Json(req) = payload?;
    let new = req.validate()?;
    let created = state.movies.create(new).await?;
    Ok((StatusCode::CREATED, Json(created.try_into()?)))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<MoviePatch>, JsonRejection>,
) -> AppResult<Json<Movie>> {
    let id = parse_id(&id)?;
    // A bodiless PUT only refreshes `updated_at`.
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(JsonRejection::MissingJsonContentType(_)) => MoviePatch::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    patch.validate()?;
    let updated = state.movies.update(id, patch).await?;
    Ok(Json(updated.try_into()?))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    state.movies.delete(parse_id(&id)?).await?;
    Ok(Json(DeleteResponse { message: "Movie deleted successfully" }))
}

/// An id that isn't an integer can't name a row.
fn parse_id(raw: &str) -> AppResult<i32> {
    raw.trim().parse().map_err(|_| AppError::NotFound)
}
