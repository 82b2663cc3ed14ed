pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod repo;
pub mod routes;

use std::sync::Arc;

use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::repo::MovieRepo;

pub struct AppState {
    pub movies: MovieRepo,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { movies: MovieRepo::new(db) }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/movies", get(routes::list_movies).post(routes::create_movie))
        .route(
            "/movies/{id}",
            get(routes::get_movie).put(routes::update_movie).delete(routes::delete_movie),
        )
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
