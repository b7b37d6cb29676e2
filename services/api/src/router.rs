//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API, WebSocket endpoint, and OpenAPI documentation.

use crate::{
    handlers,
    models::{ErrorResponse, GameDetail, GameSummary, LobbyStatus, Seat, SeatStatus},
    state::AppState,
    ws::ws_handler,
};

use axum::{Router, routing::get};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_games,
        handlers::get_game,
        handlers::lobby_status,
    ),
    components(
        schemas(GameSummary, GameDetail, Seat, SeatStatus, LobbyStatus, ErrorResponse)
    ),
    tags(
        (name = "Turing Hunt API", description = "Observability for running games and the lobby")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/games", get(handlers::list_games))
        .route("/games/{id}", get(handlers::get_game))
        .route("/lobby", get(handlers::lobby_status))
        .route("/ws", get(ws_handler))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
