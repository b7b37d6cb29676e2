//! Axum Handlers for the REST API
//!
//! Read-only observability over running games and the lobby. The `utoipa`
//! attributes feed the OpenAPI document.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    models::{ErrorResponse, GameDetail, GameSummary, LobbyStatus},
    state::AppState,
};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
}

impl ApiError {
    fn game_not_found(id: Uuid) -> Self {
        ApiError::NotFound(format!("Game with id '{id}' not found"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
        }
    }
}

/// List all running games.
#[utoipa::path(
    get,
    path = "/games",
    responses(
        (status = 200, description = "Running games", body = [GameSummary])
    )
)]
pub async fn list_games(State(state): State<Arc<AppState>>) -> Json<Vec<GameSummary>> {
    let mut games = Vec::new();
    for handle in state.sessions.list().await {
        // A game that finished between listing and asking is skipped.
        if let Ok(snapshot) = handle.snapshot().await {
            games.push(GameSummary::from(&snapshot));
        }
    }
    games.sort_by_key(|g| g.id);
    Json(games)
}

/// Get the public state of one game.
#[utoipa::path(
    get,
    path = "/games/{id}",
    responses(
        (status = 200, description = "Game found", body = GameDetail),
        (status = 404, description = "Game not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Game ID")
    )
)]
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameDetail>, ApiError> {
    let handle = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::game_not_found(id))?;
    // The game may finish between the lookup and the snapshot.
    let snapshot = handle
        .snapshot()
        .await
        .map_err(|_| ApiError::game_not_found(id))?;
    Ok(Json(snapshot.into()))
}

/// How many players are waiting for a standard game.
#[utoipa::path(
    get,
    path = "/lobby",
    responses(
        (status = 200, description = "Lobby status", body = LobbyStatus)
    )
)]
pub async fn lobby_status(State(state): State<Arc<AppState>>) -> Json<LobbyStatus> {
    Json(LobbyStatus {
        waiting: state.lobby.len().await,
        group_size: state.lobby.group_size(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use turing_core::agent::CannedAgent;
    use turing_core::{GameMode, PlayerId};

    fn state() -> Arc<AppState> {
        AppState::new(Config::default(), Arc::new(CannedAgent))
    }

    #[tokio::test]
    async fn test_not_found_response_body() {
        let response = ApiError::game_not_found(Uuid::nil()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body["message"],
            "Game with id '00000000-0000-0000-0000-000000000000' not found"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_and_get_games() {
        let state = state();
        let Json(empty) = list_games(State(state.clone())).await;
        assert!(empty.is_empty());

        let solo = PlayerId::from("solo");
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        state.connections.register(solo.clone(), tx);

        let handle = state
            .start_game(GameMode::Solo, vec![solo])
            .await
            .unwrap();

        let Json(games) = list_games(State(state.clone())).await;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, handle.id());
        assert_eq!(games[0].mode, GameMode::Solo);
        assert_eq!(games[0].active_players, 6);

        let Json(detail) = get_game(State(state.clone()), Path(handle.id()))
            .await
            .unwrap();
        assert_eq!(detail.players.len(), 6);
        assert_eq!(detail.round, games[0].round);
    }

    #[tokio::test]
    async fn test_get_unknown_game_is_404() {
        let state = state();
        let err = get_game(State(state), Path(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_lobby_status() {
        let state = state();
        state.join_lobby(PlayerId::from("waiting")).await;

        let Json(status) = lobby_status(State(state)).await;
        assert_eq!(status, LobbyStatus { waiting: 1, group_size: 3 });
    }
}
