//! End-to-end games over a real websocket against an in-process server.

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use turing_api::{config::Config, router::create_router, state::AppState};
use turing_core::agent::CannedAgent;
use turing_core::gateway::GatewayConfig;
use turing_core::rules::PhaseDurations;

fn fast_config() -> Config {
    let mut config = Config::default();
    config.rules.durations = PhaseDurations {
        asking: Duration::from_secs(2),
        answering: Duration::from_secs(2),
        voting: Duration::from_secs(2),
        reveal: Duration::from_millis(300),
    };
    config.rules.solo_target_rounds = 1;
    config.gateway = GatewayConfig {
        max_attempts: 2,
        attempt_timeout: Duration::from_millis(500),
        action_budget: Duration::from_secs(1),
        think_delay_min: Duration::from_millis(10),
        think_delay_max: Duration::from_millis(20),
    };
    config
}

async fn spawn_server() -> SocketAddr {
    let state = AppState::new(fast_config(), Arc::new(CannedAgent));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_solo_game_over_websocket() {
    let addr = spawn_server().await;
    let (mut ws, _) = connect_async(format!("ws://{addr}/ws?mode=solo"))
        .await
        .expect("websocket handshake");

    let mut me: Option<String> = None;
    let mut others: Vec<String> = Vec::new();
    let mut phases_seen: Vec<(u64, String)> = Vec::new();

    let game_over = tokio::time::timeout(Duration::from_secs(30), async {
        while let Some(frame) = ws.next().await {
            let Message::Text(text) = frame.expect("socket frame") else {
                continue;
            };
            let event: Value = serde_json::from_str(&text).expect("server sends JSON");

            match event["type"].as_str().unwrap_or_default() {
                "game_start" => {
                    assert_eq!(event["mode"], "solo");
                    let id = event["yourPlayerId"].as_str().unwrap().to_string();
                    let players = event["players"].as_array().unwrap();
                    assert_eq!(players.len(), 6);
                    assert!(players.iter().all(|p| p.get("isHuman").is_none()));
                    others = players
                        .iter()
                        .map(|p| p["id"].as_str().unwrap().to_string())
                        .filter(|p| *p != id)
                        .collect();
                    me = Some(id);
                }
                "new_round_phase" => {
                    let round = event["round"].as_u64().unwrap();
                    let phase = event["phase"].as_str().unwrap().to_string();
                    phases_seen.push((round, phase.clone()));
                    let ack = json!({"type": "phase_ack", "round": round, "phase": phase});
                    ws.send(Message::Text(ack.to_string().into())).await.unwrap();

                    let asking_me = event["askerId"].as_str() == me.as_deref();
                    let reply = match phase.as_str() {
                        "ASKING" if asking_me => {
                            Some(json!({"type": "submit_question", "text": "Favorite breakfast?"}))
                        }
                        "ANSWERING" if !asking_me => {
                            Some(json!({"type": "submit_answer", "text": "pancakes obviously"}))
                        }
                        "VOTING" => Some(json!({"type": "submit_vote", "targetId": others[0]})),
                        _ => None,
                    };
                    if let Some(reply) = reply {
                        ws.send(Message::Text(reply.to_string().into())).await.unwrap();
                    }
                }
                "game_over" => return event,
                _ => {}
            }
        }
        panic!("socket closed before game_over");
    })
    .await
    .expect("solo game should finish");

    let outcome = game_over["soloOutcome"].as_str().unwrap();
    assert!(outcome == "survived" || outcome == "eliminated");
    let final_players = game_over["finalState"]["players"].as_array().unwrap();
    assert_eq!(final_players.len(), 6);
    let humans: Vec<&Value> = final_players
        .iter()
        .filter(|p| p["isHuman"] == true)
        .collect();
    assert_eq!(humans.len(), 1);
    assert_eq!(humans[0]["id"].as_str(), me.as_deref());

    let phases: Vec<&str> = phases_seen.iter().map(|(_, p)| p.as_str()).collect();
    assert_eq!(phases, vec!["ASKING", "ANSWERING", "VOTING", "REVEAL"]);
    assert!(phases_seen.iter().all(|(round, _)| *round == 1));
}

#[tokio::test]
async fn test_standard_connection_waits_in_lobby() {
    let addr = spawn_server().await;
    let (mut ws, _) = connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("websocket handshake");

    let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("lobby count should arrive")
        .expect("socket open")
        .expect("socket frame");
    let Message::Text(text) = frame else {
        panic!("expected a text frame");
    };
    let event: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(event, json!({"type": "waiting_player_count", "count": 1}));
}
