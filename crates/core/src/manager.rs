//! Session Manager
//!
//! Owns the collection of running sessions. Creation seats the roster and
//! spawns the actor; a small reaper task waits for the actor to exit, removes
//! the entry and runs the destroy hook.

use crate::engine::{SessionHandle, SessionServices, SessionSummary, spawn_session};
use crate::error::SessionError;
use crate::events::{GameMode, Outbound, SessionId};
use crate::player::PlayerId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};
use uuid::Uuid;

/// Callbacks around a session's lifetime. Both run outside the session actor.
pub trait SessionHooks: Send + Sync {
    fn on_create(&self, _handle: &SessionHandle) {}
    fn on_destroy(&self, _summary: &SessionSummary) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl SessionHooks for NoopHooks {}

type SessionMap = Arc<RwLock<HashMap<SessionId, SessionHandle>>>;

#[derive(Clone)]
pub struct SessionManager {
    sessions: SessionMap,
    services: SessionServices,
    hooks: Arc<dyn SessionHooks>,
}

impl SessionManager {
    pub fn new(services: SessionServices, hooks: Arc<dyn SessionHooks>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            services,
            hooks,
        }
    }

    /// Starts a session for `humans`. Events for its clients go to `outbound`.
    pub async fn create(
        &self,
        mode: GameMode,
        humans: Vec<PlayerId>,
        outbound: UnboundedSender<Outbound>,
    ) -> Result<SessionHandle, SessionError> {
        let id = Uuid::new_v4();
        let (handle, task) = spawn_session(id, mode, humans, self.services.clone(), outbound)?;

        self.sessions.write().await.insert(id, handle.clone());
        info!(game_id = %id, ?mode, "Session created");
        self.hooks.on_create(&handle);

        let sessions = Arc::clone(&self.sessions);
        let hooks = Arc::clone(&self.hooks);
        let fallback = SessionSummary {
            id,
            mode,
            rounds_played: 0,
            humans: handle.humans().to_vec(),
            ending: None,
        };
        tokio::spawn(async move {
            let summary = match task.await {
                Ok(summary) => summary,
                Err(e) => {
                    error!(game_id = %id, error = %e, "Session task failed");
                    fallback
                }
            };
            sessions.write().await.remove(&id);
            info!(game_id = %id, rounds = summary.rounds_played, "Session removed");
            hooks.on_destroy(&summary);
        });

        Ok(handle)
    }

    pub async fn get(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn list(&self) -> Vec<SessionHandle> {
        self.sessions.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn shutdown(&self, id: SessionId) -> Result<(), SessionError> {
        let handle = self.get(id).await.ok_or(SessionError::NotFound(id))?;
        handle.shutdown()
    }

    pub async fn shutdown_all(&self) {
        for handle in self.list().await {
            let _ = handle.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::CannedAgent;
    use crate::gateway::{AiActionGateway, GatewayConfig};
    use crate::rules::GameRules;
    use std::sync::Mutex;
    use tokio::sync::Notify;
    use tokio::sync::mpsc::unbounded_channel;

    #[derive(Default)]
    struct Recorder {
        created: Mutex<Vec<SessionId>>,
        destroyed: Mutex<Vec<SessionSummary>>,
        gone: Notify,
    }

    impl SessionHooks for Recorder {
        fn on_create(&self, handle: &SessionHandle) {
            self.created.lock().unwrap().push(handle.id());
        }

        fn on_destroy(&self, summary: &SessionSummary) {
            self.destroyed.lock().unwrap().push(summary.clone());
            self.gone.notify_one();
        }
    }

    fn manager(hooks: Arc<dyn SessionHooks>) -> SessionManager {
        let gateway = Arc::new(AiActionGateway::new(
            Arc::new(CannedAgent),
            GatewayConfig::default(),
        ));
        SessionManager::new(SessionServices::new(GameRules::default(), gateway), hooks)
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_then_shutdown_runs_hooks() {
        let recorder = Arc::new(Recorder::default());
        let manager = manager(recorder.clone());
        let (tx, _rx) = unbounded_channel();
        let human = PlayerId::from("solo-human");

        let handle = manager
            .create(GameMode::Solo, vec![human.clone()], tx)
            .await
            .unwrap();
        let id = handle.id();

        assert_eq!(*recorder.created.lock().unwrap(), vec![id]);
        assert!(manager.get(id).await.is_some());
        assert_eq!(manager.list().await.len(), 1);

        manager.shutdown(id).await.unwrap();
        recorder.gone.notified().await;

        assert!(manager.get(id).await.is_none());
        let destroyed = recorder.destroyed.lock().unwrap().clone();
        assert_eq!(destroyed.len(), 1);
        assert_eq!(destroyed[0].humans, vec![human]);
        assert_eq!(
            destroyed[0].ending.as_ref().map(|e| e.reason.as_str()),
            Some("Game closed by server")
        );
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_roster_mismatch_is_not_registered() {
        let manager = manager(Arc::new(NoopHooks));
        let (tx, _rx) = unbounded_channel();

        let err = manager
            .create(GameMode::Standard, vec![PlayerId::new()], tx)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::RosterMismatch { expected: 3, got: 1, .. }));
        assert_eq!(manager.len().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let manager = manager(Arc::new(NoopHooks));
        let id = Uuid::new_v4();
        assert!(matches!(
            manager.shutdown(id).await,
            Err(SessionError::NotFound(missing)) if missing == id
        ));
    }
}
