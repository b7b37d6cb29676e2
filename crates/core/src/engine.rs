//! Phase Engine
//!
//! Each session runs as one actor task that owns every piece of mutable game
//! state. Clients, AI actions, deadline timers and the sync supervisor all talk
//! to it through a single [`SessionCommand`] channel, so state changes happen
//! one at a time. Anything asynchronous carries the [`Epoch`] it was started in
//! and is dropped on arrival if the session has since moved on.

use crate::cosmetics::{Cosmetics, RandomCosmetics};
use crate::error::{SessionError, SubmissionError};
use crate::events::{
    AnswerEntry, EliminatedPlayer, FinalState, GameMode, Outbound, Phase, PhaseAnnouncement,
    RevealResults, ServerEvent, SessionId,
};
use crate::fallback::{ASK_TIMEOUT_QUESTION, NO_ANSWER};
use crate::gateway::{ActionValue, AiActionGateway, AiRequest};
use crate::lifecycle::{Ending, GameLifecycle};
use crate::moderation::{ContentFilter, PassThrough};
use crate::player::{Player, PlayerId, PlayerRegistry, PlayerStatus, PublicPlayer};
use crate::rules::GameRules;
use crate::sync::SyncSupervisor;
use crate::votes;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{Instrument, debug, info, info_span, warn};

/// Identifies one phase of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch {
    pub round: u32,
    pub phase: Phase,
}

/// Something a connected human did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientInput {
    SubmitQuestion(String),
    SubmitAnswer(String),
    SubmitVote(Option<PlayerId>),
    PhaseAck {
        round: Option<u32>,
        phase: Option<Phase>,
    },
    Heartbeat {
        round: Option<u32>,
        phase: Option<Phase>,
    },
}

#[derive(Debug)]
pub enum SessionCommand {
    Client {
        player: PlayerId,
        input: ClientInput,
    },
    Disconnect(PlayerId),
    AiResolved {
        epoch: Epoch,
        player: PlayerId,
        value: ActionValue,
    },
    DeadlineElapsed(Epoch),
    AckOverdue {
        epoch: Epoch,
        player: PlayerId,
    },
    SyncSweep,
    Inspect(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

/// Public view of a running session. Carries no human/AI tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub mode: GameMode,
    pub round: u32,
    pub phase: Option<Phase>,
    pub asker_id: Option<PlayerId>,
    pub question: Option<String>,
    pub answers_received: usize,
    pub votes_received: usize,
    pub players: Vec<PublicPlayer>,
}

impl SessionSnapshot {
    pub fn active_players(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.status == PlayerStatus::Active)
            .count()
    }
}

/// Returned by the actor task when it exits.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: SessionId,
    pub mode: GameMode,
    pub rounds_played: u32,
    pub humans: Vec<PlayerId>,
    pub ending: Option<Ending>,
}

/// Collaborators shared by every session.
#[derive(Clone)]
pub struct SessionServices {
    pub rules: GameRules,
    pub gateway: Arc<AiActionGateway>,
    pub filter: Arc<dyn ContentFilter>,
    pub cosmetics: Arc<dyn Cosmetics>,
}

impl SessionServices {
    pub fn new(rules: GameRules, gateway: Arc<AiActionGateway>) -> Self {
        Self {
            rules,
            gateway,
            filter: Arc::new(PassThrough),
            cosmetics: Arc::new(RandomCosmetics),
        }
    }

    pub fn with_filter(mut self, filter: Arc<dyn ContentFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_cosmetics(mut self, cosmetics: Arc<dyn Cosmetics>) -> Self {
        self.cosmetics = cosmetics;
        self
    }
}

/// Cheap, cloneable way to talk to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    mode: GameMode,
    humans: Arc<[PlayerId]>,
    commands: UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn humans(&self) -> &[PlayerId] {
        &self.humans
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    pub fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::Closed(self.id))
    }

    pub fn submit(&self, player: PlayerId, input: ClientInput) -> Result<(), SessionError> {
        self.send(SessionCommand::Client { player, input })
    }

    pub fn disconnect(&self, player: PlayerId) -> Result<(), SessionError> {
        self.send(SessionCommand::Disconnect(player))
    }

    pub fn shutdown(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Shutdown)
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Inspect(reply))?;
        rx.await.map_err(|_| SessionError::Closed(self.id))
    }
}

/// Seats the roster and starts the session actor.
pub fn spawn_session(
    id: SessionId,
    mode: GameMode,
    humans: Vec<PlayerId>,
    services: SessionServices,
    outbound: UnboundedSender<Outbound>,
) -> Result<(SessionHandle, JoinHandle<SessionSummary>), SessionError> {
    let lifecycle = GameLifecycle::new(id, mode, services.rules.clone());
    let mut rng = StdRng::from_os_rng();
    let players = lifecycle.build_roster(&humans, services.cosmetics.as_ref(), &mut rng)?;

    let (commands, inbox) = mpsc::unbounded_channel();
    let engine = PhaseEngine::new(
        lifecycle,
        players,
        humans.clone(),
        services,
        outbound,
        commands.clone(),
        rng,
    );

    let span = info_span!("game_session", game_id = %id, ?mode);
    let task = tokio::spawn(engine.run(inbox).instrument(span));

    let handle = SessionHandle {
        id,
        mode,
        humans: humans.into(),
        commands,
    };
    Ok((handle, task))
}

/// Trims and checks human-written text.
pub fn validate_text(
    text: &str,
    max_len: usize,
    filter: &dyn ContentFilter,
) -> Result<String, SubmissionError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SubmissionError::Empty);
    }
    if text.chars().count() > max_len {
        return Err(SubmissionError::TooLong { max: max_len });
    }
    filter.review(text).map_err(SubmissionError::Rejected)?;
    Ok(text.to_string())
}

fn clamp_chars(text: &str, max_len: usize) -> String {
    text.trim().chars().take(max_len).collect()
}

struct PhaseEngine {
    lifecycle: GameLifecycle,
    services: SessionServices,
    players: PlayerRegistry,
    humans: Vec<PlayerId>,
    outbound: UnboundedSender<Outbound>,
    commands: UnboundedSender<SessionCommand>,
    sync: SyncSupervisor,
    rng: StdRng,

    round: u32,
    phase: Option<Phase>,
    asker_id: Option<PlayerId>,
    question: Option<String>,
    answers: BTreeMap<PlayerId, String>,
    votes: HashMap<PlayerId, Option<PlayerId>>,
    deadline: Option<JoinHandle<()>>,
    ending: Option<Ending>,
}

impl PhaseEngine {
    fn new(
        lifecycle: GameLifecycle,
        players: PlayerRegistry,
        humans: Vec<PlayerId>,
        services: SessionServices,
        outbound: UnboundedSender<Outbound>,
        commands: UnboundedSender<SessionCommand>,
        rng: StdRng,
    ) -> Self {
        let sync = SyncSupervisor::new(lifecycle.rules().sync, outbound.clone(), commands.clone());
        Self {
            lifecycle,
            services,
            players,
            humans,
            outbound,
            commands,
            sync,
            rng,
            round: 0,
            phase: None,
            asker_id: None,
            question: None,
            answers: BTreeMap::new(),
            votes: HashMap::new(),
            deadline: None,
            ending: None,
        }
    }

    async fn run(mut self, mut inbox: UnboundedReceiver<SessionCommand>) -> SessionSummary {
        self.start();
        while self.ending.is_none() {
            match inbox.recv().await {
                Some(command) => self.handle(command),
                None => break,
            }
        }
        self.teardown();
        info!(rounds = self.round, "Session finished");

        SessionSummary {
            id: self.lifecycle.id(),
            mode: self.lifecycle.mode(),
            rounds_played: self.round,
            humans: self.humans,
            ending: self.ending,
        }
    }

    fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Client { player, input } => self.on_client(player, input),
            SessionCommand::Disconnect(player) => self.on_disconnect(&player),
            SessionCommand::AiResolved {
                epoch,
                player,
                value,
            } => self.on_ai_resolved(epoch, player, value),
            SessionCommand::DeadlineElapsed(epoch) => self.on_deadline(epoch),
            SessionCommand::AckOverdue { epoch, player } => self.sync.ack_overdue(epoch, &player),
            SessionCommand::SyncSweep => self.sync.sweep(),
            SessionCommand::Inspect(reply) => {
                let _ = reply.send(self.snapshot());
            }
            SessionCommand::Shutdown => self.finish(Ending::closed()),
        }
    }

    fn rules(&self) -> &GameRules {
        self.lifecycle.rules()
    }

    fn epoch(&self) -> Option<Epoch> {
        self.phase.map(|phase| Epoch {
            round: self.round,
            phase,
        })
    }

    fn start(&mut self) {
        info!(players = self.players.len(), "Game starting");
        let players = self.players.public_view();
        for human in &self.humans {
            self.send_to(
                human,
                ServerEvent::GameStart {
                    game_id: self.lifecycle.id(),
                    mode: self.lifecycle.mode(),
                    players: players.clone(),
                    your_player_id: human.clone(),
                },
            );
        }
        self.sync.start_sweep();
        self.begin_round();
    }

    // ---- phase entry ------------------------------------------------------

    fn announcement(&self, phase: Phase) -> PhaseAnnouncement {
        PhaseAnnouncement {
            round: self.round,
            phase,
            duration: self.rules().durations.of(phase).as_secs(),
            asker_id: None,
            asker_name: None,
            question: None,
            answers: None,
            results: None,
            players: None,
        }
    }

    fn with_asker(&self, mut announcement: PhaseAnnouncement) -> PhaseAnnouncement {
        let asker = self.asker_id.as_ref().and_then(|id| self.players.get(id));
        announcement.asker_id = asker.map(|p| p.id.clone());
        announcement.asker_name = asker.map(|p| p.display_name.clone());
        announcement
    }

    fn enter(&mut self, announcement: PhaseAnnouncement) {
        let epoch = Epoch {
            round: self.round,
            phase: announcement.phase,
        };
        self.phase = Some(epoch.phase);

        let limit = self.rules().durations.of(epoch.phase);
        self.arm_deadline(epoch, limit);

        info!(round = epoch.round, phase = %epoch.phase, "Entering phase");
        self.broadcast(ServerEvent::NewRoundPhase(announcement));

        let humans: Vec<PlayerId> = self.players.active_humans().map(|p| p.id.clone()).collect();
        self.sync.phase_changed(epoch, humans);
    }

    fn arm_deadline(&mut self, epoch: Epoch, after: Duration) {
        if let Some(previous) = self.deadline.take() {
            previous.abort();
        }
        let commands = self.commands.clone();
        self.deadline = Some(tokio::spawn(async move {
            sleep(after).await;
            let _ = commands.send(SessionCommand::DeadlineElapsed(epoch));
        }));
    }

    fn begin_round(&mut self) {
        if self.players.active_count() < 2 {
            warn!(active = self.players.active_count(), "Fewer than two active players");
            self.finish(Ending::not_enough_players());
            return;
        }

        self.round += 1;
        self.question = None;
        self.answers.clear();
        self.votes.clear();

        let active: Vec<&Player> = self.players.active().collect();
        let Some(asker) = active.choose(&mut self.rng).map(|p| (*p).clone()) else {
            return;
        };
        debug!(round = self.round, asker = %asker.display_name, "Asker chosen");

        self.asker_id = Some(asker.id.clone());
        let announcement = self.with_asker(self.announcement(Phase::Asking));
        self.enter(announcement);

        if !asker.is_human {
            self.request_ai(
                &asker,
                AiRequest::Question {
                    variant: asker.prompt_variant,
                },
            );
        }
    }

    fn begin_answering(&mut self, question: String) {
        self.question = Some(question.clone());

        let mut announcement = self.with_asker(self.announcement(Phase::Answering));
        announcement.question = Some(question.clone());
        self.enter(announcement);

        let responders: Vec<Player> = self
            .players
            .active_ai()
            .filter(|p| Some(&p.id) != self.asker_id.as_ref())
            .cloned()
            .collect();
        for player in &responders {
            self.request_ai(
                player,
                AiRequest::Answer {
                    question: question.clone(),
                    variant: player.prompt_variant,
                },
            );
        }

        self.check_complete();
    }

    fn begin_voting(&mut self) {
        for id in self.expected_answerers() {
            self.answers
                .entry(id)
                .or_insert_with(|| NO_ANSWER.to_string());
        }

        let sheet = self.answer_sheet();
        let question = self.question.clone().unwrap_or_default();

        let mut announcement = self.with_asker(self.announcement(Phase::Voting));
        announcement.question = Some(question.clone());
        announcement.answers = Some(sheet.clone());
        self.enter(announcement);

        let voters: Vec<Player> = self.players.active_ai().cloned().collect();
        for player in &voters {
            self.request_ai(
                player,
                AiRequest::Vote {
                    question: question.clone(),
                    answers: sheet.clone(),
                },
            );
        }

        self.check_complete();
    }

    fn begin_reveal(&mut self) {
        let active: Vec<PlayerId> = self.players.active().map(|p| p.id.clone()).collect();
        for id in active {
            self.votes.entry(id).or_insert(None);
        }

        let outcome = votes::resolve(self.players.all(), &self.votes, self.rules().tie_policy);

        let mut eliminated = Vec::with_capacity(outcome.eliminated_ids.len());
        for id in &outcome.eliminated_ids {
            if !self.players.deactivate(id, PlayerStatus::Eliminated) {
                continue;
            }
            if let Some(player) = self.players.get(id) {
                eliminated.push(EliminatedPlayer {
                    id: player.id.clone(),
                    name: player.display_name.clone(),
                    was_human: player.is_human,
                });
            }
        }
        info!(round = self.round, eliminated = ?outcome.eliminated_names, "Votes resolved");

        let results = RevealResults {
            vote_counts: outcome.vote_counts,
            eliminated,
            votes: self
                .votes
                .iter()
                .map(|(voter, target)| (voter.clone(), target.clone()))
                .collect(),
        };

        let mut announcement = self.announcement(Phase::Reveal);
        announcement.results = Some(results);
        announcement.players = Some(self.players.public_view());
        self.asker_id = None;
        self.enter(announcement);
    }

    fn after_reveal(&mut self) {
        match self.lifecycle.check_end(&self.players, self.round, true) {
            Some(ending) => self.finish(ending),
            None => self.begin_round(),
        }
    }

    fn finish(&mut self, ending: Ending) {
        if self.ending.is_some() {
            return;
        }
        info!(reason = %ending.reason, winner = ?ending.winner, rounds = self.round, "Game over");
        self.teardown();
        self.phase = None;

        self.broadcast(ServerEvent::GameOver {
            reason: ending.reason.clone(),
            winner: ending.winner,
            solo_outcome: ending.solo_outcome,
            final_state: FinalState {
                rounds_played: self.round,
                players: self.players.revealed_view(),
            },
        });
        self.ending = Some(ending);
    }

    fn teardown(&mut self) {
        if let Some(deadline) = self.deadline.take() {
            deadline.abort();
        }
        self.sync.stop();
    }

    // ---- completion -------------------------------------------------------

    fn expected_answerers(&self) -> Vec<PlayerId> {
        self.players
            .active()
            .filter(|p| Some(&p.id) != self.asker_id.as_ref())
            .map(|p| p.id.clone())
            .collect()
    }

    fn answer_sheet(&self) -> BTreeMap<PlayerId, AnswerEntry> {
        self.answers
            .iter()
            .filter_map(|(id, answer)| {
                self.players.get(id).map(|p| {
                    (
                        id.clone(),
                        AnswerEntry {
                            name: p.display_name.clone(),
                            answer: answer.clone(),
                        },
                    )
                })
            })
            .collect()
    }

    /// Advances as soon as the current phase has everything it needs.
    fn check_complete(&mut self) {
        match self.phase {
            Some(Phase::Answering) => {
                let done = self
                    .expected_answerers()
                    .iter()
                    .all(|id| self.answers.contains_key(id));
                if done {
                    debug!("All answers in");
                    self.begin_voting();
                }
            }
            Some(Phase::Voting) => {
                let done = self
                    .players
                    .active()
                    .all(|p| self.votes.contains_key(&p.id));
                if done {
                    debug!("All votes in");
                    self.begin_reveal();
                }
            }
            _ => {}
        }
    }

    fn on_deadline(&mut self, epoch: Epoch) {
        if self.epoch() != Some(epoch) {
            debug!(?epoch, "Stale deadline ignored");
            return;
        }
        self.deadline = None;
        match epoch.phase {
            Phase::Asking => {
                info!("Asker ran out of time, using the default question");
                self.begin_answering(ASK_TIMEOUT_QUESTION.to_string());
            }
            Phase::Answering => self.begin_voting(),
            Phase::Voting => self.begin_reveal(),
            Phase::Reveal => self.after_reveal(),
        }
    }

    // ---- AI ---------------------------------------------------------------

    fn request_ai(&self, player: &Player, request: AiRequest) {
        let Some(epoch) = self.epoch() else { return };
        let gateway = Arc::clone(&self.services.gateway);
        let commands = self.commands.clone();
        let persona = player.persona();
        let span = info_span!("ai_action", player = %persona.name, kind = request.kind());

        tokio::spawn(
            async move {
                let value = match gateway.attempt(&persona, &request).await {
                    Ok(value) => value,
                    Err(fallback) => {
                        warn!(%fallback, "Using fallback value");
                        fallback.into_value()
                    }
                };
                let _ = commands.send(SessionCommand::AiResolved {
                    epoch,
                    player: persona.id,
                    value,
                });
            }
            .instrument(span),
        );
    }

    fn on_ai_resolved(&mut self, epoch: Epoch, player: PlayerId, value: ActionValue) {
        if self.epoch() != Some(epoch) || !self.players.is_active(&player) {
            debug!(%player, ?epoch, "Discarding late AI result");
            return;
        }
        match (epoch.phase, value) {
            (Phase::Asking, ActionValue::Question(question))
                if self.asker_id.as_ref() == Some(&player) =>
            {
                let question = clamp_chars(&question, self.rules().question_max_len);
                self.begin_answering(question);
            }
            (Phase::Answering, ActionValue::Answer(answer)) => {
                let answer = clamp_chars(&answer, self.rules().answer_max_len);
                self.record_answer(player, answer);
            }
            (Phase::Voting, ActionValue::Vote(target)) => {
                let target = self.sanitize_vote(&player, target);
                self.record_vote(player, target);
            }
            (phase, value) => debug!(%phase, ?value, "AI result does not fit the phase"),
        }
    }

    // ---- humans -----------------------------------------------------------

    fn on_client(&mut self, player: PlayerId, input: ClientInput) {
        if self.ending.is_some() {
            return;
        }
        match input {
            ClientInput::SubmitQuestion(text) => self.submit_question(player, &text),
            ClientInput::SubmitAnswer(text) => self.submit_answer(player, &text),
            ClientInput::SubmitVote(target) => self.submit_vote(player, target),
            ClientInput::PhaseAck { round, phase } => self.sync.acknowledge(&player, round, phase),
            ClientInput::Heartbeat { round, phase } => self.sync.heartbeat(&player, round, phase),
        }
    }

    fn submit_question(&mut self, player: PlayerId, text: &str) {
        if self.phase != Some(Phase::Asking)
            || self.asker_id.as_ref() != Some(&player)
            || !self.players.is_active(&player)
        {
            debug!(%player, "Question outside the asking turn ignored");
            return;
        }
        let max = self.rules().question_max_len;
        match validate_text(text, max, self.services.filter.as_ref()) {
            Ok(question) => {
                info!(%player, %question, "Question accepted");
                self.begin_answering(question);
            }
            Err(e) => self.reject(&player, e),
        }
    }

    fn submit_answer(&mut self, player: PlayerId, text: &str) {
        if self.phase != Some(Phase::Answering)
            || !self.players.is_active(&player)
            || self.asker_id.as_ref() == Some(&player)
            || self.answers.contains_key(&player)
        {
            debug!(%player, "Answer ignored");
            return;
        }
        let max = self.rules().answer_max_len;
        match validate_text(text, max, self.services.filter.as_ref()) {
            Ok(answer) => self.record_answer(player, answer),
            Err(e) => self.reject(&player, e),
        }
    }

    fn submit_vote(&mut self, player: PlayerId, target: Option<PlayerId>) {
        if self.phase != Some(Phase::Voting)
            || !self.players.is_active(&player)
            || self.votes.contains_key(&player)
        {
            debug!(%player, "Vote ignored");
            return;
        }
        let target = self.sanitize_vote(&player, target);
        self.send_to(&player, ServerEvent::VoteAccepted);
        self.record_vote(player, target);
    }

    fn reject(&self, player: &PlayerId, error: SubmissionError) {
        debug!(%player, %error, "Submission rejected");
        self.send_to(
            player,
            ServerEvent::ActionError {
                message: error.to_string(),
            },
        );
    }

    /// Self-votes and votes for inactive or unknown players become abstains.
    fn sanitize_vote(&self, voter: &PlayerId, target: Option<PlayerId>) -> Option<PlayerId> {
        let target = target?;
        if target != *voter && self.players.is_active(&target) {
            return Some(target);
        }

        let is_human = self.players.get(voter).is_some_and(|p| p.is_human);
        if is_human {
            let message = if target == *voter {
                "You cannot vote for yourself. Vote counts as abstain.".to_string()
            } else {
                let name = self
                    .players
                    .get(&target)
                    .map(|p| p.display_name.as_str())
                    .unwrap_or("that player");
                format!("Cannot vote for {name}. Vote counts as abstain.")
            };
            self.send_to(voter, ServerEvent::ActionError { message });
        }
        debug!(%voter, %target, "Invalid vote target, recorded as abstain");
        None
    }

    fn record_answer(&mut self, player: PlayerId, answer: String) {
        if self.answers.contains_key(&player) || self.asker_id.as_ref() == Some(&player) {
            return;
        }
        debug!(%player, total = self.answers.len() + 1, "Answer recorded");
        self.answers.insert(player, answer);
        self.check_complete();
    }

    fn record_vote(&mut self, player: PlayerId, target: Option<PlayerId>) {
        if self.votes.contains_key(&player) {
            return;
        }
        self.votes.insert(player, target);
        self.check_complete();
    }

    fn on_disconnect(&mut self, player: &PlayerId) {
        if self.ending.is_some() || !self.players.deactivate(player, PlayerStatus::Disconnected) {
            return;
        }
        info!(%player, "Player disconnected");
        self.sync.player_left(player);

        self.answers.remove(player);
        self.votes.remove(player);
        for target in self.votes.values_mut() {
            if target.as_ref() == Some(player) {
                *target = None;
            }
        }

        self.broadcast(ServerEvent::PlayerUpdate {
            players: self.players.public_view(),
        });

        if let Some(ending) = self.lifecycle.check_end(&self.players, self.round, false) {
            self.finish(ending);
            return;
        }

        match self.phase {
            Some(Phase::Asking) if self.asker_id.as_ref() == Some(player) => {
                info!("Asker left, using the default question");
                self.begin_answering(ASK_TIMEOUT_QUESTION.to_string());
            }
            Some(Phase::Answering) | Some(Phase::Voting) => self.check_complete(),
            _ => {}
        }
    }

    // ---- output -----------------------------------------------------------

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.lifecycle.id(),
            mode: self.lifecycle.mode(),
            round: self.round,
            phase: self.phase,
            asker_id: self.asker_id.clone(),
            question: self.question.clone(),
            answers_received: self.answers.len(),
            votes_received: self.votes.len(),
            players: self.players.public_view(),
        }
    }

    fn broadcast(&self, event: ServerEvent) {
        self.emit(Outbound::all(event));
    }

    fn send_to(&self, player: &PlayerId, event: ServerEvent) {
        self.emit(Outbound::to(player, event));
    }

    fn emit(&self, message: Outbound) {
        if self.outbound.send(message).is_err() {
            debug!("Outbound channel closed");
        }
    }
}
