//! AI Action Gateway
//!
//! Every AI move goes through [`AiActionGateway::attempt`]. The gateway adds a
//! human-looking pause, retries the agent a bounded number of times under a
//! timeout, and when nothing usable comes back hands the engine a fallback
//! value that is always valid for the current phase. Agent failures stop here.

use crate::agent::{AiAgent, looks_like_sentinel};
use crate::events::AnswerEntry;
use crate::fallback::{FALLBACK_QUESTIONS, NO_ANSWER};
use crate::player::{AgentPersona, PlayerId};
use crate::prompts::PromptVariant;
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayConfig {
    pub max_attempts: u32,
    /// Upper bound for a single agent call.
    pub attempt_timeout: Duration,
    /// Upper bound for the whole action, think delay included.
    pub action_budget: Duration,
    pub think_delay_min: Duration,
    pub think_delay_max: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(10),
            action_budget: Duration::from_secs(24),
            think_delay_min: Duration::from_millis(1500),
            think_delay_max: Duration::from_millis(4000),
        }
    }
}

impl GatewayConfig {
    /// Per-attempt timeout once `delay` has been spent thinking.
    pub fn per_attempt_timeout(&self, delay: Duration) -> Duration {
        let attempts = self.max_attempts.max(1);
        let share = self.action_budget.saturating_sub(delay) / attempts;
        share.min(self.attempt_timeout)
    }
}

/// What the engine wants from an AI seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiRequest {
    Question {
        variant: PromptVariant,
    },
    Answer {
        question: String,
        variant: PromptVariant,
    },
    Vote {
        question: String,
        answers: BTreeMap<PlayerId, AnswerEntry>,
    },
}

impl AiRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            AiRequest::Question { .. } => "question",
            AiRequest::Answer { .. } => "answer",
            AiRequest::Vote { .. } => "vote",
        }
    }

    fn thinks_first(&self) -> bool {
        !matches!(self, AiRequest::Question { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionValue {
    Question(String),
    Answer(String),
    Vote(Option<PlayerId>),
}

/// Every attempt failed; `value` is the phase-compatible stand-in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("AI {kind} fell back after {attempts} failed attempt(s)")]
pub struct FallbackUsed {
    pub kind: &'static str,
    pub attempts: u32,
    pub value: ActionValue,
}

impl FallbackUsed {
    pub fn into_value(self) -> ActionValue {
        self.value
    }
}

pub struct AiActionGateway {
    agent: Arc<dyn AiAgent>,
    config: GatewayConfig,
    next_fallback: AtomicUsize,
}

impl AiActionGateway {
    pub fn new(agent: Arc<dyn AiAgent>, config: GatewayConfig) -> Self {
        Self {
            agent,
            config,
            next_fallback: AtomicUsize::new(0),
        }
    }

    /// Runs one AI action to completion. Never panics and never hangs past the
    /// configured budget.
    pub async fn attempt(
        &self,
        persona: &AgentPersona,
        request: &AiRequest,
    ) -> Result<ActionValue, FallbackUsed> {
        let delay = if request.thinks_first() {
            self.think_delay()
        } else {
            Duration::ZERO
        };
        if !delay.is_zero() {
            sleep(delay).await;
        }

        let per_attempt = self.config.per_attempt_timeout(delay);
        let attempts = self.config.max_attempts.max(1);

        for attempt in 1..=attempts {
            match timeout(per_attempt, self.call(persona, request)).await {
                Ok(Ok(value)) => match accept(value) {
                    Some(value) => {
                        debug!(
                            player = %persona.name,
                            kind = request.kind(),
                            attempt,
                            "AI action accepted"
                        );
                        return Ok(value);
                    }
                    None => {
                        warn!(
                            player = %persona.name,
                            kind = request.kind(),
                            attempt,
                            "AI returned unusable output"
                        )
                    }
                },
                Ok(Err(e)) => {
                    warn!(
                        player = %persona.name,
                        kind = request.kind(),
                        attempt,
                        error = %e,
                        "AI call failed"
                    )
                }
                Err(_) => {
                    warn!(
                        player = %persona.name,
                        kind = request.kind(),
                        attempt,
                        timeout_ms = per_attempt.as_millis() as u64,
                        "AI call timed out"
                    )
                }
            }
        }

        Err(FallbackUsed {
            kind: request.kind(),
            attempts,
            value: self.fallback(request),
        })
    }

    async fn call(
        &self,
        persona: &AgentPersona,
        request: &AiRequest,
    ) -> anyhow::Result<ActionValue> {
        Ok(match request {
            AiRequest::Question { variant } => {
                ActionValue::Question(self.agent.question(persona, *variant).await?)
            }
            AiRequest::Answer { question, variant } => {
                ActionValue::Answer(self.agent.answer(persona, question, *variant).await?)
            }
            AiRequest::Vote { question, answers } => {
                ActionValue::Vote(self.agent.vote(persona, question, answers).await?)
            }
        })
    }

    fn think_delay(&self) -> Duration {
        let min = self.config.think_delay_min.as_millis() as u64;
        let max = (self.config.think_delay_max.as_millis() as u64).max(min);
        Duration::from_millis(rand::rng().random_range(min..=max))
    }

    fn fallback(&self, request: &AiRequest) -> ActionValue {
        match request {
            AiRequest::Question { .. } => {
                let idx = self.next_fallback.fetch_add(1, Ordering::Relaxed);
                let line = FALLBACK_QUESTIONS[idx % FALLBACK_QUESTIONS.len()];
                ActionValue::Question(line.to_string())
            }
            AiRequest::Answer { .. } => ActionValue::Answer(NO_ANSWER.to_string()),
            AiRequest::Vote { .. } => ActionValue::Vote(None),
        }
    }
}

fn usable_text(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && !looks_like_sentinel(text)
}

fn accept(value: ActionValue) -> Option<ActionValue> {
    match value {
        ActionValue::Question(text) if usable_text(&text) => {
            Some(ActionValue::Question(text.trim().to_string()))
        }
        ActionValue::Answer(text) if usable_text(&text) => {
            Some(ActionValue::Answer(text.trim().to_string()))
        }
        ActionValue::Vote(None) => Some(ActionValue::Vote(None)),
        ActionValue::Vote(Some(id)) if usable_text(id.as_str()) => {
            Some(ActionValue::Vote(Some(id)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::MockAiAgent;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use tokio::time::Instant;

    fn persona() -> AgentPersona {
        AgentPersona {
            id: PlayerId::from("ai-1"),
            name: "ShinyBear7".to_string(),
        }
    }

    /// Never answers.
    struct StallingAgent;

    #[async_trait]
    impl AiAgent for StallingAgent {
        async fn question(&self, _: &AgentPersona, _: PromptVariant) -> Result<String> {
            std::future::pending().await
        }
        async fn answer(&self, _: &AgentPersona, _: &str, _: PromptVariant) -> Result<String> {
            std::future::pending().await
        }
        async fn vote(
            &self,
            _: &AgentPersona,
            _: &str,
            _: &BTreeMap<PlayerId, AnswerEntry>,
        ) -> Result<Option<PlayerId>> {
            std::future::pending().await
        }
    }

    #[test]
    fn test_per_attempt_timeout_shrinks_with_delay() {
        let config = GatewayConfig::default();
        assert_eq!(config.per_attempt_timeout(Duration::ZERO), Duration::from_secs(8));
        assert_eq!(
            config.per_attempt_timeout(Duration::from_secs(3)),
            Duration::from_secs(7)
        );
        assert_eq!(config.per_attempt_timeout(Duration::from_secs(60)), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_question_falls_back_within_budget() {
        let gateway = AiActionGateway::new(Arc::new(StallingAgent), GatewayConfig::default());
        let started = Instant::now();

        let result = gateway
            .attempt(&persona(), &AiRequest::Question { variant: PromptVariant::Plain })
            .await;

        let fallback = result.unwrap_err();
        assert_eq!(fallback.attempts, 3);
        match fallback.into_value() {
            ActionValue::Question(q) => {
                assert!(!q.is_empty());
                assert!(FALLBACK_QUESTIONS.contains(&q.as_str()));
            }
            other => panic!("unexpected fallback {other:?}"),
        }
        assert!(started.elapsed() <= GatewayConfig::default().action_budget);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_questions_rotate() {
        let gateway = AiActionGateway::new(Arc::new(StallingAgent), GatewayConfig::default());
        let request = AiRequest::Question { variant: PromptVariant::Plain };

        let first = gateway.attempt(&persona(), &request).await.unwrap_err().into_value();
        let second = gateway.attempt(&persona(), &request).await.unwrap_err().into_value();

        assert_eq!(first, ActionValue::Question(FALLBACK_QUESTIONS[0].to_string()));
        assert_eq!(second, ActionValue::Question(FALLBACK_QUESTIONS[1].to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_answer_and_vote_fallbacks() {
        let gateway = AiActionGateway::new(Arc::new(StallingAgent), GatewayConfig::default());
        let started = Instant::now();

        let answer = gateway
            .attempt(
                &persona(),
                &AiRequest::Answer {
                    question: "dogs or cats?".to_string(),
                    variant: PromptVariant::Terse,
                },
            )
            .await;
        assert_eq!(
            answer.unwrap_err().into_value(),
            ActionValue::Answer(NO_ANSWER.to_string())
        );
        assert!(started.elapsed() <= GatewayConfig::default().action_budget);

        let vote = gateway
            .attempt(
                &persona(),
                &AiRequest::Vote {
                    question: "dogs or cats?".to_string(),
                    answers: BTreeMap::new(),
                },
            )
            .await;
        assert_eq!(vote.unwrap_err().into_value(), ActionValue::Vote(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_past_errors_and_sentinels() {
        let mut agent = MockAiAgent::new();
        let mut calls = 0;
        agent.expect_answer().times(3).returning(move |_, _, _| {
            calls += 1;
            match calls {
                1 => Err(anyhow!("connection reset")),
                2 => Ok("(API Error: rate limited)".to_string()),
                _ => Ok("  sleeping in  ".to_string()),
            }
        });
        let gateway = AiActionGateway::new(Arc::new(agent), GatewayConfig::default());

        let value = gateway
            .attempt(
                &persona(),
                &AiRequest::Answer {
                    question: "best weekend?".to_string(),
                    variant: PromptVariant::Casual,
                },
            )
            .await;

        assert_eq!(value, Ok(ActionValue::Answer("sleeping in".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_vote_abstain_is_accepted() {
        let mut agent = MockAiAgent::new();
        agent.expect_vote().times(1).returning(|_, _, _| Ok(None));
        let gateway = AiActionGateway::new(Arc::new(agent), GatewayConfig::default());

        let value = gateway
            .attempt(
                &persona(),
                &AiRequest::Vote {
                    question: "q?".to_string(),
                    answers: BTreeMap::new(),
                },
            )
            .await;

        assert_eq!(value, Ok(ActionValue::Vote(None)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_question_is_retried_then_falls_back() {
        let mut agent = MockAiAgent::new();
        agent
            .expect_question()
            .times(3)
            .returning(|_, _| Ok("   ".to_string()));
        let gateway = AiActionGateway::new(Arc::new(agent), GatewayConfig::default());

        let result = gateway
            .attempt(&persona(), &AiRequest::Question { variant: PromptVariant::Quirky })
            .await;

        assert!(matches!(
            result,
            Err(FallbackUsed { kind: "question", attempts: 3, .. })
        ));
    }
}
