//! AI Agent Seam
//!
//! The engine never talks to a model directly. It goes through [`AiAgent`],
//! which has one implementation backed by an OpenAI-compatible chat API and one
//! offline implementation for local play and tests. Implementations must not
//! touch game state: they see a persona and the round context, nothing more.

use crate::events::AnswerEntry;
use crate::fallback;
use crate::player::{AgentPersona, PlayerId};
use crate::prompts::{self, PromptBook, PromptVariant, Traits};
use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Substrings that mark a reply as a provider error rather than game text.
pub const SENTINELS: [&str; 3] = ["error", "blocked", "timeout"];

pub fn looks_like_sentinel(text: &str) -> bool {
    let lower = text.to_lowercase();
    SENTINELS.iter().any(|marker| lower.contains(marker))
}

/// The three moves an AI seat can be asked to make.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiAgent: Send + Sync {
    /// Produces the round's question when the seat is the asker.
    async fn question(&self, persona: &AgentPersona, variant: PromptVariant) -> Result<String>;

    /// Answers `question`.
    async fn answer(
        &self,
        persona: &AgentPersona,
        question: &str,
        variant: PromptVariant,
    ) -> Result<String>;

    /// Picks a player to vote out, or `None` to abstain.
    async fn vote(
        &self,
        persona: &AgentPersona,
        question: &str,
        answers: &BTreeMap<PlayerId, AnswerEntry>,
    ) -> Result<Option<PlayerId>>;
}

/// An [`AiAgent`] for any OpenAI-compatible chat completions API.
pub struct LlmAgent {
    client: Client<OpenAIConfig>,
    model: String,
    prompts: PromptBook,
    question_max_len: usize,
    answer_max_len: usize,
}

impl LlmAgent {
    /// Creates a new agent.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer token for the provider.
    /// * `api_base` - Base URL, e.g. `https://openrouter.ai/api/v1`.
    /// * `model` - Model identifier passed through to the provider.
    /// * `prompts` - Templates for the three moves.
    pub fn new(api_key: &str, api_base: &str, model: String, prompts: PromptBook) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self {
            client: Client::with_config(config),
            model,
            prompts,
            question_max_len: 40,
            answer_max_len: 100,
        }
    }

    /// Overrides the length caps used when tidying generated text.
    pub fn with_length_caps(mut self, question_max_len: usize, answer_max_len: usize) -> Self {
        self.question_max_len = question_max_len;
        self.answer_max_len = answer_max_len;
        self
    }

    async fn complete(&self, prompt: String, max_tokens: u32, temperature: f32) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .max_completion_tokens(max_tokens)
            .temperature(temperature)
            .build()?;

        let response = self.client.chat().create(request).await?;

        let text = response
            .choices
            .first()
            .context("No response choice from LLM")?
            .message
            .content
            .as_ref()
            .context("No content in LLM response")?;

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl AiAgent for LlmAgent {
    async fn question(&self, persona: &AgentPersona, variant: PromptVariant) -> Result<String> {
        let traits = Traits::roll(&mut rand::rng(), prompts::QUESTION_WORD_COUNTS);
        let word_count = traits.word_count.to_string();
        let prompt = prompts::render(
            &self.prompts.question,
            &[
                ("player_name", &persona.name),
                ("traits", &traits.describe()),
                ("tone", variant.tone()),
                ("word_count", &word_count),
            ],
        );

        let raw = self.complete(prompt, 25, 0.8).await?;
        let question = tidy_question(&raw, self.question_max_len);

        if !fits_word_target(&question, traits.word_count) {
            warn!(
                player = %persona.name,
                target = traits.word_count,
                got = %question,
                "Question off target, using library line"
            );
            return Ok(fallback::question_for_words(
                &mut rand::rng(),
                traits.word_count,
            ));
        }
        debug!(player = %persona.name, %question, "Generated question");
        Ok(question)
    }

    async fn answer(
        &self,
        persona: &AgentPersona,
        question: &str,
        variant: PromptVariant,
    ) -> Result<String> {
        let traits = Traits::roll(&mut rand::rng(), prompts::ANSWER_WORD_COUNTS);
        let word_count = traits.word_count.to_string();
        let prompt = prompts::render(
            &self.prompts.answer,
            &[
                ("player_name", &persona.name),
                ("question", question),
                ("traits", &traits.describe()),
                ("tone", variant.tone()),
                ("word_count", &word_count),
            ],
        );

        let raw = self.complete(prompt, 40, 0.7).await?;
        let answer = tidy_answer(&raw, self.answer_max_len);

        if !fits_word_target(&answer, traits.word_count) {
            warn!(
                player = %persona.name,
                target = traits.word_count,
                got = %answer,
                "Answer off target, using library line"
            );
            return Ok(fallback::answer_for_words(&mut rand::rng(), traits.word_count));
        }
        debug!(player = %persona.name, %answer, "Generated answer");
        Ok(answer)
    }

    async fn vote(
        &self,
        persona: &AgentPersona,
        question: &str,
        answers: &BTreeMap<PlayerId, AnswerEntry>,
    ) -> Result<Option<PlayerId>> {
        let candidates = vote_candidates(persona, answers);
        if candidates.is_empty() {
            debug!(player = %persona.name, "Nobody else to vote for");
            return Ok(None);
        }

        let listing = answers
            .iter()
            .filter(|(id, _)| **id != persona.id)
            .map(|(id, entry)| {
                format!(
                    "Player {} (ID: {}) answered: \"{}\"",
                    entry.name, id, entry.answer
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = prompts::render(
            &self.prompts.vote,
            &[
                ("player_name", &persona.name),
                ("question", question),
                ("answers", &listing),
            ],
        );

        let reply = self.complete(prompt, 25, 0.5).await?;
        Ok(pick_vote(&reply, &candidates, &mut rand::rng()))
    }
}

/// Offline agent drawing from the fallback library. Votes at random.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedAgent;

#[async_trait]
impl AiAgent for CannedAgent {
    async fn question(&self, _persona: &AgentPersona, _variant: PromptVariant) -> Result<String> {
        let mut rng = rand::rng();
        let words = rng.random_range(prompts::QUESTION_WORD_COUNTS);
        Ok(fallback::question_for_words(&mut rng, words))
    }

    async fn answer(
        &self,
        _persona: &AgentPersona,
        _question: &str,
        _variant: PromptVariant,
    ) -> Result<String> {
        let mut rng = rand::rng();
        let words = rng.random_range(prompts::ANSWER_WORD_COUNTS);
        Ok(fallback::answer_for_words(&mut rng, words))
    }

    async fn vote(
        &self,
        persona: &AgentPersona,
        _question: &str,
        answers: &BTreeMap<PlayerId, AnswerEntry>,
    ) -> Result<Option<PlayerId>> {
        let candidates = vote_candidates(persona, answers);
        Ok(candidates
            .choose(&mut rand::rng())
            .map(|(id, _)| id.clone()))
    }
}

fn vote_candidates(
    persona: &AgentPersona,
    answers: &BTreeMap<PlayerId, AnswerEntry>,
) -> Vec<(PlayerId, String)> {
    answers
        .iter()
        .filter(|(id, _)| **id != persona.id)
        .map(|(id, entry)| (id.clone(), entry.name.clone()))
        .collect()
}

fn fits_word_target(text: &str, target: usize) -> bool {
    fallback::word_count(text).abs_diff(target) <= 2
        && text.chars().count() >= 2
        && !looks_like_sentinel(text)
}

fn strip_quotes(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Strips quotes, caps the length and makes sure it ends in a question mark.
pub(crate) fn tidy_question(raw: &str, max_len: usize) -> String {
    let body = strip_quotes(raw).trim_end_matches('?');
    let body = truncate_chars(body, max_len.saturating_sub(1)).trim_end();
    format!("{body}?")
}

/// Strips quotes, caps the length and drops a trailing period.
pub(crate) fn tidy_answer(raw: &str, max_len: usize) -> String {
    let body = truncate_chars(strip_quotes(raw), max_len).trim_end();
    body.strip_suffix('.').unwrap_or(body).to_string()
}

/// Maps a free-text vote reply onto one of `candidates`.
///
/// Exact id first, then an id or name mentioned in the reply, then the best
/// fuzzy name match, and finally a random candidate.
pub(crate) fn pick_vote<R: Rng + ?Sized>(
    reply: &str,
    candidates: &[(PlayerId, String)],
    rng: &mut R,
) -> Option<PlayerId> {
    let reply = strip_quotes(reply);
    let lower = reply.to_lowercase();

    if let Some((id, _)) = candidates.iter().find(|(id, _)| id.as_str() == reply) {
        return Some(id.clone());
    }
    if let Some((id, _)) = candidates
        .iter()
        .find(|(id, name)| reply.contains(id.as_str()) || lower.contains(&name.to_lowercase()))
    {
        return Some(id.clone());
    }

    let matcher = SkimMatcherV2::default();
    let best = candidates
        .iter()
        .filter_map(|(id, name)| matcher.fuzzy_match(name, reply).map(|score| (score, id)))
        .max_by_key(|(score, _)| *score);
    if let Some((_, id)) = best {
        return Some(id.clone());
    }

    warn!(%reply, "Unusable vote reply, voting at random");
    candidates.choose(rng).map(|(id, _)| id.clone())
}
