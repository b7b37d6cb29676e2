//! Prompt Templates and Personas
//!
//! Templates use `{placeholder}` markers that are filled with `str::replace`.
//! Each AI seat carries a [`PromptVariant`] which selects an extra tone line
//! from a fixed table; on top of that every call rolls a fresh set of persona
//! traits so consecutive turns from the same seat do not read identically.

use anyhow::Result;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{debug, info};

/// Tone selector for an AI seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptVariant {
    Plain,
    Casual,
    Terse,
    Quirky,
}

const TONES: [(PromptVariant, &str); 4] = [
    (
        PromptVariant::Plain,
        "Write like an ordinary person typing quickly on a phone.",
    ),
    (
        PromptVariant::Casual,
        "Write in a relaxed, chatty way, lowercase is fine, a little slang is fine.",
    ),
    (
        PromptVariant::Terse,
        "Write as briefly as possible, you are a bit impatient.",
    ),
    (
        PromptVariant::Quirky,
        "Write with a slightly odd, playful sense of humor.",
    ),
];

impl PromptVariant {
    pub const ALL: [PromptVariant; 4] = [
        PromptVariant::Plain,
        PromptVariant::Casual,
        PromptVariant::Terse,
        PromptVariant::Quirky,
    ];

    pub fn tone(self) -> &'static str {
        TONES
            .iter()
            .find(|(variant, _)| *variant == self)
            .map(|(_, tone)| *tone)
            .unwrap_or(TONES[0].1)
    }
}

const BASE_CONTEXT: &str = "You are a player in a social deduction game called Turing Hunt. \
Some players are human, some are AI like you. You don't know who is who. Your goal is to help \
eliminate humans; the humans want to eliminate the AI. Each round one player asks a question, \
everyone else answers, then all players vote someone out. Never reveal that you are an AI.";

const DEFAULT_QUESTION: &str = "{context}
Your name is {player_name}. It is your turn to ask a question.

Your response must be EXACTLY {word_count} words.

Ask a very short, open-ended question that would subtly show whether someone is human or AI. \
Think about creativity, emotion or small everyday experiences. Avoid asking about identity or \
doing calculations.

Stay in character:
{traits}
{tone}

Ask your question now (EXACTLY {word_count} words):";

const DEFAULT_ANSWER: &str = "{context}
Your name is {player_name}. Answer the following question.

Your response must be EXACTLY {word_count} words.

The question is: \"{question}\"

Your answer should sound plausible, maybe a bit quirky or generic, so nobody suspects you.

Stay in character:
{traits}
{tone}

Give your answer now (EXACTLY {word_count} words):";

const DEFAULT_VOTE: &str = "{context}
Your name is {player_name}. It is time to vote one player out.
Look at the question and the answers. Pick whoever sounds most suspicious to you.

The question was: \"{question}\"

The other players answered:
{answers}

Reply with ONLY the player ID you vote for. No other text.

Player ID:";

/// The three templates used by the LLM-backed agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBook {
    pub question: String,
    pub answer: String,
    pub vote: String,
}

impl Default for PromptBook {
    fn default() -> Self {
        Self {
            question: DEFAULT_QUESTION.to_string(),
            answer: DEFAULT_ANSWER.to_string(),
            vote: DEFAULT_VOTE.to_string(),
        }
    }
}

impl PromptBook {
    /// Builds a book from a map keyed by file stem (`question`, `answer`, `vote`),
    /// keeping the defaults for any key that is missing.
    pub fn with_overrides(mut overrides: HashMap<String, String>) -> Self {
        let mut book = Self::default();
        if let Some(question) = overrides.remove("question") {
            book.question = question;
        }
        if let Some(answer) = overrides.remove("answer") {
            book.answer = answer;
        }
        if let Some(vote) = overrides.remove("vote") {
            book.vote = vote;
        }
        book
    }

    /// Loads every `.md` file in `dir` as an override. A missing directory
    /// yields the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            debug!(path = %dir.display(), "No prompt directory, using built-in templates");
            return Ok(Self::default());
        }
        let mut overrides = HashMap::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    overrides.insert(stem.to_string(), fs::read_to_string(&path)?);
                }
            }
        }
        info!(count = overrides.len(), path = %dir.display(), "Loaded prompt overrides");
        Ok(Self::with_overrides(overrides))
    }
}

/// Fills `{key}` markers in `template`.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.replace("{context}", BASE_CONTEXT);
    for (key, value) in values {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

const MOODS: &[&str] = &["happy", "sad", "neutral", "curious", "annoyed", "bored", "hyped"];
const SOCIAL: &[&str] = &["introverted", "extroverted", "awkward", "too cool", "quirky"];
const EMOTIONAL: &[&str] = &["calm", "anxious", "optimistic", "pessimistic", "dramatic"];
const GRAMMAR: &[&str] = &["none", "few", "many"];
const QUIRKS: &[&str] = &[
    "you sometimes use ALL CAPS for emphasis",
    "you never capitalize anything",
    "you use ... a lot",
    "you add lol after sentences sometimes",
    "you abbreviate words like prob and def",
    "you stretch words like sooooo",
    "you write u instead of you",
];

pub const QUESTION_WORD_COUNTS: RangeInclusive<usize> = 3..=7;
pub const ANSWER_WORD_COUNTS: RangeInclusive<usize> = 1..=5;

/// Per-call persona roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traits {
    pub mood: &'static str,
    pub social: &'static str,
    pub emotional: &'static str,
    pub grammar_mistakes: &'static str,
    pub capitalizes: bool,
    pub quirk: Option<&'static str>,
    pub word_count: usize,
}

impl Traits {
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, word_counts: RangeInclusive<usize>) -> Self {
        let internet_style = rng.random_bool(0.4);
        Self {
            mood: MOODS.choose(rng).copied().unwrap_or("neutral"),
            social: SOCIAL.choose(rng).copied().unwrap_or("ambiverted"),
            emotional: EMOTIONAL.choose(rng).copied().unwrap_or("calm"),
            grammar_mistakes: GRAMMAR.choose(rng).copied().unwrap_or("none"),
            capitalizes: rng.random_bool(0.5),
            quirk: if internet_style && rng.random_bool(0.5) {
                QUIRKS.choose(rng).copied()
            } else {
                None
            },
            word_count: rng.random_range(word_counts),
        }
    }

    pub fn describe(&self) -> String {
        let mut lines = vec![
            format!("Mood: {}", self.mood),
            format!("Social: {}", self.social),
            format!("Emotional: {}", self.emotional),
            format!("Grammar mistakes: {}", self.grammar_mistakes),
            format!("Starts with a capital letter: {}", self.capitalizes),
        ];
        if let Some(quirk) = self.quirk {
            lines.push(format!("Writing style: {quirk}"));
        }
        lines.join("\n")
    }
}
