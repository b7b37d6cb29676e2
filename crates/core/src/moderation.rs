//! Content filter boundary for human-written text.

/// Reviews human-submitted text before it enters the round.
pub trait ContentFilter: Send + Sync {
    /// `Err(reason)` rejects the text; the reason is shown to the author.
    fn review(&self, text: &str) -> Result<(), String>;
}

/// Accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl ContentFilter for PassThrough {
    fn review(&self, _text: &str) -> Result<(), String> {
        Ok(())
    }
}

/// Rejects text containing any listed word, ignoring case and punctuation.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    words: Vec<String>,
}

impl Blocklist {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }
}

impl ContentFilter for Blocklist {
    fn review(&self, text: &str) -> Result<(), String> {
        let hit = text
            .split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase)
            .any(|token| self.words.contains(&token));
        if hit {
            Err("That text isn't allowed. Try something else.".to_string())
        } else {
            Ok(())
        }
    }
}
