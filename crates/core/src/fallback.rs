//! Casual stand-in lines used when generated text is unusable.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Answer recorded for anyone who did not answer in time.
pub const NO_ANSWER: &str = "(No answer)";

/// Question used when a human asker runs out the clock.
pub const ASK_TIMEOUT_QUESTION: &str = "What is your favorite season?";

/// Rotating pool for AI askers whose question could not be generated.
pub const FALLBACK_QUESTIONS: &[&str] = &[
    "What is your favorite season?",
    "whats ur hobby?",
    "dogs or cats?",
    "what makes u happy?",
    "best memory from childhood?",
    "how do u handle stress?",
    "coffee or tea?",
    "do u believe in ghosts?",
];

const QUESTIONS_BY_WORDS: &[(usize, &[&str])] = &[
    (2, &["favorite food?", "dream job?", "worst fear?", "hot take?", "biggest regret?"]),
    (
        3,
        &[
            "whats ur hobby?",
            "best vacation ever?",
            "dogs or cats?",
            "coffee or tea?",
            "ever been scared?",
        ],
    ),
    (
        4,
        &[
            "what makes u happy?",
            "ever done something crazy?",
            "wats ur dream vacation?",
            "best memory from childhood?",
        ],
    ),
    (
        5,
        &[
            "how do u handle stress?",
            "do u believe in ghosts?",
            "r u morning or night?",
            "can u cook anything good?",
        ],
    ),
    (
        7,
        &[
            "wat do u do when ur sad?",
            "if u could time travel where to?",
            "wat would u do with a million?",
        ],
    ),
];

const ANSWERS_BY_WORDS: &[(usize, &[&str])] = &[
    (1, &["idk", "maybe", "sometimes", "never", "depends", "nope", "yup", "dunno"]),
    (2, &["no way", "for sure", "not rly", "i guess", "seems legit", "why tho", "never tried"]),
    (
        3,
        &[
            "i dunno lol",
            "not rlly sure",
            "that sounds cool",
            "no clue honestly",
            "makes me happy",
        ],
    ),
    (4, &["never thought bout that", "not my thing tbh", "depends on the day", "wish i knew lol"]),
    (
        5,
        &[
            "i never thought about that",
            "i dont rlly know tbh",
            "maybe sometimes but not always",
            "depends on how im feeling",
        ],
    ),
];

fn closest<'a>(table: &'a [(usize, &'a [&'a str])], words: usize) -> &'a [&'a str] {
    table
        .iter()
        .min_by_key(|(count, _)| count.abs_diff(words))
        .map(|(_, lines)| *lines)
        .unwrap_or(&[])
}

/// A question whose length is as close to `words` as the library allows.
pub fn question_for_words<R: Rng + ?Sized>(rng: &mut R, words: usize) -> String {
    closest(QUESTIONS_BY_WORDS, words)
        .choose(rng)
        .copied()
        .unwrap_or("whats ur favorite thing?")
        .to_string()
}

/// An answer whose length is as close to `words` as the library allows.
pub fn answer_for_words<R: Rng + ?Sized>(rng: &mut R, words: usize) -> String {
    closest(ANSWERS_BY_WORDS, words)
        .choose(rng)
        .copied()
        .unwrap_or("idk")
        .to_string()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_closest_bucket() {
        let mut rng = StdRng::seed_from_u64(1);
        let answer = answer_for_words(&mut rng, 1);
        assert_eq!(word_count(&answer), 1);

        // No six-word bucket: falls to five or seven.
        let question = question_for_words(&mut rng, 6);
        let words = word_count(&question);
        assert!(words == 5 || words == 7, "{question}");
    }

    #[test]
    fn test_fallback_questions_fit_limits() {
        for question in FALLBACK_QUESTIONS {
            assert!(!question.is_empty());
            assert!(question.chars().count() <= 40);
            assert!(question.ends_with('?'));
        }
    }
}
