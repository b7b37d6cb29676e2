//! Display names and avatars for seats.

use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::HashSet;

const ADJECTIVES: &[&str] = &[
    "Quick", "Lazy", "Sleepy", "Noisy", "Hungry", "Clever", "Brave", "Shiny", "Happy", "Grumpy",
];
const NOUNS: &[&str] = &[
    "Fox", "Dog", "Cat", "Mouse", "Bear", "Lion", "Tiger", "Robot", "Alien", "Ghost",
];
const AVATARS: &[&str] = &[
    "😀", "😎", "🥸", "🧐", "🧑‍💻", "🧑‍🎨", "🧑‍🚀", "🕵️", "🧙", "🧛", "🧟", "🐶", "🐱", "🦊", "🐻",
    "🐼", "🐯", "🦁", "🐸", "🐵", "🐧", "🦄", "⭐", "🌈", "🎮", "🎨", "🚀", "💡", "💎",
];

/// Name attempts before accepting a collision-suffixed fallback.
const MAX_NAME_ATTEMPTS: usize = 50;

/// Source of cosmetic identity for new seats.
pub trait Cosmetics: Send + Sync {
    /// Returns a display name not contained in `taken`.
    fn display_name(&self, taken: &HashSet<String>) -> String;
    fn avatar(&self) -> String;
}

/// Adjective + noun + two digits, emoji avatars.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCosmetics;

impl Cosmetics for RandomCosmetics {
    fn display_name(&self, taken: &HashSet<String>) -> String {
        let mut rng = rand::rng();
        let mut name = String::new();
        for _ in 0..MAX_NAME_ATTEMPTS {
            name = random_name(&mut rng);
            if !taken.contains(&name) {
                return name;
            }
        }
        let mut suffix = taken.len();
        while taken.contains(&format!("{name}{suffix}")) {
            suffix += 1;
        }
        format!("{name}{suffix}")
    }

    fn avatar(&self) -> String {
        AVATARS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or("🙂")
            .to_string()
    }
}

fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Odd");
    let noun = NOUNS.choose(rng).copied().unwrap_or("Thing");
    format!("{adjective}{noun}{}", rng.random_range(0..100))
}
