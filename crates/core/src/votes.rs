//! Vote Resolution
//!
//! A pure function from the active roster and the recorded ballots to the set of
//! players leaving the game. Callers apply the status changes.

use crate::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

/// How ties at the top of the count are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// Everyone tied at the maximum leaves, unless the tie covers every active
    /// player, in which case nobody does.
    #[default]
    SpareFullTie,
    /// Everyone tied at the maximum leaves, always.
    EliminateAll,
}

impl FromStr for TiePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spare_full_tie" => Ok(Self::SpareFullTie),
            "eliminate_all" => Ok(Self::EliminateAll),
            other => Err(format!("'{other}' is not a tie policy")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteOutcome {
    /// Count per active player, zero included.
    pub vote_counts: BTreeMap<PlayerId, u32>,
    /// Eliminated players in roster order.
    pub eliminated_ids: Vec<PlayerId>,
    pub eliminated_names: Vec<String>,
}

/// Tallies `votes` (voter -> target, `None` = abstain) over the `active` players.
///
/// Ballots from inactive voters and ballots for inactive or unknown targets are
/// not counted. If the highest count is zero nobody is eliminated.
pub fn resolve<'a, I>(
    active: I,
    votes: &HashMap<PlayerId, Option<PlayerId>>,
    policy: TiePolicy,
) -> VoteOutcome
where
    I: IntoIterator<Item = &'a Player>,
{
    let active: Vec<&Player> = active.into_iter().filter(|p| p.is_active()).collect();
    let active_ids: HashSet<&PlayerId> = active.iter().map(|p| &p.id).collect();

    let mut vote_counts: BTreeMap<PlayerId, u32> =
        active.iter().map(|p| (p.id.clone(), 0)).collect();
    for (voter, target) in votes {
        let Some(target) = target else { continue };
        if !active_ids.contains(voter) {
            continue;
        }
        if let Some(count) = vote_counts.get_mut(target) {
            *count += 1;
        }
    }

    let max = vote_counts.values().copied().max().unwrap_or(0);
    if max == 0 {
        return VoteOutcome {
            vote_counts,
            ..Default::default()
        };
    }

    let tied: Vec<&Player> = active
        .iter()
        .copied()
        .filter(|p| vote_counts.get(&p.id) == Some(&max))
        .collect();

    if policy == TiePolicy::SpareFullTie && tied.len() > 1 && tied.len() == active.len() {
        return VoteOutcome {
            vote_counts,
            ..Default::default()
        };
    }

    VoteOutcome {
        eliminated_ids: tied.iter().map(|p| p.id.clone()).collect(),
        eliminated_names: tied.iter().map(|p| p.display_name.clone()).collect(),
        vote_counts,
    }
}
