//! Set Phase State
//!
//! One set runs Draft → Early → Mid → Late → End. Feedback sits between sets
//! of a series, after one set's End and before the next set's Draft.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Draft,
    Early,
    Mid,
    Late,
    End,
    Feedback,
}

impl Phase {
    pub const ALL: [Phase; 6] =
        [Phase::Draft, Phase::Early, Phase::Mid, Phase::Late, Phase::End, Phase::Feedback];

    /// Next phase within a set. `End` has no in-set successor; what follows it
    /// depends on the series score.
    pub const fn next_in_set(self) -> Option<Phase> {
        match self {
            Phase::Draft => Some(Phase::Early),
            Phase::Early => Some(Phase::Mid),
            Phase::Mid => Some(Phase::Late),
            Phase::Late => Some(Phase::End),
            Phase::End => None,
            Phase::Feedback => Some(Phase::Draft),
        }
    }

    /// Phases that suspend for a manager decision.
    pub const fn awaits_decision(self) -> bool {
        !matches!(self, Phase::End)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Phase::Draft => "Pick & Ban",
            Phase::Early => "Early Game",
            Phase::Mid => "Mid Game",
            Phase::Late => "Late Game",
            Phase::End => "Game End",
            Phase::Feedback => "Between Games",
        }
    }

    /// Icon key for the presentation layer.
    pub const fn icon(self) -> &'static str {
        match self {
            Phase::Draft => "draft",
            Phase::Early => "sword",
            Phase::Mid => "tower",
            Phase::Late => "dragon",
            Phase::End => "trophy",
            Phase::Feedback => "whistle",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}
