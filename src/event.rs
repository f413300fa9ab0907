use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::{Card, Color};

/// Things that happened at the table, in order. Drained by the presentation
/// after every command.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { round: u32, players: usize, first: Card },
    Drew { player: PlayerId, count: usize },
    Played { player: PlayerId, card: Card },
    ColorChosen { player: PlayerId, color: Color },
    ColorChoiceAbandoned { player: PlayerId },
    StackTaken { player: PlayerId, count: usize },
    Passed { player: PlayerId },
    UnoDeclared { player: PlayerId },
    UnoPenalty { player: PlayerId },
    TurnStarted { player: PlayerId },
    RoundWon { player: PlayerId, points: u32 },
}
