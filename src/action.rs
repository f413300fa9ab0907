use serde::{Deserialize, Serialize};

use crate::card::Color;

/// Zero-based index of a player within the game.
pub type PlayerId = usize;

/// Seat 0 belongs to the human.
pub const HUMAN_PLAYER: PlayerId = 0;

/// Who controls a seat.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Seat {
    Human,
    Bot,
}

/// Action available to the active player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Play a card from the hand. `color` names the next color for a +4;
    /// leaving it empty suspends the play until a color is chosen.
    Play {
        hand_index: usize,
        color: Option<Color>,
    },
    /// Draw one card, or the whole pending stack.
    Draw,
    /// Decline to play. Only legal without any playable card or pending stack.
    Pass,
    /// Arm the UNO declaration before playing the second-to-last card.
    DeclareUno,
}

impl Action {
    pub fn hand_index(&self) -> Option<usize> {
        match self {
            Action::Play { hand_index, .. } => Some(*hand_index),
            _ => None,
        }
    }
}

/// Coarse tag of the most recent mutation, used to sequence animations.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ActionTag {
    Draw,
    Play,
    Turn,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LastAction {
    pub kind: ActionTag,
    pub player: PlayerId,
}
