use serde::{Deserialize, Serialize};

use crate::action::{LastAction, PlayerId, Seat};
use crate::card::{Card, CardKind, Color};
use crate::config::GameOptions;

/// Turn order around the table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn sign(self) -> isize {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Status of the current round.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Finished { winner: PlayerId },
}

/// Current phase of the active turn.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingAction,
    /// A +4 was chosen but the color is still open. Nothing has moved yet.
    AwaitingColorChoice { player: PlayerId, hand_index: usize },
    RoundOver,
}

/// Public portion of a player's state that all opponents may observe.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerPublicState {
    pub id: PlayerId,
    pub name: String,
    pub seat: Seat,
    pub hand_size: usize,
    pub uno_armed: bool,
    pub score: u32,
    pub is_current: bool,
}

/// Snapshot of the table handed to the presentation and to bots.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateView {
    pub options: GameOptions,
    pub phase: TurnPhase,
    pub status: GameStatus,
    pub round: u32,
    pub self_player: PlayerId,
    pub current_player: PlayerId,
    pub direction: Direction,
    pub stack_draw: usize,
    pub stack_type: Option<CardKind>,
    pub forced_color: Option<Color>,
    pub draw_pile_count: usize,
    pub discard_pile_count: usize,
    pub discard_top: Option<Card>,
    /// Cards created to seed an empty discard pile; they count toward the table total.
    pub synthetic_cards: usize,
    pub players: Vec<PlayerPublicState>,
    pub hand: Vec<Card>,
    pub last_action: Option<LastAction>,
}

impl GameStateView {
    pub fn is_running(&self) -> bool {
        matches!(self.status, GameStatus::Running)
    }

    /// Every card currently on the table: hands plus both piles.
    pub fn cards_in_play(&self) -> usize {
        self.players.iter().map(|p| p.hand_size).sum::<usize>()
            + self.draw_pile_count
            + self.discard_pile_count
    }

    pub fn scores(&self) -> Vec<u32> {
        self.players.iter().map(|p| p.score).collect()
    }
}
