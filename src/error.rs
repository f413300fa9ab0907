use thiserror::Error;

use crate::action::PlayerId;
use crate::card::{Card, CardKind, Color};

/// Errors that can occur when manipulating the game state.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("player index {0} is out of range")]
    InvalidPlayer(PlayerId),
    #[error("not this player's turn")]
    NotPlayersTurn,
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),
    #[error("round is already over")]
    RoundOver,
    #[error("round is still in progress")]
    RoundInProgress,
    #[error("a color must be chosen for the pending +4 first")]
    AwaitingColorChoice,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("bots did not hand control back within {0} turns")]
    Stalled(usize),
    #[error("options file could not be read: {0}")]
    OptionsIo(#[from] std::io::Error),
    #[error("options file is not valid: {0}")]
    OptionsFormat(#[from] serde_json::Error),
}

/// Rejected player input. The display string is shown to the player as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidAction {
    #[error("hand index {0} is out of range")]
    HandIndex(usize),
    #[error("{rule} (top: {top})")]
    IllegalPlay { top: Card, rule: MatchRule },
    #[error("stack of {amount}: respond with {}", required_label(.required))]
    StackObligation {
        amount: usize,
        required: Option<CardKind>,
    },
    #[error("forced color is {color}: play {color} or +4")]
    ForcedColor { color: Color },
    #[error("you have a playable card")]
    InvalidPass,
    #[error("stack of {amount} pending: draw it or respond with +2/+4")]
    MustResolveStack { amount: usize },
    #[error("UNO can only be declared on your turn while holding two cards")]
    UnoNotAvailable,
    #[error("no color choice is pending")]
    NoPendingColorChoice,
}

/// Which matching rule a rejected card failed against the top card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    ColorOrNumber,
    ColorOrKind,
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchRule::ColorOrNumber => f.write_str("must match color or number"),
            MatchRule::ColorOrKind => f.write_str("must match color or special kind"),
        }
    }
}

fn required_label(required: &Option<CardKind>) -> &'static str {
    match required {
        Some(kind) => kind.label(),
        None => "+2 or +4",
    }
}
