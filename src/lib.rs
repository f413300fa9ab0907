//! UNO-style card game engine: rules, round state machine, rule-driven bots and scoring.

pub mod action;
pub mod bot;
pub mod bots;
pub mod card;
pub mod config;
pub mod error;
pub mod event;
pub mod game;
pub mod rules;
pub mod score;
pub mod session;
pub mod state;
pub mod visualize;

pub use crate::action::{Action, ActionTag, HUMAN_PLAYER, LastAction, PlayerId, Seat};
pub use crate::bot::Bot;
pub use crate::bots::registry::{create_bot_from_spec, label_for_spec};
pub use crate::bots::{RandomBot, RuleBot};
pub use crate::card::{Card, CardKind, Color};
pub use crate::config::GameOptions;
pub use crate::error::{GameError, InvalidAction, MatchRule};
pub use crate::event::GameEvent;
pub use crate::game::{Game, GameBuilder, GameConfig};
pub use crate::rules::{PlayContext, Stack, has_any_legal_play, is_legal_play, is_legal_under_stack};
pub use crate::score::{card_points, winner_gain};
pub use crate::session::Session;
pub use crate::state::{Direction, GameStateView, GameStatus, PlayerPublicState, TurnPhase};
pub use crate::visualize::{
    VisualOptions, describe_action, describe_event, render_state, render_state_with_options,
};
