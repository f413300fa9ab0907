use std::fmt::Write;

use crate::action::Action;
use crate::card::Card;
use crate::event::GameEvent;
use crate::rules::{PlayContext, Stack};
use crate::state::{Direction, GameStateView, GameStatus, TurnPhase};

/// Customize state rendering for the terminal client.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    /// Mark playable hand cards with `*`.
    pub show_hints: bool,
    pub show_scores: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            show_hints: false,
            show_scores: true,
        }
    }
}

impl VisualOptions {
    /// Rendering defaults taken from the table options.
    pub fn for_state(state: &GameStateView) -> Self {
        Self {
            show_hints: state.options.show_legality_hints,
            ..Self::default()
        }
    }
}

pub fn render_state(state: &GameStateView) -> String {
    render_state_with_options(state, VisualOptions::for_state(state))
}

pub fn render_state_with_options(state: &GameStateView, options: VisualOptions) -> String {
    let mut out = String::new();
    let status = match state.status {
        GameStatus::Running => String::from("Running"),
        GameStatus::Finished { winner } => format!("Finished (winner: {})", name_of(state, winner)),
    };
    let direction = match state.direction {
        Direction::Clockwise => "clockwise",
        Direction::CounterClockwise => "counter-clockwise",
    };
    let _ = writeln!(out, "Round {}  |  {status}", state.round);
    let _ = writeln!(
        out,
        "Turn: {}  |  Direction: {direction}",
        name_of(state, state.current_player)
    );
    let top = state
        .discard_top
        .map(format_card)
        .unwrap_or_else(|| String::from("--"));
    let forced = state
        .forced_color
        .map(|color| format!("  |  Forced color: {color}"))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "Discard: {top} ({})  |  Draw pile: {}{forced}",
        state.discard_pile_count, state.draw_pile_count
    );
    if state.stack_draw > 0 {
        let kind = state.stack_type.map(|k| k.label()).unwrap_or("?");
        let _ = writeln!(out, "Stack: {} (opened by {kind})", state.stack_draw);
    }
    if let TurnPhase::AwaitingColorChoice { player, .. } = state.phase {
        let _ = writeln!(out, "{} must choose a color", name_of(state, player));
    }
    let _ = writeln!(out, "Players:");
    for player in &state.players {
        let label_you = if player.id == state.self_player {
            " (You)"
        } else {
            ""
        };
        let current_tag = if player.is_current { " <- current" } else { "" };
        let uno_tag = if player.uno_armed { " [UNO]" } else { "" };
        let score = if options.show_scores {
            format!("  score {}", player.score)
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "  {}{label_you} - {} cards{uno_tag}{score}{current_tag}",
            player.name, player.hand_size
        );
    }
    let context = state.discard_top.map(|top| PlayContext {
        top,
        forced_color: state.forced_color,
        stack: Stack {
            draw: state.stack_draw,
            kind: state.stack_type,
        },
        mix_stacking_allowed: state.options.mix_stacking_allowed,
    });
    if state.hand.is_empty() {
        let _ = writeln!(out, "Hand: (empty)");
    } else {
        let entries: Vec<String> = state
            .hand
            .iter()
            .enumerate()
            .map(|(idx, card)| {
                let hint = match context {
                    Some(ctx) if options.show_hints && ctx.allows(card) => "*",
                    _ => "",
                };
                format!("{idx}:{}{hint}", format_card(*card))
            })
            .collect();
        let _ = writeln!(out, "Hand: {}", entries.join("  "));
    }
    out
}

pub fn describe_action(state: &GameStateView, action: &Action) -> String {
    match action {
        Action::Play { hand_index, color } => {
            let card = state
                .hand
                .get(*hand_index)
                .map(|card| format_card(*card))
                .unwrap_or_else(|| String::from("--"));
            match color {
                Some(color) => format!("Play hand[{hand_index}] {card} calling {color}"),
                None => format!("Play hand[{hand_index}] {card}"),
            }
        }
        Action::Draw if state.stack_draw > 0 => format!("Draw the stack of {}", state.stack_draw),
        Action::Draw => String::from("Draw a card"),
        Action::Pass => String::from("Pass"),
        Action::DeclareUno => String::from("Declare UNO"),
    }
}

pub fn describe_event(state: &GameStateView, event: &GameEvent) -> String {
    match event {
        GameEvent::RoundStarted {
            round,
            players,
            first,
        } => format!("Round {round} with {players} players; first card {}", format_card(*first)),
        GameEvent::Drew { player, count } => {
            let plural = if *count == 1 { "" } else { "s" };
            format!("{} draws {count} card{plural}", name_of(state, *player))
        }
        GameEvent::Played { player, card } => {
            format!("{} plays {}", name_of(state, *player), format_card(*card))
        }
        GameEvent::ColorChosen { player, color } => {
            format!("{} calls {color}", name_of(state, *player))
        }
        GameEvent::ColorChoiceAbandoned { player } => {
            format!("{} takes the +4 back", name_of(state, *player))
        }
        GameEvent::StackTaken { player, count } => {
            format!("{} takes the stack of {count}", name_of(state, *player))
        }
        GameEvent::Passed { player } => format!("{} passes", name_of(state, *player)),
        GameEvent::UnoDeclared { player } => format!("{} declares UNO", name_of(state, *player)),
        GameEvent::UnoPenalty { player } => {
            format!("{} did not declare UNO: +2 penalty", name_of(state, *player))
        }
        GameEvent::TurnStarted { player } => format!("{}'s turn", name_of(state, *player)),
        GameEvent::RoundWon { player, points } => {
            format!("{} wins the round (+{points})", name_of(state, *player))
        }
    }
}

pub fn format_card(card: Card) -> String {
    card.to_string()
}

fn name_of(state: &GameStateView, player: usize) -> String {
    state
        .players
        .get(player)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| format!("Player {player}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameBuilder;

    #[test]
    fn render_and_describe_include_expected_phrases() {
        let game = GameBuilder::new(3).with_seed(11).build().expect("game");
        let view = game.state_view(0).expect("state view");
        let text = render_state(&view);
        assert!(text.contains("Human (You)"));
        assert!(text.contains("Bot 2"));
        assert!(text.contains("Hand:"));
        let actions = game.legal_actions(0).expect("actions available");
        assert!(actions.contains(&Action::Draw));
        assert_eq!(describe_action(&view, &Action::Draw), "Draw a card");
        let play = Action::Play {
            hand_index: 0,
            color: None,
        };
        assert!(describe_action(&view, &play).starts_with("Play hand[0]"));
    }

    #[test]
    fn hints_mark_playable_cards() {
        let game = GameBuilder::new(2).with_seed(5).build().expect("game");
        let view = game.state_view(0).expect("state view");
        let with_hints = render_state_with_options(
            &view,
            VisualOptions {
                show_hints: true,
                show_scores: true,
            },
        );
        let playable = game
            .legal_actions(0)
            .expect("actions")
            .iter()
            .any(|a| a.hand_index().is_some());
        assert_eq!(with_hints.contains('*'), playable);
        assert!(!render_state(&view).contains('*'));
    }
}
