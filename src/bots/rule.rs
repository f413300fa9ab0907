use crate::action::Action;
use crate::bot::Bot;
use crate::card::{Card, Color};
use crate::state::GameStateView;

/// Default table bot.
///
/// Policy:
/// 1. Play the first legal card in hand order (stack responses included).
/// 2. A +4 names the color held most, ties going to red, yellow, green, blue in that order.
/// 3. Otherwise draw: one card normally, the whole stack when one is pending.
///    The engine plays a legal drawn card straight away for bot seats.
/// 4. Pass only when drawing is not offered.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleBot;

impl RuleBot {
    pub fn new() -> Self {
        Self
    }
}

/// Most frequent color in `hand`; the first color in [`Color::ALL`] wins ties.
pub fn majority_color(hand: &[Card]) -> Color {
    let mut counts = [0usize; 4];
    for color in hand.iter().filter_map(Card::color) {
        counts[color as usize] += 1;
    }
    let mut best = Color::Red;
    for color in Color::ALL {
        if counts[color as usize] > counts[best as usize] {
            best = color;
        }
    }
    best
}

impl Bot for RuleBot {
    fn select_action(&mut self, state: &GameStateView, legal_actions: &[Action]) -> Action {
        if let Some(hand_index) = legal_actions.iter().find_map(Action::hand_index) {
            let color = match state.hand.get(hand_index) {
                Some(card) if card.is_wild() => Some(self.choose_color(state)),
                _ => None,
            };
            return Action::Play { hand_index, color };
        }
        if legal_actions.contains(&Action::Draw) {
            return Action::Draw;
        }
        if legal_actions.contains(&Action::Pass) {
            return Action::Pass;
        }
        legal_actions.first().cloned().unwrap_or(Action::Draw)
    }

    fn choose_color(&mut self, state: &GameStateView) -> Color {
        majority_color(&state.hand)
    }
}
