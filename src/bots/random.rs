use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::Action;
use crate::bot::Bot;
use crate::card::Color;
use crate::state::GameStateView;

/// Baseline bot that samples uniformly from the legal action set.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn select_action(&mut self, state: &GameStateView, legal_actions: &[Action]) -> Action {
        let action = legal_actions
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or(Action::Draw);
        match action {
            Action::Play { hand_index, .. }
                if state.hand.get(hand_index).is_some_and(|card| card.is_wild()) =>
            {
                Action::Play {
                    hand_index,
                    color: Some(self.choose_color(state)),
                }
            }
            other => other,
        }
    }

    fn choose_color(&mut self, _state: &GameStateView) -> Color {
        Color::random(&mut self.rng)
    }
}
