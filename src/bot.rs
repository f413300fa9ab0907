use crate::action::Action;
use crate::card::Color;
use crate::state::GameStateView;

/// Interface for seats driven by code instead of a person.
pub trait Bot {
    fn select_action(&mut self, state: &GameStateView, legal_actions: &[Action]) -> Action;

    /// Names the color for a +4 that is about to be played.
    fn choose_color(&mut self, state: &GameStateView) -> Color;
}
