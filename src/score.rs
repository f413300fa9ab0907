//! Round scoring.
//!
//! The winner collects the value of every card left in the other hands:
//!   number -> face value, +2 / reverse / skip -> 20, +4 -> 50.

use crate::action::PlayerId;
use crate::card::Card;

pub fn card_points(card: &Card) -> u32 {
    match card {
        Card::Number(_, value) => u32::from(*value),
        Card::PlusFour => 50,
        Card::PlusTwo(_) | Card::Reverse(_) | Card::Skip(_) => 20,
    }
}

/// Points the winner gains from the remaining opponent hands.
pub fn winner_gain(hands: &[Vec<Card>], winner: PlayerId) -> u32 {
    hands
        .iter()
        .enumerate()
        .filter(|(id, _)| *id != winner)
        .flat_map(|(_, hand)| hand.iter())
        .map(card_points)
        .sum()
}
