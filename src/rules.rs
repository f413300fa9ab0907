//! Legality predicates. All functions here are pure and never touch game state.

use serde::{Deserialize, Serialize};

use crate::action::Seat;
use crate::card::{Card, CardKind, Color};
use crate::error::{InvalidAction, MatchRule};

/// Pending draw accumulation built by consecutive +2/+4 plays.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    pub draw: usize,
    /// Kind of the card that opened the accumulation.
    pub kind: Option<CardKind>,
}

impl Stack {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.draw > 0
    }

    /// Adds a draw card to the accumulation, recording its kind if it opens one.
    pub fn push(&mut self, card: &Card) {
        if self.draw == 0 {
            self.kind = Some(card.kind());
        }
        self.draw += card.draw_amount();
    }

    pub fn clear(&mut self) {
        *self = Stack::default();
    }
}

/// Everything a legality check needs to know about the table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlayContext {
    pub top: Card,
    pub forced_color: Option<Color>,
    pub stack: Stack,
    pub mix_stacking_allowed: bool,
}

/// Color/number/kind matching against the discard top.
pub fn is_legal_play(card: &Card, top: &Card, forced_color: Option<Color>) -> bool {
    if card.is_wild() {
        return true;
    }
    let effective = forced_color.or(top.color());
    if card.color().is_some() && card.color() == effective {
        return true;
    }
    match (card, top) {
        (Card::Number(_, a), Card::Number(_, b)) => a == b,
        _ => top.kind() != CardKind::Number && card.kind() == top.kind(),
    }
}

/// Whether `card` answers the current accumulation. Without an active stack
/// every card passes and only [`is_legal_play`] applies.
pub fn is_legal_under_stack(
    card: &Card,
    stack_draw: usize,
    stack_type: Option<CardKind>,
    mix_stacking_allowed: bool,
) -> bool {
    if stack_draw == 0 {
        return true;
    }
    let kind = card.kind();
    if !kind.is_draw() {
        return false;
    }
    mix_stacking_allowed || stack_type == Some(kind)
}

pub fn has_any_legal_play(hand: &[Card], top: &Card, forced_color: Option<Color>) -> bool {
    hand.iter().any(|card| is_legal_play(card, top, forced_color))
}

impl PlayContext {
    pub fn allows(&self, card: &Card) -> bool {
        self.check(card).is_ok()
    }

    /// Full check used for human placements. Stack obligations are reported
    /// first, then the forced color, then the plain matching rule.
    pub fn check(&self, card: &Card) -> Result<(), InvalidAction> {
        self.check_stack_response(card)?;
        if is_legal_play(card, &self.top, self.forced_color) {
            return Ok(());
        }
        if let Some(color) = self.forced_color {
            return Err(InvalidAction::ForcedColor { color });
        }
        let rule = if self.top.kind() == CardKind::Number {
            MatchRule::ColorOrNumber
        } else {
            MatchRule::ColorOrKind
        };
        Err(InvalidAction::IllegalPlay {
            top: self.top,
            rule,
        })
    }

    /// Only the accumulation rule: a draw card, of the opening kind unless
    /// mixing is allowed. Always passes without an active stack.
    pub fn check_stack_response(&self, card: &Card) -> Result<(), InvalidAction> {
        if is_legal_under_stack(
            card,
            self.stack.draw,
            self.stack.kind,
            self.mix_stacking_allowed,
        ) {
            return Ok(());
        }
        let required = if !card.kind().is_draw() || self.mix_stacking_allowed {
            None
        } else {
            self.stack.kind
        };
        Err(InvalidAction::StackObligation {
            amount: self.stack.draw,
            required,
        })
    }

    /// Bot seats answer a pending stack with any draw card the stacking
    /// policy admits, whatever the top card or forced color.
    pub fn check_for(&self, seat: Seat, card: &Card) -> Result<(), InvalidAction> {
        match seat {
            Seat::Bot if self.stack.is_active() => self.check_stack_response(card),
            _ => self.check(card),
        }
    }

    pub fn legal_indices(&self, seat: Seat, hand: &[Card]) -> Vec<usize> {
        hand.iter()
            .enumerate()
            .filter(|(_, card)| self.check_for(seat, card).is_ok())
            .map(|(index, _)| index)
            .collect()
    }
}
