use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// The four suit colors. PlusFour cards carry none of them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
}

impl Color {
    /// Fixed enumeration order; also the tie-break priority for color choice.
    pub const ALL: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Color {
        Color::ALL[rng.gen_range(0..Color::ALL.len())]
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Color::Red),
            "y" | "yellow" => Ok(Color::Yellow),
            "g" | "green" => Ok(Color::Green),
            "b" | "blue" => Ok(Color::Blue),
            other => Err(format!("unknown color: {other}")),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Representation of a card. Only `PlusFour` is colorless and only `Number` carries a value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Card {
    Number(Color, u8),
    PlusTwo(Color),
    Reverse(Color),
    Skip(Color),
    /// Wild draw-four. Playable on anything; the player names the next color.
    PlusFour,
}

/// Payload-free discriminant of a [`Card`], used for stack bookkeeping and kind matching.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Number,
    PlusTwo,
    Reverse,
    Skip,
    PlusFour,
}

impl CardKind {
    /// Label used in rejection messages.
    pub fn label(self) -> &'static str {
        match self {
            CardKind::Number => "number",
            CardKind::PlusTwo => "+2",
            CardKind::Reverse => "reverse",
            CardKind::Skip => "skip",
            CardKind::PlusFour => "+4",
        }
    }

    #[inline]
    pub fn is_draw(self) -> bool {
        matches!(self, CardKind::PlusTwo | CardKind::PlusFour)
    }
}

pub const MAX_CARD_VALUE: u8 = 9;
pub const PLUS_FOUR_COUNT: usize = 4;
pub const CARDS_PER_COLOR: usize = MAX_CARD_VALUE as usize + 1 + 3;
pub const DECK_SIZE: usize = Color::ALL.len() * CARDS_PER_COLOR + PLUS_FOUR_COUNT;
pub const HAND_SIZE: usize = 7;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;

impl Card {
    #[inline]
    pub fn color(&self) -> Option<Color> {
        match self {
            Card::Number(color, _)
            | Card::PlusTwo(color)
            | Card::Reverse(color)
            | Card::Skip(color) => Some(*color),
            Card::PlusFour => None,
        }
    }

    #[inline]
    pub fn kind(&self) -> CardKind {
        match self {
            Card::Number(..) => CardKind::Number,
            Card::PlusTwo(_) => CardKind::PlusTwo,
            Card::Reverse(_) => CardKind::Reverse,
            Card::Skip(_) => CardKind::Skip,
            Card::PlusFour => CardKind::PlusFour,
        }
    }

    #[inline]
    pub fn value(&self) -> Option<u8> {
        match self {
            Card::Number(_, value) => Some(*value),
            _ => None,
        }
    }

    #[inline]
    pub fn is_wild(&self) -> bool {
        matches!(self, Card::PlusFour)
    }

    /// Draw penalty this card adds to an accumulation, zero for non-draw cards.
    pub fn draw_amount(&self) -> usize {
        match self {
            Card::PlusTwo(_) => 2,
            Card::PlusFour => 4,
            _ => 0,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Number(color, value) => write!(f, "{color} {value}"),
            Card::PlusTwo(color) => write!(f, "{color} +2"),
            Card::Reverse(color) => write!(f, "{color} reverse"),
            Card::Skip(color) => write!(f, "{color} skip"),
            Card::PlusFour => f.write_str("+4"),
        }
    }
}

/// Builds the full 56-card deck in deterministic order (unshuffled).
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for color in Color::ALL {
        for value in 0..=MAX_CARD_VALUE {
            deck.push(Card::Number(color, value));
        }
        deck.push(Card::PlusTwo(color));
        deck.push(Card::Reverse(color));
        deck.push(Card::Skip(color));
    }
    deck.extend(std::iter::repeat(Card::PlusFour).take(PLUS_FOUR_COUNT));
    deck
}

/// Returns a uniformly shuffled copy of `cards`; the input is left untouched.
pub fn shuffled<R: Rng + ?Sized>(cards: &[Card], rng: &mut R) -> Vec<Card> {
    let mut copy = cards.to_vec();
    copy.shuffle(rng);
    copy
}

/// Full deck in random order.
pub fn build_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    shuffled(&full_deck(), rng)
}
