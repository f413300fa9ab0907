pub mod random;
pub mod registry;
pub mod rule;

pub use random::RandomBot;
pub use rule::{RuleBot, majority_color};
