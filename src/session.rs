use tracing::debug;

use crate::action::{Action, HUMAN_PLAYER, PlayerId, Seat};
use crate::bot::Bot;
use crate::bots::RuleBot;
use crate::card::Color;
use crate::error::GameError;
use crate::event::GameEvent;
use crate::game::Game;
use crate::state::{GameStateView, TurnPhase};

/// Upper bound on consecutive bot turns inside one [`Session::run_bots`] call.
pub const MAX_BOT_TURNS: usize = 10_000;

/// A table with one human and bots in every other seat.
///
/// Every human command runs the bot continuation afterwards, so control
/// returns once it is the human's turn again, the round is over, or the
/// human owes a color choice.
pub struct Session {
    game: Game,
    bots: Vec<Option<Box<dyn Bot>>>,
}

impl Session {
    /// Seats every bot with a [`RuleBot`].
    pub fn new(game: Game) -> Self {
        let bots = Self::default_bots(&game);
        Self { game, bots }
    }

    /// Uses `bots` in seat order for every bot seat.
    pub fn with_bots(game: Game, bots: Vec<Box<dyn Bot>>) -> Result<Self, GameError> {
        let bot_seats = (0..game.player_count())
            .filter(|&p| matches!(game.seat(p), Ok(Seat::Bot)))
            .count();
        if bots.len() != bot_seats {
            return Err(GameError::InvalidConfiguration(
                "bot count does not match the bot seats",
            ));
        }
        let mut supplied = bots.into_iter();
        let bots = (0..game.player_count())
            .map(|p| match game.seat(p) {
                Ok(Seat::Bot) => supplied.next(),
                _ => None,
            })
            .collect();
        Ok(Self { game, bots })
    }

    fn default_bots(game: &Game) -> Vec<Option<Box<dyn Bot>>> {
        (0..game.player_count())
            .map(|p| match game.seat(p) {
                Ok(Seat::Bot) => Some(Box::new(RuleBot::new()) as Box<dyn Bot>),
                _ => None,
            })
            .collect()
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Snapshot from the human seat.
    pub fn view(&self) -> Result<GameStateView, GameError> {
        self.game.state_view(HUMAN_PLAYER)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.game.drain_events()
    }

    /// Deals a new round for `num_players`. Bots are reseated with rule bots
    /// when the table size changes.
    pub fn start_round(&mut self, num_players: usize) -> Result<(), GameError> {
        let previous = self.game.player_count();
        self.game.start_round(num_players);
        if self.game.player_count() != previous {
            self.bots = Self::default_bots(&self.game);
        }
        self.run_bots()
    }

    pub fn start_next_round(&mut self) -> Result<(), GameError> {
        self.deal_next_round()?;
        self.run_bots()
    }

    /// Deals the following round and stops before any bot turn, so callers
    /// can drive it with [`Session::step`].
    pub fn deal_next_round(&mut self) -> Result<(), GameError> {
        self.game.start_next_round()
    }

    pub fn human_draw(&mut self) -> Result<(), GameError> {
        self.human_action(Action::Draw)
    }

    pub fn human_pass(&mut self) -> Result<(), GameError> {
        self.human_action(Action::Pass)
    }

    /// Plays a card. A +4 without `color` waits for [`Session::choose_color`].
    pub fn human_play(&mut self, hand_index: usize, color: Option<Color>) -> Result<(), GameError> {
        self.human_action(Action::Play { hand_index, color })
    }

    pub fn declare_uno(&mut self) -> Result<(), GameError> {
        self.human_action(Action::DeclareUno)
    }

    pub fn choose_color(&mut self, color: Color) -> Result<(), GameError> {
        self.game.choose_color(HUMAN_PLAYER, color)?;
        self.run_bots()
    }

    pub fn abandon_color_choice(&mut self) -> Result<(), GameError> {
        self.game.abandon_color_choice(HUMAN_PLAYER)
    }

    fn human_action(&mut self, action: Action) -> Result<(), GameError> {
        self.game.apply_action(HUMAN_PLAYER, action)?;
        self.run_bots()
    }

    /// True while the active seat belongs to a bot and the round is live.
    pub fn bot_to_move(&self) -> bool {
        !self.game.is_finished()
            && self
                .bots
                .get(self.game.current_player())
                .is_some_and(Option::is_some)
    }

    /// Plays bot turns until a human has to act or the round ends.
    pub fn run_bots(&mut self) -> Result<(), GameError> {
        let mut turns = 0;
        while self.bot_to_move() {
            if turns == MAX_BOT_TURNS {
                return Err(GameError::Stalled(MAX_BOT_TURNS));
            }
            self.step()?;
            turns += 1;
        }
        Ok(())
    }

    /// Executes one decision of the bot in the active seat. Returns the acting player.
    pub fn step(&mut self) -> Result<PlayerId, GameError> {
        let player = self.game.current_player();
        let view = self.game.state_view(player)?;
        let Some(bot) = self.bots.get_mut(player).and_then(Option::as_mut) else {
            return Err(GameError::NotPlayersTurn);
        };
        if let TurnPhase::AwaitingColorChoice { .. } = self.game.phase() {
            let color = bot.choose_color(&view);
            self.game.choose_color(player, color)?;
            return Ok(player);
        }
        let legal_actions = self.game.legal_actions(player)?;
        let action = bot.select_action(&view, &legal_actions);
        debug!(player, ?action, "bot action");
        self.game.apply_action(player, action)?;
        Ok(player)
    }
}
