use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::action::{Action, ActionTag, HUMAN_PLAYER, LastAction, PlayerId, Seat};
use crate::card::{Card, Color, HAND_SIZE, MAX_PLAYERS, MIN_PLAYERS, build_deck};
use crate::config::GameOptions;
use crate::error::{GameError, InvalidAction};
use crate::event::GameEvent;
use crate::rules::{PlayContext, Stack, has_any_legal_play};
use crate::score::winner_gain;
use crate::state::{Direction, GameStateView, GameStatus, PlayerPublicState, TurnPhase};

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub num_players: usize,
    /// `None` seeds the shuffler from OS entropy.
    pub seed: Option<u64>,
    pub options: GameOptions,
    /// Seat 0 is driven by a bot as well (simulations).
    pub autopilot: bool,
    pub hand_size: usize,
}

impl GameConfig {
    /// Player counts outside 2..=8 are clamped.
    pub fn new(num_players: usize) -> Self {
        Self {
            num_players: clamp_players(num_players),
            seed: None,
            options: GameOptions::default(),
            autopilot: false,
            hand_size: HAND_SIZE,
        }
    }
}

fn clamp_players(num_players: usize) -> usize {
    num_players.clamp(MIN_PLAYERS, MAX_PLAYERS)
}

/// Builder that enables deterministic deck injection for tests and simulations.
pub struct GameBuilder {
    config: GameConfig,
    deck: Option<Vec<Card>>,
}

impl GameBuilder {
    pub fn new(num_players: usize) -> Self {
        Self {
            config: GameConfig::new(num_players),
            deck: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Use `deck` as the draw pile of the first round. The last card is the top.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    pub fn with_options(mut self, options: GameOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Override the number of cards dealt per player (7 by default).
    /// Useful to arrange short hands in tests.
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.config.hand_size = hand_size;
        self
    }

    pub fn autopilot(mut self, autopilot: bool) -> Self {
        self.config.autopilot = autopilot;
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

/// Round state machine: piles, hands, turn order and the running score.
pub struct Game {
    options: GameOptions,
    autopilot: bool,
    hand_size: usize,
    seats: Vec<Seat>,
    names: Vec<String>,
    hands: Vec<Vec<Card>>,
    uno_armed: Vec<bool>,
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    current_player: PlayerId,
    direction: Direction,
    stack: Stack,
    forced_color: Option<Color>,
    phase: TurnPhase,
    status: GameStatus,
    round: u32,
    scores: Vec<u32>,
    last_winner: Option<PlayerId>,
    last_action: Option<LastAction>,
    synthetic_cards: usize,
    events: Vec<GameEvent>,
    rng: StdRng,
}

impl Game {
    pub fn builder(num_players: usize) -> GameBuilder {
        GameBuilder::new(num_players)
    }

    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        GameBuilder { config, deck: None }.build()
    }

    pub fn options(&self) -> GameOptions {
        self.options
    }

    /// Options may change between turns; the new values apply from the next check on.
    pub fn set_options(&mut self, options: GameOptions) {
        self.options = options;
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn stack(&self) -> Stack {
        self.stack
    }

    pub fn forced_color(&self) -> Option<Color> {
        self.forced_color
    }

    pub fn top_card(&self) -> Option<Card> {
        self.discard_pile.last().copied()
    }

    pub fn player_count(&self) -> usize {
        self.hands.len()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn last_winner(&self) -> Option<PlayerId> {
        self.last_winner
    }

    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_pile_len(&self) -> usize {
        self.discard_pile.len()
    }

    pub fn seat(&self, player: PlayerId) -> Result<Seat, GameError> {
        self.seats
            .get(player)
            .copied()
            .ok_or(GameError::InvalidPlayer(player))
    }

    pub fn hand(&self, player: PlayerId) -> Result<&[Card], GameError> {
        self.hands
            .get(player)
            .map(Vec::as_slice)
            .ok_or(GameError::InvalidPlayer(player))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::Finished { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            GameStatus::Finished { winner } => Some(winner),
            GameStatus::Running => None,
        }
    }

    /// Events produced since the previous call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn play_context(&self) -> Option<PlayContext> {
        self.top_card().map(|top| PlayContext {
            top,
            forced_color: self.forced_color,
            stack: self.stack,
            mix_stacking_allowed: self.options.mix_stacking_allowed,
        })
    }

    /// Read-only hint: would the card at `hand_index` be accepted right now?
    pub fn is_legal_play(&self, player: PlayerId, hand_index: usize) -> Result<bool, GameError> {
        let hand = self.hand(player)?;
        let card = hand
            .get(hand_index)
            .ok_or(InvalidAction::HandIndex(hand_index))?;
        let seat = self.seats[player];
        Ok(self
            .play_context()
            .is_none_or(|ctx| ctx.check_for(seat, card).is_ok()))
    }

    /// Read-only: does the player hold any card matching the top card?
    pub fn has_any_legal_play(&self, player: PlayerId) -> Result<bool, GameError> {
        let hand = self.hand(player)?;
        Ok(match self.top_card() {
            Some(top) => has_any_legal_play(hand, &top, self.forced_color),
            None => !hand.is_empty(),
        })
    }

    pub fn state_view(&self, perspective: PlayerId) -> Result<GameStateView, GameError> {
        if perspective >= self.hands.len() {
            return Err(GameError::InvalidPlayer(perspective));
        }
        let players = self
            .hands
            .iter()
            .enumerate()
            .map(|(idx, hand)| PlayerPublicState {
                id: idx,
                name: self.names[idx].clone(),
                seat: self.seats[idx],
                hand_size: hand.len(),
                uno_armed: self.uno_armed[idx],
                score: self.scores[idx],
                is_current: idx == self.current_player,
            })
            .collect();

        Ok(GameStateView {
            options: self.options,
            phase: self.phase,
            status: self.status,
            round: self.round,
            self_player: perspective,
            current_player: self.current_player,
            direction: self.direction,
            stack_draw: self.stack.draw,
            stack_type: self.stack.kind,
            forced_color: self.forced_color,
            draw_pile_count: self.draw_pile.len(),
            discard_pile_count: self.discard_pile.len(),
            discard_top: self.top_card(),
            synthetic_cards: self.synthetic_cards,
            players,
            hand: self.hands[perspective].clone(),
            last_action: self.last_action,
        })
    }

    /// Every action the active player may take. Empty while a color choice
    /// is pending or after the round ended.
    pub fn legal_actions(&self, player: PlayerId) -> Result<Vec<Action>, GameError> {
        if self.is_finished() {
            return Ok(Vec::new());
        }
        if player >= self.hands.len() {
            return Err(GameError::InvalidPlayer(player));
        }
        if player != self.current_player {
            return Err(GameError::NotPlayersTurn);
        }
        if matches!(self.phase, TurnPhase::AwaitingColorChoice { .. }) {
            return Ok(Vec::new());
        }
        let hand = &self.hands[player];
        let mut actions: Vec<Action> = match self.play_context() {
            Some(ctx) => ctx.legal_indices(self.seats[player], hand),
            None => (0..hand.len()).collect(),
        }
        .into_iter()
        .map(|hand_index| Action::Play {
            hand_index,
            color: None,
        })
        .collect();
        actions.push(Action::Draw);
        if !self.stack.is_active() && !self.has_any_legal_play(player)? {
            actions.push(Action::Pass);
        }
        if self.can_declare_uno(player) {
            actions.push(Action::DeclareUno);
        }
        Ok(actions)
    }

    pub fn apply_action(&mut self, player: PlayerId, action: Action) -> Result<(), GameError> {
        self.ensure_actor(player)?;
        if matches!(self.phase, TurnPhase::AwaitingColorChoice { .. }) {
            return Err(GameError::AwaitingColorChoice);
        }
        match action {
            Action::Play { hand_index, color } => self.play(player, hand_index, color),
            Action::Draw => {
                self.draw(player);
                Ok(())
            }
            Action::Pass => self.pass(player),
            Action::DeclareUno => self.declare_uno(player),
        }
    }

    /// Resolves a pending +4 with the chosen color and finishes the play.
    pub fn choose_color(&mut self, player: PlayerId, color: Color) -> Result<(), GameError> {
        self.ensure_actor(player)?;
        let TurnPhase::AwaitingColorChoice {
            player: pending,
            hand_index,
        } = self.phase
        else {
            return Err(InvalidAction::NoPendingColorChoice.into());
        };
        if pending != player {
            return Err(GameError::NotPlayersTurn);
        }
        self.phase = TurnPhase::AwaitingAction;
        self.events.push(GameEvent::ColorChosen { player, color });
        self.commit_play(player, hand_index, Some(color));
        Ok(())
    }

    /// Drops a pending +4 without playing it. Hands, piles and turn stay as they were.
    pub fn abandon_color_choice(&mut self, player: PlayerId) -> Result<(), GameError> {
        self.ensure_actor(player)?;
        match self.phase {
            TurnPhase::AwaitingColorChoice {
                player: pending, ..
            } if pending == player => {
                self.phase = TurnPhase::AwaitingAction;
                self.events.push(GameEvent::ColorChoiceAbandoned { player });
                Ok(())
            }
            TurnPhase::AwaitingColorChoice { .. } => Err(GameError::NotPlayersTurn),
            _ => Err(InvalidAction::NoPendingColorChoice.into()),
        }
    }

    /// Deals a fresh round. Scores survive unless the table size changes.
    pub fn start_round(&mut self, num_players: usize) {
        let deck = build_deck(&mut self.rng);
        self.deal(num_players, deck);
    }

    /// Starts the following round with the same table. Only valid once the current round ended.
    pub fn start_next_round(&mut self) -> Result<(), GameError> {
        if !self.is_finished() {
            return Err(GameError::RoundInProgress);
        }
        self.round += 1;
        self.last_winner = None;
        self.start_round(self.hands.len());
        Ok(())
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder { config, deck } = builder;
        if deck.as_ref().is_some_and(Vec::is_empty) {
            return Err(GameError::InvalidConfiguration("deck must not be empty"));
        }
        if config.hand_size == 0 {
            return Err(GameError::InvalidConfiguration("hand size must be positive"));
        }
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let deck = deck.unwrap_or_else(|| build_deck(&mut rng));
        let mut game = Game {
            options: config.options,
            autopilot: config.autopilot,
            hand_size: config.hand_size,
            seats: Vec::new(),
            names: Vec::new(),
            hands: Vec::new(),
            uno_armed: Vec::new(),
            draw_pile: Vec::new(),
            discard_pile: Vec::new(),
            current_player: 0,
            direction: Direction::Clockwise,
            stack: Stack::default(),
            forced_color: None,
            phase: TurnPhase::AwaitingAction,
            status: GameStatus::Running,
            round: 1,
            scores: Vec::new(),
            last_winner: None,
            last_action: None,
            synthetic_cards: 0,
            events: Vec::new(),
            rng,
        };
        game.deal(config.num_players, deck);
        Ok(game)
    }

    fn deal(&mut self, num_players: usize, deck: Vec<Card>) {
        let n = clamp_players(num_players);
        if self.scores.len() != n {
            self.scores = vec![0; n];
        }
        self.seats = (0..n)
            .map(|idx| {
                if idx == HUMAN_PLAYER && !self.autopilot {
                    Seat::Human
                } else {
                    Seat::Bot
                }
            })
            .collect();
        self.names = (0..n)
            .map(|idx| match self.seats[idx] {
                Seat::Human => String::from("Human"),
                Seat::Bot => format!("Bot {idx}"),
            })
            .collect();
        self.hands = vec![Vec::with_capacity(self.hand_size); n];
        self.uno_armed = vec![false; n];
        self.draw_pile = deck;
        self.discard_pile.clear();
        self.current_player = 0;
        self.direction = Direction::Clockwise;
        self.stack.clear();
        self.forced_color = None;
        self.phase = TurnPhase::AwaitingAction;
        self.status = GameStatus::Running;
        self.synthetic_cards = 0;

        'deal: for _ in 0..self.hand_size {
            for hand in self.hands.iter_mut() {
                let Some(card) = self.draw_pile.pop() else {
                    break 'deal;
                };
                hand.push(card);
            }
        }

        let first = match self.draw_pile.iter().rposition(|card| !card.is_wild()) {
            Some(position) => self.draw_pile.remove(position),
            None => {
                self.synthetic_cards += 1;
                debug!("draw pile has no starting card; synthesizing a zero");
                Card::Number(Color::random(&mut self.rng), 0)
            }
        };
        self.discard_pile.push(first);
        self.last_action = Some(LastAction {
            kind: ActionTag::Turn,
            player: 0,
        });
        info!(round = self.round, players = n, %first, "round started");
        self.events.push(GameEvent::RoundStarted {
            round: self.round,
            players: n,
            first,
        });
        self.events.push(GameEvent::TurnStarted { player: 0 });
    }

    fn ensure_actor(&self, player: PlayerId) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::RoundOver);
        }
        if player >= self.hands.len() {
            return Err(GameError::InvalidPlayer(player));
        }
        if player != self.current_player {
            return Err(GameError::NotPlayersTurn);
        }
        Ok(())
    }

    fn can_declare_uno(&self, player: PlayerId) -> bool {
        self.options.uno_declaration_required
            && self.seats[player] == Seat::Human
            && self.hands[player].len() == 2
            && !self.uno_armed[player]
    }

    fn play(
        &mut self,
        player: PlayerId,
        hand_index: usize,
        color: Option<Color>,
    ) -> Result<(), GameError> {
        let card = *self.hands[player]
            .get(hand_index)
            .ok_or(InvalidAction::HandIndex(hand_index))?;
        if let Some(ctx) = self.play_context() {
            ctx.check_for(self.seats[player], &card)?;
        }
        if card.is_wild() && color.is_none() {
            self.phase = TurnPhase::AwaitingColorChoice { player, hand_index };
            return Ok(());
        }
        self.commit_play(player, hand_index, color);
        Ok(())
    }

    fn draw(&mut self, player: PlayerId) {
        if self.stack.is_active() {
            self.take_stack(player);
            return;
        }
        let drawn = self.draw_cards(player, 1);
        self.last_action = Some(LastAction {
            kind: ActionTag::Draw,
            player,
        });
        let is_bot = self.seats[player] == Seat::Bot;
        if drawn == 1 && (is_bot || self.options.auto_play_drawn_card) {
            let hand_index = self.hands[player].len() - 1;
            let card = self.hands[player][hand_index];
            if self.play_context().is_none_or(|ctx| ctx.allows(&card)) {
                if card.is_wild() {
                    self.phase = TurnPhase::AwaitingColorChoice { player, hand_index };
                } else {
                    self.commit_play(player, hand_index, None);
                }
                return;
            }
        }
        if is_bot {
            self.end_turn();
        }
    }

    fn pass(&mut self, player: PlayerId) -> Result<(), GameError> {
        if self.stack.is_active() {
            return Err(InvalidAction::MustResolveStack {
                amount: self.stack.draw,
            }
            .into());
        }
        if self.has_any_legal_play(player)? {
            return Err(InvalidAction::InvalidPass.into());
        }
        self.events.push(GameEvent::Passed { player });
        self.end_turn();
        Ok(())
    }

    fn declare_uno(&mut self, player: PlayerId) -> Result<(), GameError> {
        if !self.can_declare_uno(player) {
            return Err(InvalidAction::UnoNotAvailable.into());
        }
        self.uno_armed[player] = true;
        self.events.push(GameEvent::UnoDeclared { player });
        Ok(())
    }

    fn commit_play(&mut self, player: PlayerId, hand_index: usize, color: Option<Color>) {
        self.place_card(player, hand_index, color);
        self.resolve_play(player);
    }

    /// Moves the card to the discard pile and applies its effect. `Skip` and
    /// two-player `Reverse` advance one seat here; the regular advance follows
    /// in [`Game::resolve_play`].
    fn place_card(&mut self, player: PlayerId, hand_index: usize, color: Option<Color>) -> Card {
        let card = self.hands[player].remove(hand_index);
        self.discard_pile.push(card);
        self.forced_color = if card.is_wild() {
            Some(color.unwrap_or_else(|| Color::random(&mut self.rng)))
        } else {
            None
        };
        match card {
            Card::Skip(_) => self.advance_turn(1),
            Card::Reverse(_) => {
                self.direction = self.direction.flipped();
                if self.hands.len() == 2 {
                    self.advance_turn(1);
                }
            }
            Card::PlusTwo(_) | Card::PlusFour => self.stack.push(&card),
            Card::Number(..) => {}
        }
        debug!(player, %card, stack = self.stack.draw, "card placed");
        self.last_action = Some(LastAction {
            kind: ActionTag::Play,
            player,
        });
        self.events.push(GameEvent::Played { player, card });
        card
    }

    fn resolve_play(&mut self, player: PlayerId) {
        if self.options.uno_declaration_required && self.hands[player].len() == 1 {
            let declared = self.uno_armed[player] || self.seats[player] == Seat::Bot;
            if declared {
                if self.seats[player] == Seat::Bot {
                    self.events.push(GameEvent::UnoDeclared { player });
                }
            } else {
                warn!(player, "UNO not declared, drawing penalty");
                self.draw_cards(player, 2);
                self.events.push(GameEvent::UnoPenalty { player });
            }
            self.uno_armed[player] = false;
        }
        if self.hands[player].is_empty() {
            self.finish_round(player);
            return;
        }
        self.end_turn();
    }

    /// Forced draw of the whole accumulation; the turn is forfeited.
    fn take_stack(&mut self, player: PlayerId) {
        let count = self.stack.draw;
        let drawn = self.draw_cards(player, count);
        debug!(player, count, drawn, "stack taken");
        self.events.push(GameEvent::StackTaken { player, count });
        self.stack.clear();
        // A +4 left on top keeps its color; otherwise only +4 could follow.
        if !self.top_card().is_some_and(|top| top.is_wild()) {
            self.forced_color = None;
        }
        self.last_action = Some(LastAction {
            kind: ActionTag::Draw,
            player,
        });
        self.end_turn();
    }

    fn finish_round(&mut self, winner: PlayerId) {
        let points = winner_gain(&self.hands, winner);
        self.scores[winner] += points;
        self.status = GameStatus::Finished { winner };
        self.phase = TurnPhase::RoundOver;
        self.last_winner = Some(winner);
        info!(round = self.round, winner, points, "round won");
        self.events.push(GameEvent::RoundWon {
            player: winner,
            points,
        });
    }

    fn end_turn(&mut self) {
        self.advance_turn(1);
        self.uno_armed.fill(false);
        self.last_action = Some(LastAction {
            kind: ActionTag::Turn,
            player: self.current_player,
        });
        self.events.push(GameEvent::TurnStarted {
            player: self.current_player,
        });
    }

    fn advance_turn(&mut self, steps: usize) {
        let n = self.hands.len() as isize;
        let next = self.current_player as isize + steps as isize * self.direction.sign();
        self.current_player = next.rem_euclid(n) as usize;
    }

    /// Draws up to `count` cards, stopping early when no card can be found.
    fn draw_cards(&mut self, player: PlayerId, count: usize) -> usize {
        let mut drawn = 0;
        for _ in 0..count {
            if !self.ensure_draw_pile() {
                break;
            }
            let Some(card) = self.draw_pile.pop() else {
                break;
            };
            self.hands[player].push(card);
            drawn += 1;
        }
        if drawn > 0 {
            self.events.push(GameEvent::Drew {
                player,
                count: drawn,
            });
        }
        drawn
    }

    /// Refills an empty draw pile from the discards below the top card.
    /// Returns false when no card is available anywhere.
    fn ensure_draw_pile(&mut self) -> bool {
        if !self.draw_pile.is_empty() {
            return true;
        }
        if self.discard_pile.len() > 1 {
            let top = self.discard_pile.pop();
            let mut rest = std::mem::take(&mut self.discard_pile);
            rest.shuffle(&mut self.rng);
            debug!(cards = rest.len(), "discards reshuffled into draw pile");
            self.draw_pile = rest;
            self.discard_pile.extend(top);
            return true;
        }
        if self.discard_pile.is_empty() {
            warn!("draw and discard piles are both empty");
        } else {
            debug!("draw pile empty and nothing to reshuffle");
        }
        false
    }
}
