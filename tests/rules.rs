use unobot::card::{Card, CardKind, Color::*, DECK_SIZE};
use unobot::{
    Action, Direction, GameBuilder, GameError, GameEvent, GameOptions, GameStatus, InvalidAction,
    TurnPhase,
};

/// Arranges a draw pile so that player `p` is dealt exactly `hands[p]`,
/// `first` opens the discard pile and `draws` come off the pile in order.
fn arranged_deck(hands: &[Vec<Card>], first: Card, draws: &[Card]) -> Vec<Card> {
    let size = hands[0].len();
    assert!(hands.iter().all(|hand| hand.len() == size));
    let mut pops = Vec::new();
    for round in 0..size {
        for hand in hands {
            pops.push(hand[round]);
        }
    }
    pops.push(first);
    pops.extend_from_slice(draws);
    pops.reverse();
    pops
}

fn play(hand_index: usize) -> Action {
    Action::Play {
        hand_index,
        color: None,
    }
}

#[test]
fn initial_deal_conserves_deck() -> Result<(), GameError> {
    let game = GameBuilder::new(4).with_seed(1).build()?;
    let view = game.state_view(0)?;
    for player in &view.players {
        assert_eq!(player.hand_size, 7);
    }
    assert_eq!(view.discard_pile_count, 1);
    assert_eq!(view.draw_pile_count, DECK_SIZE - 28 - 1);
    assert!(!view.discard_top.expect("starting card").is_wild());
    assert_eq!(view.cards_in_play(), DECK_SIZE);
    assert_eq!(view.current_player, 0);
    assert_eq!(view.direction, Direction::Clockwise);
    assert_eq!(view.stack_draw, 0);
    assert_eq!(view.forced_color, None);
    assert!(view.is_running());
    Ok(())
}

#[test]
fn player_count_is_clamped() -> Result<(), GameError> {
    assert_eq!(GameBuilder::new(1).with_seed(3).build()?.player_count(), 2);
    let full = GameBuilder::new(12).with_seed(3).build()?;
    assert_eq!(full.player_count(), 8);
    // Eight hands of seven use up the deck, so the opening card is synthesized.
    let view = full.state_view(0)?;
    assert_eq!(view.draw_pile_count, 0);
    assert_eq!(view.synthetic_cards, 1);
    assert_eq!(view.discard_top.and_then(|c| c.value()), Some(0));
    assert_eq!(view.cards_in_play(), DECK_SIZE + view.synthetic_cards);
    Ok(())
}

#[test]
fn starting_card_skips_wilds_without_losing_them() -> Result<(), GameError> {
    let hands = vec![vec![Card::Number(Red, 1)], vec![Card::Number(Blue, 2)]];
    // After dealing, the pile holds a green 6 under a +4.
    let mut deck = arranged_deck(&hands, Card::PlusFour, &[]);
    deck.insert(0, Card::Number(Green, 6));
    let game = GameBuilder::new(2).with_hand_size(1).with_deck(deck).build()?;
    assert_eq!(game.top_card(), Some(Card::Number(Green, 6)));
    assert_eq!(game.draw_pile_len(), 1);
    let view = game.state_view(0)?;
    assert_eq!(view.cards_in_play(), 4);
    assert_eq!(view.synthetic_cards, 0);
    Ok(())
}

#[test]
fn two_player_reverse_acts_as_skip() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Reverse(Red), Card::Number(Yellow, 1)],
        vec![Card::Number(Blue, 2), Card::Number(Blue, 3)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[Card::Number(Green, 9)]);
    let mut game = GameBuilder::new(2).with_hand_size(2).with_deck(deck).build()?;
    game.apply_action(0, play(0))?;
    assert_eq!(game.current_player(), 0);
    assert_eq!(game.direction(), Direction::CounterClockwise);
    Ok(())
}

#[test]
fn skip_jumps_over_next_player() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Skip(Red), Card::Number(Yellow, 1)],
        vec![Card::Number(Blue, 2), Card::Number(Blue, 3)],
        vec![Card::Number(Green, 2), Card::Number(Green, 3)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[]);
    let mut game = GameBuilder::new(3).with_hand_size(2).with_deck(deck).build()?;
    game.apply_action(0, play(0))?;
    assert_eq!(game.current_player(), 2);
    Ok(())
}

#[test]
fn reverse_turns_play_around() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Reverse(Red), Card::Number(Yellow, 1)],
        vec![Card::Number(Blue, 2), Card::Number(Blue, 3)],
        vec![Card::Number(Green, 2), Card::Number(Green, 3)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[]);
    let mut game = GameBuilder::new(3).with_hand_size(2).with_deck(deck).build()?;
    game.apply_action(0, play(0))?;
    assert_eq!(game.direction(), Direction::CounterClockwise);
    assert_eq!(game.current_player(), 2);
    Ok(())
}

#[test]
fn plus_two_stack_accumulates_and_is_drawn() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::PlusTwo(Red), Card::Number(Yellow, 1)],
        vec![Card::PlusTwo(Blue), Card::Number(Blue, 3)],
        vec![Card::Number(Green, 2), Card::Number(Green, 3)],
    ];
    let draws = [
        Card::Number(Yellow, 4),
        Card::Number(Yellow, 5),
        Card::Number(Yellow, 6),
        Card::Number(Yellow, 7),
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &draws);
    let mut game = GameBuilder::new(3).with_hand_size(2).with_deck(deck).build()?;

    game.apply_action(0, play(0))?;
    assert_eq!(game.stack().draw, 2);
    assert_eq!(game.stack().kind, Some(CardKind::PlusTwo));
    game.apply_action(1, play(0))?;
    assert_eq!(game.stack().draw, 4);
    assert_eq!(game.current_player(), 2);

    let actions = game.legal_actions(2)?;
    assert_eq!(actions, vec![Action::Draw]);
    assert_eq!(
        game.apply_action(2, Action::Pass).unwrap_err().to_string(),
        "invalid action: stack of 4 pending: draw it or respond with +2/+4"
    );
    game.apply_action(2, Action::Draw)?;
    assert_eq!(game.hand(2)?.len(), 6);
    assert_eq!(game.stack().draw, 0);
    assert_eq!(game.stack().kind, None);
    assert_eq!(game.forced_color(), None);
    assert_eq!(game.current_player(), 0);
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::StackTaken {
        player: 2,
        count: 4
    }));
    Ok(())
}

#[test]
fn mixing_is_rejected_when_disabled() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::PlusTwo(Red), Card::Number(Yellow, 1)],
        vec![Card::PlusFour, Card::Number(Blue, 3)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[]);
    let options = GameOptions {
        mix_stacking_allowed: false,
        ..GameOptions::default()
    };
    let mut game = GameBuilder::new(2)
        .with_hand_size(2)
        .with_options(options)
        .with_deck(deck)
        .build()?;
    game.apply_action(0, play(0))?;
    let before = game.state_view(1)?;
    let err = game.apply_action(
        1,
        Action::Play {
            hand_index: 0,
            color: Some(Green),
        },
    );
    assert!(matches!(
        err,
        Err(GameError::InvalidAction(InvalidAction::StackObligation {
            amount: 2,
            required: Some(CardKind::PlusTwo)
        }))
    ));
    assert_eq!(game.state_view(1)?, before);
    Ok(())
}

#[test]
fn human_stack_response_must_also_match_forced_color() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Number(Red, 1), Card::PlusTwo(Red)],
        vec![Card::PlusFour, Card::Number(Blue, 3)],
    ];
    let draws = [Card::Number(Yellow, 4); 4];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &draws);
    let mut game = GameBuilder::new(2).with_hand_size(2).with_deck(deck).build()?;
    game.apply_action(0, play(0))?;
    game.apply_action(
        1,
        Action::Play {
            hand_index: 0,
            color: Some(Green),
        },
    )?;
    assert_eq!(game.legal_actions(0)?, vec![Action::Draw]);
    assert!(!game.is_legal_play(0, 0)?);
    assert!(matches!(
        game.apply_action(0, play(0)),
        Err(GameError::InvalidAction(InvalidAction::ForcedColor { color: Green }))
    ));
    assert_eq!(game.stack().draw, 4);
    Ok(())
}

#[test]
fn plus_four_forces_color_until_next_play() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::PlusFour, Card::Number(Yellow, 1)],
        vec![Card::PlusFour, Card::Number(Blue, 3)],
        vec![Card::Number(Red, 5), Card::Number(Green, 3)],
    ];
    let draws = [Card::Number(Blue, 8); 8];
    let deck = arranged_deck(&hands, Card::Number(Red, 7), &draws);
    let mut game = GameBuilder::new(3).with_hand_size(2).with_deck(deck).build()?;
    game.apply_action(
        0,
        Action::Play {
            hand_index: 0,
            color: Some(Green),
        },
    )?;
    assert_eq!(game.forced_color(), Some(Green));
    assert_eq!(game.stack().kind, Some(CardKind::PlusFour));

    // Player 1 stacks another +4 and names green again.
    game.apply_action(
        1,
        Action::Play {
            hand_index: 0,
            color: Some(Green),
        },
    )?;
    assert_eq!(game.stack().draw, 8);
    game.apply_action(2, Action::Draw)?;
    assert_eq!(game.hand(2)?.len(), 10);
    // The +4 stays on top, so its color still applies.
    assert_eq!(game.forced_color(), Some(Green));

    assert!(matches!(
        game.apply_action(0, play(0)),
        Err(GameError::InvalidAction(InvalidAction::ForcedColor { color: Green }))
    ));
    assert!(!game.is_legal_play(0, 0)?);
    Ok(())
}

#[test]
fn forced_color_allows_matching_color_and_clears() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::PlusFour, Card::Number(Yellow, 1), Card::Number(Yellow, 2)],
        vec![Card::Number(Red, 4), Card::Number(Green, 3), Card::PlusFour],
    ];
    let draws = [Card::Number(Blue, 8); 4];
    let deck = arranged_deck(&hands, Card::Number(Red, 7), &draws);
    let mut game = GameBuilder::new(2).with_hand_size(3).with_deck(deck).build()?;
    game.apply_action(
        0,
        Action::Play {
            hand_index: 0,
            color: Some(Green),
        },
    )?;
    game.apply_action(1, Action::Draw)?;
    assert_eq!(game.current_player(), 0);
    assert_eq!(game.forced_color(), Some(Green));

    let err = game.apply_action(0, play(0)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid action: forced color is green: play green or +4"
    );
    game.apply_action(0, Action::Draw)?;
    game.apply_action(0, Action::Pass)?;
    assert_eq!(game.current_player(), 1);
    assert!(!game.is_legal_play(1, 0)?);
    assert!(game.is_legal_play(1, 1)?);
    assert!(game.is_legal_play(1, 2)?);
    game.apply_action(1, play(1))?;
    assert_eq!(game.forced_color(), None);
    Ok(())
}

#[test]
fn plus_four_without_color_waits_for_choice() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::PlusFour, Card::Number(Yellow, 1)],
        vec![Card::Number(Blue, 2), Card::Number(Blue, 3)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[Card::Number(Green, 1); 4]);
    let mut game = GameBuilder::new(2).with_hand_size(2).with_deck(deck).build()?;
    let before = game.state_view(0)?;

    game.apply_action(0, play(0))?;
    assert_eq!(
        game.phase(),
        TurnPhase::AwaitingColorChoice {
            player: 0,
            hand_index: 0
        }
    );
    assert_eq!(game.hand(0)?.len(), 2);
    assert!(game.legal_actions(0)?.is_empty());
    assert!(matches!(
        game.apply_action(0, Action::Draw),
        Err(GameError::AwaitingColorChoice)
    ));

    game.abandon_color_choice(0)?;
    let after = game.state_view(0)?;
    assert_eq!(after.hand, before.hand);
    assert_eq!(after.current_player, 0);
    assert_eq!(after.discard_pile_count, before.discard_pile_count);

    game.apply_action(0, play(0))?;
    game.choose_color(0, Blue)?;
    assert_eq!(game.forced_color(), Some(Blue));
    assert_eq!(game.stack().draw, 4);
    assert_eq!(game.current_player(), 1);
    assert!(matches!(
        game.choose_color(1, Red),
        Err(GameError::InvalidAction(InvalidAction::NoPendingColorChoice))
    ));
    Ok(())
}

#[test]
fn pass_only_without_playable_cards() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Number(Red, 1), Card::Number(Yellow, 2)],
        vec![Card::Number(Blue, 2), Card::Number(Blue, 3)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[Card::Number(Green, 8); 2]);
    let mut game = GameBuilder::new(2).with_hand_size(2).with_deck(deck).build()?;
    assert!(game.has_any_legal_play(0)?);
    assert!(matches!(
        game.apply_action(0, Action::Pass),
        Err(GameError::InvalidAction(InvalidAction::InvalidPass))
    ));
    assert_eq!(game.current_player(), 0);

    game.apply_action(0, play(0))?;
    // Blue 2 and blue 3 do not match red 1.
    assert!(!game.has_any_legal_play(1)?);
    assert!(game.legal_actions(1)?.contains(&Action::Pass));
    game.apply_action(1, Action::Pass)?;
    assert_eq!(game.current_player(), 0);
    Ok(())
}

#[test]
fn illegal_play_names_top_card() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Number(Blue, 1), Card::Skip(Yellow)],
        vec![Card::Number(Blue, 2), Card::Number(Blue, 3)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[]);
    let mut game = GameBuilder::new(2).with_hand_size(2).with_deck(deck).build()?;
    let err = game.apply_action(0, play(0)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid action: must match color or number (top: red 5)"
    );
    assert!(matches!(
        game.apply_action(0, play(9)),
        Err(GameError::InvalidAction(InvalidAction::HandIndex(9)))
    ));
    assert!(matches!(
        game.apply_action(1, Action::Draw),
        Err(GameError::NotPlayersTurn)
    ));
    assert_eq!(game.hand(0)?.len(), 2);
    Ok(())
}

#[test]
fn missing_uno_declaration_costs_two_cards() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Number(Red, 1), Card::Number(Red, 2)],
        vec![Card::Number(Blue, 2), Card::Number(Blue, 3)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[Card::Number(Green, 8); 2]);
    let options = GameOptions {
        uno_declaration_required: true,
        ..GameOptions::default()
    };
    let mut game = GameBuilder::new(2)
        .with_hand_size(2)
        .with_options(options)
        .with_deck(deck)
        .build()?;
    game.apply_action(0, play(0))?;
    assert_eq!(game.hand(0)?.len(), 3);
    assert!(game.drain_events().contains(&GameEvent::UnoPenalty { player: 0 }));
    Ok(())
}

#[test]
fn declared_uno_avoids_penalty() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Number(Red, 1), Card::Number(Red, 2), Card::Number(Red, 3)],
        vec![
            Card::Number(Blue, 2),
            Card::Number(Blue, 3),
            Card::Number(Blue, 4),
        ],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[Card::Number(Green, 8); 4]);
    let options = GameOptions {
        uno_declaration_required: true,
        ..GameOptions::default()
    };
    let mut game = GameBuilder::new(2)
        .with_hand_size(3)
        .with_options(options)
        .with_deck(deck)
        .build()?;
    // Three cards in hand: too early to declare.
    assert!(matches!(
        game.apply_action(0, Action::DeclareUno),
        Err(GameError::InvalidAction(InvalidAction::UnoNotAvailable))
    ));
    game.apply_action(0, play(0))?;
    // Blue cards do not match the red 1, so the bot seat draws and ends its turn.
    game.apply_action(1, Action::Draw)?;
    assert_eq!(game.current_player(), 0);
    assert!(game.legal_actions(0)?.contains(&Action::DeclareUno));
    game.apply_action(0, Action::DeclareUno)?;
    assert!(game.state_view(0)?.players[0].uno_armed);
    game.apply_action(0, play(0))?;
    assert_eq!(game.hand(0)?.len(), 1);
    assert!(!game.state_view(0)?.players[0].uno_armed);
    Ok(())
}

#[test]
fn bot_seats_never_pay_the_uno_penalty() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Number(Red, 1), Card::Number(Yellow, 2)],
        vec![Card::Number(Red, 2), Card::Number(Blue, 3)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[Card::Number(Green, 8); 2]);
    let options = GameOptions {
        uno_declaration_required: true,
        ..GameOptions::default()
    };
    let mut game = GameBuilder::new(2)
        .with_hand_size(2)
        .with_options(options)
        .with_deck(deck)
        .build()?;
    game.apply_action(0, Action::DeclareUno)?;
    game.apply_action(0, play(0))?;
    game.apply_action(1, play(0))?;
    assert_eq!(game.hand(1)?.len(), 1);
    assert!(game.drain_events().contains(&GameEvent::UnoDeclared { player: 1 }));
    Ok(())
}

#[test]
fn winner_collects_opponent_points() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Number(Red, 3)],
        vec![Card::Number(Blue, 7)],
        vec![Card::PlusFour],
        vec![Card::Skip(Yellow)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[]);
    let mut game = GameBuilder::new(4).with_hand_size(1).with_deck(deck).build()?;
    game.apply_action(0, play(0))?;
    assert_eq!(game.status(), GameStatus::Finished { winner: 0 });
    assert_eq!(game.phase(), TurnPhase::RoundOver);
    assert_eq!(game.scores(), &[77, 0, 0, 0]);
    assert_eq!(game.last_winner(), Some(0));
    assert!(game.legal_actions(0)?.is_empty());
    assert!(matches!(
        game.apply_action(1, Action::Draw),
        Err(GameError::RoundOver)
    ));
    Ok(())
}

#[test]
fn next_round_keeps_scores() -> Result<(), GameError> {
    let hands = vec![vec![Card::Number(Red, 3)], vec![Card::Number(Blue, 7)]];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[]);
    let mut game = GameBuilder::new(2)
        .with_hand_size(1)
        .with_seed(8)
        .with_deck(deck)
        .build()?;
    assert!(matches!(
        game.start_next_round(),
        Err(GameError::RoundInProgress)
    ));
    game.apply_action(0, play(0))?;
    assert_eq!(game.scores(), &[7, 0]);

    game.start_next_round()?;
    assert_eq!(game.round(), 2);
    assert_eq!(game.scores(), &[7, 0]);
    assert_eq!(game.last_winner(), None);
    assert!(!game.is_finished());
    assert_eq!(game.current_player(), 0);
    assert_eq!(game.state_view(0)?.cards_in_play(), DECK_SIZE);
    Ok(())
}

#[test]
fn drawn_card_is_auto_played_when_legal() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Number(Blue, 1), Card::Number(Blue, 2)],
        vec![Card::Number(Blue, 3), Card::Number(Blue, 4)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[Card::Number(Red, 9)]);
    let mut game = GameBuilder::new(2).with_hand_size(2).with_deck(deck).build()?;
    game.apply_action(0, Action::Draw)?;
    assert_eq!(game.top_card(), Some(Card::Number(Red, 9)));
    assert_eq!(game.hand(0)?.len(), 2);
    assert_eq!(game.current_player(), 1);
    Ok(())
}

#[test]
fn drawn_card_stays_in_hand_without_auto_play() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Number(Blue, 1), Card::Number(Blue, 2)],
        vec![Card::Number(Blue, 3), Card::Number(Blue, 4)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[Card::Number(Red, 9)]);
    let options = GameOptions {
        auto_play_drawn_card: false,
        ..GameOptions::default()
    };
    let mut game = GameBuilder::new(2)
        .with_hand_size(2)
        .with_options(options)
        .with_deck(deck)
        .build()?;
    game.apply_action(0, Action::Draw)?;
    assert_eq!(game.hand(0)?.len(), 3);
    assert_eq!(game.current_player(), 0);
    assert!(matches!(
        game.apply_action(0, Action::Pass),
        Err(GameError::InvalidAction(InvalidAction::InvalidPass))
    ));
    game.apply_action(0, play(2))?;
    assert_eq!(game.current_player(), 1);
    Ok(())
}

#[test]
fn bot_seat_ends_turn_after_unplayable_draw() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Number(Red, 1), Card::Number(Yellow, 2)],
        vec![Card::Number(Blue, 3), Card::Number(Blue, 4)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[Card::Number(Green, 8)]);
    let mut game = GameBuilder::new(2).with_hand_size(2).with_deck(deck).build()?;
    game.apply_action(0, play(0))?;
    game.apply_action(1, Action::Draw)?;
    assert_eq!(game.hand(1)?.len(), 3);
    assert_eq!(game.current_player(), 0);
    Ok(())
}

#[test]
fn discards_are_reshuffled_under_the_top_card() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Number(Red, 1), Card::Number(Red, 2)],
        vec![Card::Number(Blue, 3), Card::Number(Blue, 4)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[]);
    let mut game = GameBuilder::new(2).with_hand_size(2).with_deck(deck).build()?;
    assert_eq!(game.draw_pile_len(), 0);

    game.apply_action(0, play(0))?;
    // Only the red 5 sits below the top; it is drawn and played by the bot seat.
    game.apply_action(1, Action::Draw)?;
    assert_eq!(game.top_card(), Some(Card::Number(Red, 5)));
    assert_eq!(game.discard_pile_len(), 2);
    assert_eq!(game.draw_pile_len(), 0);
    assert_eq!(game.state_view(0)?.cards_in_play(), 5);
    Ok(())
}

#[test]
fn drawing_from_exhausted_piles_changes_nothing() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::Number(Blue, 1), Card::Number(Blue, 2)],
        vec![Card::Number(Blue, 3), Card::Number(Blue, 4)],
    ];
    let deck = arranged_deck(&hands, Card::Number(Red, 5), &[]);
    let mut game = GameBuilder::new(2).with_hand_size(2).with_deck(deck).build()?;
    game.apply_action(0, Action::Draw)?;
    assert_eq!(game.hand(0)?.len(), 2);
    assert_eq!(game.current_player(), 0);
    game.apply_action(0, Action::Pass)?;
    assert_eq!(game.current_player(), 1);
    assert_eq!(game.state_view(0)?.cards_in_play(), 5);
    Ok(())
}
