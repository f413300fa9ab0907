use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use unobot::{
    Bot, GameBuilder, GameError, GameOptions, Session, create_bot_from_spec, describe_event,
    label_for_spec, render_state,
};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

#[derive(Parser, Debug)]
#[command(
    name = "simulate",
    about = "Play bot-only sessions and report wins and scores per seat."
)]
struct Args {
    /// Number of rounds in the session
    #[arg(short = 'r', long = "rounds", default_value_t = 10)]
    rounds: u32,

    /// Seed for shuffling
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Safety cap on bot turns per round; longer rounds abort the session
    #[arg(long = "max-turns", default_value_t = 5000)]
    max_turns: usize,

    /// JSON file with table options (camelCase keys)
    #[arg(long = "options")]
    options: Option<PathBuf>,

    /// Require UNO declarations (overrides the options file)
    #[arg(long = "uno-required")]
    uno_required: bool,

    /// Forbid mixing +2 and +4 in one stack (overrides the options file)
    #[arg(long = "no-mix-stacking")]
    no_mix_stacking: bool,

    /// Print every event and the table after each round
    #[arg(long = "visualize")]
    visualize: bool,

    /// Bot specs, one per seat (2-8 total): rule, random[:seed]
    bots: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let specs = if args.bots.is_empty() {
        vec![String::from("rule"), String::from("rule")]
    } else {
        args.bots.clone()
    };
    if !(2..=8).contains(&specs.len()) {
        return Err(format!("expected between 2 and 8 players, received {}", specs.len()).into());
    }

    let mut options = match &args.options {
        Some(path) => GameOptions::from_json_file(path)?,
        None => GameOptions::default(),
    };
    if args.uno_required {
        options.uno_declaration_required = true;
    }
    if args.no_mix_stacking {
        options.mix_stacking_allowed = false;
    }

    let game = GameBuilder::new(specs.len())
        .with_seed(args.seed)
        .with_options(options)
        .autopilot(true)
        .build()?;
    let bots = specs
        .iter()
        .enumerate()
        .map(|(index, spec)| create_bot_from_spec(spec, index, args.seed))
        .collect::<Result<Vec<Box<dyn Bot>>, _>>()?;
    let mut session = Session::with_bots(game, bots)?;

    let mut wins = vec![0u32; specs.len()];
    for round in 1..=args.rounds {
        if round > 1 {
            session.deal_next_round()?;
        }
        let mut turns = 0;
        while session.bot_to_move() {
            if turns >= args.max_turns {
                return Err(GameError::Stalled(args.max_turns).into());
            }
            session.step()?;
            turns += 1;
            report(&mut session, args.visualize)?;
        }
        if let Some(winner) = session.game().winner() {
            wins[winner] += 1;
        }
        if args.visualize {
            println!("{}", render_state(&session.view()?));
        }
    }

    let scores = session.game().scores();
    println!("Session of {} rounds, {} seats:", args.rounds, specs.len());
    for (seat, spec) in specs.iter().enumerate() {
        println!(
            "  seat {seat} ({}): {} wins, {} points",
            label_for_spec(spec),
            wins[seat],
            scores[seat]
        );
    }
    Ok(())
}

fn report(session: &mut Session, visualize: bool) -> Result<(), GameError> {
    let events = session.drain_events();
    if visualize {
        let view = session.view()?;
        for event in &events {
            println!("{}", describe_event(&view, event));
        }
    }
    Ok(())
}
