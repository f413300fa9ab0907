use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use unobot::{
    Color, GameBuilder, GameError, GameOptions, Session, TurnPhase, describe_event, render_state,
};

#[derive(Parser, Debug)]
#[command(name = "play", about = "Play against rule bots in the terminal.")]
struct Args {
    /// Players at the table, you included (2-8)
    #[arg(short = 'p', long = "players", default_value_t = 4)]
    players: usize,

    /// Seed for shuffling (random when omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// JSON file with table options (camelCase keys)
    #[arg(long = "options")]
    options: Option<PathBuf>,

    /// Show which cards in your hand are playable
    #[arg(long = "hints")]
    hints: bool,

    /// Require UNO declarations
    #[arg(long = "uno-required")]
    uno_required: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut options = match &args.options {
        Some(path) => GameOptions::from_json_file(path)?,
        None => GameOptions::default(),
    };
    options.show_legality_hints |= args.hints;
    options.uno_declaration_required |= args.uno_required;

    let mut builder = GameBuilder::new(args.players).with_options(options);
    if let Some(seed) = args.seed {
        builder = builder.with_seed(seed);
    }
    let mut session = Session::new(builder.build()?);
    session.run_bots()?;
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        flush_events(&mut session)?;
        let view = session.view()?;
        println!("\n{}", render_state(&view));
        if !view.is_running() {
            println!("Round over. Type 'next' for another round or 'q' to quit.");
        } else if let TurnPhase::AwaitingColorChoice { .. } = view.phase {
            println!("Choose a color: red, yellow, green, blue (or 'cancel').");
        }
        print!("> ");
        if io::stdout().flush().is_err() {
            eprintln!("failed to flush stdout");
        }
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let result = match command.to_ascii_lowercase().as_str() {
            "q" | "quit" => return Ok(()),
            "help" | "h" => {
                print_help();
                Ok(())
            }
            "d" | "draw" => session.human_draw(),
            "pass" => session.human_pass(),
            "uno" => session.declare_uno(),
            "next" => session.start_next_round(),
            "cancel" => session.abandon_color_choice(),
            "new" => {
                let count = words
                    .next()
                    .and_then(|w| w.parse::<usize>().ok())
                    .unwrap_or(view.players.len());
                session.start_round(count)
            }
            "p" | "play" => {
                let Some(index) = words.next().and_then(|w| w.parse::<usize>().ok()) else {
                    println!("Usage: play <index> [color]");
                    continue;
                };
                let color = match words.next().map(str::parse::<Color>) {
                    Some(Ok(color)) => Some(color),
                    Some(Err(err)) => {
                        println!("{err}");
                        continue;
                    }
                    None => None,
                };
                session.human_play(index, color)
            }
            other => match other.parse::<Color>() {
                Ok(color) => session.choose_color(color),
                Err(_) => {
                    println!("Unknown command '{other}'. Type 'help'.");
                    continue;
                }
            },
        };
        if let Err(err) = result {
            report_rejection(&err);
        }
    }
}

fn flush_events(session: &mut Session) -> Result<(), GameError> {
    let events = session.drain_events();
    let view = session.view()?;
    for event in &events {
        println!("  {}", describe_event(&view, event));
    }
    Ok(())
}

fn report_rejection(err: &GameError) {
    match err {
        GameError::InvalidAction(reason) => println!("Not allowed: {reason}"),
        other => println!("{other}"),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  play <index> [color]  Play a card; a +4 needs a color");
    println!("  draw                  Draw a card (or the pending stack)");
    println!("  pass                  Pass when nothing is playable");
    println!("  uno                   Declare UNO before playing your second-to-last card");
    println!("  <color>               Answer a pending color choice");
    println!("  cancel                Take back a pending +4");
    println!("  next                  Start the next round once this one is over");
    println!("  new [players]         Deal a fresh round");
    println!("  q                     Quit");
}
