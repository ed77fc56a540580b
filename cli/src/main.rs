use std::{
    env,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use minimax_chess::{perft, Board, RaterParams, Square};
use minimax_chess_cli::{
    head_to_head, play_game_from, run_trial, HeadToHeadSearch, RaterStrategy, TrialConfig,
    TuningConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_MOVES, NAIVE_PARAMS,
};
use mimalloc::MiMalloc;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing::{info, level_filters::LevelFilter, Level};
use tracing_subscriber::{layer::SubscriberExt, prelude::*, util::SubscriberInitExt, Registry};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Play the champion parameters against themselves, printing each position.
    Play {
        #[arg(long, default_value_t = 1)]
        depth: u8,
        /// Starting board in text form. Defaults to the initial position.
        #[arg(long)]
        board: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_MAX_MOVES)]
        max_moves: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the legal destinations of the piece on a square.
    Moves {
        square: String,
        #[arg(long)]
        board: Option<PathBuf>,
    },
    Perft {
        depth: usize,
        #[arg(long)]
        board: Option<PathBuf>,
    },
    /// Play a challenger parameter set against the champion.
    Trials {
        #[arg(long, default_value_t = 1)]
        depth: u8,
        #[arg(long, default_value_t = 100)]
        max_trials: usize,
        /// JSON parameter file. Defaults to the material-only parameters.
        #[arg(long)]
        challenger: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Search for better parameters by head-to-head games.
    Tune {
        #[arg(long, default_value_t = 1)]
        depth: u8,
        #[arg(long, default_value_t = 1000)]
        steps: usize,
        #[arg(long, default_value_t = 5)]
        pool_size: usize,
        #[arg(long, default_value_t = 0.95)]
        accept: f64,
        #[arg(long, default_value_t = 0.51)]
        reject: f64,
        #[arg(long, default_value_t = 0.08)]
        sigma: f64,
        /// JSON parameter file to start from. Defaults to deliberately naive parameters.
        #[arg(long)]
        champion: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    enable_logging()?;

    match cli.command {
        Commands::Play {
            depth,
            board,
            max_moves,
            seed,
        } => cli_play(depth, board.as_deref(), max_moves, seed),
        Commands::Moves { square, board } => cli_moves(&square, board.as_deref()),
        Commands::Perft { depth, board } => cli_perft(depth, board.as_deref()),
        Commands::Trials {
            depth,
            max_trials,
            challenger,
            seed,
        } => cli_trials(depth, max_trials, challenger.as_deref(), seed),
        Commands::Tune {
            depth,
            steps,
            pool_size,
            accept,
            reject,
            sigma,
            champion,
            seed,
        } => {
            let config = TuningConfig {
                accept_threshold: accept,
                reject_threshold: reject,
                pool_size,
                sigma,
            };
            cli_tune(depth, steps, config, champion.as_deref(), seed)
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn load_board(path: Option<&Path>) -> Result<Board> {
    let Some(path) = path else {
        return Ok(Board::initial());
    };
    let text = fs::read_to_string(path).with_context(|| format!("Couldn't read {:?}", path))?;
    Board::from_text(&text).with_context(|| format!("Couldn't parse board in {:?}", path))
}

fn load_params(path: &Path) -> Result<RaterParams> {
    let text = fs::read_to_string(path).with_context(|| format!("Couldn't read {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Couldn't parse parameters in {:?}", path))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn cli_play(depth: u8, board: Option<&Path>, max_moves: usize, seed: Option<u64>) -> Result<()> {
    let board = load_board(board)?;
    let strategy = RaterStrategy::new(RaterParams::CHAMPION, depth);
    let mut rng = make_rng(seed);

    println!("{}\n", board);
    let game = play_game_from(board, &strategy, &strategy, max_moves, &mut rng, |mve, board| {
        println!("{}\n\n{}\n", mve, board);
    });
    println!("{} after {} moves", game.outcome, game.moves.len());
    Ok(())
}

fn cli_moves(square: &str, board: Option<&Path>) -> Result<()> {
    let board = load_board(board)?;
    let square =
        Square::from_str(square).with_context(|| format!("Couldn't parse square `{}`", square))?;

    let destinations: Vec<String> = board
        .legal_destinations(square)
        .map(|dest| dest.to_string())
        .collect();
    println!("{}", destinations.join(" "));
    Ok(())
}

fn cli_perft(depth: usize, board: Option<&Path>) -> Result<()> {
    let board = load_board(board)?;
    let res = perft(&board, depth);
    println!("{}", res);
    Ok(())
}

fn cli_trials(
    depth: u8,
    max_trials: usize,
    challenger: Option<&Path>,
    seed: Option<u64>,
) -> Result<()> {
    let challenger = match challenger {
        Some(path) => load_params(path)?,
        None => RaterParams::MATERIAL_ONLY,
    };
    let config = TrialConfig {
        depth,
        max_moves: DEFAULT_MAX_MOVES,
        max_attempts: DEFAULT_MAX_ATTEMPTS,
    };
    let mut rng = make_rng(seed);
    info!(?challenger, max_trials, "starting trials");

    let mut print_err = Ok(());
    let last = head_to_head(
        || run_trial(RaterParams::CHAMPION, challenger, &config, &mut rng),
        max_trials,
        |update| {
            if print_err.is_ok() {
                print_err = print_json(update);
            }
        },
    )?;
    print_err?;
    info!(wins = last.wins, losses = last.losses, "trials finished");
    Ok(())
}

fn cli_tune(
    depth: u8,
    steps: usize,
    config: TuningConfig,
    champion: Option<&Path>,
    seed: Option<u64>,
) -> Result<()> {
    let champion = match champion {
        Some(path) => load_params(path)?,
        None => NAIVE_PARAMS,
    };
    let trial_config = TrialConfig {
        depth,
        ..Default::default()
    };
    let mut rng = make_rng(seed);
    let mut trial_rng = StdRng::from_rng(&mut rng).context("Couldn't seed trial rng")?;
    let mut search = HeadToHeadSearch::new(champion, config, &mut rng);

    let mut print_err = Ok(());
    search.run(
        steps,
        |champion, challenger| run_trial(champion, challenger, &trial_config, &mut trial_rng),
        &mut rng,
        |update| {
            if print_err.is_ok() {
                print_err = print_json(update);
            }
        },
    )?;
    print_err?;
    info!(champion = ?search.champion(), "tuning finished");
    Ok(())
}

fn enable_logging() -> Result<()> {
    let log_path = if let Ok(log_path_str) = env::var("MINIMAX_CHESS_LOG_PATH") {
        PathBuf::from_str(&log_path_str)?
    } else {
        get_default_log_path()?
    };
    if let Some(log_path_dir) = log_path.parent() {
        if !log_path_dir.as_os_str().is_empty() && !log_path_dir.exists() {
            fs::create_dir_all(log_path_dir)
                .with_context(|| format!("Couldn't create directory {:?}", log_path_dir))?;
        }
    }

    let log_file =
        File::create(&log_path).with_context(|| format!("Couldn't create file {:?}", log_path))?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        );

    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_filter(LevelFilter::from_level(Level::DEBUG));

    Registry::default()
        .with(stderr_layer)
        .with(log_layer)
        .init();

    Ok(())
}

fn get_default_log_path() -> Result<PathBuf> {
    let mut log_path = dirs::home_dir().context("Home directory not set")?;
    log_path.push(".local/state/minimax-chess");
    log_path.push(format!("{}.log", chrono::Local::now().format("%Y-%m-%dT%H-%M-%S")));
    Ok(log_path)
}
