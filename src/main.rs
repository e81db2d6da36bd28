//! Ur-Arena: Royal Game of Ur bots.
//!
//! ## Usage
//!
//! - `ur-arena` - Show a demo
//! - `ur-arena -v play --p0 expectimax2 --p1 random` - Play one game, logging every move
//! - `ur-arena duel --p0 balanced --p1 expectimax1 --games 500` - Head to head
//! - `ur-arena duel --p0 expectimax --depth 3 --p1 expectimax2` - Deeper search

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use ur_arena::board::{Player, Rules};
use ur_arena::constants::{DEFAULT_DEPTH, DEFAULT_GAMES};
use ur_arena::dice::Dice;
use ur_arena::expectimax::{Expectimax, SearchConfig, TurnModel, best_branch};
use ur_arena::game::GameState;
use ur_arena::playout::{play_from, play_game};
use ur_arena::policy::PolicyKind;

/// Ur-Arena: Royal Game of Ur engine and bots
#[derive(Parser)]
#[command(name = "ur-arena")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the opening position for every roll
    Demo(GameArgs),
    /// Play a single game and log every move
    Play {
        #[command(flatten)]
        matchup: Matchup,
        #[command(flatten)]
        game: GameArgs,
    },
    /// Play many games between two policies in parallel
    Duel {
        #[command(flatten)]
        matchup: Matchup,
        #[command(flatten)]
        game: GameArgs,
        /// Number of games; seats alternate between games
        #[arg(long, default_value_t = DEFAULT_GAMES)]
        games: usize,
    },
}

#[derive(Args)]
struct Matchup {
    /// Policy for the first seat
    #[arg(long, value_enum, default_value_t = Bot::Expectimax2)]
    p0: Bot,
    /// Policy for the second seat
    #[arg(long, value_enum, default_value_t = Bot::Random)]
    p1: Bot,
}

#[derive(Args)]
struct GameArgs {
    /// Seed for dice and bots
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Rule variant
    #[arg(long, value_enum, default_value_t = RuleSet::Standard)]
    rules: RuleSet,
    /// How the search assigns plies after a rosette
    #[arg(long, value_enum, default_value_t = Turns::FollowTurn)]
    turn_model: Turns,
    /// Search depth for the demo and the `expectimax` bot (expectimax1/2 fix their own)
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,
}

impl GameArgs {
    fn rules(&self) -> &'static Rules {
        match self.rules {
            RuleSet::Standard => &Rules::STANDARD,
            RuleSet::OpenCenter => &Rules::OPEN_CENTER,
        }
    }

    fn search(&self) -> Result<SearchConfig> {
        let turn_model = match self.turn_model {
            Turns::FollowTurn => TurnModel::FollowTurn,
            Turns::Alternating => TurnModel::Alternating,
        };
        let cfg = SearchConfig::depth(self.depth).with_turn_model(turn_model);
        cfg.validate().context("invalid search configuration")?;
        Ok(cfg)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum RuleSet {
    Standard,
    OpenCenter,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Turns {
    FollowTurn,
    Alternating,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Bot {
    Random,
    Greedy,
    Progress,
    Capture,
    Rosette,
    SafeCapture,
    GreedyFinish,
    Balanced,
    Expectimax1,
    Expectimax2,
    Expectimax,
}

impl From<Bot> for PolicyKind {
    fn from(bot: Bot) -> Self {
        match bot {
            Bot::Random => PolicyKind::Random,
            Bot::Greedy => PolicyKind::Greedy,
            Bot::Progress => PolicyKind::Progress,
            Bot::Capture => PolicyKind::Capture,
            Bot::Rosette => PolicyKind::Rosette,
            Bot::SafeCapture => PolicyKind::SafeCapture,
            Bot::GreedyFinish => PolicyKind::GreedyFinish,
            Bot::Balanced => PolicyKind::Balanced,
            Bot::Expectimax1 => PolicyKind::Expectimax1,
            Bot::Expectimax2 => PolicyKind::Expectimax2,
            Bot::Expectimax => PolicyKind::Expectimax,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Some(Commands::Play { matchup, game }) => run_play(&matchup, &game),
        Some(Commands::Duel {
            matchup,
            game,
            games,
        }) => run_duel(&matchup, &game, games),
        Some(Commands::Demo(game)) => run_demo(&game),
        None => run_demo(&GameArgs {
            seed: 1,
            rules: RuleSet::Standard,
            turn_model: Turns::FollowTurn,
            depth: DEFAULT_DEPTH,
        }),
    }
}

fn run_demo(args: &GameArgs) -> Result<()> {
    println!("Ur-Arena: Royal Game of Ur expectimax\n");
    let cfg = args.search()?;
    let state = GameState::with_rules(args.rules());
    println!("{state}");

    let mut search = Expectimax::new(cfg);
    for roll in 0..=4u8 {
        let evals = search.branch_evals(&state, roll);
        let choice = best_branch(&evals).map(|e| e.piece);
        let values: Vec<String> = evals
            .iter()
            .map(|e| format!("{}:{:.2}", e.piece, e.value))
            .collect();
        println!(
            "roll {roll}: choice {:?} nodes {} [{}]",
            choice,
            search.last_stats().nodes,
            values.join(" ")
        );
    }
    Ok(())
}

fn run_play(matchup: &Matchup, args: &GameArgs) -> Result<()> {
    let cfg = args.search()?;
    let mut p0 = PolicyKind::from(matchup.p0).build(args.seed, cfg);
    let mut p1 = PolicyKind::from(matchup.p1).build(args.seed.wrapping_add(1), cfg);
    let mut rng = fastrand::Rng::with_seed(args.seed);
    let mut state = GameState::with_rules(args.rules());

    let record = play_from(&mut state, [p0.as_mut(), p1.as_mut()], &Dice::STANDARD, &mut rng);

    println!("{state}");
    let names = [p0.name(), p1.name()];
    match record.winner {
        Some(w) => println!(
            "{} ({w}) wins after {} turns: {} moves, {} passes, captures {:?}",
            names[w.index()],
            record.turns,
            record.moves,
            record.passes,
            record.captures
        ),
        None => println!("no winner after {} turns", record.turns),
    }
    Ok(())
}

fn run_duel(matchup: &Matchup, args: &GameArgs, games: usize) -> Result<()> {
    let cfg = args.search()?;
    let rules = args.rules();
    let dice = Dice::STANDARD;
    let (a, b) = (PolicyKind::from(matchup.p0), PolicyKind::from(matchup.p1));

    // Each game gets its own seeds and fresh bots; seats swap on odd games
    let winners: Vec<Option<bool>> = (0..games)
        .into_par_iter()
        .map(|g| {
            let seed = args.seed.wrapping_mul(1_000_003).wrapping_add(g as u64);
            let mut bot_a = a.build(seed, cfg);
            let mut bot_b = b.build(seed ^ 0x9e37_79b9, cfg);
            let mut rng = fastrand::Rng::with_seed(seed);
            let a_seat = if g % 2 == 0 { Player::First } else { Player::Second };
            let record = if a_seat == Player::First {
                play_game([bot_a.as_mut(), bot_b.as_mut()], rules, &dice, &mut rng)
            } else {
                play_game([bot_b.as_mut(), bot_a.as_mut()], rules, &dice, &mut rng)
            };
            record.winner.map(|w| w == a_seat)
        })
        .collect();

    let a_wins = winners.iter().filter(|w| **w == Some(true)).count();
    let b_wins = winners.iter().filter(|w| **w == Some(false)).count();
    let unfinished = games - a_wins - b_wins;
    info!(games, a_wins, b_wins, unfinished, "duel finished");
    println!(
        "{:?} {a_wins} - {b_wins} {:?} ({} games, {unfinished} unfinished)",
        a, b, games
    );
    Ok(())
}
