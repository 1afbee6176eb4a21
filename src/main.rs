use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use piesearch::{CozyPosition, Engine, OutputMode, Position, Restrictions};

#[derive(Parser, Debug)]
#[command(name = "piesearch", version, about = "Search a position and print the best move")]
struct Args {
    /// FEN string or 'startpos'
    #[arg(long, default_value = "startpos")]
    fen: String,

    /// Moves to play from the FEN before searching, e.g. e2e4 e7e5
    #[arg(long, num_args = 0..)]
    moves: Vec<String>,

    /// Fixed search depth
    #[arg(long)]
    depth: Option<i32>,

    /// Fixed time per move in milliseconds
    #[arg(long)]
    movetime: Option<u64>,

    /// White clock in milliseconds (enables time controls)
    #[arg(long)]
    wtime: Option<u64>,

    /// Black clock in milliseconds (enables time controls)
    #[arg(long)]
    btime: Option<u64>,

    #[arg(long, default_value_t = 0)]
    winc: u64,

    #[arg(long, default_value_t = 0)]
    binc: u64,

    /// Node budget
    #[arg(long)]
    nodes: Option<u64>,

    /// Search threads, the main thread included
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Transposition table size in MB
    #[arg(long, default_value_t = 64)]
    hash_mb: usize,

    /// Principal variation output: none, standard or protocol
    #[arg(long, default_value = "standard")]
    output: String,

    /// JSON restrictions file; command line limits override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print search statistics as JSON
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn parse_output(s: &str) -> Result<OutputMode> {
    match s.to_lowercase().as_str() {
        "none" => Ok(OutputMode::None),
        "standard" => Ok(OutputMode::Standard),
        "protocol" | "uci" => Ok(OutputMode::Protocol),
        _ => anyhow::bail!("invalid output mode '{s}': use none, standard or protocol"),
    }
}

fn restrictions(args: &Args) -> Result<Restrictions> {
    let mut r = match &args.config {
        Some(path) => Restrictions::from_json_file(path)
            .with_context(|| format!("reading restrictions from {}", path.display()))?,
        None => Restrictions::default(),
    };
    if args.config.is_none() || args.output != "standard" { r.output = parse_output(&args.output)?; }
    if let Some(d) = args.depth { r.depth_limit = d; }
    if let Some(t) = args.movetime { r.fixed_move_time = Some(t); }
    if let Some(n) = args.nodes { r.node_limit = n; }
    if args.wtime.is_some() || args.btime.is_some() {
        r.use_time_controls = true;
        r.time_control = [args.wtime.unwrap_or(0), args.btime.unwrap_or(0)];
        r.time_increment = [args.winc, args.binc];
    }
    Ok(r)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let position = CozyPosition::from_fen_and_moves(Some(args.fen.as_str()), &args.moves)
        .context("setting up the position")?;
    let restrictions = restrictions(&args)?;

    let mut engine = Engine::new();
    engine.set_threads(args.threads).context("starting search threads")?;
    engine.set_tt_capacity_mb(args.hash_mb);
    info!("searching {} with {} thread(s)", position.fen(), engine.threads());

    let result = engine.search(&position, &restrictions);
    match result.best_move {
        Some(mv) => println!("bestmove {mv}"),
        None => println!("bestmove (none) value {}", result.value),
    }
    info!("depth {} value {} nodes {} in {:.3}s, pv {}", result.depth, result.value, result.nodes,
          result.elapsed.as_secs_f64(), position.format_algebraic(&result.pv));

    if args.stats {
        println!("{}", serde_json::to_string_pretty(&engine.statistics())?);
    }
    Ok(())
}
