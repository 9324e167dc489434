//! Play puzzles in the terminal.
//!
//! Usage: play-puzzle [FILE] [--id PUZZLE_ID]
//!
//! FILE is a JSON array of puzzle records; `$PUZZLE_FILE` is used when it is
//! omitted. Type moves as coordinates (`e2e4`, `e7e8q`) or one of
//! `hint`, `piece`, `solution`, `reset`, `next`, `status`, `quit`.
//! Engine events are printed to stdout as JSON lines, logs go to stderr.

use std::env;

use anyhow::{bail, Context};
use chess_puzzler::chess_core::{CoordMove, ShakmatyRules};
use chess_puzzler::{
    AttemptRecord, AttemptSink, EngineConfig, HintDescriptor, HintKind, Puzzle, PuzzleEngine,
    SessionObserver, TokioScheduler,
};
use serde_json::json;
use shakmaty::Color;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct Args {
    file: Option<String>,
    id: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut file = None;
    let mut id = None;
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--id" {
            id = args.get(i + 1).cloned();
            i += 2;
            continue;
        }
        if file.is_none() {
            file = Some(args[i].clone());
        }
        i += 1;
    }
    Args { file, id }
}

/// Prints every engine event as one JSON line.
struct JsonLinesObserver;

impl SessionObserver for JsonLinesObserver {
    fn on_position_changed(&mut self, fen: &str, last_move: Option<&CoordMove>) {
        println!(
            "{}",
            json!({ "type": "position_changed", "fen": fen, "last_move": last_move })
        );
    }

    fn on_hint_shown(&mut self, from: &str, to: Option<&str>) {
        println!("{}", json!({ "type": "hint_shown", "from": from, "to": to }));
    }

    fn on_hint_cleared(&mut self) {
        println!("{}", json!({ "type": "hint_cleared" }));
    }

    fn on_mistake(&mut self, count: u32) {
        println!("{}", json!({ "type": "mistake", "count": count }));
    }

    fn on_complete(&mut self, is_solved: bool) {
        println!("{}", json!({ "type": "complete", "is_solved": is_solved }));
    }
}

/// Stand-in for the attempt endpoint: prints the record.
struct JsonLinesSink;

impl AttemptSink for JsonLinesSink {
    fn record(&mut self, attempt: &AttemptRecord) {
        println!("{}", json!({ "type": "attempt", "attempt": attempt }));
    }
}

enum Flow {
    Continue,
    Quit,
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

fn print_intro(engine: &PuzzleEngine<ShakmatyRules>) {
    let puzzle = engine.puzzle();
    let session = engine.session();
    println!(
        "{}",
        json!({
            "type": "puzzle",
            "id": puzzle.id,
            "rating": puzzle.rating,
            "themes": puzzle.tags(),
            "mate_in": session.mate_in(),
            "player": color_name(session.mating_side()),
        })
    );
}

fn print_hint(hint: Option<HintDescriptor>) {
    if hint.is_none() {
        println!("{}", json!({ "type": "hint_unavailable" }));
    }
}

fn handle_command(
    engine: &mut PuzzleEngine<ShakmatyRules>,
    puzzles: &[Puzzle],
    index: &mut usize,
    input: &str,
) -> Flow {
    match input {
        "" => {}
        "quit" | "exit" => return Flow::Quit,
        "hint" => print_hint(engine.hint(HintKind::Move)),
        "piece" => print_hint(engine.hint(HintKind::Piece)),
        "solution" => engine.play_solution(),
        "status" => println!("{}", json!({ "type": "status", "progress": engine.progress() })),
        "reset" => {
            if let Err(e) = engine.reset() {
                warn!("Reset failed: {e}");
            }
        }
        "next" => {
            *index = (*index + 1) % puzzles.len();
            match engine.load(puzzles[*index].clone()) {
                Ok(()) => print_intro(engine),
                Err(e) => warn!("Skipping puzzle: {e}"),
            }
        }
        token => match engine.submit_uci(token) {
            Ok(verdict) => println!("{}", json!({ "type": "move", "result": verdict })),
            Err(e) => warn!("Move not processed: {e}"),
        },
    }
    Flow::Continue
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    let path = args
        .file
        .or_else(|| env::var("PUZZLE_FILE").ok())
        .context("No puzzle file given (pass a path or set PUZZLE_FILE)")?;

    let data = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {path}"))?;
    let puzzles: Vec<Puzzle> =
        serde_json::from_str(&data).with_context(|| format!("Invalid puzzle JSON in {path}"))?;
    if puzzles.is_empty() {
        bail!("{path} contains no puzzles");
    }

    let mut index = match &args.id {
        Some(id) => puzzles
            .iter()
            .position(|p| &p.id == id)
            .with_context(|| format!("Puzzle {id} not found in {path}"))?,
        None => 0,
    };

    let config = EngineConfig::from_env();
    info!(path = %path, count = puzzles.len(), ?config, "Puzzles loaded");

    let (scheduler, mut steps) = TokioScheduler::new();
    let mut engine = PuzzleEngine::new(
        ShakmatyRules,
        config,
        puzzles[index].clone(),
        Box::new(scheduler),
    )?
    .with_telemetry(Box::new(JsonLinesSink))
    .with_observer(Box::new(JsonLinesObserver));
    print_intro(&engine);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(step) = steps.recv() => {
                if let Err(e) = engine.on_step(step) {
                    warn!("Scheduled move failed: {e}");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Flow::Quit = handle_command(&mut engine, &puzzles, &mut index, line.trim()) {
                    break;
                }
            }
        }
    }

    Ok(())
}
