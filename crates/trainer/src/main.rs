//! Terminal puzzle trainer
//!
//! Reads commands from stdin. Type `help` for the list.

use std::sync::Arc;

use chess_core::{Color, File, MoveRequest, Rank, Snapshot, Square};
use chess_puzzler::{Catalog, Difficulty, Progress};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{error, info};

use trainer::{Session, TrainerConfig, TrainerError, TrainerEvent, Verdict};

const HELP: &str = "\
Commands:
  puzzles [difficulty]  list puzzles, optionally for one difficulty
  puzzle <id>           start a puzzle
  analyze [fen]         play against the heuristic opponent
  <move>                e2e4, f3-g5, e7e8q
  reply                 ask the opponent to move (after a cancelled reply)
  retry                 restart the current puzzle or game
  progress              show your solve streak
  help                  show this text
  quit                  exit
Ctrl-C cancels a pending opponent reply.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let _ = dotenvy::dotenv();

    let config = TrainerConfig::from_env()?;
    let catalog = match &config.puzzles_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };
    info!(puzzles = catalog.len(), seed = ?config.seed, "Trainer ready");

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Ctrl-C only cancels the pending reply; `quit` exits
    let (cancel_tx, mut cancel_rx) = watch::channel(false);
    let cancel_tx = Arc::new(cancel_tx);
    {
        let cancel_tx = Arc::clone(&cancel_tx);
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                let _ = cancel_tx.send(true);
            }
        });
    }

    let mut session = Session::new(config.clone());
    let mut progress = Progress::new();
    let mut failed_current = false;

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            "progress" => println!(
                "Streak {} (best {}), {} puzzles solved",
                progress.current_streak,
                progress.longest_streak,
                progress.solved_puzzles.len()
            ),
            "puzzles" => {
                let listed = if arg.is_empty() {
                    catalog.iter().collect::<Vec<_>>()
                } else {
                    match arg.parse::<Difficulty>() {
                        Ok(d) => catalog.by_difficulty(d),
                        Err(e) => {
                            println!("{e}");
                            continue;
                        }
                    }
                };
                for p in listed {
                    println!("{:<26} {:<12} {:>4}  {}", p.id, p.difficulty, p.rating, p.title);
                }
            }
            "puzzle" => match catalog.get(arg) {
                Some(puzzle) => {
                    if let Err(e) = session.load_puzzle(puzzle) {
                        println!("{e}");
                        continue;
                    }
                    failed_current = false;
                    println!("{} ({}, {})", puzzle.title, puzzle.difficulty, puzzle.rating);
                    println!(
                        "{} to move. Find {} move(s).",
                        color_name(session.human_color()),
                        puzzle.solver_move_count()
                    );
                    if let Some(description) = &puzzle.description {
                        println!("{description}");
                    }
                    print_board(session.position());
                }
                None => println!("No puzzle with id '{arg}'."),
            },
            "analyze" => {
                let fen = if arg.is_empty() { config.start_fen.as_str() } else { arg };
                match session.load_free_position(fen) {
                    Ok(()) => {
                        print_board(session.position());
                        println!("You play {}.", color_name(session.human_color()));
                    }
                    Err(e) => println!("{e}"),
                }
            }
            "retry" => match session.restart() {
                Ok(()) => {
                    failed_current = false;
                    print_board(session.position());
                }
                Err(e) => println!("{e}"),
            },
            "reply" => {}
            _ => {
                let request = match line.parse::<MoveRequest>() {
                    Ok(r) => r,
                    Err(_) => {
                        println!("Unknown command or move: {line}. Type 'help'.");
                        continue;
                    }
                };
                let outcome = match session.attempt(&request) {
                    Ok(o) => o,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                print_events(&mut session);
                match outcome.verdict {
                    Verdict::Classified(_) => {}
                    _ => println!("{}", outcome.feedback),
                }
                if let Some(id) = session.puzzle().map(|p| p.id.clone()) {
                    match outcome.verdict {
                        Verdict::Solved if !failed_current => progress.record(&id, true),
                        Verdict::Wrong if !failed_current => {
                            failed_current = true;
                            progress.record(&id, false);
                        }
                        _ => {}
                    }
                }
                if outcome.accepted {
                    print_board(session.position());
                }
            }
        }

        if session.awaiting_reply() {
            cancel_tx.send_replace(false);
            let delay = session.reply_delay(&mut rng);
            println!("Opponent is thinking...");
            match session.respond_after(delay, &mut cancel_rx, &mut rng).await {
                Ok(Some(_)) => {
                    print_events(&mut session);
                    print_board(session.position());
                }
                Ok(None) => print_events(&mut session),
                Err(TrainerError::Cancelled) => {
                    println!("Reply cancelled. Type 'reply' to let the opponent move.")
                }
                Err(e) => error!(error = %e, "Opponent reply failed"),
            }
        }
    }

    Ok(())
}

fn print_events(session: &mut Session) {
    for event in session.observer_mut().drain() {
        match event {
            TrainerEvent::MoveClassified {
                side,
                san,
                score,
                tier,
                explanation,
                ..
            } => println!("{side:?} {san}: {tier} ({score}). {explanation}"),
            TrainerEvent::PuzzleSolved { .. } => {}
            TrainerEvent::GameOver { reason } => println!("Game over: {reason:?}"),
        }
    }
}

fn print_board(position: &Snapshot) {
    for rank in (0..8u32).rev() {
        let row: String = (0..8u32)
            .map(|file| {
                let sq = Square::from_coords(File::new(file), Rank::new(rank));
                position.piece_at(sq).map_or('.', |p| p.char())
            })
            .flat_map(|c| [c, ' '])
            .collect();
        println!("{} {}", rank + 1, row.trim_end());
    }
    println!("  a b c d e f g h");
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}
