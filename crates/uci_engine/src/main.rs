//! UCI front end for the PinChess engine.
//!
//! Commands are read on a dedicated thread so `stop` and `isready` are
//! answered while a search runs on a worker thread.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chess_core::{DiagramOptions, Engine, Position, SearchLimits, TimeControl, position_from_uci};
use pinchess_engine::{EngineConfig, PinAgent, config::MAX_DEPTH, mate_distance};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = match config_path(std::env::args().skip(1)) {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                warn!("{e}; using defaults");
                EngineConfig::default()
            }
        },
        None => EngineConfig::default(),
    };

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut session = UciSession::new(config);
    for line in rx {
        if !session.handle(&line) {
            break;
        }
    }
    session.stop_search();
}

/// Value following `--config`, if present.
fn config_path(mut args: impl Iterator<Item = String>) -> Option<PathBuf> {
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

fn send(line: &str) {
    let mut out = io::stdout().lock();
    writeln!(out, "{line}").ok();
    out.flush().ok();
}

struct RunningSearch {
    handle: JoinHandle<()>,
    time_control: TimeControl,
}

struct UciSession {
    pos: Position,
    agent: Arc<Mutex<PinAgent>>,
    search: Option<RunningSearch>,
}

impl UciSession {
    fn new(config: EngineConfig) -> Self {
        Self {
            pos: Position::startpos(),
            agent: Arc::new(Mutex::new(PinAgent::new(config))),
            search: None,
        }
    }

    fn agent(&self) -> std::sync::MutexGuard<'_, PinAgent> {
        self.agent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The agent stays locked for as long as a search runs.
    fn searching(&self) -> bool {
        self.search
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Returns false on `quit`.
    fn handle(&mut self, line: &str) -> bool {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = parts.split_first() else {
            return true;
        };

        match cmd {
            "uci" => {
                self.stop_search();
                let agent = self.agent();
                send(&format!("id name {}", agent.name()));
                send(&format!("id author {}", agent.author()));
                send(&format!(
                    "option name Depth type spin default {} min 1 max {MAX_DEPTH}",
                    agent.config().depth
                ));
                send("option name MoveTime type spin default 0 min 0 max 600000");
                send("uciok");
            }
            "isready" => send("readyok"),
            "setoption" => {
                self.stop_search();
                if let Some((name, value)) = parse_setoption(args)
                    && !self.agent().set_option(&name, &value)
                {
                    warn!(name, value, "unsupported option");
                }
            }
            "ucinewgame" => {
                self.stop_search();
                self.agent().new_game();
                self.pos = Position::startpos();
            }
            "position" => {
                self.stop_search();
                match position_from_uci(args) {
                    Ok(pos) => self.pos = pos,
                    Err(e) => warn!("ignoring position command: {e}"),
                }
            }
            "go" => self.go(args),
            "stop" => self.stop_search(),
            "d" => {
                let text = self.pos.diagram(DiagramOptions::default());
                for row in text.lines() {
                    send(row);
                }
            }
            "eval" if self.searching() => warn!("eval ignored while searching"),
            "eval" => {
                let score = self.agent().evaluate(&self.pos);
                send(&format!("info string eval {score} (white)"));
            }
            "quit" => return false,
            _ => warn!(command = cmd, "unknown command"),
        }
        true
    }

    fn go(&mut self, args: &[&str]) {
        self.stop_search();
        let config = self.agent().config().clone();
        let mut limits = go_limits(args, &config, &self.pos);
        limits.start();

        let time_control = limits.time_control.clone();
        let agent = Arc::clone(&self.agent);
        let pos = self.pos.clone();
        let handle = thread::spawn(move || {
            let result = agent
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .search(&pos, limits);
            send(&format!(
                "info depth {} score {} nodes {}",
                result.depth,
                uci_score(result.score),
                result.nodes
            ));
            match result.best_move {
                Some(mv) => send(&format!("bestmove {mv}")),
                None => send("bestmove 0000"),
            }
        });
        self.search = Some(RunningSearch {
            handle,
            time_control,
        });
    }

    /// Stops the running search and waits for its `bestmove`.
    fn stop_search(&mut self) {
        if let Some(running) = self.search.take() {
            running.time_control.stop();
            if running.handle.join().is_err() {
                warn!("search thread panicked");
            }
        }
    }
}

/// `mate N` in moves for mate scores, centipawns otherwise.
fn uci_score(score: i32) -> String {
    match mate_distance(score) {
        Some(plies) if plies > 0 => format!("mate {}", (plies + 1) / 2),
        Some(plies) => format!("mate {}", plies / 2),
        None => format!("cp {score}"),
    }
}

/// `setoption name <name...> value <value...>`
fn parse_setoption(args: &[&str]) -> Option<(String, String)> {
    let name_at = args.iter().position(|&a| a == "name")?;
    let value_at = args.iter().position(|&a| a == "value");
    let name_end = value_at.unwrap_or(args.len());
    let name = args.get(name_at + 1..name_end)?.join(" ");
    let value = value_at
        .and_then(|i| args.get(i + 1..))
        .map(|rest| rest.join(" "))
        .unwrap_or_default();
    Some((name, value))
}

/// Builds search limits from `go` arguments, falling back to the config.
fn go_limits(args: &[&str], config: &EngineConfig, pos: &Position) -> SearchLimits {
    let value = |key: &str| -> Option<u64> {
        let i = args.iter().position(|&a| a == key)?;
        args.get(i + 1)?.parse().ok()
    };
    let depth = value("depth")
        .map(|d| d.clamp(1, u64::from(MAX_DEPTH)) as u8)
        .unwrap_or(config.depth);

    if let Some(ms) = value("movetime") {
        return SearchLimits::depth_and_time(depth, Duration::from_millis(ms));
    }
    if let (Some(wtime), Some(btime)) = (value("wtime"), value("btime")) {
        let ms = Duration::from_millis;
        return SearchLimits::for_side(
            depth,
            pos.side_to_move(),
            ms(wtime),
            ms(btime),
            ms(value("winc").unwrap_or(0)),
            ms(value("binc").unwrap_or(0)),
        );
    }
    match config.move_time() {
        Some(budget) if !args.contains(&"infinite") => SearchLimits::depth_and_time(depth, budget),
        _ => SearchLimits::depth(depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_forms() {
        let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter();
        assert_eq!(config_path(args(&["--config", "a.toml"])), Some(PathBuf::from("a.toml")));
        assert_eq!(config_path(args(&["--config=b.toml"])), Some(PathBuf::from("b.toml")));
        assert_eq!(config_path(args(&["--verbose"])), None);
        assert_eq!(config_path(args(&["--config"])), None);
    }

    #[test]
    fn test_uci_score() {
        use pinchess_engine::search::mate_in;
        assert_eq!(uci_score(35), "cp 35");
        assert_eq!(uci_score(mate_in(1) + 40), "mate 1");
        assert_eq!(uci_score(mate_in(5) - 120), "mate 3");
        assert_eq!(uci_score(-mate_in(4)), "mate -2");
    }

    #[test]
    fn test_parse_setoption() {
        assert_eq!(
            parse_setoption(&["name", "Depth", "value", "4"]),
            Some(("Depth".to_string(), "4".to_string()))
        );
        assert_eq!(
            parse_setoption(&["name", "Move", "Time", "value", "100"]),
            Some(("Move Time".to_string(), "100".to_string()))
        );
        assert_eq!(parse_setoption(&["value", "4"]), None);
    }

    #[test]
    fn test_go_limits() {
        let config = EngineConfig::default();
        let pos = Position::startpos();

        let depth_only = go_limits(&["depth", "5"], &config, &pos);
        assert_eq!(depth_only.depth, 5);
        assert_eq!(depth_only.move_time, None);

        let fixed = go_limits(&["movetime", "200"], &config, &pos);
        assert_eq!(fixed.depth, config.depth);
        assert_eq!(fixed.move_time, Some(Duration::from_millis(200)));

        let clock = go_limits(&["wtime", "60000", "btime", "3000"], &config, &pos);
        assert_eq!(clock.move_time, Some(Duration::from_millis(2000)));

        let configured = EngineConfig {
            move_time_ms: Some(750),
            ..Default::default()
        };
        assert_eq!(
            go_limits(&[], &configured, &pos).move_time,
            Some(Duration::from_millis(750))
        );
        assert_eq!(go_limits(&["infinite"], &configured, &pos).move_time, None);
    }

    #[test]
    fn test_session_position_and_quit() {
        let mut session = UciSession::new(EngineConfig::default());
        assert!(session.handle("position startpos moves e2e4 e7e5"));
        assert_eq!(
            session.pos.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );
        // A bad move leaves the previous position in place
        assert!(session.handle("position startpos moves e2e5"));
        assert_eq!(session.pos.fullmove_number(), 2);
        assert!(session.handle("setoption name Depth value 2"));
        assert_eq!(session.agent().config().depth, 2);
        assert!(!session.handle("quit"));
    }
}
