//! Go Text Protocol (GTP) frontend.
//!
//! Lets graphical clients such as Sabaki or GoGui drive a [`Game`]. Only
//! stone placements exist in this rule set, so `pass` and `resign` are not
//! accepted as moves; `genmove` answers `pass` when the search has nothing to
//! offer.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - only 9 is accepted
//! - `clear_board`
//! - `play <color> <vertex>`
//! - `genmove <color>`
//! - `showboard`

use std::io::{self, BufRead, Write};

use log::debug;

use crate::board::{COLUMNS, Point, Stone};
use crate::constants::N;
use crate::game::{AiMove, Game};
use crate::mcts::SearchConfig;

const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// Parse a vertex such as `"D4"` into a board point.
///
/// Columns are letters A-J without I, rows count up from the bottom.
pub fn parse_vertex(s: &str) -> Option<Point> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let col_char = bytes[0].to_ascii_uppercase();
    let y = COLUMNS.iter().position(|&c| c == col_char)?;
    let row: usize = s[1..].parse().ok()?;
    if row == 0 || row > N {
        return None;
    }
    Some((N - row, y))
}

/// Format a board point as a vertex string.
pub fn vertex_str((x, y): Point) -> String {
    format!("{}{}", COLUMNS[y] as char, N - x)
}

fn parse_color(s: &str) -> Option<Stone> {
    match s.to_ascii_lowercase().as_str() {
        "b" | "black" => Some(Stone::Black),
        "w" | "white" => Some(Stone::White),
        _ => None,
    }
}

pub struct GtpEngine {
    game: Game,
}

impl Default for GtpEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl GtpEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            game: Game::new(config),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop on stdin/stdout until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the command loop over arbitrary streams.
    pub fn serve(&mut self, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();
            debug!("gtp <- {command_line}");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional numeric command ID off the front of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a GTP command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&arg.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<usize>() {
                    Ok(size) if size == N => (true, String::new()),
                    Ok(size) => (
                        false,
                        format!("unacceptable size, only {N} is supported (got {size})"),
                    ),
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => {
                self.game.reset();
                (true, String::new())
            }

            "showboard" => (true, format!("\n{}", self.game.board())),

            "play" => {
                let [color, vertex, ..] = args else {
                    return (false, "missing arguments".to_string());
                };
                let Some(color) = parse_color(color) else {
                    return (false, "invalid color".to_string());
                };
                let Some((x, y)) = parse_vertex(vertex) else {
                    return (false, "illegal move".to_string());
                };
                if color != self.game.board().current_player() {
                    return (false, format!("it is {}'s turn", self.game.board().current_player()));
                }
                match self.game.play(x, y, &mut ()) {
                    Ok(_) => (true, String::new()),
                    Err(err) => (false, format!("illegal move: {err}")),
                }
            }

            "genmove" => {
                let Some(color) = args.first().and_then(|c| parse_color(c)) else {
                    return (false, "invalid color".to_string());
                };
                if color != self.game.board().current_player() {
                    return (false, format!("it is {}'s turn", self.game.board().current_player()));
                }
                match self.game.ai_move(&mut ()) {
                    AiMove::Played(pt) => (true, vertex_str(pt)),
                    AiMove::Occupied(_) | AiMove::Rejected(_) | AiMove::NoMove => {
                        (true, "pass".to_string())
                    }
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
