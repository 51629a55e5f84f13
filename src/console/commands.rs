//! Console command grammar.
//!
//! Each input line is split into words (quotes group words) and parsed
//! with clap, so `help` and per-command `--help` come for free.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "banker",
    no_binary_name = true,
    disable_version_flag = true,
    override_usage = "<COMMAND> [ARGS]"
)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start a new game with the given player names
    Setup {
        /// Starting balance for every player
        #[arg(short, long, allow_hyphen_values = true)]
        balance: Option<String>,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// List players and balances
    #[command(alias = "ls")]
    Players,
    /// Select the active player
    Active { player: String },
    /// Receive money from the bank (defaults to the active player)
    Receive {
        #[arg(allow_hyphen_values = true)]
        amount: String,
        player: Option<String>,
    },
    /// Pay money to the bank (defaults to the active player)
    Pay {
        #[arg(allow_hyphen_values = true)]
        amount: String,
        player: Option<String>,
    },
    /// Move money between two players (either may be the bank)
    Transfer {
        from: String,
        to: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Show the most recent transactions
    History { count: Option<usize> },
    /// Rank players by balance
    #[command(alias = "board")]
    Leaderboard,
    /// Rename a player
    Rename { player: String, name: String },
    /// Change a player's color
    Color { player: String, color: String },
    /// Change a player's avatar
    Avatar { player: String, avatar: String },
    /// Seat another player
    Add { name: Option<String> },
    /// Remove a player and their balance
    Remove { player: String },
    /// Forget all transactions of this game
    ClearHistory,
    /// Roll two dice
    Roll,
    /// Discard the game and start over
    Reset,
    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

/// Split a line into words. Single or double quotes group words; an
/// unterminated quote is an error.
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("Unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Parse one console line. Help output and usage errors come back as the
/// `Err` text.
pub fn parse_line(line: &str) -> Result<Command, String> {
    let words = split_words(line)?;
    CommandLine::try_parse_from(words)
        .map(|cli| cli.command)
        .map_err(|e| e.to_string().trim_end().to_string())
}
