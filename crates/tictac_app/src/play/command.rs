//! Parsing of front end commands.

use derive_more::{Display, Error};
use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoEnumIterator};
use tictac_session::GameId;

/// First word of a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Keyword {
    /// Claim a cell.
    Claim,
    /// Move the cursor.
    Rewind,
    /// Clear the moves.
    Reset,
    /// Start an unsaved game.
    New,
    /// Save under a title.
    Save,
    /// Load a saved game.
    Load,
    /// Refresh the games list.
    List,
    /// Delete a saved game.
    Delete,
    /// Redraw.
    Show,
    /// Print the command list.
    Help,
    /// Leave.
    Quit,
}

impl Keyword {
    /// Argument synopsis and one-line description.
    pub fn usage(self) -> &'static str {
        match self {
            Self::Claim => "claim <row> <col>   claim a cell for the player to move (0-2)",
            Self::Rewind => "rewind <turn>       show the board after <turn> moves",
            Self::Reset => "reset               clear all moves, keep the saved identity",
            Self::New => "new                 start a fresh unsaved game",
            Self::Save => "save <title>        save the game (creates or overwrites)",
            Self::Load => "load <id>           load a saved game",
            Self::List => "list                refresh the saved games list",
            Self::Delete => "delete <id>         delete a saved game",
            Self::Show => "show                redraw the board",
            Self::Help => "help                show this list",
            Self::Quit => "quit                leave",
        }
    }
}

/// Help text listing every command.
pub fn help_text() -> String {
    Keyword::iter()
        .map(|k| format!("  {}", k.usage()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    /// `claim <row> <col>`
    Claim {
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        col: usize,
    },
    /// `rewind <turn>`
    Rewind(usize),
    /// `reset`
    Reset,
    /// `new`
    New,
    /// `save <title>`; the title is the rest of the line.
    Save(String),
    /// `load <id>`
    Load(GameId),
    /// `list`
    List,
    /// `delete <id>`
    Delete(GameId),
    /// `show`
    Show,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Why a command line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{message}")]
pub struct ParseError {
    /// What was wrong, with a usage hint.
    pub message: String,
}

impl ParseError {
    fn usage(keyword: Keyword) -> Self {
        Self {
            message: format!("usage: {}", keyword.usage()),
        }
    }
}

fn number<T: FromStr>(word: Option<&str>, keyword: Keyword) -> Result<T, ParseError> {
    word.and_then(|w| w.parse().ok())
        .ok_or_else(|| ParseError::usage(keyword))
}

fn no_more<'a>(mut words: impl Iterator<Item = &'a str>, keyword: Keyword) -> Result<(), ParseError> {
    match words.next() {
        Some(_) => Err(ParseError::usage(keyword)),
        None => Ok(()),
    }
}

impl FromStr for PlayCommand {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let first = words.next().ok_or_else(|| ParseError {
            message: "empty command".to_string(),
        })?;
        let keyword = Keyword::from_str(first).map_err(|_| ParseError {
            message: format!("unknown command '{}', try 'help'", first),
        })?;

        let command = match keyword {
            Keyword::Claim => {
                let row = number(words.next(), keyword)?;
                let col = number(words.next(), keyword)?;
                Self::Claim { row, col }
            }
            Keyword::Rewind => Self::Rewind(number(words.next(), keyword)?),
            Keyword::Load => Self::Load(number(words.next(), keyword)?),
            Keyword::Delete => Self::Delete(number(words.next(), keyword)?),
            Keyword::Save => {
                let title = line[first.len()..].trim();
                if title.is_empty() {
                    return Err(ParseError::usage(keyword));
                }
                return Ok(Self::Save(title.to_string()));
            }
            Keyword::Reset => Self::Reset,
            Keyword::New => Self::New,
            Keyword::List => Self::List,
            Keyword::Show => Self::Show,
            Keyword::Help => Self::Help,
            Keyword::Quit => Self::Quit,
        };
        no_more(words, keyword)?;
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_claim() {
        assert_eq!(
            "claim 1 2".parse::<PlayCommand>(),
            Ok(PlayCommand::Claim { row: 1, col: 2 })
        );
        assert_eq!(
            "  CLAIM 0 0 ".parse::<PlayCommand>(),
            Ok(PlayCommand::Claim { row: 0, col: 0 })
        );
    }

    #[test]
    fn test_claim_needs_two_numbers() {
        assert!("claim 1".parse::<PlayCommand>().is_err());
        assert!("claim a b".parse::<PlayCommand>().is_err());
        assert!("claim 1 2 3".parse::<PlayCommand>().is_err());
    }

    #[test]
    fn test_save_keeps_spaces_in_title() {
        assert_eq!(
            "save  my best game ".parse::<PlayCommand>(),
            Ok(PlayCommand::Save("my best game".to_string()))
        );
        assert!("save".parse::<PlayCommand>().is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = "jump 3".parse::<PlayCommand>().unwrap_err();
        assert!(err.message.contains("unknown command 'jump'"));
    }

    #[test]
    fn test_help_lists_every_keyword() {
        let help = help_text();
        for keyword in Keyword::iter() {
            assert!(help.contains(&keyword.to_string()));
        }
    }
}
