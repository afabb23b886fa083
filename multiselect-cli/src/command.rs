//! Line commands read from stdin.

/// One demo command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the input text.
    Type(String),
    /// Pick the n-th suggestion (1-based).
    Pick(usize),
    /// Create an option with the given label.
    New(String),
    /// Press Enter in the input.
    Enter,
    /// Click the add button.
    Add,
    /// Remove the n-th chip (1-based).
    Remove(usize),
    /// Press Backspace in the input.
    Backspace,
    /// Press Escape in the input.
    Escape,
    Clear,
    Focus,
    Blur,
    /// Print the view even if nothing changed.
    Show,
    Help,
    Quit,
}

/// A line that is not a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{0}` expects a number")]
    ExpectedIndex(&'static str),
}

pub const HELP: &str = "\
commands:
  type <text>    set the input text (empty clears it)
  pick <n>       pick the n-th suggestion
  new <label>    create and select a new option
  enter          press Enter
  add            click the add button
  remove <n>     remove the n-th selected option
  backspace      press Backspace
  escape         press Escape
  clear          clear the selection
  focus | blur   move focus
  show           print the widget
  quit";

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Result<Self, ParseError>> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }
        let (name, rest) = match line.trim_start().split_once(' ') {
            Some((name, rest)) => (name, rest),
            None => (line.trim(), ""),
        };

        let index = |name: &'static str| {
            rest.trim()
                .parse::<usize>()
                .map_err(|_| ParseError::ExpectedIndex(name))
        };

        Some(match name {
            "type" | "t" => Ok(Self::Type(rest.to_string())),
            "pick" | "p" => index("pick").map(Self::Pick),
            "new" | "n" => Ok(Self::New(rest.to_string())),
            "enter" => Ok(Self::Enter),
            "add" => Ok(Self::Add),
            "remove" | "rm" => index("remove").map(Self::Remove),
            "backspace" => Ok(Self::Backspace),
            "escape" | "esc" => Ok(Self::Escape),
            "clear" => Ok(Self::Clear),
            "focus" => Ok(Self::Focus),
            "blur" => Ok(Self::Blur),
            "show" | "s" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_keeps_spaces() {
        assert_eq!(
            Command::parse("type  ada lo"),
            Some(Ok(Command::Type(" ada lo".to_string())))
        );
        assert_eq!(Command::parse("type"), Some(Ok(Command::Type(String::new()))));
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(Command::parse("pick 2"), Some(Ok(Command::Pick(2))));
        assert_eq!(
            Command::parse("rm x"),
            Some(Err(ParseError::ExpectedIndex("remove")))
        );
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(Command::parse("   \n"), None);
        assert_eq!(
            Command::parse("dance"),
            Some(Err(ParseError::Unknown("dance".to_string())))
        );
        assert_eq!(Command::parse("q"), Some(Ok(Command::Quit)));
    }
}
