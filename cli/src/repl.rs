//! Interactive prompt commands
//!
//! The prompt reads one line per query; lines starting with `:` are
//! commands. Parsing is separated from the IO loop so it can be tested
//! directly.

/// Budget steps suggested at the prompt (EUR)
pub const BUDGET_STEPS: [f64; 9] = [1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0];

/// A parsed prompt line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run a search with the given query text
    Query(String),
    /// Change the budget ceiling
    Budget(f64),
    /// List the preset categories
    Presets,
    /// Leave the prompt
    Quit,
    /// Blank line; prompt again
    Empty,
    /// Unrecognized or malformed `:` command
    Unknown(String),
}

/// Parse one prompt line
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }

    let Some(rest) = line.strip_prefix(':') else {
        return Command::Query(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    match parts.next() {
        Some("quit") | Some("q") | Some("exit") => Command::Quit,
        Some("presets") => Command::Presets,
        Some("budget") => match parts.next().and_then(|v| v.parse::<f64>().ok()) {
            Some(value) if value > 0.0 => Command::Budget(value),
            _ => Command::Unknown(rest.to_string()),
        },
        _ => Command::Unknown(rest.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_query() {
        assert_eq!(
            parse_command("wireless headphones for a teenager\n"),
            Command::Query("wireless headphones for a teenager".to_string())
        );
    }

    #[test]
    fn test_blank_lines_are_empty() {
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command("   \n"), Command::Empty);
    }

    #[test]
    fn test_quit_aliases() {
        assert_eq!(parse_command(":quit"), Command::Quit);
        assert_eq!(parse_command(":q\n"), Command::Quit);
        assert_eq!(parse_command(":exit"), Command::Quit);
    }

    #[test]
    fn test_budget_command() {
        assert_eq!(parse_command(":budget 20"), Command::Budget(20.0));
        assert_eq!(parse_command(":budget 12.5"), Command::Budget(12.5));
    }

    #[test]
    fn test_malformed_budget_is_unknown() {
        assert_eq!(
            parse_command(":budget"),
            Command::Unknown("budget".to_string())
        );
        assert_eq!(
            parse_command(":budget lots"),
            Command::Unknown("budget lots".to_string())
        );
        assert_eq!(
            parse_command(":budget -5"),
            Command::Unknown("budget -5".to_string())
        );
    }

    #[test]
    fn test_unknown_command_keeps_its_text() {
        assert_eq!(
            parse_command(":frobnicate now"),
            Command::Unknown("frobnicate now".to_string())
        );
    }

    #[test]
    fn test_presets_command() {
        assert_eq!(parse_command(":presets"), Command::Presets);
    }

    #[test]
    fn test_budget_steps_are_sorted() {
        for pair in BUDGET_STEPS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
