//! Line tokenizer for terminal commands.
//!
//! Tokens are separated by single ASCII spaces. There is no quoting, escaping
//! or comment syntax inside a line.

use super::CommandArg;

/// Split a command line into tokens.
///
/// Consecutive spaces produce empty tokens, which are dropped. Tabs and other
/// whitespace are part of a token.
///
/// # Examples
///
/// ```
/// use bevy_command_terminal::core::tokenize;
///
/// assert_eq!(tokenize("Print hello world"), vec!["Print", "hello", "world"]);
/// assert_eq!(tokenize("Set  TimeScale   2"), vec!["Set", "TimeScale", "2"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(' ').filter(|token| !token.is_empty()).collect()
}

/// Join arguments starting at `start` with single spaces.
///
/// Returns an empty string when `start` is past the end.
pub fn join_args(args: &[CommandArg<'_>], start: usize) -> String {
    args.get(start..)
        .unwrap_or(&[])
        .iter()
        .map(CommandArg::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Iterate over the runnable lines of a startup script.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn script_commands(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(tokenize("Print hello world"), vec!["Print", "hello", "world"]);
    }

    #[test]
    fn test_tokenize_no_args() {
        assert_eq!(tokenize("Clear"), vec!["Clear"]);
    }

    #[test]
    fn test_tokenize_drops_empty_tokens() {
        assert_eq!(tokenize("  Set   TimeScale 2  "), vec!["Set", "TimeScale", "2"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("    ").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_quotes_and_tabs() {
        // No quoting: quotes and tabs stay inside tokens
        assert_eq!(tokenize("Print \"a b\""), vec!["Print", "\"a", "b\""]);
        assert_eq!(tokenize("Print a\tb"), vec!["Print", "a\tb"]);
    }

    #[test]
    fn test_join_args() {
        let args: Vec<_> = ["1.5", "Print", "hi"].into_iter().map(CommandArg::new).collect();
        assert_eq!(join_args(&args, 0), "1.5 Print hi");
        assert_eq!(join_args(&args, 1), "Print hi");
        assert_eq!(join_args(&args, 3), "");
        assert_eq!(join_args(&args, 10), "");
    }

    #[test]
    fn test_script_commands() {
        let script = "# comment\nPrint one\n\n   \n#Print skipped\nSet TimeScale 1\n";
        let lines: Vec<_> = script_commands(script).collect();
        assert_eq!(lines, vec!["Print one", "Set TimeScale 1"]);
    }
}
