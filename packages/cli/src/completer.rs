use reedline::{Completer, Span, Suggestion};

use crate::commands::{BUILTINS, METHODS};

/// Completes built-in commands and resource-API method names
pub struct ReplCompleter {
    commands: Vec<(&'static str, &'static str)>,
}

impl ReplCompleter {
    pub fn new() -> Self {
        let builtins = BUILTINS.iter().map(|cmd| (*cmd, builtin_description(cmd)));
        Self {
            commands: builtins.chain(METHODS.iter().copied()).collect(),
        }
    }
}

impl Default for ReplCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for ReplCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let line_to_pos = &line[..pos];
        let words: Vec<&str> = line_to_pos.split_whitespace().collect();

        // Only the command word is completed; the rest is JSON.
        if !(words.is_empty() || (words.len() == 1 && !line_to_pos.ends_with(' '))) {
            return Vec::new();
        }

        let prefix = words.first().copied().unwrap_or("");
        let start = line_to_pos.rfind(prefix).unwrap_or(0);
        let prefix_lower = prefix.to_lowercase();

        self.commands
            .iter()
            .filter(|(cmd, _)| cmd.to_lowercase().starts_with(&prefix_lower))
            .map(|(cmd, desc)| Suggestion {
                value: cmd.to_string(),
                description: Some(desc.to_string()),
                style: None,
                extra: None,
                span: Span::new(start, pos),
                append_whitespace: true,
                match_indices: None,
            })
            .collect()
    }
}

fn builtin_description(cmd: &str) -> &'static str {
    match cmd {
        "help" => "Show help",
        "methods" => "List callable methods",
        "exit" | "quit" => "Exit the REPL",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(suggestions: Vec<Suggestion>) -> Vec<String> {
        suggestions.into_iter().map(|s| s.value).collect()
    }

    #[test]
    fn completes_method_prefix_case_insensitively() {
        let mut completer = ReplCompleter::new();
        let got = values(completer.complete("createnvme", 10));
        assert_eq!(
            got,
            vec![
                "CreateNvmeSubsystem",
                "CreateNvmeController",
                "CreateNvmeNamespace"
            ]
        );
    }

    #[test]
    fn completes_builtins() {
        let mut completer = ReplCompleter::new();
        assert_eq!(values(completer.complete("me", 2)), vec!["methods"]);
    }

    #[test]
    fn no_completion_inside_body() {
        let mut completer = ReplCompleter::new();
        let line = "GetVirtioBlk {\"na";
        assert!(completer.complete(line, line.len()).is_empty());
    }

    #[test]
    fn empty_line_offers_everything() {
        let mut completer = ReplCompleter::new();
        assert_eq!(completer.complete("", 0).len(), BUILTINS.len() + METHODS.len());
    }
}
