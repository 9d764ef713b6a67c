use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::commands::{find_method, BUILTINS};

/// Colors the command word and the JSON body
pub struct ReplHighlighter;

impl ReplHighlighter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReplHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for ReplHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if line.is_empty() {
            return styled;
        }

        let (command, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], &line[pos..]),
            None => (line, ""),
        };

        let known = find_method(command).is_some()
            || BUILTINS.contains(&command.to_lowercase().as_str());
        let cmd_style = if known {
            Style::new().bold().fg(Color::Cyan)
        } else {
            Style::new().fg(Color::Red)
        };
        styled.push((cmd_style, command.to_string()));

        if !rest.is_empty() {
            styled.push((Style::new().fg(Color::Green), rest.to_string()));
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_empty_returns_empty() {
        let styled = ReplHighlighter::new().highlight("", 0);
        assert!(styled.buffer.is_empty());
    }

    #[test]
    fn highlight_known_method_with_body() {
        let styled = ReplHighlighter::new().highlight("GetNvmeSubsystem {\"name\": \"x\"}", 0);
        assert_eq!(styled.buffer.len(), 2);
        assert_eq!(styled.buffer[0].1, "GetNvmeSubsystem");
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Cyan));
        assert_eq!(styled.buffer[1].1, " {\"name\": \"x\"}");
        assert_eq!(styled.buffer[1].0.foreground, Some(Color::Green));
    }

    #[test]
    fn highlight_builtin() {
        let styled = ReplHighlighter::new().highlight("help", 0);
        assert_eq!(styled.buffer.len(), 1);
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Cyan));
    }

    #[test]
    fn highlight_unknown_command() {
        let styled = ReplHighlighter::new().highlight("read /x", 0);
        assert_eq!(styled.buffer[0].1, "read");
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Red));
    }
}
