//! Reedline-backed terminal host.
//!
//! The prompt names the daemon socket and, after a failed call, the status
//! code it failed with. Status output is colored by code.

use std::borrow::Cow;
use std::io::Write;
use std::path::PathBuf;

use nu_ansi_term::{Color, Style};
use reedline::{
    default_emacs_keybindings, default_vi_insert_keybindings, default_vi_normal_keybindings,
    ColumnarMenu, DefaultHinter, EditCommand, EditMode, Emacs, FileBackedHistory, KeyCode,
    KeyModifiers, Keybindings, MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch,
    PromptHistorySearchStatus, PromptViMode, Reedline, ReedlineEvent, ReedlineMenu, Signal, Vi,
};

use nvbridge::Code;

use crate::completer::ReplCompleter;
use crate::highlighter::ReplHighlighter;
use crate::io::{Event, IoError, IoHost, Output};

const COMPLETION_MENU: &str = "methods";
const HISTORY_CAPACITY: usize = 1000;

/// Edit mode forced from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditModeChoice {
    Vi,
    Emacs,
}

impl EditModeChoice {
    /// An explicit choice wins; otherwise vi if the user's editor or inputrc
    /// asks for it.
    pub fn resolve(choice: Option<Self>) -> Self {
        choice.unwrap_or_else(|| {
            if prefers_vi() {
                EditModeChoice::Vi
            } else {
                EditModeChoice::Emacs
            }
        })
    }
}

pub struct TerminalHost {
    editor: Reedline,
    socket: String,
}

impl TerminalHost {
    pub fn new(socket: impl Into<String>, choice: Option<EditModeChoice>) -> Self {
        let menu = ColumnarMenu::default()
            .with_name(COMPLETION_MENU)
            .with_text_style(Style::new().fg(Color::Cyan))
            .with_selected_text_style(Style::new().fg(Color::Black).on(Color::Cyan).bold());

        let mut editor = Reedline::create()
            .with_completer(Box::new(ReplCompleter::new()))
            .with_highlighter(Box::new(ReplHighlighter::new()))
            .with_hinter(Box::new(
                DefaultHinter::default().with_style(Style::new().fg(Color::DarkGray)),
            ))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(menu)))
            .with_edit_mode(edit_mode(EditModeChoice::resolve(choice)));

        if let Some(history) = open_history() {
            editor = editor.with_history(Box::new(history));
        }

        Self {
            editor,
            socket: socket.into(),
        }
    }
}

impl IoHost for TerminalHost {
    fn next_event(&mut self, last_failure: Option<Code>) -> Result<Event, IoError> {
        let prompt = BridgePrompt {
            socket: &self.socket,
            last_failure,
        };
        match self.editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => Ok(Event::Line(line)),
            Ok(Signal::CtrlC) => Ok(Event::Interrupt),
            Ok(Signal::CtrlD) => Ok(Event::Eof),
            Err(e) => Err(IoError::Terminal(e.to_string())),
        }
    }

    fn write(&mut self, output: Output) -> Result<(), IoError> {
        match output {
            Output::Notice(text) => println!("{}", Color::Cyan.paint(text)),
            Output::Response(text) => println!("{}", text),
            Output::Status(status) => println!(
                "{} {}",
                code_style(status.code()).paint(status.code().to_string()),
                status.message()
            ),
            Output::Rejected(text) => println!("{} {}", Color::Red.bold().paint("error:"), text),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        std::io::stdout()
            .flush()
            .map_err(|e| IoError::Terminal(e.to_string()))
    }
}

/// Caller mistakes are yellow, missing resources magenta, unsupported
/// operations blue, backend and bridge faults red.
fn code_style(code: Code) -> Style {
    let color = match code {
        Code::InvalidArgument => Color::Yellow,
        Code::NotFound => Color::Magenta,
        Code::Unimplemented => Color::Blue,
        Code::Unknown | Code::Internal => Color::Red,
    };
    Style::new().bold().fg(color)
}

fn edit_mode(choice: EditModeChoice) -> Box<dyn EditMode> {
    match choice {
        EditModeChoice::Vi => {
            let mut insert = default_vi_insert_keybindings();
            bind_completion(&mut insert);
            Box::new(Vi::new(insert, default_vi_normal_keybindings()))
        }
        EditModeChoice::Emacs => {
            let mut keys = default_emacs_keybindings();
            bind_completion(&mut keys);
            // Ctrl+D clears a non-empty line instead of deleting a char.
            keys.add_binding(
                KeyModifiers::CONTROL,
                KeyCode::Char('d'),
                ReedlineEvent::Edit(vec![EditCommand::Clear]),
            );
            Box::new(Emacs::new(keys))
        }
    }
}

fn bind_completion(keys: &mut Keybindings) {
    keys.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
}

fn open_history() -> Option<FileBackedHistory> {
    let path = dirs::data_local_dir()?.join("nvbridge").join("history.txt");
    if let Some(dir) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::debug!(dir = %dir.display(), error = %e, "history disabled");
            return None;
        }
    }
    FileBackedHistory::with_file(HISTORY_CAPACITY, path)
        .map_err(|e| tracing::debug!(error = %e, "history disabled"))
        .ok()
}

struct BridgePrompt<'a> {
    socket: &'a str,
    last_failure: Option<Code>,
}

impl Prompt for BridgePrompt<'_> {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let mut left = format!(
            "{} {}",
            Color::Blue.bold().paint("nvbridge"),
            Color::DarkGray.paint(self.socket)
        );
        if let Some(code) = self.last_failure {
            left.push_str(&format!(" {}", code_style(code).paint(format!("[{}]", code))));
        }
        Cow::Owned(left)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        let marker = match edit_mode {
            PromptEditMode::Vi(PromptViMode::Normal) => Color::Yellow.bold().paint(" : "),
            _ => Color::Green.bold().paint(" > "),
        };
        Cow::Owned(marker.to_string())
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let failing = match search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => " (no match)",
        };
        Cow::Owned(format!("history{}: {} ", failing, search.term))
    }
}

fn prefers_vi() -> bool {
    let editor_is_vi = ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .any(|editor| is_vi_editor(&editor));
    editor_is_vi || inputrc_paths().iter().any(|path| inputrc_wants_vi(path))
}

fn is_vi_editor(editor: &str) -> bool {
    let program = editor
        .split_whitespace()
        .next()
        .and_then(|cmd| cmd.rsplit('/').next())
        .unwrap_or("");
    matches!(program, "vi" | "vim" | "nvim" | "gvim")
}

fn inputrc_paths() -> Vec<PathBuf> {
    std::env::var_os("INPUTRC")
        .map(PathBuf::from)
        .into_iter()
        .chain(dirs::home_dir().map(|home| home.join(".inputrc")))
        .chain(std::iter::once(PathBuf::from("/etc/inputrc")))
        .collect()
}

fn inputrc_wants_vi(path: &std::path::Path) -> bool {
    std::fs::read_to_string(path)
        .map(|content| content.lines().any(is_vi_editing_mode))
        .unwrap_or(false)
}

fn is_vi_editing_mode(line: &str) -> bool {
    line.split_whitespace().eq(["set", "editing-mode", "vi"])
}
