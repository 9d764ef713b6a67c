//! Platform-independent REPL core.
//!
//! The core owns the [`Bridge`] and talks to its environment only through
//! [`IoHost`].

use nvbridge::{Bridge, Code};

use crate::commands::{self, CommandResult};
use crate::host::{EditModeChoice, TerminalHost};
use crate::io::{Event, ExitReason, IoError, IoHost, Output};

/// The REPL loop around a bridge.
pub struct ReplCore {
    bridge: Bridge,
    last_failure: Option<Code>,
}

impl ReplCore {
    pub fn new(bridge: Bridge) -> Self {
        Self {
            bridge,
            last_failure: None,
        }
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// Run the REPL loop, reading and writing through the provided host.
    pub fn run(&mut self, io: &mut impl IoHost) -> Result<ExitReason, IoError> {
        io.write(Output::Notice(BANNER.to_string()))?;

        loop {
            let line = match io.next_event(self.last_failure)? {
                Event::Line(line) => line,
                Event::Interrupt => {
                    io.write(Output::Notice("^C (use 'exit' to quit)".to_string()))?;
                    continue;
                }
                Event::Eof => return farewell(io, ExitReason::Eof),
            };

            match commands::execute(&line, &self.bridge) {
                CommandResult::Ok(None) => {}
                CommandResult::Ok(Some(rendered)) => {
                    self.last_failure = None;
                    io.write(Output::Response(rendered))?;
                }
                CommandResult::Status(status) => {
                    self.last_failure = Some(status.code());
                    io.write(Output::Status(status))?;
                }
                CommandResult::Error(msg) => io.write(Output::Rejected(msg))?,
                CommandResult::Help => io.write(Output::Response(commands::format_help()))?,
                CommandResult::Methods => {
                    io.write(Output::Response(commands::format_methods()))?
                }
                CommandResult::Exit => return farewell(io, ExitReason::UserExit),
            }

            io.flush()?;
        }
    }
}

fn farewell(io: &mut impl IoHost, reason: ExitReason) -> Result<ExitReason, IoError> {
    io.write(Output::Notice("Goodbye!".to_string()))?;
    io.flush()?;
    Ok(reason)
}

/// Run the REPL on the terminal. `socket` is shown in the prompt.
pub fn run(
    bridge: Bridge,
    socket: &str,
    edit_mode: Option<EditModeChoice>,
) -> Result<ExitReason, IoError> {
    let mut host = TerminalHost::new(socket, edit_mode);
    ReplCore::new(bridge).run(&mut host)
}

const BANNER: &str = r#"
             _          _     _
 _ ____   _| |__  _ __(_) __| | __ _  ___
| '_ \ \ / / '_ \| '__| |/ _` |/ _` |/ _ \
| | | \ V /| |_) | |  | | (_| | (_| |  __/
|_| |_|\_/ |_.__/|_|  |_|\__,_|\__, |\___|
                               |___/

Type 'methods' for callable methods, 'help' for usage, 'exit' to quit.
"#;
