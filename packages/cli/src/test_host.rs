//! Scripted [`IoHost`] for exercising the REPL core without a terminal.

use std::collections::VecDeque;

use nvbridge::Code;

use crate::io::{Event, IoError, IoHost, Output};

/// Replays queued events, then reports [`Event::Eof`].
#[derive(Debug, Default)]
pub struct TestHost {
    events: VecDeque<Event>,
    written: Vec<Output>,
    prompts: Vec<Option<Code>>,
}

impl TestHost {
    /// Each line becomes an [`Event::Line`].
    pub fn with_lines(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            events: lines.into_iter().map(|l| Event::Line(l.into())).collect(),
            ..Self::default()
        }
    }

    /// Queue `event` ahead of the scripted lines.
    pub fn preceded_by(mut self, event: Event) -> Self {
        self.events.push_front(event);
        self
    }

    pub fn written(&self) -> &[Output] {
        &self.written
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.written.iter().any(|o| o.text().contains(needle))
    }

    /// Bridge failures and rejected input, as displayed text.
    pub fn failures(&self) -> Vec<String> {
        self.written
            .iter()
            .filter(|o| matches!(o, Output::Status(_) | Output::Rejected(_)))
            .map(Output::text)
            .collect()
    }

    /// The `last_failure` seen at each prompt, in order.
    pub fn prompts(&self) -> &[Option<Code>] {
        &self.prompts
    }
}

impl IoHost for TestHost {
    fn next_event(&mut self, last_failure: Option<Code>) -> Result<Event, IoError> {
        self.prompts.push(last_failure);
        Ok(self.events.pop_front().unwrap_or(Event::Eof))
    }

    fn write(&mut self, output: Output) -> Result<(), IoError> {
        self.written.push(output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvbridge::Status;

    #[test]
    fn replays_then_reports_eof() {
        let mut host = TestHost::with_lines(["methods"]).preceded_by(Event::Interrupt);

        assert_eq!(host.next_event(None).unwrap(), Event::Interrupt);
        assert_eq!(host.next_event(None).unwrap(), Event::Line("methods".into()));
        assert_eq!(host.next_event(Some(Code::NotFound)).unwrap(), Event::Eof);
        assert_eq!(host.prompts(), &[None, None, Some(Code::NotFound)]);
    }

    #[test]
    fn failures_cover_status_and_rejected_input() {
        let mut host = TestHost::default();
        host.write(Output::Notice("hi".into())).unwrap();
        host.write(Output::Status(Status::not_found("gone"))).unwrap();
        host.write(Output::Rejected("Invalid JSON".into())).unwrap();

        assert_eq!(host.failures(), vec!["NotFound: gone", "Invalid JSON"]);
        assert!(host.printed("hi"));
    }
}
