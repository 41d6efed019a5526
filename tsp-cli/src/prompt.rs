use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Input;

/// Line-oriented operator input. `Ok(None)` means input has ended.
pub trait Prompter {
    fn prompt_with_default(
        &mut self,
        message: &str,
        default: Option<&str>,
    ) -> io::Result<Option<String>>;

    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        self.prompt_with_default(message, None)
    }

    /// Prompt for a value, treating end of input as an empty answer.
    fn prompt_text(&mut self, message: &str) -> io::Result<String> {
        Ok(self.prompt(message)?.unwrap_or_default())
    }
}

/// Reads from the terminal with dialoguer, or plain stdin when piped.
pub struct TerminalPrompter {
    interactive: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }

    fn read_piped(message: &str, default: Option<&str>) -> io::Result<Option<String>> {
        print!("{message}");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        match default {
            Some(d) if line.trim().is_empty() => Ok(Some(d.to_string())),
            _ => Ok(Some(line.to_string())),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn prompt_with_default(
        &mut self,
        message: &str,
        default: Option<&str>,
    ) -> io::Result<Option<String>> {
        // Menus span several lines; only the last one is the prompt itself
        let (body, last) = match message.trim_end().rsplit_once('\n') {
            Some((body, last)) => (Some(body), last),
            None => (None, message),
        };
        if let Some(body) = body {
            println!("{body}");
        }

        if !self.interactive {
            return Self::read_piped(last, default);
        }

        // dialoguer appends its own ": "
        let label = last.trim_end().trim_end_matches(':');
        let mut input = Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true);
        if let Some(d) = default {
            input = input.default(d.to_string()).show_default(false);
        }
        match input.interact_text() {
            Ok(value) => Ok(Some(value)),
            Err(dialoguer::Error::IO(e))
                if matches!(
                    e.kind(),
                    io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(dialoguer::Error::IO(e)) => Err(e),
        }
    }
}

#[cfg(test)]
pub mod scripted {
    use std::collections::VecDeque;
    use std::io;

    use super::Prompter;

    /// Replays canned answers and records every prompt shown.
    #[derive(Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<Option<String>>,
        pub shown: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: &[Option<&str>]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
                shown: Vec::new(),
            }
        }

        pub fn remaining(&self) -> usize {
            self.answers.len()
        }
    }

    impl Prompter for ScriptedPrompter {
        fn prompt_with_default(
            &mut self,
            message: &str,
            default: Option<&str>,
        ) -> io::Result<Option<String>> {
            self.shown.push(message.to_string());
            let answer = self.answers.pop_front().flatten();
            Ok(match (answer, default) {
                (Some(a), Some(d)) if a.trim().is_empty() => Some(d.to_string()),
                (None, Some(d)) => Some(d.to_string()),
                (answer, _) => answer,
            })
        }
    }
}
