use std::{
    fmt::Display,
    io::{self, BufRead, Write},
};

use thiserror::Error;

use crate::messages::{self, Msg};

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Console IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Console input was closed before an answer was given")]
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

/// Recognizes any prefix of `yes` or `no`, ignoring case.
///
/// A blank answer is a prefix of `yes`, so pressing Enter accepts.
pub fn classify(input: &str) -> Option<Answer> {
    let input = input.trim().to_lowercase();
    if messages::YES.starts_with(&input) {
        Some(Answer::Yes)
    } else if messages::NO.starts_with(&input) {
        Some(Answer::No)
    } else {
        None
    }
}

/// Line based console the installer talks to the user through.
pub struct Console {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
}

impl Console {
    pub fn new(input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        Console {
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout())
    }

    /// Prints one line.
    pub fn say(&mut self, line: impl Display) -> Result<(), PromptError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Prints `prompt` without a newline and reads one line of input.
    ///
    /// The returned line has its line ending removed but is otherwise untouched.
    pub fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        if prompt.trim().is_empty() {
            write!(self.output, "{}", Msg::DefaultPrompt)?;
        } else {
            write!(self.output, "{prompt}")?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::InputClosed);
        }
        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        Ok(line)
    }

    /// Asks until the answer is recognizable as yes or no.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool, PromptError> {
        loop {
            self.say("")?;
            let input = self.ask(prompt)?;
            match classify(&input) {
                Some(Answer::Yes) => return Ok(true),
                Some(Answer::No) => return Ok(false),
                None => self.say(Msg::Reprompt)?,
            }
        }
    }
}
