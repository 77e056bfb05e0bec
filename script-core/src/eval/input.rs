use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Capability the evaluator uses to service `input()` expressions. The
/// evaluator itself never touches stdin, so executions can be scripted or
/// tested by injecting a different source.
pub trait InputSource {
    /// Block until the host supplies one line of input. `None` means no
    /// input is available (stream closed, cancelled), which fails the
    /// running program with `NoInputProvided`.
    fn read(&mut self, prompt: Option<&str>) -> Option<String>;
}

/// Reads lines from the process's stdin, echoing the prompt to stdout.
#[derive(Debug, Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn read(&mut self, prompt: Option<&str>) -> Option<String> {
        if let Some(prompt) = prompt {
            print!("{prompt}");
            std::io::stdout().flush().ok()?;
        }

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

/// A fixed queue of input lines. Once the queue is drained every further
/// `input()` fails with `NoInputProvided`.
#[derive(Debug, Default)]
pub struct QueuedInput {
    lines: VecDeque<String>,
}

impl QueuedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for QueuedInput {
    fn read(&mut self, _prompt: Option<&str>) -> Option<String> {
        self.lines.pop_front()
    }
}
