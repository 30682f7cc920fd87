use std::io::{self, BufRead, StdinLock, Stdout, Write};

use spdlog::debug;

use crate::error::{Error, Result};

/// One-line prompts over a line reader that is acquired on first use and
/// then kept for every later prompt.
pub struct Prompter<R, W> {
    reader: Option<R>,
    open: fn() -> R,
    output: W,
}

fn already_open<R>() -> R {
    unreachable!("line reader is opened eagerly")
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompts on the terminal. Stdin is locked on the first prompt and
    /// released when the prompter is dropped.
    pub fn stdio() -> Self {
        Self::lazy(|| io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, output: W) -> Self {
        Prompter {
            reader: Some(reader),
            open: already_open::<R>,
            output,
        }
    }

    pub fn lazy(open: fn() -> R, output: W) -> Self {
        Prompter {
            reader: None,
            open,
            output,
        }
    }

    /// Writes `text` and blocks for one line, returned trimmed.
    ///
    /// `Ok(None)` at end of input.
    pub fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        if !text.is_empty() {
            self.output.write_all(text.as_bytes())?;
            self.output.flush()?;
        }

        let open = self.open;
        let reader = self.reader.get_or_insert_with(|| {
            debug!("opening line reader");
            open()
        });

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Prompts until a non-empty line arrives.
    pub fn require(&mut self, text: &str, what: &'static str) -> Result<String> {
        loop {
            match self.prompt(text)? {
                Some(line) if !line.is_empty() => return Ok(line),
                Some(_) => debug!("empty {what}, asking again"),
                None => return Err(Error::InputClosed(what)),
            }
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}
