//! Terminal narration and input.

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use av_fiction::{LineReader, Narrator};

/// Prints narration one character at a time.
pub struct Typewriter<W: Write> {
    out: W,
    delay: Duration,
    uppercase: bool,
}

impl<W: Write> Typewriter<W> {
    /// Create a typewriter writing to `out`.
    pub fn new(out: W, delay: Duration, uppercase: bool) -> Self {
        Self {
            out,
            delay,
            uppercase,
        }
    }
}

impl<W: Write> Narrator for Typewriter<W> {
    fn emit(&mut self, text: &str) {
        let text = if self.uppercase {
            text.to_uppercase()
        } else {
            text.to_string()
        };

        if self.delay.is_zero() {
            let _ = writeln!(self.out, "{text}");
            let _ = self.out.flush();
            return;
        }

        let mut buf = [0u8; 4];
        for c in text.chars() {
            let _ = self.out.write_all(c.encode_utf8(&mut buf).as_bytes());
            let _ = self.out.flush();
            thread::sleep(self.delay);
        }
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }

    fn verbatim(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

/// Reads answers after showing a `>` prompt.
pub struct Prompt<R: BufRead, W: Write> {
    reader: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    /// Create a prompt reading from `reader` and prompting on `out`.
    pub fn new(reader: R, out: W) -> Self {
        Self { reader, out }
    }
}

impl<R: BufRead, W: Write> LineReader for Prompt<R, W> {
    fn read_line(&mut self) -> Option<String> {
        let _ = write!(self.out, "\n> ");
        let _ = self.out.flush();

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}
