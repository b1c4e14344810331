//! Line-based console I/O.

use std::io::{self, Write};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

/// Prefix for runtime notices (authorization, confirmation).
pub const NOTICE_PREFIX: &str = "[quill]";

/// Where the conversation reads input and prints output.
///
/// The loop and the confirmation prompt share one console, so a single
/// reader owns stdin.
#[async_trait]
pub trait Console: Send + Sync {
    /// Show `prompt` and read one line without its line ending.
    ///
    /// Returns `None` at end of input.
    async fn read_line(&self, prompt: &str) -> io::Result<Option<String>>;

    /// Print one line.
    fn print(&self, line: &str);

    /// Print one line with the notice prefix.
    fn notice(&self, line: &str) {
        self.print(&format!("{NOTICE_PREFIX} {line}"));
    }
}

/// Console over the process's stdin and stdout.
pub struct StdConsole {
    stdin: Mutex<BufReader<Stdin>>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            stdin: Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for StdConsole {
    async fn read_line(&self, prompt: &str) -> io::Result<Option<String>> {
        {
            let mut stdout = io::stdout().lock();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
        }

        let mut line = String::new();
        let bytes_read = self.stdin.lock().await.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Ok(None);
        }

        Ok(Some(strip_line_ending(line)))
    }

    fn print(&self, line: &str) {
        println!("{line}");
    }
}

fn strip_line_ending(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedConsole;

    #[test]
    fn strips_unix_and_windows_endings() {
        assert_eq!(strip_line_ending("exit\n".into()), "exit");
        assert_eq!(strip_line_ending("exit\r\n".into()), "exit");
        assert_eq!(strip_line_ending("  spaced  \n".into()), "  spaced  ");
    }

    #[test]
    fn notice_is_prefixed() {
        let console = ScriptedConsole::new(Vec::<String>::new());
        console.notice("hello");
        assert_eq!(console.output(), vec!["[quill] hello"]);
    }
}
