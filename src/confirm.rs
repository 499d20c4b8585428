//! Yes/no decisions the ledger asks for before destructive steps.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

pub trait Confirm {
    /// Ask `question` and return whether the user agreed.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Answers every question the same way without asking. Backs `--yes`.
#[derive(Debug, Clone, Copy)]
pub struct AlwaysConfirm(pub bool);

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        tracing::debug!(question, answer = self.0, "confirmation answered without prompting");
        Ok(self.0)
    }
}

/// Interactive `(y/n)` prompt. Keeps asking until it reads `y` or `n` in any
/// case; running out of input counts as a no.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            write!(self.output, "{question} (y/n): ").context("failed to write prompt")?;
            self.output.flush().context("failed to flush prompt")?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read confirmation")?;
            if read == 0 {
                return Ok(false);
            }

            match line.trim().to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => writeln!(self.output, "Invalid input. Please enter \"y\" or \"n\".")
                    .context("failed to write prompt")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let answer = PromptConfirm::new(input.as_bytes(), &mut output)
            .confirm("remove project foo?")
            .unwrap();
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn accepts_either_case() {
        assert!(ask("Y\n").0);
        assert!(!ask("n\n").0);
    }

    #[test]
    fn reprompts_on_garbage() {
        let (answer, output) = ask("maybe\ny\n");
        assert!(answer);
        assert_eq!(output.matches("remove project foo? (y/n): ").count(), 2);
        assert!(output.contains("Invalid input. Please enter \"y\" or \"n\"."));
    }

    #[test]
    fn eof_declines() {
        assert!(!ask("").0);
    }
}
