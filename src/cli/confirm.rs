//! Interactive `[y/N]` confirmation on stdin

use std::io::{self, BufRead, Write};

use crate::services::Confirm;

/// Prompts on stdout and reads the answer from stdin
///
/// With `assume_yes` set (`--yes`) nothing is asked. End of input or a read
/// error counts as "no".
pub struct StdinConfirm {
    assume_yes: bool,
}

impl StdinConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(_) => false,
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("yep"));
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        assert!(StdinConfirm::new(true).confirm("Delete everything?"));
    }
}
