//! Generation prompt assembly.
//!
//! The prompt is the optional preamble, then every answer numbered from 1
//! on its own line in question order, then a blank line and the template.

use std::fmt;

/// The assembled text sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPrompt(String);

impl GenerationPrompt {
    /// Assembles the prompt from answers in question order.
    ///
    /// Line breaks inside an answer are folded into spaces so that each
    /// answer stays on exactly one numbered line.
    pub fn assemble(preamble: &str, answers: &[String], template: &str) -> Self {
        let mut prompt = String::with_capacity(
            preamble.len() + template.len() + answers.iter().map(|a| a.len() + 8).sum::<usize>(),
        );
        prompt.push_str(preamble);
        for (index, answer) in answers.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", index + 1, single_line(answer)));
        }
        prompt.push('\n');
        prompt.push_str(template);
        Self(prompt)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenerationPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn single_line(answer: &str) -> String {
    answer.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn numbers_answers_then_appends_template() {
        let prompt = GenerationPrompt::assemble("", &answers(&["A1", "A2"]), "T");
        assert_eq!(prompt.as_str(), "1. A1\n2. A2\n\nT");
    }

    #[test]
    fn preamble_comes_first() {
        let prompt = GenerationPrompt::assemble("Write a review:\n\n", &answers(&["fast"]), "Be kind");
        assert_eq!(prompt.as_str(), "Write a review:\n\n1. fast\n\nBe kind");
    }

    #[test]
    fn multi_line_answer_stays_on_one_line() {
        let prompt = GenerationPrompt::assemble("", &answers(&["line one\n  line two\n"]), "T");
        assert_eq!(prompt.as_str(), "1. line one line two\n\nT");
    }

    #[test]
    fn numbering_is_one_based_beyond_nine() {
        let many: Vec<String> = (1..=11).map(|i| format!("a{}", i)).collect();
        let prompt = GenerationPrompt::assemble("", &many, "T");
        assert!(prompt.as_str().contains("10. a10\n11. a11\n"));
        assert!(prompt.as_str().starts_with("1. a1\n"));
    }
}
