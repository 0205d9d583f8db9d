//! Interactive questions asked in CUSTOM mode.

use crate::naming::DateFormat;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

pub trait Prompt {
    /// Shows `question` and returns the answer without its line ending.
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Asks on stdout and reads the answer from stdin.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{question}")?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Replays canned answers; an exhausted script answers with empty strings.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

/// The date format menu, numbered from 1.
pub fn date_format_menu() -> String {
    let mut menu = String::from("\n");
    for (i, format) in DateFormat::ALL.iter().enumerate() {
        menu.push_str(&format!("{} - {}\n", i + 1, format.label()));
    }
    menu.push_str("\nChoose a date format (1, 2, 3, 4 - default 1): ");
    menu
}

/// Asks for the category folder name and the date format.
///
/// A blank folder answer yields `None` so the caller can fall back to the
/// configured folder. An invalid format answer falls back to day/month/year.
pub fn ask_custom_choices(prompt: &mut dyn Prompt) -> io::Result<(Option<String>, DateFormat)> {
    let folder = prompt.ask("\nName of the folder to store your files in: ")?;
    let selector = prompt.ask(&date_format_menu())?;

    let folder = Some(folder).filter(|name| !name.trim().is_empty());
    Ok((folder, DateFormat::from_selector(&selector)))
}
