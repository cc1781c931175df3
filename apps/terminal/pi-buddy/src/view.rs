//! Text rendering of game state.

use pi_core::sequential::{Phase, PipelineSnapshot};

/// Decimals of pi after "3.", one ASCII digit each.
const PI_DECIMALS: &str = include_str!("../data/pi_decimals.txt");

pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub const HELP_TEXT: &str = "\
Available commands:
  start [position]    Start a sequential run (from position 1 or your own)
  1415...             Type digits; each one is checked in order
  reset               Reboot the run after a mistake
  score | high        Show the current score or the best score so far
  quiz [max]          Guess the digit at a random position up to max
  quiz at <position>  Guess the digit at a given position
  guess <digit>       Answer the current quiz question
  pi <n>              Show the nth decimal of pi
  chat <message>      Talk to Pi Buddy (any other text works too)
  clear               Clear the screen
  quit                Leave";

/// Mascot expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Thinking,
    Sad,
}

impl Mood {
    pub fn face(self) -> &'static str {
        match self {
            Mood::Happy => "(^_^)",
            Mood::Thinking => "(o_o)",
            Mood::Sad => "(;_;)",
        }
    }

    pub fn for_snapshot(snapshot: &PipelineSnapshot) -> Self {
        match snapshot.phase {
            Phase::Failed => Mood::Sad,
            Phase::Playing if snapshot.score > 0 => Mood::Thinking,
            _ => Mood::Happy,
        }
    }
}

/// Lines describing the sequential game.
pub fn render_game(snapshot: &PipelineSnapshot) -> Vec<String> {
    let face = Mood::for_snapshot(snapshot).face();

    match snapshot.phase {
        Phase::Idle => {
            let mut lines = vec![format!("{face} No run in progress.")];
            if let Some(message) = &snapshot.message {
                lines.push(message.clone());
            }
            lines.push(String::from("Type `start` or `start <position>` to begin."));
            lines
        }
        Phase::Playing => {
            let prefix = match &snapshot.session {
                Some(session) if session.start_position > 1 => {
                    format!("[from position {}] ", session.start_position)
                }
                _ => String::from("3."),
            };
            vec![
                format!("{face} {prefix}{}?", snapshot.confirmed),
                format!("Live progress: {}", snapshot.score),
            ]
        }
        Phase::Failed => vec![
            format!("{face} SYSTEM ERROR!"),
            format!("Score: {}", snapshot.score),
            snapshot.message.clone().unwrap_or_default(),
            String::from("Type `reset` to reboot the run."),
        ],
    }
}

/// Ordinal suffix for quiz positions ("1st", "22nd", "13th").
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Answer to `pi <n>` from the bundled decimals table.
pub fn render_pi_decimal(position: u32) -> String {
    let decimals = PI_DECIMALS.trim_end();
    let digit = usize::try_from(position)
        .ok()
        .and_then(|p| p.checked_sub(1))
        .and_then(|index| decimals.get(index..=index));

    match digit {
        Some(digit) => format!("The {} decimal of pi is: {digit}", ordinal(position)),
        None => format!("We only have up to {} decimal places!", decimals.len()),
    }
}
