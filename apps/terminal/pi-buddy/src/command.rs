//! Parsing of terminal input lines.

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `start` or `start <position>`.
    Start { position: Option<u32> },
    /// A line beginning with a digit; every character is one keystroke.
    Keys(String),
    Reset,
    Score,
    High,
    /// `quiz`, `quiz <max>`, or `quiz at <position>`.
    Quiz {
        position: Option<u32>,
        max_position: Option<u32>,
    },
    Guess(String),
    /// `pi <n>`: look up the nth decimal locally.
    Pi(u32),
    /// `chat <text>` or any unrecognised text.
    Chat(String),
    Help,
    Clear,
    Quit,
    Empty,
    /// Recognised command with bad arguments; carries the usage hint.
    Invalid(String),
}

pub const PI_USAGE: &str = "Please provide a valid number! Example: pi 20";

pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();

    let Some(first) = trimmed.chars().next() else {
        return Command::Empty;
    };

    if first.is_ascii_digit() {
        return Command::Keys(trimmed.to_string());
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    match word.to_lowercase().as_str() {
        "start" => parse_start(rest),
        "reset" | "reboot" => Command::Reset,
        "score" => Command::Score,
        "high" | "highscore" => Command::High,
        "quiz" => parse_quiz(rest),
        "pi" => match parse_position(rest) {
            Some(position) => Command::Pi(position),
            None => Command::Invalid(String::from(PI_USAGE)),
        },
        "guess" if rest.is_empty() => Command::Invalid(String::from("Usage: guess <digit>")),
        "guess" => Command::Guess(rest.to_string()),
        "chat" if rest.is_empty() => Command::Invalid(String::from("Usage: chat <message>")),
        "chat" => Command::Chat(rest.to_string()),
        "help" => Command::Help,
        "clear" => Command::Clear,
        "quit" | "exit" => Command::Quit,
        _ => Command::Chat(trimmed.to_string()),
    }
}

fn parse_start(rest: &str) -> Command {
    if rest.is_empty() {
        return Command::Start { position: None };
    }

    match parse_position(rest) {
        Some(position) => Command::Start {
            position: Some(position),
        },
        None => Command::Invalid(String::from(
            "Usage: start [position] (position is a whole number, 1 or more)",
        )),
    }
}

fn parse_quiz(rest: &str) -> Command {
    if rest.is_empty() {
        return Command::Quiz {
            position: None,
            max_position: None,
        };
    }

    let usage = || Command::Invalid(String::from("Usage: quiz [max] | quiz at <position>"));

    match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["at", position] => match parse_position(position) {
            Some(position) => Command::Quiz {
                position: Some(position),
                max_position: None,
            },
            None => usage(),
        },
        [max] => match parse_position(max) {
            Some(max) => Command::Quiz {
                position: None,
                max_position: Some(max),
            },
            None => usage(),
        },
        _ => usage(),
    }
}

fn parse_position(text: &str) -> Option<u32> {
    text.parse::<u32>().ok().filter(|p| *p >= 1)
}
