// Unit tests for game rendering

use crate::view::{HELP_TEXT, Mood, ordinal, render_game, render_pi_decimal};

use pi_core::sequential::{Phase, PipelineSnapshot, Session};

fn playing(start_position: u32, confirmed: &str) -> PipelineSnapshot {
    PipelineSnapshot {
        phase: Phase::Playing,
        session: Some(Session {
            game_id: String::from("g1"),
            start_position,
        }),
        confirmed: confirmed.to_string(),
        score: confirmed.len(),
        ..PipelineSnapshot::default()
    }
}

/// **VALUE**: Verifies that a standard run shows the confirmed digits after "3.".
///
/// **WHY THIS MATTERS**: The display is the only feedback the player gets on progress.
///
/// **BUG THIS CATCHES**: Would catch if pending digits or the wrong score leaked into
/// the line.
#[test]
fn given_standard_run_when_rendered_then_shows_pi_prefix_and_score() {
    // GIVEN
    let snapshot = playing(1, "1415");

    // WHEN
    let lines = render_game(&snapshot);

    // THEN
    assert_eq!(lines[0], "(o_o) 3.1415?");
    assert_eq!(lines[1], "Live progress: 4");
}

#[test]
fn given_custom_run_when_rendered_then_shows_start_position() {
    let lines = render_game(&playing(42, "69"));

    assert_eq!(lines[0], "(o_o) [from position 42] 69?");
}

#[test]
fn given_failed_run_when_rendered_then_shows_message_and_reset_hint() {
    // GIVEN
    let snapshot = PipelineSnapshot {
        phase: Phase::Failed,
        score: 3,
        message: Some(String::from("Wrong! Expected: 5")),
        ..playing(1, "141")
    };

    // WHEN
    let lines = render_game(&snapshot);

    // THEN
    assert_eq!(lines[0], "(;_;) SYSTEM ERROR!");
    assert_eq!(lines[1], "Score: 3");
    assert_eq!(lines[2], "Wrong! Expected: 5");
    assert!(lines[3].contains("reset"));
}

#[test]
fn given_idle_with_message_when_rendered_then_shows_message() {
    let snapshot = PipelineSnapshot {
        message: Some(String::from("Failed to start game. Is the backend running?")),
        ..PipelineSnapshot::default()
    };

    let lines = render_game(&snapshot);

    assert!(lines.iter().any(|l| l.contains("Is the backend running?")));
    assert!(lines.iter().any(|l| l.contains("start")));
}

#[test]
fn given_snapshots_when_mood_computed_then_matches_progress() {
    assert_eq!(Mood::for_snapshot(&PipelineSnapshot::default()), Mood::Happy);
    assert_eq!(Mood::for_snapshot(&playing(1, "")), Mood::Happy);
    assert_eq!(Mood::for_snapshot(&playing(1, "14")), Mood::Thinking);
}

#[test]
fn given_positions_when_ordinal_then_uses_english_suffix() {
    assert_eq!(ordinal(1), "1st");
    assert_eq!(ordinal(2), "2nd");
    assert_eq!(ordinal(3), "3rd");
    assert_eq!(ordinal(4), "4th");
    assert_eq!(ordinal(11), "11th");
    assert_eq!(ordinal(12), "12th");
    assert_eq!(ordinal(13), "13th");
    assert_eq!(ordinal(21), "21st");
    assert_eq!(ordinal(112), "112th");
}

/// **VALUE**: Verifies the `pi <n>` answer against known decimals and the table bound.
///
/// **WHY THIS MATTERS**: The lookup is the player's reference while memorising. A table
/// that is shifted by one or truncated teaches the wrong digits.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - Position 1 maps to the integer part "3" instead of the first decimal
/// - A trailing newline in the table is counted as a decimal place
/// - Positions past the table panic instead of reporting the limit
#[test]
fn given_positions_when_pi_decimal_rendered_then_matches_table() {
    // GIVEN/WHEN/THEN: Start of the table
    assert_eq!(render_pi_decimal(1), "The 1st decimal of pi is: 1");
    assert_eq!(render_pi_decimal(2), "The 2nd decimal of pi is: 4");
    assert_eq!(render_pi_decimal(3), "The 3rd decimal of pi is: 1");
    assert_eq!(render_pi_decimal(20), "The 20th decimal of pi is: 6");

    // GIVEN/WHEN/THEN: Last entry (decimals 991-1000 are 2164201989)
    assert_eq!(render_pi_decimal(1000), "The 1000th decimal of pi is: 9");

    // GIVEN/WHEN/THEN: Past the end and position zero
    assert_eq!(
        render_pi_decimal(1001),
        "We only have up to 1000 decimal places!"
    );
    assert_eq!(
        render_pi_decimal(0),
        "We only have up to 1000 decimal places!"
    );
}

#[test]
fn given_help_text_when_read_then_lists_pi_lookup() {
    assert!(HELP_TEXT.contains("pi <n>"));
}
