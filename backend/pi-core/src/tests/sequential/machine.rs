// Unit tests for the pipeline state machine
// Actor behaviour over real tasks is covered in integration_tests/sequential

use crate::sequential::{
    Failure, Phase, PipelineMachine, Session, VERIFY_FAILED_MESSAGE, VerifyResult, VerifyTicket,
};

use models::Digit;

fn digit(c: char) -> Digit {
    Digit::try_from(c).unwrap()
}

fn playing() -> PipelineMachine {
    let mut machine = PipelineMachine::new();
    machine.begin(Session {
        game_id: String::from("game-1"),
        start_position: 1,
    });
    machine
}

/// Submit every digit, then confirm tickets one by one in the order they are handed out.
fn confirm_all(machine: &mut PipelineMachine, digits: &str) {
    let mut tickets: Vec<VerifyTicket> = digits
        .chars()
        .filter_map(|c| machine.submit(digit(c)))
        .collect();

    while let Some(ticket) = tickets.pop() {
        if let Some(next) = machine.complete(ticket, VerifyResult::Correct) {
            tickets.push(next);
        }
    }
}

/// **VALUE**: Burst of four correct digits ends with all four confirmed in order.
///
/// **WHY THIS MATTERS**: Typing "1415" quickly is the normal way to play. The confirmed
/// sequence is the score; losing or reordering digits corrupts it.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - `complete()` does not drain the next queued digit
/// - The queue is LIFO instead of FIFO
#[test]
fn given_burst_of_correct_digits_when_all_verified_then_sequence_matches_input() {
    // GIVEN: A playing session
    let mut machine = playing();

    // WHEN: Submitting 1,4,1,5 and confirming each verification
    confirm_all(&mut machine, "1415");

    // THEN: Sequence, score and phase reflect four confirmations
    assert_eq!(machine.confirmed(), "1415");
    assert_eq!(machine.score(), 4);
    assert_eq!(machine.phase(), Phase::Playing);
    assert!(machine.is_settled());
}

/// **VALUE**: Only the first of several rapid submissions gets a ticket.
///
/// **WHY THIS MATTERS**: Two verification calls in flight could resolve out of order
/// and check a digit against the wrong position.
///
/// **BUG THIS CATCHES**: Would catch if `drain()` ignores the in-flight slot.
#[test]
fn given_digit_in_flight_when_more_submitted_then_no_second_ticket_issued() {
    // GIVEN: '1' handed out for verification
    let mut machine = playing();
    let first = machine.submit(digit('1'));
    assert!(first.is_some(), "First digit should be sent immediately");

    // WHEN: More digits arrive before the verdict
    let second = machine.submit(digit('4'));
    let third = machine.submit(digit('1'));

    // THEN: They wait in the queue
    assert!(second.is_none());
    assert!(third.is_none());
    assert_eq!(machine.pending_len(), 2);
    assert_eq!(machine.in_flight(), Some(digit('1')));

    // WHEN: The first verdict arrives
    let next = machine.complete(first.unwrap(), VerifyResult::Correct);

    // THEN: Exactly the next digit in entry order is released
    let next = next.expect("Queued digit should be released");
    assert_eq!(next.digit, digit('4'));
    assert_eq!(machine.pending_len(), 1);
}

/// **VALUE**: A wrong digit latches the failure and surfaces the expected digit.
///
/// **WHY THIS MATTERS**: One wrong digit ends the run. The player must see what the
/// right digit was, and the score must stay at the last confirmed length.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The wrong digit is appended to the confirmed sequence
/// - The expected digit is dropped from the message
#[test]
fn given_correct_then_wrong_digit_when_verified_then_failed_with_expected_digit() {
    // GIVEN: '1' confirmed
    let mut machine = playing();
    confirm_all(&mut machine, "1");

    // WHEN: '9' is rejected, expected '4'
    let ticket = machine.submit(digit('9')).unwrap();
    let next = machine.complete(
        ticket,
        VerifyResult::Incorrect {
            expected: Some(String::from("4")),
        },
    );

    // THEN: Failed, score fixed at 1, expected digit shown
    assert!(next.is_none());
    assert_eq!(machine.phase(), Phase::Failed);
    assert_eq!(machine.confirmed(), "1");
    assert_eq!(machine.score(), 1);

    let failure = machine.failure().unwrap();
    assert_eq!(failure.expected_digit(), Some("4"));
    assert_eq!(failure.display_message(), "Wrong! Expected: 4");
    assert_eq!(
        machine.snapshot().message.as_deref(),
        Some("Wrong! Expected: 4")
    );
}

/// **VALUE**: Latching the failure empties the queue and blocks further submissions.
///
/// **WHY THIS MATTERS**: After a wrong digit the backend session is over; sending more
/// digits would waste calls and could show misleading verdicts.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - Queued digits survive the latch and get drained later
/// - `submit()` still accepts digits in the Failed phase
#[test]
fn given_queued_digits_when_failure_latches_then_queue_cleared_and_input_rejected() {
    // GIVEN: '2' in flight with '3' and '4' queued behind it
    let mut machine = playing();
    let ticket = machine.submit(digit('2')).unwrap();
    machine.submit(digit('3'));
    machine.submit(digit('4'));
    assert_eq!(machine.pending_len(), 2);

    // WHEN: '2' is rejected
    machine.complete(
        ticket,
        VerifyResult::Incorrect {
            expected: Some(String::from("1")),
        },
    );

    // THEN: Queue empty immediately
    assert_eq!(machine.pending_len(), 0);
    assert!(machine.in_flight().is_none());

    // AND: New digits are ignored
    assert!(machine.submit(digit('5')).is_none());
    assert_eq!(machine.pending_len(), 0);
    assert!(machine.drain().is_none());
}

#[test]
fn given_transport_error_when_verifying_then_failed_with_generic_message() {
    // GIVEN: A digit in flight
    let mut machine = playing();
    let ticket = machine.submit(digit('1')).unwrap();

    // WHEN: The call fails in transport
    machine.complete(ticket, VerifyResult::Transport(String::from("connection refused")));

    // THEN: Same latch, generic message, no expected digit
    assert_eq!(machine.phase(), Phase::Failed);
    let failure = machine.failure().unwrap();
    assert!(matches!(failure, Failure::Transport { .. }));
    assert_eq!(failure.expected_digit(), None);
    assert_eq!(failure.display_message(), VERIFY_FAILED_MESSAGE);
}

/// **VALUE**: Reset after failure returns every piece of state to its initial value.
///
/// **WHY THIS MATTERS**: Reset is the only way out of Failed. Leftover state would leak
/// into the next run (old score, old session id, stuck error).
///
/// **BUG THIS CATCHES**: Would catch a field missed by `reset()`.
#[test]
fn given_failed_session_when_reset_then_idle_and_submissions_need_new_start() {
    // GIVEN: A failed session with a confirmed digit
    let mut machine = playing();
    confirm_all(&mut machine, "1");
    let ticket = machine.submit(digit('0')).unwrap();
    machine.complete(ticket, VerifyResult::Incorrect { expected: None });
    assert_eq!(machine.phase(), Phase::Failed);

    // WHEN: Resetting
    machine.reset();

    // THEN: Everything cleared
    let snapshot = machine.snapshot();
    assert_eq!(snapshot.phase, Phase::Idle);
    assert!(snapshot.session.is_none());
    assert_eq!(snapshot.confirmed, "");
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.pending, 0);
    assert!(snapshot.failure.is_none());
    assert!(snapshot.message.is_none());

    // AND: Digits are ignored until a new session begins
    assert!(machine.submit(digit('1')).is_none());
    assert_eq!(machine.pending_len(), 0);
}

/// **VALUE**: A verdict for a call issued before a reset is discarded.
///
/// **WHY THIS MATTERS**: The network call cannot be cancelled. If its result were applied
/// after a reset or restart, the new run would start with a phantom digit or a phantom failure.
///
/// **BUG THIS CATCHES**: Would catch if the epoch check in `complete()` is removed.
#[test]
fn given_call_in_flight_when_session_restarted_then_stale_verdict_ignored() {
    // GIVEN: '1' in flight in the first session
    let mut machine = playing();
    let stale = machine.submit(digit('1')).unwrap();

    // WHEN: A new session begins and the stale verdicts arrive
    machine.begin(Session {
        game_id: String::from("game-2"),
        start_position: 10,
    });
    let next = machine.complete(stale.clone(), VerifyResult::Correct);
    machine.complete(stale, VerifyResult::Incorrect { expected: None });

    // THEN: The new session is untouched
    assert!(next.is_none());
    assert_eq!(machine.phase(), Phase::Playing);
    assert_eq!(machine.score(), 0);
    assert_eq!(machine.session().unwrap().game_id, "game-2");
}

#[test]
fn given_idle_machine_when_digit_submitted_then_ignored() {
    let mut machine = PipelineMachine::new();

    assert!(machine.submit(digit('3')).is_none());
    assert_eq!(machine.phase(), Phase::Idle);
    assert_eq!(machine.pending_len(), 0);
}

#[test]
fn given_start_failure_when_snapshot_taken_then_idle_with_start_message() {
    let mut machine = playing();

    machine.start_failed();

    let snapshot = machine.snapshot();
    assert_eq!(snapshot.phase, Phase::Idle);
    assert_eq!(
        snapshot.message.as_deref(),
        Some("Failed to start game. Is the backend running?")
    );
}

/// **VALUE**: Score equals confirmed length at every step of a run.
///
/// **BUG THIS CATCHES**: Would catch a separately tracked score drifting from the sequence.
#[test]
fn given_each_confirmation_when_snapshot_taken_then_score_equals_confirmed_length() {
    let mut machine = playing();

    for (i, c) in "31415926".chars().enumerate() {
        let ticket = machine.submit(digit(c)).unwrap();
        machine.complete(ticket, VerifyResult::Correct);

        let snapshot = machine.snapshot();
        assert_eq!(snapshot.score, i + 1);
        assert_eq!(snapshot.score, snapshot.confirmed.len());
    }
}
