use std::sync::mpsc;
use std::time::{Duration, SystemTime};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use pilsa::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use pilsa::tracker::{Phase, Transcription};

// Headless integration using the internal runtime + tracker without a TTY.
// Verifies that a minimal transcription flow completes via Runner/TestEventSource.
#[test]
fn headless_transcription_flow_completes() {
    let mut session = Transcription::new("hi");

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let runner = Runner::new(es, ticker);

    for c in ['h', 'i'] {
        tx.send(AppEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::NONE,
        )))
        .unwrap();
    }

    for _ in 0..100u32 {
        match runner.step(true) {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    session.write(c);
                    if session.has_finished() {
                        break;
                    }
                }
            }
        }
    }

    assert!(session.has_finished(), "transcription should have finished");
    assert!(session.take_completion(), "completion signal should fire once");
    assert!(!session.take_completion());

    let cmp = session.comparison();
    assert_eq!(cmp.accuracy, 100);
    assert_eq!(cmp.progress, 100);
    assert!(session.speed(SystemTime::now()) > 0);
}

#[test]
fn headless_overlong_input_is_ignored_mid_flow() {
    let mut session = Transcription::new("hi");
    session.write('h');

    // a pasted update longer than the reference is dropped wholesale
    assert!(!session.set_typed("hixx"));
    assert_eq!(session.typed_text(), "h");
    assert_eq!(session.phase(), Phase::Running);

    session.write('i');
    assert_eq!(session.phase(), Phase::Finished);
}

#[test]
fn headless_korean_flow_counts_graphemes() {
    let mut session = Transcription::new("수고했어요");

    for c in "수고했어요".chars() {
        assert!(session.write(c));
    }

    let cmp = session.comparison();
    assert_eq!(cmp.correct_count, 5);
    assert_eq!(cmp.accuracy, 100);
    assert_eq!(cmp.progress, 100);
    assert_eq!(session.phase(), Phase::Finished);
}

#[test]
fn parked_runner_wakes_for_late_keystrokes() {
    // after a session finishes the loop parks; a new keystroke must still
    // arrive without waiting out a tick interval
    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(5)));

    tx.send(AppEvent::Key(KeyEvent::new(
        KeyCode::Esc,
        KeyModifiers::NONE,
    )))
    .unwrap();

    match runner.step(false) {
        AppEvent::Key(key) => assert_eq!(key.code, KeyCode::Esc),
        other => panic!("expected key event, got {other:?}"),
    }
}
