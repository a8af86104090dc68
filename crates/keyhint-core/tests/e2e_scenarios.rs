// Keyhint End-to-End Test Scenarios
//
// These tests drive a full session with synthetic input events.
// They cover complete user workflows without requiring actual hardware.
//
// Run with: cargo test --test e2e_scenarios

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use keyhint_core::suggestion::GenerationOutcome;
use keyhint_core::{
    Action, Config, Control, GeneratorError, InputEvent, KeyEvent, LogOverlay, MouseButton,
    MouseButtonEvent, RecordingSink, Session, Side, VirtualKey,
};
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(5);

// =========================================================================
// Test Helpers
// =========================================================================

fn generator<F>(f: F) -> F
where
    F: Fn(&AtomicBool) -> Result<String, GeneratorError> + Send + 'static,
{
    f
}

fn config_in(dir: &TempDir) -> Config {
    Config {
        log_file: dir.path().join("input_events.txt"),
        key_delay_ms: 0,
        ..Config::default()
    }
}

/// Session whose generator always suggests `text`
fn session_with(dir: &TempDir, text: &'static str) -> (Session, RecordingSink) {
    let sink = RecordingSink::new();
    let session = Session::with_generator(
        &config_in(dir),
        generator(move |_| Ok(text.to_string())),
        sink.clone(),
        LogOverlay,
    )
    .unwrap();
    (session, sink)
}

struct Clock(u64);

impl Clock {
    fn key(&mut self, vk: VirtualKey, side: Side, up: bool) -> InputEvent {
        self.0 += 1000;
        KeyEvent::new(self.0, vk, up).with_side(side).into()
    }

    fn repeat(&mut self, vk: VirtualKey, side: Side) -> InputEvent {
        self.0 += 1000;
        KeyEvent::from_action(self.0, vk, Action::Repeat)
            .with_side(side)
            .into()
    }

    fn mouse(&mut self, button: MouseButton, up: bool, position: (i32, i32)) -> InputEvent {
        self.0 += 1000;
        MouseButtonEvent {
            timestamp: self.0,
            button,
            is_button_up: up,
            cursor_position: position,
        }
        .into()
    }
}

/// Press and release a key
fn tap(session: &mut Session, clock: &mut Clock, vk: VirtualKey, side: Side) {
    session.process(clock.key(vk, side, false));
    session.process(clock.key(vk, side, true));
}

/// Hold one key while tapping another
fn chord(session: &mut Session, clock: &mut Clock, held: VirtualKey, side: Side, key: VirtualKey) {
    session.process(clock.key(held, side, false));
    tap(session, clock, key, Side::Unspecified);
    session.process(clock.key(held, side, true));
}

/// Characters typed into the sink, reconstructed from its key transitions
fn typed_text(sink: &RecordingSink) -> String {
    let mut shift = false;
    let mut text = String::new();
    for (key, action) in sink.events() {
        if key == VirtualKey::SHIFT {
            shift = action == Action::Press;
            continue;
        }
        if action != Action::Press {
            continue;
        }
        let c = match key {
            VirtualKey::SPACE => ' ',
            k if k.is_letter() => {
                let c = (k.code() as u8) as char;
                if shift {
                    c
                } else {
                    c.to_ascii_lowercase()
                }
            }
            k => (k.code() as u8) as char,
        };
        text.push(c);
    }
    text
}

fn read_log(session: &Session) -> Vec<serde_json::Value> {
    std::fs::read_to_string(session.event_log().path())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// =========================================================================
// Suggestion Workflow
// =========================================================================

#[test]
fn test_generate_then_accept_types_suggestion() {
    let dir = TempDir::new().unwrap();
    let (mut session, sink) = session_with(&dir, "Hello world");
    let mut clock = Clock(0);

    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Left);
    assert!(matches!(
        session.wait_for_generation(WAIT),
        Some(GenerationOutcome::Ready(ref s)) if s == "Hello world"
    ));
    assert!(sink.events().is_empty());

    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Right);

    assert_eq!(typed_text(&sink), "Hello world");
    assert!(sink.held_keys().is_empty());
    assert_eq!(session.coordinator().pending_suggestion(), None);
}

#[test]
fn test_accept_without_suggestion_types_nothing() {
    let dir = TempDir::new().unwrap();
    let (mut session, sink) = session_with(&dir, "unused");
    let mut clock = Clock(0);

    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Right);
    assert!(sink.events().is_empty());
    assert!(!session.coordinator().is_generating());
}

#[test]
fn test_suggestion_is_typed_only_once() {
    let dir = TempDir::new().unwrap();
    let (mut session, sink) = session_with(&dir, "ok");
    let mut clock = Clock(0);

    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Left);
    session.wait_for_generation(WAIT);
    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Right);
    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Right);

    assert_eq!(typed_text(&sink), "ok");
}

#[test]
fn test_typing_between_generate_and_accept_keeps_suggestion() {
    let dir = TempDir::new().unwrap();
    let (mut session, sink) = session_with(&dir, "later");
    let mut clock = Clock(0);

    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Left);
    session.wait_for_generation(WAIT);
    tap(&mut session, &mut clock, VirtualKey::KEY_A, Side::Unspecified);
    assert!(!session.coordinator().is_overlay_visible());

    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Right);
    assert_eq!(typed_text(&sink), "later");
}

#[test]
fn test_failed_generation_leaves_nothing_to_accept() {
    let dir = TempDir::new().unwrap();
    let sink = RecordingSink::new();
    let mut session = Session::with_generator(
        &config_in(&dir),
        generator(|_| Err(GeneratorError::Failed(Some(1)))),
        sink.clone(),
        LogOverlay,
    )
    .unwrap();
    let mut clock = Clock(0);

    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Left);
    assert!(matches!(
        session.wait_for_generation(WAIT),
        Some(GenerationOutcome::Failed(_))
    ));
    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Right);
    assert!(sink.events().is_empty());
}

#[cfg(unix)]
#[test]
fn test_external_command_suggestion() {
    use keyhint_core::GeneratorConfig;

    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.generator = GeneratorConfig {
        command: "sh".to_string(),
        args: vec![
            "-c".to_string(),
            "test -f input_events.txt && printf 'hi there\\nignored\\n' > out.txt".to_string(),
        ],
        working_dir: Some(dir.path().to_path_buf()),
        output_file: "out.txt".into(),
        ..GeneratorConfig::default()
    };
    let sink = RecordingSink::new();
    let mut session = Session::from_config(&config, sink.clone(), LogOverlay).unwrap();
    let mut clock = Clock(0);

    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Left);
    assert!(matches!(
        session.wait_for_generation(WAIT),
        Some(GenerationOutcome::Ready(ref s)) if s == "hi there"
    ));
    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Right);
    assert_eq!(typed_text(&sink), "hi there");
}

#[cfg(unix)]
#[test]
fn test_generator_finds_log_moved_out_of_its_directory() {
    use keyhint_core::GeneratorConfig;

    let dir = TempDir::new().unwrap();
    let work = dir.path().join("work");
    let logs = dir.path().join("logs");
    std::fs::create_dir_all(&work).unwrap();
    std::fs::create_dir_all(&logs).unwrap();

    let config = Config {
        log_file: logs.join("keys.jsonl"),
        key_delay_ms: 0,
        generator: GeneratorConfig {
            command: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "grep -q keyboard \"$KEYHINT_LOG_FILE\" && printf 'found\\n' > out.txt"
                    .to_string(),
            ],
            working_dir: Some(work),
            output_file: "out.txt".into(),
            ..GeneratorConfig::default()
        },
        ..Config::default()
    };
    let sink = RecordingSink::new();
    let mut session = Session::from_config(&config, sink.clone(), LogOverlay).unwrap();
    let mut clock = Clock(0);

    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Left);
    assert!(matches!(
        session.wait_for_generation(WAIT),
        Some(GenerationOutcome::Ready(ref s)) if s == "found"
    ));
}

// =========================================================================
// Gesture Detection
// =========================================================================

#[test]
fn test_copy_shortcut_is_not_a_gesture() {
    let dir = TempDir::new().unwrap();
    let (mut session, _sink) = session_with(&dir, "x");
    let mut clock = Clock(0);

    chord(&mut session, &mut clock, VirtualKey::CONTROL, Side::Left, VirtualKey(0x43));
    assert!(!session.coordinator().is_generating());
    assert!(session.wait_for_generation(Duration::from_millis(50)).is_none());
}

#[test]
fn test_tap_after_combination_fires_again() {
    let dir = TempDir::new().unwrap();
    let (mut session, _sink) = session_with(&dir, "x");
    let mut clock = Clock(0);

    chord(&mut session, &mut clock, VirtualKey::CONTROL, Side::Left, VirtualKey(0x56));
    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Left);
    assert!(session.coordinator().is_generating());
}

#[test]
fn test_ctrl_shift_chord_suppresses_both() {
    let dir = TempDir::new().unwrap();
    let (mut session, sink) = session_with(&dir, "x");
    let mut clock = Clock(0);

    session.process(clock.key(VirtualKey::CONTROL, Side::Left, false));
    session.process(clock.key(VirtualKey::SHIFT, Side::Left, false));
    session.process(clock.key(VirtualKey(0x54), Side::Unspecified, false));
    session.process(clock.key(VirtualKey(0x54), Side::Unspecified, true));
    session.process(clock.key(VirtualKey::SHIFT, Side::Left, true));
    session.process(clock.key(VirtualKey::CONTROL, Side::Left, true));

    assert!(!session.coordinator().is_generating());
    assert!(sink.events().is_empty());
}

#[test]
fn test_held_ctrl_auto_repeat_still_taps() {
    let dir = TempDir::new().unwrap();
    let (mut session, _sink) = session_with(&dir, "x");
    let mut clock = Clock(0);

    session.process(clock.key(VirtualKey::CONTROL, Side::Left, false));
    session.process(clock.repeat(VirtualKey::CONTROL, Side::Left));
    session.process(clock.repeat(VirtualKey::CONTROL, Side::Left));
    session.process(clock.key(VirtualKey::CONTROL, Side::Left, true));

    assert!(session.coordinator().is_generating());
}

#[test]
fn test_right_ctrl_tap_while_left_ctrl_held_after_combo_accepts() {
    let dir = TempDir::new().unwrap();
    let (mut session, sink) = session_with(&dir, "yes");
    let mut clock = Clock(0);

    tap(&mut session, &mut clock, VirtualKey::CONTROL, Side::Left);
    session.wait_for_generation(WAIT);

    session.process(clock.key(VirtualKey::CONTROL, Side::Left, false));
    tap(&mut session, &mut clock, VirtualKey::KEY_A, Side::Unspecified);
    session.process(clock.key(VirtualKey::CONTROL, Side::Right, false));
    session.process(clock.key(VirtualKey::CONTROL, Side::Right, true));
    session.process(clock.key(VirtualKey::CONTROL, Side::Left, true));

    assert_eq!(typed_text(&sink), "yes");
    assert!(!session.coordinator().is_generating());
}

// =========================================================================
// Event Log and History
// =========================================================================

#[test]
fn test_log_records_typing_and_clicks() {
    let dir = TempDir::new().unwrap();
    let (mut session, _sink) = session_with(&dir, "");
    let mut clock = Clock(0);

    chord(&mut session, &mut clock, VirtualKey::SHIFT, Side::Left, VirtualKey(0x31));
    session.process(clock.mouse(MouseButton::Right, false, (640, 480)));
    session.process(clock.mouse(MouseButton::Right, true, (640, 480)));

    let lines = read_log(&session);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1]["key"], "1");
    assert_eq!(lines[1]["char"], "!");
    assert_eq!(lines[0]["char"], serde_json::Value::Null);
    assert_eq!(lines[4]["action"], "rightdown");
    assert_eq!(lines[5]["action"], "rightup");
    assert_eq!(lines[5]["x"], 640);
    assert_eq!(lines[5]["y"], 480);
}

#[test]
fn test_caps_lock_toggle_changes_logged_case() {
    let dir = TempDir::new().unwrap();
    let (mut session, _sink) = session_with(&dir, "");
    let mut clock = Clock(0);

    tap(&mut session, &mut clock, VirtualKey::KEY_A, Side::Unspecified);
    tap(&mut session, &mut clock, VirtualKey::CAPITAL, Side::Unspecified);
    tap(&mut session, &mut clock, VirtualKey::KEY_A, Side::Unspecified);
    chord(&mut session, &mut clock, VirtualKey::SHIFT, Side::Right, VirtualKey::KEY_A);

    let chars: Vec<_> = read_log(&session)
        .into_iter()
        .filter(|line| line["key"] == "A" && line["action"] == "keydown")
        .map(|line| line["char"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(chars, vec!["a", "A", "a"]);
}

#[test]
fn test_escape_stops_session_after_logging() {
    let dir = TempDir::new().unwrap();
    let (mut session, _sink) = session_with(&dir, "");
    let mut clock = Clock(0);

    let events = vec![
        clock.key(VirtualKey::KEY_A, Side::Unspecified, false),
        clock.key(VirtualKey::KEY_A, Side::Unspecified, true),
        clock.key(VirtualKey::ESCAPE, Side::Unspecified, false),
        clock.key(VirtualKey::KEY_A, Side::Unspecified, false),
    ];
    let processed = events
        .into_iter()
        .take_while(|event| session.process(*event) == Control::Continue)
        .count();

    assert_eq!(processed, 2);
    assert_eq!(read_log(&session).len(), 3);
    assert_eq!(session.history().len(), 3);
}

#[test]
fn test_history_summary_counts() {
    let dir = TempDir::new().unwrap();
    let (mut session, _sink) = session_with(&dir, "");
    let mut clock = Clock(0);

    tap(&mut session, &mut clock, VirtualKey::MENU, Side::Left);
    tap(&mut session, &mut clock, VirtualKey::SPACE, Side::Unspecified);
    session.process(clock.mouse(MouseButton::Left, false, (1, 2)));

    let summary = session.summary();
    assert_eq!(summary.total, 5);
    assert_eq!(summary.keyboard, 4);
    assert_eq!(summary.mouse, 1);
    assert_eq!(summary.special, 2);

    let text = summary.to_string();
    assert!(text.contains("Total events stored: 5"));
    assert!(text.contains("MOUSE: left DOWN at (1, 2)"));
}
