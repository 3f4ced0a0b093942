//! Scripted input runs: JSON tick scripts drive whole matches headlessly so
//! invariants and determinism can be checked without a window.

use pg_core::input::{InputState, Key};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::app::{App, Screen};
use crate::constants::{FIGHTER_WIDTH, MAX_HEALTH};
use crate::viewport::{DisplayQuery, ViewportState};

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_viewport")]
    pub viewport: (u32, u32),
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub held: Vec<ReplayKey>,
    /// Press F11 on the first tick of this frame.
    #[serde(default)]
    pub toggle_fullscreen: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplayKey {
    W,
    A,
    S,
    D,
    Space,
    Up,
    Down,
    Left,
    Right,
    Enter,
}

impl From<ReplayKey> for Key {
    fn from(key: ReplayKey) -> Key {
        match key {
            ReplayKey::W => Key::W,
            ReplayKey::A => Key::A,
            ReplayKey::S => Key::S,
            ReplayKey::D => Key::D,
            ReplayKey::Space => Key::Space,
            ReplayKey::Up => Key::Up,
            ReplayKey::Down => Key::Down,
            ReplayKey::Left => Key::Left,
            ReplayKey::Right => Key::Right,
            ReplayKey::Enter => Key::Enter,
        }
    }
}

/// One tick of scripted input.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayTick {
    pub held: Vec<Key>,
    pub toggle_fullscreen: bool,
}

impl ReplaySequence {
    pub fn expanded_ticks(&self) -> Vec<ReplayTick> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for i in 0..frame.repeat.max(1) {
                out.push(ReplayTick {
                    held: frame.held.iter().map(|&k| k.into()).collect(),
                    toggle_fullscreen: frame.toggle_fullscreen && i == 0,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.viewport.0 == 0 || replay.viewport.1 == 0 {
        return Err("Replay validation failed: viewport must be non-empty".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_viewport() -> (u32, u32) {
    (800, 600)
}

const fn default_repeat() -> u32 {
    1
}

struct ReplayDisplay;

impl DisplayQuery for ReplayDisplay {
    fn native_resolution(&self) -> (u32, u32) {
        (1280, 720)
    }
}

/// Click through Menu, Prep and Customize, then feed the script tick by tick
/// until it runs out or the round ends. Invariants are checked after every tick.
pub fn play_match(replay: &ReplaySequence) -> App {
    let display = ReplayDisplay;
    let mut app = App::new(ViewportState::windowed(replay.viewport.0, replay.viewport.1));
    let mut input = InputState::new();

    for rect in [
        app.ui().start.rect,
        app.ui().play.rect,
        app.ui().start_fight.rect,
    ] {
        let (x, y) = rect.center();
        input.pointer_moved(x as f64, y as f64);
        input.pointer_down();
        let events = input.take_events();
        app.tick(&input, &events, &display);
    }
    assert_eq!(app.screen(), Screen::Playing);

    for tick in replay.expanded_ticks() {
        if app.screen() != Screen::Playing {
            break;
        }
        input.release_all();
        for &key in &tick.held {
            input.key_down(key);
        }
        if tick.toggle_fullscreen {
            input.key_down(Key::F11);
        }
        let events = input.take_events();
        app.tick(&input, &events, &display);
        assert_invariants(&app);
    }
    app
}

pub fn assert_invariants(app: &App) {
    let max_x = app.viewport().width as f32 - FIGHTER_WIDTH;
    for fighter in app.fighters() {
        assert!(fighter.health <= MAX_HEALTH);
        assert!(
            (0.0..=max_x).contains(&fighter.aabb.x),
            "{} left the stage at x={}",
            fighter.id,
            fighter.aabb.x
        );
    }
    for weapon in app.weapons() {
        assert_eq!(weapon.is_stowed(), !weapon.active);
    }
    assert_eq!(
        app.screen() == Screen::GameOver,
        app.winner().is_some(),
        "winner is set exactly on the GameOver screen"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fighter::FighterId;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "pg_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn load(name_hint: &str, json: &str) -> ReplaySequence {
        let path = temp_file_path(name_hint);
        fs::write(&path, json).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        let _ = fs::remove_file(path);
        replay
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let replay = load(
            "parse",
            r#"{
              "frames": [
                { "held": ["d", "space"], "repeat": 3 },
                { "toggle_fullscreen": true, "repeat": 2 }
              ]
            }"#,
        );
        assert_eq!(replay.viewport, (800, 600));
        let ticks = replay.expanded_ticks();
        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks[0].held, vec![Key::D, Key::Space]);
        assert!(ticks[3].toggle_fullscreen);
        assert!(!ticks[4].toggle_fullscreen);
    }

    #[test]
    fn replay_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_unknown_keys() {
        let path = temp_file_path("bad_key");
        fs::write(&path, r#"{ "frames": [ { "held": ["f11"] } ] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("unknown key should fail");
        assert!(err.contains("Failed to parse replay JSON"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn scripted_rush_knocks_out_fighter_two() {
        let replay = load(
            "rush",
            r#"{
              "frames": [
                { "held": ["d", "space"], "repeat": 110 },
                { "held": ["space"], "repeat": 60 }
              ]
            }"#,
        );
        let app = play_match(&replay);
        assert_eq!(app.screen(), Screen::GameOver);
        assert_eq!(app.winner(), Some(FighterId::One));
        assert_eq!(app.fighters()[1].health, 0);
        assert_eq!(app.fighters()[0].health, MAX_HEALTH);
    }

    #[test]
    fn scramble_with_fullscreen_toggles_keeps_invariants() {
        let replay = load(
            "scramble",
            r#"{
              "frames": [
                { "held": ["right", "up", "enter"], "repeat": 40 },
                { "held": ["a", "w"], "repeat": 30, "toggle_fullscreen": true },
                { "held": ["d", "right", "space"], "repeat": 200 },
                { "held": ["left", "s", "down"], "repeat": 20, "toggle_fullscreen": true },
                { "held": ["a", "left", "w", "up"], "repeat": 200 },
                { "held": [], "repeat": 10, "toggle_fullscreen": true }
              ]
            }"#,
        );
        let app = play_match(&replay);
        assert_invariants(&app);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = load(
            "deterministic",
            r#"{
              "viewport": [640, 480],
              "frames": [
                { "held": ["d", "w"], "repeat": 45 },
                { "held": ["left", "up", "enter"], "repeat": 30 },
                { "held": ["space", "enter"], "repeat": 90, "toggle_fullscreen": true },
                { "held": ["a"], "repeat": 30 }
              ]
            }"#,
        );
        let run_a = play_match(&replay);
        let run_b = play_match(&replay);

        assert_eq!(run_a.screen(), run_b.screen());
        assert_eq!(run_a.winner(), run_b.winner());
        assert_eq!(run_a.viewport(), run_b.viewport());
        assert_eq!(run_a.fighters(), run_b.fighters());
        assert_eq!(run_a.weapons(), run_b.weapons());
    }
}
