//! Name entry on the customize screen.
//!
//! At most one field has focus. Focusing a field seeds the edit buffer with
//! that fighter's committed name; edits stay in the buffer until Enter or a
//! click elsewhere commits them. Enter on an empty buffer restores the default
//! name, while a click elsewhere with an empty buffer keeps the old one.

use pg_core::input::Key;

use crate::constants::NAME_MAX_CHARS;
use crate::fighter::FighterId;

/// Committed fighter names, carried across rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: [String; 2],
}

impl Roster {
    pub fn new() -> Self {
        Self {
            names: FighterId::ALL.map(|id| id.default_name().to_owned()),
        }
    }

    pub fn name(&self, id: FighterId) -> &str {
        &self.names[id.index()]
    }

    fn set(&mut self, id: FighterId, name: &str) {
        log::info!("{} is now \"{}\"", id, name);
        self.names[id.index()] = name.to_owned();
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEntryState {
    focus: Option<FighterId>,
    buffer: String,
}

impl TextEntryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Option<FighterId> {
        self.focus
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Pointer press on the customize screen. `hit` is the field under the
    /// pointer, if any.
    pub fn click(&mut self, hit: Option<FighterId>, roster: &mut Roster) {
        match hit {
            Some(id) if self.focus == Some(id) => {}
            Some(id) => {
                self.commit_if_non_empty(roster);
                self.focus = Some(id);
                self.buffer = roster.name(id).to_owned();
            }
            None => {
                self.commit_if_non_empty(roster);
                self.blur();
            }
        }
    }

    pub fn type_char(&mut self, ch: char) {
        if self.focus.is_some() && self.buffer.chars().count() < NAME_MAX_CHARS {
            self.buffer.push(ch);
        }
    }

    pub fn key(&mut self, key: Key, roster: &mut Roster) {
        if self.focus.is_none() {
            return;
        }
        match key {
            Key::Backspace => {
                self.buffer.pop();
            }
            Key::Enter => {
                if let Some(id) = self.focus {
                    if self.buffer.is_empty() {
                        roster.set(id, id.default_name());
                    } else {
                        roster.set(id, &self.buffer);
                    }
                }
                self.blur();
            }
            Key::Escape => self.blur(),
            _ => {}
        }
    }

    /// Commit the buffer and drop focus, as a click outside both fields would.
    pub fn finish(&mut self, roster: &mut Roster) {
        self.click(None, roster);
    }

    fn commit_if_non_empty(&mut self, roster: &mut Roster) {
        if let Some(id) = self.focus {
            if !self.buffer.is_empty() {
                roster.set(id, &self.buffer);
            }
        }
    }

    fn blur(&mut self) {
        self.focus = None;
        self.buffer.clear();
    }
}
