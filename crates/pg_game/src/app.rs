//! Screen state machine and the per-tick match driver.
//!
//! `App` owns everything the game knows: screen tag, viewport, widgets,
//! committed names, the edit buffer, fighters and weapons. The window backend
//! feeds it one tick at a time and draws whatever `render` records.
//!
//! Transitions:
//!
//!   Menu -> Prep -> Customize -> Playing -> GameOver -> Prep -> ...
//!
//! A close request quits from any screen. The fullscreen toggle is accepted on
//! every screen and never changes the tag.

use pg_core::input::{InputEvent, InputState, Key};

use crate::collision::Aabb;
use crate::combat;
use crate::constants::{
    HEALTH_BAR_HEIGHT, HEALTH_BAR_MARGIN, HEALTH_BAR_SCALE, HEALTH_BAR_TOP, MAX_HEALTH,
};
use crate::controls::{self, DEBUG_PANEL_KEY, FULLSCREEN_KEY};
use crate::draw::{Canvas, Draw, FontSize, Rgb, TextAlign};
use crate::fighter::{Fighter, FighterId, Weapon};
use crate::physics::{self, Bounds};
use crate::text_entry::{Roster, TextEntryState};
use crate::viewport::{Background, DisplayQuery, ViewportChange, ViewportState};
use crate::widget::{Anchor, Button, InputBox, Placement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Prep,
    Customize,
    Playing,
    GameOver,
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Screen::Menu => "Menu",
            Screen::Prep => "Prep",
            Screen::Customize => "Customize",
            Screen::Playing => "Playing",
            Screen::GameOver => "GameOver",
        };
        f.write_str(name)
    }
}

/// Requests for the window backend, produced by one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickActions {
    pub quit: bool,
    /// Final viewport after any toggles this tick.
    pub viewport: Option<ViewportChange>,
    pub toggle_debug: bool,
}

/// Every widget the game shows. Positions persist across rounds and are
/// recomputed in place on viewport changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Ui {
    pub start: Button,
    pub play: Button,
    pub start_fight: Button,
    pub back_to_lobby: Button,
    pub fullscreen: Button,
    pub name_fields: [InputBox; 2],
}

impl Ui {
    pub fn new(viewport: &ViewportState) -> Self {
        Self {
            start: Button::new(
                "Start Game",
                Placement::new(Anchor::Center, -100, 0, 200, 50),
                viewport,
            ),
            play: Button::new(
                "Play",
                Placement::new(Anchor::Center, -100, 100, 200, 50),
                viewport,
            ),
            start_fight: Button::new(
                "Start Fight",
                Placement::new(Anchor::Center, -100, 130, 200, 50),
                viewport,
            ),
            back_to_lobby: Button::new(
                "Back to Lobby",
                Placement::new(Anchor::Center, -100, 100, 200, 50),
                viewport,
            ),
            fullscreen: Button::new(
                "Fullscreen",
                Placement::new(Anchor::BottomRight, -130, -60, 120, 40),
                viewport,
            )
            .with_short_label("[ ]", viewport),
            name_fields: [
                InputBox::new(
                    "Fighter 1 name",
                    Placement::new(Anchor::Center, -150, -90, 300, 44),
                    viewport,
                ),
                InputBox::new(
                    "Fighter 2 name",
                    Placement::new(Anchor::Center, -150, 20, 300, 44),
                    viewport,
                ),
            ],
        }
    }

    pub fn reflow(&mut self, viewport: &ViewportState) {
        for button in self.buttons_mut() {
            button.reflow(viewport);
        }
        for field in &mut self.name_fields {
            field.reflow(viewport);
        }
    }

    /// Every widget rectangle, buttons first.
    #[cfg(test)]
    pub fn rects(&self) -> Vec<Aabb> {
        let buttons = [
            &self.start,
            &self.play,
            &self.start_fight,
            &self.back_to_lobby,
            &self.fullscreen,
        ];
        buttons
            .iter()
            .map(|b| b.rect)
            .chain(self.name_fields.iter().map(|f| f.rect))
            .collect()
    }

    fn buttons_mut(&mut self) -> [&mut Button; 5] {
        [
            &mut self.start,
            &mut self.play,
            &mut self.start_fight,
            &mut self.back_to_lobby,
            &mut self.fullscreen,
        ]
    }

    fn field_at(&self, x: f32, y: f32) -> Option<FighterId> {
        FighterId::ALL
            .into_iter()
            .find(|id| self.name_fields[id.index()].hit(x, y))
    }
}

pub struct App {
    screen: Screen,
    winner: Option<FighterId>,
    viewport: ViewportState,
    background: Background,
    ui: Ui,
    roster: Roster,
    text_entry: TextEntryState,
    fighters: [Fighter; 2],
    weapons: [Weapon; 2],
    pointer: (f32, f32),
}

impl App {
    pub fn new(viewport: ViewportState) -> Self {
        let roster = Roster::new();
        let fighters = spawn_fighters(&viewport, &roster);
        Self {
            screen: Screen::Menu,
            winner: None,
            background: Background::covering(&viewport),
            ui: Ui::new(&viewport),
            roster,
            text_entry: TextEntryState::new(),
            fighters,
            weapons: FighterId::ALL.map(Weapon::new),
            viewport,
            pointer: (-1.0, -1.0),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn fighters(&self) -> &[Fighter; 2] {
        &self.fighters
    }

    /// Run one fixed simulation tick: drain `events` in order, then, if a
    /// match is on, step it with the keys held in `input`.
    pub fn tick(
        &mut self,
        input: &InputState,
        events: &[InputEvent],
        display: &dyn DisplayQuery,
    ) -> TickActions {
        let mut actions = TickActions::default();
        for event in events {
            match *event {
                InputEvent::CloseRequested => {
                    log::info!("Close requested on {}", self.screen);
                    actions.quit = true;
                    return actions;
                }
                InputEvent::KeyDown(key) if key == FULLSCREEN_KEY => {
                    actions.viewport = Some(self.toggle_fullscreen(display));
                }
                InputEvent::KeyDown(key) if key == DEBUG_PANEL_KEY => {
                    actions.toggle_debug = !actions.toggle_debug;
                }
                InputEvent::KeyDown(key) => self.key_down(key),
                InputEvent::Text(ch) => {
                    if self.screen == Screen::Customize {
                        self.text_entry.type_char(ch);
                    }
                }
                InputEvent::PointerMoved { x, y } => self.pointer_moved(x as f32, y as f32),
                InputEvent::PointerDown { x, y } => {
                    if let Some(change) = self.pointer_down(x as f32, y as f32, display) {
                        actions.viewport = Some(change);
                    }
                }
            }
        }

        if self.screen == Screen::Playing {
            self.step_match(input);
        }
        actions
    }

    /// Switch between windowed and fullscreen, then rescale the background,
    /// re-anchor every widget and pull fighters back inside the stage.
    pub fn toggle_fullscreen(&mut self, display: &dyn DisplayQuery) -> ViewportChange {
        let change = self.viewport.toggle_fullscreen(display);
        self.background.rescale(&self.viewport);
        self.ui.reflow(&self.viewport);

        let bounds = Bounds::of(&self.viewport);
        for (fighter, weapon) in self.fighters.iter_mut().zip(self.weapons.iter_mut()) {
            physics::clamp_into(fighter, bounds);
            weapon.follow(fighter);
        }
        self.refresh_hover();
        change
    }

    fn key_down(&mut self, key: Key) {
        if self.screen == Screen::Customize {
            self.text_entry.key(key, &mut self.roster);
        }
    }

    fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
        self.refresh_hover();
    }

    fn refresh_hover(&mut self) {
        let (x, y) = self.pointer;
        for button in self.ui.buttons_mut() {
            button.pointer_moved(x, y);
        }
    }

    fn pointer_down(
        &mut self,
        x: f32,
        y: f32,
        display: &dyn DisplayQuery,
    ) -> Option<ViewportChange> {
        self.pointer = (x, y);
        if self.screen == Screen::Customize {
            let hit = self.ui.field_at(x, y);
            self.text_entry.click(hit, &mut self.roster);
        }

        if self.screen != Screen::Playing && self.ui.fullscreen.pressed(x, y) {
            return Some(self.toggle_fullscreen(display));
        }

        match self.screen {
            Screen::Menu => {
                if self.ui.start.pressed(x, y) {
                    self.set_screen(Screen::Prep);
                }
            }
            Screen::Prep => {
                if self.ui.play.pressed(x, y) {
                    self.set_screen(Screen::Customize);
                }
            }
            Screen::Customize => {
                if self.ui.start_fight.pressed(x, y) {
                    self.start_round();
                }
            }
            Screen::Playing => {}
            Screen::GameOver => {
                if self.ui.back_to_lobby.pressed(x, y) {
                    self.reset_round();
                    self.set_screen(Screen::Prep);
                }
            }
        }
        None
    }

    fn start_round(&mut self) {
        self.text_entry.finish(&mut self.roster);
        self.reset_round();
        log::info!(
            "Round start: {} vs {}",
            self.fighters[0].name,
            self.fighters[1].name
        );
        self.set_screen(Screen::Playing);
    }

    fn reset_round(&mut self) {
        self.fighters = spawn_fighters(&self.viewport, &self.roster);
        self.weapons = FighterId::ALL.map(Weapon::new);
        self.winner = None;
    }

    fn set_screen(&mut self, next: Screen) {
        log::info!("Screen {} -> {}", self.screen, next);
        self.screen = next;
        self.refresh_hover();
    }

    fn step_match(&mut self, input: &InputState) {
        let bounds = Bounds::of(&self.viewport);
        for id in FighterId::ALL {
            let intent = controls::bindings(id).intent(input);
            physics::advance(&mut self.fighters[id.index()], intent, bounds);
        }
        for id in FighterId::ALL {
            let attack_held = controls::bindings(id).attack_held(input);
            let i = id.index();
            combat::update_weapon(&mut self.weapons[i], &self.fighters[i], attack_held);
        }
        for hit in combat::resolve_hits(&self.weapons, &mut self.fighters) {
            log::debug!(
                "{} hits {} for {} (health {})",
                hit.attacker,
                hit.target,
                hit.damage,
                self.fighters[hit.target.index()].health
            );
        }
        debug_assert!(self.weapons.iter().all(|w| w.is_stowed() != w.active));

        // Fighter 1 is checked first, so a double knockout goes to Fighter 2.
        let winner = if self.fighters[0].is_defeated() {
            Some(FighterId::Two)
        } else if self.fighters[1].is_defeated() {
            Some(FighterId::One)
        } else {
            None
        };
        if let Some(winner) = winner {
            log::info!(
                "Round over: {} ({}) wins",
                self.fighters[winner.index()].name,
                winner
            );
            self.winner = Some(winner);
            self.set_screen(Screen::GameOver);
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        canvas.blit_background(&self.background, 0.0, 0.0);
        match self.screen {
            Screen::Menu => {
                self.draw_headline(canvas, "Pixel Gladiators");
                self.ui.start.draw(canvas);
            }
            Screen::Prep => self.draw_lobby(canvas),
            Screen::Customize => self.draw_customize(canvas),
            Screen::Playing => self.draw_match(canvas),
            Screen::GameOver => {
                let name = self
                    .winner
                    .map(|id| self.fighters[id.index()].name.as_str())
                    .unwrap_or_default();
                self.draw_headline(canvas, &format!("{name} Wins!"));
                self.ui.back_to_lobby.draw(canvas);
            }
        }
        if self.screen != Screen::Playing {
            self.ui.fullscreen.draw(canvas);
        }
    }

    fn draw_headline(&self, canvas: &mut dyn Canvas, text: &str) {
        canvas.draw_text(
            text,
            self.viewport.width as f32 / 2.0,
            self.viewport.height as f32 / 3.0,
            TextAlign::Center,
            FontSize::Title,
            Rgb::WHITE,
        );
    }

    fn draw_lobby(&self, canvas: &mut dyn Canvas) {
        let (w, h) = (self.viewport.width as f32, self.viewport.height as f32);
        canvas.draw_text(
            "Lobby",
            w / 2.0,
            h / 8.0,
            TextAlign::Center,
            FontSize::Title,
            Rgb::WHITE,
        );
        for id in FighterId::ALL {
            let column_x = w * (1 + 2 * id.index()) as f32 / 4.0;
            let swatch = Aabb::centered_on(column_x, h / 3.0, 50.0, 50.0);
            canvas.fill_rect(swatch, id.color());
            let lines = [
                self.roster.name(id).to_owned(),
                id.to_string(),
                controls::bindings(id).summary.to_owned(),
            ];
            for (row, line) in lines.iter().enumerate() {
                canvas.draw_text(
                    line,
                    column_x,
                    swatch.bottom() + 25.0 + row as f32 * 30.0,
                    TextAlign::Center,
                    FontSize::Body,
                    Rgb::WHITE,
                );
            }
        }
        self.ui.play.draw(canvas);
    }

    fn draw_customize(&self, canvas: &mut dyn Canvas) {
        canvas.draw_text(
            "Customize",
            self.viewport.width as f32 / 2.0,
            self.viewport.height as f32 / 8.0,
            TextAlign::Center,
            FontSize::Title,
            Rgb::WHITE,
        );
        for id in FighterId::ALL {
            let focused = self.text_entry.focus() == Some(id);
            let text = if focused {
                self.text_entry.buffer()
            } else {
                self.roster.name(id)
            };
            self.ui.name_fields[id.index()].draw_with(canvas, text, focused);
        }
        self.ui.start_fight.draw(canvas);
    }

    fn draw_match(&self, canvas: &mut dyn Canvas) {
        for fighter in &self.fighters {
            fighter.draw(canvas);
        }
        for weapon in &self.weapons {
            weapon.draw(canvas);
        }

        let w = self.viewport.width as f32;
        let full_bar = MAX_HEALTH as f32 * HEALTH_BAR_SCALE;
        for fighter in &self.fighters {
            let left = match fighter.id {
                FighterId::One => HEALTH_BAR_MARGIN,
                FighterId::Two => w - HEALTH_BAR_MARGIN - full_bar,
            };
            canvas.fill_rect(
                Aabb::new(left, HEALTH_BAR_TOP, full_bar, HEALTH_BAR_HEIGHT),
                Rgb::BAR_BACKING,
            );
            canvas.fill_rect(
                Aabb::new(
                    left,
                    HEALTH_BAR_TOP,
                    fighter.health as f32 * HEALTH_BAR_SCALE,
                    HEALTH_BAR_HEIGHT,
                ),
                fighter.color,
            );
            canvas.draw_text(
                &fighter.health.to_string(),
                left + fighter.health as f32,
                HEALTH_BAR_TOP - 5.0,
                TextAlign::TopLeft,
                FontSize::Body,
                Rgb::BLACK,
            );
            canvas.draw_text(
                &fighter.name,
                left,
                HEALTH_BAR_TOP + HEALTH_BAR_HEIGHT + 5.0,
                TextAlign::TopLeft,
                FontSize::Body,
                Rgb::WHITE,
            );
        }
    }
}

#[cfg(test)]
impl App {
    pub fn winner(&self) -> Option<FighterId> {
        self.winner
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn text_entry(&self) -> &TextEntryState {
        &self.text_entry
    }

    pub fn weapons(&self) -> &[Weapon; 2] {
        &self.weapons
    }
}

fn spawn_fighters(viewport: &ViewportState, roster: &Roster) -> [Fighter; 2] {
    FighterId::ALL.map(|id| Fighter::spawn(id, viewport.width, viewport.height, roster.name(id)))
}
