//! Clickable screen widgets positioned relative to the viewport.
//!
//! A widget stores its placement (anchor plus integer offsets) and derives its
//! rectangle from the current viewport, so reflowing twice through the same
//! viewport always lands on the same rectangle.

use crate::collision::Aabb;
use crate::constants::{BUTTON_HOVER_LIGHTEN, COMPACT_VIEWPORT_WIDTH};
use crate::draw::{Canvas, Draw, FontSize, Rgb, TextAlign};
use crate::viewport::ViewportState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub anchor: Anchor,
    pub dx: i32,
    pub dy: i32,
    pub width: i32,
    pub height: i32,
}

impl Placement {
    pub const fn new(anchor: Anchor, dx: i32, dy: i32, width: i32, height: i32) -> Self {
        Self {
            anchor,
            dx,
            dy,
            width,
            height,
        }
    }

    pub fn resolve(&self, viewport: &ViewportState) -> Aabb {
        let (ax, ay) = match self.anchor {
            Anchor::Center => (viewport.width as i32 / 2, viewport.height as i32 / 2),
            Anchor::BottomRight => (viewport.width as i32, viewport.height as i32),
        };
        Aabb::new(
            (ax + self.dx) as f32,
            (ay + self.dy) as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub placement: Placement,
    pub rect: Aabb,
    pub label: String,
    /// Shown instead of `label` while the viewport is narrow.
    pub short_label: Option<String>,
    pub compact: bool,
    pub hovered: bool,
    pub color: Rgb,
}

impl Button {
    pub fn new(label: &str, placement: Placement, viewport: &ViewportState) -> Self {
        let mut button = Self {
            placement,
            rect: placement.resolve(viewport),
            label: label.to_owned(),
            short_label: None,
            compact: false,
            hovered: false,
            color: Rgb::BUTTON,
        };
        button.reflow(viewport);
        button
    }

    pub fn with_short_label(mut self, short: &str, viewport: &ViewportState) -> Self {
        self.short_label = Some(short.to_owned());
        self.reflow(viewport);
        self
    }

    pub fn reflow(&mut self, viewport: &ViewportState) {
        self.rect = self.placement.resolve(viewport);
        self.compact = self.short_label.is_some() && viewport.width < COMPACT_VIEWPORT_WIDTH;
    }

    pub fn display_label(&self) -> &str {
        match (&self.short_label, self.compact) {
            (Some(short), true) => short,
            _ => &self.label,
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.hovered = self.rect.contains_point(x, y);
    }

    /// Press at `(x, y)`. Also refreshes hover, since a press can arrive
    /// without a preceding move.
    pub fn pressed(&mut self, x: f32, y: f32) -> bool {
        self.pointer_moved(x, y);
        self.hovered
    }
}

impl Draw for Button {
    fn draw(&self, canvas: &mut dyn Canvas) {
        let color = if self.hovered {
            self.color.lighten(BUTTON_HOVER_LIGHTEN)
        } else {
            self.color
        };
        canvas.fill_rect(self.rect, color);
        let (cx, cy) = self.rect.center();
        canvas.draw_text(
            self.display_label(),
            cx,
            cy,
            TextAlign::Center,
            FontSize::Body,
            Rgb::BLACK,
        );
    }
}

/// Single-line text box. Its contents are owned by the text entry state.
#[derive(Debug, Clone, PartialEq)]
pub struct InputBox {
    pub placement: Placement,
    pub rect: Aabb,
    pub caption: String,
}

impl InputBox {
    pub fn new(caption: &str, placement: Placement, viewport: &ViewportState) -> Self {
        Self {
            placement,
            rect: placement.resolve(viewport),
            caption: caption.to_owned(),
        }
    }

    pub fn reflow(&mut self, viewport: &ViewportState) {
        self.rect = self.placement.resolve(viewport);
    }

    pub fn hit(&self, x: f32, y: f32) -> bool {
        self.rect.contains_point(x, y)
    }

    pub fn draw_with(&self, canvas: &mut dyn Canvas, text: &str, focused: bool) {
        let (fill, shown) = if focused {
            (Rgb::WHITE, format!("{text}_"))
        } else {
            (Rgb::FIELD, text.to_owned())
        };
        canvas.draw_text(
            &self.caption,
            self.rect.x,
            self.rect.y - 30.0,
            TextAlign::TopLeft,
            FontSize::Body,
            Rgb::WHITE,
        );
        canvas.fill_rect(self.rect, fill);
        canvas.draw_text(
            &shown,
            self.rect.x + 10.0,
            self.rect.y + 10.0,
            TextAlign::TopLeft,
            FontSize::Body,
            Rgb::BLACK,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawList;

    fn windowed() -> ViewportState {
        ViewportState::windowed(800, 600)
    }

    #[test]
    fn placement_resolves_against_anchor() {
        let viewport = windowed();
        let center = Placement::new(Anchor::Center, -100, 0, 200, 50).resolve(&viewport);
        assert_eq!(center, Aabb::new(300.0, 300.0, 200.0, 50.0));

        let corner = Placement::new(Anchor::BottomRight, -130, -60, 120, 40).resolve(&viewport);
        assert_eq!(corner, Aabb::new(670.0, 540.0, 120.0, 40.0));
    }

    #[test]
    fn hover_lightens_fill() {
        let viewport = windowed();
        let mut button = Button::new(
            "Start",
            Placement::new(Anchor::Center, -100, 0, 200, 50),
            &viewport,
        );
        button.pointer_moved(400.0, 320.0);
        assert!(button.hovered);

        let mut list = DrawList::new();
        button.draw(&mut list);
        let (_, color) = list.rects().next().unwrap();
        assert_eq!(color, Rgb(130, 230, 130));
        assert!(list.has_text("Start"));

        button.pointer_moved(0.0, 0.0);
        assert!(!button.hovered);
    }

    #[test]
    fn pressed_outside_is_not_a_click() {
        let viewport = windowed();
        let mut button = Button::new(
            "Start",
            Placement::new(Anchor::Center, -100, 0, 200, 50),
            &viewport,
        );
        assert!(!button.pressed(10.0, 10.0));
        assert!(button.pressed(300.0, 300.0));
    }

    #[test]
    fn short_label_only_on_narrow_viewports() {
        let mut viewport = windowed();
        let mut button = Button::new(
            "Fullscreen",
            Placement::new(Anchor::BottomRight, -130, -60, 120, 40),
            &viewport,
        )
        .with_short_label("[ ]", &viewport);
        assert_eq!(button.display_label(), "[ ]");

        viewport.width = 1920;
        viewport.height = 1080;
        button.reflow(&viewport);
        assert_eq!(button.display_label(), "Fullscreen");
        assert_eq!(button.rect, Aabb::new(1790.0, 1020.0, 120.0, 40.0));
    }

    #[test]
    fn focused_input_box_shows_caret() {
        let viewport = windowed();
        let field = InputBox::new(
            "Fighter 1",
            Placement::new(Anchor::Center, -150, -70, 300, 44),
            &viewport,
        );
        let mut list = DrawList::new();
        field.draw_with(&mut list, "Ann", true);
        assert!(list.has_text("Ann_"));
        assert!(list.has_text("Fighter 1"));
    }
}
