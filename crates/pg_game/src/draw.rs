//! Backend-neutral drawing surface.
//!
//! Game state renders itself into a `Canvas`. The window backend collects a
//! `DrawList` and turns it into quads and overlay text; tests inspect the same
//! list directly.

use crate::collision::Aabb;
use crate::constants::{BODY_FONT_PX, TITLE_FONT_PX};
use crate::viewport::Background;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const BUTTON: Rgb = Rgb(100, 200, 100);
    pub const FIELD: Rgb = Rgb(200, 200, 200);
    pub const BAR_BACKING: Rgb = Rgb(60, 60, 60);

    /// Add `amount` to every channel, clamped at 255.
    pub fn lighten(self, amount: u8) -> Rgb {
        Rgb(
            self.0.saturating_add(amount),
            self.1.saturating_add(amount),
            self.2.saturating_add(amount),
        )
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    TopLeft,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Body,
    Title,
}

impl FontSize {
    pub fn px(self) -> f32 {
        match self {
            FontSize::Body => BODY_FONT_PX,
            FontSize::Title => TITLE_FONT_PX,
        }
    }
}

pub trait Canvas {
    fn blit_background(&mut self, background: &Background, x: f32, y: f32);
    fn fill_rect(&mut self, rect: Aabb, color: Rgb);
    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        align: TextAlign,
        size: FontSize,
        color: Rgb,
    );
}

/// Anything that knows how to put itself on a canvas.
pub trait Draw {
    fn draw(&self, canvas: &mut dyn Canvas);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Background {
        x: f32,
        y: f32,
        width: u32,
        height: u32,
    },
    Rect {
        rect: Aabb,
        color: Rgb,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        align: TextAlign,
        size: FontSize,
        color: Rgb,
    },
}

/// Recorded frame, in submission order.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

#[cfg(test)]
impl DrawList {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text == needle)
    }

    pub fn rects(&self) -> impl Iterator<Item = (&Aabb, Rgb)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Rect { rect, color } => Some((rect, *color)),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn blit_background(&mut self, background: &Background, x: f32, y: f32) {
        self.commands.push(DrawCommand::Background {
            x,
            y,
            width: background.width,
            height: background.height,
        });
    }

    fn fill_rect(&mut self, rect: Aabb, color: Rgb) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        align: TextAlign,
        size: FontSize,
        color: Rgb,
    ) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            x,
            y,
            align,
            size,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lighten_clamps_each_channel() {
        assert_eq!(Rgb::BUTTON.lighten(30), Rgb(130, 230, 130));
        assert_eq!(Rgb(240, 10, 255).lighten(30), Rgb(255, 40, 255));
    }

    #[test]
    fn draw_list_records_in_order() {
        let mut list = DrawList::new();
        list.blit_background(&Background { width: 800, height: 600 }, 0.0, 0.0);
        list.fill_rect(Aabb::new(1.0, 2.0, 3.0, 4.0), Rgb::RED);
        list.draw_text("hi", 5.0, 6.0, TextAlign::Center, FontSize::Body, Rgb::WHITE);

        assert_eq!(list.commands.len(), 3);
        assert!(matches!(
            list.commands[0],
            DrawCommand::Background { width: 800, height: 600, .. }
        ));
        assert_eq!(list.rects().count(), 1);
        assert!(list.has_text("hi"));
        assert!(!list.has_text("h"));
    }
}
