//! Turns a recorded `DrawList` into a quad mesh plus overlay text.
//!
//! Rectangles sample a 1x1 white texture and the background samples its own,
//! so the whole frame goes through one pipeline. Consecutive quads on the same
//! texture collapse into a single indexed draw.

use pg_overlay::{TextAnchor, TextItem};
use pg_render::SpriteVertex;

use crate::draw::{DrawCommand, DrawList, Rgb, TextAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Blank,
    Background,
}

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub texture: TextureSlot,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct FrameMesh {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
    pub texts: Vec<TextItem>,
}

impl FrameMesh {
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

pub fn build_frame(list: &DrawList) -> FrameMesh {
    let mut mesh = FrameMesh::default();
    for command in &list.commands {
        match command {
            DrawCommand::Background {
                x,
                y,
                width,
                height,
            } => add_quad(
                &mut mesh,
                TextureSlot::Background,
                SpriteVertex::quad(*x, *y, *width as f32, *height as f32, [1.0; 4]),
            ),
            DrawCommand::Rect { rect, color } => add_quad(
                &mut mesh,
                TextureSlot::Blank,
                SpriteVertex::quad(rect.x, rect.y, rect.w, rect.h, linear_color(*color)),
            ),
            DrawCommand::Text {
                text,
                x,
                y,
                align,
                size,
                color,
            } => mesh.texts.push(TextItem {
                text: text.clone(),
                x: *x,
                y: *y,
                anchor: match align {
                    TextAlign::TopLeft => TextAnchor::TopLeft,
                    TextAlign::Center => TextAnchor::Center,
                },
                size_px: size.px(),
                color: color.to_array(),
            }),
        }
    }
    mesh
}

fn add_quad(mesh: &mut FrameMesh, texture: TextureSlot, corners: [SpriteVertex; 4]) {
    let base_index = mesh.vertices.len() as u32;
    mesh.vertices.extend_from_slice(&corners);

    let draw_start = mesh.indices.len() as u32;
    mesh.indices.extend_from_slice(&[
        base_index,
        base_index + 1,
        base_index + 2,
        base_index,
        base_index + 2,
        base_index + 3,
    ]);
    push_draw_call(&mut mesh.draw_calls, texture, draw_start, 6);
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture: TextureSlot,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if last.texture == texture && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture,
        index_start,
        index_count,
    });
}

/// The surface is sRGB, so vertex colors are supplied in linear space.
fn linear_color(color: Rgb) -> [f32; 4] {
    let [r, g, b] = color.to_array();
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0]
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
