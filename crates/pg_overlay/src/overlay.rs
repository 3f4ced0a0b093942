//! egui layer drawn on top of the quad pass: all game text plus the F3 debug panel.
//!
//! Integration pattern: egui requires a three-phase render split because
//! `egui_wgpu::Renderer::render()` needs a `RenderPass<'static>`, while
//! `begin_render_pass` borrows the encoder. The phases are:
//!
//!   1. `prepare()` -- paint queued text, run the debug UI, tessellate
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! Text positions arrive in logical game pixels and are scaled to the surface,
//! so text tracks the quads when the logical frame is stretched.

use pg_core::time::TimeState;
use winit::window::Window;

/// egui font family name under which the game's TTF is registered.
pub const GAME_FONT: &str = "game";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub anchor: TextAnchor,
    pub size_px: f32,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    /// Current screen name (e.g. "Playing")
    pub screen: String,
    pub logical_size: (u32, u32),
    pub fullscreen: bool,
    pub fighter_health: Option<[u32; 2]>,
    pub quad_count: u32,
    pub draw_calls: u32,
}

pub struct Overlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub debug_visible: bool,
}

impl Overlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        font_bytes: Vec<u8>,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        install_game_font(&egui_ctx, font_bytes);
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            debug_visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug panel: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        texts: &[TextItem],
        surface_size: (u32, u32),
        stats: &OverlayStats,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let scale_x = surface_size.0 as f32 / stats.logical_size.0.max(1) as f32;
        let scale_y = surface_size.1 as f32 / stats.logical_size.1.max(1) as f32;

        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let ppp = ctx.pixels_per_point();
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Background,
                egui::Id::new("game_text"),
            ));
            for item in texts {
                let pos = egui::pos2(item.x * scale_x / ppp, item.y * scale_y / ppp);
                let align = match item.anchor {
                    TextAnchor::TopLeft => egui::Align2::LEFT_TOP,
                    TextAnchor::Center => egui::Align2::CENTER_CENTER,
                };
                let [r, g, b] = item.color;
                painter.text(
                    pos,
                    align,
                    &item.text,
                    egui::FontId::new(
                        item.size_px * scale_y / ppp,
                        egui::FontFamily::Name(GAME_FONT.into()),
                    ),
                    egui::Color32::from_rgb(r, g, b),
                );
            }

            if self.debug_visible {
                egui::Window::new("Debug")
                    .default_pos([10.0, 80.0])
                    .show(ctx, |ui| {
                        ui.label(format!("FPS: {:.1}", time.smoothed_fps));
                        ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
                        ui.label(format!("Ticks this frame: {}", time.ticks_this_frame));
                        ui.label(format!("Total ticks: {}", time.tick_count));
                        ui.separator();
                        ui.label(format!("Screen: {}", stats.screen));
                        ui.label(format!(
                            "Viewport: {}x{}{}",
                            stats.logical_size.0,
                            stats.logical_size.1,
                            if stats.fullscreen { " (fullscreen)" } else { "" }
                        ));
                        if let Some([p1, p2]) = stats.fighter_health {
                            ui.label(format!("Health: {} / {}", p1, p2));
                        }
                        ui.label(format!(
                            "Quads: {}  Draw calls: {}",
                            stats.quad_count, stats.draw_calls
                        ));
                    });
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

/// Register the game TTF as its own family, with egui's default proportional
/// fonts behind it for glyphs the game font lacks.
fn install_game_font(ctx: &egui::Context, font_bytes: Vec<u8>) {
    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        GAME_FONT.to_owned(),
        std::sync::Arc::new(egui::FontData::from_owned(font_bytes)),
    );
    let mut chain = vec![GAME_FONT.to_owned()];
    if let Some(fallback) = fonts.families.get(&egui::FontFamily::Proportional) {
        chain.extend(fallback.iter().cloned());
    }
    fonts
        .families
        .insert(egui::FontFamily::Name(GAME_FONT.into()), chain);
    ctx.set_fonts(fonts);
}
