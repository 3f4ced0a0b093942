//! Pixel Gladiators: main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` on a fixed 60 Hz timestep (see
//! `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_tick()` -- run `App::tick`; the first tick of a frame
//!      takes every queued input event
//!   3. Record the finished state into a `DrawList`
//!   4. Build the quad mesh, upload camera and buffers, draw, then composite
//!      the egui text layer on top
//!
//! Assets are loaded before the event loop exists; a missing or broken asset
//! ends the process with a logged error and exit status 1.

mod app;
mod assets;
mod collision;
mod combat;
mod constants;
mod controls;
mod draw;
mod fighter;
mod frame;
mod physics;
#[cfg(test)]
mod replay;
mod text_entry;
mod viewport;
mod widget;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use app::{App, Screen};
use assets::Assets;
use draw::DrawList;
use frame::{build_frame, DrawCall, TextureSlot};
use pg_core::input::{InputState, Key};
use pg_core::time::TimeState;
use pg_overlay::{Overlay, OverlayStats, TextItem};
use pg_platform::window::PlatformConfig;
use pg_render::{GpuContext, ScreenCamera, SpritePipeline, SpriteVertex, Texture};
use viewport::{DisplayQuery, ViewportChange, ViewportState};

struct GpuSpriteTexture {
    _texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// Everything that needs a live window. Constructed in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
struct GameState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: ScreenCamera,
    sprite_pipeline: SpritePipeline,
    overlay: Overlay,
    app: App,

    blank_texture: GpuSpriteTexture,
    background_texture: GpuSpriteTexture,

    // The mesh is rebuilt on the CPU each frame, then streamed into these
    // GPU buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_list: DrawList,
    draw_calls: Vec<DrawCall>,
    texts: Vec<TextItem>,
    quad_count: usize,
}

impl GameState {
    fn new(window: Arc<Window>, config: &PlatformConfig, assets: Assets) -> Self {
        let gpu = GpuContext::new(window.clone());
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let overlay = Overlay::new(&gpu.device, gpu.surface_format, &window, assets.font);

        let blank_texture = upload_texture(
            &gpu,
            &sprite_pipeline,
            Texture::from_rgba8(&gpu.device, &gpu.queue, &[255; 4], 1, 1, "Blank Texture"),
        );
        let background = assets::fit_within(assets.background, gpu.max_texture_dimension);
        let background_texture = upload_texture(
            &gpu,
            &sprite_pipeline,
            Texture::from_image(&gpu.device, &gpu.queue, &background, "Background"),
        );

        let viewport = ViewportState::windowed(config.width, config.height);
        let camera = ScreenCamera::new(viewport.width, viewport.height);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        Self {
            window,
            gpu,
            time: TimeState::new(),
            input: InputState::new(),
            camera,
            sprite_pipeline,
            overlay,
            app: App::new(viewport),
            blank_texture,
            background_texture,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_list: DrawList::new(),
            draw_calls: Vec::new(),
            texts: Vec::new(),
            quad_count: 0,
        }
    }

    fn apply_viewport(&mut self, change: ViewportChange) {
        pg_platform::window::apply_window_mode(
            &self.window,
            change.fullscreen,
            change.width,
            change.height,
        );
        self.gpu.resize(change.width, change.height);
        self.camera.viewport = (change.width, change.height);
    }

    /// Map a physical pointer position onto the logical viewport.
    fn to_logical(&self, x: f64, y: f64) -> (f64, f64) {
        let viewport = self.app.viewport();
        let (surface_w, surface_h) = self.gpu.size;
        (
            x * viewport.width as f64 / surface_w.max(1) as f64,
            y * viewport.height as f64 / surface_h.max(1) as f64,
        )
    }

    fn rebuild_mesh(&mut self) {
        self.draw_list.clear();
        self.app.render(&mut self.draw_list);
        let mesh = build_frame(&self.draw_list);

        self.ensure_mesh_capacity(mesh.vertices.len(), mesh.indices.len());
        if !mesh.vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
        }
        if !mesh.indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&mesh.indices));
        }
        self.quad_count = mesh.quad_count();
        self.draw_calls = mesh.draw_calls;
        self.texts = mesh.texts;
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn overlay_stats(&self) -> OverlayStats {
        let viewport = self.app.viewport();
        let in_round = matches!(self.app.screen(), Screen::Playing | Screen::GameOver);
        OverlayStats {
            screen: self.app.screen().to_string(),
            logical_size: (viewport.width, viewport.height),
            fullscreen: viewport.fullscreen,
            fighter_health: in_round.then(|| self.app.fighters().each_ref().map(|f| f.health)),
            quad_count: self.quad_count as u32,
            draw_calls: self.draw_calls.len() as u32,
        }
    }

    fn texture(&self, slot: TextureSlot) -> &GpuSpriteTexture {
        match slot {
            TextureSlot::Blank => &self.blank_texture,
            TextureSlot::Background => &self.background_texture,
        }
    }

    fn render(&mut self) {
        self.rebuild_mesh();

        let camera_uniform = self.camera.build_uniform();
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = self.overlay_stats();
        let (egui_primitives, egui_textures_delta) =
            self.overlay
                .prepare(&self.window, &self.time, &self.texts, self.gpu.size, &stats);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            let mut last_bound: Option<TextureSlot> = None;
            for draw in &self.draw_calls {
                if last_bound != Some(draw.texture) {
                    render_pass.set_bind_group(1, &self.texture(draw.texture).bind_group, &[]);
                    last_bound = Some(draw.texture);
                }
                render_pass.draw_indexed(
                    draw.index_start..(draw.index_start + draw.index_count),
                    0,
                    0..1,
                );
            }
        }

        self.overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Native resolution of the window's monitor, or the current size when the
/// platform cannot report one.
struct MonitorQuery<'a> {
    window: &'a Window,
    fallback: (u32, u32),
}

impl DisplayQuery for MonitorQuery<'_> {
    fn native_resolution(&self) -> (u32, u32) {
        pg_platform::window::native_resolution(self.window).unwrap_or_else(|| {
            log::warn!("No monitor reported a resolution, staying at current size");
            self.fallback
        })
    }
}

struct GameRunner {
    config: PlatformConfig,
    assets: Option<Assets>,
    state: Option<GameState>,
}

impl GameRunner {
    fn new(assets: Assets) -> Self {
        Self {
            config: PlatformConfig::default(),
            assets: Some(assets),
            state: None,
        }
    }
}

impl ApplicationHandler for GameRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let Some(assets) = self.assets.take() else {
            return;
        };
        let window = pg_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        self.state = Some(GameState::new(window, &self.config, assets));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.overlay.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => state.input.close_requested(),

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => state.input.release_all(),

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match (event.state, event.repeat) {
                            (ElementState::Pressed, false) => state.input.key_down(game_key),
                            (ElementState::Pressed, true) => state.input.key_repeat(game_key),
                            (ElementState::Released, _) => state.input.key_up(game_key),
                        }
                    }
                }
                if event.state == ElementState::Pressed {
                    if let Some(text) = &event.text {
                        for ch in text.chars() {
                            state.input.text(ch);
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = state.to_logical(position.x, position.y);
                state.input.pointer_moved(x, y);
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } if !egui_consumed => state.input.pointer_down(),

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // Fixed-step simulation phase.
                state.time.begin_frame();
                while state.time.should_tick() {
                    let events = state.input.take_events();
                    let display = MonitorQuery {
                        window: &state.window,
                        fallback: state.gpu.size,
                    };
                    let actions = state.app.tick(&state.input, &events, &display);

                    if actions.toggle_debug {
                        state.overlay.toggle_debug();
                    }
                    if let Some(change) = actions.viewport {
                        state.apply_viewport(change);
                    }
                    if actions.quit {
                        log::info!("Exiting.");
                        event_loop.exit();
                        return;
                    }
                }

                // Render phase reads finalized simulation state from this frame.
                state.render();
            }

            _ => {}
        }
    }
}

fn upload_texture(
    gpu: &GpuContext,
    pipeline: &SpritePipeline,
    texture: Texture,
) -> GpuSpriteTexture {
    let bind_group = pipeline.create_texture_bind_group(&gpu.device, &texture);
    GpuSpriteTexture {
        _texture: texture,
        bind_group,
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Frame Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Frame Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::F11 => Some(Key::F11),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Pixel Gladiators starting...");

    let assets = match assets::load_assets() {
        Ok(assets) => assets,
        Err(err) => {
            log::error!("Startup aborted: {err}");
            std::process::exit(1);
        }
    };

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = GameRunner::new(assets);
    event_loop.run_app(&mut runner).expect("Event loop error");
}
