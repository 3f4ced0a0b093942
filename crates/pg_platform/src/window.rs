use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Pixel Gladiators".to_string(),
            width: 800,
            height: 600,
        }
    }
}

pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    // Physical pixels throughout: layout, pointer positions and the native
    // display query all share one coordinate space.
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_resizable(false)
        .with_inner_size(PhysicalSize::new(config.width, config.height));

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    Arc::new(window)
}

/// Resolution of the monitor the window is on, falling back to the primary one.
pub fn native_resolution(window: &Window) -> Option<(u32, u32)> {
    let monitor = window
        .current_monitor()
        .or_else(|| window.primary_monitor())?;
    let size = monitor.size();
    if size.width == 0 || size.height == 0 {
        return None;
    }
    Some((size.width, size.height))
}

/// Switch the window between borderless fullscreen and a fixed windowed size.
pub fn apply_window_mode(window: &Window, fullscreen: bool, width: u32, height: u32) {
    if fullscreen {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        log::info!("Window mode: borderless fullscreen {}x{}", width, height);
    } else {
        window.set_fullscreen(None);
        if let Some(applied) = window.request_inner_size(PhysicalSize::new(width, height)) {
            log::debug!("Inner size applied immediately: {:?}", applied);
        }
        log::info!("Window mode: windowed {}x{}", width, height);
    }
}
