//! Logical viewport: windowed size, fullscreen flag and the scaled background.

/// Source of the display's native resolution for fullscreen.
pub trait DisplayQuery {
    fn native_resolution(&self) -> (u32, u32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    /// Size restored when leaving fullscreen. Fixed at construction.
    pub windowed_width: u32,
    pub windowed_height: u32,
}

/// What the window backend must apply after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportChange {
    pub fullscreen: bool,
    pub width: u32,
    pub height: u32,
}

impl ViewportState {
    pub fn windowed(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fullscreen: false,
            windowed_width: width,
            windowed_height: height,
        }
    }

    pub fn toggle_fullscreen(&mut self, display: &dyn DisplayQuery) -> ViewportChange {
        if self.fullscreen {
            self.fullscreen = false;
            self.width = self.windowed_width;
            self.height = self.windowed_height;
        } else {
            let (width, height) = display.native_resolution();
            self.fullscreen = true;
            if width == 0 || height == 0 {
                log::warn!("Display reported {}x{}, keeping current size", width, height);
            } else {
                self.width = width;
                self.height = height;
            }
        }
        log::info!(
            "Viewport {}x{} ({})",
            self.width,
            self.height,
            if self.fullscreen { "fullscreen" } else { "windowed" }
        );
        ViewportChange {
            fullscreen: self.fullscreen,
            width: self.width,
            height: self.height,
        }
    }
}

/// Backdrop image, always stretched to cover the whole viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    pub width: u32,
    pub height: u32,
}

impl Background {
    pub fn covering(viewport: &ViewportState) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
        }
    }

    pub fn rescale(&mut self, viewport: &ViewportState) {
        *self = Self::covering(viewport);
    }
}

#[cfg(test)]
pub(crate) struct FixedDisplay(pub u32, pub u32);

#[cfg(test)]
impl DisplayQuery for FixedDisplay {
    fn native_resolution(&self) -> (u32, u32) {
        (self.0, self.1)
    }
}
