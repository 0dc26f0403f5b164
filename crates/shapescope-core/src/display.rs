use crate::frame::{frame_to_u32, mask_to_u32};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use ndarray::ArrayView2;
use thiserror::Error;

pub const FRAME_TITLE: &str = "Frame";
pub const MASK_TITLE: &str = "Mask";
pub const QUIT_KEY: Key = Key::Q;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("window error: {0}")]
    Window(#[from] minifb::Error),
}

/// Output window created lazily on the first image it is given.
pub struct DisplayWindow {
    title: String,
    target_fps: usize,
    window: Option<Window>,
    size: (usize, usize),
    buffer: Vec<u32>,
    closed: bool,
}

impl DisplayWindow {
    pub fn new(title: impl Into<String>, target_fps: usize) -> Self {
        Self {
            title: title.into(),
            target_fps,
            window: None,
            size: (0, 0),
            buffer: Vec::new(),
            closed: false,
        }
    }

    pub fn show_frame(&mut self, frame: ArrayView2<[u8; 3]>) -> Result<(), DisplayError> {
        let (height, width) = frame.dim();
        frame_to_u32(frame, &mut self.buffer);
        self.present(width, height)
    }

    pub fn show_mask(&mut self, mask: ArrayView2<u8>) -> Result<(), DisplayError> {
        let (height, width) = mask.dim();
        mask_to_u32(mask, &mut self.buffer);
        self.present(width, height)
    }

    fn present(&mut self, width: usize, height: usize) -> Result<(), DisplayError> {
        if self.closed {
            return Ok(());
        }
        if self.window.is_none() || self.size != (width, height) {
            let mut window = Window::new(&self.title, width, height, WindowOptions::default())?;
            window.set_target_fps(self.target_fps);
            tracing::debug!(title = %self.title, width, height, "window open");
            self.window = Some(window);
            self.size = (width, height);
        }
        if let Some(window) = self.window.as_mut() {
            window.update_with_buffer(&self.buffer, width, height)?;
        }
        Ok(())
    }

    /// True when the window was closed or the quit key went down since the
    /// last update.
    pub fn quit_requested(&self) -> bool {
        match &self.window {
            Some(window) => !window.is_open() || window.is_key_pressed(QUIT_KEY, KeyRepeat::No),
            None => self.closed,
        }
    }

    pub fn close(&mut self) {
        if self.window.take().is_some() {
            tracing::debug!(title = %self.title, "window closed");
        }
        self.closed = true;
    }
}
