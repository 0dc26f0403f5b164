use crate::display::{DisplayError, QUIT_KEY};
use crate::render::text_pixels;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use shapescope_detection::color::HUE_MAX;
use shapescope_detection::HsvRange;

pub const SETTINGS_TITLE: &str = "Settings";

const LOWER_HUE: usize = 0;
const LOWER_SAT: usize = 1;
const LOWER_VAL: usize = 2;
const UPPER_HUE: usize = 3;
const UPPER_SAT: usize = 4;
const UPPER_VAL: usize = 5;

const TRACKBAR_NAMES: [&str; 6] = [
    "Lower-Hue",
    "Lower-Saturation",
    "Lower-Value",
    "Upper-Hue",
    "Upper-Saturation",
    "Upper-Value",
];

// (key, trackbar, step)
const KEY_BINDINGS: [(Key, usize, i32); 12] = [
    (Key::A, LOWER_HUE, 1),
    (Key::Z, LOWER_HUE, -1),
    (Key::S, LOWER_SAT, 1),
    (Key::X, LOWER_SAT, -1),
    (Key::D, LOWER_VAL, 1),
    (Key::C, LOWER_VAL, -1),
    (Key::F, UPPER_HUE, 1),
    (Key::V, UPPER_HUE, -1),
    (Key::G, UPPER_SAT, 1),
    (Key::B, UPPER_SAT, -1),
    (Key::H, UPPER_VAL, 1),
    (Key::N, UPPER_VAL, -1),
];

// Settings window geometry, in pixels.
const PANEL_WIDTH: usize = 420;
const ROW_HEIGHT: usize = 36;
const MARGIN: usize = 10;
const BAR_TOP: usize = 18;
const BAR_HEIGHT: usize = 10;
const BAR_WIDTH: usize = PANEL_WIDTH - 2 * MARGIN;

const BACKGROUND: u32 = 0xF1F5F9;
const TRACK: u32 = 0xCBD5E1;
const FILL: u32 = 0x2563EB;
const INK: u32 = 0x0F172A;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trackbar {
    pub name: &'static str,
    pub value: u8,
    pub max: u8,
}

/// The six threshold sliders. Values are always within `0..=max`; lower
/// and upper are not ordered against each other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trackbars {
    bars: [Trackbar; 6],
}

impl Trackbars {
    pub fn new(initial: HsvRange) -> Self {
        let values = [
            initial.lower[0],
            initial.lower[1],
            initial.lower[2],
            initial.upper[0],
            initial.upper[1],
            initial.upper[2],
        ];
        let bars = std::array::from_fn(|i| {
            let max = if i == LOWER_HUE || i == UPPER_HUE {
                HUE_MAX
            } else {
                u8::MAX
            };
            Trackbar {
                name: TRACKBAR_NAMES[i],
                value: values[i].min(max),
                max,
            }
        });
        Self { bars }
    }

    pub fn bars(&self) -> &[Trackbar] {
        &self.bars
    }

    pub fn set(&mut self, index: usize, value: i32) {
        if let Some(bar) = self.bars.get_mut(index) {
            bar.value = value.clamp(0, bar.max as i32) as u8;
        }
    }

    pub fn nudge(&mut self, index: usize, delta: i32) {
        if let Some(bar) = self.bars.get(index) {
            let value = bar.value as i32 + delta;
            self.set(index, value);
        }
    }

    /// Applies a key press; returns false for unbound keys.
    pub fn apply_key(&mut self, key: Key) -> bool {
        match KEY_BINDINGS.iter().find(|(k, _, _)| *k == key) {
            Some(&(_, index, delta)) => {
                self.nudge(index, delta);
                true
            }
            None => false,
        }
    }

    /// Sets the slider under a pointer at panel coordinates `(x, y)`.
    pub fn apply_pointer(&mut self, x: f32, y: f32) -> bool {
        match slider_at(x, y) {
            Some((index, fraction)) => {
                let max = self.bars[index].max as f32;
                self.set(index, (fraction * max).round() as i32);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> HsvRange {
        let v = |i: usize| self.bars[i].value;
        HsvRange::new(
            [v(LOWER_HUE), v(LOWER_SAT), v(LOWER_VAL)],
            [v(UPPER_HUE), v(UPPER_SAT), v(UPPER_VAL)],
        )
    }
}

fn panel_height() -> usize {
    ROW_HEIGHT * TRACKBAR_NAMES.len()
}

// Maps a pointer position to (slider index, position along the bar 0..=1).
fn slider_at(x: f32, y: f32) -> Option<(usize, f32)> {
    if x < 0.0 || y < 0.0 || x >= PANEL_WIDTH as f32 {
        return None;
    }
    let index = y as usize / ROW_HEIGHT;
    if index >= TRACKBAR_NAMES.len() {
        return None;
    }
    let fraction = ((x - MARGIN as f32) / BAR_WIDTH as f32).clamp(0.0, 1.0);
    Some((index, fraction))
}

fn fill_rect(buf: &mut [u32], x: usize, y: usize, w: usize, h: usize, color: u32) {
    for row in y..(y + h).min(panel_height()) {
        for col in x..(x + w).min(PANEL_WIDTH) {
            buf[row * PANEL_WIDTH + col] = color;
        }
    }
}

fn draw_panel(trackbars: &Trackbars, buf: &mut Vec<u32>) {
    buf.clear();
    buf.resize(PANEL_WIDTH * panel_height(), BACKGROUND);

    for (i, bar) in trackbars.bars().iter().enumerate() {
        let top = i * ROW_HEIGHT;
        let caption = format!("{}: {}", bar.name, bar.value);
        for (dx, dy) in text_pixels(&caption, 1) {
            let (x, y) = (MARGIN + dx as usize, top + 4 + dy as usize);
            if x < PANEL_WIDTH {
                buf[y * PANEL_WIDTH + x] = INK;
            }
        }

        let filled = BAR_WIDTH * bar.value as usize / bar.max.max(1) as usize;
        fill_rect(buf, MARGIN, top + BAR_TOP, BAR_WIDTH, BAR_HEIGHT, TRACK);
        fill_rect(buf, MARGIN, top + BAR_TOP, filled, BAR_HEIGHT, FILL);
        let knob_x = MARGIN + filled.saturating_sub(2);
        fill_rect(buf, knob_x, top + BAR_TOP - 2, 4, BAR_HEIGHT + 4, INK);
    }
}

/// Owns the slider state and, optionally, the window that edits it.
pub struct ThresholdController {
    trackbars: Trackbars,
    window: Option<Window>,
    buffer: Vec<u32>,
}

impl ThresholdController {
    pub fn new(initial: HsvRange, show_window: bool) -> Result<Self, DisplayError> {
        let mut controller = Self::headless(initial);
        if show_window {
            let window = Window::new(
                SETTINGS_TITLE,
                PANEL_WIDTH,
                panel_height(),
                WindowOptions::default(),
            )?;
            controller.window = Some(window);
            tracing::debug!("settings window open");
        }
        Ok(controller)
    }

    pub fn headless(initial: HsvRange) -> Self {
        Self {
            trackbars: Trackbars::new(initial),
            window: None,
            buffer: Vec::new(),
        }
    }

    /// Handles pending mouse and keyboard input and redraws the sliders.
    /// Returns true once the user asks to quit.
    pub fn poll(&mut self) -> Result<bool, DisplayError> {
        let Some(window) = self.window.as_mut() else {
            return Ok(false);
        };
        if !window.is_open() {
            return Ok(true);
        }

        let mut quit = false;
        for key in window.get_keys_pressed(KeyRepeat::Yes) {
            if key == QUIT_KEY {
                quit = true;
            } else if self.trackbars.apply_key(key) {
                tracing::debug!(range = ?self.trackbars.snapshot(), "threshold nudged");
            }
        }

        if window.get_mouse_down(MouseButton::Left) {
            if let Some((x, y)) = window.get_mouse_pos(MouseMode::Discard) {
                self.trackbars.apply_pointer(x, y);
            }
        }

        draw_panel(&self.trackbars, &mut self.buffer);
        window.update_with_buffer(&self.buffer, PANEL_WIDTH, panel_height())?;
        Ok(quit)
    }

    pub fn current_range(&self) -> HsvRange {
        self.trackbars.snapshot()
    }

    pub fn trackbars_mut(&mut self) -> &mut Trackbars {
        &mut self.trackbars
    }

    pub fn close(&mut self) {
        if self.window.take().is_some() {
            tracing::debug!("settings window closed");
        }
    }
}
