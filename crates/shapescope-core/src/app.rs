use crate::camera::FrameSource;
use crate::config::Config;
use crate::controls::ThresholdController;
use crate::detection::{process_frame, PipelineParams};
use crate::display::{DisplayError, DisplayWindow, FRAME_TITLE, MASK_TITLE};
use shapescope_detection::HsvRange;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
    DeviceError,
}

// Logs throughput once per second.
struct FrameStats {
    frames: u64,
    last_log: Instant,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frames: 0,
            last_log: Instant::now(),
        }
    }

    fn record(&mut self, range: &HsvRange, detections: usize) {
        self.frames += 1;
        if self.last_log.elapsed() >= Duration::from_secs(1) {
            tracing::info!(
                frames_in_window = self.frames,
                hsv_lower = ?range.lower,
                hsv_upper = ?range.upper,
                detections,
                "frame stats"
            );
            self.frames = 0;
            self.last_log = Instant::now();
        }
    }
}

pub struct App<S: FrameSource> {
    source: S,
    controls: ThresholdController,
    frame_window: DisplayWindow,
    mask_window: DisplayWindow,
    params: PipelineParams,
    stats: FrameStats,
    shut_down: bool,
}

impl<S: FrameSource> App<S> {
    pub fn new(source: S, config: &Config) -> Result<Self, DisplayError> {
        let controls = ThresholdController::new(
            config.detection.initial_range(),
            config.display.show_settings,
        )?;

        // The frame window paces the loop, like a short key wait.
        let poll_ms = config.display.poll_interval_ms.max(1);
        let target_fps = (1000 / poll_ms) as usize;

        Ok(Self {
            source,
            controls,
            frame_window: DisplayWindow::new(FRAME_TITLE, target_fps.max(1)),
            mask_window: DisplayWindow::new(MASK_TITLE, 0),
            params: PipelineParams::from(&config.detection),
            stats: FrameStats::new(),
            shut_down: false,
        })
    }

    /// One pass: capture, threshold, classify, draw, show, poll for quit.
    pub fn step(&mut self) -> LoopControl {
        let mut frame = match self.source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "frame source failed");
                return LoopControl::DeviceError;
            }
        };

        let quit_from_settings = match self.controls.poll() {
            Ok(quit) => quit,
            Err(e) => {
                tracing::error!(error = %e, "settings window failed");
                return LoopControl::Quit;
            }
        };

        let range = self.controls.current_range();
        let output = process_frame(&mut frame, &range, &self.params);

        let shown = self
            .frame_window
            .show_frame(frame.view())
            .and_then(|_| self.mask_window.show_mask(output.mask.view()));
        if let Err(e) = shown {
            tracing::error!(error = %e, "display failed");
            return LoopControl::Quit;
        }

        self.stats.record(&range, output.detections.len());

        if quit_from_settings
            || self.frame_window.quit_requested()
            || self.mask_window.quit_requested()
        {
            tracing::info!("quit requested");
            return LoopControl::Quit;
        }
        LoopControl::Continue
    }

    /// Runs until quit or device failure, then releases everything.
    pub fn run(mut self) -> LoopControl {
        tracing::info!("press 'q' to quit");
        let outcome = loop {
            match self.step() {
                LoopControl::Continue => continue,
                other => break other,
            }
        };
        self.shutdown();
        outcome
    }

    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.source.release();
        self.frame_window.close();
        self.mask_window.close();
        self.controls.close();
        tracing::info!("shut down");
    }
}

impl<S: FrameSource> Drop for App<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{SourceError, StillImageSource};
    use crate::frame::Frame;
    use ndarray::Array2;
    use std::cell::Cell;
    use std::rc::Rc;

    // Stream that has already ended; counts release calls.
    struct EndedSource {
        releases: Rc<Cell<usize>>,
    }

    impl FrameSource for EndedSource {
        fn next_frame(&mut self) -> Result<Frame, SourceError> {
            Err(SourceError::Released)
        }

        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    fn windowless_config() -> Config {
        let mut cfg = Config::default();
        cfg.display.show_settings = false;
        cfg
    }

    #[test]
    fn end_of_stream_stops_the_loop_as_device_error() {
        let mut source = StillImageSource::from_frame(Array2::from_elem((4, 4), [0; 3]), false);
        source.release();

        let app = App::new(source, &windowless_config()).unwrap();
        assert_eq!(app.run(), LoopControl::DeviceError);
    }

    #[test]
    fn step_reports_device_error_without_opening_windows() {
        let releases = Rc::new(Cell::new(0));
        let source = EndedSource {
            releases: Rc::clone(&releases),
        };
        let mut app = App::new(source, &windowless_config()).unwrap();

        assert_eq!(app.step(), LoopControl::DeviceError);
        assert_eq!(app.step(), LoopControl::DeviceError);
        assert_eq!(releases.get(), 0);
    }

    #[test]
    fn run_releases_the_source_exactly_once() {
        let releases = Rc::new(Cell::new(0));
        let source = EndedSource {
            releases: Rc::clone(&releases),
        };

        let app = App::new(source, &windowless_config()).unwrap();
        assert_eq!(app.run(), LoopControl::DeviceError);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let releases = Rc::new(Cell::new(0));
        let source = EndedSource {
            releases: Rc::clone(&releases),
        };

        let mut app = App::new(source, &windowless_config()).unwrap();
        app.shutdown();
        app.shutdown();
        drop(app);
        assert_eq!(releases.get(), 1);
    }
}
