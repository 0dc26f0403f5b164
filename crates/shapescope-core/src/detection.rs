use crate::config::DetectionConfig;
use crate::frame::Frame;
use crate::render::render_detection;
use ndarray::{Array2, ArrayView2};
use shapescope_detection::mask::segment;
use shapescope_detection::{detect_shapes, Detection, HsvRange, ShapeParams};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineParams {
    pub shape: ShapeParams,
    pub erode_kernel: usize,
    pub legacy_labels: bool,
}

impl From<&DetectionConfig> for PipelineParams {
    fn from(cfg: &DetectionConfig) -> Self {
        Self {
            shape: cfg.shape_params(),
            erode_kernel: cfg.erode_kernel,
            legacy_labels: cfg.legacy_labels,
        }
    }
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self::from(&DetectionConfig::default())
    }
}

pub struct FrameOutput {
    pub mask: Array2<u8>,
    pub detections: Vec<Detection>,
}

pub fn run_color_mask(
    frame: ArrayView2<[u8; 3]>,
    range: &HsvRange,
    params: &PipelineParams,
) -> Array2<u8> {
    segment(frame, range, params.erode_kernel)
}

/// Segments `frame`, classifies the mask and draws every detection onto
/// the frame.
pub fn process_frame(frame: &mut Frame, range: &HsvRange, params: &PipelineParams) -> FrameOutput {
    let mask = run_color_mask(frame.view(), range, params);
    let detections = detect_shapes(mask.view(), &params.shape);
    for detection in &detections {
        render_detection(frame, detection, params.legacy_labels);
    }
    FrameOutput { mask, detections }
}
