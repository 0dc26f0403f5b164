use ndarray::{s, Array2, ArrayView2};
use thiserror::Error;

/// Packed RGB image indexed `[row, col]`.
pub type Frame = Array2<[u8; 3]>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("buffer holds {actual} bytes, expected {expected}")]
    InvalidDimensions { expected: usize, actual: usize },

    #[error("provided dimensions are zero")]
    ZeroDimensions,
}

// Validates buffer size against dimensions and builds a frame from RGB bytes.
pub fn frame_from_rgb(width: u32, height: u32, data: &[u8]) -> Result<Frame, FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::ZeroDimensions);
    }

    let (width, height) = (width as usize, height as usize);
    let expected = width * height * 3;
    if data.len() != expected {
        return Err(FrameError::InvalidDimensions {
            expected,
            actual: data.len(),
        });
    }

    let pixels = data.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect();
    Array2::from_shape_vec((height, width), pixels).map_err(|_| FrameError::InvalidDimensions {
        expected,
        actual: data.len(),
    })
}

// Left-right flip, so the preview behaves like a mirror.
pub fn mirror(frame: ArrayView2<[u8; 3]>) -> Frame {
    frame.slice(s![.., ..;-1]).to_owned()
}

// Packs RGB pixels as 0RGB words for the window buffer.
pub fn frame_to_u32(frame: ArrayView2<[u8; 3]>, out: &mut Vec<u32>) {
    out.clear();
    out.extend(
        frame
            .iter()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | (p[2] as u32)),
    );
}

pub fn mask_to_u32(mask: ArrayView2<u8>, out: &mut Vec<u32>) {
    out.clear();
    out.extend(mask.iter().map(|&g| {
        let g = g as u32;
        (g << 16) | (g << 8) | g
    }));
}
