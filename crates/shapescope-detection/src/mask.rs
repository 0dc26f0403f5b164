use crate::color::{pixel_to_hsv, HsvRange};
use ndarray::{Array2, ArrayView2, Axis};

/// Foreground value of a binary mask.
pub const FOREGROUND: u8 = 255;

// Converts the RGB frame to HSV and marks every pixel inside `range`.
pub fn color_mask(frame: ArrayView2<[u8; 3]>, range: &HsvRange) -> Array2<u8> {
    frame.map(|&rgb| {
        if range.contains(pixel_to_hsv(rgb)) {
            FOREGROUND
        } else {
            0
        }
    })
}

/// Morphological erosion with a `kernel`×`kernel` all-ones element anchored
/// at its center. Pixels outside the image never erode the border.
pub fn erode(mask: ArrayView2<u8>, kernel: usize) -> Array2<u8> {
    if kernel <= 1 {
        return mask.to_owned();
    }
    // A rectangular element separates into a row pass and a column pass.
    let rows = min_filter(mask, kernel, Axis(1));
    min_filter(rows.view(), kernel, Axis(0))
}

fn min_filter(src: ArrayView2<u8>, kernel: usize, axis: Axis) -> Array2<u8> {
    let before = kernel / 2;
    let after = kernel - 1 - before;
    let mut dst = src.to_owned();

    for (src_lane, mut dst_lane) in src.lanes(axis).into_iter().zip(dst.lanes_mut(axis)) {
        let len = src_lane.len();
        for i in 0..len {
            let lo = i.saturating_sub(before);
            let hi = (i + after).min(len - 1);
            let mut min = u8::MAX;
            for k in lo..=hi {
                min = min.min(src_lane[k]);
            }
            dst_lane[i] = min;
        }
    }
    dst
}

/// Thresholds `frame` against `range` and erodes the result.
pub fn segment(frame: ArrayView2<[u8; 3]>, range: &HsvRange, kernel: usize) -> Array2<u8> {
    let raw = color_mask(frame, range);
    erode(raw.view(), kernel)
}

pub fn foreground_count(mask: ArrayView2<u8>) -> usize {
    mask.iter().filter(|&&px| px != 0).count()
}
