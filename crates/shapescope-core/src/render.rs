use crate::frame::Frame;
use font8x8::{UnicodeFonts, BASIC_FONTS};
use shapescope_detection::{Detection, Point};

pub const OUTLINE_COLOR: [u8; 3] = [0, 0, 0];
pub const OUTLINE_THICKNESS: i32 = 5;
pub const LABEL_COLOR: [u8; 3] = [0, 0, 0];
pub const LABEL_SCALE: i32 = 2;

const GLYPH_SIZE: i32 = 8;

fn put_pixel(frame: &mut Frame, x: i32, y: i32, color: [u8; 3]) {
    let (height, width) = frame.dim();
    if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
        return;
    }
    frame[(y as usize, x as usize)] = color;
}

fn stamp(frame: &mut Frame, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius + radius {
                put_pixel(frame, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Bresenham line with a round brush `thickness` pixels wide.
pub fn draw_line(frame: &mut Frame, a: Point, b: Point, thickness: i32, color: [u8; 3]) {
    let radius = (thickness - 1).max(0) / 2;
    let (mut x, mut y) = a;
    let dx = (b.0 - a.0).abs();
    let dy = -(b.1 - a.1).abs();
    let sx = if a.0 < b.0 { 1 } else { -1 };
    let sy = if a.1 < b.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        stamp(frame, x, y, radius, color);
        if (x, y) == b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

pub fn draw_polygon(frame: &mut Frame, polygon: &[Point], thickness: i32, color: [u8; 3]) {
    match polygon {
        [] => {}
        [only] => stamp(frame, only.0, only.1, (thickness - 1).max(0) / 2, color),
        _ => {
            for (k, &a) in polygon.iter().enumerate() {
                let b = polygon[(k + 1) % polygon.len()];
                draw_line(frame, a, b, thickness, color);
            }
        }
    }
}

/// Pixel offsets of `text` rendered with the 8x8 bitmap font, relative to
/// the top-left corner of the first glyph.
pub fn text_pixels(text: &str, scale: i32) -> Vec<(i32, i32)> {
    let mut pixels = Vec::new();
    for (col, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let origin_x = col as i32 * GLYPH_SIZE * scale;
        for (row, bits) in glyph.iter().enumerate() {
            for bit in 0..GLYPH_SIZE {
                if *bits & (1u8 << bit) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        pixels.push((
                            origin_x + bit * scale + sx,
                            row as i32 * scale + sy,
                        ));
                    }
                }
            }
        }
    }
    pixels
}

/// Draws `text` with its bottom-left corner at `origin`.
pub fn draw_text(frame: &mut Frame, text: &str, origin: Point, scale: i32, color: [u8; 3]) {
    let top = origin.1 - GLYPH_SIZE * scale;
    for (dx, dy) in text_pixels(text, scale) {
        put_pixel(frame, origin.0 + dx, top + dy, color);
    }
}

/// Outline plus caption for one detection. Polygons with fewer than three
/// vertices get the outline only.
pub fn render_detection(frame: &mut Frame, detection: &Detection, legacy_labels: bool) {
    draw_polygon(frame, &detection.polygon, OUTLINE_THICKNESS, OUTLINE_COLOR);
    if let Some(label) = detection.label {
        draw_text(
            frame,
            label.caption(legacy_labels),
            detection.anchor,
            LABEL_SCALE,
            LABEL_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use shapescope_detection::ShapeLabel;

    const WHITE: [u8; 3] = [255, 255, 255];

    fn canvas() -> Frame {
        Array2::from_elem((60, 80), WHITE)
    }

    #[test]
    fn thick_line_covers_its_width() {
        let mut frame = canvas();
        draw_line(&mut frame, (10, 30), (70, 30), 5, OUTLINE_COLOR);
        for y in 28..=32 {
            assert_eq!(frame[(y, 40)], OUTLINE_COLOR, "row {y}");
        }
        assert_eq!(frame[(27, 40)], WHITE);
        assert_eq!(frame[(33, 40)], WHITE);
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let mut frame = canvas();
        draw_polygon(
            &mut frame,
            &[(-50, -50), (200, -50), (200, 200)],
            5,
            OUTLINE_COLOR,
        );
        assert_eq!(frame.dim(), (60, 80));
    }

    #[test]
    fn polygon_is_closed() {
        let mut frame = canvas();
        draw_polygon(&mut frame, &[(10, 10), (10, 50), (60, 50)], 1, OUTLINE_COLOR);
        // closing edge runs from (60, 50) back to (10, 10)
        assert_eq!(frame[(30, 35)], OUTLINE_COLOR);
    }

    #[test]
    fn text_sits_above_its_anchor() {
        let mut frame = canvas();
        draw_text(&mut frame, "H", (5, 40), 2, LABEL_COLOR);
        let inked: Vec<(usize, usize)> = frame
            .indexed_iter()
            .filter(|(_, &px)| px == LABEL_COLOR)
            .map(|(idx, _)| idx)
            .collect();
        assert!(!inked.is_empty());
        assert!(inked.iter().all(|&(y, x)| (24..40).contains(&y) && (5..21).contains(&x)));
    }

    #[test]
    fn unlabeled_detection_draws_outline_only() {
        let detection = Detection {
            polygon: vec![(10, 10), (40, 10)],
            label: None,
            anchor: (10, 10),
            area: 500.0,
        };
        let mut frame = canvas();
        render_detection(&mut frame, &detection, false);
        assert_eq!(frame[(10, 25)], OUTLINE_COLOR);
        assert_eq!(frame[(0, 10)], WHITE);

        let labeled = Detection {
            label: Some(ShapeLabel::Rectangle),
            ..detection
        };
        let mut frame = canvas();
        render_detection(&mut frame, &labeled, false);
        assert!(frame.row(2).iter().any(|&px| px == LABEL_COLOR));
    }
}
