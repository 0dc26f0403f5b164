use crate::contour::{find_contours, Contour, Point};
use crate::polygon::approx_polygon;
use ndarray::ArrayView2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeLabel {
    Triangle,
    Rectangle,
    Pentagon,
    Hexagon,
    /// More than six vertices.
    Other,
}

impl ShapeLabel {
    /// Label for a polygon with `vertices` corners. Fewer than three
    /// vertices has no label.
    pub fn from_vertex_count(vertices: usize) -> Option<Self> {
        match vertices {
            0..=2 => None,
            3 => Some(ShapeLabel::Triangle),
            4 => Some(ShapeLabel::Rectangle),
            5 => Some(ShapeLabel::Pentagon),
            6 => Some(ShapeLabel::Hexagon),
            _ => Some(ShapeLabel::Other),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ShapeLabel::Triangle => "Triangle",
            ShapeLabel::Rectangle => "Rectangle",
            ShapeLabel::Pentagon => "Pentagon",
            ShapeLabel::Hexagon => "Hexagon",
            ShapeLabel::Other => "Other",
        }
    }

    /// Text drawn on screen. With `legacy` set, many-sided shapes are
    /// captioned "Triangle" as the first release of the tool did.
    pub const fn caption(&self, legacy: bool) -> &'static str {
        match (self, legacy) {
            (ShapeLabel::Other, true) => "Triangle",
            _ => self.name(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeParams {
    /// Contours enclosing this much area or less are ignored.
    pub min_area: f64,
    /// Approximation tolerance as a fraction of the contour perimeter.
    pub epsilon_factor: f64,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            min_area: 400.0,
            epsilon_factor: 0.02,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub polygon: Vec<Point>,
    pub label: Option<ShapeLabel>,
    /// First polygon vertex; text is anchored here.
    pub anchor: Point,
    pub area: f64,
}

pub fn classify_contour(contour: &Contour, params: &ShapeParams) -> Option<Detection> {
    let area = contour.area();
    if area <= params.min_area {
        return None;
    }

    let epsilon = params.epsilon_factor * contour.perimeter();
    let polygon = approx_polygon(&contour.points, epsilon);
    let anchor = *polygon.first()?;
    let label = ShapeLabel::from_vertex_count(polygon.len());

    Some(Detection {
        polygon,
        label,
        anchor,
        area,
    })
}

/// Traces every border of `mask` and classifies the ones large enough.
pub fn detect_shapes(mask: ArrayView2<u8>, params: &ShapeParams) -> Vec<Detection> {
    let contours = find_contours(mask);
    let detections: Vec<Detection> = contours
        .iter()
        .filter_map(|contour| classify_contour(contour, params))
        .collect();

    tracing::debug!(
        contours = contours.len(),
        detections = detections.len(),
        "shapes classified"
    );
    detections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::BorderKind;
    use crate::mask::FOREGROUND;
    use ndarray::Array2;

    fn outer(points: Vec<Point>) -> Contour {
        Contour {
            points,
            kind: BorderKind::Outer,
            parent: None,
        }
    }

    #[test]
    fn vertex_counts_map_to_labels() {
        assert_eq!(ShapeLabel::from_vertex_count(2), None);
        assert_eq!(ShapeLabel::from_vertex_count(3), Some(ShapeLabel::Triangle));
        assert_eq!(ShapeLabel::from_vertex_count(4), Some(ShapeLabel::Rectangle));
        assert_eq!(ShapeLabel::from_vertex_count(5), Some(ShapeLabel::Pentagon));
        assert_eq!(ShapeLabel::from_vertex_count(6), Some(ShapeLabel::Hexagon));
        assert_eq!(ShapeLabel::from_vertex_count(7), Some(ShapeLabel::Other));
        assert_eq!(ShapeLabel::from_vertex_count(40), Some(ShapeLabel::Other));
    }

    #[test]
    fn many_sided_caption_depends_on_legacy_switch() {
        assert_eq!(ShapeLabel::Other.caption(false), "Other");
        assert_eq!(ShapeLabel::Other.caption(true), "Triangle");
        assert_eq!(ShapeLabel::Hexagon.caption(true), "Hexagon");
    }

    #[test]
    fn area_at_threshold_is_filtered() {
        // 20 x 20 = 400, not strictly greater.
        let square = outer(vec![(0, 0), (0, 20), (20, 20), (20, 0)]);
        assert!(classify_contour(&square, &ShapeParams::default()).is_none());

        let bigger = outer(vec![(0, 0), (0, 21), (21, 21), (21, 0)]);
        let detection = classify_contour(&bigger, &ShapeParams::default()).unwrap();
        assert_eq!(detection.label, Some(ShapeLabel::Rectangle));
        assert_eq!(detection.anchor, (0, 0));
        assert_eq!(detection.area, 441.0);
    }

    #[test]
    fn circle_like_contour_is_other() {
        let circle: Vec<Point> = (0..24)
            .map(|k| {
                let theta = k as f64 * std::f64::consts::TAU / 24.0;
                (
                    (200.0 + 100.0 * theta.cos()).round() as i32,
                    (200.0 + 100.0 * theta.sin()).round() as i32,
                )
            })
            .collect();
        let detection = classify_contour(&outer(circle), &ShapeParams::default()).unwrap();
        assert!(detection.polygon.len() > 6);
        assert_eq!(detection.label, Some(ShapeLabel::Other));
    }

    #[test]
    fn small_specks_never_become_detections() {
        let mut mask = Array2::<u8>::zeros((60, 60));
        for y in 5..20 {
            for x in 5..20 {
                mask[(y, x)] = FOREGROUND;
            }
        }
        assert!(detect_shapes(mask.view(), &ShapeParams::default()).is_empty());
    }

    #[test]
    fn filled_triangle_is_detected() {
        let mut mask = Array2::<u8>::zeros((120, 120));
        for y in 10..110usize {
            let half = (y - 10) / 2;
            for x in (60 - half)..=(60 + half) {
                mask[(y, x)] = FOREGROUND;
            }
        }
        let detections = detect_shapes(mask.view(), &ShapeParams::default());
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].label, Some(ShapeLabel::Triangle));
    }
}
