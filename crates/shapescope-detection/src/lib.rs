//! Color segmentation and polygon shape classification on `ndarray` grids.

pub mod color;
pub mod contour;
pub mod mask;
pub mod polygon;
pub mod shape;

pub use color::HsvRange;
pub use contour::{find_contours, Contour, Point};
pub use mask::segment;
pub use shape::{detect_shapes, Detection, ShapeLabel, ShapeParams};
