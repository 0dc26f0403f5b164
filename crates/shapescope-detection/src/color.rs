/// Largest hue value in the 8-bit encoding (degrees halved).
pub const HUE_MAX: u8 = 180;

/// Inclusive HSV threshold. No ordering is enforced between `lower` and
/// `upper`; an inverted channel simply matches nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn in_range(&self, h: u8, s: u8, v: u8) -> bool {
        self.contains([h, s, v])
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        hsv.iter()
            .zip(self.lower.iter().zip(&self.upper))
            .all(|(value, (lo, hi))| (lo..=hi).contains(&value))
    }
}

/// HSV with hue as halved degrees in `0..HUE_MAX`. A hue that rounds up to
/// 360 degrees wraps back to 0.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = f32::from(max - min);
    if chroma == 0.0 {
        return (0, 0, max);
    }

    let saturation = (chroma * 255.0 / f32::from(max)).round() as u8;
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let degrees = if max == r {
        60.0 * (gf - bf) / chroma
    } else if max == g {
        120.0 + 60.0 * (bf - rf) / chroma
    } else {
        240.0 + 60.0 * (rf - gf) / chroma
    };

    let hue = (degrees.rem_euclid(360.0) / 2.0).round() as u8;
    let hue = if hue >= HUE_MAX { 0 } else { hue };
    (hue, saturation, max)
}

pub fn pixel_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let (h, s, v) = rgb_to_hsv(rgb[0], rgb[1], rgb[2]);
    [h, s, v]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_map_to_halved_degrees() {
        assert_eq!(rgb_to_hsv(255, 0, 0), (0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), (60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), (120, 255, 255));
        assert_eq!(rgb_to_hsv(255, 255, 0), (30, 255, 255));
    }

    #[test]
    fn grays_have_no_hue_or_saturation() {
        assert_eq!(rgb_to_hsv(0, 0, 0), (0, 0, 0));
        assert_eq!(rgb_to_hsv(128, 128, 128), (0, 0, 128));
        assert_eq!(rgb_to_hsv(255, 255, 255), (0, 0, 255));
    }

    #[test]
    fn hue_near_full_turn_wraps_to_zero() {
        // 359.76 degrees
        assert_eq!(rgb_to_hsv(255, 0, 1), (0, 255, 255));
        for b in 0..=255u8 {
            let (h, _, _) = rgb_to_hsv(255, 0, b);
            assert!(h < HUE_MAX, "b = {b}");
        }
        assert!(HsvRange::new([0, 100, 100], [10, 255, 255]).contains(pixel_to_hsv([255, 0, 1])));
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let range = HsvRange::new([10, 20, 30], [40, 50, 60]);
        assert!(range.in_range(10, 20, 30));
        assert!(range.in_range(40, 50, 60));
        assert!(!range.in_range(9, 20, 30));
        assert!(!range.in_range(40, 51, 60));
    }

    #[test]
    fn inverted_channel_matches_nothing() {
        let range = HsvRange::new([100, 0, 0], [10, 255, 255]);
        for h in 0..=HUE_MAX {
            assert!(!range.in_range(h, 255, 255));
        }
    }
}
