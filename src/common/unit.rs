//! Unit conversion utilities.
//!
//! Deck plans are laid out in pixels; DrawingML measures everything in EMUs
//! (English Metric Units), font sizes in hundredths of a point and
//! percentages in thousandths of a percent.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;

/// EMUs per pixel at 96 DPI.
pub const EMUS_PER_PX_96: i64 = EMUS_PER_INCH / 96;

/// DrawingML "100%" for percentage-valued attributes (`a:alpha`, `a:srcRect`, `p:tav@tm`).
pub const PERCENT_100: u32 = 100_000;

/// DrawingML angles are expressed in 60000ths of a degree.
pub const ANGLE_UNITS_PER_DEGREE: i64 = 60_000;

/// Convert a pixel length to EMUs using an explicit scale factor.
#[inline]
pub fn px_to_emu(px: f64, emu_per_px: i64) -> i64 {
    (px * emu_per_px as f64).round() as i64
}

/// Convert a pixel length to EMUs at 96 DPI.
#[inline]
pub fn px_to_emu_96(px: f64) -> i64 {
    px_to_emu(px, EMUS_PER_PX_96)
}

#[inline]
pub fn pt_to_emu_f64(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64).round() as i64
}

/// Font size in points to the `sz` attribute unit (hundredths of a point).
#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt.max(1.0) * 100.0).round() as u32
}

/// Degrees to DrawingML angle units, normalized into `[0, 360)`.
#[inline]
pub fn degrees_to_angle(deg: f64) -> i64 {
    (deg.rem_euclid(360.0) * ANGLE_UNITS_PER_DEGREE as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_to_emu() {
        assert_eq!(EMUS_PER_PX_96, 9525);
        assert_eq!(px_to_emu_96(96.0), EMUS_PER_INCH);
        assert_eq!(px_to_emu(1280.0, 9525), 12_192_000);
        assert_eq!(px_to_emu(0.5, 2), 1);
    }

    #[test]
    fn test_font_and_angle_units() {
        assert_eq!(pt_to_centipoints(18.0), 1800);
        assert_eq!(pt_to_centipoints(0.0), 100);
        assert_eq!(pt_to_emu_f64(1.5), 19_050);
        assert_eq!(degrees_to_angle(90.0), 5_400_000);
        assert_eq!(degrees_to_angle(-90.0), 16_200_000);
    }
}
