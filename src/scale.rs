//! Linear min-max scaling of a magnitude vector onto bytes for transmission

/// Ranges narrower than this count as a flat signal
pub const FLAT_EPSILON: f32 = 1e-9;

/// Map `magnitudes` onto 0..=255. A flat (or empty) input scales to all zeros.
pub fn scale_to_u8(magnitudes: &[f32]) -> Vec<u8> {
    let (min, max) = magnitudes
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &m| {
            (lo.min(m), hi.max(m))
        });
    // f64 so that the span of extreme finite values can't overflow
    let range = max as f64 - min as f64;
    if magnitudes.is_empty() || !(range >= FLAT_EPSILON as f64) {
        return vec![0; magnitudes.len()];
    }
    magnitudes
        .iter()
        .map(|&m| (((m as f64 - min as f64) / range) * 255.0).clamp(0.0, 255.0).round() as u8)
        .collect()
}
