use tubely_core::AspectClass;

/// Relative tolerance when matching a ratio against 16:9 or 9:16 (1 %).
pub const ASPECT_TOLERANCE: f64 = 0.01;

const LANDSCAPE: f64 = 16.0 / 9.0;
const PORTRAIT: f64 = 9.0 / 16.0;

/// Classify a frame size. Total and deterministic; a zero dimension is `Other`.
pub fn classify(width: u32, height: u32) -> AspectClass {
    if width == 0 || height == 0 {
        return AspectClass::Other;
    }

    let ratio = f64::from(width) / f64::from(height);
    if within_tolerance(ratio, LANDSCAPE) {
        AspectClass::Landscape
    } else if within_tolerance(ratio, PORTRAIT) {
        AspectClass::Portrait
    } else {
        AspectClass::Other
    }
}

fn within_tolerance(ratio: f64, target: f64) -> bool {
    ((ratio - target) / target).abs() <= ASPECT_TOLERANCE
}
