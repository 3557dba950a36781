//! Size-label parsing and the size-to-scale policy.
//!
//! Meshes are modeled at the 15 cm reference size; other sizes reuse the
//! same geometry under a uniform transform scale.

/// Reference size a scale factor of 1.0 corresponds to.
pub const DEFAULT_SIZE_CM: u32 = 15;

pub const SCALE_MIN: f32 = 0.5;
pub const SCALE_MAX: f32 = 2.0;

/// Extracts the size label from a variant display name.
///
/// Names carry the label in parentheses ("MoonLamp (15cm)"); names without
/// a parenthesized group are returned whole.
pub fn extract_size_label(name: &str) -> &str {
    match (name.find('('), name.rfind(')')) {
        (Some(open), Some(close)) if open + 1 < close => &name[open + 1..close],
        _ => name,
    }
}

/// Parses the first integer run in a size label, e.g. `"15x20cm"` -> 15.
///
/// Labels without digits fall back to [`DEFAULT_SIZE_CM`].
pub fn parse_size_cm(label: &str) -> u32 {
    let mut digits = label.chars().skip_while(|c| !c.is_ascii_digit()).peekable();
    if digits.peek().is_none() {
        return DEFAULT_SIZE_CM;
    }
    digits
        .take_while(|c| c.is_ascii_digit())
        .fold(0u32, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add(c.to_digit(10).unwrap_or(0))
        })
}

/// Uniform mesh scale for a physical size, clamped to the preview's
/// presentable range.
pub fn scale_for_size(size_cm: u32) -> f32 {
    (size_cm as f32 / DEFAULT_SIZE_CM as f32).clamp(SCALE_MIN, SCALE_MAX)
}
