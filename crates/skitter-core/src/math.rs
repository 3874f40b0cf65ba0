//! Scalar and angle helpers
//!
//! All angles are in degrees.

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f32::clamp` this never panics: with an inverted range the upper
/// bound wins.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Wrap an angle into `[-180, 180)`.
pub fn reduce_angle(degrees: f32) -> f32 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

/// Shortest signed rotation that takes `src` to `dest`, in `[-180, 180)`.
pub fn angle_delta(src: f32, dest: f32) -> f32 {
    reduce_angle(dest - src)
}

/// Re-express `dest` so that it lies within half a turn of `src`.
///
/// The result is equivalent to `dest` modulo 360, which lets callers compare
/// or interpolate headings without a wrap-around jump.
pub fn fit_dest_angle_to_src(src: f32, dest: f32) -> f32 {
    src + angle_delta(src, dest)
}
