use std::f64::consts::TAU;

use glam::Vec2;

use super::config::MotionKind;

/// Monitor height that amplitudes in the animation file are authored against.
const REFERENCE_MONITOR_HEIGHT: f32 = 2000.0;

/// Scale applied to window sizes and motion amplitudes so they look the same on any resolution.
pub fn scale_for_monitor_height(height: u32) -> f32 {
    height as f32 / REFERENCE_MONITOR_HEIGHT
}

/// Offset from the logical window origin for a clip `elapsed` seconds into a loop of `duration`
/// seconds.
pub fn offset(kind: MotionKind, elapsed: f64, duration: f64, amplitude: f32, scale: f32) -> Vec2 {
    let oscillations = match kind {
        // Stays put, no fallback for anything else.
        MotionKind::None => return Vec2::ZERO,
        MotionKind::SineWave => 2.0,
        MotionKind::Jumping => 1.0,
    };

    let phase = elapsed / duration * TAU * oscillations;
    Vec2::new(0.0, phase.sin() as f32 * scale * amplitude)
}
