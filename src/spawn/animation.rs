use serde::Serialize;

use crate::core::types::Seconds;

/// Grow-in animation: scale rises linearly from 0 to `target` over `duration`
///
/// Evaluated against the tick clock; there is nothing to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleAnimation {
    start: Seconds,
    duration: Seconds,
    target: f32,
}

impl ScaleAnimation {
    pub fn new(start: Seconds, duration: Seconds, target: f32) -> Self {
        Self {
            start,
            duration,
            target,
        }
    }

    pub fn scale_at(&self, now: Seconds) -> f32 {
        if self.duration <= 0.0 {
            return self.target;
        }
        let t = ((now - self.start) / self.duration).clamp(0.0, 1.0);
        self.target * t as f32
    }

    pub fn is_finished(&self, now: Seconds) -> bool {
        now - self.start >= self.duration
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_interpolates_and_clamps() {
        let anim = ScaleAnimation::new(1.0, 0.5, 0.1);
        assert_eq!(anim.scale_at(0.0), 0.0);
        assert_eq!(anim.scale_at(1.0), 0.0);
        assert!((anim.scale_at(1.25) - 0.05).abs() < 1e-6);
        assert_eq!(anim.scale_at(3.0), 0.1);
        assert!(!anim.is_finished(1.25));
        assert!(anim.is_finished(1.5));
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let anim = ScaleAnimation::new(0.0, 0.0, 0.2);
        assert_eq!(anim.scale_at(0.0), 0.2);
        assert!(anim.is_finished(0.0));
    }
}
