//! Shared access to anything with a span on the narration track.

use storyreel_models::{ClipTimeRange, ProductionScene};

/// A value positioned on the narration track.
pub trait Timed {
    fn span(&self) -> (f64, f64);

    fn set_span(&mut self, start: f64, end: f64);

    fn duration(&self) -> f64 {
        let (start, end) = self.span();
        end - start
    }
}

/// Move `item` to start at `new_start`, keeping its duration.
///
/// Repositioning never changes how much narration an item covers, only
/// where it sits.
pub fn shift_preserving_duration<T: Timed + ?Sized>(item: &mut T, new_start: f64) {
    let duration = item.duration();
    item.set_span(new_start, new_start + duration);
}

impl Timed for ProductionScene {
    fn span(&self) -> (f64, f64) {
        let start = self.start_sec.unwrap_or(0.0);
        (start, self.end_sec.unwrap_or(start))
    }

    fn set_span(&mut self, start: f64, end: f64) {
        ProductionScene::set_span(self, start, end);
    }
}

impl Timed for ClipTimeRange {
    fn span(&self) -> (f64, f64) {
        (self.audio_start_sec, self.audio_end_sec)
    }

    fn set_span(&mut self, start: f64, end: f64) {
        self.audio_start_sec = start;
        self.audio_end_sec = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_keeps_duration() {
        let mut clip = ClipTimeRange::new(1, 5.0, 12.0);
        shift_preserving_duration(&mut clip, 8.0);
        assert_eq!(clip.span(), (8.0, 15.0));
    }

    #[test]
    fn test_untimed_scene_has_empty_span() {
        let scene = ProductionScene::new(1, "hello");
        assert_eq!(Timed::span(&scene), (0.0, 0.0));
        assert_eq!(scene.duration(), 0.0);
    }
}
