use super::projection::Projection;

/// Collapses bursts of resize notifications into one recompute per frame.
///
/// `request` may be called any number of times between frames; only the most
/// recent size survives. The frame loop calls `take` once at the start of the
/// next frame (the display-refresh opportunity).
#[derive(Debug, Default, Clone)]
pub struct ResizeDebouncer {
    pending: Option<(f32, f32)>,
    superseded: u64,
}

impl ResizeDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a measured surface size, replacing any pending one.
    pub fn request(&mut self, width: f32, height: f32) {
        if self.pending.replace((width, height)).is_some() {
            self.superseded += 1;
        }
    }

    /// Removes and returns the latest pending size.
    pub fn take(&mut self) -> Option<(f32, f32)> {
        self.pending.take()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies the latest pending size to `projection`.
    ///
    /// Returns the new surface size in whole pixels, or `None` when nothing
    /// was pending or the size was non-positive or non-finite. A rejected
    /// size is consumed and `projection` keeps its previous state.
    pub fn apply_to(&mut self, projection: &mut Projection) -> Option<(u32, u32)> {
        let (width, height) = self.take()?;
        if !projection.resize(width, height) {
            log::debug!("skipping resize to {width}x{height}");
            return None;
        }
        Some((width.round().max(1.0) as u32, height.round().max(1.0) as u32))
    }

    /// Number of requests that were replaced before being applied.
    #[inline]
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_to_last_request() {
        let mut d = ResizeDebouncer::new();
        d.request(100.0, 100.0);
        d.request(200.0, 150.0);
        d.request(640.0, 480.0);

        assert_eq!(d.take(), Some((640.0, 480.0)));
        assert_eq!(d.superseded(), 2);
    }

    #[test]
    fn take_clears_pending() {
        let mut d = ResizeDebouncer::new();
        d.request(10.0, 10.0);
        assert!(d.is_pending());
        assert!(d.take().is_some());
        assert!(!d.is_pending());
        assert_eq!(d.take(), None);
    }

    // ── applying to a projection ──────────────────────────────────────────

    #[test]
    fn burst_ending_in_zero_size_keeps_previous_projection() {
        let mut projection = Projection::new(640.0, 480.0);
        let before = *projection.uniform();

        let mut d = ResizeDebouncer::new();
        d.request(800.0, 600.0);
        d.request(0.0, 0.0);

        assert_eq!(d.apply_to(&mut projection), None);
        assert_eq!(*projection.uniform(), before);
        assert_eq!(projection.screen_size(), [640.0, 480.0]);
        assert!(!d.is_pending());
    }

    #[test]
    fn burst_ending_in_nan_height_keeps_previous_projection() {
        let mut projection = Projection::new(640.0, 480.0);
        let before = *projection.uniform();

        let mut d = ResizeDebouncer::new();
        d.request(1024.0, 768.0);
        d.request(1024.0, f32::NAN);

        assert_eq!(d.apply_to(&mut projection), None);
        assert_eq!(*projection.uniform(), before);
        assert_eq!(d.superseded(), 1);
    }

    #[test]
    fn valid_burst_applies_only_last_size() {
        let mut projection = Projection::new(640.0, 480.0);

        let mut d = ResizeDebouncer::new();
        d.request(0.0, 0.0);
        d.request(1024.5, 768.0);

        assert_eq!(d.apply_to(&mut projection), Some((1025, 768)));
        assert_eq!(projection.screen_size(), [1024.5, 768.0]);
        assert_eq!(d.apply_to(&mut projection), None);
    }

    #[test]
    fn request_after_take_is_not_superseded() {
        let mut d = ResizeDebouncer::new();
        d.request(10.0, 10.0);
        d.take();
        d.request(20.0, 20.0);
        assert_eq!(d.superseded(), 0);
    }
}
