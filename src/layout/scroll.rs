use egui::Vec2;

/// Scrollbar width assumed until the first measurement.
const DEFAULT_SCROLLBAR_WIDTH: f32 = 20.0;

/// Offsets the follower panels should adopt.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SyncedOffsets {
    /// Horizontal offset of the timeline header.
    pub timeline_x: f32,
    /// Vertical offset of the brief panel.
    pub brief_y: f32,
}

/// Keeps the timeline and brief panel aligned with the grid.
///
/// The grid is the only driver: its offset is copied onto the timeline
/// (x) and the brief panel (y), never the other way round.
#[derive(Debug, Clone)]
pub struct ScrollSync {
    grid_offset: Vec2,
    scrollbar_width: f32,
    needs_measure: bool,
    pending_jump: Option<f32>,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSync {
    pub fn new() -> Self {
        Self {
            grid_offset: Vec2::ZERO,
            scrollbar_width: DEFAULT_SCROLLBAR_WIDTH,
            needs_measure: true,
            pending_jump: None,
        }
    }

    /// A new result was loaded: re-measure once and optionally jump the
    /// grid to `jump_x`.
    pub fn on_data_loaded(&mut self, jump_x: Option<f32>) {
        self.needs_measure = true;
        self.pending_jump = jump_x;
        self.grid_offset = Vec2::ZERO;
    }

    /// Run `read_width` if a measurement is due. Returns whether it ran.
    pub fn measure(&mut self, read_width: impl FnOnce() -> f32) -> bool {
        if !self.needs_measure {
            return false;
        }
        self.scrollbar_width = read_width().max(0.0);
        self.needs_measure = false;
        tracing::debug!(width = self.scrollbar_width, "measured scrollbar width");
        true
    }

    /// The horizontal jump requested by the last load, handed out once.
    pub fn take_jump(&mut self) -> Option<f32> {
        self.pending_jump.take()
    }

    /// Record a grid scroll and return the follower offsets.
    pub fn on_grid_scroll(&mut self, offset: Vec2) -> SyncedOffsets {
        self.grid_offset = offset;
        self.synced()
    }

    pub fn synced(&self) -> SyncedOffsets {
        SyncedOffsets {
            timeline_x: self.grid_offset.x,
            brief_y: self.grid_offset.y,
        }
    }

    pub fn scrollbar_width(&self) -> f32 {
        self.scrollbar_width
    }

    /// Visible brief height for a grid viewport of `grid_height`.
    ///
    /// The grid loses a horizontal scrollbar's height at its bottom; the
    /// brief panel has none, so it is shortened by the same amount.
    pub fn brief_visible_height(&self, grid_height: f32) -> f32 {
        (grid_height - self.scrollbar_width).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_drives_both_followers() {
        let mut sync = ScrollSync::new();
        let out = sync.on_grid_scroll(Vec2::new(120.0, 44.0));
        assert_eq!(out, SyncedOffsets { timeline_x: 120.0, brief_y: 44.0 });
        assert_eq!(sync.synced(), out);
    }

    #[test]
    fn measurement_runs_once_per_load() {
        let mut sync = ScrollSync::new();
        let mut reads = 0;
        assert!(sync.measure(|| {
            reads += 1;
            12.0
        }));
        assert!(!sync.measure(|| {
            reads += 1;
            99.0
        }));
        assert_eq!(reads, 1);
        assert_eq!(sync.scrollbar_width(), 12.0);
        assert_eq!(sync.brief_visible_height(300.0), 288.0);

        sync.on_data_loaded(None);
        assert!(sync.measure(|| 8.0));
        assert_eq!(sync.scrollbar_width(), 8.0);
    }

    #[test]
    fn jump_is_consumed_once_and_offsets_reset() {
        let mut sync = ScrollSync::new();
        sync.on_grid_scroll(Vec2::new(50.0, 50.0));
        sync.on_data_loaded(Some(360.0));
        assert_eq!(sync.synced(), SyncedOffsets::default());
        assert_eq!(sync.take_jump(), Some(360.0));
        assert_eq!(sync.take_jump(), None);
    }
}
