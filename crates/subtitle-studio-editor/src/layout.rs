//! Layout math for the virtualized subtitle list.
//!
//! Heights come from a text-length heuristic rather than measurement, so the
//! whole layout is computable headlessly: a height cache keyed by row index,
//! a prefix-offset table with binary-search range queries, and the
//! auto-scroll bookkeeping that keeps the active row centered.

use subtitle_studio_types::Subtitle;

pub const BASE_ROW_HEIGHT: f32 = 50.0;
pub const EXTRA_LINE_HEIGHT: f32 = 20.0;
pub const CHARS_PER_LINE: usize = 40;
/// Extra content rendered above and below the viewport.
pub const OVERSCAN_PX: f32 = 160.0;

/// Estimated pixel height of one row.
///
/// Line count is the larger of the explicit break count and a
/// characters-per-line estimate, so both multi-line and long single-line
/// texts get room.
pub fn row_height(text: &str) -> f32 {
    let breaks = text.matches('\n').count();
    let estimated = text.chars().count().div_ceil(CHARS_PER_LINE);
    let lines = (breaks + 1).max(estimated).max(1);
    BASE_ROW_HEIGHT + (lines - 1) as f32 * EXTRA_LINE_HEIGHT
}

/// Lazily computed per-index row heights.
///
/// Keyed by raw index, so any list change must [`invalidate`] the whole
/// cache; stale entries after an insert or delete are not detectable
/// per-row.
///
/// [`invalidate`]: RowHeightCache::invalidate
#[derive(Debug, Default)]
pub struct RowHeightCache {
    heights: Vec<Option<f32>>,
}

impl RowHeightCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn height(&mut self, index: usize, list: &[Subtitle]) -> f32 {
        let Some(subtitle) = list.get(index) else {
            return BASE_ROW_HEIGHT;
        };
        if self.heights.len() < list.len() {
            self.heights.resize(list.len(), None);
        }
        if let Some(height) = self.heights[index] {
            return height;
        }
        let height = row_height(&subtitle.text);
        self.heights[index] = Some(height);
        height
    }

    /// Drop every cached height. Call whenever the list changes in any way.
    pub fn invalidate(&mut self) {
        self.heights.clear();
    }

    #[cfg(test)]
    fn cached(&self, index: usize) -> Option<f32> {
        self.heights.get(index).copied().flatten()
    }
}

/// Prefix-sum offset table over the row heights of one list snapshot.
#[derive(Debug)]
pub struct VirtualLayout {
    // offsets[i] = top of row i; offsets[len] = total height.
    offsets: Vec<f32>,
}

impl VirtualLayout {
    pub fn build(list: &[Subtitle], cache: &mut RowHeightCache) -> Self {
        let mut offsets = Vec::with_capacity(list.len() + 1);
        offsets.push(0.0);
        for index in 0..list.len() {
            let last = *offsets.last().unwrap_or(&0.0);
            offsets.push(last + cache.height(index, list));
        }
        Self { offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_height(&self) -> f32 {
        *self.offsets.last().unwrap_or(&0.0)
    }

    pub fn offset_of(&self, index: usize) -> f32 {
        self.offsets
            .get(index)
            .copied()
            .unwrap_or_else(|| self.total_height())
    }

    pub fn height_of(&self, index: usize) -> f32 {
        if index >= self.len() {
            return 0.0;
        }
        self.offsets[index + 1] - self.offsets[index]
    }

    // First row whose bottom edge lies below `offset`.
    fn index_for_offset(&self, offset: f32) -> usize {
        let mut low = 0usize;
        let mut high = self.len();
        while low < high {
            let mid = (low + high) / 2;
            if self.offsets[mid + 1] <= offset {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }

    // First row whose top edge lies at or below `offset`.
    fn end_index_for_offset(&self, offset: f32) -> usize {
        let mut low = 0usize;
        let mut high = self.len();
        while low < high {
            let mid = (low + high) / 2;
            if self.offsets[mid] < offset {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }

    /// Rows to render for the given scroll position, overscan included.
    pub fn visible_range(&self, scroll_top: f32, viewport_height: f32) -> std::ops::Range<usize> {
        if self.is_empty() || viewport_height <= 0.0 {
            return 0..0;
        }
        let top = (scroll_top - OVERSCAN_PX).max(0.0);
        let bottom = scroll_top + viewport_height + OVERSCAN_PX;
        self.index_for_offset(top)..self.end_index_for_offset(bottom)
    }

    /// Scroll offset that centers `index` in the viewport, clamped to the
    /// scrollable range.
    pub fn center_offset(&self, index: usize, viewport_height: f32) -> f32 {
        if index >= self.len() {
            return 0.0;
        }
        let row_center = self.offsets[index] + self.height_of(index) / 2.0;
        let max_offset = (self.total_height() - viewport_height).max(0.0);
        (row_center - viewport_height / 2.0).clamp(0.0, max_offset)
    }
}

/// Decides when the list should programmatically scroll: whenever the
/// active row changes during playback, and unconditionally on an explicit
/// seek. Returns the row to center on.
#[derive(Debug, Default)]
pub struct AutoScroller {
    last_active: Option<usize>,
}

impl AutoScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_tick(&mut self, active: Option<usize>) -> Option<usize> {
        if active == self.last_active {
            return None;
        }
        self.last_active = active;
        active
    }

    pub fn on_seek(&mut self, active: Option<usize>) -> Option<usize> {
        self.last_active = active;
        active
    }
}
