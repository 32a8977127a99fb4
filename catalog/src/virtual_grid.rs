//! Virtual-grid window computation.
//!
//! Renders only the rows intersecting the viewport (plus buffer rows)
//! while reserving the full scrollable height, so native scrollbar
//! geometry stays accurate for the whole sequence. The window math is a
//! pure function; `VirtualGrid` adds the re-render bookkeeping on top.

use tracing::trace;

/// Approximate height of one photo card in pixels.
pub const ITEM_HEIGHT: f32 = 320.0;
/// Minimum card width the grid packs against.
pub const MIN_ITEM_WIDTH: f32 = 220.0;
/// Horizontal padding subtracted from the viewport width.
pub const GRID_PADDING: f32 = 40.0;
/// Extra rows rendered above and below the viewport to mask pop-in.
pub const BUFFER_ROWS: usize = 2;
/// Sequences at or below this length take the direct render path.
pub const VIRTUAL_THRESHOLD: usize = 100;

/// Cards per row for a given viewport width. Never zero.
pub fn items_per_row(viewport_width: f32) -> usize {
    (((viewport_width - GRID_PADDING) / MIN_ITEM_WIDTH).floor() as usize).max(1)
}

/// Whether a sequence of `len` items should be virtualized.
pub fn use_virtual(len: usize) -> bool {
    len > VIRTUAL_THRESHOLD
}

/// Layout parameters of the virtualized grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOptions {
    pub item_height: f32,
    pub items_per_row: usize,
    pub buffer_rows: usize,
}

impl GridOptions {
    pub fn for_viewport(viewport_width: f32) -> Self {
        GridOptions {
            item_height: ITEM_HEIGHT,
            items_per_row: items_per_row(viewport_width),
            buffer_rows: BUFFER_ROWS,
        }
    }
}

/// The slice of the sequence to render and its vertical placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRange {
    /// First item index to render (inclusive).
    pub start: usize,
    /// One past the last item index to render.
    pub end: usize,
    /// Vertical translation of the rendered slice, compensating for the
    /// rows skipped above the window.
    pub offset_y: f32,
}

impl VisibleRange {
    pub const EMPTY: VisibleRange = VisibleRange {
        start: 0,
        end: 0,
        offset_y: 0.0,
    };

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Compute the visible item window for a scroll position.
///
/// The start row is clamped to zero at the row level, before multiplying
/// by items-per-row; both item indices are clamped into `[0, count]`.
pub fn compute_visible_range(
    scroll_top: f32,
    container_height: f32,
    item_height: f32,
    items_per_row: usize,
    buffer_rows: usize,
    count: usize,
) -> VisibleRange {
    let items_per_row = items_per_row.max(1);
    if count == 0 {
        return VisibleRange::EMPTY;
    }

    let first_row = (scroll_top / item_height).floor() as usize;
    let start_row = first_row.saturating_sub(buffer_rows);
    let end_row = ((scroll_top + container_height) / item_height).ceil() as usize + buffer_rows;

    let start = (start_row * items_per_row).min(count);
    let end = (end_row * items_per_row).min(count);

    VisibleRange {
        start,
        end,
        offset_y: (start / items_per_row) as f32 * item_height,
    }
}

/// State machine tracking the currently rendered window of one sequence.
#[derive(Debug, Clone)]
pub struct VirtualGrid {
    options: GridOptions,
    count: usize,
    rendered: Option<VisibleRange>,
}

impl VirtualGrid {
    pub fn new(count: usize, viewport_width: f32) -> Self {
        VirtualGrid {
            options: GridOptions::for_viewport(viewport_width),
            count,
            rendered: None,
        }
    }

    pub fn with_options(count: usize, options: GridOptions) -> Self {
        VirtualGrid {
            options,
            count,
            rendered: None,
        }
    }

    pub fn options(&self) -> GridOptions {
        self.options
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn rendered(&self) -> Option<VisibleRange> {
        self.rendered
    }

    /// Height of the scroll spacer covering the full sequence.
    pub fn total_height(&self) -> f32 {
        let per_row = self.options.items_per_row.max(1);
        let rows = (self.count + per_row - 1) / per_row;
        rows as f32 * self.options.item_height
    }

    /// Recompute the window for a scroll event.
    ///
    /// Returns `None` when the window is unchanged, in which case the
    /// caller must not touch the widget tree.
    pub fn on_scroll(&mut self, scroll_top: f32, container_height: f32) -> Option<VisibleRange> {
        let range = self.compute(scroll_top, container_height);
        if let Some(rendered) = self.rendered {
            if rendered.start == range.start && rendered.end == range.end {
                trace!(start = range.start, end = range.end, "visible range unchanged");
                return None;
            }
        }
        self.rendered = Some(range);
        Some(range)
    }

    /// Recompute layout for a viewport resize.
    ///
    /// Items-per-row and the spacer height change with the width, so this
    /// always forces a re-render even when the numeric range is identical.
    pub fn on_resize(
        &mut self,
        viewport_width: f32,
        scroll_top: f32,
        container_height: f32,
    ) -> VisibleRange {
        self.options.items_per_row = items_per_row(viewport_width);
        let range = self.compute(scroll_top, container_height);
        trace!(
            items_per_row = self.options.items_per_row,
            total_height = self.total_height(),
            "grid resized"
        );
        self.rendered = Some(range);
        range
    }

    /// Replace the backing sequence length (upstream filter change) and
    /// force a re-render against the resized spacer.
    pub fn update_count(
        &mut self,
        count: usize,
        scroll_top: f32,
        container_height: f32,
    ) -> VisibleRange {
        self.count = count;
        let range = self.compute(scroll_top, container_height);
        self.rendered = Some(range);
        range
    }

    fn compute(&self, scroll_top: f32, container_height: f32) -> VisibleRange {
        compute_visible_range(
            scroll_top,
            container_height,
            self.options.item_height,
            self.options.items_per_row,
            self.options.buffer_rows,
            self.count,
        )
    }
}
