//! In-memory photo catalog: the flattened photo sequence, filtering,
//! selection state and the virtual-grid window computation.
//!
//! Everything in this crate is pure logic with no rendering surface, so
//! the grid math and throttle cadence are testable without a UI.

mod selection;
mod throttle;
mod virtual_grid;

pub use selection::SelectionSet;
pub use throttle::{Throttle, Throttled};
pub use virtual_grid::{
    compute_visible_range, items_per_row, use_virtual, GridOptions, VirtualGrid, VisibleRange,
    BUFFER_ROWS, GRID_PADDING, ITEM_HEIGHT, MIN_ITEM_WIDTH, VIRTUAL_THRESHOLD,
};

use api_client::{Photo, YearAlbum};

/// Flatten year albums into the single ordered photo sequence the rest of
/// the client works on. Album order and in-album order are preserved.
pub fn flatten_albums(albums: Vec<YearAlbum>) -> Vec<Photo> {
    let mut photos = Vec::with_capacity(albums.iter().map(|a| a.photos.len()).sum());
    for album in albums {
        photos.extend(album.photos);
    }
    photos
}

/// Visibility half of the status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Predicate over the full sequence producing the filtered view.
///
/// The derived view is a fresh `Vec` in source order; it never reorders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoFilter {
    pub query: String,
    pub year: Option<String>,
    pub visibility: Option<Visibility>,
}

impl PhotoFilter {
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.year.is_none() && self.visibility.is_none()
    }

    pub fn matches(&self, photo: &Photo) -> bool {
        let matches_query = self.query.is_empty()
            || photo
                .filename
                .to_lowercase()
                .contains(&self.query.to_lowercase());
        let matches_year = match &self.year {
            Some(year) => photo.year == *year,
            None => true,
        };
        let matches_visibility = match self.visibility {
            Some(Visibility::Hidden) => photo.is_hidden,
            Some(Visibility::Visible) => !photo.is_hidden,
            None => true,
        };
        matches_query && matches_year && matches_visibility
    }
}

/// Apply `filter` to `photos`, preserving relative order.
pub fn filter_photos(photos: &[Photo], filter: &PhotoFilter) -> Vec<Photo> {
    photos
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect()
}

/// Distinct years present in the sequence, newest first. Feeds the year
/// filter's option list.
pub fn years(photos: &[Photo]) -> Vec<String> {
    let mut years: Vec<String> = photos.iter().map(|p| p.year.clone()).collect();
    years.sort();
    years.dedup();
    years.reverse();
    years
}

/// Header summary counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryStats {
    pub total: usize,
    pub hidden: usize,
    pub selected: usize,
}

impl LibraryStats {
    pub fn compute(photos: &[Photo], selection: &SelectionSet) -> Self {
        LibraryStats {
            total: photos.len(),
            hidden: photos.iter().filter(|p| p.is_hidden).count(),
            selected: selection.len(),
        }
    }
}
