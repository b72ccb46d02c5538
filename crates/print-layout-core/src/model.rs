use crate::config::Strategy;
use serde::{Deserialize, Serialize};

/// A placed image. `x,y` is the top-left corner within page `page`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tile<K = String> {
    /// User-specified key (e.g., file path).
    pub key: K,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Zero-based page index.
    pub page: usize,
}

impl<K> Tile<K> {
    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }
    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
    pub fn area(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }
    /// True if both tiles sit on the same page and their areas intersect.
    pub fn overlaps(&self, other: &Tile<K>) -> bool {
        self.page == other.page
            && !(self.x >= other.right()
                || other.x >= self.right()
                || self.y >= other.bottom()
                || other.y >= self.bottom())
    }
}

/// Summary of one closed page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    pub id: usize,
    /// Tallest point of the skyline when the page was closed.
    pub used_height: u32,
    /// Number of tiles placed on this page.
    pub tiles: usize,
}

/// Layout-level metadata carried into exports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    pub app: String,
    pub version: String,
    pub page_width: u32,
    pub page_height: u32,
    pub strategy: Strategy,
}

/// Result of a placement run: tiles in input order plus per-page summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout<K = String> {
    pub tiles: Vec<Tile<K>>,
    pub pages: Vec<PageInfo>,
    pub meta: Meta,
}

/// Statistics about layout efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutStats {
    pub num_pages: usize,
    pub num_tiles: usize,
    /// Sum of page areas.
    pub total_page_area: u64,
    /// Sum of tile areas.
    pub used_tile_area: u64,
    /// used_tile_area / total_page_area (0.0 to 1.0).
    pub occupancy: f64,
    /// Tallest used height across all pages.
    pub max_used_height: u32,
}

impl<K> Layout<K> {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Tiles that landed on `page`, in input order.
    pub fn page_tiles(&self, page: usize) -> impl Iterator<Item = &Tile<K>> {
        self.tiles.iter().filter(move |t| t.page == page)
    }

    /// Computes layout statistics.
    pub fn stats(&self) -> LayoutStats {
        let num_pages = self.pages.len();
        let page_area = (self.meta.page_width as u64) * (self.meta.page_height as u64);
        let total_page_area = page_area * num_pages as u64;
        let used_tile_area: u64 = self.tiles.iter().map(Tile::area).sum();
        let occupancy = if total_page_area > 0 {
            used_tile_area as f64 / total_page_area as f64
        } else {
            0.0
        };
        LayoutStats {
            num_pages,
            num_tiles: self.tiles.len(),
            total_page_area,
            used_tile_area,
            occupancy,
            max_used_height: self.pages.iter().map(|p| p.used_height).max().unwrap_or(0),
        }
    }
}

impl LayoutStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Tiles: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px², Max Height: {} px",
            self.num_pages,
            self.num_tiles,
            self.occupancy * 100.0,
            self.total_page_area,
            self.used_tile_area,
            self.max_used_height,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_page_area.saturating_sub(self.used_tile_area)
    }
}
