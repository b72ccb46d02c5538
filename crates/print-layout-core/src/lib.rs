//! Core library for laying images out onto print pages.
//!
//! - Skyline: an interval chain holding the occupied height across the page width
//! - Cursors: Sequential (reading order, row wrap) and Random (lowest available shelf)
//! - Pipeline: `pack_layout` takes `(key, width, height)` triples and returns tiles + pages
//! - Data model is serde-serializable; `export::to_json` gives the compositor-facing shape.
//!
//! Quick example:
//! ```
//! use print_layout_core::{PackerConfig, Strategy, pack_layout};
//! # fn main() -> Result<(), print_layout_core::PackError> {
//! let cfg = PackerConfig::builder()
//!     .with_page_size(100, 100)
//!     .strategy(Strategy::Sequential)
//!     .build();
//! let layout = pack_layout(vec![("a.jpg", 60, 40), ("b.jpg", 60, 40)], cfg)?;
//! assert_eq!(layout.tiles[1].y, 40);
//! println!("pages: {}", layout.page_count());
//! # Ok(()) }
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod export;
pub mod model;
pub mod pipeline;
pub mod skyline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `print_layout_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PackerConfig, PackerConfigBuilder, Strategy};
    pub use crate::cursor::{Cursor, RandomCursor, SequentialCursor};
    pub use crate::model::{Layout, LayoutStats, Meta, PageInfo, Tile};
    pub use crate::skyline::{IntervalId, Skyline};
    pub use crate::{pack_layout, place_tiles};
}
