use crate::config::PackerConfig;
use crate::cursor::{Cursor, new_cursor};
use crate::error::{PackError, Result};
use crate::model::{Layout, Meta, PageInfo, Tile};
use crate::skyline::Skyline;
use tracing::{debug, instrument, trace};

/// Paging state threaded through the placement loop.
struct PageState {
    page: usize,
    placed: usize,
    used_height: u32,
    skyline: Skyline,
    cursor: Box<dyn Cursor>,
    closed: Vec<PageInfo>,
}

impl PageState {
    fn new(cfg: &PackerConfig) -> Self {
        Self {
            page: 0,
            placed: 0,
            used_height: 0,
            skyline: Skyline::new(cfg.page_width),
            cursor: new_cursor(cfg.strategy),
            closed: Vec::new(),
        }
    }

    // Counts accepted tiles only; the skyline may still hold the attempt that overflowed.
    fn close_page(&mut self) {
        self.closed.push(PageInfo {
            id: self.page,
            used_height: self.used_height,
            tiles: self.placed,
        });
    }

    fn accept(&mut self, y: u32, height: u32) {
        self.placed += 1;
        self.used_height = self.used_height.max(y + height);
    }

    /// Closes the current page and starts a blank one.
    fn advance(&mut self) {
        self.close_page();
        self.page += 1;
        self.placed = 0;
        self.used_height = 0;
        self.skyline.reset();
        self.cursor.reset();
        debug!(page = self.page, "started new page");
    }
}

/// Places `inputs` (key, width, height) onto pages in input order.
///
/// Notes:
/// - Every size is checked against the page before anything is placed; one oversized image
///   fails the whole run.
/// - An image that would cross the bottom edge moves to a fresh page together with everything
///   after it; earlier pages are never revisited.
/// - Output tiles keep input order regardless of strategy.
/// - Empty input yields an empty layout with zero pages.
#[instrument(skip_all, fields(count = inputs.len(), strategy = %cfg.strategy))]
pub fn place_tiles<K: ToString>(
    inputs: Vec<(K, u32, u32)>,
    cfg: &PackerConfig,
) -> Result<Layout<K>> {
    cfg.validate()?;
    check_sizes(&inputs, cfg)?;

    let mut state = PageState::new(cfg);
    let mut tiles: Vec<Tile<K>> = Vec::with_capacity(inputs.len());
    for (key, width, height) in inputs {
        let (x, y) = loop {
            let (x, y) = state.cursor.place(&mut state.skyline, width, height)?;
            if y.saturating_add(height) <= cfg.page_height {
                break (x, y);
            }
            if state.placed == 0 {
                // A blank page lands everything at y = 0, so only an image taller than the
                // page gets here, and check_sizes rejects those.
                return Err(PackError::ImageTooTall {
                    key: key.to_string(),
                    height,
                    page_height: cfg.page_height,
                });
            }
            state.advance();
        };
        state.accept(y, height);
        trace!(page = state.page, x, y, width, height, "placed tile");
        tiles.push(Tile {
            key,
            x,
            y,
            width,
            height,
            page: state.page,
        });
    }
    // No input means no pages.
    if !tiles.is_empty() {
        state.close_page();
    }
    debug!(pages = state.closed.len(), "layout complete");

    Ok(Layout {
        tiles,
        pages: state.closed,
        meta: Meta {
            app: "print-layout".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            page_width: cfg.page_width,
            page_height: cfg.page_height,
            strategy: cfg.strategy,
        },
    })
}

/// Packs sizes into pages. Inputs are (key, width, height); keys are converted to `String`.
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, u32, u32)>,
    cfg: PackerConfig,
) -> Result<Layout<String>> {
    let inputs: Vec<(String, u32, u32)> = inputs
        .into_iter()
        .map(|(k, w, h)| (k.into(), w, h))
        .collect();
    place_tiles(inputs, &cfg)
}

fn check_sizes<K: ToString>(inputs: &[(K, u32, u32)], cfg: &PackerConfig) -> Result<()> {
    for (key, width, height) in inputs {
        let (width, height) = (*width, *height);
        // Zero height is fine: the tile lands on the skyline and paints nothing new.
        if width == 0 {
            return Err(PackError::ZeroWidth {
                key: key.to_string(),
            });
        }
        if width > cfg.page_width {
            return Err(PackError::ImageTooWide {
                key: key.to_string(),
                width,
                page_width: cfg.page_width,
            });
        }
        if height > cfg.page_height {
            return Err(PackError::ImageTooTall {
                key: key.to_string(),
                height,
                page_height: cfg.page_height,
            });
        }
    }
    Ok(())
}
