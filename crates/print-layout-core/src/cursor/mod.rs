use crate::config::Strategy;
use crate::error::{PackError, Result};
use crate::skyline::Skyline;

pub mod random;
pub mod sequential;

pub use random::RandomCursor;
pub use sequential::SequentialCursor;

/// A cursor finds where a block lands on a skyline and paints it there.
///
/// Implementations must land every block on top of the skyline (at the maximum value over
/// its span), so placements never overlap. `place` returns the block's top-left `(x, y)`
/// and does not look at the page height; paging is up to the caller.
pub trait Cursor {
    fn place(&mut self, skyline: &mut Skyline, width: u32, height: u32) -> Result<(u32, u32)>;
    /// Forget any scan state, e.g. after the skyline was reset for a new page.
    fn reset(&mut self);
}

/// Builds the cursor implementing `strategy`.
pub fn new_cursor(strategy: Strategy) -> Box<dyn Cursor> {
    match strategy {
        Strategy::Sequential => Box::new(SequentialCursor::new()),
        Strategy::Random => Box::new(RandomCursor::new()),
    }
}

fn row_too_narrow(skyline: &Skyline, width: u32) -> PackError {
    PackError::RowTooNarrow {
        width,
        chain: skyline.to_string(),
    }
}
