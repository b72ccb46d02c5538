use super::{Cursor, row_too_narrow};
use crate::error::Result;
use crate::skyline::{IntervalId, Skyline};

/// Drops each block onto the lowest span of the whole skyline that can hold it.
///
/// Vertically, tiles will mostly appear ordered; within a row any apparent ordering is
/// coincidental. Holds no state between calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomCursor;

impl RandomCursor {
    pub fn new() -> Self {
        Self
    }

    /// Finds the run start whose span `[start, start + width)` has the lowest maximum value.
    /// Ties go to the leftmost start. Returns `(run, start, landing height)`, or `None` if no
    /// span of `width` fits in the chain.
    pub fn find(&self, skyline: &Skyline, width: u32) -> Option<(IntervalId, u32, u32)> {
        let mut best: Option<(IntervalId, u32, u32)> = None;
        for run in skyline.runs() {
            // Later starts run off the end too.
            let Some(y) = skyline.span_max(run.id, width) else {
                break;
            };
            if best.is_none_or(|(_, _, best_y)| y < best_y) {
                best = Some((run.id, run.start, y));
            }
        }
        best
    }
}

impl Cursor for RandomCursor {
    fn place(&mut self, skyline: &mut Skyline, width: u32, height: u32) -> Result<(u32, u32)> {
        let (id, x, y) = self
            .find(skyline, width)
            .ok_or_else(|| row_too_narrow(skyline, width))?;
        skyline.set(id, 0, width, y.saturating_add(height))?;
        Ok((x, y))
    }

    fn reset(&mut self) {}
}
