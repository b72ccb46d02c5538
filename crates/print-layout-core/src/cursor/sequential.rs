use super::{Cursor, row_too_narrow};
use crate::error::Result;
use crate::skyline::{IntervalId, Skyline};

/// Scans the skyline left to right, wrapping to the start of the row when a block no longer
/// fits before the right edge. Blocks are placed strictly in the order they are given.
///
/// The cursor sits at `position + offset`, where `position` is the start of `current` and
/// `offset` may equal the run's length (the cursor is at the run's right edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialCursor {
    current: IntervalId,
    position: u32,
    offset: u32,
}

impl Default for SequentialCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialCursor {
    pub fn new() -> Self {
        Self {
            current: IntervalId::HEAD,
            position: 0,
            offset: 0,
        }
    }

    /// Absolute horizontal position of the cursor.
    #[inline]
    pub fn x(&self) -> u32 {
        self.position + self.offset
    }

    /// Reads the contiguous block `[x, x + delta)` and returns its maximum value, moving the
    /// cursor to the end of the block. Returns `None` and leaves the cursor alone if the chain
    /// ends before `delta` positions were read.
    pub fn try_read(&mut self, skyline: &Skyline, delta: u32) -> Option<u32> {
        if delta == 0 {
            return None;
        }
        let mut id = self.current;
        let mut position = self.position;
        let mut offset = self.offset;
        let mut remaining = delta;
        let mut max = 0;
        loop {
            let run = skyline.get(id);
            let available = run.length() - offset;
            if available > 0 {
                max = max.max(run.value());
            }
            if remaining <= available {
                offset += remaining;
                break;
            }
            remaining -= available;
            position += run.length();
            offset = 0;
            id = run.next()?;
        }
        self.current = id;
        self.position = position;
        self.offset = offset;
        Some(max)
    }

    /// Like [`try_read`](Self::try_read), but wraps to a new row once if the block does not
    /// fit before the right edge.
    pub fn read(&mut self, skyline: &Skyline, delta: u32) -> Result<u32> {
        match self.try_read(skyline, delta) {
            Some(max) => Ok(max),
            None if self.x() > 0 => self.read_newline(skyline, delta),
            None => Err(row_too_narrow(skyline, delta)),
        }
    }

    /// Moves to the start of the row and reads from there.
    pub fn read_newline(&mut self, skyline: &Skyline, delta: u32) -> Result<u32> {
        self.reset();
        self.try_read(skyline, delta)
            .ok_or_else(|| row_too_narrow(skyline, delta))
    }
}

impl Cursor for SequentialCursor {
    fn place(&mut self, skyline: &mut Skyline, width: u32, height: u32) -> Result<(u32, u32)> {
        let mut probe = *self;
        let y = probe.read(skyline, width)?;
        let x = probe.x() - width;
        if x != self.x() {
            // the probe wrapped to a new row
            self.reset();
        }
        skyline.set(self.current, self.offset as i64, width, y.saturating_add(height))?;
        // Splits and merges only touch the run under the cursor and runs to its right, so
        // `current` is still live here.
        if self.try_read(skyline, width).is_none() {
            return Err(row_too_narrow(skyline, width));
        }
        Ok((x, y))
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
