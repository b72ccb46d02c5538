//! Piecewise-constant height profile across the page width.
//!
//! The profile is a doubly-linked chain of runs ([`Interval`]) stored in an arena and
//! addressed by [`IntervalId`]. The chain always spans exactly the page width and always
//! starts at [`IntervalId::HEAD`], which may be split or grown but is never removed.

use crate::error::{PackError, Result};
use std::fmt;

/// Stable index of a run inside a [`Skyline`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntervalId(u32);

impl IntervalId {
    /// First run of every chain.
    pub const HEAD: IntervalId = IntervalId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One run of the profile: `length` positions sharing the same `value`.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    length: u32,
    value: u32,
    prev: Option<IntervalId>,
    next: Option<IntervalId>,
}

impl Interval {
    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }
    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }
    #[inline]
    pub fn prev(&self) -> Option<IntervalId> {
        self.prev
    }
    #[inline]
    pub fn next(&self) -> Option<IntervalId> {
        self.next
    }
}

/// A run as seen while walking the chain, with its absolute start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub id: IntervalId,
    pub start: u32,
    pub length: u32,
    pub value: u32,
}

pub struct Skyline {
    width: u32,
    nodes: Vec<Interval>,
    free: Vec<IntervalId>,
}

impl Skyline {
    /// Creates a single zero-valued run spanning `width`. `width` must be non-zero.
    pub fn new(width: u32) -> Self {
        debug_assert!(width > 0, "skyline width must be non-zero");
        Self {
            width,
            nodes: vec![Self::fresh_head(width)],
            free: Vec::new(),
        }
    }

    fn fresh_head(width: u32) -> Interval {
        Interval {
            length: width,
            value: 0,
            prev: None,
            next: None,
        }
    }

    /// Discards the chain and starts over with one zero-valued run of full width.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.nodes.push(Self::fresh_head(self.width));
    }

    #[inline]
    pub fn head(&self) -> IntervalId {
        IntervalId::HEAD
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of live runs in the chain.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the run behind `id`. Panics on ids that never belonged to this skyline.
    #[inline]
    pub fn get(&self, id: IntervalId) -> &Interval {
        &self.nodes[id.index()]
    }

    pub fn runs(&self) -> Runs<'_> {
        Runs {
            skyline: self,
            next: Some(IntervalId::HEAD),
            start: 0,
        }
    }

    /// Highest value anywhere on the chain.
    pub fn max_value(&self) -> u32 {
        self.runs().map(|r| r.value).max().unwrap_or(0)
    }

    /// Maximum value over `[start(id), start(id) + width)`, or `None` if the chain ends first.
    pub fn span_max(&self, id: IntervalId, width: u32) -> Option<u32> {
        let mut remaining = width;
        let mut max = 0;
        let mut cur = Some(id);
        while remaining > 0 {
            let run = self.get(cur?);
            max = max.max(run.value);
            remaining = remaining.saturating_sub(run.length);
            cur = run.next;
        }
        Some(max)
    }

    fn alloc(&mut self, interval: Interval) -> IntervalId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = interval;
            id
        } else {
            let id = IntervalId(self.nodes.len() as u32);
            self.nodes.push(interval);
            id
        }
    }

    fn insert_after(&mut self, prev: IntervalId, length: u32, value: u32) -> IntervalId {
        let next = self.nodes[prev.index()].next;
        let id = self.alloc(Interval {
            length,
            value,
            prev: Some(prev),
            next,
        });
        self.nodes[prev.index()].next = Some(id);
        if let Some(n) = next {
            self.nodes[n.index()].prev = Some(id);
        }
        id
    }

    fn unlink(&mut self, id: IntervalId) {
        let Interval { prev, next, .. } = self.nodes[id.index()];
        if let Some(p) = prev {
            self.nodes[p.index()].next = next;
        }
        if let Some(n) = next {
            self.nodes[n.index()].prev = prev;
        }
        self.nodes[id.index()] = Interval {
            length: 0,
            value: 0,
            prev: None,
            next: None,
        };
        self.free.push(id);
    }

    /// Splices a non-head run out of the chain.
    ///
    /// The removed positions are no longer covered, so callers must hand its length to a
    /// neighbour first; `merge_next` is the only in-crate user.
    pub fn remove(&mut self, id: IntervalId) -> Result<()> {
        if id == IntervalId::HEAD {
            return Err(PackError::HeadRemoval {
                chain: self.to_string(),
            });
        }
        self.unlink(id);
        Ok(())
    }

    /// Splits the run at local `offset` in `(0, length)`. Both halves keep the value; the new
    /// right half is returned.
    pub fn split(&mut self, id: IntervalId, offset: u32) -> Result<IntervalId> {
        let Interval { length, value, .. } = self.nodes[id.index()];
        if offset == 0 || offset >= length {
            return Err(PackError::SplitOutOfRange {
                offset,
                length,
                chain: self.to_string(),
            });
        }
        self.nodes[id.index()].length = offset;
        Ok(self.insert_after(id, length - offset, value))
    }

    /// Fuses the run with its successor if the successor is no longer than `max_growth`
    /// (`None` merges unconditionally). The result takes the larger value.
    ///
    /// Returns the length gained, 0 if the merge was refused.
    pub fn merge_next(&mut self, id: IntervalId, max_growth: Option<u32>) -> Result<u32> {
        let next = match self.nodes[id.index()].next {
            Some(n) => n,
            None => {
                return Err(PackError::NoSuccessor {
                    chain: self.to_string(),
                });
            }
        };
        let Interval { length, value, .. } = self.nodes[next.index()];
        if matches!(max_growth, Some(max) if length > max) {
            return Ok(0);
        }
        let node = &mut self.nodes[id.index()];
        node.value = node.value.max(value);
        node.length += length;
        self.remove(next)?;
        Ok(length)
    }

    /// Merges successors into the run until it is at least `target` long. A successor that
    /// would overshoot is split first, so the run ends at exactly `target`.
    pub fn merge_to_length(&mut self, id: IntervalId, target: u32) -> Result<()> {
        let length = self.nodes[id.index()].length;
        if target <= length {
            return Ok(());
        }
        let mut remaining = target - length;
        while remaining > 0 {
            let Some(next) = self.nodes[id.index()].next else {
                return Err(PackError::ChainOverflow {
                    target,
                    reached: target - remaining,
                    chain: self.to_string(),
                });
            };
            if self.nodes[next.index()].length > remaining {
                self.split(next, remaining)?;
            }
            remaining -= self.merge_next(id, Some(remaining))?;
        }
        Ok(())
    }

    /// Assigns `value` to `[start(id) + offset, start(id) + offset + width)`.
    ///
    /// `offset` may point before or past the run; the walk moves along the chain until it
    /// lands inside one. Runs outside the span keep their boundaries, except that the run
    /// holding the span's start is split there and the span is carved out of its
    /// neighbours exactly. Setting an empty span is a no-op.
    pub fn set(&mut self, id: IntervalId, offset: i64, width: u32, value: u32) -> Result<()> {
        if width == 0 {
            return Ok(());
        }
        let (mut id, offset) = self.seek(id, offset)?;
        if offset > 0 {
            id = self.split(id, offset)?;
        }
        let length = self.nodes[id.index()].length;
        if width < length {
            self.split(id, width)?;
        } else if width > length {
            self.merge_to_length(id, width)?;
        }
        self.nodes[id.index()].value = value;
        Ok(())
    }

    /// Normalizes a run-relative offset into `(run, offset)` with `0 <= offset < length`.
    fn seek(&self, id: IntervalId, offset: i64) -> Result<(IntervalId, u32)> {
        let seek_error = || PackError::SeekOutOfRange {
            offset,
            chain: self.to_string(),
        };
        let mut id = id;
        let mut local = offset;
        while local < 0 {
            let prev = self.nodes[id.index()].prev.ok_or_else(seek_error)?;
            local += self.nodes[prev.index()].length as i64;
            id = prev;
        }
        while local >= self.nodes[id.index()].length as i64 {
            let next = self.nodes[id.index()].next.ok_or_else(seek_error)?;
            local -= self.nodes[id.index()].length as i64;
            id = next;
        }
        Ok((id, local as u32))
    }
}

impl fmt::Debug for Skyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skyline")
            .field("width", &self.width)
            .field("chain", &format_args!("{self}"))
            .finish()
    }
}

/// `0..7(1) -- 8..15(0)`: inclusive run bounds with the value in parentheses.
impl fmt::Display for Skyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, run) in self.runs().enumerate() {
            if i > 0 {
                f.write_str(" -- ")?;
            }
            write!(
                f,
                "{}..{}({})",
                run.start,
                run.start + run.length.saturating_sub(1),
                run.value
            )?;
        }
        Ok(())
    }
}

/// Iterator over the live runs, left to right.
pub struct Runs<'a> {
    skyline: &'a Skyline,
    next: Option<IntervalId>,
    start: u32,
}

impl Iterator for Runs<'_> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        let id = self.next?;
        let node = self.skyline.get(id);
        let run = Run {
            id,
            start: self.start,
            length: node.length,
            value: node.value,
        };
        self.start += node.length;
        self.next = node.next;
        Some(run)
    }
}
