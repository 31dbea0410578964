//! Cell occupancy derived from a registration snapshot.

use std::collections::BTreeSet;
use std::ops::Range;

use kiosk_entity::Registration;

use crate::search::DepthSearch;

/// Which depths are taken on each line.
///
/// A registration claims its depth on every line of its span, clipped to
/// the configured line count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    lines: Vec<BTreeSet<u32>>,
}

impl Occupancy {
    /// An occupancy grid with no claimed cells.
    pub fn empty(line_count: u32) -> Self {
        Self {
            lines: vec![BTreeSet::new(); line_count as usize],
        }
    }

    /// Mark every registration's cells.
    pub fn from_registrations<'a>(
        registrations: impl IntoIterator<Item = &'a Registration>,
        line_count: u32,
    ) -> Self {
        let mut occupancy = Self::empty(line_count);
        for registration in registrations {
            occupancy.claim(registration.line, registration.party_size, registration.depth);
        }
        occupancy
    }

    /// Number of lines tracked.
    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Claim `depth` on lines `[line, line + width)`. Returns `false` if any
    /// of those cells was already taken.
    pub fn claim(&mut self, line: u32, width: u32, depth: u32) -> bool {
        let mut clean = true;
        for l in self.clip(line, width) {
            clean &= self.lines[l as usize].insert(depth);
        }
        clean
    }

    /// Returns `true` if `(line, depth)` is taken.
    pub fn is_occupied(&self, line: u32, depth: u32) -> bool {
        self.lines
            .get(line as usize)
            .is_some_and(|depths| depths.contains(&depth))
    }

    /// Returns `true` if `depth` is free on every line of the span.
    pub fn is_free_across(&self, line: u32, width: u32, depth: u32) -> bool {
        self.clip(line, width)
            .all(|l| !self.lines[l as usize].contains(&depth))
    }

    /// Deepest claimed depth on any line of the span, 0 when all are empty.
    pub fn max_depth_across(&self, line: u32, width: u32) -> u32 {
        self.clip(line, width)
            .filter_map(|l| self.lines[l as usize].last().copied())
            .max()
            .unwrap_or(0)
    }

    /// Smallest unclaimed depth on `line`, probing at most `cap` depths.
    pub fn earliest_free_depth(&self, line: u32, cap: u32) -> DepthSearch {
        self.earliest_common_free_depth(line, 1, cap)
    }

    /// Smallest depth unclaimed on every line of the span, probing at most
    /// `cap` depths.
    pub fn earliest_common_free_depth(&self, line: u32, width: u32, cap: u32) -> DepthSearch {
        if self.clip(line, width).is_empty() {
            return DepthSearch::Exhausted;
        }
        DepthSearch::run(cap, |depth| self.is_free_across(line, width, depth))
    }

    /// Total claimed cells.
    pub fn claimed_cells(&self) -> usize {
        self.lines.iter().map(BTreeSet::len).sum()
    }

    fn clip(&self, line: u32, width: u32) -> Range<u32> {
        let end = line.saturating_add(width).min(self.line_count());
        line.min(end)..end
    }
}

/// First `(line, depth)` claimed by more than one registration, if any.
pub fn find_conflict<'a>(
    registrations: impl IntoIterator<Item = &'a Registration>,
    line_count: u32,
) -> Option<(u32, u32)> {
    let mut occupancy = Occupancy::empty(line_count);
    for registration in registrations {
        for line in registration.spanned_lines(line_count) {
            if occupancy.is_occupied(line, registration.depth) {
                return Some((line, registration.depth));
            }
        }
        occupancy.claim(registration.line, registration.party_size, registration.depth);
    }
    None
}
