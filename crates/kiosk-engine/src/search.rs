//! Bounded depth search.

/// Outcome of probing depths `1..=max_iterations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthSearch {
    /// First depth accepted by the predicate.
    Found(u32),
    /// No depth within the bound was accepted.
    Exhausted,
}

impl DepthSearch {
    /// Probe depths from 1 upward until `is_free` accepts one or the bound is hit.
    pub fn run(max_iterations: u32, mut is_free: impl FnMut(u32) -> bool) -> Self {
        (1..=max_iterations)
            .find(|&depth| is_free(depth))
            .map_or(Self::Exhausted, Self::Found)
    }

    /// The found depth, if any.
    pub fn found(self) -> Option<u32> {
        match self {
            Self::Found(depth) => Some(depth),
            Self::Exhausted => None,
        }
    }
}
