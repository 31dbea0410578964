//! Gap closing after a registration leaves the grid.
//!
//! Passes run over the remaining registrations in (depth, line) order.
//! Anything at or above the vacated depth stays put. Anything deeper tries
//! to step up by one, provided the target is still at or below the vacated
//! depth and free on every spanned line in the occupancy built so far in
//! this pass. Passes repeat until one moves nothing.

use serde::{Deserialize, Serialize};

use kiosk_core::types::id::RegistrationId;
use kiosk_entity::Registration;

use crate::context::QueueContext;
use crate::occupancy::Occupancy;

/// A depth change to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthMove {
    /// Registration being moved.
    pub id: RegistrationId,
    /// Depth before compaction.
    pub from: u32,
    /// Depth after compaction.
    pub to: u32,
}

/// Net result of a compaction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactionPlan {
    /// One entry per registration whose depth changed, in final (depth, line) order.
    pub moves: Vec<DepthMove>,
    /// Passes executed, including the final no-op pass.
    pub passes: usize,
}

impl CompactionPlan {
    /// Returns `true` if nothing moved.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Apply the moves to an in-memory registration set.
    pub fn apply(&self, registrations: &mut [Registration]) {
        for mv in &self.moves {
            if let Some(reg) = registrations.iter_mut().find(|r| r.id == mv.id) {
                reg.depth = mv.to;
            }
        }
    }
}

struct Slot {
    id: RegistrationId,
    line: u32,
    width: u32,
    original: u32,
    depth: u32,
}

/// Plan the moves that close the gap left at `start_depth`.
///
/// `remaining` must no longer contain the departed registration.
pub fn compact(ctx: &QueueContext, remaining: &[Registration], start_depth: u32) -> CompactionPlan {
    let mut slots: Vec<Slot> = remaining
        .iter()
        .map(|r| Slot {
            id: r.id,
            line: r.line,
            width: r.party_size,
            original: r.depth,
            depth: r.depth,
        })
        .collect();

    let mut passes = 0;
    loop {
        passes += 1;
        slots.sort_by_key(|s| (s.depth, s.line));
        let mut occupancy = Occupancy::empty(ctx.line_count);
        let mut moved = false;

        for slot in &mut slots {
            if slot.depth > start_depth {
                let target = slot.depth - 1;
                if target >= start_depth && occupancy.is_free_across(slot.line, slot.width, target) {
                    slot.depth = target;
                    moved = true;
                }
            }
            occupancy.claim(slot.line, slot.width, slot.depth);
        }

        if !moved {
            break;
        }
    }

    slots.sort_by_key(|s| (s.depth, s.line));
    let moves = slots
        .iter()
        .filter(|s| s.depth != s.original)
        .map(|s| DepthMove {
            id: s.id,
            from: s.original,
            to: s.depth,
        })
        .collect();

    CompactionPlan { moves, passes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::find_conflict;
    use kiosk_entity::{Contact, NewRegistration};

    fn reg(line: u32, party_size: u32, depth: u32) -> Registration {
        NewRegistration {
            name: format!("{line}/{depth}"),
            contact: Contact::default(),
            party_size,
            line,
            depth,
        }
        .into_registration()
    }

    fn depth_of(regs: &[Registration], line: u32, name_depth: u32) -> u32 {
        let name = format!("{line}/{name_depth}");
        regs.iter().find(|r| r.name == name).map(|r| r.depth).unwrap()
    }

    #[test]
    fn test_nothing_to_shift() {
        let ctx = QueueContext::new(3);
        let plan = compact(&ctx, &[], 1);
        assert!(plan.is_empty());
        assert_eq!(plan.passes, 1);
    }

    #[test]
    fn test_single_line_closes_gap() {
        let ctx = QueueContext::new(3);
        // depth 1 on line 0 was removed
        let mut regs = vec![reg(0, 1, 2), reg(0, 1, 3), reg(1, 1, 1)];
        let plan = compact(&ctx, &regs, 1);
        assert_eq!(plan.moves.len(), 2);
        plan.apply(&mut regs);
        assert_eq!(depth_of(&regs, 0, 2), 1);
        assert_eq!(depth_of(&regs, 0, 3), 2);
        assert_eq!(depth_of(&regs, 1, 1), 1);
    }

    #[test]
    fn test_span_blocked_by_neighbour() {
        let ctx = QueueContext::new(3);
        // line 0 depth 1 removed; the pair at depth 2 still overlaps line 1 depth 1
        let regs = vec![reg(1, 1, 1), reg(0, 2, 2)];
        let plan = compact(&ctx, &regs, 1);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_span_moves_when_all_lines_free() {
        let ctx = QueueContext::new(3);
        let mut regs = vec![reg(0, 2, 2), reg(2, 1, 1)];
        let plan = compact(&ctx, &regs, 1);
        assert_eq!(plan.moves.len(), 1);
        assert_eq!(plan.moves[0].from, 2);
        assert_eq!(plan.moves[0].to, 1);
        plan.apply(&mut regs);
        assert_eq!(find_conflict(&regs, 3), None);
    }

    #[test]
    fn test_never_moves_above_start_depth() {
        let ctx = QueueContext::new(3);
        // a hole at depth 1 on line 2 predates the removal at depth 3
        let regs = vec![reg(0, 1, 1), reg(0, 1, 2), reg(0, 1, 4), reg(2, 1, 2)];
        let plan = compact(&ctx, &regs, 3);
        assert_eq!(plan.moves.len(), 1);
        assert_eq!(plan.moves[0].to, 3);
    }

    #[test]
    fn test_multiple_passes_cascade() {
        let ctx = QueueContext::new(2);
        // line 0 depth 1 removed; the pair follows the singles up in the same pass
        let regs = vec![reg(0, 1, 2), reg(1, 1, 2), reg(0, 2, 3)];
        let plan = compact(&ctx, &regs, 1);
        assert!(plan.passes >= 2);
        let mut after = regs.clone();
        plan.apply(&mut after);
        assert_eq!(find_conflict(&after, 2), None);
        assert_eq!(depth_of(&after, 0, 2), 1);
        assert_eq!(depth_of(&after, 1, 2), 1);
        assert_eq!(depth_of(&after, 0, 3), 2);
    }

    #[test]
    fn test_stale_hole_takes_two_passes() {
        let ctx = QueueContext::new(2);
        // line 1 depth 2 was already empty before depth 1 left
        let mut regs = vec![reg(0, 1, 1), reg(1, 1, 3)];
        let plan = compact(&ctx, &regs, 1);
        assert_eq!(plan.passes, 3);
        assert_eq!(plan.moves.len(), 1);
        assert_eq!(plan.moves[0].from, 3);
        assert_eq!(plan.moves[0].to, 1);
        plan.apply(&mut regs);
        assert_eq!(depth_of(&regs, 1, 3), 1);
    }

    #[test]
    fn test_no_reachable_smaller_depth_after_compaction() {
        let ctx = QueueContext::new(3);
        let mut regs = vec![
            reg(0, 1, 2),
            reg(1, 2, 2),
            reg(0, 3, 3),
            reg(2, 1, 4),
            reg(0, 1, 5),
        ];
        compact(&ctx, &regs, 1).apply(&mut regs);
        assert_eq!(find_conflict(&regs, 3), None);
        for r in &regs {
            if r.depth > 1 {
                let others: Vec<_> = regs.iter().filter(|o| o.id != r.id).collect();
                let occ = Occupancy::from_registrations(others, 3);
                assert!(
                    !occ.is_free_across(r.line, r.party_size, r.depth - 1),
                    "{} could still step up",
                    r.name
                );
            }
        }
    }
}
