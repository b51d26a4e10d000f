//! # Page Break Decisions
//!
//! Deciding whether the next node starts on the current page or a new one.
//! Nodes are never split by the engine itself: text and images move whole,
//! and rows either move whole or let their children break individually,
//! depending on [`RowBreakPolicy`](super::RowBreakPolicy).

/// What to do with a node before placing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakDecision {
    /// Place the node on the current page.
    Place,
    /// Start a new page and place the node at its top.
    MoveToNextPage,
}

/// Decide whether a node of `needed` height fits in `remaining_height`.
///
/// A node that does not fit still goes on the current page when the page
/// has no content yet: moving it would only produce a blank page and the
/// node would not fit on the next one either.
pub fn decide_break(remaining_height: f64, needed: f64, page_has_content: bool) -> BreakDecision {
    if needed <= remaining_height {
        return BreakDecision::Place;
    }

    if !page_has_content {
        return BreakDecision::Place;
    }

    BreakDecision::MoveToNextPage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_fits() {
        assert_eq!(decide_break(100.0, 90.0, true), BreakDecision::Place);
    }

    #[test]
    fn exact_fit_places() {
        assert_eq!(decide_break(100.0, 100.0, true), BreakDecision::Place);
    }

    #[test]
    fn overflow_moves() {
        assert_eq!(decide_break(50.0, 90.0, true), BreakDecision::MoveToNextPage);
    }

    #[test]
    fn oversized_node_stays_on_fresh_page() {
        assert_eq!(decide_break(600.0, 2000.0, false), BreakDecision::Place);
    }

    #[test]
    fn negative_remaining_still_moves() {
        // Cursor already past the limit after an oversized node
        assert_eq!(decide_break(-20.0, 5.0, true), BreakDecision::MoveToNextPage);
    }
}
