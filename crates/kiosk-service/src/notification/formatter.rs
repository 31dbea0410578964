//! Participant-facing message text.

/// Sent after a successful join.
pub fn joined(party_size: u32, depth: u32, line: u32, wait_minutes: u32) -> String {
    let span = if party_size > 1 {
        format!(" spanning {party_size} lines")
    } else {
        String::new()
    };
    format!(
        "You are in the queue{span}! Depth {depth}, starting line {}. Estimated wait time is {wait_minutes} minutes.",
        line + 1
    )
}

/// Sent when a party is admitted.
pub fn served() -> &'static str {
    "You are next in the queue!"
}

/// Reply to an SMS cancellation.
pub fn cancelled() -> &'static str {
    "You have been removed from the queue."
}
