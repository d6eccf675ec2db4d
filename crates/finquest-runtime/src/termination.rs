//! Terminal-turn detection
//!
//! A reasoning turn is terminal iff its content contains the exact
//! case-sensitive sentinel substring. Pure and stateless; consulted once
//! per iteration, before any parsing or dispatch.

/// The literal marker a terminal reasoning turn must contain
pub const FINAL_ANSWER_SENTINEL: &str = "Final Answer:";

/// Extract the final answer from a reasoning turn, if it is terminal
///
/// Returns the trimmed text following the sentinel. `None` means the turn
/// is not terminal.
pub fn final_answer(content: &str) -> Option<&str> {
    content
        .find(FINAL_ANSWER_SENTINEL)
        .map(|at| content[at + FINAL_ANSWER_SENTINEL.len()..].trim())
}

/// Whether the turn is terminal
pub fn is_terminal(content: &str) -> bool {
    final_answer(content).is_some()
}
