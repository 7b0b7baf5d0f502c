//! Full-context assembly: the memory handed to the narrator each turn.

use std::fmt::Write;

use taleturn_domain::Action;

/// Concatenate the initial scenario and the transcript of prior turns.
///
/// `prior` must already be in ascending order; entries are numbered by
/// position (1-based), so the numbering always matches what the narrator saw.
pub fn build_full_context(initial_scenario: &str, prior: &[Action]) -> String {
    let mut context = format!("Initial Scenario: {}\n\n", initial_scenario);

    if prior.is_empty() {
        return context;
    }

    context.push_str("Action History:\n");
    for (index, action) in prior.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = write!(
            context,
            "{}. Action: {}\n   Roll: {} on a {}\n   Narration: {}\n\n",
            index + 1,
            action.description().as_str(),
            action.dice_result(),
            action.dice_type(),
            action.narration()
        );
    }

    context
}
