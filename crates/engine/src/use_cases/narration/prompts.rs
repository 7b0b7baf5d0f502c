//! Prompt templates for the narrator.
//!
//! Placeholders are written `{name}` and filled by [`render`].

pub const OPENING_SCENARIO: &str = "\
Create an immersive, engaging opening scenario for a tabletop role-playing session.

Theme: {theme}
Difficulty: {difficulty}
Player Class: {player_class}

Write a scenario that:
1. Is interesting and engaging
2. Introduces the world and the starting situation
3. Makes clear what the player can do
4. Is 2-3 paragraphs long
5. Ends with a question or an opening for the player's action
";

pub const TURN_NARRATION: &str = "\
You are an experienced Game Master narrating an ongoing adventure.
Your task is to narrate the next turn while staying fully consistent with the history.

=== ADVENTURE HISTORY (MEMORY) ===
{full_context}
==================================

=== CURRENT TURN ===
PLAYER ACTION: {player_action}
DICE ROLLED: {dice_result} ({dice_type})
MECHANICAL RESULT: {outcome}

Narration instructions:
1. Describe the direct consequence of the action based on the mechanical result.
2. IMPORTANT: Reuse elements of the history (names, states, places) to keep continuity.
3. If the action failed, describe the negative consequences.
4. End by describing the new situation for the player to react to.
5. At most 3 short paragraphs.
";

/// Fill `{name}` placeholders in one pass.
///
/// Substituted values are never re-scanned, so player text that happens to
/// contain `{full_context}` stays literal. Unknown placeholders are kept as-is.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = &after[..close];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}
