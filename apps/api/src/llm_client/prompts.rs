// Prompt fragments shared by every capability that talks to the model.
// Capability-specific templates live next to their capability.

/// Appended to system prompts of JSON-returning calls.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to system prompts of prose-returning calls.
pub const PLAIN_TEXT_SYSTEM: &str = "Respond with the requested text only. \
    No preamble, no quotation marks, no markdown headings, no explanations.";

/// Factuality rule for every rewrite of the user's own material.
pub const FACTUALITY_INSTRUCTION: &str = "\
    CRITICAL: Use only facts present in the material provided. \
    Do NOT invent employers, numbers, technologies, or outcomes. \
    Rephrase and reorder; never embellish.";

/// Formatting rule for bullet and summary text.
pub const EMPHASIS_INSTRUCTION: &str = "\
    You may wrap at most two short phrases (a metric or a key technology) in **double asterisks** \
    to mark them bold. Use no other markup.";

/// Language rule; `{language}` is replaced with a locale code.
pub const LANGUAGE_INSTRUCTION: &str = "Write the output in the language identified by the \
    locale code `{language}`, even if the input is in another language.";

pub fn language_instruction(code: &str) -> String {
    LANGUAGE_INSTRUCTION.replace("{language}", code)
}
