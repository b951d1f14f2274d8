use super::{translate, Locale};

/// GPAs above this are read as 0–10 scale grades.
const FOUR_POINT_MAX: f64 = 4.0;

/// Renders a GPA with the label and denominator of its scale.
pub fn format_gpa(gpa: f64, locale: Locale) -> String {
    if gpa > FOUR_POINT_MAX {
        format!("{}: {:.1}/10", translate(locale, "gpa.scale10"), gpa)
    } else {
        format!("{}: {:.2}/4.0", translate(locale, "gpa.scale4"), gpa)
    }
}

/// Translates a language proficiency level; unknown levels pass through as given.
pub fn format_proficiency(level: &str, locale: Locale) -> String {
    let normalized = level.trim().to_ascii_lowercase();
    let key = match normalized.as_str() {
        "native" | "native speaker" | "mother tongue" => "proficiency.native",
        "fluent" | "proficient" => "proficiency.fluent",
        "advanced" => "proficiency.advanced",
        "intermediate" => "proficiency.intermediate",
        "basic" | "beginner" | "elementary" => "proficiency.basic",
        _ => return level.to_string(),
    };
    translate(locale, key)
}
