//! Tone calibration: maps the detected job tone to the phrasing guidance
//! handed to the bullet-rewrite capability.

use serde::Serialize;

use crate::tailoring::capabilities::JobTone;

/// Verb guidance for one tone. Serialized into the rewrite prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TailoringStyle {
    pub tone: JobTone,
    pub strong_verbs: Vec<&'static str>,
    pub avoid_verbs: Vec<&'static str>,
    pub emphasis: &'static str,
}

pub fn style_for(tone: JobTone) -> TailoringStyle {
    match tone {
        JobTone::AggressiveStartup => TailoringStyle {
            tone,
            strong_verbs: vec!["Built", "Shipped", "Launched", "Owned", "Drove", "Scaled"],
            avoid_verbs: vec!["assisted", "helped", "participated in"],
            emphasis: "speed, ownership, and measurable outcomes",
        },
        JobTone::CollaborativeEnterprise => TailoringStyle {
            tone,
            strong_verbs: vec![
                "Partnered with",
                "Delivered",
                "Standardized",
                "Improved",
                "Collaborated on",
                "Enabled",
            ],
            avoid_verbs: vec!["disrupted", "hacked", "moved fast"],
            emphasis: "reliability, cross-team impact, and process",
        },
        JobTone::ResearchOriented => TailoringStyle {
            tone,
            strong_verbs: vec!["Investigated", "Designed", "Evaluated", "Published", "Analyzed"],
            avoid_verbs: vec!["shipped", "hustled", "crushed"],
            emphasis: "method, rigor, and findings",
        },
        JobTone::ProductOriented => TailoringStyle {
            tone,
            strong_verbs: vec!["Shipped", "Delivered", "Launched", "Reduced", "Grew"],
            avoid_verbs: vec!["researched", "theorized"],
            emphasis: "user impact and product metrics",
        },
    }
}
