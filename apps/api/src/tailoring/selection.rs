//! Bullet ranking: orders the library before it is shown to the selection
//! model, and cleans up whatever the model sends back.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::Bullet;
use crate::tailoring::capabilities::JobAnalysis;

/// Weight of job relevance vs. stored impact in the combined rank.
const RELEVANCE_WEIGHT: f64 = 0.6;
const IMPACT_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone)]
pub struct RankedBullet<'a> {
    pub bullet: &'a Bullet,
    pub relevance: f64,
    pub combined_score: f64,
}

/// Fraction of the job's terms this bullet covers, by keyword tag or text.
pub fn compute_relevance(bullet: &Bullet, analysis: &JobAnalysis) -> f64 {
    let terms = analysis.all_terms();
    if terms.is_empty() {
        return 0.0;
    }
    let content = bullet.content.to_lowercase();
    let hits = terms
        .iter()
        .filter(|term| {
            let term = term.to_lowercase();
            bullet.keywords.iter().any(|k| k.to_lowercase() == term) || content.contains(&term)
        })
        .count();
    hits as f64 / terms.len() as f64
}

/// Highest combined score first; ties keep library order.
pub fn rank_bullets<'a>(bullets: &'a [Bullet], analysis: &JobAnalysis) -> Vec<RankedBullet<'a>> {
    let mut ranked: Vec<RankedBullet<'a>> = bullets
        .iter()
        .map(|bullet| {
            let relevance = compute_relevance(bullet, analysis);
            let impact = bullet.impact_score.clamp(0.0, 1.0);
            RankedBullet {
                bullet,
                relevance,
                combined_score: RELEVANCE_WEIGHT * relevance + IMPACT_WEIGHT * impact,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Drops unknown and repeated IDs and caps the list at `max_count`, keeping the model's order.
pub fn sanitize_selection(chosen: Vec<Uuid>, bullets: &[Bullet], max_count: usize) -> Vec<Uuid> {
    let known: HashSet<Uuid> = bullets.iter().map(|b| b.id).collect();
    let mut seen = HashSet::new();
    chosen
        .into_iter()
        .filter(|id| known.contains(id) && seen.insert(*id))
        .take(max_count)
        .collect()
}
