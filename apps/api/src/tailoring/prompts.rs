// Prompt constants for the tailoring capabilities.
// Cross-cutting fragments come from llm_client::prompts.

pub const ANALYZE_SYSTEM: &str = "You are an expert technical recruiter. \
    Read a job description and extract structured information about the role.";

/// Replace: {jd_text}, {language_instruction}
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Analyze the following job description.

Return a JSON object with this EXACT schema:
{
  "title": "Senior Backend Engineer",
  "company": "Acme Corp",
  "required_skills": ["Go", "PostgreSQL"],
  "preferred_skills": ["Kubernetes"],
  "keywords": ["microservices", "high availability"],
  "tone": "CollaborativeEnterprise",
  "seniority": "senior"
}

Rules:
- "title" and "company": as written in the posting; empty string if absent.
- "required_skills": explicit must-haves ("required", "must have", minimum years).
- "preferred_skills": nice-to-haves ("preferred", "bonus", "a plus").
- "keywords": other technical terms and domain concepts an applicant tracking system would scan for.
- "tone": exactly one of "AggressiveStartup", "CollaborativeEnterprise", "ResearchOriented", "ProductOriented".
- "seniority": one of "junior", "mid", "senior", "staff", "principal", "director", "unknown".
- Keep skill names short and canonical ("PostgreSQL", not "experience with PostgreSQL databases").
- {language_instruction} This applies to "keywords" only; keep technology names as-is.

JOB DESCRIPTION:
{jd_text}"#;

pub const SELECT_SYSTEM: &str = "You are an expert resume strategist choosing which \
    achievements best support an application for a specific role.";

/// Replace: {max_count}, {language}, {analysis_json}, {bullets_json}
pub const SELECT_PROMPT_TEMPLATE: &str = r#"Choose at most {max_count} bullets from the candidate list that make the strongest case for this role.

ROLE ANALYSIS:
{analysis_json}

CANDIDATE BULLETS (pre-ranked, most relevant first; "relevance" is keyword overlap 0-1, "impact" is the user's own 0-1 rating):
{bullets_json}

Return a JSON ARRAY of the chosen bullet "id" values, best first:
["3f1c...", "9a2b..."]

Rules:
1. Use ONLY ids from the candidate list, each at most once.
2. Prefer bullets covering required skills, then preferred skills, then keywords.
3. Prefer quantified outcomes over duties.
4. Cover several experiences when the material allows it; do not pick near-duplicates.
5. The resume will be written for locale `{language}`. Judge each bullet by its meaning, not by the language it is written in."#;

pub const TAILOR_SYSTEM: &str = "You are an expert resume writer rewriting a single \
    achievement bullet so it speaks directly to a target role.";

/// Replace: {factuality_instruction}, {emphasis_instruction}, {language_instruction},
///          {style_json}, {analysis_json}, {bullet_text}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"{factuality_instruction}

{emphasis_instruction}

{language_instruction}

STYLE for this role:
{style_json}

ROLE ANALYSIS:
{analysis_json}

ORIGINAL BULLET:
{bullet_text}

Rewrite the bullet as ONE line of at most 30 words. Start with a strong past-tense verb from the style (or a close synonym), never with a verb listed under "avoid_verbs". Work in the role's keywords only where the original supports them. Return only the rewritten bullet."#;

pub const SUMMARY_SYSTEM: &str = "You are an expert resume writer composing the \
    professional summary at the top of a tailored resume.";

/// Replace: {factuality_instruction}, {emphasis_instruction}, {language_instruction},
///          {profile_json}, {analysis_json}, {bullets_json}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"{factuality_instruction}

{emphasis_instruction}

{language_instruction}

CANDIDATE PROFILE:
{profile_json}

ROLE ANALYSIS:
{analysis_json}

TAILORED ACHIEVEMENTS (source of truth):
{bullets_json}

Write a 2-3 sentence professional summary in the first person implied (no "I"), aimed at this role. Lead with seniority and core stack, then the strongest evidence from the achievements. Return only the summary."#;

pub const SCORE_SYSTEM: &str = "You are an applicant tracking system estimating how well \
    a resume fits a job.";

/// Replace: {analysis_json}, {content_json}, {skills_json}
pub const SCORE_PROMPT_TEMPLATE: &str = r#"Estimate how well this resume matches the role.

ROLE ANALYSIS:
{analysis_json}

RESUME CONTENT:
{content_json}

CANDIDATE SKILLS:
{skills_json}

Return a JSON object: {"score": 0-100}
Weigh required skills about twice as much as preferred skills. 100 means every requirement is clearly evidenced."#;
