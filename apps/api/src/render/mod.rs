//! Document Renderer: turns a tailored resume plus the user's library into a
//! single-page, ATS-safe HTML document.
//!
//! Section order is fixed: Header → Summary → Education → Skills → Experience
//! → Projects → Languages. A section whose backing data is empty is omitted.
//! Pure: same inputs, same bytes.

pub mod document;
pub mod escape;
pub mod template;

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::i18n::{format_date, format_date_string, format_gpa, format_proficiency, translate, Locale};
use crate::models::{Education, Project, Resume, Skill, SpokenLanguage, TailoredExperience, User};
use crate::render::document::{Entry, Header, HtmlDocument, Section};

pub use template::{full_stylesheet, PageOptions, Template};

/// Preferred skill-category order; anything else follows in encounter order.
const CATEGORY_ORDER: [&str; 6] = ["Languages", "Frameworks", "Tools", "Databases", "Cloud", "Other"];

/// Everything the renderer reads.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub user: &'a User,
    pub resume: &'a Resume,
    pub education: &'a [Education],
    pub projects: &'a [Project],
    pub languages: &'a [SpokenLanguage],
    pub skills: &'a [Skill],
}

pub fn render_resume(input: RenderInput<'_>, locale: Locale, template: Template) -> String {
    build_document(input, locale, template).into_html()
}

fn build_document(input: RenderInput<'_>, locale: Locale, template: Template) -> HtmlDocument {
    let mut doc = HtmlDocument::new(locale.html_lang(), full_stylesheet(template), header(input.user));
    let content = input.resume.generated_content.as_ref();

    if let Some(content) = content {
        doc.push(Section::paragraph(
            "summary",
            translate(locale, "section.summary"),
            &content.summary,
        ));
    }
    doc.push(Section::entries(
        "education",
        translate(locale, "section.education"),
        input.education.iter().map(|e| education_entry(e, locale)).collect(),
    ));

    let included: Option<HashSet<String>> = content
        .filter(|c| !c.skills.is_empty())
        .map(|c| c.skills.iter().map(|s| s.to_lowercase()).collect());
    doc.push(Section::lines(
        "skills",
        translate(locale, "section.skills"),
        skill_lines(input.skills, included.as_ref(), locale),
    ));

    if let Some(content) = content {
        doc.push(Section::entries(
            "experience",
            translate(locale, "section.experience"),
            content
                .experiences
                .iter()
                .filter(|exp| !exp.bullets.is_empty())
                .map(|exp| experience_entry(exp, locale))
                .collect(),
        ));
    }
    doc.push(Section::entries(
        "projects",
        translate(locale, "section.projects"),
        input.projects.iter().map(|p| project_entry(p, locale)).collect(),
    ));
    doc.push(Section::lines(
        "languages",
        translate(locale, "section.languages"),
        input
            .languages
            .iter()
            .map(|l| (l.name.clone(), format_proficiency(&l.proficiency, locale)))
            .collect(),
    ));

    doc
}

fn header(user: &User) -> Header {
    Header {
        name: user.full_name.clone(),
        headline: user.headline.clone(),
        contact: [
            Some(&user.email),
            user.phone.as_ref(),
            user.location.as_ref(),
            user.linkedin_url.as_ref(),
            user.github_url.as_ref(),
            user.website.as_ref(),
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect(),
    }
}

fn education_entry(education: &Education, locale: Locale) -> Entry {
    let title = match education.field_of_study.as_deref().filter(|f| !f.trim().is_empty()) {
        Some(field) => format!("{}, {}", education.degree, field),
        None => education.degree.clone(),
    };
    let subtitle = match education.location.as_deref().filter(|l| !l.trim().is_empty()) {
        Some(location) => format!("{} · {}", education.institution, location),
        None => education.institution.clone(),
    };
    Entry {
        title,
        dates: text_range(education.start_date.as_deref(), education.end_date.as_deref(), locale),
        subtitle: Some(subtitle),
        details: education.gpa.map(|gpa| format_gpa(gpa, locale)).into_iter().collect(),
        bullets: Vec::new(),
    }
}

fn experience_entry(experience: &TailoredExperience, locale: Locale) -> Entry {
    Entry {
        title: experience.title.clone(),
        dates: Some(experience_range(
            experience.start_date,
            experience.end_date,
            experience.is_current,
            locale,
        )),
        subtitle: Some(experience.organization.clone()),
        details: Vec::new(),
        bullets: experience
            .bullets
            .iter()
            .map(|b| b.tailored_content.clone())
            .collect(),
    }
}

fn project_entry(project: &Project, locale: Locale) -> Entry {
    let mut details = Vec::new();
    if !project.technologies.is_empty() {
        details.push(format!(
            "{}: {}",
            translate(locale, "project.technologies"),
            project.technologies.join(", ")
        ));
    }
    Entry {
        title: project.name.clone(),
        dates: text_range(project.start_date.as_deref(), project.end_date.as_deref(), locale),
        subtitle: project.url.clone(),
        details,
        bullets: project
            .description
            .iter()
            .filter(|d| !d.trim().is_empty())
            .cloned()
            .collect(),
    }
}

/// `is_current` wins over any stored end date.
fn experience_range(
    start: NaiveDate,
    end: Option<NaiveDate>,
    is_current: bool,
    locale: Locale,
) -> String {
    let end = match end {
        Some(end) if !is_current => format_date(end, locale),
        _ => translate(locale, "date.present"),
    };
    format!("{} – {}", format_date(start, locale), end)
}

fn text_range(start: Option<&str>, end: Option<&str>, locale: Locale) -> Option<String> {
    let start = start.map(str::trim).filter(|s| !s.is_empty())?;
    let end = match end.map(str::trim).filter(|e| !e.is_empty()) {
        Some(end) => format_date_string(end, locale),
        None => translate(locale, "date.present"),
    };
    Some(format!("{} – {}", format_date_string(start, locale), end))
}

/// Groups skills by category in the preferred order, unknown categories last.
fn skill_lines(
    skills: &[Skill],
    included: Option<&HashSet<String>>,
    locale: Locale,
) -> Vec<(String, String)> {
    let mut groups: Vec<(String, Vec<&str>)> = Vec::new();

    for skill in skills {
        if let Some(included) = included {
            if !included.contains(&skill.name.to_lowercase()) {
                continue;
            }
        }
        let category = canonical_category(&skill.category);
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, names)) => names.push(&skill.name),
            None => groups.push((category, vec![skill.name.as_str()])),
        }
    }

    // Stable sort keeps encounter order among the unrecognized categories.
    groups.sort_by_key(|(category, _)| {
        CATEGORY_ORDER
            .iter()
            .position(|known| known == category)
            .unwrap_or(CATEGORY_ORDER.len())
    });

    groups
        .into_iter()
        .map(|(category, names)| (category_label(&category, locale), names.join(", ")))
        .collect()
}

fn canonical_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "Other".to_string();
    }
    CATEGORY_ORDER
        .iter()
        .find(|known| known.eq_ignore_ascii_case(trimmed))
        .map(|known| known.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

fn category_label(category: &str, locale: Locale) -> String {
    if CATEGORY_ORDER.contains(&category) {
        translate(locale, &format!("skills.{}", category.to_lowercase()))
    } else {
        category.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobContext, ResumeContent, TailoredBullet};
    use chrono::Utc;
    use uuid::Uuid;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            full_name: "Ada Lovelace".to_string(),
            headline: Some("Backend Engineer".to_string()),
            phone: None,
            location: Some("London".to_string()),
            linkedin_url: None,
            github_url: Some("github.com/ada".to_string()),
            website: None,
            created_at: Utc::now(),
        }
    }

    fn experience(is_current: bool, end: Option<NaiveDate>) -> TailoredExperience {
        TailoredExperience {
            experience_id: Uuid::new_v4(),
            title: "Senior Engineer".to_string(),
            organization: "Acme".to_string(),
            start_date: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            end_date: end,
            is_current,
            bullets: vec![TailoredBullet {
                bullet_id: Uuid::new_v4(),
                original_content: "Built APIs".to_string(),
                tailored_content: "Built **Go** APIs on PostgreSQL".to_string(),
            }],
        }
    }

    fn resume(content: Option<ResumeContent>) -> Resume {
        let mut resume = Resume::new(
            Uuid::new_v4(),
            JobContext {
                job_description: "Backend role".to_string(),
                ..JobContext::default()
            },
        );
        resume.generated_content = content;
        resume
    }

    fn skill(name: &str, category: &str) -> Skill {
        Skill {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.to_string(),
        }
    }

    fn content(experiences: Vec<TailoredExperience>) -> ResumeContent {
        ResumeContent {
            summary: "Engineer with **8 years** of backend work".to_string(),
            experiences,
            skills: vec![],
            analysis: None,
        }
    }

    fn render(resume: &Resume, projects: &[Project], skills: &[Skill], locale: Locale) -> String {
        let user = user();
        render_resume(
            RenderInput {
                user: &user,
                resume,
                education: &[],
                projects,
                languages: &[],
                skills,
            },
            locale,
            Template::Classic,
        )
    }

    #[test]
    fn test_no_projects_means_no_projects_heading() {
        let resume = resume(Some(content(vec![experience(true, None)])));
        let html = render(&resume, &[], &[], Locale::En);
        assert!(!html.contains("Projects"));
        assert!(!html.contains("class=\"projects\""));
        assert!(html.contains("<h2>Experience</h2>"));
    }

    #[test]
    fn test_current_experience_renders_present_even_with_end_date() {
        let end = NaiveDate::from_ymd_opt(2023, 6, 1);
        let resume = resume(Some(content(vec![experience(true, end)])));
        let html = render(&resume, &[], &[], Locale::En);
        assert!(html.contains("Mar 2021 – Present"));
        assert!(!html.contains("Jun 2023"));
    }

    #[test]
    fn test_past_experience_renders_end_date() {
        let end = NaiveDate::from_ymd_opt(2023, 6, 1);
        let resume = resume(Some(content(vec![experience(false, end)])));
        let html = render(&resume, &[], &[], Locale::PtBr);
        assert!(html.contains("03/2021 – 06/2023"));
        assert!(html.contains("<h2>Experiência Profissional</h2>"));
    }

    #[test]
    fn test_sections_follow_fixed_order() {
        let resume = resume(Some(content(vec![experience(true, None)])));
        let user = user();
        let education = vec![Education {
            id: Uuid::new_v4(),
            user_id: user.id,
            institution: "MIT".to_string(),
            degree: "BSc".to_string(),
            field_of_study: Some("Computer Science".to_string()),
            location: None,
            start_date: Some("2015-09".to_string()),
            end_date: None,
            gpa: Some(3.9),
        }];
        let projects = vec![Project {
            id: Uuid::new_v4(),
            user_id: user.id,
            name: "tailor".to_string(),
            description: Some("Resume tooling".to_string()),
            url: None,
            technologies: vec!["Rust".to_string()],
            start_date: None,
            end_date: None,
        }];
        let languages = vec![SpokenLanguage {
            id: Uuid::new_v4(),
            user_id: user.id,
            name: "Portuguese".to_string(),
            proficiency: "native".to_string(),
        }];
        let skills = vec![skill("Go", "Languages")];
        let doc = build_document(
            RenderInput {
                user: &user,
                resume: &resume,
                education: &education,
                projects: &projects,
                languages: &languages,
                skills: &skills,
            },
            Locale::En,
            Template::Classic,
        );
        assert_eq!(
            doc.section_classes(),
            vec!["summary", "education", "skills", "experience", "projects", "languages"]
        );
        let html = doc.into_html();
        assert!(html.contains("Sep 2015 – Present"));
        assert!(html.contains("GPA: 3.90/4.0"));
        assert!(html.contains("<strong>Portuguese:</strong> Native"));
    }

    #[test]
    fn test_skill_categories_use_preferred_order_then_encounter_order() {
        let skills = vec![
            skill("Terraform", "Infrastructure"),
            skill("Docker", "tools"),
            skill("Go", "Languages"),
            skill("Figma", "Design"),
            skill("PostgreSQL", "Databases"),
            skill("Rust", "Languages"),
        ];
        let lines = skill_lines(&skills, None, Locale::En);
        let labels: Vec<&str> = lines.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Languages", "Tools", "Databases", "Infrastructure", "Design"]);
        assert_eq!(lines[0].1, "Go, Rust");
    }

    #[test]
    fn test_skills_restricted_to_resume_selection() {
        let skills = vec![skill("Go", "Languages"), skill("Cobol", "Languages")];
        let included: HashSet<String> = ["go".to_string()].into_iter().collect();
        let lines = skill_lines(&skills, Some(&included), Locale::En);
        assert_eq!(lines, vec![("Languages".to_string(), "Go".to_string())]);
    }

    #[test]
    fn test_user_text_cannot_inject_markup() {
        let mut c = content(vec![experience(true, None)]);
        c.summary = "<img src=x onerror=alert(1)> **bold**".to_string();
        let resume = resume(Some(c));
        let html = render(&resume, &[], &[], Locale::En);
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt; <strong>bold</strong>"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let resume = resume(Some(content(vec![experience(false, None)])));
        let skills = vec![skill("Go", "Languages")];
        assert_eq!(
            render(&resume, &[], &skills, Locale::Fr),
            render(&resume, &[], &skills, Locale::Fr)
        );
    }

    #[test]
    fn test_missing_summary_and_content_omit_sections() {
        let resume = resume(None);
        let html = render(&resume, &[], &[], Locale::En);
        assert!(!html.contains("<section"));
        assert!(html.contains("<h1>Ada Lovelace</h1>"));
    }
}
