/// Download filename for a resume: company first, then job title, then a generic name.
pub fn pdf_filename(company_name: Option<&str>, job_title: Option<&str>) -> String {
    [company_name, job_title]
        .into_iter()
        .flatten()
        .map(sanitize)
        .find(|s| !s.is_empty())
        .map(|s| format!("resume_{s}.pdf"))
        .unwrap_or_else(|| "resume.pdf".to_string())
}

/// Strips path and filesystem-unsafe characters and joins words with `_`.
fn sanitize(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("_")
}
