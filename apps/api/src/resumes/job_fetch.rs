//! Job-posting fetch: download a posting page and extract the structured job.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;

/// Page text beyond this is dropped before extraction.
const MAX_PAGE_CHARS: usize = 20_000;
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[async_trait]
pub trait JobPostingFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<JobPosting, AppError>;
}

const EXTRACT_SYSTEM: &str = "You extract job postings from the text of career web pages.";

/// Replace: {page_text}
const EXTRACT_PROMPT_TEMPLATE: &str = r#"The text below was scraped from a job posting page. Extract the posting.

Return a JSON object with this EXACT schema:
{
  "title": "Senior Backend Engineer",
  "company": "Acme Corp",
  "description": "Full job description: responsibilities, requirements, benefits.",
  "location": "Remote"
}

Use an empty string when the title or company is not stated and null for an unknown location.
Keep the description faithful to the page; drop navigation, cookie banners and unrelated listings.

PAGE TEXT:
{page_text}"#;

pub struct HttpJobPostingFetcher {
    http: Client,
    llm: LlmClient,
}

impl HttpJobPostingFetcher {
    pub fn new(llm: LlmClient) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: Client::builder()
                .timeout(FETCH_TIMEOUT)
                .user_agent(concat!("tailor-api/", env!("CARGO_PKG_VERSION")))
                .build()?,
            llm,
        })
    }
}

#[async_trait]
impl JobPostingFetcher for HttpJobPostingFetcher {
    async fn fetch(&self, url: &Url) -> Result<JobPosting, AppError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::JobFetch(format!("Could not reach {url}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::JobFetch(format!("{url} returned {status}")));
        }
        let html = response
            .text()
            .await
            .map_err(|e| AppError::JobFetch(format!("Could not read {url}: {e}")))?;

        let text = html_to_text(&html);
        if text.is_empty() {
            return Err(AppError::JobFetch(format!("{url} has no readable text")));
        }
        let text: String = text.chars().take(MAX_PAGE_CHARS).collect();
        info!("Fetched job page {url}: {} chars of text", text.len());

        let prompt = EXTRACT_PROMPT_TEMPLATE.replace("{page_text}", &text);
        let posting: JobPosting = self
            .llm
            .call_json(&prompt, &format!("{EXTRACT_SYSTEM} {JSON_ONLY_SYSTEM}"))
            .await
            .map_err(|e| AppError::Llm(format!("Job posting extraction failed: {e}")))?;
        if posting.description.trim().is_empty() {
            return Err(AppError::JobFetch(format!("No job description found at {url}")));
        }
        Ok(posting)
    }
}

/// Visible text of an HTML page: scripts, styles and tags removed,
/// common entities decoded, whitespace collapsed.
fn html_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len() / 2);
    let lower = html.to_ascii_lowercase();
    let mut i = 0;
    while i < html.len() {
        let rest = &lower[i..];
        if rest.starts_with("<script") || rest.starts_with("<style") {
            let close = if rest.starts_with("<script") { "</script>" } else { "</style>" };
            i = match rest.find(close) {
                Some(end) => i + end + close.len(),
                None => html.len(),
            };
            text.push(' ');
        } else if rest.starts_with('<') {
            i = match rest.find('>') {
                Some(end) => i + end + 1,
                None => html.len(),
            };
            text.push(' ');
        } else {
            let next = rest.find('<').map(|n| i + n).unwrap_or(html.len());
            text.push_str(&html[i..next]);
            i = next;
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accepts absolute http and https URLs only.
pub fn parse_http_url(raw: &str) -> Option<Url> {
    Url::parse(raw.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
}
