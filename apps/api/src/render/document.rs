//! Structured HTML builder. Every caller hands over raw text; escaping happens
//! here and nowhere else, and rich text goes through `render_rich_text`.

use std::fmt::Write as _;

use crate::render::escape::{escape_html, render_rich_text};

/// One dated item inside a section (a job, a degree, a project).
#[derive(Debug, Default)]
pub struct Entry {
    pub title: String,
    pub dates: Option<String>,
    pub subtitle: Option<String>,
    pub details: Vec<String>,
    /// Rendered as rich text.
    pub bullets: Vec<String>,
}

impl Entry {
    fn write_html(&self, out: &mut String) {
        out.push_str("<div class=\"entry\"><div class=\"entry-head\">");
        let _ = write!(out, "<span class=\"entry-title\">{}</span>", escape_html(&self.title));
        if let Some(dates) = self.dates.as_deref().filter(|d| !d.is_empty()) {
            let _ = write!(out, "<span class=\"entry-dates\">{}</span>", escape_html(dates));
        }
        out.push_str("</div>");
        if let Some(subtitle) = self.subtitle.as_deref().filter(|s| !s.is_empty()) {
            let _ = write!(out, "<div class=\"entry-sub\">{}</div>", escape_html(subtitle));
        }
        for detail in self.details.iter().filter(|d| !d.is_empty()) {
            let _ = write!(out, "<div class=\"entry-detail\">{}</div>", escape_html(detail));
        }
        if !self.bullets.is_empty() {
            out.push_str("<ul>");
            for bullet in &self.bullets {
                let _ = write!(out, "<li>{}</li>", render_rich_text(bullet));
            }
            out.push_str("</ul>");
        }
        out.push_str("</div>");
    }
}

#[derive(Debug)]
enum SectionBody {
    Paragraph(String),
    Entries(Vec<Entry>),
    /// `(label, value)` lines such as skill groups or languages.
    Lines(Vec<(String, String)>),
}

impl SectionBody {
    fn is_empty(&self) -> bool {
        match self {
            SectionBody::Paragraph(text) => text.trim().is_empty(),
            SectionBody::Entries(entries) => entries.is_empty(),
            SectionBody::Lines(lines) => lines.is_empty(),
        }
    }
}

#[derive(Debug)]
pub struct Section {
    class: &'static str,
    heading: String,
    body: SectionBody,
}

impl Section {
    pub fn paragraph(class: &'static str, heading: String, rich_text: &str) -> Self {
        Self {
            class,
            heading,
            body: SectionBody::Paragraph(rich_text.to_string()),
        }
    }

    pub fn entries(class: &'static str, heading: String, entries: Vec<Entry>) -> Self {
        Self {
            class,
            heading,
            body: SectionBody::Entries(entries),
        }
    }

    pub fn lines(class: &'static str, heading: String, lines: Vec<(String, String)>) -> Self {
        Self {
            class,
            heading,
            body: SectionBody::Lines(lines),
        }
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(
            out,
            "<section class=\"{}\"><h2>{}</h2>",
            self.class,
            escape_html(&self.heading)
        );
        match &self.body {
            SectionBody::Paragraph(text) => {
                let _ = write!(out, "<p>{}</p>", render_rich_text(text.trim()));
            }
            SectionBody::Entries(entries) => {
                for entry in entries {
                    entry.write_html(out);
                }
            }
            SectionBody::Lines(lines) => {
                for (label, value) in lines {
                    let _ = write!(
                        out,
                        "<p><strong>{}:</strong> {}</p>",
                        escape_html(label),
                        escape_html(value)
                    );
                }
            }
        }
        out.push_str("</section>");
    }
}

#[derive(Debug, Default)]
pub struct Header {
    pub name: String,
    pub headline: Option<String>,
    pub contact: Vec<String>,
}

/// Accumulates the page in a fixed order. Empty sections are dropped on push,
/// so no heading is ever emitted without content.
#[derive(Debug)]
pub struct HtmlDocument {
    lang: &'static str,
    stylesheet: String,
    header: Header,
    sections: Vec<Section>,
}

impl HtmlDocument {
    pub fn new(lang: &'static str, stylesheet: String, header: Header) -> Self {
        Self {
            lang,
            stylesheet,
            header,
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        if !section.body.is_empty() {
            self.sections.push(section);
        }
    }

    #[cfg(test)]
    pub fn section_classes(&self) -> Vec<&'static str> {
        self.sections.iter().map(|s| s.class).collect()
    }

    pub fn into_html(self) -> String {
        let mut out = String::with_capacity(8 * 1024);
        let title = escape_html(&self.header.name);
        let _ = write!(
            out,
            "<!DOCTYPE html><html lang=\"{}\"><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head><body>",
            self.lang, title, self.stylesheet
        );

        let _ = write!(out, "<header><h1>{title}</h1>");
        if let Some(headline) = self.header.headline.as_deref().filter(|h| !h.trim().is_empty()) {
            let _ = write!(out, "<p class=\"headline\">{}</p>", escape_html(headline));
        }
        let contact: Vec<String> = self
            .header
            .contact
            .iter()
            .filter(|c| !c.trim().is_empty())
            .map(|c| escape_html(c.trim()))
            .collect();
        if !contact.is_empty() {
            let _ = write!(out, "<p class=\"contact\">{}</p>", contact.join(" | "));
        }
        out.push_str("</header>");

        for section in &self.sections {
            section.write_html(&mut out);
        }

        out.push_str("</body></html>");
        out
    }
}
