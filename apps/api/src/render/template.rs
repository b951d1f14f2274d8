use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Classic,
    Modern,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    Letter,
    A4,
}

impl PaperSize {
    /// Width and height in inches.
    pub fn inches(self) -> (f32, f32) {
        match self {
            PaperSize::Letter => (8.5, 11.0),
            PaperSize::A4 => (8.27, 11.69),
        }
    }
}

/// Page settings handed to the rasterizer alongside the markup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageOptions {
    pub paper: PaperSize,
    pub margin_inches: f32,
    pub print_background: bool,
}

impl Template {
    pub fn name(self) -> &'static str {
        match self {
            Template::Classic => "classic",
            Template::Modern => "modern",
            Template::Compact => "compact",
        }
    }

    pub fn page_options(self) -> PageOptions {
        match self {
            Template::Classic => PageOptions {
                paper: PaperSize::Letter,
                margin_inches: 0.6,
                print_background: false,
            },
            Template::Modern => PageOptions {
                paper: PaperSize::A4,
                margin_inches: 0.5,
                print_background: true,
            },
            Template::Compact => PageOptions {
                paper: PaperSize::Letter,
                margin_inches: 0.4,
                print_background: false,
            },
        }
    }

    pub fn stylesheet(self) -> &'static str {
        match self {
            Template::Classic => CLASSIC_CSS,
            Template::Modern => MODERN_CSS,
            Template::Compact => COMPACT_CSS,
        }
    }
}

impl FromStr for Template {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "classic" | "default" => Ok(Template::Classic),
            "modern" => Ok(Template::Modern),
            "compact" => Ok(Template::Compact),
            other => Err(AppError::Validation(format!(
                "unknown template '{other}' (expected classic, modern or compact)"
            ))),
        }
    }
}

// Single-column, no tables or images: parsers read these top to bottom.
const BASE_CSS: &str = "\
body{margin:0;color:#111;}\
h1{margin:0 0 2pt 0;}\
h2{text-transform:uppercase;letter-spacing:0.5pt;border-bottom:1px solid #444;margin:8pt 0 4pt 0;}\
p{margin:0 0 3pt 0;}\
ul{margin:2pt 0 4pt 0;padding-left:14pt;}\
li{margin:0 0 1pt 0;}\
.entry{margin:0 0 5pt 0;}\
.entry-head{display:flex;justify-content:space-between;font-weight:bold;}\
.entry-sub{font-style:italic;}\
.contact{color:#333;}";

const CLASSIC_CSS: &str = "\
body{font-family:Georgia,'Times New Roman',serif;font-size:10.5pt;line-height:1.3;}\
h1{font-size:20pt;text-align:center;}\
header{text-align:center;}\
h2{font-size:11.5pt;}";

const MODERN_CSS: &str = "\
body{font-family:Inter,Helvetica,Arial,sans-serif;font-size:10pt;line-height:1.35;}\
h1{font-size:22pt;color:#1f3a5f;}\
h2{font-size:11pt;color:#1f3a5f;border-bottom-color:#1f3a5f;}";

const COMPACT_CSS: &str = "\
body{font-family:Helvetica,Arial,sans-serif;font-size:9pt;line-height:1.2;}\
h1{font-size:16pt;}\
h2{font-size:10pt;margin-top:5pt;}\
.entry{margin-bottom:3pt;}";

/// Full stylesheet for a template: shared base rules, then template overrides.
pub fn full_stylesheet(template: Template) -> String {
    format!("{BASE_CSS}{}", template.stylesheet())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_names_parse() {
        assert_eq!("Modern".parse::<Template>().unwrap(), Template::Modern);
        assert_eq!("".parse::<Template>().unwrap(), Template::Classic);
        assert!("fancy".parse::<Template>().is_err());
    }

    #[test]
    fn test_stylesheet_avoids_tables_and_columns() {
        for template in [Template::Classic, Template::Modern, Template::Compact] {
            let css = full_stylesheet(template);
            assert!(!css.contains("column-count"));
            assert!(!css.contains("display:table"));
        }
    }
}
