use chrono::{Datelike, NaiveDate};

use super::Locale;

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS_ES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];
const MONTHS_FR: [&str; 12] = [
    "Janv", "Févr", "Mars", "Avr", "Mai", "Juin", "Juil", "Août", "Sept", "Oct", "Nov", "Déc",
];
const MONTHS_DE: [&str; 12] = [
    "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
];

/// `MM/YYYY` for pt-BR, `<abbreviated month> YYYY` elsewhere.
pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    let month_index = date.month0() as usize;
    let year = date.year();
    let months = match locale {
        Locale::PtBr => return format!("{:02}/{}", date.month(), year),
        Locale::En => &MONTHS_EN,
        Locale::Es => &MONTHS_ES,
        Locale::Fr => &MONTHS_FR,
        Locale::De => &MONTHS_DE,
    };
    format!("{} {}", months[month_index], year)
}

/// Formats a free-text date. Accepts `YYYY-MM-DD`, `YYYY-MM`, and `Mon YYYY`;
/// anything else is returned unchanged.
pub fn format_date_string(raw: &str, locale: Locale) -> String {
    match parse_loose_date(raw) {
        Some(date) => format_date(date, locale),
        None => raw.to_string(),
    }
}

fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("01 {trimmed}"), "%d %b %Y"))
        .ok()
}
