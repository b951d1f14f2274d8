//! Localization: locale-keyed labels and date formatting.
//!
//! English is the fallback for unknown locales and for keys a locale lacks.
//! Everything here is pure.

pub mod dates;
pub mod labels;

use serde::{Deserialize, Serialize};

pub use dates::{format_date, format_date_string};
pub use labels::{format_gpa, format_proficiency};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    En,
    PtBr,
    Es,
    Fr,
    De,
}

impl Locale {
    pub const SUPPORTED_CODES: [&'static str; 5] = ["en", "pt-BR", "es", "fr", "de"];

    /// Strict lookup used for input validation. Accepts `pt_BR` / `pt-br` spellings.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Some(Locale::En),
            "pt-br" | "pt" => Some(Locale::PtBr),
            "es" => Some(Locale::Es),
            "fr" => Some(Locale::Fr),
            "de" => Some(Locale::De),
            _ => None,
        }
    }

    /// Lenient lookup: missing or unknown codes become English.
    pub fn from_code(code: Option<&str>) -> Self {
        code.and_then(Locale::parse).unwrap_or_default()
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::PtBr => "pt-BR",
            Locale::Es => "es",
            Locale::Fr => "fr",
            Locale::De => "de",
        }
    }

    /// Value for the HTML `lang` attribute.
    pub fn html_lang(self) -> &'static str {
        self.code()
    }
}

/// Looks up `key` for `locale`, then in English, then returns the key itself.
pub fn translate(locale: Locale, key: &str) -> String {
    lookup(dictionary(locale), key)
        .or_else(|| lookup(dictionary(Locale::En), key))
        .unwrap_or(key)
        .to_string()
}

fn lookup(entries: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn dictionary(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => EN,
        Locale::PtBr => PT_BR,
        Locale::Es => ES,
        Locale::Fr => FR,
        Locale::De => DE,
    }
}

const EN: &[(&str, &str)] = &[
    ("section.summary", "Summary"),
    ("section.education", "Education"),
    ("section.skills", "Skills"),
    ("section.experience", "Experience"),
    ("section.projects", "Projects"),
    ("section.languages", "Languages"),
    ("date.present", "Present"),
    ("gpa.scale4", "GPA"),
    ("gpa.scale10", "Grade Average"),
    ("skills.languages", "Languages"),
    ("skills.frameworks", "Frameworks"),
    ("skills.tools", "Tools"),
    ("skills.databases", "Databases"),
    ("skills.cloud", "Cloud"),
    ("skills.other", "Other"),
    ("proficiency.native", "Native"),
    ("proficiency.fluent", "Fluent"),
    ("proficiency.advanced", "Advanced"),
    ("proficiency.intermediate", "Intermediate"),
    ("proficiency.basic", "Basic"),
    ("project.technologies", "Technologies"),
];

const PT_BR: &[(&str, &str)] = &[
    ("section.summary", "Resumo"),
    ("section.education", "Formação Acadêmica"),
    ("section.skills", "Habilidades"),
    ("section.experience", "Experiência Profissional"),
    ("section.projects", "Projetos"),
    ("section.languages", "Idiomas"),
    ("date.present", "Atual"),
    ("gpa.scale4", "GPA"),
    ("gpa.scale10", "Média"),
    ("skills.languages", "Linguagens"),
    ("skills.frameworks", "Frameworks"),
    ("skills.tools", "Ferramentas"),
    ("skills.databases", "Bancos de Dados"),
    ("skills.cloud", "Nuvem"),
    ("skills.other", "Outros"),
    ("proficiency.native", "Nativo"),
    ("proficiency.fluent", "Fluente"),
    ("proficiency.advanced", "Avançado"),
    ("proficiency.intermediate", "Intermediário"),
    ("proficiency.basic", "Básico"),
    ("project.technologies", "Tecnologias"),
];

const ES: &[(&str, &str)] = &[
    ("section.summary", "Resumen"),
    ("section.education", "Educación"),
    ("section.skills", "Habilidades"),
    ("section.experience", "Experiencia"),
    ("section.projects", "Proyectos"),
    ("section.languages", "Idiomas"),
    ("date.present", "Actualidad"),
    ("gpa.scale10", "Promedio"),
    ("skills.languages", "Lenguajes"),
    ("skills.tools", "Herramientas"),
    ("skills.databases", "Bases de Datos"),
    ("skills.cloud", "Nube"),
    ("skills.other", "Otros"),
    ("proficiency.native", "Nativo"),
    ("proficiency.fluent", "Fluido"),
    ("proficiency.advanced", "Avanzado"),
    ("proficiency.intermediate", "Intermedio"),
    ("proficiency.basic", "Básico"),
    ("project.technologies", "Tecnologías"),
];

const FR: &[(&str, &str)] = &[
    ("section.summary", "Profil"),
    ("section.education", "Formation"),
    ("section.skills", "Compétences"),
    ("section.experience", "Expérience Professionnelle"),
    ("section.projects", "Projets"),
    ("section.languages", "Langues"),
    ("date.present", "Présent"),
    ("gpa.scale10", "Moyenne"),
    ("skills.languages", "Langages"),
    ("skills.tools", "Outils"),
    ("skills.databases", "Bases de Données"),
    ("skills.other", "Autres"),
    ("proficiency.native", "Langue maternelle"),
    ("proficiency.fluent", "Courant"),
    ("proficiency.advanced", "Avancé"),
    ("proficiency.intermediate", "Intermédiaire"),
    ("proficiency.basic", "Notions"),
    ("project.technologies", "Technologies"),
];

const DE: &[(&str, &str)] = &[
    ("section.summary", "Profil"),
    ("section.education", "Ausbildung"),
    ("section.skills", "Kenntnisse"),
    ("section.experience", "Berufserfahrung"),
    ("section.projects", "Projekte"),
    ("section.languages", "Sprachen"),
    ("date.present", "Heute"),
    ("gpa.scale10", "Notendurchschnitt"),
    ("skills.languages", "Programmiersprachen"),
    ("skills.tools", "Werkzeuge"),
    ("skills.databases", "Datenbanken"),
    ("skills.other", "Sonstiges"),
    ("proficiency.native", "Muttersprache"),
    ("proficiency.fluent", "Fließend"),
    ("proficiency.advanced", "Fortgeschritten"),
    ("proficiency.intermediate", "Mittelstufe"),
    ("proficiency.basic", "Grundkenntnisse"),
    ("project.technologies", "Technologien"),
];
