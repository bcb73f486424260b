//! Country overview cards.
//!
//! A small static table of destination countries, rendered as four cards:
//! overview, visa, living expenses and lifestyle. Keys without an entry get a
//! generic record titled with the uppercased key, so every selector option
//! shows something.

use maud::{Markup, html};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryInfo {
    pub name: String,
    pub continent: &'static str,
    pub visa: &'static str,
    pub expenses: &'static str,
    pub lifestyle: &'static str,
}

struct Entry {
    key: &'static str,
    name: &'static str,
    continent: &'static str,
    visa: &'static str,
    expenses: &'static str,
    lifestyle: &'static str,
}

const COUNTRIES: &[Entry] = &[
    Entry {
        key: "usa",
        name: "United States",
        continent: "North America",
        visa: "H1B, F1, L1, B1/B2",
        expenses: "High – Rent $1200+, Health insurance mandatory",
        lifestyle: "Fast-paced, professional, multicultural",
    },
    Entry {
        key: "canada",
        name: "Canada",
        continent: "North America",
        visa: "PR, Work Permit, Student Visa",
        expenses: "Medium – Rent $900+, public healthcare",
        lifestyle: "Balanced life, immigrant-friendly",
    },
    Entry {
        key: "germany",
        name: "Germany",
        continent: "Europe",
        visa: "Job Seeker, Blue Card, Student Visa",
        expenses: "Medium – Rent €700–1300",
        lifestyle: "Structured, punctual, strong economy",
    },
    Entry {
        key: "belgium",
        name: "Belgium",
        continent: "Europe",
        visa: "Work Permit, Student, Schengen",
        expenses: "Medium – Rent €800–1400",
        lifestyle: "Peaceful, multilingual society",
    },
    Entry {
        key: "australia",
        name: "Australia",
        continent: "Oceania",
        visa: "Skilled Migration, Student Visa",
        expenses: "High – Rent AUD 1200+",
        lifestyle: "Outdoor life, work-life balance",
    },
];

/// Keys with a dedicated entry, in table order.
pub fn known_keys() -> impl Iterator<Item = &'static str> {
    COUNTRIES.iter().map(|c| c.key)
}

/// Country record for `key`, or the generic fallback. `None` for an empty key.
pub fn lookup(key: &str) -> Option<CountryInfo> {
    if key.is_empty() {
        return None;
    }
    let info = match COUNTRIES.iter().find(|c| c.key == key) {
        Some(c) => CountryInfo {
            name: c.name.to_string(),
            continent: c.continent,
            visa: c.visa,
            expenses: c.expenses,
            lifestyle: c.lifestyle,
        },
        None => CountryInfo {
            name: key.to_uppercase(),
            continent: "Global",
            visa: "Work Visa, Student Visa, Tourist Visa",
            expenses: "Depends on city and lifestyle",
            lifestyle: "Varies by country and culture",
        },
    };
    Some(info)
}

/// Cards for `key`. Empty markup for an empty key.
pub fn render_cards(key: &str) -> Markup {
    let Some(data) = lookup(key) else {
        return html! {};
    };
    html! {
        div.card {
            h3 { (data.name) }
            p { strong { "Continent:" } " " (data.continent) }
        }
        div.card {
            h3 { "Visa Information" }
            p { (data.visa) }
        }
        div.card {
            h3 { "Living Expenses" }
            p { (data.expenses) }
        }
        div.card {
            h3 { "Lifestyle" }
            p { (data.lifestyle) }
        }
    }
}
