//! Crop file naming from decoded QR payloads
//!
//! `{given}_{surname}_{class}_{task}` with empty parts dropped, plus the
//! `_{n}` suffix used when probing for a free name.

use crate::sanitize::sanitize;
use crate::types::DecodedMetadata;

/// The four payload fields that make up a crop name, in name order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    GivenName,
    Surname,
    Class,
    Task,
}

impl NameField {
    pub const ORDER: [NameField; 4] = [
        NameField::GivenName,
        NameField::Surname,
        NameField::Class,
        NameField::Task,
    ];

    /// Accepted payload keys, first match wins
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            NameField::GivenName => &["vorname", "given_name", "first_name"],
            NameField::Surname => &["nachname", "surname", "last_name"],
            NameField::Class => &["klasse", "class"],
            NameField::Task => &["aufgabe", "task"],
        }
    }

    fn lookup(&self, metadata: &DecodedMetadata) -> Option<String> {
        self.keys().iter().find_map(|key| metadata.text(key))
    }
}

/// Build the file stem for a crop, or `None` when no field survives
/// sanitizing.
pub fn candidate_stem(metadata: &DecodedMetadata) -> Option<String> {
    let parts: Vec<String> = NameField::ORDER
        .iter()
        .map(|field| sanitize(field.lookup(metadata).as_deref()))
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("_"))
    }
}

/// `stem.ext` for `n == 0`, else `stem_n.ext`
pub fn with_suffix(stem: &str, n: u32, ext: &str) -> String {
    match n {
        0 => format!("{}.{}", stem, ext),
        n => format!("{}_{}.{}", stem, n, ext),
    }
}
