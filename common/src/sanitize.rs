//! Filename fragment sanitizer
//!
//! Maps free text from decoded QR payloads onto `[a-z0-9_]*`:
//! - lowercase first, so `Ä` and `ä` end up the same
//! - German umlauts and `ß` are transliterated (`ü` → `ue`, `ß` → `ss`)
//! - every other character outside the set becomes one `_`

use regex::Regex;

const TRANSLITERATIONS: &[(char, &str)] = &[('ä', "ae"), ('ö', "oe"), ('ü', "ue"), ('ß', "ss")];

/// Turn arbitrary text into a safe filename fragment.
///
/// `None` and `""` both yield `""`. Never fails.
pub fn sanitize(text: Option<&str>) -> String {
    lazy_static::lazy_static! {
        static ref DISALLOWED_RE: Regex = Regex::new(r"[^a-z0-9_]").unwrap();
    }

    let Some(text) = text else {
        return String::new();
    };

    let mut transliterated = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        match TRANSLITERATIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => transliterated.push_str(to),
            None => transliterated.push(c),
        }
    }

    DISALLOWED_RE.replace_all(&transliterated, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_safe(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }

    #[test]
    fn test_none_and_empty() {
        assert_eq!(sanitize(None), "");
        assert_eq!(sanitize(Some("")), "");
    }

    #[test]
    fn test_umlauts_before_replacement() {
        assert_eq!(sanitize(Some("Müller Straße")), "mueller_strasse");
        assert_eq!(sanitize(Some("Jürgen")), "juergen");
        assert_eq!(sanitize(Some("ÄÖÜ")), "aeoeue");
    }

    #[test]
    fn test_each_disallowed_char_becomes_underscore() {
        assert_eq!(sanitize(Some("5a / Mathe")), "5a___mathe");
        assert_eq!(sanitize(Some("a.b-c")), "a_b_c");
        assert_eq!(sanitize(Some("already_ok_42")), "already_ok_42");
    }

    #[test]
    fn test_output_charset() {
        let inputs = [
            "Émile Zoë",
            "日本語",
            "tab\tand\nnewline",
            "../../etc/passwd",
            "Ω≈ç√∫",
            "  spaces  ",
            "MiXeD123",
        ];
        for input in inputs {
            let out = sanitize(Some(input));
            assert!(is_safe(&out), "{:?} -> {:?}", input, out);
        }
    }

    #[test]
    fn test_path_separators_do_not_survive() {
        let out = sanitize(Some("../evil"));
        assert!(!out.contains('/'));
        assert!(!out.contains('.'));
        assert_eq!(out, "___evil");
    }
}
