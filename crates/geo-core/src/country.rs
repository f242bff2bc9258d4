//! Country name normalization.
//!
//! Stored `country` values are free text typed by users, so the same country
//! shows up as "UK", "Britain" and "United Kingdom". [`normalize`] maps a
//! spelling to one canonical name; [`variants`] expands it to every spelling
//! worth OR-matching against the column.
//!
//! The alias table is an ordered list of literal `variant => canonical` pairs.
//! When a key is declared twice the later value wins and the key keeps the
//! position of its first declaration. [`duplicate_aliases`] lists those keys.

use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Literal `variant => canonical` declarations, in declaration order.
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    // United States
    ("USA", "United States"),
    ("US", "United States"),
    ("U.S.", "United States"),
    ("U.S.A.", "United States"),
    ("United States of America", "United States"),
    ("America", "United States"),
    // United Kingdom
    ("UK", "United Kingdom"),
    ("U.K.", "United Kingdom"),
    ("Britain", "United Kingdom"),
    ("Great Britain", "United Kingdom"),
    ("England", "United Kingdom"),
    ("Scotland", "United Kingdom"),
    ("Wales", "United Kingdom"),
    ("Northern Ireland", "United Kingdom"),
    (
        "United Kingdom of Great Britain and Northern Ireland",
        "United Kingdom",
    ),
    // Gulf
    ("UAE", "United Arab Emirates"),
    ("Emirates", "United Arab Emirates"),
    // Congo
    ("DRC", "Democratic Republic of the Congo"),
    ("DR Congo", "Democratic Republic of the Congo"),
    ("Congo-Kinshasa", "Democratic Republic of the Congo"),
    ("Congo (Kinshasa)", "Democratic Republic of the Congo"),
    ("Zaire", "Democratic Republic of the Congo"),
    ("Congo-Brazzaville", "Republic of the Congo"),
    ("Congo (Brazzaville)", "Republic of the Congo"),
    ("Congo", "Republic of the Congo"),
    // West Africa
    ("Ivory Coast", "Côte d'Ivoire"),
    ("Cote d'Ivoire", "Côte d'Ivoire"),
    ("The Gambia", "Gambia"),
    ("Cape Verde", "Cabo Verde"),
    // Europe
    ("Russian Federation", "Russia"),
    ("Czechia", "Czech Republic"),
    ("Slovak Republic", "Slovakia"),
    ("Holland", "Netherlands"),
    ("Eire", "Ireland"),
    ("Republic of Ireland", "Ireland"),
    ("The Netherlands", "Netherlands"),
    ("Deutschland", "Germany"),
    ("Federal Republic of Germany", "Germany"),
    ("España", "Spain"),
    ("Espana", "Spain"),
    ("Macedonia", "North Macedonia"),
    ("Moldova, Republic of", "Moldova"),
    ("Bosnia", "Bosnia and Herzegovina"),
    ("Holy See", "Vatican City"),
    ("Vatican", "Vatican City"),
    ("Türkiye", "Turkey"),
    ("Turkiye", "Turkey"),
    // Middle East
    ("Persia", "Iran"),
    ("Islamic Republic of Iran", "Iran"),
    ("Iran, Islamic Republic of", "Iran"),
    ("Syrian Arab Republic", "Syria"),
    ("State of Palestine", "Palestine"),
    ("Palestinian Territories", "Palestine"),
    ("West Bank", "Palestine"),
    ("Gaza", "Palestine"),
    // Asia
    ("Burma", "Myanmar"),
    ("Viet Nam", "Vietnam"),
    ("Lao PDR", "Laos"),
    ("Lao People's Democratic Republic", "Laos"),
    ("Kyrgyz Republic", "Kyrgyzstan"),
    ("Korea, Republic of", "South Korea"),
    ("Republic of Korea", "South Korea"),
    ("ROK", "South Korea"),
    ("Korea, Democratic People's Republic of", "North Korea"),
    ("DPRK", "North Korea"),
    ("PRC", "China"),
    ("People's Republic of China", "China"),
    ("Republic of China", "Taiwan"),
    ("Taiwan, Province of China", "Taiwan"),
    ("Hong Kong SAR", "Hong Kong"),
    ("Macao", "Macau"),
    ("East Timor", "Timor-Leste"),
    // Africa
    ("Swaziland", "Eswatini"),
    ("Tanzania, United Republic of", "Tanzania"),
    ("Sudan, South", "South Sudan"),
    ("North Sudan", "Sudan"),
    // Americas
    ("Brasil", "Brazil"),
    ("Bolivia, Plurinational State of", "Bolivia"),
    ("Venezuela, Bolivarian Republic of", "Venezuela"),
    ("The Bahamas", "Bahamas"),
    ("Trinidad", "Trinidad and Tobago"),
    ("St. Lucia", "Saint Lucia"),
    // Oceania
    ("Micronesia, Federated States of", "Micronesia"),
    // Duplicate key. This later value overrides the West Africa entry.
    ("Ivory Coast", "Cote d'Ivoire"),
];

/// Abbreviations expanded directly by [`variants`].
const ABBREVIATIONS: &[(&str, &[&str])] = &[
    (
        "USA",
        &["United States", "United States of America", "America", "US", "U.S.", "U.S.A."],
    ),
    (
        "US",
        &["United States", "United States of America", "America", "USA", "U.S.", "U.S.A."],
    ),
    ("UK", &["United Kingdom", "Great Britain", "Britain", "England"]),
    ("UAE", &["United Arab Emirates", "Emirates"]),
    (
        "DRC",
        &["Democratic Republic of the Congo", "DR Congo", "Congo-Kinshasa", "Congo (Kinshasa)"],
    ),
    (
        "DR Congo",
        &["Democratic Republic of the Congo", "DRC", "Congo-Kinshasa", "Congo (Kinshasa)"],
    ),
    (
        "Congo-Kinshasa",
        &["Democratic Republic of the Congo", "DRC", "DR Congo", "Congo (Kinshasa)"],
    ),
    (
        "Congo-Brazzaville",
        &["Republic of the Congo", "Congo", "Congo (Brazzaville)"],
    ),
];

/// Words removed before the fuzzy retry, longest first so that
/// "democratic republic of" is stripped before "republic of".
const STRIP_PATTERNS: &[&str] = &[
    "special administrative region of china",
    "democratic republic of",
    "federal republic of",
    "republic of",
    "kingdom of",
    "province of",
    "state of",
    "the",
];

/// Names shorter than this only ever match exactly. Without it "US" would
/// be a substring of "Russia" and "Belarus".
const MIN_PARTIAL_LEN: usize = 4;

struct Alias {
    key: &'static str,
    value: &'static str,
    key_lc: String,
    value_lc: String,
}

static ALIASES: Lazy<Vec<Alias>> = Lazy::new(|| {
    let mut table: IndexMap<&'static str, &'static str> = IndexMap::new();
    for &(key, value) in COUNTRY_ALIASES {
        table.insert(key, value);
    }

    table
        .into_iter()
        .map(|(key, value)| Alias {
            key,
            value,
            key_lc: key.to_lowercase(),
            value_lc: value.to_lowercase(),
        })
        .collect()
});

/// A key declared more than once in the alias table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateAlias {
    pub key: &'static str,
    /// Value from the earlier declaration, no longer reachable.
    pub overwritten: &'static str,
    /// Value that wins.
    pub kept: &'static str,
}

/// List keys that are declared more than once, with the value each lost.
pub fn duplicate_aliases() -> Vec<DuplicateAlias> {
    let mut seen: IndexMap<&'static str, &'static str> = IndexMap::new();
    let mut duplicates = Vec::new();

    for &(key, value) in COUNTRY_ALIASES {
        if let Some(previous) = seen.insert(key, value) {
            duplicates.push(DuplicateAlias {
                key,
                overwritten: previous,
                kept: value,
            });
        }
    }

    duplicates
}

/// Iterate the effective alias table as `(variant, canonical)` pairs.
pub fn aliases() -> impl Iterator<Item = (&'static str, &'static str)> {
    ALIASES.iter().map(|alias| (alias.key, alias.value))
}

/// Map a country spelling to its canonical name.
///
/// Returns the trimmed input unchanged when nothing matches.
pub fn normalize(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let lower = trimmed.to_lowercase();

    if let Some(alias) = ALIASES.iter().find(|a| a.key_lc == lower) {
        return alias.value.to_string();
    }
    if let Some(alias) = ALIASES.iter().find(|a| a.value_lc == lower) {
        return alias.value.to_string();
    }

    let stripped = strip_patterns(&lower);
    if !stripped.is_empty() {
        if let Some(alias) = ALIASES
            .iter()
            .find(|a| a.key_lc == stripped || a.value_lc == stripped)
        {
            return alias.value.to_string();
        }

        for alias in ALIASES.iter() {
            if partial_match(&alias.key_lc, &stripped) || partial_match(&alias.value_lc, &stripped)
            {
                return alias.value.to_string();
            }
        }
    }

    trimmed.to_string()
}

/// Every spelling worth matching against a stored `country` column.
///
/// The result is deduplicated; order is not significant. Empty input yields
/// an empty list.
pub fn variants(name: &str) -> Vec<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let normalized = normalize(trimmed);
    let mut out = Variants::default();

    out.push(name);
    out.push(trimmed);
    out.push(&title_case(trimmed));
    out.push(&trimmed.to_uppercase());
    out.push(&trimmed.to_lowercase());
    out.push(&normalized);

    let needles = [trimmed.to_lowercase(), normalized.to_lowercase()];

    for alias in ALIASES.iter() {
        let hit = needles.iter().any(|needle| {
            alias.key_lc == *needle
                || alias.value_lc == *needle
                || partial_match(&alias.key_lc, needle)
                || partial_match(&alias.value_lc, needle)
        });
        if hit {
            out.push(alias.key);
            out.push(alias.value);
        }
    }

    for &(abbreviation, expansions) in ABBREVIATIONS {
        let by_input = abbreviation.eq_ignore_ascii_case(trimmed);
        let by_canonical = expansions
            .first()
            .is_some_and(|canonical| canonical.eq_ignore_ascii_case(&normalized));
        if by_input || by_canonical {
            out.push(abbreviation);
            for expansion in expansions.iter() {
                out.push(expansion);
            }
        }
    }

    out.into_vec()
}

/// Uppercase the first letter of each whitespace-separated word and
/// lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }

    out
}

/// Remove the generic state-name words from an already lowercased name.
fn strip_patterns(lower: &str) -> String {
    let mut padded = format!(" {} ", lower);
    for pattern in STRIP_PATTERNS {
        let needle = format!(" {} ", pattern);
        while padded.contains(&needle) {
            padded = padded.replace(&needle, " ");
        }
    }

    padded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c == ',' || c == '.' || c.is_whitespace())
        .to_string()
}

/// Case-folded substring containment in either direction, for names long
/// enough to be meaningful.
fn partial_match(candidate_lc: &str, needle_lc: &str) -> bool {
    if candidate_lc.chars().count() < MIN_PARTIAL_LEN || needle_lc.chars().count() < MIN_PARTIAL_LEN
    {
        return false;
    }
    candidate_lc.contains(needle_lc) || needle_lc.contains(candidate_lc)
}

/// Insertion-ordered set of non-empty strings.
#[derive(Default)]
struct Variants {
    seen: HashSet<String>,
    items: Vec<String>,
}

impl Variants {
    fn push(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        if self.seen.insert(value.to_string()) {
            self.items.push(value.to_string());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has(list: &[String], value: &str) -> bool {
        list.iter().any(|v| v == value)
    }

    #[test]
    fn test_normalize_every_alias_uses_last_declaration() {
        let mut last: IndexMap<&str, &str> = IndexMap::new();
        for &(key, value) in COUNTRY_ALIASES {
            last.insert(key, value);
        }

        for &(key, _) in COUNTRY_ALIASES {
            assert_eq!(normalize(key), last[key], "alias {key}");
        }
    }

    #[test]
    fn test_normalize_duplicate_key_last_write_wins() {
        assert_eq!(normalize("Ivory Coast"), "Cote d'Ivoire");
        assert_eq!(normalize("ivory coast"), "Cote d'Ivoire");
    }

    #[test]
    fn test_duplicate_aliases_reported() {
        let duplicates = duplicate_aliases();
        assert_eq!(
            duplicates,
            vec![DuplicateAlias {
                key: "Ivory Coast",
                overwritten: "Côte d'Ivoire",
                kept: "Cote d'Ivoire",
            }]
        );
    }

    #[test]
    fn test_duplicate_key_keeps_first_position() {
        let keys: Vec<&str> = aliases().map(|(k, _)| k).collect();
        let ivory = keys.iter().position(|k| *k == "Ivory Coast").unwrap();
        let cote = keys.iter().position(|k| *k == "Cote d'Ivoire").unwrap();
        assert!(ivory < cote);
        assert_eq!(keys.iter().filter(|k| **k == "Ivory Coast").count(), 1);
    }

    #[test]
    fn test_normalize_empty_and_whitespace() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalize_exact_is_case_insensitive_and_trims() {
        assert_eq!(normalize("UK"), "United Kingdom");
        assert_eq!(normalize("  uk "), "United Kingdom");
        assert_eq!(normalize("usa"), "United States");
        assert_eq!(normalize("Burma"), "Myanmar");
    }

    #[test]
    fn test_normalize_canonical_maps_to_itself() {
        assert_eq!(normalize("united kingdom"), "United Kingdom");
        assert_eq!(normalize("Democratic Republic of the Congo"), "Democratic Republic of the Congo");
        assert_eq!(normalize("SOUTH KOREA"), "South Korea");
    }

    #[test]
    fn test_normalize_strips_state_words() {
        assert_eq!(normalize("Kingdom of Spain"), "Spain");
        assert_eq!(
            normalize("Hong Kong Special Administrative Region of China"),
            "Hong Kong"
        );
        assert_eq!(normalize("The Republic of Moldova"), "Moldova");
    }

    #[test]
    fn test_normalize_substring_match() {
        // Stored value contained in the input.
        assert_eq!(normalize("Great Britain and Ireland"), "United Kingdom");
        // Input contained in a table name.
        assert_eq!(normalize("Kinshasa"), "Democratic Republic of the Congo");
    }

    #[test]
    fn test_normalize_stripped_exact_beats_substring() {
        // "congo" is also a substring of the DRC's name, which comes first.
        assert_eq!(normalize("Republic of Congo"), "Republic of the Congo");
        assert_eq!(normalize("the Congo"), "Republic of the Congo");
        assert_eq!(normalize("Kingdom of the Netherlands"), "Netherlands");
    }

    #[test]
    fn test_normalize_name_inside_longer_name() {
        assert_eq!(normalize("Ireland"), "Ireland");
        assert_eq!(normalize("Sudan"), "Sudan");
        assert_eq!(normalize("South Sudan"), "South Sudan");
        assert_eq!(normalize("Northern Ireland"), "United Kingdom");
    }

    #[test]
    fn test_normalize_short_names_never_match_partially() {
        // "us" is a substring of both; only exact matches count for short names.
        assert_eq!(normalize("Belarus"), "Belarus");
        assert_eq!(normalize("Russia"), "Russia");
    }

    #[test]
    fn test_normalize_unknown_returns_trimmed_input() {
        assert_eq!(normalize("  Atlantis "), "Atlantis");
        assert_eq!(normalize("France"), "France");
    }

    #[test]
    fn test_variants_usa() {
        let v = variants("USA");
        assert!(has(&v, "USA"));
        assert!(has(&v, "United States"));
        assert!(has(&v, "United States of America"));
        assert!(has(&v, "usa"));
        assert!(has(&v, "Usa"));
    }

    #[test]
    fn test_variants_uk() {
        let v = variants("UK");
        for expected in ["UK", "United Kingdom", "Britain", "Great Britain", "England"] {
            assert!(has(&v, expected), "missing {expected} in {v:?}");
        }
        assert!(!has(&v, "Ukraine"));
    }

    #[test]
    fn test_variants_canonical_input_collects_aliases() {
        let v = variants("democratic republic of the congo");
        for expected in [
            "Democratic Republic of the Congo",
            "DRC",
            "DR Congo",
            "Congo-Kinshasa",
            "Zaire",
        ] {
            assert!(has(&v, expected), "missing {expected} in {v:?}");
        }
    }

    #[test]
    fn test_variants_congo_brazzaville() {
        let v = variants("Congo-Brazzaville");
        assert!(has(&v, "Republic of the Congo"));
        assert!(has(&v, "Congo"));
        assert!(has(&v, "Congo (Brazzaville)"));
    }

    #[test]
    fn test_variants_are_deduplicated() {
        let v = variants("France");
        let unique: HashSet<&String> = v.iter().collect();
        assert_eq!(unique.len(), v.len());
        assert!(has(&v, "France"));
        assert!(has(&v, "FRANCE"));
        assert!(has(&v, "france"));
    }

    #[test]
    fn test_variants_keep_raw_input() {
        let v = variants(" uk ");
        assert!(has(&v, " uk "));
        assert!(has(&v, "uk"));
        assert!(has(&v, "United Kingdom"));
    }

    #[test]
    fn test_variants_empty() {
        assert!(variants("").is_empty());
        assert!(variants("  ").is_empty());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("united states"), "United States");
        assert_eq!(title_case("SOUTH  SUDAN"), "South  Sudan");
        assert_eq!(title_case("côte d'ivoire"), "Côte D'ivoire");
    }

    #[test]
    fn test_strip_patterns() {
        assert_eq!(strip_patterns("korea, republic of"), "korea");
        assert_eq!(strip_patterns("the netherlands"), "netherlands");
        assert_eq!(strip_patterns("blythe island"), "blythe island");
        assert_eq!(strip_patterns("the"), "");
    }
}
