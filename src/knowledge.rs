//! Kitchen knowledge: ingredient substitutions and technique definitions.
//!
//! Tables are immutable once loaded, so a `KnowledgeBase` can be shared by
//! reference across threads without locking.
//!
//! Lookups are forgiving. A query is tried, in order, as:
//!
//! 1. an exact, case-insensitive key (leading articles dropped),
//! 2. a singular/plural-insensitive key (`egg` finds `eggs`),
//! 3. a whole-word containment either way (`unsalted butter` finds `butter`).
//!
//! The first entry in stored order wins at each stage, except that a key
//! contained in the query prefers the longest such key.
//!
//! Containment is checked over whole words, never raw substrings: a
//! character-level match would send `egg` to `eggplant` and `oil` to
//! `boil`, answering with the wrong ingredient. Multi-word keys still match
//! inside longer phrases as long as their words appear together.

mod builtin;

use std::{cmp::Reverse, fs, io, path::Path};

use serde::{Deserialize, Serialize};

/// Errors loading a knowledge file.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid knowledge file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Ingredient → ordered substitutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    pub ingredient: String,
    pub substitutes: Vec<Substitute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitute {
    pub name: String,

    /// Ratio or preparation note ("1/4 cup per egg").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technique {
    pub term: String,
    pub definition: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// On-disk shape of a knowledge file.
///
/// ```toml
/// [[substitution]]
/// ingredient = "eggs"
/// substitutes = [{ name = "applesauce", note = "1/4 cup per egg" }]
///
/// [[technique]]
/// term = "fold"
/// definition = "Gently combine..."
/// ```
#[derive(Debug, Default, Deserialize)]
struct KnowledgeFile {
    #[serde(default, rename = "substitution")]
    substitutions: Vec<Substitution>,

    #[serde(default, rename = "technique")]
    techniques: Vec<Technique>,
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    substitutions: Vec<Substitution>,
    techniques: Vec<Technique>,
}

impl KnowledgeBase {
    pub fn new(substitutions: Vec<Substitution>, techniques: Vec<Technique>) -> Self {
        Self {
            substitutions,
            techniques,
        }
    }

    /// The tables that ship with Sous.
    pub fn builtin() -> Self {
        let substitutions = builtin::SUBSTITUTIONS
            .iter()
            .map(|(ingredient, subs)| Substitution {
                ingredient: (*ingredient).to_string(),
                substitutes: subs
                    .iter()
                    .map(|(name, note)| Substitute {
                        name: (*name).to_string(),
                        note: note.map(String::from),
                    })
                    .collect(),
            })
            .collect();
        let techniques = builtin::TECHNIQUES
            .iter()
            .map(|(term, definition, example)| Technique {
                term: (*term).to_string(),
                definition: (*definition).to_string(),
                example: example.map(String::from),
            })
            .collect();
        Self::new(substitutions, techniques)
    }

    /// Parse a knowledge file from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, KnowledgeError> {
        let file: KnowledgeFile = toml::from_str(text)?;
        Ok(Self::new(file.substitutions, file.techniques))
    }

    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// Lay `overrides` over this table.
    ///
    /// An override with the same normalized key replaces the entry in place;
    /// new keys are appended.
    #[must_use]
    pub fn merge(mut self, overrides: Self) -> Self {
        for sub in overrides.substitutions {
            upsert(&mut self.substitutions, sub, |s| s.ingredient.as_str());
        }
        for technique in overrides.techniques {
            upsert(&mut self.techniques, technique, |t| t.term.as_str());
        }
        self
    }

    pub fn lookup_substitution(&self, ingredient: &str) -> Option<&Substitution> {
        find(&self.substitutions, ingredient, |s| s.ingredient.as_str())
    }

    /// Like substitutions, but inflected verbs also match their base form
    /// ("blanching" finds `blanch`, "deglazed" finds `deglaze`).
    pub fn lookup_technique(&self, term: &str) -> Option<&Technique> {
        find(&self.techniques, term, |t| t.term.as_str()).or_else(|| {
            base_forms(&normalize(term))
                .iter()
                .find_map(|q| find(&self.techniques, q, |t| t.term.as_str()))
        })
    }

    pub fn substitution_count(&self) -> usize {
        self.substitutions.len()
    }

    pub fn technique_count(&self) -> usize {
        self.techniques.len()
    }
}

fn upsert<T>(entries: &mut Vec<T>, entry: T, key: impl Fn(&T) -> &str) {
    let wanted = normalize(key(&entry));
    match entries.iter_mut().find(|e| normalize(key(e)) == wanted) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

fn find<'a, T>(entries: &'a [T], query: &str, key: impl Fn(&T) -> &str) -> Option<&'a T> {
    let query = normalize(query);
    if query.is_empty() {
        return None;
    }

    if let Some(hit) = entries.iter().find(|e| normalize(key(e)) == query) {
        return Some(hit);
    }

    let query_words = singular_words(&query);
    if let Some(hit) = entries
        .iter()
        .find(|e| singular_words(&normalize(key(e))) == query_words)
    {
        return Some(hit);
    }

    // Keys inside the query: the most specific (longest) key wins.
    let within = entries
        .iter()
        .map(|e| (e, singular_words(&normalize(key(e)))))
        .filter(|(_, key_words)| contains_run(&query_words, key_words))
        .min_by_key(|(_, key_words)| Reverse(key_words.len()))
        .map(|(e, _)| e);
    if within.is_some() {
        return within;
    }

    entries
        .iter()
        .find(|e| contains_run(&singular_words(&normalize(key(e))), &query_words))
}

/// Lowercase, punctuation to spaces, leading articles dropped.
fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let all: Vec<&str> = cleaned.split_whitespace().collect();
    let mut words = all.as_slice();
    while let [first, rest @ ..] = words
        && matches!(*first, "the" | "a" | "an" | "some" | "my" | "any")
    {
        words = rest;
    }
    words.join(" ")
}

fn singular_words(normalized: &str) -> Vec<String> {
    normalized.split_whitespace().map(singular).collect()
}

/// Best-effort English singular.
pub(crate) fn singular(word: &str) -> String {
    if word.len() > 4
        && let Some(stem) = word.strip_suffix("ies")
    {
        return format!("{stem}y");
    }
    for suffix in ["oes", "ches", "shes", "sses", "xes"] {
        if word.len() > suffix.len() + 1 && word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Candidate spellings of `normalized` with "-ing"/"-ed" verbs uninflected:
/// the bare stem, the stem plus "e", and the stem with a doubled final
/// consonant undone.
fn base_forms(normalized: &str) -> Vec<String> {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    let stem = |word: &str| {
        ["ing", "ed"]
            .iter()
            .find_map(|suffix| word.strip_suffix(suffix))
            .filter(|stem| stem.len() >= 3)
            .map(String::from)
    };
    let variants: [fn(String) -> String; 3] = [
        |stem| stem,
        |stem| format!("{stem}e"),
        |mut stem| {
            let bytes = stem.as_bytes();
            if bytes.len() >= 2 && bytes[bytes.len() - 1] == bytes[bytes.len() - 2] {
                stem.pop();
            }
            stem
        },
    ];

    if !words.iter().any(|w| stem(w).is_some()) {
        return Vec::new();
    }
    variants
        .iter()
        .map(|variant| {
            words
                .iter()
                .map(|w| stem(w).map_or_else(|| (*w).to_string(), variant))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Whether `needle` occurs as a contiguous run of words in `haystack`.
fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(sub: &Substitution) -> Vec<&str> {
        sub.substitutes.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn exact_lookup_is_case_insensitive() {
        let kb = KnowledgeBase::builtin();
        let sub = kb.lookup_substitution("EGGS").unwrap();

        assert_eq!(
            names(sub),
            ["applesauce", "flax egg", "mashed banana", "chia egg"]
        );
    }

    #[test]
    fn singular_matches_plural_key() {
        let kb = KnowledgeBase::builtin();

        assert_eq!(kb.lookup_substitution("egg").unwrap().ingredient, "eggs");
        assert_eq!(kb.lookup_substitution("the egg").unwrap().ingredient, "eggs");
    }

    #[test]
    fn containment_matches_qualified_names() {
        let kb = KnowledgeBase::builtin();

        assert_eq!(
            kb.lookup_substitution("unsalted butter").unwrap().ingredient,
            "butter"
        );
        assert_eq!(
            kb.lookup_substitution("creamy peanut butter").unwrap().ingredient,
            "peanut butter"
        );
        assert_eq!(kb.lookup_substitution("soy").unwrap().ingredient, "soy sauce");
        assert_eq!(
            kb.lookup_substitution("peanut butter").unwrap().ingredient,
            "peanut butter"
        );
    }

    #[test]
    fn containment_is_whole_word() {
        let kb = KnowledgeBase::new(
            vec![Substitution {
                ingredient: "egg".into(),
                substitutes: vec![],
            }],
            vec![],
        );

        assert!(kb.lookup_substitution("eggplant").is_none());
        assert_eq!(kb.lookup_substitution("free range egg").unwrap().ingredient, "egg");
    }

    #[test]
    fn not_found_is_none() {
        let kb = KnowledgeBase::builtin();

        assert!(kb.lookup_substitution("unobtainium").is_none());
        assert!(kb.lookup_substitution("").is_none());
        assert!(kb.lookup_technique("teleport").is_none());
    }

    #[test]
    fn technique_lookup() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.lookup_technique("Fold").unwrap().term, "fold");
        assert_eq!(kb.lookup_technique("to deglaze").unwrap().term, "deglaze");
        assert_eq!(kb.lookup_technique("deglazing the pan").unwrap().term, "deglaze");
        assert_eq!(kb.lookup_technique("blanching").unwrap().term, "blanch");
        assert_eq!(kb.lookup_technique("chopped").map(|t| t.term.as_str()), None);
        assert_eq!(kb.lookup_technique("whisked").unwrap().term, "whisk");
    }

    #[test]
    fn singularizes_common_plurals() {
        assert_eq!(singular("eggs"), "egg");
        assert_eq!(singular("tomatoes"), "tomato");
        assert_eq!(singular("berries"), "berry");
        assert_eq!(singular("peaches"), "peach");
        assert_eq!(singular("glass"), "glass");
        assert_eq!(singular("gas"), "gas");
    }

    #[test]
    fn loads_and_merges_toml() {
        let overrides = KnowledgeBase::from_toml(
            r#"
            [[substitution]]
            ingredient = "Eggs"
            substitutes = [{ name = "aquafaba", note = "3 tbsp per egg" }]

            [[substitution]]
            ingredient = "saffron"
            substitutes = [{ name = "turmeric" }]

            [[technique]]
            term = "spatchcock"
            definition = "Remove the backbone so the bird lies flat."
            "#,
        )
        .unwrap();

        let kb = KnowledgeBase::builtin().merge(overrides);

        assert_eq!(names(kb.lookup_substitution("eggs").unwrap()), ["aquafaba"]);
        assert_eq!(names(kb.lookup_substitution("saffron").unwrap()), ["turmeric"]);
        assert!(kb.lookup_technique("spatchcock").is_some());
        assert_eq!(
            kb.technique_count(),
            KnowledgeBase::builtin().technique_count() + 1
        );
        assert_eq!(
            kb.substitution_count(),
            KnowledgeBase::builtin().substitution_count() + 1
        );
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = KnowledgeBase::from_toml("[[substitution]]\ningredient = 3").unwrap_err();
        assert!(matches!(err, KnowledgeError::Toml(_)));
    }
}
