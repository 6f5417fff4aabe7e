//! Utterance tokenization and phrase matching.

/// A lowercased, tokenized utterance.
///
/// Hyphens split words ("twenty-five" → "twenty five"), other punctuation
/// is dropped except inside numbers (`2.5`, `1/2`) and contractions (`what's`).
#[derive(Debug, Clone)]
pub(crate) struct Utterance {
    pub words: Vec<String>,
}

impl Utterance {
    pub fn new(text: &str) -> Self {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| match c {
                '\u{2019}' => '\'',
                c if c.is_alphanumeric() || matches!(c, '.' | '/' | '\'') => c,
                _ => ' ',
            })
            .collect();
        let words = cleaned
            .split_whitespace()
            .map(|w| w.trim_matches(|c| matches!(c, '.' | '/' | '\'')))
            .filter(|w| !w.is_empty())
            .map(String::from)
            .collect();
        Self { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Position of the first whole-word occurrence of `phrase`.
    ///
    /// A leading `^` anchors the phrase to the start of the utterance.
    pub fn find(&self, phrase: &str) -> Option<usize> {
        let (anchored, phrase) = match phrase.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, phrase),
        };
        let needle: Vec<&str> = phrase.split_whitespace().collect();
        if needle.is_empty() || needle.len() > self.words.len() {
            return None;
        }
        let last_start = if anchored {
            0
        } else {
            self.words.len() - needle.len()
        };
        (0..=last_start).find(|&i| {
            self.words[i..i + needle.len()]
                .iter()
                .zip(&needle)
                .all(|(w, n)| w == n)
        })
    }

    /// The first phrase of `phrases` (in list order) that occurs,
    /// as `(position, word count)`.
    pub fn find_any(&self, phrases: &[&str]) -> Option<(usize, usize)> {
        phrases.iter().find_map(|p| {
            self.find(p)
                .map(|pos| (pos, p.trim_start_matches('^').split_whitespace().count()))
        })
    }

    pub fn contains_any(&self, phrases: &[&str]) -> bool {
        self.find_any(phrases).is_some()
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_punctuation_and_hyphens() {
        let u = Utterance::new("Next, set a timer for twenty-five minutes!");
        assert_eq!(
            u.words,
            ["next", "set", "a", "timer", "for", "twenty", "five", "minutes"]
        );
    }

    #[test]
    fn keeps_numbers_and_contractions() {
        let u = Utterance::new("What\u{2019}s 2.5 times 1/2?");
        assert_eq!(u.words, ["what's", "2.5", "times", "1/2"]);
    }

    #[test]
    fn matches_whole_words_only() {
        let u = Utterance::new("the next step");

        assert_eq!(u.find("next"), Some(1));
        assert_eq!(u.find("next step"), Some(1));
        assert_eq!(u.find("ext"), None);
        assert_eq!(u.find("step next"), None);
    }

    #[test]
    fn anchored_phrase_must_lead() {
        let u = Utterance::new("set a timer to check the sauce");

        assert_eq!(u.find("^check"), None);
        assert_eq!(u.find("^set"), Some(0));
    }

    #[test]
    fn find_any_respects_list_order() {
        let u = Utterance::new("what can i use instead of eggs");
        assert_eq!(u.find_any(&["instead of", "use"]), Some((4, 2)));
    }
}
