//! Spoken-number and duration parsing.
//!
//! Speech transcripts mix digits and words ("set a timer for five minutes",
//! "1h30m", "an hour and a half"), so every parser here accepts both.

use std::time::Duration;

const UNITS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: &[(&str, u32)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

const ORDINALS: &[&str] = &[
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
    "tenth", "eleventh", "twelfth", "thirteenth", "fourteenth", "fifteenth", "sixteenth",
    "seventeenth", "eighteenth", "nineteenth", "twentieth",
];

/// Words allowed between an amount and its unit ("a couple of minutes", "5 more minutes").
const FILLERS: &[&str] = &["a", "an", "of", "more", "extra", "full", "whole"];

/// Parse a number starting at `words[0]`.
///
/// Returns the value and how many words it consumed. Accepts digits
/// (`5`, `2.5`, `1/2`, `1 1/2`), spelled cardinals (`twenty five`),
/// `half`, `couple`, and a trailing `and a half`.
pub(crate) fn parse_number(words: &[String]) -> Option<(f64, usize)> {
    let first = words.first()?;
    let (mut value, mut used) = if let Some(v) = parse_numeral(first) {
        let mut used = 1;
        let mut v = v;
        // "1 1/2"
        if v.fract() == 0.0
            && let Some(next) = words.get(1)
            && next.contains('/')
            && let Some(frac) = parse_numeral(next)
        {
            v += frac;
            used += 1;
        }
        (v, used)
    } else if let Some(v) = parse_spelled(words) {
        v
    } else {
        match first.as_str() {
            "half" => (0.5, 1),
            "couple" => (2.0, 1),
            "dozen" => (12.0, 1),
            _ => return None,
        }
    };

    if words.get(used..used + 3).is_some_and(|w| w == ["and", "a", "half"]) {
        value += 0.5;
        used += 3;
    }
    Some((value, used))
}

/// A single digit token: `5`, `2.5`, `1/2`. Overflowing tokens (`1e999`) are not numbers.
fn parse_numeral(word: &str) -> Option<f64> {
    let value = if let Some((num, den)) = word.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        (den != 0.0).then(|| num / den)?
    } else {
        if !word.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        word.parse().ok()?
    };
    value.is_finite().then_some(value)
}

/// Spelled cardinals up to the hundreds: "seven", "twenty five", "one hundred".
fn parse_spelled(words: &[String]) -> Option<(f64, usize)> {
    let unit = |word: &str| {
        UNITS
            .iter()
            .position(|u| *u == word)
            .and_then(|n| u32::try_from(n).ok())
    };
    let first = words.first()?.as_str();

    let (mut total, mut used) = if let Some((_, tens)) = TENS.iter().find(|(t, _)| *t == first) {
        match words.get(1).and_then(|w| unit(w.as_str())) {
            Some(ones @ 1..=9) => (tens + ones, 2),
            _ => (*tens, 1),
        }
    } else {
        (unit(first)?, 1)
    };

    if words.get(used).is_some_and(|w| w == "hundred") {
        total *= 100;
        used += 1;
    }
    Some((f64::from(total), used))
}

/// "third" → 3, "2nd" → 2.
pub(crate) fn parse_ordinal(word: &str) -> Option<u32> {
    if let Some(pos) = ORDINALS.iter().position(|o| *o == word) {
        return u32::try_from(pos + 1).ok();
    }
    let digits = word
        .strip_suffix("st")
        .or_else(|| word.strip_suffix("nd"))
        .or_else(|| word.strip_suffix("rd"))
        .or_else(|| word.strip_suffix("th"))?;
    digits.parse().ok().filter(|n| *n > 0)
}

/// The first number anywhere in `words`, with its position.
pub(crate) fn find_number(words: &[String]) -> Option<(usize, f64, usize)> {
    (0..words.len()).find_map(|i| parse_number(&words[i..]).map(|(v, used)| (i, v, used)))
}

fn unit_seconds(word: &str) -> Option<f64> {
    match word {
        "s" | "sec" | "secs" | "second" | "seconds" => Some(1.0),
        "m" | "min" | "mins" | "minute" | "minutes" => Some(60.0),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(3600.0),
        _ => None,
    }
}

/// Spoken units only; the one-letter forms are reserved for compact tokens.
fn spoken_unit(word: &str) -> Option<f64> {
    if word.len() == 1 {
        return None;
    }
    unit_seconds(word)
}

/// Parse every duration phrase in `words` and sum them.
///
/// "1 hour 30 minutes", "an hour and a half", "half an hour",
/// "a couple of minutes", "90s" and "1h30m" are all understood.
/// Returns `None` when no duration is present.
pub(crate) fn parse_duration(words: &[String]) -> Option<Duration> {
    let mut total = 0.0_f64;
    let mut found = false;
    let mut i = 0;

    while i < words.len() {
        if let Some(secs) = parse_compact(&words[i]) {
            total += secs;
            found = true;
            i += 1;
            continue;
        }

        // "a minute", "an hour"
        let amount = if matches!(words[i].as_str(), "a" | "an")
            && words.get(i + 1).is_some_and(|w| spoken_unit(w).is_some())
        {
            Some((1.0, 1))
        } else {
            parse_number(&words[i..])
        };

        let Some((value, used)) = amount else {
            i += 1;
            continue;
        };

        let mut j = i + used;
        let mut skipped = 0;
        while skipped < 2 && words.get(j).is_some_and(|w| FILLERS.contains(&w.as_str())) {
            j += 1;
            skipped += 1;
        }
        let Some(unit) = words.get(j).and_then(|w| spoken_unit(w)) else {
            i += 1;
            continue;
        };

        total += value * unit;
        found = true;
        j += 1;
        if words.get(j..j + 3).is_some_and(|w| w == ["and", "a", "half"]) {
            total += 0.5 * unit;
            j += 3;
        }
        i = j;
    }

    if !found || total <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(total).ok()
}

/// Compact forms: "90s", "5m", "10min", "1h30m".
fn parse_compact(word: &str) -> Option<f64> {
    if !word.starts_with(|c: char| c.is_ascii_digit()) || word.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut total = 0.0;
    let mut rest = word;
    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return None;
        }
        let amount: f64 = rest[..digits_end].parse().ok()?;
        rest = &rest[digits_end..];
        let unit_end = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let unit = unit_seconds(&rest[..unit_end])?;
        total += amount * unit;
        rest = &rest[unit_end..];
    }
    Some(total)
}

/// Render a duration for speech: "1 hour 5 minutes", "30 seconds".
pub fn describe_duration(duration: Duration) -> String {
    let total = duration.as_secs() + u64::from(duration.subsec_millis() >= 500);
    if total == 0 {
        return "0 seconds".to_string();
    }
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    for (n, singular) in [(hours, "hour"), (minutes, "minute"), (seconds, "second")] {
        match n {
            0 => {}
            1 => parts.push(format!("1 {singular}")),
            n => parts.push(format!("{n} {singular}s")),
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    fn secs(text: &str) -> Option<u64> {
        parse_duration(&words(text)).map(|d| d.as_secs())
    }

    #[test]
    fn parses_numerals_and_spelled_numbers() {
        assert_eq!(parse_number(&words("5 minutes")), Some((5.0, 1)));
        assert_eq!(parse_number(&words("2.5")), Some((2.5, 1)));
        assert_eq!(parse_number(&words("1 1/2 cups")), Some((1.5, 2)));
        assert_eq!(parse_number(&words("seven")), Some((7.0, 1)));
        assert_eq!(parse_number(&words("twenty five minutes")), Some((25.0, 2)));
        assert_eq!(parse_number(&words("forty")), Some((40.0, 1)));
        assert_eq!(parse_number(&words("one hundred")), Some((100.0, 2)));
        assert_eq!(parse_number(&words("one and a half")), Some((1.5, 4)));
        assert_eq!(parse_number(&words("five six")), Some((5.0, 1)));
        assert_eq!(parse_number(&words("pasta")), None);
    }

    #[test]
    fn parses_ordinals() {
        assert_eq!(parse_ordinal("third"), Some(3));
        assert_eq!(parse_ordinal("twelfth"), Some(12));
        assert_eq!(parse_ordinal("2nd"), Some(2));
        assert_eq!(parse_ordinal("0th"), None);
        assert_eq!(parse_ordinal("step"), None);
    }

    #[test]
    fn parses_simple_durations() {
        assert_eq!(secs("set timer for 5 minutes"), Some(300));
        assert_eq!(secs("30 seconds"), Some(30));
        assert_eq!(secs("two hours"), Some(7200));
        assert_eq!(secs("ten mins"), Some(600));
    }

    #[test]
    fn parses_compound_durations() {
        assert_eq!(secs("1 hour 30 minutes"), Some(5400));
        assert_eq!(secs("an hour and a half"), Some(5400));
        assert_eq!(secs("half an hour"), Some(1800));
        assert_eq!(secs("a couple of minutes"), Some(120));
        assert_eq!(secs("5 more minutes"), Some(300));
        assert_eq!(secs("one and a half hours"), Some(5400));
    }

    #[test]
    fn parses_compact_durations() {
        assert_eq!(secs("90s"), Some(90));
        assert_eq!(secs("5m"), Some(300));
        assert_eq!(secs("1h30m"), Some(5400));
        assert_eq!(secs("10min"), Some(600));
    }

    #[test]
    fn no_duration_without_unit() {
        assert_eq!(secs("go to step 3"), None);
        assert_eq!(secs("the second step"), None);
        assert_eq!(secs("start a timer"), None);
    }

    #[test]
    fn overflowing_numbers_are_rejected() {
        assert_eq!(parse_number(&words("1e999")), None);
        assert_eq!(parse_number(&words("1e308/1e-308")), None);
        assert_eq!(
            parse_number(&words("99999999999999999999")),
            Some((1e20, 1))
        );
    }

    #[test]
    fn out_of_range_durations_are_none() {
        assert_eq!(secs("99999999999999999999 hours"), None);
        assert_eq!(secs("99999999999999999999h"), None);
        assert_eq!(secs("1e999 minutes"), None);
    }

    #[test]
    fn describes_durations() {
        assert_eq!(describe_duration(Duration::from_secs(300)), "5 minutes");
        assert_eq!(describe_duration(Duration::from_secs(3_661)), "1 hour 1 minute 1 second");
        assert_eq!(describe_duration(Duration::from_millis(29_600)), "30 seconds");
        assert_eq!(describe_duration(Duration::ZERO), "0 seconds");
    }
}
