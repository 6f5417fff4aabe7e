//! The ordered rule table.
//!
//! Rules are evaluated top to bottom and the first match wins, so order is
//! the contract: navigation, then timers, then session control, then
//! knowledge and scaling. A rule matches when one of its triggers occurs,
//! one of its required words (if any) occurs, and its extractor can fill
//! the intent's slots.

use crate::model::{Constraint, Intent, Mode, Scale, SkillLevel};

use super::{
    ClassifyContext,
    numbers::{find_number, parse_duration, parse_number, parse_ordinal},
    text::Utterance,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Navigation,
    Timer,
    Session,
    Knowledge,
}

type Extract = fn(&Utterance, &ClassifyContext) -> Option<Intent>;

pub(super) struct Rule {
    pub name: &'static str,
    pub category: Category,
    pub triggers: &'static [&'static str],
    pub requires: &'static [&'static str],
    pub extract: Extract,
}

impl Rule {
    pub fn apply(&self, utterance: &Utterance, context: &ClassifyContext) -> Option<Intent> {
        if !self.triggers.is_empty() && !utterance.contains_any(self.triggers) {
            return None;
        }
        if !self.requires.is_empty() && !utterance.contains_any(self.requires) {
            return None;
        }
        (self.extract)(utterance, context)
    }
}

// ── Trigger phrases ──

const STEP: &[&str] = &["step", "steps"];
const PREVIOUS: &[&str] = &[
    "previous",
    "go back",
    "back up",
    "step back",
    "prior step",
    "before that",
    "undo",
];
const REPEAT: &[&str] = &[
    "repeat",
    "say again",
    "say that",
    "say it again",
    "one more time",
    "what was that",
    "come again",
    "current step",
    "what step",
    "which step",
    "where am i",
    "where was i",
    "read it",
    "read that",
    "what do i do",
];
const NEXT: &[&str] = &[
    "next",
    "move on",
    "keep going",
    "proceed",
    "go on",
    "go ahead",
    "i'm done",
    "im done",
    "i am done",
    "all done",
    "finished",
    "what now",
];

const TIMER_NOUNS: &[&str] = &["timer", "timers", "alarm", "alarms"];
const CANCEL_TIMER: &[&str] = &[
    "cancel", "stop", "clear", "turn off", "shut off", "kill", "delete", "remove", "dismiss",
    "silence",
];
const PAUSE_TIMER: &[&str] = &["pause", "hold", "freeze"];
const RESUME_TIMER: &[&str] = &["resume", "unpause", "restart", "continue", "unfreeze"];
const CHECK_TIMER: &[&str] = &[
    "^check",
    "double check",
    "how long",
    "how much",
    "time left",
    "left on",
    "is left",
    "remaining",
    "status",
    "^what",
    "^which",
    "^list",
    "^show",
    "^any",
    "are there",
    "is there",
];
const CHECK_TIMER_BARE: &[&str] = &[
    "how much longer",
    "how long until",
    "how long till",
    "how long before",
    "how long left",
    "how much time is left",
    "how much time left",
    "time left",
    "time remaining",
];
const START_TIMER: &[&str] = &[
    "set", "start", "begin", "create", "make", "add", "put", "need", "want", "timer for",
    "alarm for",
];
const START_TIMER_BARE: &[&str] = &[
    "remind me in",
    "remind me after",
    "time this",
    "time it",
    "time that",
    "time the step",
];

const PAUSE_SESSION: &[&str] = &[
    "pause",
    "hold on",
    "hang on",
    "wait",
    "one moment",
    "one sec",
    "give me a minute",
    "give me a second",
    "just a minute",
    "just a sec",
    "take a break",
];
const RESUME_SESSION: &[&str] = &[
    "resume",
    "continue",
    "unpause",
    "i'm back",
    "im back",
    "i am back",
    "carry on",
    "pick up where",
];

const SUBSTITUTE: &[&str] = &[
    "substitute for",
    "substitute",
    "substitutes",
    "substitution",
    "substitutions",
    "replacement for",
    "replacement",
    "replace",
    "instead of",
    "swap out",
    "swap",
    "alternative to",
    "alternative for",
    "alternatives",
    "alternative",
    "don't have",
    "dont have",
    "do not have",
    "have no",
    "ran out of",
    "run out of",
    "out of",
    "no more",
    "use instead",
];
const SCALE: &[&str] = &[
    "double", "twice", "triple", "thrice", "quadruple", "halve", "half", "scale", "multiply",
    "times", "servings", "serving", "people", "portions", "persons", "guests", "serve", "serves",
    "feed",
];
const LIST_INGREDIENTS: &[&str] = &[
    "ingredients",
    "ingredient list",
    "what do i need",
    "shopping list",
    "what goes in",
];
const EXPLAIN: &[&str] = &[
    "what does",
    "what do you mean by",
    "what is",
    "what's",
    "whats",
    "what are",
    "explain",
    "define",
    "definition of",
    "meaning of",
    "how do i",
    "how do you",
    "how to",
    "tell me about",
];
const ALLERGY: &[&str] = &[
    "allergic to",
    "allergy to",
    "intolerant to",
    "can't eat",
    "cannot eat",
    "can't have",
    "allergic",
    "allergy",
    "allergies",
    "intolerance",
];
const DIET: &[&str] = &[
    "vegan",
    "vegetarian",
    "pescatarian",
    "gluten free",
    "dairy free",
    "nut free",
    "sugar free",
    "keto",
    "paleo",
    "kosher",
    "halal",
    "low carb",
    "low sodium",
    "low fat",
];
const TIME_BUDGET: &[&str] = &[
    "i only have",
    "only have",
    "i have",
    "we have",
    "i've got",
    "we've got",
    "i got",
    "done in",
    "finish in",
    "ready in",
];
const SKILL: &[&str] = &[
    "beginner",
    "novice",
    "new to cooking",
    "intermediate",
    "advanced",
    "experienced",
    "expert",
    "professional",
];

// ── Rule table ──

pub(super) const RULES: &[Rule] = &[
    // Navigation
    Rule {
        name: "navigate-to-step",
        category: Category::Navigation,
        triggers: STEP,
        requires: &[],
        extract: navigate_to_step,
    },
    Rule {
        name: "navigate-previous",
        category: Category::Navigation,
        triggers: PREVIOUS,
        requires: &[],
        extract: |_, _| Some(Intent::NavigatePrevious),
    },
    Rule {
        name: "repeat-step",
        category: Category::Navigation,
        triggers: REPEAT,
        requires: &[],
        extract: |_, _| Some(Intent::RepeatStep),
    },
    Rule {
        name: "navigate-next",
        category: Category::Navigation,
        triggers: NEXT,
        requires: &[],
        extract: |_, _| Some(Intent::NavigateNext),
    },
    // Timers
    Rule {
        name: "cancel-timer",
        category: Category::Timer,
        triggers: CANCEL_TIMER,
        requires: TIMER_NOUNS,
        extract: |u, _| Some(Intent::CancelTimer { label: timer_label(u) }),
    },
    Rule {
        name: "pause-timer",
        category: Category::Timer,
        triggers: PAUSE_TIMER,
        requires: TIMER_NOUNS,
        extract: |u, _| Some(Intent::PauseTimer { label: timer_label(u) }),
    },
    Rule {
        name: "resume-timer",
        category: Category::Timer,
        triggers: RESUME_TIMER,
        requires: TIMER_NOUNS,
        extract: |u, _| Some(Intent::ResumeTimer { label: timer_label(u) }),
    },
    Rule {
        name: "check-timer",
        category: Category::Timer,
        triggers: CHECK_TIMER,
        requires: TIMER_NOUNS,
        extract: |u, _| Some(Intent::CheckTimer { label: timer_label(u) }),
    },
    Rule {
        name: "check-timer-bare",
        category: Category::Timer,
        triggers: CHECK_TIMER_BARE,
        requires: &[],
        extract: |u, _| Some(Intent::CheckTimer { label: timer_label(u) }),
    },
    Rule {
        name: "start-timer",
        category: Category::Timer,
        triggers: START_TIMER,
        requires: TIMER_NOUNS,
        extract: start_timer,
    },
    Rule {
        name: "start-timer-bare",
        category: Category::Timer,
        triggers: START_TIMER_BARE,
        requires: &[],
        extract: start_timer,
    },
    Rule {
        name: "start-timer-implied",
        category: Category::Timer,
        triggers: TIMER_NOUNS,
        requires: &[],
        extract: |u, _| {
            let duration = parse_duration(&u.words)?;
            Some(Intent::StartTimer {
                duration: Some(duration),
                label: timer_label(u),
            })
        },
    },
    Rule {
        name: "timer-follow-up",
        category: Category::Timer,
        triggers: &[],
        requires: &[],
        extract: timer_follow_up,
    },
    // Session control
    Rule {
        name: "pause-session",
        category: Category::Session,
        triggers: PAUSE_SESSION,
        requires: &[],
        extract: |_, _| Some(Intent::PauseSession),
    },
    Rule {
        name: "resume-session",
        category: Category::Session,
        triggers: RESUME_SESSION,
        requires: &[],
        extract: |_, _| Some(Intent::ResumeSession),
    },
    // Knowledge and scaling
    Rule {
        name: "substitute",
        category: Category::Knowledge,
        triggers: SUBSTITUTE,
        requires: &[],
        extract: substitute,
    },
    Rule {
        name: "scale-recipe",
        category: Category::Knowledge,
        triggers: SCALE,
        requires: &[],
        extract: scale_recipe,
    },
    Rule {
        name: "list-ingredients",
        category: Category::Knowledge,
        triggers: LIST_INGREDIENTS,
        requires: &[],
        extract: |_, _| Some(Intent::ListIngredients),
    },
    Rule {
        name: "explain-technique",
        category: Category::Knowledge,
        triggers: EXPLAIN,
        requires: &[],
        extract: explain_technique,
    },
    Rule {
        name: "set-allergy",
        category: Category::Knowledge,
        triggers: ALLERGY,
        requires: &[],
        extract: set_allergy,
    },
    Rule {
        name: "set-diet",
        category: Category::Knowledge,
        triggers: DIET,
        requires: &[],
        extract: |u, _| {
            let (pos, len) = u.find_any(DIET)?;
            let tag = u.words[pos..pos + len].join(" ");
            Some(Intent::SetConstraint {
                constraint: Constraint::Diet(tag),
            })
        },
    },
    Rule {
        name: "set-time-budget",
        category: Category::Knowledge,
        triggers: TIME_BUDGET,
        requires: &[],
        extract: |u, _| {
            let budget = parse_duration(&u.words)?;
            Some(Intent::SetConstraint {
                constraint: Constraint::TimeBudget(budget),
            })
        },
    },
    Rule {
        name: "set-skill",
        category: Category::Knowledge,
        triggers: SKILL,
        requires: &[],
        extract: set_skill,
    },
];

// ── Extractors ──

/// "go to step 3", "step three", "the second step" → 0-based index.
fn navigate_to_step(u: &Utterance, _: &ClassifyContext) -> Option<Intent> {
    let index = usize::try_from(spoken_step(u)?).ok()?.checked_sub(1)?;
    Some(Intent::NavigateToStep { index })
}

/// The step number a cook asked for, as spoken: "step 3", "step number
/// three", "the third step". Zero is returned as is.
pub(super) fn spoken_step(u: &Utterance) -> Option<u32> {
    let pos = u.words.iter().position(|w| w == "step" || w == "steps")?;

    let mut after = pos + 1;
    if u.words.get(after).is_some_and(|w| w == "number") {
        after += 1;
    }
    u.words
        .get(after..)
        .and_then(parse_number)
        .map(|(n, _)| n)
        .filter(|n| n.fract() == 0.0 && *n >= 0.0)
        .and_then(|n| u32::try_from(n as u64).ok())
        .or_else(|| {
            let before = pos.checked_sub(1)?;
            parse_ordinal(&u.words[before])
        })
}

fn start_timer(u: &Utterance, _: &ClassifyContext) -> Option<Intent> {
    Some(Intent::StartTimer {
        duration: parse_duration(&u.words),
        label: timer_label(u),
    })
}

/// After "start a timer" with no duration, "ten minutes" or a bare "10"
/// (minutes) completes the request.
fn timer_follow_up(u: &Utterance, context: &ClassifyContext) -> Option<Intent> {
    if context.mode == Mode::Idle {
        return None;
    }
    let Some(Intent::StartTimer {
        duration: None,
        label,
    }) = &context.last_intent
    else {
        return None;
    };

    let duration = parse_duration(&u.words).or_else(|| bare_minutes(u))?;
    Some(Intent::StartTimer {
        duration: Some(duration),
        label: timer_label(u).or_else(|| label.clone()),
    })
}

/// An utterance that is only a number, give or take filler: "10", "uh, five please".
fn bare_minutes(u: &Utterance) -> Option<std::time::Duration> {
    const FILLER: &[&str] = &[
        "uh", "um", "about", "like", "for", "it", "make", "set", "do", "say", "maybe", "just",
        "please", "okay", "ok", "oh", "let's", "go", "with",
    ];
    let content: Vec<String> = u
        .words
        .iter()
        .filter(|w| !FILLER.contains(&w.as_str()))
        .cloned()
        .collect();
    let (minutes, used) = parse_number(&content)?;
    if used != content.len() || minutes <= 0.0 {
        return None;
    }
    std::time::Duration::try_from_secs_f64(minutes * 60.0).ok()
}

/// Words that never name a timer.
const NOT_A_LABEL: &[&str] = &[
    "a", "an", "the", "my", "this", "that", "these", "those", "it", "me", "up", "now", "new",
    "another", "kitchen", "all", "any", "each", "every", "what", "which", "how", "long", "much",
    "time", "left", "remaining", "is", "are", "on", "for", "in", "to", "of", "please", "timer",
    "timers", "alarm", "alarms", "set", "start", "begin", "create", "make", "add", "put", "cancel",
    "stop", "clear", "pause", "resume", "check", "and", "with", "i", "you", "done", "ready",
    "second", "seconds", "minute", "minutes", "hour", "hours", "sec", "secs", "min", "mins",
    "hr", "hrs", "there", "running", "status", "more", "until", "till", "before", "called",
    "named", "off", "need", "want", "show", "list", "turn", "kill", "remove", "delete",
    "dismiss", "silence", "hold", "freeze", "restart", "continue", "unpause", "remind",
    "about", "be", "will", "going", "should", "can", "could", "would", "again",
];

fn is_label_word(word: &str) -> bool {
    !NOT_A_LABEL.contains(&word)
        && !word.starts_with(|c: char| c.is_ascii_digit())
        && parse_number(&[word.to_string()]).is_none()
}

/// What a timer is for: "the pasta timer", "a timer for the sauce",
/// "a timer called rice", "how long until the eggs are done".
fn timer_label(u: &Utterance) -> Option<String> {
    let words = &u.words;

    // "<label> timer"
    if let Some(pos) = words.iter().position(|w| TIMER_NOUNS.contains(&w.as_str())) {
        let mut start = pos;
        while start > 0 && pos - start < 2 && is_label_word(&words[start - 1]) {
            start -= 1;
        }
        if start < pos {
            return Some(words[start..pos].join(" "));
        }
    }

    // "<anchor> (the) <label>"
    const ANCHORS: &[&str] = &["for", "on", "called", "named", "labeled", "until", "till"];
    for (i, word) in words.iter().enumerate() {
        if !ANCHORS.contains(&word.as_str()) {
            continue;
        }
        let mut j = i + 1;
        while words
            .get(j)
            .is_some_and(|w| matches!(w.as_str(), "the" | "my" | "a" | "an"))
        {
            j += 1;
        }
        let label: Vec<&str> = words[j.min(words.len())..]
            .iter()
            .take_while(|w| is_label_word(w))
            .take(2)
            .map(String::as_str)
            .collect();
        if !label.is_empty() {
            return Some(label.join(" "));
        }
    }
    None
}

/// Leading words skipped before an ingredient or term.
const LEAD: &[&str] = &[
    "for", "to", "of", "out", "the", "a", "an", "any", "some", "my", "more", "with", "enough",
    "i", "use", "is", "there", "it", "mean", "means", "by", "term", "word", "technique", "you",
    "does", "do", "how", "are", "called", "about",
];

/// Words that end an ingredient or term.
const STOP: &[&str] = &[
    "with", "in", "what", "can", "could", "should", "would", "do", "does", "for", "because", "so",
    "instead", "please", "and", "but", "to", "that", "which", "is", "are", "now", "right",
    "anymore", "today", "here", "left", "mean", "means", "meant", "exactly", "when", "if",
    "properly", "correctly", "again", "i", "we", "it",
];

/// Up to four content words starting at `from`, after skipping lead-in words.
fn phrase_after(words: &[String], from: usize) -> Option<String> {
    let rest = words.get(from..)?;
    let phrase: Vec<&str> = rest
        .iter()
        .skip_while(|w| LEAD.contains(&w.as_str()))
        .take_while(|w| !STOP.contains(&w.as_str()))
        .take(4)
        .map(String::as_str)
        .collect();
    (!phrase.is_empty()).then(|| phrase.join(" "))
}

/// "substitute for eggs", "I'm out of buttermilk", "egg substitute".
fn substitute(u: &Utterance, _: &ClassifyContext) -> Option<Intent> {
    let (pos, len) = u.find_any(SUBSTITUTE)?;
    let ingredient = phrase_after(&u.words, pos + len).or_else(|| {
        let before = u.words[..pos].last()?;
        let generic = ["a", "an", "the", "good", "what", "what's", "is", "there", "any", "i", "need"];
        (!generic.contains(&before.as_str())).then(|| before.clone())
    })?;
    Some(Intent::Substitute { ingredient })
}

/// "double the recipe", "scale to 6 servings", "make it for 8 people",
/// "multiply by 1.5", "halve it".
fn scale_recipe(u: &Utterance, _: &ClassifyContext) -> Option<Intent> {
    // "half an hour" is a duration, not a scale.
    if parse_duration(&u.words).is_some() {
        return None;
    }

    const SERVING_NOUNS: &[&str] = &["servings", "serving", "people", "portions", "persons", "guests"];
    let words = &u.words;

    if let Some(pos) = words.iter().position(|w| SERVING_NOUNS.contains(&w.as_str())) {
        let count = (0..pos).find_map(|i| {
            parse_number(&words[i..])
                .filter(|(_, used)| i + used == pos)
                .map(|(n, _)| n)
        });
        if let Some(n) = count {
            return servings(n);
        }
    }
    if let Some(pos) = words
        .iter()
        .position(|w| matches!(w.as_str(), "serve" | "serves" | "feed"))
        && let Some((n, _)) = words.get(pos + 1..).and_then(parse_number)
    {
        return servings(n);
    }

    for (word, factor) in [
        ("double", 2.0),
        ("twice", 2.0),
        ("triple", 3.0),
        ("thrice", 3.0),
        ("quadruple", 4.0),
        ("halve", 0.5),
        ("half", 0.5),
    ] {
        if u.has_word(word) {
            return Some(Intent::ScaleRecipe {
                scale: Scale::Factor(factor),
            });
        }
    }

    if u.contains_any(&["scale", "multiply", "times"]) {
        let (pos, n, _) = find_number(words)?;
        if pos > 0 && words[pos - 1] == "to" {
            return servings(n);
        }
        return n.is_finite().then_some(Intent::ScaleRecipe {
            scale: Scale::Factor(n),
        });
    }
    None
}

fn servings(n: f64) -> Option<Intent> {
    if n.fract() != 0.0 || n < 0.0 {
        return None;
    }
    let n = u32::try_from(n as u64).ok()?;
    Some(Intent::ScaleRecipe {
        scale: Scale::Servings(n),
    })
}

/// "what does fold mean", "how do I temper eggs", "explain blanching".
fn explain_technique(u: &Utterance, _: &ClassifyContext) -> Option<Intent> {
    let (pos, len) = u.find_any(EXPLAIN)?;
    let term = phrase_after(&u.words, pos + len)?;
    Some(Intent::ExplainTechnique { term })
}

/// "I'm allergic to peanuts", "I have a nut allergy".
fn set_allergy(u: &Utterance, _: &ClassifyContext) -> Option<Intent> {
    let (pos, len) = u.find_any(ALLERGY)?;
    let name = phrase_after(&u.words, pos + len).or_else(|| {
        let before = u.words[..pos].last()?;
        let generic = ["a", "an", "my", "i", "i'm", "have", "am", "any", "food"];
        (!generic.contains(&before.as_str())).then(|| before.clone())
    })?;
    Some(Intent::SetConstraint {
        constraint: Constraint::Allergy(name),
    })
}

fn set_skill(u: &Utterance, _: &ClassifyContext) -> Option<Intent> {
    let level = if u.contains_any(&["beginner", "novice", "new to cooking"]) {
        SkillLevel::Beginner
    } else if u.has_word("intermediate") {
        SkillLevel::Intermediate
    } else {
        SkillLevel::Advanced
    };
    Some(Intent::SetConstraint {
        constraint: Constraint::Skill(level),
    })
}
