//! Intent classification: utterance text → structured [`Intent`].
//!
//! Classification is deterministic and side-effect free. The only context
//! consulted is the previous intent (to resolve "ten minutes" after "start a
//! timer") and whether a session is active.

mod numbers;
mod rules;
mod text;

use std::time::Duration;

pub use numbers::describe_duration;
pub use rules::Category;

use crate::model::{CookingWorkstate, Intent, Mode};
use text::Utterance;

/// The slice of the workstate the classifier may look at.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyContext {
    pub last_intent: Option<Intent>,
    pub mode: Mode,
}

impl Default for ClassifyContext {
    fn default() -> Self {
        Self {
            last_intent: None,
            mode: Mode::Idle,
        }
    }
}

impl From<&CookingWorkstate> for ClassifyContext {
    fn from(workstate: &CookingWorkstate) -> Self {
        Self {
            last_intent: workstate.last_intent.clone(),
            mode: workstate.mode(),
        }
    }
}

/// An intent together with the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub intent: Intent,

    /// `None` when nothing matched and the intent is `Unknown`.
    pub rule: Option<&'static str>,
    pub category: Option<Category>,
}

/// Classify an utterance. Never fails: unmatched text becomes `Intent::Unknown`.
pub fn classify(utterance: &str, context: &ClassifyContext) -> Intent {
    classify_with_rule(utterance, context).intent
}

/// Like [`classify`], but also reports which rule fired.
pub fn classify_with_rule(utterance: &str, context: &ClassifyContext) -> Classification {
    let parsed = Utterance::new(utterance);

    if !parsed.is_empty() {
        for rule in rules::RULES {
            if let Some(intent) = rule.apply(&parsed, context) {
                tracing::debug!(rule = rule.name, intent = intent.name(), "classified utterance");
                return Classification {
                    intent,
                    rule: Some(rule.name),
                    category: Some(rule.category),
                };
            }
        }
    }

    tracing::debug!(text = utterance, "no rule matched");
    Classification {
        intent: Intent::Unknown {
            text: utterance.to_string(),
        },
        rule: None,
        category: None,
    }
}

/// The total duration spoken in `text`, if any: "1 hour 20 minutes", "90s".
pub fn duration_in(text: &str) -> Option<Duration> {
    numbers::parse_duration(&Utterance::new(text).words)
}

/// The step number spoken in `text`, counting from one. "step 0" gives `Some(0)`.
pub fn spoken_step(text: &str) -> Option<u32> {
    rules::spoken_step(&Utterance::new(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constraint, Scale, SkillLevel};

    fn idle() -> ClassifyContext {
        ClassifyContext::default()
    }

    fn cooking_after(last: Intent) -> ClassifyContext {
        ClassifyContext {
            last_intent: Some(last),
            mode: Mode::Cooking,
        }
    }

    fn intent(text: &str) -> Intent {
        classify(text, &idle())
    }

    fn minutes(n: u64) -> Option<Duration> {
        Some(Duration::from_secs(n * 60))
    }

    #[test]
    fn navigation_outranks_timers() {
        let c = classify_with_rule("Next, set a timer for 2 minutes", &idle());

        assert_eq!(c.intent, Intent::NavigateNext);
        assert_eq!(c.category, Some(Category::Navigation));
    }

    #[test]
    fn classifies_navigation() {
        assert_eq!(intent("what's next"), Intent::NavigateNext);
        assert_eq!(intent("okay I'm done, keep going"), Intent::NavigateNext);
        assert_eq!(intent("go back"), Intent::NavigatePrevious);
        assert_eq!(intent("repeat that please"), Intent::RepeatStep);
        assert_eq!(intent("what step am I on"), Intent::RepeatStep);
    }

    #[test]
    fn extracts_step_numbers() {
        assert_eq!(intent("go to step 3"), Intent::NavigateToStep { index: 2 });
        assert_eq!(intent("step three"), Intent::NavigateToStep { index: 2 });
        assert_eq!(intent("take me to step number 12"), Intent::NavigateToStep { index: 11 });
        assert_eq!(intent("read the second step"), Intent::NavigateToStep { index: 1 });
        assert_eq!(intent("go back to step 1"), Intent::NavigateToStep { index: 0 });
    }

    #[test]
    fn step_zero_is_not_a_step() {
        assert!(matches!(intent("go to step 0"), Intent::Unknown { .. }));
        assert_eq!(spoken_step("go to step 0"), Some(0));
        assert_eq!(spoken_step("skip to the third step"), Some(3));
        assert_eq!(spoken_step("go back a bit"), None);
    }

    #[test]
    fn extracts_timer_durations_and_labels() {
        assert_eq!(
            intent("set a timer for 10 minutes"),
            Intent::StartTimer {
                duration: minutes(10),
                label: None
            }
        );
        assert_eq!(
            intent("start a pasta timer for eight minutes"),
            Intent::StartTimer {
                duration: minutes(8),
                label: Some("pasta".into())
            }
        );
        assert_eq!(
            intent("set a timer for the rice for half an hour"),
            Intent::StartTimer {
                duration: minutes(30),
                label: Some("rice".into())
            }
        );
        assert_eq!(
            intent("remind me in 90s"),
            Intent::StartTimer {
                duration: Some(Duration::from_secs(90)),
                label: None
            }
        );
    }

    #[test]
    fn timer_without_duration_keeps_it_empty() {
        assert_eq!(
            intent("start a timer"),
            Intent::StartTimer {
                duration: None,
                label: None
            }
        );
    }

    #[test]
    fn classifies_timer_control() {
        assert_eq!(
            intent("how much time is left"),
            Intent::CheckTimer { label: None }
        );
        assert_eq!(
            intent("how long is left on the pasta timer"),
            Intent::CheckTimer {
                label: Some("pasta".into())
            }
        );
        assert_eq!(
            intent("cancel the egg timer"),
            Intent::CancelTimer {
                label: Some("egg".into())
            }
        );
        assert_eq!(intent("pause the timer"), Intent::PauseTimer { label: None });
        assert_eq!(intent("resume the timer"), Intent::ResumeTimer { label: None });
    }

    #[test]
    fn follow_up_completes_pending_timer() {
        let pending = Intent::StartTimer {
            duration: None,
            label: Some("sauce".into()),
        };

        assert_eq!(
            classify("ten minutes", &cooking_after(pending.clone())),
            Intent::StartTimer {
                duration: minutes(10),
                label: Some("sauce".into())
            }
        );
        assert_eq!(
            classify("uh, 5", &cooking_after(pending)),
            Intent::StartTimer {
                duration: minutes(5),
                label: Some("sauce".into())
            }
        );
    }

    #[test]
    fn follow_up_needs_pending_timer() {
        assert!(matches!(
            classify("ten minutes", &cooking_after(Intent::NavigateNext)),
            Intent::Unknown { .. }
        ));
        assert!(matches!(intent("ten minutes"), Intent::Unknown { .. }));
    }

    #[test]
    fn classifies_session_control() {
        assert_eq!(intent("hold on"), Intent::PauseSession);
        assert_eq!(intent("pause"), Intent::PauseSession);
        assert_eq!(intent("ok I'm back"), Intent::ResumeSession);
        assert_eq!(intent("continue"), Intent::ResumeSession);
    }

    #[test]
    fn extracts_substitution_ingredient() {
        for text in [
            "what can I use instead of eggs",
            "what's a good substitute for eggs",
            "I'm out of eggs",
            "I don't have any eggs",
            "egg substitute",
        ] {
            let Intent::Substitute { ingredient } = intent(text) else {
                panic!("{text:?} was not a substitution");
            };
            assert!(ingredient.starts_with("egg"), "{text:?} → {ingredient:?}");
        }

        assert_eq!(
            intent("can I replace sour cream with something"),
            Intent::Substitute {
                ingredient: "sour cream".into()
            }
        );
    }

    #[test]
    fn extracts_scale() {
        assert_eq!(
            intent("double the recipe"),
            Intent::ScaleRecipe {
                scale: Scale::Factor(2.0)
            }
        );
        assert_eq!(
            intent("halve it"),
            Intent::ScaleRecipe {
                scale: Scale::Factor(0.5)
            }
        );
        assert_eq!(
            intent("scale to 6 servings"),
            Intent::ScaleRecipe {
                scale: Scale::Servings(6)
            }
        );
        assert_eq!(
            intent("make it for eight people"),
            Intent::ScaleRecipe {
                scale: Scale::Servings(8)
            }
        );
        assert_eq!(
            intent("multiply by 1.5"),
            Intent::ScaleRecipe {
                scale: Scale::Factor(1.5)
            }
        );
    }

    #[test]
    fn explains_techniques() {
        assert_eq!(
            intent("what does fold mean"),
            Intent::ExplainTechnique {
                term: "fold".into()
            }
        );
        assert_eq!(
            intent("how do I temper eggs"),
            Intent::ExplainTechnique {
                term: "temper eggs".into()
            }
        );
        assert_eq!(
            intent("explain blanching"),
            Intent::ExplainTechnique {
                term: "blanching".into()
            }
        );
    }

    #[test]
    fn lists_ingredients() {
        assert_eq!(intent("what are the ingredients"), Intent::ListIngredients);
        assert_eq!(intent("what do I need"), Intent::ListIngredients);
    }

    #[test]
    fn sets_constraints() {
        assert_eq!(
            intent("I'm allergic to peanuts"),
            Intent::SetConstraint {
                constraint: Constraint::Allergy("peanuts".into())
            }
        );
        assert_eq!(
            intent("I have a nut allergy"),
            Intent::SetConstraint {
                constraint: Constraint::Allergy("nut".into())
            }
        );
        assert_eq!(
            intent("we're vegan"),
            Intent::SetConstraint {
                constraint: Constraint::Diet("vegan".into())
            }
        );
        assert_eq!(
            intent("I only have 30 minutes"),
            Intent::SetConstraint {
                constraint: Constraint::TimeBudget(Duration::from_secs(1800))
            }
        );
        assert_eq!(
            intent("I'm a beginner"),
            Intent::SetConstraint {
                constraint: Constraint::Skill(SkillLevel::Beginner)
            }
        );
    }

    #[test]
    fn unmatched_text_is_unknown() {
        let c = classify_with_rule("the cat sat on the mat", &idle());

        assert_eq!(
            c.intent,
            Intent::Unknown {
                text: "the cat sat on the mat".into()
            }
        );
        assert_eq!(c.rule, None);
        assert!(matches!(intent(""), Intent::Unknown { .. }));
        assert!(matches!(intent("  ?! "), Intent::Unknown { .. }));
    }

    #[test]
    fn classification_is_deterministic() {
        let context = cooking_after(Intent::RepeatStep);
        for text in ["next", "set a timer for 3 minutes", "substitute butter", "gibberish"] {
            assert_eq!(classify(text, &context), classify(text, &context));
        }
    }

    #[test]
    fn oversized_numbers_never_become_slots() {
        assert_eq!(
            intent("set a timer for 99999999999999999999 hours"),
            Intent::StartTimer {
                duration: None,
                label: None
            }
        );
        assert!(matches!(
            intent("multiply by 1e999"),
            Intent::Unknown { .. }
        ));

        let pending = Intent::StartTimer {
            duration: None,
            label: None,
        };
        assert!(!matches!(
            classify("99999999999999999999", &cooking_after(pending)),
            Intent::StartTimer { duration: Some(_), .. }
        ));
    }

    #[test]
    fn finds_durations_in_free_text() {
        assert_eq!(duration_in("Simmer for 10 minutes."), minutes(10));
        assert_eq!(duration_in("1h30m"), minutes(90));
        assert_eq!(duration_in("Stir well."), None);
    }

    #[test]
    fn context_reflects_workstate() {
        let now = jiff::Timestamp::new(1_700_000_000, 0).unwrap();
        let mut ws = CookingWorkstate::idle(now);
        ws.last_intent = Some(Intent::ListIngredients);

        let context = ClassifyContext::from(&ws);

        assert_eq!(context.mode, Mode::Idle);
        assert_eq!(context.last_intent, Some(Intent::ListIngredients));
    }
}
