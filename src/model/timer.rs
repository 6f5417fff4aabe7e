//! Kitchen timers.
//!
//! Remaining time is always derived from the absolute start timestamp,
//! so a timer stays correct across suspension and irregular polling.

use std::{fmt, time::Duration};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: Uuid,

    /// What the timer is for ("pasta", "sauce"). Unlabeled timers are `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub duration: Duration,

    /// When the current run started. Unset until the timer first runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,

    /// Time left when the timer was paused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_remaining: Option<Duration>,

    pub state: TimerState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Expired,
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Expired => "done",
        })
    }
}

impl Timer {
    /// A timer that starts running at `now`.
    pub fn started(label: Option<String>, duration: Duration, now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            label,
            duration,
            started_at: Some(now),
            paused_remaining: None,
            state: TimerState::Running,
        }
    }

    /// Time left at `now`.
    ///
    /// Running timers compute `duration - (now - started_at)`, floored at zero.
    /// Paused timers report the remaining time captured when they paused.
    pub fn remaining(&self, now: Timestamp) -> Duration {
        match self.state {
            TimerState::Idle => self.duration,
            TimerState::Paused => self.paused_remaining.unwrap_or(self.duration),
            TimerState::Expired => Duration::ZERO,
            TimerState::Running => {
                let Some(started_at) = self.started_at else {
                    return self.duration;
                };
                let elapsed_ms = now.as_millisecond() - started_at.as_millisecond();
                let total_ms = i64::try_from(self.duration.as_millis()).unwrap_or(i64::MAX);
                let left_ms = total_ms.saturating_sub(elapsed_ms.max(0));
                Duration::from_millis(u64::try_from(left_ms).unwrap_or(0))
            }
        }
    }

    /// Whether a running timer has reached its deadline at `now`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.state == TimerState::Running && self.remaining(now).is_zero()
    }

    /// Human-facing name: the label, or "timer" when unlabeled.
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or("timer")
    }

    /// Whether `label` refers to this timer (case-insensitive; `None` matches unlabeled).
    pub fn answers_to(&self, label: Option<&str>) -> bool {
        match (self.label.as_deref(), label) {
            (Some(mine), Some(theirs)) => mine.eq_ignore_ascii_case(theirs),
            (None, None) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: i64) -> Timestamp {
        Timestamp::new(1_700_000_000 + seconds, 0).unwrap()
    }

    #[test]
    fn remaining_is_computed_from_start() {
        let timer = Timer::started(Some("pasta".into()), Duration::from_secs(300), at(0));

        assert_eq!(timer.remaining(at(0)), Duration::from_secs(300));
        assert_eq!(timer.remaining(at(120)), Duration::from_secs(180));
        assert_eq!(timer.remaining(at(900)), Duration::ZERO);
    }

    #[test]
    fn due_only_once_deadline_passes() {
        let timer = Timer::started(None, Duration::from_secs(60), at(0));

        assert!(!timer.is_due(at(59)));
        assert!(timer.is_due(at(60)));
    }

    #[test]
    fn paused_timer_reports_captured_remaining() {
        let mut timer = Timer::started(None, Duration::from_secs(60), at(0));
        timer.state = TimerState::Paused;
        timer.paused_remaining = Some(Duration::from_secs(42));

        assert_eq!(timer.remaining(at(1_000)), Duration::from_secs(42));
        assert!(!timer.is_due(at(1_000)));
    }

    #[test]
    fn label_matching_is_case_insensitive() {
        let labeled = Timer::started(Some("Sauce".into()), Duration::from_secs(1), at(0));
        let unlabeled = Timer::started(None, Duration::from_secs(1), at(0));

        assert!(labeled.answers_to(Some("sauce")));
        assert!(!labeled.answers_to(None));
        assert!(unlabeled.answers_to(None));
        assert_eq!(unlabeled.name(), "timer");
    }
}
