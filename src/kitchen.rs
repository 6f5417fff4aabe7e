//! The kitchen: one cook's live session, written through to storage.
//!
//! A `Kitchen` owns the member's workstate, runs every request through the
//! [`Assistant`], and saves the workstate after each turn that changed it.
//! A failed save is reported in the [`Reply`] but never rolls back the
//! in-memory state: the cook keeps cooking and the next save catches up.

use jiff::Timestamp;
use uuid::Uuid;

use crate::engine::{Assistant, RecipeSource, Turn};
use crate::knowledge::KnowledgeBase;
use crate::model::{CookingConstraints, CookingWorkstate, Intent};
use crate::storage::StorageError;

/// Where workstates are kept between invocations, keyed by member.
pub trait WorkstateStore {
    fn load(&self, member: &str) -> Result<Option<CookingWorkstate>, StorageError>;
    fn save(&self, member: &str, workstate: &CookingWorkstate) -> Result<(), StorageError>;
    fn clear(&self, member: &str) -> Result<(), StorageError>;
}

/// What happened to the workstate on disk after a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    /// The turn changed nothing, so nothing was written.
    Unchanged,
    Saved,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub turn: Turn,
    pub persisted: Persisted,
}

pub struct Kitchen<'a> {
    member: String,
    store: &'a dyn WorkstateStore,
    assistant: Assistant<'a>,
    workstate: CookingWorkstate,
}

impl<'a> Kitchen<'a> {
    /// Open the member's kitchen, resuming a saved session if there is one.
    ///
    /// An unreadable saved workstate is logged and replaced with an idle one.
    pub fn open(
        member: impl Into<String>,
        store: &'a dyn WorkstateStore,
        recipes: &'a dyn RecipeSource,
        knowledge: &'a KnowledgeBase,
        now: Timestamp,
    ) -> Result<Self, StorageError> {
        let member = member.into();
        let workstate = match store.load(&member) {
            Ok(Some(workstate)) => workstate,
            Ok(None) => CookingWorkstate::idle(now),
            Err(StorageError::Json(e)) => {
                tracing::warn!(%member, error = %e, "discarding unreadable workstate");
                CookingWorkstate::idle(now)
            }
            Err(e) => return Err(e),
        };
        tracing::debug!(%member, mode = %workstate.mode(), "kitchen opened");

        Ok(Self {
            member,
            store,
            assistant: Assistant::new(recipes, knowledge),
            workstate,
        })
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn workstate(&self) -> &CookingWorkstate {
        &self.workstate
    }

    /// Handle one utterance.
    pub fn say(&mut self, text: &str, now: Timestamp) -> Reply {
        let turn = self.assistant.handle_utterance(text, &self.workstate, now);
        self.commit(turn)
    }

    /// Handle a structured intent.
    pub fn apply(&mut self, intent: Intent, now: Timestamp) -> Reply {
        let turn = self.assistant.apply(intent, &self.workstate, now);
        self.commit(turn)
    }

    pub fn start(
        &mut self,
        recipe_id: Uuid,
        constraints: CookingConstraints,
        now: Timestamp,
    ) -> Reply {
        let turn = self
            .assistant
            .start_session(recipe_id, constraints, &self.workstate, now);
        self.commit(turn)
    }

    pub fn tick(&mut self, now: Timestamp) -> Reply {
        let turn = self.assistant.tick(&self.workstate, now);
        self.commit(turn)
    }

    pub fn end(&mut self, now: Timestamp) -> Reply {
        let turn = self.assistant.end_session(&self.workstate, now);
        self.commit(turn)
    }

    /// Drop everything saved for this member and go idle.
    pub fn forget(&mut self, now: Timestamp) -> Persisted {
        self.workstate = CookingWorkstate::idle(now);
        match self.store.clear(&self.member) {
            Ok(()) => Persisted::Saved,
            Err(e) => {
                tracing::warn!(member = %self.member, error = %e, "failed to clear workstate");
                Persisted::Failed(e.to_string())
            }
        }
    }

    fn commit(&mut self, turn: Turn) -> Reply {
        let Some(next) = &turn.next else {
            return Reply {
                turn,
                persisted: Persisted::Unchanged,
            };
        };
        self.workstate = next.clone();

        let persisted = match self.store.save(&self.member, &self.workstate) {
            Ok(()) => Persisted::Saved,
            Err(e) => {
                tracing::warn!(member = %self.member, error = %e, "failed to save workstate");
                Persisted::Failed(e.to_string())
            }
        };
        Reply { turn, persisted }
    }
}
