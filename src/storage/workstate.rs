//! Workstate storage: one row per member, replaced on every save.

use rusqlite::OptionalExtension;

use crate::kitchen::WorkstateStore;
use crate::model::CookingWorkstate;

use super::{Result, Storage, StorageError};

impl Storage {
    pub fn load_workstate(&self, member: &str) -> Result<Option<CookingWorkstate>> {
        let state: Option<String> = self
            .conn
            .query_row(
                "SELECT state FROM workstate WHERE member = ?1",
                [member],
                |row| row.get(0),
            )
            .optional()?;
        state
            .map(|json| serde_json::from_str(&json).map_err(StorageError::from))
            .transpose()
    }

    pub fn save_workstate(&self, member: &str, workstate: &CookingWorkstate) -> Result<()> {
        let state = serde_json::to_string(workstate)?;
        self.conn.execute(
            "INSERT INTO workstate (member, state, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (member) DO UPDATE SET state = ?2, updated_at = ?3",
            rusqlite::params![member, state, workstate.updated_at.to_string()],
        )?;
        Ok(())
    }

    /// Idempotent: clearing a member with nothing saved is fine.
    pub fn clear_workstate(&self, member: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM workstate WHERE member = ?1", [member])?;
        Ok(())
    }
}

impl WorkstateStore for Storage {
    fn load(&self, member: &str) -> Result<Option<CookingWorkstate>> {
        self.load_workstate(member)
    }

    fn save(&self, member: &str, workstate: &CookingWorkstate) -> Result<()> {
        self.save_workstate(member, workstate)
    }

    fn clear(&self, member: &str) -> Result<()> {
        self.clear_workstate(member)
    }
}
