use super::INoteRepo;
use crate::repos::shared::inmemory_repo::*;
use notely_domain::{Note, ID};
use std::sync::Mutex;

pub struct InMemoryNoteRepo {
    notes: Mutex<Vec<Note>>,
}

impl InMemoryNoteRepo {
    pub fn new() -> Self {
        Self {
            notes: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryNoteRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INoteRepo for InMemoryNoteRepo {
    async fn insert(&self, note: &Note) -> anyhow::Result<()> {
        insert(note, &self.notes);
        Ok(())
    }

    async fn find(&self, note_id: &ID) -> Option<Note> {
        find(note_id, &self.notes)
    }

    async fn set_reminder_at(
        &self,
        note_id: &ID,
        reminder_at: i64,
        updated: i64,
    ) -> anyhow::Result<()> {
        match find(note_id, &self.notes) {
            Some(mut note) => {
                note.reminder_at = Some(reminder_at);
                note.updated = updated;
                save(&note, &self.notes);
                Ok(())
            }
            None => anyhow::bail!("Note: {} was not found", note_id),
        }
    }
}
