mod inmemory;
mod postgres;

pub use inmemory::InMemoryNoteRepo;
use notely_domain::{Note, ID};
pub use postgres::PostgresNoteRepo;

#[async_trait::async_trait]
pub trait INoteRepo: Send + Sync {
    async fn insert(&self, note: &Note) -> anyhow::Result<()>;
    async fn find(&self, note_id: &ID) -> Option<Note>;
    /// Mirrors the next fire time of a rescheduled reminder onto the note
    /// it is attached to. Fails when the note no longer exists.
    async fn set_reminder_at(
        &self,
        note_id: &ID,
        reminder_at: i64,
        updated: i64,
    ) -> anyhow::Result<()>;
}
