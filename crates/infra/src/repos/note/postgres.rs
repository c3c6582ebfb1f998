use super::INoteRepo;
use notely_domain::{Note, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresNoteRepo {
    pool: PgPool,
}

impl PostgresNoteRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NoteRaw {
    note_uid: Uuid,
    user_uid: Uuid,
    title: String,
    reminder_at: Option<i64>,
    updated: i64,
}

impl From<NoteRaw> for Note {
    fn from(e: NoteRaw) -> Self {
        Self {
            id: e.note_uid.into(),
            user_id: e.user_uid.into(),
            title: e.title,
            reminder_at: e.reminder_at,
            updated: e.updated,
        }
    }
}

#[async_trait::async_trait]
impl INoteRepo for PostgresNoteRepo {
    async fn insert(&self, note: &Note) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notes
            (note_uid, user_uid, title, reminder_at, updated)
            VALUES($1, $2, $3, $4, $5)
            "#,
        )
        .bind(note.id.inner_ref())
        .bind(note.user_id.inner_ref())
        .bind(&note.title)
        .bind(note.reminder_at)
        .bind(note.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, note_id: &ID) -> Option<Note> {
        sqlx::query_as::<_, NoteRaw>(
            r#"
            SELECT * FROM notes
            WHERE note_uid = $1
            "#,
        )
        .bind(note_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|note| note.into())
    }

    async fn set_reminder_at(
        &self,
        note_id: &ID,
        reminder_at: i64,
        updated: i64,
    ) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE notes
            SET reminder_at = $2, updated = $3
            WHERE note_uid = $1
            "#,
        )
        .bind(note_id.inner_ref())
        .bind(reminder_at)
        .bind(updated)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            anyhow::bail!("Note: {} was not found", note_id);
        }
        Ok(())
    }
}
