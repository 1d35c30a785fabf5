use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Daily attendance outcome for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attendance_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Attended,
    Missed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub date: Date,
    pub status: AttendanceStatus,
}

impl Subject {
    /// Create a subject for `user_id`; the (user_id, name) unique index makes
    /// a duplicate name fail as a database error the caller maps to Conflict.
    pub async fn create(db: &PgPool, user_id: Uuid, name: &str) -> Result<Subject, sqlx::Error> {
        sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(db)
        .await
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Subject>> {
        let rows = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, user_id, name, created_at
            FROM subjects
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Find a subject only if it belongs to `user_id`. A subject owned by
    /// someone else looks identical to one that does not exist.
    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        subject_id: Uuid,
    ) -> anyhow::Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, user_id, name, created_at
            FROM subjects
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(subject_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(subject)
    }

    /// Delete the subject and all its attendance rows in one transaction.
    pub async fn delete_with_attendance(db: &PgPool, subject_id: Uuid) -> anyhow::Result<()> {
        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM attendance WHERE subject_id = $1")
            .bind(subject_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(subject_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

impl Attendance {
    /// Insert or overwrite the record for (subject_id, date). The unique index
    /// resolves concurrent writers to a single row with the latest status.
    pub async fn upsert(
        db: &PgPool,
        subject_id: Uuid,
        date: Date,
        status: AttendanceStatus,
    ) -> anyhow::Result<Attendance> {
        let row = sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendance (subject_id, date, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (subject_id, date) DO UPDATE SET status = EXCLUDED.status
            RETURNING id, subject_id, date, status
            "#,
        )
        .bind(subject_id)
        .bind(date)
        .bind(status)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_date(
        db: &PgPool,
        subject_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<Attendance>> {
        let row = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT id, subject_id, date, status
            FROM attendance
            WHERE subject_id = $1 AND date = $2
            "#,
        )
        .bind(subject_id)
        .bind(date)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Returns false when no record existed for that date.
    pub async fn delete_by_date(db: &PgPool, subject_id: Uuid, date: Date) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM attendance WHERE subject_id = $1 AND date = $2")
            .bind(subject_id)
            .bind(date)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// (total, attended) counts for a subject.
    pub async fn counts(db: &PgPool, subject_id: Uuid) -> anyhow::Result<(i64, i64)> {
        let row: (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'attended')
            FROM attendance
            WHERE subject_id = $1
            "#,
        )
        .bind(subject_id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_status_json_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Attended).unwrap(),
            "\"attended\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Missed).unwrap(),
            "\"missed\""
        );
    }

    #[test]
    fn attendance_status_deserializes_from_lowercase() {
        let status: AttendanceStatus = serde_json::from_str("\"missed\"").unwrap();
        assert_eq!(status, AttendanceStatus::Missed);
        assert!(serde_json::from_str::<AttendanceStatus>("\"present\"").is_err());
    }
}
