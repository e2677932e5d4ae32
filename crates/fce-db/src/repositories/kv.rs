use sqlx::{Executor, Sqlite};

pub async fn get_value<'e, E>(executor: E, key: &str) -> Result<Option<String>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        // language=SQLite
        r#"
            SELECT value
            FROM kv_store
            WHERE key = ?1
        "#,
    )
    .bind(key)
    .fetch_optional(executor)
    .await
}

pub async fn put_value<'e, E>(
    executor: E,
    key: &str,
    value: &str,
    updated_at_millis: i64,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (key)
            DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(updated_at_millis)
    .execute(executor)
    .await?;
    Ok(())
}

/// Remove a key. Returns whether anything was deleted.
pub async fn delete_value<'e, E>(executor: E, key: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        // language=SQLite
        r#"
            DELETE FROM kv_store
            WHERE key = ?1
        "#,
    )
    .bind(key)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}
