use anyhow::Result;

use super::schema::Database;

impl Database {
    /// Get a single preference value by key.
    ///
    /// # Returns
    ///
    /// The preference value if the key exists, or `None` if not set.
    pub async fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Set a preference value (UPSERT).
    ///
    /// Inserts the key-value pair if it doesn't exist, or updates the value
    /// and timestamp if the key already exists.
    pub async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO preferences (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_preference_missing() {
        let db = test_db().await;
        let value = db.get_preference("nonexistent.key").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_set_and_get_preference() {
        let db = test_db().await;
        db.set_preference("session.view", "catalog").await.unwrap();

        let value = db.get_preference("session.view").await.unwrap();
        assert_eq!(value, Some("catalog".to_string()));
    }

    #[tokio::test]
    async fn test_set_preference_upsert() {
        let db = test_db().await;
        db.set_preference("session.view", "catalog").await.unwrap();
        db.set_preference("session.view", "wishlist").await.unwrap();

        let value = db.get_preference("session.view").await.unwrap();
        assert_eq!(value, Some("wishlist".to_string()));
    }

    #[tokio::test]
    async fn test_set_preference_updates_timestamp() {
        let db = test_db().await;
        db.set_preference("test.key", "value1").await.unwrap();

        let row1: (String,) = sqlx::query_as("SELECT updated_at FROM preferences WHERE key = ?")
            .bind("test.key")
            .fetch_one(&db.pool)
            .await
            .unwrap();

        db.set_preference("test.key", "value2").await.unwrap();

        let row2: (String,) = sqlx::query_as("SELECT updated_at FROM preferences WHERE key = ?")
            .bind("test.key")
            .fetch_one(&db.pool)
            .await
            .unwrap();

        // Both should be valid datetime strings (may or may not differ depending on timing)
        assert!(!row1.0.is_empty());
        assert!(!row2.0.is_empty());
    }
}
