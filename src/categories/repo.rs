use sqlx::PgPool;

use crate::categories::dto::Category;

impl Category {
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    pub async fn exists(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row.is_some())
    }

    pub async fn list_for_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name
            FROM categories c
            JOIN user_categories uc ON uc.category_id = c.id
            WHERE uc.user_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Idempotent: adding an association that already exists is a no-op.
    pub async fn add_for_user(db: &PgPool, user_id: i64, category_id: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_categories (user_id, category_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Idempotent: removing an absent association is a no-op.
    pub async fn remove_for_user(
        db: &PgPool,
        user_id: i64,
        category_id: i64,
    ) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM user_categories WHERE user_id = $1 AND category_id = $2")
            .bind(user_id)
            .bind(category_id)
            .execute(db)
            .await?;
        Ok(())
    }
}
