use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};

use super::{Collection, DocumentMeta, DocumentStore, SortOrder, TimeWindow};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        meta: DocumentMeta,
        doc: Value,
    ) -> anyhow::Result<()> {
        let sql = format!(
            "INSERT INTO {} (id, user_id, recorded_at, doc) VALUES ($1, $2, $3, $4)",
            collection.table()
        );
        sqlx::query(&sql)
            .bind(meta.id)
            .bind(&meta.user_id)
            .bind(meta.recorded_at)
            .bind(Json(doc))
            .execute(&self.pool)
            .await
            .with_context(|| format!("insert into {}", collection.table()))?;
        Ok(())
    }

    async fn find_in_window(
        &self,
        collection: Collection,
        user_id: &str,
        window: TimeWindow,
        order: SortOrder,
    ) -> anyhow::Result<Vec<Value>> {
        let upper = if window.end_inclusive { "<=" } else { "<" };
        let direction = match order {
            SortOrder::NewestFirst => "DESC",
            SortOrder::OldestFirst => "ASC",
        };
        let sql = format!(
            r#"
            SELECT doc
            FROM {}
            WHERE user_id = $1 AND recorded_at >= $2 AND recorded_at {} $3
            ORDER BY recorded_at {}
            "#,
            collection.table(),
            upper,
            direction
        );
        let rows = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(user_id)
            .bind(window.start)
            .bind(window.end)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("query {}", collection.table()))?;
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn find_or_insert_profile(
        &self,
        user_id: &str,
        default_doc: Value,
    ) -> anyhow::Result<Value> {
        // The outer SELECT cannot see the row inserted by the CTE, so exactly one branch yields.
        let found = sqlx::query_scalar::<_, Json<Value>>(
            r#"
            WITH inserted AS (
                INSERT INTO user_profiles (user_id, doc)
                VALUES ($1, $2)
                ON CONFLICT (user_id) DO NOTHING
                RETURNING doc
            )
            SELECT doc FROM inserted
            UNION ALL
            SELECT doc FROM user_profiles WHERE user_id = $1
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(Json(default_doc))
        .fetch_optional(&self.pool)
        .await
        .context("find or insert profile")?;
        if let Some(Json(doc)) = found {
            return Ok(doc);
        }

        // A concurrent insert committed after our snapshot was taken.
        let Json(doc) = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT doc FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("load profile")?;
        Ok(doc)
    }

    async fn merge_profile(
        &self,
        user_id: &str,
        patch: Map<String, Value>,
    ) -> anyhow::Result<bool> {
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO user_profiles (user_id, doc)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET doc = user_profiles.doc || EXCLUDED.doc
            RETURNING (xmax = 0)
            "#,
        )
        .bind(user_id)
        .bind(Json(Value::Object(patch)))
        .fetch_one(&self.pool)
        .await
        .context("merge profile")?;
        Ok(!inserted)
    }
}
