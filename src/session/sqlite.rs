use super::store::SessionStore;
use super::types::{Session, Turn, TurnRole};
use crate::error::SessionError;
use crate::routing::Route;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use uuid::Uuid;

/// Sessions persisted in SQLite so they survive a restart.
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    /// Open (creating if needed) the database at `db_path`.
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }

        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&url)
            .await
            .with_context(|| format!("Failed to open session DB: {}", db_path.display()))?;

        Self::new(pool).await
    }

    /// Wrap an existing pool and create the tables.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query("PRAGMA foreign_keys = ON;")
            .execute(&pool)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS sessions (
                 id               TEXT PRIMARY KEY,
                 user_id          TEXT NOT NULL,
                 last_route       TEXT,
                 awaiting_workday INTEGER NOT NULL DEFAULT 0,
                 created_at       TEXT NOT NULL
             )",
        )
        .execute(&pool)
        .await
        .context("create sessions table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS session_turns (
                 session_id TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
                 seq        INTEGER NOT NULL,
                 role       TEXT NOT NULL,
                 text       TEXT NOT NULL,
                 route      TEXT,
                 PRIMARY KEY (session_id, seq)
             )",
        )
        .execute(&pool)
        .await
        .context("create session_turns table")?;

        Ok(Self { pool })
    }

    async fn insert_turn(
        executor: impl sqlx::SqliteExecutor<'_>,
        session_id: &str,
        turn: &Turn,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO session_turns (session_id, seq, role, text, route)
             SELECT $1, COALESCE(MAX(seq), -1) + 1, $2, $3, $4
             FROM session_turns
             WHERE session_id = $1",
        )
        .bind(session_id)
        .bind(turn.role.to_string())
        .bind(&turn.text)
        .bind(turn.route.map(|route| route.to_string()))
        .execute(executor)
        .await
        .context("insert session turn")?;
        Ok(())
    }

    async fn load_turns(&self, session_id: &str) -> Result<Vec<Turn>> {
        let rows = sqlx::query(
            "SELECT role, text, route FROM session_turns
             WHERE session_id = $1
             ORDER BY seq ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .context("load session turns")?;

        rows.iter().map(map_turn_row).collect()
    }
}

fn parse_route(raw: Option<String>) -> Result<Option<Route>> {
    raw.map(|value| {
        value
            .parse::<Route>()
            .map_err(|_| anyhow::anyhow!("unknown route in session DB: {value}"))
    })
    .transpose()
}

fn map_turn_row(row: &SqliteRow) -> Result<Turn> {
    let role_raw: String = row.try_get("role")?;
    let role = role_raw
        .parse::<TurnRole>()
        .map_err(|_| anyhow::anyhow!("unknown turn role in session DB: {role_raw}"))?;

    Ok(Turn {
        role,
        text: row.try_get("text")?,
        route: parse_route(row.try_get("route")?)?,
    })
}

fn map_session_row(row: &SqliteRow, history: Vec<Turn>) -> Result<Session> {
    let created_raw: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_raw)
        .with_context(|| format!("invalid created_at in session DB: {created_raw}"))?
        .with_timezone(&Utc);
    let awaiting: i64 = row.try_get("awaiting_workday")?;

    Ok(Session {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        history,
        last_route: parse_route(row.try_get("last_route")?)?,
        awaiting_workday: awaiting != 0,
        created_at,
    })
}

impl SessionStore for SqliteSessionStore {
    fn create_session<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Session>> + Send + 'a>> {
        Box::pin(async move {
            let session = Session::seeded(Uuid::new_v4().to_string(), user_id);
            let mut tx = self.pool.begin().await?;

            sqlx::query(
                "INSERT INTO sessions (id, user_id, last_route, awaiting_workday, created_at)
                 VALUES ($1, $2, NULL, 0, $3)",
            )
            .bind(&session.id)
            .bind(&session.user_id)
            .bind(session.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .context("insert session")?;

            for turn in &session.history {
                Self::insert_turn(&mut *tx, &session.id, turn).await?;
            }

            tx.commit().await.context("commit new session")?;
            Ok(session)
        })
    }

    fn get_session<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Session>>> + Send + 'a>> {
        Box::pin(async move {
            let row = sqlx::query(
                "SELECT id, user_id, last_route, awaiting_workday, created_at
                 FROM sessions
                 WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("query session by id")?;

            let Some(row) = row else {
                return Ok(None);
            };
            let history = self.load_turns(id).await?;
            map_session_row(&row, history).map(Some)
        })
    }

    fn append_turn<'a>(
        &'a self,
        id: &'a str,
        turn: Turn,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM sessions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .context("check session exists")?;
            if exists.is_none() {
                return Err(SessionError::NotFound(id.to_string()).into());
            }

            Self::insert_turn(&self.pool, id, &turn).await
        })
    }

    fn update_route_state<'a>(
        &'a self,
        id: &'a str,
        last_route: Option<Route>,
        awaiting_workday: bool,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let result = sqlx::query(
                "UPDATE sessions SET last_route = $1, awaiting_workday = $2 WHERE id = $3",
            )
            .bind(last_route.map(|route| route.to_string()))
            .bind(i64::from(awaiting_workday))
            .bind(id)
            .execute(&self.pool)
            .await
            .context("update session route state")?;

            if result.rows_affected() == 0 {
                return Err(SessionError::NotFound(id.to_string()).into());
            }
            Ok(())
        })
    }
}
