//! SQLite-backed session storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use taleturn_domain::{
    Action, ActionDescription, ActionId, DiceRoll, DiceType, Session, SessionSetup, SessionToken,
};
use uuid::Uuid;

use crate::infrastructure::ports::{ActionRepo, RepoError, SessionRepo};

/// SQLite implementation of both session and action storage.
///
/// One file holds two tables. Timestamps are RFC 3339 text, and
/// `UNIQUE(session_token, action_order)` backs the per-session ordering.
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub async fn new(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                theme TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                player_class TEXT NOT NULL,
                initial_scenario TEXT NOT NULL,
                current_context TEXT NOT NULL,
                action_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("schema", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS actions (
                id TEXT PRIMARY KEY,
                session_token TEXT NOT NULL REFERENCES sessions(token),
                dice_type TEXT NOT NULL,
                dice_result INTEGER NOT NULL,
                action_description TEXT NOT NULL,
                narration TEXT NOT NULL,
                action_order INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (session_token, action_order)
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("schema", e))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SessionRepo for SqliteSessionStore {
    async fn create(&self, session: &Session) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            INSERT INTO sessions (
                token, theme, difficulty, player_class, initial_scenario,
                current_context, action_count, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(session.token().as_str())
        .bind(session.theme().as_str())
        .bind(session.difficulty().as_str())
        .bind(session.player_class().as_str())
        .bind(session.initial_scenario())
        .bind(session.current_context())
        .bind(i64::from(session.action_count()))
        .bind(session.created_at().to_rfc3339())
        .bind(session.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                RepoError::constraint(format!("session {} already exists", session.token())),
            ),
            Err(e) => Err(RepoError::database("create_session", e)),
        }
    }

    async fn save(&self, session: &Session) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                token, theme, difficulty, player_class, initial_scenario,
                current_context, action_count, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(token) DO UPDATE SET
                current_context = excluded.current_context,
                action_count = excluded.action_count,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(session.token().as_str())
        .bind(session.theme().as_str())
        .bind(session.difficulty().as_str())
        .bind(session.player_class().as_str())
        .bind(session.initial_scenario())
        .bind(session.current_context())
        .bind(i64::from(session.action_count()))
        .bind(session.created_at().to_rfc3339())
        .bind(session.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_session", e))?;

        Ok(())
    }

    async fn get(&self, token: &SessionToken) -> Result<Option<Session>, RepoError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE token = ?")
            .bind(token.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_session", e))?;

        row.as_ref().map(session_from_row).transpose()
    }
}

#[async_trait]
impl ActionRepo for SqliteSessionStore {
    async fn append(&self, action: &Action) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            INSERT INTO actions (
                id, session_token, dice_type, dice_result, action_description,
                narration, action_order, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(action.id().to_string())
        .bind(action.session_token().as_str())
        .bind(action.dice_type().as_str())
        .bind(action.dice_result())
        .bind(action.description().as_str())
        .bind(action.narration())
        .bind(i64::from(action.order()))
        .bind(action.created_at().to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(RepoError::constraint(format!(
                    "session {} already has action #{}",
                    action.session_token(),
                    action.order()
                )))
            }
            Err(e) => Err(RepoError::database("append_action", e)),
        }
    }

    async fn list_for_session(&self, token: &SessionToken) -> Result<Vec<Action>, RepoError> {
        let rows = sqlx::query("SELECT * FROM actions WHERE session_token = ? ORDER BY action_order ASC")
            .bind(token.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_actions", e))?;

        rows.iter().map(action_from_row).collect()
    }
}

// =============================================================================
// Row mapping
// =============================================================================

fn column<T>(row: &SqliteRow, name: &str) -> Result<T, RepoError>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepoError::serialization(format!("column {}: {}", name, e)))
}

fn timestamp(row: &SqliteRow, name: &str) -> Result<DateTime<Utc>, RepoError> {
    let raw: String = column(row, name)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::serialization(format!("column {}: {}", name, e)))
}

fn order(row: &SqliteRow, name: &str) -> Result<u32, RepoError> {
    let raw: i64 = column(row, name)?;
    u32::try_from(raw).map_err(|e| RepoError::serialization(format!("column {}: {}", name, e)))
}

fn session_from_row(row: &SqliteRow) -> Result<Session, RepoError> {
    let token = SessionToken::parse(column::<String>(row, "token")?)
        .map_err(RepoError::serialization)?;
    let setup = SessionSetup::parse(
        &column::<String>(row, "theme")?,
        &column::<String>(row, "difficulty")?,
        &column::<String>(row, "player_class")?,
    )
    .map_err(RepoError::serialization)?;

    Ok(Session::new(
        token,
        setup,
        column::<String>(row, "initial_scenario")?,
        timestamp(row, "created_at")?,
    )
    .with_current_context(column::<String>(row, "current_context")?)
    .with_action_count(order(row, "action_count")?)
    .with_updated_at(timestamp(row, "updated_at")?))
}

fn action_from_row(row: &SqliteRow) -> Result<Action, RepoError> {
    let id = Uuid::parse_str(&column::<String>(row, "id")?).map_err(RepoError::serialization)?;
    let token = SessionToken::parse(column::<String>(row, "session_token")?)
        .map_err(RepoError::serialization)?;
    let dice_type: DiceType = column::<String>(row, "dice_type")?
        .parse()
        .map_err(RepoError::serialization)?;
    let roll = DiceRoll::new(dice_type, column(row, "dice_result")?)
        .map_err(RepoError::serialization)?;
    let description = ActionDescription::new(column::<String>(row, "action_description")?)
        .map_err(RepoError::serialization)?;

    Action::new(
        ActionId::from_uuid(id),
        token,
        order(row, "action_order")?,
        roll,
        description,
        column::<String>(row, "narration")?,
        timestamp(row, "created_at")?,
    )
    .map_err(RepoError::serialization)
}
