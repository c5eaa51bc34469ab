//! SQLite-backed character store.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use ascendant_domain::{
    AdvancementOption, Character, CharacterId, CharacterLevel, CharacterLevelId, CharacterName,
    CharacterProgress, Experience, ExperienceDescription, ExperienceId, Level, MarkedTraits,
    SelectedCard, SelectedCardId,
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool, Transaction};
use tempfile::TempDir;
use uuid::Uuid;

use crate::infrastructure::locks::{CharacterLockGuard, CharacterLocks};
use crate::infrastructure::ports::{CharacterStore, CharacterUnitOfWork, RepoError};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        class_name TEXT NOT NULL,
        level INTEGER NOT NULL CHECK (level BETWEEN 1 AND 10),
        max_hp INTEGER NOT NULL,
        marked_traits TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_levels (
        id TEXT PRIMARY KEY,
        character_id TEXT NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
        level INTEGER NOT NULL CHECK (level BETWEEN 2 AND 10),
        created_at TEXT NOT NULL,
        UNIQUE (character_id, level)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS level_choices (
        character_level_id TEXT NOT NULL REFERENCES character_levels(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        option TEXT NOT NULL,
        PRIMARY KEY (character_level_id, position)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS selected_cards (
        id TEXT PRIMARY KEY,
        character_id TEXT NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
        card_name TEXT NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE (character_id, card_name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS experiences (
        id TEXT PRIMARY KEY,
        character_id TEXT NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
        description TEXT NOT NULL,
        modifier INTEGER NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_experiences_order
    ON experiences(character_id, created_at)
    "#,
];

const MAX_CONNECTIONS: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite implementation of the character store.
///
/// File databases run in WAL mode, so reads never wait for a writer. A unit
/// of work reads its snapshot outside any transaction under the character
/// lock. It opens its `BEGIN IMMEDIATE` transaction only at the first write,
/// so an open unit of work that has not written yet holds no database lock.
pub struct SqliteCharacterStore {
    pool: SqlitePool,
    locks: Arc<CharacterLocks>,
    /// Backing directory of a temporary store, deleted with it
    _scratch: Option<TempDir>,
}

impl SqliteCharacterStore {
    /// Connect to `database_url` (e.g. `sqlite:ascendant.db`), creating the
    /// file and tables if missing.
    pub async fn connect(database_url: &str) -> Result<Self, RepoError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RepoError::database("connect", e))?;
        Self::open(options, None).await
    }

    /// Private database in a temporary directory, removed when the store is
    /// dropped. For tests and throwaway runs.
    pub async fn temporary() -> Result<Self, RepoError> {
        let dir = TempDir::new().map_err(|e| RepoError::database("connect", e))?;
        let options = SqliteConnectOptions::new().filename(dir.path().join("characters.db"));
        Self::open(options, Some(dir)).await
    }

    async fn open(
        options: SqliteConnectOptions,
        scratch: Option<TempDir>,
    ) -> Result<Self, RepoError> {
        let options = options
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        // One connection is always kept so `sqlite::memory:` databases stay alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        let mut store = Self::with_pool(pool).await?;
        store._scratch = scratch;
        Ok(store)
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Self, RepoError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| RepoError::database("create_schema", e))?;
        }

        Ok(Self {
            pool,
            locks: Arc::new(CharacterLocks::new()),
            _scratch: None,
        })
    }
}

#[async_trait]
impl CharacterStore for SqliteCharacterStore {
    async fn load(&self, id: CharacterId) -> Result<Option<CharacterProgress>, RepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("load", e))?;
        fetch_progress(&mut conn, id).await
    }

    async fn begin(
        &self,
        id: CharacterId,
    ) -> Result<Option<Box<dyn CharacterUnitOfWork>>, RepoError> {
        // Every writer of this character holds the lock, so reading without a
        // transaction still gives a consistent snapshot.
        let guard = self.locks.acquire(id).await;
        let snapshot = {
            let mut conn = self
                .pool
                .acquire()
                .await
                .map_err(|e| RepoError::database("begin", e))?;
            fetch_progress(&mut conn, id).await?
        };
        let Some(snapshot) = snapshot else {
            return Ok(None);
        };

        Ok(Some(Box::new(SqliteUnitOfWork {
            tx: None,
            pool: self.pool.clone(),
            character_id: id,
            snapshot,
            _guard: guard,
        })))
    }

    async fn create(&self, progress: &CharacterProgress) -> Result<(), RepoError> {
        let character = progress.character();
        let _guard = self.locks.acquire(character.id()).await;
        let mut tx = begin_write(&self.pool, "create").await?;

        sqlx::query(
            r#"
            INSERT INTO characters
                (id, name, class_name, level, max_hp, marked_traits, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(character.id().to_string())
        .bind(character.name().as_str())
        .bind(character.class_name())
        .bind(i64::from(character.level().get()))
        .bind(i64::from(character.max_hp()))
        .bind(encode_traits(character.marked_traits())?)
        .bind(timestamp(character.created_at()))
        .bind(timestamp(character.updated_at()))
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error("create", e))?;

        for level in progress.levels() {
            insert_level(&mut tx, level).await?;
        }
        for card in progress.cards() {
            insert_card(&mut tx, card).await?;
        }
        for experience in progress.experiences() {
            insert_experience(&mut tx, experience).await?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("create", e))
    }
}

/// Unit of work over one lazily opened SQLite transaction.
///
/// Field order matters: the transaction rolls back on drop before the
/// character lock is released.
struct SqliteUnitOfWork {
    tx: Option<Transaction<'static, Sqlite>>,
    pool: SqlitePool,
    character_id: CharacterId,
    snapshot: CharacterProgress,
    _guard: CharacterLockGuard,
}

impl SqliteUnitOfWork {
    /// The write transaction, opened on first use.
    async fn writer(
        &mut self,
        operation: &'static str,
    ) -> Result<&mut SqliteConnection, RepoError> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => begin_write(&self.pool, operation).await?,
        };
        Ok(&mut **self.tx.insert(tx))
    }
}

#[async_trait]
impl CharacterUnitOfWork for SqliteUnitOfWork {
    fn snapshot(&self) -> &CharacterProgress {
        &self.snapshot
    }

    async fn save_character(&mut self, character: &Character) -> Result<(), RepoError> {
        if character.id() != self.character_id {
            return Err(RepoError::constraint("unit of work is bound to another character"));
        }

        let conn = self.writer("save_character").await?;
        sqlx::query(
            r#"
            UPDATE characters
            SET name = ?, class_name = ?, level = ?, max_hp = ?, marked_traits = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(character.name().as_str())
        .bind(character.class_name())
        .bind(i64::from(character.level().get()))
        .bind(i64::from(character.max_hp()))
        .bind(encode_traits(character.marked_traits())?)
        .bind(timestamp(character.updated_at()))
        .bind(character.id().to_string())
        .execute(&mut *conn)
        .await
        .map_err(|e| write_error("save_character", e))?;
        Ok(())
    }

    async fn insert_level(&mut self, level: &CharacterLevel) -> Result<(), RepoError> {
        insert_level(self.writer("insert_level").await?, level).await
    }

    async fn delete_levels_above(&mut self, cap: Level) -> Result<u64, RepoError> {
        let key = self.character_id.to_string();
        let conn = self.writer("delete_levels_above").await?;
        let result =
            sqlx::query("DELETE FROM character_levels WHERE character_id = ? AND level > ?")
                .bind(key)
                .bind(i64::from(cap.get()))
                .execute(&mut *conn)
                .await
                .map_err(|e| RepoError::database("delete_levels_above", e))?;
        Ok(result.rows_affected())
    }

    async fn insert_card(&mut self, card: &SelectedCard) -> Result<(), RepoError> {
        insert_card(self.writer("insert_card").await?, card).await
    }

    async fn delete_card(&mut self, card_name: &str) -> Result<bool, RepoError> {
        let key = self.character_id.to_string();
        let conn = self.writer("delete_card").await?;
        let result =
            sqlx::query("DELETE FROM selected_cards WHERE character_id = ? AND card_name = ?")
                .bind(key)
                .bind(card_name)
                .execute(&mut *conn)
                .await
                .map_err(|e| RepoError::database("delete_card", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_cards(&mut self) -> Result<u64, RepoError> {
        let key = self.character_id.to_string();
        let conn = self.writer("delete_all_cards").await?;
        let result = sqlx::query("DELETE FROM selected_cards WHERE character_id = ?")
            .bind(key)
            .execute(&mut *conn)
            .await
            .map_err(|e| RepoError::database("delete_all_cards", e))?;
        Ok(result.rows_affected())
    }

    async fn insert_experience(&mut self, experience: &Experience) -> Result<(), RepoError> {
        insert_experience(self.writer("insert_experience").await?, experience).await
    }

    async fn retain_first_experiences(&mut self, keep: usize) -> Result<u64, RepoError> {
        let keep = i64::try_from(keep).unwrap_or(i64::MAX);
        let key = self.character_id.to_string();
        let conn = self.writer("retain_first_experiences").await?;
        let result = sqlx::query(
            r#"
            DELETE FROM experiences
            WHERE character_id = ?
            AND id NOT IN (
                SELECT id FROM experiences
                WHERE character_id = ?
                ORDER BY created_at ASC, rowid ASC
                LIMIT ?
            )
            "#,
        )
        .bind(&key)
        .bind(&key)
        .bind(keep)
        .execute(&mut *conn)
        .await
        .map_err(|e| RepoError::database("retain_first_experiences", e))?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let Some(tx) = self.tx else {
            return Ok(());
        };
        tx.commit()
            .await
            .map_err(|e| RepoError::database("commit", e))
    }
}

/// Start a transaction that takes the write lock up front.
async fn begin_write(
    pool: &SqlitePool,
    operation: &'static str,
) -> Result<Transaction<'static, Sqlite>, RepoError> {
    pool.begin_with("BEGIN IMMEDIATE")
        .await
        .map_err(|e| RepoError::database(operation, e))
}

// =============================================================================
// Shared writes
// =============================================================================

async fn insert_level(
    conn: &mut SqliteConnection,
    level: &CharacterLevel,
) -> Result<(), RepoError> {
    sqlx::query(
        "INSERT INTO character_levels (id, character_id, level, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(level.id().to_string())
    .bind(level.character_id().to_string())
    .bind(i64::from(level.level().get()))
    .bind(timestamp(level.created_at()))
    .execute(&mut *conn)
    .await
    .map_err(|e| write_error("insert_level", e))?;

    for (position, option) in level.choices().iter().enumerate() {
        sqlx::query(
            "INSERT INTO level_choices (character_level_id, position, option) VALUES (?, ?, ?)",
        )
        .bind(level.id().to_string())
        .bind(position as i64)
        .bind(option.as_str())
        .execute(&mut *conn)
        .await
        .map_err(|e| write_error("insert_level", e))?;
    }
    Ok(())
}

async fn insert_card(conn: &mut SqliteConnection, card: &SelectedCard) -> Result<(), RepoError> {
    sqlx::query(
        "INSERT INTO selected_cards (id, character_id, card_name, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(card.id.to_string())
    .bind(card.character_id.to_string())
    .bind(&card.card_name)
    .bind(timestamp(card.created_at))
    .execute(&mut *conn)
    .await
    .map_err(|e| write_error("insert_card", e))?;
    Ok(())
}

async fn insert_experience(
    conn: &mut SqliteConnection,
    experience: &Experience,
) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        INSERT INTO experiences (id, character_id, description, modifier, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(experience.id.to_string())
    .bind(experience.character_id.to_string())
    .bind(experience.description.as_str())
    .bind(i64::from(experience.modifier))
    .bind(timestamp(experience.created_at))
    .execute(&mut *conn)
    .await
    .map_err(|e| write_error("insert_experience", e))?;
    Ok(())
}

/// Unique and foreign key failures become `ConstraintViolation`.
fn write_error(operation: &'static str, e: sqlx::Error) -> RepoError {
    match &e {
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.is_foreign_key_violation() =>
        {
            RepoError::constraint(format!("{operation}: {db}"))
        }
        _ => RepoError::database(operation, e),
    }
}

// =============================================================================
// Reads
// =============================================================================

async fn fetch_progress(
    conn: &mut SqliteConnection,
    id: CharacterId,
) -> Result<Option<CharacterProgress>, RepoError> {
    let key = id.to_string();

    let row = sqlx::query("SELECT * FROM characters WHERE id = ?")
        .bind(&key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| RepoError::database("load_character", e))?;
    let Some(row) = row else {
        return Ok(None);
    };
    let character = row_to_character(&row)?;

    let level_rows = sqlx::query(
        r#"
        SELECT l.id, l.character_id, l.level, l.created_at, c.position, c.option
        FROM character_levels l
        JOIN level_choices c ON c.character_level_id = l.id
        WHERE l.character_id = ?
        ORDER BY l.level ASC, c.position ASC
        "#,
    )
    .bind(&key)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| RepoError::database("load_levels", e))?;
    let levels = rows_to_levels(&level_rows)?;

    let cards = sqlx::query(
        "SELECT * FROM selected_cards WHERE character_id = ? ORDER BY created_at ASC, rowid ASC",
    )
    .bind(&key)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| RepoError::database("load_cards", e))?
    .iter()
    .map(row_to_card)
    .collect::<Result<Vec<_>, _>>()?;

    let experiences = sqlx::query(
        "SELECT * FROM experiences WHERE character_id = ? ORDER BY created_at ASC, rowid ASC",
    )
    .bind(&key)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| RepoError::database("load_experiences", e))?
    .iter()
    .map(row_to_experience)
    .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(CharacterProgress::new(
        character,
        levels,
        cards,
        experiences,
    )))
}

fn row_to_character(row: &SqliteRow) -> Result<Character, RepoError> {
    let name = CharacterName::new(column::<String>(row, "name")?)
        .map_err(RepoError::serialization)?;
    let marked_traits: MarkedTraits =
        serde_json::from_str(&column::<String>(row, "marked_traits")?)
            .map_err(RepoError::serialization)?;

    Ok(Character::from_storage(
        CharacterId::from_uuid(parse_uuid(&column::<String>(row, "id")?)?),
        name,
        column(row, "class_name")?,
        parse_level(column(row, "level")?)?,
        u8::try_from(column::<i64>(row, "max_hp")?).map_err(RepoError::serialization)?,
        marked_traits,
        parse_timestamp(&column::<String>(row, "created_at")?)?,
        parse_timestamp(&column::<String>(row, "updated_at")?)?,
    ))
}

/// Fold the joined (level, choice) rows back into one record per level.
fn rows_to_levels(rows: &[SqliteRow]) -> Result<Vec<CharacterLevel>, RepoError> {
    let mut levels = Vec::new();
    for pair in rows.chunks(2) {
        let [first, second] = pair else {
            return Err(RepoError::serialization("level record without two choices"));
        };
        let id: String = column(first, "id")?;
        if column::<String>(second, "id")? != id {
            return Err(RepoError::serialization(format!(
                "level {id} does not have exactly two choices"
            )));
        }

        let choices = [parse_option(first)?, parse_option(second)?];
        let level = CharacterLevel::from_storage(
            CharacterLevelId::from_uuid(parse_uuid(&id)?),
            CharacterId::from_uuid(parse_uuid(&column::<String>(first, "character_id")?)?),
            parse_level(column(first, "level")?)?,
            choices,
            parse_timestamp(&column::<String>(first, "created_at")?)?,
        )
        .map_err(RepoError::serialization)?;
        levels.push(level);
    }
    Ok(levels)
}

fn row_to_card(row: &SqliteRow) -> Result<SelectedCard, RepoError> {
    Ok(SelectedCard {
        id: SelectedCardId::from_uuid(parse_uuid(&column::<String>(row, "id")?)?),
        character_id: CharacterId::from_uuid(parse_uuid(&column::<String>(row, "character_id")?)?),
        card_name: column(row, "card_name")?,
        created_at: parse_timestamp(&column::<String>(row, "created_at")?)?,
    })
}

fn row_to_experience(row: &SqliteRow) -> Result<Experience, RepoError> {
    Ok(Experience {
        id: ExperienceId::from_uuid(parse_uuid(&column::<String>(row, "id")?)?),
        character_id: CharacterId::from_uuid(parse_uuid(&column::<String>(row, "character_id")?)?),
        description: ExperienceDescription::new(column::<String>(row, "description")?)
            .map_err(RepoError::serialization)?,
        modifier: i8::try_from(column::<i64>(row, "modifier")?)
            .map_err(RepoError::serialization)?,
        created_at: parse_timestamp(&column::<String>(row, "created_at")?)?,
    })
}

// =============================================================================
// Column helpers
// =============================================================================

fn column<T>(row: &SqliteRow, name: &str) -> Result<T, RepoError>
where
    T: for<'r> sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(name).map_err(RepoError::serialization)
}

fn parse_uuid(value: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(value).map_err(|e| RepoError::serialization(format!("Invalid UUID: {e}")))
}

fn parse_level(value: i64) -> Result<Level, RepoError> {
    let value = u8::try_from(value).map_err(RepoError::serialization)?;
    Level::new(value).map_err(RepoError::serialization)
}

fn parse_option(row: &SqliteRow) -> Result<AdvancementOption, RepoError> {
    AdvancementOption::from_str(&column::<String>(row, "option")?)
        .map_err(RepoError::serialization)
}

/// Fixed-width RFC 3339 so text ordering matches time ordering.
fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::serialization(format!("Invalid datetime: {e}")))
}

fn encode_traits(traits: &MarkedTraits) -> Result<String, RepoError> {
    serde_json::to_string(traits).map_err(RepoError::serialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascendant_domain::{AdvancementOption::*, CharacterClass};
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 18, minute, 0).unwrap()
    }

    fn seeded() -> CharacterProgress {
        let class = CharacterClass::new("Wizard", 5, 11);
        let mut character = Character::new(CharacterName::new("Odile").unwrap(), &class, at(0));
        character.set_level(Level::new(4).unwrap(), at(0));
        let id = character.id();
        let experiences = ["Scholar", "Cartographer"]
            .into_iter()
            .map(|text| Experience::new(id, ExperienceDescription::new(text).unwrap(), at(0)))
            .collect();
        CharacterProgress::fresh(character, experiences)
    }

    fn level_record(id: CharacterId, level: u8) -> CharacterLevel {
        CharacterLevel::new(
            id,
            Level::new(level).unwrap(),
            [HitPointSlot, DomainCard],
            at(level as u32),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn round_trips_a_character_with_history() {
        let store = SqliteCharacterStore::temporary().await.unwrap();
        let progress = seeded();
        let id = progress.character().id();
        store.create(&progress).await.unwrap();

        let mut uow = store.begin(id).await.unwrap().unwrap();
        uow.insert_level(&level_record(id, 2)).await.unwrap();
        uow.insert_card(&SelectedCard::new(id, "Book of Ava", at(3)))
            .await
            .unwrap();
        uow.insert_experience(&Experience::new(
            id,
            ExperienceDescription::new("Stargazer").unwrap(),
            at(2),
        ))
        .await
        .unwrap();
        uow.commit().await.unwrap();

        let loaded = store.load(id).await.unwrap().unwrap();
        assert_eq!(loaded.character(), progress.character());
        assert_eq!(loaded.levels().len(), 1);
        assert_eq!(loaded.levels()[0].choices(), &[HitPointSlot, DomainCard]);
        assert!(loaded.has_card("Book of Ava"));
        let descriptions: Vec<&str> = loaded
            .experiences()
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Scholar", "Cartographer", "Stargazer"]);
    }

    #[tokio::test]
    async fn uncommitted_writes_roll_back() {
        let store = SqliteCharacterStore::temporary().await.unwrap();
        let progress = seeded();
        let id = progress.character().id();
        store.create(&progress).await.unwrap();

        {
            let mut uow = store.begin(id).await.unwrap().unwrap();
            uow.insert_level(&level_record(id, 2)).await.unwrap();
            uow.retain_first_experiences(0).await.unwrap();
        }

        assert_eq!(store.load(id).await.unwrap().unwrap(), progress);
    }

    #[tokio::test]
    async fn duplicate_level_is_a_constraint_violation() {
        let store = SqliteCharacterStore::temporary().await.unwrap();
        let progress = seeded();
        let id = progress.character().id();
        store.create(&progress).await.unwrap();

        let mut uow = store.begin(id).await.unwrap().unwrap();
        uow.insert_level(&level_record(id, 2)).await.unwrap();
        let err = uow.insert_level(&level_record(id, 2)).await.unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn deletes_levels_cards_and_late_experiences() {
        let store = SqliteCharacterStore::temporary().await.unwrap();
        let progress = seeded();
        let id = progress.character().id();
        store.create(&progress).await.unwrap();

        let mut uow = store.begin(id).await.unwrap().unwrap();
        for level in 2..=4 {
            uow.insert_level(&level_record(id, level)).await.unwrap();
        }
        uow.insert_card(&SelectedCard::new(id, "Runic Ward", at(5)))
            .await
            .unwrap();
        uow.insert_experience(&Experience::new(
            id,
            ExperienceDescription::new("Navigator").unwrap(),
            at(6),
        ))
        .await
        .unwrap();

        assert_eq!(uow.delete_levels_above(Level::new(2).unwrap()).await.unwrap(), 2);
        assert!(uow.delete_card("Runic Ward").await.unwrap());
        assert!(!uow.delete_card("Runic Ward").await.unwrap());
        assert_eq!(uow.retain_first_experiences(2).await.unwrap(), 1);
        uow.commit().await.unwrap();

        let loaded = store.load(id).await.unwrap().unwrap();
        assert_eq!(loaded.levels().len(), 1);
        assert!(loaded.cards().is_empty());
        assert_eq!(loaded.experiences().len(), 2);
    }

    #[tokio::test]
    async fn file_database_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("characters.db").display());
        let progress = seeded();
        let id = progress.character().id();

        {
            let store = SqliteCharacterStore::connect(&url).await.unwrap();
            store.create(&progress).await.unwrap();
        }

        let store = SqliteCharacterStore::connect(&url).await.unwrap();
        assert_eq!(store.load(id).await.unwrap().unwrap(), progress);
    }

    #[tokio::test]
    async fn open_unit_of_work_does_not_block_other_characters() {
        let store = SqliteCharacterStore::temporary().await.unwrap();
        let first = seeded();
        let second = seeded();
        let (a, b) = (first.character().id(), second.character().id());
        store.create(&first).await.unwrap();
        store.create(&second).await.unwrap();

        let mut writing = store.begin(a).await.unwrap().unwrap();
        writing
            .insert_card(&SelectedCard::new(a, "Book of Ava", at(3)))
            .await
            .unwrap();

        let limit = Duration::from_secs(1);
        let other = tokio::time::timeout(limit, store.load(b)).await;
        assert_eq!(other.expect("load should not wait").unwrap().unwrap(), second);
        let uow = tokio::time::timeout(limit, store.begin(b))
            .await
            .expect("begin should not wait")
            .unwrap()
            .unwrap();
        drop(uow);

        let before_commit = store.load(a).await.unwrap().unwrap();
        assert!(before_commit.cards().is_empty());

        writing.commit().await.unwrap();
        assert!(store.load(a).await.unwrap().unwrap().has_card("Book of Ava"));
        assert!(store.locks.is_empty());
    }

    #[tokio::test]
    async fn read_only_unit_of_work_commits_without_writing() {
        let store = SqliteCharacterStore::temporary().await.unwrap();
        let progress = seeded();
        let id = progress.character().id();
        store.create(&progress).await.unwrap();

        let uow = store.begin(id).await.unwrap().unwrap();
        assert_eq!(uow.snapshot(), &progress);
        uow.commit().await.unwrap();

        assert!(store.begin(CharacterId::new()).await.unwrap().is_none());
        assert!(store.locks.is_empty());
    }

    #[test]
    fn timestamps_are_fixed_width() {
        let a = timestamp(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let b = timestamp(at(1) + chrono::Duration::nanoseconds(1_500));
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }
}
