use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgConnection, PgPool, Row};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::core::{slugify, unique_slug, validate_submission, MatchError, Snapshot};
use crate::models::{
    Answer, AnswerId, AnswerSubmission, AnswerValue, Category, CategoryId, Gender, Importance, LookFor,
    PossibleAnswer, Profile, ProfileId, Question, QuestionId, UpdateProfileRequest,
};
use crate::services::fixtures::Fixture;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Domain(#[from] MatchError),

    #[error("No free slug for {0} after {1} attempts")]
    SlugExhausted(String, usize),
}

/// Per-question answer counts used by the question listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerCounts {
    pub all: i64,
    pub male: i64,
    pub female: i64,
}

/// Inserts that lose a slug race retry with the next free suffix
const MAX_SLUG_ATTEMPTS: usize = 8;

const QUESTION_COLUMNS: &str = "id, category_id, question, submitted_by, is_active, slug";
const PROFILE_COLUMNS: &str = "id, user_id, is_public, gender, lookfor, dob";
const ANSWER_COLUMNS: &str =
    "id, question_id, profile_id, answered_at, user_answer, importance, is_public, description";

/// PostgreSQL-backed answer store
///
/// Owns the connection pool and the schema migrations. Reads either return
/// plain rows or a `Snapshot` holding everything one request needs.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    /// Row counts for categories, questions and profiles
    pub async fn counts(&self) -> Result<(i64, i64, i64), PostgresError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM categories) AS categories,
                (SELECT COUNT(*) FROM questions) AS questions,
                (SELECT COUNT(*) FROM profiles) AS profiles
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((row.get("categories"), row.get("questions"), row.get("profiles")))
    }

    // ---------------------------------------------------------------
    // Categories
    // ---------------------------------------------------------------

    /// All categories with the number of questions in each
    pub async fn list_categories(&self) -> Result<Vec<(Category, i64)>, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.title, COUNT(q.id) AS question_count
            FROM categories c
            LEFT JOIN questions q ON q.category_id = c.id
            GROUP BY c.id, c.title
            ORDER BY c.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                (
                    Category {
                        id: row.get("id"),
                        title: row.get("title"),
                    },
                    row.get("question_count"),
                )
            })
            .collect())
    }

    pub async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, PostgresError> {
        let row = sqlx::query("SELECT id, title FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Category {
            id: row.get("id"),
            title: row.get("title"),
        }))
    }

    // ---------------------------------------------------------------
    // Questions
    // ---------------------------------------------------------------

    pub async fn list_questions(&self) -> Result<Vec<Question>, PostgresError> {
        let sql = format!("SELECT {} FROM questions ORDER BY id", QUESTION_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(question_from_row).collect())
    }

    pub async fn list_questions_in_category(&self, category_id: CategoryId) -> Result<Vec<Question>, PostgresError> {
        let sql = format!(
            "SELECT {} FROM questions WHERE category_id = $1 ORDER BY id",
            QUESTION_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(category_id).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(question_from_row).collect())
    }

    pub async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, PostgresError> {
        let sql = format!("SELECT {} FROM questions WHERE id = $1", QUESTION_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(question_from_row))
    }

    /// Possible answers of the given questions, ordered by id
    pub async fn list_possible_answers(&self, question_ids: &[QuestionId]) -> Result<Vec<PossibleAnswer>, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT id, question_id, answer, value
            FROM possible_answers
            WHERE question_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(question_ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(possible_answer_from_row).collect()
    }

    /// Answer counts per question, split by the answering profile's gender
    pub async fn answer_counts(&self) -> Result<HashMap<QuestionId, AnswerCounts>, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT
                a.question_id,
                COUNT(*) AS all_count,
                COUNT(*) FILTER (WHERE p.gender = 'M') AS male_count,
                COUNT(*) FILTER (WHERE p.gender = 'F') AS female_count
            FROM answers a
            JOIN profiles p ON p.id = a.profile_id
            GROUP BY a.question_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                (
                    row.get("question_id"),
                    AnswerCounts {
                        all: row.get("all_count"),
                        male: row.get("male_count"),
                        female: row.get("female_count"),
                    },
                )
            })
            .collect())
    }

    /// Insert a question, deriving a slug that is not taken yet
    pub async fn insert_question(
        &self,
        text: &str,
        category_id: Option<CategoryId>,
        submitted_by: Option<ProfileId>,
        is_active: bool,
    ) -> Result<Question, PostgresError> {
        if let Some(category_id) = category_id {
            if self.get_category(category_id).await?.is_none() {
                return Err(MatchError::not_found("category", category_id).into());
            }
        }

        let mut conn = self.pool.acquire().await?;
        let question = insert_slugged(
            &mut *conn,
            NewQuestion {
                text,
                category_id,
                submitted_by,
                is_active,
                fixture_key: None,
            },
        )
        .await?;

        tracing::info!("Inserted question {} with slug {}", question.id, question.slug);
        Ok(question)
    }

    // ---------------------------------------------------------------
    // Profiles
    // ---------------------------------------------------------------

    pub async fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>, PostgresError> {
        let sql = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(profile_from_row))
    }

    pub async fn get_profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, PostgresError> {
        let sql = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);
        let row = sqlx::query(&sql).bind(user_id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(profile_from_row))
    }

    /// Fetch the user's profile, creating an empty one on first access
    ///
    /// Returns the profile and whether it was created.
    pub async fn get_or_create_profile(&self, user_id: Uuid) -> Result<(Profile, bool), PostgresError> {
        let sql = format!(
            r#"
            INSERT INTO profiles (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );
        if let Some(row) = sqlx::query(&sql).bind(user_id).fetch_optional(&self.pool).await? {
            tracing::info!("Created profile for user {}", user_id);
            return Ok((profile_from_row(&row), true));
        }

        let profile = self
            .get_profile_by_user(user_id)
            .await?
            .ok_or_else(|| MatchError::not_found("profile", user_id))?;
        Ok((profile, false))
    }

    /// Create or overwrite the user's profile attributes
    pub async fn update_profile(&self, user_id: Uuid, update: &UpdateProfileRequest) -> Result<Profile, PostgresError> {
        let sql = format!(
            r#"
            INSERT INTO profiles (user_id, is_public, gender, lookfor, dob)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id)
            DO UPDATE SET
                is_public = EXCLUDED.is_public,
                gender = EXCLUDED.gender,
                lookfor = EXCLUDED.lookfor,
                dob = EXCLUDED.dob
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(update.is_public)
            .bind(update.gender.code())
            .bind(update.lookfor.code())
            .bind(update.dob)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Updated profile for user {}", user_id);
        Ok(profile_from_row(&row))
    }

    /// Public profiles, one page at a time
    pub async fn list_public_profiles(&self, limit: i64, offset: i64) -> Result<Vec<Profile>, PostgresError> {
        let sql = format!(
            "SELECT {} FROM profiles WHERE is_public ORDER BY id LIMIT $1 OFFSET $2",
            PROFILE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(profile_from_row).collect())
    }

    pub async fn list_profiles(&self) -> Result<Vec<Profile>, PostgresError> {
        let sql = format!("SELECT {} FROM profiles ORDER BY id", PROFILE_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(profile_from_row).collect())
    }

    // ---------------------------------------------------------------
    // Answers
    // ---------------------------------------------------------------

    pub async fn get_answer(&self, id: AnswerId) -> Result<Option<Answer>, PostgresError> {
        let sql = format!("SELECT {} FROM answers WHERE id = $1", ANSWER_COLUMNS);
        let rows = sqlx::query(&sql).bind(id).fetch_all(&self.pool).await?;
        Ok(self.with_acceptable(rows).await?.pop())
    }

    pub async fn list_answers_for_question(&self, question_id: QuestionId) -> Result<Vec<Answer>, PostgresError> {
        let sql = format!(
            "SELECT {} FROM answers WHERE question_id = $1 ORDER BY id",
            ANSWER_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(question_id).fetch_all(&self.pool).await?;
        self.with_acceptable(rows).await
    }

    pub async fn list_answers_for_profile(
        &self,
        profile_id: ProfileId,
        public_only: bool,
    ) -> Result<Vec<Answer>, PostgresError> {
        let sql = format!(
            "SELECT {} FROM answers WHERE profile_id = $1 AND (is_public OR NOT $2) ORDER BY id",
            ANSWER_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(profile_id)
            .bind(public_only)
            .fetch_all(&self.pool)
            .await?;
        self.with_acceptable(rows).await
    }

    /// Attach acceptable answer sets to raw answer rows
    async fn with_acceptable(&self, rows: Vec<PgRow>) -> Result<Vec<Answer>, PostgresError> {
        let mut answers = rows
            .iter()
            .map(answer_from_row)
            .collect::<Result<Vec<Answer>, PostgresError>>()?;
        if answers.is_empty() {
            return Ok(answers);
        }

        let ids: Vec<AnswerId> = answers.iter().map(|a| a.id).collect();
        let links = sqlx::query(
            "SELECT answer_id, possible_answer_id FROM answer_acceptable WHERE answer_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut acceptable: HashMap<AnswerId, BTreeSet<i64>> = HashMap::new();
        for link in &links {
            acceptable
                .entry(link.get("answer_id"))
                .or_default()
                .insert(link.get("possible_answer_id"));
        }
        for answer in &mut answers {
            answer.acceptable_answers = acceptable.remove(&answer.id).unwrap_or_default();
        }
        Ok(answers)
    }

    /// Insert or update a profile's answer to a question
    ///
    /// Uses INSERT ... ON CONFLICT on (question_id, profile_id), so a
    /// resubmission updates the existing row. The acceptable set is rewritten
    /// in the same transaction. Returns the stored answer and whether it was
    /// newly created.
    pub async fn upsert_answer(&self, submission: &AnswerSubmission) -> Result<(Answer, bool), PostgresError> {
        if self.get_question(submission.question_id).await?.is_none() {
            return Err(MatchError::not_found("question", submission.question_id).into());
        }
        let options = self.list_possible_answers(&[submission.question_id]).await?;
        validate_submission(&options, submission)?;

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO answers (question_id, profile_id, answered_at, user_answer, importance, is_public, description)
            VALUES ($1, $2, NOW(), $3, $4, $5, $6)
            ON CONFLICT (question_id, profile_id)
            DO UPDATE SET
                answered_at = EXCLUDED.answered_at,
                user_answer = EXCLUDED.user_answer,
                importance = EXCLUDED.importance,
                is_public = EXCLUDED.is_public,
                description = EXCLUDED.description
            RETURNING {}, (xmax = 0) AS inserted
            "#,
            ANSWER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(submission.question_id)
            .bind(submission.profile_id)
            .bind(submission.user_answer)
            .bind(i16::from(submission.importance))
            .bind(submission.is_public)
            .bind(&submission.description)
            .fetch_one(&mut *tx)
            .await?;
        let created: bool = row.get("inserted");
        let mut answer = answer_from_row(&row)?;

        sqlx::query("DELETE FROM answer_acceptable WHERE answer_id = $1")
            .bind(answer.id)
            .execute(&mut *tx)
            .await?;

        let acceptable: Vec<i64> = submission.acceptable_answers.iter().copied().collect();
        if !acceptable.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO answer_acceptable (answer_id, possible_answer_id)
                SELECT $1, UNNEST($2::BIGINT[])
                "#,
            )
            .bind(answer.id)
            .bind(&acceptable)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        answer.acceptable_answers = submission.acceptable_answers.clone();

        tracing::debug!(
            "Upserted answer {} (question {}, profile {}, created: {})",
            answer.id,
            answer.question_id,
            answer.profile_id,
            created
        );

        Ok((answer, created))
    }

    // ---------------------------------------------------------------
    // Snapshots
    // ---------------------------------------------------------------

    /// Everything needed to compute statistics for one question
    ///
    /// `viewer`, when given, is added so per-profile quotes can be computed
    /// even if the viewer has not answered. An unknown question yields an
    /// empty snapshot.
    pub async fn question_snapshot(
        &self,
        question_id: QuestionId,
        viewer: Option<&Profile>,
    ) -> Result<Snapshot, PostgresError> {
        let mut snapshot = Snapshot::new();
        if let Some(profile) = viewer {
            snapshot.put_profile(profile.clone());
        }
        let Some(question) = self.get_question(question_id).await? else {
            return Ok(snapshot);
        };
        snapshot.put_question(question);

        for option in self.list_possible_answers(&[question_id]).await? {
            snapshot.put_possible_answer(option);
        }

        let sql = format!(
            r#"
            SELECT {}
            FROM profiles
            WHERE id IN (SELECT profile_id FROM answers WHERE question_id = $1)
            "#,
            PROFILE_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(question_id).fetch_all(&self.pool).await?;
        for row in &rows {
            snapshot.put_profile(profile_from_row(row));
        }

        for answer in self.list_answers_for_question(question_id).await? {
            snapshot.put_answer(answer)?;
        }

        Ok(snapshot)
    }

    /// The viewer's answers together with every active question
    pub async fn profile_snapshot(&self, profile: &Profile) -> Result<Snapshot, PostgresError> {
        let mut snapshot = Snapshot::new();
        snapshot.put_profile(profile.clone());

        let sql = format!("SELECT {} FROM questions WHERE is_active ORDER BY id", QUESTION_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        for row in &rows {
            snapshot.put_question(question_from_row(row));
        }

        for answer in self.list_answers_for_profile(profile.id, false).await? {
            snapshot.put_answer(answer)?;
        }

        Ok(snapshot)
    }

    /// Both profiles' answers and the questions they refer to
    ///
    /// Private answers of the other profile are left out unless the viewer
    /// compares against itself. An unknown other profile is simply absent.
    pub async fn compare_snapshot(&self, viewer: &Profile, other_id: ProfileId) -> Result<Snapshot, PostgresError> {
        let mut snapshot = Snapshot::new();
        snapshot.put_profile(viewer.clone());

        let Some(other) = self.get_profile(other_id).await? else {
            return Ok(snapshot);
        };
        snapshot.put_profile(other);

        let mut answers = self.list_answers_for_profile(viewer.id, false).await?;
        if other_id != viewer.id {
            answers.extend(self.list_answers_for_profile(other_id, true).await?);
        }

        let question_ids: Vec<QuestionId> = answers
            .iter()
            .map(|a| a.question_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let sql = format!(
            "SELECT {} FROM questions WHERE id = ANY($1) ORDER BY id",
            QUESTION_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(&question_ids).fetch_all(&self.pool).await?;
        for row in &rows {
            snapshot.put_question(question_from_row(row));
        }

        for answer in answers {
            snapshot.put_answer(answer)?;
        }

        Ok(snapshot)
    }

    // ---------------------------------------------------------------
    // Seed data
    // ---------------------------------------------------------------

    /// Import categories, questions and possible answers from a fixture
    ///
    /// Idempotent: categories are matched by title, questions by their
    /// fixture text (`fixture_key`) and possible answers by label. New
    /// questions get a free slug like any other insert, so submitted
    /// questions with the same text are left alone. Returns the number of
    /// questions inserted.
    pub async fn import_fixture(&self, fixture: &Fixture) -> Result<usize, PostgresError> {
        let mut inserted = 0usize;
        let mut tx = self.pool.begin().await?;

        for category in &fixture.categories {
            let row = sqlx::query(
                r#"
                INSERT INTO categories (title)
                VALUES ($1)
                ON CONFLICT (title) DO UPDATE SET title = EXCLUDED.title
                RETURNING id
                "#,
            )
            .bind(&category.title)
            .fetch_one(&mut *tx)
            .await?;
            let category_id: CategoryId = row.get("id");

            for question in &category.questions {
                let key = question.question.trim();
                let existing = sqlx::query("SELECT id FROM questions WHERE fixture_key = $1")
                    .bind(key)
                    .fetch_optional(&mut *tx)
                    .await?;

                let question_id: QuestionId = match existing {
                    Some(row) => row.get("id"),
                    None => {
                        inserted += 1;
                        insert_slugged(
                            &mut *tx,
                            NewQuestion {
                                text: key,
                                category_id: Some(category_id),
                                submitted_by: None,
                                is_active: question.active,
                                fixture_key: Some(key),
                            },
                        )
                        .await?
                        .id
                    }
                };

                for option in &question.answers {
                    sqlx::query(
                        r#"
                        INSERT INTO possible_answers (question_id, answer, value)
                        VALUES ($1, $2, $3)
                        ON CONFLICT (question_id, answer) DO NOTHING
                        "#,
                    )
                    .bind(question_id)
                    .bind(&option.answer)
                    .bind(i16::from(option.value))
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        tracing::info!(
            "Imported fixture: {} categories, {} new questions",
            fixture.categories.len(),
            inserted
        );
        Ok(inserted)
    }
}

struct NewQuestion<'a> {
    text: &'a str,
    category_id: Option<CategoryId>,
    submitted_by: Option<ProfileId>,
    is_active: bool,
    fixture_key: Option<&'a str>,
}

/// Insert a question under the first free slug derived from its text
///
/// The slug is claimed with `ON CONFLICT (slug) DO NOTHING`. When a
/// concurrent insert takes it first, the free slug is looked up again.
async fn insert_slugged(conn: &mut PgConnection, new: NewQuestion<'_>) -> Result<Question, PostgresError> {
    let text = new.text.trim();
    if text.is_empty() {
        return Err(MatchError::InvalidInput("question text is empty".to_string()).into());
    }

    let base = slugify(text);
    let sql = format!(
        r#"
        INSERT INTO questions (category_id, question, submitted_by, is_active, slug, fixture_key)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (slug) DO NOTHING
        RETURNING {}
        "#,
        QUESTION_COLUMNS
    );

    for attempt in 1..=MAX_SLUG_ATTEMPTS {
        let slug = free_slug(&mut *conn, &base).await?;
        let row = sqlx::query(&sql)
            .bind(new.category_id)
            .bind(text)
            .bind(new.submitted_by)
            .bind(new.is_active)
            .bind(&slug)
            .bind(new.fixture_key)
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => return Ok(question_from_row(&row)),
            None => tracing::debug!("Slug {} taken concurrently (attempt {})", slug, attempt),
        }
    }

    Err(PostgresError::SlugExhausted(base, MAX_SLUG_ATTEMPTS))
}

async fn free_slug(conn: &mut PgConnection, base: &str) -> Result<String, PostgresError> {
    let rows = sqlx::query("SELECT slug FROM questions WHERE slug = $1 OR slug LIKE $2")
        .bind(base)
        .bind(format!("{}-%", base))
        .fetch_all(&mut *conn)
        .await?;
    let taken: HashSet<String> = rows.iter().map(|row| row.get("slug")).collect();
    Ok(unique_slug(base, |candidate| taken.contains(candidate)))
}

fn question_from_row(row: &PgRow) -> Question {
    Question {
        id: row.get("id"),
        category_id: row.get("category_id"),
        question: row.get("question"),
        submitted_by: row.get("submitted_by"),
        is_active: row.get("is_active"),
        slug: row.get("slug"),
    }
}

fn possible_answer_from_row(row: &PgRow) -> Result<PossibleAnswer, PostgresError> {
    Ok(PossibleAnswer {
        id: row.get("id"),
        question_id: row.get("question_id"),
        answer: row.get("answer"),
        value: AnswerValue::try_from(row.get::<i16, _>("value"))?,
    })
}

fn profile_from_row(row: &PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        user_id: row.get("user_id"),
        is_public: row.get("is_public"),
        gender: Gender::from_code(row.get::<&str, _>("gender")),
        lookfor: LookFor::from_code(row.get::<&str, _>("lookfor")),
        dob: row.get("dob"),
    }
}

/// Acceptable sets are filled in separately
fn answer_from_row(row: &PgRow) -> Result<Answer, PostgresError> {
    Ok(Answer {
        id: row.get("id"),
        question_id: row.get("question_id"),
        profile_id: row.get("profile_id"),
        when: row.get("answered_at"),
        user_answer: row.get("user_answer"),
        acceptable_answers: BTreeSet::new(),
        importance: Importance::try_from(row.get::<i16, _>("importance"))?,
        is_public: row.get("is_public"),
        description: row.get("description"),
    })
}
