use crate::core::models::{
    announcement::{Announcement, Insert as AnnouncementInsert, Patch as AnnouncementPatch},
    question::{Insert as QuestionInsert, Patch as QuestionPatch, Question},
    quiz::{Insert as QuizInsert, Quiz, StudentAnswer, Update as QuizUpdate},
};
use crate::core::ports::repository::{AnnouncementCommon, Common, Manager, QuestionCommon, QuizCommon, Store, TxStore};
use crate::database::models::quiz::QuizRow;
use crate::error::Error;
use sqlx::pool::PoolConnection;
use sqlx::types::Json;
use sqlx::{query, query_as, Executor, PgPool, Postgres, Transaction};
use uuid::Uuid;

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> QuestionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, question: QuestionInsert) -> Result<Question, Error> {
        let question = query_as(
            "INSERT INTO questions (id, question_text, options, correct_answer)
            VALUES ($1, $2, $3, $4)
            RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(question.question_text)
        .bind(question.options)
        .bind(question.correct_answer)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(question)
    }

    async fn query(&mut self) -> Result<Vec<Question>, Error> {
        let questions = query_as("SELECT * FROM questions ORDER BY seq").fetch_all(&mut self.executor).await?;
        Ok(questions)
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Question>, Error> {
        let question = query_as("SELECT * FROM questions WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(question)
    }

    async fn get_many(&mut self, ids: &[Uuid]) -> Result<Vec<Question>, Error> {
        let questions = query_as("SELECT * FROM questions WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_all(&mut self.executor)
            .await?;
        Ok(questions)
    }

    async fn update(&mut self, id: Uuid, patch: QuestionPatch) -> Result<Option<Question>, Error> {
        let question = query_as(
            "UPDATE questions SET
                question_text = COALESCE($2, question_text),
                options = COALESCE($3, options),
                correct_answer = COALESCE($4, correct_answer),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *",
        )
        .bind(id)
        .bind(patch.question_text)
        .bind(patch.options)
        .bind(patch.correct_answer)
        .fetch_optional(&mut self.executor)
        .await?;
        Ok(question)
    }

    async fn delete(&mut self, id: Uuid) -> Result<bool, Error> {
        let res = query("DELETE FROM questions WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected() > 0)
    }
}

impl<E> QuizCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, quiz: QuizInsert) -> Result<Quiz, Error> {
        let row: QuizRow = query_as(
            "INSERT INTO quizzes (id, title, topic, course, question_ids, student_answers)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(quiz.title)
        .bind(quiz.topic)
        .bind(quiz.course)
        .bind(quiz.question_ids)
        .bind(Json(quiz.student_answers))
        .fetch_one(&mut self.executor)
        .await?;
        Ok(row.into())
    }

    async fn query(&mut self) -> Result<Vec<Quiz>, Error> {
        let rows: Vec<QuizRow> = query_as("SELECT * FROM quizzes ORDER BY seq").fetch_all(&mut self.executor).await?;
        Ok(rows.into_iter().map(Quiz::from).collect())
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Quiz>, Error> {
        let row: Option<QuizRow> = query_as("SELECT * FROM quizzes WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(row.map(Quiz::from))
    }

    async fn sample(&mut self, size: i64) -> Result<Vec<Quiz>, Error> {
        let rows: Vec<QuizRow> = query_as("SELECT * FROM quizzes WHERE NOT hidden ORDER BY RANDOM() LIMIT $1")
            .bind(size)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(rows.into_iter().map(Quiz::from).collect())
    }

    async fn update(&mut self, id: Uuid, update: QuizUpdate) -> Result<Option<Quiz>, Error> {
        let row: Option<QuizRow> = query_as(
            "UPDATE quizzes SET
                title = COALESCE($2, title),
                topic = COALESCE($3, topic),
                course = COALESCE($4, course),
                question_ids = COALESCE($5, question_ids),
                student_answers = COALESCE($6, student_answers),
                hidden = COALESCE($7, hidden),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *",
        )
        .bind(id)
        .bind(update.title)
        .bind(update.topic)
        .bind(update.course)
        .bind(update.question_ids)
        .bind(update.student_answers.map(Json))
        .bind(update.hidden)
        .fetch_optional(&mut self.executor)
        .await?;
        Ok(row.map(Quiz::from))
    }

    async fn append_answers(&mut self, id: Uuid, answers: Vec<StudentAnswer>) -> Result<Option<Quiz>, Error> {
        let row: Option<QuizRow> = query_as(
            "UPDATE quizzes SET
                student_answers = student_answers || $2,
                completed = TRUE,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *",
        )
        .bind(id)
        .bind(Json(answers))
        .fetch_optional(&mut self.executor)
        .await?;
        Ok(row.map(Quiz::from))
    }

    async fn delete(&mut self, id: Uuid) -> Result<bool, Error> {
        let res = query("DELETE FROM quizzes WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected() > 0)
    }
}

impl<E> AnnouncementCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, announcement: AnnouncementInsert) -> Result<Announcement, Error> {
        let announcement = query_as(
            "INSERT INTO announcements (id, title, description, author)
            VALUES ($1, $2, $3, $4)
            RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(announcement.title)
        .bind(announcement.description)
        .bind(announcement.author)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(announcement)
    }

    async fn query(&mut self) -> Result<Vec<Announcement>, Error> {
        let announcements = query_as("SELECT * FROM announcements ORDER BY seq DESC").fetch_all(&mut self.executor).await?;
        Ok(announcements)
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Announcement>, Error> {
        let announcement = query_as("SELECT * FROM announcements WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(announcement)
    }

    async fn update(&mut self, id: Uuid, patch: AnnouncementPatch) -> Result<Option<Announcement>, Error> {
        let announcement = query_as(
            "UPDATE announcements SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                author = COALESCE($4, author),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *",
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.author)
        .fetch_optional(&mut self.executor)
        .await?;
        Ok(announcement)
    }

    async fn delete(&mut self, id: Uuid) -> Result<bool, Error> {
        let res = query("DELETE FROM announcements WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected() > 0)
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Common for PgSqlx<Transaction<'a, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Store for PgSqlx<Transaction<'a, Postgres>> {}

impl<'a> TxStore for PgSqlx<Transaction<'a, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

impl Manager for PgSqlxManager {
    type Store = PgSqlx<PoolConnection<Postgres>>;
    type TxStore = PgSqlx<Transaction<'static, Postgres>>;

    async fn db(&self) -> Result<Self::Store, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }
}
