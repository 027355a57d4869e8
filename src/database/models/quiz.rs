use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::models::quiz::{QuestionRef, Quiz, StudentAnswer};

/// Row of the `quizzes` table. Answers live in a JSONB array so a submission
/// is a single-row append.
#[derive(Debug, FromRow)]
pub struct QuizRow {
    pub id: Uuid,
    pub title: String,
    pub topic: String,
    pub course: String,
    pub question_ids: Vec<Uuid>,
    pub student_answers: Json<Vec<StudentAnswer>>,
    pub completed: bool,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<QuizRow> for Quiz {
    fn from(row: QuizRow) -> Self {
        Quiz {
            id: row.id,
            title: row.title,
            topic: row.topic,
            course: row.course,
            questions: row.question_ids.into_iter().map(|question_id| QuestionRef { question_id }).collect(),
            student_answers: row.student_answers.0,
            completed: row.completed,
            hidden: row.hidden,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
