use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::models::question::Question;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRef {
    pub question_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnswer {
    pub question_id: Uuid,
    pub answer: String,
}

/// A quiz as it is stored: question references are bare ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    pub topic: String,
    pub course: String,
    pub questions: Vec<QuestionRef>,
    pub student_answers: Vec<StudentAnswer>,
    pub completed: bool,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    pub fn question_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.questions.iter().map(|q| q.question_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HydratedQuestionRef {
    pub question_id: Option<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HydratedAnswer {
    pub question_id: Option<Question>,
    pub answer: String,
}

/// A quiz with every question reference replaced by the referenced question,
/// or `null` when that question has since been deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HydratedQuiz {
    pub id: Uuid,
    pub title: String,
    pub topic: String,
    pub course: String,
    pub questions: Vec<HydratedQuestionRef>,
    pub student_answers: Vec<HydratedAnswer>,
    pub completed: bool,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Question reference as it arrives on the wire, before id validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRefInput {
    pub question_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Create {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionRefInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_answers: Option<Vec<AnswerInput>>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub title: String,
    pub topic: String,
    pub course: String,
    pub question_ids: Vec<Uuid>,
    pub student_answers: Vec<StudentAnswer>,
}

/// Body of `PUT /api/quiz/{id}`. A provided list replaces the stored one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionRefInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_answers: Option<Vec<AnswerInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

/// A validated [`Patch`], ready for the store.
#[derive(Debug, Clone, Default)]
pub struct Update {
    pub title: Option<String>,
    pub topic: Option<String>,
    pub course: Option<String>,
    pub question_ids: Option<Vec<Uuid>>,
    pub student_answers: Option<Vec<StudentAnswer>>,
    pub hidden: Option<bool>,
}

/// Body of `POST /api/quiz/{id}/submit`. The answers stay untyped until the
/// quiz has been found, so a missing quiz wins over a malformed body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_answers: Option<serde_json::Value>,
}
