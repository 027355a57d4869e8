use std::sync::{Mutex, MutexGuard};

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::client::cache::{QueryCache, Tag};
use crate::client::ClientError;
use crate::core::grading::{grade, latest_answers, Grade};
use crate::core::models::announcement::{Announcement, Create as AnnouncementCreate, Patch as AnnouncementPatch};
use crate::core::models::question::{Create as QuestionCreate, Patch as QuestionPatch, Question};
use crate::core::models::quiz::{Create as QuizCreate, HydratedQuiz, Patch as QuizPatch, Quiz, StudentAnswer, Submit as QuizSubmit};
use crate::error::ErrorBody;
use crate::response::{AnnouncementResponse, MessageResponse, QuizResponse};

/// Outcome of [`ApiClient::take_quiz`].
#[derive(Debug, Clone)]
pub enum Attempt {
    /// Every answer was right and the answers were submitted.
    Submitted { grade: Grade, quiz: Quiz },
    /// Some answer was wrong; nothing was sent.
    Rejected { grade: Grade },
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cache: Mutex<QueryCache>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            cache: Mutex::new(QueryCache::new()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn cache(&self) -> Result<MutexGuard<'_, QueryCache>, ClientError> {
        self.cache.lock().map_err(|_| ClientError::CacheError)
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }
        let body: Option<ErrorBody> = resp.json().await.ok();
        let message = body.as_ref().map(|b| b.message.clone()).unwrap_or_else(|| status.to_string());
        Err(ClientError::ApiError {
            status: status.as_u16(),
            message,
            body,
        })
    }

    async fn query<T>(&self, path: &str, tags: &[Tag]) -> Result<T, ClientError>
    where
        T: DeserializeOwned + Serialize,
    {
        let cached = self.cache()?.get::<T>(path);
        if let Some(value) = cached {
            return Ok(value);
        }
        let resp = self.http.get(self.url(path)).send().await?;
        let value: T = Self::decode(resp).await?;
        self.cache()?.insert(path, tags, &value);
        Ok(value)
    }

    async fn mutate<B, T>(&self, method: Method, path: &str, body: Option<&B>, tags: &[Tag]) -> Result<T, ClientError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let mut req = self.http.request(method, self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }
        let value = Self::decode(req.send().await?).await?;
        self.cache()?.invalidate(tags);
        Ok(value)
    }

    pub async fn questions(&self) -> Result<Vec<Question>, ClientError> {
        self.query("/question", &[Tag::Question]).await
    }

    pub async fn question(&self, id: Uuid) -> Result<Question, ClientError> {
        self.query(&format!("/question/{}", id), &[Tag::Question]).await
    }

    pub async fn create_question(&self, question: &QuestionCreate) -> Result<Question, ClientError> {
        self.mutate(Method::POST, "/question", Some(question), &[Tag::Question]).await
    }

    // Hydrated quizzes embed questions, so question writes also drop quiz entries.
    pub async fn update_question(&self, id: Uuid, patch: &QuestionPatch) -> Result<Question, ClientError> {
        self.mutate(Method::PUT, &format!("/question/{}", id), Some(patch), &[Tag::Question, Tag::Quiz]).await
    }

    pub async fn delete_question(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        self.mutate(Method::DELETE, &format!("/question/{}", id), None::<&()>, &[Tag::Question, Tag::Quiz]).await
    }

    pub async fn quizzes(&self) -> Result<Vec<HydratedQuiz>, ClientError> {
        self.query("/quiz", &[Tag::Quiz]).await
    }

    pub async fn quiz(&self, id: Uuid) -> Result<HydratedQuiz, ClientError> {
        self.query(&format!("/quiz/{}", id), &[Tag::Quiz]).await
    }

    pub async fn random_quizzes(&self) -> Result<Vec<HydratedQuiz>, ClientError> {
        self.query("/quiz/random", &[Tag::Quiz]).await
    }

    pub async fn create_quiz(&self, quiz: &QuizCreate) -> Result<QuizResponse, ClientError> {
        self.mutate(Method::POST, "/quiz", Some(quiz), &[Tag::Quiz]).await
    }

    pub async fn update_quiz(&self, id: Uuid, patch: &QuizPatch) -> Result<QuizResponse, ClientError> {
        self.mutate(Method::PUT, &format!("/quiz/{}", id), Some(patch), &[Tag::Quiz]).await
    }

    pub async fn delete_quiz(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        self.mutate(Method::DELETE, &format!("/quiz/{}", id), None::<&()>, &[Tag::Quiz]).await
    }

    pub async fn submit_answers(&self, id: Uuid, answers: &[StudentAnswer]) -> Result<QuizResponse, ClientError> {
        let body = QuizSubmit {
            student_answers: Some(json!(answers)),
        };
        self.mutate(Method::POST, &format!("/quiz/{}/submit", id), Some(&body), &[Tag::Quiz]).await
    }

    /// Grades `answers` locally and, only if every question of the quiz is
    /// answered correctly, submits the graded answers: one per question,
    /// the last given.
    pub async fn take_quiz(&self, id: Uuid, answers: &[StudentAnswer]) -> Result<Attempt, ClientError> {
        let quiz = self.quiz(id).await?;
        let grade = grade(&quiz, answers);
        if !grade.is_complete() {
            return Err(ClientError::IncompleteError {
                answered: grade.answered,
                total: grade.total,
            });
        }
        if !grade.all_correct {
            return Ok(Attempt::Rejected { grade });
        }
        let resp = self.submit_answers(id, &latest_answers(&quiz, answers)).await?;
        Ok(Attempt::Submitted { grade, quiz: resp.quiz })
    }

    pub async fn announcements(&self) -> Result<Vec<Announcement>, ClientError> {
        self.query("/announcement", &[Tag::Announcement]).await
    }

    pub async fn announcement(&self, id: Uuid) -> Result<Announcement, ClientError> {
        self.query(&format!("/announcement/{}", id), &[Tag::Announcement]).await
    }

    pub async fn create_announcement(&self, announcement: &AnnouncementCreate) -> Result<AnnouncementResponse, ClientError> {
        self.mutate(Method::POST, "/announcement", Some(announcement), &[Tag::Announcement]).await
    }

    pub async fn update_announcement(&self, id: Uuid, patch: &AnnouncementPatch) -> Result<MessageResponse, ClientError> {
        self.mutate(Method::PUT, &format!("/announcement/{}", id), Some(patch), &[Tag::Announcement]).await
    }

    pub async fn delete_announcement(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        self.mutate(Method::DELETE, &format!("/announcement/{}", id), None::<&()>, &[Tag::Announcement]).await
    }
}
