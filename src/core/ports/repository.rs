use crate::core::models::{
    announcement::{Announcement, Insert as AnnouncementInsert, Patch as AnnouncementPatch},
    question::{Insert as QuestionInsert, Patch as QuestionPatch, Question},
    quiz::{Insert as QuizInsert, Quiz, StudentAnswer, Update as QuizUpdate},
};
use crate::error::Error;
use uuid::Uuid;

pub trait QuestionCommon {
    async fn insert(&mut self, question: QuestionInsert) -> Result<Question, Error>;
    async fn query(&mut self) -> Result<Vec<Question>, Error>;
    async fn get(&mut self, id: Uuid) -> Result<Option<Question>, Error>;
    /// Fetches every question whose id is in `ids`. Unknown ids are skipped and
    /// the result carries each question once, in no particular order.
    async fn get_many(&mut self, ids: &[Uuid]) -> Result<Vec<Question>, Error>;
    async fn update(&mut self, id: Uuid, patch: QuestionPatch) -> Result<Option<Question>, Error>;
    async fn delete(&mut self, id: Uuid) -> Result<bool, Error>;
}

pub trait QuizCommon {
    async fn insert(&mut self, quiz: QuizInsert) -> Result<Quiz, Error>;
    async fn query(&mut self) -> Result<Vec<Quiz>, Error>;
    async fn get(&mut self, id: Uuid) -> Result<Option<Quiz>, Error>;
    /// Picks at most `size` distinct quizzes at random among those not hidden.
    async fn sample(&mut self, size: i64) -> Result<Vec<Quiz>, Error>;
    async fn update(&mut self, id: Uuid, update: QuizUpdate) -> Result<Option<Quiz>, Error>;
    /// Appends `answers` and marks the quiz completed in a single write.
    async fn append_answers(&mut self, id: Uuid, answers: Vec<StudentAnswer>) -> Result<Option<Quiz>, Error>;
    async fn delete(&mut self, id: Uuid) -> Result<bool, Error>;
}

pub trait AnnouncementCommon {
    async fn insert(&mut self, announcement: AnnouncementInsert) -> Result<Announcement, Error>;
    async fn query(&mut self) -> Result<Vec<Announcement>, Error>;
    async fn get(&mut self, id: Uuid) -> Result<Option<Announcement>, Error>;
    async fn update(&mut self, id: Uuid, patch: AnnouncementPatch) -> Result<Option<Announcement>, Error>;
    async fn delete(&mut self, id: Uuid) -> Result<bool, Error>;
}

pub trait Common: QuestionCommon + QuizCommon + AnnouncementCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

pub trait Manager: 'static {
    type Store: Store;
    type TxStore: TxStore;
    async fn db(&self) -> Result<Self::Store, Error>;
    async fn tx(&self) -> Result<Self::TxStore, Error>;
}
