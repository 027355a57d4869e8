use std::sync::{Arc, Mutex};

use chrono::Utc;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::core::models::{
    announcement::{Announcement, Insert as AnnouncementInsert, Patch as AnnouncementPatch},
    question::{Insert as QuestionInsert, Patch as QuestionPatch, Question},
    quiz::{Insert as QuizInsert, QuestionRef, Quiz, StudentAnswer, Update as QuizUpdate},
};
use crate::core::ports::repository::{AnnouncementCommon, Common, Manager, QuestionCommon, QuizCommon, Store, TxStore};
use crate::error::Error;

#[derive(Debug, Clone, Default)]
struct State {
    questions: Vec<Question>,
    quizzes: Vec<Quiz>,
    announcements: Vec<Announcement>,
}

/// Store kept in process memory. Records are held in insertion order.
///
/// A transaction works on a copy of the whole state and swaps it in on
/// commit, so writes made by others while it is open are lost.
#[derive(Debug, Clone, Default)]
pub struct MemoryManager {
    state: Arc<Mutex<State>>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemoryStore {
    shared: Arc<Mutex<State>>,
    staged: Option<State>,
}

impl MemoryStore {
    fn with_state<R>(&mut self, f: impl FnOnce(&mut State) -> R) -> Result<R, Error> {
        if let Some(staged) = self.staged.as_mut() {
            return Ok(f(staged));
        }
        let mut state = self.shared.lock().map_err(|_| Error::ServerError("memory store lock poisoned".into()))?;
        Ok(f(&mut state))
    }
}

impl QuestionCommon for MemoryStore {
    async fn insert(&mut self, question: QuestionInsert) -> Result<Question, Error> {
        let now = Utc::now();
        let question = Question {
            id: Uuid::new_v4(),
            question_text: question.question_text,
            options: question.options,
            correct_answer: question.correct_answer,
            created_at: now,
            updated_at: now,
        };
        self.with_state(|s| s.questions.push(question.clone()))?;
        Ok(question)
    }

    async fn query(&mut self) -> Result<Vec<Question>, Error> {
        self.with_state(|s| s.questions.clone())
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Question>, Error> {
        self.with_state(|s| s.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn get_many(&mut self, ids: &[Uuid]) -> Result<Vec<Question>, Error> {
        self.with_state(|s| s.questions.iter().filter(|q| ids.contains(&q.id)).cloned().collect())
    }

    async fn update(&mut self, id: Uuid, patch: QuestionPatch) -> Result<Option<Question>, Error> {
        self.with_state(|s| {
            let question = s.questions.iter_mut().find(|q| q.id == id)?;
            if let Some(text) = patch.question_text {
                question.question_text = text;
            }
            if let Some(options) = patch.options {
                question.options = options;
            }
            if let Some(correct) = patch.correct_answer {
                question.correct_answer = correct;
            }
            question.updated_at = Utc::now();
            Some(question.clone())
        })
    }

    async fn delete(&mut self, id: Uuid) -> Result<bool, Error> {
        self.with_state(|s| {
            let before = s.questions.len();
            s.questions.retain(|q| q.id != id);
            s.questions.len() != before
        })
    }
}

impl QuizCommon for MemoryStore {
    async fn insert(&mut self, quiz: QuizInsert) -> Result<Quiz, Error> {
        let now = Utc::now();
        let quiz = Quiz {
            id: Uuid::new_v4(),
            title: quiz.title,
            topic: quiz.topic,
            course: quiz.course,
            questions: quiz.question_ids.into_iter().map(|question_id| QuestionRef { question_id }).collect(),
            student_answers: quiz.student_answers,
            completed: false,
            hidden: false,
            created_at: now,
            updated_at: now,
        };
        self.with_state(|s| s.quizzes.push(quiz.clone()))?;
        Ok(quiz)
    }

    async fn query(&mut self) -> Result<Vec<Quiz>, Error> {
        self.with_state(|s| s.quizzes.clone())
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Quiz>, Error> {
        self.with_state(|s| s.quizzes.iter().find(|q| q.id == id).cloned())
    }

    async fn sample(&mut self, size: i64) -> Result<Vec<Quiz>, Error> {
        let size = usize::try_from(size).unwrap_or(0);
        self.with_state(|s| {
            let pool: Vec<&Quiz> = s.quizzes.iter().filter(|q| !q.hidden).collect();
            pool.choose_multiple(&mut rand::thread_rng(), size).map(|q| (*q).clone()).collect()
        })
    }

    async fn update(&mut self, id: Uuid, update: QuizUpdate) -> Result<Option<Quiz>, Error> {
        self.with_state(|s| {
            let quiz = s.quizzes.iter_mut().find(|q| q.id == id)?;
            if let Some(title) = update.title {
                quiz.title = title;
            }
            if let Some(topic) = update.topic {
                quiz.topic = topic;
            }
            if let Some(course) = update.course {
                quiz.course = course;
            }
            if let Some(ids) = update.question_ids {
                quiz.questions = ids.into_iter().map(|question_id| QuestionRef { question_id }).collect();
            }
            if let Some(answers) = update.student_answers {
                quiz.student_answers = answers;
            }
            if let Some(hidden) = update.hidden {
                quiz.hidden = hidden;
            }
            quiz.updated_at = Utc::now();
            Some(quiz.clone())
        })
    }

    async fn append_answers(&mut self, id: Uuid, answers: Vec<StudentAnswer>) -> Result<Option<Quiz>, Error> {
        self.with_state(|s| {
            let quiz = s.quizzes.iter_mut().find(|q| q.id == id)?;
            quiz.student_answers.extend(answers);
            quiz.completed = true;
            quiz.updated_at = Utc::now();
            Some(quiz.clone())
        })
    }

    async fn delete(&mut self, id: Uuid) -> Result<bool, Error> {
        self.with_state(|s| {
            let before = s.quizzes.len();
            s.quizzes.retain(|q| q.id != id);
            s.quizzes.len() != before
        })
    }
}

impl AnnouncementCommon for MemoryStore {
    async fn insert(&mut self, announcement: AnnouncementInsert) -> Result<Announcement, Error> {
        let now = Utc::now();
        let announcement = Announcement {
            id: Uuid::new_v4(),
            title: announcement.title,
            description: announcement.description,
            author: announcement.author,
            created_at: now,
            updated_at: now,
        };
        self.with_state(|s| s.announcements.push(announcement.clone()))?;
        Ok(announcement)
    }

    async fn query(&mut self) -> Result<Vec<Announcement>, Error> {
        self.with_state(|s| s.announcements.iter().rev().cloned().collect())
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<Announcement>, Error> {
        self.with_state(|s| s.announcements.iter().find(|a| a.id == id).cloned())
    }

    async fn update(&mut self, id: Uuid, patch: AnnouncementPatch) -> Result<Option<Announcement>, Error> {
        self.with_state(|s| {
            let announcement = s.announcements.iter_mut().find(|a| a.id == id)?;
            if let Some(title) = patch.title {
                announcement.title = title;
            }
            if let Some(description) = patch.description {
                announcement.description = description;
            }
            if let Some(author) = patch.author {
                announcement.author = author;
            }
            announcement.updated_at = Utc::now();
            Some(announcement.clone())
        })
    }

    async fn delete(&mut self, id: Uuid) -> Result<bool, Error> {
        self.with_state(|s| {
            let before = s.announcements.len();
            s.announcements.retain(|a| a.id != id);
            s.announcements.len() != before
        })
    }
}

impl Common for MemoryStore {}
impl Store for MemoryStore {}

impl TxStore for MemoryStore {
    async fn commit(mut self) -> Result<(), Error> {
        if let Some(staged) = self.staged.take() {
            let mut state = self.shared.lock().map_err(|_| Error::ServerError("memory store lock poisoned".into()))?;
            *state = staged;
        }
        Ok(())
    }

    async fn rollback(mut self) -> Result<(), Error> {
        if let Some(staged) = self.staged.take() {
            log::debug!("discarding staged memory transaction with {} quizzes", staged.quizzes.len());
        }
        Ok(())
    }
}

impl Manager for MemoryManager {
    type Store = MemoryStore;
    type TxStore = MemoryStore;

    async fn db(&self) -> Result<Self::Store, Error> {
        Ok(MemoryStore {
            shared: self.state.clone(),
            staged: None,
        })
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        let snapshot = self.state.lock().map_err(|_| Error::ServerError("memory store lock poisoned".into()))?.clone();
        Ok(MemoryStore {
            shared: self.state.clone(),
            staged: Some(snapshot),
        })
    }
}
