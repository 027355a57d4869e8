use std::collections::HashMap;

use itertools::Itertools;
use serde_json::Value;
use uuid::Uuid;

use crate::core::models::question::Question;
use crate::core::models::quiz::{
    AnswerInput, Create as QuizCreate, HydratedAnswer, HydratedQuestionRef, HydratedQuiz, Insert as QuizInsert, Patch as QuizPatch, Quiz, StudentAnswer,
    Submit as QuizSubmit, Update as QuizUpdate,
};
use crate::core::ports::repository::{QuestionCommon, QuizCommon, Store, TxStore};
use crate::core::services::{parse_ids, parse_path_id};
use crate::error::Error;

const NOT_FOUND: &str = "Quiz not found.";
const INVALID_QUESTION_ID: &str = "Invalid question ID format.";
const ANSWERS_REQUIRED: &str = "Student answers are required and must be a non-empty array.";

fn typed_answers(answers: Vec<AnswerInput>) -> Result<Vec<StudentAnswer>, Error> {
    let ids = parse_ids(answers.iter().map(|a| a.question_id.as_str()), INVALID_QUESTION_ID)?;
    Ok(ids
        .into_iter()
        .zip(answers)
        .map(|(question_id, a)| StudentAnswer { question_id, answer: a.answer })
        .collect())
}

/// Creates a quiz from existing questions.
///
/// Every referenced id must be well formed and resolve to a stored question;
/// otherwise nothing is written and the offending ids are listed in the
/// error. The stored references come from the resolved set, so duplicated
/// input ids collapse into one reference.
pub async fn create_quiz<T>(mut store: T, create: QuizCreate) -> Result<Quiz, Error>
where
    T: TxStore,
{
    let title = create.title.filter(|t| !t.trim().is_empty());
    let refs = create.questions.filter(|q| !q.is_empty());
    let (Some(title), Some(refs)) = (title, refs) else {
        return Err(Error::validation("Title and an array of questions (with questionId) are required."));
    };
    let requested = parse_ids(refs.iter().map(|r| r.question_id.as_str()), INVALID_QUESTION_ID)?;
    let student_answers = match create.student_answers {
        Some(answers) => typed_answers(answers)?,
        None => Vec::new(),
    };
    let existing = QuestionCommon::get_many(&mut store, &requested).await?;
    let non_existing: Vec<String> = requested
        .iter()
        .filter(|id| !existing.iter().any(|q| &q.id == *id))
        .map(|id| id.to_string())
        .collect();
    if !non_existing.is_empty() {
        log::debug!("rejecting quiz {:?}: unknown questions {:?}", title, non_existing);
        store.rollback().await?;
        return Err(Error::non_existing_ids("Some question IDs are invalid or not found.", non_existing));
    }
    let question_ids: Vec<Uuid> = requested.into_iter().filter(|id| existing.iter().any(|q| &q.id == id)).unique().collect();
    let quiz = QuizCommon::insert(
        &mut store,
        QuizInsert {
            title,
            topic: create.topic.unwrap_or_default(),
            course: create.course.unwrap_or_default(),
            question_ids,
            student_answers,
        },
    )
    .await?;
    store.commit().await?;
    log::info!("created quiz {} with {} questions", quiz.id, quiz.questions.len());
    Ok(quiz)
}

/// Resolves every question reference of `quizzes` with a single lookup.
pub async fn hydrate<S>(store: &mut S, quizzes: Vec<Quiz>) -> Result<Vec<HydratedQuiz>, Error>
where
    S: Store,
{
    let ids: Vec<Uuid> = quizzes
        .iter()
        .flat_map(|q| q.question_ids().chain(q.student_answers.iter().map(|a| a.question_id)))
        .unique()
        .collect();
    let questions: HashMap<Uuid, Question> = if ids.is_empty() {
        HashMap::new()
    } else {
        QuestionCommon::get_many(store, &ids).await?.into_iter().map(|q| (q.id, q)).collect()
    };
    Ok(quizzes.into_iter().map(|quiz| hydrate_one(&questions, quiz)).collect())
}

fn hydrate_one(questions: &HashMap<Uuid, Question>, quiz: Quiz) -> HydratedQuiz {
    HydratedQuiz {
        id: quiz.id,
        title: quiz.title,
        topic: quiz.topic,
        course: quiz.course,
        questions: quiz
            .questions
            .iter()
            .map(|r| HydratedQuestionRef {
                question_id: questions.get(&r.question_id).cloned(),
            })
            .collect(),
        student_answers: quiz
            .student_answers
            .into_iter()
            .map(|a| HydratedAnswer {
                question_id: questions.get(&a.question_id).cloned(),
                answer: a.answer,
            })
            .collect(),
        completed: quiz.completed,
        hidden: quiz.hidden,
        created_at: quiz.created_at,
        updated_at: quiz.updated_at,
    }
}

pub async fn quizzes<S>(store: &mut S) -> Result<Vec<HydratedQuiz>, Error>
where
    S: Store,
{
    let quizzes = QuizCommon::query(store).await?;
    hydrate(store, quizzes).await
}

pub async fn quiz_detail<S>(store: &mut S, id: &str) -> Result<HydratedQuiz, Error>
where
    S: Store,
{
    let id = parse_path_id(id, NOT_FOUND)?;
    let quiz = QuizCommon::get(store, id).await?.ok_or_else(|| Error::not_found(NOT_FOUND))?;
    let mut hydrated = hydrate(store, vec![quiz]).await?;
    hydrated.pop().ok_or_else(|| Error::ServerError("hydration dropped a quiz".into()))
}

/// Samples up to `size` visible quizzes. Within one call the quizzes are
/// distinct; repeated calls may return the same ones.
pub async fn random_quizzes<S>(store: &mut S, size: i64) -> Result<Vec<HydratedQuiz>, Error>
where
    S: Store,
{
    if size < 1 {
        return Err(Error::validation("count must be at least 1"));
    }
    let sampled = QuizCommon::sample(store, size).await?;
    if sampled.is_empty() {
        return Err(Error::not_found("No quizzes found."));
    }
    hydrate(store, sampled).await
}

/// Appends a batch of answers and marks the quiz completed.
///
/// Completion is set for any non-empty batch; it is not checked against the
/// number of questions, and answers are not graded here.
pub async fn submit_answers<S>(store: &mut S, id: &str, submit: QuizSubmit) -> Result<Quiz, Error>
where
    S: Store,
{
    let id = Uuid::parse_str(id).map_err(|_| Error::validation("Invalid quiz ID."))?;
    if QuizCommon::get(store, id).await?.is_none() {
        return Err(Error::not_found(NOT_FOUND));
    }
    let answers = match submit.student_answers {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(Error::validation(ANSWERS_REQUIRED)),
    };
    let answers: Vec<AnswerInput> = answers
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .map_err(|e| Error::validation(format!("Each student answer needs a questionId and an answer: {}", e)))?;
    let answers = typed_answers(answers)?;
    let count = answers.len();
    let quiz = QuizCommon::append_answers(store, id, answers).await?.ok_or_else(|| Error::not_found(NOT_FOUND))?;
    log::info!("quiz {} received {} answers ({} in total)", quiz.id, count, quiz.student_answers.len());
    Ok(quiz)
}

/// Replaces each provided field. Unlike creation, replacement question ids
/// are only checked for format, not for existence.
pub async fn update_quiz<S>(store: &mut S, id: &str, patch: QuizPatch) -> Result<Quiz, Error>
where
    S: Store,
{
    let id = parse_path_id(id, NOT_FOUND)?;
    if matches!(&patch.title, Some(t) if t.trim().is_empty()) {
        return Err(Error::validation("Title cannot be empty."));
    }
    let question_ids = match patch.questions {
        Some(refs) => Some(parse_ids(refs.iter().map(|r| r.question_id.as_str()), INVALID_QUESTION_ID)?),
        None => None,
    };
    let student_answers = match patch.student_answers {
        Some(answers) => Some(typed_answers(answers)?),
        None => None,
    };
    let update = QuizUpdate {
        title: patch.title,
        topic: patch.topic,
        course: patch.course,
        question_ids,
        student_answers,
        hidden: patch.hidden,
    };
    QuizCommon::update(store, id, update).await?.ok_or_else(|| Error::not_found(NOT_FOUND))
}

pub async fn delete_quiz<S>(store: &mut S, id: &str) -> Result<(), Error>
where
    S: Store,
{
    let id = parse_path_id(id, NOT_FOUND)?;
    if !QuizCommon::delete(store, id).await? {
        return Err(Error::not_found(NOT_FOUND));
    }
    log::info!("deleted quiz {}", id);
    Ok(())
}
