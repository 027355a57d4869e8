use crate::core::models::question::{Create as QuestionCreate, Insert as QuestionInsert, Patch as QuestionPatch, Question};
use crate::core::ports::repository::{QuestionCommon, Store};
use crate::core::services::parse_path_id;
use crate::error::Error;

const NOT_FOUND: &str = "Question not found";

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn create_question<S>(store: &mut S, create: QuestionCreate) -> Result<Question, Error>
where
    S: Store,
{
    let (Some(question_text), Some(options), Some(correct_answer)) = (
        required(create.question_text),
        create.options.filter(|o| !o.is_empty()),
        required(create.correct_answer),
    ) else {
        return Err(Error::validation("All fields are required"));
    };
    let question = QuestionCommon::insert(
        store,
        QuestionInsert {
            question_text,
            options,
            correct_answer,
        },
    )
    .await?;
    log::info!("created question {}", question.id);
    Ok(question)
}

pub async fn questions<S>(store: &mut S) -> Result<Vec<Question>, Error>
where
    S: Store,
{
    QuestionCommon::query(store).await
}

pub async fn question_detail<S>(store: &mut S, id: &str) -> Result<Question, Error>
where
    S: Store,
{
    let id = parse_path_id(id, NOT_FOUND)?;
    QuestionCommon::get(store, id).await?.ok_or_else(|| Error::not_found(NOT_FOUND))
}

pub async fn update_question<S>(store: &mut S, id: &str, patch: QuestionPatch) -> Result<Question, Error>
where
    S: Store,
{
    let id = parse_path_id(id, NOT_FOUND)?;
    QuestionCommon::update(store, id, patch).await?.ok_or_else(|| Error::not_found(NOT_FOUND))
}

/// Removes the question. Quizzes referencing it keep the dangling reference.
pub async fn delete_question<S>(store: &mut S, id: &str) -> Result<(), Error>
where
    S: Store,
{
    let id = parse_path_id(id, NOT_FOUND)?;
    if !QuestionCommon::delete(store, id).await? {
        return Err(Error::not_found(NOT_FOUND));
    }
    log::info!("deleted question {}", id);
    Ok(())
}
