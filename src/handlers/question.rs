use actix_web::http::StatusCode;
use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;

use crate::core::models::question::{Create as QuestionCreate, Patch as QuestionPatch, Question};
use crate::core::ports::repository::Manager;
use crate::core::services::question as service;
use crate::error::Error;
use crate::response::MessageResponse;

pub async fn create<M: Manager>(manager: Data<M>, Json(body): Json<QuestionCreate>) -> Result<HttpResponse, Error> {
    let mut store = manager.db().await?;
    let question = service::create_question(&mut store, body).await?;
    Ok(HttpResponse::build(StatusCode::CREATED).json(question))
}

pub async fn list<M: Manager>(manager: Data<M>) -> Result<Json<Vec<Question>>, Error> {
    let mut store = manager.db().await?;
    Ok(Json(service::questions(&mut store).await?))
}

pub async fn detail<M: Manager>(manager: Data<M>, id: Path<(String,)>) -> Result<Json<Question>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    Ok(Json(service::question_detail(&mut store, &id).await?))
}

pub async fn update<M: Manager>(manager: Data<M>, id: Path<(String,)>, Json(patch): Json<QuestionPatch>) -> Result<Json<Question>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    Ok(Json(service::update_question(&mut store, &id, patch).await?))
}

pub async fn delete_question<M: Manager>(manager: Data<M>, id: Path<(String,)>) -> Result<Json<MessageResponse>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    service::delete_question(&mut store, &id).await?;
    Ok(Json(MessageResponse::new("Question deleted successfully")))
}
