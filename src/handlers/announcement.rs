use actix_web::http::StatusCode;
use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;

use crate::core::models::announcement::{Announcement, Create as AnnouncementCreate, Patch as AnnouncementPatch};
use crate::core::ports::repository::Manager;
use crate::core::services::announcement as service;
use crate::error::Error;
use crate::response::{AnnouncementResponse, MessageResponse};

pub async fn create<M: Manager>(manager: Data<M>, Json(body): Json<AnnouncementCreate>) -> Result<HttpResponse, Error> {
    let mut store = manager.db().await?;
    let announcement = service::create_announcement(&mut store, body).await?;
    Ok(HttpResponse::build(StatusCode::CREATED).json(AnnouncementResponse::new("Announcement created successfully", announcement)))
}

pub async fn list<M: Manager>(manager: Data<M>) -> Result<Json<Vec<Announcement>>, Error> {
    let mut store = manager.db().await?;
    Ok(Json(service::announcements(&mut store).await?))
}

pub async fn detail<M: Manager>(manager: Data<M>, id: Path<(String,)>) -> Result<Json<Announcement>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    Ok(Json(service::announcement_detail(&mut store, &id).await?))
}

pub async fn update<M: Manager>(manager: Data<M>, id: Path<(String,)>, Json(patch): Json<AnnouncementPatch>) -> Result<Json<MessageResponse>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    service::update_announcement(&mut store, &id, patch).await?;
    Ok(Json(MessageResponse::new("Announcement updated successfully")))
}

pub async fn delete_announcement<M: Manager>(manager: Data<M>, id: Path<(String,)>) -> Result<Json<MessageResponse>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    service::delete_announcement(&mut store, &id).await?;
    Ok(Json(MessageResponse::new("Announcement deleted successfully")))
}
