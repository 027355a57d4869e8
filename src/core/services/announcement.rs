use crate::core::models::announcement::{Announcement, Create as AnnouncementCreate, Insert as AnnouncementInsert, Patch as AnnouncementPatch};
use crate::core::ports::repository::{AnnouncementCommon, Store};
use crate::core::services::parse_path_id;
use crate::error::Error;

const NOT_FOUND: &str = "Announcement not found";

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

pub async fn create_announcement<S>(store: &mut S, create: AnnouncementCreate) -> Result<Announcement, Error>
where
    S: Store,
{
    let (Some(title), Some(description), Some(author)) = (trimmed(create.title), trimmed(create.description), trimmed(create.author)) else {
        return Err(Error::validation("Title, description and author are required"));
    };
    let announcement = AnnouncementCommon::insert(store, AnnouncementInsert { title, description, author }).await?;
    log::info!("created announcement {}", announcement.id);
    Ok(announcement)
}

/// Newest first.
pub async fn announcements<S>(store: &mut S) -> Result<Vec<Announcement>, Error>
where
    S: Store,
{
    AnnouncementCommon::query(store).await
}

pub async fn announcement_detail<S>(store: &mut S, id: &str) -> Result<Announcement, Error>
where
    S: Store,
{
    let id = parse_path_id(id, NOT_FOUND)?;
    AnnouncementCommon::get(store, id).await?.ok_or_else(|| Error::not_found(NOT_FOUND))
}

pub async fn update_announcement<S>(store: &mut S, id: &str, patch: AnnouncementPatch) -> Result<Announcement, Error>
where
    S: Store,
{
    let id = parse_path_id(id, NOT_FOUND)?;
    let patch = AnnouncementPatch {
        title: patch.title.map(|v| v.trim().to_owned()),
        description: patch.description.map(|v| v.trim().to_owned()),
        author: patch.author.map(|v| v.trim().to_owned()),
    };
    if [&patch.title, &patch.description, &patch.author].iter().any(|f| matches!(f, Some(v) if v.is_empty())) {
        return Err(Error::validation("Title, description and author cannot be empty"));
    }
    AnnouncementCommon::update(store, id, patch).await?.ok_or_else(|| Error::not_found(NOT_FOUND))
}

pub async fn delete_announcement<S>(store: &mut S, id: &str) -> Result<(), Error>
where
    S: Store,
{
    let id = parse_path_id(id, NOT_FOUND)?;
    if !AnnouncementCommon::delete(store, id).await? {
        return Err(Error::not_found(NOT_FOUND));
    }
    Ok(())
}
