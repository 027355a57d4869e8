use serde::{Deserialize, Serialize};

use crate::core::models::{announcement::Announcement, quiz::Quiz};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub message: String,
    pub quiz: Quiz,
}

impl QuizResponse {
    pub fn new(message: impl Into<String>, quiz: Quiz) -> Self {
        Self { message: message.into(), quiz }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementResponse {
    pub message: String,
    pub announcement: Announcement,
}

impl AnnouncementResponse {
    pub fn new(message: impl Into<String>, announcement: Announcement) -> Self {
        Self {
            message: message.into(),
            announcement,
        }
    }
}
