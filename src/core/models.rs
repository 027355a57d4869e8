pub mod announcement;
pub mod question;
pub mod quiz;
