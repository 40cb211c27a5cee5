pub mod entities;
pub mod reminders;
pub mod requests;
pub mod weights;
