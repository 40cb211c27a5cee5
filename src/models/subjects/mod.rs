pub mod entities;
pub mod import;
pub mod prerequisites;
pub mod requests;
