pub mod google_calendar;
pub mod google_sheets;
mod rest;
pub mod slack;
