pub mod rebuild_schedule;
