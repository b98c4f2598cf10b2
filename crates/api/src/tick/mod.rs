pub mod render;
pub mod run_tick;
