pub mod analyze;
pub mod config;
pub mod evaluate;
pub mod size;
pub mod util;
