pub mod bands;
pub mod config;
pub mod recommend;
pub mod stats;
pub mod suggest;

pub use recommend::run_recommend;
pub use stats::show_stats;
pub use suggest::run_suggest;
