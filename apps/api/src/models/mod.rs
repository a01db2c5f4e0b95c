pub mod keyword;
pub mod optimization_log;
