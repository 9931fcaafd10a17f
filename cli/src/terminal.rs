pub mod logging;
pub mod report;
