pub mod attributes;
pub mod boot;
pub mod partition;
pub mod record;
pub mod runs;
pub mod scanner;
