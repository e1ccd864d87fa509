pub mod cli;
pub mod commands;
pub mod error;
pub mod image;
pub mod mft;
pub mod models;
pub mod output;
pub mod slack;

pub use error::{Result, SlackError};
