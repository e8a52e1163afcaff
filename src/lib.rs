#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod session;
pub mod storage;
pub mod time;
pub mod view;

pub use error::{Result, TimetableError};
pub use session::{LoadOutcome, Session};
