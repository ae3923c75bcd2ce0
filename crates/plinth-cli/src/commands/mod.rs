//! CLI command implementations

pub mod compose;
pub mod init;
pub mod inspect;
pub mod room;
