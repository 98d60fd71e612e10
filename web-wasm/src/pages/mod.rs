//! 画面（ルートごと）

pub mod index;
pub mod not_found;
pub mod report;
