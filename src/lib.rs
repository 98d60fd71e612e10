//! CBIO報告書ビューア（CLI・モックAPI・印刷HTML生成）

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod server;
pub mod source;
