//! Data models for the Biblion API

pub mod book;
pub mod user;
