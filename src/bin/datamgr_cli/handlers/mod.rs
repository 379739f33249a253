#![deny(clippy::all, clippy::pedantic)]

pub mod credentials;
pub mod jobs;
pub mod service;
pub mod tasks;
