//! Client library for the multi-cloud data manager console.
//!
//! Form fields go in, normalized JSON (or multipart) requests come out:
//! [`domain`] shapes payloads, [`application`] runs the submission
//! lifecycle against the server, [`config`] and [`infra`] carry settings and
//! telemetry.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
