//! Recruitment portal core: postings with dynamic custom-field forms, and the
//! applications that answer them, plus the helpdesk applicants write to.

pub mod access;
pub mod applications;
pub mod config;
pub mod error;
pub mod forms;
pub mod helpdesk;
pub mod postings;
pub mod telemetry;
