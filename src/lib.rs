//! # Studia
//!
//! A CLI learning assistant: summarise pasted text, documents, and YouTube
//! videos using LLMs.
//!
//! ## Features
//!
//! - **Sectioned summaries**: Summary plus optional Key Points, Q&A, and
//!   Code Explanation sections, rendered per section in the terminal
//! - **Document input**: plain text, PDF, and DOCX extraction
//! - **Best-effort persistence**: results go to a remote record store and a
//!   local sled history without ever blocking the user-visible flow
//! - **Todo list**: a small sled-backed task list

pub mod config;
pub mod format;
pub mod gemini;
pub mod input;
pub mod persist;
pub mod pipeline;
pub mod storage;
pub mod youtube;

pub use config::Config;
pub use format::{Section, SectionBody};
pub use storage::Storage;
