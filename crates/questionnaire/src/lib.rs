//! Preference questionnaire for first-time users.
//!
//! This crate provides:
//! - The fixed catalogue of tag questions and the image-tag pool
//! - A seeded partition of the pool into four image questions
//! - The `Questionnaire` state machine that collects eight answers
//! - The `PreferenceSink` trait the finished document is submitted to
//! - Image asset naming for the image questions
//!
//! ## Example Usage
//! ```ignore
//! use questionnaire::{Progress, Questionnaire};
//!
//! let mut run = Questionnaire::new("alice", seed);
//! loop {
//!     let option = pick(run.current_question());
//!     match run.select(option, &sink).await? {
//!         Progress::Next { .. } => continue,
//!         Progress::Submitted(doc) => break doc,
//!     }
//! }
//! ```

pub mod assets;
pub mod catalog;
pub mod error;
pub mod traits;
pub mod wizard;

// Re-export main types
pub use assets::{image_file_stem, image_url, ImageResolver, PLACEHOLDER_IMAGE};
pub use catalog::{partition_image_pool, ImageQuestion, TagQuestion, IMAGE_TAG_POOL, TAG_QUESTIONS};
pub use error::QuestionnaireError;
pub use traits::{PreferenceSink, SinkError};
pub use wizard::{build_document, Progress, Question, Questionnaire, LAST_STEP, TOTAL_STEPS};
