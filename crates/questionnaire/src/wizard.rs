//! The questionnaire state machine.
//!
//! Eight linear steps: four tag questions then four image questions.
//! Selecting an option at step `s` records the answer and moves to `s + 1`;
//! at the last step it builds the preference document and submits it
//! instead. Going back keeps every answer; only re-selecting overwrites one.
//! Dropping (or `cancel`ling) a questionnaire before completion emits nothing.

use chrono::{SecondsFormat, Utc};
use data_loader::{PreferenceDocument, TagPreferences};
use tracing::{debug, info, warn};

use crate::catalog::{partition_image_pool, ImageQuestion, TagQuestion, TAG_QUESTIONS};
use crate::error::{QuestionnaireError, Result};
use crate::traits::PreferenceSink;

/// Number of tag questions (steps 0-3)
pub const TAG_STEPS: usize = 4;

/// Number of image questions (steps 4-7)
pub const IMAGE_STEPS: usize = 4;

/// Total number of steps
pub const TOTAL_STEPS: usize = TAG_STEPS + IMAGE_STEPS;

/// Index of the step whose answer completes the questionnaire
pub const LAST_STEP: usize = TOTAL_STEPS - 1;

/// The question shown at a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question<'a> {
    Tag(&'a TagQuestion),
    Image(&'a ImageQuestion),
}

impl Question<'_> {
    pub fn title(&self) -> &'static str {
        match self {
            Question::Tag(q) => q.title,
            Question::Image(q) => q.title,
        }
    }

    pub fn options(&self) -> &[&'static str] {
        match self {
            Question::Tag(q) => q.options,
            Question::Image(q) => &q.images,
        }
    }
}

/// Outcome of a successful selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The answer was recorded and the questionnaire moved on
    Next { step: usize },
    /// The last answer was recorded and the sink accepted the document
    Submitted(PreferenceDocument),
}

/// Build the preference document from complete answer sets.
///
/// Tag answers map positionally onto the named categories; image answers
/// stay an ordered list; `all_selected_tags` is tags then images.
pub fn build_document(
    username: &str,
    timestamp: String,
    tag_answers: [String; TAG_STEPS],
    image_answers: [String; IMAGE_STEPS],
) -> PreferenceDocument {
    let all_selected_tags: Vec<String> = tag_answers
        .iter()
        .chain(image_answers.iter())
        .cloned()
        .collect();
    let [core_preferences, gameplay_style, aesthetic_preferences, special_features] = tag_answers;

    PreferenceDocument {
        username: username.to_string(),
        timestamp,
        tag_preferences: TagPreferences {
            core_preferences,
            gameplay_style,
            aesthetic_preferences,
            special_features,
        },
        image_preferences: image_answers.to_vec(),
        all_selected_tags,
    }
}

/// One run of the preference questionnaire for a user.
#[derive(Debug)]
pub struct Questionnaire {
    username: String,
    step: usize,
    tag_answers: [Option<String>; TAG_STEPS],
    image_answers: [Option<String>; IMAGE_STEPS],
    image_questions: Vec<ImageQuestion>,
    submitted: bool,
}

impl Questionnaire {
    /// Start a questionnaire; the image pool is partitioned once from `seed`
    /// and kept for the whole run.
    pub fn new(username: impl Into<String>, seed: u64) -> Self {
        let username = username.into();
        debug!("Starting questionnaire for {} (seed {})", username, seed);
        Self {
            username,
            step: 0,
            tag_answers: Default::default(),
            image_answers: Default::default(),
            image_questions: partition_image_pool(seed),
            submitted: false,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Current step, 0..=7
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_last_question(&self) -> bool {
        self.step == LAST_STEP
    }

    /// Completion percentage shown in the progress bar
    pub fn progress(&self) -> f32 {
        (self.step + 1) as f32 / TOTAL_STEPS as f32 * 100.0
    }

    pub fn image_questions(&self) -> &[ImageQuestion] {
        &self.image_questions
    }

    pub fn tag_answers(&self) -> &[Option<String>] {
        &self.tag_answers
    }

    pub fn image_answers(&self) -> &[Option<String>] {
        &self.image_answers
    }

    pub fn current_question(&self) -> Question<'_> {
        self.question_at(self.step)
    }

    /// The answer currently recorded for this step, if any
    pub fn current_answer(&self) -> Option<&str> {
        self.answer_slot(self.step).as_deref()
    }

    fn question_at(&self, step: usize) -> Question<'_> {
        if step < TAG_STEPS {
            Question::Tag(&TAG_QUESTIONS[step])
        } else {
            Question::Image(&self.image_questions[step - TAG_STEPS])
        }
    }

    fn answer_slot(&self, step: usize) -> &Option<String> {
        if step < TAG_STEPS {
            &self.tag_answers[step]
        } else {
            &self.image_answers[step - TAG_STEPS]
        }
    }

    fn answer_slot_mut(&mut self, step: usize) -> &mut Option<String> {
        if step < TAG_STEPS {
            &mut self.tag_answers[step]
        } else {
            &mut self.image_answers[step - TAG_STEPS]
        }
    }

    /// Move back one step. Returns false at step 0 or after submission.
    pub fn back(&mut self) -> bool {
        if self.submitted || self.step == 0 {
            return false;
        }
        self.step -= 1;
        debug!("Questionnaire for {} back to step {}", self.username, self.step);
        true
    }

    /// Abandon the run; nothing is submitted.
    pub fn cancel(self) {
        info!(
            "Questionnaire for {} cancelled at step {}",
            self.username, self.step
        );
    }

    /// Select an option at the current step.
    ///
    /// Before the last step this records the answer and advances. At the
    /// last step it records the answer and submits the document to `sink`
    /// in the same call. If the sink fails the questionnaire stays at the
    /// last step with every answer kept, ready for `resubmit`.
    pub async fn select<S>(&mut self, option: &str, sink: &S) -> Result<Progress>
    where
        S: PreferenceSink + ?Sized,
    {
        if self.submitted {
            return Err(QuestionnaireError::AlreadySubmitted);
        }

        let offered = self
            .current_question()
            .options()
            .iter()
            .find(|candidate| **candidate == option)
            .copied()
            .ok_or_else(|| QuestionnaireError::InvalidOption {
                step: self.step,
                option: option.to_string(),
            })?;

        let step = self.step;
        *self.answer_slot_mut(step) = Some(offered.to_string());

        if step < LAST_STEP {
            self.step += 1;
            return Ok(Progress::Next { step: self.step });
        }

        self.submit(sink).await
    }

    /// Retry submission after a sink failure.
    pub async fn resubmit<S>(&mut self, sink: &S) -> Result<Progress>
    where
        S: PreferenceSink + ?Sized,
    {
        if self.submitted {
            return Err(QuestionnaireError::AlreadySubmitted);
        }
        self.submit(sink).await
    }

    /// Collect both answer sets, or report the first unanswered step
    fn complete_answers(&self) -> Result<([String; TAG_STEPS], [String; IMAGE_STEPS])> {
        let mut tags: [String; TAG_STEPS] = Default::default();
        let mut images: [String; IMAGE_STEPS] = Default::default();

        for step in 0..TOTAL_STEPS {
            let answer = self
                .answer_slot(step)
                .clone()
                .ok_or(QuestionnaireError::Incomplete { step })?;
            if step < TAG_STEPS {
                tags[step] = answer;
            } else {
                images[step - TAG_STEPS] = answer;
            }
        }
        Ok((tags, images))
    }

    async fn submit<S>(&mut self, sink: &S) -> Result<Progress>
    where
        S: PreferenceSink + ?Sized,
    {
        let (tags, images) = self.complete_answers()?;
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let document = build_document(&self.username, timestamp, tags, images);

        match sink.submit(&document).await {
            Ok(()) => {
                self.submitted = true;
                info!(
                    "Preferences for {} submitted to {}",
                    self.username,
                    sink.name()
                );
                Ok(Progress::Submitted(document))
            }
            Err(e) => {
                warn!(
                    "Submitting preferences for {} to {} failed: {}",
                    self.username,
                    sink.name(),
                    e
                );
                Err(QuestionnaireError::Submission(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SinkError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Sink that records every document and can be told to fail
    #[derive(Default)]
    struct RecordingSink {
        received: Mutex<Vec<PreferenceDocument>>,
        fail: AtomicBool,
    }

    impl RecordingSink {
        fn failing() -> Self {
            let sink = Self::default();
            sink.fail.store(true, Ordering::SeqCst);
            sink
        }

        fn count(&self) -> usize {
            self.received.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PreferenceSink for RecordingSink {
        fn name(&self) -> &str {
            "RecordingSink"
        }

        async fn submit(
            &self,
            preferences: &PreferenceDocument,
        ) -> std::result::Result<(), SinkError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err("service unavailable".into());
            }
            self.received.lock().unwrap().push(preferences.clone());
            Ok(())
        }
    }

    /// Pick the first option at each step, returning the picks in order
    async fn answer_first_options(
        questionnaire: &mut Questionnaire,
        sink: &RecordingSink,
        steps: usize,
    ) -> Vec<String> {
        let mut picks = Vec::new();
        for _ in 0..steps {
            let option = questionnaire.current_question().options()[0];
            picks.push(option.to_string());
            questionnaire.select(option, sink).await.unwrap();
        }
        picks
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    #[tokio::test]
    async fn test_eight_answers_emit_one_document() {
        let sink = RecordingSink::default();
        let mut questionnaire = Questionnaire::new("alice", 3);

        let picks = answer_first_options(&mut questionnaire, &sink, TOTAL_STEPS).await;

        assert!(questionnaire.is_submitted());
        assert_eq!(sink.count(), 1);

        let doc = sink.received.lock().unwrap()[0].clone();
        assert_eq!(doc.username, "alice");
        assert_eq!(doc.all_selected_tags, picks);
        assert_eq!(doc.tag_preferences.core_preferences, "Cooperative Play");
        assert_eq!(doc.tag_preferences.gameplay_style, "Shooter");
        assert_eq!(doc.tag_preferences.aesthetic_preferences, "Visual Style");
        assert_eq!(doc.tag_preferences.special_features, "Singleplayer");
        assert_eq!(doc.image_preferences, picks[4..].to_vec());
    }

    #[tokio::test]
    async fn test_steps_advance_until_last() {
        let sink = RecordingSink::default();
        let mut questionnaire = Questionnaire::new("alice", 1);

        for expected in 1..=LAST_STEP {
            let option = questionnaire.current_question().options()[0];
            let progress = questionnaire.select(option, &sink).await.unwrap();
            assert_eq!(progress, Progress::Next { step: expected });
        }
        assert!(questionnaire.is_last_question());
        assert_eq!(questionnaire.progress(), 100.0);
        assert_eq!(sink.count(), 0, "nothing submitted before the last answer");

        let option = questionnaire.current_question().options()[0];
        let progress = questionnaire.select(option, &sink).await.unwrap();
        assert!(matches!(progress, Progress::Submitted(_)));
    }

    #[tokio::test]
    async fn test_invalid_option_leaves_state_unchanged() {
        let sink = RecordingSink::default();
        let mut questionnaire = Questionnaire::new("alice", 1);

        let err = questionnaire.select("Racing", &sink).await.unwrap_err();

        assert!(matches!(err, QuestionnaireError::InvalidOption { step: 0, .. }));
        assert_eq!(questionnaire.step(), 0);
        assert!(questionnaire.current_answer().is_none());
    }

    #[tokio::test]
    async fn test_image_step_rejects_tag_from_other_group() {
        let sink = RecordingSink::default();
        let mut questionnaire = Questionnaire::new("alice", 9);
        answer_first_options(&mut questionnaire, &sink, TAG_STEPS).await;

        let foreign = questionnaire.image_questions()[1].images[0];
        let err = questionnaire.select(foreign, &sink).await.unwrap_err();
        assert!(matches!(err, QuestionnaireError::InvalidOption { step: 4, .. }));
    }

    // ============================================================================
    // Back navigation
    // ============================================================================

    #[tokio::test]
    async fn test_back_preserves_answers() {
        let sink = RecordingSink::default();
        let mut questionnaire = Questionnaire::new("alice", 5);
        let picks = answer_first_options(&mut questionnaire, &sink, 6).await;

        // From step 6 back to step 3, then forward again with one change
        assert!(questionnaire.back());
        assert!(questionnaire.back());
        assert!(questionnaire.back());
        assert_eq!(questionnaire.step(), 3);
        assert_eq!(questionnaire.current_answer(), Some(picks[3].as_str()));

        questionnaire.select("Mystery", &sink).await.unwrap();
        assert_eq!(questionnaire.step(), 4);
        assert_eq!(questionnaire.current_answer(), Some(picks[4].as_str()));

        assert_eq!(questionnaire.tag_answers()[3].as_deref(), Some("Mystery"));
        assert_eq!(questionnaire.tag_answers()[0].as_deref(), Some(picks[0].as_str()));
        assert_eq!(questionnaire.image_answers()[1].as_deref(), Some(picks[5].as_str()));
    }

    #[test]
    fn test_back_at_first_step() {
        let mut questionnaire = Questionnaire::new("alice", 5);
        assert!(!questionnaire.back());
        assert_eq!(questionnaire.step(), 0);
    }

    #[tokio::test]
    async fn test_image_questions_stable_across_navigation() {
        let sink = RecordingSink::default();
        let mut questionnaire = Questionnaire::new("alice", 11);
        let before = questionnaire.image_questions().to_vec();

        answer_first_options(&mut questionnaire, &sink, 5).await;
        questionnaire.back();
        questionnaire.back();

        assert_eq!(questionnaire.image_questions(), before.as_slice());
    }

    // ============================================================================
    // Submission
    // ============================================================================

    #[tokio::test]
    async fn test_cancel_emits_nothing() {
        let sink = RecordingSink::default();
        let mut questionnaire = Questionnaire::new("alice", 2);
        answer_first_options(&mut questionnaire, &sink, LAST_STEP).await;

        questionnaire.cancel();
        assert_eq!(sink.count(), 0);
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_state_for_retry() {
        let sink = RecordingSink::failing();
        let mut questionnaire = Questionnaire::new("alice", 4);
        let picks = answer_first_options(&mut questionnaire, &sink, LAST_STEP).await;

        let last = questionnaire.current_question().options()[0];
        let err = questionnaire.select(last, &sink).await.unwrap_err();
        assert!(matches!(err, QuestionnaireError::Submission(_)));
        assert!(!questionnaire.is_submitted());
        assert!(questionnaire.is_last_question());
        assert_eq!(questionnaire.image_answers()[3].as_deref(), Some(last));

        sink.fail.store(false, Ordering::SeqCst);
        let progress = questionnaire.resubmit(&sink).await.unwrap();

        let Progress::Submitted(doc) = progress else {
            panic!("expected submission");
        };
        assert_eq!(&doc.all_selected_tags[..LAST_STEP], picks.as_slice());
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test]
    async fn test_no_input_after_submission() {
        let sink = RecordingSink::default();
        let mut questionnaire = Questionnaire::new("alice", 8);
        answer_first_options(&mut questionnaire, &sink, TOTAL_STEPS).await;

        let option = questionnaire.current_question().options()[0];
        assert!(matches!(
            questionnaire.select(option, &sink).await,
            Err(QuestionnaireError::AlreadySubmitted)
        ));
        assert!(matches!(
            questionnaire.resubmit(&sink).await,
            Err(QuestionnaireError::AlreadySubmitted)
        ));
        assert!(!questionnaire.back());
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test]
    async fn test_resubmit_requires_all_answers() {
        let sink = RecordingSink::default();
        let mut questionnaire = Questionnaire::new("alice", 8);
        answer_first_options(&mut questionnaire, &sink, 2).await;

        let err = questionnaire.resubmit(&sink).await.unwrap_err();
        assert!(matches!(err, QuestionnaireError::Incomplete { step: 2 }));
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_build_document_concatenates_in_step_order() {
        let tags = ["Indie", "Clicker", "2D", "Mystery"].map(String::from);
        let images = ["Horror", "Shooter", "Family Fun", "Adventure"].map(String::from);

        let doc = build_document("bob", "2026-01-01T00:00:00.000Z".to_string(), tags, images);

        assert_eq!(
            doc.all_selected_tags,
            vec![
                "Indie",
                "Clicker",
                "2D",
                "Mystery",
                "Horror",
                "Shooter",
                "Family Fun",
                "Adventure",
            ]
        );
        assert_eq!(doc.image_preferences, vec!["Horror", "Shooter", "Family Fun", "Adventure"]);
        assert_eq!(doc.tag_preferences.special_features, "Mystery");
    }
}
