//! Pipeline orchestrator — drives the video → transcript → LLM → store flows.
//!
//! [`TutorPipeline`] owns the stores and the two injected collaborators
//! (transcript source and LLM client) and exposes one method per operation
//! the enclosing request handler serves.
//!
//! # Ingest + enrich flow
//!
//! ```text
//! ingest_video(user, url)
//!   └─▶ extract_video_id ─▶ source.fetch ─▶ format_transcript ─▶ library
//!
//! enrich_transcript(id)
//!   └─▶ normalize content ─▶ enrichment prompt ─▶ llm.complete
//!         └─▶ parse_enriched_transcript ─▶ attach to record
//! ```
//!
//! The parsers in [`crate::enrich`] stay pure; every network call is issued
//! here, and a parse failure propagates typed rather than being retried or
//! papered over.

use std::sync::Arc;

use thiserror::Error;

use crate::enrich::{
    parse_enriched_transcript, parse_question_set, parse_word_meaning, EnrichError,
    EnrichedTranscript, QuestionKind, WordMeaning,
};
use crate::llm::{LlmClient, LlmError, PromptBuilder};
use crate::quiz::{GradeOutcome, PracticeSet, QuestionBank, QuestionRecord, QuizError};
use crate::transcript::{
    extract_video_id, format_transcript, normalize_whitespace, FetchError, LibraryError,
    TranscriptLibrary, TranscriptRecord, TranscriptSource,
};
use crate::vocab::{UserWordList, UserWordView, VocabError, WordDictionary};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that can surface from pipeline operations.
///
/// Every variant is scoped to the single request being processed; nothing
/// here is fatal to the process.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input did not contain anything that looks like a video id.
    #[error("could not recognise a video id in {0:?}")]
    InvalidVideoUrl(String),

    /// The caption track had no usable speech after formatting.
    #[error("transcript is empty after formatting")]
    EmptyTranscript,

    /// A word query with an empty word.
    #[error("word cannot be empty")]
    EmptyWord,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] EnrichError),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Vocab(#[from] VocabError),
}

// ---------------------------------------------------------------------------
// Result views
// ---------------------------------------------------------------------------

/// What a word query hands back: the resolved entry plus its popularity.
#[derive(Debug, Clone, PartialEq)]
pub struct WordQueryResult {
    pub word: String,
    pub meaning: WordMeaning,
    pub frequency: u64,
}

/// One practice session: the transcript context plus its questions.
#[derive(Debug, Clone)]
pub struct PracticeSheet {
    pub title: String,
    pub transcript_text: String,
    pub questions: Vec<QuestionRecord>,
}

// ---------------------------------------------------------------------------
// TutorPipeline
// ---------------------------------------------------------------------------

/// Drives the complete learning pipeline.
///
/// Construct with [`TutorPipeline::new`]; every method is safe to call from
/// concurrent requests, the stores serialise their own mutations.
pub struct TutorPipeline {
    source: Arc<dyn TranscriptSource>,
    llm: Arc<dyn LlmClient>,
    prompts: PromptBuilder,
    library: Arc<TranscriptLibrary>,
    bank: Arc<QuestionBank>,
    dictionary: Arc<WordDictionary>,
    user_words: Arc<UserWordList>,
}

impl TutorPipeline {
    /// Create a new pipeline.
    ///
    /// # Arguments
    ///
    /// * `source`     — caption provider (wrap it in
    ///   [`RetryingSource`](crate::transcript::RetryingSource) for backoff).
    /// * `llm`        — completion client (e.g. [`ApiClient`](crate::llm::ApiClient)).
    /// * `library`    — transcript record store.
    /// * `bank`       — question store.
    /// * `dictionary` — shared word dictionary.
    /// * `user_words` — per-user word lists.
    pub fn new(
        source: Arc<dyn TranscriptSource>,
        llm: Arc<dyn LlmClient>,
        library: Arc<TranscriptLibrary>,
        bank: Arc<QuestionBank>,
        dictionary: Arc<WordDictionary>,
        user_words: Arc<UserWordList>,
    ) -> Self {
        Self {
            source,
            llm,
            prompts: PromptBuilder::new(),
            library,
            bank,
            dictionary,
            user_words,
        }
    }

    // -----------------------------------------------------------------------
    // Transcripts
    // -----------------------------------------------------------------------

    /// Fetch a video's captions and store them as a transcript record.
    ///
    /// Accepts full URLs or bare video ids. Re-ingesting a video the user
    /// already has returns the existing record instead of duplicating it.
    pub async fn ingest_video(
        &self,
        user_id: &str,
        url_or_id: &str,
        title: &str,
    ) -> Result<TranscriptRecord, PipelineError> {
        let video_id = extract_video_id(url_or_id)
            .ok_or_else(|| PipelineError::InvalidVideoUrl(url_or_id.to_string()))?;

        if let Some(existing) = self.library.find_by_video(user_id, &video_id) {
            log::info!("video {video_id} already ingested for user {user_id}");
            return Ok(existing);
        }

        let fetched = self.source.fetch(&video_id).await?;
        let content = format_transcript(&fetched.segments);
        if content.is_empty() {
            return Err(PipelineError::EmptyTranscript);
        }

        let record = self
            .library
            .create(user_id, &video_id, title, &content, &fetched.language);
        log::info!(
            "ingested video {video_id} for user {user_id} ({} characters, {})",
            record.content.len(),
            record.language
        );
        Ok(record)
    }

    /// Run LLM enrichment over a stored transcript and attach the result.
    ///
    /// A malformed or truncated completion surfaces as
    /// [`PipelineError::Parse`]; the record keeps its previous state. The
    /// decision whether to retry the completion belongs to the caller.
    pub async fn enrich_transcript(
        &self,
        transcript_id: &str,
    ) -> Result<EnrichedTranscript, PipelineError> {
        let record = self
            .library
            .get(transcript_id)
            .ok_or_else(|| LibraryError::NotFound(transcript_id.to_string()))?;

        let text = normalize_whitespace(&record.content);
        if text.is_empty() {
            return Err(PipelineError::EmptyTranscript);
        }

        log::info!(
            "enriching transcript {transcript_id} ({} characters)",
            text.len()
        );
        let request = self.prompts.enrichment(&text);
        let completion = self.llm.complete(&request).await?;

        let enriched = parse_enriched_transcript(&completion)?;
        self.library
            .attach_enrichment(transcript_id, enriched.clone())?;

        log::info!(
            "enriched transcript {transcript_id} ({} vocabulary items)",
            enriched.vocabulary.len()
        );
        Ok(enriched)
    }

    /// Flip a transcript's favorite flag.
    pub fn toggle_transcript_favorite(&self, transcript_id: &str) -> Result<bool, PipelineError> {
        Ok(self.library.toggle_favorite(transcript_id)?)
    }

    /// All of one user's transcripts, newest first.
    pub fn transcripts_for_user(&self, user_id: &str) -> Vec<TranscriptRecord> {
        self.library.list_for_user(user_id)
    }

    // -----------------------------------------------------------------------
    // Questions
    // -----------------------------------------------------------------------

    /// Generate questions of one kind for a stored transcript.
    pub async fn generate_questions(
        &self,
        transcript_id: &str,
        kind: QuestionKind,
    ) -> Result<Vec<QuestionRecord>, PipelineError> {
        let record = self
            .library
            .get(transcript_id)
            .ok_or_else(|| LibraryError::NotFound(transcript_id.to_string()))?;

        let request = self.prompts.questions(&record.content, kind);
        let completion = self.llm.complete(&request).await?;
        let generated = parse_question_set(&completion, kind)?;

        log::info!(
            "generated {} {kind} questions for transcript {transcript_id}",
            generated.len()
        );
        Ok(self
            .bank
            .add_generated(&record.id, &record.video_id, &record.title, &generated))
    }

    /// Grade a submission against a stored question, updating its counters.
    pub fn submit_answer(
        &self,
        question_id: &str,
        submitted: &str,
    ) -> Result<GradeOutcome, PipelineError> {
        Ok(self.bank.submit_answer(question_id, submitted)?)
    }

    /// Practice-set summaries for everything the user has ingested.
    pub fn practice_sets(&self, user_id: &str) -> Vec<PracticeSet> {
        let mut sets = Vec::new();
        for transcript in self.library.list_for_user(user_id) {
            for (kind, question_count) in self.bank.counts_by_kind(&transcript.id) {
                sets.push(PracticeSet {
                    transcript_id: transcript.id.clone(),
                    title: transcript.title.clone(),
                    video_id: transcript.video_id.clone(),
                    kind,
                    question_count,
                });
            }
        }
        sets
    }

    /// The questions of one kind for one of the user's videos, with the
    /// transcript context for display.
    pub fn practice_questions(
        &self,
        user_id: &str,
        video_id: &str,
        kind: QuestionKind,
    ) -> Result<PracticeSheet, PipelineError> {
        let transcript = self
            .library
            .find_by_video(user_id, video_id)
            .ok_or_else(|| LibraryError::NotFound(video_id.to_string()))?;

        Ok(PracticeSheet {
            title: transcript.title,
            transcript_text: transcript.content,
            questions: self.bank.for_video(video_id, kind),
        })
    }

    /// Flip a question's favorite flag.
    pub fn toggle_question_favorite(&self, question_id: &str) -> Result<bool, PipelineError> {
        Ok(self.bank.toggle_favorite(question_id)?)
    }

    // -----------------------------------------------------------------------
    // Vocabulary
    // -----------------------------------------------------------------------

    /// Resolve a word's meaning and record the query.
    ///
    /// Dictionary first: an exact or near-duplicate hit bumps the frequency
    /// counter without touching the LLM. Only an unknown word pays for a
    /// completion, whose parsed meaning is then shared via the dictionary.
    /// In every branch the user's word list gains the (user, word) record if
    /// it is missing; an existing record keeps its notes and flags.
    pub async fn query_word(
        &self,
        user_id: &str,
        word: &str,
    ) -> Result<WordQueryResult, PipelineError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(PipelineError::EmptyWord);
        }

        let entry = match self.dictionary.query(word) {
            Some(entry) => entry,
            None => {
                log::info!("word {word:?} not in dictionary, querying LLM");
                let request = self.prompts.word_meaning(word);
                let completion = self.llm.complete(&request).await?;
                let meaning = parse_word_meaning(&completion)?;
                self.dictionary.insert(word, meaning)
            }
        };

        self.user_words.ensure(user_id, &entry.id);

        Ok(WordQueryResult {
            word: entry.word,
            meaning: entry.meaning,
            frequency: entry.frequency,
        })
    }

    /// One user's words joined with the dictionary, newest first.
    pub fn words_for_user(&self, user_id: &str, favorites_only: bool) -> Vec<UserWordView> {
        self.user_words
            .words_for_user(&self.dictionary, user_id, favorites_only)
    }

    /// The `n` most-queried words across all users.
    pub fn trending_words(&self, n: usize) -> Vec<crate::vocab::DictionaryEntry> {
        self.dictionary.trending(n)
    }

    /// Flip a user word's favorite flag.
    pub fn toggle_word_favorite(
        &self,
        user_id: &str,
        entry_id: &str,
    ) -> Result<bool, PipelineError> {
        Ok(self.user_words.toggle_favorite(user_id, entry_id)?)
    }

    /// Replace a user word's notes.
    pub fn set_word_notes(
        &self,
        user_id: &str,
        entry_id: &str,
        notes: &str,
    ) -> Result<(), PipelineError> {
        Ok(self.user_words.set_notes(user_id, entry_id, notes)?)
    }

    /// Mark a user word mastered (or not).
    pub fn set_word_mastered(
        &self,
        user_id: &str,
        entry_id: &str,
        mastered: bool,
    ) -> Result<(), PipelineError> {
        Ok(self.user_words.set_mastered(user_id, entry_id, mastered)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use crate::llm::CompletionRequest;
    use crate::transcript::fetch::{CaptionSegment, FetchedTranscript, MockTranscriptSource};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Mock LLM client that always returns a fixed completion and counts
    /// calls.
    struct ScriptedLlm {
        response: String,
        calls: AtomicU32,
    }

    impl ScriptedLlm {
        fn new(response: impl Into<String>) -> Self {
            Self {
                response: response.into(),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    /// Mock LLM client that always fails.
    struct FailingLlm;

    #[async_trait]
    impl LlmClient for FailingLlm {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
            Err(LlmError::Timeout)
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    const ENRICHMENT_COMPLETION: &str = r#"```json
{"punctuated_text":"नमस्ते दोस्तों।","translation":"Hello friends.","vocabulary":[{"word":"दोस्त","meaning":"friend","example":{"hindi":"वह मेरा दोस्त है।","english":"He is my friend."}}]}
```"#;

    const QUESTION_COMPLETION: &str = r#"{"qa_pairs":[
        {"question":"भारत की राजधानी क्या है?","answer":"दिल्ली","type":"novice"},
        {"question":"हिंदी किस लिपि में लिखी जाती है?","answer":"देवनागरी","type":"novice"}
    ]}"#;

    const WORD_COMPLETION: &str = r#"{"meaning":"hello","example":{"hindi":"नमस्ते!","english":"Hello!"}}"#;

    fn transcript_fixture() -> FetchedTranscript {
        FetchedTranscript {
            segments: vec![
                CaptionSegment {
                    text: "नमस्ते दोस्तों".into(),
                    start_secs: 0.0,
                    duration_secs: 2.0,
                },
                CaptionSegment {
                    text: "[संगीत]".into(),
                    start_secs: 2.0,
                    duration_secs: 1.0,
                },
            ],
            language: "hi".into(),
        }
    }

    fn make_pipeline(
        source: Arc<MockTranscriptSource>,
        llm: Arc<dyn LlmClient>,
    ) -> TutorPipeline {
        TutorPipeline::new(
            source,
            llm,
            Arc::new(TranscriptLibrary::in_memory()),
            Arc::new(QuestionBank::in_memory()),
            Arc::new(WordDictionary::in_memory()),
            Arc::new(UserWordList::in_memory()),
        )
    }

    // -----------------------------------------------------------------------
    // Ingest
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn ingest_stores_formatted_transcript() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let pipeline = make_pipeline(source, Arc::new(ScriptedLlm::new("unused")));

        let record = pipeline
            .ingest_video("user-1", "https://youtu.be/dQw4w9WgXcQ", "पाठ 1")
            .await
            .unwrap();

        assert_eq!(record.video_id, "dQw4w9WgXcQ");
        assert_eq!(record.language, "hi");
        // Noise marker segment dropped, text formatted.
        assert_eq!(record.content, "नमस्ते दोस्तों");
    }

    #[tokio::test]
    async fn ingest_rejects_unrecognisable_input() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let pipeline = make_pipeline(source, Arc::new(ScriptedLlm::new("unused")));

        let err = pipeline
            .ingest_video("user-1", "not a video", "पाठ")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidVideoUrl(_)));
    }

    #[tokio::test]
    async fn ingest_same_video_twice_reuses_record() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let pipeline = make_pipeline(Arc::clone(&source), Arc::new(ScriptedLlm::new("unused")));

        let first = pipeline
            .ingest_video("user-1", "dQw4w9WgXcQ", "पाठ")
            .await
            .unwrap();
        let second = pipeline
            .ingest_video("user-1", "dQw4w9WgXcQ", "पाठ")
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(source.calls(), 1, "second ingest must not refetch");
    }

    #[tokio::test]
    async fn ingest_all_noise_captions_is_rejected() {
        let all_noise = FetchedTranscript {
            segments: vec![CaptionSegment {
                text: "[Music]".into(),
                start_secs: 0.0,
                duration_secs: 1.0,
            }],
            language: "hi".into(),
        };
        let source = Arc::new(MockTranscriptSource::ok(all_noise));
        let pipeline = make_pipeline(source, Arc::new(ScriptedLlm::new("unused")));

        let err = pipeline
            .ingest_video("user-1", "dQw4w9WgXcQ", "पाठ")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyTranscript));
    }

    // -----------------------------------------------------------------------
    // Enrichment
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn enrich_attaches_parsed_result() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let llm = Arc::new(ScriptedLlm::new(ENRICHMENT_COMPLETION));
        let pipeline = make_pipeline(source, Arc::clone(&llm) as Arc<dyn LlmClient>);

        let record = pipeline
            .ingest_video("user-1", "dQw4w9WgXcQ", "पाठ")
            .await
            .unwrap();
        let enriched = pipeline.enrich_transcript(&record.id).await.unwrap();

        assert_eq!(enriched.translation, "Hello friends.");
        assert_eq!(enriched.vocabulary.len(), 1);
        assert_eq!(llm.calls(), 1);

        let stored = pipeline
            .transcripts_for_user("user-1")
            .remove(0)
            .enrichment
            .expect("enrichment attached to record");
        assert_eq!(stored, enriched);
    }

    #[tokio::test]
    async fn enrich_propagates_parse_failure_without_attaching() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let llm = Arc::new(ScriptedLlm::new("sorry, I cannot help with that"));
        let pipeline = make_pipeline(source, llm);

        let record = pipeline
            .ingest_video("user-1", "dQw4w9WgXcQ", "पाठ")
            .await
            .unwrap();
        let err = pipeline.enrich_transcript(&record.id).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Parse(EnrichError::MalformedCompletion { .. })
        ));
        assert!(pipeline.transcripts_for_user("user-1")[0].enrichment.is_none());
    }

    #[tokio::test]
    async fn enrich_propagates_llm_failure() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let pipeline = make_pipeline(source, Arc::new(FailingLlm));

        let record = pipeline
            .ingest_video("user-1", "dQw4w9WgXcQ", "पाठ")
            .await
            .unwrap();
        let err = pipeline.enrich_transcript(&record.id).await.unwrap_err();
        assert!(matches!(err, PipelineError::Llm(LlmError::Timeout)));
    }

    #[tokio::test]
    async fn enrich_unknown_transcript_errors() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let pipeline = make_pipeline(source, Arc::new(ScriptedLlm::new("unused")));

        let err = pipeline.enrich_transcript("missing").await.unwrap_err();
        assert!(matches!(err, PipelineError::Library(LibraryError::NotFound(_))));
    }

    // -----------------------------------------------------------------------
    // Questions
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn generate_questions_fills_the_bank() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let llm = Arc::new(ScriptedLlm::new(QUESTION_COMPLETION));
        let pipeline = make_pipeline(source, llm);

        let record = pipeline
            .ingest_video("user-1", "dQw4w9WgXcQ", "पाठ")
            .await
            .unwrap();
        let questions = pipeline
            .generate_questions(&record.id, QuestionKind::Novice)
            .await
            .unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].video_id, "dQw4w9WgXcQ");
        assert_eq!(questions[0].attempts, 0);

        let sets = pipeline.practice_sets("user-1");
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].kind, QuestionKind::Novice);
        assert_eq!(sets[0].question_count, 2);
    }

    #[tokio::test]
    async fn submit_answer_round_trip() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let llm = Arc::new(ScriptedLlm::new(QUESTION_COMPLETION));
        let pipeline = make_pipeline(source, llm);

        let record = pipeline
            .ingest_video("user-1", "dQw4w9WgXcQ", "पाठ")
            .await
            .unwrap();
        let questions = pipeline
            .generate_questions(&record.id, QuestionKind::Novice)
            .await
            .unwrap();

        let outcome = pipeline
            .submit_answer(&questions[0].id, "दिल्ली")
            .unwrap();
        assert!(outcome.is_correct);
        assert_eq!(outcome.attempts, 1);

        let sheet = pipeline
            .practice_questions("user-1", "dQw4w9WgXcQ", QuestionKind::Novice)
            .unwrap();
        assert_eq!(sheet.questions[0].attempts, 1);
        assert_eq!(sheet.transcript_text, "नमस्ते दोस्तों");
    }

    // -----------------------------------------------------------------------
    // Word queries
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn first_word_query_hits_llm_and_seeds_dictionary() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let llm = Arc::new(ScriptedLlm::new(WORD_COMPLETION));
        let pipeline = make_pipeline(source, Arc::clone(&llm) as Arc<dyn LlmClient>);

        let result = pipeline.query_word("user-1", "नमस्ते").await.unwrap();
        assert_eq!(result.word, "नमस्ते");
        assert_eq!(result.meaning.meaning, "hello");
        assert_eq!(result.frequency, 1);
        assert_eq!(llm.calls(), 1);

        let words = pipeline.words_for_user("user-1", false);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "नमस्ते");
    }

    #[tokio::test]
    async fn repeat_word_query_skips_llm_and_bumps_frequency() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let llm = Arc::new(ScriptedLlm::new(WORD_COMPLETION));
        let pipeline = make_pipeline(source, Arc::clone(&llm) as Arc<dyn LlmClient>);

        pipeline.query_word("user-1", "नमस्ते").await.unwrap();
        let second = pipeline.query_word("user-2", " नमस्ते ").await.unwrap();

        assert_eq!(second.frequency, 2);
        assert_eq!(llm.calls(), 1, "dictionary hit must not re-query the LLM");

        // Both users now hold their own join record.
        assert_eq!(pipeline.words_for_user("user-1", false).len(), 1);
        assert_eq!(pipeline.words_for_user("user-2", false).len(), 1);
    }

    #[tokio::test]
    async fn repeat_query_preserves_user_notes() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let llm = Arc::new(ScriptedLlm::new(WORD_COMPLETION));
        let pipeline = make_pipeline(source, llm);

        pipeline.query_word("user-1", "नमस्ते").await.unwrap();
        let entry_id = pipeline.words_for_user("user-1", false)[0].entry_id.clone();
        pipeline
            .set_word_notes("user-1", &entry_id, "अभिवादन")
            .unwrap();

        pipeline.query_word("user-1", "नमस्ते").await.unwrap();
        assert_eq!(
            pipeline.words_for_user("user-1", false)[0].notes,
            "अभिवादन",
            "repeat query must not reset notes"
        );
    }

    #[tokio::test]
    async fn empty_word_is_rejected() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let pipeline = make_pipeline(source, Arc::new(ScriptedLlm::new("unused")));

        let err = pipeline.query_word("user-1", "   ").await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyWord));
    }

    #[tokio::test]
    async fn malformed_word_completion_propagates() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let pipeline = make_pipeline(source, Arc::new(ScriptedLlm::new("no json here")));

        let err = pipeline.query_word("user-1", "नमस्ते").await.unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
        assert!(
            pipeline.words_for_user("user-1", false).is_empty(),
            "failed lookup must not create a user word"
        );
    }

    #[tokio::test]
    async fn trending_words_orders_by_popularity() {
        let source = Arc::new(MockTranscriptSource::ok(transcript_fixture()));
        let llm = Arc::new(ScriptedLlm::new(WORD_COMPLETION));
        let pipeline = make_pipeline(source, llm);

        pipeline.query_word("user-1", "एक").await.unwrap();
        pipeline.query_word("user-1", "दो").await.unwrap();
        pipeline.query_word("user-2", "दो").await.unwrap();

        let trending = pipeline.trending_words(3);
        assert_eq!(trending[0].word, "दो");
        assert_eq!(trending[0].frequency, 2);
    }
}
