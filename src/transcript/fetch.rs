//! Transcript-source trait and the retrying decorator.
//!
//! The actual caption provider (a YouTube transcript client) lives outside
//! this crate; [`TranscriptSource`] is the seam it plugs into. The provider
//! is expected to resolve the caption language itself (preferred language
//! first, fallback otherwise) and return ordered segments plus the language
//! tag it settled on.
//!
//! [`RetryingSource`] wraps any source with the retry policy the provider
//! needs in practice: only rate-limit errors are retried, with exponential
//! backoff and a little jitter so concurrent workers do not stampede.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Caption data
// ---------------------------------------------------------------------------

/// One caption line as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    pub text: String,
    /// Offset of this line from the start of the video, in seconds.
    pub start_secs: f64,
    pub duration_secs: f64,
}

/// An ordered caption track plus the language the provider settled on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedTranscript {
    pub segments: Vec<CaptionSegment>,
    /// ISO-639-1 code, e.g. `"hi"` or `"en"`.
    pub language: String,
}

// ---------------------------------------------------------------------------
// FetchError
// ---------------------------------------------------------------------------

/// All errors that can arise while fetching a caption track.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The video has no caption track in any accepted language.
    #[error("no captions available for video {0}")]
    NoCaptions(String),

    /// The provider asked us to slow down. The only retryable variant.
    #[error("rate limited by the transcript provider: {0}")]
    RateLimited(String),

    /// Any other provider-side failure.
    #[error("transcript fetch failed: {0}")]
    Provider(String),

    /// Every attempt was rate limited; carries the last error text.
    #[error("could not fetch transcript after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

// ---------------------------------------------------------------------------
// TranscriptSource trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to the caption provider.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn TranscriptSource>` and called from any request.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the caption track for `video_id`.
    async fn fetch(&self, video_id: &str) -> Result<FetchedTranscript, FetchError>;
}

// Compile-time assertion: Box<dyn TranscriptSource> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn TranscriptSource>) {}
};

// ---------------------------------------------------------------------------
// RetryingSource
// ---------------------------------------------------------------------------

/// A transparent wrapper around any [`TranscriptSource`] that retries
/// rate-limited fetches with exponential backoff.
///
/// Non-rate-limit errors propagate immediately; retrying a video with no
/// captions would never help.
pub struct RetryingSource<S: TranscriptSource> {
    inner: S,
    max_attempts: u32,
    initial_backoff: Duration,
}

impl<S: TranscriptSource> RetryingSource<S> {
    /// Wrap `inner`, making at most `max_attempts` fetches with the backoff
    /// starting at `initial_backoff_secs` and doubling per attempt.
    pub fn new(inner: S, max_attempts: u32, initial_backoff_secs: u64) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            initial_backoff: Duration::from_secs(initial_backoff_secs),
        }
    }

    /// Return a reference to the wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: TranscriptSource + Send + Sync> TranscriptSource for RetryingSource<S> {
    async fn fetch(&self, video_id: &str) -> Result<FetchedTranscript, FetchError> {
        let mut delay = self.initial_backoff;
        let mut last = String::new();

        for attempt in 1..=self.max_attempts {
            match self.inner.fetch(video_id).await {
                Ok(transcript) => {
                    log::info!(
                        "fetched {} caption segments ({}) for video {video_id}",
                        transcript.segments.len(),
                        transcript.language
                    );
                    return Ok(transcript);
                }
                Err(FetchError::RateLimited(msg)) => {
                    // Up to 10% jitter keeps concurrent workers from
                    // retrying in lockstep.
                    let jitter = 1.0 + rand::rng().random_range(0.0..0.1);
                    let wait = delay.mul_f64(jitter);
                    log::warn!(
                        "rate limited fetching video {video_id}; waiting {:.2}s before retry {attempt}/{}",
                        wait.as_secs_f64(),
                        self.max_attempts
                    );
                    tokio::time::sleep(wait).await;
                    delay *= 2;
                    last = msg;
                }
                Err(other) => return Err(other),
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts: self.max_attempts,
            last,
        })
    }
}

// ---------------------------------------------------------------------------
// MockTranscriptSource  (test-only)
// ---------------------------------------------------------------------------

/// A test double that serves a pre-configured response, optionally failing a
/// fixed number of times first.
#[cfg(test)]
pub struct MockTranscriptSource {
    failures_left: std::sync::atomic::AtomicU32,
    error: Option<FetchError>,
    transcript: Option<FetchedTranscript>,
    calls: std::sync::atomic::AtomicU32,
}

#[cfg(test)]
impl MockTranscriptSource {
    /// Always succeed with `transcript`.
    pub fn ok(transcript: FetchedTranscript) -> Self {
        Self {
            failures_left: std::sync::atomic::AtomicU32::new(0),
            error: None,
            transcript: Some(transcript),
            calls: std::sync::atomic::AtomicU32::new(0),
        }
    }

    /// Always fail with `error`.
    pub fn err(error: FetchError) -> Self {
        Self {
            failures_left: std::sync::atomic::AtomicU32::new(u32::MAX),
            error: Some(error),
            transcript: None,
            calls: std::sync::atomic::AtomicU32::new(0),
        }
    }

    /// Fail with `error` for the first `failures` calls, then succeed.
    pub fn flaky(failures: u32, error: FetchError, transcript: FetchedTranscript) -> Self {
        Self {
            failures_left: std::sync::atomic::AtomicU32::new(failures),
            error: Some(error),
            transcript: Some(transcript),
            calls: std::sync::atomic::AtomicU32::new(0),
        }
    }

    /// Number of fetches made so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// A one-segment Hindi transcript, handy as a fixture.
    pub fn hindi_transcript() -> FetchedTranscript {
        FetchedTranscript {
            segments: vec![CaptionSegment {
                text: "नमस्ते दोस्तों".into(),
                start_secs: 0.0,
                duration_secs: 2.5,
            }],
            language: "hi".into(),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl TranscriptSource for MockTranscriptSource {
    async fn fetch(&self, _video_id: &str) -> Result<FetchedTranscript, FetchError> {
        use std::sync::atomic::Ordering;

        self.calls.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                left.checked_sub(1)
            })
            .is_ok();

        if failing {
            if let Some(error) = &self.error {
                return Err(error.clone());
            }
        }
        match &self.transcript {
            Some(transcript) => Ok(transcript.clone()),
            None => Err(FetchError::Provider("mock has no transcript".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_success() {
        let source = RetryingSource::new(
            MockTranscriptSource::ok(MockTranscriptSource::hindi_transcript()),
            3,
            0,
        );
        let transcript = source.fetch("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(transcript.language, "hi");
        assert_eq!(source.inner().calls(), 1);
    }

    #[tokio::test]
    async fn rate_limit_is_retried_until_success() {
        let inner = MockTranscriptSource::flaky(
            2,
            FetchError::RateLimited("429".into()),
            MockTranscriptSource::hindi_transcript(),
        );
        let source = RetryingSource::new(inner, 3, 0);

        let transcript = source.fetch("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(transcript.segments.len(), 1);
        assert_eq!(source.inner().calls(), 3, "two failures then one success");
    }

    #[tokio::test]
    async fn rate_limit_exhausts_after_max_attempts() {
        let inner = MockTranscriptSource::err(FetchError::RateLimited("429".into()));
        let source = RetryingSource::new(inner, 3, 0);

        let err = source.fetch("dQw4w9WgXcQ").await.unwrap_err();
        match err {
            FetchError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(last.contains("429"));
            }
            other => panic!("expected RetriesExhausted, got: {other:?}"),
        }
        assert_eq!(source.inner().calls(), 3);
    }

    #[tokio::test]
    async fn non_rate_limit_errors_are_not_retried() {
        let inner = MockTranscriptSource::err(FetchError::NoCaptions("dQw4w9WgXcQ".into()));
        let source = RetryingSource::new(inner, 3, 0);

        let err = source.fetch("dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(err, FetchError::NoCaptions(_)));
        assert_eq!(source.inner().calls(), 1, "no captions must not be retried");
    }

    #[tokio::test]
    async fn zero_attempts_is_clamped_to_one() {
        let source = RetryingSource::new(
            MockTranscriptSource::ok(MockTranscriptSource::hindi_transcript()),
            0,
            0,
        );
        assert!(source.fetch("dQw4w9WgXcQ").await.is_ok());
    }

    /// RetryingSource<S> must itself be a valid TranscriptSource (object-safe).
    #[test]
    fn retrying_source_is_object_safe() {
        let inner = MockTranscriptSource::ok(MockTranscriptSource::hindi_transcript());
        let _: Box<dyn TranscriptSource> = Box::new(RetryingSource::new(inner, 3, 1));
    }
}
