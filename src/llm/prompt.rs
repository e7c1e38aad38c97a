//! Prompt builder for transcript enrichment, question generation, and word
//! meanings.
//!
//! [`PromptBuilder`] produces [`CompletionRequest`]s for the three LLM
//! operations the pipeline performs:
//! * **Enrichment** (`enrichment`) — punctuation restoration, translation,
//!   and vocabulary extraction for a Hindi transcript. Pinned to a low
//!   temperature so the strict-JSON format holds.
//! * **Questions** (`questions`) — graded question/answer sets in one of
//!   three formats (novice, multiple choice, fill in the blanks).
//! * **Word meaning** (`word_meaning`) — a beginner-level explanation of a
//!   single Hindi word with one bilingual example sentence.
//!
//! The model is a free-text completion endpoint, not a schema-constrained
//! generator, so every instruction block spells out the exact JSON shape and
//! the parsers in [`crate::enrich`] stay tolerant on the way back in.

use crate::enrich::QuestionKind;
use crate::llm::client::CompletionRequest;

// ---------------------------------------------------------------------------
// System instructions
// ---------------------------------------------------------------------------

/// Transcript enrichment: strict-JSON Hindi processor.
const ENRICHMENT_SYSTEM: &str = "\
You are an expert Hindi language processor that enhances Hindi transcripts by \
adding proper punctuation and providing English translations. You MUST return \
ONLY a valid JSON object with NO additional text or formatting.

CRITICAL JSON REQUIREMENTS:
1. Return ONLY the JSON object - no explanations, no markdown, no code blocks
2. The response must start with { and end with }
3. All strings must use double quotes (\")
4. No trailing commas in arrays or objects
5. No comments or additional text
6. No line breaks within strings (use \\n if needed)
7. Proper escaping of quotes and special characters

Required JSON Structure:
{
    \"punctuated_text\": \"Hindi text with proper punctuation\",
    \"translation\": \"English translation of the entire text\",
    \"vocabulary\": [
        {
            \"word\": \"Hindi word\",
            \"meaning\": \"brief English meaning\",
            \"example\": {
                \"hindi\": \"example sentence in Hindi\",
                \"english\": \"translation of example\"
            }
        }
    ]
}

Example Response:
{
    \"punctuated_text\": \"नमस्ते। मैं हिंदी सीख रहा हूं।\",
    \"translation\": \"Hello. I am learning Hindi.\",
    \"vocabulary\": [
        {
            \"word\": \"सीखना\",
            \"meaning\": \"to learn\",
            \"example\": {
                \"hindi\": \"वह गिटार सीख रही है।\",
                \"english\": \"She is learning guitar.\"
            }
        }
    ]
}";

/// Question generation: difficulty-graded QA pairs from a Hindi transcript.
const QUESTION_SYSTEM: &str = "\
You are an expert Hindi Educational QA Generator that creates structured, \
difficulty-graded question-answer pairs from Hindi video transcripts. Output \
must be in valid JSON with clear categorization.

Guidelines:
1. Use natural, fluent Hindi for questions and answers.
2. Include factual, conceptual, and applied questions.
3. Ensure grammatical accuracy and clarity.
4. Make questions progressively more challenging.";

/// Word meaning: beginner-level explanation of a single word.
const WORD_SYSTEM: &str = "\
You are a Hindi language teacher explaining words to beginners. Keep \
explanations clear and concise.
Format your response as:

{
    \"meaning\": \"simple English meaning (1-2 words)\",
    \"example\": {
        \"hindi\": \"one simple example sentence\",
        \"english\": \"its English translation\"
    }
}";

// ---------------------------------------------------------------------------
// Question format templates
// ---------------------------------------------------------------------------

const NOVICE_TEMPLATE: &str = "\
Generate 3-5 Novice level questions in JSON format.
Return questions in this format:
{
    \"qa_pairs\": [
        {
            \"question\": \"question text here\",
            \"answer\": \"answer text here\",
            \"type\": \"novice\"
        }
    ]
}";

const MCQ_TEMPLATE: &str = "\
Generate 3-5 Multiple Choice Questions (MCQs) in JSON format.
Return questions in this format:
{
    \"qa_pairs\": [
        {
            \"question\": \"question text here\",
            \"answer\": \"correct answer here\",
            \"type\": \"mcq\",
            \"options\": [\"correct answer\", \"wrong option 1\", \"wrong option 2\", \"wrong option 3\"]
        }
    ]
}";

const FILL_BLANKS_TEMPLATE: &str = "\
Generate 3-5 Fill in the Blanks questions in JSON format.
For each question, take a sentence from the text and replace a key word or \
phrase with '____'.
Return questions in this format:
{
    \"qa_pairs\": [
        {
            \"question\": \"sentence with ____ for blank\",
            \"answer\": \"word or phrase that goes in blank\",
            \"type\": \"fill_blanks\"
        }
    ]
}";

/// Temperature pinned for enrichment requests; the JSON structure drifts at
/// the configured conversational default.
const ENRICHMENT_TEMPERATURE: f32 = 0.1;

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds [`CompletionRequest`]s for the pipeline's three LLM operations.
///
/// # Example
/// ```rust
/// use transcript_tutor::llm::PromptBuilder;
///
/// let builder = PromptBuilder::new();
/// let request = builder.word_meaning("नमस्ते");
/// assert!(request.user.contains("नमस्ते"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the transcript-enrichment request.
    ///
    /// `transcript_text` should already be whitespace-normalised (see
    /// [`crate::transcript::normalize_whitespace`]); the instruction caps
    /// vocabulary at the 5-10 most important words to keep completions short
    /// enough to survive length limits.
    pub fn enrichment(&self, transcript_text: &str) -> CompletionRequest {
        let user = format!(
            "Process this Hindi text and return ONLY a valid JSON object with the \
following structure:
{{
    \"punctuated_text\": \"Hindi text with proper punctuation\",
    \"translation\": \"English translation\",
    \"vocabulary\": [
        {{
            \"word\": \"Hindi word\",
            \"meaning\": \"English meaning\",
            \"example\": {{
                \"hindi\": \"Hindi example\",
                \"english\": \"English translation\"
            }}
        }}
    ]
}}

CRITICAL REQUIREMENTS:
1. DO NOT use any markdown code blocks (```)
2. DO NOT add any text before or after the JSON
3. The response must start with {{ and end with }}
4. Return the raw JSON only
5. Keep responses focused and concise
6. Limit vocabulary to 5-10 most important words
7. Keep example sentences short and simple

Here is the text to process:

{transcript_text}"
        );

        CompletionRequest {
            system: ENRICHMENT_SYSTEM.to_string(),
            user,
            temperature: Some(ENRICHMENT_TEMPERATURE),
        }
    }

    /// Build a question-generation request for the given format.
    pub fn questions(&self, transcript_text: &str, kind: QuestionKind) -> CompletionRequest {
        let template = match kind {
            QuestionKind::Novice => NOVICE_TEMPLATE,
            QuestionKind::Mcq => MCQ_TEMPLATE,
            QuestionKind::FillBlanks => FILL_BLANKS_TEMPLATE,
        };

        let user = format!(
            "Please generate questions based on the following transcript text.
Return ONLY a JSON object with NO additional text or formatting.

Instructions:
1. {template}
2. Ensure all text is in Hindi
3. Make questions progressively more challenging
4. Return ONLY the JSON object, no other text
5. Ensure the JSON is properly formatted and valid

Transcript Text:
{transcript_text}"
        );

        CompletionRequest {
            system: QUESTION_SYSTEM.to_string(),
            user,
            temperature: None,
        }
    }

    /// Build a word-meaning request for a single Hindi word.
    pub fn word_meaning(&self, word: &str) -> CompletionRequest {
        let user = format!(
            "Explain the Hindi word '{word}' with:
1. Basic meaning in simple English (keep it brief)
2. One simple example sentence showing common usage
Return ONLY the JSON object."
        );

        CompletionRequest {
            system: WORD_SYSTEM.to_string(),
            user,
            temperature: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
