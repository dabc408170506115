//! Completion pipeline: one prompt per requested section, in a fixed order.
//!
//! The Summary section is always requested; Key Points, Questions and
//! Answers, and Code Explanation follow, each gated by its option flag.
//! Calls run strictly one at a time. Responses are concatenated into a
//! single result string, each prefixed with a `## <Section Name>` header
//! line, which the formatter later splits back apart.

use crate::gemini::{GeminiClient, GeminiError};
use thiserror::Error;

/// Anything that can turn one prompt into generated text.
///
/// The pipeline only needs this seam; tests drive it with scripted
/// responses instead of a live client.
pub trait SectionGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError>;
}

impl SectionGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        GeminiClient::generate(self, prompt).await
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("please provide input to summarise")]
    EmptyInput,
    #[error(transparent)]
    Gemini(#[from] GeminiError),
}

/// Where the raw input came from; selects prompt wording and is recorded
/// with persisted results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Url,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Url => "url",
        }
    }

    /// How the input is referred to inside prompts.
    fn source_noun(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Url => "video transcript",
        }
    }
}

/// Requested summary length for pasted or uploaded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }
}

/// Independent flags for the optional sections; all off by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryOptions {
    pub key_points: bool,
    pub qa: bool,
    pub code_explanation: bool,
}

/// One summarisation request: the raw input plus the user's selections.
#[derive(Debug, Clone)]
pub struct SummaryRequest<'a> {
    pub input: &'a str,
    pub kind: InputKind,
    pub length: SummaryLength,
    pub options: SummaryOptions,
}

/// Build the (section name, prompt) list in the fixed request order.
fn section_prompts(request: &SummaryRequest<'_>) -> Vec<(&'static str, String)> {
    let noun = request.kind.source_noun();
    let mut prompts = Vec::new();

    let summary_prompt = match request.kind {
        InputKind::Text => format!(
            "Please provide a {} summary of the following text. \
             The summary should be concise and capture the main points:\n\n{}",
            request.length.as_str(),
            request.input
        ),
        InputKind::Url => format!(
            "You are a YouTube video summarizer. Provide a concise summary \
             of the following transcript within 250 words: {}",
            request.input
        ),
    };
    prompts.push(("Summary", summary_prompt));

    if request.options.key_points {
        prompts.push((
            "Key Points",
            format!(
                "Extract and list the key points from the following {}: {}",
                noun, request.input
            ),
        ));
    }

    if request.options.qa {
        prompts.push((
            "Questions and Answers",
            format!(
                "Based on the following {}, generate 5 relevant questions and \
                 their answers. Format each as 'Question: [question]' followed \
                 by 'Answer: [answer]' without any asterisks or additional \
                 formatting: {}",
                noun, request.input
            ),
        ));
    }

    if request.options.code_explanation {
        prompts.push((
            "Code Explanation",
            format!(
                "Extract the code snippets from the following {} and provide \
                 a detailed explanation for each code snippet: {}",
                noun, request.input
            ),
        ));
    }

    prompts
}

/// Run the full completion sequence and return the concatenated result.
///
/// Whitespace-only input is rejected before any call is made. The result is
/// assembled in a local accumulator and returned only when every requested
/// section succeeded; a mid-sequence failure discards the sections already
/// fetched and surfaces the error.
pub async fn run<C: SectionGenerator>(
    client: &C,
    request: &SummaryRequest<'_>,
) -> Result<String, PipelineError> {
    if request.input.trim().is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let mut result = String::new();
    for (name, prompt) in section_prompts(request) {
        let text = client.generate(&prompt).await?;
        result.push_str(&format!("## {}\n{}\n\n", name, text));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Returns scripted responses in order, recording how many calls were made.
    struct ScriptedClient {
        responses: RefCell<Vec<Result<String, GeminiError>>>,
        calls: RefCell<usize>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<String, GeminiError>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: RefCell::new(responses),
                calls: RefCell::new(0),
            }
        }
    }

    impl SectionGenerator for ScriptedClient {
        async fn generate(&self, _prompt: &str) -> Result<String, GeminiError> {
            *self.calls.borrow_mut() += 1;
            self.responses
                .borrow_mut()
                .pop()
                .unwrap_or(Err(GeminiError::EmptyResponse))
        }
    }

    fn request(input: &str, options: SummaryOptions) -> SummaryRequest<'_> {
        SummaryRequest {
            input,
            kind: InputKind::Url,
            length: SummaryLength::default(),
            options,
        }
    }

    #[tokio::test]
    async fn whitespace_input_is_rejected_before_any_call() {
        let client = ScriptedClient::new(vec![Ok("never reached".to_string())]);
        let err = run(&client, &request("   \n\t", SummaryOptions::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
        assert_eq!(*client.calls.borrow(), 0);
    }

    #[tokio::test]
    async fn all_sections_concatenate_with_headers() {
        let client = ScriptedClient::new(vec![
            Ok("the gist".to_string()),
            Ok("* a* b".to_string()),
        ]);
        let options = SummaryOptions {
            key_points: true,
            ..Default::default()
        };
        let result = run(&client, &request("transcript", options)).await.unwrap();
        assert_eq!(result, "## Summary\nthe gist\n\n## Key Points\n* a* b\n\n");
    }

    #[tokio::test]
    async fn mid_sequence_failure_discards_earlier_sections() {
        // First section succeeds, second fails: the caller must get an
        // error and no partial result, and the remaining section must
        // never be requested.
        let client = ScriptedClient::new(vec![
            Ok("the gist".to_string()),
            Err(GeminiError::EmptyResponse),
        ]);
        let options = SummaryOptions {
            key_points: true,
            qa: true,
            ..Default::default()
        };

        let err = run(&client, &request("transcript", options))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Gemini(_)));
        assert_eq!(*client.calls.borrow(), 2);
    }

    #[test]
    fn summary_is_always_first_and_only_default_section() {
        let prompts = section_prompts(&request("some transcript", SummaryOptions::default()));
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, "Summary");
    }

    #[test]
    fn sections_follow_the_fixed_order() {
        let options = SummaryOptions {
            key_points: true,
            qa: true,
            code_explanation: true,
        };
        let names: Vec<_> = section_prompts(&request("t", options))
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec!["Summary", "Key Points", "Questions and Answers", "Code Explanation"]
        );
    }

    #[test]
    fn unset_flags_skip_their_sections() {
        let options = SummaryOptions {
            qa: true,
            ..Default::default()
        };
        let names: Vec<_> = section_prompts(&request("t", options))
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["Summary", "Questions and Answers"]);
    }

    #[test]
    fn text_summary_prompt_carries_the_length() {
        let req = SummaryRequest {
            input: "body",
            kind: InputKind::Text,
            length: SummaryLength::Long,
            options: SummaryOptions::default(),
        };
        let prompts = section_prompts(&req);
        assert!(prompts[0].1.contains("a long summary"));
    }

    #[test]
    fn qa_prompt_requests_question_answer_markers() {
        let options = SummaryOptions {
            qa: true,
            ..Default::default()
        };
        let prompts = section_prompts(&request("t", options));
        assert!(prompts[1].1.contains("'Question: [question]'"));
        assert!(prompts[1].1.contains("'Answer: [answer]'"));
    }
}
