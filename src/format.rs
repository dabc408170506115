//! Section formatter for multi-part completion results.
//!
//! The pipeline concatenates one completion per requested section, each
//! prefixed with a `## <Section Name>` header line. This module splits that
//! concatenated text back into displayable sections and classifies each one
//! by its title, so the renderer knows whether to show a bullet list, Q&A
//! pairs, alternating prose/code blocks, or plain prose.
//!
//! The splitting is purely textual: it has no awareness of nested markers,
//! escaped characters, or malformed input. Odd cases (a `*` used for
//! emphasis inside a key-points body, an unpaired code fence) produce
//! best-effort output rather than an error.

/// One question/answer pair from a "Questions and Answers" section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// One fragment of a "Code Explanation" section body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSegment {
    pub text: String,
    /// True for fragments between an opening and closing triple-backtick fence.
    pub is_code: bool,
}

/// The body of a section, shaped according to its title classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    /// A bullet list, one entry per `*`-delimited item.
    List(Vec<String>),
    /// Question/answer pairs split on `Question:` / `Answer:` markers.
    Qa(Vec<QaPair>),
    /// Alternating prose and fenced-code fragments.
    Code(Vec<CodeSegment>),
    /// Verbatim text with internal line breaks preserved.
    Prose(String),
}

/// One titled segment of a multi-part completion result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: SectionBody,
}

/// Split a concatenated completion result into its titled sections.
///
/// Pieces that are empty or whitespace-only after the `##` split are
/// dropped. Within each piece, the first line is the title and the rest is
/// the body, classified by case-insensitive title keywords in this
/// precedence order: "key points", "questions and answers",
/// "code explanation", otherwise prose.
pub fn split_sections(text: &str) -> Vec<Section> {
    text.split("##")
        .filter(|piece| !piece.trim().is_empty())
        .map(parse_section)
        .collect()
}

fn parse_section(piece: &str) -> Section {
    let (title, body) = match piece.split_once('\n') {
        Some((first, rest)) => (first.trim(), rest),
        None => (piece.trim(), ""),
    };

    let lowered = title.to_lowercase();
    let body = if lowered.contains("key points") {
        SectionBody::List(split_list(body))
    } else if lowered.contains("questions and answers") {
        SectionBody::Qa(split_qa(body))
    } else if lowered.contains("code explanation") {
        SectionBody::Code(split_code(body))
    } else {
        SectionBody::Prose(body.trim().to_string())
    };

    Section {
        title: title.to_string(),
        body,
    }
}

/// Split a list body on `*`, trimming items and dropping empty ones.
///
/// This also splits on `*` used for emphasis or multiplication inside prose;
/// that is a known limitation of the delimiter, kept as-is.
fn split_list(body: &str) -> Vec<String> {
    body.split('*')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a Q&A body on `Question:` markers, then each piece on its first
/// `Answer:`. A piece without an `Answer:` yields an empty answer.
fn split_qa(body: &str) -> Vec<QaPair> {
    body.split("Question:")
        .filter(|piece| !piece.trim().is_empty())
        .map(|piece| match piece.split_once("Answer:") {
            Some((q, a)) => QaPair {
                question: q.trim().to_string(),
                answer: a.trim().to_string(),
            },
            None => QaPair {
                question: piece.trim().to_string(),
                answer: String::new(),
            },
        })
        .collect()
}

/// Split a code-explanation body on triple-backtick fences. Fragments at
/// odd positions (0-indexed) are code, the rest prose. Fences are assumed
/// to come in open/close pairs; an odd count leaves the trailing fragment
/// misclassified, which is passed through rather than repaired.
fn split_code(body: &str) -> Vec<CodeSegment> {
    body.split("```")
        .enumerate()
        .map(|(i, fragment)| CodeSegment {
            text: fragment.trim().to_string(),
            is_code: i % 2 == 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_summary_and_key_points() {
        let input = "## Summary\nHello\n\n## Key Points\n* one* two* three\n\n";
        let sections = split_sections(input);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Summary");
        assert_eq!(sections[0].body, SectionBody::Prose("Hello".to_string()));
        assert_eq!(sections[1].title, "Key Points");
        assert_eq!(
            sections[1].body,
            SectionBody::List(vec!["one".into(), "two".into(), "three".into()])
        );
    }

    #[test]
    fn list_split_handles_space_after_star() {
        // "* " and "*" delimiters must produce the same items: the split is
        // on the bare '*' and each piece is trimmed afterwards.
        let sections = split_sections("## Key Points\n* one\n* two\n* three");
        assert_eq!(
            sections[0].body,
            SectionBody::List(vec!["one".into(), "two".into(), "three".into()])
        );
    }

    #[test]
    fn drops_whitespace_only_pieces() {
        let sections = split_sections("   ## Summary\nText\n\n   \n##   \n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Summary");
    }

    #[test]
    fn qa_body_yields_pairs() {
        let body = "Question: What is X?Answer: X is Y.Question: How?Answer: Like this.";
        let sections = split_sections(&format!("## Questions and Answers\n{}", body));

        assert_eq!(
            sections[0].body,
            SectionBody::Qa(vec![
                QaPair {
                    question: "What is X?".into(),
                    answer: "X is Y.".into()
                },
                QaPair {
                    question: "How?".into(),
                    answer: "Like this.".into()
                },
            ])
        );
    }

    #[test]
    fn qa_piece_without_answer_gets_empty_answer() {
        let sections = split_sections("## Questions and Answers\nQuestion: Why?");
        assert_eq!(
            sections[0].body,
            SectionBody::Qa(vec![QaPair {
                question: "Why?".into(),
                answer: String::new()
            }])
        );
    }

    #[test]
    fn code_split_alternates_prose_and_code() {
        let body = "Here is the code:\n```\nfn main() {}\n```\nThat was it.";
        let sections = split_sections(&format!("## Code Explanation\n{}", body));

        let SectionBody::Code(segments) = &sections[0].body else {
            panic!("expected code body");
        };
        assert_eq!(segments.len(), 3);
        assert!(!segments[0].is_code);
        assert!(segments[1].is_code);
        assert_eq!(segments[1].text, "fn main() {}");
        assert!(!segments[2].is_code);
    }

    #[test]
    fn dangling_fence_misclassifies_trailing_fragment() {
        // One fence, two fragments: the trailing one ends up flagged as
        // code. Documented pass-through behaviour, not repaired.
        let sections = split_sections("## Code Explanation\nprose ```dangling");
        let SectionBody::Code(segments) = &sections[0].body else {
            panic!("expected code body");
        };
        assert_eq!(segments.len(), 2);
        assert!(segments[1].is_code);
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let sections = split_sections("## KEY POINTS\n* a");
        assert!(matches!(sections[0].body, SectionBody::List(_)));
    }

    #[test]
    fn unknown_title_is_prose_with_line_breaks_preserved() {
        let sections = split_sections("## Conclusion\nline one\nline two\n");
        assert_eq!(
            sections[0].body,
            SectionBody::Prose("line one\nline two".to_string())
        );
    }

    #[test]
    fn section_without_body_line_is_empty_prose() {
        let sections = split_sections("## Summary");
        assert_eq!(sections[0].title, "Summary");
        assert_eq!(sections[0].body, SectionBody::Prose(String::new()));
    }
}
