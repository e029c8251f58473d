use regex::Regex;
use serde_json::Value;

use super::question::Question;

/// Parses a raw quiz payload into normalized questions.
///
/// The backend returns quizzes as an opaque string: a JSON array of question
/// objects (possibly wrapped in a ```` ```json ```` code fence), or a
/// Markdown-like block list with bold numbered headers, lettered options and
/// a bolded "Correct Answer" line. Malformed input degrades instead of
/// erroring: an unrecognizable payload yields an empty vector, a question
/// without a determinable correct answer gets `answer_idx: None`, and a
/// block without lettered options gets `options: None`. The caller treats an
/// empty result as "no quiz could be generated".
pub fn parse(raw: &str) -> Vec<Question> {
    let text = strip_fences(raw);

    if let Some(questions) = parse_structured(text) {
        return questions;
    }

    parse_free_text(text)
}

/// Strips a surrounding markdown code fence, tagged `json` or plain. The
/// strips are sequential so a tagged opening fence is removed before the
/// plain-fence check runs.
fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    }
    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Structured branch: a JSON array whose first element looks like a question
/// object (non-empty `question` string plus an `options` array). Anything
/// else, including JSON that parses to an object or a scalar, falls through
/// to the free-text scanner.
fn parse_structured(text: &str) -> Option<Vec<Question>> {
    let value: Value = serde_json::from_str(text).ok()?;
    let items = value.as_array()?;

    let first = items.first()?.as_object()?;
    let has_question = first
        .get("question")
        .and_then(Value::as_str)
        .is_some_and(|q| !q.is_empty());
    if !has_question || !first.get("options").is_some_and(Value::is_array) {
        return None;
    }

    Some(items.iter().map(question_from_value).collect())
}

fn question_from_value(item: &Value) -> Question {
    let question = item
        .get("question")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let options: Option<Vec<String>> = item.get("options").and_then(Value::as_array).map(|opts| {
        opts.iter()
            .map(|opt| match opt {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    });

    let idx = item.get("answer").and_then(answer_index);

    // Only an in-bounds index counts as determined; the answer text is the
    // option it points at.
    let (answer_idx, answer_text) = match (&options, idx) {
        (Some(opts), Some(i)) if i < opts.len() => (Some(i), opts[i].clone()),
        _ => (None, String::new()),
    };

    Question {
        question,
        options,
        answer_idx,
        answer_text,
    }
}

/// Reads the `answer` field as an index: numbers directly, strings via a
/// leading-integer parse (`"1"` works, `"b"` does not).
fn answer_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => {
            let s = s.trim_start();
            let s = s.strip_prefix('+').unwrap_or(s);
            let end = s
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(s.len());
            if end == 0 {
                None
            } else {
                s[..end].parse().ok()
            }
        }
        _ => None,
    }
}

/// Free-text branch: blocks introduced by a bold numeral header (`**1.`),
/// each holding a bold question span, lettered options and a bolded
/// "Correct Answer" line.
fn parse_free_text(text: &str) -> Vec<Question> {
    let header = Regex::new(r"\*\*\d+\.").unwrap();
    let bold_span = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    let answer_line = Regex::new(r"(?i)\*\*Correct Answer:\*\* (?:([a-d])\)? ?)?([^\n*]*)").unwrap();

    header
        .split(text)
        .filter(|block| !block.trim().is_empty())
        .map(|block| free_text_question(block, &bold_span, &answer_line))
        .collect()
}

fn free_text_question(block: &str, bold_span: &Regex, answer_line: &Regex) -> Question {
    let question = bold_span
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| block.trim().to_string());

    let answer = answer_line.captures(block);

    // Options live before the correct-answer line; scanning past it would
    // pick up the answer's own "b) ..." as an extra option.
    let option_region = match answer.as_ref().and_then(|caps| caps.get(0)) {
        Some(m) => &block[..m.start()],
        None => block,
    };
    let options = scan_options(option_region);

    let mut answer_idx = None;
    let mut answer_text = String::new();
    if let Some(caps) = &answer {
        let trailing = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
        answer_idx = match caps.get(1) {
            Some(letter) => {
                let letter = letter.as_str().as_bytes()[0].to_ascii_lowercase();
                Some((letter - b'a') as usize)
            }
            // No letter: true/false heuristic on the trailing text.
            None if !trailing.is_empty() => {
                if trailing.to_lowercase().contains("true") {
                    Some(0)
                } else {
                    Some(1)
                }
            }
            None => None,
        };
        answer_text = caps
            .get(0)
            .and_then(|m| m.as_str().splitn(2, ":**").nth(1))
            .unwrap_or_default()
            .trim()
            .to_string();
    }

    // A determined index must stay in bounds of the scanned options.
    if let (Some(opts), Some(idx)) = (&options, answer_idx) {
        if idx >= opts.len() {
            answer_idx = None;
        }
    }

    Question {
        question,
        options,
        answer_idx,
        answer_text,
    }
}

/// Collects `a) ...` option texts in scan order. Each option ends at a line
/// break, a bold marker, or the next lettered marker. Zero matches means the
/// block is an open/true-false question.
fn scan_options(region: &str) -> Option<Vec<String>> {
    let marker = Regex::new(r"[a-d]\) ").unwrap();

    let starts: Vec<(usize, usize)> = marker
        .find_iter(region)
        .map(|m| (m.start(), m.end()))
        .collect();

    let mut options = Vec::new();
    for (i, &(_, text_start)) in starts.iter().enumerate() {
        let end = starts
            .get(i + 1)
            .map(|&(next_start, _)| next_start)
            .unwrap_or(region.len());
        let slice = &region[text_start..end];
        let cut = slice
            .find(|c: char| c == '\n' || c == '*')
            .unwrap_or(slice.len());
        let text = slice[..cut].trim();
        if !text.is_empty() {
            options.push(text.to_string());
        }
    }

    if options.is_empty() {
        None
    } else {
        Some(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_payload() {
        let raw = "```json\n[{\"question\":\"Q1\",\"options\":[\"A\",\"B\"],\"answer\":1}]\n```";
        let questions = parse(raw);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Q1");
        assert_eq!(
            questions[0].options,
            Some(vec!["A".to_string(), "B".to_string()])
        );
        assert_eq!(questions[0].answer_idx, Some(1));
        assert_eq!(questions[0].answer_text, "B");
    }

    #[test]
    fn plain_fence_without_tag() {
        let raw = "```\n[{\"question\":\"Q\",\"options\":[\"x\",\"y\"],\"answer\":0}]\n```";
        let questions = parse(raw);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answer_idx, Some(0));
    }

    #[test]
    fn bare_json_array_preserves_order() {
        let raw = r#"[
            {"question":"First","options":["a","b","c"],"answer":2},
            {"question":"Second","options":["d","e"],"answer":"1"},
            {"question":"Third","options":["f","g"],"answer":"nope"}
        ]"#;
        let questions = parse(raw);

        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].question, "First");
        assert_eq!(questions[0].answer_idx, Some(2));
        assert_eq!(questions[0].answer_text, "c");

        // string answers go through a leading-integer parse
        assert_eq!(questions[1].question, "Second");
        assert_eq!(questions[1].answer_idx, Some(1));
        assert_eq!(questions[1].answer_text, "e");

        // unparseable answer degrades, never errors
        assert_eq!(questions[2].answer_idx, None);
        assert_eq!(questions[2].answer_text, "");
    }

    #[test]
    fn out_of_range_json_answer_is_undetermined() {
        let raw = r#"[{"question":"Q","options":["a","b"],"answer":5}]"#;
        let questions = parse(raw);

        assert_eq!(questions[0].answer_idx, None);
        assert_eq!(questions[0].answer_text, "");
    }

    #[test]
    fn json_object_falls_back_to_free_text() {
        // valid JSON, but not an array of question objects
        let questions = parse(r#"{"quiz":"not an array"}"#);

        assert_eq!(questions.len(), 1);
        assert!(questions[0].options.is_none());
        assert_eq!(questions[0].answer_idx, None);
    }

    #[test]
    fn json_array_without_question_shape_falls_back() {
        let questions = parse(r#"[{"text":"missing the expected fields"}]"#);

        assert_eq!(questions.len(), 1);
        assert!(questions[0].options.is_none());
    }

    #[test]
    fn empty_input_yields_no_questions() {
        assert!(parse("").is_empty());
        assert!(parse("   \n  ").is_empty());
        assert!(parse("```json\n```").is_empty());
    }

    #[test]
    fn free_text_single_line_block() {
        let raw = "**1. **What is 2+2?** a) 3 b) 4 **Correct Answer:** b) 4";
        let questions = parse(raw);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "What is 2+2?");
        assert_eq!(
            questions[0].options,
            Some(vec!["3".to_string(), "4".to_string()])
        );
        assert_eq!(questions[0].answer_idx, Some(1));
        assert!(questions[0].answer_text.contains('4'));
    }

    #[test]
    fn free_text_multiline_blocks() {
        let raw = "**1. **Which planet is closest to the sun?**\n\
                   a) Venus\n\
                   b) Mercury\n\
                   c) Mars\n\
                   d) Earth\n\
                   **Correct Answer:** b) Mercury\n\n\
                   **2. **What is H2O?**\n\
                   a) Salt\n\
                   b) Water\n\
                   **Correct Answer:** b) Water";
        let questions = parse(raw);

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "Which planet is closest to the sun?");
        assert_eq!(
            questions[0].options,
            Some(vec![
                "Venus".to_string(),
                "Mercury".to_string(),
                "Mars".to_string(),
                "Earth".to_string()
            ])
        );
        assert_eq!(questions[0].answer_idx, Some(1));
        assert_eq!(questions[0].answer_text, "b) Mercury");

        assert_eq!(questions[1].question, "What is H2O?");
        assert_eq!(questions[1].answer_idx, Some(1));
    }

    #[test]
    fn answer_line_is_not_scanned_as_an_option() {
        let raw = "**1. **Pick one**\na) left\nb) right\n**Correct Answer:** a) left";
        let questions = parse(raw);

        assert_eq!(
            questions[0].options,
            Some(vec!["left".to_string(), "right".to_string()])
        );
    }

    #[test]
    fn block_without_options_is_open_ended() {
        let raw = "**1. **Is the sky blue?**\n**Correct Answer:** True";
        let questions = parse(raw);

        assert_eq!(questions.len(), 1);
        assert!(questions[0].options.is_none());
        // true/false heuristic: "true" maps to the first slot
        assert_eq!(questions[0].answer_idx, Some(0));
        assert_eq!(questions[0].answer_text, "True");

        let questions = parse("**1. **Is water dry?**\n**Correct Answer:** False");
        assert_eq!(questions[0].answer_idx, Some(1));
    }

    #[test]
    fn missing_answer_annotation_degrades() {
        let raw = "**1. **No answer given**\na) one\nb) two";
        let questions = parse(raw);

        assert_eq!(questions[0].answer_idx, None);
        assert_eq!(questions[0].answer_text, "");
    }

    #[test]
    fn answer_letter_beyond_options_is_undetermined() {
        let raw = "**1. **Short list**\na) one\nb) two\n**Correct Answer:** d) four";
        let questions = parse(raw);

        assert_eq!(questions[0].options.as_ref().map(Vec::len), Some(2));
        assert_eq!(questions[0].answer_idx, None);
        // the matched segment is still kept for display
        assert_eq!(questions[0].answer_text, "d) four");
    }

    #[test]
    fn block_without_bold_span_uses_whole_block() {
        let raw = "**1. What is plain text?";
        let questions = parse(raw);

        assert_eq!(questions[0].question, "What is plain text?");
    }
}
