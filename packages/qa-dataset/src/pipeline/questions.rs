//! Recovering a question list from free-form model output.
//!
//! Models are asked for `{"questions": [...]}` but routinely wrap it in code
//! fences, add prose, use single quotes or fall back to a numbered list. The
//! reply is cleaned once, then an ordered list of pure strategies is tried
//! and the first one that yields a result wins.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::types::{ExtractedQuestions, ParseStatus};

/// One extraction strategy over cleaned text.
pub type Strategy = fn(&str) -> Option<ExtractedQuestions>;

/// Strategies in the order they are attempted.
pub const STRATEGIES: &[Strategy] = &[
    from_full_json,
    from_questions_array,
    from_question_lines,
    from_quoted_strings,
];

/// Keys accepted in place of `questions` on a parsed object, in priority order.
const ALTERNATE_KEYS: &[&str] = &["result", "output", "answers"];

lazy_static! {
    static ref FENCED_BLOCK: Regex = Regex::new(r"(?s)```.*?```").unwrap();
    static ref INLINE_CODE: Regex = Regex::new(r"`([^`]+)`").unwrap();
    static ref BRACED: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
    static ref QUESTIONS_ARRAY: Regex =
        Regex::new(r#""questions"\s*:\s*(\[[\s\S]*?\])"#).unwrap();
    static ref LIST_MARKER: Regex = Regex::new(r"^\s*[\-\d\.\)\:]+\s*").unwrap();
    static ref QUOTED: Regex = Regex::new(r#""([^"]{10,})""#).unwrap();
}

/// Extract questions from a raw model reply. Never fails.
///
/// Returns an empty list with [`ParseStatus::NoExtraction`] when no strategy
/// matches.
pub fn extract_questions(raw: &str) -> ExtractedQuestions {
    let text = strip_code_fences(raw);

    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(&text))
        .unwrap_or_else(|| ExtractedQuestions::empty(ParseStatus::NoExtraction))
}

/// Unwrap fenced and inline code spans, keeping their content, and trim.
///
/// A fence's language tag is kept as the first line of the unwrapped block.
pub fn strip_code_fences(text: &str) -> String {
    let unfenced = FENCED_BLOCK.replace_all(text, |caps: &Captures| {
        caps[0].trim_matches('`').to_string()
    });
    let unquoted = INLINE_CODE.replace_all(&unfenced, "$1");
    unquoted.trim().to_string()
}

/// Parse the largest brace-delimited span that is valid JSON.
///
/// A non-empty `questions` list wins; otherwise a list under one of the
/// alternate keys is accepted.
pub fn from_full_json(text: &str) -> Option<ExtractedQuestions> {
    let mut candidates: Vec<&str> = BRACED.find_iter(text).map(|m| m.as_str()).collect();
    candidates.sort_by_key(|c| std::cmp::Reverse(c.len()));

    let object = candidates
        .into_iter()
        .find_map(|candidate| serde_json::from_str::<Value>(candidate).ok())?;
    let object = object.as_object()?;

    if let Some(Value::Array(items)) = object.get("questions") {
        if !items.is_empty() {
            return Some(ExtractedQuestions::new(
                stringify_items(items),
                ParseStatus::ParsedFullJson,
            ));
        }
    }

    ALTERNATE_KEYS.iter().find_map(|key| match object.get(*key) {
        Some(Value::Array(items)) => Some(ExtractedQuestions::new(
            stringify_items(items),
            ParseStatus::for_json_key(key)?,
        )),
        _ => None,
    })
}

/// Parse the array following a literal `"questions":` key.
///
/// Retries once with single quotes swapped for double quotes.
pub fn from_questions_array(text: &str) -> Option<ExtractedQuestions> {
    let array = QUESTIONS_ARRAY.captures(text)?.get(1)?.as_str();

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(array) {
        return Some(ExtractedQuestions::new(
            stringify_items(&items),
            ParseStatus::ParsedQuestionsArray,
        ));
    }

    match serde_json::from_str::<Value>(&array.replace('\'', "\"")) {
        Ok(Value::Array(items)) => Some(ExtractedQuestions::new(
            stringify_items(&items),
            ParseStatus::ParsedQuestionsArrayAfterReplace,
        )),
        _ => None,
    }
}

/// Lines ending in `?`, with leading list markers removed.
///
/// A bare `\r` also ends a line.
pub fn from_question_lines(text: &str) -> Option<ExtractedQuestions> {
    let questions: Vec<String> = text
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.ends_with('?'))
        .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
        .collect();

    if questions.is_empty() {
        return None;
    }
    Some(ExtractedQuestions::new(
        questions,
        ParseStatus::ExtractedLinesEndingQ,
    ))
}

/// Double-quoted strings longer than ten characters that end in `?`.
pub fn from_quoted_strings(text: &str) -> Option<ExtractedQuestions> {
    let questions: Vec<String> = QUOTED
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|q| q.chars().count() > 10 && q.ends_with('?'))
        .map(str::to_string)
        .collect();

    if questions.is_empty() {
        return None;
    }
    Some(ExtractedQuestions::new(
        questions,
        ParseStatus::ExtractedQuotedQuestions,
    ))
}

fn stringify_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string().trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn q(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_json() {
        let result = extract_questions(r#"{"questions": ["A?", "B?"]}"#);
        assert_eq!(result.questions, q(&["A?", "B?"]));
        assert_eq!(result.status, ParseStatus::ParsedFullJson);
    }

    #[test]
    fn test_fenced_json() {
        let result = extract_questions("```json\n{\"questions\": [\"A?\"]}\n```");
        assert_eq!(result.questions, q(&["A?"]));
        assert_eq!(result.status, ParseStatus::ParsedFullJson);
    }

    #[test]
    fn test_single_quoted_array() {
        let result = extract_questions(r#"Here: "questions": ['A?', 'B?']"#);
        assert_eq!(result.questions, q(&["A?", "B?"]));
        assert_eq!(result.status, ParseStatus::ParsedQuestionsArrayAfterReplace);
    }

    #[test]
    fn test_numbered_lines() {
        let result = extract_questions("1. What is X?\n2. Why Y?");
        assert_eq!(result.questions, q(&["What is X?", "Why Y?"]));
        assert_eq!(result.status, ParseStatus::ExtractedLinesEndingQ);
    }

    #[test]
    fn test_nothing_to_extract() {
        let result = extract_questions("no questions here.");
        assert!(result.questions.is_empty());
        assert_eq!(result.status, ParseStatus::NoExtraction);
    }

    #[test]
    fn test_prose_around_json_and_trimmed_items() {
        let raw = "Вот вопросы:\n{\"questions\": [\"  Кто пришёл?  \", \"Зачем?\"]}\nУдачи!";
        let result = extract_questions(raw);
        assert_eq!(result.questions, q(&["Кто пришёл?", "Зачем?"]));
        assert_eq!(result.status, ParseStatus::ParsedFullJson);
    }

    #[test]
    fn test_alternate_keys() {
        let result = from_full_json(r#"{"output": ["X?", 42]}"#).unwrap();
        assert_eq!(result.questions, q(&["X?", "42"]));
        assert_eq!(result.status, ParseStatus::ParsedJsonKeyOutput);

        let result = from_full_json(r#"{"questions": [], "answers": ["Y?"]}"#).unwrap();
        assert_eq!(result.status, ParseStatus::ParsedJsonKeyAnswers);

        let result = from_full_json(r#"{"result": ["Z?"], "answers": ["Y?"]}"#).unwrap();
        assert_eq!(result.status, ParseStatus::ParsedJsonKeyResult);
    }

    #[test]
    fn test_non_string_items_use_compact_json() {
        let result = from_full_json(r#"{"questions": [{"q": "A?"}, "B?"]}"#).unwrap();
        assert_eq!(result.questions, q(&[r#"{"q":"A?"}"#, "B?"]));
    }

    #[test]
    fn test_empty_questions_list_falls_through() {
        // the object parses but carries nothing usable; the array strategy
        // then accepts the empty list
        let result = extract_questions(r#"{"questions": []}"#);
        assert!(result.questions.is_empty());
        assert_eq!(result.status, ParseStatus::ParsedQuestionsArray);
    }

    #[test]
    fn test_broken_json_uses_array_regex() {
        let raw = r#"{"questions": ["A?", "B?"], "note": }"#;
        let result = extract_questions(raw);
        assert_eq!(result.questions, q(&["A?", "B?"]));
        assert_eq!(result.status, ParseStatus::ParsedQuestionsArray);
    }

    #[test]
    fn test_quoted_strings() {
        let raw = r#"I think "Who rescued the village?" and "short?" and "A long statement." work"#;
        let result = extract_questions(raw);
        assert_eq!(result.questions, q(&["Who rescued the village?"]));
        assert_eq!(result.status, ParseStatus::ExtractedQuotedQuestions);
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("  `inline` text "), "inline text");
        assert_eq!(strip_code_fences("```\nbody\n```"), "body");
        assert_eq!(strip_code_fences("```json\n{}\n```"), "json\n{}");
    }

    #[test]
    fn test_list_marker_cleanup() {
        let result = from_question_lines("- Кто?\n3) Где?\n: Когда?\nне вопрос").unwrap();
        assert_eq!(result.questions, q(&["Кто?", "Где?", "Когда?"]));
    }

    #[test]
    fn test_bare_carriage_return_separates_lines() {
        let result = extract_questions("Кто пришёл?\rЗачем он пришёл?");
        assert_eq!(result.questions, q(&["Кто пришёл?", "Зачем он пришёл?"]));
        assert_eq!(result.status, ParseStatus::ExtractedLinesEndingQ);

        let mixed = from_question_lines("1. Кто?\r\n2. Где?\r3. Когда?").unwrap();
        assert_eq!(mixed.questions, q(&["Кто?", "Где?", "Когда?"]));
    }

    proptest! {
        #[test]
        fn prop_extraction_never_panics(raw in r#"[{}\[\]"'`:,?a-zA-Zа-я0-9 \n\r\\]{0,200}"#) {
            let result = extract_questions(&raw);
            if result.questions.is_empty() {
                prop_assert!(matches!(
                    result.status,
                    ParseStatus::NoExtraction
                        | ParseStatus::ParsedQuestionsArray
                        | ParseStatus::ParsedQuestionsArrayAfterReplace
                        | ParseStatus::ParsedJsonKeyResult
                        | ParseStatus::ParsedJsonKeyOutput
                        | ParseStatus::ParsedJsonKeyAnswers
                ));
            }
        }

        #[test]
        fn prop_arbitrary_text_never_panics(raw in any::<String>()) {
            let _ = extract_questions(&raw);
        }
    }
}
