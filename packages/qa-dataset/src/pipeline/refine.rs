//! Context-bound answer refinement for existing dataset records.

use super::prompts::{format_refine_user_prompt, REFINE_SYSTEM_PROMPT};
use crate::types::{ChatMessage, DatasetRecord};

/// Request texts followed by the response, separated by blank lines.
pub fn refinement_context(record: &DatasetRecord) -> String {
    record
        .request
        .iter()
        .map(|m| m.text.as_str())
        .chain(std::iter::once(record.response.as_str()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// System message carrying the context, then the question as the user turn.
pub fn refinement_messages(record: &DatasetRecord) -> Vec<ChatMessage> {
    let question = record.question().unwrap_or_default();
    vec![
        ChatMessage::system(format!("{}{}", REFINE_SYSTEM_PROMPT, refinement_context(record))),
        ChatMessage::user(format_refine_user_prompt(question)),
    ]
}

/// Same request with the model's answer, or the original response when the
/// model gave nothing.
pub fn refined_record(original: &DatasetRecord, reply: Option<&str>) -> DatasetRecord {
    let response = match reply {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => original.response.clone(),
    };

    DatasetRecord {
        request: original.request.clone(),
        response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_joins_request_and_response() {
        let record = DatasetRecord::new("Кто ушёл?", "Мрак ушёл в лес.");
        assert_eq!(refinement_context(&record), "Кто ушёл?\n\nМрак ушёл в лес.");
    }

    #[test]
    fn test_messages_are_system_then_user() {
        let record = DatasetRecord::new("Кто ушёл?", "Мрак ушёл в лес.");
        let messages = refinement_messages(&record);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].text.ends_with("Кто ушёл?\n\nМрак ушёл в лес."));
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].text.contains("ВОПРОС: Кто ушёл?"));
    }

    #[test]
    fn test_empty_reply_keeps_original() {
        let record = DatasetRecord::new("Q?", "old");
        assert_eq!(refined_record(&record, Some("")).response, "old");
        assert_eq!(refined_record(&record, None).response, "old");
        assert_eq!(refined_record(&record, Some("new")).response, "new");
    }
}
