//! LLM prompts for question generation and answer refinement.
//!
//! Question templates take two placeholders, `{text}` and `{metadata}`, and
//! ask for a JSON object with a single `questions` key.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::info;

use crate::types::{Chunk, PromptRecord, PromptType};

/// Factual who/what/where/when questions.
pub const FACTUAL_QUESTIONS_PROMPT: &str = r#"Ты — эксперт по этой книге. На основе приведённого отрывка сгенерируй 2-3 фактологических вопроса, ответы на которые непосредственно содержатся в тексте.

Отрывок: {text}

Метаданные: {metadata}

Инструкции:
- Вопросы должны быть конкретными и фактологическими (Кто? Что? Где? Когда?)
- Ответ должен однозначно содержаться в отрывке
- Избегай общих и интерпретационных вопросов
- Каждый вопрос должен быть понятен без отрывка

Верни только JSON, без комментариев до или после него:
{
  "questions": ["вопрос1", "вопрос2", "вопрос3"]
}"#;

/// Why/what-for questions about causes and motives.
pub const REASONING_QUESTIONS_PROMPT: &str = r#"Ты — внимательный читатель этой книги. Проанализируй отрывок и составь 2-3 вопроса, требующих понимания причинно-следственных связей и мотивов персонажей.

Текст: {text}

Контекст: {metadata}

Требования к вопросам:
- Спрашивай о причинах событий и мотивах персонажей (Почему? Зачем? С какой целью?)
- Вопросы проверяют понимание логики повествования
- Ответы следуют из содержания отрывка

Верни только JSON, без комментариев до или после него:
{
  "questions": ["вопрос1", "вопрос2"]
}"#;

/// How/which-exactly questions about details and links between events.
pub const DETAILED_UNDERSTANDING_PROMPT: &str = r#"Как специалист по творчеству автора, составь по отрывку вопросы, которые проверяют внимательное прочтение и понимание деталей.

Отрывок из книги: {text}

{metadata}

Составь 2-3 вопроса следующих типов:
- Уточняющие (Каким образом? Что именно? Какой именно?)
- На понимание деталей и контекста
- На связи между событиями

У каждого вопроса должен быть чёткий ответ в тексте.

Верни только JSON, без комментариев до или после него:
{
  "questions": ["вопрос1", "вопрос2", "вопрос3"]
}"#;

/// System message sent ahead of every question-generation prompt.
pub const QUESTION_SYSTEM_PROMPT: &str =
    "Ты составляешь вопросы по тексту книги для обучающего датасета. Отвечай строго в формате JSON.";

/// System message for answer refinement; the context text is appended.
pub const REFINE_SYSTEM_PROMPT: &str = r#"Ты — помощник, который отвечает на вопросы ИСКЛЮЧИТЕЛЬНО на основе предоставленного текста.

ПРАВИЛА:
1. Отвечай ТОЛЬКО на основе информации из предоставленного текста
2. Если в тексте нет информации для ответа на вопрос, скажи "В предоставленном тексте нет информации об этом"
3. Не используй знания вне контекста
4. Не придумывай информацию
5. Будь точным и лаконичным

ТЕКСТ ДЛЯ ОТВЕТА:
"#;

/// User message for answer refinement.
pub const REFINE_USER_PROMPT: &str = r#"ВОПРОС: {question}

ОТВЕТ (на основе только предоставленного текста):"#;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(text|metadata)\}").unwrap();
}

impl PromptType {
    /// Template text for this prompt type.
    pub fn template(&self) -> &'static str {
        match self {
            Self::Factual => FACTUAL_QUESTIONS_PROMPT,
            Self::Reasoning => REASONING_QUESTIONS_PROMPT,
            Self::Detailed => DETAILED_UNDERSTANDING_PROMPT,
        }
    }
}

/// Substitute `{text}` and `{metadata}` in one pass.
///
/// Substituted values are inserted verbatim; braces inside them are never
/// treated as placeholders.
pub fn render_template(template: &str, text: &str, metadata: &str) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "text" => text.to_string(),
            _ => metadata.to_string(),
        })
        .into_owned()
}

/// Prompt records for one chunk using the first `k` templates in order.
pub fn build_prompts(chunk: &Chunk, k: usize) -> Vec<PromptRecord> {
    let metadata = chunk.metadata.render();

    PromptType::ALL
        .iter()
        .take(k)
        .map(|prompt_type| {
            let prompt = render_template(prompt_type.template(), &chunk.text, &metadata);
            PromptRecord::new(prompt, chunk, *prompt_type)
        })
        .collect()
}

/// Prompt records for every chunk, chunk-major.
pub fn build_all_prompts(chunks: &[Chunk], k: usize) -> Vec<PromptRecord> {
    let prompts: Vec<PromptRecord> = chunks.iter().flat_map(|c| build_prompts(c, k)).collect();

    let types: Vec<&str> = PromptType::ALL.iter().take(k).map(|t| t.as_str()).collect();
    info!(prompts = prompts.len(), chunks = chunks.len(), types = ?types, "Built prompts");

    prompts
}

/// Render the refinement user message.
pub fn format_refine_user_prompt(question: &str) -> String {
    REFINE_USER_PROMPT.replace("{question}", question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;

    fn chunk(text: &str) -> Chunk {
        Chunk::new(
            text,
            ChunkMetadata {
                author: "Автор".into(),
                book_name: "Книга".into(),
                part_name: "ЧАСТЬ ПЕРВАЯ".into(),
                chapter_name: "Глава 1".into(),
            },
        )
    }

    #[test]
    fn test_templates_have_both_placeholders() {
        for prompt_type in PromptType::ALL {
            let template = prompt_type.template();
            assert!(template.contains("{text}"));
            assert!(template.contains("{metadata}"));
            assert!(template.contains(r#""questions""#));
        }
    }

    #[test]
    fn test_build_prompts_uses_first_k_in_order() {
        let prompts = build_prompts(&chunk("Текст отрывка."), 2);
        let types: Vec<_> = prompts.iter().map(|p| p.prompt_type).collect();
        assert_eq!(types, vec![PromptType::Factual, PromptType::Reasoning]);

        assert!(prompts[0].prompt.contains("Текст отрывка."));
        assert!(prompts[0].prompt.contains("chapter: Глава 1"));
        assert_eq!(prompts[0].source_chunk, "Текст отрывка.");
        assert_eq!(prompts[0].expected_format, "json");
    }

    #[test]
    fn test_k_above_template_count_is_capped() {
        assert_eq!(build_prompts(&chunk("a."), 10).len(), 3);
        assert!(build_prompts(&chunk("a."), 0).is_empty());
    }

    #[test]
    fn test_n_chunks_times_three() {
        let chunks = vec![chunk("один."), chunk("два."), chunk("три."), chunk("четыре.")];
        let prompts = build_all_prompts(&chunks, 3);
        assert_eq!(prompts.len(), 12);

        for group in prompts.chunks(3) {
            let mut types: Vec<_> = group.iter().map(|p| p.prompt_type).collect();
            types.dedup();
            assert_eq!(types.len(), 3);
        }
    }

    #[test]
    fn test_render_is_verbatim() {
        let rendered = render_template("[{text}] [{metadata}]", "{metadata}", "m");
        assert_eq!(rendered, "[{metadata}] [m]");
    }

    #[test]
    fn test_refine_user_prompt() {
        let prompt = format_refine_user_prompt("Кто?");
        assert!(prompt.starts_with("ВОПРОС: Кто?"));
    }
}
