use anyhow::Result;

use crate::ChatAnswer;

use super::super::Container;

const PREVIEW_CHARS: usize = 80;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, question: String, top_k: usize) -> Result<String> {
        let use_case = self.container.answer_use_case();
        let answer = use_case.execute(&question, Some(top_k)).await?;

        Ok(self.format_answer(&answer))
    }

    fn format_answer(&self, answer: &ChatAnswer) -> String {
        let mut output = format!("{}\n", answer.answer.trim());

        if !answer.chunks.is_empty() {
            output.push_str("\nSources:\n");
            for (i, chunk) in answer.chunks.iter().enumerate() {
                output.push_str(&format!(
                    "  [{}] {} (score: {:.3}) {}\n",
                    i + 1,
                    chunk.source,
                    chunk.score,
                    preview(&chunk.text)
                ));
            }
        }

        output
    }
}

fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    let mut preview: String = line.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > preview.chars().count() {
        preview.push_str("...");
    }
    preview
}
