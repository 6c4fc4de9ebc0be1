//! Retrieval-augmented context
//!
//! Embeds the caller's task, queries the company's vector collection, and
//! folds the hits into a formatted context block plus categorized insight
//! lists. The prompt builders turn that context into the advisor prompt sent
//! upstream.

pub mod embedding;
pub mod ports;
pub mod qdrant;

use std::sync::Arc;

pub use embedding::OllamaEmbedder;
pub use ports::{EmbeddingProvider, IndexPoint, RetrievalError, ScoredPoint, VectorIndex};
pub use qdrant::QdrantHttpIndex;

/// Context assembled from retrieval hits for one query
#[derive(Debug, Clone, Default)]
pub struct CompanyContext {
    pub formatted_context: String,
    pub warnings: Vec<String>,
    pub lessons_learned: Vec<String>,
    pub best_practices: Vec<String>,
    pub common_mistakes: Vec<String>,
    pub bug_clues: Vec<String>,
    pub key_decisions: Vec<String>,
    pub hit_count: usize,
}

impl CompanyContext {
    pub fn is_empty(&self) -> bool {
        self.hit_count == 0
    }
}

pub fn collection_name(company_id: &str) -> String {
    format!("company_{company_id}")
}

pub struct RetrievalService {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl RetrievalService {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Retrieve and aggregate context for a task
    pub async fn get_context(
        &self,
        company_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<CompanyContext, RetrievalError> {
        let vector = self.embedder.embed(query).await?;
        let hits = self
            .index
            .query(&collection_name(company_id), vector, limit)
            .await?;

        tracing::debug!(company_id, hits = hits.len(), "retrieved context");
        Ok(build_context(&hits))
    }
}

/// Fold scored hits into formatted context and categorized lists
pub fn build_context(hits: &[ScoredPoint]) -> CompanyContext {
    let mut context = CompanyContext {
        formatted_context: format_results(hits),
        hit_count: hits.len(),
        ..Default::default()
    };

    for hit in hits {
        let Some(full_data) = hit.payload.get("full_data") else {
            continue;
        };

        collect_field(full_data, "warnings", &mut context.warnings);
        collect_field(full_data, "lessons_learned", &mut context.lessons_learned);
        collect_field(full_data, "best_practices", &mut context.best_practices);
        collect_field(full_data, "common_mistakes", &mut context.common_mistakes);
        // Several loosely named fields all count as bug insight
        for key in ["bug_clues", "bug_related", "bug_connection", "bug_mentions"] {
            collect_field(full_data, key, &mut context.bug_clues);
        }
        collect_field(full_data, "key_decisions", &mut context.key_decisions);
    }

    context
}

/// Render hits as `[source] Sprint N | stage` headers over content blocks
pub fn format_results(hits: &[ScoredPoint]) -> String {
    let mut blocks = Vec::with_capacity(hits.len());

    for hit in hits {
        let payload = &hit.payload;
        let source = payload
            .get("source")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        let content = payload
            .get("content")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        let mut header = format!("[{source}]");
        if let Some(sprint) = payload.get("sprint").filter(|v| !is_blank(v)) {
            header.push_str(&format!(" Sprint {}", scalar_to_string(sprint)));
        }
        if let Some(stage) = payload.get("bug_stage").and_then(|v| v.as_str()) {
            if !stage.is_empty() {
                header.push_str(&format!(" | {stage}"));
            }
        }

        blocks.push(format!("{header}\n{content}"));
    }

    blocks.join("\n\n")
}

fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Number(n) => n.as_i64() == Some(0),
        _ => false,
    }
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Append a field's value(s) to a category list; scalar or array both work
fn collect_field(data: &serde_json::Value, key: &str, into: &mut Vec<String>) {
    match data.get(key) {
        Some(serde_json::Value::Array(items)) => {
            into.extend(items.iter().map(scalar_to_string));
        }
        Some(value) if !is_blank(value) => into.push(scalar_to_string(value)),
        _ => {}
    }
}

const BULLET_CAP: usize = 5;

fn push_section(prompt: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    prompt.push_str(&format!("\n\n{title}:\n"));
    let bullets: Vec<String> = items
        .iter()
        .take(BULLET_CAP)
        .map(|item| format!("- {item}"))
        .collect();
    prompt.push_str(&bullets.join("\n"));
}

/// Build the advisor prompt from the task and retrieved context
pub fn build_contextual_prompt(task: &str, context: &CompanyContext) -> String {
    let mut prompt = format!(
        "You are a technical advisor helping developers avoid past mistakes.\n\n\
         User's task: {task}\n\n\
         Past team context:\n{}\n",
        context.formatted_context
    );

    push_section(&mut prompt, "Past warnings", &context.warnings);
    push_section(&mut prompt, "Lessons learned", &context.lessons_learned);
    push_section(
        &mut prompt,
        "Common mistakes to avoid",
        &context.common_mistakes,
    );
    push_section(&mut prompt, "Bug-related insights", &context.bug_clues);

    prompt.push_str(
        "\n\nBased on the above context, provide:\n\
         1. What to be careful about\n\
         2. Potential pitfalls to avoid\n\
         3. Best practices from past experience\n\
         4. Specific warnings if any patterns match\n\n\
         If nothing relevant is found in past context, say so and proceed with general guidance.",
    );

    prompt
}

/// Prompt used when retrieval produced nothing relevant
pub fn build_fallback_prompt(task: &str) -> String {
    format!(
        "No relevant past context found for this task.\n\n\
         User's task: {task}\n\n\
         Provide general best practices and guidance."
    )
}
