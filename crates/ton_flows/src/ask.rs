//! The Ask Diano conversational assistant.
//!
//! Stateless per call: the caller resubmits prior turns as history and is
//! responsible for appending the exchange to a chat session afterward. The
//! model may search the blog zero or more times before answering, through a
//! bounded prompt-loop tool protocol.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use ton_content::{AiFeature, ChatMessage, ChatRole, SourceRef};
use ton_core::{GenerateRequest, Message, Role};
use ton_error::{FlowError, TonResult};
use ton_interface::{PostFilter, PostStore, TextModel};

use crate::extraction::{extract_json, parse_json};
use crate::flags::FeatureGate;

/// Upper bound on search_posts rounds before the model must answer.
const MAX_TOOL_ROUNDS: usize = 3;

/// How many posts one search returns, and how long their snippets are.
const SEARCH_RESULT_LIMIT: i64 = 3;
const SNIPPET_CHARS: usize = 200;

const SYSTEM_PROMPT: &str = "You are Diano, the Talk of Nations assistant. You answer reader \
questions about the blog's articles, Kenyan news, and the site itself.\n\
You have one tool. To search published articles, respond with ONLY this JSON:\n\
{\"action\": \"search_posts\", \"query\": \"search terms\"}\n\
You may search several times. When ready to answer, respond with ONLY this JSON:\n\
{\"answer\": \"your answer\", \"sources\": [{\"slug\": \"...\", \"title\": \"...\"}], \
\"clarifying_question\": null}\n\
Cite only articles the search returned. If the question is too vague to answer, \
set clarifying_question instead of guessing.";

/// Input to one assistant turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskInput {
    /// The reader's question
    pub question: String,
    /// Prior turns, oldest first
    pub history: Vec<ChatMessage>,
}

/// A completed assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskOutput {
    /// The assistant's answer
    pub answer: String,
    /// Articles cited in the answer
    #[serde(default)]
    pub sources: Vec<SourceRef>,
    /// Set when the assistant needs more detail before answering
    #[serde(default)]
    pub clarifying_question: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModelReply {
    Search {
        action: String,
        query: String,
    },
    Final(AskOutput),
}

#[derive(Debug, Serialize)]
struct SearchHit {
    slug: String,
    title: String,
    snippet: String,
}

/// Answers reader questions with optional blog search.
pub struct AskDianoFlow {
    model: Arc<dyn TextModel>,
    gate: FeatureGate,
    posts: Arc<dyn PostStore>,
}

impl AskDianoFlow {
    /// Create the flow over a text model, the feature gate, and the post
    /// store backing the search tool.
    pub fn new(model: Arc<dyn TextModel>, gate: FeatureGate, posts: Arc<dyn PostStore>) -> Self {
        Self { model, gate, posts }
    }

    /// Run one assistant turn.
    #[instrument(skip(self, input), fields(history_len = input.history.len()))]
    pub async fn ask(&self, input: &AskInput) -> TonResult<AskOutput> {
        let question = input.question.trim();
        if question.is_empty() {
            return Err(FlowError::validation("question must not be empty").into());
        }
        self.gate.require(AiFeature::AskDiano).await?;

        let mut messages = vec![Message::text(Role::System, SYSTEM_PROMPT)];
        for turn in &input.history {
            let role = match turn.role {
                ChatRole::User => Role::User,
                ChatRole::Model => Role::Assistant,
            };
            messages.push(Message::text(role, turn.content.clone()));
        }
        messages.push(Message::text(Role::User, question));

        for round in 0..=MAX_TOOL_ROUNDS {
            let request = GenerateRequest {
                messages: messages.clone(),
                max_tokens: Some(2048),
                temperature: Some(0.6),
                model: None,
            };
            let response = self
                .model
                .generate(&request)
                .await
                .map_err(|e| FlowError::upstream(e.to_string()))?;
            let text = response
                .text()
                .ok_or_else(|| FlowError::model_output("empty assistant response"))?;
            let reply: ModelReply = parse_json(&extract_json(&text)?)?;

            match reply {
                ModelReply::Search { action, query } => {
                    if action != "search_posts" {
                        return Err(
                            FlowError::model_output(format!("unknown tool action '{action}'"))
                                .into(),
                        );
                    }
                    if round == MAX_TOOL_ROUNDS {
                        return Err(FlowError::model_output(
                            "assistant kept searching instead of answering",
                        )
                        .into());
                    }
                    tracing::debug!(%query, round, "Assistant invoked search_posts");
                    let hits = self.search_posts(&query).await;
                    let hits_json = serde_json::to_string(&hits)
                        .map_err(|e| FlowError::model_output(e.to_string()))?;
                    messages.push(Message::text(Role::Assistant, text));
                    messages.push(Message::text(
                        Role::User,
                        format!("search_posts results:\n{hits_json}"),
                    ));
                }
                ModelReply::Final(mut output) => {
                    if output.answer.trim().is_empty() && output.clarifying_question.is_none() {
                        return Err(FlowError::model_output(
                            "assistant returned neither answer nor clarifying question",
                        )
                        .into());
                    }
                    output.sources.dedup_by(|a, b| a.slug == b.slug);
                    return Ok(output);
                }
            }
        }

        // The loop either returns or errors before falling through.
        Err(FlowError::model_output("assistant produced no final answer").into())
    }

    /// The search tool: up to three matching published posts, or the three
    /// most recent when nothing matches.
    async fn search_posts(&self, query: &str) -> Vec<SearchHit> {
        let matched = self
            .posts
            .list(&PostFilter {
                published_only: true,
                search: Some(query.to_string()),
                ..Default::default()
            })
            .await;
        let posts = if matched.is_empty() {
            self.posts
                .list(&PostFilter {
                    published_only: true,
                    limit: Some(SEARCH_RESULT_LIMIT),
                    ..Default::default()
                })
                .await
        } else {
            matched
        };
        posts
            .iter()
            .take(SEARCH_RESULT_LIMIT as usize)
            .map(|p| SearchHit {
                slug: p.slug.clone(),
                title: p.title.clone(),
                snippet: p.snippet(SNIPPET_CHARS),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::MockModel;
    use ton_interface::SettingsStore;
    use ton_store::MemoryStore;

    fn flow(model: Arc<MockModel>) -> AskDianoFlow {
        let store = Arc::new(MemoryStore::seeded());
        AskDianoFlow::new(model, FeatureGate::new(store.clone()), store)
    }

    fn question(q: &str) -> AskInput {
        AskInput {
            question: q.to_string(),
            history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn direct_answer_needs_one_call() {
        let model = Arc::new(MockModel::scripted(&[
            r#"{"answer": "Karibu! Ask me about our articles.", "sources": [], "clarifying_question": null}"#,
        ]));
        let flow = flow(model.clone());
        let out = flow.ask(&question("Who are you?")).await.unwrap();
        assert_eq!(out.answer, "Karibu! Ask me about our articles.");
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn search_round_feeds_results_back() {
        let model = Arc::new(MockModel::scripted(&[
            r#"{"action": "search_posts", "query": "geothermal"}"#,
            r#"{"answer": "Olkaria supplies nearly half of Kenya's power.",
                "sources": [{"slug": "inside-the-rift-valleys-geothermal-boom",
                             "title": "Inside the Rift Valley's Geothermal Boom"}],
                "clarifying_question": null}"#,
        ]));
        let flow = flow(model.clone());
        let out = flow
            .ask(&question("What did you write about geothermal power?"))
            .await
            .unwrap();
        assert_eq!(model.call_count(), 2);
        assert_eq!(out.sources.len(), 1);
        assert_eq!(out.sources[0].slug, "inside-the-rift-valleys-geothermal-boom");
    }

    #[tokio::test]
    async fn endless_searching_is_cut_off() {
        let search = r#"{"action": "search_posts", "query": "again"}"#;
        let model = Arc::new(MockModel::scripted(&[search, search, search, search, search]));
        let flow = flow(model.clone());
        let err = flow.ask(&question("Anything?")).await.unwrap_err();
        assert!(err.to_string().contains("kept searching"));
        assert_eq!(model.call_count(), MAX_TOOL_ROUNDS + 1);
    }

    #[tokio::test]
    async fn clarifying_question_without_answer_is_valid() {
        let model = Arc::new(MockModel::scripted(&[
            r#"{"answer": "", "sources": [], "clarifying_question": "Which county do you mean?"}"#,
        ]));
        let flow = flow(model);
        let out = flow.ask(&question("What about the budget?")).await.unwrap();
        assert!(out.clarifying_question.is_some());
    }

    #[tokio::test]
    async fn disabled_flag_means_zero_model_calls() {
        let store = Arc::new(MemoryStore::seeded());
        store
            .set_ai_flags(&ton_content::PartialAiFlags {
                ask_diano: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        let model = Arc::new(MockModel::scripted(&[r#"{"answer": "never"}"#]));
        let flow = AskDianoFlow::new(model.clone(), FeatureGate::new(store.clone()), store);
        let err = flow.ask(&question("Hello?")).await.unwrap_err();
        assert!(matches!(
            err.kind(),
            ton_error::TonErrorKind::Flow(f) if f.is_feature_disabled()
        ));
        assert_eq!(model.call_count(), 0);
    }
}
