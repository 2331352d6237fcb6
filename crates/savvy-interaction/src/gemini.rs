//! Tier 2: direct calls to the Gemini `generateContent` REST API.
//!
//! The key is sent in the `x-goog-api-key` header so it never shows up in
//! URLs or request logs. Gemini has no system role on the v1 endpoint, so
//! the persona is prepended as a `"System: ..."` user turn.

use std::sync::Arc;

use async_trait::async_trait;
use minijinja::{Environment, context};
use reqwest::Client;
use savvy_core::config::GeminiSettings;
use savvy_core::content::{Catalog, Shuffler};
use savvy_core::conversation::{ChatTurn, MessageRole};
use savvy_core::preference::PreferenceSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ResponderError, error_from_response};
use crate::heuristics::{attach_articles, default_suggestions};
use crate::{ResolveRequest, ResolvedReply, Responder, ResolverTier};

const PERSONA_TEMPLATE_NAME: &str = "fashion_persona";

const PERSONA_TEMPLATE: &str = "\
You are a knowledgeable and friendly fashion assistant with access to current fashion trends and data.
{%- if preferences %}
Consider these user preferences: {{ preferences }}
{%- endif %}

Guidelines:
1. Provide specific, actionable fashion advice
2. Reference current trends and seasonal recommendations
3. Consider user preferences when making suggestions
4. Be conversational but professional
5. If suggesting products or styles, explain why they would work
6. For visual requests, describe items in detail

Remember to be precise, helpful, and engaging in your responses.";

/// Responder backed by the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiResponder {
    client: Client,
    api_key: String,
    settings: GeminiSettings,
    catalog: Arc<Catalog>,
    shuffler: Arc<dyn Shuffler>,
}

impl GeminiResponder {
    pub fn new(
        api_key: impl Into<String>,
        settings: GeminiSettings,
        catalog: Arc<Catalog>,
        shuffler: Arc<dyn Shuffler>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            settings,
            catalog,
            shuffler,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    /// Renders the persona, with the preference blob when any are set.
    pub fn system_prompt(&self, preferences: &PreferenceSet) -> Result<String, ResponderError> {
        let blob = if preferences.is_empty() {
            None
        } else {
            Some(
                serde_json::to_string(preferences)
                    .map_err(|err| ResponderError::Prompt(err.to_string()))?,
            )
        };

        let mut env = Environment::new();
        env.add_template(PERSONA_TEMPLATE_NAME, PERSONA_TEMPLATE)
            .map_err(|err| ResponderError::Prompt(err.to_string()))?;
        env.get_template(PERSONA_TEMPLATE_NAME)
            .and_then(|template| template.render(context! { preferences => blob }))
            .map_err(|err| ResponderError::Prompt(err.to_string()))
    }

    fn build_request(&self, request: &ResolveRequest) -> Result<GenerateContentRequest, ResponderError> {
        let system = self.system_prompt(&request.preferences)?;
        let mut contents = vec![Content::text("user", format!("System: {system}"))];
        for turn in &request.history {
            push_turn(&mut contents, turn);
        }

        Ok(GenerateContentRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                top_p: self.settings.top_p,
                max_output_tokens: self.settings.max_output_tokens,
            },
        })
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, ResponderError> {
        let url = self.endpoint();
        debug!("POST {} ({} contents)", url, body.contents.len());

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let text = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|err| ResponderError::Decode(format!("Gemini response: {err}")))?;
        extract_text_response(parsed)
    }
}

/// Appends a history turn, merging consecutive turns from the same speaker.
fn push_turn(contents: &mut Vec<Content>, turn: &ChatTurn) {
    let role = match turn.role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    };
    match contents.last_mut() {
        Some(last) if last.role == role => last.parts.push(Part {
            text: turn.content.clone(),
        }),
        _ => contents.push(Content::text(role, turn.content.clone())),
    }
}

#[async_trait]
impl Responder for GeminiResponder {
    fn tier(&self) -> ResolverTier {
        ResolverTier::Gemini
    }

    async fn respond(&self, request: &ResolveRequest) -> Result<ResolvedReply, ResponderError> {
        let body = self.build_request(request)?;
        let reply = self.send_request(&body).await?;
        let recommended_articles =
            attach_articles(&reply, Vec::new(), &self.catalog, self.shuffler.as_ref());

        Ok(ResolvedReply {
            reply,
            suggested_options: default_suggestions(),
            recommended_articles,
            tier: ResolverTier::Gemini,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: &'static str, text: String) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, ResponderError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ResponderError::EmptyReply)
}
