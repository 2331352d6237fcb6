//! Tier 1: the hosted chat function.
//!
//! `POST {base}/chat` with `{"messages": [...], "user_preferences": [...]}`.
//! The response is read leniently: a missing reply gets a stock apology,
//! missing options get [`DEFAULT_SUGGESTIONS`](crate::heuristics::DEFAULT_SUGGESTIONS),
//! and article entries that do not parse are dropped.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use savvy_core::content::{Article, Catalog, Shuffler};
use savvy_core::conversation::ChatTurn;
use savvy_core::preference::PreferenceSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ResponderError, error_from_response};
use crate::heuristics::{attach_articles, default_suggestions};
use crate::{ResolveRequest, ResolvedReply, Responder, ResolverTier};

pub const MISSING_REPLY_TEXT: &str = "Sorry, I couldn't process your request.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatTurn],
    user_preferences: &'a PreferenceSet,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ChatResponse {
    reply: Option<String>,
    suggested_options: Option<Vec<String>>,
    recommended_articles: Option<Vec<serde_json::Value>>,
}

pub struct RemoteFunctionResponder {
    client: Client,
    base_url: String,
    catalog: Arc<Catalog>,
    shuffler: Arc<dyn Shuffler>,
}

impl RemoteFunctionResponder {
    pub fn new(base_url: impl Into<String>, catalog: Arc<Catalog>, shuffler: Arc<dyn Shuffler>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            catalog,
            shuffler,
        }
    }

    /// Replaces the HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat", self.base_url.trim_end_matches('/'))
    }

    fn into_reply(&self, response: ChatResponse) -> ResolvedReply {
        let reply = response
            .reply
            .unwrap_or_else(|| MISSING_REPLY_TEXT.to_string());
        let suggested_options = response.suggested_options.unwrap_or_else(default_suggestions);

        let supplied: Vec<Article> = response
            .recommended_articles
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Article>(value) {
                Ok(article) => Some(article),
                Err(err) => {
                    warn!("Dropping malformed article from remote reply: {}", err);
                    None
                }
            })
            .collect();
        let recommended_articles =
            attach_articles(&reply, supplied, &self.catalog, self.shuffler.as_ref());

        ResolvedReply {
            reply,
            suggested_options,
            recommended_articles,
            tier: ResolverTier::RemoteFunction,
        }
    }
}

#[async_trait]
impl Responder for RemoteFunctionResponder {
    fn tier(&self) -> ResolverTier {
        ResolverTier::RemoteFunction
    }

    async fn respond(&self, request: &ResolveRequest) -> Result<ResolvedReply, ResponderError> {
        let url = self.endpoint();
        debug!("POST {} ({} turns)", url, request.history.len());

        let body = ChatRequest {
            messages: &request.history,
            user_preferences: &request.preferences,
        };
        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let text = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|err| ResponderError::Decode(format!("remote function reply: {err}")))?;
        Ok(self.into_reply(parsed))
    }
}
