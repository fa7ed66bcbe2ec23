use crate::config::Config;
use async_trait::async_trait;
use serenity::all::{ChannelId, CreateMessage};
use serenity::http::Http;
use std::sync::Arc;

/// Delivers a moved link to the destination. The delivery path is chosen
/// once at startup; the pipeline never branches on it per message.
#[async_trait]
pub trait Poster: Send + Sync {
    async fn post(&self, text: &str) -> Result<(), anyhow::Error>;
}

/// Posts through the bot's own REST session.
pub struct DirectPoster {
    http: Arc<Http>,
    channel: ChannelId,
}

impl DirectPoster {
    pub fn new(http: Arc<Http>, channel_id: u64) -> Self {
        Self {
            http,
            channel: ChannelId::new(channel_id),
        }
    }
}

#[async_trait]
impl Poster for DirectPoster {
    async fn post(&self, text: &str) -> Result<(), anyhow::Error> {
        let builder = CreateMessage::new().content(text);
        self.channel.send_message(self.http.as_ref(), builder).await?;
        Ok(())
    }
}

/// Posts by HTTP POST to a pre-shared webhook URL. The JSON body carries the
/// message content; any non-2xx response is an error.
pub struct WebhookPoster {
    client: reqwest::Client,
    url: String,
}

#[derive(serde::Serialize)]
struct WebhookBody<'a> {
    content: &'a str,
}

impl WebhookPoster {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Poster for WebhookPoster {
    async fn post(&self, text: &str) -> Result<(), anyhow::Error> {
        let resp = self
            .client
            .post(&self.url)
            .json(&WebhookBody { content: text })
            .send()
            .await?;
        if !resp.status().is_success() {
            anyhow::bail!("Webhook returned {}", resp.status());
        }
        Ok(())
    }
}

/// Build the posting strategy from configuration.
pub fn build_poster(config: &Config, http: Arc<Http>) -> Box<dyn Poster> {
    match &config.webhook_url {
        Some(url) => {
            tracing::info!("Posting links via webhook");
            Box::new(WebhookPoster::new(url.clone()))
        }
        None => {
            tracing::info!(
                "Posting links directly to channel {}",
                config.destination_channel_id
            );
            Box::new(DirectPoster::new(http, config.destination_channel_id))
        }
    }
}
