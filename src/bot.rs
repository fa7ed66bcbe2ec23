use crate::config::Config;
use crate::pipeline::{IncomingMessage, MovePipeline, Remover};
use async_trait::async_trait;
use serenity::all::{ChannelId, Context, EventHandler, GatewayIntents, Message, MessageId, Ready};
use serenity::http::Http;
use std::sync::Arc;

/// Deletes moved messages through the Discord REST API.
pub struct HttpRemover {
    http: Arc<Http>,
}

impl HttpRemover {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Remover for HttpRemover {
    async fn remove(&self, channel_id: u64, message_id: u64) -> Result<(), anyhow::Error> {
        ChannelId::new(channel_id)
            .delete_message(self.http.as_ref(), MessageId::new(message_id))
            .await?;
        Ok(())
    }
}

struct Handler {
    pipeline: Arc<MovePipeline>,
    destination: ChannelId,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("Connected as {} ({})", ready.user.name, ready.user.id);

        // Surface a broken destination at startup instead of on the first
        // moved link.
        match ctx.http.get_channel(self.destination).await {
            Ok(channel) => {
                let name = channel
                    .guild()
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| self.destination.to_string());
                tracing::info!("Destination channel #{} is reachable", name);
            }
            Err(e) => {
                tracing::warn!(
                    "Cannot access destination channel {}: {}. \
                     Check the bot's View Channel and Send Messages permissions.",
                    self.destination,
                    e
                );
            }
        }
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        let incoming = IncomingMessage {
            message_id: msg.id.get(),
            channel_id: msg.channel_id.get(),
            author_id: msg.author.id.get(),
            author_is_bot: msg.author.bot,
            content: msg.content,
        };
        self.pipeline.handle(&incoming).await;
    }
}

/// Connect to the gateway and run until the client stops. Reconnects and
/// backoff are serenity's responsibility.
pub async fn run(config: &Config, pipeline: Arc<MovePipeline>) -> Result<(), anyhow::Error> {
    let intents = GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler {
        pipeline,
        destination: ChannelId::new(config.destination_channel_id),
    };

    let mut client = serenity::Client::builder(&config.bot_token, intents)
        .event_handler(handler)
        .await?;

    tracing::info!("Connecting to Discord...");
    client.start().await?;
    Ok(())
}
