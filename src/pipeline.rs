use crate::config::Config;
use crate::extract::LinkExtractor;
use crate::ledger::Ledger;
use crate::poster::Poster;
use crate::transform;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Removes a moved message from its source channel.
#[async_trait]
pub trait Remover: Send + Sync {
    async fn remove(&self, channel_id: u64, message_id: u64) -> Result<(), anyhow::Error>;
}

/// A message event as the pipeline sees it.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub message_id: u64,
    pub channel_id: u64,
    pub author_id: u64,
    pub author_is_bot: bool,
    pub content: String,
}

/// The per-message handler: filters by channel and author, extracts links,
/// deletes the original message, posts each new link to the destination and
/// records it in the ledger.
pub struct MovePipeline {
    source_channel_id: u64,
    rewrite_embeds: bool,
    keep_media: bool,
    extractor: LinkExtractor,
    poster: Box<dyn Poster>,
    remover: Box<dyn Remover>,
    ledger: Mutex<Ledger>,
}

impl MovePipeline {
    pub fn new(
        config: &Config,
        poster: Box<dyn Poster>,
        remover: Box<dyn Remover>,
        ledger: Ledger,
    ) -> Self {
        Self {
            source_channel_id: config.source_channel_id,
            rewrite_embeds: config.rewrite_embeds,
            keep_media: config.keep_media,
            extractor: LinkExtractor::new(),
            poster,
            remover,
            ledger: Mutex::new(ledger),
        }
    }

    /// Handle one inbound message event. Every failure is contained and
    /// logged here; nothing propagates to the event loop.
    pub async fn handle(&self, msg: &IncomingMessage) {
        if msg.channel_id != self.source_channel_id {
            return;
        }
        // Skipping bot authors covers our own reposts, so source and
        // destination may overlap without a feedback loop.
        if msg.author_is_bot {
            return;
        }

        let links = self.extractor.extract(&msg.content);
        if links.is_empty() {
            return;
        }

        if self.keep_media && links.iter().any(|l| transform::is_media_url(l)) {
            tracing::info!(
                "Message {} links to direct media, leaving it in place",
                msg.message_id
            );
            return;
        }

        tracing::info!("Found {} link(s) in message {}", links.len(), msg.message_id);

        // The links are still worth moving even if the original could not be
        // deleted.
        if let Err(e) = self.remover.remove(msg.channel_id, msg.message_id).await {
            tracing::warn!("Failed to delete message {}: {}", msg.message_id, e);
        }

        // Check-post-record-persist runs under one lock so concurrent events
        // cannot double-post a link.
        let mut ledger = self.ledger.lock().await;
        for link in &links {
            let outgoing = if self.rewrite_embeds {
                transform::embed_friendly(link)
            } else {
                link.clone()
            };

            if ledger.contains(link) || ledger.contains(&outgoing) {
                tracing::info!("Link already moved, skipping: {}", link);
                continue;
            }

            let text = format!(
                "{}\n(moved from <#{}>, posted by <@{}>)",
                outgoing, msg.channel_id, msg.author_id
            );
            match self.poster.post(&text).await {
                Ok(()) => {
                    ledger.record(&outgoing);
                    if outgoing != *link {
                        // Suppress reposts of the original form too.
                        ledger.record(link);
                    }
                    if let Err(e) = ledger.persist().await {
                        tracing::warn!(
                            "Could not persist ledger to {}: {}",
                            ledger.path().display(),
                            e
                        );
                    }
                    tracing::info!("Moved link: {}", outgoing);
                }
                Err(e) => {
                    tracing::error!("Failed to post link {}: {}", outgoing, e);
                }
            }
        }
    }
}
