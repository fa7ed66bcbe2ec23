use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not set: {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },
}

/// Process-wide configuration, read once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token.
    pub bot_token: String,
    /// Channel the bot watches for links.
    pub source_channel_id: u64,
    /// Channel moved links are posted to.
    pub destination_channel_id: u64,
    /// When set, links are delivered by HTTP POST to this URL instead of
    /// through the bot's own session.
    pub webhook_url: Option<String>,
    /// Path of the persisted recent-links ledger.
    pub ledger_path: PathBuf,
    /// Maximum number of links the ledger retains.
    pub ledger_capacity: usize,
    /// Rewrite well-known hosts to embed-friendly mirrors before posting.
    pub rewrite_embeds: bool,
    /// Leave messages whose links point at direct media untouched.
    pub keep_media: bool,
}

const DEFAULT_LEDGER_PATH: &str = "logs/recent_links.json";
const DEFAULT_LEDGER_CAPACITY: usize = 100;

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through a variable lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = require(&lookup, "BOT_TOKEN")?;
        let source_channel_id = parse_u64(&lookup, "SOURCE_CHANNEL_ID")?;
        let destination_channel_id = parse_u64(&lookup, "DESTINATION_CHANNEL_ID")?;

        let webhook_url = lookup("WEBHOOK_URL").filter(|v| !v.trim().is_empty());

        let ledger_path = lookup("RECENT_LINKS_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_PATH));

        let ledger_capacity = match lookup("RECENT_LINKS_MAX") {
            Some(raw) => raw.trim().parse::<usize>().ok().filter(|n| *n > 0).ok_or(
                ConfigError::InvalidVar {
                    name: "RECENT_LINKS_MAX",
                    value: raw,
                },
            )?,
            None => DEFAULT_LEDGER_CAPACITY,
        };

        let rewrite_embeds = parse_bool(&lookup, "REWRITE_EMBEDS");
        let keep_media = parse_bool(&lookup, "KEEP_MEDIA");

        Ok(Self {
            bot_token,
            source_channel_id,
            destination_channel_id,
            webhook_url,
            ledger_path,
            ledger_capacity,
            rewrite_embeds,
            keep_media,
        })
    }
}

fn require<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn parse_u64<F>(lookup: &F, name: &'static str) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = require(lookup, name)?;
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidVar { name, value: raw })
}

fn parse_bool<F>(lookup: &F, name: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "token-123"),
            ("SOURCE_CHANNEL_ID", "111"),
            ("DESTINATION_CHANNEL_ID", "222"),
        ]))
        .unwrap();
        assert_eq!(config.bot_token, "token-123");
        assert_eq!(config.source_channel_id, 111);
        assert_eq!(config.destination_channel_id, 222);
        assert!(config.webhook_url.is_none());
        assert_eq!(config.ledger_path, PathBuf::from("logs/recent_links.json"));
        assert_eq!(config.ledger_capacity, 100);
        assert!(!config.rewrite_embeds);
        assert!(!config.keep_media);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "token-123"),
            ("SOURCE_CHANNEL_ID", "111"),
            ("DESTINATION_CHANNEL_ID", "222"),
            ("WEBHOOK_URL", "https://discord.com/api/webhooks/1/abc"),
            ("RECENT_LINKS_FILE", "/var/lib/linkmover/links.json"),
            ("RECENT_LINKS_MAX", "50"),
            ("REWRITE_EMBEDS", "true"),
            ("KEEP_MEDIA", "1"),
        ]))
        .unwrap();
        assert_eq!(
            config.webhook_url.as_deref(),
            Some("https://discord.com/api/webhooks/1/abc")
        );
        assert_eq!(
            config.ledger_path,
            PathBuf::from("/var/lib/linkmover/links.json")
        );
        assert_eq!(config.ledger_capacity, 50);
        assert!(config.rewrite_embeds);
        assert!(config.keep_media);
    }

    #[test]
    fn test_missing_token() {
        let err = Config::from_lookup(lookup_from(&[
            ("SOURCE_CHANNEL_ID", "111"),
            ("DESTINATION_CHANNEL_ID", "222"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("BOT_TOKEN")));
    }

    #[test]
    fn test_invalid_channel_id() {
        let err = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "token-123"),
            ("SOURCE_CHANNEL_ID", "not-a-number"),
            ("DESTINATION_CHANNEL_ID", "222"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name, .. } if name == "SOURCE_CHANNEL_ID"));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "token-123"),
            ("SOURCE_CHANNEL_ID", "111"),
            ("DESTINATION_CHANNEL_ID", "222"),
            ("RECENT_LINKS_MAX", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name, .. } if name == "RECENT_LINKS_MAX"));
    }

    #[test]
    fn test_empty_webhook_ignored() {
        let config = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "token-123"),
            ("SOURCE_CHANNEL_ID", "111"),
            ("DESTINATION_CHANNEL_ID", "222"),
            ("WEBHOOK_URL", "  "),
        ]))
        .unwrap();
        assert!(config.webhook_url.is_none());
    }
}
