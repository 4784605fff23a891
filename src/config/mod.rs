// Configuration module

pub mod messages;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::access::AdminIds;
use crate::constants::{
    DEFAULT_BLOCK_DIVISOR, DEFAULT_DARK_COLOR, DEFAULT_FETCH_CACHE_SIZE_MB,
    DEFAULT_FETCH_CACHE_TTL_SECS, DEFAULT_JPEG_QUALITY, DEFAULT_LIGHT_COLOR,
    DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_MAX_PIXELS, DEFAULT_POLL_TIMEOUT_SECS,
    DEFAULT_PRIMARY_FONT_SIZE, DEFAULT_PRISTINE_OPACITY, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SECONDARY_FONT_SIZE, DEFAULT_SECONDARY_LINE_DIVISOR, DEFAULT_SHADOW_OFFSET,
    DEFAULT_TELEGRAM_API_URL,
};
use crate::imaging::DecodeLimits;
use crate::logging::LoggingConfig;
use crate::transport::ChatId;
use crate::watermark::{parse_hex_color, StampStyle};

pub use messages::Messages;

/// Environment variables read by [`Config::from_env`]
pub const TOKEN_ENV: &str = "TELEGRAM_TOKEN";
pub const CHANNEL_ENV: &str = "GROUP_CHAT_ID";
pub const ADMINS_ENV: &str = "ADMIN_ID";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    /// Broadcast destination
    pub channel: ChatId,
    /// Handles allowed to approve publication
    pub admins: AdminIds,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub watermark: WatermarkConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub messages: Messages,
}

fn default_api_url() -> String {
    DEFAULT_TELEGRAM_API_URL.to_string()
}

fn default_poll_timeout_secs() -> u64 {
    DEFAULT_POLL_TIMEOUT_SECS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Long-poll timeout passed to getUpdates
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    /// Per-request HTTP timeout; must exceed the poll timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl TelegramConfig {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: default_api_url(),
            poll_timeout_secs: default_poll_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_block_divisor() -> u32 {
    DEFAULT_BLOCK_DIVISOR
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishConfig {
    /// Broadcast block size is `width / block_divisor`
    #[serde(default = "default_block_divisor")]
    pub block_divisor: u32,
    /// Delete the broadcast post as well when a submission is deleted
    #[serde(default = "default_true")]
    pub retract_post_on_delete: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            block_divisor: default_block_divisor(),
            retract_post_on_delete: true,
        }
    }
}

fn default_primary_font_size() -> f32 {
    DEFAULT_PRIMARY_FONT_SIZE
}

fn default_secondary_font_size() -> f32 {
    DEFAULT_SECONDARY_FONT_SIZE
}

fn default_dark_color() -> String {
    DEFAULT_DARK_COLOR.to_string()
}

fn default_light_color() -> String {
    DEFAULT_LIGHT_COLOR.to_string()
}

fn default_shadow_offset() -> i32 {
    DEFAULT_SHADOW_OFFSET
}

fn default_secondary_line_divisor() -> f32 {
    DEFAULT_SECONDARY_LINE_DIVISOR
}

fn default_pristine_opacity() -> f32 {
    DEFAULT_PRISTINE_OPACITY
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatermarkConfig {
    #[serde(default = "default_primary_font_size")]
    pub primary_font_size: f32,
    #[serde(default = "default_secondary_font_size")]
    pub secondary_font_size: f32,
    /// Shadow pass color (#RRGGBB)
    #[serde(default = "default_dark_color")]
    pub dark_color: String,
    /// Text pass color (#RRGGBB)
    #[serde(default = "default_light_color")]
    pub light_color: String,
    #[serde(default = "default_shadow_offset")]
    pub shadow_offset: i32,
    #[serde(default = "default_secondary_line_divisor")]
    pub secondary_line_divisor: f32,
    /// Opacity of the unstamped copy drawn over the stamped one
    #[serde(default = "default_pristine_opacity")]
    pub pristine_opacity: f32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            primary_font_size: default_primary_font_size(),
            secondary_font_size: default_secondary_font_size(),
            dark_color: default_dark_color(),
            light_color: default_light_color(),
            shadow_offset: default_shadow_offset(),
            secondary_line_divisor: default_secondary_line_divisor(),
            pristine_opacity: default_pristine_opacity(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl WatermarkConfig {
    /// Resolve colors and build the stamp style.
    pub fn to_stamp_style(&self) -> Result<StampStyle, String> {
        let dark = parse_hex_color(&self.dark_color)
            .map_err(|e| format!("watermark.dark_color: {}", e))?;
        let light = parse_hex_color(&self.light_color)
            .map_err(|e| format!("watermark.light_color: {}", e))?;

        let style = StampStyle {
            primary_font_size: self.primary_font_size,
            secondary_font_size: self.secondary_font_size,
            dark,
            light,
            shadow_offset: self.shadow_offset,
            secondary_line_divisor: self.secondary_line_divisor,
            pristine_opacity: self.pristine_opacity,
        };
        style.validate().map_err(|e| e.to_string())?;
        Ok(style)
    }
}

fn default_max_cache_size_mb() -> u64 {
    DEFAULT_FETCH_CACHE_SIZE_MB
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_FETCH_CACHE_TTL_SECS
}

fn default_max_file_size_mb() -> u64 {
    DEFAULT_MAX_FILE_SIZE_MB
}

fn default_max_pixels() -> u64 {
    DEFAULT_MAX_PIXELS
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchConfig {
    /// Total bytes of original photos kept in memory between publish and delivery
    #[serde(default = "default_max_cache_size_mb")]
    pub max_cache_size_mb: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    /// Decoded pixel count above which a photo is rejected
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_cache_size_mb: default_max_cache_size_mb(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_file_size_mb: default_max_file_size_mb(),
            max_pixels: default_max_pixels(),
        }
    }
}

impl FetchConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn max_cache_size_bytes(&self) -> u64 {
        self.max_cache_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_file_size: usize::try_from(self.max_file_size_bytes()).unwrap_or(usize::MAX),
            max_pixels: self.max_pixels,
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    missing.get_or_insert_with(|| var_name.to_string());
                    String::new()
                }
            }
        });

        if let Some(var_name) = missing {
            return Err(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            ));
        }

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Build a configuration from `TELEGRAM_TOKEN`, `GROUP_CHAT_ID` and
    /// `ADMIN_ID`, everything else at defaults.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| format!("Environment variable '{}' is not set", name))
        };

        let token = require(TOKEN_ENV)?;
        let channel = ChatId::from(require(CHANNEL_ENV)?.as_str());
        let admins: AdminIds = require(ADMINS_ENV)?
            .parse()
            .map_err(|e| format!("{}: {}", ADMINS_ENV, e))?;

        Ok(Self {
            telegram: TelegramConfig::with_token(token),
            channel,
            admins,
            publish: PublishConfig::default(),
            watermark: WatermarkConfig::default(),
            fetch: FetchConfig::default(),
            logging: LoggingConfig::default(),
            messages: Messages::default(),
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.telegram.token.trim().is_empty() {
            return Err("telegram.token cannot be empty".to_string());
        }
        if self.telegram.poll_timeout_secs >= self.telegram.request_timeout_secs {
            return Err(format!(
                "telegram.request_timeout_secs ({}) must exceed poll_timeout_secs ({})",
                self.telegram.request_timeout_secs, self.telegram.poll_timeout_secs
            ));
        }
        if let ChatId::Username(name) = &self.channel {
            if !name.starts_with('@') {
                return Err(format!(
                    "channel '{}' must be a numeric chat id or an @username",
                    name
                ));
            }
        }
        if self.admins.is_empty() {
            return Err("admins must contain at least one handle".to_string());
        }
        if self.publish.block_divisor == 0 {
            return Err("publish.block_divisor must be greater than 0".to_string());
        }
        if self.fetch.max_file_size_mb == 0 {
            return Err("fetch.max_file_size_mb must be greater than 0".to_string());
        }
        if self.fetch.max_cache_size_mb < self.fetch.max_file_size_mb {
            return Err(format!(
                "fetch.max_cache_size_mb ({}) must be at least fetch.max_file_size_mb ({})",
                self.fetch.max_cache_size_mb, self.fetch.max_file_size_mb
            ));
        }
        if self.fetch.max_pixels == 0 {
            return Err("fetch.max_pixels must be greater than 0".to_string());
        }
        if !(1..=100).contains(&self.watermark.jpeg_quality) {
            return Err(format!(
                "watermark.jpeg_quality must be within 1..=100, got {}",
                self.watermark.jpeg_quality
            ));
        }

        self.watermark.to_stamp_style()?;
        self.messages.validate()?;

        Ok(())
    }
}
