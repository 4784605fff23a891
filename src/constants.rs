// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// User-facing texts live here too so that configuration can override them
// without the handlers carrying literals.

// =============================================================================
// Telegram defaults
// =============================================================================

/// Default Bot API base URL
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Default long-poll timeout in seconds
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Default HTTP request timeout in seconds (must exceed the poll timeout)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Back-off after a failed poll before retrying, in milliseconds
pub const POLL_ERROR_BACKOFF_MS: u64 = 2000;

/// How long in-flight updates may finish after shutdown, in seconds
pub const SHUTDOWN_DRAIN_SECS: u64 = 30;

// =============================================================================
// Publish defaults
// =============================================================================

/// Broadcast copies use a pixel block of `width / DEFAULT_BLOCK_DIVISOR`
pub const DEFAULT_BLOCK_DIVISOR: u32 = 24;

// =============================================================================
// Watermark defaults
// =============================================================================

/// Font size (px) of the primary identity line
pub const DEFAULT_PRIMARY_FONT_SIZE: f32 = 64.0;

/// Font size (px) of the secondary handle line
pub const DEFAULT_SECONDARY_FONT_SIZE: f32 = 32.0;

/// Shadow color for the dark pass
pub const DEFAULT_DARK_COLOR: &str = "#000000";

/// Text color for the light pass
pub const DEFAULT_LIGHT_COLOR: &str = "#FFFFFF";

/// Drop shadow offset in pixels (down and right)
pub const DEFAULT_SHADOW_OFFSET: i32 = 1;

/// Secondary line sits `primary_line_height / divisor` below the primary line
pub const DEFAULT_SECONDARY_LINE_DIVISOR: f32 = 1.5;

/// Opacity of the pristine copy drawn back over the stamped copy
pub const DEFAULT_PRISTINE_OPACITY: f32 = 0.7;

/// JPEG quality used when re-encoding photos
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

// =============================================================================
// Fetch defaults
// =============================================================================

/// Memory budget of the fetch cache, in megabytes
pub const DEFAULT_FETCH_CACHE_SIZE_MB: u64 = 256;

/// Fetch cache TTL in seconds
pub const DEFAULT_FETCH_CACHE_TTL_SECS: u64 = 600;

/// Maximum accepted photo size in megabytes
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 20;

/// Maximum decoded pixel count (image bomb guard)
pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000;

// =============================================================================
// Control payloads
// =============================================================================

/// Callback payload of the publish button
pub const PUBLISH_ACTION: &str = "publish";

/// Callback payload of the delete button
pub const DELETE_ACTION: &str = "delete";

/// Prefix of the delivery-request payload, followed by the public id
pub const PHOTO_ID_PREFIX: &str = "photo_id:";

// =============================================================================
// User-facing texts
// =============================================================================

pub const HELP_TEXT: &str = "Hello! Send me a photo to start watermarking.";
pub const NO_PHOTO_ERROR: &str =
    "Sorry, I don’t see a photo in your message.\n\nPlease send a photo to start watermarking.";
pub const VIDEO_ERROR: &str = "Sorry, only still photos are supported at this time.";
pub const NOT_ADMIN_ERROR: &str = "Sorry, only pre-approved admins can publish.";
pub const PUBLISH_BUTTON: &str = "✅ Publish";
pub const DELETE_BUTTON: &str = "❌ Delete";
pub const READY_TO_PUBLISH: &str = "Ready to publish";
pub const PUBLISH_CONFIRMATION: &str = "This photo has been published.";
pub const PUBLISHED_PHOTO_CAPTION: &str = "New photo available ✨";
pub const GET_PHOTO_BUTTON: &str = "⬇️ Get it";
pub const PHOTO_UNAVAILABLE: &str = "Sorry, the photo you requested is no longer available.";
pub const DELIVERY_CAPTION: &str = "Here is the photo you requested 📸";
pub const OPERATION_FAILED: &str = "Sorry, something went wrong. Please try again.";

/// Plain texts answered with the help message
pub const HELP_KEYWORDS: &[&str] = &["hi", "hello", "hey", "help"];
