// User-facing texts
//
// Every text the bot sends can be overridden from the `messages` section.
// Missing keys fall back to the built-in defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DELETE_BUTTON, DELIVERY_CAPTION, GET_PHOTO_BUTTON, HELP_KEYWORDS, HELP_TEXT, NOT_ADMIN_ERROR,
    NO_PHOTO_ERROR, OPERATION_FAILED, PHOTO_UNAVAILABLE, PUBLISHED_PHOTO_CAPTION,
    PUBLISH_BUTTON, PUBLISH_CONFIRMATION, READY_TO_PUBLISH, VIDEO_ERROR,
};

fn default_help() -> String {
    HELP_TEXT.to_string()
}

fn default_no_photo() -> String {
    NO_PHOTO_ERROR.to_string()
}

fn default_video_only() -> String {
    VIDEO_ERROR.to_string()
}

fn default_not_admin() -> String {
    NOT_ADMIN_ERROR.to_string()
}

fn default_publish_button() -> String {
    PUBLISH_BUTTON.to_string()
}

fn default_delete_button() -> String {
    DELETE_BUTTON.to_string()
}

fn default_ready_to_publish() -> String {
    READY_TO_PUBLISH.to_string()
}

fn default_publish_confirmation() -> String {
    PUBLISH_CONFIRMATION.to_string()
}

fn default_published_caption() -> String {
    PUBLISHED_PHOTO_CAPTION.to_string()
}

fn default_get_photo_button() -> String {
    GET_PHOTO_BUTTON.to_string()
}

fn default_unavailable() -> String {
    PHOTO_UNAVAILABLE.to_string()
}

fn default_delivery_caption() -> String {
    DELIVERY_CAPTION.to_string()
}

fn default_operation_failed() -> String {
    OPERATION_FAILED.to_string()
}

fn default_help_keywords() -> Vec<String> {
    HELP_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

/// Texts shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    /// Reply to /start, /help and greeting keywords
    #[serde(default = "default_help")]
    pub help: String,

    /// Reply to a text message without a photo
    #[serde(default = "default_no_photo")]
    pub no_photo: String,

    /// Reply to a video or animation
    #[serde(default = "default_video_only")]
    pub video_only: String,

    /// Publish attempted by an identity outside the allow-list
    #[serde(default = "default_not_admin")]
    pub not_admin: String,

    #[serde(default = "default_publish_button")]
    pub publish_button: String,

    #[serde(default = "default_delete_button")]
    pub delete_button: String,

    /// Marker line appended to a submission awaiting approval
    #[serde(default = "default_ready_to_publish")]
    pub ready_to_publish: String,

    /// Marker line appended once the submission is published
    #[serde(default = "default_publish_confirmation")]
    pub publish_confirmation: String,

    /// Broadcast caption used when the submission had none
    #[serde(default = "default_published_caption")]
    pub published_caption: String,

    #[serde(default = "default_get_photo_button")]
    pub get_photo_button: String,

    /// Reply to a delivery request for a revoked or unknown photo
    #[serde(default = "default_unavailable")]
    pub unavailable: String,

    /// Delivery caption used when no submission caption survives
    #[serde(default = "default_delivery_caption")]
    pub delivery_caption: String,

    /// Generic notice sent when an operation fails
    #[serde(default = "default_operation_failed")]
    pub operation_failed: String,

    /// Plain texts (case-insensitive) answered with `help`
    #[serde(default = "default_help_keywords")]
    pub help_keywords: Vec<String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            help: default_help(),
            no_photo: default_no_photo(),
            video_only: default_video_only(),
            not_admin: default_not_admin(),
            publish_button: default_publish_button(),
            delete_button: default_delete_button(),
            ready_to_publish: default_ready_to_publish(),
            publish_confirmation: default_publish_confirmation(),
            published_caption: default_published_caption(),
            get_photo_button: default_get_photo_button(),
            unavailable: default_unavailable(),
            delivery_caption: default_delivery_caption(),
            operation_failed: default_operation_failed(),
            help_keywords: default_help_keywords(),
        }
    }
}

impl Messages {
    /// Whether a plain text should be answered with the help message.
    pub fn is_help_keyword(&self, text: &str) -> bool {
        let text = text.trim();
        self.help_keywords
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case(text))
    }

    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("publish_button", &self.publish_button),
            ("delete_button", &self.delete_button),
            ("get_photo_button", &self.get_photo_button),
            ("ready_to_publish", &self.ready_to_publish),
            ("publish_confirmation", &self.publish_confirmation),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(format!("messages.{} cannot be empty", name));
            }
        }
        Ok(())
    }
}
