//! Identity watermarking for delivered photos.
//!
//! A delivered copy carries the requester's identity so that a redistributed
//! copy can be traced back to whoever asked for it. The stamp is text only:
//!
//! - **Primary line**: display name if present, else the numeric handle
//! - **Secondary line**: the numeric handle, only under a display name
//!
//! Each line is drawn twice (dark shadow, then light text) and the pristine
//! photo is composited back on top at partial opacity, leaving the stamp
//! visible but translucent.
//!
//! # Configuration Example
//!
//! ```yaml
//! watermark:
//!   primary_font_size: 64
//!   secondary_font_size: 32
//!   dark_color: "#000000"
//!   light_color: "#FFFFFF"
//!   pristine_opacity: 0.7
//! ```

pub mod compositor;
pub mod engine;
pub mod error;
pub mod stamp;
pub mod text;
pub mod text_renderer;

pub use compositor::{blend_layer, Layer, Offset};
pub use engine::{delivery_caption, personalize, DeliveryOutcome, DeliverySettings, WatermarkEngine};
pub use error::WatermarkError;
pub use stamp::{stamp, StampStyle};
pub use text::WatermarkText;
pub use text_renderer::{measure_text, parse_hex_color, render_text, Color, TextRenderOptions};
