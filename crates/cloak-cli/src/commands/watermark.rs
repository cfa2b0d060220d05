//! The `watermark` command: preview a dynamic watermark for a consumer.

use chrono::Utc;

use cloak_core::watermark::{DynamicWatermark, WatermarkContext};

pub fn run(format: &str, principal: &str) {
    let watermark = DynamicWatermark::new(format);
    let context = WatermarkContext::new(principal, Utc::now());
    println!("{}", watermark.text(&context));
}
