//! Condition icon download with a blank fallback.

use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage, imageops};
use reqwest::{Client, header::USER_AGENT};
use std::path::Path;
use tracing::{debug, warn};

use crate::Config;

/// Size of the large icon next to the current conditions.
pub const CURRENT_ICON_SIZE: (u32, u32) = (400, 300);

/// Size of the icon on each forecast card.
pub const FORECAST_ICON_SIZE: (u32, u32) = (100, 100);

const BORDER: u32 = 2;
const BORDER_COLOR: Rgba<u8> = Rgba([0xe0, 0xe0, 0xe0, 0xff]);
const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([240, 240, 240, 0]);

#[derive(Debug, Clone)]
pub struct IconLoader {
    http: Client,
    user_agent: String,
}

impl IconLoader {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.icon_timeout())
            .build()
            .context("Failed to build icon HTTP client")?;
        Ok(Self { http, user_agent: config.user_agent.clone() })
    }

    /// Downloads the icon at `url` and fits it to `size`, framed by a thin border.
    ///
    /// Never fails: any network or decode problem yields [`placeholder`] of the
    /// same size.
    pub async fn load_icon(&self, url: &str, size: (u32, u32)) -> RgbaImage {
        match self.try_load(url, size).await {
            Ok(icon) => icon,
            Err(e) => {
                warn!(%url, error = %format!("{e:#}"), "Error loading weather icon");
                placeholder(size.0, size.1)
            }
        }
    }

    async fn try_load(&self, url: &str, (width, height): (u32, u32)) -> Result<RgbaImage> {
        debug!(%url, width, height, "requesting icon");

        let bytes = self
            .http
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .context("icon request failed")?
            .error_for_status()
            .context("icon HTTP error")?
            .bytes()
            .await
            .context("icon read failed")?;

        let img = image::load_from_memory(&bytes)
            .context("icon decode failed")?
            .to_rgba8();

        Ok(fit_with_border(&img, width, height))
    }
}

/// A fully transparent light-grey image.
pub fn placeholder(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, PLACEHOLDER_COLOR)
}

/// Writes `image` as PNG, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create icon directory: {}", parent.display()))?;
    }
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write icon: {}", path.display()))
}

fn fit_with_border(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if width == 0 || height == 0 {
        return placeholder(width, height);
    }
    // Too small for a frame: just scale.
    if width <= BORDER * 2 || height <= BORDER * 2 {
        return imageops::resize(img, width, height, imageops::FilterType::Lanczos3);
    }

    let inner = imageops::resize(
        img,
        width - BORDER * 2,
        height - BORDER * 2,
        imageops::FilterType::Lanczos3,
    );
    let mut framed = RgbaImage::from_pixel(width, height, BORDER_COLOR);
    imageops::replace(&mut framed, &inner, i64::from(BORDER), i64::from(BORDER));
    framed
}
