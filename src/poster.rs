use std::fmt;

use image::imageops::FilterType;
use reqwest::blocking::Client;

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

/// Poster display box
pub const MAX_WIDTH: u32 = 200;
pub const MAX_HEIGHT: u32 = 300;

pub const NO_POSTER: &str = "No poster available";
pub const LOADING_POSTER: &str = "Loading poster...";

/// Decoded, resized RGBA poster
#[derive(Clone, PartialEq)]
pub struct PosterImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PosterImage {
    /// Bytes per row of `pixels`
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }
}

impl fmt::Debug for PosterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PosterImage")
            .field("url", &self.url)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Something that can download poster bytes
#[cfg_attr(test, mockall::automock)]
pub trait PosterSource: Send + Sync {
    fn download(&self, url: &str) -> AppResult<Vec<u8>>;
}

pub struct HttpPosterSource {
    client: Client,
}

impl HttpPosterSource {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client })
    }
}

impl PosterSource for HttpPosterSource {
    fn download(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        // Anything but 200 counts as a failed download
        if status != reqwest::StatusCode::OK {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}

/// Uniform scale that fits `width`x`height` inside the box, may enlarge
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    let ratio = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    );
    let scaled = |v: u32| ((f64::from(v) * ratio) as u32).max(1);
    (scaled(width), scaled(height))
}

pub fn decode(url: &str, bytes: &[u8]) -> AppResult<PosterImage> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = fit_within(image.width(), image.height(), MAX_WIDTH, MAX_HEIGHT);
    if width == 0 || height == 0 {
        return Err(AppError::InvalidInput(format!("empty image at {}", url)));
    }

    let resized = image.resize_exact(width, height, FilterType::Lanczos3).to_rgba8();
    Ok(PosterImage {
        url: url.to_string(),
        width,
        height,
        pixels: resized.into_raw(),
    })
}

/// Download and decode a poster; `None` means show the placeholder
pub fn fetch(source: &dyn PosterSource, url: Option<&str>) -> Option<PosterImage> {
    let url = match url {
        Some(url) => url,
        None => {
            tracing::debug!("Movie has no poster");
            return None;
        }
    };

    let result = source.download(url).and_then(|bytes| decode(url, &bytes));
    match result {
        Ok(poster) => {
            tracing::debug!(url, width = poster.width, height = poster.height, "Poster loaded");
            Some(poster)
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "Error loading poster");
            None
        }
    }
}
