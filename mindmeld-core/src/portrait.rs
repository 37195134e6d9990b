//! Character portrait generation.
//!
//! This module provides:
//! - [`PortraitStyle`] - The visual style selector
//! - [`portrait_prompt`] - Turn a raw character description into an image prompt
//! - [`fallback_portrait`] - Curated gallery pick for when generation is unavailable
//! - [`PortraitGenerator`] - Rotator-backed client for the portrait endpoint
//!
//! Portrait generation never fails the user-visible operation: an exhausted
//! key pool, a transport error, or a malformed response all degrade to a
//! curated gallery image chosen to match the description.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::balance::BalanceProbe;
use crate::rotation::KeyRotator;

/// Default portrait-generation endpoint.
pub const DEFAULT_PORTRAIT_URL: &str =
    "https://api.stability.ai/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image";

/// Anime/Ghibli style gallery, slot-aligned with [`TRAIT_BUCKETS`].
const ANIME_GALLERY: [&str; 6] = [
    // Anime girl with blue hair
    "https://cdn.pixabay.com/photo/2023/01/28/20/23/ai-generated-7751688_1280.jpg",
    // Anime boy with dark hair
    "https://cdn.pixabay.com/photo/2023/07/05/18/13/anime-8108344_1280.jpg",
    // Ghibli style girl with brown hair
    "https://cdn.pixabay.com/photo/2023/06/14/09/13/anime-8062868_1280.jpg",
    // Anime character with red hair
    "https://cdn.pixabay.com/photo/2023/07/04/10/30/anime-8105907_1280.jpg",
    // Ghibli style boy with blonde hair
    "https://cdn.pixabay.com/photo/2023/01/11/08/05/anime-7711413_1280.jpg",
    // Anime character with green hair
    "https://cdn.pixabay.com/photo/2023/06/03/15/26/anime-8037886_1280.jpg",
];

/// Realistic style gallery, slot-aligned with [`TRAIT_BUCKETS`].
const REALISTIC_GALLERY: [&str; 6] = [
    // Realistic woman with dark hair
    "https://cdn.pixabay.com/photo/2017/11/06/09/53/tiger-2923186_1280.jpg",
    // Realistic man with beard
    "https://cdn.pixabay.com/photo/2017/08/01/01/33/bearded-vulture-2562852_1280.jpg",
    // Realistic young woman with blonde hair
    "https://cdn.pixabay.com/photo/2022/12/24/21/14/portrait-7676482_1280.jpg",
    // Realistic man with glasses
    "https://cdn.pixabay.com/photo/2019/08/11/07/18/man-4398780_1280.jpg",
    // Realistic woman with red hair
    "https://cdn.pixabay.com/photo/2023/05/31/14/12/woman-8031866_1280.jpg",
    // Realistic older man with gray hair
    "https://cdn.pixabay.com/photo/2016/11/21/16/55/adult-1846436_1280.jpg",
];

/// Keyword buckets mapped to gallery slots, checked in order.
const TRAIT_BUCKETS: [(usize, [&str; 2]); 6] = [
    (0, ["blue hair", "azure"]),
    (1, ["dark hair", "black hair"]),
    (2, ["brown hair", "brunette"]),
    (3, ["red hair", "ginger"]),
    (4, ["blonde", "yellow hair"]),
    (5, ["green hair", "teal"]),
];

/// Visual style for a generated portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortraitStyle {
    Anime,
    Realistic,
}

impl PortraitStyle {
    /// Get the style as a string for wire payloads and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anime => "anime",
            Self::Realistic => "realistic",
        }
    }
}

impl std::fmt::Display for PortraitStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error parsing a portrait style name.
#[derive(Debug, Error)]
#[error("unknown portrait style '{0}', expected 'anime' or 'realistic'")]
pub struct ParseStyleError(String);

impl std::str::FromStr for PortraitStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anime" => Ok(Self::Anime),
            "realistic" => Ok(Self::Realistic),
            other => Err(ParseStyleError(other.to_string())),
        }
    }
}

/// Optimize a raw character description into an image-generation prompt.
pub fn portrait_prompt(description: &str, style: PortraitStyle) -> String {
    let description = description.trim();
    match style {
        PortraitStyle::Anime => format!(
            "Anime/Ghibli style portrait of a character: {}, vibrant colors, \
             expressive eyes, clean lines, Studio Ghibli inspired, high quality illustration",
            description
        ),
        PortraitStyle::Realistic => format!(
            "Realistic portrait of a character: {}, photorealistic, detailed features, \
             expressive face, studio lighting, high resolution",
            description
        ),
    }
}

/// Pick a curated gallery image matching the description.
///
/// The first keyword bucket the description mentions wins its gallery slot;
/// a description with no recognized trait gets a random slot.
pub fn fallback_portrait(description: &str, style: PortraitStyle) -> &'static str {
    let gallery = match style {
        PortraitStyle::Anime => &ANIME_GALLERY,
        PortraitStyle::Realistic => &REALISTIC_GALLERY,
    };

    let normalized = description.to_lowercase();
    for (slot, keywords) in TRAIT_BUCKETS {
        if keywords.iter().any(|k| normalized.contains(k)) {
            return gallery[slot];
        }
    }

    gallery[rand::thread_rng().gen_range(0..gallery.len())]
}

/// Internal error type for a failed portrait request.
///
/// Collapsed to a gallery fallback at the public boundary; callers of
/// [`PortraitGenerator::generate`] never see it.
#[derive(Debug, Error)]
pub enum PortraitError {
    /// No key in the pool can authorize the request.
    #[error("no usable key in the pool")]
    NoUsableKey,

    /// The request could not be sent or the response body not read.
    #[error("portrait request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("portrait endpoint returned {status}")]
    Status { status: reqwest::StatusCode },

    /// The response body was not the expected JSON shape.
    #[error("malformed portrait body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// A well-formed response carried neither a URL nor an image payload.
    #[error("portrait response missing image payload")]
    MissingImage,
}

/// Request body for the portrait endpoint.
#[derive(Debug, Serialize)]
struct PortraitRequest<'a> {
    prompt: &'a str,
    style: &'a str,
}

/// Success body of the portrait endpoint: either a hosted image URL or a
/// base64-encoded image payload.
#[derive(Debug, Deserialize)]
struct PortraitResponse {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    image_b64: Option<String>,
}

/// Client for the remote portrait-generation endpoint.
///
/// Requests are authorized with a key obtained from the owned
/// [`KeyRotator`]; when no key is usable or the request fails, a curated
/// gallery image is served instead so the caller always gets an image
/// reference.
pub struct PortraitGenerator<P: BalanceProbe> {
    rotator: KeyRotator<P>,
    client: reqwest::Client,
    endpoint: String,
}

impl<P: BalanceProbe> PortraitGenerator<P> {
    /// Create a generator over a key rotator and a portrait endpoint URL.
    pub fn new(rotator: KeyRotator<P>, endpoint: impl Into<String>) -> Self {
        Self {
            rotator,
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Access the underlying rotator.
    pub fn rotator(&self) -> &KeyRotator<P> {
        &self.rotator
    }

    /// Generate a portrait for a character description.
    ///
    /// Returns a hosted image URL or a `data:image/png;base64,` URI. Total:
    /// every failure path degrades to a gallery image.
    pub async fn generate(&self, description: &str, style: PortraitStyle) -> String {
        match self.request_portrait(description, style).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("portrait generation failed, serving gallery image: {}", e);
                fallback_portrait(description, style).to_string()
            }
        }
    }

    async fn request_portrait(
        &self,
        description: &str,
        style: PortraitStyle,
    ) -> Result<String, PortraitError> {
        let key = self
            .rotator
            .current_key()
            .await
            .ok_or(PortraitError::NoUsableKey)?;

        let prompt = portrait_prompt(description, style);
        tracing::debug!("requesting {} portrait", style);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(key.expose())
            .json(&PortraitRequest {
                prompt: &prompt,
                style: style.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortraitError::Status { status });
        }

        let body: PortraitResponse = serde_json::from_slice(&response.bytes().await?)?;
        if let Some(url) = body.url {
            return Ok(url);
        }
        if let Some(b64) = body.image_b64 {
            return Ok(format!("data:image/png;base64,{}", b64));
        }
        Err(PortraitError::MissingImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_description_and_style_wording() {
        let anime = portrait_prompt("  a girl with blue hair  ", PortraitStyle::Anime);
        assert!(anime.contains("a girl with blue hair"));
        assert!(anime.contains("Studio Ghibli"));
        assert!(!anime.contains("  a girl"));

        let realistic = portrait_prompt("an old sailor", PortraitStyle::Realistic);
        assert!(realistic.contains("an old sailor"));
        assert!(realistic.contains("photorealistic"));
    }

    #[test]
    fn test_fallback_matches_trait_keywords() {
        assert_eq!(
            fallback_portrait("She had blue hair and a kind smile", PortraitStyle::Anime),
            ANIME_GALLERY[0],
        );
        assert_eq!(
            fallback_portrait("His black hair was unkempt", PortraitStyle::Anime),
            ANIME_GALLERY[1],
        );
        assert_eq!(
            fallback_portrait("A brunette in a long coat", PortraitStyle::Realistic),
            REALISTIC_GALLERY[2],
        );
        assert_eq!(
            fallback_portrait("Ginger curls under a hood", PortraitStyle::Realistic),
            REALISTIC_GALLERY[3],
        );
    }

    #[test]
    fn test_fallback_earlier_bucket_wins() {
        let url = fallback_portrait(
            "Azure eyes and green hair",
            PortraitStyle::Anime,
        );
        assert_eq!(url, ANIME_GALLERY[0]);
    }

    #[test]
    fn test_fallback_unrecognized_description_stays_in_gallery() {
        let url = fallback_portrait("A quiet stranger", PortraitStyle::Realistic);
        assert!(REALISTIC_GALLERY.contains(&url));
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("anime".parse::<PortraitStyle>().unwrap(), PortraitStyle::Anime);
        assert_eq!(
            "Realistic".parse::<PortraitStyle>().unwrap(),
            PortraitStyle::Realistic,
        );
        assert!("watercolor".parse::<PortraitStyle>().is_err());
    }

    #[test]
    fn test_style_display_roundtrip() {
        for style in [PortraitStyle::Anime, PortraitStyle::Realistic] {
            assert_eq!(style.to_string().parse::<PortraitStyle>().unwrap(), style);
        }
    }
}
