//! HTTP implementation of the generation backend.
//!
//! Thin JSON client over the generation provider's REST surface. Every
//! non-2xx response goes through [`classify_provider_error`] so the caller
//! sees the structured taxonomy, never raw status codes.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sforge_models::{AudioAsset, Cut, ImageAsset, InspectionData, LayoutPlan, VideoAsset, VoiceTone};

use crate::backend::GenerationBackend;
use crate::config::GenConfig;
use crate::error::{classify_provider_error, GenError, GenResult};

/// Generation provider client.
pub struct HttpGenerationBackend {
    http: Client,
    config: GenConfig,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    layout: LayoutPlan,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    url: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    voice: VoiceTone,
}

#[derive(Debug, Deserialize)]
struct SpeechResponse {
    url: String,
    duration_secs: Option<f64>,
}

#[derive(Debug, Serialize)]
struct InspectionRequest<'a> {
    image_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct InspectionResponse {
    layout: String,
    panel_count: u32,
    description: String,
}

#[derive(Debug, Serialize)]
struct VideoRequest<'a> {
    image_url: &'a str,
    motion_strength: f32,
    duration_secs: f64,
}

#[derive(Debug, Deserialize)]
struct VideoResponse {
    /// Absent when the provider produced no video
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CapabilityResponse {
    available: bool,
}

#[derive(Debug, Serialize)]
struct CutsRequest<'a> {
    narration: &'a str,
    visual_prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct CutsResponse {
    cuts: Vec<Cut>,
}

impl HttpGenerationBackend {
    /// Create a new client for the configured provider.
    pub fn new(config: GenConfig) -> GenResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> GenResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_provider_error(status.as_u16(), &text));
        }

        response
            .json()
            .await
            .map_err(|e| GenError::invalid_response(e.to_string()))
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> GenResult<R> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_provider_error(status.as_u16(), &text));
        }

        response
            .json()
            .await
            .map_err(|e| GenError::invalid_response(e.to_string()))
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn generate_image(&self, prompt: &str, layout: LayoutPlan) -> GenResult<ImageAsset> {
        info!(layout = %layout, "Requesting image generation");
        debug!(prompt = %prompt, "Image prompt");

        let response: ImageResponse = self
            .post_json("/v1/images", &ImageRequest { prompt, layout })
            .await?;

        Ok(ImageAsset::new(response.url))
    }

    async fn generate_speech(&self, text: &str, tone: VoiceTone) -> GenResult<AudioAsset> {
        info!(tone = %tone, chars = text.len(), "Requesting speech synthesis");

        let response: SpeechResponse = self
            .post_json("/v1/speech", &SpeechRequest { text, voice: tone })
            .await?;

        let mut audio = AudioAsset::new(response.url);
        audio.duration_secs = response.duration_secs;
        Ok(audio)
    }

    async fn inspect_image(&self, image: &ImageAsset) -> GenResult<InspectionData> {
        info!(url = %image.url, "Requesting image inspection");

        let response: InspectionResponse = self
            .post_json(
                "/v1/inspections",
                &InspectionRequest {
                    image_url: &image.url,
                },
            )
            .await?;

        // Inspectors describe layouts as free text; unknown names degrade to
        // a single panel rather than failing the step.
        let detected_layout = response.layout.parse().unwrap_or(LayoutPlan::Single);
        Ok(InspectionData {
            detected_layout,
            panel_count: response.panel_count,
            description: response.description,
        })
    }

    async fn generate_video(
        &self,
        image: &ImageAsset,
        motion_strength: f32,
        duration_secs: f64,
    ) -> GenResult<Option<VideoAsset>> {
        info!(url = %image.url, motion_strength, "Requesting video generation");

        let response: VideoResponse = self
            .post_json(
                "/v1/videos",
                &VideoRequest {
                    image_url: &image.url,
                    motion_strength,
                    duration_secs,
                },
            )
            .await?;

        Ok(response.url.map(VideoAsset::new))
    }

    async fn video_capability(&self) -> GenResult<bool> {
        let response: CapabilityResponse = self.get_json("/v1/capabilities/video").await?;
        info!(available = response.available, "Video capability probe");
        Ok(response.available)
    }

    async fn split_narration(&self, narration: &str, visual_prompt: &str) -> GenResult<Vec<Cut>> {
        info!(chars = narration.len(), "Requesting narration decomposition");

        let response: CutsResponse = self
            .post_json(
                "/v1/cuts",
                &CutsRequest {
                    narration,
                    visual_prompt,
                },
            )
            .await?;

        Ok(response.cuts)
    }
}
