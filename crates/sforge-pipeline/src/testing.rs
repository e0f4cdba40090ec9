//! Test doubles shared by the pipeline test modules.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use sforge_gen::{GenError, GenResult, GenerationBackend};
use sforge_models::{
    AudioAsset, Cut, GlobalStyle, ImageAsset, InspectionData, LayoutPlan, ProgressStatus,
    ProjectId, Scene, SceneAssets, SceneForm, ScenePrompts, SceneScripts, SceneType,
    ScriptDocument, ScriptMeta, VideoAsset, VoiceTone,
};

use crate::cancel::CancelToken;

/// Scriptable in-memory backend recording every call in order.
pub(crate) struct FakeBackend {
    log: Mutex<Vec<String>>,
    video_available: bool,
    video_empty: bool,
    image_failures: AtomicU32,
    quota_on_image_call: Option<u32>,
    image_calls: AtomicU32,
    speech_calls: AtomicU32,
    inspect_always_fails: bool,
    empty_cuts: bool,
    quota_on_cuts: bool,
    cancel_after_speech: Mutex<Option<(u32, CancelToken)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            video_available: true,
            video_empty: false,
            image_failures: AtomicU32::new(0),
            quota_on_image_call: None,
            image_calls: AtomicU32::new(0),
            speech_calls: AtomicU32::new(0),
            inspect_always_fails: false,
            empty_cuts: false,
            quota_on_cuts: false,
            cancel_after_speech: Mutex::new(None),
        }
    }

    /// Report video synthesis as unavailable at probe time.
    pub fn with_video_unavailable(mut self) -> Self {
        self.video_available = false;
        self
    }

    /// Make video generation return "no video produced".
    pub fn with_video_empty(mut self) -> Self {
        self.video_empty = true;
        self
    }

    /// Fail the first `n` image calls with a transient error.
    pub fn with_image_failures(self, n: u32) -> Self {
        self.image_failures.store(n, Ordering::SeqCst);
        self
    }

    /// Fail image call number `call` (1-based) with quota exhaustion.
    pub fn with_quota_on_image_call(mut self, call: u32) -> Self {
        self.quota_on_image_call = Some(call);
        self
    }

    /// Make every inspection call fail with a transient error.
    pub fn with_inspection_failing(mut self) -> Self {
        self.inspect_always_fails = true;
        self
    }

    /// Make narration splitting return zero cuts.
    pub fn with_empty_cuts(mut self) -> Self {
        self.empty_cuts = true;
        self
    }

    /// Make narration splitting fail with quota exhaustion.
    pub fn with_quota_on_cuts(mut self) -> Self {
        self.quota_on_cuts = true;
        self
    }

    /// Cancel `token` once speech call number `call` (1-based) completes.
    pub fn cancel_after_speech_call(self, call: u32, token: CancelToken) -> Self {
        *self.cancel_after_speech.lock().unwrap() = Some((call, token));
        self
    }

    fn record(&self, op: &str) {
        self.log.lock().unwrap().push(op.to_string());
    }

    /// Recorded operation names, in call order.
    pub fn call_log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Number of calls recorded for one operation.
    pub fn calls(&self, op: &str) -> usize {
        self.log.lock().unwrap().iter().filter(|o| *o == op).count()
    }
}

#[async_trait]
impl GenerationBackend for FakeBackend {
    async fn generate_image(&self, prompt: &str, _layout: LayoutPlan) -> GenResult<ImageAsset> {
        self.record("generate_image");
        let call = self.image_calls.fetch_add(1, Ordering::SeqCst) + 1;

        if self.quota_on_image_call == Some(call) {
            return Err(GenError::QuotaExceeded("quota exceeded".to_string()));
        }
        if self.image_failures.load(Ordering::SeqCst) > 0 {
            self.image_failures.fetch_sub(1, Ordering::SeqCst);
            return Err(GenError::Transient("rate limit".to_string()));
        }
        Ok(ImageAsset::new(format!("fake://img/{prompt}")))
    }

    async fn generate_speech(&self, text: &str, _tone: VoiceTone) -> GenResult<AudioAsset> {
        self.record("generate_speech");
        let call = self.speech_calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some((at, token)) = &*self.cancel_after_speech.lock().unwrap() {
            if call == *at {
                token.cancel();
            }
        }
        Ok(AudioAsset::new(format!("fake://audio/{text}")))
    }

    async fn inspect_image(&self, _image: &ImageAsset) -> GenResult<InspectionData> {
        self.record("inspect_image");
        if self.inspect_always_fails {
            return Err(GenError::Transient("server unavailable".to_string()));
        }
        Ok(InspectionData {
            detected_layout: LayoutPlan::Single,
            panel_count: 1,
            description: "one clean panel".to_string(),
        })
    }

    async fn generate_video(
        &self,
        _image: &ImageAsset,
        _motion_strength: f32,
        _duration_secs: f64,
    ) -> GenResult<Option<VideoAsset>> {
        self.record("generate_video");
        if self.video_empty {
            return Ok(None);
        }
        Ok(Some(VideoAsset::new("fake://video/1")))
    }

    async fn video_capability(&self) -> GenResult<bool> {
        self.record("video_capability");
        Ok(self.video_available)
    }

    async fn split_narration(&self, narration: &str, _visual_prompt: &str) -> GenResult<Vec<Cut>> {
        self.record("split_narration");
        if self.quota_on_cuts {
            return Err(GenError::QuotaExceeded("할당량 초과".to_string()));
        }
        if self.empty_cuts {
            return Ok(Vec::new());
        }
        Ok((1..=4)
            .map(|i| Cut::new(i, format!("{narration} (cut {i})"), format!("detail {i}")))
            .collect())
    }
}

fn scene(index: u32, scene_type: SceneType) -> Scene {
    Scene {
        scene_index: index,
        form: SceneForm::Plain { scene_type },
        duration_prediction: 5.0,
        scripts: SceneScripts {
            narration: format!("Narration for scene {index}."),
            tts_text: None,
            subtitles: vec![format!("Subtitle {index}")],
            tone: VoiceTone::Serious,
        },
        prompts: ScenePrompts {
            visual: format!("visual prompt {index}"),
            motion_strength: 0.5,
        },
        planned_layout: LayoutPlan::Single,
        assets: SceneAssets::new(format!("scene_{index:03}")),
        progress: ProgressStatus {
            script_done: true,
            prompt_done: true,
            ..ProgressStatus::default()
        },
        inspection: None,
    }
}

pub(crate) fn video_scene(index: u32) -> Scene {
    scene(index, SceneType::Video)
}

pub(crate) fn image_scene(index: u32) -> Scene {
    scene(index, SceneType::Image)
}

pub(crate) fn document(scenes: Vec<Scene>) -> ScriptDocument {
    ScriptDocument {
        project_id: ProjectId::from("test-project"),
        meta: ScriptMeta {
            title: "Harbor Storm".to_string(),
            description: "A short about a storm".to_string(),
            tags: vec!["weather".to_string()],
            genre: "documentary".to_string(),
            thumbnail_prompt: "harbor under storm clouds".to_string(),
            bgm_mood: "tense".to_string(),
            updated_at: None,
        },
        global_style: GlobalStyle {
            art_style: "cinematic photo".to_string(),
            recurring_character: Some("an old fisherman in a yellow coat".to_string()),
        },
        scenes,
    }
}
