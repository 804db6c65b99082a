//! Production script and scene models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How the renderer should move into a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransitionHint {
    #[default]
    Cut,
    Fade,
    Dissolve,
    /// Continue the previous shot's framing; used between parts of one split beat.
    SameFraming,
    #[serde(other)]
    Other,
}

/// One beat of the script.
///
/// Only narration and timing fields are interpreted here. Everything else
/// the scripting step produced (visual prompts, characters, quiz data) is
/// carried in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProductionScene {
    pub scene_number: u32,

    pub narration_text: String,

    /// Narration start on the voice-over track (seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_sec: Option<f64>,

    /// Narration end on the voice-over track (seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_sec: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration_sec: Option<f64>,

    #[serde(default)]
    pub transition_hint: TransitionHint,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductionScene {
    /// Create a scene with narration only.
    pub fn new(scene_number: u32, narration_text: impl Into<String>) -> Self {
        Self {
            scene_number,
            narration_text: narration_text.into(),
            start_sec: None,
            end_sec: None,
            estimated_duration_sec: None,
            transition_hint: TransitionHint::default(),
            extra: Map::new(),
        }
    }

    /// Builder-style setter for the timed span.
    pub fn with_span(mut self, start_sec: f64, end_sec: f64) -> Self {
        self.set_span(start_sec, end_sec);
        self
    }

    /// Set start, end and the derived duration together.
    pub fn set_span(&mut self, start_sec: f64, end_sec: f64) {
        self.start_sec = Some(start_sec);
        self.end_sec = Some(end_sec);
        self.estimated_duration_sec = Some(end_sec - start_sec);
    }

    /// The timed span, if both ends are known.
    pub fn span(&self) -> Option<(f64, f64)> {
        match (self.start_sec, self.end_sec) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    pub fn duration_sec(&self) -> Option<f64> {
        self.span().map(|(start, end)| end - start)
    }

    pub fn word_count(&self) -> usize {
        self.narration_text.split_whitespace().count()
    }
}

/// An ordered list of scenes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProductionScript {
    pub scenes: Vec<ProductionScene>,

    #[serde(default)]
    pub total_estimated_duration_sec: f64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductionScript {
    /// Create a script, summing whatever scene durations are known.
    pub fn new(scenes: Vec<ProductionScene>) -> Self {
        let mut script = Self {
            scenes,
            total_estimated_duration_sec: 0.0,
            extra: Map::new(),
        };
        script.recompute_total_duration();
        script
    }

    /// Re-sum `total_estimated_duration_sec` from the scenes.
    pub fn recompute_total_duration(&mut self) {
        self.total_estimated_duration_sec = self
            .scenes
            .iter()
            .filter_map(|s| s.estimated_duration_sec.or_else(|| s.duration_sec()))
            .sum();
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_passthrough_fields_survive_roundtrip() {
        let raw = r#"{
            "scene_number": 4,
            "narration_text": "The owl blinks twice.",
            "visual_prompt": "an owl on a branch at night",
            "characters": ["owl"]
        }"#;
        let scene: ProductionScene = serde_json::from_str(raw).unwrap();
        assert_eq!(scene.transition_hint, TransitionHint::Cut);
        assert_eq!(scene.extra.len(), 2);

        let back = serde_json::to_value(&scene).unwrap();
        assert_eq!(back["visual_prompt"], "an owl on a branch at night");
        assert!(back.get("start_sec").is_none());
    }

    #[test]
    fn test_unknown_transition_hint() {
        let scene: ProductionScene = serde_json::from_str(
            r#"{"scene_number": 1, "narration_text": "Hi", "transition_hint": "whip_pan"}"#,
        )
        .unwrap();
        assert_eq!(scene.transition_hint, TransitionHint::Other);
    }

    #[test]
    fn test_set_span_updates_duration() {
        let scene = ProductionScene::new(1, "one two three").with_span(2.0, 6.5);
        assert_eq!(scene.span(), Some((2.0, 6.5)));
        assert_eq!(scene.estimated_duration_sec, Some(4.5));
        assert_eq!(scene.word_count(), 3);
    }

    #[test]
    fn test_script_total_duration() {
        let script = ProductionScript::new(vec![
            ProductionScene::new(1, "a").with_span(0.0, 4.0),
            ProductionScene::new(2, "b").with_span(4.0, 9.0),
            ProductionScene::new(3, "c"),
        ]);
        assert!((script.total_estimated_duration_sec - 9.0).abs() < 1e-9);
        assert_eq!(script.len(), 3);
    }
}
