//! Voice prompts, voice suggestions and tone presets

use super::types::ChatMessage;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Known voice prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoicePrompt {
    pub name: &'static str,
    pub description: &'static str,
    pub language: &'static str,
    pub gender: &'static str,
    pub characteristics: &'static [&'static str],
}

impl VoicePrompt {
    pub fn audio_file(&self) -> String {
        format!("{}.wav", self.name)
    }

    pub fn text_file(&self) -> String {
        format!("{}.txt", self.name)
    }
}

const fn voice(
    name: &'static str,
    description: &'static str,
    language: &'static str,
    gender: &'static str,
    characteristics: &'static [&'static str],
) -> VoicePrompt {
    VoicePrompt {
        name,
        description,
        language,
        gender,
        characteristics,
    }
}

pub const KNOWN_VOICES: [VoicePrompt; 15] = [
    voice("belinda", "Female voice with gentle, warm tone", "en", "female", &["warm", "gentle", "friendly", "clear"]),
    voice("en_woman", "Standard female English voice", "en", "female", &["standard", "clear", "neutral"]),
    voice("en_man", "Standard male English voice", "en", "male", &["standard", "clear", "neutral"]),
    voice("chadwick", "Male voice with British accent", "en", "male", &["british", "articulate", "conversational"]),
    voice("mabel", "Female voice with expressive tone", "en", "female", &["expressive", "warm", "engaging"]),
    voice("vex", "Male voice with deep, authoritative tone", "en", "male", &["deep", "authoritative", "clear"]),
    voice("bigbang_amy", "Female voice with nerdy, enthusiastic tone", "en", "female", &["nerdy", "enthusiastic", "energetic"]),
    voice("bigbang_sheldon", "Male voice with intellectual, precise tone", "en", "male", &["intellectual", "precise", "analytical"]),
    voice("shrek_shrek", "Male voice with Scottish accent, grumpy tone", "en", "male", &["scottish", "grumpy", "humorous"]),
    voice("shrek_fiona", "Female voice with princess-like tone", "en", "female", &["princess-like", "elegant", "gentle"]),
    voice("shrek_donkey", "Male voice with energetic, excited tone", "en", "male", &["energetic", "excited", "talkative"]),
    voice("fiftyshades_anna", "Female voice with soft, romantic tone", "en", "female", &["soft", "romantic", "gentle"]),
    voice("broom_salesman", "Male voice with salesman-like, persuasive tone", "en", "male", &["persuasive", "enthusiastic", "salesman-like"]),
    voice("mabaoguo", "Male voice with Sichuan Chinese accent", "zh", "male", &["sichuan", "energetic", "expressive"]),
    voice("zh_man_sichuan", "Male voice with Sichuan Chinese accent", "zh", "male", &["sichuan", "authentic", "expressive"]),
];

/// Suggestions when no voice prompt is installed
const FALLBACK_SUGGESTIONS: [(&str, &str); 5] = [
    ("belinda", "Female voice with warm tone"),
    ("chadwick", "Male voice with deep tone"),
    ("daffy", "Animated character voice"),
    ("elsa", "Female voice with clear articulation"),
    ("jorts", "Male voice with casual tone"),
];

const DEFAULT_SUGGESTIONS: [&str; 2] = ["en_woman", "en_man"];
const MAX_SUGGESTIONS: usize = 3;

/// Keyword rules: (words, voices suggested when any word matches)
const TRANSCRIPT_RULES: [(&[&str], &[&str]); 4] = [
    (&["excited", "amazing", "wonderful", "fantastic"], &["bigbang_amy", "shrek_donkey"]),
    (&["serious", "important", "professional", "business"], &["chadwick", "vex", "en_man"]),
    (&["gentle", "soft", "kind", "sweet"], &["belinda", "fiftyshades_anna", "shrek_fiona"]),
    (&["intellectual", "smart", "science", "theory"], &["bigbang_sheldon", "chadwick"]),
];

const SCENE_RULES: [(&[&str], &[&str]); 3] = [
    (&["warm", "friendly", "casual"], &["belinda", "mabel"]),
    (&["professional", "formal", "business"], &["chadwick", "vex"]),
    (&["energetic", "excited", "dynamic"], &["bigbang_amy", "shrek_donkey"]),
];

fn match_rules(
    text: &str,
    rules: &[(&[&str], &'static [&'static str])],
    out: &mut Vec<&'static str>,
) {
    for (words, voices) in rules {
        if words.iter().any(|w| text.contains(w)) {
            out.extend_from_slice(voices);
        }
    }
}

/// Entry of the `voice_suggestions` response field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceSuggestion {
    pub name: String,
    pub description: String,
}

/// Voice prompts installed under the prompt directory
#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    root: PathBuf,
    available: BTreeMap<&'static str, VoicePrompt>,
}

impl VoiceCatalog {
    /// Scan `root` for `<voice>.wav` and `<voice>.txt` pairs of known voices
    pub fn load(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut available = BTreeMap::new();

        if !root.is_dir() {
            warn!("Voice prompts directory not found: {:?}", root);
            return Self { root, available };
        }

        for prompt in KNOWN_VOICES {
            let audio = root.join(prompt.audio_file());
            let text = root.join(prompt.text_file());
            if audio.is_file() && text.is_file() {
                debug!("Loaded voice prompt: {}", prompt.name);
                available.insert(prompt.name, prompt);
            } else {
                debug!("Voice prompt files not found for: {}", prompt.name);
            }
        }

        info!("Loaded {} voice prompts from {:?}", available.len(), root);
        Self { root, available }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Installed voice names, sorted
    pub fn available_voices(&self) -> Vec<&'static str> {
        self.available.keys().copied().collect()
    }

    pub fn get(&self, name: &str) -> Option<&VoicePrompt> {
        self.available.get(name)
    }

    pub fn is_available(&self, name: &str) -> bool {
        self.available.contains_key(name)
    }

    pub fn voice_audio_path(&self, name: &str) -> Option<PathBuf> {
        self.get(name).map(|p| self.root.join(p.audio_file()))
    }

    /// Reference transcript of a voice prompt, trimmed
    pub async fn voice_text(&self, name: &str) -> Option<String> {
        let prompt = self.get(name)?;
        let path = self.root.join(prompt.text_file());
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Some(text.trim().to_string()),
            Err(e) => {
                warn!("Failed to read voice text for {}: {}", name, e);
                None
            }
        }
    }

    /// Up to three installed voices matching the mood of the text
    pub fn suggest_voices(&self, transcript: &str, scene_prompt: Option<&str>) -> Vec<String> {
        let transcript = transcript.to_lowercase();
        let scene = scene_prompt.unwrap_or_default().to_lowercase();

        let mut candidates = Vec::new();
        match_rules(&transcript, &TRANSCRIPT_RULES, &mut candidates);
        if !scene.is_empty() {
            match_rules(&scene, &SCENE_RULES, &mut candidates);
        }

        let mut suggestions: Vec<String> = Vec::new();
        for name in candidates {
            if self.is_available(name) && !suggestions.iter().any(|s| s == name) {
                suggestions.push(name.to_string());
            }
        }

        if suggestions.is_empty() {
            suggestions = DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
        }
        suggestions.truncate(MAX_SUGGESTIONS);
        suggestions
    }

    /// Installed voices, or a fixed list when none are installed
    pub fn voice_suggestions(&self) -> Vec<VoiceSuggestion> {
        if self.available.is_empty() {
            return FALLBACK_SUGGESTIONS
                .iter()
                .map(|(name, description)| VoiceSuggestion {
                    name: name.to_string(),
                    description: description.to_string(),
                })
                .collect();
        }

        self.available
            .values()
            .map(|p| VoiceSuggestion {
                name: p.name.to_string(),
                description: p.description.to_string(),
            })
            .collect()
    }
}

/// A voice prompt resolved for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceReference {
    pub name: String,
    pub text: String,
    pub audio_path: PathBuf,
}

// Tone presets

struct ToneTemplate {
    name: &'static str,
    system_message: &'static str,
    scene_prompts: [&'static str; 3],
}

const TONES: [ToneTemplate; 5] = [
    ToneTemplate {
        name: "professional",
        system_message: "You are a professional AI assistant designed to convert text into speech with a formal, business-appropriate tone.",
        scene_prompts: [
            "professional business setting with formal speaking style",
            "corporate presentation with clear and articulate pronunciation",
            "professional meeting with confident and authoritative tone",
        ],
    },
    ToneTemplate {
        name: "friendly",
        system_message: "You are a friendly AI assistant designed to convert text into speech with a warm, approachable tone.",
        scene_prompts: [
            "casual conversation with warm and friendly tone",
            "friendly chat with natural and relaxed speaking style",
            "informal setting with approachable and pleasant voice",
        ],
    },
    ToneTemplate {
        name: "storytelling",
        system_message: "You are an AI assistant designed to convert text into speech with engaging storytelling qualities.",
        scene_prompts: [
            "storytelling environment with expressive and dramatic tone",
            "narrative setting with animated and engaging voice",
            "bedtime story with gentle and soothing cadence",
        ],
    },
    ToneTemplate {
        name: "educational",
        system_message: "You are an AI assistant designed to convert text into speech with clear educational delivery.",
        scene_prompts: [
            "educational presentation with clear and articulate speech",
            "teaching environment with patient and explanatory tone",
            "academic setting with precise and informative delivery",
        ],
    },
    ToneTemplate {
        name: "energetic",
        system_message: "You are an AI assistant designed to convert text into speech with high energy and enthusiasm.",
        scene_prompts: [
            "energetic presentation with enthusiastic and excited tone",
            "motivational speech with dynamic and passionate delivery",
            "upbeat environment with lively and animated voice",
        ],
    },
];

pub const DEFAULT_SYSTEM_MESSAGE: &str =
    "You are an AI assistant designed to convert text into speech.";
pub const DEFAULT_SCENE_PROMPT: &str = "quiet indoor setting with warm, friendly tone";
const NEUTRAL_SCENE_PROMPT: &str = "neutral speaking setting with natural voice";

fn tone(name: &str) -> Option<&'static ToneTemplate> {
    TONES.iter().find(|t| t.name == name)
}

pub fn available_tones() -> Vec<&'static str> {
    TONES.iter().map(|t| t.name).collect()
}

/// Scene prompt for a tone preset, extended by `custom`
pub fn scene_prompt_for_tone(name: &str, custom: Option<&str>) -> String {
    let custom = custom.filter(|c| !c.is_empty());
    match (tone(name), custom) {
        (Some(t), Some(custom)) => format!("{}, {}", t.scene_prompts[0], custom),
        (Some(t), None) => t.scene_prompts[0].to_string(),
        (None, Some(custom)) => custom.to_string(),
        (None, None) => NEUTRAL_SCENE_PROMPT.to_string(),
    }
}

pub fn system_message_for_tone(name: &str) -> &'static str {
    tone(name).map_or(DEFAULT_SYSTEM_MESSAGE, |t| t.system_message)
}

/// Conversation handed to the model: system scene, optional voice reference, transcript
pub fn build_messages(
    transcript: &str,
    system_message: &str,
    scene_prompt: &str,
    reference: Option<&VoiceReference>,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(format!(
        "{} {}",
        system_message, scene_prompt
    ))];
    if let Some(reference) = reference {
        messages.push(ChatMessage::user(format!(
            "[SPEAKER:{}] {}",
            reference.name, reference.text
        )));
    }
    messages.push(ChatMessage::user(transcript));
    messages
}
