//! Built-in token catalog, templates, and banned-term list used until a
//! saved configuration replaces them.

use crate::template::{ModuleId, PromptTemplate, TemplateSlot};
use crate::token::{CategoryMeta, InclusionRule, Token, TokenCategory, TokenOption};

/// Version stamp written into persisted config documents.
pub const CONFIG_VERSION: u32 = 1;

/// Token ids whose option values are shot-framing abbreviations.
pub const SHOT_FRAMING_TOKEN_IDS: [&str; 2] = ["shotSize", "cameraAngle"];

/// Expands shot-framing abbreviations into the wording generation models
/// respond to. Unknown values fall back to lowercased, de-hyphenated text.
pub fn expand_shot_abbreviation(value: &str) -> String {
    match value {
        "ECU" => "extreme close-up".to_string(),
        "BCU" => "big close-up".to_string(),
        "CU" => "close-up".to_string(),
        "MCU" => "medium close-up".to_string(),
        "MS" => "medium shot".to_string(),
        "MCS" => "medium cowboy shot".to_string(),
        "KNEE" => "knee shot".to_string(),
        "MWS" => "medium wide shot".to_string(),
        "FS" => "full shot".to_string(),
        "WS" => "wide shot".to_string(),
        "EWS" => "extreme wide shot".to_string(),
        "EST" => "establishing shot".to_string(),
        "OTS" => "over-the-shoulder shot".to_string(),
        "TWO" => "two shot".to_string(),
        other => other.to_lowercase().replace('-', " "),
    }
}

pub fn default_banned_terms() -> Vec<String> {
    [
        "ugly",
        "deformed",
        "disfigured",
        "mutated",
        "gore",
        "watermark",
        "low quality",
        "blurry",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}

pub fn default_categories() -> Vec<CategoryMeta> {
    let meta = |id, label: &str, description: &str| CategoryMeta {
        id,
        label: label.to_string(),
        description: description.to_string(),
    };
    vec![
        meta(
            TokenCategory::Cinematography,
            "Cinematography",
            "Framing, angles, and lens language",
        ),
        meta(
            TokenCategory::Content,
            "Content",
            "Who and what appears in the frame",
        ),
        meta(
            TokenCategory::VisualLook,
            "Visual Look",
            "Lighting, mood, and color treatment",
        ),
        meta(
            TokenCategory::Motion,
            "Motion",
            "Camera and subject movement for video",
        ),
        meta(
            TokenCategory::Audio,
            "Audio",
            "Dialog, voiceover, ambience, and music",
        ),
        meta(
            TokenCategory::Style,
            "Style",
            "Separate style channel wrapped around the base prompt",
        ),
        meta(
            TokenCategory::MusicLab,
            "Music Lab",
            "Track-level descriptors for audio generation",
        ),
        meta(
            TokenCategory::Storybook,
            "Storybook",
            "Illustrated-page descriptors",
        ),
    ]
}

fn options(pairs: &[(&str, &str)]) -> Vec<TokenOption> {
    pairs
        .iter()
        .map(|&(value, label)| TokenOption::new(value, label))
        .collect()
}

pub fn default_tokens() -> Vec<Token> {
    let mut tokens = Vec::new();

    let mut shot_size = Token::new(
        "shotSize",
        "Shot Size",
        TokenCategory::Cinematography,
        InclusionRule::Always,
    );
    shot_size.default_value = "MS".to_string();
    shot_size.options = options(&[
        ("ECU", "Extreme Close-Up"),
        ("BCU", "Big Close-Up"),
        ("CU", "Close-Up"),
        ("MCU", "Medium Close-Up"),
        ("MS", "Medium Shot"),
        ("MCS", "Medium Cowboy Shot"),
        ("KNEE", "Knee Shot"),
        ("MWS", "Medium Wide Shot"),
        ("FS", "Full Shot"),
        ("WS", "Wide Shot"),
        ("EWS", "Extreme Wide Shot"),
        ("EST", "Establishing Shot"),
        ("OTS", "Over-The-Shoulder"),
        ("TWO", "Two Shot"),
    ]);
    tokens.push(shot_size);

    let mut camera_angle = Token::new(
        "cameraAngle",
        "Camera Angle",
        TokenCategory::Cinematography,
        InclusionRule::Optional,
    );
    camera_angle.options = options(&[
        ("eye-level", "Eye Level"),
        ("low-angle", "Low Angle"),
        ("high-angle", "High Angle"),
        ("dutch-angle", "Dutch Angle"),
        ("overhead", "Overhead"),
    ]);
    tokens.push(camera_angle);

    let mut subject = Token::new(
        "subject",
        "Subject",
        TokenCategory::Content,
        InclusionRule::Always,
    );
    subject.allow_custom = true;
    subject.required = true;
    tokens.push(subject);

    let mut action = Token::new(
        "action",
        "Action",
        TokenCategory::Content,
        InclusionRule::Optional,
    );
    action.allow_custom = true;
    tokens.push(action);

    let mut location = Token::new(
        "location",
        "Location",
        TokenCategory::Content,
        InclusionRule::Optional,
    );
    location.allow_custom = true;
    tokens.push(location);

    let mut lighting = Token::new(
        "lighting",
        "Lighting",
        TokenCategory::VisualLook,
        InclusionRule::Optional,
    );
    lighting.options = options(&[
        ("golden-hour", "Golden Hour"),
        ("high-key", "High Key"),
        ("low-key", "Low Key"),
        ("neon", "Neon"),
        ("candlelit", "Candlelit"),
    ]);
    tokens.push(lighting);

    let mut mood = Token::new(
        "mood",
        "Mood",
        TokenCategory::VisualLook,
        InclusionRule::ConditionalOnNoStyle,
    );
    mood.options = options(&[
        ("serene", "Serene"),
        ("tense", "Tense"),
        ("whimsical", "Whimsical"),
        ("melancholic", "Melancholic"),
    ]);
    tokens.push(mood);

    let mut color_palette = Token::new(
        "colorPalette",
        "Color Palette",
        TokenCategory::VisualLook,
        InclusionRule::ConditionalOnNoStyle,
    );
    color_palette.options = options(&[
        ("warm-tones", "Warm Tones"),
        ("cool-tones", "Cool Tones"),
        ("monochrome", "Monochrome"),
        ("pastel", "Pastel"),
    ]);
    tokens.push(color_palette);

    let mut style_prefix = Token::new(
        "stylePrefix",
        "Style Prefix",
        TokenCategory::Style,
        InclusionRule::Separate,
    );
    style_prefix.allow_custom = true;
    tokens.push(style_prefix);

    let mut style_prompt = Token::new(
        "stylePrompt",
        "Style Prompt",
        TokenCategory::Style,
        InclusionRule::Separate,
    );
    style_prompt.allow_custom = true;
    tokens.push(style_prompt);

    let mut style_suffix = Token::new(
        "styleSuffix",
        "Style Suffix",
        TokenCategory::Style,
        InclusionRule::Separate,
    );
    style_suffix.allow_custom = true;
    tokens.push(style_suffix);

    let mut camera_movement = Token::new(
        "cameraMovement",
        "Camera Movement",
        TokenCategory::Motion,
        InclusionRule::Additive,
    );
    camera_movement.default_value = "static".to_string();
    camera_movement.options = options(&[
        ("static", "Static"),
        ("pan-left", "Pan Left"),
        ("pan-right", "Pan Right"),
        ("dolly-in", "Dolly In"),
        ("dolly-out", "Dolly Out"),
        ("crane-up", "Crane Up"),
        ("handheld", "Handheld"),
        ("tracking", "Tracking"),
    ]);
    tokens.push(camera_movement);

    let mut subject_motion = Token::new(
        "subjectMotion",
        "Subject Motion",
        TokenCategory::Motion,
        InclusionRule::Additive,
    );
    subject_motion.default_value = "static".to_string();
    subject_motion.allow_custom = true;
    subject_motion.options = options(&[
        ("static", "Static"),
        ("walking", "Walking"),
        ("running", "Running"),
        ("turning", "Turning"),
        ("gesturing", "Gesturing"),
    ]);
    tokens.push(subject_motion);

    let mut dialog = Token::new(
        "dialog",
        "Dialog",
        TokenCategory::Audio,
        InclusionRule::Additive,
    );
    dialog.default_value = "none".to_string();
    dialog.allow_custom = true;
    tokens.push(dialog);

    let mut voiceover = Token::new(
        "voiceover",
        "Voiceover",
        TokenCategory::Audio,
        InclusionRule::Additive,
    );
    voiceover.default_value = "none".to_string();
    voiceover.allow_custom = true;
    tokens.push(voiceover);

    let mut ambient = Token::new(
        "ambient",
        "Ambient Sound",
        TokenCategory::Audio,
        InclusionRule::Additive,
    );
    ambient.default_value = "silence".to_string();
    ambient.options = options(&[
        ("silence", "Silence"),
        ("rain", "Rain"),
        ("wind", "Wind"),
        ("crowd", "Crowd"),
        ("birdsong", "Birdsong"),
    ]);
    tokens.push(ambient);

    let mut music = Token::new(
        "music",
        "Music",
        TokenCategory::Audio,
        InclusionRule::Additive,
    );
    music.default_value = "none".to_string();
    music.options = options(&[
        ("none", "None"),
        ("orchestral", "Orchestral"),
        ("synthwave", "Synthwave"),
        ("jazz", "Jazz"),
        ("ambient-pads", "Ambient Pads"),
    ]);
    tokens.push(music);

    let mut genre = Token::new(
        "genre",
        "Genre",
        TokenCategory::MusicLab,
        InclusionRule::Always,
    );
    genre.allow_custom = true;
    genre.options = options(&[
        ("synthwave", "Synthwave"),
        ("techno", "Techno"),
        ("lofi-hip-hop", "Lofi Hip Hop"),
        ("orchestral", "Orchestral"),
    ]);
    tokens.push(genre);

    let mut vocal_style = Token::new(
        "vocalStyle",
        "Vocal Style",
        TokenCategory::MusicLab,
        InclusionRule::Optional,
    );
    vocal_style.options = options(&[
        ("female-vocals", "Female Vocals"),
        ("male-vocals", "Male Vocals"),
        ("instrumental", "Instrumental"),
    ]);
    tokens.push(vocal_style);

    let mut art_style = Token::new(
        "artStyle",
        "Art Style",
        TokenCategory::Storybook,
        InclusionRule::Always,
    );
    art_style.default_value = "watercolor".to_string();
    art_style.options = options(&[
        ("watercolor", "Watercolor"),
        ("paper-cutout", "Paper Cutout"),
        ("crayon", "Crayon"),
        ("gouache", "Gouache"),
    ]);
    tokens.push(art_style);

    tokens
}

pub fn default_templates() -> Vec<PromptTemplate> {
    let mut storyboard = PromptTemplate::new(
        "tpl-storyboard-cinematic",
        ModuleId::Storyboard,
        "Cinematic Shot",
    );
    storyboard.slots = vec![
        TemplateSlot::new("sb-shot-size", "shotSize").with_suffix(" of "),
        TemplateSlot::new("sb-subject", "subject"),
        TemplateSlot::new("sb-action", "action").with_conditional_prefix(", "),
        TemplateSlot::new("sb-location", "location").with_conditional_prefix(" in "),
        TemplateSlot::new("sb-lighting", "lighting").with_conditional_prefix(", "),
        TemplateSlot::new("sb-mood", "mood").with_conditional_prefix(", "),
        TemplateSlot::new("sb-color", "colorPalette").with_conditional_prefix(", "),
        TemplateSlot::new("sb-style", "stylePrompt"),
        TemplateSlot::new("sb-camera-move", "cameraMovement"),
    ];

    let mut shot_creator = PromptTemplate::new(
        "tpl-shot-creator-quick",
        ModuleId::ShotCreator,
        "Quick Shot",
    );
    shot_creator.slots = vec![
        TemplateSlot::new("sc-shot-size", "shotSize").with_suffix(" of "),
        TemplateSlot::new("sc-subject", "subject"),
        TemplateSlot::new("sc-angle", "cameraAngle").with_conditional_prefix(", "),
        TemplateSlot::new("sc-lighting", "lighting").with_conditional_prefix(", "),
    ];

    let mut music_lab = PromptTemplate::new(
        "tpl-music-lab-track",
        ModuleId::MusicLab,
        "Track Brief",
    );
    music_lab.slots = vec![
        TemplateSlot::new("ml-genre", "genre"),
        TemplateSlot::new("ml-vocals", "vocalStyle").with_conditional_prefix(", "),
        TemplateSlot::new("ml-mood", "mood").with_conditional_prefix(", "),
    ];

    let mut storybook = PromptTemplate::new(
        "tpl-storybook-page",
        ModuleId::Storybook,
        "Story Page",
    );
    storybook.slots = vec![
        TemplateSlot::new("bk-art-style", "artStyle").with_suffix(" illustration of "),
        TemplateSlot::new("bk-subject", "subject"),
        TemplateSlot::new("bk-action", "action").with_conditional_prefix(", "),
        TemplateSlot::new("bk-location", "location").with_conditional_prefix(" in "),
    ];

    vec![storyboard, shot_creator, music_lab, storybook]
}
