//! Prompt assembly from template content and generation context.
//!
//! Pure string construction, kept out of the orchestrator so it can be
//! tested without any collaborator in place. An advertising style is
//! inferred from the context and contributes composition, lighting and
//! color modifiers; the assembled prompt is capped at a fixed length.

use crate::domain::{GenerationContext, Purpose};

/// Hard cap on the prompt sent to the image backend.
const MAX_PROMPT_LENGTH: usize = 2000;

/// Segments kept when an oversized prompt is rebuilt.
const TRUNCATION_SEGMENTS: usize = 10;

/// Advertising style descriptors rotated across retry attempts so
/// that a rejected artifact is not regenerated from an identical
/// prompt.
const STYLE_ROTATION: [&str; 3] = [
    "bold graphic composition, high contrast",
    "editorial photography, natural framing",
    "cinematic lighting, shallow depth of field",
];

/// Creative direction of an ad, inferred from the brief.
///
/// A style keyword in the context wins over the sector; an
/// unrecognized brief lands on `Emotional`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertisingStyle {
    Minimalist,
    Emotional,
    Authentic,
    Bold,
    Corporate,
}

impl AdvertisingStyle {
    pub fn infer(context: &GenerationContext) -> Self {
        let style = context
            .style
            .as_deref()
            .unwrap_or("")
            .to_lowercase();
        if contains_any(&style, &["minimal", "épuré", "simple"]) {
            return Self::Minimalist;
        }
        if contains_any(&style, &["émotion", "emotion", "inspir", "motiv"]) {
            return Self::Emotional;
        }
        if contains_any(&style, &["authent", "naturel", "natural", "réel"]) {
            return Self::Authentic;
        }
        if contains_any(&style, &["audac", "bold", "provoc", "disrupt"]) {
            return Self::Bold;
        }

        let sector = context.sector.to_lowercase();
        if contains_any(&sector, &["banque", "bank", "finance", "assurance", "insurance"]) {
            return Self::Corporate;
        }
        if contains_any(&sector, &["tech", "innovation"]) {
            return Self::Minimalist;
        }
        if contains_any(&sector, &["hôtel", "hotel", "restaur", "food", "loisir"]) {
            return Self::Authentic;
        }
        if contains_any(&sector, &["mode", "fashion", "luxe", "luxury"]) {
            return Self::Emotional;
        }

        Self::Emotional
    }

    fn composition(&self) -> &'static str {
        match self {
            Self::Minimalist => {
                "minimalist composition, strategic negative space, iconic product presentation"
            }
            Self::Emotional => {
                "storytelling composition, emotional focal point, dynamic visual narrative"
            }
            Self::Authentic => "authentic composition, natural framing, genuine moment capture",
            Self::Bold => "bold composition, unexpected framing, attention-grabbing layout",
            Self::Corporate => "corporate composition, professional framing, balanced layout",
        }
    }

    fn lighting(&self) -> &'static str {
        match self {
            Self::Minimalist => "clean studio lighting, precise shadow control",
            Self::Emotional => "dramatic light contrast, cinematic mood lighting",
            Self::Authentic => "natural golden hour light, environmental lighting",
            Self::Bold => "high contrast lighting, dramatic shadow play",
            Self::Corporate => "professional three-point lighting, balanced exposure",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            Self::Minimalist => "elegant monochromatic palette, sophisticated color harmony",
            Self::Emotional => "dramatic color contrast, mood-enhancing tones",
            Self::Authentic => "natural color harmony, warm earthy tones",
            Self::Bold => "vibrant color contrast, attention-grabbing hues",
            Self::Corporate => "trustworthy blue tones, professional color harmony",
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Assemble the final image prompt from template content and context:
/// scene, purpose and sector tags, free-form context hints, then the
/// inferred style's composition, lighting and color modifiers.
pub fn build_image_prompt(template_content: &str, context: &GenerationContext) -> String {
    let mut parts = vec![template_content.trim().to_string()];

    parts.push(scene_hint(context.purpose).to_string());
    parts.push(format!("{} sector", context.sector));

    if let Some(style) = &context.style {
        parts.push(format!("{} aesthetic", style));
    }
    if let Some(positioning) = &context.positioning {
        parts.push(format!("{} positioning", positioning));
    }
    if let Some(time_of_day) = &context.time_of_day {
        parts.push(format!("{} light", time_of_day));
    }
    if let Some(brand) = &context.brand {
        parts.push(format!("for {}", brand));
    }

    let ad_style = AdvertisingStyle::infer(context);
    parts.push(ad_style.composition().to_string());
    parts.push(ad_style.lighting().to_string());
    parts.push(ad_style.color().to_string());

    truncate_prompt(parts.join(", "))
}

/// Standard negative prompt, identical for every purpose.
pub fn negative_prompt() -> &'static str {
    "blurry, low quality, distorted, watermark, text overlay, deformed, oversaturated"
}

/// Vary the advertising style for a retry attempt. Attempt 1 keeps
/// the prompt untouched; later attempts append a rotated descriptor.
pub fn diversify(prompt: &str, attempt_number: u32) -> String {
    if attempt_number <= 1 {
        return prompt.to_string();
    }
    let descriptor = STYLE_ROTATION[(attempt_number as usize - 2) % STYLE_ROTATION.len()];
    truncate_prompt(format!("{}, {}", prompt, descriptor))
}

/// Cap an oversized prompt: keep the leading comma segments, then cut
/// at the length limit if the rebuilt prompt still exceeds it.
fn truncate_prompt(prompt: String) -> String {
    if prompt.len() <= MAX_PROMPT_LENGTH {
        return prompt;
    }

    let mut rebuilt = prompt
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .take(TRUNCATION_SEGMENTS)
        .collect::<Vec<_>>()
        .join(", ");

    if rebuilt.len() > MAX_PROMPT_LENGTH {
        let mut end = MAX_PROMPT_LENGTH;
        while !rebuilt.is_char_boundary(end) {
            end -= 1;
        }
        rebuilt.truncate(end);
    }
    rebuilt
}

fn scene_hint(purpose: Purpose) -> &'static str {
    match purpose {
        Purpose::Social => "social media advertising scene",
        Purpose::Product => "product showcase, studio setting",
        Purpose::Lifestyle => "lifestyle scene, candid atmosphere",
    }
}
