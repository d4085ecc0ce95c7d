//! Cache fingerprints for generation requests.
//!
//! A fingerprint covers the normalized prompt, the generation
//! parameters and the { purpose, sector, style } slice of the context.
//! Attempt numbers, session ids and timestamps are deliberately
//! excluded so that a retried request can still hit the cache.

use sha2::{Digest, Sha256};

use crate::domain::{Fingerprint, GenerationContext, GenerationParams};

/// Compute the cache fingerprint for one generation request.
pub fn request_fingerprint(
    prompt: &str,
    params: &GenerationParams,
    context: &GenerationContext,
) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(normalize_prompt(prompt).as_bytes());
    hasher.update(b"|");
    hasher.update(params.aspect_ratio.as_bytes());
    hasher.update(b"|");
    hasher.update(params.samples.to_le_bytes());
    hasher.update(params.cfg_scale.to_le_bytes());
    hasher.update(params.steps.to_le_bytes());
    hasher.update(b"|");
    hasher.update(context_fingerprint(context).as_str().as_bytes());
    Fingerprint::new(hex_digest(hasher))
}

/// Fingerprint of the context slice alone, stored alongside cache
/// entries for diagnostics.
pub fn context_fingerprint(context: &GenerationContext) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(context.purpose.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(context.sector.as_bytes());
    hasher.update(b"|");
    hasher.update(context.style.as_deref().unwrap_or("").as_bytes());
    Fingerprint::new(hex_digest(hasher))
}

/// Lowercase, collapse internal whitespace, trim. Keeps semantically
/// identical prompts on the same cache key.
fn normalize_prompt(prompt: &str) -> String {
    prompt
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn hex_digest(hasher: Sha256) -> String {
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Purpose;

    fn context() -> GenerationContext {
        GenerationContext::new(Purpose::Social, "food")
    }

    #[test]
    fn test_fingerprint_stable_under_whitespace() {
        let params = GenerationParams::default();
        let a = request_fingerprint("A warm  kitchen\n scene", &params, &context());
        let b = request_fingerprint("a warm kitchen scene", &params, &context());
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_varies_with_context() {
        let params = GenerationParams::default();
        let food = request_fingerprint("a warm kitchen scene", &params, &context());
        let tech = request_fingerprint(
            "a warm kitchen scene",
            &params,
            &GenerationContext::new(Purpose::Social, "tech"),
        );
        assert_ne!(food, tech);
    }

    #[test]
    fn test_fingerprint_varies_with_params() {
        let base = GenerationParams::default();
        let wide = GenerationParams {
            aspect_ratio: "16:9".to_string(),
            ..base.clone()
        };
        let a = request_fingerprint("scene", &base, &context());
        let b = request_fingerprint("scene", &wide, &context());
        assert_ne!(a, b);
    }

    #[test]
    fn test_style_participates() {
        let params = GenerationParams::default();
        let plain = request_fingerprint("scene", &params, &context());
        let styled = {
            let mut ctx = context();
            ctx.style = Some("minimaliste".to_string());
            request_fingerprint("scene", &params, &ctx)
        };
        assert_ne!(plain, styled);
    }
}
