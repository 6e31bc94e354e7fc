//! Backend models the scoring service can route an analysis to.

use serde::{Deserialize, Serialize};

/// Model used for single analyses when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Catalog entry as served by `GET /api/v1/models`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub speed: String,
    #[serde(default)]
    pub quality: String,
}

struct KnownModel {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    speed: &'static str,
    quality: &'static str,
}

const KNOWN_MODELS: [KnownModel; 4] = [
    KnownModel {
        id: "gemini-2.0-flash",
        name: "Gemini 2.0 Flash",
        description: "Fastest, cheapest option. Good for quick analysis.",
        speed: "⚡⚡⚡",
        quality: "★★★☆☆",
    },
    KnownModel {
        id: "gemini-1.5-flash",
        name: "Gemini 1.5 Flash",
        description: "Fast with good quality balance.",
        speed: "⚡⚡",
        quality: "★★★☆☆",
    },
    KnownModel {
        id: "gemini-1.5-pro",
        name: "Gemini 1.5 Pro",
        description: "Best quality-to-price ratio. Recommended.",
        speed: "⚡",
        quality: "★★★★☆",
    },
    KnownModel {
        id: "gemini-2.0-pro-exp",
        name: "Gemini 2.0 Pro",
        description: "Latest model, highest quality but experimental.",
        speed: "⚡",
        quality: "★★★★★",
    },
];

/// The catalog compiled into the client, used when the service cannot be asked.
pub fn builtin_models() -> Vec<ModelInfo> {
    KNOWN_MODELS
        .iter()
        .map(|m| ModelInfo {
            id: m.id.to_string(),
            name: m.name.to_string(),
            description: m.description.to_string(),
            speed: m.speed.to_string(),
            quality: m.quality.to_string(),
        })
        .collect()
}

/// Human-readable name for a model id, falling back to the id itself.
pub fn display_name(id: &str) -> &str {
    KNOWN_MODELS
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.name)
        .unwrap_or(id)
}

pub fn is_known(id: &str) -> bool {
    KNOWN_MODELS.iter().any(|m| m.id == id)
}
