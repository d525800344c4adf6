//! Hugging Face LLM inference container lookup
//!
//! Resolves the text-generation-inference image published to the regional
//! deep-learning-container registries.

use crate::error::ImageError;

const REPOSITORY: &str = "huggingface-pytorch-tgi-inference";

/// Default registry account for commercial regions
const DEFAULT_REGISTRY: &str = "763104351884";

/// Regions served from a registry other than the default one
const REGIONAL_REGISTRIES: &[(&str, &str)] = &[
    ("af-south-1", "626614931356"),
    ("ap-east-1", "871362719292"),
    ("ap-south-2", "772153158452"),
    ("ap-southeast-3", "907027046896"),
    ("ap-southeast-4", "457447274322"),
    ("ca-west-1", "204538143572"),
    ("cn-north-1", "727897471807"),
    ("cn-northwest-1", "727897471807"),
    ("eu-central-2", "380420809688"),
    ("eu-south-1", "692866216735"),
    ("eu-south-2", "503227376785"),
    ("il-central-1", "780543022126"),
    ("me-central-1", "914824155844"),
    ("me-south-1", "217643126080"),
];

const DEFAULT_REGISTRY_REGIONS: &[&str] = &[
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ca-central-1",
    "eu-central-1",
    "eu-north-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-gov-east-1",
    "us-gov-west-1",
    "us-west-1",
    "us-west-2",
];

/// Published image tags, oldest first
const VERSION_TAGS: &[(&str, &str)] = &[
    ("0.9.3", "2.0.1-tgi0.9.3-gpu-py39-cu118-ubuntu20.04"),
    ("1.0.3", "2.0.1-tgi1.0.3-gpu-py39-cu118-ubuntu20.04"),
    ("1.1.0", "2.0.1-tgi1.1.0-gpu-py39-cu118-ubuntu20.04"),
    ("1.2.0", "2.1.1-tgi1.2.0-gpu-py310-cu121-ubuntu20.04"),
    ("1.3.1", "2.1.1-tgi1.3.1-gpu-py310-cu121-ubuntu20.04"),
    ("1.3.3", "2.1.1-tgi1.3.3-gpu-py310-cu121-ubuntu20.04"),
    ("1.4.0", "2.1.1-tgi1.4.0-gpu-py310-cu121-ubuntu20.04"),
];

/// Resolve the LLM container image for `backend` at `version` in `region`.
///
/// A `major.minor` version resolves to the newest published patch.
pub fn resolve_llm_image_uri(
    backend: &str,
    version: &str,
    region: &str,
) -> Result<String, ImageError> {
    if backend != "huggingface" {
        return Err(ImageError::UnsupportedBackend(backend.to_string()));
    }

    let tag = image_tag(version).ok_or_else(|| ImageError::UnsupportedVersion {
        backend: backend.to_string(),
        version: version.to_string(),
    })?;
    let account = registry_account(region)
        .ok_or_else(|| ImageError::UnsupportedRegion(region.to_string()))?;

    Ok(format!(
        "{}.dkr.ecr.{}.{}/{}:{}",
        account,
        region,
        registry_domain(region),
        REPOSITORY,
        tag
    ))
}

/// Exact versions with a published tag
pub fn supported_versions() -> Vec<&'static str> {
    VERSION_TAGS.iter().map(|(version, _)| *version).collect()
}

fn image_tag(version: &str) -> Option<&'static str> {
    if let Some((_, tag)) = VERSION_TAGS.iter().find(|(v, _)| *v == version) {
        return Some(*tag);
    }

    // Alias: "1.3" -> newest "1.3.x"
    if version.split('.').count() == 2 {
        let prefix = format!("{}.", version);
        return VERSION_TAGS
            .iter()
            .rev()
            .find(|(v, _)| v.starts_with(&prefix))
            .map(|(_, tag)| *tag);
    }

    None
}

fn registry_account(region: &str) -> Option<&'static str> {
    if let Some((_, account)) = REGIONAL_REGISTRIES.iter().find(|(r, _)| *r == region) {
        return Some(*account);
    }
    DEFAULT_REGISTRY_REGIONS
        .contains(&region)
        .then_some(DEFAULT_REGISTRY)
}

fn registry_domain(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    }
}
