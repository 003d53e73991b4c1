// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Codec manifest
//
// YAML file listing the types to generate codecs for:
//
//   runtime: "crate::codec"      # optional, defaults to ::autocodec
//   codecs:
//     - name: Point
//       strategy: instantiator
//       fields:
//         - { name: x, ty: i32 }
//         - { name: y, ty: i32, visibility: public }

use anyhow::{Context, Result};
use autocodec_core::CodecRequest;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_runtime() -> String {
    "::autocodec".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecManifest {
    /// Path of the runtime crate in generated code.
    #[serde(default = "default_runtime")]
    pub runtime: String,
    /// Doc line written at the top of the generated module.
    #[serde(default)]
    pub description: Option<String>,
    pub codecs: Vec<CodecRequest>,
}

impl CodecManifest {
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!("Loading manifest from: {:?}", path);
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(content)?;
        tracing::debug!("Manifest lists {} codec(s)", manifest.codecs.len());
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autocodec_core::{StrategyTag, Visibility};

    #[test]
    fn test_parse_manifest() {
        let manifest = CodecManifest::parse(
            r#"
codecs:
  - name: Point
    fields:
      - { name: x, ty: i32 }
      - { name: y, ty: i32, visibility: public }
  - name: Root
    strategy: singleton
    singleton_instance: ROOT
"#,
        )
        .expect("parses");
        assert_eq!(manifest.runtime, "::autocodec");
        assert_eq!(manifest.codecs.len(), 2);

        let point = &manifest.codecs[0];
        assert_eq!(point.strategy, StrategyTag::Instantiator);
        assert_eq!(point.descriptor.fields[1].visibility, Visibility::Public);
        assert_eq!(point.descriptor.visibility, "pub");

        let root = &manifest.codecs[1];
        assert_eq!(root.strategy, StrategyTag::Singleton);
        assert_eq!(root.descriptor.singleton_instance.as_deref(), Some("ROOT"));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let err = CodecManifest::parse("codecs:\n  - name: A\n    strategy: lazy\n").unwrap_err();
        assert!(format!("{:#}", err).contains("lazy"));
    }
}
