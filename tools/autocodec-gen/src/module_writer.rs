// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Codec module writer
//
// Generates every codec listed in a manifest into one Rust module. Failing
// entries are reported and left out; the rest are still written.

use anyhow::{Context, Result};
use autocodec_core::{BatchReport, Generator};
use std::fs;
use std::path::{Path, PathBuf};

use crate::manifest::CodecManifest;

pub struct CodecModuleWriter {
    manifest: CodecManifest,
    source: PathBuf,
}

impl CodecModuleWriter {
    pub fn new(manifest: CodecManifest, source: impl Into<PathBuf>) -> Self {
        Self {
            manifest,
            source: source.into(),
        }
    }

    /// Load the manifest at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(CodecManifest::load(path)?, path))
    }

    /// Run the generator over every manifest entry.
    pub fn check(&self) -> Result<GenerationReport> {
        let generator = Generator::for_runtime(&self.manifest.runtime)
            .with_context(|| format!("Invalid runtime path '{}'", self.manifest.runtime))?;
        let batch = generator.generate_batch(&self.manifest.codecs);
        for failure in &batch.failures {
            tracing::warn!("[SKIP] {}: {}", failure.type_name, failure.error);
        }
        Ok(GenerationReport::from_batch(&batch, self.render(&batch)))
    }

    /// Generate and write the module to `out`.
    pub fn write(&self, out: &Path) -> Result<GenerationReport> {
        let mut report = self.check()?;
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create output directory")?;
        }
        fs::write(out, &report.source)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        tracing::info!("[OK] Wrote {}", out.display());
        report.output = Some(out.to_path_buf());
        Ok(report)
    }

    fn render(&self, batch: &BatchReport) -> String {
        let mut source = String::from("// @generated by autocodec-gen. Do not edit.\n");
        source.push_str(&format!("// Source: {}\n", self.source.display()));
        if let Some(description) = &self.manifest.description {
            source.push_str(&format!("// {}\n", description));
        }
        for codec in &batch.generated {
            source.push('\n');
            source.push_str(&format!(
                "// {} ({} strategy)\n",
                codec.type_name, codec.strategy
            ));
            source.push_str(&codec.tokens.to_string());
            source.push('\n');
        }
        source
    }
}

/// Generation report
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub generated: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub source: String,
    pub output: Option<PathBuf>,
}

impl GenerationReport {
    fn from_batch(batch: &BatchReport, source: String) -> Self {
        Self {
            generated: batch
                .generated
                .iter()
                .map(|codec| codec.codec_ident.to_string())
                .collect(),
            failed: batch
                .failures
                .iter()
                .map(|failure| (failure.type_name.clone(), failure.error.to_string()))
                .collect(),
            source,
            output: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("  Codec Generation Report");
        println!("{}", "=".repeat(60));
        println!();
        println!("  [OK] Generated:    {} codec(s)", self.generated.len());
        for name in &self.generated {
            println!("    - {}", name);
        }
        if !self.failed.is_empty() {
            println!("  [FAIL] Rejected:   {} type(s)", self.failed.len());
            for (type_name, error) in &self.failed {
                println!("    - {}: {}", type_name, error);
            }
        }
        if let Some(output) = &self.output {
            println!();
            println!("  Written to: {}", output.display());
        }
        println!();
        println!("{}", "=".repeat(60));
    }
}
