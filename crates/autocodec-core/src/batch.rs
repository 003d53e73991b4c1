// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Batch generation over many codec requests.
//!
//! A failing request is reported and skipped; the remaining requests are
//! still generated.

use proc_macro2::TokenStream;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::descriptor::TypeDescriptor;
use crate::emit::{GeneratedCodec, Generator};
use crate::error::ConfigError;
use crate::marshaller::MarshallerDispatch;
use crate::strategy::StrategyTag;

/// One type to generate a codec for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodecRequest {
    #[cfg_attr(feature = "serde", serde(default))]
    pub strategy: StrategyTag,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub descriptor: TypeDescriptor,
}

impl CodecRequest {
    pub fn new(strategy: StrategyTag, descriptor: TypeDescriptor) -> Self {
        Self {
            strategy,
            descriptor,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub type_name: String,
    pub error: ConfigError,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub generated: Vec<GeneratedCodec>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// All generated codec units, in request order.
    pub fn tokens(&self) -> TokenStream {
        self.generated.iter().map(|codec| codec.tokens.clone()).collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} codec(s) generated, {} failed",
            self.generated.len(),
            self.failures.len()
        )
    }
}

impl<M: MarshallerDispatch> Generator<M> {
    /// Generate every request, collecting failures instead of stopping.
    pub fn generate_batch(&self, requests: &[CodecRequest]) -> BatchReport {
        let mut report = BatchReport::default();
        for request in requests {
            match self.generate(&request.descriptor, request.strategy) {
                Ok(codec) => report.generated.push(codec),
                Err(error) => {
                    log::warn!(
                        "[autocodec-core] skipping {}: {}",
                        request.descriptor.display_name(),
                        error
                    );
                    report.failures.push(BatchFailure {
                        type_name: request.descriptor.display_name().to_string(),
                        error,
                    });
                }
            }
        }
        log::debug!("[autocodec-core] batch: {}", report.summary());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDecl, InstantiatorDecl};

    #[test]
    fn test_batch_continues_past_failures() {
        let requests = vec![
            CodecRequest::new(
                StrategyTag::Instantiator,
                TypeDescriptor::new("Good").with_fields(vec![FieldDecl::public("n", "i32")]),
            ),
            CodecRequest::new(
                StrategyTag::Instantiator,
                TypeDescriptor::new("Ambiguous")
                    .with_constructor(InstantiatorDecl::new("a"))
                    .with_constructor(InstantiatorDecl::new("b")),
            ),
            CodecRequest::new(StrategyTag::Singleton, TypeDescriptor::new("Root")),
        ];
        let report = Generator::new().generate_batch(&requests);
        assert!(!report.is_success());
        let generated: Vec<String> = report
            .generated
            .iter()
            .map(|c| c.codec_ident.to_string())
            .collect();
        assert_eq!(generated, ["GoodCodec", "RootCodec"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].type_name, "Ambiguous");
        assert_eq!(report.summary(), "2 codec(s) generated, 1 failed");
        assert!(report.tokens().to_string().contains("struct GoodCodec"));
    }
}
