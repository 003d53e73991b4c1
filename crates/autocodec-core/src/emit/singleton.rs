// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! SINGLETON emission: nothing on the wire, deserialization returns the
//! canonical instance itself.

use proc_macro2::TokenStream;
use quote::quote;

use super::{CodecParts, CodecState};
use crate::strategy::SingletonPlan;

pub(super) fn emit(ty: &syn::Path, plan: &SingletonPlan) -> CodecParts {
    let instance = &plan.instance;
    CodecParts {
        encoded: quote!(&'static #ty),
        dependency: None,
        state: CodecState::Stateless,
        serialize_body: TokenStream::new(),
        deserialize_body: quote!(::core::result::Result::Ok(&#instance)),
        marshal_self: false,
    }
}

#[cfg(test)]
mod tests {
    use crate::descriptor::TypeDescriptor;
    use crate::emit::Generator;
    use crate::strategy::StrategyTag;

    #[test]
    fn test_returns_static_instance() {
        let desc = TypeDescriptor::new("Root").with_singleton_instance("ROOT");
        let codec = Generator::new()
            .generate(&desc, StrategyTag::Singleton)
            .expect("generates");
        assert!(codec.serialize_body.is_empty());
        assert_eq!(
            codec.deserialize_body.to_string(),
            ":: core :: result :: Result :: Ok (& ROOT)"
        );
        assert!(codec.tokens.to_string().contains("type Encoded = & 'static Root"));
    }
}
