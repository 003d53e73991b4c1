// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! POLYMORPHIC emission: the codec of an abstract base forwards to the
//! subtype codec registered for the value's runtime type.

use quote::quote;

use super::{CodecParts, CodecState, Generator};
use crate::marshaller::MarshallerDispatch;
use crate::strategy::PolymorphicPlan;

pub(super) fn emit<M: MarshallerDispatch>(
    generator: &Generator<M>,
    ty: &syn::Path,
    plan: &PolymorphicPlan,
) -> CodecParts {
    let rt = generator.runtime();
    let serialize = quote! {
        self.registry.serialize::<dyn #ty>(
            #rt::AsAny::as_any(&**value),
            writer,
            dependency.map(|dependency| dependency as &dyn ::core::any::Any),
        )?;
    };
    let deserialize = quote! {
        self.registry.deserialize::<dyn #ty>(
            reader,
            dependency.map(|dependency| dependency as &dyn ::core::any::Any),
        )
    };

    CodecParts {
        encoded: quote!(::std::boxed::Box<dyn #ty>),
        dependency: plan.dependency.clone(),
        state: CodecState::Registry,
        serialize_body: serialize,
        deserialize_body: deserialize,
        marshal_self: false,
    }
}

#[cfg(test)]
mod tests {
    use crate::descriptor::TypeDescriptor;
    use crate::emit::Generator;
    use crate::strategy::StrategyTag;

    #[test]
    fn test_delegates_to_registry() {
        let desc = TypeDescriptor::new("Shape").abstract_type();
        let codec = Generator::new()
            .generate(&desc, StrategyTag::Polymorphic)
            .expect("generates");
        let all = codec.tokens.to_string();
        assert!(all.contains("type Encoded = :: std :: boxed :: Box < dyn Shape >"));
        assert!(all.contains("registry : :: std :: sync :: Arc < :: autocodec :: CodecRegistry >"));
        assert!(codec
            .serialize_body
            .to_string()
            .contains("self . registry . serialize :: < dyn Shape >"));
        assert!(!all.contains("Marshal for"));
    }
}
