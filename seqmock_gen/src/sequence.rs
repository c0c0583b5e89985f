// vim: tw=80
//! Revision 3: every call is checked against a shared `seqmock::Sequence`.
//!
//! ```text
//! pub struct FooMock {
//!     pub seq: seqmock::Sequence,
//! }
//! impl seqmock::Request for FooMockGet_P { ... }
//! impl seqmock::Response for FooMockGet_R {}
//! ```
//!
//! Several mocks may be built from the same sequence, so the test can verify
//! the order of calls across all of them.
//!
//! Every parameter type must be `Debug + PartialEq + 'static` once stored,
//! since the sequence compares requests field by field.  Every result type
//! must be `Debug + 'static`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::{Unit, pack::MockMethod};

pub(crate) fn generate(unit: &Unit) -> TokenStream {
    let mock = &unit.mock;
    let doc = format!(" {} is a mock of {} for test.", mock, unit.orig);
    let funcs = unit.methods.iter().map(|m| method(unit, m));
    let derives = quote!(#[derive(Debug)]);
    let packs = unit.methods.iter().map(|m| {
        let packs = m.packs(&derives, &unit.orig);
        let traits = pack_impls(m);
        quote!(#packs #traits)
    });
    quote!(
        #[doc = #doc]
        #[derive(Debug)]
        pub struct #mock {
            pub seq: ::seqmock::Sequence,
        }

        impl ::std::convert::From<&::seqmock::Sequence> for #mock {
            fn from(seq: &::seqmock::Sequence) -> Self {
                #mock { seq: ::std::clone::Clone::clone(seq) }
            }
        }

        impl #mock {
            #(#funcs)*
        }

        #(#packs)*
    )
}

fn pack_impls(m: &MockMethod) -> TokenStream {
    let (p, r) = (&m.p_ident, &m.r_ident);
    let fields = m.params.iter().map(|param| {
        let ident = &param.ident;
        let name = ident.to_string();
        quote!(::seqmock::Field::new(#name, &self.#ident))
    });
    quote!(
        impl ::seqmock::Request for #p {
            fn fields(&self) -> ::std::vec::Vec<::seqmock::Field<'_>> {
                ::std::vec![#(#fields),*]
            }
        }

        impl ::seqmock::Response for #r {}
    )
}

fn method(unit: &Unit, m: &MockMethod) -> TokenStream {
    let doc = format!(" {} is mock of {}::{} method.", m.name, unit.orig,
                      m.name);
    let name = &m.name;
    let r = &m.r_ident;
    let sig = m.signature();
    let pack = m.pack_params();
    let ret = m.unpack_results(&format_ident!("__r"));
    quote!(
        #[doc = #doc]
        pub #sig {
            let __r: #r = self.seq.call_as(#name, #pack);
            #ret
        }
    )
}

#[cfg(test)]
mod t {
    use crate::{GenConfig, Strategy, t::fixture};

    fn generate() -> String {
        let (pkg, typ) = fixture();
        Strategy::Sequence
            .generate_tokens(&GenConfig::default(), "KvMock", "mocks", &typ,
                             &pkg)
            .unwrap()
            .to_string()
            .replace(' ', "")
    }

    #[test]
    fn mock_struct() {
        let out = generate();
        assert!(out.contains(concat!(
            "#[derive(Debug)]pubstructKvMock{pubseq:::seqmock::Sequence,}",
            "impl::std::convert::From<&::seqmock::Sequence>forKvMock{")),
            "{}", out);
        // No constructor that could collide with a mocked method
        assert!(!out.contains("fnnew("), "{}", out);
    }

    #[test]
    fn method_body() {
        let out = generate();
        assert!(out.contains(concat!(
            "pubfnget(&self,key:&str)->Option<u32>{",
            "let__r:KvMockGet_R=self.seq.call_as(\"get\",KvMockGet_P{",
            "key:::std::borrow::ToOwned::to_owned(&*key)});",
            "__r.Out0}")), "{}", out);
    }

    #[test]
    fn request_impl() {
        let out = generate();
        assert!(out.contains(concat!(
            "impl::seqmock::RequestforKvMockPut_P{",
            "fnfields(&self)->::std::vec::Vec<::seqmock::Field<'_>>{",
            "::std::vec![::seqmock::Field::new(\"key\",&self.key),",
            "::seqmock::Field::new(\"in1\",&self.in1)]}}",
            "impl::seqmock::ResponseforKvMockPut_R{}")), "{}", out);
        assert!(out.contains("#[derive(Debug)]#[allow(non_camel_case_types)]\
                              pubstructKvMockGet_P"), "{}", out);
    }
}
