// vim: tw=80
//! Revision 1: one pair of queues per method, as fields of the mock.
//!
//! ```text
//! pub struct FooMock {
//!     pub get_ps: Mutex<Vec<FooMockGet_P>>,      // calls received
//!     pub get_rs: Mutex<VecDeque<FooMockGet_R>>, // results to return
//! }
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::{Unit, pack::MockMethod};

pub(crate) fn generate(unit: &Unit) -> TokenStream {
    let mock = &unit.mock;
    let doc = format!(" {} is a mock of {} for test.", mock, unit.orig);
    let fields = unit.methods.iter().map(|m| {
        let (ps, rs) = (m.suffixed("ps"), m.suffixed("rs"));
        let (p, r) = (&m.p_ident, &m.r_ident);
        quote!(
            pub #ps: ::std::sync::Mutex<::std::vec::Vec<#p>>,
            pub #rs: ::std::sync::Mutex<::std::collections::VecDeque<#r>>,
        )
    });
    let funcs = unit.methods.iter().map(|m| method(unit, m));
    let packs = unit.methods.iter()
        .map(|m| m.packs(&TokenStream::new(), &unit.orig));
    quote!(
        #[doc = #doc]
        #[derive(Default)]
        pub struct #mock {
            #(#fields)*
        }

        impl #mock {
            #(#funcs)*
        }

        #(#packs)*
    )
}

fn method(unit: &Unit, m: &MockMethod) -> TokenStream {
    let doc = format!(" {} is mock of {}::{} method.", m.name, unit.orig,
                      m.name);
    let msg = format!("{}::{}: no result queued for call #{{}}", unit.mock,
                      m.name);
    let sig = m.signature();
    let pack = m.pack_params();
    let (ps, rs) = (m.suffixed("ps"), m.suffixed("rs"));
    let ret = m.unpack_results(&format_ident!("__r"));
    // Neither lock is held when the queue turns out to be empty
    quote!(
        #[doc = #doc]
        pub #sig {
            let __p = #pack;
            let __n = {
                let mut __ps = self.#ps.lock().unwrap();
                __ps.push(__p);
                __ps.len() - 1
            };
            let __r = self.#rs.lock().unwrap().pop_front();
            let __r = match __r {
                Some(__r) => __r,
                None => panic!(#msg, __n)
            };
            #ret
        }
    )
}

#[cfg(test)]
mod t {
    use crate::{GenConfig, Strategy, t::fixture};

    #[test]
    fn mock_struct() {
        let (pkg, typ) = fixture();
        let out = Strategy::Queue
            .generate_tokens(&GenConfig::default(), "KvMock", "mocks", &typ,
                             &pkg)
            .unwrap()
            .to_string()
            .replace(' ', "");
        assert!(out.contains(concat!(
            "#[doc=\"KvMockisamockofstore::Kvfortest.\"]",
            "#[derive(Default)]pubstructKvMock{",
            "pubget_ps:::std::sync::Mutex<::std::vec::Vec<KvMockGet_P>>,",
            "pubget_rs:::std::sync::Mutex<",
            "::std::collections::VecDeque<KvMockGet_R>>,",
            "pubput_ps:")), "{}", out);
        assert!(!out.contains("secret"), "{}", out);
    }

    #[test]
    fn method_body() {
        let (pkg, typ) = fixture();
        let out = Strategy::Queue
            .generate_tokens(&GenConfig::default(), "KvMock", "mocks", &typ,
                             &pkg)
            .unwrap()
            .to_string()
            .replace(' ', "");
        assert!(out.contains(concat!(
            "pubfnget(&self,key:&str)->Option<u32>{",
            "let__p=KvMockGet_P{key:::std::borrow::ToOwned::to_owned(&*key)};",
            "let__n={let mut__ps=self.get_ps.lock().unwrap();"
            ).replace(' ', "").as_str()), "{}", out);
        assert!(out.contains(
            "None=>panic!(\"KvMock::get:noresultqueuedforcall#{}\",__n)"),
            "{}", out);
        assert!(out.contains("__r.Out0}"), "{}", out);
    }
}
