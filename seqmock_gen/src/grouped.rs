// vim: tw=80
//! Revision 2: like revision 1, but each method's queues are grouped into
//! their own struct, which the mock holds in a field named after the method.
//!
//! ```text
//! pub struct FooMock {
//!     pub get: Mutex<FooMockGet_Q>,
//! }
//! pub struct FooMockGet_Q {
//!     pub ps: Vec<FooMockGet_P>,
//!     pub rs: VecDeque<FooMockGet_R>,
//! }
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::{Unit, pack::MockMethod};

pub(crate) fn generate(unit: &Unit) -> TokenStream {
    let mock = &unit.mock;
    let doc = format!(" {} is a mock of {} for test.", mock, unit.orig);
    let fields = unit.methods.iter().map(|m| {
        let (ident, q) = (&m.ident, &m.q_ident);
        quote!(pub #ident: ::std::sync::Mutex<#q>,)
    });
    let funcs = unit.methods.iter().map(|m| method(unit, m));
    let queues = unit.methods.iter().map(|m| queue(unit, m));
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

        #(#queues)*

        #(#packs)*
    )
}

fn queue(unit: &Unit, m: &MockMethod) -> TokenStream {
    let (p, r, q) = (&m.p_ident, &m.r_ident, &m.q_ident);
    let doc = format!(" {} records calls to, and queues results of, {}::{}.",
                      q, unit.orig, m.name);
    quote!(
        #[doc = #doc]
        #[derive(Default)]
        #[allow(non_camel_case_types)]
        pub struct #q {
            /// Parameters of each call received, in order
            pub ps: ::std::vec::Vec<#p>,
            /// Results to return, front first
            pub rs: ::std::collections::VecDeque<#r>,
        }

        impl #q {
            /// Queue a result for a future call.
            pub fn returning(&mut self, r: #r) -> &mut Self {
                self.rs.push_back(r);
                self
            }

            /// Parameters of every call received so far
            pub fn calls(&self) -> &[#p] {
                &self.ps
            }

            /// Number of results not yet returned
            pub fn remaining(&self) -> usize {
                self.rs.len()
            }

            /// Record a call.  Returns the next result, or the index of the
            /// call if there is none.
            fn record(&mut self, p: #p)
                -> ::std::result::Result<#r, usize>
            {
                self.ps.push(p);
                self.rs.pop_front().ok_or(self.ps.len() - 1)
            }
        }
    )
}

fn method(unit: &Unit, m: &MockMethod) -> TokenStream {
    let doc = format!(" {} is mock of {}::{} method.", m.name, unit.orig,
                      m.name);
    let msg = format!("{}::{}: no result queued for call #{{}}", unit.mock,
                      m.name);
    let ident = &m.ident;
    let sig = m.signature();
    let pack = m.pack_params();
    let ret = m.unpack_results(&format_ident!("__r"));
    quote!(
        #[doc = #doc]
        pub #sig {
            let __r = self.#ident.lock().unwrap().record(#pack);
            let __r = match __r {
                Ok(__r) => __r,
                Err(__n) => panic!(#msg, __n)
            };
            #ret
        }
    )
}
