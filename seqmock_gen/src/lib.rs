// vim: tw=80
//! Source generator for `seqmock` mocks
//!
//! Given the description of a type, `seqmock_gen` writes Rust source for a
//! mock struct with the same public methods.  The type is usually read from a
//! source file with [`SourcePackage::parse`], and the generated source is
//! usually written next to it, either by a build script or by the
//! `seqmock-gen` command.
//!
//! There are three [`Strategy`]s, identified by their revision number:
//!
//! * **1**, [`Strategy::Queue`]: the mock records each method's arguments in
//!   one queue and pops its results from another.
//! * **2**, [`Strategy::Grouped`]: likewise, but the two queues of each method
//!   live in a struct of their own.
//! * **3**, [`Strategy::Sequence`]: the mock forwards each call to a shared
//!   `seqmock::Sequence`, which checks the order and arguments of every call
//!   across all mocks built from it.
//!
//! # Example
//!
//! ```
//! use seqmock_gen::{GenConfig, Package, SourcePackage, Strategy};
//!
//! let pkg = SourcePackage::parse("store", r#"
//!     pub struct Kv;
//!     impl Kv {
//!         pub fn get(&self, key: &str) -> Option<u32> { None }
//!     }
//! "#).unwrap();
//! let kv = pkg.lookup("Kv").unwrap();
//! let src = Strategy::Sequence
//!     .generate(&GenConfig::default(), "KvMock", "mocks", kv, &pkg)
//!     .unwrap();
//! assert!(src.starts_with("// Code generated by seqmock-gen; DO NOT EDIT."));
//! ```
//!
//! # Generated code
//!
//! Every generated file starts with inner attributes, so it must be included
//! as a module of its own, for example with `#[path = "..."] mod mocks;`.  The
//! module imports everything from its parent, where the types named in the
//! mocked signatures are expected to be in scope.
//!
//! The generated code never depends on `seqmock_gen`.  Only revision 3 depends
//! on `seqmock`.
//!
//! Parameter packs own their data.  A borrowed argument is stored as its
//! `ToOwned::Owned` form, also when the borrow is nested in an `Option`,
//! `Result`, `Vec`, tuple or slice.  Other borrowing types can't be stored, and
//! generating their mock fails.  Result packs hold `'static` borrows, and
//! `Self` means the mock itself.
//!
//! With revision 3, every stored parameter must be `Debug + PartialEq`, even
//! one that a `seqmock::CompareOption` ignores, and every result must be
//! `Debug`.

use proc_macro2::{Ident, TokenStream};
use quote::quote;

mod batch;
mod descriptor;
mod error;
mod extract;
mod grouped;
mod pack;
mod queue;
mod sequence;
mod storable;

pub use crate::batch::{GeneratedMock, MockTarget, generate_all, mock_filename};
pub use crate::descriptor::{
    Method,
    Package,
    SourceMethod,
    Type,
    VARIADIC,
    Variable,
    filter_methods,
    to_public_name,
    to_storable_type
};
pub use crate::error::{BatchError, Error, Result};
pub use crate::extract::SourcePackage;

use crate::pack::MockMethod;

/// First line of every generated file
pub const GENERATED_HEADER: &str =
    "// Code generated by seqmock-gen; DO NOT EDIT.";

/// Knobs shared by every mock of a batch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenConfig {
    /// Compile the generated mocks only in test builds.  If false, they are
    /// compiled only when the feature named by `tag` is enabled.
    pub for_plain_test: bool,
    /// Name mocks `{Type}Mock` rather than `{Type}`, unless given explicitly
    pub mock_suffix: bool,
    /// Name of the feature that enables the generated mocks
    pub tag: String,
    /// Pretty-print the generated source.  If false, it is written as one
    /// long line.
    pub format: bool
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            for_plain_test: false,
            mock_suffix: false,
            tag: "mock".to_owned(),
            format: true
        }
    }
}

/// How the generated mocks behave.  See the [crate docs](crate).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Strategy {
    Queue,
    Grouped,
    Sequence
}

impl Strategy {
    /// Look up a strategy by its revision number.
    pub fn from_revision(revision: u32) -> Result<Self> {
        match revision {
            1 => Ok(Strategy::Queue),
            2 => Ok(Strategy::Grouped),
            3 => Ok(Strategy::Sequence),
            _ => Err(Error::UnknownStrategy(revision))
        }
    }

    pub fn revision(self) -> u32 {
        match self {
            Strategy::Queue => 1,
            Strategy::Grouped => 2,
            Strategy::Sequence => 3
        }
    }

    /// Generate the complete source file of a mock.
    ///
    /// * `mock_name`: name of the mock struct
    /// * `target_pkg`: name of the package the mock is generated into
    /// * `typ`: the type to mock
    /// * `pkg`: the package defining `typ`
    pub fn generate(self, cfg: &GenConfig, mock_name: &str, target_pkg: &str,
                    typ: &Type, pkg: &dyn Package) -> Result<String>
    {
        let tokens = self.generate_tokens(cfg, mock_name, target_pkg, typ,
                                          pkg)?;
        let body = if cfg.format {
            let file = syn::parse2::<syn::File>(tokens)
                .map_err(Error::Format)?;
            prettyplease::unparse(&file)
        } else {
            format!("{}\n", tokens)
        };
        Ok(format!("{}\n\n{}", GENERATED_HEADER, body))
    }

    /// Like [`generate`](Self::generate), but without the header comment.
    pub fn generate_tokens(self, cfg: &GenConfig, mock_name: &str,
                           target_pkg: &str, typ: &Type, pkg: &dyn Package)
        -> Result<TokenStream>
    {
        let methods = filter_methods(&typ.methods, mock_name);
        if methods.is_empty() {
            return Err(Error::NoMockableMethods(typ.name.clone()));
        }
        let package = if typ.package.is_empty() {
            pkg.name()
        } else {
            typ.package.as_str()
        };
        let unit = Unit {
            mock: pack::ident(mock_name)?,
            orig: format!("{}::{}", package, typ.name),
            methods: methods.iter()
                .map(MockMethod::new)
                .collect::<Result<Vec<_>>>()?
        };
        let body = match self {
            Strategy::Queue => queue::generate(&unit),
            Strategy::Grouped => grouped::generate(&unit),
            Strategy::Sequence => sequence::generate(&unit)
        };
        let head = header(cfg, target_pkg, self);
        Ok(quote!(#head #body))
    }
}

/// Everything a strategy needs to render one mock
pub(crate) struct Unit {
    pub mock: Ident,
    /// Path of the mocked type, for docs and messages
    pub orig: String,
    pub methods: Vec<MockMethod>
}

fn header(cfg: &GenConfig, target_pkg: &str, strategy: Strategy)
    -> TokenStream
{
    let gate = if cfg.for_plain_test {
        quote!(#![cfg(test)])
    } else {
        let tag = &cfg.tag;
        quote!(#![cfg(feature = #tag)])
    };
    let doc = format!(" Mocks for package {}, revision {}.", target_pkg,
                      strategy.revision());
    quote!(
        #gate
        #![doc = #doc]

        #[allow(unused_imports)]
        use super::*;
    )
}
