// vim: tw=80
//! Reading type descriptions out of Rust source

use proc_macro2::{Group, TokenStream, TokenTree};
use quote::{ToTokens, format_ident};

use crate::{
    descriptor::{Package, SourceMethod, Type, Variable},
    error::Result
};

/// A package whose types were read from a Rust source file.
#[derive(Clone, Debug, Default)]
pub struct SourcePackage {
    name: String,
    types: Vec<Type>
}

impl SourcePackage {
    pub fn new(name: impl Into<String>, types: Vec<Type>) -> Self {
        SourcePackage{name: name.into(), types}
    }

    /// Collect the types defined in `source`.
    ///
    /// Every struct, enum, union and trait is a type.  An inherent `impl`
    /// block adds its methods to the type it implements; trait methods are
    /// always public.  Associated functions without a receiver are not
    /// methods, and are left out.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self> {
        let file = syn::parse_file(source)?;
        let mut pkg = SourcePackage::new(name, Vec::new());
        for item in &file.items {
            match item {
                syn::Item::Struct(s) => {
                    pkg.type_mut(&s.ident.to_string());
                },
                syn::Item::Enum(e) => {
                    pkg.type_mut(&e.ident.to_string());
                },
                syn::Item::Union(u) => {
                    pkg.type_mut(&u.ident.to_string());
                },
                syn::Item::Trait(t) => {
                    let methods = t.items.iter()
                        .filter_map(|ti| match ti {
                            syn::TraitItem::Fn(f) => method(&f.sig, true, None),
                            _ => None
                        }).collect::<Vec<_>>();
                    pkg.type_mut(&t.ident.to_string()).methods.extend(methods);
                },
                syn::Item::Impl(i) if i.trait_.is_none() => {
                    let Some(owner) = self_name(&i.self_ty) else {
                        continue;
                    };
                    let methods = i.items.iter()
                        .filter_map(|ii| match ii {
                            syn::ImplItem::Fn(f) => {
                                let public = matches!(f.vis,
                                    syn::Visibility::Public(_));
                                method(&f.sig, public, Some(&owner))
                            },
                            _ => None
                        }).collect::<Vec<_>>();
                    pkg.type_mut(&owner).methods.extend(methods);
                },
                _ => ()
            }
        }
        Ok(pkg)
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }

    fn type_mut(&mut self, name: &str) -> &mut Type {
        let i = match self.types.iter().position(|t| t.name == name) {
            Some(i) => i,
            None => {
                self.types.push(Type {
                    name: name.to_owned(),
                    package: self.name.clone(),
                    methods: Vec::new()
                });
                self.types.len() - 1
            }
        };
        &mut self.types[i]
    }
}

impl Package for SourcePackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, name: &str) -> Option<&Type> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// Name of the type in an `impl` block's self type, like `Foo` for
/// `impl<T> Foo<T>`
fn self_name(ty: &syn::Type) -> Option<String> {
    match ty {
        syn::Type::Path(tp) if tp.qself.is_none() => tp.path.segments.last()
            .map(|seg| seg.ident.to_string()),
        _ => None
    }
}

/// Describe a method, or return `None` if `sig` has no receiver.
///
/// Within an `impl` block, `Self` is replaced by the owner's name, since it
/// would mean the mock within the mock.  A trait has no such name, so its
/// `Self` is kept, and stands for the mock in the generated code.
fn method(sig: &syn::Signature, public: bool, owner: Option<&str>)
    -> Option<SourceMethod>
{
    sig.receiver()?;
    let ty_string = |ty: &syn::Type| {
        let tokens = ty.to_token_stream();
        match owner {
            Some(owner) => deselfify(tokens, owner).to_string(),
            None => tokens.to_string()
        }
    };
    let params = sig.inputs.iter()
        .filter_map(|arg| match arg {
            syn::FnArg::Typed(pt) => {
                let name = match pt.pat.as_ref() {
                    syn::Pat::Ident(pi) => pi.ident.to_string(),
                    _ => String::new()
                };
                Some(Variable::new(name, ty_string(&pt.ty)))
            },
            syn::FnArg::Receiver(_) => None
        }).collect();
    let results = match &sig.output {
        syn::ReturnType::Default => Vec::new(),
        syn::ReturnType::Type(_, ty) => match ty.as_ref() {
            syn::Type::Tuple(tt) if tt.elems.is_empty() => Vec::new(),
            ty => vec![Variable::new("", ty_string(ty))]
        }
    };
    Some(SourceMethod {
        name: sig.ident.to_string(),
        public,
        params,
        results
    })
}

/// Replace every `Self` in `tokens` with `owner`
fn deselfify(tokens: TokenStream, owner: &str) -> TokenStream {
    tokens.into_iter()
        .map(|tt| match tt {
            TokenTree::Ident(i) if i == "Self" => {
                TokenTree::Ident(format_ident!("{}", owner, span = i.span()))
            },
            TokenTree::Group(g) => {
                let mut ng = Group::new(g.delimiter(),
                                        deselfify(g.stream(), owner));
                ng.set_span(g.span());
                TokenTree::Group(ng)
            },
            tt => tt
        }).collect()
}
