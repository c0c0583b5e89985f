// vim: tw=80
//! Rewriting the types of a method's signature into types that a pack can
//! own.
//!
//! A parameter pack outlives the call that filled it, so every borrow in a
//! parameter is replaced by an owned copy.  A result pack outlives any borrow
//! of the mock, so every lifetime in a result becomes `'static`.

use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};
use syn::{
    Lifetime,
    Type,
    visit::{self, Visit},
    visit_mut::{self, VisitMut}
};

/// What's wrong with a type that can't be stored
pub(crate) type Unstorable = String;

/// Replace `Self` with the mock's own name
pub(crate) fn deselfify(ty: &mut Type, mock: &Ident) {
    struct Deselfify<'a>(&'a Ident);

    impl VisitMut for Deselfify<'_> {
        fn visit_type_path_mut(&mut self, tp: &mut syn::TypePath) {
            if tp.qself.is_none() && tp.path.segments.len() == 1 &&
                tp.path.segments[0].ident == "Self"
            {
                tp.path.segments[0].ident = self.0.clone();
            }
            visit_mut::visit_type_path_mut(self, tp);
        }
    }

    Deselfify(mock).visit_type_mut(ty);
}

/// Looks for borrows, and for things that no pack can hold.
#[derive(Default)]
struct Scan {
    borrows: bool,
    problem: Option<Unstorable>
}

impl<'ast> Visit<'ast> for Scan {
    fn visit_type_reference(&mut self, tr: &'ast syn::TypeReference) {
        self.borrows = true;
        visit::visit_type_reference(self, tr);
    }

    fn visit_lifetime(&mut self, lt: &'ast Lifetime) {
        if lt.ident != "static" {
            self.borrows = true;
        }
    }

    fn visit_type_impl_trait(&mut self, _: &'ast syn::TypeImplTrait) {
        self.problem = Some("`impl Trait` can't be stored".to_owned());
    }

    fn visit_type_infer(&mut self, _: &'ast syn::TypeInfer) {
        self.problem = Some("inferred types can't be stored".to_owned());
    }

    fn visit_type_path(&mut self, tp: &'ast syn::TypePath) {
        if tp.qself.is_none() && tp.path.segments.len() > 1 &&
            tp.path.segments[0].ident == "Self"
        {
            self.problem = Some("associated types of `Self` are not supported"
                                .to_owned());
        }
        visit::visit_type_path(self, tp);
    }

    // Lifetimes in function pointers and `Fn(..)` bounds are bound there.
    fn visit_type_bare_fn(&mut self, _: &'ast syn::TypeBareFn) {}

    fn visit_parenthesized_generic_arguments(&mut self,
        _: &'ast syn::ParenthesizedGenericArguments) {}

    fn visit_bound_lifetimes(&mut self, _: &'ast syn::BoundLifetimes) {}
}

fn scan(ty: &Type) -> Scan {
    let mut scan = Scan::default();
    scan.visit_type(ty);
    scan
}

/// Does `ty` hold any non-`'static` borrow?
pub(crate) fn borrows(ty: &Type) -> bool {
    scan(ty).borrows
}

/// Reject types that can't be stored at all, whatever their borrows.
pub(crate) fn check(ty: &Type) -> Result<(), Unstorable> {
    match scan(ty).problem {
        Some(problem) => Err(problem),
        None => Ok(())
    }
}

/// Named lifetimes used by `ty`, which the mock method must declare.
pub(crate) fn lifetimes(ty: &Type, out: &mut Vec<Lifetime>) {
    struct Collect<'a>(&'a mut Vec<Lifetime>);

    impl<'ast> Visit<'ast> for Collect<'_> {
        fn visit_lifetime(&mut self, lt: &'ast Lifetime) {
            if lt.ident != "static" && lt.ident != "_" &&
                !self.0.contains(lt)
            {
                self.0.push(lt.clone());
            }
        }

        fn visit_type_bare_fn(&mut self, _: &'ast syn::TypeBareFn) {}

        fn visit_bound_lifetimes(&mut self, _: &'ast syn::BoundLifetimes) {}
    }

    Collect(out).visit_type(ty);
}

/// Make every lifetime in `ty` `'static`, including elided ones.
pub(crate) fn staticize(ty: &mut Type) {
    struct Staticize;

    impl VisitMut for Staticize {
        fn visit_type_reference_mut(&mut self, tr: &mut syn::TypeReference) {
            if tr.lifetime.is_none() {
                tr.lifetime = Some(Lifetime::new("'static",
                                                 Span::call_site()));
            }
            visit_mut::visit_type_reference_mut(self, tr);
        }

        fn visit_lifetime_mut(&mut self, lt: &mut Lifetime) {
            *lt = Lifetime::new("'static", lt.span());
        }

        fn visit_type_bare_fn_mut(&mut self, _: &mut syn::TypeBareFn) {}

        fn visit_parenthesized_generic_arguments_mut(&mut self,
            _: &mut syn::ParenthesizedGenericArguments) {}

        fn visit_bound_lifetimes_mut(&mut self, _: &mut syn::BoundLifetimes)
        {}
    }

    Staticize.visit_type_mut(ty);
}

/// An owned type, and the expression that converts a borrowed value into it
pub(crate) struct Owned {
    pub ty: TokenStream,
    pub expr: TokenStream
}

/// Convert `e`, a value of type `ty`, into something that owns all its data.
pub(crate) fn owned(ty: &Type, e: TokenStream) -> Result<Owned, Unstorable> {
    by_value(ty, e, 0)
}

fn unsupported(ty: &Type) -> Unstorable {
    format!("can't store a borrow inside `{}`", quote!(#ty))
}

/// The single type argument list of a path segment
fn type_args(seg: &syn::PathSegment) -> Option<Vec<&Type>> {
    match &seg.arguments {
        syn::PathArguments::AngleBracketed(ab) => ab.args.iter()
            .map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(ty),
                _ => None
            }).collect(),
        _ => None
    }
}

fn by_value(ty: &Type, e: TokenStream, depth: usize)
    -> Result<Owned, Unstorable>
{
    if !borrows(ty) {
        return Ok(Owned{ty: quote!(#ty), expr: e});
    }
    let v = format_ident!("__v{}", depth);
    match ty {
        Type::Reference(tr) => by_ref(&tr.elem, e, depth),
        Type::Paren(tp) => by_value(&tp.elem, e, depth),
        Type::Group(tg) => by_value(&tg.elem, e, depth),
        Type::Tuple(tt) => {
            let vars = (0..tt.elems.len())
                .map(|i| format_ident!("__v{}_{}", depth, i))
                .collect::<Vec<_>>();
            let parts = tt.elems.iter().zip(vars.iter())
                .map(|(ty, var)| by_value(ty, quote!(#var), depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            let tys = parts.iter().map(|p| &p.ty);
            let exprs = parts.iter().map(|p| &p.expr);
            Ok(Owned {
                ty: quote!((#(#tys,)*)),
                expr: quote!({
                    let (#(#vars,)*) = #e;
                    (#(#exprs,)*)
                })
            })
        },
        Type::Path(tp) if tp.qself.is_none() => {
            let Some(seg) = tp.path.segments.last() else {
                return Err(unsupported(ty));
            };
            let args = type_args(seg).ok_or_else(|| unsupported(ty))?;
            match (seg.ident.to_string().as_str(), args.as_slice()) {
                ("Option", [t]) => {
                    let t = by_value(t, quote!(#v), depth + 1)?;
                    let (oty, oexpr) = (t.ty, t.expr);
                    Ok(Owned {
                        ty: quote!(::std::option::Option<#oty>),
                        expr: quote!(#e.map(|#v| #oexpr))
                    })
                },
                ("Vec", [t]) => {
                    let t = by_value(t, quote!(#v), depth + 1)?;
                    let (oty, oexpr) = (t.ty, t.expr);
                    Ok(Owned {
                        ty: quote!(::std::vec::Vec<#oty>),
                        expr: quote!(#e.into_iter()
                                     .map(|#v| #oexpr)
                                     .collect::<::std::vec::Vec<_>>())
                    })
                },
                ("Result", [t, u]) => {
                    let t = by_value(t, quote!(#v), depth + 1)?;
                    let u = by_value(u, quote!(#v), depth + 1)?;
                    let (tty, texpr, uty, uexpr) = (t.ty, t.expr, u.ty, u.expr);
                    Ok(Owned {
                        ty: quote!(::std::result::Result<#tty, #uty>),
                        expr: quote!(#e.map(|#v| #texpr).map_err(|#v| #uexpr))
                    })
                },
                _ => Err(unsupported(ty))
            }
        },
        _ => Err(unsupported(ty))
    }
}

/// Like [`by_value`], but `e` is a reference to a `ty`.
fn by_ref(ty: &Type, e: TokenStream, depth: usize)
    -> Result<Owned, Unstorable>
{
    let v = format_ident!("__v{}", depth);
    match ty {
        Type::TraitObject(_) | Type::ImplTrait(_) => {
            Err(format!("can't own a borrowed `{}`", quote!(#ty)))
        },
        Type::Paren(tp) => by_ref(&tp.elem, e, depth),
        Type::Group(tg) => by_ref(&tg.elem, e, depth),
        Type::Reference(tr) => by_ref(&tr.elem, quote!(*#e), depth),
        Type::Slice(ts) if borrows(&ts.elem) => {
            let t = by_ref(&ts.elem, quote!(#v), depth + 1)?;
            let (oty, oexpr) = (t.ty, t.expr);
            Ok(Owned {
                ty: quote!(::std::vec::Vec<#oty>),
                expr: quote!(#e.iter()
                             .map(|#v| #oexpr)
                             .collect::<::std::vec::Vec<_>>())
            })
        },
        ty if !borrows(ty) => Ok(Owned {
            ty: quote!(<#ty as ::std::borrow::ToOwned>::Owned),
            expr: quote!(::std::borrow::ToOwned::to_owned(&*#e))
        }),
        ty => Err(unsupported(ty))
    }
}
