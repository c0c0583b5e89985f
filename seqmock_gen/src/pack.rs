// vim: tw=80
//! Pieces of generated code shared by every strategy: identifiers, the
//! parameter and result packs, and a mock method's signature.

use std::str::FromStr;

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::Lifetime;

use crate::{
    descriptor::{Method, Variable, to_storable_type},
    error::{Error, Result},
    storable::{self, Unstorable}
};

/// Parse `name` as an identifier, rejecting keywords and anything else that
/// can't name an item.
pub(crate) fn ident(name: &str) -> Result<Ident> {
    syn::parse_str::<Ident>(name).map_err(|source| Error::InvalidIdent {
        ident: name.to_owned(),
        source
    })
}

fn invalid(method: &Method, ty: &str, message: Unstorable) -> Error {
    Error::InvalidType {
        method: method.name.clone(),
        ty: ty.to_owned(),
        message
    }
}

/// Parse a type as written in the source, with `Self` meaning the mock.
fn parse_type(method: &Method, mock: &Ident, ty: &str) -> Result<syn::Type> {
    let tokens = TokenStream::from_str(ty)
        .map_err(|e| invalid(method, ty, e.to_string()))?;
    let mut parsed = syn::parse2::<syn::Type>(tokens)
        .map_err(|e| invalid(method, ty, e.to_string()))?;
    storable::deselfify(&mut parsed, mock);
    storable::check(&parsed).map_err(|m| invalid(method, ty, m))?;
    Ok(parsed)
}

pub(crate) struct Param {
    pub ident: Ident,
    /// Type in the mock method's signature
    pub sig_ty: syn::Type,
    /// Type of the field in the parameter pack
    pub field_ty: TokenStream,
    /// Expression that moves the argument into the pack
    pub capture: TokenStream
}

impl Param {
    fn new(method: &Method, mock: &Ident, var: &Variable) -> Result<Self> {
        let ident = ident(&var.name)?;
        // A variadic parameter can't be written in a Rust signature, so the
        // mock takes the collected values.
        let ty = to_storable_type(&var.ty);
        let sig_ty = parse_type(method, mock, &ty)?;
        // Borrowed arguments are stored by value, like String for &str
        let owned = storable::owned(&sig_ty, quote!(#ident))
            .map_err(|m| invalid(method, &ty, m))?;
        Ok(Param {
            ident,
            sig_ty,
            field_ty: owned.ty,
            capture: owned.expr
        })
    }
}

pub(crate) struct Ret {
    pub ident: Ident,
    /// Type in the mock method's signature
    pub sig_ty: syn::Type,
    /// Type of the field in the result pack
    pub field_ty: syn::Type
}

impl Ret {
    fn new(method: &Method, mock: &Ident, var: &Variable) -> Result<Self> {
        let ident = ident(&var.name)?;
        let sig_ty = parse_type(method, mock, &var.ty)?;
        // Returned borrows must outlive any borrow of the mock
        let mut field_ty = sig_ty.clone();
        storable::staticize(&mut field_ty);
        Ok(Ret{ident, sig_ty, field_ty})
    }
}

/// A method, ready to be rendered by any strategy.
pub(crate) struct MockMethod {
    /// Name of the method, as given in the source
    pub name: String,
    pub ident: Ident,
    pub p_ident: Ident,
    pub r_ident: Ident,
    pub q_ident: Ident,
    /// Named lifetimes of the signature
    pub lifetimes: Vec<Lifetime>,
    pub params: Vec<Param>,
    pub rets: Vec<Ret>
}

impl MockMethod {
    pub fn new(method: &Method) -> Result<Self> {
        let mock = ident(&method.owner)?;
        let params = method.params.iter()
            .map(|v| Param::new(method, &mock, v))
            .collect::<Result<Vec<_>>>()?;
        let rets = method.results.iter()
            .map(|v| Ret::new(method, &mock, v))
            .collect::<Result<Vec<_>>>()?;
        let mut lifetimes = Vec::new();
        for ty in params.iter().map(|p| &p.sig_ty)
            .chain(rets.iter().map(|r| &r.sig_ty))
        {
            storable::lifetimes(ty, &mut lifetimes);
        }
        Ok(MockMethod {
            name: method.name.clone(),
            ident: ident(&method.name)?,
            p_ident: ident(&method.param_type_name())?,
            r_ident: ident(&method.result_type_name())?,
            q_ident: ident(&method.queue_type_name())?,
            lifetimes,
            params,
            rets
        })
    }

    /// Identifier derived from the method's name, like `get_ps`
    pub fn suffixed(&self, suffix: &str) -> Ident {
        format_ident!("{}_{}", self.ident, suffix)
    }

    /// The mock method's signature, without visibility
    pub fn signature(&self) -> TokenStream {
        let ident = &self.ident;
        let args = self.params.iter().map(|p| {
            let (ident, ty) = (&p.ident, &p.sig_ty);
            quote!(#ident: #ty)
        });
        let output = match self.rets.as_slice() {
            [] => TokenStream::new(),
            [r] => {
                let ty = &r.sig_ty;
                quote!(-> #ty)
            },
            rets => {
                let tys = rets.iter().map(|r| &r.sig_ty);
                quote!(-> (#(#tys),*))
            }
        };
        let generics = if self.lifetimes.is_empty() {
            TokenStream::new()
        } else {
            let lifetimes = &self.lifetimes;
            quote!(<#(#lifetimes),*>)
        };
        quote!(fn #ident #generics(&self, #(#args),*) #output)
    }

    /// Expression that packs the method's arguments
    pub fn pack_params(&self) -> TokenStream {
        let p_ident = &self.p_ident;
        let fields = self.params.iter().map(|p| {
            let (ident, capture) = (&p.ident, &p.capture);
            quote!(#ident: #capture)
        });
        quote!(#p_ident { #(#fields),* })
    }

    /// Expression that unpacks the result pack `r` into the method's return
    /// value
    pub fn unpack_results(&self, r: &Ident) -> TokenStream {
        match self.rets.as_slice() {
            [] => TokenStream::new(),
            [ret] => {
                let ident = &ret.ident;
                quote!(#r.#ident)
            },
            rets => {
                let fields = rets.iter().map(|ret| {
                    let ident = &ret.ident;
                    quote!(#r.#ident)
                });
                quote!((#(#fields),*))
            }
        }
    }

    /// Definitions of the parameter and result packs
    pub fn packs(&self, derives: &TokenStream, orig: &str) -> TokenStream {
        let p_ident = &self.p_ident;
        let r_ident = &self.r_ident;
        let p_doc = format!(" {} packs input parameters of {}::{} method.",
                            p_ident, orig, self.name);
        let r_doc = format!(" {} packs output parameters of {}::{} method.",
                            r_ident, orig, self.name);
        let p_fields = self.params.iter().map(|p| {
            let (ident, ty) = (&p.ident, &p.field_ty);
            quote!(pub #ident: #ty)
        });
        let r_fields = self.rets.iter().map(|r| {
            let (ident, ty) = (&r.ident, &r.field_ty);
            quote!(pub #ident: #ty)
        });
        quote!(
            #[doc = #p_doc]
            #derives
            #[allow(non_camel_case_types)]
            pub struct #p_ident {
                #(#p_fields),*
            }

            #[doc = #r_doc]
            #derives
            #[allow(non_camel_case_types, non_snake_case)]
            pub struct #r_ident {
                #(#r_fields),*
            }
        )
    }
}
