// vim: tw=80
//! Field-wise comparison of call requests.
//!
//! Requests are compared one field at a time so that individual fields, or
//! every field of a given type, can be left out of the comparison.  The
//! result of a failed comparison is a `-want +got` listing of the fields that
//! differ.

use std::{
    any::{self, TypeId},
    fmt::{self, Write}
};

use crate::Request;

/// A request field whose value can be compared against a value of unknown
/// type.
///
/// There is a blanket implementation for every `'static` type that is both
/// `Debug` and `PartialEq`, so generated code never implements this directly.
pub trait Value: fmt::Debug {
    #[doc(hidden)]
    fn as_any(&self) -> &dyn any::Any;

    #[doc(hidden)]
    fn eq_value(&self, other: &dyn Value) -> bool;

    #[doc(hidden)]
    fn value_type(&self) -> TypeId;
}

impl<T: any::Any + fmt::Debug + PartialEq> Value for T {
    fn as_any(&self) -> &dyn any::Any {
        self
    }

    fn eq_value(&self, other: &dyn Value) -> bool {
        other.as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }
}

/// One named field of a [`Request`].
///
/// Every field of a request must be a [`Value`], that is `Debug + PartialEq +
/// 'static`, including fields that a [`CompareOption`] leaves out of the
/// comparison.  A parameter type without `PartialEq` can't be mocked with a
/// [`Sequence`](crate::Sequence).
///
/// ```compile_fail
/// # use seqmock::*;
/// #[derive(Debug)]
/// struct Handle(u32);
///
/// let h = Handle(1);
/// let f = Field::new("h", &h);
/// ```
pub struct Field<'a> {
    name: &'static str,
    value: &'a dyn Value
}

impl<'a> Field<'a> {
    pub fn new<T: Value>(name: &'static str, value: &'a T) -> Self {
        Field{name, value}
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.name, self.value)
    }
}

/// Adjusts how the expected and actual requests of a call are compared.
///
/// # Examples
///
/// A field that carries per-call context, like a deadline, is usually not
/// worth comparing:
/// ```
/// # use seqmock::*;
/// #[derive(Debug, PartialEq)]
/// struct Deadline(u64);
///
/// let seq = Sequence::new()
///     .with_option(CompareOption::ignore_type::<Deadline>());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompareOption {
    /// Skip every field with this name, in every request.
    IgnoreField(&'static str),
    /// Skip every field of this type, in every request.
    IgnoreType {
        id: TypeId,
        name: &'static str
    }
}

impl CompareOption {
    pub fn ignore_field(name: &'static str) -> Self {
        CompareOption::IgnoreField(name)
    }

    pub fn ignore_type<T: any::Any>() -> Self {
        CompareOption::IgnoreType {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>()
        }
    }

    fn ignores(&self, field: &Field<'_>) -> bool {
        match self {
            CompareOption::IgnoreField(name) => *name == field.name,
            CompareOption::IgnoreType{id, ..} => *id == field.value.value_type()
        }
    }
}

/// The declared type of a request, captured where it is still statically
/// known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RequestType {
    pub id: TypeId,
    pub name: &'static str
}

impl RequestType {
    pub fn of<P: Request>() -> Self {
        RequestType {
            id: TypeId::of::<P>(),
            name: any::type_name::<P>()
        }
    }

    /// The type name without its module path.  The paths of generic
    /// arguments are kept.
    fn short_name(&self) -> &'static str {
        let end = self.name.find('<').unwrap_or(self.name.len());
        let start = self.name[..end].rfind("::").map_or(0, |i| i + 2);
        &self.name[start..]
    }
}

/// Compare two requests.  Returns `None` if they are equal under `opts`,
/// otherwise a `-want +got` listing of the differences.
pub(crate) fn diff(
    want: &dyn Request,
    want_ty: RequestType,
    got: &dyn Request,
    got_ty: RequestType,
    opts: &[CompareOption]) -> Option<String>
{
    let mut out = String::new();
    if want_ty != got_ty {
        // Different methods sharing one sequence.
        let _ = writeln!(out, "-\t{}: {:?}", want_ty.name, want);
        let _ = writeln!(out, "+\t{}: {:?}", got_ty.name, got);
        return Some(out);
    }

    let want_fields = want.fields();
    let got_fields = got.fields();
    let mut differs = false;
    let _ = writeln!(out, " \t{} {{", want_ty.short_name());
    for (w, g) in want_fields.iter().zip(got_fields.iter()) {
        if opts.iter().any(|o| o.ignores(w)) {
            continue;
        }
        if w.value.eq_value(g.value) {
            let _ = writeln!(out, " \t\t{:?},", w);
        } else {
            differs = true;
            let _ = writeln!(out, "-\t\t{:?},", w);
            let _ = writeln!(out, "+\t\t{:?},", g);
        }
    }
    if want_fields.len() != got_fields.len() {
        differs = true;
        for w in want_fields.iter().skip(got_fields.len()) {
            let _ = writeln!(out, "-\t\t{:?},", w);
        }
        for g in got_fields.iter().skip(want_fields.len()) {
            let _ = writeln!(out, "+\t\t{:?},", g);
        }
    }
    let _ = writeln!(out, " \t}}");
    differs.then_some(out)
}
