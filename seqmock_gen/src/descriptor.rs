// vim: tw=80
//! Descriptions of the types and methods to mock.
//!
//! These are plain values, independent of any source syntax.  A [`Package`]
//! hands out [`Type`]s, whose [`SourceMethod`]s are reduced by
//! [`filter_methods`] to the [`Method`]s that actually get mocked.

/// The prefix that marks a variadic parameter's type, like `...T`.
pub const VARIADIC: &str = "...";

/// A parameter or result of a method
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Variable {
    /// Empty if the variable is unnamed in the source
    pub name: String,
    /// The type, as written in the source
    pub ty: String
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Variable{name: name.into(), ty: ty.into()}
    }

    pub fn is_variadic(&self) -> bool {
        self.ty.starts_with(VARIADIC)
    }
}

/// A method as reported by the source extractor, before filtering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceMethod {
    pub name: String,
    pub public: bool,
    pub params: Vec<Variable>,
    pub results: Vec<Variable>
}

/// A type with methods, as reported by the source extractor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Type {
    pub name: String,
    /// Name of the package that defines the type
    pub package: String,
    /// All methods in declaration order, public or not
    pub methods: Vec<SourceMethod>
}

/// Where types are looked up.
pub trait Package {
    fn name(&self) -> &str;

    fn lookup(&self, name: &str) -> Option<&Type>;
}

/// A mockable method: public, with every parameter and result named.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Method {
    /// Name of the mock type that owns this method
    pub owner: String,
    pub name: String,
    pub params: Vec<Variable>,
    pub results: Vec<Variable>
}

impl Method {
    /// Name of the struct packing this method's parameters
    pub fn param_type_name(&self) -> String {
        format!("{}{}_P", self.owner, to_public_name(&self.name))
    }

    /// Name of the struct packing this method's results
    pub fn result_type_name(&self) -> String {
        format!("{}{}_R", self.owner, to_public_name(&self.name))
    }

    /// Name of the struct grouping this method's queues
    pub fn queue_type_name(&self) -> String {
        format!("{}{}_Q", self.owner, to_public_name(&self.name))
    }
}

/// Upper-case the first character of `name`.
pub fn to_public_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new()
    }
}

/// Convert a parameter type into a type that can be stored in a struct
/// field: a variadic `...T` becomes `Vec<T>`.
pub fn to_storable_type(ty: &str) -> String {
    match ty.strip_prefix(VARIADIC) {
        Some(elem) => format!("Vec<{}>", elem),
        None => ty.to_owned()
    }
}

/// Name for the `n`th variable, if it has none of its own.
fn var_name(name: &str, prefix: &str, n: usize) -> String {
    if name.is_empty() {
        format!("{}{}", prefix, n)
    } else {
        name.to_owned()
    }
}

/// Keep only the public methods of `src`, in order, naming every unnamed
/// parameter `in{n}` and every unnamed result `Out{n}`.
pub fn filter_methods(src: &[SourceMethod], owner: &str) -> Vec<Method> {
    src.iter()
        .filter(|m| m.public)
        .map(|m| Method {
            owner: owner.to_owned(),
            name: m.name.clone(),
            params: m.params.iter()
                .enumerate()
                .map(|(i, p)| Variable::new(var_name(&p.name, "in", i), &p.ty))
                .collect(),
            results: m.results.iter()
                .enumerate()
                .map(|(i, r)| Variable::new(var_name(&r.name, "Out", i), &r.ty))
                .collect()
        }).collect()
}
