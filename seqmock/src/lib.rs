// vim: tw=80
//! Call-sequence verification for generated mocks.
//!
//! `seqmock` is the runtime half of a mock generator.  `seqmock_gen` writes
//! mock structs for a type's public methods; mocks generated with the
//! *sequence* strategy forward every call to a shared [`Sequence`], which
//! checks that the calls arrive in exactly the order the test expects and with
//! exactly the expected arguments, and hands back the preprogrammed response.
//!
//! # Usage
//!
//! * Build a [`Sequence`] from the expected [`Call`]s.  Each call pairs a
//!   request (the method's arguments, packed into a struct) with a response
//!   (the method's return values, packed likewise).
//! * Give a handle of the sequence to every mock that takes part.  Several
//!   mocks, and several methods, may share one sequence.
//! * Exercise the code under test.  Every mock call is checked against the
//!   next expected call.  The first deviation panics.
//! * Finish with [`Sequence::is_end`], which panics if any expected call was
//!   never made.
//!
//! # Getting started
//!
//! Generated mocks look like this (written out by hand here):
//! ```
//! use seqmock::*;
//!
//! #[derive(Debug)]
//! pub struct StoreMockGet_P { pub key: String }
//! impl Request for StoreMockGet_P {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![Field::new("key", &self.key)]
//!     }
//! }
//!
//! #[derive(Debug)]
//! #[allow(non_snake_case)]
//! pub struct StoreMockGet_R { pub Out0: Option<u32> }
//! impl Response for StoreMockGet_R {}
//!
//! pub struct StoreMock { pub seq: Sequence }
//! impl StoreMock {
//!     pub fn get(&self, key: &str) -> Option<u32> {
//!         let r: StoreMockGet_R = self.seq.call_as("get",
//!             StoreMockGet_P { key: key.to_owned() });
//!         r.Out0
//!     }
//! }
//!
//! let seq = Sequence::new()
//!     .add_call(Call::new(StoreMockGet_P{key: "a".to_owned()},
//!                         StoreMockGet_R{Out0: Some(1)}))
//!     .add_call(Call::new(StoreMockGet_P{key: "b".to_owned()},
//!                         StoreMockGet_R{Out0: None}));
//! let mock = StoreMock{seq: seq.clone()};
//! assert_eq!(Some(1), mock.get("a"));
//! assert_eq!(None, mock.get("b"));
//! seq.is_end();
//! ```
//!
//! # Failures
//!
//! All failures panic, so they fail the test that triggered them.  There are
//! four:
//!
//! * A call whose request differs from the expected one.  The panic message
//!   names the method and the position in the sequence, followed by a
//!   `-want +got` diff of the request fields.
//! * A call made after every expected call was consumed.
//! * A response of a different type than the calling mock expects.
//! * Expected calls still pending when [`Sequence::is_end`] is invoked.
//!
//! ```should_panic(expected = "call for get (#0) has unexpected arguments")
//! # use seqmock::*;
//! # #[derive(Debug)]
//! # pub struct P { pub key: String }
//! # impl Request for P {
//! #     fn fields(&self) -> Vec<Field<'_>> { vec![Field::new("key", &self.key)] }
//! # }
//! # #[derive(Debug)]
//! # pub struct R;
//! # impl Response for R {}
//! let seq = Sequence::new()
//!     .add_call(Call::new(P{key: "a".to_owned()}, R));
//! seq.call("get", P{key: "b".to_owned()});
//! ```
//!
//! # Comparison options
//!
//! Requests are compared field by field.  A [`CompareOption`] removes fields
//! from the comparison, either by name or by type.
//!
//! # Threading
//!
//! A `Sequence` is a cheap, cloneable handle to state that is not shared
//! between threads.  It is neither `Send` nor `Sync`.

use downcast::*;
use std::{
    any,
    cell::RefCell,
    fmt,
    rc::Rc
};

mod compare;

pub use crate::compare::{CompareOption, Field, Value};
use crate::compare::RequestType;

/// Capability of a method's packed arguments.
///
/// Implemented by generated parameter packs.  Only types implementing
/// `Request` can be sent through a [`Sequence`].
pub trait Request: fmt::Debug + 'static {
    /// The fields that take part in comparison, in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;
}

/// Capability of a method's packed return values.
///
/// Implemented by generated result packs.
pub trait Response: Any + fmt::Debug {}
downcast!(dyn Response);

/// A violated expectation.
///
/// Never returned to the caller: the [`Sequence`] panics with its `Display`
/// form as soon as it is detected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Mismatch {
    #[error("call for {name} (#{index}) has unexpected arguments: -want +got\n{diff}")]
    Unexpected {
        name: String,
        index: usize,
        diff: String
    },
    #[error("no calls at #{index} for {name}\nrequest={request}")]
    Exhausted {
        name: String,
        index: usize,
        request: String
    },
    #[error("call for {name} (#{index}) expected a response of type {expected}")]
    WrongResponse {
        name: String,
        index: usize,
        expected: &'static str
    },
    #[error("there are {count} non-proceeded calls: {remaining}")]
    Unconsumed {
        count: usize,
        remaining: String
    }
}

/// One expected call: the request a mock should receive, and the response it
/// should return.
pub struct Call {
    request: Box<dyn Request>,
    request_type: RequestType,
    // Taken when the call is consumed
    response: Option<Box<dyn Response>>
}

impl Call {
    pub fn new<P: Request, R: Response>(request: P, response: R) -> Self {
        Call {
            request: Box::new(request),
            request_type: RequestType::of::<P>(),
            response: Some(Box::new(response))
        }
    }
}

impl fmt::Debug for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.response {
            Some(r) => write!(f, "{:?} => {:?}", self.request, r),
            None => write!(f, "{:?} => (consumed)", self.request)
        }
    }
}

#[derive(Debug, Default)]
struct SeqInner {
    calls: Vec<Call>,
    opts: Vec<CompareOption>,
    index: usize
}

impl SeqInner {
    /// Check `request` against the next expected call and consume it.
    fn advance(&mut self, name: &str, request: &dyn Request, ty: RequestType)
        -> Result<Box<dyn Response>, Mismatch>
    {
        let index = self.index;
        let Some(call) = self.calls.get_mut(index) else {
            return Err(Mismatch::Exhausted {
                name: name.to_owned(),
                index,
                request: format!("{:?}", request)
            });
        };
        if let Some(diff) = compare::diff(&*call.request, call.request_type,
                                          request, ty, &self.opts)
        {
            return Err(Mismatch::Unexpected {
                name: name.to_owned(),
                index,
                diff
            });
        }
        let Some(response) = call.response.take() else {
            unreachable!("response for call #{} was already consumed", index)
        };
        self.index += 1;
        Ok(response)
    }

    fn check_end(&self) -> Result<(), Mismatch> {
        if self.index < self.calls.len() {
            let rest = &self.calls[self.index..];
            Err(Mismatch::Unconsumed {
                count: rest.len(),
                remaining: format!("{:?}", rest)
            })
        } else {
            Ok(())
        }
    }
}

/// An ordered list of expected calls, shared by the mocks of one test.
///
/// # Examples
/// ```
/// # use seqmock::*;
/// # #[derive(Debug)]
/// # pub struct P(u32);
/// # impl Request for P {
/// #     fn fields(&self) -> Vec<Field<'_>> { vec![Field::new("0", &self.0)] }
/// # }
/// # #[derive(Debug)]
/// # pub struct R(u32);
/// # impl Response for R {}
/// let seq = Sequence::with_calls([
///     Call::new(P(1), R(10)),
///     Call::new(P(2), R(20)),
/// ]);
/// let r: R = seq.call_as("double", P(1));
/// assert_eq!(10, r.0);
/// assert_eq!(1, seq.remaining());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Sequence {
    inner: Rc<RefCell<SeqInner>>
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sequence expecting `calls`, in order.
    pub fn with_calls<I>(calls: I) -> Self
        where I: IntoIterator<Item=Call>
    {
        Self::new().add_calls(calls)
    }

    /// Append one expected call.
    pub fn add_call(self, call: Call) -> Self {
        self.inner.borrow_mut().calls.push(call);
        self
    }

    /// Append several expected calls, in order.
    pub fn add_calls<I>(self, calls: I) -> Self
        where I: IntoIterator<Item=Call>
    {
        self.inner.borrow_mut().calls.extend(calls);
        self
    }

    /// Add an option for comparing requests.
    pub fn with_option(self, opt: CompareOption) -> Self {
        self.inner.borrow_mut().opts.push(opt);
        self
    }

    /// Replace all options for comparing requests.
    pub fn with_options<I>(self, opts: I) -> Self
        where I: IntoIterator<Item=CompareOption>
    {
        self.inner.borrow_mut().opts = opts.into_iter().collect();
        self
    }

    /// Check a mock call against the next expected call, and return the
    /// expected response.
    ///
    /// Called by mock code.
    ///
    /// # Panics
    ///
    /// If every expected call has already been made, or if `request` differs
    /// from the expected request.
    #[track_caller]
    pub fn call<P: Request>(&self, name: &str, request: P)
        -> Box<dyn Response>
    {
        let r = self.inner.borrow_mut()
            .advance(name, &request, RequestType::of::<P>());
        match r {
            Ok(response) => response,
            Err(m) => panic!("{}", m)
        }
    }

    /// Like [`call`](Self::call), but also downcast the response to the
    /// mock's result pack.
    ///
    /// # Panics
    ///
    /// Like `call`, and also if the expected response is not an `R`.
    #[track_caller]
    pub fn call_as<P: Request, R: Response>(&self, name: &str, request: P)
        -> R
    {
        let response = self.call(name, request);
        match response.downcast::<R>() {
            Ok(r) => *r,
            Err(_) => {
                let m = Mismatch::WrongResponse {
                    name: name.to_owned(),
                    index: self.position() - 1,
                    expected: any::type_name::<R>()
                };
                panic!("{}", m)
            }
        }
    }

    /// Check that every expected call has been made.
    ///
    /// Called by test code, when the test is done with its mocks.
    ///
    /// # Panics
    ///
    /// If some expected calls have not been made yet.
    #[track_caller]
    pub fn is_end(&self) {
        let r = self.inner.borrow().check_end();
        if let Err(m) = r {
            panic!("{}", m)
        }
    }

    /// Number of calls consumed so far
    pub fn position(&self) -> usize {
        self.inner.borrow().index
    }

    /// Number of calls not yet consumed
    pub fn remaining(&self) -> usize {
        let inner = self.inner.borrow();
        inner.calls.len() - inner.index
    }

    /// Total number of expected calls, consumed or not
    pub fn len(&self) -> usize {
        self.inner.borrow().calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
