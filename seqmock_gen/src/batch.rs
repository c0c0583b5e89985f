// vim: tw=80
//! Generating mocks for many types at once

use std::{convert::Infallible, str::FromStr};

use tracing::{debug, warn};

use crate::{
    GenConfig,
    Strategy,
    descriptor::Package,
    error::{BatchError, Error, Result}
};

/// Name of the file that a mock should be written to.
///
/// The name is lowercased, and loses one trailing `mock`, if any.
/// ```
/// # use seqmock_gen::{GenConfig, mock_filename};
/// let cfg = GenConfig::default();
/// assert_eq!("foo_mock.rs", mock_filename("FooMock", &cfg));
/// ```
pub fn mock_filename(mock_name: &str, cfg: &GenConfig) -> String {
    let lower = mock_name.to_lowercase();
    let base = lower.strip_suffix("mock").unwrap_or(&lower);
    if cfg.for_plain_test {
        format!("{}_mock_test.rs", base)
    } else {
        format!("{}_mock.rs", base)
    }
}

/// A type to mock, as given on the command line: `Original[:Mock]`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MockTarget {
    /// Name of the type to mock
    pub original: String,
    /// Explicit name of the mock, if any
    pub mock_name: Option<String>
}

impl MockTarget {
    pub fn new(original: impl Into<String>) -> Self {
        MockTarget{original: original.into(), mock_name: None}
    }

    /// The name of the mock struct: the explicit one, or else derived from
    /// the original's.
    pub fn mock_name(&self, cfg: &GenConfig) -> String {
        match &self.mock_name {
            Some(name) => name.clone(),
            None if cfg.mock_suffix => format!("{}Mock", self.original),
            None => self.original.clone()
        }
    }
}

impl FromStr for MockTarget {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Infallible> {
        let target = match s.split_once(':') {
            Some((original, mock)) if !mock.is_empty() => MockTarget {
                original: original.to_owned(),
                mock_name: Some(mock.to_owned())
            },
            Some((original, _)) => MockTarget::new(original),
            None => MockTarget::new(s)
        };
        Ok(target)
    }
}

/// One mock's generated source, ready to be written out.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedMock {
    /// Name of the mocked type
    pub original: String,
    pub mock_name: String,
    /// Suggested file name, from [`mock_filename`]
    pub filename: String,
    pub source: String
}

fn generate_one(cfg: &GenConfig, strategy: Strategy, target_pkg: &str,
                target: &MockTarget, pkg: &dyn Package)
    -> Result<GeneratedMock>
{
    let typ = pkg.lookup(&target.original)
        .ok_or_else(|| Error::NotFound(target.original.clone()))?;
    let mock_name = target.mock_name(cfg);
    let source = strategy.generate(cfg, &mock_name, target_pkg, typ, pkg)
        .map_err(|e| Error::Failed {
            name: target.original.clone(),
            source: Box::new(e)
        })?;
    Ok(GeneratedMock {
        original: target.original.clone(),
        filename: mock_filename(&mock_name, cfg),
        mock_name,
        source
    })
}

/// Generate a mock for every target, handing each one to `emit`.
///
/// A failure for one target, whether in lookup, in generation, or in `emit`,
/// doesn't stop the others.  Every failure is returned together at the end,
/// in the order that they happened.
pub fn generate_all<F>(cfg: &GenConfig, strategy: Strategy, target_pkg: &str,
                       targets: &[MockTarget], pkg: &dyn Package, mut emit: F)
    -> std::result::Result<(), BatchError>
    where F: FnMut(GeneratedMock) -> Result<()>
{
    let mut errors = BatchError::default();
    for target in targets {
        let r = generate_one(cfg, strategy, target_pkg, target, pkg)
            .and_then(|mock| {
                let mock_name = mock.mock_name.clone();
                emit(mock).map_err(|e| Error::Failed {
                    name: target.original.clone(),
                    source: Box::new(e)
                })?;
                Ok(mock_name)
            });
        match r {
            Ok(mock_name) => debug!(original = %target.original, %mock_name,
                                    "generated mock"),
            Err(e) => {
                warn!("{}", e);
                errors.push(e);
            }
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod t {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::t::fixture;

    #[test]
    fn filenames() {
        let cfg = GenConfig::default();
        assert_eq!("foo_mock.rs", mock_filename("Foo", &cfg));
        assert_eq!("foo_mock.rs", mock_filename("FooMock", &cfg));
        assert_eq!("foo_mock.rs", mock_filename("FOOMOCK", &cfg));
        assert_eq!("foo_mock.rs", mock_filename("foomock", &cfg));
        assert_eq!("foo__mock.rs", mock_filename("foo_mock", &cfg));
        assert_eq!("foomock_mock.rs", mock_filename("FooMockMock", &cfg));
        assert_eq!("_mock.rs", mock_filename("Mock", &cfg));
    }

    #[test]
    fn filenames_for_plain_test() {
        let cfg = GenConfig{for_plain_test: true, ..Default::default()};
        assert_eq!("foo_mock_test.rs", mock_filename("FooMock", &cfg));
    }

    #[test]
    fn parse_target() {
        let t: MockTarget = "Foo".parse().unwrap();
        assert_eq!(MockTarget::new("Foo"), t);
        let t: MockTarget = "Foo:Bar".parse().unwrap();
        assert_eq!(Some("Bar".to_owned()), t.mock_name);
        assert_eq!("Foo", t.original);
        let t: MockTarget = "Foo:".parse().unwrap();
        assert_eq!(MockTarget::new("Foo"), t);
        let t: MockTarget = "Foo:Bar:Baz".parse().unwrap();
        assert_eq!(Some("Bar:Baz".to_owned()), t.mock_name);
    }

    #[test]
    fn target_mock_name() {
        let plain = GenConfig::default();
        let suffixed = GenConfig{mock_suffix: true, ..Default::default()};
        let t = MockTarget::new("Foo");
        assert_eq!("Foo", t.mock_name(&plain));
        assert_eq!("FooMock", t.mock_name(&suffixed));
        let t: MockTarget = "Foo:Fake".parse().unwrap();
        assert_eq!("Fake", t.mock_name(&suffixed));
    }

    #[test]
    fn batch_continues_after_failures() {
        let (pkg, _) = fixture();
        let cfg = GenConfig{mock_suffix: true, ..Default::default()};
        let targets = ["Nope", "Kv", "Kv:Bad Name"].iter()
            .map(|s| s.parse().unwrap())
            .collect::<Vec<MockTarget>>();
        let mut emitted = Vec::new();
        let errs = generate_all(&cfg, Strategy::Queue, "mocks", &targets,
                                &pkg, |m| {
            emitted.push(m);
            Ok(())
        }).unwrap_err();
        assert_eq!(1, emitted.len());
        assert_eq!("KvMock", emitted[0].mock_name);
        assert_eq!("kv_mock.rs", emitted[0].filename);
        assert_eq!("Kv", emitted[0].original);
        assert_eq!(2, errs.len());
        assert!(matches!(errs.errors()[0], Error::NotFound(ref n) if n == "Nope"));
        assert!(errs.to_string().starts_with(concat!(
            "found some errors:\n",
            "#1 - not found type: Nope, skipped\n",
            "#2 - failed to generate mock for Kv: invalid identifier")),
            "{}", errs);
    }

    #[test]
    fn emit_failure() {
        let (pkg, _) = fixture();
        let targets = vec![MockTarget::new("Kv")];
        let errs = generate_all(&GenConfig::default(), Strategy::Sequence,
                                "mocks", &targets, &pkg, |_| {
            Err(Error::Io(std::io::Error::other("disk full")))
        }).unwrap_err();
        assert_eq!("found some errors:\n\
                    #1 - failed to generate mock for Kv: disk full\n",
                   errs.to_string());
    }

    #[test]
    fn batch_success() {
        let (pkg, _) = fixture();
        let targets = vec![MockTarget::new("Kv")];
        let mut n = 0;
        generate_all(&GenConfig::default(), Strategy::Grouped, "mocks",
                     &targets, &pkg, |m| {
            assert_eq!("kv_mock.rs", m.filename);
            n += 1;
            Ok(())
        }).unwrap();
        assert_eq!(1, n);
    }
}
