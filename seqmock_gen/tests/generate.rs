// vim: tw=80
//! Generated sources must be well-formed Rust, whatever the strategy
#![deny(warnings)]

use pretty_assertions::assert_eq;
use seqmock_gen::*;

const SRC: &str = r#"
    pub struct Account;

    impl Account {
        pub fn open(name: &str) -> Self { unimplemented!() }
        pub fn deposit(&self, amount: u64) -> Result<u64, String> {
            unimplemented!()
        }
        pub fn owner(&self) -> &str { unimplemented!() }
        pub fn transfer(&self, to: &Account, _: u64, memo: Option<&str>) {}
        pub fn split(&self) -> (u64, u64) { unimplemented!() }
        pub fn first<'a>(&self, names: &'a [&'a str]) -> Option<&'a str> {
            unimplemented!()
        }
        fn audit(&self) {}
    }

    pub trait Notifier {
        fn notify(&self, user: &str, message: String) -> bool;
        fn fork(&self) -> Self;
    }
"#;

fn generate(strategy: Strategy, name: &str) -> String {
    let pkg = SourcePackage::parse("bank", SRC).unwrap();
    let typ = pkg.lookup(name).unwrap();
    strategy.generate(&GenConfig::default(), &format!("{}Mock", name),
                      "bank", typ, &pkg)
        .unwrap()
}

#[test]
fn every_strategy_parses() {
    for r in 1..=3 {
        let strategy = Strategy::from_revision(r).unwrap();
        for name in ["Account", "Notifier"] {
            let src = generate(strategy, name);
            let file = syn::parse_file(&src)
                .unwrap_or_else(|e| panic!("{}\n{}", e, src));
            assert_eq!(2, file.attrs.len(), "{}", src);
        }
    }
}

#[test]
fn private_and_static_methods_are_skipped() {
    for r in 1..=3 {
        let src = generate(Strategy::from_revision(r).unwrap(), "Account");
        assert!(!src.contains("audit"), "{}", src);
        assert!(!src.contains("fn open"), "{}", src);
        assert!(src.contains("fn transfer"), "{}", src);
    }
}

#[test]
fn pack_names() {
    let src = generate(Strategy::Grouped, "Account");
    for name in ["AccountMockDeposit_P", "AccountMockDeposit_R",
                 "AccountMockDeposit_Q", "AccountMockSplit_R"]
    {
        assert!(src.contains(&format!("pub struct {}", name)), "{}", src);
    }
}

fn squash(s: &str) -> String {
    s.split_whitespace().collect()
}

#[test]
fn unnamed_params_and_results() {
    let src = squash(&generate(Strategy::Queue, "Account"));
    assert!(src.contains("pubin1:u64"), "{}", src);
    // A tuple is a single result
    assert!(src.contains("pubOut0:(u64,u64)"), "{}", src);
    assert!(src.contains("pubOut0:&'staticstr"), "{}", src);
}

#[test]
fn nested_borrows_are_owned() {
    let src = squash(&generate(Strategy::Sequence, "Account"));
    assert!(src.contains(concat!(
        "pubmemo:::std::option::Option<",
        "<stras::std::borrow::ToOwned>::Owned>")), "{}", src);
    assert!(src.contains(concat!(
        "pubnames:::std::vec::Vec<<stras::std::borrow::ToOwned>::Owned>")),
        "{}", src);
    assert!(src.contains(concat!(
        "pubfnfirst<'a>(&self,names:&'a[&'astr])->Option<&'astr>")),
        "{}", src);
    assert!(src.contains("pubOut0:Option<&'staticstr>"), "{}", src);
}

#[test]
fn trait_self_is_the_mock() {
    for r in 1..=3 {
        let src = squash(&generate(Strategy::from_revision(r).unwrap(),
                                   "Notifier"));
        assert!(src.contains("pubfnfork(&self)->NotifierMock{"), "{}", src);
        assert!(src.contains("pubOut0:NotifierMock"), "{}", src);
        assert!(!src.contains("Self,") && !src.contains(":Self"), "{}", src);
    }
}
