// vim: tw=80
//! Mocks generated with revision 2
#![deny(warnings)]

use pretty_assertions::assert_eq;
use seqmock_tests::{Currency, rev2::*};

#[test]
fn results_in_order() {
    let mock = LedgerMock::default();
    mock.deposit.lock().unwrap()
        .returning(LedgerMockDeposit_R{Out0: Ok(10)})
        .returning(LedgerMockDeposit_R{Out0: Ok(25)});
    assert_eq!(Ok(10), mock.deposit("alice", 10));
    assert_eq!(Ok(25), mock.deposit("alice", 15));
    let q = mock.deposit.lock().unwrap();
    assert_eq!(0, q.remaining());
    let amounts = q.calls().iter().map(|p| p.amount).collect::<Vec<_>>();
    assert_eq!(vec![10, 15], amounts);
}

#[test]
fn queues_are_public() {
    let mock = LedgerMock::default();
    mock.balance.lock().unwrap().rs.push_back(LedgerMockBalance_R{Out0: 4});
    assert_eq!(4, mock.balance("bob"));
    assert_eq!("bob", mock.balance.lock().unwrap().ps[0].account);
}

#[test]
fn no_results() {
    let mock = NotifierMock::default();
    mock.notify.lock().unwrap().returning(NotifierMockNotify_R{});
    mock.notify("bob", "bye".to_owned());
    assert_eq!(1, mock.notify.lock().unwrap().calls().len());
}

#[test]
#[should_panic(expected = "NotifierMock::notify: no result queued for call #0")]
fn empty_queue() {
    let mock = NotifierMock::default();
    mock.notify("bob", "bye".to_owned());
}

#[test]
fn local_types_and_borrows() {
    let mock = LedgerMock::default();
    mock.convert.lock().unwrap().returning(LedgerMockConvert_R{Out0: 7});
    mock.memo.lock().unwrap().returning(LedgerMockMemo_R{Out0: false});
    mock.richest.lock().unwrap().returning(LedgerMockRichest_R{Out0: None});
    assert_eq!(7, mock.convert(7, Currency::Usd));
    assert!(!mock.memo("bob", None));
    assert_eq!(None, mock.richest(&[]));
    assert_eq!(Currency::Usd, mock.convert.lock().unwrap().calls()[0].to);
    assert_eq!(None, mock.memo.lock().unwrap().calls()[0].note);
    assert!(mock.richest.lock().unwrap().calls()[0].accounts.is_empty());
}

#[test]
fn returns_self() {
    let mock = NotifierMock::default();
    mock.fork.lock().unwrap()
        .returning(NotifierMockFork_R{Out0: NotifierMock::default()});
    let forked = mock.fork();
    assert_eq!(0, forked.fork.lock().unwrap().remaining());
    assert_eq!(0, mock.fork.lock().unwrap().remaining());
}
