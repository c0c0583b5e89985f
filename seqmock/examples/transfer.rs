// vim: tw=80
//! Verifying the order in which a service talks to its collaborators.
//!
//! The `BankMock` below has the shape that `seqmock-gen --revision 3` writes
//! for a `Bank` type with `balance` and `withdraw` methods.
#![allow(non_camel_case_types, non_snake_case)]

use seqmock::*;

#[derive(Debug)]
pub struct BankMockBalance_P {
    pub account: String
}
impl Request for BankMockBalance_P {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::new("account", &self.account)]
    }
}

#[derive(Debug)]
pub struct BankMockBalance_R {
    pub Out0: u64
}
impl Response for BankMockBalance_R {}

#[derive(Debug)]
pub struct BankMockWithdraw_P {
    pub account: String,
    pub amount: u64
}
impl Request for BankMockWithdraw_P {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("account", &self.account),
            Field::new("amount", &self.amount),
        ]
    }
}

#[derive(Debug)]
pub struct BankMockWithdraw_R {
    pub Out0: Result<u64, String>
}
impl Response for BankMockWithdraw_R {}

pub struct BankMock {
    pub seq: Sequence
}

impl BankMock {
    pub fn new(seq: &Sequence) -> Self {
        BankMock{seq: seq.clone()}
    }

    pub fn balance(&self, account: &str) -> u64 {
        let r: BankMockBalance_R = self.seq.call_as("balance",
            BankMockBalance_P{account: account.to_owned()});
        r.Out0
    }

    pub fn withdraw(&self, account: &str, amount: u64) -> Result<u64, String> {
        let r: BankMockWithdraw_R = self.seq.call_as("withdraw",
            BankMockWithdraw_P{account: account.to_owned(), amount});
        r.Out0
    }
}

/// Withdraw everything above `keep`
fn sweep(bank: &BankMock, account: &str, keep: u64) -> Result<u64, String> {
    let balance = bank.balance(account);
    if balance <= keep {
        return Ok(0);
    }
    bank.withdraw(account, balance - keep)
}

fn main() {
    let seq = Sequence::new()
        .add_call(Call::new(
            BankMockBalance_P{account: "alice".into()},
            BankMockBalance_R{Out0: 120}))
        .add_call(Call::new(
            BankMockWithdraw_P{account: "alice".into(), amount: 20},
            BankMockWithdraw_R{Out0: Ok(100)}));
    let bank = BankMock::new(&seq);
    assert_eq!(Ok(100), sweep(&bank, "alice", 100));
    seq.is_end();
    println!("sweep made the expected calls");
}
