// vim: tw=80
//! Types whose mocks are generated by the build script.
//!
//! The mocks live in modules `rev1`, `rev2` and `rev3`, one per strategy, and
//! are compiled only with the `mock` feature.

use std::{collections::HashMap, sync::Mutex};

/// Currency of a converted amount
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Currency {
    Usd,
    Eur
}

impl Currency {
    /// Value of 100 units of the ledger's currency
    fn rate(self) -> u64 {
        match self {
            Currency::Usd => 100,
            Currency::Eur => 92
        }
    }
}

/// Balances of a set of accounts
#[derive(Debug, Default)]
pub struct Ledger {
    balances: Mutex<HashMap<String, u64>>
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `account`, returning the new balance.
    pub fn deposit(&self, account: &str, amount: u64) -> Result<u64, String> {
        let mut balances = self.balances.lock()
            .map_err(|e| e.to_string())?;
        let balance = balances.entry(account.to_owned()).or_default();
        *balance = balance.checked_add(amount)
            .ok_or_else(|| format!("{}: balance overflow", account))?;
        let balance = *balance;
        drop(balances);
        self.audit(account, balance);
        Ok(balance)
    }

    pub fn balance(&self, account: &str) -> u64 {
        self.balances.lock()
            .map(|b| b.get(account).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn convert(&self, amount: u64, to: Currency) -> u64 {
        amount.saturating_mul(to.rate()) / 100
    }

    /// Whether `note` may be attached to `account`: the account must exist
    /// and the note must not be empty.
    pub fn memo(&self, account: &str, note: Option<&str>) -> bool {
        let exists = self.balances.lock()
            .map(|b| b.contains_key(account))
            .unwrap_or_default();
        exists && note.is_some_and(|n| !n.is_empty())
    }

    pub fn total(&self, accounts: &[&str]) -> u64 {
        accounts.iter().map(|a| self.balance(a)).sum()
    }

    /// The account with the highest balance
    pub fn richest<'a>(&self, accounts: &'a [&'a str]) -> Option<&'a str> {
        accounts.iter().copied().max_by_key(|a| self.balance(a))
    }

    fn audit(&self, account: &str, balance: u64) {
        debug_assert_eq!(balance, self.balance(account));
    }
}

/// Tells account holders about their accounts
pub trait Notifier {
    fn notify(&self, account: &str, message: String);

    /// A notifier for a separate channel
    fn fork(&self) -> Self;
}

include!(concat!(env!("OUT_DIR"), "/mocks.rs"));
