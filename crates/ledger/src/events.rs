//! Audit journal of ledger state changes
//!
//! Each successful mutation appends one or more events with a strictly
//! increasing sequence number. Rejected operations append nothing.

use myco_types::{AccountId, BasisPoints, Role, TokenAmount};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    Initialized {
        deployer: AccountId,
        initial_supply: TokenAmount,
    },
    Minted {
        by: AccountId,
        to: AccountId,
        amount: TokenAmount,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: TokenAmount,
    },
    Burned {
        from: AccountId,
        amount: TokenAmount,
    },
    Approval {
        owner: AccountId,
        spender: AccountId,
        amount: TokenAmount,
    },
    RoleGranted {
        role: Role,
        account: AccountId,
        by: AccountId,
    },
    RoleRevoked {
        role: Role,
        account: AccountId,
        by: AccountId,
    },
    Paused {
        by: AccountId,
    },
    Unpaused {
        by: AccountId,
    },
    TaxUpdated {
        by: AccountId,
        bps: BasisPoints,
    },
    FeeShareUpdated {
        by: AccountId,
        bps: BasisPoints,
    },
    BurnShareUpdated {
        by: AccountId,
        bps: BasisPoints,
    },
    TaxDestinationUpdated {
        by: AccountId,
        destination: AccountId,
    },
    TaxEnabled {
        by: AccountId,
    },
    TaxDisabled {
        by: AccountId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub sequence: u64,
    pub event: LedgerEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    next_sequence: u64,
    entries: Vec<RecordedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            next_sequence: 0,
            entries: Vec::new(),
        }
    }

    /// Rebuild a log from persisted entries.
    ///
    /// The result is not checked; see [`EventLog::is_consistent`].
    pub fn restore(next_sequence: u64, entries: Vec<RecordedEvent>) -> Self {
        Self {
            next_sequence,
            entries,
        }
    }

    /// Sequence number the next recorded event receives.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub(crate) fn record(&mut self, event: LedgerEvent) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(RecordedEvent { sequence, event });
        sequence
    }

    pub fn entries(&self) -> &[RecordedEvent] {
        &self.entries
    }

    /// Events with `sequence >= from`.
    pub fn since(&self, from: u64) -> &[RecordedEvent] {
        let start = self.entries.partition_point(|entry| entry.sequence < from);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sequences must be strictly increasing and below `next_sequence`.
    pub fn is_consistent(&self) -> bool {
        let ordered = self
            .entries
            .windows(2)
            .all(|pair| pair[0].sequence < pair[1].sequence);
        let bounded = self
            .entries
            .last()
            .map(|last| last.sequence < self.next_sequence)
            .unwrap_or(true);
        ordered && bounded
    }
}
