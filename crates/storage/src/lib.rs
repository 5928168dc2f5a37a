use anyhow::{Context, Result};
use myco_ledger::{EventLog, LedgerState, RecordedEvent, StateInvariantError, Token};
use parking_lot::RwLock;
use sled::transaction::{ConflictableTransactionResult, TransactionError};
use sled::{Batch, Db, Transactional, Tree};
use std::path::Path;
use std::sync::Arc;

const LEDGER_TREE: &str = "ledger";
const EVENTS_TREE: &str = "events";
const STATE_KEY: &[u8] = b"state";

/// Storage errors
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Stored ledger state violates an invariant: {0}")]
    StateInvariantViolation(#[from] StateInvariantError),
    #[error("Malformed event key: {0:?}")]
    EventKey(Vec<u8>),
}

/// Abstract ledger persistence
pub trait LedgerStore {
    /// Latest saved snapshot, if any.
    fn load(&self) -> Result<Option<LedgerState>>;
    /// Replace the saved snapshot.
    fn save(&self, state: &LedgerState) -> Result<()>;

    /// Load and verify a snapshot, rebuilding the ledger from it.
    fn load_token(&self) -> Result<Option<Token>> {
        match self.load()? {
            Some(state) => {
                let token = Token::from_state(state).map_err(StorageError::from)?;
                Ok(Some(token))
            }
            None => Ok(None),
        }
    }

    fn save_token(&self, token: &Token) -> Result<()> {
        self.save(token.state())
    }
}

/// Sled-backed implementation
///
/// The `ledger` tree holds the state under one key with an empty journal.
/// Journal entries live in the `events` tree keyed by big-endian sequence,
/// so a save only writes the entries recorded since the previous one.
pub struct SledLedgerStore {
    db: Db,
    ledger: Tree,
    events: Tree,
}

impl SledLedgerStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let db = sled::open(path)
            .map_err(StorageError::from)
            .with_context(|| format!("failed to open ledger database at {}", path.display()))?;
        let ledger = db.open_tree(LEDGER_TREE).map_err(StorageError::from)?;
        let events = db.open_tree(EVENTS_TREE).map_err(StorageError::from)?;
        tracing::debug!(target: "storage", path = %path.display(), "ledger database opened");
        Ok(Self { db, ledger, events })
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush().map_err(StorageError::from)?;
        Ok(())
    }

    /// Number of journal entries held in the events tree.
    pub fn stored_event_count(&self) -> usize {
        self.events.len()
    }

    /// One past the highest stored sequence, or zero when none are stored.
    fn stored_next_sequence(&self) -> Result<u64> {
        match self.events.last().map_err(StorageError::from)? {
            Some((key, _)) => Ok(sequence_of(&key)? + 1),
            None => Ok(0),
        }
    }

    /// Journal writes needed to bring the events tree in line with `events`.
    fn journal_batch(&self, events: &EventLog) -> Result<(Batch, usize)> {
        let stored = self.stored_next_sequence()?;
        let next = events.next_sequence();
        let mut batch = Batch::default();

        // A shorter journal than the stored one replaces it wholesale.
        let from = if stored > next {
            for sequence in next..stored {
                batch.remove(sequence.to_be_bytes().to_vec());
            }
            0
        } else {
            stored
        };

        let pending = events.since(from);
        for entry in pending {
            let data = serde_json::to_vec(entry).map_err(StorageError::from)?;
            batch.insert(entry.sequence.to_be_bytes().to_vec(), data);
        }
        Ok((batch, pending.len()))
    }
}

fn sequence_of(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key
        .try_into()
        .map_err(|_| StorageError::EventKey(key.to_vec()))?;
    Ok(u64::from_be_bytes(bytes))
}

/// The state with its journal entries stripped, keeping the sequence counter.
fn state_head(state: &LedgerState) -> LedgerState {
    LedgerState {
        initialized: state.initialized,
        roles: state.roles.clone(),
        supply: state.supply.clone(),
        pause: state.pause.clone(),
        tax: state.tax.clone(),
        allowances: state.allowances.clone(),
        events: EventLog::restore(state.events.next_sequence(), Vec::new()),
    }
}

impl LedgerStore for SledLedgerStore {
    fn load(&self) -> Result<Option<LedgerState>> {
        let Some(bytes) = self.ledger.get(STATE_KEY).map_err(StorageError::from)? else {
            return Ok(None);
        };
        let mut state: LedgerState = serde_json::from_slice(&bytes)
            .map_err(StorageError::from)
            .context("failed to decode stored ledger state")?;

        let next_sequence = state.events.next_sequence();
        let mut entries = Vec::new();
        for value in self.events.range(..next_sequence.to_be_bytes()).values() {
            let value = value.map_err(StorageError::from)?;
            let entry: RecordedEvent = serde_json::from_slice(&value)
                .map_err(StorageError::from)
                .context("failed to decode stored ledger event")?;
            entries.push(entry);
        }
        state.events = EventLog::restore(next_sequence, entries);

        tracing::debug!(
            target: "storage",
            events = state.events.len(),
            "ledger state loaded"
        );
        Ok(Some(state))
    }

    fn save(&self, state: &LedgerState) -> Result<()> {
        let head = serde_json::to_vec(&state_head(state)).map_err(StorageError::from)?;
        let (journal, appended) = self.journal_batch(&state.events)?;

        (&self.ledger, &self.events)
            .transaction(|(ledger, events)| -> ConflictableTransactionResult<()> {
                events.apply_batch(&journal)?;
                ledger.insert(STATE_KEY, head.as_slice())?;
                Ok(())
            })
            .map_err(|err| match err {
                TransactionError::Storage(err) => StorageError::Database(err),
                TransactionError::Abort(()) => StorageError::Database(sled::Error::Unsupported(
                    "ledger save aborted".to_string(),
                )),
            })?;
        self.flush()?;

        tracing::debug!(
            target: "storage",
            events = state.events.len(),
            appended,
            "ledger state saved"
        );
        Ok(())
    }
}

/// In-memory testing backend
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerStore {
    state: Arc<RwLock<Option<LedgerState>>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&self) -> Result<Option<LedgerState>> {
        Ok(self.state.read().clone())
    }

    fn save(&self, state: &LedgerState) -> Result<()> {
        *self.state.write() = Some(state.clone());
        Ok(())
    }
}
