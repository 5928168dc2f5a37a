//! Process-wide pause switch

use crate::errors::{LedgerError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseGate {
    paused: bool,
}

impl PauseGate {
    pub fn new() -> Self {
        Self { paused: false }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Reject balance-mutating work while paused.
    pub fn ensure_not_paused(&self) -> Result<()> {
        if self.paused {
            Err(LedgerError::Paused)
        } else {
            Ok(())
        }
    }

    pub(crate) fn pause(&mut self) -> Result<()> {
        self.set(true)
    }

    pub(crate) fn unpause(&mut self) -> Result<()> {
        self.set(false)
    }

    fn set(&mut self, paused: bool) -> Result<()> {
        if self.paused == paused {
            return Err(LedgerError::AlreadyInState { paused });
        }
        self.paused = paused;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_and_rejects_redundant_changes() {
        let mut gate = PauseGate::new();
        assert!(gate.ensure_not_paused().is_ok());
        assert_eq!(
            gate.unpause().unwrap_err(),
            LedgerError::AlreadyInState { paused: false }
        );

        gate.pause().unwrap();
        assert!(gate.is_paused());
        assert_eq!(gate.ensure_not_paused().unwrap_err(), LedgerError::Paused);
        assert_eq!(
            gate.pause().unwrap_err(),
            LedgerError::AlreadyInState { paused: true }
        );

        gate.unpause().unwrap();
        assert!(!gate.is_paused());
    }
}
