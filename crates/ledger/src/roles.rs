//! Role registry
//!
//! Maps each [`Role`] to the set of accounts holding it. Only `Admin`
//! holders may change membership; queries are unrestricted.

use crate::errors::{LedgerError, Result};
use myco_types::{AccountId, Role};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRegistry {
    members: BTreeMap<Role, BTreeSet<AccountId>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self {
            members: BTreeMap::new(),
        }
    }

    /// Whether `account` currently holds `role`.
    pub fn has_role(&self, role: Role, account: &AccountId) -> bool {
        self.members
            .get(&role)
            .map(|set| set.contains(account))
            .unwrap_or(false)
    }

    /// Authorization check performed at the top of every privileged entry point.
    pub fn ensure_role(&self, caller: &AccountId, role: Role) -> Result<()> {
        if self.has_role(role, caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                account: *caller,
                role,
            })
        }
    }

    /// Grant `role` to `account`. Requires `caller` to hold `Admin`.
    ///
    /// Returns `true` if membership changed; granting an already-held role is
    /// a successful no-op.
    pub fn grant(&mut self, caller: &AccountId, role: Role, account: AccountId) -> Result<bool> {
        self.ensure_role(caller, Role::Admin)?;
        Ok(self.insert(role, account))
    }

    /// Revoke `role` from `account`. Requires `caller` to hold `Admin`.
    ///
    /// Returns `true` if membership changed; revoking an absent role is a
    /// successful no-op.
    pub fn revoke(&mut self, caller: &AccountId, role: Role, account: &AccountId) -> Result<bool> {
        self.ensure_role(caller, Role::Admin)?;
        Ok(self.remove(role, account))
    }

    /// Accounts holding `role`, in ascending id order.
    pub fn members(&self, role: Role) -> impl Iterator<Item = &AccountId> {
        self.members.get(&role).into_iter().flatten()
    }

    /// Roles held by `account`, in declaration order.
    pub fn roles_of(&self, account: &AccountId) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.has_role(*role, account))
            .collect()
    }

    pub(crate) fn insert(&mut self, role: Role, account: AccountId) -> bool {
        self.members.entry(role).or_default().insert(account)
    }

    pub(crate) fn remove(&mut self, role: Role, account: &AccountId) -> bool {
        let Some(set) = self.members.get_mut(&role) else {
            return false;
        };
        let removed = set.remove(account);
        if set.is_empty() {
            self.members.remove(&role);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u8) -> AccountId {
        let mut id = [0u8; 32];
        id[0] = n;
        AccountId::new(id)
    }

    fn registry_with_admin(admin: AccountId) -> RoleRegistry {
        let mut registry = RoleRegistry::new();
        registry.insert(Role::Admin, admin);
        registry
    }

    #[test]
    fn admin_grants_and_revokes() {
        let admin = account(1);
        let user = account(2);
        let mut registry = registry_with_admin(admin);

        assert!(registry.grant(&admin, Role::Minter, user).unwrap());
        assert!(registry.has_role(Role::Minter, &user));
        assert_eq!(registry.roles_of(&user), vec![Role::Minter]);

        assert!(registry.revoke(&admin, Role::Minter, &user).unwrap());
        assert!(!registry.has_role(Role::Minter, &user));
        assert_eq!(registry.members(Role::Minter).count(), 0);
    }

    #[test]
    fn grant_and_revoke_are_idempotent() {
        let admin = account(1);
        let user = account(2);
        let mut registry = registry_with_admin(admin);

        assert!(registry.grant(&admin, Role::Excluded, user).unwrap());
        assert!(!registry.grant(&admin, Role::Excluded, user).unwrap());
        assert!(registry.revoke(&admin, Role::Excluded, &user).unwrap());
        assert!(!registry.revoke(&admin, Role::Excluded, &user).unwrap());
    }

    #[test]
    fn non_admin_rejected_without_change() {
        let admin = account(1);
        let intruder = account(3);
        let mut registry = registry_with_admin(admin);
        let before = registry.clone();

        let err = registry.grant(&intruder, Role::Admin, intruder).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Unauthorized {
                account: intruder,
                role: Role::Admin
            }
        );
        let err = registry.revoke(&intruder, Role::Admin, &admin).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));
        assert_eq!(registry, before);
    }

    #[test]
    fn admin_can_revoke_own_admin() {
        let admin = account(1);
        let mut registry = registry_with_admin(admin);

        assert!(registry.revoke(&admin, Role::Admin, &admin).unwrap());
        assert!(registry.grant(&admin, Role::Admin, admin).is_err());
    }

    #[test]
    fn roles_are_independent() {
        let admin = account(1);
        let user = account(2);
        let mut registry = registry_with_admin(admin);

        registry.grant(&admin, Role::Pauser, user).unwrap();
        registry.grant(&admin, Role::Governor, user).unwrap();
        assert!(registry.ensure_role(&user, Role::Pauser).is_ok());
        assert!(registry.ensure_role(&user, Role::Minter).is_err());
        assert_eq!(registry.roles_of(&user), vec![Role::Pauser, Role::Governor]);
    }
}
