//! Permission evaluation

use crate::models::{Identity, RoleSet};

/// Decide whether `identity` may access something open to `allowed`
///
/// Nobody signed in is always denied. Otherwise the identity's role must be
/// a member of `allowed`; there is no role hierarchy.
pub fn has_permission(identity: Option<&Identity>, allowed: RoleSet) -> bool {
    identity.is_some_and(|identity| allowed.contains(identity.role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn identity(role: Role) -> Identity {
        Identity::new("1", "a@b.com", "A", role)
    }

    /// Every subset of the known roles
    fn all_role_sets() -> impl Iterator<Item = RoleSet> {
        (0u32..(1 << Role::ALL.len())).map(|mask| {
            Role::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, role)| role)
                .collect()
        })
    }

    #[test]
    fn test_nobody_signed_in_is_denied() {
        for allowed in all_role_sets() {
            assert!(!has_permission(None, allowed), "allowed {:?}", allowed);
        }
    }

    #[test]
    fn test_permission_is_exact_membership() {
        for role in Role::ALL {
            let identity = identity(role);
            for allowed in all_role_sets() {
                assert_eq!(
                    has_permission(Some(&identity), allowed),
                    allowed.contains(role),
                    "role {} allowed {:?}",
                    role,
                    allowed
                );
            }
        }
    }

    #[test]
    fn test_super_admin_gets_no_implicit_elevation() {
        let identity = identity(Role::SuperAdmin);
        assert!(!has_permission(Some(&identity), RoleSet::from(Role::Staff)));
    }

    #[test]
    fn test_empty_allow_list_denies_everyone() {
        for role in Role::ALL {
            assert!(!has_permission(Some(&identity(role)), RoleSet::EMPTY));
        }
    }

    #[test]
    fn test_staff_passes_mixed_allow_list() {
        let allowed = RoleSet::of(&[Role::SuperAdmin, Role::Staff]);
        assert!(has_permission(Some(&identity(Role::Staff)), allowed));
    }
}
