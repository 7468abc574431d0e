//! Dashboard page registry and menu filtering

use serde::Serialize;

use crate::models::{Identity, Role, RoleSet};
use crate::permission;

/// A dashboard page and the roles allowed to open it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub slug: &'static str,
    pub title: &'static str,
    pub path: &'static str,
    pub allowed: RoleSet,
}

const ADMINS: RoleSet = RoleSet::of(&[Role::SuperAdmin, Role::Admin]);
const OPERATIONS: RoleSet = ADMINS.with(Role::Staff);

/// Every page of the dashboard, in menu order
pub const PAGES: &[Page] = &[
    Page {
        slug: "dashboard",
        title: "Dashboard",
        path: "/pages/dashboard",
        allowed: ADMINS,
    },
    Page {
        slug: "orders",
        title: "Orders",
        path: "/pages/orders",
        allowed: OPERATIONS,
    },
    Page {
        slug: "activations",
        title: "Activations",
        path: "/pages/activations",
        allowed: OPERATIONS,
    },
    Page {
        slug: "customers",
        title: "Customers",
        path: "/pages/customers",
        allowed: OPERATIONS,
    },
    Page {
        slug: "stations",
        title: "Stations",
        path: "/pages/stations",
        allowed: OPERATIONS.with(Role::LocationPartner),
    },
    Page {
        slug: "campaigns",
        title: "Campaigns",
        path: "/pages/campaigns",
        allowed: ADMINS.with(Role::AdClient).with(Role::Sponsor),
    },
    Page {
        slug: "crm",
        title: "CRM Leads",
        path: "/pages/crm",
        allowed: ADMINS,
    },
    Page {
        slug: "team",
        title: "Team Performance",
        path: "/pages/team",
        allowed: ADMINS,
    },
    Page {
        slug: "events",
        title: "Events",
        path: "/pages/events",
        allowed: OPERATIONS,
    },
    Page {
        slug: "users",
        title: "User Management",
        path: "/pages/users",
        allowed: RoleSet::of(&[Role::SuperAdmin]),
    },
];

pub fn find_page(slug: &str) -> Option<&'static Page> {
    PAGES.iter().find(|page| page.slug == slug)
}

/// Menu entries `identity` may open
pub fn visible_pages(identity: Option<&Identity>) -> impl Iterator<Item = &'static Page> + '_ {
    PAGES
        .iter()
        .filter(move |page| permission::has_permission(identity, page.allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn identity(role: Role) -> Identity {
        Identity::new("1", "a@b.com", "A", role)
    }

    #[test]
    fn test_slugs_and_paths_are_unique() {
        let slugs: HashSet<_> = PAGES.iter().map(|page| page.slug).collect();
        let paths: HashSet<_> = PAGES.iter().map(|page| page.path).collect();
        assert_eq!(slugs.len(), PAGES.len());
        assert_eq!(paths.len(), PAGES.len());
    }

    #[test]
    fn test_paths_follow_slugs() {
        for page in PAGES {
            assert_eq!(page.path, format!("/pages/{}", page.slug));
        }
    }

    #[test]
    fn test_every_role_can_reach_its_home_page() {
        for role in Role::ALL {
            let home = PAGES
                .iter()
                .find(|page| page.path == role.home_path())
                .unwrap_or_else(|| panic!("no page for home of {}", role));
            assert!(home.allowed.contains(role), "{} cannot open {}", role, home.slug);
        }
    }

    #[test]
    fn test_signed_out_sees_no_menu() {
        assert_eq!(visible_pages(None).count(), 0);
    }

    #[test]
    fn test_location_partner_menu() {
        let partner = identity(Role::LocationPartner);
        let slugs: Vec<_> = visible_pages(Some(&partner)).map(|page| page.slug).collect();
        assert_eq!(slugs, vec!["stations"]);
    }

    #[test]
    fn test_only_super_admin_sees_user_management() {
        for role in Role::ALL {
            let visible = visible_pages(Some(&identity(role))).any(|page| page.slug == "users");
            assert_eq!(visible, role == Role::SuperAdmin);
        }
    }

    #[test]
    fn test_find_page() {
        assert_eq!(find_page("crm").map(|page| page.title), Some("CRM Leads"));
        assert!(find_page("reports").is_none());
    }
}
