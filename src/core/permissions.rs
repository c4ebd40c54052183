//! Role-based permissions.
//!
//! A static table maps each role to the actions it may perform. There is no
//! policy engine; checks are a slice lookup.

use crate::errors::{Error, Result};
use strum::{Display, EnumIter, EnumString};
use tracing::warn;

/// Staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Full access, including user management
    Admin,
    /// Runs the floor: orders, production, inventory and purchasing
    Manager,
    /// Production staff updating job progress
    Production,
    /// Store keeper handling stock and purchases
    Store,
    /// Read-only access
    Viewer,
}

/// Action guarded by a role check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Permission {
    /// See orders and their components
    ViewOrders,
    /// Create, edit and delete orders and components
    ManageOrders,
    /// Move orders through production stages
    UpdateProduction,
    /// See inventory levels
    ViewInventory,
    /// Create materials and adjust stock
    ManageInventory,
    /// Record purchases
    ManagePurchases,
    /// Maintain suppliers
    ManageSuppliers,
    /// Manage staff accounts and roles
    ManageUsers,
}

const ADMIN: &[Permission] = &[
    Permission::ViewOrders,
    Permission::ManageOrders,
    Permission::UpdateProduction,
    Permission::ViewInventory,
    Permission::ManageInventory,
    Permission::ManagePurchases,
    Permission::ManageSuppliers,
    Permission::ManageUsers,
];

const MANAGER: &[Permission] = &[
    Permission::ViewOrders,
    Permission::ManageOrders,
    Permission::UpdateProduction,
    Permission::ViewInventory,
    Permission::ManageInventory,
    Permission::ManagePurchases,
    Permission::ManageSuppliers,
];

const PRODUCTION: &[Permission] = &[
    Permission::ViewOrders,
    Permission::UpdateProduction,
    Permission::ViewInventory,
];

const STORE: &[Permission] = &[
    Permission::ViewOrders,
    Permission::ViewInventory,
    Permission::ManageInventory,
    Permission::ManagePurchases,
];

const VIEWER: &[Permission] = &[Permission::ViewOrders, Permission::ViewInventory];

/// Permissions granted to a role.
#[must_use]
pub const fn role_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => ADMIN,
        Role::Manager => MANAGER,
        Role::Production => PRODUCTION,
        Role::Store => STORE,
        Role::Viewer => VIEWER,
    }
}

/// Whether `role` may perform `permission`.
#[must_use]
pub fn has_permission(role: Role, permission: Permission) -> bool {
    role_permissions(role).contains(&permission)
}

/// Like [`has_permission`], but returns [`Error::PermissionDenied`] instead of `false`.
pub fn require_permission(role: Role, permission: Permission) -> Result<()> {
    if has_permission(role, permission) {
        Ok(())
    } else {
        warn!("Denied {} to role {}", permission, role);
        Err(Error::PermissionDenied {
            role: role.to_string(),
            permission: permission.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_admin_has_every_permission() {
        for permission in Permission::iter() {
            assert!(has_permission(Role::Admin, permission), "{permission}");
        }
    }

    #[test]
    fn test_only_admin_manages_users() {
        for role in Role::iter() {
            assert_eq!(
                has_permission(role, Permission::ManageUsers),
                role == Role::Admin,
                "{role}"
            );
        }
    }

    #[test]
    fn test_every_role_can_view_orders() {
        assert!(Role::iter().all(|role| has_permission(role, Permission::ViewOrders)));
    }

    #[test]
    fn test_production_and_viewer_limits() {
        assert!(has_permission(Role::Production, Permission::UpdateProduction));
        assert!(!has_permission(Role::Production, Permission::ManageOrders));
        assert!(!has_permission(Role::Viewer, Permission::ManageInventory));
        assert!(has_permission(Role::Store, Permission::ManagePurchases));
    }

    #[test]
    fn test_require_permission_error() {
        assert!(require_permission(Role::Manager, Permission::ManageOrders).is_ok());

        let err = require_permission(Role::Viewer, Permission::ManageOrders).unwrap_err();
        assert!(matches!(
            err,
            Error::PermissionDenied { ref role, ref permission }
                if role == "viewer" && permission == "manage_orders"
        ));
    }

    #[test]
    fn test_role_string_round_trip() {
        assert_eq!(Role::from_str("store").unwrap(), Role::Store);
        assert_eq!(Role::Production.to_string(), "production");
        assert!(Role::from_str("owner").is_err());
    }
}
