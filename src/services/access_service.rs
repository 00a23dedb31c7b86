use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::BookingError;
use crate::models::account::{Permission, User, UserRole};
use crate::models::search::UserFilter;

impl UserRole {
    /// The fixed capability set for each role
    pub fn permissions(&self) -> BTreeSet<Permission> {
        use Permission::*;

        let granted: &[Permission] = match self {
            UserRole::SuperAdmin => &Permission::ALL,
            UserRole::Admin => &[
                UsersRead,
                UsersCreate,
                UsersUpdate,
                UsersDelete,
                PropertiesRead,
                PropertiesCreate,
                PropertiesUpdate,
                PropertiesDelete,
                BookingsRead,
                BookingsUpdate,
                BookingsCancel,
                AnalyticsRead,
                SettingsUpdate,
                RolesRead,
            ],
            UserRole::Manager => &[
                PropertiesRead,
                PropertiesUpdate,
                BookingsRead,
                BookingsUpdate,
                AnalyticsRead,
                UsersRead,
            ],
            UserRole::Staff => &[BookingsRead, BookingsUpdate, PropertiesRead],
            UserRole::User => &[
                BookingsCreate,
                BookingsReadOwn,
                BookingsCancelOwn,
                ProfileRead,
                ProfileUpdate,
            ],
            UserRole::Guest => &[PropertiesRead, SearchRead],
        };
        granted.iter().copied().collect()
    }
}

/// What the current caller may do. Built per request from the token role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    user_id: Option<String>,
    role: UserRole,
    permissions: BTreeSet<Permission>,
}

impl Capabilities {
    pub fn for_role(user_id: Option<String>, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            permissions: role.permissions(),
        }
    }

    pub fn anonymous() -> Self {
        Self::for_role(None, UserRole::Guest)
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn has_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has(*p))
    }

    pub fn has_all(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.has(*p))
    }

    pub fn has_minimum_role(&self, minimum: UserRole) -> bool {
        self.role.level() >= minimum.level()
    }

    /// General permission, or its `.own` variant when the caller owns the resource
    pub fn can_access_resource(&self, permission: Permission, owner_id: Option<&str>) -> bool {
        if self.has(permission) {
            return true;
        }
        match (owner_id, self.user_id(), permission.own_variant()) {
            (Some(owner), Some(me), Some(own)) if owner == me => self.has(own),
            _ => false,
        }
    }

    pub fn require(&self, permission: Permission) -> Result<(), BookingError> {
        if self.has(permission) {
            Ok(())
        } else {
            Err(BookingError::PermissionDenied)
        }
    }

    pub fn require_resource(
        &self,
        permission: Permission,
        owner_id: Option<&str>,
    ) -> Result<(), BookingError> {
        if self.can_access_resource(permission, owner_id) {
            Ok(())
        } else {
            Err(BookingError::PermissionDenied)
        }
    }

    /// Only callers with users.update may reassign roles, and never above their own level
    pub fn authorize_role_change(&self, new_role: &str) -> Result<UserRole, BookingError> {
        self.require(Permission::UsersUpdate)?;
        let role = new_role
            .parse::<UserRole>()
            .map_err(BookingError::BadRequest)?;
        if !self.has_minimum_role(role) {
            return Err(BookingError::PermissionDenied);
        }
        Ok(role)
    }
}

#[derive(Debug, Serialize)]
pub struct RoleDescription {
    pub id: &'static str,
    pub name: &'static str,
    pub level: u8,
    pub description: &'static str,
    pub permissions: Vec<Permission>,
}

pub fn all_roles() -> Vec<RoleDescription> {
    UserRole::ALL
        .iter()
        .map(|role| RoleDescription {
            id: role.as_str(),
            name: role.display_name(),
            level: role.level(),
            description: role.description(),
            permissions: role.permissions().into_iter().collect(),
        })
        .collect()
}

/// Admin user directory. An empty `search` or a role of `all` matches everyone.
pub fn filter_users(users: Vec<User>, filter: &UserFilter) -> Result<Vec<User>, BookingError> {
    let role = match filter.role.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(role) => Some(role.parse::<UserRole>().map_err(BookingError::BadRequest)?),
    };
    let needle = filter
        .search
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    Ok(users
        .into_iter()
        .filter(|user| role.map_or(true, |r| user.role == r))
        .filter(|user| {
            if needle.is_empty() {
                return true;
            }
            let name = [user.first_name.as_deref(), user.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            name.to_lowercase().contains(&needle) || user.email.to_lowercase().contains(&needle)
        })
        .collect())
}
