use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Manager,
    Staff,
    User,
    Guest,
}

impl UserRole {
    pub const ALL: [UserRole; 6] = [
        UserRole::SuperAdmin,
        UserRole::Admin,
        UserRole::Manager,
        UserRole::Staff,
        UserRole::User,
        UserRole::Guest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Staff => "staff",
            UserRole::User => "user",
            UserRole::Guest => "guest",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "Super Admin",
            UserRole::Admin => "Admin",
            UserRole::Manager => "Manager",
            UserRole::Staff => "Staff",
            UserRole::User => "User",
            UserRole::Guest => "Guest",
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            UserRole::SuperAdmin => 100,
            UserRole::Admin => 80,
            UserRole::Manager => 60,
            UserRole::Staff => 40,
            UserRole::User => 20,
            UserRole::Guest => 10,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "Full system access with all permissions",
            UserRole::Admin => "Administrative access to manage users, properties, and bookings",
            UserRole::Manager => "Property and booking management with analytics access",
            UserRole::Staff => "Basic staff access for booking and property management",
            UserRole::User => "Standard user with booking and profile management",
            UserRole::Guest => "Limited access for browsing properties",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("Unknown role: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Permission {
    UsersRead,
    UsersCreate,
    UsersUpdate,
    UsersDelete,
    PropertiesRead,
    PropertiesCreate,
    PropertiesUpdate,
    PropertiesDelete,
    BookingsCreate,
    BookingsRead,
    BookingsUpdate,
    BookingsCancel,
    BookingsReadOwn,
    BookingsCancelOwn,
    AnalyticsRead,
    SettingsUpdate,
    RolesRead,
    ProfileRead,
    ProfileUpdate,
    SearchRead,
}

impl Permission {
    pub const ALL: [Permission; 20] = [
        Permission::UsersRead,
        Permission::UsersCreate,
        Permission::UsersUpdate,
        Permission::UsersDelete,
        Permission::PropertiesRead,
        Permission::PropertiesCreate,
        Permission::PropertiesUpdate,
        Permission::PropertiesDelete,
        Permission::BookingsCreate,
        Permission::BookingsRead,
        Permission::BookingsUpdate,
        Permission::BookingsCancel,
        Permission::BookingsReadOwn,
        Permission::BookingsCancelOwn,
        Permission::AnalyticsRead,
        Permission::SettingsUpdate,
        Permission::RolesRead,
        Permission::ProfileRead,
        Permission::ProfileUpdate,
        Permission::SearchRead,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::UsersRead => "users.read",
            Permission::UsersCreate => "users.create",
            Permission::UsersUpdate => "users.update",
            Permission::UsersDelete => "users.delete",
            Permission::PropertiesRead => "properties.read",
            Permission::PropertiesCreate => "properties.create",
            Permission::PropertiesUpdate => "properties.update",
            Permission::PropertiesDelete => "properties.delete",
            Permission::BookingsCreate => "bookings.create",
            Permission::BookingsRead => "bookings.read",
            Permission::BookingsUpdate => "bookings.update",
            Permission::BookingsCancel => "bookings.cancel",
            Permission::BookingsReadOwn => "bookings.read.own",
            Permission::BookingsCancelOwn => "bookings.cancel.own",
            Permission::AnalyticsRead => "analytics.read",
            Permission::SettingsUpdate => "settings.update",
            Permission::RolesRead => "roles.read",
            Permission::ProfileRead => "profile.read",
            Permission::ProfileUpdate => "profile.update",
            Permission::SearchRead => "search.read",
        }
    }

    /// The ownership-scoped counterpart, if there is one
    pub fn own_variant(&self) -> Option<Permission> {
        match self {
            Permission::BookingsRead => Some(Permission::BookingsReadOwn),
            Permission::BookingsCancel => Some(Permission::BookingsCancelOwn),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}

impl TryFrom<String> for Permission {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}
