//! Role hierarchy and role requirements.
//!
//! Roles travel as plain strings (credential claims, user rows). Hierarchy checks map them
//! onto [`Role`]; allow-list checks compare the strings as they are.
use std::collections::BTreeSet;
use std::fmt;

use crate::error::GuardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Student,
    Instructor,
    Admin,
    Superadmin,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Student,
        Role::Instructor,
        Role::Admin,
        Role::Superadmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "student" => Some(Role::Student),
            "instructor" => Some(Role::Instructor),
            "admin" => Some(Role::Admin),
            "superadmin" => Some(Role::Superadmin),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Role::Student => 0,
            Role::Instructor => 1,
            Role::Admin => 2,
            Role::Superadmin => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hierarchy level of a raw role string. Unrecognized roles rank lowest.
pub fn level_of(role: &str) -> u8 {
    Role::parse(role).map(|r| r.level()).unwrap_or(0)
}

/// What a route demands of the caller's effective role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRequirement {
    /// The effective role must be literally one of these.
    AnyOf(BTreeSet<String>),
    /// The effective role must rank at or above this one.
    AtLeast(Role),
}

impl RoleRequirement {
    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(roles.into_iter().map(Into::into).collect())
    }

    pub fn at_least(role: Role) -> Self {
        Self::AtLeast(role)
    }

    pub fn is_satisfied_by(&self, effective_role: &str) -> bool {
        match self {
            RoleRequirement::AnyOf(allowed) => allowed.contains(effective_role),
            RoleRequirement::AtLeast(min) => level_of(effective_role) >= min.level(),
        }
    }

    /// Human-readable description of what is required, for denial messages.
    pub fn describe(&self) -> String {
        match self {
            RoleRequirement::AnyOf(allowed) => allowed
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" or "),
            RoleRequirement::AtLeast(min) => format!("{min} or higher"),
        }
    }

    pub fn check(&self, effective_role: &str) -> Result<(), GuardError> {
        if self.is_satisfied_by(effective_role) {
            Ok(())
        } else {
            Err(GuardError::denied(self.describe()))
        }
    }
}
