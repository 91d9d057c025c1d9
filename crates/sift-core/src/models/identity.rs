//! Requesting identity and permission flags

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use super::ItemId;
use crate::error::Error;

/// Set of permissions a user holds on a domain or item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(u8);

impl Permission {
    pub const NONE: Self = Self(0);
    pub const READ: Self = Self(1);
    pub const WRITE: Self = Self(1 << 1);
    pub const CREATE: Self = Self(1 << 2);
    pub const DELETE: Self = Self(1 << 3);
    pub const SET_OWNER: Self = Self(1 << 4);
    pub const SET_PERMISSIONS: Self = Self(1 << 5);
    pub const ALL: Self = Self(0b0011_1111);

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Permission {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permission {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

const PERMISSION_NAMES: [(&str, Permission); 6] = [
    ("read", Permission::READ),
    ("write", Permission::WRITE),
    ("create", Permission::CREATE),
    ("delete", Permission::DELETE),
    ("set_owner", Permission::SET_OWNER),
    ("set_permissions", Permission::SET_PERMISSIONS),
];

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names = PERMISSION_NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect::<Vec<_>>();
        f.write_str(&names.join(","))
    }
}

impl FromStr for Permission {
    type Err = Error;

    /// Parse a comma separated list such as `read,write`, or `all` / `none`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut permission = Self::NONE;
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let part = part.to_ascii_lowercase();
            match part.as_str() {
                "all" => permission |= Self::ALL,
                "none" => {}
                name => {
                    let flag = PERMISSION_NAMES
                        .iter()
                        .find(|(candidate, _)| *candidate == name)
                        .map(|(_, flag)| *flag)
                        .ok_or_else(|| Error::InvalidInput(format!("unknown permission: {name}")))?;
                    permission |= flag;
                }
            }
        }
        Ok(permission)
    }
}

/// An authenticated caller. Anonymous callers are represented by `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User id
    pub id: String,
    /// Admins see everything
    #[serde(default)]
    pub is_admin: bool,
    /// Groups the user belongs to
    #[serde(default)]
    pub groups: Vec<String>,
    /// Items the user was explicitly granted edit access to
    #[serde(default)]
    pub allowed_edit_items: Vec<ItemId>,
    /// Items the user was explicitly granted view access to
    #[serde(default)]
    pub allowed_view_items: Vec<ItemId>,
    /// Domains the user was explicitly granted view access to
    #[serde(default)]
    pub allowed_view_domains: BTreeSet<String>,
}

impl Identity {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::new(id)
        }
    }

    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_view_domain(mut self, domain: impl Into<String>) -> Self {
        self.allowed_view_domains.insert(domain.into());
        self
    }

    #[must_use]
    pub fn with_view_item(mut self, id: ItemId) -> Self {
        self.allowed_view_items.push(id);
        self
    }

    #[must_use]
    pub fn with_edit_item(mut self, id: ItemId) -> Self {
        self.allowed_edit_items.push(id);
        self
    }

    /// The user's own id followed by every group id
    pub fn principals(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.groups.iter().map(String::as_str))
    }

    /// Whether `principal` is this user or one of their groups
    pub fn is_principal(&self, principal: &str) -> bool {
        self.principals().any(|p| p == principal)
    }

    /// Whether the item was granted to this user through either explicit list
    pub fn has_item_grant(&self, id: &ItemId) -> bool {
        self.allowed_view_items.contains(id) || self.allowed_edit_items.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_contains_and_union() {
        let rw = Permission::READ | Permission::WRITE;
        assert!(rw.contains(Permission::READ));
        assert!(!rw.contains(Permission::DELETE));
        assert!(Permission::ALL.contains(rw));
        assert!(Permission::NONE.is_empty());
    }

    #[test]
    fn permission_parse_and_display() {
        let parsed: Permission = "read, write".parse().unwrap();
        assert_eq!(parsed, Permission::READ | Permission::WRITE);
        assert_eq!(parsed.to_string(), "read,write");
        assert_eq!("all".parse::<Permission>().unwrap(), Permission::ALL);
        assert_eq!("".parse::<Permission>().unwrap(), Permission::NONE);
        assert!("fly".parse::<Permission>().is_err());
    }

    #[test]
    fn principals_include_groups() {
        let user = Identity::new("bob").with_groups(["editors", "staff"]);
        let principals = user.principals().collect::<Vec<_>>();
        assert_eq!(principals, vec!["bob", "editors", "staff"]);
        assert!(user.is_principal("staff"));
        assert!(!user.is_principal("alice"));
    }
}
