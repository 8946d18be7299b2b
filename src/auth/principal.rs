//! Authenticated actors.

use serde::{Deserialize, Serialize};

use crate::models::admin::{MainAdmin, ShopAdmin};

/// The two kinds of principal. There is no hierarchy between them: a main admin
/// does not satisfy a shop-admin route and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    MainAdmin,
    ShopAdmin,
}

impl PrincipalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrincipalKind::MainAdmin => "main_admin",
            PrincipalKind::ShopAdmin => "shop_admin",
        }
    }
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored admin account of either kind.
///
/// The shop binding only exists on the `ShopAdmin` variant, so a main admin can
/// never be issued a shop-scoped token.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    MainAdmin(MainAdmin),
    ShopAdmin(ShopAdmin),
}

impl Principal {
    pub fn id(&self) -> i64 {
        match self {
            Principal::MainAdmin(admin) => admin.id,
            Principal::ShopAdmin(admin) => admin.id,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Principal::MainAdmin(admin) => &admin.username,
            Principal::ShopAdmin(admin) => &admin.username,
        }
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::MainAdmin(_) => PrincipalKind::MainAdmin,
            Principal::ShopAdmin(_) => PrincipalKind::ShopAdmin,
        }
    }

    pub fn shop_id(&self) -> Option<i64> {
        match self {
            Principal::MainAdmin(_) => None,
            Principal::ShopAdmin(admin) => Some(admin.coffee_shop_id),
        }
    }

    pub fn password_hash(&self) -> &str {
        match self {
            Principal::MainAdmin(admin) => &admin.password_hash,
            Principal::ShopAdmin(admin) => &admin.password_hash,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Principal::MainAdmin(admin) => admin.is_active,
            Principal::ShopAdmin(admin) => admin.is_active,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;

    use super::*;

    pub fn main_admin(id: i64, username: &str, password_hash: &str) -> Principal {
        Principal::MainAdmin(MainAdmin {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    pub fn shop_admin(id: i64, username: &str, shop_id: i64, password_hash: &str) -> Principal {
        Principal::ShopAdmin(ShopAdmin {
            id,
            coffee_shop_id: shop_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn shop_binding_only_on_shop_admins() {
        assert_eq!(main_admin(1, "admin", "x").shop_id(), None);
        assert_eq!(shop_admin(2, "barista", 7, "x").shop_id(), Some(7));
    }

    #[test]
    fn serializes_with_kind_tag_and_without_hash() {
        let value = serde_json::to_value(shop_admin(2, "barista", 7, "$2b$hash")).unwrap();
        assert_eq!(value["kind"], "shop_admin");
        assert_eq!(value["coffee_shop_id"], 7);
        assert!(value.get("password_hash").is_none());
    }
}
