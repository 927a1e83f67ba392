use serde::Serialize;

/// The caller of a command, as resolved by the authentication layer.
#[derive(Clone, Debug, Serialize)]
pub struct Actor {
    pub user_id: String,
    pub is_admin: bool,
    pub is_banned: bool,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, is_admin: bool, is_banned: bool) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin,
            is_banned,
        }
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self::new(user_id, false, false)
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, true, false)
    }

    pub fn ensure_admin(&self) -> crate::Result<()> {
        if !self.is_admin || self.is_banned {
            return Err(crate::Error::Forbidden);
        }

        Ok(())
    }

    /// Banned users keep read access but may not mutate anything.
    pub fn ensure_can_write(&self) -> crate::Result<()> {
        if self.is_banned {
            return Err(crate::Error::Forbidden);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_policy() {
        assert!(Actor::admin("a").ensure_admin().is_ok());
        assert!(matches!(
            Actor::user("u").ensure_admin(),
            Err(crate::Error::Forbidden)
        ));
        assert!(Actor::new("a", true, true).ensure_admin().is_err());
    }

    #[test]
    fn banned_users_cannot_write() {
        assert!(Actor::user("u").ensure_can_write().is_ok());
        assert!(Actor::new("u", false, true).ensure_can_write().is_err());
    }
}
