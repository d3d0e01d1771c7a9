use serde::{Deserialize, Serialize};

/// Shared seed catalog of default recipes.
pub const DEFAULT_MEALS_KEY: &str = "defaultMeals";
/// Last logged-in user record.
pub const USER_KEY: &str = "user";
pub const TUTORIAL_SHOWN_KEY: &str = "tutorialShown";
pub const PREMIUM_KEY: &str = "isPremium";

const USER_MEALS_PREFIX: &str = "user_meals_";
const MEAL_PLAN_PREFIX: &str = "meal_plan_";

/// Storage namespaces of one user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    user_id: String,
}

impl Identity {
    pub fn resolve(user_id: impl AsRef<str>) -> crate::Result<Self> {
        let user_id = user_id.as_ref();

        if user_id.trim().is_empty() {
            crate::invalid_identity!();
        }

        Ok(Self {
            user_id: user_id.to_owned(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn recipes_key(&self) -> String {
        format!("{USER_MEALS_PREFIX}{}", self.user_id)
    }

    pub fn plan_key(&self) -> String {
        format!("{MEAL_PLAN_PREFIX}{}", self.user_id)
    }
}

/// Persisted login record. The username doubles as the identifier.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub created_at: String,
}

impl UserRecord {
    pub fn identity(&self) -> crate::Result<Identity> {
        if !self.username.trim().is_empty() {
            return Identity::resolve(&self.username);
        }

        Identity::resolve(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_deterministic() -> anyhow::Result<()> {
        let john = Identity::resolve("john")?;

        assert_eq!(john.recipes_key(), "user_meals_john");
        assert_eq!(john.plan_key(), "meal_plan_john");
        assert_eq!(john, Identity::resolve("john")?);

        Ok(())
    }

    #[test]
    fn test_keys_do_not_collide() -> anyhow::Result<()> {
        let a = Identity::resolve("a")?;
        let b = Identity::resolve("b")?;

        assert_ne!(a.recipes_key(), a.plan_key());
        assert_ne!(a.recipes_key(), b.recipes_key());
        assert_ne!(a.plan_key(), b.plan_key());

        Ok(())
    }

    #[test]
    fn test_blank_identity_is_rejected() {
        assert!(matches!(
            Identity::resolve(""),
            Err(crate::Error::InvalidIdentity)
        ));
        assert!(matches!(
            Identity::resolve("   "),
            Err(crate::Error::InvalidIdentity)
        ));
    }
}
