use std::collections::BTreeSet;
use std::sync::Arc;

use certo_core::types::Skill;
use certo_store::{SkillStore, StoreError};

use crate::error::CredentialError;

/// Deduplicated skill tag catalog: get-or-create by normalized name.
pub struct SkillCatalog {
    store: Arc<dyn SkillStore>,
}

impl SkillCatalog {
    /// Create a catalog over the given skill store.
    pub fn new(store: Arc<dyn SkillStore>) -> Self {
        Self { store }
    }

    /// Resolve a set of raw names to skills, creating any that do not exist
    /// yet. Idempotent: repeated calls with the same name never create
    /// duplicates. Fails with `Validation` if a name is empty after
    /// normalization.
    pub fn resolve(
        &self,
        names: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<BTreeSet<Skill>, CredentialError> {
        let mut skills = BTreeSet::new();
        for raw in names {
            let name = Skill::normalize(raw.as_ref()).ok_or_else(|| {
                CredentialError::Validation("skill name must not be empty".into())
            })?;
            skills.insert(self.get_or_create(&name)?);
        }
        Ok(skills)
    }

    /// Increment a skill's endorsement counter.
    pub fn endorse(&self, name: &str) -> Result<Skill, CredentialError> {
        let name = Skill::normalize(name)
            .ok_or_else(|| CredentialError::Validation("skill name must not be empty".into()))?;
        Ok(self.store.endorse(&name)?)
    }

    fn get_or_create(&self, name: &str) -> Result<Skill, CredentialError> {
        if let Some(existing) = self.store.get(name)? {
            return Ok(existing);
        }
        match self.store.insert(Skill::new(name)) {
            Ok(created) => {
                tracing::debug!(skill = name, "skill created");
                Ok(created)
            }
            // Lost the creation race: someone else inserted the same name
            // between our lookup and insert. Re-fetch instead of failing.
            Err(StoreError::UniqueViolation(_)) => {
                self.store.get(name)?.ok_or_else(|| {
                    CredentialError::Storage(format!(
                        "skill '{}' vanished after uniqueness violation",
                        name
                    ))
                })
            }
            Err(other) => Err(other.into()),
        }
    }
}
