//! Card listing use case.

use std::sync::Arc;

use ascendant_domain::{Ability, Level};
use tracing::instrument;

use crate::infrastructure::ports::AbilityCatalog;

use super::CardError;

pub struct ListCards {
    abilities: Arc<dyn AbilityCatalog>,
}

impl ListCards {
    pub fn new(abilities: Arc<dyn AbilityCatalog>) -> Self {
        Self { abilities }
    }

    /// Cards up to `max_level`, or every card when no level is given.
    #[instrument(skip(self))]
    pub async fn execute(&self, max_level: Option<u8>) -> Result<Vec<Ability>, CardError> {
        let max_level = max_level.map(Level::new).transpose()?;
        Ok(self.abilities.list(max_level).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockAbilityCatalog;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn passes_the_level_cap_to_the_catalog() {
        let mut abilities = MockAbilityCatalog::new();
        abilities
            .expect_list()
            .with(eq(Some(Level::new(2).unwrap())))
            .times(1)
            .returning(|_| Ok(vec![Ability::new("Rootbind", Level::MIN, "Sage", "Roots.")]));

        let cards = ListCards::new(Arc::new(abilities)).execute(Some(2)).await.unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[tokio::test]
    async fn invalid_level_is_rejected_before_lookup() {
        let mut abilities = MockAbilityCatalog::new();
        abilities.expect_list().never();

        let err = ListCards::new(Arc::new(abilities)).execute(Some(0)).await.unwrap_err();
        assert!(matches!(err, CardError::Domain(_)));
    }
}
