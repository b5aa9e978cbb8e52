//! Tag and ingredient catalogue services.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{CatalogueCommand, CatalogueQuery, CatalogueRepository};
use crate::domain::{
    Access, Error, IsAdminOrReadOnly, Ingredient, IngredientId, NewIngredient, NewTag, Permission,
    Principal, Tag, TagId,
};

/// Implements [`CatalogueQuery`] and [`CatalogueCommand`].
pub struct CatalogueService<C> {
    catalogue: Arc<C>,
}

impl<C> CatalogueService<C> {
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }
}

fn require_admin(requester: Option<Principal>) -> Result<(), Error> {
    IsAdminOrReadOnly.check(requester.as_ref(), Access::Write)
}

#[async_trait]
impl<C> CatalogueQuery for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn tags(&self) -> Result<Vec<Tag>, Error> {
        Ok(self.catalogue.list_tags().await?)
    }

    async fn tag(&self, id: TagId) -> Result<Tag, Error> {
        self.catalogue
            .find_tag(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }

    async fn ingredients(&self, name_prefix: Option<String>) -> Result<Vec<Ingredient>, Error> {
        let prefix = name_prefix
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty());
        Ok(self.catalogue.list_ingredients(prefix).await?)
    }

    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.catalogue
            .find_ingredient(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}

#[async_trait]
impl<C> CatalogueCommand for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn create_tag(&self, requester: Option<Principal>, tag: NewTag) -> Result<Tag, Error> {
        require_admin(requester)?;
        let tag = self.catalogue.create_tag(&tag).await?;
        info!(tag_id = %tag.id, slug = %tag.slug, "created tag");
        Ok(tag)
    }

    async fn delete_tag(&self, requester: Option<Principal>, id: TagId) -> Result<(), Error> {
        require_admin(requester)?;
        if !self.catalogue.delete_tag(id).await? {
            return Err(Error::not_found(format!("tag {id} not found")));
        }
        info!(tag_id = %id, "deleted tag");
        Ok(())
    }

    async fn create_ingredient(
        &self,
        requester: Option<Principal>,
        ingredient: NewIngredient,
    ) -> Result<Ingredient, Error> {
        require_admin(requester)?;
        let ingredient = self.catalogue.create_ingredient(&ingredient).await?;
        info!(ingredient_id = %ingredient.id, "created ingredient");
        Ok(ingredient)
    }

    async fn delete_ingredient(
        &self,
        requester: Option<Principal>,
        id: IngredientId,
    ) -> Result<(), Error> {
        require_admin(requester)?;
        if !self.catalogue.delete_ingredient(id).await? {
            return Err(Error::not_found(format!("ingredient {id} not found")));
        }
        info!(ingredient_id = %id, "deleted ingredient");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{CatalogueRepositoryError, MockCatalogueRepository};
    use crate::domain::UserId;
    use rstest::rstest;

    fn service(repo: MockCatalogueRepository) -> CatalogueService<MockCatalogueRepository> {
        CatalogueService::new(Arc::new(repo))
    }

    fn breakfast() -> NewTag {
        NewTag::new("Breakfast", "breakfast").expect("valid tag")
    }

    #[rstest]
    #[case(None, ErrorCode::Unauthorized)]
    #[case(Some(Principal::user(UserId::new(3))), ErrorCode::Forbidden)]
    #[tokio::test]
    async fn non_admins_cannot_create_tags(
        #[case] requester: Option<Principal>,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_create_tag().never();
        let err = service(repo)
            .create_tag(requester, breakfast())
            .await
            .expect_err("rejected");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn superuser_creates_tag() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_create_tag().times(1).return_once(|tag| {
            Ok(Tag {
                id: TagId::new(1),
                name: tag.name().to_owned(),
                slug: tag.slug().to_owned(),
            })
        });
        let tag = service(repo)
            .create_tag(Some(Principal::superuser(UserId::new(1))), breakfast())
            .await
            .expect("created");
        assert_eq!(tag.slug, "breakfast");
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_create_tag()
            .return_once(|_| Err(CatalogueRepositoryError::duplicate("tag slug already exists")));
        let err = service(repo)
            .create_tag(Some(Principal::superuser(UserId::new(1))), breakfast())
            .await
            .expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_unknown_ingredient_is_not_found() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_delete_ingredient().return_once(|_| Ok(false));
        let err = service(repo)
            .delete_ingredient(Some(Principal::superuser(UserId::new(1))), IngredientId::new(9))
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("  "), None)]
    #[case(Some(" Sug "), Some("Sug"))]
    #[tokio::test]
    async fn ingredient_prefix_is_trimmed(
        #[case] raw: Option<&'static str>,
        #[case] expected: Option<&'static str>,
    ) {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_list_ingredients()
            .withf(move |prefix| prefix.as_deref() == expected)
            .return_once(|_| Ok(Vec::new()));
        service(repo)
            .ingredients(raw.map(str::to_owned))
            .await
            .expect("listed");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_tag_is_not_found() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_find_tag().return_once(|_| Ok(None));
        let err = service(repo).tag(TagId::new(4)).await.expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
