//! Recipe domain services.
//!
//! [`RecipeService`] implements [`RecipeQuery`] and [`RecipeCommand`]. Reads
//! assemble [`RecipeView`] projections from the recipe rows, their relations
//! and the authors' profiles as seen by the viewer. Writes validate the
//! payload, check catalogue references, store the image and delegate the
//! transactional insert or replace to the repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use tracing::{info, warn};

use crate::domain::ports::{
    CatalogueRepository, ImageStore, RecipeCommand, RecipeQuery, RecipeRepository,
    RecipeRepositoryError, ShortCodeSource, SubscriptionRepository, UserRepository,
};
use crate::domain::profiles::ProfileResolver;
use crate::domain::{
    Access, Counted, DEFAULT_SHORT_CODE_ATTEMPTS, Error, ImageKind, IsAuthorOrReadOnly, NewRecipe,
    Permission, Principal, Recipe, RecipeChanges, RecipeDraft, RecipeDraftInput, RecipeFilter,
    RecipeFilterQuery, RecipeId, RecipeLimits, RecipeValidationError, RecipeView, ShortCode,
    StoredImage, UserId,
};

/// Tunables for [`RecipeService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeServiceSettings {
    pub limits: RecipeLimits,
    /// Attempts at finding an unused short code before giving up.
    pub short_code_attempts: u32,
}

impl Default for RecipeServiceSettings {
    fn default() -> Self {
        Self {
            limits: RecipeLimits::default(),
            short_code_attempts: DEFAULT_SHORT_CODE_ATTEMPTS,
        }
    }
}

/// Driven ports used by [`RecipeService`].
pub struct RecipeServicePorts<R, C, U, S, I> {
    pub recipes: Arc<R>,
    pub catalogue: Arc<C>,
    pub users: Arc<U>,
    pub subscriptions: Arc<S>,
    pub images: Arc<I>,
    pub short_codes: Arc<dyn ShortCodeSource>,
}

/// Recipe service implementing the recipe driving ports.
pub struct RecipeService<R, C, U, S, I> {
    recipes: Arc<R>,
    catalogue: Arc<C>,
    profiles: ProfileResolver<U, S>,
    images: Arc<I>,
    short_codes: Arc<dyn ShortCodeSource>,
    settings: RecipeServiceSettings,
}

impl<R, C, U, S, I> RecipeService<R, C, U, S, I>
where
    U: UserRepository,
    S: SubscriptionRepository,
{
    pub fn new(ports: RecipeServicePorts<R, C, U, S, I>, settings: RecipeServiceSettings) -> Self {
        Self {
            recipes: ports.recipes,
            catalogue: ports.catalogue,
            profiles: ProfileResolver::new(ports.users, ports.subscriptions),
            images: ports.images,
            short_codes: ports.short_codes,
            settings,
        }
    }
}

impl<R, C, U, S, I> RecipeService<R, C, U, S, I>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    U: UserRepository,
    S: SubscriptionRepository,
    I: ImageStore,
{
    async fn existing(&self, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("recipe {id} not found")))
    }

    fn validate(&self, input: RecipeDraftInput) -> Result<RecipeDraft, Error> {
        Ok(RecipeDraft::new(input, &self.settings.limits)?)
    }

    async fn ensure_references(&self, draft: &RecipeDraft) -> Result<(), Error> {
        let missing_tags = self.catalogue.missing_tags(draft.tags()).await?;
        if !missing_tags.is_empty() {
            return Err(RecipeValidationError::UnknownTags { ids: missing_tags }.into());
        }
        let missing_ingredients = self
            .catalogue
            .missing_ingredients(&draft.ingredient_ids())
            .await?;
        if !missing_ingredients.is_empty() {
            return Err(RecipeValidationError::UnknownIngredients {
                ids: missing_ingredients,
            }
            .into());
        }
        Ok(())
    }

    async fn issue_short_code(&self) -> Result<ShortCode, Error> {
        for _ in 0..self.settings.short_code_attempts.max(1) {
            let candidate = self.short_codes.next_code();
            if !self.recipes.short_code_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(short_codes_exhausted())
    }

    /// Insert `recipe`, drawing a fresh short code whenever a concurrent
    /// insert claimed the current one first.
    async fn insert(&self, recipe: &mut NewRecipe) -> Result<Recipe, Error> {
        let mut attempts = self.settings.short_code_attempts.max(1);
        loop {
            match self.recipes.create(recipe).await {
                Ok(created) => return Ok(created),
                Err(RecipeRepositoryError::Duplicate { .. }) => {
                    attempts -= 1;
                    if attempts == 0 {
                        return Err(short_codes_exhausted());
                    }
                    warn!(
                        short_code = recipe.short_code.as_str(),
                        "short code claimed concurrently"
                    );
                    recipe.short_code = self.issue_short_code().await?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn discard_image(&self, image: &StoredImage) {
        if let Err(err) = self.images.remove(image).await {
            warn!(image = image.as_str(), error = %err, "failed to remove recipe image");
        }
    }

    async fn views(
        &self,
        recipes: Vec<Recipe>,
        viewer: Option<UserId>,
    ) -> Result<Vec<RecipeView>, Error> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<RecipeId> = recipes.iter().map(|recipe| recipe.id).collect();
        let authors: Vec<UserId> = recipes.iter().map(|recipe| recipe.author_id).collect();
        let mut relations = self.recipes.relations(&ids, viewer).await?;
        let profiles = self.profiles.profiles_by_id(viewer, &authors).await?;
        recipes
            .into_iter()
            .map(|recipe| assemble(recipe, &mut relations, &profiles))
            .collect()
    }

    async fn view(&self, recipe: Recipe, viewer: Option<UserId>) -> Result<RecipeView, Error> {
        let id = recipe.id;
        self.views(vec![recipe], viewer)
            .await?
            .pop()
            .ok_or_else(|| Error::internal(format!("recipe {id} projection missing")))
    }
}

fn assemble(
    recipe: Recipe,
    relations: &mut HashMap<RecipeId, crate::domain::RecipeRelations>,
    profiles: &HashMap<UserId, crate::domain::UserProfile>,
) -> Result<RecipeView, Error> {
    let author = profiles.get(&recipe.author_id).cloned().ok_or_else(|| {
        Error::internal(format!(
            "author {} of recipe {} not found",
            recipe.author_id, recipe.id
        ))
    })?;
    let relations = relations.remove(&recipe.id).unwrap_or_default();
    Ok(RecipeView {
        recipe,
        author,
        relations,
    })
}

#[async_trait]
impl<R, C, U, S, I> RecipeQuery for RecipeService<R, C, U, S, I>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    U: UserRepository,
    S: SubscriptionRepository,
    I: ImageStore,
{
    async fn list_recipes(
        &self,
        viewer: Option<Principal>,
        filter: RecipeFilterQuery,
        page: PageRequest,
    ) -> Result<Counted<RecipeView>, Error> {
        let filter = RecipeFilter::resolve(filter, viewer.as_ref());
        let Counted { items, total } = self.recipes.list(&filter, page).await?;
        let views = self.views(items, viewer.map(|p| p.id)).await?;
        Ok(Counted::new(views, total))
    }

    async fn recipe(&self, viewer: Option<Principal>, id: RecipeId) -> Result<RecipeView, Error> {
        let recipe = self.existing(id).await?;
        self.view(recipe, viewer.map(|p| p.id)).await
    }

    async fn short_link(&self, id: RecipeId) -> Result<ShortCode, Error> {
        Ok(self.existing(id).await?.short_code)
    }

    async fn resolve_short_link(&self, code: ShortCode) -> Result<RecipeId, Error> {
        self.recipes
            .find_by_short_code(&code)
            .await?
            .ok_or_else(|| Error::not_found(format!("short link {code} not found")))
    }
}

#[async_trait]
impl<R, C, U, S, I> RecipeCommand for RecipeService<R, C, U, S, I>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    U: UserRepository,
    S: SubscriptionRepository,
    I: ImageStore,
{
    async fn create_recipe(
        &self,
        author: Principal,
        input: RecipeDraftInput,
    ) -> Result<RecipeView, Error> {
        let draft = self.validate(input)?;
        let upload = draft.image().ok_or(RecipeValidationError::MissingImage)?;
        self.ensure_references(&draft).await?;
        let short_code = self.issue_short_code().await?;

        let image = self.images.save(ImageKind::RecipeImage, upload).await?;
        let mut new_recipe = NewRecipe {
            author_id: author.id,
            name: draft.name().to_owned(),
            image: image.clone(),
            text: draft.text().to_owned(),
            cooking_time: draft.cooking_time(),
            short_code,
            ingredients: draft.ingredients().to_vec(),
            tags: draft.tags().to_vec(),
        };
        let recipe = match self.insert(&mut new_recipe).await {
            Ok(recipe) => recipe,
            Err(err) => {
                self.discard_image(&image).await;
                return Err(err);
            }
        };
        info!(recipe_id = %recipe.id, author_id = %author.id, "created recipe");
        self.view(recipe, Some(author.id)).await
    }

    async fn update_recipe(
        &self,
        requester: Option<Principal>,
        id: RecipeId,
        input: RecipeDraftInput,
    ) -> Result<RecipeView, Error> {
        let existing = self.existing(id).await?;
        IsAuthorOrReadOnly {
            author: existing.author_id,
        }
        .check(requester.as_ref(), Access::Write)?;

        let draft = self.validate(input)?;
        self.ensure_references(&draft).await?;

        let new_image = match draft.image() {
            Some(upload) => Some(self.images.save(ImageKind::RecipeImage, upload).await?),
            None => None,
        };
        let changes = RecipeChanges {
            name: draft.name().to_owned(),
            image: new_image.clone(),
            text: draft.text().to_owned(),
            cooking_time: draft.cooking_time(),
            ingredients: draft.ingredients().to_vec(),
            tags: draft.tags().to_vec(),
        };
        let updated = match self.recipes.update(id, &changes).await {
            Ok(Some(recipe)) => recipe,
            outcome => {
                if let Some(image) = &new_image {
                    self.discard_image(image).await;
                }
                return Err(match outcome {
                    Err(err) => err.into(),
                    _ => Error::not_found(format!("recipe {id} not found")),
                });
            }
        };
        if new_image.is_some() {
            self.discard_image(&existing.image).await;
        }
        info!(recipe_id = %id, "updated recipe");
        self.view(updated, requester.map(|p| p.id)).await
    }

    async fn delete_recipe(&self, requester: Option<Principal>, id: RecipeId) -> Result<(), Error> {
        let existing = self.existing(id).await?;
        IsAuthorOrReadOnly {
            author: existing.author_id,
        }
        .check(requester.as_ref(), Access::Write)?;

        if !self.recipes.delete(id).await? {
            return Err(Error::not_found(format!("recipe {id} not found")));
        }
        self.discard_image(&existing.image).await;
        info!(recipe_id = %id, "deleted recipe");
        Ok(())
    }
}

fn short_codes_exhausted() -> Error {
    Error::internal("could not allocate a unique short link")
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
