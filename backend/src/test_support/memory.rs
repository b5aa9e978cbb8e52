//! In-memory driven adapters.
//!
//! [`InMemoryDatabase`] implements every repository port over one set of
//! tables guarded by a mutex, mirroring the unique and cascade constraints of
//! the PostgreSQL schema. Together with [`InMemoryImageStore`] and
//! [`PlainTextPasswordHasher`] it lets integration tests drive the real
//! domain services through the HTTP adapter without a database.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use pagination::{PageLimits, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{
    AuthTokenRepository, AuthTokenRepositoryError, CatalogueRepository, CatalogueRepositoryError,
    CollectionRepository, CollectionRepositoryError, ImageStore, ImageStoreError, ImportSummary,
    NewUser, PasswordHashError, PasswordHasher, RecipeCollection, RecipeRepository,
    RecipeRepositoryError, StoredCredentials, SubscriptionRepository,
    SubscriptionRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    CartIngredient, Counted, ImageKind, ImageUpload, Ingredient, IngredientAmount, IngredientId,
    NewIngredient, NewRecipe, NewTag, Password, PasswordHash, Principal, RandomShortCodes, Recipe,
    RecipeChanges, RecipeFilter, RecipeId, RecipeIngredientLine, RecipeRelations,
    RecipeServiceSettings, RecipeSummary, ShortCode, StoredImage, Tag, TagId, TokenDigest, User,
    UserId,
};
use crate::inbound::http::state::{DrivenAdapters, HttpState};
use crate::outbound::pdf::PrintPdfShoppingListRenderer;

/// Base URL the in-memory image store prefixes to stored paths.
pub const MEDIA_URL: &str = "http://testserver/media/";

struct UserRow {
    user: User,
    password_hash: PasswordHash,
}

struct RecipeRow {
    recipe: Recipe,
    ingredients: Vec<IngredientAmount>,
    tags: Vec<TagId>,
}

#[derive(Default)]
struct Tables {
    last_id: i64,
    users: BTreeMap<UserId, UserRow>,
    tokens: HashMap<TokenDigest, UserId>,
    tags: BTreeMap<TagId, Tag>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    recipes: BTreeMap<RecipeId, RecipeRow>,
    favorites: BTreeSet<(UserId, RecipeId)>,
    shopping_cart: BTreeSet<(UserId, RecipeId)>,
    subscriptions: BTreeSet<(UserId, UserId)>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn collection(&mut self, collection: RecipeCollection) -> &mut BTreeSet<(UserId, RecipeId)> {
        match collection {
            RecipeCollection::Favorites => &mut self.favorites,
            RecipeCollection::ShoppingCart => &mut self.shopping_cart,
        }
    }

    fn tag_slug(&self, id: TagId) -> Option<&str> {
        self.tags.get(&id).map(|tag| tag.slug.as_str())
    }

    fn matches(&self, row: &RecipeRow, filter: &RecipeFilter) -> bool {
        let id = row.recipe.id;
        filter.author.is_none_or(|author| row.recipe.author_id == author)
            && (filter.tag_slugs.is_empty()
                || row.tags.iter().any(|tag| {
                    self.tag_slug(*tag)
                        .is_some_and(|slug| filter.tag_slugs.iter().any(|wanted| wanted == slug))
                }))
            && filter
                .favorited_by
                .is_none_or(|user| self.favorites.contains(&(user, id)))
            && filter
                .in_cart_of
                .is_none_or(|user| self.shopping_cart.contains(&(user, id)))
    }

    fn relations(&self, row: &RecipeRow, viewer: Option<UserId>) -> RecipeRelations {
        let id = row.recipe.id;
        let mut tags: Vec<Tag> = row
            .tags
            .iter()
            .filter_map(|tag| self.tags.get(tag).cloned())
            .collect();
        tags.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        let mut ingredients: Vec<RecipeIngredientLine> = row
            .ingredients
            .iter()
            .filter_map(|line| {
                self.ingredients
                    .get(&line.ingredient_id)
                    .map(|ingredient| RecipeIngredientLine {
                        ingredient: ingredient.clone(),
                        amount: line.amount,
                    })
            })
            .collect();
        ingredients.sort_by(|a, b| {
            (&a.ingredient.name, a.ingredient.id).cmp(&(&b.ingredient.name, b.ingredient.id))
        });
        RecipeRelations {
            tags,
            ingredients,
            is_favorited: viewer.is_some_and(|user| self.favorites.contains(&(user, id))),
            is_in_shopping_cart: viewer
                .is_some_and(|user| self.shopping_cart.contains(&(user, id))),
        }
    }
}

/// Newest first, matching the `created_at DESC, id DESC` ordering.
fn newest_first<'a>(rows: impl Iterator<Item = &'a RecipeRow>) -> Vec<&'a RecipeRow> {
    let mut rows: Vec<&RecipeRow> = rows.collect();
    rows.sort_by(|a, b| (b.recipe.created_at, b.recipe.id).cmp(&(a.recipe.created_at, a.recipe.id)));
    rows
}

fn window<T>(items: Vec<T>, page: PageRequest) -> Counted<T> {
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    Counted::new(items.into_iter().skip(offset).take(limit).collect(), total)
}

/// Repository adapters backed by in-process tables.
#[derive(Default)]
pub struct InMemoryDatabase {
    tables: Mutex<Tables>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Grant superuser rights, as the admin site would.
    pub fn promote_to_superuser(&self, id: UserId) {
        if let Some(row) = self.tables().users.get_mut(&id) {
            row.user.is_superuser = true;
        }
    }

    /// Insert a tag directly, bypassing the admin API.
    pub fn seed_tag(&self, name: &str, slug: &str) -> Tag {
        let mut tables = self.tables();
        let tag = Tag {
            id: TagId::new(tables.next_id()),
            name: name.to_owned(),
            slug: slug.to_owned(),
        };
        tables.tags.insert(tag.id, tag.clone());
        tag
    }

    /// Insert an ingredient directly, bypassing the admin API.
    pub fn seed_ingredient(&self, name: &str, measurement_unit: &str) -> Ingredient {
        let mut tables = self.tables();
        let ingredient = Ingredient {
            id: IngredientId::new(tables.next_id()),
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        };
        tables.ingredients.insert(ingredient.id, ingredient.clone());
        ingredient
    }

    /// Number of live tokens issued to `user`.
    pub fn token_count(&self, user: UserId) -> usize {
        self.tables()
            .tokens
            .values()
            .filter(|owner| **owner == user)
            .count()
    }
}

#[async_trait]
impl UserRepository for InMemoryDatabase {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.tables();
        let existing = || tables.users.values().map(|row| &row.user);
        if existing().any(|u| u.email.eq_ignore_ascii_case(user.email.as_str())) {
            return Err(UserPersistenceError::duplicate("email"));
        }
        if existing().any(|u| u.username.eq_ignore_ascii_case(user.username.as_str())) {
            return Err(UserPersistenceError::duplicate("username"));
        }
        let stored = User {
            id: UserId::new(tables.next_id()),
            email: user.email.as_str().to_owned(),
            username: user.username.as_str().to_owned(),
            first_name: user.first_name.as_str().to_owned(),
            last_name: user.last_name.as_str().to_owned(),
            avatar: None,
            is_superuser: false,
        };
        tables.users.insert(
            stored.id,
            UserRow {
                user: stored.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.tables().users.get(&id).map(|row| row.user.clone()))
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.tables();
        let wanted: BTreeSet<UserId> = ids.iter().copied().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| tables.users.get(&id).map(|row| row.user.clone()))
            .collect())
    }

    async fn find_credentials(
        &self,
        email: &crate::domain::Email,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|row| row.user.email == email.as_str())
            .map(|row| StoredCredentials {
                principal: Principal {
                    id: row.user.id,
                    is_superuser: row.user.is_superuser,
                },
                password_hash: row.password_hash.clone(),
            }))
    }

    async fn password_hash(
        &self,
        id: UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError> {
        Ok(self
            .tables()
            .users
            .get(&id)
            .map(|row| row.password_hash.clone()))
    }

    async fn update_password(
        &self,
        id: UserId,
        hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables();
        let row = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| UserPersistenceError::query(format!("user {id} not found")))?;
        row.password_hash = hash.clone();
        Ok(())
    }

    async fn set_avatar(
        &self,
        id: UserId,
        avatar: Option<StoredImage>,
    ) -> Result<Option<StoredImage>, UserPersistenceError> {
        let mut tables = self.tables();
        let row = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| UserPersistenceError::query(format!("user {id} not found")))?;
        Ok(std::mem::replace(&mut row.user.avatar, avatar))
    }

    async fn list(&self, page: PageRequest) -> Result<Counted<User>, UserPersistenceError> {
        let users = self
            .tables()
            .users
            .values()
            .map(|row| row.user.clone())
            .collect();
        Ok(window(users, page))
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryDatabase {
    async fn insert(
        &self,
        digest: &TokenDigest,
        user: UserId,
    ) -> Result<(), AuthTokenRepositoryError> {
        self.tables().tokens.insert(digest.clone(), user);
        Ok(())
    }

    async fn find_principal(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<Principal>, AuthTokenRepositoryError> {
        let tables = self.tables();
        Ok(tables
            .tokens
            .get(digest)
            .and_then(|id| tables.users.get(id))
            .map(|row| Principal {
                id: row.user.id,
                is_superuser: row.user.is_superuser,
            }))
    }

    async fn delete_for_user(&self, user: UserId) -> Result<(), AuthTokenRepositoryError> {
        self.tables().tokens.retain(|_, owner| *owner != user);
        Ok(())
    }
}

fn missing<Id: Copy + Ord>(requested: &[Id], known: impl Fn(&Id) -> bool) -> Vec<Id> {
    let mut seen = BTreeSet::new();
    requested
        .iter()
        .copied()
        .filter(|id| !known(id) && seen.insert(*id))
        .collect()
}

#[async_trait]
impl CatalogueRepository for InMemoryDatabase {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        let mut tags: Vec<Tag> = self.tables().tags.values().cloned().collect();
        tags.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(tags)
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError> {
        Ok(self.tables().tags.get(&id).cloned())
    }

    async fn create_tag(&self, tag: &NewTag) -> Result<Tag, CatalogueRepositoryError> {
        let mut tables = self.tables();
        if tables.tags.values().any(|existing| existing.slug == tag.slug()) {
            return Err(CatalogueRepositoryError::duplicate(
                "a tag with this slug already exists",
            ));
        }
        let stored = Tag {
            id: TagId::new(tables.next_id()),
            name: tag.name().to_owned(),
            slug: tag.slug().to_owned(),
        };
        tables.tags.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete_tag(&self, id: TagId) -> Result<bool, CatalogueRepositoryError> {
        let mut tables = self.tables();
        let removed = tables.tags.remove(&id).is_some();
        for row in tables.recipes.values_mut() {
            row.tags.retain(|tag| *tag != id);
        }
        Ok(removed)
    }

    async fn list_ingredients(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let prefix = name_prefix.map(|prefix| prefix.to_lowercase());
        Ok(self
            .tables()
            .ingredients
            .values()
            .filter(|ingredient| {
                prefix
                    .as_deref()
                    .is_none_or(|prefix| ingredient.name.to_lowercase().starts_with(prefix))
            })
            .cloned()
            .collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        Ok(self.tables().ingredients.get(&id).cloned())
    }

    async fn create_ingredient(
        &self,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, CatalogueRepositoryError> {
        let mut tables = self.tables();
        if tables.ingredients.values().any(|existing| {
            existing.name == ingredient.name()
                && existing.measurement_unit == ingredient.measurement_unit()
        }) {
            return Err(CatalogueRepositoryError::duplicate(
                "an ingredient with this name and unit already exists",
            ));
        }
        let stored = Ingredient {
            id: IngredientId::new(tables.next_id()),
            name: ingredient.name().to_owned(),
            measurement_unit: ingredient.measurement_unit().to_owned(),
        };
        tables.ingredients.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete_ingredient(&self, id: IngredientId) -> Result<bool, CatalogueRepositoryError> {
        let mut tables = self.tables();
        let removed = tables.ingredients.remove(&id).is_some();
        for row in tables.recipes.values_mut() {
            row.ingredients.retain(|line| line.ingredient_id != id);
        }
        Ok(removed)
    }

    async fn missing_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError> {
        let tables = self.tables();
        Ok(missing(ids, |id| tables.tags.contains_key(id)))
    }

    async fn missing_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError> {
        let tables = self.tables();
        Ok(missing(ids, |id| tables.ingredients.contains_key(id)))
    }

    async fn import(
        &self,
        tags: &[NewTag],
        ingredients: &[NewIngredient],
    ) -> Result<ImportSummary, CatalogueRepositoryError> {
        let mut summary = ImportSummary::default();
        for tag in tags {
            match self.create_tag(tag).await {
                Ok(_) => summary.tags_added += 1,
                Err(CatalogueRepositoryError::Duplicate { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        for ingredient in ingredients {
            match self.create_ingredient(ingredient).await {
                Ok(_) => summary.ingredients_added += 1,
                Err(CatalogueRepositoryError::Duplicate { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(summary)
    }
}

#[async_trait]
impl RecipeRepository for InMemoryDatabase {
    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, RecipeRepositoryError> {
        let mut tables = self.tables();
        if tables
            .recipes
            .values()
            .any(|row| row.recipe.short_code == recipe.short_code)
        {
            return Err(RecipeRepositoryError::duplicate(
                "a recipe with this short code already exists",
            ));
        }
        let stored = Recipe {
            id: RecipeId::new(tables.next_id()),
            author_id: recipe.author_id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
            short_code: recipe.short_code.clone(),
            created_at: Utc::now(),
        };
        tables.recipes.insert(
            stored.id,
            RecipeRow {
                recipe: stored.clone(),
                ingredients: recipe.ingredients.clone(),
                tags: recipe.tags.clone(),
            },
        );
        Ok(stored)
    }

    async fn update(
        &self,
        id: RecipeId,
        changes: &RecipeChanges,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut tables = self.tables();
        let Some(row) = tables.recipes.get_mut(&id) else {
            return Ok(None);
        };
        row.recipe.name.clone_from(&changes.name);
        row.recipe.text.clone_from(&changes.text);
        row.recipe.cooking_time = changes.cooking_time;
        if let Some(image) = &changes.image {
            row.recipe.image = image.clone();
        }
        row.ingredients.clone_from(&changes.ingredients);
        row.tags.clone_from(&changes.tags);
        Ok(Some(row.recipe.clone()))
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut tables = self.tables();
        let removed = tables.recipes.remove(&id).is_some();
        tables.favorites.retain(|(_, recipe)| *recipe != id);
        tables.shopping_cart.retain(|(_, recipe)| *recipe != id);
        Ok(removed)
    }

    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        Ok(self.tables().recipes.get(&id).map(|row| row.recipe.clone()))
    }

    async fn find_by_short_code(
        &self,
        code: &ShortCode,
    ) -> Result<Option<RecipeId>, RecipeRepositoryError> {
        Ok(self
            .tables()
            .recipes
            .values()
            .find(|row| row.recipe.short_code == *code)
            .map(|row| row.recipe.id))
    }

    async fn short_code_exists(&self, code: &ShortCode) -> Result<bool, RecipeRepositoryError> {
        Ok(self.find_by_short_code(code).await?.is_some())
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Counted<Recipe>, RecipeRepositoryError> {
        let tables = self.tables();
        let matching = newest_first(tables.recipes.values().filter(|row| tables.matches(row, filter)))
            .into_iter()
            .map(|row| row.recipe.clone())
            .collect();
        Ok(window(matching, page))
    }

    async fn relations(
        &self,
        ids: &[RecipeId],
        viewer: Option<UserId>,
    ) -> Result<HashMap<RecipeId, RecipeRelations>, RecipeRepositoryError> {
        let tables = self.tables();
        Ok(ids
            .iter()
            .filter_map(|id| tables.recipes.get(id))
            .map(|row| (row.recipe.id, tables.relations(row, viewer)))
            .collect())
    }

    async fn author_summaries(
        &self,
        author: UserId,
        limit: Option<u32>,
    ) -> Result<Counted<RecipeSummary>, RecipeRepositoryError> {
        let tables = self.tables();
        let rows = newest_first(
            tables
                .recipes
                .values()
                .filter(|row| row.recipe.author_id == author),
        );
        let total = u64::try_from(rows.len()).unwrap_or(u64::MAX);
        let take = limit.map_or(usize::MAX, |limit| {
            usize::try_from(limit).unwrap_or(usize::MAX)
        });
        let items = rows
            .into_iter()
            .take(take)
            .map(|row| RecipeSummary::from(&row.recipe))
            .collect();
        Ok(Counted::new(items, total))
    }
}

#[async_trait]
impl CollectionRepository for InMemoryDatabase {
    async fn add(
        &self,
        collection: RecipeCollection,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), CollectionRepositoryError> {
        if self.tables().collection(collection).insert((user, recipe)) {
            Ok(())
        } else {
            Err(CollectionRepositoryError::duplicate(collection.to_string()))
        }
    }

    async fn remove(
        &self,
        collection: RecipeCollection,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, CollectionRepositoryError> {
        Ok(self.tables().collection(collection).remove(&(user, recipe)))
    }

    async fn cart_ingredients(
        &self,
        user: UserId,
    ) -> Result<Vec<CartIngredient>, CollectionRepositoryError> {
        let tables = self.tables();
        Ok(tables
            .shopping_cart
            .iter()
            .filter(|(owner, _)| *owner == user)
            .filter_map(|(_, recipe)| tables.recipes.get(recipe))
            .flat_map(|row| row.ingredients.iter())
            .filter_map(|line| {
                tables
                    .ingredients
                    .get(&line.ingredient_id)
                    .map(|ingredient| CartIngredient {
                        name: ingredient.name.clone(),
                        measurement_unit: ingredient.measurement_unit.clone(),
                        amount: line.amount,
                    })
            })
            .collect())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryDatabase {
    async fn subscribe(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<(), SubscriptionRepositoryError> {
        if follower == author {
            return Err(SubscriptionRepositoryError::self_subscription());
        }
        if self.tables().subscriptions.insert((follower, author)) {
            Ok(())
        } else {
            Err(SubscriptionRepositoryError::duplicate())
        }
    }

    async fn unsubscribe(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        Ok(self.tables().subscriptions.remove(&(follower, author)))
    }

    async fn followed_authors(
        &self,
        follower: UserId,
        page: PageRequest,
    ) -> Result<Counted<User>, SubscriptionRepositoryError> {
        let tables = self.tables();
        let authors = tables
            .subscriptions
            .iter()
            .filter(|(user, _)| *user == follower)
            .filter_map(|(_, author)| tables.users.get(author))
            .map(|row| row.user.clone())
            .collect();
        Ok(window(authors, page))
    }

    async fn followed_among(
        &self,
        follower: UserId,
        authors: &[UserId],
    ) -> Result<Vec<UserId>, SubscriptionRepositoryError> {
        let tables = self.tables();
        Ok(authors
            .iter()
            .copied()
            .filter(|author| tables.subscriptions.contains(&(follower, *author)))
            .collect())
    }
}

/// [`ImageStore`] keeping uploads in a map keyed by stored path.
#[derive(Default)]
pub struct InMemoryImageStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bytes stored under `path`, if any.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files().get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn save(
        &self,
        kind: ImageKind,
        upload: &ImageUpload,
    ) -> Result<StoredImage, ImageStoreError> {
        let path = format!(
            "{}/{}.{}",
            kind.folder(),
            Uuid::new_v4().simple(),
            upload.extension()
        );
        self.files().insert(path.clone(), upload.bytes().to_vec());
        Ok(StoredImage::new(path))
    }

    async fn remove(&self, image: &StoredImage) -> Result<(), ImageStoreError> {
        self.files().remove(image.as_str());
        Ok(())
    }

    fn url(&self, image: &StoredImage) -> String {
        format!("{MEDIA_URL}{}", image.as_str())
    }
}

/// Reversible [`PasswordHasher`] for tests where Argon2 would dominate
/// runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextPasswordHasher;

const PLAIN_PREFIX: &str = "plain$";

impl PasswordHasher for PlainTextPasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!(
            "{PLAIN_PREFIX}{}",
            password.expose()
        )))
    }

    fn verify(&self, candidate: &str, hash: &PasswordHash) -> bool {
        hash.as_str()
            .strip_prefix(PLAIN_PREFIX)
            .is_some_and(|stored| stored == candidate)
    }
}

/// A fully wired in-memory backend.
pub struct InMemoryBackend {
    pub database: Arc<InMemoryDatabase>,
    pub images: Arc<InMemoryImageStore>,
    pub state: HttpState,
}

impl InMemoryBackend {
    /// Wire the real domain services over fresh in-memory adapters.
    pub fn new() -> Self {
        Self::with_settings(RecipeServiceSettings::default(), PageLimits::default())
    }

    pub fn with_settings(settings: RecipeServiceSettings, page_limits: PageLimits) -> Self {
        let database = Arc::new(InMemoryDatabase::new());
        let images = Arc::new(InMemoryImageStore::new());
        let ports = DrivenAdapters {
            users: Arc::clone(&database),
            tokens: Arc::clone(&database),
            catalogue: Arc::clone(&database),
            recipes: Arc::clone(&database),
            collections: Arc::clone(&database),
            subscriptions: Arc::clone(&database),
            hasher: Arc::new(PlainTextPasswordHasher),
            images: Arc::clone(&images),
            renderer: Arc::new(PrintPdfShoppingListRenderer),
            short_codes: Arc::new(RandomShortCodes),
        }
        .into_ports(settings);
        Self {
            database,
            images,
            state: HttpState::new(ports, page_limits),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}
