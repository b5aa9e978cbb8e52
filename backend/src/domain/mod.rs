//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities, validation rules and use-case
//! services independent of HTTP and storage. Inbound adapters call the
//! driving ports in [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - User, Recipe, Tag, Ingredient and their validated write models.
//! - Permissions, recipe filters and shopping list aggregation.
//! - Services implementing the driving ports.

pub mod account_service;
pub mod auth;
pub mod auth_service;
pub mod catalogue;
pub mod catalogue_service;
pub mod collections_service;
pub mod error;
pub mod ids;
pub mod image;
pub mod listing;
pub mod permissions;
pub mod ports;
pub mod profiles;
pub mod recipe;
pub mod recipe_filter;
pub mod recipe_service;
pub mod shopping_list;
pub mod short_link;
pub mod subscription;
pub mod subscription_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthToken, CredentialsValidationError, LoginCredentials, PASSWORD_MAX, PASSWORD_MIN, Password,
    PasswordHash, Principal, TokenDigest,
};
pub use self::auth_service::AuthService;
pub use self::catalogue::{
    CatalogueValidationError, Ingredient, NewIngredient, NewTag, Tag,
};
pub use self::catalogue_service::CatalogueService;
pub use self::collections_service::RecipeCollectionsService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{IngredientId, RecipeId, TagId, UserId};
pub use self::image::{ImageKind, ImageUpload, ImageValidationError, MAX_IMAGE_BYTES, StoredImage};
pub use self::listing::Counted;
pub use self::permissions::{
    Access, IsAdminOrReadOnly, IsAuthorOrReadOnly, Permission, require_principal,
};
pub use self::recipe::{
    DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE, IngredientAmount, IngredientAmountInput, NewRecipe,
    RECIPE_NAME_MAX, Recipe, RecipeChanges, RecipeDraft, RecipeDraftInput, RecipeIngredientLine,
    RecipeLimits, RecipeRelations, RecipeSummary, RecipeValidationError, RecipeView, ValueBounds,
};
pub use self::recipe_filter::{RecipeFilter, RecipeFilterQuery, parse_flag};
pub use self::recipe_service::{RecipeService, RecipeServicePorts, RecipeServiceSettings};
pub use self::shopping_list::{
    CartIngredient, SHOPPING_LIST_LINES_PER_PAGE, SHOPPING_LIST_TITLE, ShoppingList,
    ShoppingListDocument, ShoppingListItem,
};
pub use self::short_link::{
    DEFAULT_SHORT_CODE_ATTEMPTS, RandomShortCodes, SHORT_CODE_LENGTH, ShortCode,
};
pub use self::subscription::{AuthorSubscription, RecipesLimit};
pub use self::subscription_service::SubscriptionService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EMAIL_MAX, Email, PERSON_NAME_MAX, PersonName, USERNAME_MAX, User, UserProfile,
    UserValidationError, Username,
};

/// HTTP header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use foodgram::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
