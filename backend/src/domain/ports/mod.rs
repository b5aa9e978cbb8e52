//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the image store, the password hasher, the
//! shopping list renderer and the short code source) are implemented by
//! outbound adapters. Driving ports (`*Query`, `*Command`, [`LoginService`],
//! [`TokenAuthenticator`], [`ShoppingListExport`]) are implemented by domain
//! services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_token_repository;
mod catalogue_command;
mod catalogue_query;
mod catalogue_repository;
mod collection_repository;
mod image_store;
mod login_service;
mod password_hasher;
mod recipe_collections_command;
mod recipe_command;
mod recipe_query;
mod recipe_repository;
mod shopping_list_renderer;
mod short_code_source;
mod subscription_repository;
mod subscriptions;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use auth_token_repository::MockAuthTokenRepository;
pub use auth_token_repository::{AuthTokenRepository, AuthTokenRepositoryError};
#[cfg(test)]
pub use catalogue_command::MockCatalogueCommand;
pub use catalogue_command::CatalogueCommand;
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError, ImportSummary};
#[cfg(test)]
pub use collection_repository::MockCollectionRepository;
pub use collection_repository::{
    CollectionRepository, CollectionRepositoryError, RecipeCollection,
};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use login_service::{MockLoginService, MockTokenAuthenticator};
pub use login_service::{LoginService, TokenAuthenticator};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use recipe_collections_command::{MockRecipeCollectionsCommand, MockShoppingListExport};
pub use recipe_collections_command::{RecipeCollectionsCommand, ShoppingListExport};
#[cfg(test)]
pub use recipe_command::MockRecipeCommand;
pub use recipe_command::RecipeCommand;
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_query::RecipeQuery;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use shopping_list_renderer::MockShoppingListRenderer;
pub use shopping_list_renderer::{ShoppingListRenderError, ShoppingListRenderer};
#[cfg(test)]
pub use short_code_source::MockShortCodeSource;
pub use short_code_source::ShortCodeSource;
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{SubscriptionRepository, SubscriptionRepositoryError};
#[cfg(test)]
pub use subscriptions::{MockSubscriptionsCommand, MockSubscriptionsQuery};
pub use subscriptions::{SubscriptionsCommand, SubscriptionsQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUser, StoredCredentials, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::{PasswordChange, Registration, UsersCommand};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
