//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use pagination::PageLimits;

use crate::domain::ports::{
    AuthTokenRepository, CatalogueCommand, CatalogueQuery, CatalogueRepository,
    CollectionRepository, ImageStore, LoginService, PasswordHasher, RecipeCollectionsCommand,
    RecipeCommand, RecipeQuery, RecipeRepository, ShoppingListExport, ShoppingListRenderer,
    ShortCodeSource, SubscriptionRepository, SubscriptionsCommand, SubscriptionsQuery,
    TokenAuthenticator, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{
    AccountService, AuthService, CatalogueService, RecipeCollectionsService, RecipeService,
    RecipeServicePorts, RecipeServiceSettings, SubscriptionService,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub authenticator: Arc<dyn TokenAuthenticator>,
    pub users: Arc<dyn UsersQuery>,
    pub accounts: Arc<dyn UsersCommand>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub catalogue_admin: Arc<dyn CatalogueCommand>,
    pub recipes: Arc<dyn RecipeQuery>,
    pub recipe_commands: Arc<dyn RecipeCommand>,
    pub collections: Arc<dyn RecipeCollectionsCommand>,
    pub shopping_list: Arc<dyn ShoppingListExport>,
    pub subscriptions: Arc<dyn SubscriptionsCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionsQuery>,
    /// Used only to turn stored image paths into public URLs.
    pub images: Arc<dyn ImageStore>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub authenticator: Arc<dyn TokenAuthenticator>,
    pub users: Arc<dyn UsersQuery>,
    pub accounts: Arc<dyn UsersCommand>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub catalogue_admin: Arc<dyn CatalogueCommand>,
    pub recipes: Arc<dyn RecipeQuery>,
    pub recipe_commands: Arc<dyn RecipeCommand>,
    pub collections: Arc<dyn RecipeCollectionsCommand>,
    pub shopping_list: Arc<dyn ShoppingListExport>,
    pub subscriptions: Arc<dyn SubscriptionsCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionsQuery>,
    pub images: Arc<dyn ImageStore>,
    pub page_limits: PageLimits,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, PageLimits::default())
    }
}

impl HttpState {
    /// Construct state from a ports bundle and pagination bounds.
    pub fn new(ports: HttpStatePorts, page_limits: PageLimits) -> Self {
        let HttpStatePorts {
            login,
            authenticator,
            users,
            accounts,
            catalogue,
            catalogue_admin,
            recipes,
            recipe_commands,
            collections,
            shopping_list,
            subscriptions,
            subscriptions_query,
            images,
        } = ports;
        Self {
            login,
            authenticator,
            users,
            accounts,
            catalogue,
            catalogue_admin,
            recipes,
            recipe_commands,
            collections,
            shopping_list,
            subscriptions,
            subscriptions_query,
            images,
            page_limits,
        }
    }
}

/// Driven adapters the domain services are composed from.
///
/// Production wiring passes the Diesel repositories; integration tests pass
/// in-memory ones.
pub struct DrivenAdapters<U, T, C, R, L, S, H, I, P> {
    pub users: Arc<U>,
    pub tokens: Arc<T>,
    pub catalogue: Arc<C>,
    pub recipes: Arc<R>,
    pub collections: Arc<L>,
    pub subscriptions: Arc<S>,
    pub hasher: Arc<H>,
    pub images: Arc<I>,
    pub renderer: Arc<P>,
    pub short_codes: Arc<dyn ShortCodeSource>,
}

impl<U, T, C, R, L, S, H, I, P> DrivenAdapters<U, T, C, R, L, S, H, I, P>
where
    U: UserRepository + 'static,
    T: AuthTokenRepository + 'static,
    C: CatalogueRepository + 'static,
    R: RecipeRepository + 'static,
    L: CollectionRepository + 'static,
    S: SubscriptionRepository + 'static,
    H: PasswordHasher + 'static,
    I: ImageStore + 'static,
    P: ShoppingListRenderer + 'static,
{
    /// Build the domain services and expose them as driving ports.
    pub fn into_ports(self, settings: RecipeServiceSettings) -> HttpStatePorts {
        let Self {
            users,
            tokens,
            catalogue,
            recipes,
            collections,
            subscriptions,
            hasher,
            images,
            renderer,
            short_codes,
        } = self;

        let auth = Arc::new(AuthService::new(
            Arc::clone(&users),
            tokens,
            Arc::clone(&hasher),
        ));
        let accounts = Arc::new(AccountService::new(
            Arc::clone(&users),
            Arc::clone(&subscriptions),
            hasher,
            Arc::clone(&images),
        ));
        let catalogue_service = Arc::new(CatalogueService::new(Arc::clone(&catalogue)));
        let recipe_service = Arc::new(RecipeService::new(
            RecipeServicePorts {
                recipes: Arc::clone(&recipes),
                catalogue,
                users: Arc::clone(&users),
                subscriptions: Arc::clone(&subscriptions),
                images: Arc::clone(&images),
                short_codes,
            },
            settings,
        ));
        let collections_service = Arc::new(RecipeCollectionsService::new(
            Arc::clone(&recipes),
            collections,
            Arc::clone(&users),
            renderer,
        ));
        let subscription_service = Arc::new(SubscriptionService::new(subscriptions, users, recipes));

        HttpStatePorts {
            login: auth.clone(),
            authenticator: auth,
            users: accounts.clone(),
            accounts,
            catalogue: catalogue_service.clone(),
            catalogue_admin: catalogue_service,
            recipes: recipe_service.clone(),
            recipe_commands: recipe_service,
            collections: collections_service.clone(),
            shopping_list: collections_service,
            subscriptions: subscription_service.clone(),
            subscriptions_query: subscription_service,
            images,
        }
    }
}
