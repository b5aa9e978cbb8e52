//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use chrono::{TimeZone, Utc};
use pagination::PageLimits;

use crate::domain::ports::{
    MockCatalogueCommand, MockCatalogueQuery, MockImageStore, MockLoginService,
    MockRecipeCollectionsCommand, MockRecipeCommand, MockRecipeQuery, MockShoppingListExport,
    MockSubscriptionsCommand, MockSubscriptionsQuery, MockTokenAuthenticator, MockUsersCommand,
    MockUsersQuery,
};
use crate::domain::{
    Ingredient, IngredientId, Principal, Recipe, RecipeId, RecipeIngredientLine, RecipeRelations,
    RecipeView, ShortCode, StoredImage, Tag, TagId, User, UserId, UserProfile,
};

use super::state::{HttpState, HttpStatePorts};

/// Token accepted by [`MockPorts::authenticate_as`].
pub const TEST_TOKEN: &str = "chef-token";

/// Mocked driving ports. Unconfigured mocks panic when called.
pub struct MockPorts {
    pub login: MockLoginService,
    pub authenticator: MockTokenAuthenticator,
    pub users: MockUsersQuery,
    pub accounts: MockUsersCommand,
    pub catalogue: MockCatalogueQuery,
    pub catalogue_admin: MockCatalogueCommand,
    pub recipes: MockRecipeQuery,
    pub recipe_commands: MockRecipeCommand,
    pub collections: MockRecipeCollectionsCommand,
    pub shopping_list: MockShoppingListExport,
    pub subscriptions: MockSubscriptionsCommand,
    pub subscriptions_query: MockSubscriptionsQuery,
    pub images: MockImageStore,
}

impl Default for MockPorts {
    fn default() -> Self {
        Self {
            login: MockLoginService::new(),
            authenticator: MockTokenAuthenticator::new(),
            users: MockUsersQuery::new(),
            accounts: MockUsersCommand::new(),
            catalogue: MockCatalogueQuery::new(),
            catalogue_admin: MockCatalogueCommand::new(),
            recipes: MockRecipeQuery::new(),
            recipe_commands: MockRecipeCommand::new(),
            collections: MockRecipeCollectionsCommand::new(),
            shopping_list: MockShoppingListExport::new(),
            subscriptions: MockSubscriptionsCommand::new(),
            subscriptions_query: MockSubscriptionsQuery::new(),
            images: media_store(),
        }
    }
}

impl MockPorts {
    /// Resolve [`TEST_TOKEN`] to `principal`; any other token is unknown.
    pub fn authenticate_as(&mut self, principal: Principal) {
        self.authenticator
            .expect_authenticate()
            .returning(move |token| Ok((token.expose() == TEST_TOKEN).then_some(principal)));
    }

    pub fn into_state(self) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                login: Arc::new(self.login),
                authenticator: Arc::new(self.authenticator),
                users: Arc::new(self.users),
                accounts: Arc::new(self.accounts),
                catalogue: Arc::new(self.catalogue),
                catalogue_admin: Arc::new(self.catalogue_admin),
                recipes: Arc::new(self.recipes),
                recipe_commands: Arc::new(self.recipe_commands),
                collections: Arc::new(self.collections),
                shopping_list: Arc::new(self.shopping_list),
                subscriptions: Arc::new(self.subscriptions),
                subscriptions_query: Arc::new(self.subscriptions_query),
                images: Arc::new(self.images),
            },
            PageLimits::default(),
        )
    }
}

/// Image store mock that only resolves URLs below `http://testserver/media/`.
pub fn media_store() -> MockImageStore {
    let mut store = MockImageStore::new();
    store
        .expect_url()
        .returning(|image| format!("http://testserver/media/{}", image.as_str()));
    store
}

/// Full API application backed by `ports`.
pub fn api_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .configure(super::configure)
        .default_service(web::to(super::error::not_found))
}

/// Attach the credentials accepted by [`MockPorts::authenticate_as`].
pub fn authed(req: test::TestRequest) -> test::TestRequest {
    req.insert_header((AUTHORIZATION, format!("Token {TEST_TOKEN}")))
}

pub fn sample_user(id: i64) -> User {
    User {
        id: UserId::new(id),
        email: format!("user{id}@example.com"),
        username: format!("user{id}"),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        avatar: None,
        is_superuser: false,
    }
}

pub fn sample_profile(id: i64, is_subscribed: bool) -> UserProfile {
    UserProfile {
        user: sample_user(id),
        is_subscribed,
    }
}

pub fn sample_recipe(id: i64, author: UserId) -> Recipe {
    Recipe {
        id: RecipeId::new(id),
        author_id: author,
        name: format!("Recipe {id}"),
        image: StoredImage::new(format!("recipes/images/{id}.png")),
        text: "Mix and bake.".to_owned(),
        cooking_time: 15,
        short_code: ShortCode::from_stored("Ab3dE9"),
        created_at: Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid timestamp"),
    }
}

pub fn sample_view(id: i64, author: UserId) -> RecipeView {
    RecipeView {
        recipe: sample_recipe(id, author),
        author: sample_profile(author.get(), false),
        relations: RecipeRelations {
            tags: vec![Tag {
                id: TagId::new(1),
                name: "Breakfast".to_owned(),
                slug: "breakfast".to_owned(),
            }],
            ingredients: vec![RecipeIngredientLine {
                ingredient: Ingredient {
                    id: IngredientId::new(2),
                    name: "flour".to_owned(),
                    measurement_unit: "g".to_owned(),
                },
                amount: 200,
            }],
            is_favorited: false,
            is_in_shopping_cart: false,
        },
    }
}
