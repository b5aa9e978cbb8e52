//! Builders wiring the Diesel repositories into HTTP state.

use std::sync::Arc;

use actix_web::web;

use foodgram::domain::RandomShortCodes;
use foodgram::inbound::http::state::{DrivenAdapters, HttpState};
use foodgram::outbound::pdf::PrintPdfShoppingListRenderer;
use foodgram::outbound::persistence::{
    DieselAuthTokenRepository, DieselCatalogueRepository, DieselCollectionRepository,
    DieselRecipeRepository, DieselSubscriptionRepository, DieselUserRepository,
};
use foodgram::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Build the shared HTTP state from the configured pool and media store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let pool = &config.db_pool;
    let ports = DrivenAdapters {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        tokens: Arc::new(DieselAuthTokenRepository::new(pool.clone())),
        catalogue: Arc::new(DieselCatalogueRepository::new(pool.clone())),
        recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
        collections: Arc::new(DieselCollectionRepository::new(pool.clone())),
        subscriptions: Arc::new(DieselSubscriptionRepository::new(pool.clone())),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        images: Arc::new(config.images.clone()),
        renderer: Arc::new(PrintPdfShoppingListRenderer),
        short_codes: Arc::new(RandomShortCodes),
    }
    .into_ports(config.recipe_settings);

    web::Data::new(HttpState::new(ports, config.page_limits))
}
