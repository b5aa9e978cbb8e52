//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use pagination::PageLimits;

use foodgram::domain::RecipeServiceSettings;
use foodgram::outbound::media::CapStdImageStore;
use foodgram::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) images: CapStdImageStore,
    pub(crate) recipe_settings: RecipeServiceSettings,
    pub(crate) page_limits: PageLimits,
}

impl ServerConfig {
    /// Construct a server configuration with default recipe bounds and page
    /// sizes.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, images: CapStdImageStore) -> Self {
        Self {
            bind_addr,
            db_pool,
            images,
            recipe_settings: RecipeServiceSettings::default(),
            page_limits: PageLimits::default(),
        }
    }

    /// Override cooking time and amount bounds.
    #[must_use]
    pub fn with_recipe_settings(mut self, settings: RecipeServiceSettings) -> Self {
        self.recipe_settings = settings;
        self
    }

    /// Override default and maximum page sizes.
    #[must_use]
    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.page_limits = limits;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
