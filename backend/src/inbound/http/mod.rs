//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod catalogue;
pub mod error;
pub mod health;
pub mod listing;
pub mod projections;
pub mod recipes;
pub mod schemas;
pub mod short_links;
pub mod state;
pub mod subscriptions;
#[cfg(test)]
pub mod test_utils;
pub mod tokens;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the `/api` scope and the short link redirect.
///
/// Literal segments such as `/users/me/` are registered before the matching
/// `{id}` routes so they are not captured as identifiers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let api = web::scope("/api")
        .service(tokens::login)
        .service(tokens::logout)
        .service(users::current_user)
        .service(users::set_avatar)
        .service(users::remove_avatar)
        .service(users::set_password)
        .service(subscriptions::list_subscriptions)
        .service(users::register)
        .service(users::list_users)
        .service(users::user_profile)
        .service(users::user_write_not_allowed)
        .service(subscriptions::subscribe)
        .service(subscriptions::unsubscribe)
        .service(catalogue::list_tags)
        .service(catalogue::create_tag)
        .service(catalogue::get_tag)
        .service(catalogue::delete_tag)
        .service(catalogue::list_ingredients)
        .service(catalogue::create_ingredient)
        .service(catalogue::get_ingredient)
        .service(catalogue::delete_ingredient)
        .service(recipes::download_shopping_cart)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(recipes::get_link)
        .service(recipes::add_favorite)
        .service(recipes::remove_favorite)
        .service(recipes::add_to_cart)
        .service(recipes::remove_from_cart);

    cfg.app_data(error::json_config())
        .app_data(error::path_config())
        .app_data(error::query_config())
        .service(api)
        .service(short_links::resolve);
}
