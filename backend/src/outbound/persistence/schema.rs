//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        email -> Varchar,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// Media-relative path of the avatar image.
        avatar -> Nullable<Text>,
        is_superuser -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issued API tokens, keyed by the SHA-256 digest of the token.
    auth_tokens (digest) {
        digest -> Bpchar,
        user_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    tags (id) {
        id -> Int8,
        name -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    ingredients (id) {
        id -> Int8,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    /// Published recipes.
    recipes (id) {
        id -> Int8,
        author_id -> Int8,
        name -> Varchar,
        /// Media-relative path of the dish photo.
        image -> Text,
        description -> Text,
        cooking_time -> Int4,
        short_code -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::table! {
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Int8,
        ingredient_id -> Int8,
        amount -> Int4,
    }
}

diesel::table! {
    favorites (user_id, recipe_id) {
        user_id -> Int8,
        recipe_id -> Int8,
    }
}

diesel::table! {
    shopping_cart (user_id, recipe_id) {
        user_id -> Int8,
        recipe_id -> Int8,
    }
}

diesel::table! {
    /// `user_id` follows `following_id`.
    subscriptions (user_id, following_id) {
        user_id -> Int8,
        following_id -> Int8,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(favorites -> users (user_id));
diesel::joinable!(shopping_cart -> recipes (recipe_id));
diesel::joinable!(shopping_cart -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    auth_tokens,
    tags,
    ingredients,
    recipes,
    recipe_tags,
    recipe_ingredients,
    favorites,
    shopping_cart,
    subscriptions,
);
