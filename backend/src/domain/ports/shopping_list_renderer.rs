//! Port for turning an aggregated shopping list into a document.
use crate::domain::ShoppingList;

use super::define_port_error;

define_port_error! {
    /// Errors raised by shopping list renderers.
    pub enum ShoppingListRenderError {
        /// The document could not be produced.
        Render { message: String } => InternalError: "shopping list rendering failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait ShoppingListRenderer: Send + Sync {
    /// Render the list as PDF bytes.
    fn render(&self, list: &ShoppingList) -> Result<Vec<u8>, ShoppingListRenderError>;
}
