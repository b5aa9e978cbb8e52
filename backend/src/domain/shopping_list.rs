//! Aggregated shopping list built from a user's cart.
//!
//! Ingredient lines from every carted recipe are grouped by name and
//! measurement unit, their amounts summed, and the result ordered by name
//! then unit. Rendering splits the numbered lines into pages.

use std::collections::BTreeMap;

/// Title printed at the top of every page.
pub const SHOPPING_LIST_TITLE: &str = "Shopping list";

/// Number of item lines printed on one page.
pub const SHOPPING_LIST_LINES_PER_PAGE: usize = 23;

/// One recipe ingredient line found in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartIngredient {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

/// A summed shopping list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u64,
}

/// Ordered, aggregated shopping list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// Group rows by `(name, unit)` and sum their amounts.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{CartIngredient, ShoppingList};
    ///
    /// let row = |amount| CartIngredient {
    ///     name: "flour".into(),
    ///     measurement_unit: "g".into(),
    ///     amount,
    /// };
    /// let list = ShoppingList::aggregate(vec![row(100), row(50)]);
    /// assert_eq!(list.lines(), vec!["1. flour - 150g".to_owned()]);
    /// ```
    pub fn aggregate(rows: impl IntoIterator<Item = CartIngredient>) -> Self {
        let mut totals: BTreeMap<(String, String), u64> = BTreeMap::new();
        for row in rows {
            let total = totals.entry((row.name, row.measurement_unit)).or_insert(0);
            *total = total.saturating_add(u64::from(row.amount));
        }
        let items = totals
            .into_iter()
            .map(|((name, measurement_unit), amount)| ShoppingListItem {
                name,
                measurement_unit,
                amount,
            })
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Numbered lines `"{index}. {name} - {amount}{unit}"`, starting at 1.
    pub fn lines(&self) -> Vec<String> {
        self.items
            .iter()
            .zip(1_usize..)
            .map(|(item, index)| {
                format!(
                    "{index}. {} - {}{}",
                    item.name, item.amount, item.measurement_unit
                )
            })
            .collect()
    }

    /// Split the numbered lines into pages of at most `lines_per_page`.
    ///
    /// An empty list still yields one (empty) page so the title is printed.
    pub fn pages(&self, lines_per_page: usize) -> Vec<Vec<String>> {
        let lines = self.lines();
        if lines.is_empty() {
            return vec![Vec::new()];
        }
        lines
            .chunks(lines_per_page.max(1))
            .map(<[String]>::to_vec)
            .collect()
    }
}

/// Rendered shopping list ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListDocument {
    pub filename: String,
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(name: &str, unit: &str, amount: u32) -> CartIngredient {
        CartIngredient {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            amount,
        }
    }

    #[rstest]
    fn shared_ingredients_are_summed() {
        let list = ShoppingList::aggregate(vec![row("milk", "ml", 100), row("milk", "ml", 50)]);
        assert_eq!(
            list.items(),
            &[ShoppingListItem {
                name: "milk".to_owned(),
                measurement_unit: "ml".to_owned(),
                amount: 150,
            }]
        );
    }

    #[rstest]
    fn different_units_stay_separate_and_sorted() {
        let list = ShoppingList::aggregate(vec![
            row("sugar", "g", 10),
            row("butter", "kg", 1),
            row("butter", "g", 200),
        ]);
        assert_eq!(
            list.lines(),
            vec![
                "1. butter - 200g".to_owned(),
                "2. butter - 1kg".to_owned(),
                "3. sugar - 10g".to_owned(),
            ]
        );
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(23, 1)]
    #[case(24, 2)]
    #[case(47, 3)]
    fn pages_hold_twenty_three_lines(#[case] items: u32, #[case] expected_pages: usize) {
        let rows = (0..items).map(|i| row(&format!("item{i:03}"), "g", 1));
        let pages = ShoppingList::aggregate(rows).pages(SHOPPING_LIST_LINES_PER_PAGE);
        assert_eq!(pages.len(), expected_pages);
        assert!(pages.iter().all(|page| page.len() <= SHOPPING_LIST_LINES_PER_PAGE));
    }

    #[rstest]
    fn second_page_continues_numbering() {
        let rows = (0..24_u32).map(|i| row(&format!("item{i:03}"), "g", 1));
        let pages = ShoppingList::aggregate(rows).pages(SHOPPING_LIST_LINES_PER_PAGE);
        assert_eq!(
            pages.get(1).map(Vec::as_slice),
            Some(&["24. item023 - 1g".to_owned()][..])
        );
    }
}
