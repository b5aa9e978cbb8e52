//! Shopping list PDF rendering with `printpdf`.
//!
//! A4 pages set in an embedded DejaVu Sans, so ingredient names outside
//! Latin-1 survive. Every page repeats the title and holds at most
//! [`SHOPPING_LIST_LINES_PER_PAGE`] numbered lines.

use printpdf::{IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::domain::ports::{ShoppingListRenderError, ShoppingListRenderer};
use crate::domain::{SHOPPING_LIST_LINES_PER_PAGE, SHOPPING_LIST_TITLE, ShoppingList};

const PAGE_WIDTH_MM: u16 = 210;
const PAGE_HEIGHT_MM: u16 = 297;
const MARGIN_MM: u16 = 20;
const TITLE_SIZE_PT: u16 = 20;
const LINE_SIZE_PT: u16 = 12;
const TITLE_GAP_MM: u16 = 15;
const LINE_HEIGHT_MM: u16 = 10;
const LAYER_NAME: &str = "shopping list";
const FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");

/// Text placed on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PageLayout {
    lines: Vec<String>,
}

fn layout(list: &ShoppingList) -> Vec<PageLayout> {
    list.pages(SHOPPING_LIST_LINES_PER_PAGE)
        .into_iter()
        .map(|lines| PageLayout { lines })
        .collect()
}

fn mm(value: u16) -> Mm {
    Mm(f32::from(value))
}

/// Vertical position of the line at `index` on a page.
fn line_y(index: usize) -> u16 {
    let offset = u16::try_from(index)
        .unwrap_or(u16::MAX)
        .saturating_add(1)
        .saturating_mul(LINE_HEIGHT_MM);
    PAGE_HEIGHT_MM
        .saturating_sub(MARGIN_MM)
        .saturating_sub(TITLE_GAP_MM)
        .saturating_sub(offset)
}

fn draw_page(layer: &PdfLayerReference, font: &IndirectFontRef, page: &PageLayout) {
    layer.use_text(
        SHOPPING_LIST_TITLE,
        f32::from(TITLE_SIZE_PT),
        mm(MARGIN_MM),
        mm(PAGE_HEIGHT_MM - MARGIN_MM),
        font,
    );
    for (index, line) in page.lines.iter().enumerate() {
        layer.use_text(
            line.as_str(),
            f32::from(LINE_SIZE_PT),
            mm(MARGIN_MM),
            mm(line_y(index)),
            font,
        );
    }
}

/// [`ShoppingListRenderer`] producing PDF bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintPdfShoppingListRenderer;

impl ShoppingListRenderer for PrintPdfShoppingListRenderer {
    fn render(&self, list: &ShoppingList) -> Result<Vec<u8>, ShoppingListRenderError> {
        let pages = layout(list);
        let (doc, first_page, first_layer) = PdfDocument::new(
            SHOPPING_LIST_TITLE,
            mm(PAGE_WIDTH_MM),
            mm(PAGE_HEIGHT_MM),
            LAYER_NAME,
        );
        let font = doc
            .add_external_font(FONT)
            .map_err(|err| ShoppingListRenderError::render(err.to_string()))?;

        for (number, page) in pages.iter().enumerate() {
            let layer = if number == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_index, layer_index) =
                    doc.add_page(mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM), LAYER_NAME);
                doc.get_page(page_index).get_layer(layer_index)
            };
            draw_page(&layer, &font, page);
        }

        doc.save_to_bytes()
            .map_err(|err| ShoppingListRenderError::render(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CartIngredient;
    use rstest::rstest;
    use std::collections::HashMap;

    fn list_of(count: usize) -> ShoppingList {
        ShoppingList::aggregate((0..count).map(|index| CartIngredient {
            name: format!("item {index:02}"),
            measurement_unit: "g".to_owned(),
            amount: 10,
        }))
    }

    #[rstest]
    #[case(0, 1)]
    #[case(23, 1)]
    #[case(24, 2)]
    #[case(47, 3)]
    fn lines_split_across_pages(#[case] items: usize, #[case] pages: usize) {
        assert_eq!(layout(&list_of(items)).len(), pages);
    }

    #[rstest]
    fn second_page_continues_numbering() {
        let pages = layout(&list_of(24));
        let second = pages.get(1).expect("second page");
        assert_eq!(second.lines, vec!["24. item 23 - 10g".to_owned()]);
    }

    #[rstest]
    fn lines_stay_above_bottom_margin() {
        let last = line_y(SHOPPING_LIST_LINES_PER_PAGE - 1);
        assert!(last >= MARGIN_MM, "last line at {last}mm");
    }

    #[rstest]
    #[case(0)]
    #[case(30)]
    fn renders_pdf_bytes(#[case] items: usize) {
        let bytes = PrintPdfShoppingListRenderer
            .render(&list_of(items))
            .expect("rendered");
        assert!(bytes.starts_with(b"%PDF"));
    }

    /// Glyph id to character pairs from every `ToUnicode` map in the file.
    fn glyph_map(doc: &lopdf::Document) -> HashMap<u16, char> {
        let mut map = HashMap::new();
        for object in doc.objects.values() {
            let Ok(stream) = object.as_stream() else {
                continue;
            };
            let data = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            let text = String::from_utf8_lossy(&data);
            if !text.contains("beginbfchar") {
                continue;
            }
            for line in text.lines() {
                let mut cells = line
                    .split_whitespace()
                    .filter_map(|cell| cell.strip_prefix('<')?.strip_suffix('>'));
                let (Some(glyph), Some(code)) = (cells.next(), cells.next()) else {
                    continue;
                };
                let glyph = u16::from_str_radix(glyph, 16).expect("glyph id");
                let code = u32::from_str_radix(code, 16).expect("code point");
                map.insert(glyph, char::from_u32(code).expect("valid char"));
            }
        }
        map
    }

    fn shown_text(bytes: &[u8]) -> Vec<String> {
        let doc = lopdf::Document::load_mem(bytes).expect("parse pdf");
        let glyphs = glyph_map(&doc);
        let mut shown = Vec::new();
        for page in doc.get_pages().into_values() {
            let content = doc.get_page_content(page).expect("page content");
            let content = lopdf::content::Content::decode(&content).expect("decode content");
            for op in content.operations.iter().filter(|op| op.operator == "Tj") {
                let Some(lopdf::Object::String(raw, _)) = op.operands.first() else {
                    continue;
                };
                let text = raw
                    .chunks(2)
                    .map(|pair| {
                        let glyph = u16::from_be_bytes([pair[0], pair[1]]);
                        glyphs.get(&glyph).copied().unwrap_or('\u{fffd}')
                    })
                    .collect();
                shown.push(text);
            }
        }
        shown
    }

    #[rstest]
    fn cyrillic_ingredients_keep_name_and_unit() {
        let list = ShoppingList::aggregate([CartIngredient {
            name: "мука".to_owned(),
            measurement_unit: "г".to_owned(),
            amount: 150,
        }]);

        let bytes = PrintPdfShoppingListRenderer.render(&list).expect("rendered");

        assert_eq!(
            shown_text(&bytes),
            vec![SHOPPING_LIST_TITLE.to_owned(), "1. мука - 150г".to_owned()]
        );
    }
}
