use crate::models::{ProductRecord, PRICE_MISSING, RATING_MISSING};
use crate::normalize::link_or_search;

/// Names longer than this are cut in the comparison table.
pub const TABLE_NAME_WIDTH: usize = 50;

const NAME_COLUMN: usize = TABLE_NAME_WIDTH + 3;

pub fn truncate_name(name: &str) -> String {
    if name.chars().count() > TABLE_NAME_WIDTH {
        let head: String = name.chars().take(TABLE_NAME_WIDTH).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

fn table_row(index: &str, name: &str, price: &str, rating: &str, source: &str) -> String {
    format!(
        "{:<3} {:<width$} {:>14} {:<20} {:<8}\n",
        index,
        name,
        price,
        rating,
        source,
        width = NAME_COLUMN
    )
}

/// Plain-text quick comparison of the given records, one row each.
pub fn comparison_table(products: &[ProductRecord]) -> String {
    let mut out = table_row("#", "Product", "Price", "Rating", "Source");
    out.push_str(&"-".repeat(3 + 1 + NAME_COLUMN + 1 + 14 + 1 + 20 + 1 + 8));
    out.push('\n');

    for (index, product) in products.iter().enumerate() {
        out.push_str(&table_row(
            &(index + 1).to_string(),
            &truncate_name(&product.name),
            &product.price.display_or(PRICE_MISSING),
            &product.rating.display_or(RATING_MISSING),
            product.source.as_str(),
        ));
    }

    out
}

/// Detailed listing with the link (or search fallback) for each record.
pub fn product_details(products: &[ProductRecord]) -> String {
    products
        .iter()
        .enumerate()
        .map(|(index, product)| {
            let plain = product.to_plain();
            let mut entry = format!(
                "{}. {} [{}]\n   Price:   {}\n   Rating:  {}\n   Reviews: {}\n   Link:    {}\n",
                index + 1,
                plain.name,
                plain.source,
                plain.price,
                plain.rating,
                plain.reviews,
                link_or_search(product)
            );
            if let Some(image) = &plain.image {
                entry.push_str(&format!("   Image:   {}\n", image));
            }
            entry
        })
        .collect()
}
