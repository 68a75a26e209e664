use crate::element_finder::{ContainerLocator, ExtractionRule, FieldKind, RuleChain};
use crate::models::SourceTag;
use crate::utils::error::Result;

use super::{AcceptancePolicy, SourceProfile};

const CONTAINERS: &[&str] = &[
    r#"div.s-result-item[data-component-type="s-search-result"]"#,
    "div.sg-col-4-of-12",
    "div.s-asin",
    r#"div[data-asin]:not([data-asin=""])"#,
];

const NAME: &[&str] = &[
    "h2 .a-link-normal",
    "h2 span.a-text-normal",
    ".a-size-medium.a-text-normal",
    r#"[data-cy="title-recipe"]"#,
    "h2 a span",
    ".a-size-base-plus.a-color-base.a-text-normal",
];

const PRICE: &[&str] = &[
    ".a-price .a-offscreen",
    ".a-price-whole",
    "span.a-price",
    r#"[data-cy="price-recipe"]"#,
    "span.a-color-base span.a-color-price",
];

const RATING: &[&str] = &[
    ".a-icon-star-small .a-icon-alt",
    ".a-icon-star .a-icon-alt",
    r#"[data-cy="rating-recipe"]"#,
    "i.a-icon.a-icon-star-small span",
    "i.a-icon.a-icon-star span",
];

const REVIEWS: &[&str] = &[
    r#"span[aria-label*="stars"] + span"#,
    ".a-size-base.s-underline-text",
    r#"[data-cy="review-count-recipe"]"#,
];

const LINK: &[&str] = &["h2 a.a-link-normal[href]", "a.a-link-normal.s-no-outline[href]", "h2 a[href]"];

const IMAGE: &[&str] = &["img.s-image[src]", "img[src]"];

const PRICE_MARKER: &str = "span.a-price";

/// Amazon renders its results client-side, so any matching container rule is
/// trusted and every record must carry a name.
pub fn profile() -> Result<SourceProfile> {
    let containers = ContainerLocator::new(
        RuleChain::new(FieldKind::Container, CONTAINERS)?,
        1,
        Some(ExtractionRule::new(FieldKind::Price, PRICE_MARKER)?),
    );

    SourceProfile::builder(SourceTag::Amazon, containers)
        .name(NAME)
        .price(PRICE)
        .rating(RATING)
        .reviews(REVIEWS)
        .link(LINK)
        .image(IMAGE)
        .acceptance(AcceptancePolicy::RequireName)
        .build()
}
