use crate::element_finder::{ContainerLocator, ExtractionRule, FieldKind, RuleChain};
use crate::models::SourceTag;
use crate::utils::error::Result;

use super::{AcceptancePolicy, SourceProfile};

const CONTAINERS: &[&str] = &[
    "div._1YokD2._3Mn1Gg div._1AtVbE",
    "div._4ddWXP",
    "div._2kHMtA",
    "div.CXW8mj",
    "div._1xHGtK._373qXS",
    "div[data-id]",
];

const NAME: &[&str] = &["div._4rR01T", "a.s1Q9rs", "a.IRpwTa", "._2WkVRV", ".B_NuCI", ".Bv11UC", "a[title]"];

const PRICE: &[&str] = &["div._30jeq3", "div._3I9_wc", "._25b18c", "._30jeq3._1_WHN1", ".PEDQHg"];

const RATING: &[&str] = &[
    "div._3LWZlK",
    "div.gUuXy-",
    ".hGSR34",
    "._1lRcqv ._3LWZlK",
    r#"span[id*="productRating"]"#,
];

const REVIEWS: &[&str] = &[
    "span._2_R_DZ",
    "span._13vcmD",
    "._1lRcqv",
    r#"span[class*="review"]"#,
    "._2_R_DZ span",
];

const LINK: &[&str] = &["a[href]"];

const IMAGE: &[&str] = &["img[src]"];

const PRICE_MARKER: &str = "div._30jeq3";

/// Smallest container match count trusted on Flipkart; fewer usually means a
/// selector hit navigation or banners.
pub const MIN_CONTAINER_MATCHES: usize = 3;

pub fn profile() -> Result<SourceProfile> {
    let containers = ContainerLocator::new(
        RuleChain::new(FieldKind::Container, CONTAINERS)?,
        MIN_CONTAINER_MATCHES,
        Some(ExtractionRule::new(FieldKind::Price, PRICE_MARKER)?),
    );

    SourceProfile::builder(SourceTag::Flipkart, containers)
        .name(NAME)
        .price(PRICE)
        .rating(RATING)
        .reviews(REVIEWS)
        .link(LINK)
        .image(IMAGE)
        .acceptance(AcceptancePolicy::NameOrPrice)
        .raw_text_fallback(true)
        .rating_suffix("stars")
        .build()
}
