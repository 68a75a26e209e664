use product_scout::models::{FieldOutcome, UNKNOWN_PRODUCT};
use product_scout::plugins::adapters::MAX_RECORDS_PER_SOURCE;
use product_scout::plugins::SourceProfile;
use product_scout::SourceTag;

use super::{amazon_results_page, flipkart_results_page};

#[test]
fn test_wireless_mouse_scenario_amazon() {
    // Eight containers, the 3rd and 6th without any title
    let mut page = String::from(r#"<html><body><div class="s-main-slot">"#);
    for i in 1..=8 {
        if i == 3 || i == 6 {
            page.push_str(&format!(
                r#"<div data-component-type="s-search-result" class="s-result-item"><span class="a-price"><span class="a-offscreen">₹{}</span></span></div>"#,
                i * 100
            ));
        } else {
            page.push_str(&format!(
                r#"<div data-component-type="s-search-result" class="s-result-item"><h2><a class="a-link-normal" href="/dp/{i}">Wireless Mouse {i}</a></h2></div>"#,
                i = i
            ));
        }
    }
    page.push_str("</div></body></html>");

    let profile = SourceProfile::for_source(SourceTag::Amazon).unwrap();
    let records = profile.extract_listing(&page);

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Wireless Mouse 1", "Wireless Mouse 2", "Wireless Mouse 4", "Wireless Mouse 5", "Wireless Mouse 7"]
    );
    assert!(records.iter().all(|r| r.price == FieldOutcome::Missing));
}

#[test]
fn test_five_named_priced_cards_among_eight() {
    // Cards 3, 6 and 8 carry a price but no title
    let mut page = String::from(r#"<html><body><div class="s-main-slot">"#);
    for i in 1..=8 {
        let price = format!(
            r#"<span class="a-price"><span class="a-offscreen">₹{},{:03}</span></span>"#,
            i,
            i * 10
        );
        if i == 3 || i == 6 || i == 8 {
            page.push_str(&format!(
                r#"<div data-component-type="s-search-result" class="s-result-item">{}</div>"#,
                price
            ));
        } else {
            page.push_str(&format!(
                r#"<div data-component-type="s-search-result" class="s-result-item"><h2><a class="a-link-normal" href="/dp/{i}">Wireless Mouse {i}</a></h2>{price}</div>"#,
                i = i,
                price = price
            ));
        }
    }
    page.push_str("</div></body></html>");

    let records = SourceProfile::for_source(SourceTag::Amazon)
        .unwrap()
        .extract_listing(&page);

    assert_eq!(records.len(), MAX_RECORDS_PER_SOURCE);
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Wireless Mouse 1", "Wireless Mouse 2", "Wireless Mouse 4", "Wireless Mouse 5", "Wireless Mouse 7"]
    );
    assert!(records.iter().all(|r| r.price.is_found()));
    assert_eq!(records[2].price, FieldOutcome::Found("₹4,040".to_string()));
    assert_eq!(records[4].link.as_deref(), Some("https://www.amazon.in/dp/7"));
}

#[test]
fn test_cap_applies_per_source() {
    let amazon = SourceProfile::for_source(SourceTag::Amazon)
        .unwrap()
        .extract_listing(&amazon_results_page(9));
    let flipkart = SourceProfile::for_source(SourceTag::Flipkart)
        .unwrap()
        .extract_listing(&flipkart_results_page(9));

    assert_eq!(amazon.len(), MAX_RECORDS_PER_SOURCE);
    assert_eq!(flipkart.len(), MAX_RECORDS_PER_SOURCE);
    assert_eq!(amazon[4].name, "Wireless Mouse Model 5");
    assert_eq!(flipkart[0].rating, FieldOutcome::Found("4.1 stars".to_string()));
}

#[test]
fn test_static_snapshot_is_idempotent() {
    let page = flipkart_results_page(4);
    let profile = SourceProfile::for_source(SourceTag::Flipkart).unwrap();

    let first = profile.extract_listing(&page);
    let second = profile.extract_listing(&page);
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn test_blocked_page_yields_no_records() {
    let captcha = r#"<html><body><form action="/errors/validateCaptcha"><p>Type the characters you see</p></form></body></html>"#;

    for source in SourceTag::ALL {
        let records = SourceProfile::for_source(source).unwrap().extract_listing(captcha);
        assert!(records.is_empty(), "{} produced records from a captcha page", source);
    }
}

#[test]
fn test_flipkart_price_only_tiles_are_kept() {
    let page = r#"
        <div data-id="1"><div class="_30jeq3">₹399</div></div>
        <div data-id="2"><div class="_30jeq3">₹499</div></div>
        <div data-id="3"><a title="Zebronics Zeb-Transformer" href="/z/p/1">Zebronics Zeb-Transformer</a></div>
    "#;

    let records = SourceProfile::for_source(SourceTag::Flipkart)
        .unwrap()
        .extract_listing(page);

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].name, UNKNOWN_PRODUCT);
    assert_eq!(records[2].name, "Zebronics Zeb-Transformer");
    assert_eq!(records[2].price, FieldOutcome::Missing);
    assert_eq!(records[2].link.as_deref(), Some("https://www.flipkart.com/z/p/1"));
}
