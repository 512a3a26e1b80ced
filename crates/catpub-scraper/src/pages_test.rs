use super::*;

const CATEGORY_HTML: &str = r#"
<html><body>
  <div class="nav-title">
    <span class="layui-breadcrumb">
      <a href="/">Home</a>
      <a href="/ball-bearings/">Ball Bearings</a>
      <a href="/ball-bearings/deep-groove/">Deep Groove Ball Bearings</a>
    </span>
  </div>
  <div class="boxT">
    <div class="posit-box">
      <h2><a href="/miniature/"> Miniature Bearings </a></h2>
      <div class="hang">
        <a href="/product/681zz.html"><div class="Product">681ZZ</div></a>
        <a href="/product/682zz.html"><div class="Product">682ZZ</div></a>
      </div>
    </div>
    <div class="posit-box">
      <div class="hang"><a href="/orphan.html"><div class="Product">X1</div></a></div>
    </div>
    <div class="posit-box">
      <h2><a href="/thin/">Thin Section</a></h2>
      <div class="hang">
        <a><div class="Product">6700</div></a>
      </div>
    </div>
  </div>
</body></html>
"#;

const PRODUCT_HTML: &str = r#"
<html><body>
  <div class="firstbreadcrumb"><cite>6201-2RS</cite></div>
  <div class="layui-row">
    <div class="layui-col-md3 detail-img-box">
      <img src="/upload/6201-small.jpg">
      <div><div><span>$ 12.50</span></div></div>
    </div>
    <div id="magnifier"><div class="big"><img src="upload/6201-big.jpg?v=2"></div></div>
    <div class="layui-col-md4">
      <div class="layui-col-md9">
        <table>
          <tr><td>Model</td><td>6201-2RS</td></tr>
          <tr><td>Bore Dia</td><td>12</td></tr>
          <tr><td>Outer Dia</td><td>32</td></tr>
          <tr><td>Width</td><td>10</td></tr>
          <tr><td>Inquiry</td><td>Send</td></tr>
        </table>
      </div>
    </div>
  </div>
</body></html>
"#;

fn root() -> Url {
    Url::parse("https://www.lily-bearing.com/").unwrap()
}

// -----------------------------------------------------------------------
// parse_category_page
// -----------------------------------------------------------------------

#[test]
fn category_page_reads_breadcrumb_levels() {
    let page = parse_category_page(CATEGORY_HTML).unwrap();
    assert_eq!(page.breadcrumbs.len(), 1);
    let path = &page.breadcrumbs[0];
    assert_eq!(path.depth(), 2);
    assert_eq!(path.levels()[0].name, "Ball Bearings");
    assert_eq!(path.levels()[1].name, "Deep Groove Ball Bearings");
}

#[test]
fn category_page_groups_products_by_genre() {
    let page = parse_category_page(CATEGORY_HTML).unwrap();
    let genres: Vec<&str> = page.groups.iter().map(|g| g.genre.as_str()).collect();
    assert_eq!(genres, vec!["Miniature Bearings", "Thin Section"]);

    assert_eq!(
        page.groups[0].products,
        vec![
            ProductAnchor {
                product_id: "681ZZ".to_owned(),
                href: "/product/681zz.html".to_owned(),
            },
            ProductAnchor {
                product_id: "682ZZ".to_owned(),
                href: "/product/682zz.html".to_owned(),
            },
        ]
    );
}

#[test]
fn category_page_keeps_anchor_without_href() {
    let page = parse_category_page(CATEGORY_HTML).unwrap();
    let thin = &page.groups[1];
    assert_eq!(thin.products.len(), 1);
    assert_eq!(thin.products[0].product_id, "6700");
    assert!(thin.products[0].href.is_empty());
}

#[test]
fn category_page_without_breadcrumb_is_parse_error() {
    let err = parse_category_page("<html><body><div class='boxT'></div></body></html>")
        .unwrap_err();
    assert!(matches!(err, ScraperError::Parse { .. }), "got: {err:?}");
}

#[test]
fn category_page_with_home_only_breadcrumb_is_parse_error() {
    let html = r#"<div class="nav-title"><span class="layui-breadcrumb"><a href="/">Home</a></span></div>"#;
    let err = parse_category_page(html).unwrap_err();
    assert!(matches!(err, ScraperError::Parse { .. }), "got: {err:?}");
}

// -----------------------------------------------------------------------
// parse_product_page
// -----------------------------------------------------------------------

#[test]
fn product_page_extracts_fields() {
    let page = parse_product_page(PRODUCT_HTML, &root()).unwrap();
    assert_eq!(page.product_id, "6201-2RS");
    assert_eq!(
        page.small_image_url,
        "https://www.lily-bearing.com/upload/6201-small.jpg"
    );
    assert_eq!(
        page.big_image_url,
        "https://www.lily-bearing.com/upload/6201-big.jpg?v=2"
    );
    assert_eq!(page.price, "12.50");
    assert_eq!(page.table.len(), 5);
    assert_eq!(page.table.derive_size(), "12×32×10");
}

#[test]
fn product_page_without_table_is_parse_error() {
    let html = PRODUCT_HTML.replace("<table>", "<section>").replace("</table>", "</section>");
    let err = parse_product_page(&html, &root()).unwrap_err();
    assert!(matches!(err, ScraperError::Parse { .. }), "got: {err:?}");
}

#[test]
fn product_page_without_cite_is_parse_error() {
    let html = PRODUCT_HTML.replace("<cite>6201-2RS</cite>", "");
    let err = parse_product_page(&html, &root()).unwrap_err();
    assert!(matches!(err, ScraperError::Parse { .. }), "got: {err:?}");
}

#[test]
fn product_page_without_price_is_negotiable() {
    let html = PRODUCT_HTML.replace("<span>$ 12.50</span>", "");
    let page = parse_product_page(&html, &root()).unwrap();
    assert_eq!(page.price, "Negotiable");
}

// -----------------------------------------------------------------------
// normalize_price
// -----------------------------------------------------------------------

#[test]
fn price_zero_is_negotiable() {
    assert_eq!(normalize_price("$ 0"), "Negotiable");
    assert_eq!(normalize_price("$ 0.00"), "Negotiable");
}

#[test]
fn price_number_keeps_digits() {
    assert_eq!(normalize_price("$ 12.50"), "12.50");
    assert_eq!(normalize_price("8"), "8");
}

#[test]
fn price_placeholder_is_negotiable() {
    assert_eq!(normalize_price("Inquiry"), "Negotiable");
    assert_eq!(normalize_price(""), "Negotiable");
    assert_eq!(normalize_price("$ 12.5.0"), "Negotiable");
}

#[test]
fn price_thousands_separators_are_dropped() {
    assert_eq!(normalize_price("$ 1,200.00"), "1200.00");
    assert_eq!(normalize_price("$ 12,345"), "12345");
}

// -----------------------------------------------------------------------
// resolve_site_url
// -----------------------------------------------------------------------

#[test]
fn resolve_site_url_handles_leading_slash() {
    assert_eq!(
        resolve_site_url(&root(), "/product/681zz.html").unwrap(),
        "https://www.lily-bearing.com/product/681zz.html"
    );
    assert_eq!(
        resolve_site_url(&root(), "product/681zz.html").unwrap(),
        "https://www.lily-bearing.com/product/681zz.html"
    );
}
