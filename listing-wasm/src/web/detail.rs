//! 详情页挂载

use site_common::{parse_posts, parse_products};

use super::{dom, loader};
use crate::config::{ListingConfig, ListingKind};
use crate::detail::{find_post, find_product, not_found, post_detail, product_detail, share_links};
use crate::error::Result;
use crate::query::param;
use crate::render::message;

const POST_ROOT_ID: &str = "post";
const POST_TITLE_ID: &str = "post-title";
const POST_META_ID: &str = "post-meta";
const SHARE_ID: &str = "share-buttons";
const PRODUCT_ROOT_ID: &str = "product";

/// 加载文档并渲染 `?id=`（文章也接受 `?post=<slug>`）指定的条目
pub fn load(config: ListingConfig) -> Result<()> {
    let kind = config.kind;
    let url = config.document_url.clone();

    loader::fetch_text(&url, move |result| {
        let rendered = result.and_then(|json| match kind {
            ListingKind::Posts => render_post(&json),
            ListingKind::Products => render_product(&json, &config.currency),
        });

        if let Err(error) = rendered {
            dom::error(&format!("详情加载失败: {}", error));
            if let Ok(document) = dom::document() {
                if let Some(root) = dom::optional_element(&document, root_id(kind)) {
                    dom::set_html(&root, &message(kind.load_error_message()));
                }
            }
        }
    })
}

fn root_id(kind: ListingKind) -> &'static str {
    match kind {
        ListingKind::Posts => POST_ROOT_ID,
        ListingKind::Products => PRODUCT_ROOT_ID,
    }
}

fn render_post(json: &str) -> Result<()> {
    let document = dom::document()?;
    let location = dom::location()?;
    let collection = parse_posts(json)?;

    let id = param(&location.search, "id");
    let slug = param(&location.search, "post");
    let root = dom::optional_element(&document, POST_ROOT_ID);

    let Some(post) = find_post(&collection.posts, id.as_deref(), slug.as_deref()) else {
        if let Some(root) = root {
            dom::set_html(&root, &not_found(ListingKind::Posts));
        }
        return Ok(());
    };

    document.set_title(&post.title);
    dom::set_text(&document, POST_TITLE_ID, &post.title);
    dom::set_text(&document, POST_META_ID, &post.meta_line());
    if let Some(root) = root {
        dom::set_html(&root, &post_detail(post));
    }
    if let Some(share) = dom::optional_element(&document, SHARE_ID) {
        dom::set_html(&share, &share_links(&location.href, &post.title));
    }
    Ok(())
}

fn render_product(json: &str, currency: &str) -> Result<()> {
    let document = dom::document()?;
    let location = dom::location()?;
    let collection = parse_products(json)?;
    let Some(root) = dom::optional_element(&document, PRODUCT_ROOT_ID) else {
        return Ok(());
    };

    let id = param(&location.search, "id");
    match find_product(&collection.products, id.as_deref()) {
        Some(product) => {
            document.set_title(&product.name);
            dom::set_html(&root, &product_detail(product, currency));
        }
        None => dom::set_html(&root, &not_found(ListingKind::Products)),
    }
    Ok(())
}
