//! 浏览器侧胶水代码
//!
//! 纯逻辑都在上层模块里，这里只负责读写 DOM、绑定事件和加载文档。

pub mod chrome;
pub mod controller;
pub mod detail;
pub mod dom;
pub mod loader;

use wasm_bindgen::prelude::*;

use site_common::{parse_posts, parse_products};

use crate::config::{ListingConfig, ListingKind, SiteConfig};
use crate::error::Result;
use crate::render::{render_featured, CardOptions};
use crate::route::{file_name, Page};

pub use controller::ListingController;

/// 页面入口：按文件名分派到首页、列表页或详情页，并安装公共交互
#[wasm_bindgen]
pub fn boot(options: JsValue) -> std::result::Result<(), JsValue> {
    let config: SiteConfig = if options.is_undefined() || options.is_null() {
        SiteConfig::default()
    } else {
        serde_wasm_bindgen::from_value(options)?
    };
    Ok(boot_with(config)?)
}

fn boot_with(config: SiteConfig) -> Result<()> {
    let document = dom::document()?;
    let location = dom::location()?;
    let path = config.page.clone().unwrap_or(location.pathname);
    let page = Page::from_path(&path);
    dom::log(&format!("页面启动: {} -> {:?}", path, page));

    chrome::install(&document, file_name(&path), config.testimonial_interval_ms);

    match page {
        Page::Home => load_home(&config),
        Page::Listing(kind) => controller::load(config.listing(kind)),
        Page::Detail(kind) => detail::load(config.listing(kind)),
        Page::Other => Ok(()),
    }
}

/// 首页精选区；两个文档各自加载，一个失败不影响另一个
fn load_home(config: &SiteConfig) -> Result<()> {
    load_featured(
        config.listing(ListingKind::Products),
        config.home_products_id.clone(),
        config.featured_products,
    )?;
    load_featured(
        config.listing(ListingKind::Posts),
        config.home_posts_id.clone(),
        config.featured_posts,
    )
}

fn load_featured(listing: ListingConfig, root_id: String, limit: usize) -> Result<()> {
    let url = listing.document_url.clone();
    loader::fetch_text(&url, move |result| {
        let rendered = result.and_then(|json| {
            let document = dom::document()?;
            let Some(root) = dom::optional_element(&document, &root_id) else {
                return Ok(());
            };
            let options = CardOptions::from(&listing);
            let featured = match listing.kind {
                ListingKind::Posts => render_featured(&parse_posts(&json)?.posts, limit, &options),
                ListingKind::Products => {
                    render_featured(&parse_products(&json)?.products, limit, &options)
                }
            };
            dom::set_html(&root, &featured);
            Ok(())
        });

        if let Err(error) = rendered {
            dom::warn(&format!("首页精选加载失败 ({}): {}", listing.document_url, error));
        }
    })
}
