use wasm_bindgen::prelude::*;

// 导出模块
pub mod builder;
pub mod config;
pub mod detail;
pub mod error;
pub mod filter;
pub mod markup;
pub mod pagination;
pub mod query;
pub mod render;
pub mod route;
pub mod view;
pub mod web;

pub use builder::CatalogBuilder;
pub use config::{ListingConfig, ListingKind, ListingOverrides, SiteConfig};
pub use error::{ListingError, Result};
pub use filter::{apply_filters, FilterCriteria, Listable};
pub use pagination::{paginate, total_pages};
pub use query::ViewQuery;
pub use view::{Listing, ListingView, ViewState};
pub use web::{boot, ListingController};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
