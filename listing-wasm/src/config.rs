use serde::{Deserialize, Serialize};

use crate::pagination::DEFAULT_PAGE_SIZE;

/// 列表类型
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Posts,
    Products,
}

impl ListingKind {
    /// 筛选后为空时的提示
    pub fn empty_message(self) -> &'static str {
        match self {
            ListingKind::Posts => "No posts found matching your criteria.",
            ListingKind::Products => "No products found matching your criteria.",
        }
    }

    /// 文档加载失败时的提示
    pub fn load_error_message(self) -> &'static str {
        match self {
            ListingKind::Posts => "Sorry, unable to load blog posts right now.",
            ListingKind::Products => "Sorry, unable to load products right now.",
        }
    }

    pub fn not_found_message(self) -> &'static str {
        match self {
            ListingKind::Posts => "Post not found",
            ListingKind::Products => "Product not found",
        }
    }

    pub fn all_categories_label(self) -> &'static str {
        "All Categories"
    }

    pub fn all_tags_label(self) -> &'static str {
        "All Tags"
    }
}

/// 单个列表页的配置
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingConfig {
    pub kind: ListingKind,
    /// 数据文档地址
    pub document_url: String,
    pub page_size: usize,
    /// 搜索框防抖时间（毫秒）
    pub search_debounce_ms: i32,
    /// 页码按钮数量上限，None 表示全部显示
    pub max_page_links: Option<usize>,
    /// 卡片链接指向的详情页
    pub detail_page: String,
    pub currency: String,
    /// 自动摘要的最大字符数
    pub excerpt_chars: usize,
    /// 卡片上最多显示的标签数
    pub tag_limit: usize,
    pub container_id: String,
    pub pagination_id: String,
    pub search_input_id: String,
    pub category_select_id: String,
    /// 空字符串表示页面没有标签筛选
    pub tag_select_id: String,
}

impl ListingConfig {
    pub fn posts() -> Self {
        Self {
            kind: ListingKind::Posts,
            document_url: "json/posts.json".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: 300,
            max_page_links: None,
            detail_page: "post.html".to_string(),
            currency: "Ksh".to_string(),
            excerpt_chars: 160,
            tag_limit: 5,
            container_id: "posts-container".to_string(),
            pagination_id: "pagination".to_string(),
            search_input_id: "search-input".to_string(),
            category_select_id: "category-filter".to_string(),
            tag_select_id: "tag-filter".to_string(),
        }
    }

    pub fn products() -> Self {
        Self {
            kind: ListingKind::Products,
            document_url: "json/products.json".to_string(),
            detail_page: "product.html".to_string(),
            container_id: "products-container".to_string(),
            pagination_id: "product-pagination".to_string(),
            search_input_id: "product-search".to_string(),
            category_select_id: "product-category".to_string(),
            tag_select_id: String::new(),
            ..Self::posts()
        }
    }

    pub fn for_kind(kind: ListingKind) -> Self {
        match kind {
            ListingKind::Posts => Self::posts(),
            ListingKind::Products => Self::products(),
        }
    }
}

/// 由页面脚本传入的覆盖项，未给出的字段沿用预设
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingOverrides {
    pub document_url: Option<String>,
    pub page_size: Option<usize>,
    pub search_debounce_ms: Option<i32>,
    pub max_page_links: Option<usize>,
    pub detail_page: Option<String>,
    pub currency: Option<String>,
    pub excerpt_chars: Option<usize>,
    pub tag_limit: Option<usize>,
    pub container_id: Option<String>,
    pub pagination_id: Option<String>,
    pub search_input_id: Option<String>,
    pub category_select_id: Option<String>,
    pub tag_select_id: Option<String>,
}

impl ListingOverrides {
    pub fn apply(self, mut base: ListingConfig) -> ListingConfig {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field {
                    base.$field = value;
                })*
            };
        }

        merge!(
            document_url,
            page_size,
            search_debounce_ms,
            detail_page,
            currency,
            excerpt_chars,
            tag_limit,
            container_id,
            pagination_id,
            search_input_id,
            category_select_id,
            tag_select_id,
        );
        if self.max_page_links.is_some() {
            base.max_page_links = self.max_page_links;
        }
        base.page_size = base.page_size.max(1);
        base
    }
}

/// 整站启动配置
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// 强制指定页面，缺省时按当前文件名判断
    pub page: Option<String>,
    pub posts: ListingOverrides,
    pub products: ListingOverrides,
    /// 首页展示的文章数
    pub featured_posts: usize,
    /// 首页展示的产品数
    pub featured_products: usize,
    /// 推荐语轮播间隔（毫秒）
    pub testimonial_interval_ms: i32,
    pub home_posts_id: String,
    pub home_products_id: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            page: None,
            posts: ListingOverrides::default(),
            products: ListingOverrides::default(),
            featured_posts: 3,
            featured_products: 4,
            testimonial_interval_ms: 4500,
            home_posts_id: "home-posts".to_string(),
            home_products_id: "home-products".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn listing(&self, kind: ListingKind) -> ListingConfig {
        let overrides = match kind {
            ListingKind::Posts => self.posts.clone(),
            ListingKind::Products => self.products.clone(),
        };
        overrides.apply(ListingConfig::for_kind(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_share_listing_defaults() {
        let posts = ListingConfig::posts();
        let products = ListingConfig::products();
        assert_eq!(posts.page_size, 6);
        assert_eq!(products.page_size, 6);
        assert_eq!(products.search_debounce_ms, 300);
        assert_eq!(products.currency, "Ksh");
        assert!(products.tag_select_id.is_empty());
        assert_eq!(posts.tag_select_id, "tag-filter");
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let overrides: ListingOverrides = serde_json::from_str(
            r#"{"pageSize": 9, "currency": "USD", "maxPageLinks": 7, "containerId": "grid"}"#,
        )
        .unwrap();
        let config = overrides.apply(ListingConfig::products());
        assert_eq!(config.page_size, 9);
        assert_eq!(config.currency, "USD");
        assert_eq!(config.max_page_links, Some(7));
        assert_eq!(config.container_id, "grid");
        assert_eq!(config.detail_page, "product.html");
    }

    #[test]
    fn zero_page_size_is_raised_to_one() {
        let overrides = ListingOverrides {
            page_size: Some(0),
            ..ListingOverrides::default()
        };
        assert_eq!(overrides.apply(ListingConfig::posts()).page_size, 1);
    }

    #[test]
    fn site_config_defaults_and_nested_overrides() {
        let config: SiteConfig =
            serde_json::from_str(r#"{"page": "blog.html", "posts": {"pageSize": 4}}"#).unwrap();
        assert_eq!(config.page.as_deref(), Some("blog.html"));
        assert_eq!(config.featured_products, 4);
        assert_eq!(config.testimonial_interval_ms, 4500);
        assert_eq!(config.listing(ListingKind::Posts).page_size, 4);
        assert_eq!(config.listing(ListingKind::Products).page_size, 6);
    }
}
