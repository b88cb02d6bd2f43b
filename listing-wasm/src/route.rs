use crate::config::ListingKind;

/// 站点页面类型，由当前文件名决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Listing(ListingKind),
    Detail(ListingKind),
    /// 只加载站点公共交互
    Other,
}

impl Page {
    /// 按文件名（或完整路径）匹配页面
    pub fn from_path(path: &str) -> Self {
        let file = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .rsplit('/')
            .next()
            .unwrap_or_default();

        match file {
            "" | "index.html" => Page::Home,
            "blog.html" | "posts.html" => Page::Listing(ListingKind::Posts),
            "post.html" => Page::Detail(ListingKind::Posts),
            "products.html" => Page::Listing(ListingKind::Products),
            "product.html" => Page::Detail(ListingKind::Products),
            _ => Page::Other,
        }
    }
}

/// 路径中的文件名，用于导航高亮
pub fn file_name(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or_default();
    if file.is_empty() {
        "index.html"
    } else {
        file
    }
}
