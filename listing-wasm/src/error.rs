use site_common::CatalogError;
use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, ListingError>;

/// 列表控制器错误
#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// 页面上缺少必需的元素
    #[error("页面缺少元素 #{0}")]
    MissingElement(String),

    /// 浏览器 API 调用失败
    #[error("DOM 操作失败: {0}")]
    Dom(String),

    #[error("配置无效: {0}")]
    Config(String),

    /// 构建快照时没有任何条目
    #[error("无法构建目录: 没有文章或产品数据")]
    EmptyCatalog,

    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ListingError> for JsValue {
    fn from(error: ListingError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

impl From<JsValue> for ListingError {
    fn from(value: JsValue) -> Self {
        ListingError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<serde_wasm_bindgen::Error> for ListingError {
    fn from(error: serde_wasm_bindgen::Error) -> Self {
        ListingError::Config(error.to_string())
    }
}
