//! DOM 与控制台的薄封装

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{console, Document, Element, HtmlElement, Window};

use crate::error::{ListingError, Result};
use crate::markup::Node;

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| ListingError::Dom("没有 window 对象".to_string()))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| ListingError::Dom("没有 document 对象".to_string()))
}

/// 按 ID 取必需元素
pub fn element(document: &Document, id: &str) -> Result<Element> {
    optional_element(document, id).ok_or_else(|| ListingError::MissingElement(id.to_string()))
}

/// 按 ID 取可选元素，空 ID 视为不存在
pub fn optional_element(document: &Document, id: &str) -> Option<Element> {
    if id.is_empty() {
        return None;
    }
    document.get_element_by_id(id)
}

pub fn set_html(element: &Element, node: &Node) {
    element.set_inner_html(&node.to_html());
}

pub fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(element) = optional_element(document, id) {
        element.set_text_content(Some(text));
    }
}

pub fn set_display(element: &Element, visible: bool) -> Result<()> {
    let element: &HtmlElement = element
        .dyn_ref()
        .ok_or_else(|| ListingError::Dom("元素不是 HtmlElement".to_string()))?;
    element
        .style()
        .set_property("display", if visible { "block" } else { "none" })?;
    Ok(())
}

/// 当前页面的路径、查询串和完整地址
pub struct PageLocation {
    pub pathname: String,
    pub search: String,
    pub href: String,
}

pub fn location() -> Result<PageLocation> {
    let location = window()?.location();
    Ok(PageLocation {
        pathname: location.pathname()?,
        search: location.search()?,
        href: location.href()?,
    })
}

pub fn log(message: &str) {
    console::log_1(&JsValue::from_str(message));
}

pub fn warn(message: &str) {
    console::warn_1(&JsValue::from_str(message));
}

pub fn error(message: &str) {
    console::error_1(&JsValue::from_str(message));
}
