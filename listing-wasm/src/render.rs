//! 列表卡片、分页控件和筛选选项的渲染

use url::form_urlencoded;

use site_common::{ItemId, Post, Product};

use crate::config::{ListingConfig, ListingKind};
use crate::filter::{FilterCriteria, Listable};
use crate::markup::{Element, Node};
use crate::pagination::{page_controls, PageControl};
use crate::query::ViewQuery;

/// 卡片渲染参数
#[derive(Debug, Clone, PartialEq)]
pub struct CardOptions {
    pub detail_page: String,
    pub excerpt_chars: usize,
    pub tag_limit: usize,
    pub currency: String,
}

impl From<&ListingConfig> for CardOptions {
    fn from(config: &ListingConfig) -> Self {
        Self {
            detail_page: config.detail_page.clone(),
            excerpt_chars: config.excerpt_chars,
            tag_limit: config.tag_limit,
            currency: config.currency.clone(),
        }
    }
}

impl CardOptions {
    /// 详情页链接，ID 经过 URL 编码
    pub fn detail_href(&self, id: &ItemId) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("id", id.as_str())
            .finish();
        format!("{}?{}", self.detail_page, query)
    }
}

/// 列表条目的展示面
pub trait Card: Listable {
    /// 列表页卡片
    fn card(&self, options: &CardOptions) -> Element;

    /// 首页精选区的精简卡片
    fn teaser(&self, options: &CardOptions) -> Element;
}

impl Card for Post {
    fn card(&self, options: &CardOptions) -> Element {
        let tags = self
            .tags
            .iter()
            .take(options.tag_limit)
            .map(|tag| Element::new("span").class("tag").text(tag.as_str()));

        let mut body = Element::new("div")
            .class("post-body")
            .child(Element::new("h3").class("post-title").text(self.title.as_str()));
        if !self.category.is_empty() {
            body = body.child(
                Element::new("p")
                    .class("post-category")
                    .text(self.category.as_str()),
            );
        }
        let body = body
            .child(Element::new("p").class("post-meta").text(self.meta_line()))
            .child(
                Element::new("p")
                    .class("post-excerpt")
                    .text(self.preview(options.excerpt_chars)),
            )
            .child(Element::new("div").class("post-tags").children(tags))
            .child(
                Element::new("div").class("read-more").child(
                    Element::new("span")
                        .class("btn-secondary")
                        .text("Read More"),
                ),
            );

        let link = Element::new("a")
            .class("post-link")
            .url_attr("href", &options.detail_href(&self.id))
            .attr("aria-label", self.title.as_str())
            .child(
                Element::new("div")
                    .class("post-image")
                    .child(image(&self.featured_image, &self.title)),
            )
            .child(body);

        Element::new("article").class("post-card").child(link)
    }

    fn teaser(&self, options: &CardOptions) -> Element {
        Element::new("article")
            .class("post-card")
            .child(image(&self.featured_image, &self.title))
            .child(Element::new("h3").text(self.title.as_str()))
            .child(Element::new("p").class("post-meta").text(self.meta_line()))
            .child(Element::new("p").text(self.preview(options.excerpt_chars)))
            .child(
                Element::new("a")
                    .class("button")
                    .url_attr("href", &options.detail_href(&self.id))
                    .text("Read More →"),
            )
    }
}

impl Card for Product {
    fn card(&self, options: &CardOptions) -> Element {
        let mut card = Element::new("article")
            .class("product-card")
            .child(image(self.image(), &self.name))
            .child(Element::new("h3").text(self.name.as_str()));
        if !self.category.is_empty() {
            card = card.child(
                Element::new("p")
                    .class("product-category")
                    .text(self.category.as_str()),
            );
        }
        card.child(Element::new("p").text(self.summary()))
            .children(price(self, &options.currency))
            .child(view_product_link(self, options))
    }

    fn teaser(&self, options: &CardOptions) -> Element {
        Element::new("div")
            .class("product-card")
            .child(image(self.image(), &self.name))
            .child(Element::new("h2").text(self.name.as_str()))
            .child(Element::new("p").text(self.summary()))
            .children(price(self, &options.currency))
            .child(view_product_link(self, options))
    }
}

fn image(src: &str, alt: &str) -> Element {
    Element::new("img")
        .url_attr("src", src)
        .attr("alt", alt)
        .attr("loading", "lazy")
}

fn view_product_link(product: &Product, options: &CardOptions) -> Element {
    Element::new("a")
        .class("button")
        .url_attr("href", &options.detail_href(&product.id))
        .text("View Product →")
}

/// 价格段落；没有价格时不输出
pub(crate) fn price(product: &Product, currency: &str) -> Option<Element> {
    price_label(&product.price, currency).map(|label| Element::new("p").class("price").text(label))
}

/// `<货币> <价格>`，价格为空时返回 None
pub fn price_label(price: &str, currency: &str) -> Option<String> {
    let price = price.trim();
    if price.is_empty() {
        return None;
    }
    if currency.is_empty() {
        Some(price.to_string())
    } else {
        Some(format!("{currency} {price}"))
    }
}

/// 行内提示，例如加载失败
pub fn message(text: &str) -> Node {
    Element::new("p").class("muted").text(text).into()
}

/// 渲染当前页卡片，结果为空时输出提示
pub fn render_list<T: Card>(items: &[&T], options: &CardOptions, kind: ListingKind) -> Node {
    if items.is_empty() {
        return message(kind.empty_message());
    }
    Node::Fragment(items.iter().map(|item| Node::from(item.card(options))).collect())
}

/// 首页精选区
pub fn render_featured<T: Card>(items: &[T], limit: usize, options: &CardOptions) -> Node {
    Node::Fragment(
        items
            .iter()
            .take(limit)
            .map(|item| Node::from(item.teaser(options)))
            .collect(),
    )
}

/// 渲染分页控件；只有一页时输出空片段
///
/// 每个页码都是真实链接（保留 `search` 里的其他参数），
/// 同时带 `data-page` 供页面脚本拦截。
pub fn render_pagination(
    criteria: &FilterCriteria,
    current: usize,
    total: usize,
    max_links: Option<usize>,
    path: &str,
    search: &str,
) -> Node {
    let controls = page_controls(current, total, max_links);
    if controls.is_empty() {
        return Node::Fragment(Vec::new());
    }

    let link = |page: usize, label: String, active: bool| -> Element {
        let query = ViewQuery::new(criteria.clone(), page).merge_into(search);
        let class = if active {
            "pagination-link pagination-active"
        } else {
            "pagination-link"
        };
        let mut anchor = Element::new("a")
            .class(class)
            .url_attr("href", &format!("{path}?{query}"))
            .attr("data-page", page.to_string());
        if active {
            anchor = anchor.attr("aria-current", "page");
        }
        anchor.text(label)
    };
    let disabled = |label: &str| Element::new("span").class("pagination-disabled").text(label);

    let items = controls.into_iter().map(|control| {
        let inner = match control {
            PageControl::Previous(Some(page)) => link(page, "Prev".to_string(), false),
            PageControl::Previous(None) => disabled("Prev"),
            PageControl::Number { page, current } => link(page, page.to_string(), current),
            PageControl::Next(Some(page)) => link(page, "Next".to_string(), false),
            PageControl::Next(None) => disabled("Next"),
        };
        Element::new("li").child(inner)
    });

    Element::new("ul").class("pagination-list").children(items).into()
}

/// 下拉框选项：首项为 "All …"（值为空），其后每个已知值一项
pub fn filter_options(all_label: &str, values: &[String], selected: Option<&str>) -> Node {
    let all = Element::new("option").attr("value", "").text(all_label);
    let all = if selected.is_none() {
        all.attr("selected", "selected")
    } else {
        all
    };

    let options = values.iter().map(|value| {
        let option = Element::new("option")
            .attr("value", value.as_str())
            .text(value.as_str());
        if selected == Some(value.as_str()) {
            option.attr("selected", "selected")
        } else {
            option
        }
    });

    Node::Fragment(std::iter::once(all).chain(options).map(Node::from).collect())
}
