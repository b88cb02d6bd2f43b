//! 单条目详情页

use url::form_urlencoded;

use site_common::{Post, Product};

use crate::config::ListingKind;
use crate::markup::{Element, Node};
use crate::render::price;

/// 按 ID 查找文章，找不到时再按 slug 查找
pub fn find_post<'a>(posts: &'a [Post], id: Option<&str>, slug: Option<&str>) -> Option<&'a Post> {
    let by_id = id.and_then(|id| posts.iter().find(|post| post.id.as_str() == id));
    by_id.or_else(|| slug.and_then(|slug| posts.iter().find(|post| post.slug == slug)))
}

pub fn find_product<'a>(products: &'a [Product], id: Option<&str>) -> Option<&'a Product> {
    let id = id?;
    products.iter().find(|product| product.id.as_str() == id)
}

/// 文章正文：横幅图 + 清洗后的 HTML
pub fn post_detail(post: &Post) -> Node {
    let banner = Element::new("img")
        .class("post-banner")
        .url_attr("src", &post.featured_image)
        .attr("alt", post.title.as_str());
    let content = Element::new("div")
        .class("content")
        .child(Node::Raw(ammonia::clean(&post.content)));

    Node::Fragment(vec![banner.into(), content.into()])
}

pub fn product_detail(product: &Product, currency: &str) -> Node {
    let mut actions = Element::new("div").class("product-actions");
    if !product.gumroad_link.is_empty() {
        actions = actions.child(
            Element::new("a")
                .class("button")
                .url_attr("href", &product.gumroad_link)
                .attr("target", "_blank")
                .attr("rel", "noopener")
                .text("Buy on Gumroad"),
        );
    }
    let actions = actions.child(
        Element::new("a")
            .class("back-btn")
            .attr("href", "products.html")
            .text("← Back to products"),
    );

    let nodes: Vec<Node> = vec![
        Element::new("img")
            .class("product-banner")
            .url_attr("src", product.image())
            .attr("alt", product.name.as_str())
            .into(),
        Element::new("h1").text(product.name.as_str()).into(),
    ];
    Node::Fragment(
        nodes
            .into_iter()
            .chain(price(product, currency).map(Node::from))
            .chain([
                Node::from(Element::new("p").text(product.details())),
                Node::from(actions),
            ])
            .collect(),
    )
}

/// 分享链接，`page_url` 为当前页面地址
pub fn share_links(page_url: &str, title: &str) -> Node {
    let encode = |pairs: &[(&str, &str)]| {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    };
    let text = format!("{title} {page_url}");

    let targets = [
        (
            "Facebook",
            format!("https://www.facebook.com/sharer/sharer.php?{}", encode(&[("u", page_url)])),
        ),
        (
            "Twitter",
            format!(
                "https://twitter.com/intent/tweet?{}",
                encode(&[("text", title), ("url", page_url)])
            ),
        ),
        (
            "LinkedIn",
            format!(
                "https://www.linkedin.com/sharing/share-offsite/?{}",
                encode(&[("url", page_url)])
            ),
        ),
        (
            "WhatsApp",
            format!("https://api.whatsapp.com/send?{}", encode(&[("text", text.as_str())])),
        ),
    ];

    Node::Fragment(
        targets
            .into_iter()
            .map(|(label, href)| {
                Node::from(
                    Element::new("a")
                        .class("button")
                        .url_attr("href", &href)
                        .attr("target", "_blank")
                        .attr("rel", "noopener")
                        .text(label),
                )
            })
            .collect(),
    )
}

/// 找不到条目时的标题
pub fn not_found(kind: ListingKind) -> Node {
    Element::new("h2").text(kind.not_found_message()).into()
}
