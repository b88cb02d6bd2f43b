//! 最小的 HTML 构建器
//!
//! 所有文本和属性值在输出时统一转义，数据字段无法注入标签或属性。
//! 只有 `Node::Raw` 原样输出，调用方负责先清洗内容。

/// 不允许有子节点、也不输出结束标签的元素
const VOID_ELEMENTS: [&str; 6] = ["img", "br", "hr", "input", "meta", "link"];

/// 允许出现在 href/src 中的协议
const SAFE_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// 已清洗过的 HTML 片段
    Raw(String),
    Fragment(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    /// 写入 URL 属性，不安全的协议会被替换为 `#`
    pub fn url_attr(self, name: &'static str, url: &str) -> Self {
        self.attr(name, safe_url(url))
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag) {
            return;
        }

        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_to(out),
            Node::Text(text) => out.push_str(&escape_html(text)),
            Node::Raw(html) => out.push_str(html),
            Node::Fragment(nodes) => nodes.iter().for_each(|node| node.write_to(out)),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

/// 转义 HTML 特殊字符 `& < > " '`
///
/// 文本节点和属性值都经过这里，且属性值总是带双引号输出。
/// `ammonia::clean_text` 面向无引号属性，连空格、`/`、`=` 也转义，
/// 生成的卡片和链接会膨胀成一串实体，所以这里只处理五个标记字符。
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// 过滤链接协议：只放行 http/https/mailto 和相对地址，其余返回 `#`
pub fn safe_url(url: &str) -> String {
    let trimmed = url.trim();
    match scheme(trimmed) {
        None => trimmed.to_string(),
        Some(scheme) if SAFE_SCHEMES.iter().any(|safe| scheme.eq_ignore_ascii_case(safe)) => {
            trimmed.to_string()
        }
        Some(_) => "#".to_string(),
    }
}

/// 提取 URL 协议；`/`、`?`、`#` 之前没有冒号时视为相对地址
fn scheme(url: &str) -> Option<&str> {
    let end = url.find(|c: char| matches!(c, ':' | '/' | '?' | '#'))?;
    if url[end..].starts_with(':') {
        Some(&url[..end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let html = Element::new("a")
            .attr("title", "\" onmouseover=\"x")
            .text("<b>bold</b>")
            .to_html();
        assert_eq!(
            html,
            "<a title=\"&quot; onmouseover=&quot;x\">&lt;b&gt;bold&lt;/b&gt;</a>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let html = Element::new("img").attr("src", "a.png").attr("alt", "").to_html();
        assert_eq!(html, "<img src=\"a.png\" alt=\"\">");
    }

    #[test]
    fn raw_nodes_are_written_verbatim() {
        let html = Element::new("div")
            .child(Node::Raw("<p>ok</p>".into()))
            .child(Node::Fragment(vec!["a".into(), Element::new("br").into()]))
            .to_html();
        assert_eq!(html, "<div><p>ok</p>a<br></div>");
    }

    #[test]
    fn unsafe_schemes_become_hash() {
        assert_eq!(safe_url("javascript:alert(1)"), "#");
        assert_eq!(safe_url(" JavaScript:alert(1)"), "#");
        assert_eq!(safe_url("data:text/html,x"), "#");
        assert_eq!(safe_url("https://example.com/a?b=c"), "https://example.com/a?b=c");
        assert_eq!(safe_url("mailto:hi@example.com"), "mailto:hi@example.com");
        assert_eq!(safe_url("post.html?id=3"), "post.html?id=3");
        assert_eq!(safe_url("images/a:b.png"), "images/a:b.png");
        assert_eq!(safe_url(""), "");
    }
}
