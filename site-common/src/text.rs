use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static NON_SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("slug pattern is valid"));

/// 由标题生成短名：小写、空白替换为 `-`、去掉其余符号
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let dashed = WHITESPACE.replace_all(&lowered, "-");
    NON_SLUG.replace_all(&dashed, "").into_owned()
}

/// 提取 HTML 的可见文本并折叠空白，实体按浏览器规则解码
///
/// 脚本、样式、模板和注释不计入文本。
pub fn html_text(html: &str) -> String {
    let parsed = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes());

    // 从内存切片读取不会产生 IO 错误
    let Ok(dom) = parsed else {
        return String::new();
    };

    let mut text = String::new();
    extract_text(&dom.document, &mut text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// 递归收集文本节点
fn extract_text(handle: &Handle, text: &mut String) {
    match handle.data {
        NodeData::Text { ref contents } => {
            text.push_str(&contents.borrow());
            text.push(' ');
        }
        NodeData::Element { ref name, .. }
            if matches!(&*name.local, "script" | "style" | "template") => {}
        _ => {
            for child in handle.children.borrow().iter() {
                extract_text(child, text);
            }
        }
    }
}

/// 按字符数截断，保证落在字符边界上
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// 去重并保持首次出现的顺序，忽略空值
pub fn unique_in_order<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = Vec::new();
    for value in values {
        if !value.is_empty() && !seen.iter().any(|known: &String| known == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
