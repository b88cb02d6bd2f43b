//! 宽松字段解码 - 手工维护的 JSON 里字段类型经常不一致
//!
//! 文本字段接受字符串、数字、布尔或 null，其余类型一律视为空。
//! 二进制快照（非自描述格式）走严格的 `String` 解码，保证 bincode 可以往返。

use serde::de::{Deserializer, IgnoredAny};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    Other(IgnoredAny),
}

impl Loose {
    fn into_text(self) -> String {
        match self {
            Loose::Text(text) => text,
            Loose::Number(number) => number.to_string(),
            Loose::Flag(flag) => flag.to_string(),
            Loose::Other(_) => String::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseList {
    Items(Vec<Loose>),
    Other(IgnoredAny),
}

/// 把任意标量解码为字符串，null 和复合值得到空字符串
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    if !deserializer.is_human_readable() {
        return String::deserialize(deserializer);
    }

    Ok(Option::<Loose>::deserialize(deserializer)?
        .map(Loose::into_text)
        .unwrap_or_default())
}

/// 把数组解码为字符串列表，非数组得到空列表，空元素被丢弃
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    if !deserializer.is_human_readable() {
        return Vec::<String>::deserialize(deserializer);
    }

    let items = match Option::<LooseList>::deserialize(deserializer)? {
        Some(LooseList::Items(items)) => items
            .into_iter()
            .map(Loose::into_text)
            .filter(|item| !item.is_empty())
            .collect(),
        Some(LooseList::Other(_)) | None => Vec::new(),
    };

    Ok(items)
}
