use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::compression::{from_compressed, to_compressed};
use crate::de;
use crate::error;
use crate::text::{html_text, slugify, truncate_chars};

/// 条目标识符 - JSON 中的数字和字符串 ID 统一按字符串比较
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        de::text(deserializer).map(ItemId)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// 博客文章
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Post {
    /// 文章唯一标识符
    #[serde(default)]
    pub id: ItemId,
    /// URL 友好的短名，缺失时由标题生成
    #[serde(default, deserialize_with = "de::text")]
    pub slug: String,
    #[serde(default, deserialize_with = "de::text")]
    pub title: String,
    /// 单值分类
    #[serde(default, deserialize_with = "de::text")]
    pub category: String,
    #[serde(default, deserialize_with = "de::text_list")]
    pub tags: Vec<String>,
    /// 作者提供的摘要
    #[serde(default, deserialize_with = "de::text")]
    pub excerpt: String,
    /// 正文 HTML
    #[serde(default, deserialize_with = "de::text")]
    pub content: String,
    #[serde(default, deserialize_with = "de::text")]
    pub featured_image: String,
    #[serde(default, deserialize_with = "de::text")]
    pub author: String,
    #[serde(default, deserialize_with = "de::text")]
    pub date: String,
    #[serde(default, deserialize_with = "de::text")]
    pub read_time: String,
}

impl Post {
    /// 补全派生字段
    pub fn normalize(&mut self) {
        if self.slug.is_empty() {
            self.slug = slugify(&self.title);
        }
        if self.slug.is_empty() {
            self.slug = format!("post-{}", self.id);
        }
    }

    /// 列表卡片用的摘要：优先作者摘要，否则截取正文纯文本
    pub fn preview(&self, max_chars: usize) -> String {
        if !self.excerpt.is_empty() {
            return self.excerpt.clone();
        }

        let plain = html_text(&self.content);
        format!("{}...", truncate_chars(&plain, max_chars))
    }

    /// 作者 • 日期 • 阅读时长，空字段省略
    pub fn meta_line(&self) -> String {
        [&self.author, &self.date, &self.read_time]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

/// 产品
///
/// 两套字段命名（`image_url`/`image`，`short_desc`/`description`）都保留，
/// 展示时按回退顺序取值。
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Product {
    #[serde(default)]
    pub id: ItemId,
    #[serde(default, deserialize_with = "de::text")]
    pub name: String,
    #[serde(default, deserialize_with = "de::text")]
    pub category: String,
    #[serde(default, deserialize_with = "de::text")]
    pub subcategory: String,
    #[serde(default, deserialize_with = "de::text")]
    pub short_desc: String,
    #[serde(default, deserialize_with = "de::text")]
    pub description: String,
    #[serde(default, deserialize_with = "de::text")]
    pub long_desc: String,
    #[serde(default, deserialize_with = "de::text")]
    pub image_url: String,
    #[serde(default, deserialize_with = "de::text")]
    pub image: String,
    /// 价格原样保存，数字会被转成不带多余小数的文本
    #[serde(default, deserialize_with = "de::text")]
    pub price: String,
    #[serde(default, deserialize_with = "de::text")]
    pub gumroad_link: String,
}

impl Product {
    pub fn image(&self) -> &str {
        first_non_empty(&self.image_url, &self.image)
    }

    /// 卡片简介
    pub fn summary(&self) -> &str {
        first_non_empty(&self.short_desc, &self.description)
    }

    /// 详情页长描述
    pub fn details(&self) -> &str {
        first_non_empty(&self.long_desc, &self.description)
    }
}

fn first_non_empty<'a>(primary: &'a str, fallback: &'a str) -> &'a str {
    if primary.is_empty() {
        fallback
    } else {
        primary
    }
}

/// 目录快照 - 规范化后的文章与产品集合
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    pub meta: CatalogMetadata,
    pub posts: Vec<Post>,
    pub post_categories: Vec<String>,
    pub post_tags: Vec<String>,
    pub products: Vec<Product>,
    pub product_categories: Vec<String>,
}

/// 快照格式版本
pub const SNAPSHOT_VERSION: [u8; 2] = [1, 0];

impl Catalog {
    /// 编码为压缩快照
    pub fn to_snapshot(&self) -> error::Result<Vec<u8>> {
        Ok(to_compressed(self, SNAPSHOT_VERSION)?)
    }

    /// 从压缩快照恢复
    pub fn from_snapshot(data: &[u8]) -> error::Result<Self> {
        Ok(from_compressed(data, SNAPSHOT_VERSION[0])?)
    }
}

/// 快照元数据
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CatalogMetadata {
    pub post_count: usize,
    pub product_count: usize,
    /// 快照生成时间
    pub created_at: DateTime<Utc>,
    /// 生成快照的工具版本
    pub version: String,
}
