//! 静态 JSON 文档解析
//!
//! 文章文档: `{ posts: [...], categories: [...], tags: [...] }`
//!
//! 产品文档有两种形态:
//! - 扁平: `{ products: [...] }`
//! - 嵌套: `{ categories: [{ name, subcategories: [{ name, products: [...] }] }] }`
//!
//! 嵌套形态会被展开成扁平列表，每个产品带上所属分类和子分类。
//! 单个条目格式错误只会被跳过并计数，不会让整个文档失败。

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::de;
use crate::error::Result;
use crate::models::{Post, Product};
use crate::text::unique_in_order;

/// 文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Posts,
    Products,
}

impl DocumentKind {
    /// 根据顶层结构判断文档类型
    pub fn detect(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        if object.get("posts").map_or(false, Value::is_array) {
            return Some(DocumentKind::Posts);
        }
        if object.get("products").map_or(false, Value::is_array) || is_nested_catalog(object) {
            return Some(DocumentKind::Products);
        }
        None
    }
}

/// 解析后的文章集合
#[derive(Debug, Clone, Default)]
pub struct PostCollection {
    pub posts: Vec<Post>,
    /// 文档给出的分类，缺失时按文章首次出现顺序推导
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    /// 因格式错误被跳过的条目数
    pub skipped: usize,
}

/// 解析后的产品集合
#[derive(Debug, Clone, Default)]
pub struct ProductCollection {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
    pub skipped: usize,
}

#[derive(Deserialize)]
struct CategoryGroup {
    #[serde(default, deserialize_with = "de::text")]
    name: String,
    #[serde(default)]
    subcategories: Vec<SubcategoryGroup>,
}

#[derive(Deserialize)]
struct SubcategoryGroup {
    #[serde(default, deserialize_with = "de::text")]
    name: String,
    #[serde(default)]
    products: Vec<Value>,
}

/// 解析文章文档
pub fn parse_posts(json: &str) -> Result<PostCollection> {
    let value: Value = serde_json::from_str(json)?;
    Ok(PostCollection::from_value(value))
}

/// 解析产品文档（两种形态均可）
pub fn parse_products(json: &str) -> Result<ProductCollection> {
    let value: Value = serde_json::from_str(json)?;
    Ok(ProductCollection::from_value(value))
}

impl PostCollection {
    pub fn from_value(value: Value) -> Self {
        let mut collection = PostCollection::default();
        let Value::Object(mut object) = value else {
            return collection;
        };

        if let Some(Value::Array(entries)) = object.remove("posts") {
            for entry in entries {
                match decode_entry::<Post>(entry) {
                    Some(mut post) => {
                        post.normalize();
                        collection.posts.push(post);
                    }
                    None => collection.skipped += 1,
                }
            }
        }

        collection.categories = string_list(object.remove("categories"));
        if collection.categories.is_empty() {
            collection.categories =
                unique_in_order(collection.posts.iter().map(|post| post.category.as_str()));
        }

        collection.tags = string_list(object.remove("tags"));
        if collection.tags.is_empty() {
            collection.tags = unique_in_order(
                collection
                    .posts
                    .iter()
                    .flat_map(|post| post.tags.iter().map(String::as_str)),
            );
        }

        collection
    }
}

impl ProductCollection {
    pub fn from_value(value: Value) -> Self {
        let mut collection = ProductCollection::default();
        let Value::Object(mut object) = value else {
            return collection;
        };

        if is_nested_catalog(&object) {
            if let Some(Value::Array(groups)) = object.remove("categories") {
                for group in groups {
                    let Ok(group) = serde_json::from_value::<CategoryGroup>(group) else {
                        collection.skipped += 1;
                        continue;
                    };
                    for subcategory in group.subcategories {
                        for entry in subcategory.products {
                            collection.push(
                                entry,
                                Some((group.name.as_str(), subcategory.name.as_str())),
                            );
                        }
                    }
                }
            }
        } else if let Some(Value::Array(entries)) = object.remove("products") {
            for entry in entries {
                collection.push(entry, None);
            }
        }

        collection.categories =
            unique_in_order(collection.products.iter().map(|product| product.category.as_str()));
        collection
    }

    fn push(&mut self, entry: Value, groups: Option<(&str, &str)>) {
        let Some(mut product) = decode_entry::<Product>(entry) else {
            self.skipped += 1;
            return;
        };

        // 嵌套形态下以所在分组为准
        if let Some((category, subcategory)) = groups {
            product.category = category.to_string();
            product.subcategory = subcategory.to_string();
        }
        self.products.push(product);
    }
}

/// 嵌套产品目录：categories 数组里至少有一个对象
fn is_nested_catalog(object: &Map<String, Value>) -> bool {
    object
        .get("categories")
        .and_then(Value::as_array)
        .map_or(false, |groups| groups.iter().any(Value::is_object))
}

fn decode_entry<T: for<'de> Deserialize<'de>>(entry: Value) -> Option<T> {
    if !entry.is_object() {
        return None;
    }
    serde_json::from_value(entry).ok()
}

fn string_list(value: Option<Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    let texts: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
        .collect();
    unique_in_order(texts.iter().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_document_parses_and_normalizes() {
        let json = r#"{
            "posts": [
                {"id": 1, "title": "First Post", "category": "Guides", "tags": ["rust"]},
                {"id": "2", "title": null, "category": "News", "excerpt": 5},
                "garbage",
                {"id": 3, "title": "Third", "tags": "oops"}
            ],
            "categories": ["Guides", "News"],
            "tags": ["rust", "wasm"]
        }"#;

        let collection = parse_posts(json).unwrap();
        assert_eq!(collection.posts.len(), 3);
        assert_eq!(collection.skipped, 1);
        assert_eq!(collection.categories, vec!["Guides", "News"]);
        assert_eq!(collection.tags, vec!["rust", "wasm"]);

        let first = &collection.posts[0];
        assert_eq!(first.id.as_str(), "1");
        assert_eq!(first.slug, "first-post");

        let second = &collection.posts[1];
        assert_eq!(second.title, "");
        assert_eq!(second.excerpt, "5");
        assert_eq!(second.slug, "post-2");

        assert!(collection.posts[2].tags.is_empty());
    }

    #[test]
    fn missing_post_categories_are_derived() {
        let json = r#"{"posts": [
            {"id": 1, "category": "News", "tags": ["b"]},
            {"id": 2, "category": "Guides", "tags": ["a", "b"]},
            {"id": 3, "category": "News"}
        ]}"#;

        let collection = parse_posts(json).unwrap();
        assert_eq!(collection.categories, vec!["News", "Guides"]);
        assert_eq!(collection.tags, vec!["b", "a"]);
    }

    #[test]
    fn flat_products_document() {
        let json = r#"{"products": [
            {"id": 1, "name": "Planner", "category": "Templates", "price": 500},
            {"id": 2, "name": "Course", "category": "Courses", "price": "1,200"},
            {"id": 3, "name": "Sheet", "category": "Templates"}
        ]}"#;

        let collection = parse_products(json).unwrap();
        assert_eq!(collection.products.len(), 3);
        assert_eq!(collection.categories, vec!["Templates", "Courses"]);
        assert_eq!(collection.products[1].price, "1,200");
    }

    #[test]
    fn nested_products_document_is_flattened() {
        let json = r#"{"categories": [
            {"name": "Digital", "subcategories": [
                {"name": "Ebooks", "products": [{"id": 1, "name": "Guide", "category": "ignored"}]},
                {"name": "Templates", "products": [{"id": 2, "name": "Planner"}, 7]}
            ]},
            {"name": "Coaching", "subcategories": [
                {"name": "Sessions", "products": [{"id": 3, "name": "Call"}]}
            ]}
        ]}"#;

        let collection = parse_products(json).unwrap();
        let names: Vec<_> = collection.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Guide", "Planner", "Call"]);
        assert_eq!(collection.skipped, 1);

        assert_eq!(collection.products[0].category, "Digital");
        assert_eq!(collection.products[0].subcategory, "Ebooks");
        assert_eq!(collection.products[2].category, "Coaching");
        assert_eq!(collection.categories, vec!["Digital", "Coaching"]);
    }

    #[test]
    fn detects_document_kinds() {
        let posts: Value = serde_json::from_str(r#"{"posts": [], "categories": ["A"]}"#).unwrap();
        let flat: Value = serde_json::from_str(r#"{"products": []}"#).unwrap();
        let nested: Value =
            serde_json::from_str(r#"{"categories": [{"name": "A", "subcategories": []}]}"#).unwrap();
        let other: Value = serde_json::from_str(r#"{"settings": {}}"#).unwrap();

        assert_eq!(DocumentKind::detect(&posts), Some(DocumentKind::Posts));
        assert_eq!(DocumentKind::detect(&flat), Some(DocumentKind::Products));
        assert_eq!(DocumentKind::detect(&nested), Some(DocumentKind::Products));
        assert_eq!(DocumentKind::detect(&other), None);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_posts("{not json").is_err());
        assert!(parse_products("").is_err());
    }
}
