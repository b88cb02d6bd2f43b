use chrono::Utc;
use serde_json::Value;
use site_common::{
    Catalog, CatalogError, CatalogMetadata, DocumentKind, PostCollection, ProductCollection,
};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{ListingError, Result};

/// 目录快照构建器 - 收集文章和产品文档，输出规范化的压缩快照
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    posts: PostCollection,
    products: ProductCollection,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一批文章，分类和标签按首次出现顺序合并
    pub fn add_posts(&mut self, collection: PostCollection) {
        merge_unique(&mut self.posts.categories, collection.categories);
        merge_unique(&mut self.posts.tags, collection.tags);
        self.posts.posts.extend(collection.posts);
        self.posts.skipped += collection.skipped;
    }

    pub fn add_products(&mut self, collection: ProductCollection) {
        merge_unique(&mut self.products.categories, collection.categories);
        self.products.products.extend(collection.products);
        self.products.skipped += collection.skipped;
    }

    /// 解析任意 JSON 文档并按结构归类，返回识别出的类型
    pub fn add_document(&mut self, json: &str) -> Result<DocumentKind> {
        let value: Value = serde_json::from_str(json).map_err(CatalogError::from)?;
        let kind = DocumentKind::detect(&value).ok_or(CatalogError::UnknownDocument)?;
        match kind {
            DocumentKind::Posts => self.add_posts(PostCollection::from_value(value)),
            DocumentKind::Products => self.add_products(ProductCollection::from_value(value)),
        }
        Ok(kind)
    }

    pub fn post_count(&self) -> usize {
        self.posts.posts.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.products.len()
    }

    /// 被跳过的格式错误条目数
    pub fn skipped(&self) -> usize {
        self.posts.skipped + self.products.skipped
    }

    pub fn build_catalog(&self) -> Result<Catalog> {
        if self.post_count() == 0 && self.product_count() == 0 {
            return Err(ListingError::EmptyCatalog);
        }

        Ok(Catalog {
            meta: CatalogMetadata {
                post_count: self.post_count(),
                product_count: self.product_count(),
                created_at: Utc::now(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            posts: self.posts.posts.clone(),
            post_categories: self.posts.categories.clone(),
            post_tags: self.posts.tags.clone(),
            products: self.products.products.clone(),
            product_categories: self.products.categories.clone(),
        })
    }

    /// 构建并写入快照文件，返回写入的字节数
    pub fn save_catalog(&self, path: impl AsRef<Path>) -> Result<usize> {
        let catalog = self.build_catalog()?;
        let data = catalog.to_snapshot()?;

        let mut file = File::create(path)?;
        file.write_all(&data)?;
        Ok(data.len())
    }
}

fn merge_unique(target: &mut Vec<String>, values: Vec<String>) {
    for value in values {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}
