pub mod compression;
pub mod de;
pub mod documents;
pub mod error;
pub mod models;
pub mod text;

// 重新导出常用模块和函数，方便直接使用
pub use compression::{from_compressed, to_compressed, validate_compressed_data};
pub use documents::{parse_posts, parse_products, DocumentKind, PostCollection, ProductCollection};
pub use error::{CatalogError, Result};
pub use models::{Catalog, CatalogMetadata, ItemId, Post, Product, SNAPSHOT_VERSION};
