use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use listing_wasm::CatalogBuilder;
use site_common::text::{html_text, truncate_chars};
use site_common::{validate_compressed_data, DocumentKind, PostCollection, ProductCollection, SNAPSHOT_VERSION};

/// 自动摘要的最大字符数
const EXCERPT_CHARS: usize = 160;

/// 快照文件名
const SNAPSHOT_FILE: &str = "catalog.bin";

// 主函数
fn main() {
    // 设置命令行参数
    let matches = Command::new("目录快照生成器")
        .version(env!("CARGO_PKG_VERSION"))
        .about("把文章和产品 JSON 文档规范化并打包成压缩快照")
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("SOURCE_DIR")
                .help("JSON 文档所在目录")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT_DIR")
                .help("快照输出目录")
                .required(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("显示详细信息")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    init_tracing(verbose);

    // required(true) 保证参数存在
    let (Some(source), Some(output)) = (
        matches.get_one::<String>("source"),
        matches.get_one::<String>("output"),
    ) else {
        error!("缺少 --source 或 --output 参数");
        std::process::exit(2);
    };

    info!(source = %source, output = %output, "开始生成目录快照");
    match generate_catalog(Path::new(source), Path::new(output)) {
        Ok(report) => info!(
            posts = report.posts,
            products = report.products,
            skipped_files = report.skipped_files,
            bytes = report.bytes,
            path = %report.path.display(),
            "目录快照生成成功"
        ),
        Err(e) => {
            error!("目录快照生成失败: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// 一次生成的统计
#[derive(Debug)]
struct Report {
    posts: usize,
    products: usize,
    /// 无法识别或解析失败的文件数
    skipped_files: usize,
    bytes: usize,
    path: PathBuf,
}

fn generate_catalog(source_dir: &Path, output_dir: &Path) -> Result<Report> {
    let start_time = Instant::now();

    if !source_dir.is_dir() {
        bail!("源目录不存在或不是有效目录: {}", source_dir.display());
    }
    fs::create_dir_all(output_dir)
        .with_context(|| format!("无法创建输出目录 {}", output_dir.display()))?;

    let mut builder = CatalogBuilder::new();
    let skipped_files = scan_documents(source_dir, &mut builder)?;
    info!(
        posts = builder.post_count(),
        products = builder.product_count(),
        skipped_entries = builder.skipped(),
        "扫描完成"
    );

    let path = output_dir.join(SNAPSHOT_FILE);
    let bytes = builder
        .save_catalog(&path)
        .with_context(|| format!("无法写入快照 {}", path.display()))?;

    // 读回校验头部
    let written = fs::read(&path).with_context(|| format!("无法读取快照 {}", path.display()))?;
    let version = validate_compressed_data(&written, SNAPSHOT_VERSION[0])
        .with_context(|| format!("快照校验失败 {}", path.display()))?;
    debug!(version = ?version, "快照校验通过");

    info!("耗时: {:.2}秒", start_time.elapsed().as_secs_f32());
    Ok(Report {
        posts: builder.post_count(),
        products: builder.product_count(),
        skipped_files,
        bytes,
        path,
    })
}

/// 递归扫描 JSON 文档并加入构建器，返回被跳过的文件数
fn scan_documents(dir: &Path, builder: &mut CatalogBuilder) -> Result<usize> {
    let mut skipped = 0;

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("遍历目录时出错: {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "json") {
            continue;
        }

        match load_document(path, builder) {
            Ok(Some(kind)) => debug!(path = %path.display(), kind = ?kind, "已加入文档"),
            Ok(None) => {
                debug!(path = %path.display(), "不是文章或产品文档，跳过");
                skipped += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), "解析文件时出错: {:#}", e);
                skipped += 1;
            }
        }
    }

    Ok(skipped)
}

fn load_document(path: &Path, builder: &mut CatalogBuilder) -> Result<Option<DocumentKind>> {
    let json = fs::read_to_string(path).with_context(|| format!("无法读取文件 {}", path.display()))?;
    let value: Value = serde_json::from_str(&json).context("JSON 格式错误")?;

    let Some(kind) = DocumentKind::detect(&value) else {
        return Ok(None);
    };
    match kind {
        DocumentKind::Posts => {
            let mut collection = PostCollection::from_value(value);
            fill_excerpts(&mut collection);
            builder.add_posts(collection);
        }
        DocumentKind::Products => builder.add_products(ProductCollection::from_value(value)),
    }
    Ok(Some(kind))
}

/// 为没有摘要的文章从正文生成纯文本摘要
fn fill_excerpts(collection: &mut PostCollection) {
    for post in collection.posts.iter_mut().filter(|post| post.excerpt.is_empty()) {
        let text = html_text(&post.content);
        if !text.is_empty() {
            post.excerpt = format!("{}...", truncate_chars(&text, EXCERPT_CHARS));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_common::Catalog;

    #[test]
    fn missing_excerpts_are_filled_from_content() {
        let mut collection = PostCollection::from_value(serde_json::json!({
            "posts": [
                {"id": 1, "title": "A", "content": format!("<p>{}</p>", "word ".repeat(60))},
                {"id": 2, "title": "B", "excerpt": "Kept", "content": "<p>Body</p>"},
                {"id": 3, "title": "C"},
                {"id": 4, "title": "D", "content": "<p>Caf&eacute; &amp; more</p><!-- x > y -->"}
            ]
        }));
        fill_excerpts(&mut collection);

        let first = &collection.posts[0].excerpt;
        assert!(first.ends_with("..."));
        assert_eq!(first.chars().count(), EXCERPT_CHARS + 3);
        assert_eq!(collection.posts[1].excerpt, "Kept");
        assert!(collection.posts[2].excerpt.is_empty());
        assert_eq!(collection.posts[3].excerpt, "Caf\u{e9} & more...");
    }

    #[test]
    fn generates_a_readable_snapshot() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::create_dir_all(source.path().join("json")).unwrap();
        fs::write(
            source.path().join("json/posts.json"),
            r#"{"posts": [{"id": 1, "title": "Hello World", "category": "News", "content": "<p>Hi</p>"}]}"#,
        )
        .unwrap();
        fs::write(
            source.path().join("json/products.json"),
            r#"{"products": [{"id": "p1", "name": "Kit", "category": "Tools", "price": 10}]}"#,
        )
        .unwrap();
        fs::write(source.path().join("json/other.json"), r#"{"pages": []}"#).unwrap();
        fs::write(source.path().join("json/broken.json"), "{ nope").unwrap();
        fs::write(source.path().join("readme.txt"), "ignored").unwrap();

        let report = generate_catalog(source.path(), output.path()).unwrap();
        assert_eq!(report.posts, 1);
        assert_eq!(report.products, 1);
        assert_eq!(report.skipped_files, 2);

        let bytes = fs::read(output.path().join(SNAPSHOT_FILE)).unwrap();
        assert_eq!(bytes.len(), report.bytes);
        let catalog = Catalog::from_snapshot(&bytes).unwrap();
        assert_eq!(catalog.posts[0].slug, "hello-world");
        assert_eq!(catalog.posts[0].excerpt, "Hi...");
        assert_eq!(catalog.product_categories, vec!["Tools"]);
    }

    #[test]
    fn empty_source_is_an_error() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        assert!(generate_catalog(source.path(), output.path()).is_err());
        assert!(generate_catalog(&source.path().join("missing"), output.path()).is_err());
    }
}
