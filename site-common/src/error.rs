use thiserror::Error;

/// 目录数据处理的结果类型
pub type Result<T> = std::result::Result<T, CatalogError>;

/// 文档解析与快照读写错误
#[derive(Debug, Error)]
pub enum CatalogError {
    /// JSON 文档无法解析
    #[error("JSON 文档解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 快照压缩、解压或版本校验失败
    #[error("目录快照读写失败: {0}")]
    Snapshot(#[from] std::io::Error),

    /// 既不是文章文档也不是产品文档
    #[error("无法识别的文档: 需要 posts 或 products 结构")]
    UnknownDocument,
}
