//! 列表状态与 URL 查询串之间的转换
//!
//! 查询串使用 `q`、`category`、`tag`、`page` 四个参数，页面上其他参数原样保留。

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::filter::{constraint, FilterCriteria};

pub const QUERY_PARAM: &str = "q";
pub const CATEGORY_PARAM: &str = "category";
pub const TAG_PARAM: &str = "tag";
pub const PAGE_PARAM: &str = "page";

const OWNED_PARAMS: [&str; 4] = [QUERY_PARAM, CATEGORY_PARAM, TAG_PARAM, PAGE_PARAM];

/// 可写入地址栏的列表状态
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    pub criteria: FilterCriteria,
    /// 从 1 开始的页码
    pub page: usize,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            page: 1,
        }
    }
}

impl ViewQuery {
    pub fn new(criteria: FilterCriteria, page: usize) -> Self {
        Self {
            criteria,
            page: page.max(1),
        }
    }

    /// 解析 `location.search`，前导 `?` 可有可无
    ///
    /// 重复参数取第一次出现的值；页码缺失、非数字或小于 1 时按 1 处理。
    pub fn parse(search: &str) -> Self {
        let mut query = Self::default();
        let pairs: Vec<_> = form_urlencoded::parse(trim_question(search).as_bytes()).collect();

        for (key, value) in pairs.iter().rev() {
            match &**key {
                QUERY_PARAM => query.criteria.query = value.to_string(),
                CATEGORY_PARAM => query.criteria.category = constraint(value),
                TAG_PARAM => query.criteria.tag = constraint(value),
                PAGE_PARAM => {
                    query.page = value
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .filter(|page| *page >= 1)
                        .unwrap_or(1)
                }
                _ => {}
            }
        }
        query
    }

    /// 只包含本状态的查询串（不带 `?`）
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        self.append_to(&mut serializer);
        serializer.finish()
    }

    /// 把状态写入已有的查询串，替换旧的列表参数并保留其他参数
    pub fn merge_into(&self, search: &str) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in form_urlencoded::parse(trim_question(search).as_bytes()) {
            if !OWNED_PARAMS.contains(&&*key) {
                serializer.append_pair(&key, &value);
            }
        }
        self.append_to(&mut serializer);
        serializer.finish()
    }

    fn append_to(&self, serializer: &mut form_urlencoded::Serializer<'_, String>) {
        if !self.criteria.query.is_empty() {
            serializer.append_pair(QUERY_PARAM, &self.criteria.query);
        }
        if let Some(category) = &self.criteria.category {
            serializer.append_pair(CATEGORY_PARAM, category);
        }
        if let Some(tag) = &self.criteria.tag {
            serializer.append_pair(TAG_PARAM, tag);
        }
        serializer.append_pair(PAGE_PARAM, &self.page.max(1).to_string());
    }
}

/// 读取单个查询参数，取第一次出现的值
pub fn param(search: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(trim_question(search).as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn trim_question(search: &str) -> &str {
    search.strip_prefix('?').unwrap_or(search)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_parameters() {
        let query = ViewQuery::parse("?q=rust%20wasm&category=Guides&tag=web&page=3");
        assert_eq!(query.criteria.query, "rust wasm");
        assert_eq!(query.criteria.category.as_deref(), Some("Guides"));
        assert_eq!(query.criteria.tag.as_deref(), Some("web"));
        assert_eq!(query.page, 3);
    }

    #[test]
    fn missing_or_invalid_values_fall_back_to_defaults() {
        assert_eq!(ViewQuery::parse(""), ViewQuery::default());
        assert_eq!(ViewQuery::parse("?page=abc").page, 1);
        assert_eq!(ViewQuery::parse("?page=0").page, 1);
        assert_eq!(ViewQuery::parse("?page=-2").page, 1);
        assert_eq!(ViewQuery::parse("?category=all").criteria.category, None);
        assert_eq!(ViewQuery::parse("?tag=").criteria.tag, None);
    }

    #[test]
    fn first_occurrence_wins() {
        let query = ViewQuery::parse("q=first&q=second&page=2&page=5");
        assert_eq!(query.criteria.query, "first");
        assert_eq!(query.page, 2);
        assert_eq!(param("?id=1&id=2", "id").as_deref(), Some("1"));
        assert_eq!(param("?id=1", "slug"), None);
    }

    #[test]
    fn query_string_round_trips() {
        let query = ViewQuery::new(
            FilterCriteria::new()
                .with_query("café & crème")
                .with_category("How To")
                .with_tag("c++"),
            4,
        );
        let encoded = query.to_query_string();
        assert_eq!(ViewQuery::parse(&encoded), query);
        assert_eq!(ViewQuery::parse(&format!("?{encoded}")), query);
    }

    #[test]
    fn page_is_always_written_and_empty_values_are_omitted() {
        assert_eq!(ViewQuery::default().to_query_string(), "page=1");
        let query = ViewQuery::new(FilterCriteria::new().with_category("News"), 2);
        assert_eq!(query.to_query_string(), "category=News&page=2");
    }

    #[test]
    fn merge_keeps_unrelated_parameters() {
        let query = ViewQuery::new(FilterCriteria::new().with_query("rust"), 2);
        let merged = query.merge_into("?utm_source=mail&page=9&q=old&ref=home");
        assert_eq!(merged, "utm_source=mail&ref=home&q=rust&page=2");
    }
}
