//! 列表视图状态 - 条目集合、筛选条件、筛选结果和当前页
//!
//! 条目集合加载后不再变化；每次条件或页码变化都同步重新筛选、分页。

use serde::Serialize;

use crate::config::{ListingConfig, ListingKind};
use crate::filter::{constraint, matching_indices, FilterCriteria};
use crate::markup::Node;
use crate::pagination::{clamp_page, paginate, total_pages};
use crate::query::ViewQuery;
use crate::render::{render_list, render_pagination, Card, CardOptions};

/// 导出给页面脚本的状态
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub query: String,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub page: usize,
    pub total_pages: usize,
    /// 筛选后的条目数
    pub total: usize,
}

/// 与条目类型无关的列表操作，供 DOM 层通过 trait 对象使用
pub trait Listing {
    fn kind(&self) -> ListingKind;
    fn criteria(&self) -> &FilterCriteria;
    fn page(&self) -> usize;
    fn total_pages(&self) -> usize;
    fn total(&self) -> usize;
    fn categories(&self) -> &[String];
    fn tags(&self) -> &[String];

    /// 设置关键词，值变化时回到第一页；返回是否有变化
    fn set_query(&mut self, query: &str) -> bool;
    fn set_category(&mut self, category: &str) -> bool;
    fn set_tag(&mut self, tag: &str) -> bool;
    /// 跳转页码，超出范围时被限制到有效区间
    fn set_page(&mut self, page: usize);
    /// 从 URL 恢复状态，未知的分类和标签会被丢弃
    fn restore(&mut self, query: ViewQuery);

    fn view_query(&self) -> ViewQuery {
        ViewQuery::new(self.criteria().clone(), self.page())
    }

    fn state(&self) -> ViewState {
        let criteria = self.criteria();
        ViewState {
            query: criteria.query.clone(),
            category: criteria.category.clone(),
            tag: criteria.tag.clone(),
            page: self.page(),
            total_pages: self.total_pages(),
            total: self.total(),
        }
    }

    fn render_list(&self) -> Node;
    /// `path` 和 `search` 用于生成保留其他参数的分页链接
    fn render_pagination(&self, path: &str, search: &str) -> Node;
}

pub struct ListingView<T> {
    kind: ListingKind,
    items: Vec<T>,
    categories: Vec<String>,
    tags: Vec<String>,
    criteria: FilterCriteria,
    /// 筛选结果在 `items` 中的下标，保持原顺序
    filtered: Vec<usize>,
    page: usize,
    page_size: usize,
    max_page_links: Option<usize>,
    card: CardOptions,
}

impl<T: Card> ListingView<T> {
    pub fn new(items: Vec<T>, categories: Vec<String>, tags: Vec<String>, config: &ListingConfig) -> Self {
        let filtered = (0..items.len()).collect();
        Self {
            kind: config.kind,
            items,
            categories,
            tags,
            criteria: FilterCriteria::default(),
            filtered,
            page: 1,
            page_size: config.page_size.max(1),
            max_page_links: config.max_page_links,
            card: CardOptions::from(config),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// 当前页的条目
    pub fn page_items(&self) -> Vec<&T> {
        paginate(&self.filtered, self.page, self.page_size)
            .iter()
            .filter_map(|&index| self.items.get(index))
            .collect()
    }

    fn refilter(&mut self) {
        self.filtered = matching_indices(&self.items, &self.criteria);
        self.page = clamp_page(self.page, total_pages(self.filtered.len(), self.page_size));
    }

    fn known(values: &[String], value: Option<String>) -> Option<String> {
        value.filter(|value| values.iter().any(|known| known == value))
    }
}

impl<T: Card> Listing for ListingView<T> {
    fn kind(&self) -> ListingKind {
        self.kind
    }

    fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    fn page(&self) -> usize {
        self.page
    }

    fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.page_size)
    }

    fn total(&self) -> usize {
        self.filtered.len()
    }

    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn set_query(&mut self, query: &str) -> bool {
        if self.criteria.query == query {
            return false;
        }
        self.criteria.query = query.to_string();
        self.page = 1;
        self.refilter();
        true
    }

    fn set_category(&mut self, category: &str) -> bool {
        let category = constraint(category);
        if self.criteria.category == category {
            return false;
        }
        self.criteria.category = category;
        self.page = 1;
        self.refilter();
        true
    }

    fn set_tag(&mut self, tag: &str) -> bool {
        let tag = constraint(tag);
        if self.criteria.tag == tag {
            return false;
        }
        self.criteria.tag = tag;
        self.page = 1;
        self.refilter();
        true
    }

    fn set_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.total_pages());
    }

    fn restore(&mut self, query: ViewQuery) {
        let ViewQuery { criteria, page } = query;
        self.criteria = FilterCriteria {
            category: Self::known(&self.categories, criteria.category),
            tag: Self::known(&self.tags, criteria.tag),
            query: criteria.query,
        };
        self.page = page;
        self.refilter();
    }

    fn render_list(&self) -> Node {
        render_list(&self.page_items(), &self.card, self.kind)
    }

    fn render_pagination(&self, path: &str, search: &str) -> Node {
        render_pagination(
            &self.criteria,
            self.page,
            self.total_pages(),
            self.max_page_links,
            path,
            search,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_common::{ItemId, Post};

    fn posts(count: usize) -> Vec<Post> {
        (1..=count)
            .map(|i| Post {
                id: ItemId::new(i.to_string()),
                title: format!("Item {i}"),
                category: if i % 3 == 0 { "Guides" } else { "News" }.to_string(),
                tags: vec![if i % 2 == 0 { "even" } else { "odd" }.to_string()],
                ..Post::default()
            })
            .collect()
    }

    fn view(count: usize) -> ListingView<Post> {
        ListingView::new(
            posts(count),
            vec!["News".into(), "Guides".into()],
            vec!["even".into(), "odd".into()],
            &ListingConfig::posts(),
        )
    }

    fn ids(view: &ListingView<Post>) -> Vec<String> {
        view.page_items().iter().map(|post| post.id.to_string()).collect()
    }

    #[test]
    fn thirteen_items_paginate_into_three_pages() {
        let mut view = view(13);
        assert_eq!(view.total_pages(), 3);
        assert_eq!(ids(&view), vec!["1", "2", "3", "4", "5", "6"]);
        view.set_page(3);
        assert_eq!(ids(&view), vec!["13"]);
        view.set_page(99);
        assert_eq!(view.page(), 3);
        view.set_page(0);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn filter_change_resets_page_and_unchanged_value_is_a_no_op() {
        let mut view = view(13);
        view.set_page(2);
        assert!(!view.set_query(""));
        assert_eq!(view.page(), 2);

        assert!(view.set_category("Guides"));
        assert_eq!(view.page(), 1);
        assert_eq!(view.total(), 4);
        assert_eq!(ids(&view), vec!["3", "6", "9", "12"]);

        assert!(view.set_category("all"));
        assert_eq!(view.total(), 13);
    }

    #[test]
    fn no_match_renders_message_and_no_pagination() {
        let mut view = view(13);
        view.set_query("zZz");
        assert_eq!(view.total(), 0);
        assert_eq!(view.total_pages(), 1);
        assert_eq!(view.page(), 1);
        assert!(view
            .render_list()
            .to_html()
            .contains("No posts found matching your criteria."));
        assert!(view.render_pagination("blog.html", "").to_html().is_empty());
    }

    #[test]
    fn restore_discards_unknown_values_and_clamps_page() {
        let mut view = view(13);
        view.restore(ViewQuery::parse("?category=Missing&tag=even&page=40"));
        assert_eq!(view.criteria().category, None);
        assert_eq!(view.criteria().tag.as_deref(), Some("even"));
        assert_eq!(view.total(), 6);
        assert_eq!(view.page(), 1);

        view.restore(ViewQuery::parse("?q=item%201&page=2"));
        assert_eq!(view.state(), ViewState {
            query: "item 1".into(),
            category: None,
            tag: None,
            page: 1,
            total_pages: 1,
            total: 5,
        });
    }

    #[test]
    fn view_query_reflects_current_state() {
        let mut view = view(13);
        view.set_tag("odd");
        view.set_page(2);
        let query = view.view_query();
        assert_eq!(query.to_query_string(), "tag=odd&page=2");
    }
}
