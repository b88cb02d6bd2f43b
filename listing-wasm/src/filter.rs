use serde::{Deserialize, Serialize};
use site_common::{ItemId, Post, Product};

/// 筛选条件 - 关键词、分类、标签三者同时满足
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// 原始关键词，匹配时去掉首尾空白并忽略大小写
    pub query: String,
    /// 分类约束，None 表示不限
    pub category: Option<String>,
    /// 标签约束，None 表示不限
    pub tag: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = constraint(category);
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = constraint(tag);
        self
    }

    /// 规范化后的关键词，空关键词返回 None
    fn needle(&self) -> Option<String> {
        let needle = self.query.trim().to_lowercase();
        (!needle.is_empty()).then_some(needle)
    }

    /// 判断单个条目是否满足全部条件
    pub fn matches<T: Listable + ?Sized>(&self, item: &T) -> bool {
        self.matches_with(item, self.needle().as_deref())
    }

    fn matches_with<T: Listable + ?Sized>(&self, item: &T, needle: Option<&str>) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |category| item.category() == category);

        let tag_ok = self
            .tag
            .as_deref()
            .map_or(true, |tag| item.tags().iter().any(|candidate| candidate == tag));

        let text_ok = needle.map_or(true, |needle| {
            [item.title(), item.excerpt(), item.body()]
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
        });

        category_ok && tag_ok && text_ok
    }
}

/// 选择框取值转换为约束：空值和 "all" 表示不限
pub fn constraint(value: &str) -> Option<String> {
    match value {
        "" | "all" => None,
        other => Some(other.to_string()),
    }
}

/// 可筛选条目的检索面
pub trait Listable {
    fn id(&self) -> &ItemId;
    fn title(&self) -> &str;
    fn excerpt(&self) -> &str;
    fn body(&self) -> &str;
    fn category(&self) -> &str;

    fn tags(&self) -> &[String] {
        &[]
    }
}

impl Listable for Post {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn excerpt(&self) -> &str {
        &self.excerpt
    }

    fn body(&self) -> &str {
        &self.content
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Listable for Product {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn excerpt(&self) -> &str {
        self.summary()
    }

    fn body(&self) -> &str {
        &self.long_desc
    }

    fn category(&self) -> &str {
        &self.category
    }
}

/// 按原顺序返回满足条件的条目
pub fn apply_filters<'a, T: Listable>(items: &'a [T], criteria: &FilterCriteria) -> Vec<&'a T> {
    let needle = criteria.needle();
    items
        .iter()
        .filter(|item| criteria.matches_with(*item, needle.as_deref()))
        .collect()
}

/// 与 `apply_filters` 相同，但返回下标
pub fn matching_indices<T: Listable>(items: &[T], criteria: &FilterCriteria) -> Vec<usize> {
    let needle = criteria.needle();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| criteria.matches_with(*item, needle.as_deref()))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: usize, title: &str, category: &str, tags: &[&str]) -> Post {
        Post {
            id: ItemId::new(id.to_string()),
            title: title.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            ..Post::default()
        }
    }

    fn ten_posts() -> Vec<Post> {
        (1..=10)
            .map(|i| {
                let category = if matches!(i, 2 | 5 | 9) { "Guides" } else { "News" };
                let tags: &[&str] = if i % 2 == 0 { &["rust"] } else { &["design"] };
                post(i, &format!("Post number {i}"), category, tags)
            })
            .collect()
    }

    #[test]
    fn category_filter_keeps_source_order() {
        let posts = ten_posts();
        let criteria = FilterCriteria::new().with_category("Guides");
        let ids: Vec<_> = apply_filters(&posts, &criteria)
            .iter()
            .map(|post| post.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "5", "9"]);
    }

    #[test]
    fn category_match_is_case_sensitive() {
        let posts = ten_posts();
        let criteria = FilterCriteria::new().with_category("guides");
        assert!(apply_filters(&posts, &criteria).is_empty());
    }

    #[test]
    fn query_matches_title_excerpt_or_body_ignoring_case() {
        let mut posts = ten_posts();
        posts[0].excerpt = "All about WebAssembly".into();
        posts[3].content = "<p>webassembly in practice</p>".into();
        posts[6].title = "WEBASSEMBLY news".into();

        let criteria = FilterCriteria::new().with_query("  WebAssembly ");
        let hits = apply_filters(&posts, &criteria);
        let ids: Vec<_> = hits.iter().map(|post| post.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4", "7"]);

        let needle = "webassembly";
        for hit in hits {
            assert!([hit.title(), hit.excerpt(), hit.body()]
                .iter()
                .any(|field| field.to_lowercase().contains(needle)));
        }
    }

    #[test]
    fn constraints_are_conjunctive() {
        let posts = ten_posts();
        let criteria = FilterCriteria::new().with_category("Guides").with_tag("rust");
        let ids: Vec<_> = apply_filters(&posts, &criteria)
            .iter()
            .map(|post| post.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2"]);

        let criteria = criteria.with_query("number 5");
        assert!(apply_filters(&posts, &criteria).is_empty());
    }

    #[test]
    fn unmatched_query_yields_empty_result() {
        let posts = ten_posts();
        let criteria = FilterCriteria::new().with_query("zZz");
        assert!(apply_filters(&posts, &criteria).is_empty());
        assert!(matching_indices(&posts, &criteria).is_empty());
    }

    #[test]
    fn all_and_empty_values_mean_no_constraint() {
        let posts = ten_posts();
        let criteria = FilterCriteria::new().with_category("all").with_tag("").with_query("   ");
        assert_eq!(criteria.category, None);
        assert_eq!(criteria.tag, None);
        assert_eq!(apply_filters(&posts, &criteria).len(), 10);
    }

    #[test]
    fn items_without_tags_never_match_a_tag() {
        let products = vec![Product {
            name: "Planner".into(),
            ..Product::default()
        }];
        let criteria = FilterCriteria::new().with_tag("rust");
        assert!(apply_filters(&products, &criteria).is_empty());
    }

    #[test]
    fn product_search_covers_name_summary_and_long_description() {
        let products = vec![
            Product {
                name: "Budget Planner".into(),
                ..Product::default()
            },
            Product {
                name: "Sheet".into(),
                description: "A budget sheet".into(),
                ..Product::default()
            },
            Product {
                name: "Course".into(),
                long_desc: "Learn budget basics".into(),
                ..Product::default()
            },
            Product {
                name: "Other".into(),
                ..Product::default()
            },
        ];
        let criteria = FilterCriteria::new().with_query("BUDGET");
        assert_eq!(matching_indices(&products, &criteria), vec![0, 1, 2]);
    }
}
