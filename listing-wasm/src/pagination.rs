/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// 总页数，至少为 1
pub fn total_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    len.div_ceil(page_size).max(1)
}

/// 把页码限制在 [1, total_pages]
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// 取第 `page` 页（从 1 开始）的切片，越界时返回空切片
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

/// 分页控件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    /// 上一页，None 表示已在第一页
    Previous(Option<usize>),
    Number { page: usize, current: bool },
    /// 下一页，None 表示已在最后一页
    Next(Option<usize>),
}

/// 生成分页控件序列；只有一页时为空
///
/// `max_links` 限制页码按钮数量，窗口以当前页为中心。
pub fn page_controls(current: usize, total: usize, max_links: Option<usize>) -> Vec<PageControl> {
    if total <= 1 {
        return Vec::new();
    }

    let current = clamp_page(current, total);
    let (first, last) = match max_links {
        Some(window) if window > 0 && window < total => {
            let mut first = current.saturating_sub(window / 2).max(1);
            let last = (first + window - 1).min(total);
            if last - first < window - 1 {
                first = (last + 1).saturating_sub(window).max(1);
            }
            (first, last)
        }
        _ => (1, total),
    };

    let mut controls = Vec::with_capacity(last - first + 3);
    controls.push(PageControl::Previous((current > 1).then(|| current - 1)));
    controls.extend((first..=last).map(|page| PageControl::Number {
        page,
        current: page == current,
    }));
    controls.push(PageControl::Next((current < total).then(|| current + 1)));
    controls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(controls: &[PageControl]) -> Vec<usize> {
        controls
            .iter()
            .filter_map(|control| match control {
                PageControl::Number { page, .. } => Some(*page),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn total_pages_is_never_zero() {
        assert_eq!(total_pages(0, 6), 1);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(13, 6), 3);
        assert_eq!(total_pages(5, 0), 5);
        assert_eq!(total_pages(7, usize::MAX), 1);
        assert_eq!(total_pages(usize::MAX, 2), usize::MAX / 2 + 1);
    }

    #[test]
    fn thirteen_items_make_three_pages() {
        let items: Vec<usize> = (1..=13).collect();
        assert_eq!(total_pages(items.len(), DEFAULT_PAGE_SIZE), 3);
        assert_eq!(paginate(&items, 1, DEFAULT_PAGE_SIZE), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(paginate(&items, 3, DEFAULT_PAGE_SIZE), &[13]);
    }

    #[test]
    fn pages_concatenate_back_to_the_input() {
        for len in 0..20 {
            let items: Vec<usize> = (0..len).collect();
            for page_size in 1..8 {
                let pages = total_pages(len, page_size);
                let mut joined = Vec::new();
                for page in 1..=pages {
                    let slice = paginate(&items, page, page_size);
                    assert!(slice.len() <= page_size);
                    joined.extend_from_slice(slice);
                }
                assert_eq!(joined, items);
            }
        }
    }

    #[test]
    fn out_of_range_pages_are_empty_and_clamped() {
        let items = vec![1, 2, 3];
        assert!(paginate(&items, 5, 6).is_empty());
        assert_eq!(paginate(&items, 0, 2), &[1, 2]);
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(4, 0), 1);
    }

    #[test]
    fn single_page_has_no_controls() {
        assert!(page_controls(1, 1, None).is_empty());
        assert!(page_controls(1, 0, Some(7)).is_empty());
    }

    #[test]
    fn controls_cover_every_page_with_boundaries_disabled() {
        let controls = page_controls(1, 3, None);
        assert_eq!(controls.first(), Some(&PageControl::Previous(None)));
        assert_eq!(controls.last(), Some(&PageControl::Next(Some(2))));
        assert_eq!(numbers(&controls), vec![1, 2, 3]);
        assert!(controls.contains(&PageControl::Number { page: 1, current: true }));

        let controls = page_controls(3, 3, None);
        assert_eq!(controls.first(), Some(&PageControl::Previous(Some(2))));
        assert_eq!(controls.last(), Some(&PageControl::Next(None)));
    }

    #[test]
    fn windowed_controls_stay_centered_and_in_range() {
        assert_eq!(numbers(&page_controls(1, 20, Some(7))), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(numbers(&page_controls(10, 20, Some(7))), vec![7, 8, 9, 10, 11, 12, 13]);
        assert_eq!(
            numbers(&page_controls(20, 20, Some(7))),
            vec![14, 15, 16, 17, 18, 19, 20]
        );
        assert_eq!(numbers(&page_controls(2, 4, Some(7))), vec![1, 2, 3, 4]);
    }
}
