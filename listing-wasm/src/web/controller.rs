//! 列表页控制器 - 把 `ListingView` 接到页面控件和地址栏上
//!
//! 状态保存在控制器实例里（`Rc<RefCell<Session>>`），事件回调各持有一份引用。

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement, HtmlSelectElement};

use site_common::{parse_posts, parse_products, Catalog};

use super::{dom, loader};
use crate::config::{ListingConfig, ListingKind, ListingOverrides};
use crate::error::{ListingError, Result};
use crate::query::ViewQuery;
use crate::render::{filter_options, message};
use crate::view::{Listing, ListingView};

struct Session {
    view: Box<dyn Listing>,
    config: ListingConfig,
    /// 搜索防抖计时器
    pending_search: Option<i32>,
}

/// 可从页面脚本直接使用的列表控制器
#[wasm_bindgen]
pub struct ListingController {
    session: Rc<RefCell<Session>>,
}

#[wasm_bindgen]
impl ListingController {
    /// 由文章 JSON 文档创建
    #[wasm_bindgen(js_name = fromPosts)]
    pub fn from_posts(json: &str, options: JsValue) -> std::result::Result<ListingController, JsValue> {
        let config = listing_config(ListingKind::Posts, options)?;
        Ok(Self::with_posts_json(json, config)?)
    }

    /// 由产品 JSON 文档创建
    #[wasm_bindgen(js_name = fromProducts)]
    pub fn from_products(json: &str, options: JsValue) -> std::result::Result<ListingController, JsValue> {
        let config = listing_config(ListingKind::Products, options)?;
        Ok(Self::with_products_json(json, config)?)
    }

    /// 由目录快照创建，`kind` 为 "posts" 或 "products"
    #[wasm_bindgen(js_name = fromSnapshot)]
    pub fn from_snapshot(
        data: &[u8],
        kind: &str,
        options: JsValue,
    ) -> std::result::Result<ListingController, JsValue> {
        let kind = match kind {
            "posts" => ListingKind::Posts,
            "products" => ListingKind::Products,
            other => return Err(ListingError::Config(format!("未知的列表类型: {other}")).into()),
        };
        let config = listing_config(kind, options)?;
        let catalog = Catalog::from_snapshot(data).map_err(ListingError::from)?;
        Ok(Self::with_catalog(catalog, config))
    }

    /// 填充筛选下拉框，按地址栏恢复状态，渲染并绑定事件
    pub fn mount(&self) -> std::result::Result<(), JsValue> {
        Ok(self.mount_inner()?)
    }

    /// 重新渲染当前状态并同步地址栏
    pub fn refresh(&self) -> std::result::Result<(), JsValue> {
        Ok(refresh(&self.session)?)
    }

    #[wasm_bindgen(js_name = setQuery)]
    pub fn set_query(&self, query: &str) -> std::result::Result<(), JsValue> {
        let changed = self.session.borrow_mut().view.set_query(query);
        self.refresh_if(changed)
    }

    #[wasm_bindgen(js_name = setCategory)]
    pub fn set_category(&self, category: &str) -> std::result::Result<(), JsValue> {
        let changed = self.session.borrow_mut().view.set_category(category);
        self.refresh_if(changed)
    }

    #[wasm_bindgen(js_name = setTag)]
    pub fn set_tag(&self, tag: &str) -> std::result::Result<(), JsValue> {
        let changed = self.session.borrow_mut().view.set_tag(tag);
        self.refresh_if(changed)
    }

    #[wasm_bindgen(js_name = setPage)]
    pub fn set_page(&self, page: usize) -> std::result::Result<(), JsValue> {
        self.session.borrow_mut().view.set_page(page);
        self.refresh()
    }

    /// 当前状态 `{ query, category, tag, page, totalPages, total }`
    pub fn state(&self) -> std::result::Result<JsValue, JsValue> {
        let state = self.session.borrow().view.state();
        serde_wasm_bindgen::to_value(&state)
            .map_err(|e| JsValue::from_str(&format!("序列化状态失败: {}", e)))
    }

    pub fn categories(&self) -> Vec<String> {
        self.session.borrow().view.categories().to_vec()
    }

    pub fn tags(&self) -> Vec<String> {
        self.session.borrow().view.tags().to_vec()
    }
}

impl ListingController {
    pub fn new(view: Box<dyn Listing>, config: ListingConfig) -> Self {
        Self {
            session: Rc::new(RefCell::new(Session {
                view,
                config,
                pending_search: None,
            })),
        }
    }

    pub fn with_posts_json(json: &str, config: ListingConfig) -> Result<Self> {
        let collection = parse_posts(json)?;
        if collection.skipped > 0 {
            dom::warn(&format!("跳过 {} 篇格式错误的文章", collection.skipped));
        }
        let view = ListingView::new(collection.posts, collection.categories, collection.tags, &config);
        Ok(Self::new(Box::new(view), config))
    }

    pub fn with_products_json(json: &str, config: ListingConfig) -> Result<Self> {
        let collection = parse_products(json)?;
        if collection.skipped > 0 {
            dom::warn(&format!("跳过 {} 个格式错误的产品", collection.skipped));
        }
        let view = ListingView::new(collection.products, collection.categories, Vec::new(), &config);
        Ok(Self::new(Box::new(view), config))
    }

    pub fn with_catalog(catalog: Catalog, config: ListingConfig) -> Self {
        let view: Box<dyn Listing> = match config.kind {
            ListingKind::Posts => Box::new(ListingView::new(
                catalog.posts,
                catalog.post_categories,
                catalog.post_tags,
                &config,
            )),
            ListingKind::Products => Box::new(ListingView::new(
                catalog.products,
                catalog.product_categories,
                Vec::new(),
                &config,
            )),
        };
        Self::new(view, config)
    }

    fn refresh_if(&self, changed: bool) -> std::result::Result<(), JsValue> {
        if changed {
            self.refresh()?;
        }
        Ok(())
    }

    fn mount_inner(&self) -> Result<()> {
        let document = dom::document()?;
        let location = dom::location()?;

        self.session
            .borrow_mut()
            .view
            .restore(ViewQuery::parse(&location.search));

        {
            let session = self.session.borrow();
            let config = &session.config;
            let view = &session.view;
            let criteria = view.criteria();

            if let Some(input) = dom::optional_element(&document, &config.search_input_id) {
                if let Some(input) = input.dyn_ref::<HtmlInputElement>() {
                    input.set_value(&criteria.query);
                }
            }
            if let Some(select) = dom::optional_element(&document, &config.category_select_id) {
                dom::set_html(
                    &select,
                    &filter_options(
                        config.kind.all_categories_label(),
                        view.categories(),
                        criteria.category.as_deref(),
                    ),
                );
            }
            if let Some(select) = dom::optional_element(&document, &config.tag_select_id) {
                dom::set_html(
                    &select,
                    &filter_options(
                        config.kind.all_tags_label(),
                        view.tags(),
                        criteria.tag.as_deref(),
                    ),
                );
            }
        }

        refresh(&self.session)?;
        self.bind_search(&document)?;
        self.bind_select(&document, SelectKind::Category)?;
        self.bind_select(&document, SelectKind::Tag)?;
        self.bind_pagination(&document)?;
        Ok(())
    }

    /// 搜索框输入：防抖后更新关键词
    fn bind_search(&self, document: &web_sys::Document) -> Result<()> {
        let (id, delay) = {
            let session = self.session.borrow();
            (session.config.search_input_id.clone(), session.config.search_debounce_ms)
        };
        let Some(input) = dom::optional_element(document, &id) else {
            return Ok(());
        };

        let session = Rc::clone(&self.session);
        let on_input = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(value) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
            else {
                return;
            };
            if let Err(error) = schedule_search(&session, value, delay) {
                dom::error(&error.to_string());
            }
        });
        input.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        on_input.forget();
        Ok(())
    }

    fn bind_select(&self, document: &web_sys::Document, kind: SelectKind) -> Result<()> {
        let id = {
            let session = self.session.borrow();
            match kind {
                SelectKind::Category => session.config.category_select_id.clone(),
                SelectKind::Tag => session.config.tag_select_id.clone(),
            }
        };
        let Some(select) = dom::optional_element(document, &id) else {
            return Ok(());
        };

        let session = Rc::clone(&self.session);
        let on_change = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(value) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlSelectElement>().ok())
                .map(|select| select.value())
            else {
                return;
            };
            let changed = {
                let mut session = session.borrow_mut();
                match kind {
                    SelectKind::Category => session.view.set_category(&value),
                    SelectKind::Tag => session.view.set_tag(&value),
                }
            };
            if changed {
                if let Err(error) = refresh(&session) {
                    dom::error(&error.to_string());
                }
            }
        });
        select.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        on_change.forget();
        Ok(())
    }

    /// 分页点击：拦截带 `data-page` 的链接，原地重新渲染
    fn bind_pagination(&self, document: &web_sys::Document) -> Result<()> {
        let id = self.session.borrow().config.pagination_id.clone();
        let Some(pagination) = dom::optional_element(document, &id) else {
            return Ok(());
        };

        let session = Rc::clone(&self.session);
        let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let page = event
                .target()
                .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
                .and_then(|target| target.closest("[data-page]").ok().flatten())
                .and_then(|link| link.get_attribute("data-page"))
                .and_then(|page| page.parse::<usize>().ok());
            let Some(page) = page else {
                return;
            };

            event.prevent_default();
            session.borrow_mut().view.set_page(page);
            if let Err(error) = refresh(&session) {
                dom::error(&error.to_string());
                return;
            }
            if let Ok(window) = dom::window() {
                window.scroll_to_with_x_and_y(0.0, 0.0);
            }
        });
        pagination.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum SelectKind {
    Category,
    Tag,
}

/// 重置防抖计时器；到期后应用关键词并渲染
fn schedule_search(session: &Rc<RefCell<Session>>, value: String, delay: i32) -> Result<()> {
    let window = dom::window()?;
    if let Some(handle) = session.borrow_mut().pending_search.take() {
        window.clear_timeout_with_handle(handle);
    }

    if delay <= 0 {
        return apply_search(session, &value);
    }

    let pending = Rc::clone(session);
    let on_timeout = Closure::once(move || {
        pending.borrow_mut().pending_search = None;
        if let Err(error) = apply_search(&pending, &value) {
            dom::error(&error.to_string());
        }
    });
    let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        on_timeout.as_ref().unchecked_ref(),
        delay,
    )?;
    on_timeout.forget();
    session.borrow_mut().pending_search = Some(handle);
    Ok(())
}

fn apply_search(session: &Rc<RefCell<Session>>, value: &str) -> Result<()> {
    let changed = session.borrow_mut().view.set_query(value);
    if changed {
        refresh(session)?;
    }
    Ok(())
}

/// 渲染列表与分页，并用 `replaceState` 写回地址栏
fn refresh(session: &Rc<RefCell<Session>>) -> Result<()> {
    let document = dom::document()?;
    let location = dom::location()?;
    let session = session.borrow();
    let config = &session.config;
    let view = &session.view;

    let container = dom::element(&document, &config.container_id)?;
    dom::set_html(&container, &view.render_list());

    if let Some(pagination) = dom::optional_element(&document, &config.pagination_id) {
        dom::set_html(
            &pagination,
            &view.render_pagination(&location.pathname, &location.search),
        );
    }

    let url = format!(
        "{}?{}",
        location.pathname,
        view.view_query().merge_into(&location.search)
    );
    dom::window()?
        .history()?
        .replace_state_with_url(&JsValue::NULL, "", Some(&url))?;
    Ok(())
}

fn listing_config(kind: ListingKind, options: JsValue) -> Result<ListingConfig> {
    let overrides: ListingOverrides = if options.is_undefined() || options.is_null() {
        ListingOverrides::default()
    } else {
        serde_wasm_bindgen::from_value(options)?
    };
    Ok(overrides.apply(ListingConfig::for_kind(kind)))
}

/// 加载文档并挂载列表；失败时在列表区域显示提示
pub fn load(config: ListingConfig) -> Result<()> {
    let url = config.document_url.clone();
    fetch_and_mount(url, config)
}

fn fetch_and_mount(url: String, config: ListingConfig) -> Result<()> {
    let kind = config.kind;
    let container_id = config.container_id.clone();

    loader::fetch_text(&url, move |result| {
        let mounted = result.and_then(|json| {
            let controller = match kind {
                ListingKind::Posts => ListingController::with_posts_json(&json, config)?,
                ListingKind::Products => ListingController::with_products_json(&json, config)?,
            };
            controller.mount_inner()
        });

        if let Err(error) = mounted {
            dom::error(&format!("列表加载失败: {}", error));
            if let Ok(document) = dom::document() {
                if let Some(container) = dom::optional_element(&document, &container_id) {
                    dom::set_html(&container, &message(kind.load_error_message()));
                }
            }
        }
    })
}
