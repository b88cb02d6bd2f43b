//! 站点公共交互：导航高亮、移动端菜单、订阅表单、推荐语轮播

use std::cell::Cell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlFormElement, HtmlInputElement};

use super::dom;
use crate::error::Result;

const TESTIMONIALS_ID: &str = "testimonials-container";
const NEWSLETTER_ID: &str = "newsletter-form";

/// 安装全部公共交互，单项失败只记录日志
pub fn install(document: &Document, page_file: &str, testimonial_interval_ms: i32) {
    let steps: [(&str, Result<()>); 4] = [
        ("导航高亮", mark_active_nav(document, page_file)),
        ("移动端菜单", bind_hamburger(document)),
        ("订阅表单", bind_newsletter(document)),
        ("推荐语轮播", start_testimonials(document, testimonial_interval_ms)),
    ];
    for (name, result) in steps {
        if let Err(error) = result {
            dom::warn(&format!("{name}初始化失败: {error}"));
        }
    }
}

/// 给 href 等于当前文件名的导航链接加上 `active`
fn mark_active_nav(document: &Document, page_file: &str) -> Result<()> {
    let links = document.query_selector_all(".nav-links a")?;
    for index in 0..links.length() {
        let Some(link) = links.get(index).and_then(|node| node.dyn_into::<Element>().ok()) else {
            continue;
        };
        if link.get_attribute("href").as_deref() == Some(page_file) {
            link.class_list().add_1("active")?;
        }
    }
    Ok(())
}

fn bind_hamburger(document: &Document) -> Result<()> {
    let (Some(hamburger), Some(nav)) = (
        document.query_selector(".hamburger")?,
        document.query_selector(".nav-links")?,
    ) else {
        return Ok(());
    };

    let on_click = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        if let Err(error) = nav.class_list().toggle("open") {
            dom::error(&format!("切换菜单失败: {:?}", error));
        }
    });
    hamburger.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

fn bind_newsletter(document: &Document) -> Result<()> {
    let Some(form) = dom::optional_element(document, NEWSLETTER_ID)
        .and_then(|form| form.dyn_into::<HtmlFormElement>().ok())
    else {
        return Ok(());
    };

    let target = form.clone();
    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        let email = target
            .query_selector("input[name=\"email\"]")
            .ok()
            .flatten()
            .and_then(|input| input.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default();

        if let Ok(window) = dom::window() {
            let _ = window.alert_with_message(&subscribe_message(&email));
        }
        target.reset();
    });
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();
    Ok(())
}

fn subscribe_message(email: &str) -> String {
    format!("Subscribed: {email} - integrate with your newsletter service.")
}

/// 每次只显示一个推荐语，按固定间隔轮换
fn start_testimonials(document: &Document, interval_ms: i32) -> Result<()> {
    let Some(root) = dom::optional_element(document, TESTIMONIALS_ID) else {
        return Ok(());
    };
    let children = root.children();
    let items: Vec<Element> = (0..children.length()).filter_map(|i| children.item(i)).collect();
    if items.is_empty() {
        return Ok(());
    }

    for (index, item) in items.iter().enumerate() {
        dom::set_display(item, index == 0)?;
    }
    if items.len() < 2 || interval_ms <= 0 {
        return Ok(());
    }

    let current = Cell::new(0usize);
    let on_tick = Closure::<dyn FnMut()>::new(move || {
        let previous = current.get();
        let next = next_index(previous, items.len());
        current.set(next);
        let shown = dom::set_display(&items[previous], false)
            .and_then(|_| dom::set_display(&items[next], true));
        if let Err(error) = shown {
            dom::warn(&format!("推荐语切换失败: {error}"));
        }
    });
    dom::window()?.set_interval_with_callback_and_timeout_and_arguments_0(
        on_tick.as_ref().unchecked_ref(),
        interval_ms,
    )?;
    on_tick.forget();
    Ok(())
}

/// 轮播的下一个下标
pub fn next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (current + 1) % len
    }
}
