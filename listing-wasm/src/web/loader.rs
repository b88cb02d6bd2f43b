//! 文档加载 - fetch(cache: no-cache) 后取响应文本

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{RequestCache, RequestInit, Response};

use super::dom;
use crate::error::{ListingError, Result};

type Callback = Box<dyn FnOnce(Result<String>)>;

/// 异步读取文本文档，完成后调用一次 `on_done`
///
/// 失败（网络错误、非 2xx 状态）同样通过 `on_done` 返回，不会重试。
pub fn fetch_text<F>(url: &str, on_done: F) -> Result<()>
where
    F: FnOnce(Result<String>) + 'static,
{
    let init = RequestInit::new();
    init.set_cache(RequestCache::NoCache);
    let request = dom::window()?.fetch_with_str_and_init(url, &init);

    let slot: Rc<RefCell<Option<Callback>>> = Rc::new(RefCell::new(Some(Box::new(on_done))));
    let finish = move |result: Result<String>| {
        let callback = slot.borrow_mut().take();
        if let Some(callback) = callback {
            callback(result);
        }
    };
    let finish = Rc::new(finish);

    let url = url.to_string();
    let on_response = {
        let finish = Rc::clone(&finish);
        Closure::once(move |value: JsValue| {
            match read_body(value, &url) {
                Ok(text) => {
                    let on_text = {
                        let finish = Rc::clone(&finish);
                        Closure::once(move |text: JsValue| {
                            finish(text.as_string().ok_or_else(|| {
                                ListingError::Dom("响应内容不是文本".to_string())
                            }));
                        })
                    };
                    let on_error = rejection(Rc::clone(&finish));
                    let _ = text.then2(&on_text, &on_error);
                    on_text.forget();
                    on_error.forget();
                }
                Err(error) => finish(Err(error)),
            }
        })
    };
    let on_error = rejection(finish);

    let _ = request.then2(&on_response, &on_error);
    // 回调只会被调用一次，交给 JS 侧持有
    on_response.forget();
    on_error.forget();
    Ok(())
}

/// 检查状态码并开始读取响应体
fn read_body(value: JsValue, url: &str) -> Result<Promise> {
    let response: Response = value.dyn_into()?;
    if !response.ok() {
        return Err(ListingError::Dom(format!(
            "加载 {} 失败: HTTP {}",
            url,
            response.status()
        )));
    }
    Ok(response.text()?)
}

fn rejection(finish: Rc<impl Fn(Result<String>) + 'static>) -> Closure<dyn FnMut(JsValue)> {
    Closure::once(move |reason: JsValue| finish(Err(ListingError::from(reason))))
}
