//! DOM bindings
//!
//! [`DomView`] writes the dashboard into the page's existing elements, looked
//! up by id on every call. Elements the page does not have are skipped.

use airhealth::{DashboardView, Element, Navigator, RiskClass};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement, ScrollBehavior, ScrollIntoViewOptions};

pub struct DomView {
    document: Document,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, element: Element) -> Option<web_sys::Element> {
        self.document.get_element_by_id(element.id())
    }

    fn input(&self, element: Element) -> Option<HtmlInputElement> {
        self.element(element)?.dyn_into::<HtmlInputElement>().ok()
    }

    fn append_cell(&self, row: &web_sys::Element, tag: &str, text: &str) {
        if let Ok(cell) = self.document.create_element(tag) {
            cell.set_text_content(Some(text));
            let _ = row.append_child(&cell);
        }
    }
}

impl DashboardView for DomView {
    fn set_text(&self, element: Element, text: &str) {
        if let Some(el) = self.element(element) {
            el.set_text_content(Some(text));
        }
    }

    fn set_badge(&self, text: &str, class: Option<RiskClass>) {
        let Some(badge) = self.element(Element::RiskBadge) else {
            return;
        };

        if let Some(html) = badge.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property("display", "block");
        }
        badge.set_text_content(Some(text));

        let classes = badge.class_list();
        let [good, warning, danger] = RiskClass::ALL.map(|c| c.css_class());
        let _ = classes.remove_3(good, warning, danger);
        if let Some(class) = class {
            let _ = classes.add_1(class.css_class());
        }
    }

    fn replace_list(&self, element: Element, items: &[String]) {
        let Some(list) = self.element(element) else {
            return;
        };

        list.set_inner_html("");
        for item in items {
            if let Ok(li) = self.document.create_element("li") {
                li.set_text_content(Some(item));
                let _ = list.append_child(&li);
            }
        }
    }

    fn replace_table(&self, element: Element, rows: &[(String, String)]) {
        let Some(table) = self.element(element) else {
            return;
        };

        table.set_inner_html("");
        for (key, value) in rows {
            if let Ok(tr) = self.document.create_element("tr") {
                self.append_cell(&tr, "th", key);
                self.append_cell(&tr, "td", value);
                let _ = table.append_child(&tr);
            }
        }
    }

    fn input_value(&self, element: Element) -> Option<String> {
        self.input(element).map(|input| input.value())
    }

    fn set_input_value(&self, element: Element, value: &str) {
        if let Some(input) = self.input(element) {
            input.set_value(value);
        }
    }

    fn scroll_into_view(&self, element: Element) {
        if let Some(el) = self.element(element) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            el.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }
}

/// Navigation by setting `window.location.href`
pub struct WindowNavigator;

impl Navigator for WindowNavigator {
    fn navigate(&self, page: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(page) {
                web_sys::console::error_1(&format!("Navigation to {} failed: {:?}", page, e).into());
            }
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn mount(tag: &str, id: &str) -> web_sys::Element {
        let document = document();
        if let Some(existing) = document.get_element_by_id(id) {
            existing.remove();
        }
        let el = document.create_element(tag).unwrap();
        el.set_id(id);
        document.body().unwrap().append_child(&el).unwrap();
        el
    }

    #[wasm_bindgen_test]
    fn test_badge_classes_are_replaced() {
        let badge = mount("div", "risk-badge");
        let view = DomView::new(document());

        view.set_badge("Low Risk", Some(RiskClass::Good));
        view.set_badge("High", Some(RiskClass::Danger));

        assert_eq!(badge.text_content().as_deref(), Some("High"));
        assert!(badge.class_list().contains("status-danger"));
        assert!(!badge.class_list().contains("status-good"));
    }

    #[wasm_bindgen_test]
    fn test_advice_list_is_rebuilt() {
        let list = mount("ul", "advice-list");
        let view = DomView::new(document());

        view.replace_list(Element::AdviceList, &["a".to_string(), "b".to_string()]);
        view.replace_list(Element::AdviceList, &["c".to_string()]);

        assert_eq!(list.children().length(), 1);
        assert_eq!(list.text_content().as_deref(), Some("c"));
    }

    #[wasm_bindgen_test]
    fn test_missing_elements_are_skipped() {
        let view = DomView::new(document());
        view.set_text(Element::Pm10Value, "88");
        assert_eq!(view.input_value(Element::WearableCoughInput), None);
    }
}
