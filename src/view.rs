//! Dashboard View Bindings
//!
//! The controller never looks elements up itself. It writes through a
//! [`DashboardView`], which the browser crate implements over the DOM and
//! [`MemoryView`] implements in memory for the terminal front end and tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::resolve::RiskClass;

/// Display elements and controls shared with the dashboard page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Element {
    RiskBadge,
    RiskProbability,
    RiskSummary,
    AdviceList,
    DataUsed,
    AqiValue,
    Pm25Value,
    Pm10Value,
    AqiAdvice,
    CalculateRiskButton,
    SyncWearableButton,
    WearableHeartRateInput,
    WearableSpo2Input,
    WearableCoughInput,
    LogoutButton,
}

impl Element {
    pub const ALL: [Element; 15] = [
        Element::RiskBadge,
        Element::RiskProbability,
        Element::RiskSummary,
        Element::AdviceList,
        Element::DataUsed,
        Element::AqiValue,
        Element::Pm25Value,
        Element::Pm10Value,
        Element::AqiAdvice,
        Element::CalculateRiskButton,
        Element::SyncWearableButton,
        Element::WearableHeartRateInput,
        Element::WearableSpo2Input,
        Element::WearableCoughInput,
        Element::LogoutButton,
    ];

    /// The three wearable input fields, in payload order
    pub const WEARABLE_INPUTS: [Element; 3] = [
        Element::WearableHeartRateInput,
        Element::WearableSpo2Input,
        Element::WearableCoughInput,
    ];

    /// DOM id of the element
    pub fn id(&self) -> &'static str {
        match self {
            Element::RiskBadge => "risk-badge",
            Element::RiskProbability => "risk-probability",
            Element::RiskSummary => "risk-summary",
            Element::AdviceList => "advice-list",
            Element::DataUsed => "data-used",
            Element::AqiValue => "aqi-value",
            Element::Pm25Value => "pm25-value",
            Element::Pm10Value => "pm10-value",
            Element::AqiAdvice => "aqi-advice",
            Element::CalculateRiskButton => "calculate-risk-btn",
            Element::SyncWearableButton => "sync-wearable",
            Element::WearableHeartRateInput => "wearable-hr-input",
            Element::WearableSpo2Input => "wearable-spo2-input",
            Element::WearableCoughInput => "wearable-cough-input",
            Element::LogoutButton => "logout-btn",
        }
    }
}

/// Write access to the dashboard's display elements
///
/// Every method is a no-op when the target element does not exist.
pub trait DashboardView {
    /// Replace the text content of an element
    fn set_text(&self, element: Element, text: &str);

    /// Show the risk badge with the given text, replacing any status class
    fn set_badge(&self, text: &str, class: Option<RiskClass>);

    /// Replace the entries of a list element
    fn replace_list(&self, element: Element, items: &[String]);

    /// Replace the rows of a key/value table element
    fn replace_table(&self, element: Element, rows: &[(String, String)]);

    /// Current value of an input element
    fn input_value(&self, element: Element) -> Option<String>;

    /// Set the value of an input element
    fn set_input_value(&self, element: Element, value: &str);

    /// Bring an element into view
    fn scroll_into_view(&self, element: Element);
}

/// Risk badge contents
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BadgeState {
    pub text: String,
    pub class: Option<RiskClass>,
    pub visible: bool,
}

/// Point-in-time copy of a [`MemoryView`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub badge: BadgeState,
    pub aqi: Option<String>,
    pub pm25: Option<String>,
    pub pm10: Option<String>,
    pub aqi_advice: Option<String>,
    pub probability: Option<String>,
    pub summary: Option<String>,
    pub advice: Vec<String>,
    pub data_used: Vec<(String, String)>,
    pub wearable: WearableInputs,
}

/// Values of the wearable input fields
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WearableInputs {
    pub heart_rate: String,
    pub spo2: String,
    pub cough_count: String,
}

#[derive(Debug, Default)]
struct ViewState {
    badge: BadgeState,
    texts: HashMap<Element, String>,
    lists: HashMap<Element, Vec<String>>,
    tables: HashMap<Element, Vec<(String, String)>>,
    inputs: HashMap<Element, String>,
    scrolled: Vec<Element>,
}

/// In-memory dashboard page
///
/// All elements exist unless removed with [`MemoryView::without`].
#[derive(Debug, Default)]
pub struct MemoryView {
    state: RefCell<ViewState>,
    missing: HashSet<Element>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// View whose page lacks the given elements
    pub fn without(elements: &[Element]) -> Self {
        Self {
            state: RefCell::default(),
            missing: elements.iter().copied().collect(),
        }
    }

    fn has(&self, element: Element) -> bool {
        !self.missing.contains(&element)
    }

    pub fn badge(&self) -> BadgeState {
        self.state.borrow().badge.clone()
    }

    pub fn text(&self, element: Element) -> Option<String> {
        self.state.borrow().texts.get(&element).cloned()
    }

    pub fn list(&self, element: Element) -> Vec<String> {
        self.state.borrow().lists.get(&element).cloned().unwrap_or_default()
    }

    pub fn table(&self, element: Element) -> Vec<(String, String)> {
        self.state.borrow().tables.get(&element).cloned().unwrap_or_default()
    }

    /// Elements scrolled into view, oldest first
    pub fn scrolled(&self) -> Vec<Element> {
        self.state.borrow().scrolled.clone()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let input = |element| self.input_value(element).unwrap_or_default();
        DashboardSnapshot {
            badge: self.badge(),
            aqi: self.text(Element::AqiValue),
            pm25: self.text(Element::Pm25Value),
            pm10: self.text(Element::Pm10Value),
            aqi_advice: self.text(Element::AqiAdvice),
            probability: self.text(Element::RiskProbability),
            summary: self.text(Element::RiskSummary),
            advice: self.list(Element::AdviceList),
            data_used: self.table(Element::DataUsed),
            wearable: WearableInputs {
                heart_rate: input(Element::WearableHeartRateInput),
                spo2: input(Element::WearableSpo2Input),
                cough_count: input(Element::WearableCoughInput),
            },
        }
    }
}

impl DashboardView for MemoryView {
    fn set_text(&self, element: Element, text: &str) {
        if self.has(element) {
            self.state.borrow_mut().texts.insert(element, text.to_string());
        }
    }

    fn set_badge(&self, text: &str, class: Option<RiskClass>) {
        if self.has(Element::RiskBadge) {
            self.state.borrow_mut().badge = BadgeState {
                text: text.to_string(),
                class,
                visible: true,
            };
        }
    }

    fn replace_list(&self, element: Element, items: &[String]) {
        if self.has(element) {
            self.state.borrow_mut().lists.insert(element, items.to_vec());
        }
    }

    fn replace_table(&self, element: Element, rows: &[(String, String)]) {
        if self.has(element) {
            self.state.borrow_mut().tables.insert(element, rows.to_vec());
        }
    }

    fn input_value(&self, element: Element) -> Option<String> {
        if !self.has(element) {
            return None;
        }
        Some(self.state.borrow().inputs.get(&element).cloned().unwrap_or_default())
    }

    fn set_input_value(&self, element: Element, value: &str) {
        if self.has(element) {
            self.state.borrow_mut().inputs.insert(element, value.to_string());
        }
    }

    fn scroll_into_view(&self, element: Element) {
        if self.has(element) {
            self.state.borrow_mut().scrolled.push(element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids_are_unique() {
        let ids: HashSet<_> = Element::ALL.iter().map(Element::id).collect();
        assert_eq!(ids.len(), Element::ALL.len());
        assert_eq!(Element::WearableHeartRateInput.id(), "wearable-hr-input");
    }

    #[test]
    fn test_memory_view_replaces_lists() {
        let view = MemoryView::new();
        view.replace_list(Element::AdviceList, &["a".to_string(), "b".to_string()]);
        view.replace_list(Element::AdviceList, &["c".to_string()]);
        assert_eq!(view.list(Element::AdviceList), vec!["c"]);
    }

    #[test]
    fn test_missing_elements_are_skipped() {
        let view = MemoryView::without(&[Element::RiskBadge, Element::WearableSpo2Input]);
        view.set_badge("High", Some(RiskClass::Danger));
        view.set_input_value(Element::WearableSpo2Input, "97");

        assert_eq!(view.badge(), BadgeState::default());
        assert_eq!(view.input_value(Element::WearableSpo2Input), None);
        assert_eq!(view.input_value(Element::WearableHeartRateInput), Some(String::new()));
    }
}
