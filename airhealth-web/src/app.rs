//! App start-up
//!
//! Loads the dashboard controller once the DOM is ready and attaches the
//! click handlers. Each click runs one flow as its own task; flows started by
//! overlapping clicks are not serialized.

use std::rc::Rc;

use airhealth::{DashboardController, Element, FlowOutcome, SessionKeys, StoreError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, DocumentReadyState, Event};

use crate::api::{get_api_base, FetchRiskClient};
use crate::dom::{DomView, WindowNavigator};
use crate::storage::LocalStorageStore;

type Dashboard = DashboardController<LocalStorageStore, DomView, FetchRiskClient, WindowNavigator>;

/// Start now if the DOM is parsed, otherwise on `DOMContentLoaded`
pub fn start_when_ready() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        web_sys::console::error_1(&"AirHealth dashboard: no document".into());
        return;
    };

    if document.ready_state() != DocumentReadyState::Loading {
        start(&document);
        return;
    }

    let doc = document.clone();
    let on_ready = Closure::wrap(Box::new(move |_: Event| {
        start(&doc);
    }) as Box<dyn FnMut(Event)>);
    let _ = document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref());
    on_ready.forget();
}

fn start(document: &Document) {
    match load(document) {
        Ok(Some(dashboard)) => attach_handlers(document, Rc::new(dashboard)),
        Ok(None) => {}
        Err(e) => {
            web_sys::console::error_1(&format!("AirHealth dashboard failed to load: {}", e).into())
        }
    }
}

fn load(document: &Document) -> Result<Option<Dashboard>, StoreError> {
    let store = LocalStorageStore::new()?;
    DashboardController::load(
        store,
        SessionKeys::default(),
        DomView::new(document.clone()),
        FetchRiskClient::new(&get_api_base()),
        WindowNavigator,
    )
}

fn attach_handlers(document: &Document, dashboard: Rc<Dashboard>) {
    let calculate = Rc::clone(&dashboard);
    on_click(document, Element::CalculateRiskButton, true, move || {
        let dashboard = Rc::clone(&calculate);
        spawn_local(async move {
            report(dashboard.calculate_risk().await);
        });
    });

    let sync = Rc::clone(&dashboard);
    on_click(document, Element::SyncWearableButton, true, move || {
        let dashboard = Rc::clone(&sync);
        spawn_local(async move {
            report(dashboard.sync_wearable().await);
        });
    });

    on_click(document, Element::LogoutButton, false, move || {
        if let Err(e) = dashboard.logout() {
            web_sys::console::error_1(&format!("Logout failed: {}", e).into());
        }
    });
}

/// Attach a click handler if the page has the element
fn on_click<F>(document: &Document, element: Element, prevent_default: bool, handler: F)
where
    F: Fn() + 'static,
{
    let Some(target) = document.get_element_by_id(element.id()) else {
        return;
    };

    let on_click = Closure::wrap(Box::new(move |event: Event| {
        if prevent_default {
            event.prevent_default();
        }
        handler();
    }) as Box<dyn FnMut(Event)>);
    let _ = target.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
    on_click.forget();
}

fn report(outcome: FlowOutcome) {
    if let FlowOutcome::Failed(err) = outcome {
        web_sys::console::error_1(&format!("Health risk request failed: {}", err).into());
    }
}
