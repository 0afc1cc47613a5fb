//! Response Renderer
//!
//! Writes a resolved [`DashboardModel`] and the flows' status messages to a
//! [`DashboardView`]. The advice list and data table are replaced wholesale on
//! every render.

use crate::resolve::{DashboardModel, RiskClass};
use crate::response::RiskResponse;
use crate::view::{DashboardView, Element};

pub const PROFILE_INCOMPLETE_MESSAGE: &str = "Error: Please complete your profile.";
pub const FETCH_FAILED_MESSAGE: &str = "Error: Failed to fetch health risk data.";
pub const CALCULATING_MESSAGE: &str = "Calculating risk...";
pub const SYNCING_MESSAGE: &str = "Syncing wearable data...";

/// Render a response onto the dashboard
pub fn render_risk<V: DashboardView + ?Sized>(view: &V, response: &RiskResponse) -> DashboardModel {
    let model = DashboardModel::from_response(response);
    render_model(view, &model);
    model
}

/// Write an already-resolved model
pub fn render_model<V: DashboardView + ?Sized>(view: &V, model: &DashboardModel) {
    view.set_text(Element::AqiValue, &model.aqi);
    view.set_text(Element::Pm25Value, &model.pm25);
    view.set_text(Element::Pm10Value, &model.pm10);
    view.set_text(Element::AqiAdvice, &model.aqi_advice);

    view.set_badge(&model.risk, Some(model.risk_class));
    view.set_text(Element::RiskProbability, &model.probability);
    view.set_text(Element::RiskSummary, &model.summary);

    view.replace_list(Element::AdviceList, &model.advice);
    view.replace_table(Element::DataUsed, &model.data_used);
}

/// Transient progress message on the badge, without a status class
pub fn show_status<V: DashboardView + ?Sized>(view: &V, message: &str) {
    view.set_badge(message, None);
}

/// Danger-styled error message on the badge
pub fn show_error<V: DashboardView + ?Sized>(view: &V, message: &str) {
    view.set_badge(message, Some(RiskClass::Danger));
}
