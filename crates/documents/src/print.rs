//! Print export: a standalone HTML page, ready for the browser's print dialog.

use askama::Template;

use meublerp_purchasing::{SupplierPurchaseOrder, VAT_RATE};

use crate::errors::RenderError;
use crate::viewer::PurchaseOrderView;

#[derive(Template)]
#[template(path = "purchase_order.html")]
struct PurchaseOrderPage<'a> {
    view: &'a PurchaseOrderView,
    title: String,
    vat_label: String,
}

/// Render the printable page. Values are taken from the same view model as the
/// screen, so the two always show the same figures.
pub fn render_print(order: &SupplierPurchaseOrder) -> Result<String, RenderError> {
    let view = PurchaseOrderView::build(order);
    render_view(&view)
}

pub fn render_view(view: &PurchaseOrderView) -> Result<String, RenderError> {
    let page = PurchaseOrderPage {
        view,
        title: view.title(),
        vat_label: vat_label(),
    };
    Ok(page.render()?)
}

/// `"TVA 19%"`.
pub fn vat_label() -> String {
    format!("TVA {}%", (VAT_RATE * 100.0).round())
}
