//! `meublerp-documents`: presentation surfaces of a supplier purchase order.
//!
//! Three renderers, one formula: the screen view ([`viewer`]), the spreadsheet
//! export ([`spreadsheet`]) and the print export ([`print`]) all take their
//! figures from `meublerp_purchasing::price_document`.

pub mod errors;
pub mod format;
pub mod print;
pub mod spreadsheet;
pub mod viewer;

pub use errors::RenderError;
pub use print::render_print;
pub use spreadsheet::{render_spreadsheet, write_spreadsheet};
pub use viewer::{PurchaseOrderView, ViewRow};
