//! Screen view of a supplier purchase order.
//!
//! [`PurchaseOrderView`] is the formatted model the interactive screen shows;
//! the print export renders the same model through an HTML template.

use meublerp_purchasing::{DocumentPricing, LineItem, LinePricing, SupplierPurchaseOrder, price_document};

use crate::format::{format_amount, format_date, format_percent, format_quantity};

pub const DOCUMENT_TITLE: &str = "Bon de commande fournisseur";

const COLUMNS_BEFORE_DISCOUNT: [&str; 4] = ["Description", "Réf/Couleur", "Qté", "Prix Unit HT"];
const DISCOUNT_COLUMNS: [&str; 2] = ["Remise %", "Prix Unit HT net"];
const COLUMNS_AFTER_DISCOUNT: [&str; 2] = ["Prix Unit TTC", "Total TTC"];

/// One formatted table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub description: String,
    pub ref_couleur: String,
    pub quantity: String,
    pub unit_price_excl_tax: String,
    pub discount_percent: String,
    pub net_unit_price_excl_tax: String,
    pub unit_price_incl_tax: String,
    pub line_total_incl_tax: String,
}

impl ViewRow {
    fn new(item: &LineItem, pricing: &LinePricing) -> Self {
        Self {
            description: item.description.clone(),
            ref_couleur: item.ref_couleur.clone().unwrap_or_default(),
            quantity: format_quantity(pricing.quantity),
            unit_price_excl_tax: format_amount(pricing.unit_price_excl_tax),
            discount_percent: format_percent(pricing.discount_percent),
            net_unit_price_excl_tax: format_amount(pricing.net_unit_price_excl_tax),
            unit_price_incl_tax: format_amount(pricing.unit_price_incl_tax),
            line_total_incl_tax: format_amount(pricing.line_total_incl_tax),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrderView {
    pub reference: String,
    pub supplier: String,
    pub address: String,
    pub phone: String,
    pub order_date: String,
    /// Discount columns are only shown when some article is discounted.
    pub show_discount: bool,
    pub rows: Vec<ViewRow>,
    pub total_incl_tax: String,
    pub advance_payment: Option<String>,
    pub settlement: Option<String>,
    pub balance_due: String,
    /// Exact figures behind the formatted strings.
    pub pricing: DocumentPricing,
}

impl PurchaseOrderView {
    pub fn build(order: &SupplierPurchaseOrder) -> Self {
        let pricing = price_document(order);
        let rows = order
            .articles
            .iter()
            .zip(&pricing.lines)
            .map(|(item, line)| ViewRow::new(item, line))
            .collect();

        Self {
            reference: order.reference(),
            supplier: order.supplier.clone(),
            address: order.address.clone().unwrap_or_default(),
            phone: order.phone.clone().unwrap_or_default(),
            order_date: format_date(order.order_date),
            show_discount: pricing.has_discount,
            rows,
            total_incl_tax: format_amount(pricing.total_incl_tax),
            advance_payment: order.advance_payment.map(|_| format_amount(pricing.advance_payment)),
            settlement: order.settlement.clone(),
            balance_due: format_amount(pricing.balance_due),
            pricing,
        }
    }

    pub fn title(&self) -> String {
        format!("{DOCUMENT_TITLE} N° {}", self.reference)
    }

    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = COLUMNS_BEFORE_DISCOUNT.to_vec();
        if self.show_discount {
            columns.extend(DISCOUNT_COLUMNS);
        }
        columns.extend(COLUMNS_AFTER_DISCOUNT);
        columns
    }

    /// Cells of a row, matching [`Self::columns`].
    pub fn cells<'a>(&self, row: &'a ViewRow) -> Vec<&'a str> {
        let mut cells = vec![
            row.description.as_str(),
            row.ref_couleur.as_str(),
            row.quantity.as_str(),
            row.unit_price_excl_tax.as_str(),
        ];
        if self.show_discount {
            cells.push(&row.discount_percent);
            cells.push(&row.net_unit_price_excl_tax);
        }
        cells.push(&row.unit_price_incl_tax);
        cells.push(&row.line_total_incl_tax);
        cells
    }

    /// Label/value pairs of the totals block.
    pub fn summary(&self) -> Vec<(&'static str, &str)> {
        let mut summary = vec![("Total TTC", self.total_incl_tax.as_str())];
        if let Some(advance) = &self.advance_payment {
            summary.push(("Avance", advance.as_str()));
        }
        if let Some(settlement) = &self.settlement {
            summary.push(("Règlement", settlement.as_str()));
        }
        summary.push(("Reste à payer", self.balance_due.as_str()));
        summary
    }

    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        let columns = self.columns();
        let body: Vec<Vec<&str>> = self.rows.iter().map(|row| self.cells(row)).collect();

        let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
        for cells in &body {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        out.push_str(&self.title());
        out.push('\n');
        for (label, value) in [
            ("Fournisseur", self.supplier.as_str()),
            ("Adresse", self.address.as_str()),
            ("GSM", self.phone.as_str()),
            ("Date", self.order_date.as_str()),
        ] {
            if !value.is_empty() {
                out.push_str(&format!("{label}: {value}\n"));
            }
        }
        out.push('\n');

        out.push_str(&text_line(&columns, &widths));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&text_line(&rule.iter().map(String::as_str).collect::<Vec<_>>(), &widths));
        for cells in &body {
            out.push_str(&text_line(cells, &widths));
        }
        out.push('\n');

        let label_width = self
            .summary()
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        for (label, value) in self.summary() {
            out.push_str(&format!("{}{} : {value}\n", label, pad(label, label_width)));
        }
        out
    }
}

fn text_line(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell}{}", pad(cell, *width)))
        .collect();
    format!("{}\n", padded.join(" | ").trim_end())
}

fn pad(text: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(text.chars().count()))
}
