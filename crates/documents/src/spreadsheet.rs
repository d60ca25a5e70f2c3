//! Spreadsheet export (`;`-separated CSV, UTF-8 with BOM).
//!
//! French spreadsheet software expects `;` as the field separator and needs the
//! BOM to detect UTF-8. Amounts are written as plain decimals (`452.2000`) so
//! they are read as numbers, not as text.

use std::io::Write;

use meublerp_purchasing::{SupplierPurchaseOrder, TOTAL_DECIMALS, price_document, round_to};

use crate::errors::RenderError;
use crate::format::format_date;
use crate::viewer::DOCUMENT_TITLE;

pub const DELIMITER: u8 = b';';

pub const UTF8_BOM: &str = "\u{feff}";

/// Table header. The discount column is always present so that exports share
/// one layout.
pub const COLUMNS: [&str; 7] = [
    "Description",
    "Réf/Couleur",
    "Qté",
    "Prix Unit HT",
    "Remise %",
    "Prix Unit TTC",
    "Total TTC",
];

/// Write the export to `writer` (without BOM).
pub fn write_spreadsheet<W: Write>(order: &SupplierPurchaseOrder, writer: W) -> Result<(), RenderError> {
    let pricing = price_document(order);
    let mut csv = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_writer(writer);

    csv.write_record([DOCUMENT_TITLE, order.reference().as_str()])?;
    csv.write_record(["Fournisseur", order.supplier.as_str()])?;
    csv.write_record(["Adresse", order.address.as_deref().unwrap_or("")])?;
    csv.write_record(["GSM", order.phone.as_deref().unwrap_or("")])?;
    csv.write_record(["Date", format_date(order.order_date).as_str()])?;

    csv.write_record(COLUMNS)?;
    for (item, line) in order.articles.iter().zip(&pricing.lines) {
        csv.write_record([
            item.description.clone(),
            item.ref_couleur.clone().unwrap_or_default(),
            line.quantity.to_string(),
            amount(line.unit_price_excl_tax),
            line.discount_percent.to_string(),
            amount(line.unit_price_incl_tax),
            amount(line.line_total_incl_tax),
        ])?;
    }

    csv.write_record(summary_row("Total TTC", amount(pricing.total_incl_tax)))?;
    if order.advance_payment.is_some() {
        csv.write_record(summary_row("Avance", amount(pricing.advance_payment)))?;
    }
    if let Some(settlement) = &order.settlement {
        csv.write_record(summary_row("Règlement", settlement.clone()))?;
    }
    csv.write_record(summary_row("Reste à payer", amount(pricing.balance_due)))?;

    csv.flush()?;
    tracing::debug!(
        order = %order.reference(),
        lines = pricing.lines.len(),
        "spreadsheet export written"
    );
    Ok(())
}

/// Render the export in memory, BOM included.
pub fn render_spreadsheet(order: &SupplierPurchaseOrder) -> Result<String, RenderError> {
    let mut buffer = UTF8_BOM.as_bytes().to_vec();
    write_spreadsheet(order, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Rounded like the engine's totals before printing, so `{:.4}` only pads.
fn amount(value: f64) -> String {
    format!("{:.*}", TOTAL_DECIMALS as usize, round_to(value, TOTAL_DECIMALS))
}

/// Label in the "Prix Unit TTC" column, value under "Total TTC".
fn summary_row(label: &str, value: String) -> Vec<String> {
    let mut row = vec![String::new(); COLUMNS.len() - 2];
    row.push(label.to_string());
    row.push(value);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use meublerp_purchasing::LineItem;

    fn read_rows(export: &str) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_reader(export.trim_start_matches(UTF8_BOM).as_bytes());
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn export_has_header_table_and_totals() {
        let mut order = SupplierPurchaseOrder::new("Atelier Bois Massif")
            .with_article(LineItem::new("Table chêne", 2.0, 100.0).with_ref_couleur("TC-01"))
            .with_article(LineItem::new("Buffet", 1.0, 200.0).with_discount(10.0))
            .with_advance_payment(100.0);
        order.settlement = Some("Chèque".to_string());

        let export = render_spreadsheet(&order).unwrap();
        assert!(export.starts_with(UTF8_BOM));

        let rows = read_rows(&export);
        assert_eq!(rows[0], vec![DOCUMENT_TITLE, "brouillon"]);
        assert_eq!(rows[1], vec!["Fournisseur", "Atelier Bois Massif"]);
        assert_eq!(rows[5], COLUMNS.to_vec());
        assert_eq!(
            rows[6],
            vec!["Table chêne", "TC-01", "2", "100.0000", "0", "119.0000", "238.0000"]
        );
        assert_eq!(
            rows[7],
            vec!["Buffet", "", "1", "200.0000", "10", "214.2000", "214.2000"]
        );
        assert_eq!(rows[8][5..], ["Total TTC", "452.2000"]);
        assert_eq!(rows[9][5..], ["Avance", "100.0000"]);
        assert_eq!(rows[10][5..], ["Règlement", "Chèque"]);
        assert_eq!(rows[11][5..], ["Reste à payer", "352.2000"]);
        assert_eq!(rows.len(), 12);
    }

    #[test]
    fn empty_order_exports_zero_total() {
        let export = render_spreadsheet(&SupplierPurchaseOrder::new("Verrerie Moderne")).unwrap();
        let rows = read_rows(&export);

        assert_eq!(rows[6][5..], ["Total TTC", "0.0000"]);
        assert_eq!(rows.last().unwrap()[5..], ["Reste à payer", "0.0000"]);
    }

    #[test]
    fn line_amounts_use_the_engine_rounding() {
        let order = SupplierPurchaseOrder::new("Quincaillerie Centrale")
            .with_article(LineItem::new("Vis", 1.0, 0.11115));
        let rows = read_rows(&render_spreadsheet(&order).unwrap());

        assert_eq!(rows[6][3], "0.1112");
        assert_eq!(rows[6][3].parse::<f64>().unwrap(), round_to(0.11115, TOTAL_DECIMALS));
    }

    #[test]
    fn separators_inside_fields_are_quoted() {
        let order = SupplierPurchaseOrder::new("Bois; Fer & Co")
            .with_article(LineItem::new("Lot \"premium\"", 1.0, 10.0));
        let export = render_spreadsheet(&order).unwrap();

        assert!(export.contains("\"Bois; Fer & Co\""));
        assert_eq!(read_rows(&export)[6][0], "Lot \"premium\"");
    }
}
