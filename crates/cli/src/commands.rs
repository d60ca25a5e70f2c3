use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;

use meublerp_api::{DecodePolicy, decode_purchase_order_json};
use meublerp_documents::{PurchaseOrderView, render_print, render_spreadsheet};
use meublerp_purchasing::{DocumentPricing, SupplierPurchaseOrder, price_document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain-text screen view on stdout.
    View,
    /// `.csv` file for spreadsheet software.
    Spreadsheet,
    /// Printable `.html` file.
    Print,
    /// All of the above.
    All,
}

/// Read and decode a purchase order JSON file.
pub fn load_order(path: &Path, policy: DecodePolicy) -> anyhow::Result<SupplierPurchaseOrder> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let decoded = decode_purchase_order_json(&json, policy)
        .with_context(|| format!("failed to decode {}", path.display()))?;

    if !decoded.is_clean() {
        tracing::warn!(
            path = %path.display(),
            issues = decoded.issues.len(),
            "purchase order decoded with coerced fields"
        );
    }
    Ok(decoded.value)
}

#[derive(Debug, Serialize)]
struct TotalsReport<'a> {
    reference: String,
    supplier: &'a str,
    #[serde(flatten)]
    pricing: DocumentPricing,
}

/// Engine output as pretty JSON.
pub fn totals_json(order: &SupplierPurchaseOrder) -> anyhow::Result<String> {
    let report = TotalsReport {
        reference: order.reference(),
        supplier: &order.supplier,
        pricing: price_document(order),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Render `order` in `format`. The view goes to `stdout`; files are written in
/// `out_dir`, whose paths are returned.
pub fn render(
    order: &SupplierPurchaseOrder,
    format: OutputFormat,
    out_dir: &Path,
    stdout: &mut impl Write,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if matches!(format, OutputFormat::View | OutputFormat::All) {
        stdout.write_all(PurchaseOrderView::build(order).to_text().as_bytes())?;
    }

    let wants_spreadsheet = matches!(format, OutputFormat::Spreadsheet | OutputFormat::All);
    let wants_print = matches!(format, OutputFormat::Print | OutputFormat::All);
    if wants_spreadsheet || wants_print {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
    }

    if wants_spreadsheet {
        let path = out_dir.join(format!("{}.csv", file_stem(order)));
        write_file(&path, &render_spreadsheet(order)?)?;
        written.push(path);
    }
    if wants_print {
        let path = out_dir.join(format!("{}.html", file_stem(order)));
        write_file(&path, &render_print(order)?)?;
        written.push(path);
    }

    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "document written");
    Ok(())
}

/// `bon-commande-<reference>`, with anything unsafe in a file name replaced.
fn file_stem(order: &SupplierPurchaseOrder) -> String {
    let reference: String = order
        .reference()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    format!("bon-commande-{reference}")
}
