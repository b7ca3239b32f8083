//! Invoice PDF generation.
//!
//! One PDF per order, written to the configured invoice directory as
//! `invoice-<order id>.pdf`. Generation is synchronous file I/O, so callers
//! run it on the blocking pool. A missing file is regenerated on download,
//! which is why a failed write at checkout is logged rather than fatal.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, Mm, PdfDocument};
use thiserror::Error;

use swiftcart_core::OrderId;

use crate::models::{Order, OrderItem};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 8.0;

/// Errors that can occur while rendering an invoice.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Filesystem error creating the directory or file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF rendering error.
    #[error("pdf error: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// Path where an order's invoice lives (whether or not it exists yet).
#[must_use]
pub fn invoice_path(dir: &Path, order_id: OrderId) -> PathBuf {
    dir.join(format!("invoice-{order_id}.pdf"))
}

/// Render and write the invoice PDF for one order.
///
/// Returns the path the file was written to.
///
/// # Errors
///
/// Returns `InvoiceError` if the directory cannot be created, rendering
/// fails, or the file cannot be written.
pub fn generate_invoice(
    dir: &Path,
    order: &Order,
    items: &[OrderItem],
    customer_name: &str,
) -> Result<PathBuf, InvoiceError> {
    std::fs::create_dir_all(dir)?;
    let path = invoice_path(dir, order.id);

    let (doc, page, layer) = PdfDocument::new(
        "SwiftCart Invoice",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let layer = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - 25.0;

    layer.use_text("SwiftCart Invoice", 20.0, Mm(70.0), Mm(y), &bold);
    y -= 2.0 * LINE_HEIGHT_MM;

    let header = [
        format!("Order ID: {}", order.id),
        format!("Customer: {customer_name}"),
        format!("Date: {}", order.created_at.format("%Y-%m-%d %H:%M UTC")),
        format!("Payment Method: {:?}", order.payment_method),
    ];
    for text in header {
        layer.use_text(text, 12.0, Mm(LEFT_MARGIN_MM), Mm(y), &font);
        y -= LINE_HEIGHT_MM;
    }

    y -= LINE_HEIGHT_MM;
    layer.use_text("Items:", 14.0, Mm(LEFT_MARGIN_MM), Mm(y), &bold);
    y -= LINE_HEIGHT_MM;

    for (idx, item) in items.iter().enumerate() {
        let text = format!(
            "{}. {} | Qty: {} | Unit: Rs. {}",
            idx + 1,
            item.product_name,
            item.qty,
            item.unit_price
        );
        layer.use_text(text, 12.0, Mm(LEFT_MARGIN_MM), Mm(y), &font);
        y -= LINE_HEIGHT_MM;
    }

    y -= LINE_HEIGHT_MM;
    layer.use_text(
        format!("Total: Rs. {}", order.total),
        14.0,
        Mm(LEFT_MARGIN_MM),
        Mm(y),
        &bold,
    );

    doc.save(&mut BufWriter::new(File::create(&path)?))?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::order::ShippingRow;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use swiftcart_core::{OrderStatus, PaymentMethod, ProductId, UserId};

    fn sample_order() -> Order {
        Order {
            id: OrderId::new(7),
            customer_id: UserId::new(1),
            vendor_id: UserId::new(2),
            total: dec!(42.50),
            status: OrderStatus::Ordered,
            payment_method: PaymentMethod::Cash,
            shipping: ShippingRow {
                shipping_name: "Test Customer".to_string(),
                shipping_phone: "9876543210".to_string(),
                shipping_address: "1 Test Street".to_string(),
                shipping_pin: "600001".to_string(),
                shipping_state: "TN".to_string(),
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_invoice_path_naming() {
        let path = invoice_path(Path::new("invoices"), OrderId::new(123));
        assert_eq!(path, PathBuf::from("invoices/invoice-123.pdf"));
    }

    #[test]
    fn test_generate_invoice_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let items = vec![
            OrderItem {
                product_id: ProductId::new(1),
                product_name: "Blue Mug".to_string(),
                qty: 2,
                unit_price: dec!(10.00),
            },
            OrderItem {
                product_id: ProductId::new(2),
                product_name: "Tea Sampler".to_string(),
                qty: 1,
                unit_price: dec!(22.50),
            },
        ];

        let path = generate_invoice(dir.path(), &sample_order(), &items, "Test Customer").unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_generate_invoice_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");

        let path = generate_invoice(&nested, &sample_order(), &[], "Test Customer").unwrap();
        assert!(path.exists());
    }
}
