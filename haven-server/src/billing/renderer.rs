//! Bill PDF renderer
//!
//! Renders a persisted order into an A4 tax invoice.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};

use super::TaxBreakdown;
use crate::db::models::{Order, OrderType};
use crate::utils::AppError;

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN_LEFT: f64 = 18.0;
const MARGIN_RIGHT: f64 = 192.0;
/// 低于此高度换页
const BOTTOM_MARGIN: f64 = 25.0;

/// 表格列 x 坐标
const COL_ITEM: f64 = 22.0;
const COL_QTY: f64 = 112.0;
const COL_PRICE: f64 = 134.0;
const COL_AMOUNT: f64 = 164.0;

/// Bill renderer
///
/// 信头是固定文案；每次 render 生成一份完整的 PDF 字节流。
pub struct BillRenderer {
    restaurant_name: &'static str,
    tagline: &'static str,
    address: &'static str,
    contact: &'static str,
    gstin: &'static str,
}

impl Default for BillRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl BillRenderer {
    pub fn new() -> Self {
        Self {
            restaurant_name: "GOURMET HAVEN",
            tagline: "Fine Dining Excellence",
            address: "123 Culinary Street, Food District, Gourmet City, GC 12345",
            contact: "Phone: +91 98765 43210 | Email: info@gourmethaven.com",
            gstin: "GSTIN: 29AABCU9603R1ZX",
        }
    }

    /// Render an order to PDF bytes
    pub fn render(&self, order: &Order) -> Result<Vec<u8>, AppError> {
        let (doc, page, layer) =
            PdfDocument::new("Tax Invoice", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::internal(format!("PDF font error: {e}")))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::internal(format!("PDF font error: {e}")))?;

        let mut layer = doc.get_page(page).get_layer(layer);
        let mut y = PAGE_HEIGHT - 18.0;

        self.render_letterhead(&layer, &font, &font_bold, &mut y);
        self.render_meta(&layer, &font, &font_bold, order, &mut y);
        self.render_items(&doc, &mut layer, &font, &font_bold, order, &mut y);
        self.render_totals(&doc, &mut layer, &font, &font_bold, order, &mut y);
        self.render_footer(&doc, &mut layer, &font, &font_bold, &mut y);

        let mut bytes: Vec<u8> = Vec::new();
        {
            let mut writer = std::io::BufWriter::new(&mut bytes);
            doc.save(&mut writer)
                .map_err(|e| AppError::internal(format!("PDF write error: {e}")))?;
        }
        Ok(bytes)
    }

    fn render_letterhead(
        &self,
        layer: &PdfLayerReference,
        font: &IndirectFontRef,
        font_bold: &IndirectFontRef,
        y: &mut f64,
    ) {
        layer.set_fill_color(accent());
        layer.use_text(self.restaurant_name, 24.0, Mm(62.0), Mm(*y), font_bold);
        *y -= 7.0;

        layer.set_fill_color(gray());
        layer.use_text(self.tagline, 12.0, Mm(84.0), Mm(*y), font);
        *y -= 8.0;

        layer.set_fill_color(dark());
        layer.use_text(self.address, 10.0, Mm(50.0), Mm(*y), font);
        *y -= 5.0;
        layer.use_text(self.contact, 10.0, Mm(56.0), Mm(*y), font);
        *y -= 5.0;
        layer.use_text(self.gstin, 10.0, Mm(80.0), Mm(*y), font);
        *y -= 7.0;

        layer.set_outline_color(accent());
        layer.set_outline_thickness(1.5);
        hline(layer, *y, MARGIN_LEFT, MARGIN_RIGHT);
        *y -= 9.0;

        layer.set_fill_color(heading());
        layer.use_text("TAX INVOICE", 16.0, Mm(83.0), Mm(*y), font_bold);
        *y -= 11.0;
    }

    fn render_meta(
        &self,
        layer: &PdfLayerReference,
        font: &IndirectFontRef,
        font_bold: &IndirectFontRef,
        order: &Order,
        y: &mut f64,
    ) {
        let left = MARGIN_LEFT;
        let right = 120.0;

        layer.set_fill_color(dark());

        layer.use_text("Order ID:", 10.0, Mm(left), Mm(*y), font_bold);
        layer.use_text(
            format!("#{}", order.short_id()),
            10.0,
            Mm(left + 28.0),
            Mm(*y),
            font,
        );
        layer.use_text("Date:", 10.0, Mm(right), Mm(*y), font_bold);
        layer.use_text(
            order.created_at.format("%d/%m/%Y").to_string(),
            10.0,
            Mm(right + 28.0),
            Mm(*y),
            font,
        );
        *y -= 7.0;

        layer.use_text("Type:", 10.0, Mm(left), Mm(*y), font_bold);
        layer.use_text(
            format!("{:?}", order.order_type),
            10.0,
            Mm(left + 28.0),
            Mm(*y),
            font,
        );
        layer.use_text("Time:", 10.0, Mm(right), Mm(*y), font_bold);
        layer.use_text(
            order.created_at.format("%H:%M").to_string(),
            10.0,
            Mm(right + 28.0),
            Mm(*y),
            font,
        );
        *y -= 7.0;

        if order.order_type == OrderType::Online {
            layer.use_text("Phone:", 10.0, Mm(left), Mm(*y), font_bold);
            layer.use_text(
                order.customer_phone.as_deref().unwrap_or("N/A"),
                10.0,
                Mm(left + 28.0),
                Mm(*y),
                font,
            );
            *y -= 7.0;

            layer.use_text("Address:", 10.0, Mm(left), Mm(*y), font_bold);
            layer.use_text(
                order.delivery_address.as_deref().unwrap_or("N/A"),
                10.0,
                Mm(left + 28.0),
                Mm(*y),
                font,
            );
            *y -= 7.0;
        } else {
            layer.use_text("Table:", 10.0, Mm(left), Mm(*y), font_bold);
            layer.use_text(
                order.table.as_deref().unwrap_or("N/A"),
                10.0,
                Mm(left + 28.0),
                Mm(*y),
                font,
            );
            if let Some(token) = &order.token {
                layer.use_text("Token:", 10.0, Mm(right), Mm(*y), font_bold);
                layer.use_text(token.as_str(), 10.0, Mm(right + 28.0), Mm(*y), font);
            }
            *y -= 7.0;
        }

        layer.use_text("Customer:", 10.0, Mm(left), Mm(*y), font_bold);
        layer.use_text(order.customer.as_str(), 10.0, Mm(left + 28.0), Mm(*y), font);
        *y -= 7.0;

        if let Some(instructions) = &order.instructions {
            layer.use_text("Instructions:", 10.0, Mm(left), Mm(*y), font_bold);
            layer.use_text(instructions.as_str(), 10.0, Mm(left + 28.0), Mm(*y), font);
            *y -= 7.0;
        }

        *y -= 4.0;
    }

    fn render_items(
        &self,
        doc: &PdfDocumentReference,
        layer: &mut PdfLayerReference,
        font: &IndirectFontRef,
        font_bold: &IndirectFontRef,
        order: &Order,
        y: &mut f64,
    ) {
        layer.set_outline_color(rule());
        layer.set_outline_thickness(0.5);
        hline(layer, *y, MARGIN_LEFT, MARGIN_RIGHT);
        *y -= 6.0;

        layer.set_fill_color(heading());
        layer.use_text("Item Name", 11.0, Mm(COL_ITEM), Mm(*y), font_bold);
        layer.use_text("Qty", 11.0, Mm(COL_QTY), Mm(*y), font_bold);
        layer.use_text("Price", 11.0, Mm(COL_PRICE), Mm(*y), font_bold);
        layer.use_text("Amount", 11.0, Mm(COL_AMOUNT), Mm(*y), font_bold);
        *y -= 4.0;
        hline(layer, *y, MARGIN_LEFT, MARGIN_RIGHT);
        *y -= 7.0;

        layer.set_fill_color(dark());
        for item in &order.items {
            if *y < BOTTOM_MARGIN {
                *layer = new_page(doc, y);
                layer.set_fill_color(dark());
            }
            let name = item.name.as_deref().unwrap_or("Unknown Item");
            let quantity = item.quantity.max(1);
            let price = item.price.unwrap_or(0.0);
            let amount = price * quantity as f64;

            layer.use_text(name, 10.0, Mm(COL_ITEM), Mm(*y), font);
            layer.use_text(quantity.to_string(), 10.0, Mm(COL_QTY), Mm(*y), font);
            layer.use_text(format!("Rs. {:.2}", price), 10.0, Mm(COL_PRICE), Mm(*y), font);
            layer.use_text(format!("Rs. {:.2}", amount), 10.0, Mm(COL_AMOUNT), Mm(*y), font);
            *y -= 8.0;
        }

        *y -= 2.0;
    }

    fn render_totals(
        &self,
        doc: &PdfDocumentReference,
        layer: &mut PdfLayerReference,
        font: &IndirectFontRef,
        font_bold: &IndirectFontRef,
        order: &Order,
        y: &mut f64,
    ) {
        // 税额块高度固定，空间不足直接换页
        if *y < BOTTOM_MARGIN + 40.0 {
            *layer = new_page(doc, y);
        }

        let tax = TaxBreakdown::from_total(order.total);

        layer.set_outline_color(rule());
        layer.set_outline_thickness(0.5);
        hline(layer, *y, MARGIN_LEFT, MARGIN_RIGHT);
        *y -= 7.0;

        layer.set_fill_color(dark());
        layer.use_text("Subtotal:", 10.0, Mm(COL_PRICE), Mm(*y), font);
        layer.use_text(
            format!("Rs. {:.2}", tax.subtotal),
            10.0,
            Mm(COL_AMOUNT),
            Mm(*y),
            font,
        );
        *y -= 7.0;

        layer.use_text("CGST (2.5%):", 10.0, Mm(COL_PRICE), Mm(*y), font);
        layer.use_text(
            format!("Rs. {:.2}", tax.cgst),
            10.0,
            Mm(COL_AMOUNT),
            Mm(*y),
            font,
        );
        *y -= 7.0;

        layer.use_text("SGST (2.5%):", 10.0, Mm(COL_PRICE), Mm(*y), font);
        layer.use_text(
            format!("Rs. {:.2}", tax.sgst),
            10.0,
            Mm(COL_AMOUNT),
            Mm(*y),
            font,
        );
        *y -= 4.0;

        layer.set_outline_color(accent());
        layer.set_outline_thickness(1.0);
        hline(layer, *y, 130.0, MARGIN_RIGHT);
        *y -= 7.0;

        layer.set_fill_color(accent());
        layer.use_text("GRAND TOTAL:", 12.0, Mm(124.0), Mm(*y), font_bold);
        layer.use_text(
            format!("Rs. {:.2}", tax.grand_total),
            12.0,
            Mm(COL_AMOUNT),
            Mm(*y),
            font_bold,
        );
        *y -= 10.0;

        layer.set_outline_color(rule());
        layer.set_outline_thickness(0.5);
        hline(layer, *y, MARGIN_LEFT, MARGIN_RIGHT);
        *y -= 12.0;
    }

    fn render_footer(
        &self,
        doc: &PdfDocumentReference,
        layer: &mut PdfLayerReference,
        font: &IndirectFontRef,
        font_bold: &IndirectFontRef,
        y: &mut f64,
    ) {
        if *y < BOTTOM_MARGIN + 15.0 {
            *layer = new_page(doc, y);
        }

        layer.set_fill_color(green());
        layer.use_text(
            "Thank you for dining with us!",
            11.0,
            Mm(76.0),
            Mm(*y),
            font_bold,
        );
        *y -= 6.0;

        layer.set_fill_color(gray());
        layer.use_text("Visit again soon!", 10.0, Mm(88.0), Mm(*y), font);
        *y -= 8.0;

        layer.use_text(
            "This is a computer-generated invoice and does not require a signature.",
            8.0,
            Mm(55.0),
            Mm(*y),
            font,
        );
    }
}

/// 换页并重置光标
fn new_page(doc: &PdfDocumentReference, y: &mut f64) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    *y = PAGE_HEIGHT - 20.0;
    doc.get_page(page).get_layer(layer)
}

/// 横向分隔线
fn hline(layer: &PdfLayerReference, y: f64, x1: f64, x2: f64) {
    let line = Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    };
    layer.add_line(line);
}

fn accent() -> Color {
    Color::Rgb(Rgb::new(0.91, 0.30, 0.24, None))
}

fn heading() -> Color {
    Color::Rgb(Rgb::new(0.17, 0.24, 0.31, None))
}

fn dark() -> Color {
    Color::Rgb(Rgb::new(0.2, 0.2, 0.2, None))
}

fn gray() -> Color {
    Color::Rgb(Rgb::new(0.4, 0.4, 0.4, None))
}

fn rule() -> Color {
    Color::Rgb(Rgb::new(0.87, 0.87, 0.87, None))
}

fn green() -> Color {
    Color::Rgb(Rgb::new(0.15, 0.68, 0.38, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{OrderItem, OrderStatus, PaymentMethod, PaymentStatus};
    use chrono::Utc;

    fn sample_order(items: Vec<OrderItem>) -> Order {
        Order {
            id: None,
            customer: "Alice".to_string(),
            email: None,
            phone: None,
            customer_phone: None,
            delivery_address: None,
            instructions: None,
            order_type: OrderType::Advance,
            items,
            table: Some("A1".to_string()),
            token: Some("ABC123XYZ".to_string()),
            total: 105.0,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::Cash,
            razorpay_order_id: None,
            razorpay_payment_id: None,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let order = sample_order(vec![OrderItem {
            menu_item: None,
            name: Some("Paneer Tikka".to_string()),
            price: Some(52.5),
            quantity: 2,
        }]);
        let bytes = BillRenderer::new().render(&order).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "output should be a PDF document");
    }

    #[test]
    fn test_render_paginates_long_orders() {
        // 60 行必然超出单页高度
        let items: Vec<OrderItem> = (0..60)
            .map(|i| OrderItem {
                menu_item: None,
                name: Some(format!("Dish {}", i)),
                price: Some(10.0),
                quantity: 1,
            })
            .collect();
        let bytes = BillRenderer::new().render(&sample_order(items)).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        // "/Type /Page" 也会匹配页树节点 "/Type /Pages"，扣除后才是页数
        let pages = text.matches("/Type /Page").count() - text.matches("/Type /Pages").count();
        assert!(pages >= 2, "long order should span multiple pages");
    }
}
