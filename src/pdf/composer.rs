//! Lays out a complete invoice, section by section, on A4 portrait pages.

use crate::config::{BankColumn, Config};
use crate::error::Result;
use crate::invoice::numeric::{format_currency, format_grouped_int};
use crate::invoice::{derive_payments, format_payment_date, InvoiceData, PaymentTerm};
use crate::pdf::layout::{Align, CellStyle, Cursor, Document, FontSpec, LayoutEngine, PageSettings};
use crate::pdf::Assets;

const LOGO_WIDTH: f64 = 30.0;
const LOGO_TOP: f64 = 10.0;
const HEADER_TOP: f64 = 30.0;
const INVOICE_BLOCK_X: f64 = 140.0;

const ITEM_COLUMNS: [f64; 3] = [70.0, 50.0, 60.0];
const TOTAL_LABEL_WIDTH: f64 = 20.0;
const PAYMENT_COLUMNS: [f64; 4] = [60.0, 40.0, 40.0, 40.0];
const ROW_HEIGHT: f64 = 6.0;
const LINE_HEIGHT: f64 = 5.0;

const BANK_COLUMN_WIDTH: f64 = 45.0;
const BANK_COLUMN_GAP: f64 = 10.0;

pub struct InvoiceComposer<'a> {
    config: &'a Config,
    assets: &'a Assets,
    layout: LayoutEngine<'a>,
}

impl<'a> InvoiceComposer<'a> {
    pub fn new(config: &'a Config, assets: &'a Assets) -> Self {
        Self {
            config,
            assets,
            layout: LayoutEngine::new(&assets.fonts, PageSettings::default()),
        }
    }

    /// Lay out every section. Payments are derived in place first so the
    /// schedule table and the terms read the same numbers.
    pub fn compose(mut self, data: &mut InvoiceData) -> Result<Document<'a>> {
        let base_price = data.base_price();
        derive_payments(&mut data.payments, base_price)?;

        self.header(data);
        self.items_table(data);
        self.payment_table(data);
        self.bank_details();
        self.terms(data);

        let doc = self.layout.finish();
        log::debug!(
            "Composed invoice {} on {} page(s)",
            data.number,
            doc.page_count()
        );
        Ok(doc)
    }

    fn symbol(&self) -> &str {
        &self.config.invoice.currency_symbol
    }

    fn header(&mut self, data: &InvoiceData) {
        let assets: &'a Assets = self.assets;
        let layout = &mut self.layout;

        match &assets.logo {
            Some(logo) => {
                let x = (layout.settings().width - LOGO_WIDTH) / 2.0;
                layout.image(logo, x, LOGO_TOP, LOGO_WIDTH);
            }
            None => match &assets.logo_path {
                Some(path) => log::warn!("Logo file not found: {}", path.display()),
                None => log::debug!("No logo configured"),
            },
        }

        let company = &self.config.company;
        let left = layout.settings().margin_left;
        layout.set_font(FontSpec::bold(10.0));
        layout.set_xy(left, HEADER_TOP);
        layout.cell(60.0, LINE_HEIGHT, &company.name, CellStyle::default().new_line());

        layout.set_font(FontSpec::regular(9.0));
        for line in &company.address_lines {
            layout.set_x(left);
            layout.cell(60.0, LINE_HEIGHT, line, CellStyle::default().new_line());
        }
        let company_end = layout.cursor();

        layout.set_cursor(Cursor {
            x: INVOICE_BLOCK_X,
            y: HEADER_TOP,
            ..company_end
        });
        let block = format!(
            "Invoice Number: {}\n\nDate: {}",
            data.number,
            data.formatted_date()
        );
        layout.multi_cell(60.0, LINE_HEIGHT, &block, Align::Right);

        // The client block starts below whichever header column runs longer.
        layout.set_cursor(company_end.lowest(layout.cursor()));
        layout.ln(10.0);

        layout.set_font(FontSpec::bold(10.0));
        layout.cell(0.0, LINE_HEIGHT, "Client Information", CellStyle::default().new_line());
        layout.set_font(FontSpec::regular(10.0));
        let client = &data.client;
        for line in [
            format!("Name: {}", client.name),
            format!("Country: {}", client.country),
            format!("Phone: {}", client.phone),
        ] {
            layout.cell(0.0, LINE_HEIGHT, &line, CellStyle::default().new_line());
        }
        layout.ln(5.0);
    }

    fn items_table(&mut self, data: &InvoiceData) {
        let symbol = self.symbol().to_string();
        let layout = &mut self.layout;
        let [desc_w, price_w, paid_w] = ITEM_COLUMNS;

        layout.set_font(FontSpec::bold(10.0));
        let header = CellStyle::bordered().align(Align::Center);
        layout.cell(desc_w, ROW_HEIGHT, "DESCRIPTION", header);
        layout.cell(price_w, ROW_HEIGHT, "TOTAL PRICE", header);
        layout.cell(paid_w, ROW_HEIGHT, "TO BE PAID", header.new_line());

        layout.set_font(FontSpec::regular(10.0));
        for item in &data.items {
            layout.cell(desc_w, ROW_HEIGHT, &item.description, CellStyle::bordered());
            layout.cell(price_w, ROW_HEIGHT, &format_currency(item.price, &symbol), CellStyle::bordered());
            layout.cell(
                paid_w,
                ROW_HEIGHT,
                &format_currency(item.paid, &symbol),
                CellStyle::bordered().align(Align::Right).new_line(),
            );
        }

        let totals = data.totals();
        let plain = CellStyle::default();
        layout.cell(desc_w, ROW_HEIGHT, "", plain);
        layout.cell(price_w, ROW_HEIGHT, &format_currency(totals.sum_price, &symbol), plain);
        layout.cell(
            paid_w,
            ROW_HEIGHT,
            &format_currency(totals.sum_paid, &symbol),
            plain.align(Align::Right).new_line(),
        );

        let value_w = paid_w - TOTAL_LABEL_WIDTH;
        let rows = [
            ("VAT", format_grouped_int(totals.vat)),
            ("Total", format_currency(totals.final_total, &symbol)),
        ];
        for (label, value) in rows {
            layout.cell(desc_w, ROW_HEIGHT, "", plain);
            layout.cell(price_w, ROW_HEIGHT, "", plain);
            layout.cell(TOTAL_LABEL_WIDTH, ROW_HEIGHT, label, plain);
            layout.cell(value_w, ROW_HEIGHT, &value, plain.align(Align::Right).new_line());
        }
        layout.ln(1.0);
    }

    fn payment_table(&mut self, data: &InvoiceData) {
        let symbol = self.symbol().to_string();
        let layout = &mut self.layout;
        let [name_w, date_w, percent_w, amount_w] = PAYMENT_COLUMNS;

        layout.set_font(FontSpec::bold(10.0));
        let header = CellStyle::bordered().align(Align::Center);
        layout.cell(name_w, ROW_HEIGHT, "PAYMENT", header);
        layout.cell(date_w, ROW_HEIGHT, "DATE", header);
        layout.cell(percent_w, ROW_HEIGHT, "PERCENTAGE", header);
        layout.cell(amount_w, ROW_HEIGHT, "AMOUNT", header.new_line());

        layout.set_font(FontSpec::regular(10.0));
        for payment in &data.payments {
            let name = payment.name.map(|n| n.as_str()).unwrap_or("N/A");
            layout.cell(name_w, ROW_HEIGHT, name, CellStyle::bordered());
            layout.cell(date_w, ROW_HEIGHT, &format_payment_date(payment.date), CellStyle::bordered());
            layout.cell(
                percent_w,
                ROW_HEIGHT,
                &format!("{}%", format_grouped_int(payment.percentage)),
                CellStyle::bordered(),
            );
            layout.cell(
                amount_w,
                ROW_HEIGHT,
                &format_currency(payment.amount, &symbol),
                CellStyle::bordered().new_line(),
            );
        }

        layout.ln(1.0);
        layout.rule();
        layout.ln(1.0);
    }

    fn bank_details(&mut self) {
        let bank = &self.config.bank;
        let layout = &mut self.layout;

        layout.set_font(FontSpec::bold(10.0));
        layout.cell(0.0, LINE_HEIGHT, &bank.title, CellStyle::default().new_line());
        layout.ln(2.0);

        let start = layout.cursor();
        let mut end = start;
        for (i, column) in bank.columns.iter().enumerate() {
            let x = start.x + i as f64 * (BANK_COLUMN_WIDTH + BANK_COLUMN_GAP);
            let column_end = bank_column(layout, Cursor { x, ..start }, column);
            end = end.lowest(column_end);
        }

        layout.set_cursor(end);
        layout.set_y(end.y + 5.0);
        layout.rule();
        layout.ln(3.0);
    }

    fn terms(&mut self, data: &InvoiceData) {
        let terms = &self.config.terms;
        let company = &self.config.company;
        let layout = &mut self.layout;

        layout.set_font(FontSpec::bold(10.0));
        layout.cell(0.0, LINE_HEIGHT, &terms.title, CellStyle::default().new_line());
        layout.ln(3.0);

        for (i, payment) in data.payments.iter().enumerate() {
            let term = PaymentTerm::new(i, payment);
            layout.set_font(FontSpec::regular(8.0));
            layout.write(LINE_HEIGHT, &format!("• {}", term.lead));
            layout.set_font(FontSpec::bold(8.0));
            layout.write(LINE_HEIGHT, &term.percentage);
            layout.set_font(FontSpec::regular(8.0));
            layout.write(LINE_HEIGHT, &format!("{}\n", term.tail));
        }

        for (i, clause) in terms.clauses.iter().enumerate() {
            let font = if terms.is_emphasized(i) {
                FontSpec::bold(8.0)
            } else {
                FontSpec::regular(8.0)
            };
            layout.set_font(font);
            layout.write(LINE_HEIGHT, &format!("• {}\n", clause));
        }

        layout.ln(3.0);
        layout.rule();
        layout.ln(3.0);

        layout.set_font(FontSpec::bold(8.0));
        let centered = CellStyle::default().align(Align::Center).new_line();
        layout.cell(0.0, LINE_HEIGHT, &company.closing_line, centered);
        layout.cell(0.0, LINE_HEIGHT, &company.website, centered);
    }
}

/// Stack one column's label/value pairs from `start`; returns where it ends.
fn bank_column(layout: &mut LayoutEngine<'_>, start: Cursor, column: &BankColumn) -> Cursor {
    let mut cursor = start;
    for field in &column.fields {
        layout.set_cursor(cursor);
        layout.set_font(FontSpec::bold(8.0).underlined());
        layout.multi_cell(BANK_COLUMN_WIDTH, LINE_HEIGHT, &field.label, Align::Left);
        cursor = Cursor {
            x: start.x,
            ..layout.cursor()
        };

        layout.set_cursor(cursor);
        layout.set_font(FontSpec::regular(8.0));
        layout.multi_cell(BANK_COLUMN_WIDTH, LINE_HEIGHT, &field.value, Align::Left);
        cursor = Cursor {
            x: start.x,
            ..layout.cursor()
        };
    }
    cursor
}
