use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::core::PipelineError;
use crate::document::{DocumentModel, PartySection};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: f32 = 40.0;
const TOP: f32 = 800.0;
const BODY_SIZE: f32 = 10.0;
const LEADING: f32 = 1.4;
const WRAP_AT: usize = 90;

const ITEM_COLUMNS: [f32; 6] = [40.0, 250.0, 320.0, 370.0, 440.0, 500.0];
const TAX_COLUMNS: [f32; 5] = [40.0, 140.0, 220.0, 320.0, 420.0];
const PARTY_COLUMNS: [f32; 2] = [40.0, 300.0];

/// One line of text, possibly split into cells at fixed x offsets.
struct Row {
    size: f32,
    bold: bool,
    cells: Vec<(f32, String)>,
}

impl Row {
    fn text(size: f32, bold: bool, text: impl Into<String>) -> Self {
        Self {
            size,
            bold,
            cells: vec![(MARGIN, text.into())],
        }
    }

    fn cells(bold: bool, columns: &[f32], values: Vec<String>) -> Self {
        Self {
            size: BODY_SIZE,
            bold,
            cells: columns.iter().copied().zip(values).collect(),
        }
    }

    fn blank() -> Self {
        Self {
            size: BODY_SIZE,
            bold: false,
            cells: Vec::new(),
        }
    }
}

/// Lay out the visible invoice, adding pages as the rows run out of space.
pub(super) fn compose(model: &DocumentModel) -> Result<Document, PipelineError> {
    let rows = rows(model);

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_rows in paginate(rows) {
        let page_id = add_page(&mut doc, pages_id, &page_rows)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(format!("{} {}", model.header.name, model.header.id)),
        "Producer" => Object::string_literal(concat!("zugferd-invoices ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Info", info_id);
    Ok(doc)
}

fn paginate(rows: Vec<Row>) -> Vec<Vec<(f32, Row)>> {
    let mut pages = vec![Vec::new()];
    let mut y = TOP;
    for row in rows {
        let step = row.size * LEADING;
        if y - step < MARGIN {
            pages.push(Vec::new());
            y = TOP;
        }
        y -= step;
        if let Some(page) = pages.last_mut() {
            page.push((y, row));
        }
    }
    pages
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    rows: &[(f32, Row)],
) -> Result<ObjectId, PipelineError> {
    let mut operations = Vec::new();
    for (y, row) in rows {
        let font = if row.bold { "F2" } else { "F1" };
        for (x, text) in &row.cells {
            if text.is_empty() {
                continue;
            }
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), row.size.into()]));
            operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(win_ansi(text), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
    }
    let content = Content { operations }
        .encode()
        .map_err(|e| PipelineError::resource(format!("failed to encode page content: {e}")))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

/// Encode for the standard Type1 fonts. Latin-1 maps directly; the euro
/// sign has its own slot; anything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            c if (c as u32) < 0x80 || ((c as u32) >= 0xA0 && (c as u32) <= 0xFF) => c as u8,
            _ => b'?',
        })
        .collect()
}

fn rows(model: &DocumentModel) -> Vec<Row> {
    let h = &model.header;
    let mut rows = vec![
        Row::text(16.0, true, format!("{} {}", h.name, h.id)),
        Row::text(BODY_SIZE, false, h.display_date()),
        Row::blank(),
    ];

    let seller = party_lines(&model.seller);
    let buyer = party_lines(&model.buyer);
    for i in 0..seller.len().max(buyer.len()) {
        let cell = |lines: &[String]| lines.get(i).cloned().unwrap_or_default();
        rows.push(Row::cells(
            i == 0,
            &PARTY_COLUMNS,
            vec![cell(&seller), cell(&buyer)],
        ));
    }
    rows.push(Row::blank());

    rows.push(Row::cells(
        true,
        &ITEM_COLUMNS,
        ["Item", "Price", "Qty", "Subtotal", "VAT", "Total"]
            .map(String::from)
            .to_vec(),
    ));
    for item in &model.line_items {
        rows.push(Row::cells(
            false,
            &ITEM_COLUMNS,
            vec![
                item.name.clone(),
                item.price.clone(),
                item.quantity.clone(),
                item.subtotal.clone(),
                format!("{}%", item.vat_rate),
                item.total.clone(),
            ],
        ));
    }
    rows.push(Row::blank());

    let tax = &model.tax_breakdown;
    rows.push(Row::cells(
        true,
        &TAX_COLUMNS,
        ["Base amount", "VAT rate", "VAT amount", "Total", "Currency"]
            .map(String::from)
            .to_vec(),
    ));
    for row in &tax.rows {
        rows.push(Row::cells(
            false,
            &TAX_COLUMNS,
            vec![
                row.base.clone(),
                format!("{}%", row.percentage),
                row.tax.clone(),
                row.total.clone(),
                row.currency.clone(),
            ],
        ));
    }
    let s = &tax.summation;
    rows.push(Row::cells(
        true,
        &TAX_COLUMNS,
        vec![
            s.tax_basis_total.clone(),
            String::new(),
            s.tax_total.clone(),
            s.grand_total.clone(),
            s.currency.clone(),
        ],
    ));
    if let Some(due) = &tax.due_payable {
        rows.push(Row::text(
            BODY_SIZE,
            true,
            format!("Amount due: {due} {}", s.currency),
        ));
    }
    rows.push(Row::blank());

    let pay = &model.payment_terms;
    for text in wrap(&pay.instruction, WRAP_AT) {
        rows.push(Row::text(BODY_SIZE, false, text));
    }
    for account in &pay.account_lines {
        rows.push(Row::text(BODY_SIZE, false, account.clone()));
    }
    if let Some(terms) = &pay.terms {
        let text = format!(
            "{} (due {})",
            terms.description,
            terms.due_date.format("%b %d, %Y")
        );
        for part in wrap(&text, WRAP_AT) {
            rows.push(Row::text(BODY_SIZE, false, part));
        }
    }

    if !h.notes.is_empty() {
        rows.push(Row::blank());
        for note in &h.notes {
            for part in note.lines().flat_map(|l| wrap(l, WRAP_AT)) {
                rows.push(Row::text(8.0, false, part));
            }
        }
    }
    rows
}

fn party_lines(p: &PartySection) -> Vec<String> {
    let mut lines = vec![p.role.label().to_string(), p.name.clone()];
    lines.extend(p.address_lines().into_iter().map(str::to_string));
    lines.push("Tax ID(s):".to_string());
    lines.extend(p.tax_id_lines.iter().cloned());
    lines
}

/// Greedy word wrap at `width` characters.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
