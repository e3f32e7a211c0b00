use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use super::{ExportError, ExportRow, COLUMNS};

// A4 landscape, so six 40 mm columns fit between the margins.
const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 15.0;
const CELL_WIDTH: f32 = 40.0;
const CELL_HEIGHT: f32 = 10.0;
const FONT_SIZE: f32 = 12.0;
const TITLE_SIZE: f32 = 14.0;
const MAX_CELL_CHARS: usize = 17;

fn document_error(err: printpdf::Error) -> ExportError {
    ExportError::Document(err.to_string())
}

/// Bordered grid: a header row, then one row per project, paging as needed.
pub(super) fn write(rows: &[ExportRow], path: &Path) -> Result<(), ExportError> {
    let title = "Consulting Project Evaluation";
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Table");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(document_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(document_error)?;

    let mut layer = doc.get_page(page).get_layer(layer);
    layer.use_text(
        format!("{} ({})", title, chrono::Local::now().format("%Y-%m-%d")),
        TITLE_SIZE,
        Mm(MARGIN),
        Mm(PAGE_HEIGHT - MARGIN),
        &bold,
    );

    let header = COLUMNS.map(str::to_string);
    let first_row_top = PAGE_HEIGHT - MARGIN - CELL_HEIGHT;
    let mut top = first_row_top;
    draw_row(&layer, &header, top, &bold);

    for row in rows {
        top -= CELL_HEIGHT;
        if top - CELL_HEIGHT < MARGIN {
            layer = new_page(&doc);
            top = PAGE_HEIGHT - MARGIN;
            draw_row(&layer, &header, top, &bold);
            top -= CELL_HEIGHT;
        }
        draw_row(&layer, &row.cells(), top, &font);
    }

    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file)).map_err(document_error)
}

fn new_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Table");
    doc.get_page(page).get_layer(layer)
}

/// Draw one row of cells whose top edge sits at `top` (mm from the page bottom).
fn draw_row(layer: &PdfLayerReference, cells: &[String], top: f32, font: &IndirectFontRef) {
    let bottom = top - CELL_HEIGHT;
    layer.set_outline_thickness(0.5);

    for (index, text) in cells.iter().enumerate() {
        let left = MARGIN + CELL_WIDTH * index as f32;
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(left), Mm(bottom)), false),
                (Point::new(Mm(left + CELL_WIDTH), Mm(bottom)), false),
                (Point::new(Mm(left + CELL_WIDTH), Mm(top)), false),
                (Point::new(Mm(left), Mm(top)), false),
            ],
            is_closed: true,
        });
        layer.use_text(fit_cell(text), FONT_SIZE, Mm(left + 2.0), Mm(bottom + 3.0), font);
    }
}

fn fit_cell(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        return text.to_string();
    }
    let kept: String = text.chars().take(MAX_CELL_CHARS - 3).collect();
    format!("{kept}...")
}
