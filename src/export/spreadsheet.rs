use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::{ExportRow, COLUMNS};

pub(super) fn write(rows: &[ExportRow], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format("0.00");

    let worksheet = workbook.add_worksheet();
    for (col, title) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *title, &header)?;
        worksheet.set_column_width(col, 16)?;
    }
    worksheet.set_column_width(0, 32)?;

    for (index, row) in rows.iter().enumerate() {
        let line = index as u32 + 1;
        worksheet.write_string(line, 0, &row.name)?;
        worksheet.write_number(line, 1, row.duration)?;
        worksheet.write_number_with_format(line, 2, row.sales_price, &money)?;
        worksheet.write_number_with_format(line, 3, row.total_cost, &money)?;
        worksheet.write_number_with_format(line, 4, row.profit, &money)?;
        worksheet.write_number_with_format(line, 5, row.margin, &money)?;
    }

    workbook.save(path)
}
