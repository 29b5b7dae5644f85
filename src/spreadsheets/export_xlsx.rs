use crate::domain::pricing::ApprovalRow;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Workbook, Worksheet};

const HEADERS: [&str; 11] = [
    "Tipología",
    "Disponibles",
    "Total",
    "Proformas",
    "Precio lista m²",
    "Velocidad (u/mes)",
    "Precio venta m² (S/)",
    "Dormitorios",
    "Precio m² mercado",
    "Velocidad mercado",
    "Alerta",
];

fn xlsx_err(what: &str) -> impl Fn(rust_xlsxwriter::XlsxError) -> ServerError + '_ {
    move |e| ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}

fn write_optional(ws: &mut Worksheet, row: u32, col: u16, value: Option<f64>) -> Result<(), ServerError> {
    if let Some(v) = value {
        ws.write_number(row, col, v).map_err(xlsx_err("number"))?;
    }
    Ok(())
}

/// The approval table as a workbook.
pub fn approval_workbook(rows: &[ApprovalRow]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        ws.write_string(0, col as u16, *header)
            .map_err(xlsx_err("header"))?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        ws.write_string(r, 0, &row.typology).map_err(xlsx_err("typology"))?;
        ws.write_number(r, 1, row.available_units as f64)
            .map_err(xlsx_err("available units"))?;
        ws.write_number(r, 2, row.total_units as f64)
            .map_err(xlsx_err("total units"))?;
        ws.write_number(r, 3, row.total_proformas as f64)
            .map_err(xlsx_err("proformas"))?;
        ws.write_number(r, 4, row.avg_list_price_per_m2)
            .map_err(xlsx_err("list price"))?;
        ws.write_number(r, 5, row.velocity).map_err(xlsx_err("velocity"))?;
        ws.write_number(r, 6, row.avg_sale_price_per_m2_pen)
            .map_err(xlsx_err("sale price"))?;
        write_optional(ws, r, 7, row.bedrooms.map(f64::from))?;
        write_optional(ws, r, 8, row.market_price_per_m2)?;
        write_optional(ws, r, 9, row.market_velocity)?;
        ws.write_string(r, 10, if row.has_alert { "Sí" } else { "No" })
            .map_err(xlsx_err("alert"))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

pub fn export_approval_xlsx(project: &str, rows: &[ApprovalRow]) -> ResultResp {
    let buffer = approval_workbook(rows)?;
    let safe: String = project
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    xlsx_response(buffer, &format!("aprobacion_{safe}.xlsx"))
}
