//! 导入模板下载

use actix_web::{HttpResponse, Result as ActixResult};
use rust_xlsxwriter::{Format, Workbook};

use crate::errors::{AcademiaError, Result};

const TEMPLATE_HEADERS: [&str; 7] = [
    "career",
    "semester",
    "subject",
    "credits",
    "code",
    "description",
    "prerequisites",
];

const TEMPLATE_EXAMPLE: [&str; 7] = [
    "ING-SIS",
    "1",
    "Álgebra Lineal",
    "4",
    "ALG101",
    "Vectores, matrices y sistemas lineales",
    "-",
];

pub fn download_template(format: Option<&str>) -> ActixResult<HttpResponse> {
    match format.unwrap_or("csv") {
        "xlsx" => Ok(HttpResponse::Ok()
            .content_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"subject_import_template.xlsx\"",
            ))
            .body(template_xlsx_bytes()?)),
        _ => Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"subject_import_template.csv\"",
            ))
            .body(template_csv_bytes()?)),
    }
}

pub(crate) fn template_csv_bytes() -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(TEMPLATE_HEADERS)?;
    wtr.write_record(TEMPLATE_EXAMPLE)?;
    wtr.into_inner()
        .map_err(|e| AcademiaError::document_render(format!("CSV 生成失败: {e}")))
}

pub(crate) fn template_xlsx_bytes() -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    for (col, header) in TEMPLATE_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        worksheet.set_column_width(col as u16, 18)?;
    }
    for (col, value) in TEMPLATE_EXAMPLE.iter().enumerate() {
        // 数字列写成数字，和用户实际填写的表格一致
        match value.parse::<f64>() {
            Ok(number) => worksheet.write_number(1, col as u16, number)?,
            Err(_) => worksheet.write_string(1, col as u16, *value)?,
        };
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_template_has_header_and_example() {
        let text = String::from_utf8(template_csv_bytes().unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("career,semester,subject,credits,code,description,prerequisites")
        );
        assert!(lines.next().unwrap().contains("ALG101"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_xlsx_template_is_zip() {
        let bytes = template_xlsx_bytes().unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
