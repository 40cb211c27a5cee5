//! 月度报告渲染：HTML、XLSX、PDF
//!
//! 导出接口和月度报告邮件共用这里的输出。

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::errors::{AcademiaError, Result};
use crate::models::reports::entities::MonthlyReportData;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Xlsx,
    Pdf,
}

impl ReportFormat {
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("html") => Some(ReportFormat::Html),
            Some("xlsx") | Some("excel") => Some(ReportFormat::Xlsx),
            Some("pdf") => Some(ReportFormat::Pdf),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Html => HTML_CONTENT_TYPE,
            ReportFormat::Xlsx => XLSX_CONTENT_TYPE,
            ReportFormat::Pdf => PDF_CONTENT_TYPE,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Pdf => "pdf",
        }
    }
}

/// 附件文件名，例如 `consolidado_2025-03.xlsx`
pub fn report_filename(data: &MonthlyReportData, format: ReportFormat) -> String {
    format!(
        "consolidado_{:04}-{:02}.{}",
        data.year,
        data.month,
        format.extension()
    )
}

pub fn render(data: &MonthlyReportData, format: ReportFormat) -> Result<Vec<u8>> {
    match format {
        ReportFormat::Html => Ok(render_html(data).into_bytes()),
        ReportFormat::Xlsx => render_xlsx(data),
        ReportFormat::Pdf => render_pdf(data),
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_html(data: &MonthlyReportData) -> String {
    let mut subjects = String::new();
    for s in &data.subjects {
        subjects.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td><td>{:.1}%</td><td>{}</td></tr>\n",
            escape_html(&s.subject_code),
            escape_html(&s.subject_name),
            escape_html(&s.period_name),
            s.total_students,
            s.average_grade,
            s.graded,
            s.approval_rate,
            s.pending,
        ));
    }
    if data.subjects.is_empty() {
        subjects.push_str("<tr><td colspan=\"8\">Sin actividad en el periodo</td></tr>\n");
    }

    let mut failures = String::new();
    for f in &data.highest_failure {
        failures.push_str(&format!(
            "<li>{} - {}: {:.1}%</li>\n",
            escape_html(&f.subject_code),
            escape_html(&f.subject_name),
            f.failure_rate
        ));
    }

    let mut teachers = String::new();
    for t in &data.top_teachers {
        teachers.push_str(&format!(
            "<li>{}: {:.2}</li>\n",
            escape_html(&t.teacher_name),
            t.average_grade
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head><meta charset="utf-8"><title>Consolidado {year:04}-{month:02}</title></head>
<body>
<h1>Consolidado academico {year:04}-{month:02}</h1>
<p>Generado: {generated}</p>
<table border="1" cellspacing="0" cellpadding="4">
<thead><tr><th>Codigo</th><th>Materia</th><th>Periodo</th><th>Estudiantes</th><th>Promedio</th><th>Calificadas</th><th>Aprobacion</th><th>Pendientes</th></tr></thead>
<tbody>
{subjects}</tbody>
</table>
<h2>Materias con mayor reprobacion</h2>
<ul>
{failures}</ul>
<h2>Docentes con mejor promedio</h2>
<ul>
{teachers}</ul>
</body>
</html>
"#,
        year = data.year,
        month = data.month,
        generated = data.generated_at.format("%Y-%m-%d %H:%M UTC"),
    )
}

pub fn render_xlsx(data: &MonthlyReportData) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let title_format = Format::new().set_bold().set_font_size(14);

    let sheet = workbook.add_worksheet().set_name("BySubject")?;
    write_subjects_sheet(sheet, data, &header_format, &title_format)?;

    let sheet = workbook.add_worksheet().set_name("HighestFailure")?;
    sheet.write_string_with_format(0, 0, "Codigo", &header_format)?;
    sheet.write_string_with_format(0, 1, "Materia", &header_format)?;
    sheet.write_string_with_format(0, 2, "Reprobacion %", &header_format)?;
    for (i, f) in data.highest_failure.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &f.subject_code)?;
        sheet.write_string(row, 1, &f.subject_name)?;
        sheet.write_number(row, 2, f.failure_rate)?;
    }

    let sheet = workbook.add_worksheet().set_name("TopTeachers")?;
    sheet.write_string_with_format(0, 0, "Docente", &header_format)?;
    sheet.write_string_with_format(0, 1, "Promedio", &header_format)?;
    for (i, t) in data.top_teachers.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &t.teacher_name)?;
        sheet.write_number(row, 1, t.average_grade)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_subjects_sheet(
    sheet: &mut Worksheet,
    data: &MonthlyReportData,
    header_format: &Format,
    title_format: &Format,
) -> Result<()> {
    sheet.write_string_with_format(
        0,
        0,
        format!("Consolidado {:04}-{:02}", data.year, data.month),
        title_format,
    )?;

    let headers = [
        "Codigo",
        "Materia",
        "Periodo",
        "Estudiantes",
        "Promedio",
        "Calificadas",
        "Aprobadas",
        "Aprobacion %",
        "Pendientes",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(2, col as u16, *header, header_format)?;
    }

    for (i, s) in data.subjects.iter().enumerate() {
        let row = i as u32 + 3;
        sheet.write_string(row, 0, &s.subject_code)?;
        sheet.write_string(row, 1, &s.subject_name)?;
        sheet.write_string(row, 2, &s.period_name)?;
        sheet.write_number(row, 3, s.total_students as f64)?;
        sheet.write_number(row, 4, s.average_grade)?;
        sheet.write_number(row, 5, s.graded as f64)?;
        sheet.write_number(row, 6, s.approved as f64)?;
        sheet.write_number(row, 7, s.approval_rate)?;
        sheet.write_number(row, 8, s.pending as f64)?;
    }
    Ok(())
}

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const LINE_HEIGHT: f32 = 6.0;

// 逐行写入，超出页面底部时新开一页
struct PdfWriter {
    doc: printpdf::PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PdfWriter {
    fn line(&mut self, text: &str, size: f32, bold: bool) {
        if self.y < MARGIN {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "contenido");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
        let font = if bold { &self.bold } else { &self.font };
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT;
    }
}

fn pdf_error(e: printpdf::Error) -> AcademiaError {
    AcademiaError::document_render(format!("PDF: {e}"))
}

pub fn render_pdf(data: &MonthlyReportData) -> Result<Vec<u8>> {
    let title = format!("Consolidado {:04}-{:02}", data.year, data.month);
    let (doc, page, layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "contenido");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut writer = PdfWriter {
        doc,
        layer,
        font,
        bold,
        y: PAGE_HEIGHT - MARGIN,
    };

    writer.line(&title, 16.0, true);
    writer.line(
        &format!("Generado: {}", data.generated_at.format("%Y-%m-%d %H:%M UTC")),
        9.0,
        false,
    );
    writer.line("", 9.0, false);

    writer.line("Materias", 12.0, true);
    if data.subjects.is_empty() {
        writer.line("Sin actividad en el periodo", 10.0, false);
    }
    for s in &data.subjects {
        writer.line(
            &format!(
                "{} {} | est. {} | prom. {:.2} | aprob. {:.1}% | pend. {}",
                s.subject_code,
                s.subject_name,
                s.total_students,
                s.average_grade,
                s.approval_rate,
                s.pending
            ),
            9.0,
            false,
        );
    }

    writer.line("", 9.0, false);
    writer.line("Mayor reprobacion", 12.0, true);
    for f in &data.highest_failure {
        writer.line(
            &format!("{} {}: {:.1}%", f.subject_code, f.subject_name, f.failure_rate),
            9.0,
            false,
        );
    }

    writer.line("", 9.0, false);
    writer.line("Docentes destacados", 12.0, true);
    for t in &data.top_teachers {
        writer.line(
            &format!("{}: {:.2}", t.teacher_name, t.average_grade),
            9.0,
            false,
        );
    }

    writer.doc.save_to_bytes().map_err(pdf_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reports::entities::fixtures;

    #[test]
    fn test_parse_format() {
        assert_eq!(ReportFormat::parse(None), Some(ReportFormat::Html));
        assert_eq!(ReportFormat::parse(Some("XLSX")), Some(ReportFormat::Xlsx));
        assert_eq!(ReportFormat::parse(Some("pdf")), Some(ReportFormat::Pdf));
        assert_eq!(ReportFormat::parse(Some("docx")), None);
    }

    #[test]
    fn test_filename() {
        let data = fixtures::sample();
        assert_eq!(
            report_filename(&data, ReportFormat::Xlsx),
            "consolidado_2025-03.xlsx"
        );
    }

    #[test]
    fn test_html_contains_subjects_and_escapes() {
        let mut data = fixtures::sample();
        data.subjects[0].subject_name = "A<B>".to_string();
        let html = render_html(&data);
        assert!(html.contains("Consolidado academico 2025-03"));
        assert!(html.contains("A&lt;B&gt;"));
        assert!(html.contains("PHY100"));
    }

    #[test]
    fn test_binary_formats() {
        let data = fixtures::sample();
        let xlsx = render(&data, ReportFormat::Xlsx).unwrap();
        assert_eq!(&xlsx[..2], b"PK");
        let pdf = render(&data, ReportFormat::Pdf).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
