//! 课程批量导入
//!
//! 第一轮逐行创建或关联课程，第二轮解析先修课代码。
//! 先修课可以引用本文件中的课程，也可以引用同一学期中已有的课程。

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use calamine::{Reader, Xlsx};
use futures_util::StreamExt;
use std::collections::{BTreeSet, HashMap};
use std::io::Cursor;
use std::sync::Arc;
use tracing::{error, info};

use super::{SubjectService, target_period};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::access::AccessScope;
use crate::models::roles::entities::perms;
use crate::models::subjects::import::{
    ColumnMap, ImportRow, ImportRowResult, ImportRowStatus, MAX_IMPORT_ROWS, RawImportRow,
    SubjectImportReport,
};
use crate::models::subjects::prerequisites::find_cycle;
use crate::models::subjects::requests::{PlanEntryInput, SubjectImportParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_scope, current_user, require_permission};
use crate::storage::{NewSubject, Storage};

/// 导入解析错误
#[derive(Debug)]
enum ImportParseError {
    MissingColumn(&'static str),
    ParseFailed(String),
    EmptyFile,
}

impl ImportParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn(_) => ErrorCode::ImportFileMissingColumn,
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
            Self::EmptyFile => ErrorCode::ImportFileDataInvalid,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingColumn(col) => format!("缺少必需列: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
            Self::EmptyFile => "文件中没有数据".to_string(),
        }
    }
}

/// 第二轮待解析的先修课
struct PendingPrerequisites {
    row_num: usize,
    subject_id: i64,
    codes: Vec<String>,
}

fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub async fn import_subjects(
    service: &SubjectService,
    params: SubjectImportParams,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::CREATE_SUBJECT)?;
    let scope = current_scope(request)?;

    let max_size = AppConfig::get().server.limits.max_import_size;
    let (file_bytes, file_name) = match read_file_from_multipart(&mut payload, max_size).await {
        Ok(result) => result,
        Err(e) => return Ok(bad_request(ErrorCode::FileUploadFailed, format!("文件读取失败: {e}"))),
    };

    let period = match target_period(&storage, params.period_id).await? {
        Ok(period) => period,
        Err(resp) => return Ok(resp),
    };

    let lower_name = file_name.to_lowercase();
    let parsed = if lower_name.ends_with(".xlsx") {
        parse_xlsx(&file_bytes)
    } else if lower_name.ends_with(".csv") {
        parse_csv(&file_bytes)
    } else {
        return Ok(bad_request(
            ErrorCode::FileUploadFailed,
            "只支持 .csv 或 .xlsx 文件",
        ));
    };
    let rows: Vec<RawImportRow> = match parsed {
        Ok(rows) => rows.into_iter().filter(|r| !r.is_blank()).collect(),
        Err(e) => return Ok(bad_request(e.error_code(), e.message())),
    };

    if rows.is_empty() {
        return Ok(bad_request(ErrorCode::ImportFileDataInvalid, "文件中没有数据行"));
    }
    if rows.len() > MAX_IMPORT_ROWS {
        return Ok(bad_request(
            ErrorCode::ImportFileDataInvalid,
            format!("单次导入最多支持 {MAX_IMPORT_ROWS} 行"),
        ));
    }

    let mut report = SubjectImportReport {
        total: rows.len(),
        ..Default::default()
    };
    let mut code_to_id: HashMap<String, i64> = HashMap::new();
    let mut pending = Vec::new();

    for raw in &rows {
        let row = match raw.validate() {
            Ok(row) => row,
            Err((field, message)) => {
                report.push(ImportRowResult::error(raw.row_num, &raw.code, field, message));
                continue;
            }
        };

        match import_row(&storage, &scope, period.id, &row).await {
            Ok(Ok((subject_id, result))) => {
                code_to_id.insert(row.code.clone(), subject_id);
                if !row.prerequisites.is_empty() {
                    pending.push(PendingPrerequisites {
                        row_num: row.row_num,
                        subject_id,
                        codes: row.prerequisites.clone(),
                    });
                }
                report.push(result);
            }
            Ok(Err(result)) => report.push(result),
            Err(e) => {
                error!("Import row {} failed: {}", row.row_num, e);
                report.push(ImportRowResult::error(
                    row.row_num,
                    &row.code,
                    "",
                    format!("保存失败: {e}"),
                ));
            }
        }
    }

    resolve_prerequisites(&storage, period.id, &code_to_id, pending, &mut report).await?;

    info!(
        "Subject import by {} into period {}: {} created, {} linked, {} failed",
        user.username, period.name, report.created, report.linked, report.failed
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(report, "导入完成")))
}

/// 处理一行：已存在同代码课程时加入专业，否则新建
///
/// 内层 `Err` 是该行的业务错误，外层是存储错误
async fn import_row(
    storage: &Arc<dyn Storage>,
    scope: &AccessScope,
    period_id: i64,
    row: &ImportRow,
) -> Result<std::result::Result<(i64, ImportRowResult), ImportRowResult>> {
    let Some(career) = storage.find_career(&row.career).await? else {
        return Ok(Err(ImportRowResult::error(
            row.row_num,
            &row.code,
            "career",
            format!("专业不存在: '{}'", row.career),
        )));
    };
    if !scope.covers_faculty(career.faculty_id) {
        return Ok(Err(ImportRowResult::error(
            row.row_num,
            &row.code,
            "career",
            format!("专业 {} 不在管理范围内", career.code),
        )));
    }

    let entry = PlanEntryInput {
        career_id: career.id,
        semester: row.semester,
        is_mandatory: true,
        credits_override: None,
    };

    if let Some(existing) = storage.get_subject_by_code(&row.code, period_id).await? {
        let linked = storage.link_subject_career(existing.id, &entry).await?;
        let message = if linked {
            format!("已加入专业 {}", career.code)
        } else {
            format!("已在专业 {} 中，更新学期序号", career.code)
        };
        return Ok(Ok((
            existing.id,
            ImportRowResult {
                row: row.row_num,
                status: ImportRowStatus::Linked,
                code: row.code.clone(),
                field: None,
                message,
            },
        )));
    }

    let subject = storage
        .create_subject(
            NewSubject {
                name: row.name.clone(),
                code: row.code.clone(),
                description: row.description.clone(),
                credits: row.credits,
                period_id,
            },
            std::slice::from_ref(&entry),
        )
        .await?;

    Ok(Ok((
        subject.id,
        ImportRowResult {
            row: row.row_num,
            status: ImportRowStatus::Created,
            code: subject.code,
            field: None,
            message: "课程已创建".to_string(),
        },
    )))
}

/// 第二轮：先修课代码解析为 ID 并写入，与已有先修课合并
async fn resolve_prerequisites(
    storage: &Arc<dyn Storage>,
    period_id: i64,
    code_to_id: &HashMap<String, i64>,
    pending: Vec<PendingPrerequisites>,
    report: &mut SubjectImportReport,
) -> Result<()> {
    if pending.is_empty() {
        return Ok(());
    }
    let mut edges = storage.list_prerequisite_edges(period_id).await?;

    for item in pending {
        let mut ids = BTreeSet::new();
        let mut unknown = Vec::new();
        for code in &item.codes {
            match code_to_id.get(code) {
                Some(id) => {
                    ids.insert(*id);
                }
                None => match storage.get_subject_by_code(code, period_id).await? {
                    Some(subject) => {
                        ids.insert(subject.id);
                    }
                    None => unknown.push(code.clone()),
                },
            }
        }
        if !unknown.is_empty() {
            report.downgrade(
                item.row_num,
                "prerequisites",
                format!("先修课不存在: {}", unknown.join(", ")),
            );
            continue;
        }

        ids.extend(
            edges
                .iter()
                .filter(|(from, _)| *from == item.subject_id)
                .map(|(_, to)| *to),
        );
        let proposed: Vec<i64> = ids.into_iter().collect();
        if let Some(offending) = find_cycle(item.subject_id, &proposed, &edges) {
            report.downgrade(
                item.row_num,
                "prerequisites",
                format!("先修课 {offending} 会形成循环依赖"),
            );
            continue;
        }

        storage
            .set_subject_prerequisites(item.subject_id, &proposed)
            .await?;
        edges.retain(|(from, _)| *from != item.subject_id);
        edges.extend(proposed.iter().map(|to| (item.subject_id, *to)));
    }
    Ok(())
}

async fn read_file_from_multipart(
    payload: &mut Multipart,
    max_size: usize,
) -> std::result::Result<(Vec<u8>, String), String> {
    let mut file_bytes = Vec::new();
    let mut file_name = String::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("读取字段失败: {e}"))?;

        if field.name().map(|n| n == "file").unwrap_or(false) {
            if let Some(content_disposition) = field.content_disposition() {
                file_name = content_disposition
                    .get_filename()
                    .unwrap_or("upload.csv")
                    .to_string();
            }

            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| format!("读取数据失败: {e}"))?;
                if file_bytes.len() + data.len() > max_size {
                    return Err(format!("文件超过大小限制 ({max_size} 字节)"));
                }
                file_bytes.extend_from_slice(&data);
            }
        }
    }

    if file_bytes.is_empty() {
        return Err("未找到文件字段".to_string());
    }

    Ok((file_bytes, file_name))
}

fn parse_csv(data: &[u8]) -> std::result::Result<Vec<RawImportRow>, ImportParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(data));

    let headers = rdr
        .headers()
        .map_err(|e| ImportParseError::ParseFailed(format!("读取表头失败: {e}")))?
        .clone();
    if headers.is_empty() {
        return Err(ImportParseError::EmptyFile);
    }
    let columns =
        ColumnMap::from_headers(headers.iter()).map_err(ImportParseError::MissingColumn)?;

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        // 1 开始计数，跳过表头
        let row_num = idx + 2;
        let record = result.map_err(|e| {
            ImportParseError::ParseFailed(format!("第 {row_num} 行解析失败: {e}"))
        })?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        rows.push(columns.extract(row_num, &cells));
    }

    Ok(rows)
}

fn parse_xlsx(data: &[u8]) -> std::result::Result<Vec<RawImportRow>, ImportParseError> {
    let cursor = Cursor::new(data);
    let mut workbook: Xlsx<_> = Xlsx::new(cursor)
        .map_err(|e| ImportParseError::ParseFailed(format!("打开 XLSX 失败: {e}")))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let sheet_name = sheet_names
        .first()
        .ok_or_else(|| ImportParseError::ParseFailed("工作簿中没有工作表".to_string()))?;

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| ImportParseError::ParseFailed(format!("读取工作表失败: {e}")))?;

    let mut rows_iter = range.rows();
    let header_row = rows_iter.next().ok_or(ImportParseError::EmptyFile)?;
    let headers: Vec<String> = header_row.iter().map(|cell| cell.to_string()).collect();
    let columns = ColumnMap::from_headers(headers.iter().map(String::as_str))
        .map_err(ImportParseError::MissingColumn)?;

    Ok(rows_iter
        .enumerate()
        .map(|(idx, row)| {
            let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            columns.extract(idx + 2, &cells)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_with_spanish_headers() {
        let data = "Carrera,Semestre,Materia,Créditos,Código,Prerrequisitos\n\
                    ING-SIS,1,Álgebra,4,alg101,-\n\
                    ,,,,,\n\
                    ING-SIS,2,Álgebra II,4,ALG201,ALG101\n";
        let rows = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].is_blank());
        let second = rows[2].validate().unwrap();
        assert_eq!(second.row_num, 4);
        assert_eq!(second.prerequisites, vec!["ALG101"]);
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let data = "career,semester,subject,code\nX,1,Y,Z\n";
        let err = parse_csv(data.as_bytes()).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::ImportFileMissingColumn);
        assert!(err.message().contains("credits"));
    }

    #[test]
    fn test_parse_xlsx_template_round() {
        let bytes = super::super::template::template_xlsx_bytes().unwrap();
        let rows = parse_xlsx(&bytes).unwrap();
        assert_eq!(rows.len(), 1);
        let row = rows[0].validate().unwrap();
        assert_eq!(row.code, "ALG101");
        assert_eq!(row.credits, 4);
    }

    #[test]
    fn test_invalid_xlsx_is_parse_error() {
        let err = parse_xlsx(b"not a zip").unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::ImportFileParseFailed);
    }
}
