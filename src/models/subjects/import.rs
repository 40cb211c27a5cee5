//! 课程批量导入的数据结构与表头解析

use serde::Serialize;
use std::collections::HashMap;

/// 单次导入最大行数
pub const MAX_IMPORT_ROWS: usize = 1000;

/// 导入列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportColumn {
    Career,
    Semester,
    Name,
    Credits,
    Code,
    Description,
    Prerequisites,
}

impl ImportColumn {
    pub const REQUIRED: [ImportColumn; 5] = [
        ImportColumn::Career,
        ImportColumn::Semester,
        ImportColumn::Name,
        ImportColumn::Credits,
        ImportColumn::Code,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportColumn::Career => "career",
            ImportColumn::Semester => "semester",
            ImportColumn::Name => "subject",
            ImportColumn::Credits => "credits",
            ImportColumn::Code => "code",
            ImportColumn::Description => "description",
            ImportColumn::Prerequisites => "prerequisites",
        }
    }

    /// 根据规范化后的表头识别列
    fn from_header(header: &str) -> Option<Self> {
        match header {
            "career" | "carrera" => Some(ImportColumn::Career),
            "semester" | "semestre" => Some(ImportColumn::Semester),
            "subject" | "name" | "materia" | "asignatura" => Some(ImportColumn::Name),
            "credits" | "creditos" => Some(ImportColumn::Credits),
            "code" | "codigo" => Some(ImportColumn::Code),
            "description" | "descripcion" => Some(ImportColumn::Description),
            "prerequisites" | "prerrequisitos" => Some(ImportColumn::Prerequisites),
            _ => None,
        }
    }
}

/// 表头规范化：去空白、小写、去重音
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            ' ' | '-' => '_',
            other => other,
        })
        .collect()
}

/// 表头到列下标的映射
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indexes: HashMap<ImportColumn, usize>,
}

impl ColumnMap {
    /// 解析表头，缺少必需列时返回列名
    pub fn from_headers<'a, I>(headers: I) -> Result<Self, &'static str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut indexes = HashMap::new();
        for (idx, header) in headers.into_iter().enumerate() {
            if let Some(column) = ImportColumn::from_header(&normalize_header(header)) {
                indexes.entry(column).or_insert(idx);
            }
        }
        for column in ImportColumn::REQUIRED {
            if !indexes.contains_key(&column) {
                return Err(column.as_str());
            }
        }
        Ok(Self { indexes })
    }

    pub fn index(&self, column: ImportColumn) -> Option<usize> {
        self.indexes.get(&column).copied()
    }

    /// 从一行单元格中取出原始行
    pub fn extract(&self, row_num: usize, cells: &[String]) -> RawImportRow {
        let get = |column: ImportColumn| -> String {
            self.index(column)
                .and_then(|idx| cells.get(idx))
                .map(|c| c.trim().to_string())
                .unwrap_or_default()
        };
        RawImportRow {
            row_num,
            career: get(ImportColumn::Career),
            semester: get(ImportColumn::Semester),
            name: get(ImportColumn::Name),
            credits: get(ImportColumn::Credits),
            code: get(ImportColumn::Code),
            description: get(ImportColumn::Description),
            prerequisites: get(ImportColumn::Prerequisites),
        }
    }
}

/// 文件中的原始行（未校验）
#[derive(Debug, Clone, Default)]
pub struct RawImportRow {
    pub row_num: usize,
    pub career: String,
    pub semester: String,
    pub name: String,
    pub credits: String,
    pub code: String,
    pub description: String,
    pub prerequisites: String,
}

impl RawImportRow {
    pub fn is_blank(&self) -> bool {
        self.career.is_empty()
            && self.semester.is_empty()
            && self.name.is_empty()
            && self.credits.is_empty()
            && self.code.is_empty()
    }

    /// 校验并转换字段，失败时返回 (字段, 信息)
    pub fn validate(&self) -> Result<ImportRow, (&'static str, String)> {
        if self.career.is_empty() {
            return Err(("career", "专业不能为空".to_string()));
        }
        let semester = parse_integer(&self.semester)
            .filter(|s| (1..=12).contains(s))
            .ok_or(("semester", format!("无效的学期序号: '{}'", self.semester)))?;
        if self.name.is_empty() {
            return Err(("subject", "课程名称不能为空".to_string()));
        }
        let credits = parse_integer(&self.credits)
            .filter(|c| (1..=30).contains(c))
            .ok_or(("credits", format!("无效的学分: '{}'", self.credits)))?;
        let code = self.code.to_uppercase();
        if code.is_empty()
            || code.len() > 20
            || !code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(("code", format!("无效的课程代码: '{}'", self.code)));
        }
        let prerequisites = parse_prerequisites(&self.prerequisites);
        if prerequisites.contains(&code) {
            return Err(("prerequisites", "课程不能以自身为先修课".to_string()));
        }

        Ok(ImportRow {
            row_num: self.row_num,
            career: self.career.clone(),
            semester,
            name: self.name.clone(),
            credits,
            code,
            description: Some(self.description.clone()).filter(|d| !d.is_empty()),
            prerequisites,
        })
    }
}

/// 校验通过的行
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub row_num: usize,
    pub career: String,
    pub semester: i32,
    pub name: String,
    pub credits: i32,
    pub code: String,
    pub description: Option<String>,
    pub prerequisites: Vec<String>,
}

/// 表格中的数字可能是 "4" 也可能是 "4.0"
fn parse_integer(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    raw.parse::<i32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i32)
    })
}

/// 逗号分隔的先修课代码，`-` 或空表示无
pub fn parse_prerequisites(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        return Vec::new();
    }
    let mut codes: Vec<String> = raw
        .split([',', ';'])
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty() && c != "-")
        .collect();
    codes.dedup();
    codes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportRowStatus {
    Created,
    Linked,
    Error,
}

/// 每行的导入结果
#[derive(Debug, Clone, Serialize)]
pub struct ImportRowResult {
    pub row: usize,
    pub status: ImportRowStatus,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl ImportRowResult {
    pub fn error(row: usize, code: &str, field: &str, message: impl Into<String>) -> Self {
        Self {
            row,
            status: ImportRowStatus::Error,
            code: code.to_string(),
            field: Some(field.to_string()),
            message: message.into(),
        }
    }
}

/// 导入报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubjectImportReport {
    pub total: usize,
    pub created: usize,
    pub linked: usize,
    pub failed: usize,
    pub rows: Vec<ImportRowResult>,
}

impl SubjectImportReport {
    pub fn push(&mut self, result: ImportRowResult) {
        match result.status {
            ImportRowStatus::Created => self.created += 1,
            ImportRowStatus::Linked => self.linked += 1,
            ImportRowStatus::Error => self.failed += 1,
        }
        self.rows.push(result);
    }

    /// 第二轮先修课解析失败时，把已成功的行标记为错误
    pub fn downgrade(&mut self, row: usize, field: &str, message: String) {
        if let Some(existing) = self.rows.iter_mut().find(|r| r.row == row) {
            match existing.status {
                ImportRowStatus::Created => self.created -= 1,
                ImportRowStatus::Linked => self.linked -= 1,
                ImportRowStatus::Error => return,
            }
            self.failed += 1;
            existing.status = ImportRowStatus::Error;
            existing.field = Some(field.to_string());
            existing.message = message;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_header_strips_accents_and_case() {
        assert_eq!(normalize_header(" Créditos "), "creditos");
        assert_eq!(normalize_header("CÓDIGO"), "codigo");
        assert_eq!(normalize_header("\u{feff}Carrera"), "carrera");
        assert_eq!(normalize_header("Prerrequisitos"), "prerrequisitos");
    }

    #[test]
    fn test_column_map_aliases() {
        let map = ColumnMap::from_headers([
            "Carrera",
            "Semestre",
            "Asignatura",
            "Créditos",
            "Código",
            "Descripción",
        ])
        .unwrap();
        assert_eq!(map.index(ImportColumn::Name), Some(2));
        assert_eq!(map.index(ImportColumn::Description), Some(5));
        assert_eq!(map.index(ImportColumn::Prerequisites), None);
    }

    #[test]
    fn test_column_map_reports_missing_column() {
        let err = ColumnMap::from_headers(["career", "semester", "name", "code"]).unwrap_err();
        assert_eq!(err, "credits");
    }

    #[test]
    fn test_validate_row() {
        let map = ColumnMap::from_headers([
            "career",
            "semester",
            "subject",
            "credits",
            "code",
            "prerequisites",
        ])
        .unwrap();
        let raw = map.extract(
            2,
            &cells(&["ING-SIS", "2", "Álgebra II", "4.0", "alg201", "ALG101, MAT100"]),
        );
        let row = raw.validate().unwrap();
        assert_eq!(row.semester, 2);
        assert_eq!(row.credits, 4);
        assert_eq!(row.code, "ALG201");
        assert_eq!(row.prerequisites, vec!["ALG101", "MAT100"]);

        let bad = map.extract(3, &cells(&["ING-SIS", "13", "X", "4", "X1", "-"]));
        assert_eq!(bad.validate().unwrap_err().0, "semester");

        let self_ref = map.extract(4, &cells(&["ING-SIS", "1", "X", "4", "X1", "x1"]));
        assert_eq!(self_ref.validate().unwrap_err().0, "prerequisites");
    }

    #[test]
    fn test_prerequisites_dash_means_none() {
        assert!(parse_prerequisites("-").is_empty());
        assert!(parse_prerequisites("  ").is_empty());
        assert_eq!(parse_prerequisites("a1;b2"), vec!["A1", "B2"]);
    }

    #[test]
    fn test_report_counters() {
        let ok = |row, status| ImportRowResult {
            row,
            status,
            code: "C".to_string(),
            field: None,
            message: String::new(),
        };
        let mut report = SubjectImportReport::default();
        report.push(ok(2, ImportRowStatus::Created));
        report.push(ok(3, ImportRowStatus::Linked));
        report.push(ImportRowResult::error(4, "C", "code", "bad"));
        report.downgrade(2, "prerequisites", "unknown".to_string());
        assert_eq!((report.created, report.linked, report.failed), (0, 1, 2));
    }
}
