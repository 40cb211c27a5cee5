use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateReportRequest {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateReportParams {
    #[serde(default)]
    pub resend: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExportReportParams {
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportListParams {
    pub year: Option<i32>,
}
