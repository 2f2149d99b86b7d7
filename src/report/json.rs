use crate::report::{ReportError, SummaryData};

pub fn render_summary_json(data: &SummaryData) -> Result<String, ReportError> {
    let mut out = serde_json::to_string_pretty(data)?;
    out.push('\n');
    Ok(out)
}
