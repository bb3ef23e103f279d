use crate::{RenderableReport, RenderableSeverity};

/// Render violations as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path},title={rule}::{message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for v in &report.violations {
        let level = match v.severity {
            RenderableSeverity::Fail => "error",
            RenderableSeverity::Warn => "warning",
        };

        let mut meta = Vec::new();
        if let Some(file) = &report.project_file {
            meta.push(format!("file={}", escape_property(file)));
        }
        meta.push(format!("title={}", escape_property(&v.rule_id)));

        let mut message = v.message.clone();
        if let Some(cause) = &v.cause {
            message.push_str(&format!(" (cause: {cause})"));
        }

        out.push(format!(
            "::{} {}::{}",
            level,
            meta.join(","),
            escape_data(&message)
        ));
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
