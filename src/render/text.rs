use crate::report::PassReport;

/// Render pass reports as plain text: each block is the pass title, its
/// body lines, and one blank separator line.
pub fn render_text(reports: &[PassReport]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&report.title);
        out.push('\n');
        for line in &report.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
