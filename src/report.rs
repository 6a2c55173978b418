use crate::paths::AppPaths;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything the health report needs, already aggregated. Vitals come from
/// the wearable sync; the medication counters from the reminder history.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub name: String,
    pub email: String,
    pub start_date: String,
    pub end_date: String,
    pub avg_pulse_rate: u32,
    pub avg_oxygen: u32,
    pub total_taken: u32,
    pub total_skipped: u32,
    pub skipped_dates: String,
    pub skipped_summaries: Vec<String>,
}

impl ReportData {
    /// Placeholder numbers shown until the vitals sync backend ships.
    pub fn sample(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            start_date: "Jan 1, 2025".to_string(),
            end_date: "Jan 31, 2025".to_string(),
            avg_pulse_rate: 76,
            avg_oxygen: 97,
            total_taken: 54,
            total_skipped: 6,
            skipped_dates: "Jan 4, Jan 11, Jan 19".to_string(),
            skipped_summaries: vec![
                "Jan 4: skipped 2 pill(s) of Paracetamol".to_string(),
                "Jan 11: skipped 1 pill(s) of Ibuprofen".to_string(),
                "Jan 19: skipped 3 pill(s) of Amoxicillin".to_string(),
            ],
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render the report document. Layout mirrors what the companion mobile app
/// prints, so reports look the same regardless of which client produced them.
pub fn render_html(data: &ReportData) -> String {
    let summaries: String = data
        .skipped_summaries
        .iter()
        .map(|s| format!("<li><p>{}</p></li>", escape(s)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>Remedix: Health and Medication Report</title>
    <style>
      body {{ font-family: Arial, sans-serif; margin: 20px; color: #333; }}
      .header {{ text-align: center; font-size: 24px; font-weight: bold; }}
      .date-range {{ text-align: center; font-size: 14px; margin-bottom: 50px; }}
      .section-title {{ color: #f84d4d; }}
      .details {{ margin-left: 20px; }}
      .color_red {{ color: #f84d4d; }}
      .reminder {{ margin-top: 50px; font-weight: bold; }}
    </style>
  </head>
  <body>
    <h1 class="header">Remedix: Health and Medication Report</h1>
    <div class="date-range">Date Range: {start} - {end}</div>

    <div class="disclaimer">
      <p>
        <strong class="color_red">DISCLAIMER</strong><br />
        This service is meant to provide helpful information, but it is not a
        replacement for professional medical advice from a doctor. Always
        consult a healthcare professional for medical concerns.
      </p>
    </div>

    <div class="patient-info">
      <p>
        <strong class="section-title">PATIENT INFORMATION</strong><br />
        <strong>Name:</strong> {name}<br />
        <strong>Email:</strong>
        <a href="mailto:{email}">{email}</a>
      </p>
    </div>

    <hr />

    <div class="vital-stats">
      <p><strong class="section-title">VITAL STATISTICS</strong></p>
      <p>
        <strong>Average Heart Rate: </strong> {pulse}bpm<br />
        (Normal: 60 - 100 bpm)
      </p>
      <p>
        <strong>Average Oxygen Levels:</strong> {oxygen}%<br />
        (Normal: 95 - 100 %)
      </p>
    </div>

    <div class="medication-tracking">
      <p><strong class="section-title">MEDICATION TRACKING</strong></p>
      <p>
        <strong>Pill(s) Taken:</strong> {taken} pill(s)<br />
        <strong>Pill(s) Missed:</strong> {skipped} pill(s)<br />
        <strong> Missed Dates:</strong> {skipped_dates}
      </p>
    </div>

    <div class="missed-medication">
      <p><strong class="section-title">DETAILS OF MISSED MEDICATION</strong></p>
      <ul class="details">{summaries}</ul>
    </div>

    <hr />

    <p class="reminder">
      Thank you for using Remedix! <br />
      support@remedix.org
    </p>
  </body>
</html>
"#,
        start = escape(&data.start_date),
        end = escape(&data.end_date),
        name = escape(&data.name),
        email = escape(&data.email),
        pulse = data.avg_pulse_rate,
        oxygen = data.avg_oxygen,
        taken = data.total_taken,
        skipped = data.total_skipped,
        skipped_dates = escape(&data.skipped_dates),
        summaries = summaries,
    )
}

/// Render and persist the report, returning where it landed.
pub fn write_report(data: &ReportData) -> Result<PathBuf> {
    let path = AppPaths::get_report_path()?;
    write_report_to(data, &path)?;
    Ok(path)
}

fn write_report_to(data: &ReportData, path: &Path) -> Result<()> {
    let html = render_html(data);
    // Write-then-rename so an interrupted write never leaves a torn file.
    let tmp = path.with_extension("html.tmp");
    fs::write(&tmp, html).with_context(|| format!("Failed to write report to {:?}", tmp))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to move report into {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_embeds_patient_and_totals() {
        let data = ReportData::sample("Ana Cruz", "ana@example.com");
        let html = render_html(&data);
        assert!(html.contains("Ana Cruz"));
        assert!(html.contains("mailto:ana@example.com"));
        assert!(html.contains("76bpm"));
        assert!(html.contains("54 pill(s)"));
        assert!(html.contains("Jan 4: skipped 2 pill(s) of Paracetamol"));
    }

    #[test]
    fn test_render_escapes_markup() {
        let mut data = ReportData::sample("<script>", "a@b.c");
        data.skipped_dates = "Jan 1 & Jan 2".to_string();
        let html = render_html(&data);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Jan 1 &amp; Jan 2"));
    }

    #[test]
    fn test_write_report_to_disk() {
        let dir = std::env::temp_dir().join("remedix-report-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.html");

        let data = ReportData::sample("Ana", "ana@example.com");
        write_report_to(&data, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(!path.with_extension("html.tmp").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
