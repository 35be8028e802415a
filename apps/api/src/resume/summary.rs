//! Markdown rendering of a parsed resume for display.

use crate::resume::models::ResumeRecord;

const MISSING: &str = "N/A";

fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}

/// Renders contact details, skills, and numbered work history.
pub fn render_summary(record: &ResumeRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("**Name:** {}\n", or_missing(&record.name)));
    out.push_str(&format!("**Email:** {}\n", or_missing(&record.email)));
    out.push_str(&format!("**Phone:** {}\n", or_missing(&record.phone)));

    if !record.skills.is_empty() {
        out.push_str(&format!("**Skills:** {}\n", record.skills.join(", ")));
    }

    if !record.work_experience.is_empty() {
        out.push_str("\n### Work Experience\n");
        for (idx, job) in record.work_experience.iter().enumerate() {
            out.push_str(&format!(
                "{}. **{} at {}**\n",
                idx + 1,
                or_missing(&job.designation),
                or_missing(&job.company)
            ));
            out.push_str(&format!(
                "   **Duration:** {} ({} years, {} months)\n",
                or_missing(&job.duration),
                job.duration_years.unwrap_or(0),
                job.duration_months.unwrap_or(0)
            ));
            if !job.projects.is_empty() {
                out.push_str("   **Projects:**\n");
                for project in &job.projects {
                    out.push_str(&format!(
                        "   - **{}**: {}\n",
                        or_missing(&project.title),
                        or_missing(&project.description)
                    ));
                }
            }
        }
    }

    out
}
