//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use skillgauge_core::result::{AssessmentResult, CategoryScore, LearningPath};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn fmt_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

/// Generate an HTML report from an assessment result.
pub fn generate_html(result: &AssessmentResult) -> String {
    let mut html = String::new();
    let role = result.role.as_deref().unwrap_or("General");

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>skillgauge report: {}</title>\n",
        html_escape(role)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>skillgauge report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Role: <strong>{}</strong> | {} questions | {}</p>\n",
        html_escape(role),
        result.total_questions,
        result.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str(
        "<thead><tr><th>Score</th><th>Level</th><th>Correct</th><th>Time</th><th>Points</th></tr></thead>\n",
    );
    html.push_str(&format!(
        "<tbody><tr><td>{}%</td><td>{}</td><td>{}/{}</td><td>{}</td><td>{}/{}</td></tr></tbody>\n",
        result.score,
        result.overall_competency(),
        result.correct_answers,
        result.total_questions,
        fmt_duration(result.time_spent_secs),
        result.points_earned,
        result.points_possible,
    ));
    html.push_str("</table>\n");
    if result.skipped_questions > 0 {
        html.push_str(&format!(
            "<p class=\"meta\">{} malformed question(s) were excluded from scoring.</p>\n",
            result.skipped_questions
        ));
    }
    html.push_str("</section>\n");

    // Per-category results
    if !result.category_scores.is_empty() {
        html.push_str("<section class=\"categories\">\n");
        html.push_str("<h2>Categories</h2>\n");
        html.push_str("<table class=\"results-table\" id=\"categories\">\n");
        html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Category</th><th onclick=\"sortTable(1)\">Correct</th><th onclick=\"sortTable(2)\">Score</th><th onclick=\"sortTable(3)\">Level</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for cs in &result.category_scores {
            let row_class = if result.skill_gaps.iter().any(|g| g.skill == cs.category) {
                "gap"
            } else {
                "ok"
            };
            html.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}/{}</td><td>{}%</td><td>{}</td></tr>\n",
                row_class,
                html_escape(&cs.category),
                cs.correct,
                cs.total,
                cs.score,
                cs.competency
            ));
        }
        html.push_str("</tbody></table>\n");
        html.push_str(&generate_bar_chart(&result.category_scores));
        html.push_str("</section>\n");
    }

    // Skill gaps
    html.push_str("<section class=\"gaps\">\n");
    html.push_str("<h2>Skill Gaps</h2>\n");
    if result.skill_gaps.is_empty() {
        html.push_str("<p>No skill gaps. Every category scored at or above the pass threshold.</p>\n");
    } else {
        for gap in &result.skill_gaps {
            html.push_str(&format!(
                "<h3>{} ({}%)</h3>\n",
                html_escape(&gap.skill),
                gap.score
            ));
            if !gap.topics.is_empty() {
                html.push_str("<ul>\n");
                for topic in &gap.topics {
                    html.push_str(&format!("<li>{}</li>\n", html_escape(topic)));
                }
                html.push_str("</ul>\n");
            }
        }
    }
    html.push_str("</section>\n");

    // Recommendations
    if !result.recommendations.is_empty() {
        html.push_str("<section class=\"recommendations\">\n");
        html.push_str("<h2>Recommendations</h2>\n<ol>\n");
        for rec in &result.recommendations {
            html.push_str(&format!("<li>{}</li>\n", html_escape(rec)));
        }
        html.push_str("</ol>\n</section>\n");
    }

    // Learning path
    if let Some(path) = LearningPath::from_result(result) {
        html.push_str("<section class=\"learning-path\">\n");
        html.push_str(&format!("<h2>{}</h2>\n", html_escape(&path.title)));
        html.push_str(&format!(
            "<p>{} ({}, about {} hours)</p>\n<ul>\n",
            html_escape(&path.description),
            html_escape(&path.level),
            path.estimated_hours
        ));
        for module in &path.modules {
            html.push_str(&format!("<li>{}</li>\n", html_escape(module)));
        }
        html.push_str("</ul>\n</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(result)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(result: &AssessmentResult, path: &Path) -> Result<()> {
    let html = generate_html(result);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn generate_bar_chart(categories: &[CategoryScore]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = categories.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, cs) in categories.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = cs.score as usize * max_width / 100;

        let color = if cs.score >= 90 {
            "#22c55e"
        } else if cs.score >= 70 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&cs.category)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            cs.score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --ok: #dcfce7; --gap: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --ok: #064e3b; --gap: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.ok { background: var(--ok); }
.gap { background: var(--gap); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('categories');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skillgauge_core::attempt::SubmitTrigger;
    use skillgauge_core::result::{CompetencyLevel, SkillGap};
    use uuid::Uuid;

    fn make_result() -> AssessmentResult {
        AssessmentResult {
            id: Uuid::nil(),
            completed_at: Utc::now(),
            role: Some("Frontend Developer".into()),
            trigger: SubmitTrigger::Manual,
            total_questions: 4,
            correct_answers: 3,
            score: 75,
            time_spent_secs: 300,
            points_earned: 6,
            points_possible: 8,
            skipped_questions: 0,
            category_scores: vec![
                CategoryScore {
                    category: "React".into(),
                    correct: 1,
                    total: 2,
                    score: 50,
                    competency: CompetencyLevel::Beginner,
                },
                CategoryScore {
                    category: "CSS".into(),
                    correct: 2,
                    total: 2,
                    score: 100,
                    competency: CompetencyLevel::Expert,
                },
            ],
            skill_gaps: vec![SkillGap {
                skill: "React".into(),
                score: 50,
                topics: vec!["hooks".into()],
            }],
            strengths: vec!["CSS".into()],
            difficulty_breakdown: vec![],
            recommendations: vec!["Focus on improving React".into()],
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&make_result());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Frontend Developer"));
        assert!(html.contains("React"));
        assert!(html.contains("50%"));
        assert!(html.contains("<svg"));
        assert!(html.contains("Focus on improving React"));
        assert!(html.contains("Personalized Learning Path"));
    }

    #[test]
    fn gap_rows_are_highlighted() {
        let html = generate_html(&make_result());
        assert!(html.contains("<tr class=\"gap\"><td>React</td>"));
        assert!(html.contains("<tr class=\"ok\"><td>CSS</td>"));
    }

    #[test]
    fn user_content_is_escaped() {
        let mut result = make_result();
        result.role = Some("<script>alert(1)</script>".into());

        let html = generate_html(&result);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        write_html_report(&make_result(), &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
