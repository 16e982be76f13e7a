//! Output formatters: console, JSON, Markdown and HTML

use crate::config::OutputFormat;
use crate::error::{CareerLensError, Result};
use crate::output::report::{AnalysisReport, ScoreRating};
use crate::processing::role_predictor::RoleScore;
use crate::processing::RoleSource;
use askama::Template;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>CareerLens Analysis: {{ role }}</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0e1117; color: #ffffff; max-width: 900px; margin: 0 auto; padding: 20px; }
        .metric-card { background: #1f2937; padding: 20px; border-radius: 10px; border: 1px solid #374151; text-align: center; }
        .score-big { font-size: 3rem; font-weight: bold; }
        .score-green { color: #10b981; }
        .score-yellow { color: #f59e0b; }
        .score-red { color: #ef4444; }
        .insight { background: #1e3a5f; padding: 12px; border-radius: 6px; margin: 15px 0; }
        .skill-tag { display: inline-block; background: #374151; padding: 5px 10px; margin: 3px; border-radius: 15px; font-size: 0.9em; }
        .skill-tag.missing { background: #4b2c2c; border: 1px solid #ef4444; }
        .metadata { color: #9ca3af; font-size: 0.85em; margin-top: 30px; }
    </style>
    {% endif %}
</head>
<body>
    <h1>Analysis for: {{ role }}</h1>
    {% if has_insight %}<div class="insight">{{ insight }}</div>{% endif %}

    <div class="metric-card">
        <div>Resume Score</div>
        <div class="score-big {{ score_class }}">{{ score }}</div>
        <div>out of 100</div>
    </div>
    <p>{{ summary }}</p>
    <p><strong>{{ guidance }}</strong></p>

    <h2>Present Skills</h2>
    {% if skills_found.is_empty() %}
    <p>No relevant skills found for this role.</p>
    {% else %}
    <div>{% for skill in skills_found %}<span class="skill-tag">{{ skill }}</span>{% endfor %}</div>
    {% endif %}

    <h2>Missing Skills</h2>
    {% if missing_skills.is_empty() %}
    <p>No missing skills. You are a perfect match.</p>
    {% else %}
    <div>{% for skill in missing_skills %}<span class="skill-tag missing">{{ skill }}</span>{% endfor %}</div>
    {% endif %}

    <h2>Improvement Plan</h2>
    <ol>{% for step in improvement_plan %}<li>{{ step }}</li>{% endfor %}</ol>

    <div class="metadata">Generated by CareerLens v{{ version }} on {{ generated_at }} from {{ resume_file }}</div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    role: String,
    has_insight: bool,
    insight: String,
    score: u8,
    score_class: &'static str,
    summary: String,
    guidance: String,
    skills_found: Vec<String>,
    missing_skills: Vec<String>,
    improvement_plan: Vec<String>,
    version: String,
    generated_at: String,
    resume_file: String,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, rating: ScoreRating) -> String {
        let color = rating_color(rating);
        if self.use_colors {
            format!("[{}]", rating.label().color(color).bold())
        } else {
            format!("[{}]", rating.label())
        }
    }

    fn format_skill_list(&self, skills: &[String], color: Color) -> String {
        skills
            .iter()
            .map(|s| format!("  • {}\n", self.colorize(s, color)))
            .collect()
    }

    /// Per-role match counts, as shown by the `predict` command
    pub fn format_role_scores(&self, scores: &[RoleScore], predicted: Option<&str>) -> String {
        let mut output = self.format_header("Role Match Ranking", 1);
        for (i, score) in scores.iter().enumerate() {
            let line = format!(
                "{:>2}. {} ({} of {} skills)",
                i + 1,
                score.role,
                score.match_count,
                score.required_count
            );
            if Some(score.role.as_str()) == predicted {
                output.push_str(&format!("{}\n", self.colorize(&line, Color::Green)));
            } else {
                output.push_str(&format!("{}\n", line));
            }
        }
        match predicted {
            Some(role) => output.push_str(&format!("\nPredicted role: {}\n", self.colorize(role, Color::Cyan))),
            None => output.push_str("\nNo role matched any skill in this resume.\n"),
        }
        output
    }
}

fn rating_color(rating: ScoreRating) -> Color {
    match rating {
        ScoreRating::Strong => Color::Green,
        ScoreRating::Moderate => Color::Yellow,
        ScoreRating::Weak => Color::Red,
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&format!("Analysis for: {}", report.record.role), 1));
        if let Some(insight) = &report.insight {
            output.push_str(&format!("{}\n", self.colorize(insight, Color::Cyan)));
        }

        output.push_str(&self.format_header("Resume Score", 2));
        output.push_str(&format!(
            "Score: {}/100 {}\n",
            report.record.score,
            self.format_score_badge(report.rating)
        ));
        output.push_str(&format!("{}\n", report.summary_line()));
        output.push_str(&format!("{}\n", report.guidance));

        output.push_str(&self.format_header("Present Skills", 3));
        if report.record.skills_found.is_empty() {
            output.push_str("No relevant skills found for this role.\n");
        } else {
            output.push_str(&self.format_skill_list(&report.record.skills_found, Color::Green));
        }

        output.push_str(&self.format_header("Missing Skills", 3));
        if report.record.missing_skills.is_empty() {
            output.push_str("No missing skills! You are a perfect match.\n");
        } else {
            output.push_str(&self.format_skill_list(&report.record.missing_skills, Color::Red));
        }

        output.push_str(&self.format_header("Improvement Plan", 3));
        for (i, step) in report.improvement_plan.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, step));
        }

        if self.detailed {
            output.push_str(&self.format_header("Details", 3));
            let source = match report.role_source {
                RoleSource::Manual => "manual selection",
                RoleSource::AutoDetected => "auto-detected",
            };
            output.push_str(&format!("Role source: {}\n", source));
            match &report.prediction.role {
                Some(role) => output.push_str(&format!(
                    "Predicted role: {} ({} skills matched)\n",
                    role, report.prediction.match_count
                )),
                None => output.push_str("Predicted role: none\n"),
            }
            output.push_str(&format!(
                "Generated: {} | Processing time: {}ms | Resume: {}\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms,
                report.metadata.resume_file
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn score_badge(rating: ScoreRating) -> &'static str {
        match rating {
            ScoreRating::Strong => "🟢",
            ScoreRating::Moderate => "🟡",
            ScoreRating::Weak => "🔴",
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("# Analysis for: {}\n\n", report.record.role));

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Resume:** `{}`\n\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.resume_file
            ));
        }

        if let Some(insight) = &report.insight {
            output.push_str(&format!("> {}\n\n", insight));
        }

        output.push_str(&format!(
            "**Resume Score:** {}/100 {}\n\n",
            report.record.score,
            Self::score_badge(report.rating)
        ));
        output.push_str(&format!("{}\n\n", report.summary_line()));
        output.push_str(&format!("**Guidance:** {}\n\n", report.guidance));

        output.push_str("## Present Skills\n\n");
        if report.record.skills_found.is_empty() {
            output.push_str("_No relevant skills found for this role._\n\n");
        } else {
            for skill in &report.record.skills_found {
                output.push_str(&format!("- {}\n", skill));
            }
            output.push('\n');
        }

        output.push_str("## Missing Skills\n\n");
        if report.record.missing_skills.is_empty() {
            output.push_str("_No missing skills. You are a perfect match._\n\n");
        } else {
            for skill in &report.record.missing_skills {
                output.push_str(&format!("- {}\n", skill));
            }
            output.push('\n');
        }

        output.push_str("## Improvement Plan\n\n");
        for (i, step) in report.improvement_plan.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, step));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &AnalysisReport) -> HtmlTemplate {
        let score_class = match report.rating {
            ScoreRating::Strong => "score-green",
            ScoreRating::Moderate => "score-yellow",
            ScoreRating::Weak => "score-red",
        };

        HtmlTemplate {
            include_styles: self.include_styles,
            role: report.record.role.clone(),
            has_insight: report.insight.is_some(),
            insight: report.insight.clone().unwrap_or_default(),
            score: report.record.score,
            score_class,
            summary: report.summary_line(),
            guidance: report.guidance.clone(),
            skills_found: report.record.skills_found.clone(),
            missing_skills: report.record.missing_skills.clone(),
            improvement_plan: report.improvement_plan.clone(),
            version: report.metadata.version.clone(),
            generated_at: report
                .metadata
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            resume_file: report.metadata.resume_file.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| CareerLensError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }

    pub fn console(&self) -> &ConsoleFormatter {
        &self.console_formatter
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// An existing directory (or a path ending in a separator) gets a generated file name
pub fn report_destination(target: &Path, format: &OutputFormat, resume_name: &str) -> PathBuf {
    let names_directory = target.is_dir()
        || target
            .to_str()
            .is_some_and(|s| s.ends_with(std::path::MAIN_SEPARATOR) || s.ends_with('/'));

    if names_directory {
        target.join(suggest_filename(format, resume_name, true))
    } else {
        target.to_path_buf()
    }
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };
    format!("{}_analysis{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{Analysis, AnalysisRecord, PredictionResult};

    fn sample_report() -> AnalysisReport {
        AnalysisReport::new(
            Analysis {
                record: AnalysisRecord {
                    role: "Data Scientist".to_string(),
                    skills_found: vec!["python".to_string(), "sql".to_string()],
                    missing_skills: vec!["ml".to_string()],
                    score: 66,
                },
                prediction: PredictionResult {
                    role: Some("Data Scientist".to_string()),
                    match_count: 2,
                },
                role_source: RoleSource::AutoDetected,
                required_count: 3,
            },
            "resume.txt",
            5,
        )
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true)
            .format_report(&sample_report())
            .unwrap();

        assert!(output.contains("Analysis for: Data Scientist"));
        assert!(output.contains("Score: 66/100 [PARTIAL MATCH]"));
        assert!(output.contains("You have 2 matching skills out of 3 required."));
        assert!(output.contains("  • ml"));
        assert!(output.contains("Role source: auto-detected"));
    }

    #[test]
    fn test_json_contains_record() {
        let output = JsonFormatter::new(false).format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["record"]["score"], 66);
        assert_eq!(value["record"]["missing_skills"][0], "ml");
        assert_eq!(value["role_source"], "AutoDetected");
    }

    #[test]
    fn test_markdown_sections() {
        let output = MarkdownFormatter::new(false).format_report(&sample_report()).unwrap();

        assert!(output.starts_with("# Analysis for: Data Scientist"));
        assert!(output.contains("## Missing Skills\n\n- ml\n"));
        assert!(!output.contains("**Generated:**"));
    }

    #[test]
    fn test_html_escapes_and_renders() {
        let mut report = sample_report();
        report.record.skills_found = vec!["c++ <templates>".to_string()];

        let output = HtmlFormatter::new(false).format_report(&report).unwrap();
        assert!(output.contains("score-yellow"));
        assert!(!output.contains("<templates>"));
        assert!(output.contains("templates"));
        assert!(!output.contains("<style>"));
    }

    #[test]
    fn test_role_scores_listing() {
        let scores = vec![
            RoleScore { role: "B".to_string(), match_count: 2, required_count: 3 },
            RoleScore { role: "A".to_string(), match_count: 0, required_count: 1 },
        ];
        let output = ConsoleFormatter::new(false, false).format_role_scores(&scores, Some("B"));
        assert!(output.contains(" 1. B (2 of 3 skills)"));
        assert!(output.contains("Predicted role: B"));
    }

    #[test]
    fn test_generator_dispatches_by_format() {
        let generator = ReportGenerator::with_options(false, false, false, false, false);
        let report = sample_report();

        let json = generator.generate_report(&report, &OutputFormat::Json).unwrap();
        assert!(json.starts_with('{'));
        let markdown = generator.generate_report(&report, &OutputFormat::Markdown).unwrap();
        assert!(markdown.starts_with("# "));
        assert_eq!(generator.console().supports_format(), OutputFormat::Console);
        assert_eq!(HtmlFormatter::new(true).supports_format(), OutputFormat::Html);
    }

    #[test]
    fn test_report_destination() {
        let dir = tempfile::tempdir().unwrap();

        let generated = report_destination(dir.path(), &OutputFormat::Json, "jane_cv.pdf");
        assert_eq!(generated.parent(), Some(dir.path()));
        let name = generated.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("jane_cv_analysis_"));
        assert!(name.ends_with(".json"));

        let explicit = dir.path().join("out.md");
        assert_eq!(report_destination(&explicit, &OutputFormat::Markdown, "jane_cv.pdf"), explicit);
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(&OutputFormat::Markdown, "/tmp/jane_cv.pdf", false),
            "jane_cv_analysis.md"
        );
    }
}
