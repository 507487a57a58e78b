//! Problem package export
//!
//! Layout of the archive:
//!
//! ```text
//! problem.xml
//! statement.tex      (when the problem has a statement)
//! files/<name>       every uploaded problem file
//! tests/01, 01.a     input and expected output of each test, in test order
//! ```

use std::collections::HashSet;
use std::io::{Cursor, Write};

use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::{
    constants::{file_types, languages},
    error::{AppError, AppResult},
    models::{Problem, ProblemFile},
    services::problem_service::{ProblemDetail, ProblemService},
    utils::validation::sanitize_file_name,
};

/// A problem file together with its stored contents
struct PackagedFile {
    file: ProblemFile,
    contents: Vec<u8>,
}

/// Export service
pub struct ExportService;

impl ExportService {
    /// Build the package for a problem; returns the archive name and bytes
    pub async fn export_problem(
        pool: &PgPool,
        problem_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<(String, Vec<u8>)> {
        let detail = ProblemService::get_detail(pool, problem_id, user_id).await?;

        let mut packaged = Vec::with_capacity(detail.files.len());
        for file in &detail.files {
            match tokio::fs::read(&file.file_path).await {
                Ok(contents) => packaged.push(PackagedFile {
                    file: file.clone(),
                    contents,
                }),
                Err(e) => {
                    tracing::warn!(
                        problem_id = %problem_id,
                        file_name = %file.file_name,
                        error = %e,
                        "Stored file missing, leaving it out of the export"
                    );
                }
            }
        }

        let archive_name = format!(
            "{}.zip",
            sanitize_file_name(&detail.problem.name).unwrap_or_else(|| "problem".to_string())
        );

        let missing_outputs = detail.test_cases.iter().filter(|c| !c.has_output()).count();
        if missing_outputs > 0 {
            tracing::warn!(
                problem_id = %problem_id,
                missing_outputs,
                "Exporting test cases without expected output"
            );
        }

        let bytes = tokio::task::spawn_blocking(move || build_archive(&detail, &packaged))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Export task failed: {}", e)))??;

        tracing::info!(problem_id = %problem_id, bytes = bytes.len(), "Problem exported");

        Ok((archive_name, bytes))
    }
}

fn build_archive(detail: &ProblemDetail, files: &[PackagedFile]) -> anyhow::Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let checker = files
        .iter()
        .rev()
        .find(|f| f.file.file_type == file_types::CHECKER)
        .map(|f| &f.file);
    let xml = problem_xml(&detail.problem, detail.test_cases.len(), checker);
    zip.start_file("problem.xml", options)?;
    zip.write_all(xml.as_bytes())?;

    if let Some(statement) = detail.problem.statement_latex.as_deref() {
        zip.start_file("statement.tex", options)?;
        zip.write_all(statement.as_bytes())?;
    }

    // Newest upload wins when names repeat
    let mut seen = HashSet::new();
    for packaged in files.iter().rev() {
        if !seen.insert(packaged.file.file_name.as_str()) {
            continue;
        }
        zip.start_file(format!("files/{}", packaged.file.file_name), options)
            .with_context(|| format!("adding {}", packaged.file.file_name))?;
        zip.write_all(&packaged.contents)?;
    }

    for (position, case) in detail.test_cases.iter().enumerate() {
        let stem = format!("tests/{:02}", position + 1);
        zip.start_file(stem.as_str(), options)?;
        zip.write_all(case.input_data.as_bytes())?;
        zip.start_file(format!("{}.a", stem), options)?;
        zip.write_all(case.output_data.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

fn problem_xml(problem: &Problem, test_count: usize, checker: Option<&ProblemFile>) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<problem short-name=\"{}\">\n", escape_xml(&problem.name)));
    xml.push_str("    <names>\n");
    xml.push_str(&format!(
        "        <name language=\"english\" value=\"{}\"/>\n",
        escape_xml(&problem.title)
    ));
    xml.push_str("    </names>\n");
    xml.push_str("    <judging>\n");
    xml.push_str("        <testset name=\"tests\">\n");
    xml.push_str(&format!("            <time-limit>{}</time-limit>\n", problem.time_limit_ms));
    xml.push_str(&format!(
        "            <memory-limit>{}</memory-limit>\n",
        problem.memory_limit_bytes()
    ));
    xml.push_str(&format!("            <test-count>{}</test-count>\n", test_count));
    xml.push_str("            <input-path-pattern>tests/%02d</input-path-pattern>\n");
    xml.push_str("            <answer-path-pattern>tests/%02d.a</answer-path-pattern>\n");
    xml.push_str("        </testset>\n");
    xml.push_str("    </judging>\n");

    if let Some(checker) = checker {
        xml.push_str("    <assets>\n");
        xml.push_str("        <checker>\n");
        xml.push_str(&format!(
            "            <source path=\"files/{}\" type=\"{}\"/>\n",
            escape_xml(&checker.file_name),
            source_type(checker.language.as_deref())
        ));
        xml.push_str("        </checker>\n");
        xml.push_str("    </assets>\n");
    }

    xml.push_str("</problem>\n");
    xml
}

fn source_type(language: Option<&str>) -> &'static str {
    match language {
        Some(languages::CPP) => "cpp.g++17",
        Some(languages::C) => "c.gcc",
        Some(languages::PYTHON) => "python.3",
        Some(languages::JAVA) => "java11",
        _ => "unknown",
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use chrono::Utc;

    use super::*;
    use crate::models::TestCase;

    fn problem() -> Problem {
        let now = Utc::now();
        Problem {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            name: "a-plus-b".to_string(),
            title: "A & B <easy>".to_string(),
            statement_latex: Some("Print $a+b$.".to_string()),
            time_limit_ms: 2000,
            memory_limit_mb: 256,
            input_format: None,
            output_format: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn file(problem_id: Uuid, file_type: &str, name: &str) -> ProblemFile {
        ProblemFile {
            id: Uuid::new_v4(),
            problem_id,
            file_type: file_type.to_string(),
            file_name: name.to_string(),
            file_path: format!("/uploads/{}", name),
            language: Some(languages::CPP.to_string()),
            created_at: Utc::now(),
        }
    }

    fn case(problem_id: Uuid, index: i32, input: &str, output: &str) -> TestCase {
        let now = Utc::now();
        TestCase {
            id: Uuid::new_v4(),
            problem_id,
            test_group_id: Uuid::nil(),
            test_index: index,
            input_data: input.to_string(),
            output_data: output.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_problem_xml_escapes_and_counts() {
        let problem = problem();
        let xml = problem_xml(&problem, 3, None);

        assert!(xml.contains("value=\"A &amp; B &lt;easy&gt;\""));
        assert!(xml.contains("<time-limit>2000</time-limit>"));
        assert!(xml.contains("<memory-limit>268435456</memory-limit>"));
        assert!(xml.contains("<test-count>3</test-count>"));
        assert!(!xml.contains("<checker>"));
    }

    #[test]
    fn test_problem_xml_references_checker() {
        let problem = problem();
        let checker = file(problem.id, file_types::CHECKER, "check.cpp");
        let xml = problem_xml(&problem, 0, Some(&checker));

        assert!(xml.contains("<source path=\"files/check.cpp\" type=\"cpp.g++17\"/>"));
    }

    #[test]
    fn test_archive_layout() {
        let problem = problem();
        let problem_id = problem.id;
        let detail = ProblemDetail {
            problem,
            test_groups: Vec::new(),
            test_cases: vec![case(problem_id, 1, "5 3", "8"), case(problem_id, 2, "1 1", "")],
            files: Vec::new(),
        };
        let files = vec![
            PackagedFile {
                file: file(problem_id, file_types::GENERATOR, "gen.cpp"),
                contents: b"old".to_vec(),
            },
            PackagedFile {
                file: file(problem_id, file_types::GENERATOR, "gen.cpp"),
                contents: b"new".to_vec(),
            },
        ];

        let bytes = build_archive(&detail, &files).unwrap();

        assert!(read_entry(&bytes, "problem.xml").contains("<test-count>2</test-count>"));
        assert_eq!(read_entry(&bytes, "statement.tex"), "Print $a+b$.");
        assert_eq!(read_entry(&bytes, "files/gen.cpp"), "new");
        assert_eq!(read_entry(&bytes, "tests/01"), "5 3");
        assert_eq!(read_entry(&bytes, "tests/01.a"), "8");
        assert_eq!(read_entry(&bytes, "tests/02.a"), "");
    }
}
