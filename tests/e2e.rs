//! End-to-end integration tests for marksheet-verify.
//!
//! Text-transcript tests always run: they write fixtures into a temp dir and
//! drive the public API exactly as the CLI does.
//!
//! PDF tests use real transcripts in `./test_cases/` and need the pdfium
//! shared library. They are gated behind the `E2E_ENABLED` environment
//! variable so they do not run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=. cargo test --test e2e -- --nocapture

use marksheet_verify::{
    expand_inputs, verify_batch, verify_bytes, verify_file, verify_text, verify_to_file,
    BatchSummary, DocumentError, DocumentReport, DocumentStatus, GradeScale, ReportedSource,
    VerificationField, VerificationProgressCallback, VerifierConfig, VerifyError,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP: test file not found: {}", p.display());
            return;
        }
        p
    }};
}

const CONSISTENT: &str = "\
Department of Computer Engineering
Statement of Grades  Semester III
Sr  Code    Course Title                 Credit  Earned  Grade
1   CS201   Data Structures              4.0     4.0     A
2   MA202   Linear Algebra               3.0     3.0     B+
Credits 7.0 EGP 60.0 SGPA 8.57
";

const ALTERED: &str = "\
Statement of Grades  Semester IV
CS301 Operating Systems 4.0 4.0 B
CS302 Computer Networks 3.0 3.0 B
Credits 7.0 EGP 49.0 SGPA 9.20
";

/// Totals printed without labels.
const UNLABELLED: &str = "\
CS401 Compilers 4.0 4.0 A
CS402 Databases 4.0 4.0 B+
CS403 Graphics 3.0 3.0 A
HS401 Economics 2.0 2.0 P
Semester total 13.0 105.0 8.08
";

fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

fn assert_report_consistent(report: &DocumentReport, context: &str) {
    assert_eq!(report.verification.len(), 3, "[{context}] three results");
    for v in &report.verification {
        assert_eq!(
            v.matches,
            (v.calculated - v.reported).abs() < 0.1,
            "[{context}] {} match flag disagrees with its values",
            v.field
        );
    }
    for c in &report.courses {
        assert!(
            (0.5..=5.0).contains(&c.credit) && (0.0..=c.credit).contains(&c.earned),
            "[{context}] {} has out-of-range credits",
            c.code
        );
    }
}

// ── Single-document tests (text transcripts, always run) ─────────────────────

#[tokio::test]
async fn test_verify_consistent_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "sem3.txt", CONSISTENT);

    let report = verify_file(&path, &VerifierConfig::default())
        .await
        .expect("text transcript should verify");

    assert_eq!(report.document, "sem3.txt");
    assert_eq!(report.status, DocumentStatus::Verified);
    assert_report_consistent(&report, "sem3");

    let codes: Vec<_> = report.courses.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["CS201", "MA202"]);
    assert_eq!(report.reported.source, ReportedSource::Labelled);
    assert_eq!(report.reported.credits, 7.0);
    assert_eq!(report.reported.earned_grade_points, 60.0);
    assert_eq!(report.reported.gpa, 8.57);
}

#[tokio::test]
async fn test_verify_altered_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "sem4.txt", ALTERED);

    let report = verify_file(&path, &VerifierConfig::default()).await.unwrap();

    assert_eq!(report.status, DocumentStatus::Mismatch);
    assert_report_consistent(&report, "sem4");
    let gpa = report.result(VerificationField::Gpa).unwrap();
    assert_eq!(gpa.calculated, 7.0);
    assert_eq!(gpa.reported, 9.2);
    assert!(!gpa.matches);
    assert!(report.result(VerificationField::Egp).unwrap().matches);
    assert!(report.result(VerificationField::Credits).unwrap().matches);
}

#[tokio::test]
async fn test_verify_unlabelled_totals() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "sem7.txt", UNLABELLED);

    let report = verify_file(&path, &VerifierConfig::default()).await.unwrap();

    assert_eq!(report.courses.len(), 4);
    assert_eq!(report.reported.source, ReportedSource::Positional);
    // 9*4 + 8*4 + 9*3 + 5*2 = 105 over 13 credits
    assert_eq!(report.result(VerificationField::Egp).unwrap().calculated, 105.0);
    assert_eq!(report.result(VerificationField::Gpa).unwrap().calculated, 8.08);
    assert_eq!(report.status, DocumentStatus::Verified);
    assert_report_consistent(&report, "sem7");
}

#[tokio::test]
async fn test_two_column_line_recovers_second_course() {
    // One visual row holding two courses. The column reading claims the
    // first code with the trailing numbers; the templates add the second.
    let text = "EE101 4.0 4.0 A+ EE102 2.0 2.0 B\n";
    let report = verify_text("twocol", text, &VerifierConfig::default());

    let codes: Vec<_> = report.courses.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["EE101", "EE102"]);
    assert_eq!(report.stats.column_rows, 1);
    assert_eq!(report.stats.pattern_rows, 2);
    assert_eq!(report.stats.duplicates_dropped, 1);
    assert_eq!(report.courses[0].earned, 2.0);
}

#[tokio::test]
async fn test_scenario_reported_values_are_found() {
    let report = verify_text(
        "scenario",
        "Semester summary\nCredits 20.0 EGP 180.0 SGPA 9.00\n",
        &VerifierConfig::default(),
    );
    assert_eq!(report.reported.credits, 20.0);
    assert_eq!(report.reported.earned_grade_points, 180.0);
    assert_eq!(report.reported.gpa, 9.0);
    assert_eq!(report.status, DocumentStatus::NoCoursesFound);
}

#[tokio::test]
async fn test_scenario_invalid_code_yields_nothing() {
    let report = verify_text("scenario", "X99 3.0 3.0 A\n", &VerifierConfig::default());
    assert!(report.courses.is_empty());
    assert_eq!(report.stats.column_rows, 0);
    assert_eq!(report.stats.pattern_rows, 0);
    assert_eq!(report.status, DocumentStatus::NoCoursesFound);
}

#[tokio::test]
async fn test_empty_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "blank.txt", "\n   \n");

    let report = verify_file(&path, &VerifierConfig::default()).await.unwrap();
    assert_eq!(report.status, DocumentStatus::NoTextExtracted);
    assert!(report.status.is_empty());
}

#[tokio::test]
async fn test_missing_file_is_an_error() {
    let result = verify_file("/definitely/not/a/real/file.pdf", &VerifierConfig::default()).await;
    assert!(matches!(result, Err(VerifyError::FileNotFound { .. })));
}

#[tokio::test]
async fn test_custom_grade_scale() {
    let scale = GradeScale::from_json(r#"{"O": 10, "A": 9, "B": 8, "F": 0}"#).unwrap();
    let config = VerifierConfig::builder().grade_scale(scale).build().unwrap();

    let text = "CS201 Data Structures 4.0 4.0 O\nCS202 Algorithms 4.0 4.0 B\n\
                Credits 8.0 EGP 72.0 SGPA 9.00\n";
    let report = verify_text("custom", text, &config);

    assert_eq!(report.courses.len(), 2);
    assert_eq!(report.status, DocumentStatus::Verified);
}

#[tokio::test]
async fn test_verify_bytes_keeps_document_name() {
    let report = verify_bytes("upload-42.txt", CONSISTENT.as_bytes(), &VerifierConfig::default())
        .await
        .unwrap();
    assert_eq!(report.document, "upload-42.txt");
    assert_eq!(report.status, DocumentStatus::Verified);
}

#[tokio::test]
async fn test_verify_to_file_writes_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "sem3.txt", CONSISTENT);
    let out = dir.path().join("reports/sem3.json");

    let report = verify_to_file(&path, &out, &VerifierConfig::default())
        .await
        .unwrap();

    let written = std::fs::read_to_string(&out).expect("report file exists");
    let parsed: DocumentReport = serde_json::from_str(&written).expect("valid report JSON");
    assert_eq!(parsed, report);
    assert!(!dir.path().join("reports/sem3.json.tmp").exists());
}

// ── Batch tests (always run) ─────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    started: AtomicUsize,
    errors: Mutex<Vec<String>>,
    completed: Mutex<Vec<(String, DocumentStatus)>>,
    batch: Mutex<Option<(usize, usize)>>,
}

impl VerificationProgressCallback for Recorder {
    fn on_document_start(&self, _num: usize, _total: usize, _name: &str) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_document_complete(&self, _num: usize, _total: usize, name: &str, status: DocumentStatus) {
        self.completed.lock().unwrap().push((name.to_string(), status));
    }

    fn on_document_error(&self, _num: usize, _total: usize, name: &str, _error: &str) {
        self.errors.lock().unwrap().push(name.to_string());
    }

    fn on_batch_complete(&self, total: usize, success_count: usize) {
        *self.batch.lock().unwrap() = Some((total, success_count));
    }
}

#[tokio::test]
async fn test_batch_isolates_failures_and_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_fixture(dir.path(), "a.txt", CONSISTENT),
        dir.path().join("missing.pdf"),
        write_fixture(dir.path(), "c.txt", ALTERED),
        write_fixture(dir.path(), "d.txt", "no transcript here\n"),
    ];

    let recorder = Arc::new(Recorder::default());
    let config = VerifierConfig::builder()
        .concurrency(3)
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    let entries = verify_batch(&paths, &config).await;

    let names: Vec<_> = entries.iter().map(|e| e.document.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "missing.pdf", "c.txt", "d.txt"]);

    assert_eq!(entries[0].result.as_ref().unwrap().status, DocumentStatus::Verified);
    match &entries[1].result {
        Err(e @ DocumentError::Input { .. }) => assert_eq!(e.document(), "missing.pdf"),
        other => panic!("expected input error, got {other:?}"),
    }
    assert_eq!(entries[2].result.as_ref().unwrap().status, DocumentStatus::Mismatch);
    assert_eq!(
        entries[3].result.as_ref().unwrap().status,
        DocumentStatus::NoCoursesFound
    );

    let summary = BatchSummary::from_entries(&entries);
    assert_eq!(
        summary,
        BatchSummary {
            total: 4,
            verified: 1,
            mismatched: 1,
            empty: 1,
            failed: 1,
        }
    );
    assert!(!summary.all_verified());

    assert_eq!(recorder.started.load(Ordering::SeqCst), 4);
    assert_eq!(*recorder.errors.lock().unwrap(), vec!["missing.pdf".to_string()]);
    assert_eq!(recorder.completed.lock().unwrap().len(), 3);
    assert_eq!(*recorder.batch.lock().unwrap(), Some((4, 3)));
}

#[tokio::test]
async fn test_batch_over_expanded_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "02.txt", ALTERED);
    write_fixture(dir.path(), "01.txt", CONSISTENT);
    write_fixture(dir.path(), "notes.md", CONSISTENT);

    let paths = expand_inputs(&[dir.path().to_path_buf()]).unwrap();
    let entries = verify_batch(&paths, &VerifierConfig::default()).await;

    let names: Vec<_> = entries.iter().map(|e| e.document.as_str()).collect();
    assert_eq!(names, vec!["01.txt", "02.txt"]);
}

#[tokio::test]
async fn test_batch_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_fixture(dir.path(), "a.txt", CONSISTENT),
        dir.path().join("gone.txt"),
    ];
    let entries = verify_batch(&paths, &VerifierConfig::default()).await;

    let json = serde_json::to_value(&entries).unwrap();
    assert_eq!(json[0]["document"], "a.txt");
    assert!(json[0]["result"]["report"].is_object());
    assert!(json[1]["result"]["error"].is_object());
}

#[test]
fn test_batch_from_sync_context() {
    let entries = tokio_test::block_on(verify_batch(&[], &VerifierConfig::default()));
    assert!(entries.is_empty());
    assert!(!BatchSummary::from_entries(&entries).all_verified());
}

// ── Callback API tests (always run) ──────────────────────────────────────────

/// `Arc<dyn VerificationProgressCallback>` must be movable into a spawned
/// task, which is where a batch runner built on the library calls it.
#[tokio::test]
async fn test_callback_send_in_tokio_spawn() {
    let recorder = Arc::new(Recorder::default());
    let cb: Arc<dyn VerificationProgressCallback> = recorder.clone();

    tokio::spawn(async move {
        cb.on_document_error(2, 5, "scan.pdf", "PDF requires a password");
    })
    .await
    .expect("spawn must succeed");

    assert_eq!(*recorder.errors.lock().unwrap(), vec!["scan.pdf".to_string()]);
}

#[test]
fn test_noop_callback_is_send_sync() {
    use marksheet_verify::NoopProgressCallback;

    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NoopProgressCallback>();

    let cb: Arc<dyn VerificationProgressCallback> = Arc::new(NoopProgressCallback);
    cb.on_document_error(1, 1, "a.pdf", "an error");
}

// ── PDF tests (need pdfium + test_cases/) ────────────────────────────────────

#[tokio::test]
async fn test_pdf_transcript() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("transcript.pdf"));

    let report = verify_file(&path, &VerifierConfig::default())
        .await
        .expect("PDF transcript should be readable");

    assert!(!report.status.is_empty(), "no courses extracted from PDF");
    assert_report_consistent(&report, "transcript.pdf");
    println!(
        "[transcript.pdf] {} courses, {} in {}ms",
        report.courses.len(),
        report.status,
        report.stats.duration_ms
    );
}

#[tokio::test]
async fn test_pdf_batch_over_test_cases() {
    let dir = e2e_skip_unless_ready!(test_cases_dir());

    let paths = expand_inputs(&[dir]).unwrap();
    let entries = verify_batch(&paths, &VerifierConfig::default()).await;
    assert_eq!(entries.len(), paths.len());

    for entry in &entries {
        match &entry.result {
            Ok(report) => assert_report_consistent(report, &entry.document),
            Err(e) => println!("[{}] {}", entry.document, e),
        }
    }
    println!("{:?}", BatchSummary::from_entries(&entries));
}

#[tokio::test]
async fn test_pdf_corrupt_file() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP");
        return;
    }

    let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    std::io::Write::write_all(&mut tmp, b"%PDF-1.4\nthis is not a pdf body").unwrap();

    let result = verify_file(tmp.path(), &VerifierConfig::default()).await;
    assert!(
        matches!(
            result,
            Err(VerifyError::CorruptPdf { .. }) | Err(VerifyError::PdfiumBindingFailed(_))
        ),
        "got {result:?}"
    );
}
