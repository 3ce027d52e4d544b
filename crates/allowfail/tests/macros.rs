//! Tests for the `#[allow_fail]` attribute.

#![cfg(feature = "macros")]

use std::io;
use std::sync::{Mutex, OnceLock};

use allowfail::testing::{CapturedLogs, RecordingHandler};
use allowfail::{DynError, Logger, Outcome, Panicked, allow_fail};

#[derive(Debug)]
struct ValueError(&'static str);

impl std::fmt::Display for ValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for ValueError {}

fn recorder() -> &'static RecordingHandler {
    static RECORDER: OnceLock<RecordingHandler> = OnceLock::new();
    RECORDER.get_or_init(RecordingHandler::new)
}

fn labels() -> &'static Mutex<Vec<String>> {
    static LABELS: OnceLock<Mutex<Vec<String>>> = OnceLock::new();
    LABELS.get_or_init(Mutex::default)
}

fn log(label: &str, _err: &DynError) {
    labels().lock().unwrap().push(label.to_string());
}

fn labels_with(prefix: &str) -> Vec<String> {
    labels()
        .lock()
        .unwrap()
        .iter()
        .filter(|l| l.starts_with(prefix))
        .cloned()
        .collect()
}

#[allow_fail("test {}", "valueerror", on_error = log)]
fn valueerror() -> Result<i32, ValueError> {
    Err(ValueError("test exception"))
}

#[allow_fail("test {}", "func", on_error = log)]
fn func() -> Result<i32, ValueError> {
    Ok(1)
}

#[test]
fn test_decorator() {
    let res = valueerror();
    assert!(!res.is_ok());
    let err = res.err().unwrap();
    assert_eq!(err.downcast_ref::<ValueError>().unwrap().0, "test exception");
    assert_eq!(labels_with("test valueerror"), vec!["test valueerror".to_string()]);

    let res = func();
    assert!(res.is_ok());
    assert_eq!(res.ok(), Some(1));
    assert!(labels_with("test func").is_empty());
}

/// Divides two numbers.
#[allow_fail("divide {} by {}", a, b, on_error = recorder().clone())]
pub fn divide(a: i32, b: i32) -> i32 {
    a / b
}

#[test]
fn params_can_use_arguments() {
    assert_eq!(divide(9, 3).ok(), Some(3));

    let outcome = divide(1, 0);
    assert!(outcome.failed_with::<Panicked>());
    assert!(
        recorder()
            .reports()
            .iter()
            .any(|r| r.label == "divide 1 by 0" && r.panicked)
    );
}

#[allow_fail("early return")]
fn early_return(flag: bool) -> Result<&'static str, ValueError> {
    if flag {
        return Ok("early");
    }
    let parsed: i32 = "x".parse().map_err(|_| ValueError("not a number"))?;
    Ok(if parsed > 0 { "positive" } else { "other" })
}

#[test]
fn return_and_question_mark_stay_local() {
    assert_eq!(early_return(true).ok(), Some("early"));
    let failed = early_return(false);
    assert_eq!(failed.error().unwrap().to_string(), "not a number");
}

#[allow_fail("io {}", path)]
fn read_missing(path: &str) -> io::Result<String> {
    std::fs::read_to_string(path)
}

#[test]
fn result_aliases_are_supported() {
    let outcome: Outcome<String> = read_missing("/definitely/not/here.txt");
    assert!(outcome.failed_with::<io::Error>());
}

#[allow_fail("unit work")]
fn unit_work() {}

#[test]
fn unit_functions_return_unit_outcome() {
    let outcome: Outcome<()> = unit_work();
    assert!(outcome.is_ok());
}

struct Counter {
    hits: u32,
}

impl Counter {
    #[allow_fail("bump counter")]
    fn bump(&mut self) -> Result<u32, ValueError> {
        self.hits += 1;
        if self.hits > 2 {
            return Err(ValueError("too many"));
        }
        Ok(self.hits)
    }
}

#[test]
fn methods_keep_receiver() {
    let mut counter = Counter { hits: 0 };
    assert_eq!(counter.bump().ok(), Some(1));
    assert_eq!(counter.bump().ok(), Some(2));
    assert!(counter.bump().is_failed());
    assert_eq!(counter.hits, 3);
}

fn shared_logs() -> &'static CapturedLogs {
    static LOGS: OnceLock<CapturedLogs> = OnceLock::new();
    LOGS.get_or_init(CapturedLogs::new)
}

#[allow_fail("job {}", id, logger = Logger::named("jobs").with_sink(shared_logs().sink()))]
fn job(id: u32) -> Result<(), ValueError> {
    Err(ValueError("offline"))
}

#[test]
fn logger_option_routes_default_handler() {
    assert!(job(7).is_failed());
    assert!(shared_logs().contains("job 7 got an error: offline"));
}

#[allow_fail("generic {}", std::any::type_name::<T>())]
fn parse_as<T: std::str::FromStr>(input: &str) -> Result<T, T::Err>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    input.parse()
}

#[test]
fn generic_functions() {
    assert_eq!(parse_as::<u8>("12").ok(), Some(12));
    assert!(parse_as::<u8>("1200").is_failed());
}

#[test]
fn ui_expansions_compile() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/*.rs");
}
