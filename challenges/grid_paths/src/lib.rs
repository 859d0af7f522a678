use std::io::{BufRead, Write};
use std::time::Duration;

use thiserror::Error;

pub mod direction;
pub mod engine;
pub mod grid;
pub mod oracle;
pub mod pattern;

pub use engine::{Pruning, SearchOptions, SearchResult, SearchStats};
pub use pattern::{MoveConstraint, ParseError, Pattern};

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read pattern: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Pattern(#[from] ParseError),
}

/// Counts the paths matching `pattern` using flood-fill pruning, giving up
/// once `timeout` has elapsed.
pub fn search(pattern: &Pattern, timeout: Duration) -> SearchResult {
    search_with(
        pattern,
        &SearchOptions {
            timeout,
            ..SearchOptions::default()
        },
    )
}

pub fn search_with(pattern: &Pattern, options: &SearchOptions) -> SearchResult {
    engine::run(pattern, options)
}

/// Reads one pattern line and writes the number of matching paths, with no
/// deadline. This is the entry point of the regression cases.
pub fn solve(scan: &mut Scanner, out: &mut Writer) -> Result<(), Error> {
    let pattern = Pattern::parse(&scan.next_line()?)?;
    let result = search(&pattern, Duration::MAX);
    out.println(result.total_paths);
    Ok(())
}

/// Line-oriented input reader.
pub struct Scanner {
    reader: Box<dyn BufRead>,
}

impl Scanner {
    pub fn new(reader: impl BufRead + 'static) -> Self {
        Self {
            reader: Box::new(reader),
        }
    }

    pub fn next_line(&mut self) -> std::io::Result<String> {
        let mut input = String::new();
        self.reader.read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}

/// Output writer that buffers into memory.
pub struct Writer(Vec<u8>);

impl Writer {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn println<T: std::fmt::Display>(&mut self, value: T) {
        writeln!(self.0, "{}", value).expect("writing to a Vec cannot fail");
    }

    pub fn into_string(self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.0)
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

/// Regression case runner. Each case is a pair `data/<category>/<n>.in`
/// (one pattern line) and `<n>.out` (the expected output).
pub mod testing {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::time::Instant;

    /// Discover all case numbers in a category
    pub fn discover_tests(category: &str) -> Vec<usize> {
        let test_dir = PathBuf::from("data").join(category);

        let mut test_numbers: Vec<usize> = fs::read_dir(&test_dir)
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|entry| {
                let file_name = entry.file_name();
                file_name.to_str()?.strip_suffix(".in")?.parse().ok()
            })
            .collect();

        test_numbers.sort_unstable();
        test_numbers
    }

    /// Run a single case and return (expected, actual, duration) output
    pub fn run_test_case<F>(
        category: &str,
        test_num: usize,
        solve_fn: F,
    ) -> Result<(String, String, Duration), String>
    where
        F: FnOnce(&mut Scanner, &mut Writer) -> Result<(), Error>,
    {
        let test_dir = PathBuf::from("data").join(category);
        let in_file = test_dir.join(format!("{}.in", test_num));
        let out_file = test_dir.join(format!("{}.out", test_num));

        let input = fs::read_to_string(&in_file)
            .map_err(|e| format!("Failed to read {}: {}", in_file.display(), e))?;
        let expected = fs::read_to_string(&out_file)
            .map_err(|e| format!("Failed to read {}: {}", out_file.display(), e))?;

        let mut scanner = Scanner::new(Cursor::new(input));
        let mut writer = Writer::new();

        let start = Instant::now();
        solve_fn(&mut scanner, &mut writer).map_err(|e| format!("Solve failed: {}", e))?;
        let duration = start.elapsed();

        let actual = writer
            .into_string()
            .map_err(|e| format!("Output is not valid UTF-8: {}", e))?;

        Ok((
            expected.trim().to_string(),
            actual.trim().to_string(),
            duration,
        ))
    }

    /// Assert every case in a category
    pub fn verify_all_tests<F>(category: &str, solve_fn: F)
    where
        F: Fn(&mut Scanner, &mut Writer) -> Result<(), Error>,
    {
        let test_cases = discover_tests(category);
        assert!(!test_cases.is_empty(), "No test cases found for {}", category);

        let mut total_duration = Duration::ZERO;

        for test_num in test_cases {
            match run_test_case(category, test_num, &solve_fn) {
                Ok((expected, actual, duration)) => {
                    total_duration += duration;
                    assert_eq!(
                        actual,
                        expected,
                        "Test case {} failed (took {:.2}s)\nExpected:\n{}\nActual:\n{}",
                        test_num,
                        duration.as_secs_f64(),
                        expected,
                        actual
                    );
                }
                Err(e) => panic!("Test case {} error: {}", test_num, e),
            }
        }

        println!("Total time: {:.2}s", total_duration.as_secs_f64());
    }

    /// Run all cases and print results, returning whether every case passed
    pub fn run_all_tests<F>(category: &str, solve_fn: F) -> bool
    where
        F: Fn(&mut Scanner, &mut Writer) -> Result<(), Error>,
    {
        let test_cases = discover_tests(category);
        if test_cases.is_empty() {
            println!("No test cases found for {}", category);
            return false;
        }

        println!("Running {} test cases for {}...", test_cases.len(), category);

        let mut passed = 0;
        let mut failed = 0;
        let mut total_duration = Duration::ZERO;

        for test_num in &test_cases {
            match run_test_case(category, *test_num, &solve_fn) {
                Ok((expected, actual, duration)) => {
                    total_duration += duration;
                    let secs = duration.as_secs_f64();
                    if actual == expected {
                        println!("✓ Test case {}: PASSED ({:.2}s)", test_num, secs);
                        passed += 1;
                    } else {
                        println!("✗ Test case {}: FAILED ({:.2}s)", test_num, secs);
                        println!("  Expected: {}", expected);
                        println!("  Actual:   {}", actual);
                        failed += 1;
                    }
                }
                Err(e) => {
                    println!("✗ Test case {}: ERROR - {}", test_num, e);
                    failed += 1;
                }
            }
        }

        println!("\nResults: {} passed, {} failed", passed, failed);
        println!("Total time: {:.2}s", total_duration.as_secs_f64());
        failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_regression_cases() {
        testing::verify_all_tests("regression", solve);
    }

    #[test]
    fn test_solve_reads_one_line() {
        let mut scan = Scanner::new(Cursor::new("****D***\nignored\n"));
        let mut out = Writer::new();
        solve(&mut scan, &mut out).unwrap();
        assert_eq!(out.into_string().unwrap(), "1\n");
    }

    #[test]
    fn test_solve_rejects_invalid_pattern() {
        let mut scan = Scanner::new(Cursor::new("****X***\n"));
        let mut out = Writer::new();
        let err = solve(&mut scan, &mut out).unwrap_err();
        assert!(matches!(
            err,
            Error::Pattern(ParseError::InvalidCharacter { ch: 'X', position: 4 })
        ));
        assert_eq!(err.to_string(), "invalid character 'X' at position 4");
    }

    #[test]
    fn test_search_reports_timeout_flag() {
        let pattern = Pattern::parse("****D***").unwrap();
        let result = search(&pattern, Duration::from_secs(60));
        assert_eq!(result.total_paths, 1);
        assert!(!result.timed_out);
    }
}
