use std::path::PathBuf;

/// Outcome for one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Comment-free already.
    Unchanged,
    /// Has comments to strip.
    Changed,
    Error,
}

#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
    pub statements: usize,
    /// Text printed for the file: rendered statements or stripped SQL.
    pub output: Option<String>,
    pub error: Option<String>,
}

impl FileResult {
    pub fn error(path: PathBuf, error: String) -> Self {
        Self {
            path,
            status: FileStatus::Error,
            statements: 0,
            output: None,
            error: Some(error),
        }
    }
}

/// Per-file results of a batch run, in input order.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    fn count(&self, status: FileStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn unchanged(&self) -> usize {
        self.count(FileStatus::Unchanged)
    }

    pub fn changed(&self) -> usize {
        self.count(FileStatus::Changed)
    }

    pub fn errors(&self) -> usize {
        self.count(FileStatus::Error)
    }

    pub fn statements(&self) -> usize {
        self.results.iter().map(|r| r.statements).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    pub fn has_changes(&self) -> bool {
        self.changed() > 0
    }

    /// One line such as `2 file(s) processed, 5 statement(s), 1 with comments`.
    /// Zero counts after the statement total are left out.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} file(s) processed, {} statement(s)",
            self.total(),
            self.statements()
        );
        for (count, label) in [
            (self.changed(), "with comments"),
            (self.unchanged(), "without comments"),
            (self.errors(), "error(s)"),
        ] {
            if count > 0 {
                summary.push_str(&format!(", {} {}", count, label));
            }
        }
        summary
    }

    pub fn print_errors(&self) {
        for (path, error) in self
            .results
            .iter()
            .filter_map(|r| r.error.as_deref().map(|e| (&r.path, e)))
        {
            eprintln!("error: {}: {}", path.display(), error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, status: FileStatus, statements: usize) -> FileResult {
        FileResult {
            path: PathBuf::from(name),
            status,
            statements,
            output: None,
            error: None,
        }
    }

    #[test]
    fn test_report_summary() {
        let mut report = Report::new();
        report.add(result("a.sql", FileStatus::Changed, 3));
        report.add(result("b.sql", FileStatus::Unchanged, 2));
        report.add(FileResult::error(
            PathBuf::from("c.sql"),
            "read error".to_string(),
        ));

        assert_eq!(report.total(), 3);
        assert_eq!(report.changed(), 1);
        assert_eq!(report.unchanged(), 1);
        assert_eq!(report.errors(), 1);
        assert_eq!(report.statements(), 5);
        assert!(report.has_errors());
        assert!(report.has_changes());
        assert_eq!(
            report.summary(),
            "3 file(s) processed, 5 statement(s), 1 with comments, 1 without comments, 1 error(s)"
        );
    }

    #[test]
    fn test_empty_report() {
        let report = Report::new();
        assert!(!report.has_errors());
        assert_eq!(report.summary(), "0 file(s) processed, 0 statement(s)");
    }
}
