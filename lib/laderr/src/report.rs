//! The Result Reporter.

use laderr_shacl::ValidationReport;
use std::path::Path;
use tracing::{error, info};

/// Logs the conformance of a specification followed by the full validation report.
pub fn report_validation_result(path: &Path, report: &ValidationReport) {
    if report.conforms() {
        info!(path = %path.display(), "The LaDeRR specification is correct");
    } else {
        error!(
            path = %path.display(),
            results = report.results().len(),
            "The LaDeRR specification is not correct"
        );
    }
    info!("Full validation report:\n{report}");
}
