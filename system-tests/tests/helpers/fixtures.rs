// system-tests/tests/helpers/fixtures.rs
// ============================================================================
// Module: Partner Fixtures
// Description: Partner variables files and settings for stubbed runs.
// Purpose: Keep test configuration isolated from the process environment.
// Dependencies: system-tests, tempfile
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use system_tests::config::SuiteSettings;
use tempfile::TempDir;

use super::gateway_stub::STUB_MIKTAKA_SECRET;
use super::gateway_stub::STUB_ORION_SECRET;
use super::gateway_stub::STUB_PASSWORD;
use super::gateway_stub::STUB_USERNAME;

/// Partner variables file inside a scratch directory.
pub struct PartnerFile {
    dir: TempDir,
    path: PathBuf,
}

impl PartnerFile {
    /// Writes `contents` as a partner variables file.
    pub fn write(contents: &str) -> Result<Self, String> {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {err}"))?;
        let path = dir.path().join("partner_variables.txt");
        fs::write(&path, contents).map_err(|err| format!("write partner file failed: {err}"))?;
        Ok(Self {
            dir,
            path,
        })
    }

    /// Writes a complete partner file pointing at `host`.
    pub fn complete(host: &str) -> Result<Self, String> {
        Self::write(&complete_contents(host))
    }

    /// Returns the file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns the scratch directory.
    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Returns suite settings with short timeouts for this file.
    pub fn settings(&self) -> SuiteSettings {
        let mut settings = SuiteSettings::new(self.path.clone());
        settings.http_timeout = Duration::from_secs(5);
        settings.ping_timeout = Duration::from_secs(5);
        settings
    }
}

/// Partner file contents accepted by the default gateway stub.
pub fn complete_contents(host: &str) -> String {
    format!(
        "HOST={host}\nPARTNER_USERNAME={STUB_USERNAME}\nPARTNER_PASSWORD={STUB_PASSWORD}\n\
         ORION_PEP_SECRET={STUB_ORION_SECRET}\nMIKTAKA_PEP_SECRET={STUB_MIKTAKA_SECRET}\n"
    )
}
