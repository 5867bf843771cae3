// system-tests/src/bin/partner_config_check.rs
// ============================================================================
// Module: Partner Config Check
// Description: Preflight check for partner acceptance configuration.
// Purpose: Echo resolved configuration with secrets redacted and validate it.
// Dependencies: clap, data-platform-config, system-tests, tracing
// ============================================================================

//! Preflight binary that resolves partner configuration, echoes it with
//! secrets redacted, and exits non-zero when required keys are missing.
//! The partner file is chosen like the acceptance run chooses it:
//! `--config-file`, then `DATA_PLATFORM_SYSTEM_TEST_CONFIG_FILE`, then
//! `partner_variables.txt` next to this crate.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use data_platform_config::ConfigReport;
use data_platform_config::REQUIRED_KEYS;
use data_platform_config::resolve;
use data_platform_config::validate;
use system_tests::config::PARTNER_VARIABLES_FILE;
use system_tests::config::SuiteSettings;
use system_tests::config::SystemTestConfig;
use system_tests::error::SuiteError;
use system_tests::telemetry::init_tracing;
use tracing::error;
use tracing::info;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "partner-config-check", about = "Validate partner acceptance configuration")]
struct Cli {
    /// Partner variables file; environment variables override its values.
    #[arg(long, value_name = "PATH")]
    config_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let config = match SystemTestConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %SuiteError::Harness(err), "partner configuration check failed");
            return ExitCode::FAILURE;
        }
    };
    let default_file = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(PARTNER_VARIABLES_FILE);
    let mut settings = SuiteSettings::from_config(&config, default_file);
    if let Some(config_file) = cli.config_file {
        settings.config_file = config_file;
    }

    let map = resolve(&settings.config_file);
    let report = ConfigReport::from_map(&map);
    if write!(std::io::stdout().lock(), "{report}").is_err() {
        report.log();
    }
    match validate(&map, &REQUIRED_KEYS).into_result() {
        Ok(()) => {
            info!(config_file = %settings.config_file.display(), "partner configuration complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "partner configuration incomplete");
            ExitCode::FAILURE
        }
    }
}
