// system-tests/src/context.rs
// ============================================================================
// Module: Suite Context
// Description: Shared suite state and per-scenario state for acceptance steps.
// Purpose: Pass configuration and session data to steps explicitly.
// Dependencies: data-platform-client, data-platform-config, tracing
// ============================================================================

//! ## Overview
//! [`SuiteContext::setup`] is the suite setup hook: it resolves partner
//! configuration, echoes it with secrets redacted, validates it, and builds the
//! gateway client. The context is shared read-only by every scenario.
//! [`ScenarioState`] holds what one scenario learns as it runs (tokens,
//! responses) and starts empty for each scenario.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use data_platform_client::AccessToken;
use data_platform_client::GatewayClient;
use data_platform_client::GatewayEndpoint;
use data_platform_client::NgsiEntity;
use data_platform_client::PepTarget;
use data_platform_client::VersionReport;
use data_platform_config::ConfigReport;
use data_platform_config::ConfigResolver;
use data_platform_config::EnvSource;
use data_platform_config::PartnerConfig;
use data_platform_config::Secret;
use tracing::info;

use crate::config::SuiteSettings;
use crate::error::StepError;
use crate::error::SuiteError;

// ============================================================================
// SECTION: Version Expectations
// ============================================================================

/// Orion-LD release the deployment is expected to run.
pub const DEFAULT_ORIONLD_VERSION: &str = "1.4.0";

/// Marker the upstream Orion version string must contain.
pub const DEFAULT_ORION_VERSION_MARKER: &str = "next";

/// Optional file key overriding [`DEFAULT_ORIONLD_VERSION`].
pub const ORIONLD_VERSION_KEY: &str = "ORIONLD_VERSION";

/// Optional file key overriding [`DEFAULT_ORION_VERSION_MARKER`].
pub const ORION_VERSION_MARKER_KEY: &str = "ORION_VERSION_MARKER";

/// Expected broker version information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionExpectations {
    /// Exact expected `orionld version`.
    pub orionld_version: String,
    /// Substring expected in `orion version`.
    pub orion_version_marker: String,
}

impl VersionExpectations {
    /// Reads expectations from optional partner keys, falling back to defaults.
    #[must_use]
    pub fn from_config(config: &PartnerConfig) -> Self {
        Self {
            orionld_version: config
                .optional(ORIONLD_VERSION_KEY)
                .unwrap_or(DEFAULT_ORIONLD_VERSION)
                .to_string(),
            orion_version_marker: config
                .optional(ORION_VERSION_MARKER_KEY)
                .unwrap_or(DEFAULT_ORION_VERSION_MARKER)
                .to_string(),
        }
    }
}

// ============================================================================
// SECTION: Suite Context
// ============================================================================

/// Read-only state shared by every scenario in a run.
#[derive(Debug)]
pub struct SuiteContext {
    /// Validated partner configuration.
    pub partner: PartnerConfig,
    /// Client bound to the deployment under test.
    pub client: GatewayClient,
    /// Expected broker version information.
    pub expectations: VersionExpectations,
}

impl SuiteContext {
    /// Resolves, reports, and validates configuration, then builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::MissingConfiguration`] when required keys are
    /// absent or empty, and [`SuiteError::Client`] when the host cannot be used
    /// as a gateway endpoint.
    pub fn setup<E: EnvSource>(settings: &SuiteSettings, env: E) -> Result<Self, SuiteError> {
        let map = ConfigResolver::new(env).resolve(&settings.config_file);
        ConfigReport::from_map(&map).log();
        let partner = PartnerConfig::from_map(map)?;
        let endpoint = GatewayEndpoint::from_host(&partner.host)?;
        let client = GatewayClient::new(endpoint, settings.http_timeout)?
            .with_ping_timeout(settings.ping_timeout);
        let expectations = VersionExpectations::from_config(&partner);
        info!(endpoint = %client.endpoint(), "suite setup complete");
        Ok(Self {
            partner,
            client,
            expectations,
        })
    }

    /// Returns the PEP client secret for `target`.
    #[must_use]
    pub const fn pep_secret(&self, target: PepTarget) -> &Secret {
        match target {
            PepTarget::OrionLd => &self.partner.orion_pep_secret,
            PepTarget::Miktaka => &self.partner.miktaka_pep_secret,
        }
    }
}

// ============================================================================
// SECTION: Scenario State
// ============================================================================

/// Ephemeral state accumulated by one scenario's steps.
#[derive(Debug, Default)]
pub struct ScenarioState {
    /// Access tokens obtained in this scenario, per PEP target.
    pub tokens: HashMap<PepTarget, AccessToken>,
    /// Last version report fetched, per PEP target.
    pub versions: HashMap<PepTarget, VersionReport>,
    /// Entity created in this scenario.
    pub created_entity: Option<NgsiEntity>,
}

impl ScenarioState {
    /// Returns the token for `target` obtained earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::ValidationFailed`] when no token was obtained.
    pub fn token(&self, target: PepTarget) -> Result<&AccessToken, StepError> {
        self.tokens.get(&target).ok_or_else(|| {
            StepError::ValidationFailed(format!("access token for {target} not found in scenario"))
        })
    }

    /// Returns the version report for `target` fetched earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::ValidationFailed`] when no report was fetched.
    pub fn version(&self, target: PepTarget) -> Result<&VersionReport, StepError> {
        self.versions.get(&target).ok_or_else(|| {
            StepError::ValidationFailed(format!(
                "protected resource response for {target} not found in scenario"
            ))
        })
    }
}

// ============================================================================
// SECTION: World
// ============================================================================

/// Everything a step can see: the shared suite and this scenario's state.
#[derive(Debug)]
pub struct World {
    /// Shared suite context.
    suite: Arc<SuiteContext>,
    /// Per-scenario state.
    pub state: ScenarioState,
}

impl World {
    /// Creates a world with fresh scenario state.
    #[must_use]
    pub fn new(suite: Arc<SuiteContext>) -> Self {
        Self {
            suite,
            state: ScenarioState::default(),
        }
    }

    /// Returns the shared suite context.
    #[must_use]
    pub fn suite(&self) -> &SuiteContext {
        &self.suite
    }

    /// Returns a handle to the shared suite context.
    #[must_use]
    pub fn suite_handle(&self) -> Arc<SuiteContext> {
        Arc::clone(&self.suite)
    }
}
