// system-tests/src/steps.rs
// ============================================================================
// Module: Acceptance Steps
// Description: Step implementations for the data platform acceptance feature.
// Purpose: Drive gateway requests and assert on their results.
// Dependencies: data-platform-client, serde_json, tracing
// ============================================================================

//! ## Overview
//! Each step is a plain function over a [`World`] returning a boxed future, so
//! steps can be listed in scenario tables. Steps read shared configuration from
//! the suite context and store what they learn in the scenario state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::process;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use data_platform_client::NgsiEntity;
use data_platform_client::PasswordGrant;
use data_platform_client::PepTarget;
use data_platform_client::VersionReport;
use serde_json::json;
use tracing::debug;
use tracing::info;

use crate::context::World;
use crate::error::StepError;
use crate::error::ensure;
use crate::runner::StepFuture;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Entity type used for acceptance entities.
pub const ACCEPTANCE_ENTITY_TYPE: &str = "AcceptanceCheck";

/// Property set on acceptance entities.
pub const ACCEPTANCE_PROPERTY: &str = "checkSource";

/// Value of [`ACCEPTANCE_PROPERTY`] on acceptance entities.
pub const ACCEPTANCE_PROPERTY_VALUE: &str = "data-platform-system-tests";

/// Per-process sequence for acceptance entity ids.
static ENTITY_COUNTER: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// SECTION: Service
// ============================================================================

/// Given the service is running.
pub fn the_service_is_running(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        world.suite().client.ping().await?;
        Ok(())
    })
}

// ============================================================================
// SECTION: Authentication
// ============================================================================

/// When I authenticate as a partner for Orion-LD.
pub fn authenticate_for_orion_ld(world: &mut World) -> StepFuture<'_> {
    Box::pin(authenticate(world, PepTarget::OrionLd))
}

/// When I authenticate as a partner for Miktaka.
pub fn authenticate_for_miktaka(world: &mut World) -> StepFuture<'_> {
    Box::pin(authenticate(world, PepTarget::Miktaka))
}

/// Requests a partner token for `target` and stores it in the scenario.
async fn authenticate(world: &mut World, target: PepTarget) -> Result<(), StepError> {
    let suite = world.suite_handle();
    let grant = PasswordGrant {
        username: &suite.partner.username,
        password: suite.partner.password.expose(),
        client_secret: suite.pep_secret(target).expose(),
    };
    let token = suite.client.request_token(target, &grant).await?;
    info!(service = %target, "partner token issued");
    world.state.tokens.insert(target, token);
    Ok(())
}

// ============================================================================
// SECTION: Protected Resources
// ============================================================================

/// Then I should have access to protected resources on Orion-LD.
pub fn access_protected_resources_on_orion_ld(world: &mut World) -> StepFuture<'_> {
    Box::pin(access_protected_resources(world, PepTarget::OrionLd))
}

/// Then I should have access to protected resources on Miktaka.
pub fn access_protected_resources_on_miktaka(world: &mut World) -> StepFuture<'_> {
    Box::pin(access_protected_resources(world, PepTarget::Miktaka))
}

/// Fetches version information through `target`.
///
/// Any JSON object proves access. Orion-LD responses must also carry the
/// broker version fields.
async fn access_protected_resources(world: &mut World, target: PepTarget) -> Result<(), StepError> {
    let suite = world.suite_handle();
    let token = world.state.token(target)?;
    let report = suite.client.fetch_version(target, token).await?;
    if target == PepTarget::OrionLd {
        for field in
            [VersionReport::ORIONLD_VERSION, VersionReport::ORION_VERSION, VersionReport::UPTIME]
        {
            ensure(report.contains(field), || {
                format!("{target} version response is missing '{field}'")
            })?;
        }
    }
    world.state.versions.insert(target, report);
    Ok(())
}

/// And the resource response should contain expected version information of Orion-LD.
pub fn expected_orion_ld_version(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let expectations = &world.suite().expectations;
        let report = world.state.version(PepTarget::OrionLd)?;
        let orionld = report.str_field(VersionReport::ORIONLD_VERSION).unwrap_or_default();
        ensure(orionld == expectations.orionld_version, || {
            format!(
                "expected orionld version '{}', found '{orionld}'",
                expectations.orionld_version
            )
        })?;
        let orion = report.str_field(VersionReport::ORION_VERSION).unwrap_or_default();
        ensure(orion.contains(&expectations.orion_version_marker), || {
            format!(
                "expected orion version containing '{}', found '{orion}'",
                expectations.orion_version_marker
            )
        })?;
        debug!(
            git_hash = report.str_field(VersionReport::GIT_HASH).unwrap_or_default(),
            release_date = report.str_field(VersionReport::RELEASE_DATE).unwrap_or_default(),
            "orion-ld build information"
        );
        Ok(())
    })
}

// ============================================================================
// SECTION: Entities
// ============================================================================

/// Returns an acceptance entity id unique to this process and call.
#[must_use]
pub fn unique_entity_id() -> String {
    let millis =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_millis());
    let counter = ENTITY_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("urn:ngsi-ld:{ACCEPTANCE_ENTITY_TYPE}:{}-{millis}-{counter}", process::id())
}

/// And I create an NGSI-LD entity on Orion-LD.
pub fn create_entity_on_orion_ld(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let target = PepTarget::OrionLd;
        let suite = world.suite_handle();
        let token = world.state.token(target)?;
        let entity = NgsiEntity::new(unique_entity_id(), ACCEPTANCE_ENTITY_TYPE)
            .with_property(ACCEPTANCE_PROPERTY, json!(ACCEPTANCE_PROPERTY_VALUE));
        let created = suite.client.create_entity(target, token, &entity).await?;
        info!(
            entity_id = entity.id().unwrap_or_default(),
            location = created.location.as_deref().unwrap_or_default(),
            "acceptance entity created"
        );
        world.state.created_entity = Some(entity);
        Ok(())
    })
}

/// Then I can retrieve the created entity from Orion-LD.
pub fn retrieve_created_entity_from_orion_ld(world: &mut World) -> StepFuture<'_> {
    Box::pin(async move {
        let target = PepTarget::OrionLd;
        let suite = world.suite_handle();
        let token = world.state.token(target)?;
        let created = world.state.created_entity.as_ref().ok_or_else(|| {
            StepError::ValidationFailed("no entity was created in this scenario".to_string())
        })?;
        let id = created.id().unwrap_or_default();
        let retrieved = suite.client.get_entity(target, token, id).await?;
        ensure(retrieved.id() == created.id(), || {
            format!(
                "retrieved entity id '{}' does not match '{id}'",
                retrieved.id().unwrap_or_default()
            )
        })?;
        ensure(retrieved.entity_type() == created.entity_type(), || {
            format!(
                "retrieved entity type '{}' does not match '{}'",
                retrieved.entity_type().unwrap_or_default(),
                created.entity_type().unwrap_or_default()
            )
        })?;
        Ok(())
    })
}
