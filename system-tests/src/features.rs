// system-tests/src/features.rs
// ============================================================================
// Module: Feature Catalog
// Description: Scenario tables for the data platform acceptance feature.
// Purpose: Bind Given/When/Then text to step implementations.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The acceptance feature as data. Scenario names are stable and are what the
//! acceptance binary filters on.

use crate::runner::Feature;
use crate::runner::Scenario;
use crate::steps;

/// Title of the data platform feature.
pub const ACCESS_DATA_PLATFORM: &str = "Access the central data platform";

/// Scenario reading broker version information.
pub const ORION_LD_VERSION_SCENARIO: &str = "Partner reads Orion-LD version information";

/// Scenario creating and retrieving an entity.
pub const ENTITY_ROUND_TRIP_SCENARIO: &str = "Partner creates and retrieves an NGSI-LD entity";

/// Scenario reaching the Miktaka service.
pub const MIKTAKA_SCENARIO: &str = "Partner reaches Miktaka";

/// Returns the data platform acceptance feature.
#[must_use]
pub fn access_data_platform() -> Feature {
    Feature::new(ACCESS_DATA_PLATFORM)
        .scenario(
            Scenario::new(ORION_LD_VERSION_SCENARIO)
                .given("the service is running", steps::the_service_is_running)
                .when("I authenticate as a partner for Orion-LD", steps::authenticate_for_orion_ld)
                .then(
                    "I should have access to protected resources on Orion-LD",
                    steps::access_protected_resources_on_orion_ld,
                )
                .and(
                    "the resource response should contain expected version information of Orion-LD",
                    steps::expected_orion_ld_version,
                ),
        )
        .scenario(
            Scenario::new(ENTITY_ROUND_TRIP_SCENARIO)
                .given("the service is running", steps::the_service_is_running)
                .when("I authenticate as a partner for Orion-LD", steps::authenticate_for_orion_ld)
                .and("I create an NGSI-LD entity on Orion-LD", steps::create_entity_on_orion_ld)
                .then(
                    "I can retrieve the created entity from Orion-LD",
                    steps::retrieve_created_entity_from_orion_ld,
                ),
        )
        .scenario(
            Scenario::new(MIKTAKA_SCENARIO)
                .given("the service is running", steps::the_service_is_running)
                .when("I authenticate as a partner for Miktaka", steps::authenticate_for_miktaka)
                .then(
                    "I should have access to protected resources on Miktaka",
                    steps::access_protected_resources_on_miktaka,
                ),
        )
}
