// system-tests/tests/suites/suite_runner.rs
// =============================================================================
// Module: Suite Runner Tests
// Description: Full acceptance runs against the in-process gateway stub.
// Purpose: Verify scenario sequencing, failure isolation, and artifacts.
// Dependencies: system-tests helpers, data-platform-config
// =============================================================================

use std::fs;
use std::sync::Arc;

use data_platform_config::MapEnv;
use helpers::fixtures::PartnerFile;
use helpers::fixtures::complete_contents;
use helpers::gateway_stub::GatewayStubConfig;
use helpers::gateway_stub::STUB_PASSWORD;
use helpers::gateway_stub::default_version;
use helpers::gateway_stub::spawn_gateway_stub;
use helpers::gateway_stub::spawn_gateway_stub_with;
use serde_json::Value;
use serde_json::json;
use system_tests::SuiteContext;
use system_tests::artifacts::REPORT_JSON;
use system_tests::artifacts::REPORT_MARKDOWN;
use system_tests::artifacts::RunArtifacts;
use system_tests::artifacts::TRANSCRIPT_JSON;
use system_tests::features::ENTITY_ROUND_TRIP_SCENARIO;
use system_tests::features::MIKTAKA_SCENARIO;
use system_tests::features::ORION_LD_VERSION_SCENARIO;
use system_tests::features::access_data_platform;
use system_tests::run;
use system_tests::runner::Feature;
use system_tests::runner::Scenario;
use system_tests::runner::StepOutcome;
use system_tests::runner::run_feature;
use system_tests::steps;

use crate::helpers;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::test]
async fn full_feature_passes_against_healthy_gateway() -> TestResult {
    let stub = spawn_gateway_stub()?;
    let partner = PartnerFile::complete(stub.host())?;

    let outcome = run(&partner.settings(), MapEnv::new(), &access_data_platform(), None).await?;

    let report = &outcome.report;
    if !report.is_success() || report.scenarios.len() != 3 {
        return Err(format!("expected three passing scenarios: {report:?}").into());
    }
    let entity_ids = stub.entity_ids();
    if entity_ids.len() != 1 || !entity_ids[0].starts_with("urn:ngsi-ld:AcceptanceCheck:") {
        return Err(format!("expected one acceptance entity, got {entity_ids:?}").into());
    }
    let pings =
        outcome.transcript.iter().filter(|exchange| exchange.path == "/index.html").count();
    if pings != 3 {
        return Err(format!("each scenario should ping once, got {pings}").into());
    }

    let artifacts = RunArtifacts::at(partner.dir().join("run"))?;
    artifacts.write_suite(report, &outcome.transcript)?;
    let json: Value = serde_json::from_slice(&fs::read(artifacts.root().join(REPORT_JSON))?)?;
    if json["scenarios"][2]["name"] != json!(MIKTAKA_SCENARIO) {
        return Err(format!("unexpected report json: {json}").into());
    }
    let markdown = fs::read_to_string(artifacts.root().join(REPORT_MARKDOWN))?;
    if !markdown.contains("- Passed: 3") || !markdown.contains(ENTITY_ROUND_TRIP_SCENARIO) {
        return Err(format!("unexpected report markdown:\n{markdown}").into());
    }
    let transcript = fs::read_to_string(artifacts.root().join(TRANSCRIPT_JSON))?;
    if transcript.contains(STUB_PASSWORD) || transcript.contains("stub-token") {
        return Err("transcript artifact leaked credentials".into());
    }
    Ok(())
}

#[tokio::test]
async fn failing_step_skips_rest_of_scenario_only() -> TestResult {
    let mut version = default_version();
    version["orionld version"] = json!("1.3.9");
    let stub = spawn_gateway_stub_with(GatewayStubConfig {
        version,
        ..GatewayStubConfig::default()
    })?;
    let partner = PartnerFile::complete(stub.host())?;

    let outcome = run(&partner.settings(), MapEnv::new(), &access_data_platform(), None).await?;

    let report = &outcome.report;
    if report.passed_count() != 2 || report.failed_count() != 1 {
        return Err(format!("expected one failed scenario: {report:?}").into());
    }
    let scenario = report.scenario(ORION_LD_VERSION_SCENARIO).ok_or("version scenario missing")?;
    let outcomes: Vec<&StepOutcome> = scenario.steps.iter().map(|step| &step.outcome).collect();
    let [StepOutcome::Passed, StepOutcome::Passed, StepOutcome::Passed, StepOutcome::Failed(msg)] =
        outcomes.as_slice()
    else {
        return Err(format!("unexpected step outcomes: {outcomes:?}").into());
    };
    if !msg.contains("expected orionld version '1.4.0', found '1.3.9'") {
        return Err(format!("unexpected failure message: {msg}").into());
    }
    Ok(())
}

#[tokio::test]
async fn rejected_token_fails_and_skips_remaining_steps() -> TestResult {
    let stub = spawn_gateway_stub()?;
    let partner = PartnerFile::complete(stub.host())?;
    let env = MapEnv::new().with("PARTNER_PASSWORD", "wrong-password");

    let outcome = run(&partner.settings(), env, &access_data_platform(), None).await?;

    let report = &outcome.report;
    if report.passed_count() != 0 {
        return Err(format!("every scenario should fail: {report:?}").into());
    }
    for scenario in &report.scenarios {
        let failure = scenario.failure().ok_or("missing failure")?;
        if !failure.contains("401") {
            return Err(format!("expected 401 failure, got {failure}").into());
        }
        if !matches!(scenario.steps.last().map(|step| &step.outcome), Some(StepOutcome::Skipped))
        {
            return Err(format!("trailing steps should be skipped: {scenario:?}").into());
        }
    }
    if stub.requests().iter().any(|request| request.path.starts_with("/kong/")) {
        return Err("no protected route should be called without a token".into());
    }
    Ok(())
}

#[tokio::test]
async fn environment_overrides_partner_file() -> TestResult {
    let stub = spawn_gateway_stub()?;
    let partner = PartnerFile::write(
        &complete_contents("unreachable.invalid").replace(STUB_PASSWORD, "stale-password"),
    )?;
    let env = MapEnv::new().with("HOST", stub.host()).with("PARTNER_PASSWORD", STUB_PASSWORD);

    let outcome = run(&partner.settings(), env, &access_data_platform(), None).await?;

    if !outcome.report.is_success() {
        return Err(format!("environment values should win: {:?}", outcome.report).into());
    }
    Ok(())
}

#[tokio::test]
async fn version_expectations_come_from_partner_file() -> TestResult {
    let mut version = default_version();
    version["orionld version"] = json!("1.6.0");
    version["orion version"] = json!("1.15.0-pre");
    let stub = spawn_gateway_stub_with(GatewayStubConfig {
        version,
        ..GatewayStubConfig::default()
    })?;
    let contents =
        format!("{}ORIONLD_VERSION=1.6.0\nORION_VERSION_MARKER=pre\n", complete_contents(stub.host()));
    let partner = PartnerFile::write(&contents)?;

    let outcome = run(
        &partner.settings(),
        MapEnv::new(),
        &access_data_platform(),
        Some(ORION_LD_VERSION_SCENARIO),
    )
    .await?;

    if !outcome.report.is_success() || outcome.report.scenarios.len() != 1 {
        return Err(format!("overridden expectations should pass: {:?}", outcome.report).into());
    }
    Ok(())
}

#[tokio::test]
async fn name_filter_selects_matching_scenarios() -> TestResult {
    let stub = spawn_gateway_stub()?;
    let partner = PartnerFile::complete(stub.host())?;

    let outcome =
        run(&partner.settings(), MapEnv::new(), &access_data_platform(), Some("Miktaka")).await?;

    let names: Vec<&str> =
        outcome.report.scenarios.iter().map(|scenario| scenario.name.as_str()).collect();
    if names != [MIKTAKA_SCENARIO] {
        return Err(format!("unexpected scenarios: {names:?}").into());
    }
    if stub.requests().iter().any(|request| request.path.contains("keycloak-orion")) {
        return Err("filtered-out scenarios must not run".into());
    }
    Ok(())
}

#[tokio::test]
async fn scenario_state_is_reset_between_scenarios() -> TestResult {
    let stub = spawn_gateway_stub()?;
    let partner = PartnerFile::complete(stub.host())?;
    let context = Arc::new(SuiteContext::setup(&partner.settings(), MapEnv::new())?);
    let feature = Feature::new("state isolation")
        .scenario(
            Scenario::new("authenticates")
                .when("I authenticate as a partner for Orion-LD", steps::authenticate_for_orion_ld),
        )
        .scenario(Scenario::new("reuses a token").then(
            "I should have access to protected resources on Orion-LD",
            steps::access_protected_resources_on_orion_ld,
        ));

    let report = run_feature(&context, &feature, None).await;

    let second = report.scenario("reuses a token").ok_or("second scenario missing")?;
    match second.failure() {
        Some(message) if message.contains("access token for Orion-LD not found") => {}
        other => return Err(format!("expected missing token failure, got {other:?}").into()),
    }
    if stub.requests().iter().any(|request| request.path.ends_with("/version")) {
        return Err("no version request should be sent without a token".into());
    }
    Ok(())
}

#[tokio::test]
async fn miktaka_access_needs_only_a_json_object() -> TestResult {
    let mut version = default_version();
    if let Some(fields) = version.as_object_mut() {
        fields.remove("uptime");
    }
    let stub = spawn_gateway_stub_with(GatewayStubConfig {
        version,
        miktaka_version: json!({ "status": "ok" }),
        ..GatewayStubConfig::default()
    })?;
    let partner = PartnerFile::complete(stub.host())?;

    let outcome = run(&partner.settings(), MapEnv::new(), &access_data_platform(), None).await?;

    let miktaka = outcome.report.scenario(MIKTAKA_SCENARIO).ok_or("miktaka scenario missing")?;
    if !miktaka.passed() {
        return Err(format!("miktaka scenario should pass: {miktaka:?}").into());
    }
    let orion =
        outcome.report.scenario(ORION_LD_VERSION_SCENARIO).ok_or("version scenario missing")?;
    match orion.failure() {
        Some(message) if message.contains("Orion-LD version response is missing 'uptime'") => Ok(()),
        other => Err(format!("expected missing uptime failure, got {other:?}").into()),
    }
}
