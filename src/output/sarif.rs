use crate::finding::{AuditReport, Finding, Severity};
use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, MultiformatMessageString, PhysicalLocation, Region,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, Tool, ToolComponent,
};
use std::collections::BTreeMap;

pub fn format(report: &AuditReport) -> String {
    // Rule keys are user-defined; the first finding of each describes it.
    let mut rule_map: BTreeMap<&str, &Finding> = BTreeMap::new();
    for f in &report.findings {
        rule_map.entry(f.rule_key.as_str()).or_insert(f);
    }

    let rule_index: BTreeMap<&str, i64> = rule_map
        .keys()
        .enumerate()
        .map(|(i, key)| (*key, i as i64))
        .collect();

    let rules: Vec<ReportingDescriptor> = rule_map
        .iter()
        .map(|(key, f)| {
            let mut rule = ReportingDescriptor::builder().id(key.to_string()).build();
            rule.short_description = Some(
                MultiformatMessageString::builder()
                    .text(f.message.clone())
                    .build(),
            );
            rule
        })
        .collect();

    let results: Vec<SarifResult> = report
        .findings
        .iter()
        .map(|f| {
            let level = match f.severity {
                Severity::Error => ResultLevel::Error,
                Severity::Warning => ResultLevel::Warning,
                Severity::Info => ResultLevel::Note,
            };

            let mut result = SarifResult::builder()
                .message(Message::builder().text(f.message.clone()).build())
                .build();

            result.rule_id = Some(f.rule_key.clone());
            result.level = Some(level);
            result.rule_index = rule_index.get(f.rule_key.as_str()).copied();

            if let Some(ref file) = f.file {
                let uri = file.to_string_lossy().replace('\\', "/");

                let mut location = Location::builder().build();
                let mut physical = PhysicalLocation::builder().build();

                physical.artifact_location = Some(ArtifactLocation::builder().uri(uri).build());
                physical.region = Some(
                    Region::builder()
                        .start_line(f.line as i64)
                        .start_column(f.column as i64)
                        .build(),
                );

                location.physical_location = Some(physical);
                result.locations = Some(vec![location]);
            }

            result
        })
        .collect();

    let driver = ToolComponent::builder()
        .name("yaml-key-audit")
        .version(env!("CARGO_PKG_VERSION").to_string())
        .rules(rules)
        .build();

    let tool = Tool::builder().driver(driver).build();

    let run = Run::builder().tool(tool).results(results).build();

    let sarif = Sarif::builder().version("2.1.0").runs(vec![run]).build();

    serde_json::to_string_pretty(&sarif).expect("SARIF serialization failed")
}
