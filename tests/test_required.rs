use yaml_key_audit::checks::required::RootPosition;
use yaml_key_audit::checks::CompiledRule;
use yaml_key_audit::config::{CheckKind, RuleConfig};
use yaml_key_audit::finding::Issue;
use yaml_key_audit::source::YamlSource;

fn rule(required: &str) -> RuleConfig {
    let mut rule = RuleConfig::new(CheckKind::RequiredKey);
    rule.required_key_name = Some(required.to_string());
    rule
}

fn with_parent(mut rule: RuleConfig, name: &str, value: Option<&str>, root: RootPosition) -> RuleConfig {
    rule.parent_key_name = Some(name.to_string());
    rule.parent_key_value = value.map(str::to_string);
    rule.parent_key_name_root = root;
    rule
}

fn deployment_readiness() -> RuleConfig {
    with_parent(
        rule("readinessProbe"),
        "kind",
        Some("^Deployment$"),
        RootPosition::Yes,
    )
}

fn run(rule: &RuleConfig, yaml: &str) -> Vec<Issue> {
    let compiled: CompiledRule = rule.compile().unwrap();
    let source = YamlSource::from_str(yaml, false);
    let mut issues = Vec::new();
    compiled.check.validate(&source, &mut issues);
    issues
}

fn lines(issues: &[Issue]) -> Vec<usize> {
    issues.iter().map(|i| i.line).collect()
}

// ── parent key scopes ────────────────────────────────────────────────────────

#[test]
fn missing_key_reported_on_the_parent_line() {
    let issues = run(
        &deployment_readiness(),
        "# app\nkind: Deployment\nspec:\n  replicas: 1\n",
    );
    assert_eq!(
        issues,
        vec![Issue::new(
            "required-key",
            "Required readinessProbe key not found",
            2,
            1
        )]
    );
}

#[test]
fn key_present_anywhere_in_the_scope() {
    let yaml = "kind: Deployment\nspec:\n  template:\n    readinessProbe: {}\n";
    assert!(run(&deployment_readiness(), yaml).is_empty());
}

#[test]
fn non_matching_parent_value_opens_no_scope() {
    assert!(run(&deployment_readiness(), "kind: Service\nspec: {}\n").is_empty());
}

#[test]
fn each_document_is_its_own_scope() {
    let first_missing = "kind: Deployment\n---\nkind: Deployment\nreadinessProbe: x\n";
    assert_eq!(lines(&run(&deployment_readiness(), first_missing)), vec![1]);

    let last_missing = "kind: Deployment\nreadinessProbe: x\n---\nkind: Deployment\n";
    assert_eq!(lines(&run(&deployment_readiness(), last_missing)), vec![4]);

    let both_missing = "kind: Deployment\n---\nkind: Deployment\n";
    assert_eq!(lines(&run(&deployment_readiness(), both_missing)), vec![1, 3]);
}

#[test]
fn non_matching_parent_closes_the_scope_silently() {
    let reopened =
        "kind: Deployment\n---\nkind: Service\n---\nkind: Deployment\nreadinessProbe: x\n";
    assert!(run(&deployment_readiness(), reopened).is_empty());

    let trailing = "kind: Deployment\nspec:\n  replicas: 1\n---\nkind: Service\nspec:\n  port: 80\n";
    assert!(run(&deployment_readiness(), trailing).is_empty());

    // The first scope was closed by the Service; only the last one is reported.
    let missing_again = "kind: Deployment\n---\nkind: Service\n---\nkind: Deployment\n";
    assert_eq!(lines(&run(&deployment_readiness(), missing_again)), vec![5]);
}

#[test]
fn required_key_outside_any_scope_does_not_count() {
    let yaml = "readinessProbe: x\n---\nkind: Deployment\n";
    assert_eq!(lines(&run(&deployment_readiness(), yaml)), vec![3]);
}

#[test]
fn parent_position_constraints() {
    let nested = "metadata:\n  kind: Deployment\n";

    assert!(run(&deployment_readiness(), nested).is_empty());

    let not_root = with_parent(
        rule("readinessProbe"),
        "kind",
        Some("^Deployment$"),
        RootPosition::Not,
    );
    assert_eq!(lines(&run(&not_root, nested)), vec![2]);
    assert!(run(&not_root, "kind: Deployment\n").is_empty());

    let anywhere = with_parent(
        rule("readinessProbe"),
        "kind",
        Some("^Deployment$"),
        RootPosition::Anywhere,
    );
    assert_eq!(lines(&run(&anywhere, nested)), vec![2]);
}

#[test]
fn parent_without_value_pattern_accepts_any_value() {
    let any_kind = with_parent(rule("metadata"), "kind", None, RootPosition::Yes);
    assert_eq!(lines(&run(&any_kind, "kind: Anything\nspec: 1\n")), vec![1]);
    assert!(run(&any_kind, "kind: Anything\nmetadata: 1\n").is_empty());
}

#[test]
fn message_quotes_the_pattern_as_written() {
    let issues = run(&rule("readiness.*"), "a: 1\n");
    assert_eq!(issues[0].message, "Required readiness.* key not found");
    assert!(run(&rule("readiness.*"), "readinessGates: 1\n").is_empty());
}

// ── document and ancestor scopes ─────────────────────────────────────────────

#[test]
fn without_scope_the_whole_document_is_checked() {
    assert_eq!(
        run(&rule("c"), "a: 1\nb:\n  x: 2\n"),
        vec![Issue::new("required-key", "Required c key not found", 1, 1)]
    );
    assert!(run(&rule("c"), "a: 1\nb:\n  c: 2\n").is_empty());
}

#[test]
fn ancestor_scope_reported_on_the_enclosing_key() {
    let mut scoped = rule("containers");
    scoped.included_ancestors = Some("<root>:spec:template.*".to_string());

    let yaml = "spec:\n  replicas: 1\n  template:\n    metadata:\n      name: x\n";
    assert_eq!(lines(&run(&scoped, yaml)), vec![3]);

    let present = "spec:\n  template:\n    metadata:\n      name: x\n    containers: []\n";
    assert!(run(&scoped, present).is_empty());
}

#[test]
fn every_ancestor_scope_is_checked() {
    let mut scoped = rule("x");
    scoped.included_ancestors = Some("<root>:[ab]:inner".to_string());
    let yaml = "a:\n  inner:\n    x: 1\nb:\n  inner:\n    y: 1\n";
    assert_eq!(lines(&run(&scoped, yaml)), vec![5]);
}

#[test]
fn parent_and_ancestor_scopes_combined() {
    let mut combined = with_parent(rule("replicas"), "kind", Some("^Deployment$"), RootPosition::Yes);
    combined.included_ancestors = Some("<root>:spec".to_string());
    let yaml = "kind: Deployment\nspec:\n  replicas: 1\n---\nkind: Deployment\nspec:\n  paused: true\n";
    assert_eq!(lines(&run(&combined, yaml)), vec![6]);

    // Outside the ancestor scope the key does not count.
    let misplaced = "kind: Deployment\nreplicas: 1\nspec:\n  paused: true\n";
    assert_eq!(lines(&run(&combined, misplaced)), vec![3]);
}

// ── scanning ─────────────────────────────────────────────────────────────────

#[test]
fn documents_with_syntax_errors_are_not_scanned() {
    assert!(run(&deployment_readiness(), "kind: Deployment\nspec: [1\n").is_empty());
}

#[test]
fn independently_compiled_rules_give_the_same_issues() {
    let source = YamlSource::from_str(
        "kind: Deployment\n---\nkind: Deployment\nreadinessProbe: x\n---\nkind: Deployment\n",
        false,
    );
    let mut first = Vec::new();
    deployment_readiness().compile().unwrap().check.validate(&source, &mut first);
    let mut second = Vec::new();
    deployment_readiness().compile().unwrap().check.validate(&source, &mut second);
    assert_eq!(first, second);
    assert_eq!(lines(&first), vec![1, 6]);
}
