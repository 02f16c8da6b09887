use kubegraph_core::ResourceKind;
use kubegraph_graph::{build_graph, build_graph_with, BuildConfig, ManifestError, ManifestGraph};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

fn id_of(graph: &ManifestGraph, kind: ResourceKind, name: &str) -> usize {
    graph
        .find(&kind, name)
        .unwrap_or_else(|| panic!("missing {} {}", kind, name))
        .id
}

fn assert_edges_valid(graph: &ManifestGraph) {
    let count = graph.entity_count();
    for (from, to) in graph.references() {
        assert!(from < count && to < count, "edge ({}, {}) out of range", from, to);
    }
}

const INGRESS_TO_MISSING: &str = r#"
apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: edge
spec:
  rules:
    - host: shop.example.com
      http:
        paths:
          - path: /
            backend:
              serviceName: storefront
"#;

const FOO_DEPLOYMENT: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: foo
  labels:
    app: foo
    tier: web
"#;

#[test]
fn test_missing_backend_gets_one_placeholder_and_one_edge() {
    let dir = tree(&[("ingress.yaml", INGRESS_TO_MISSING)]);
    let graph = build_graph(dir.path()).unwrap();

    let placeholders: Vec<_> = graph.placeholders().collect();
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].kind, ResourceKind::UnknownService);
    assert_eq!(placeholders[0].name, "storefront");

    let ingress = id_of(&graph, ResourceKind::Ingress, "edge");
    let expected: BTreeSet<_> = [(ingress, placeholders[0].id)].into_iter().collect();
    assert_eq!(graph.references(), expected);
    assert_edges_valid(&graph);
}

#[test]
fn test_selector_subset_matches() {
    let dir = tree(&[
        ("deploy.yaml", FOO_DEPLOYMENT),
        (
            "svc.yaml",
            "kind: Service\nmetadata: {name: foo}\nspec:\n  selector: {app: foo}\n",
        ),
    ]);
    let graph = build_graph(dir.path()).unwrap();

    let service = id_of(&graph, ResourceKind::Service, "foo");
    let deployment = id_of(&graph, ResourceKind::Deployment, "foo");
    assert!(graph.references().contains(&(service, deployment)));
    assert_eq!(graph.reference_count(), 1);
}

#[test]
fn test_selector_with_extra_key_does_not_match() {
    let dir = tree(&[
        ("deploy.yaml", FOO_DEPLOYMENT),
        (
            "svc.yaml",
            "kind: Service\nmetadata: {name: foo}\nspec:\n  selector: {app: foo, zone: us}\n",
        ),
    ]);
    let graph = build_graph(dir.path()).unwrap();

    assert!(graph.references().is_empty());
}

#[test]
fn test_empty_selector_matches_nothing() {
    let dir = tree(&[
        ("deploy.yaml", FOO_DEPLOYMENT),
        ("svc.yaml", "kind: Service\nmetadata: {name: foo}\nspec:\n  selector: {}\n"),
    ]);
    let graph = build_graph(dir.path()).unwrap();

    assert!(graph.references().is_empty());
}

#[test]
fn test_annotation_references_two_services() {
    let dir = tree(&[
        (
            "daemon.yaml",
            r#"
kind: DaemonSet
metadata:
  name: collector
  annotations:
    kube.references.services: "a,b"
"#,
        ),
        ("svc-a.yaml", "kind: Service\nmetadata: {name: a}\n"),
    ]);
    let graph = build_graph(dir.path()).unwrap();

    let daemon = id_of(&graph, ResourceKind::DaemonSet, "collector");
    let a = id_of(&graph, ResourceKind::Service, "a");
    let b = id_of(&graph, ResourceKind::UnknownService, "b");

    let expected: BTreeSet<_> = [(daemon, a), (daemon, b)].into_iter().collect();
    assert_eq!(graph.references(), expected);
    assert_eq!(graph.placeholders().count(), 1);
}

#[test]
fn test_trailing_comma_does_not_create_empty_placeholder() {
    let dir = tree(&[(
        "deploy.yaml",
        r#"
kind: Deployment
metadata:
  name: api
  annotations:
    kube.references.services: "db,"
"#,
    )]);
    let graph = build_graph(dir.path()).unwrap();

    assert_eq!(graph.entity_count(), 2);
    assert!(graph.entities().all(|e| !e.name.is_empty()));
}

#[test]
fn test_list_items_resolve_independently() {
    let dir = tree(&[
        (
            "services.yaml",
            r#"
apiVersion: v1
kind: List
items:
  - kind: Service
    metadata: {name: one}
    spec:
      selector: {app: foo}
  - kind: Service
    metadata: {name: two}
    spec:
      selector: {tier: web}
  - kind: Service
    metadata: {name: three}
    spec:
      selector: {app: bar}
"#,
        ),
        ("deploy.yaml", FOO_DEPLOYMENT),
    ]);
    let graph = build_graph(dir.path()).unwrap();

    assert_eq!(graph.entity_count(), 4);
    let deployment = id_of(&graph, ResourceKind::Deployment, "foo");
    assert_eq!(graph.incoming(deployment).len(), 2);
    let three = id_of(&graph, ResourceKind::Service, "three");
    assert!(graph.outgoing(three).is_empty());
}

#[test]
fn test_repeated_backend_yields_single_edge() {
    let dir = tree(&[(
        "ingress.yaml",
        r#"
kind: Ingress
metadata: {name: edge}
spec:
  rules:
    - http:
        paths:
          - path: /a
            backend: {serviceName: web}
          - path: /b
            backend: {serviceName: web}
    - host: other.example.com
      http:
        paths:
          - path: /
            backend:
              service: {name: web}
"#,
    )]);
    let graph = build_graph(dir.path()).unwrap();

    assert_eq!(graph.entity_count(), 2);
    assert_eq!(graph.reference_count(), 1);
    assert_eq!(graph.references().len(), 1);
}

#[test]
fn test_entity_count_matches_documents_plus_placeholders() {
    let dir = tree(&[
        ("a/ingress.yaml", INGRESS_TO_MISSING),
        ("a/values.yaml", "image: nginx\nreplicas: 2\n"),
        ("b/config.yml", "kind: ConfigMap\nmetadata: {name: settings}\ndata: {}\n"),
        ("b/deploy.yaml", FOO_DEPLOYMENT),
        ("README.md", "kind: Service\n"),
    ]);
    let graph = build_graph(dir.path()).unwrap();

    // ingress + configmap + deployment + storefront placeholder
    assert_eq!(graph.entity_count(), 4);
    assert_edges_valid(&graph);
}

#[test]
fn test_rebuild_is_identical() {
    let dir = tree(&[
        ("1-ingress.yaml", INGRESS_TO_MISSING),
        ("2-deploy.yaml", FOO_DEPLOYMENT),
        (
            "3-svc.yaml",
            "kind: Service\nmetadata: {name: foo}\nspec:\n  selector: {app: foo}\n",
        ),
    ]);
    let first = build_graph(dir.path()).unwrap();
    let second = build_graph(dir.path()).unwrap();

    let a: Vec<_> = first.entities().cloned().collect();
    let b: Vec<_> = second.entities().cloned().collect();
    assert_eq!(a, b);
    assert_eq!(first.references(), second.references());
    assert_eq!(a[0].kind, ResourceKind::Ingress);
}

#[test]
fn test_duplicate_keys_first_wins() {
    let dir = tree(&[
        ("a.yaml", "kind: Service\nmetadata: {name: web}\n"),
        ("b.yaml", "kind: Service\nmetadata: {name: web}\n"),
        (
            "c.yaml",
            "kind: Deployment\nmetadata:\n  name: api\n  annotations:\n    kube.references.services: web\n",
        ),
    ]);
    let graph = build_graph(dir.path()).unwrap();

    assert_eq!(graph.entity_count(), 3);
    let expected: BTreeSet<_> = [(2, 0)].into_iter().collect();
    assert_eq!(graph.references(), expected);
}

#[test]
fn test_duplicate_keys_rejected_by_config() {
    let dir = tree(&[
        ("a.yaml", "kind: Service\nmetadata: {name: web}\n"),
        ("b.yaml", "kind: Service\nmetadata: {name: web}\n"),
    ]);
    let config = BuildConfig::from_json(r#"{"duplicates": "reject"}"#).unwrap();
    let err = build_graph_with(dir.path(), &config).unwrap_err();

    assert!(matches!(err, ManifestError::DuplicateResource { .. }));
}

#[test]
fn test_invalid_yaml_fails_whole_build() {
    let dir = tree(&[
        ("good.yaml", "kind: Service\nmetadata: {name: web}\n"),
        ("bad.yaml", "kind: Service\nmetadata: {name: [unclosed\n"),
    ]);
    let err = build_graph(dir.path()).unwrap_err();

    assert!(matches!(err, ManifestError::Yaml { .. }));
}

#[test]
fn test_kind_without_name_fails() {
    let dir = tree(&[("svc.yaml", "kind: Service\nspec: {}\n")]);
    let err = build_graph(dir.path()).unwrap_err();

    assert!(matches!(err, ManifestError::MissingField { .. }));
}

#[test]
fn test_bad_workload_shape_fails_build() {
    let dir = tree(&[(
        "deploy.yaml",
        "kind: Deployment\nmetadata:\n  name: api\n  labels: [not, a, map]\n",
    )]);
    let err = build_graph(dir.path()).unwrap_err();

    assert!(matches!(err, ManifestError::InvalidShape { ref kind, .. } if kind == "Deployment"));
}

#[test]
fn test_missing_root_is_filesystem_error() {
    let err = build_graph(Path::new("/no/such/manifest/tree")).unwrap_err();
    assert!(err.is_filesystem());
}

#[test]
fn test_numeric_and_bool_labels_match_string_selector() {
    let dir = tree(&[
        (
            "deploy.yaml",
            "kind: Deployment\nmetadata:\n  name: api\n  labels: {app: api, version: 2, canary: true}\n",
        ),
        (
            "svc.yaml",
            "kind: Service\nmetadata: {name: api}\nspec:\n  selector: {app: api, version: \"2\", canary: \"true\"}\n",
        ),
    ]);
    let graph = build_graph(dir.path()).unwrap();

    let deploy = id_of(&graph, ResourceKind::Deployment, "api");
    let svc = id_of(&graph, ResourceKind::Service, "api");
    let expected: BTreeSet<_> = [(svc, deploy)].into_iter().collect();
    assert_eq!(graph.references(), expected);
}

#[test]
fn test_non_string_template_annotation_does_not_fail_build() {
    let dir = tree(&[(
        "deploy.yaml",
        r#"
kind: Deployment
metadata:
  name: api
spec:
  template:
    metadata:
      labels: {app: api}
      annotations:
        sidecar.istio.io/inject: false
        prometheus.io/port: 9090
"#,
    )]);
    let graph = build_graph(dir.path()).unwrap();

    assert_eq!(graph.entity_count(), 1);
    assert_eq!(graph.reference_count(), 0);
}

#[test]
fn test_metadata_and_template_labels_are_matched_separately() {
    let dir = tree(&[
        (
            "deploy.yaml",
            r#"
kind: Deployment
metadata:
  name: foo
  labels: {app: foo, tier: web}
spec:
  template:
    metadata:
      labels: {app: foo, zone: us}
"#,
        ),
        (
            "svc-a.yaml",
            "kind: Service\nmetadata: {name: by-template}\nspec:\n  selector: {app: foo, zone: us}\n",
        ),
        (
            "svc-b.yaml",
            "kind: Service\nmetadata: {name: mixed}\nspec:\n  selector: {tier: web, zone: us}\n",
        ),
    ]);
    let graph = build_graph(dir.path()).unwrap();

    let deploy = id_of(&graph, ResourceKind::Deployment, "foo");
    let by_template = id_of(&graph, ResourceKind::Service, "by-template");
    let expected: BTreeSet<_> = [(by_template, deploy)].into_iter().collect();
    assert_eq!(graph.references(), expected);
    assert!(graph.incoming(deploy).iter().all(|e| e.name != "mixed"));
}
