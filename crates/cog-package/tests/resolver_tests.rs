//! Resolver tests against whole manifests

use cog_config::Config;
use cog_package::{resolve, Declarations, PackageError, Relation};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn declarations(text: &str, use_default_features: bool) -> Declarations {
    Declarations::from_config(&Config::parse(text).unwrap(), use_default_features).unwrap()
}

#[test]
fn test_default_features_only() {
    let decls = declarations(
        "project.name=demo;feature.LOGGING=true;feature.EXTRA=false;",
        true,
    );
    let resolution = resolve::<&str>(&decls, &[]).unwrap();

    assert_eq!(resolution.features, vec!["LOGGING"]);
    assert_eq!(resolution.macro_flags(), vec!["-DFEATURE_LOGGING"]);
    assert!(resolution.packages.is_empty());
}

#[test]
fn test_forced_feature_pulls_optional_package() {
    let decls = declarations(
        "pkg?.zlib>=1.2;feature.COMPRESS.required=pkg.zlib;feature.COMPRESS=false;",
        true,
    );
    assert!(!decls.packages[0].required);

    let resolution = resolve(&decls, &["COMPRESS"]).unwrap();

    assert_eq!(resolution.features, vec!["COMPRESS"]);
    assert_eq!(resolution.packages.len(), 1);
    let zlib = &resolution.packages[0];
    assert_eq!(zlib.name, "zlib");
    assert_eq!(zlib.relation, Relation::AtLeast);
    assert_eq!(zlib.version, "1.2");
    assert!(zlib.required);

    // declarations are left untouched
    assert!(!decls.packages[0].required);
}

#[rstest]
#[case(&[])]
#[case(&["A"])]
#[case(&["B", "A"])]
fn test_cycle_terminates(#[case] forced: &[&str]) {
    let decls = declarations(
        "feature.A.required=feature.B;feature.B.required=feature.A;",
        forced.is_empty(),
    );
    let resolution = resolve(&decls, forced).unwrap();
    assert_eq!(resolution.features, vec!["A", "B"]);
}

#[test]
fn test_self_dependency() {
    let decls = declarations("feature.A.required=feature.A, feature.A;", true);
    let resolution = resolve::<&str>(&decls, &[]).unwrap();
    assert_eq!(resolution.features, vec!["A"]);
}

#[test]
fn test_unknown_dependency() {
    let decls = declarations("feature.A.required=feature.GHOST;", true);
    let err = resolve::<&str>(&decls, &[]).unwrap_err();

    assert!(matches!(err, PackageError::UnknownFeature { ref name, .. } if name == "GHOST"));
    assert_eq!(
        err.to_string(),
        "Cannot enable feature \"GHOST\" (required by feature.A) since it does not exist"
    );
}

#[test]
fn test_no_default_features_still_honours_forced() {
    let decls = declarations(
        "pkg?.ssl;feature.NET.required=feature.TLS;feature.TLS.required=pkg.ssl;feature.UI;",
        false,
    );
    let resolution = resolve(&decls, &["NET"]).unwrap();

    assert_eq!(resolution.features, vec!["NET", "TLS"]);
    assert_eq!(resolution.packages[0].name, "ssl");
}

#[test]
fn test_resolution_is_idempotent() {
    let decls = declarations(
        "pkg.m;pkg?.z=1.2.11;\
         feature.A.required=feature.B, pkg.z;\
         feature.B.required=feature.C;\
         feature.C=false;feature.C.required=feature.A;\
         feature.D=false;",
        true,
    );

    let first = resolve(&decls, &["D"]).unwrap();
    let second = resolve(&decls, &["D"]).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.features, vec!["A", "B", "C", "D"]);
    assert_eq!(
        first.packages.iter().map(|p| p.query()).collect::<Vec<_>>(),
        vec!["m", "z = 1.2.11"]
    );
}
