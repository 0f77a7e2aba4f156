//! Coercion resolution tests for the PL/CSQL type system
//!
//! Covers:
//! - Identity, NULL cast and Object special cases
//! - Every matrix entry resolving to its named conversion
//! - Directionality of the matrix
//! - %TYPE references
//! - The support library cross-check

use plcsql_types::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

const SUPPORT_MANIFEST: &str = include_str!("fixtures/support_routines.txt");

fn concrete_types() -> impl Iterator<Item = SimpleType> {
    SimpleType::ALL.into_iter()
}

fn resolve(from: SimpleType, to: SimpleType) -> CoercionResult<Coercion> {
    TypeCoercer::new().resolve(&from.into(), &to.into())
}

// === Special cases ===

#[test]
fn test_same_type_is_identity() {
    for ty in concrete_types() {
        assert_eq!(resolve(ty, ty), Ok(Coercion::Identity), "{ty} -> {ty}");
    }
}

#[test]
fn test_null_casts_to_every_type() {
    for ty in concrete_types().filter(|t| *t != SimpleType::Null) {
        assert_eq!(resolve(SimpleType::Null, ty), Ok(Coercion::Cast(ty)), "Null -> {ty}");
    }
}

#[test]
fn test_every_type_is_an_object() {
    for ty in concrete_types().filter(|t| *t != SimpleType::Null) {
        assert_eq!(resolve(ty, SimpleType::Object), Ok(Coercion::Identity), "{ty} -> Object");
    }
}

// === Matrix entries ===

#[test]
fn test_every_matrix_entry_resolves_to_its_conversion() {
    let matrix = CoercionMatrix::global();
    for (from, to) in matrix.entries() {
        assert_eq!(
            resolve(from, to),
            Ok(Coercion::Conversion { from, to }),
            "{from} -> {to}"
        );
    }
}

#[test]
fn test_support_library_covers_matrix() {
    let library = SupportLibrary::from_manifest(SUPPORT_MANIFEST);
    assert_eq!(library.missing(CoercionMatrix::global()), Vec::<String>::new());
    assert!(library.verify().is_ok());

    for (from, to) in CoercionMatrix::global().entries() {
        let coercion = resolve(from, to).unwrap();
        let routine = coercion.routine_name().unwrap();
        assert!(library.contains(&routine), "missing {routine}");
    }
}

#[test]
fn test_support_library_detects_gap() {
    let trimmed: String = SUPPORT_MANIFEST
        .lines()
        .filter(|line| *line != "convStringToTime")
        .collect::<Vec<_>>()
        .join("\n");
    let library = SupportLibrary::from_manifest(&trimmed);

    let err = library.verify().unwrap_err();
    assert_eq!(
        err,
        CoercionError::MissingRoutines(vec!["convStringToTime".to_string()])
    );
    assert!(err.to_string().contains("convStringToTime"));
}

// === Directionality ===

#[rstest]
#[case(SimpleType::Int, SimpleType::Time)]
#[case(SimpleType::Double, SimpleType::Time)]
#[case(SimpleType::Numeric, SimpleType::Timestamp)]
#[case(SimpleType::Timestamp, SimpleType::Time)]
fn test_one_way_conversions(#[case] a: SimpleType, #[case] b: SimpleType) {
    assert!(resolve(a, b).is_ok(), "{a} -> {b} should convert");
    assert!(resolve(b, a).is_err(), "{b} -> {a} should not convert");
}

#[rstest]
#[case(SimpleType::Time, SimpleType::Int)]
#[case(SimpleType::Time, SimpleType::Date)]
#[case(SimpleType::Date, SimpleType::Time)]
#[case(SimpleType::Numeric, SimpleType::Time)]
#[case(SimpleType::Date, SimpleType::Int)]
#[case(SimpleType::Boolean, SimpleType::String)]
#[case(SimpleType::String, SimpleType::Boolean)]
fn test_incompatible_pairs(#[case] from: SimpleType, #[case] to: SimpleType) {
    assert_eq!(resolve(from, to), Err(CoercionError::Incompatible { from, to }));
}

#[test]
fn test_time_destinations() {
    let matrix = CoercionMatrix::global();
    assert_eq!(matrix.targets(SimpleType::Time), &[SimpleType::String]);
    // the reverse is declared separately
    assert!(matrix.contains(SimpleType::String, SimpleType::Time));
    assert_eq!(
        resolve(SimpleType::String, SimpleType::Time),
        Ok(Coercion::Conversion { from: SimpleType::String, to: SimpleType::Time })
    );
}

#[test]
fn test_asymmetric_pairs_exist() {
    let matrix = CoercionMatrix::global();
    let asymmetric = matrix
        .entries()
        .filter(|(from, to)| !matrix.contains(*to, *from))
        .count();
    assert!(asymmetric > 0);
}

// === %TYPE references ===

#[test]
fn test_percent_type_resolves_before_lookup() {
    let mut from = PercentType::new("emp.hired");
    from.resolve(SimpleType::Date);
    let mut to = PercentType::new("v_label");
    to.resolve(SimpleType::String);

    let coercion = TypeCoercer::new()
        .resolve(&TypeSpec::Percent(from), &TypeSpec::Percent(to))
        .unwrap();
    assert_eq!(coercion.generate("v_hired"), "convDateToString(v_hired)");
}

#[test]
#[should_panic(expected = "v_total%TYPE used before its type was resolved")]
fn test_unresolved_percent_type_is_a_bug() {
    let _ = TypeCoercer::new().resolve(&TypeSpec::percent("v_total"), &SimpleType::Int.into());
}

// === Code generation ===

#[rstest]
#[case(SimpleType::Int, SimpleType::Int, "x")]
#[case(SimpleType::Null, SimpleType::Numeric, "(BigDecimal) x")]
#[case(SimpleType::Null, SimpleType::Datetime, "(Timestamp) x")]
#[case(SimpleType::Short, SimpleType::Object, "x")]
#[case(SimpleType::Object, SimpleType::Short, "convObjectToShort(x)")]
#[case(SimpleType::String, SimpleType::Bigint, "convStringToBigint(x)")]
fn test_generated_code(#[case] from: SimpleType, #[case] to: SimpleType, #[case] expected: &str) {
    assert_eq!(resolve(from, to).unwrap().generate("x"), expected);
}

#[test]
fn test_session_sensitivity_across_matrix() {
    let textual_or_numeric = |ty: SimpleType| ty.is_numeric() || ty == SimpleType::String;
    for (from, to) in CoercionMatrix::global().entries() {
        let expected = (from.is_temporal() && textual_or_numeric(to))
            || (to.is_temporal() && textual_or_numeric(from));
        let coercion = resolve(from, to).unwrap();
        assert_eq!(
            coercion.is_session_sensitive(),
            expected,
            "{} -> {}",
            from,
            to
        );
    }
    let sensitive = CoercionMatrix::global()
        .entries()
        .filter(|(from, to)| resolve(*from, *to).unwrap().is_session_sensitive())
        .count();
    // 4 temporal -> String, 11 numeric -> temporal, 4 String -> temporal
    assert_eq!(sensitive, 19);
    // temporal to temporal only changes precision
    assert!(!resolve(SimpleType::Timestamp, SimpleType::Date).unwrap().is_session_sensitive());
    assert!(resolve(SimpleType::Double, SimpleType::Time).unwrap().is_session_sensitive());
}

proptest! {
    #[test]
    fn prop_resolution_agrees_with_matrix(
        from in prop::sample::select(SimpleType::ALL.to_vec()),
        to in prop::sample::select(SimpleType::ALL.to_vec()),
    ) {
        let result = resolve(from, to);
        if from == to || to == SimpleType::Object {
            prop_assert!(matches!(result, Ok(Coercion::Identity) | Ok(Coercion::Cast(_))));
        } else if from == SimpleType::Null {
            prop_assert_eq!(result, Ok(Coercion::Cast(to)));
        } else if CoercionMatrix::global().contains(from, to) {
            prop_assert_eq!(result, Ok(Coercion::Conversion { from, to }));
        } else {
            prop_assert_eq!(result, Err(CoercionError::Incompatible { from, to }));
        }
    }
}
