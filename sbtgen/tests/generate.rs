//! Integration tests for table loading and dispatch generation
use sbtgen::{
    Error, compose,
    dispatch::{DispatchKind, Variant},
    table::{SbtRecord, SbtTable, Stage},
};
use std::path::Path;

/// Extracts `(index, symbol)` pairs from `case` lines of generated source
fn parse_cases(src: &str) -> Vec<(usize, String)> {
    src.lines()
        .filter_map(|line| line.trim().strip_prefix("case "))
        .map(|rest| {
            let (index, call) = rest.split_once(':').unwrap();
            let symbol = call.trim().split('(').next().unwrap();
            (index.parse().unwrap(), symbol.to_owned())
        })
        .collect()
}

/// Builds a table mixing bound, empty, and absent fields at each stage
fn patterned_table(n: usize) -> SbtTable {
    let name = |stage: &str, i: usize, m: usize| {
        if i % m == 0 {
            None
        } else if i % m == 1 {
            Some(String::new())
        } else {
            Some(format!("{stage}_{i}"))
        }
    };
    SbtTable::new(
        (0..n)
            .map(|i| SbtRecord {
                raygen: name("rgen", i, 5),
                closest_hit: name("hit", i, 3),
                any_hit: name("anyhit", i, 4),
                miss: name("miss", i, 7),
            })
            .collect(),
    )
}

/// Runs a complete generation pass, writing `out` only on success
fn run(
    table: &Path,
    shader: &Path,
    out: &Path,
    variant: &Variant,
) -> Result<(), Error> {
    let table = SbtTable::load(table)?;
    let base = compose::read_source(shader)?;
    let text = compose::compose(&base, &compose::generate(&table, variant));
    compose::write_artifact(out, &text)
}

#[test]
fn round_trip() {
    for n in [0, 1, 2, 7, 31, 100] {
        let table = patterned_table(n);
        for variant in [Variant::legacy(), Variant::textured()] {
            for f in compose::generate(&table, &variant) {
                let cases = parse_cases(&f.to_string());
                let expected: Vec<_> = table
                    .bindings(f.kind().stage())
                    .map(|(i, s)| (i, s.to_owned()))
                    .collect();
                assert_eq!(cases, expected, "{:?} (n = {n})", f.kind());

                // Labels are strictly ascending and within the table
                assert!(cases.windows(2).all(|w| w[0].0 < w[1].0));
                assert!(cases.iter().all(|(i, _)| *i < n));
            }
        }
    }
}

#[test]
fn branch_count_matches_bound_records() {
    let table = patterned_table(64);
    for f in compose::generate(&table, &Variant::textured()) {
        let stage = f.kind().stage();
        let bound = table.iter().filter(|r| r.symbol(stage).is_some()).count();
        assert_eq!(f.branches().len(), bound);
        assert_eq!(f.to_string().matches("case ").count(), bound);
    }
}

#[test]
fn default_branches() {
    let table = patterned_table(10);
    for f in compose::generate(&table, &Variant::legacy()) {
        assert_eq!(f.to_string().matches("default:").count(), 1);
    }
    for f in compose::generate(&table, &Variant::textured()) {
        assert_eq!(f.to_string().matches("default:").count(), 0);
    }
}

#[test]
fn two_record_scenario() {
    let table: SbtTable = r#"[
        {"raygen": "rgen", "closestHit": "hitA", "anyHit": null, "miss": null},
        {"raygen": null, "closestHit": null, "anyHit": null, "miss": "missB"}
    ]"#
    .parse()
    .unwrap();
    let fs = compose::generate(&table, &Variant::legacy());
    let hit = fs.iter().find(|f| f.kind() == DispatchKind::Hit).unwrap();
    assert_eq!(parse_cases(&hit.to_string()), vec![(0, "hitA".to_owned())]);
    let miss = fs.iter().find(|f| f.kind() == DispatchKind::Miss).unwrap();
    assert_eq!(parse_cases(&miss.to_string()), vec![(1, "missB".to_owned())]);
}

#[test]
fn empty_table() {
    let table: SbtTable = "[]".parse().unwrap();
    for f in compose::generate(&table, &Variant::legacy()) {
        let s = f.to_string();
        assert!(parse_cases(&s).is_empty());
        assert_eq!(s.matches("default:").count(), 1);
    }
    for f in compose::generate(&table, &Variant::textured()) {
        let s = f.to_string();
        assert!(s.contains("    {\n    }\n"), "{s}");
    }
}

#[test]
fn end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("sbt.json");
    let shader = dir.path().join("shader.cl");
    let out = dir.path().join("tmp.cl");
    std::fs::write(
        &table,
        r#"[{"raygen": "rgen", "closestHit": "diffuse", "anyHit": "alpha",
             "miss": "sky"}]"#,
    )
    .unwrap();
    let base = "#include \"core.h\"\n\nvoid diffuse() {}\n";
    std::fs::write(&shader, base).unwrap();

    run(&table, &shader, &out, &Variant::textured()).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with(base));
    assert!(text.contains(
        "case 0: alpha(cont, payload, hitData, sceneData TEXTURE_PARAM);"
    ));
    assert!(text.contains(
        "case 0: diffuse(payload, hitData, sceneData TEXTURE_PARAM);"
    ));
    assert!(text.contains("case 0: sky(payload, sceneData TEXTURE_PARAM);"));
    assert!(!text.contains("rgen"));
}

#[test]
fn malformed_json_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("sbt.json");
    let shader = dir.path().join("shader.cl");
    let out = dir.path().join("tmp.cl");
    std::fs::write(&table, r#"[{"closestHit": "h""#).unwrap();
    std::fs::write(&shader, "").unwrap();

    let e = run(&table, &shader, &out, &Variant::legacy()).unwrap_err();
    assert!(matches!(e, Error::ParseError(..)), "{e:?}");
    assert!(!out.exists());
}

#[test]
fn wrong_shape_is_a_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("sbt.json");
    std::fs::write(&table, r#"[{"miss": 12}]"#).unwrap();
    let e = SbtTable::load(&table).unwrap_err();
    assert!(matches!(e, Error::SchemaError(..)), "{e:?}");
}

#[test]
fn missing_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("sbt.json");
    let shader = dir.path().join("shader.cl");
    let out = dir.path().join("tmp.cl");

    let e = run(&table, &shader, &out, &Variant::legacy()).unwrap_err();
    match e {
        Error::NotFound(p) => assert_eq!(p, table),
        e => panic!("unexpected error {e:?}"),
    }

    std::fs::write(&table, "[]").unwrap();
    let e = run(&table, &shader, &out, &Variant::legacy()).unwrap_err();
    match e {
        Error::NotFound(p) => assert_eq!(p, shader),
        e => panic!("unexpected error {e:?}"),
    }
    assert!(!out.exists());
}

#[test]
fn unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("no-such-dir").join("tmp.cl");
    let e = compose::write_artifact(&out, "").unwrap_err();
    match e {
        Error::IoError { path, .. } => assert_eq!(path, out),
        e => panic!("unexpected error {e:?}"),
    }
}

#[test]
fn table_is_read_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sbt.json");
    std::fs::write(
        &path,
        r#"[{"miss": "z"}, {"miss": "a"}, {}, {"miss": "m"}]"#,
    )
    .unwrap();
    let table = SbtTable::load(&path).unwrap();
    let misses: Vec<_> = table.bindings(Stage::Miss).collect();
    assert_eq!(misses, vec![(0, "z"), (1, "a"), (3, "m")]);
}
