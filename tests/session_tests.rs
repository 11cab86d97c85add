//! End-to-end tests for generation sessions over real files

use std::fs;

use tagwright::{GeneratorConfig, IdRange, Manifest, Message, Package, Session, SessionError, StoreFormat};

fn package(name: &str, range: (u32, u32), messages: &[(&str, Option<u32>)]) -> Package {
    Package {
        name: name.to_string(),
        range: Some(IdRange {
            min: range.0,
            max: range.1,
        }),
        export: true,
        messages: messages
            .iter()
            .map(|(n, id)| Message {
                name: n.to_string(),
                id: *id,
            })
            .collect(),
    }
}

#[test]
fn first_run_creates_table_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.txt");
    let mut session = Session::with_seed(GeneratorConfig::new().with_store(&path), 1);
    let report = session
        .run_package(&package("login", (100, 199), &[("Login", Some(101)), ("Logout", None)]))
        .unwrap();
    assert_eq!(report.entries[0].name, "LoginType");
    assert_eq!(report.entries[0].id, 101);
    let logout = report.entries[1].id;
    assert!((100..=199).contains(&logout));

    assert_eq!(session.finish().unwrap(), vec![path.clone()]);
    let text = fs::read_to_string(&path).unwrap();
    let mut expected = vec![("LoginType", 101), ("LogoutType", logout)];
    expected.sort_by_key(|e| e.1);
    let expected: String = expected.iter().map(|(n, id)| format!("{n} = {id}\n")).collect();
    assert_eq!(text, expected);
}

#[test]
fn second_run_keeps_ids_and_carries_forward() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.txt");
    fs::write(&path, "// generated\nLoginType = 120\nLogoutType = 121\n").unwrap();

    let mut session = Session::with_seed(GeneratorConfig::new().with_store(&path), 2);
    let report = session
        .run_package(&package("login", (100, 199), &[("Login", None)]))
        .unwrap();
    assert_eq!(report.entries[0].id, 120);
    assert!(report.warnings.is_empty());
    session.finish().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "LoginType = 120\nLogoutType = 121\n");
}

#[test]
fn narrowed_range_warns_and_redraws() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.txt");
    fs::write(&path, "XType = 150\n").unwrap();

    let mut session = Session::with_seed(GeneratorConfig::new().with_store(&path), 3);
    let report = session.run_package(&package("p", (0, 100), &[("X", None)])).unwrap();
    let id = report.entries[0].id;
    assert!(id <= 100);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].old, 150);
    assert_eq!(report.warnings[0].new, id);
}

#[test]
fn packages_share_one_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.txt");
    let mut session = Session::with_seed(GeneratorConfig::new().with_store(&path), 4);
    let a = session.run_package(&package("a", (0, 9), &[("A", None)])).unwrap();
    let b = session.run_package(&package("b", (10, 19), &[("B", None)])).unwrap();
    assert!(a.entries[0].id <= 9);
    assert!((10..=19).contains(&b.entries[0].id));
    assert_eq!(session.allocator(&path).unwrap().range(), (10, 19));

    session.finish().unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn duplicate_id_aborts_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.txt");
    fs::write(&path, "AType = 1\n").unwrap();

    let mut session = Session::with_seed(GeneratorConfig::new().with_store(&path), 5);
    let err = session
        .run_package(&package("p", (0, 10), &[("A", Some(3)), ("B", Some(3))]))
        .unwrap_err();
    assert_eq!(err.to_string(), "p: 3 duplicated: AType and BType");

    // The store is now failed; later packages cannot use it and nothing is written.
    let err = session.run_package(&package("q", (0, 10), &[("C", None)])).unwrap_err();
    assert!(matches!(err, SessionError::StoreFailed { .. }));
    assert!(session.finish().unwrap().is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "AType = 1\n");
}

#[test]
fn malformed_store_is_reported_with_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.txt");
    fs::write(&path, "AType = 1\nbroken\n").unwrap();

    let mut session = Session::new(GeneratorConfig::new().with_store(&path));
    let err = session.run_package(&package("p", (0, 10), &[("A", None)])).unwrap_err();
    assert!(matches!(err, SessionError::Store(_)));
    assert!(err.to_string().ends_with(":2: invalid line `broken`, correct format: Name = integer"));
}

#[test]
fn unexported_package_skips_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.txt");
    let mut session = Session::new(GeneratorConfig::new().with_store(&path));
    let mut pkg = package("p", (0, 10), &[("A", Some(4))]);
    pkg.export = false;
    let report = session.run_package(&pkg).unwrap();
    assert_eq!(report.entries[0].id, 4);
    assert!(session.finish().unwrap().is_empty());
    assert!(!path.exists());
}

#[test]
fn embedded_store_in_proto_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.proto");
    fs::write(
        &path,
        "syntax = \"proto3\";\n\nenum MessageType {\n\tLoginType = 7,\n}\n",
    )
    .unwrap();

    let config = GeneratorConfig::new().with_store(&path).with_enum_name("MessageType");
    assert_eq!(config.store_format, StoreFormat::Embedded);
    let mut session = Session::with_seed(config, 6);
    let manifest = Manifest::from_json(
        r#"{"packages":[{"name":"login","range":{"min":0,"max":10},
            "messages":[{"name":"Login"},{"name":"Chat","id":2}]}]}"#,
    )
    .unwrap();
    for pkg in &manifest.packages {
        session.run_package(pkg).unwrap();
    }
    session.finish().unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "syntax = \"proto3\";\n\nenum MessageType {\n\tChatType  = 2,\n\tLoginType = 7,\n}\n"
    );
}

#[test]
fn missing_proto_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.proto");
    let mut session = Session::new(GeneratorConfig::new().with_store(&path));
    let err = session.run_package(&package("p", (0, 10), &[("A", None)])).unwrap_err();
    assert!(matches!(err, SessionError::Store(tagwright::StoreError::Io { .. })));
}

#[test]
fn non_identifier_name_never_reaches_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.txt");
    fs::write(&path, "LoginType = 7\n").unwrap();

    let mut session = Session::with_seed(GeneratorConfig::new().with_store(&path), 8);
    let err = session
        .run_package(&package("p", (0, 10), &[("Login", None), ("Foo.Bar", Some(7))]))
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidName { ref name, .. } if name == "Foo.BarType"));
    session.finish().unwrap();

    // The rewritten store still loads on the next run.
    let mut next = Session::with_seed(GeneratorConfig::new().with_store(&path), 9);
    let report = next.run_package(&package("p", (0, 10), &[("Login", None)])).unwrap();
    assert_eq!(report.entries[0].id, 7);
    assert_eq!(fs::read_to_string(&path).unwrap(), "LoginType = 7\n");
}
