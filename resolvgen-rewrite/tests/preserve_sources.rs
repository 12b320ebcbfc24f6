//! Reconstruction of hand-written sources across a package.

use std::fs;

use resolvgen_rewrite::{DeclKind, Import, Session};
use tempfile::TempDir;

const USER_RS: &str = "\u{feff}//! Users.

use crate::{db::Pool, models::User as Model};

/// Fetches a user by id.
///
/// Returns `None` for unknown ids.
pub fn user(ctx: &Context, id: String) -> Option<Model> {
    // cached lookup, see café notes
    ctx.pool().user(&id)
}

pub fn create_user(ctx: &Context, name: String) -> Model {
    todo!(\"not implemented: create_user - createUser\")
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
";

#[test]
fn test_round_trip_through_session() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("users");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("user.rs");
    fs::write(&path, USER_RS).unwrap();

    let mut session = Session::load([&dir]).unwrap();
    let pkg = session.package(&dir);
    assert!(pkg.is_some());

    let body = session.method_body(pkg, "", "user").unwrap();
    assert_eq!(
        body.trim(),
        "// cached lookup, see café notes\n    ctx.pool().user(&id)"
    );
    assert_eq!(
        session.method_comment(pkg, "", "user"),
        "Fetches a user by id.\n\nReturns `None` for unknown ids."
    );
    session.method_body(pkg, "", "create_user").unwrap();

    assert_eq!(
        session.existing_imports(pkg, &path),
        vec![
            Import::new("", "crate::db::Pool"),
            Import::new("Model", "crate::models::User"),
        ]
    );
    assert_eq!(
        session.remaining_source(pkg, &path).unwrap(),
        "fn normalize(name: &str) -> String {\n    name.trim().to_lowercase()\n}"
    );

    // every slice came from the cached text
    assert_eq!(session.index().disk_reads(), 1);
}

#[test]
fn test_packages_are_separate() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().to_path_buf();
    let users = root.join("users");
    fs::create_dir_all(&users).unwrap();
    fs::write(root.join("resolver.rs"), "fn user() {}").unwrap();
    fs::write(users.join("user.rs"), "fn user() {}").unwrap();

    let mut session = Session::load([&root, &users]).unwrap();
    let root_pkg = session.package(&root);
    let users_pkg = session.package(&users);

    let a = session.find_declaration(root_pkg, "", "user").unwrap();
    let b = session.find_declaration(users_pkg, "", "user").unwrap();
    assert_ne!(a, b);
    assert_eq!(session.index().declaration(b).kind, DeclKind::Function);

    assert_eq!(
        session
            .remaining_source(root_pkg, users.join("user.rs"))
            .unwrap(),
        ""
    );
}

#[test]
fn test_unparseable_file_aborts_load() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("broken.rs"), "fn broken( {").unwrap();

    let err = Session::load([temp.path()]).unwrap_err();
    assert!(err.to_string().contains("broken.rs"));
}
