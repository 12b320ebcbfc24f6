//! End-to-end regeneration over on-disk resolver trees.

use std::{fs, path::Path};

use resolvgen_codegen::{Generator, Implementer, Plugin, RequiredPackages, Template};
use resolvgen_config::{Config, Layout, ResolverConfig};
use resolvgen_ir::{Field, Object, Schema};
use tempfile::TempDir;

const NOTICE: &str = "// This file will be automatically regenerated based on the schema,
// any custom resolver implementations will be preserved.
// Code generated by resolvgen
";

fn config(layout: Layout) -> Config {
    let mut resolver = ResolverConfig::new("graph/resolver.rs");
    resolver.layout = layout;
    resolver.schema_dir = "graph/schema".to_string();
    resolver.import_path = "crate::graph".to_string();
    Config {
        omit_version_in_file_notice: true,
        resolver: Some(resolver),
        ..Config::default()
    }
}

fn schema() -> Schema {
    Schema {
        objects: vec![
            Object::new("Query").field(
                Field::resolver("user", "User", "graph/schema/schema.graphql")
                    .arg("id", "String")
                    .returns("Option<User>"),
            ),
            Object::new("Mutation")
                .field(
                    Field::resolver("createUser", "CreateUser", "graph/schema/users/user.graphql")
                        .arg("name", "String")
                        .arg("email", "String")
                        .returns("User"),
                )
                .field(
                    Field::resolver("deletePost", "DeletePost", "graph/schema/posts/post.graphql")
                        .arg("id", "String")
                        .returns("bool"),
                ),
            Object::new("User").field(Field {
                name: "email".to_string(),
                member_name: "email".to_string(),
                ..Field::default()
            }),
        ],
        inputs: Vec::new(),
    }
}

fn generate(temp: &Path, config: &Config, schema: &Schema) -> RequiredPackages {
    let mut packages = RequiredPackages::new();
    Generator::new(config, schema)
        .base_dir(temp)
        .generate(&mut packages)
        .unwrap();
    packages
}

fn read(temp: &Path, path: &str) -> String {
    fs::read_to_string(temp.join(path)).unwrap()
}

#[test]
fn test_first_run_layout() {
    let temp = TempDir::new().unwrap();
    let config = config(Layout::FollowSchema);
    let packages = generate(temp.path(), &config, &schema());

    assert_eq!(
        packages.paths(),
        ["crate::graph::users", "crate::graph::posts"]
    );

    insta::assert_snapshot!(read(temp.path(), "graph/resolver.rs"), @r#"
    // This file will be automatically regenerated based on the schema,
    // any custom resolver implementations will be preserved.
    // Code generated by resolvgen

    use crate::graph::users as mod1;
    use crate::graph::posts as mod2;

    impl Resolver {
        pub fn query(&self) -> queryResolver<'_> {
            queryResolver { resolver: self }
        }

        pub fn mutation(&self) -> mutationResolver<'_> {
            mutationResolver { resolver: self }
        }
    }

    #[allow(non_camel_case_types)]
    pub struct queryResolver<'r> {
        pub resolver: &'r Resolver,
    }

    impl queryResolver<'_> {
        /// User is the resolver for the user field.
        pub fn User(&self, ctx: &Context, id: String) -> Option<User> {
            return User(ctx,id)
        }
    }

    #[allow(non_camel_case_types)]
    pub struct mutationResolver<'r> {
        pub resolver: &'r Resolver,
    }

    impl mutationResolver<'_> {
        /// CreateUser is the resolver for the createUser field.
        pub fn CreateUser(&self, ctx: &Context, name: String, email: String) -> User {
            return mod1::CreateUser(ctx,name,email)
        }

        /// DeletePost is the resolver for the deletePost field.
        pub fn DeletePost(&self, ctx: &Context, id: String) -> bool {
            return mod2::DeletePost(ctx,id)
        }
    }
    "#);

    assert_eq!(
        read(temp.path(), "graph/users/user.rs"),
        format!(
            "{NOTICE}
/// CreateUser is the resolver for the createUser field.
pub fn CreateUser(ctx: &Context, name: String, email: String) -> User {{
    todo!(\"not implemented: CreateUser - createUser\")
}}
"
        )
    );
    assert!(read(temp.path(), "graph/schema.rs").contains("pub fn User(ctx: &Context, id: String)"));
    assert!(read(temp.path(), "graph/posts/post.rs").contains("pub fn DeletePost("));
}

#[test]
fn test_regeneration_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let config = config(Layout::FollowSchema);
    let schema = schema();

    generate(temp.path(), &config, &schema);
    let paths = [
        "graph/resolver.rs",
        "graph/schema.rs",
        "graph/users/user.rs",
        "graph/posts/post.rs",
    ];
    let first: Vec<String> = paths.iter().map(|p| read(temp.path(), p)).collect();

    let mut packages = RequiredPackages::new();
    let result = Generator::new(&config, &schema)
        .base_dir(temp.path())
        .generate(&mut packages)
        .unwrap();
    let second: Vec<String> = paths.iter().map(|p| read(temp.path(), p)).collect();

    assert_eq!(first, second);
    assert!(result.written.is_empty());
    assert_eq!(result.unchanged.len(), paths.len());
}

#[test]
fn test_hand_written_code_is_preserved_once() {
    let temp = TempDir::new().unwrap();
    let config = config(Layout::FollowSchema);
    let schema = schema();
    generate(temp.path(), &config, &schema);

    let edited = "// old notice

use crate::models::User;

/// Creates a user.
pub fn CreateUser(ctx: &Context, name: String, email: String) -> User {
    let user = User::new(name, email);
    ctx.store(user)
}

fn helper() -> u8 {
    1
}
";
    fs::write(temp.path().join("graph/users/user.rs"), edited).unwrap();

    generate(temp.path(), &config, &schema);
    let expected = format!(
        "{NOTICE}
use crate::models::User;

/// Creates a user.
pub fn CreateUser(ctx: &Context, name: String, email: String) -> User {{
    let user = User::new(name, email);
    ctx.store(user)
}}

fn helper() -> u8 {{
    1
}}
"
    );
    assert_eq!(read(temp.path(), "graph/users/user.rs"), expected);

    generate(temp.path(), &config, &schema);
    let content = read(temp.path(), "graph/users/user.rs");
    assert_eq!(content, expected);
    assert_eq!(content.matches("pub fn CreateUser").count(), 1);
    assert_eq!(content.matches("fn helper").count(), 1);
}

#[test]
fn test_attributes_are_preserved() {
    let temp = TempDir::new().unwrap();
    let config = config(Layout::FollowSchema);
    let schema = schema();
    generate(temp.path(), &config, &schema);

    let edited = "#![allow(non_snake_case)]

/// Creates.
#[tracing::instrument(skip(ctx))]
pub fn CreateUser(ctx: &Context, name: String, email: String) -> User {
    ctx.store(name, email)
}
";
    fs::write(temp.path().join("graph/users/user.rs"), edited).unwrap();

    let expected = format!(
        "{NOTICE}
#![allow(non_snake_case)]

/// Creates.
#[tracing::instrument(skip(ctx))]
pub fn CreateUser(ctx: &Context, name: String, email: String) -> User {{
    ctx.store(name, email)
}}
"
    );
    generate(temp.path(), &config, &schema);
    assert_eq!(read(temp.path(), "graph/users/user.rs"), expected);

    generate(temp.path(), &config, &schema);
    assert_eq!(read(temp.path(), "graph/users/user.rs"), expected);
}

#[test]
fn test_aliases_follow_first_appearance() {
    let temp = TempDir::new().unwrap();
    let config = config(Layout::FollowSchema);
    let schema = Schema {
        objects: vec![
            Object::new("Query")
                .field(Field::resolver("a", "A", "graph/schema/users/a.graphql"))
                .field(Field::resolver("b", "B", "graph/schema/posts/b.graphql"))
                .field(Field::resolver("c", "C", "graph/schema/users/c.graphql")),
        ],
        inputs: Vec::new(),
    };

    let packages = generate(temp.path(), &config, &schema);
    assert_eq!(
        packages.paths(),
        ["crate::graph::users", "crate::graph::posts"]
    );

    let root = read(temp.path(), "graph/resolver.rs");
    assert!(root.contains("use crate::graph::users as mod1;\nuse crate::graph::posts as mod2;\n"));
    assert!(root.contains("return mod1::A(ctx)"));
    assert!(root.contains("return mod2::B(ctx)"));
    assert!(root.contains("return mod1::C(ctx)"));
    assert!(!root.contains("mod3"));
}

#[test]
fn test_root_edits_survive() {
    let temp = TempDir::new().unwrap();
    let config = config(Layout::FollowSchema);
    let schema = schema();
    generate(temp.path(), &config, &schema);

    let root = read(temp.path(), "graph/resolver.rs").replace(
        "return mod2::DeletePost(ctx,id)",
        "ctx.audit(\"delete\");\n        mod2::DeletePost(ctx,id)",
    );
    fs::write(temp.path().join("graph/resolver.rs"), &root).unwrap();

    generate(temp.path(), &config, &schema);
    assert_eq!(read(temp.path(), "graph/resolver.rs"), root);
}

struct Describe;

impl Plugin for Describe {
    fn name(&self) -> &'static str {
        "describe"
    }
}

struct Unimplemented;

impl Plugin for Unimplemented {
    fn name(&self) -> &'static str {
        "unimplemented"
    }

    fn implementer(&self) -> Option<&dyn Implementer> {
        Some(self)
    }
}

impl Implementer for Unimplemented {
    fn implement(&self, object: &Object, field: &Field) -> String {
        format!("unimplemented!(\"{}.{}\")", object.name, field.name)
    }
}

#[test]
fn test_implementer_plugin_supplies_new_bodies() {
    let temp = TempDir::new().unwrap();
    let config = config(Layout::FollowSchema);
    let schema = schema();

    let mut packages = RequiredPackages::new();
    let files = Generator::new(&config, &schema)
        .base_dir(temp.path())
        .plugin(Describe)
        .plugin(Unimplemented)
        .preview(&mut packages)
        .unwrap();

    let user_rs = files
        .iter()
        .find(|f| f.path.ends_with("users/user.rs"))
        .unwrap();
    assert!(user_rs
        .content
        .contains("    unimplemented!(\"Mutation.createUser\")\n"));

    let root = files
        .iter()
        .find(|f| f.path.ends_with("graph/resolver.rs"))
        .unwrap();
    assert!(root.content.contains("unimplemented!(\"Query.user\")"));
    assert!(!root.content.contains("return User(ctx,id)"));
}

#[test]
fn test_preview_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let config = config(Layout::FollowSchema);
    let schema = schema();

    let mut packages = RequiredPackages::new();
    let generator = Generator::new(&config, &schema).base_dir(temp.path());
    let plan = generator.plan(&mut packages).unwrap();

    let templates: Vec<Template> = plan.files.iter().map(|f| f.template).collect();
    assert_eq!(
        templates,
        [
            Template::RootInterface,
            Template::PerSchema,
            Template::PerSchema,
            Template::PerSchema
        ]
    );
    assert!(plan.file(temp.path().join("graph/users/user.rs")).is_some());

    let files = generator.render(&plan).unwrap();
    assert_eq!(files.len(), 4);
    assert!(!temp.path().join("graph").exists());
}

#[test]
fn test_single_file_generated_once() {
    let temp = TempDir::new().unwrap();
    let config = config(Layout::SingleFile);
    let schema = schema();

    generate(temp.path(), &config, &schema);
    let content = read(temp.path(), "graph/resolver.rs");
    assert!(content.starts_with(
        "// THIS CODE IS A STARTING POINT ONLY. IT WILL NOT BE UPDATED WITH SCHEMA CHANGES.\n\npub struct Resolver;\n"
    ));
    assert!(content.contains("        todo!(\"not implemented\")\n"));
    assert!(!temp.path().join("graph/users").exists());

    fs::write(temp.path().join("graph/resolver.rs"), "// mine").unwrap();
    let mut packages = RequiredPackages::new();
    let plan = Generator::new(&config, &schema)
        .base_dir(temp.path())
        .plan(&mut packages)
        .unwrap();
    assert!(plan.is_empty());

    generate(temp.path(), &config, &schema);
    assert_eq!(read(temp.path(), "graph/resolver.rs"), "// mine");
}

#[test]
fn test_single_file_skips_input_objects() {
    let temp = TempDir::new().unwrap();
    let config = config(Layout::SingleFile);
    let mut schema = schema();
    schema.inputs.push(
        Object::new("NewUser").field(Field::resolver("name", "Name", "graph/schema/users/user.graphql")),
    );

    generate(temp.path(), &config, &schema);
    let content = read(temp.path(), "graph/resolver.rs");
    assert!(content.contains("pub fn mutation(&self)"));
    assert!(!content.contains("newUserResolver"));
    assert!(!content.contains("pub fn Name("));
}

#[test]
fn test_without_resolver_section_nothing_happens() {
    let temp = TempDir::new().unwrap();
    let config = Config::default();

    let mut packages = RequiredPackages::new();
    let result = Generator::new(&config, &schema())
        .base_dir(temp.path())
        .generate(&mut packages)
        .unwrap();
    assert!(result.written.is_empty());
}

#[test]
fn test_unparseable_previous_file_aborts() {
    let temp = TempDir::new().unwrap();
    let users = temp.path().join("graph/users");
    fs::create_dir_all(&users).unwrap();
    fs::write(users.join("user.rs"), "pub fn CreateUser( {").unwrap();

    let config = config(Layout::FollowSchema);
    let mut packages = RequiredPackages::new();
    let err = Generator::new(&config, &schema())
        .base_dir(temp.path())
        .generate(&mut packages)
        .unwrap_err();

    assert!(err.chain().any(|cause| cause.to_string().contains("user.rs")));
    assert!(!temp.path().join("graph/resolver.rs").exists());
}
