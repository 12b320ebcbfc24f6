//! Validation of parsed configuration values.

use miette::SourceSpan;

use crate::{Config, Result, error::SourceContext};

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while",
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield",
];

/// Path segments that are keywords but valid at the start of a module path
const PATH_ROOTS: &[&str] = &["crate", "self", "super"];

pub(crate) fn validate_config(config: &Config, ctx: &SourceContext) -> Result<()> {
    let Some(resolver) = &config.resolver else {
        return Ok(());
    };

    if let Some(reason) = identifier_error(&resolver.type_name) {
        return Err(ctx.validation_error(
            format!("invalid resolver type '{}': {}", resolver.type_name, reason),
            find_value_span(ctx.src(), &resolver.type_name),
        ));
    }

    if resolver.filename.extension().is_none_or(|ext| ext != "rs") {
        let filename = resolver.filename.display().to_string();
        return Err(ctx.validation_error(
            format!("resolver filename '{}' must end in .rs", filename),
            find_value_span(ctx.src(), &filename),
        ));
    }

    if let Some(template) = &resolver.filename_template {
        if !template.is_empty() && !template.contains("{name}") {
            return Err(ctx.validation_error(
                format!("filename_template '{}' must contain {{name}}", template),
                find_value_span(ctx.src(), template),
            ));
        }
    }

    for (i, segment) in resolver.import_path.split("::").enumerate() {
        if i == 0 && PATH_ROOTS.contains(&segment) {
            continue;
        }
        if let Some(reason) = identifier_error(segment) {
            return Err(ctx.validation_error(
                format!(
                    "invalid import_path '{}': segment '{}' {}",
                    resolver.import_path, segment, reason
                ),
                find_value_span(ctx.src(), &resolver.import_path),
            ));
        }
    }

    Ok(())
}

/// Check that a name is usable as a Rust identifier.
///
/// Returns the reason it is not, or `None` if it is valid.
pub(crate) fn identifier_error(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Some("cannot be empty"),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("must start with a letter or underscore"),
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some("may only contain letters, numbers, and underscores");
    }

    if RUST_KEYWORDS.contains(&name) || PATH_ROOTS.contains(&name) {
        return Some("is a Rust reserved keyword");
    }

    None
}

/// Find the span of a quoted string value in the TOML source
fn find_value_span(src: &str, value: &str) -> Option<SourceSpan> {
    let quoted = format!("\"{}\"", value);
    src.find(&quoted)
        .map(|pos| SourceSpan::from((pos + 1, value.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_error() {
        assert_eq!(identifier_error("Resolver"), None);
        assert_eq!(identifier_error("_private"), None);
        assert!(identifier_error("").is_some());
        assert!(identifier_error("1st").is_some());
        assert!(identifier_error("my-type").is_some());
        assert!(identifier_error("struct").is_some());
    }

    #[test]
    fn test_find_value_span() {
        let src = "[resolver]\ntype = \"Bad-Type\"\n";
        let span = find_value_span(src, "Bad-Type").unwrap();
        assert_eq!(span.offset(), 19);
        assert_eq!(span.len(), 8);
    }
}
