//! Alias-tracking quarantine scanner.
//!
//! Detects construction of a sensitive type outside its approved files,
//! even when the type has been locally renamed. All matching runs against
//! the comment/string-blanked projection, so occurrences inside comments or
//! literals never count, and reported lines match the original file.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use crate::corpus;
use crate::engine::ScanError;
use crate::projection::{line_at_offset, project};
use crate::rules::QuarantineRule;
use crate::verdict::ScanHit;

/// Evaluates the quarantine over every eligible source file under the
/// rule's root.
///
/// Hits are globally deduplicated as `path:line` identifiers and reported
/// in lexicographic order, so one statement matched through two alias
/// spellings yields exactly one hit.
///
/// # Errors
///
/// Returns [`ScanError`] only for traversal faults.
pub(crate) fn evaluate(rule: &QuarantineRule, base: &Path) -> Result<Vec<ScanHit>, ScanError> {
    let root = base.join(&rule.root);
    if !root.is_dir() {
        debug!("rule {}: root {} absent", rule.name, root.display());
        return Ok(Vec::new());
    }

    let mut dedup: BTreeMap<String, ScanHit> = BTreeMap::new();

    for file in corpus::files_with_extension(&root, "rs")? {
        let relative = file
            .strip_prefix(base)
            .map_or_else(|_| file.clone(), Path::to_path_buf);
        if under_segment(&relative, &rule.test_segment) {
            continue;
        }
        let rel_str = relative.to_string_lossy();
        if rule.exempt_suffixes.iter().any(|s| rel_str.ends_with(s)) {
            continue;
        }
        let Some(text) = corpus::read_lossy(&file) else {
            continue;
        };

        let proj = project(&text);
        let mut aliases: BTreeSet<String> = BTreeSet::new();
        aliases.insert(rule.type_name.clone());
        aliases.extend(rename_aliases(&proj, &rule.type_name));
        aliases.extend(type_alias_names(&proj, &rule.type_name));

        for alias in &aliases {
            for offset in sink_sites(&proj, &rule.sink, alias) {
                let hit = ScanHit::new(relative.clone(), line_at_offset(&proj, offset));
                dedup.entry(hit.to_string()).or_insert(hit);
            }
        }
    }

    Ok(dedup.into_values().collect())
}

fn under_segment(path: &Path, segment: &str) -> bool {
    path.components().any(|c| {
        matches!(c, std::path::Component::Normal(s) if s.to_str() == Some(segment))
    })
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Byte offsets of identifier-bounded occurrences of `name` in `text`.
fn ident_occurrences(text: &str, name: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    text.match_indices(name)
        .filter(|&(i, _)| {
            let before_ok = i == 0 || !is_ident_byte(bytes[i - 1]);
            let end = i + name.len();
            let after_ok = end >= bytes.len() || !is_ident_byte(bytes[end]);
            before_ok && after_ok
        })
        .map(|(i, _)| i)
        .collect()
}

/// Aliases introduced by rename imports of the form `Name as Alias`.
fn rename_aliases(proj: &str, name: &str) -> Vec<String> {
    let mut out = Vec::new();
    for i in ident_occurrences(proj, name) {
        let rest = proj[i + name.len()..].trim_start();
        let Some(after_as) = rest.strip_prefix("as") else {
            continue;
        };
        if !after_as.starts_with(char::is_whitespace) {
            continue;
        }
        let alias: String = after_as
            .trim_start()
            .chars()
            .take_while(|&c| c.is_ascii_alphanumeric() || c == '_')
            .collect();
        if !alias.is_empty() {
            out.push(alias);
        }
    }
    out
}

/// Left-hand names of `type Alias = ...Name...` statements.
///
/// Statements are delimited by `;`; internal whitespace is collapsed before
/// matching, so a declaration split over several lines still matches.
fn type_alias_names(proj: &str, name: &str) -> Vec<String> {
    let mut out = Vec::new();
    for stmt in proj.split(';') {
        let collapsed = stmt.split_whitespace().collect::<Vec<_>>().join(" ");
        let Some(pos) = keyword_position(&collapsed, "type") else {
            continue;
        };
        let after = &collapsed[pos + "type".len()..];
        let Some((lhs, rhs)) = after.split_once('=') else {
            continue;
        };
        if ident_occurrences(rhs, name).is_empty() {
            continue;
        }
        let alias: String = lhs
            .trim()
            .chars()
            .take_while(|&c| c.is_ascii_alphanumeric() || c == '_')
            .collect();
        if !alias.is_empty() {
            out.push(alias);
        }
    }
    out
}

/// Position of `keyword` as a standalone word, if any.
fn keyword_position(text: &str, keyword: &str) -> Option<usize> {
    ident_occurrences(text, keyword).into_iter().next()
}

/// Byte offsets of construction call sites `sink( Alias::`, allowing
/// whitespace (including line breaks) between the parenthesis and the alias.
fn sink_sites(proj: &str, sink: &str, alias: &str) -> Vec<usize> {
    let bytes = proj.as_bytes();
    let pattern = format!("{sink}(");
    let mut out = Vec::new();

    for (i, _) in proj.match_indices(&pattern) {
        if i > 0 && is_ident_byte(bytes[i - 1]) {
            continue;
        }
        let mut j = i + pattern.len();
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        let rest = &proj[j..];
        if rest.starts_with(alias) && rest[alias.len()..].starts_with("::") {
            out.push(i);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn rule() -> QuarantineRule {
        QuarantineRule {
            name: "type-key-quarantine".into(),
            root: "src".into(),
            type_name: "TypeKey".into(),
            sink: "intern".into(),
            exempt_suffixes: vec!["solver/db.rs".into()],
            test_segment: "tests".into(),
        }
    }

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn direct_construction_is_reported() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "src/checker/flow.rs",
            "fn f(db: &Db) {\n    db.intern(TypeKey::Union(members));\n}\n",
        );

        let hits = evaluate(&rule(), tmp.path()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].to_string(), "src/checker/flow.rs:2");
    }

    #[test]
    fn rename_import_is_followed_across_lines() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "src/checker/flow.rs",
            "use crate::solver::{TypeKey as TK};\n\nfn f(db: &Db) {\n    db.intern(\n        TK::Union(members),\n    );\n}\n",
        );

        let hits = evaluate(&rule(), tmp.path()).unwrap();
        assert_eq!(hits.len(), 1);
        // Reported at the sink call's line, not the argument's.
        assert_eq!(hits[0].to_string(), "src/checker/flow.rs:4");
    }

    #[test]
    fn local_type_alias_is_followed() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "src/checker/flow.rs",
            "type Key =\n    TypeKey;\n\nfn f(db: &Db) {\n    db.intern(Key::Ref(sym));\n}\n",
        );

        let hits = evaluate(&rule(), tmp.path()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, 5);
    }

    #[test]
    fn two_alias_spellings_on_one_line_dedup_to_one_hit() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "src/checker/flow.rs",
            "use crate::solver::{TypeKey as TK};\nfn f(db: &Db) { db.intern(TK::Any); db.intern(TypeKey::Ref(s)); }\n",
        );

        let hits = evaluate(&rule(), tmp.path()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, 2);
    }

    #[test]
    fn construction_inside_comment_is_invisible() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "src/checker/flow.rs",
            "/* db.intern(TypeKey::Any) is forbidden here */\nfn f() {}\n// db.intern(TypeKey::Any)\n",
        );

        assert!(evaluate(&rule(), tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn construction_inside_string_is_invisible() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "src/checker/messages.rs",
            "const HINT: &str = \"call intern(TypeKey::Any) in the solver\";\n",
        );

        assert!(evaluate(&rule(), tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn exempt_suffix_and_test_segment_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "src/solver/db.rs",
            "fn f(&self) { self.intern(TypeKey::Any); }\n",
        );
        write(
            tmp.path(),
            "src/solver/tests/intern_tests.rs",
            "fn f(db: &Db) { db.intern(TypeKey::Any); }\n",
        );

        assert!(evaluate(&rule(), tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn hits_are_lexicographically_sorted() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "src/checker/zeta.rs",
            "fn f(db: &Db) { db.intern(TypeKey::Any); }\n",
        );
        write(
            tmp.path(),
            "src/binder/alpha.rs",
            "fn f(db: &Db) { db.intern(TypeKey::Any); }\n",
        );

        let hits = evaluate(&rule(), tmp.path()).unwrap();
        let rendered: Vec<String> = hits.iter().map(ToString::to_string).collect();
        let mut sorted = rendered.clone();
        sorted.sort();
        assert_eq!(rendered, sorted);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn suffix_of_sink_name_does_not_match() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "src/checker/flow.rs",
            "fn f(db: &Db) { db.reintern(TypeKey::Any); }\n",
        );

        assert!(evaluate(&rule(), tmp.path()).unwrap().is_empty());
    }

    // --- unit tests over the helpers ---

    #[test]
    fn rename_alias_extraction() {
        let aliases = rename_aliases("use x::{TypeKey as Renamed, Other};", "TypeKey");
        assert_eq!(aliases, ["Renamed"]);
    }

    #[test]
    fn rename_requires_word_boundary() {
        assert!(rename_aliases("use x::MyTypeKey as Bad;", "TypeKey").is_empty());
        assert!(rename_aliases("use x::TypeKeyed as Bad;", "TypeKey").is_empty());
    }

    #[test]
    fn type_alias_rhs_must_mention_name() {
        let found = type_alias_names("type A = TypeKey; type B = Other;", "TypeKey");
        assert_eq!(found, ["A"]);
    }

    #[test]
    fn type_alias_generic_lhs() {
        let found = type_alias_names("pub type Keyed<T> = Wrapper<T, TypeKey>;", "TypeKey");
        assert_eq!(found, ["Keyed"]);
    }

    #[test]
    fn sink_site_allows_newline_before_alias() {
        let proj = "db.intern(\n    TK::Union(x),\n);";
        let sites = sink_sites(proj, "intern", "TK");
        assert_eq!(sites.len(), 1);
        assert_eq!(line_at_offset(proj, sites[0]), 1);
    }
}
