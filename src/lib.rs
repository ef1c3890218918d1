//! Public facade for the FHIRPath tokenizer, parser, and AST services (spec §6).
//!
//! This crate is a thin re-export layer over the pipeline crates plus the one
//! piece of state that genuinely belongs at the facade level: the parse
//! cache (spec §3.4). Everything else — tokenizing, Pratt parsing,
//! diagnostics, `astToString`/`prettyPrint` — is implemented one crate down
//! and simply re-exported here, the same way the teacher's `oric` sits atop
//! `ori_parse`/`ori_lexer`/`ori_diagnostic` without reimplementing them.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::debug;

pub use fhirpath_ast::{ast_to_string, pretty_print, structural_eq, AstNode, BinaryOp, LiteralType, UnaryOp};
pub use fhirpath_diagnostic::ParseError;
pub use fhirpath_ir::{token_identifier_text, Position, Token, TokenKind};
pub use fhirpath_lexer::{tokenize, LexError, LexErrorKind, Tokenizer};

/// Upper bound on the number of memoized parses kept at once (spec §3.4:
/// "capacity-bounded (≤ a few thousand entries)"). Not load-bearing for
/// correctness — eviction just falls back to reparsing.
const CACHE_CAPACITY: usize = 4096;

fn cache() -> &'static DashMap<String, Arc<AstNode>> {
    static CACHE: OnceLock<DashMap<String, Arc<AstNode>>> = OnceLock::new();
    CACHE.get_or_init(DashMap::new)
}

/// Parses `source` into an [`AstNode`], consulting and populating the shared
/// parse cache (spec §3.4). AST nodes are immutable once built, so sharing
/// the same `Arc` across callers and across repeated calls with identical
/// source text is safe without cloning the tree.
///
/// Concurrent calls from multiple threads are safe: the cache is a
/// [`DashMap`], the lock-free map spec §5 asks for.
pub fn parse(source: &str) -> Result<Arc<AstNode>, ParseError> {
    if let Some(hit) = cache().get(source) {
        debug!(cache = "hit", len = source.len(), "parse");
        return Ok(Arc::clone(hit.value()));
    }

    debug!(cache = "miss", len = source.len(), "parse");
    let ast = Arc::new(fhirpath_parser::parse(source)?);

    // Capacity bound is advisory (spec §3.4 doesn't require a particular
    // eviction policy); evicting one arbitrary entry on overflow keeps the
    // map bounded without the bookkeeping a true LRU would need.
    if cache().len() >= CACHE_CAPACITY {
        // The victim key must be read out of its own statement so the
        // iterator's shard read-guard is dropped before `remove()` takes that
        // same shard's write lock — holding both at once deadlocks.
        let victim = cache().iter().next().map(|entry| entry.key().clone());
        if let Some(victim) = victim {
            cache().remove(&victim);
        }
    }

    cache().insert(source.to_string(), Arc::clone(&ast));
    Ok(ast)
}

/// Empties the parse cache (spec §3.4/§6 `clearCache()`).
pub fn clear_cache() {
    cache().clear();
}

/// Convenience wrapper around [`pretty_print`] that writes straight to
/// stdout (spec §6 `printAST(node)`).
pub fn print_ast(node: &AstNode) {
    println!("{}", pretty_print(node, 0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_and_cache_hit_return_the_same_allocation() {
        clear_cache();
        let first = parse("Patient.name.given").unwrap();
        let second = parse("Patient.name.given").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn clear_cache_forces_a_fresh_parse_but_same_shape() {
        clear_cache();
        let first = parse("1 + 2").unwrap();
        clear_cache();
        let second = parse("1 + 2").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(structural_eq(&first, &second));
    }

    #[test]
    fn parse_errors_are_not_cached() {
        clear_cache();
        assert!(parse("'unterminated").is_err());
        assert!(parse("'unterminated").is_err());
    }

    #[test]
    fn print_ast_does_not_panic() {
        let ast = parse("Patient.active").unwrap();
        print_ast(&ast);
    }

    #[test]
    fn facade_reexports_cover_the_public_surface() {
        let ast = parse("value is FHIR.Observation").unwrap();
        match ast.as_ref() {
            AstNode::Is { target_type, .. } => assert_eq!(target_type, "FHIR.Observation"),
            other => panic!("expected Is, got {other:?}"),
        }
        assert_eq!(ast_to_string(&ast), "(value is FHIR.Observation)");
    }

    #[test]
    fn tokenize_is_reexported_for_hosts_that_want_raw_tokens() {
        let toks = tokenize("a.b").unwrap();
        assert_eq!(toks.first().unwrap().kind, TokenKind::Identifier);
    }
}
