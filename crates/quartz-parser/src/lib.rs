/*! Parse Quartz contract source into an AST.
 *
 * The surface language is class-based: one contract class per file plus
 * adjoining struct/event/error declarations (and optionally the parent
 * class). Parsing is the only stage allowed to fail hard; everything
 * after it accumulates diagnostics instead.
 */

use pest::Parser;
use pest_derive::Parser;
use std::path::Path;

pub mod ast;

pub use ast::{
    BinOp, ContractDecl, ErrorDecl, EventDecl, EventParamDecl, Expr, FieldDecl, MethodDecl,
    ParamDecl, SourceUnit, Stmt, StructDecl, TypeName, UnOp,
};

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct QuartzParser;

pub type ParseResult<T> = Result<T, Box<pest::error::Error<Rule>>>;

/// Parse a source unit into raw pest pairs. Most callers want
/// [`parse_source`] instead.
pub fn parse(input: &str) -> ParseResult<pest::iterators::Pairs<'_, Rule>> {
    QuartzParser::parse(Rule::source_unit, input).map_err(Box::new)
}

/// Parse a source unit into the AST.
pub fn parse_source(input: &str) -> ParseResult<SourceUnit> {
    let mut pairs = parse(input)?;
    let unit = pairs.next().expect("source_unit always matches at SOI");
    Ok(ast::build_source_unit(unit))
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

pub fn check(input: &str) -> bool {
    parse(input).is_ok()
}

/// Line number a parse error points at, for diagnostics that carry a
/// plain source position instead of a pest span.
pub fn error_line(err: &pest::error::Error<Rule>) -> usize {
    match err.line_col {
        pest::error::LineColLocation::Pos((line, _)) => line,
        pest::error::LineColLocation::Span((line, _), _) => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_unit() {
        assert!(check(""));
    }

    #[test]
    fn test_minimal_contract() {
        let input = r#"
contract Counter {
    value: u256;

    @external
    fn increment() {
        this.value = this.value + 1;
    }
}
"#;
        let unit = parse_source(input).unwrap();
        assert_eq!(unit.contracts.len(), 1);
        let contract = &unit.contracts[0];
        assert_eq!(contract.name, "Counter");
        assert_eq!(contract.fields.len(), 1);
        assert_eq!(contract.methods.len(), 1);
        assert_eq!(contract.methods[0].annotations, vec!["external"]);
    }

    #[test]
    fn test_extends_clause() {
        let input = r#"
contract Child extends Parent {
}
"#;
        let unit = parse_source(input).unwrap();
        assert_eq!(unit.contracts[0].parent.as_deref(), Some("Parent"));
    }

    #[test]
    fn test_struct_event_error_declarations() {
        let input = r#"
struct UserInfo {
    age: u256;
    active: bool;
}

event Transfer(from: indexed address, to: address, amount: u256);

error Unauthorized(caller: address);

contract Ledger {
    users: map<address, UserInfo>;
}
"#;
        let unit = parse_source(input).unwrap();
        assert_eq!(unit.structs.len(), 1);
        assert_eq!(unit.structs[0].fields.len(), 2);
        assert_eq!(unit.events.len(), 1);
        assert!(unit.events[0].params[0].indexed);
        assert!(!unit.events[0].params[1].indexed);
        assert_eq!(unit.errors.len(), 1);
        assert!(matches!(
            unit.contracts[0].fields[0].ty,
            TypeName::Map(_, _)
        ));
    }

    #[test]
    fn test_keyword_prefixed_identifier_is_not_a_keyword() {
        let input = r#"
contract T {
    letters: u256;

    @internal
    fn touch() {
        let emitted: u256 = this.letters;
        this.letters = emitted;
    }
}
"#;
        assert!(check(input));
    }

    #[test]
    fn test_expression_precedence() {
        let input = r#"
contract T {
    @internal
    fn f(): bool {
        return 1 + 2 * 3 == 7 && !false;
    }
}
"#;
        let unit = parse_source(input).unwrap();
        let body = &unit.contracts[0].methods[0].body;
        let Stmt::Return {
            value: Some(Expr::Binary { op, .. }),
            ..
        } = &body[0]
        else {
            panic!("expected a binary return expression");
        };
        assert_eq!(*op, BinOp::And);
    }

    #[test]
    fn test_do_while_and_revert() {
        let input = r#"
contract T {
    n: u256;

    @external
    fn spin(limit: u256) {
        do {
            this.n = this.n + 1;
        } while (this.n < limit);
        if (this.n == 0) {
            revert Underflow(this.n);
        }
    }
}

error Underflow(have: u256);
"#;
        let unit = parse_source(input).unwrap();
        let body = &unit.contracts[0].methods[0].body;
        assert!(matches!(body[0], Stmt::DoWhile { .. }));
        assert!(matches!(body[1], Stmt::If { .. }));
    }

    #[test]
    fn test_struct_literal_and_index() {
        let input = r#"
contract T {
    users: map<address, UserInfo>;

    @external
    fn set(addr: address) {
        this.users[addr] = UserInfo { age: 5, active: true };
    }
}

struct UserInfo {
    age: u256;
    active: bool;
}
"#;
        let unit = parse_source(input).unwrap();
        let body = &unit.contracts[0].methods[0].body;
        let Stmt::Expr {
            expr: Expr::Assign { target, value, .. },
            ..
        } = &body[0]
        else {
            panic!("expected an assignment");
        };
        assert!(matches!(**target, Expr::Index { .. }));
        assert!(matches!(**value, Expr::StructLit { .. }));
    }

    #[test]
    fn test_syntax_error_reports_location() {
        let input = "contract Broken { fn }";
        let err = parse_source(input).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("1"), "error should carry a line: {message}");
    }
}
