//! A diagnostic tree-dumper for [`Parser`] values.
//!
//! Mirrors the teacher crate's `trace` module in spirit: a readable,
//! colorized rendering of a value meant for a human staring at a failing
//! test, not a machine-parseable format. Gated behind the `debug` feature so
//! the `anstream`/`anstyle` dependency stays optional.

use std::fmt;

use crate::parser::Parser;

/// Render `p`'s shallow shape using the terminal's default color support
/// (auto-detected by `anstream`).
///
/// `More` nodes await a token before they can be inspected further, so
/// `default_token` is fed to a clone of the node to reveal what lies beneath
/// it. Parsers are immutable `Rc`-backed values, so this probes a throwaway
/// clone and never mutates `p` itself.
#[cfg(feature = "debug")]
pub fn show_with_default<S, R>(default_token: S, p: &Parser<S, R>) -> String
where
    S: Clone,
{
    let mut out = String::new();
    write_node(&mut out, &default_token, p, 0);
    out
}

#[cfg(feature = "debug")]
fn write_node<S, R>(out: &mut String, default_token: &S, p: &Parser<S, R>, depth: usize)
where
    S: Clone,
{
    use std::fmt::Write as _;

    let bold = anstyle::Style::new().bold();
    let dim = anstyle::Style::new().dimmed();
    let indent = "  ".repeat(depth);

    match p {
        Parser::Failure => {
            let _ = writeln!(out, "{indent}{bold}Failure{bold:#}");
        }
        Parser::Result { tail, .. } => {
            let _ = writeln!(
                out,
                "{indent}{bold}Result{bold:#} {dim}(tail len={}){dim:#}",
                tail.len()
            );
        }
        Parser::ResultPart { rest, .. } => {
            let _ = writeln!(out, "{indent}{bold}ResultPart{bold:#}(<fn>, ..)");
            write_node(out, default_token, rest, depth + 1);
        }
        Parser::Choice(l, r) => {
            let _ = writeln!(out, "{indent}{bold}Choice{bold:#}");
            write_node(out, default_token, l, depth + 1);
            write_node(out, default_token, r, depth + 1);
        }
        Parser::CommittedLeftChoice(l, r) => {
            let _ = writeln!(out, "{indent}{bold}CommittedLeftChoice{bold:#}");
            write_node(out, default_token, l, depth + 1);
            write_node(out, default_token, r, depth + 1);
        }
        Parser::More(g) => {
            let _ = writeln!(
                out,
                "{indent}{dim}More{dim:#} {dim}(probed with default token){dim:#}"
            );
            write_node(out, default_token, &g(default_token.clone()), depth + 1);
        }
        Parser::LookAhead { inner, .. } => {
            let _ = writeln!(out, "{indent}{bold}LookAhead{bold:#}(.., <fn>)");
            write_node(out, default_token, inner, depth + 1);
        }
        Parser::LookAheadIgnore { negate, .. } => {
            let _ = writeln!(
                out,
                "{indent}{bold}LookAheadIgnore{bold:#} {dim}(negate={negate}){dim:#}(<erased>, ..)"
            );
        }
    }
}

/// Render `p` as plain text, with no color codes. Available without the
/// `debug` feature.
pub fn show_plain<S, R>(p: &Parser<S, R>) -> String {
    format!("{p:?}")
}

#[cfg(all(test, feature = "debug"))]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn renders_choice_with_both_branches() {
        let p: Parser<char, u8> = Parser::Choice(
            Box::new(Parser::Failure),
            Box::new(Parser::More(Rc::new(|_| Parser::Failure))),
        );
        let rendered = show_with_default('x', &p);
        assert!(rendered.contains("Choice"));
        assert!(rendered.contains("Failure"));
        assert!(rendered.contains("More"));
    }
}
