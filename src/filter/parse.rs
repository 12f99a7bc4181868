use crate::filter::expr::{
    AtomicFilter, Combinator, Element, FilterExpr, LogicalPredicate, Predicate, StringPredicate,
};
use crate::filter::token::{Token, tokenize};
use anyhow::{Context, bail};

/// Compile a filter string into an expression tree.
///
/// The empty (or all-space) string compiles to [`FilterExpr::True`]. Any
/// malformed input is rejected here; a compiled expression can always be
/// evaluated.
pub fn compile(input: &str) -> anyhow::Result<FilterExpr> {
    let tokens = tokenize(input).with_context(|| format!("invalid filter {:?}", input))?;
    if tokens.is_empty() {
        return Ok(FilterExpr::True);
    }

    let units = tokens.into_iter().map(Unit::Tok).collect();
    reduce(units).with_context(|| format!("invalid filter {:?}", input))
}

/// Working unit of the reduction: a raw token, or a subexpression that has
/// already been compiled in its place.
#[derive(Debug)]
enum Unit {
    Tok(Token),
    Expr(FilterExpr),
}

/// Reduce a unit sequence to a single expression: splice the parenthesized
/// group, fold `&`, fold `|`, and require exactly one survivor.
fn reduce(mut units: Vec<Unit>) -> anyhow::Result<FilterExpr> {
    resolve_parens(&mut units)?;
    fold_operator(&mut units, Combinator::And)?;
    fold_operator(&mut units, Combinator::Or)?;

    if units.len() != 1 {
        bail!("terms must be joined with '&' or '|'");
    }
    into_expr(units.remove(0))
}

/// Compile the first parenthesized group (matched by nesting depth) into a
/// single unit. At most one group may exist per nesting level; recursion
/// into the group handles deeper levels.
fn resolve_parens(units: &mut Vec<Unit>) -> anyhow::Result<()> {
    let open = units.iter().position(is_open);

    if let Some(open) = open {
        let close = matching_close(units, open)?;
        let inner: Vec<Unit> = units.drain(open + 1..close).collect();
        if inner.is_empty() {
            bail!("empty parentheses");
        }

        // The '(' ')' pair is now adjacent; replace it with the group.
        units.drain(open..=open + 1);
        units.insert(open, Unit::Expr(reduce(inner)?));
    }

    if units.iter().any(|u| is_open(u) || is_close(u)) {
        match open {
            Some(_) => bail!("only one parenthesized group per nesting level is supported"),
            None => bail!("unmatched ')'"),
        }
    }
    Ok(())
}

/// Index of the ')' matching the '(' at `open`.
fn matching_close(units: &[Unit], open: usize) -> anyhow::Result<usize> {
    let mut depth = 0usize;
    for (i, unit) in units.iter().enumerate().skip(open) {
        if is_open(unit) {
            depth += 1;
        } else if is_close(unit) {
            depth -= 1;
            if depth == 0 {
                return Ok(i);
            }
        }
    }
    bail!("unmatched '('");
}

/// Left-to-right fold of one operator: each occurrence combines its two
/// neighbors into a single unit. Running the `&` fold to completion before
/// the `|` fold is what gives `&` the tighter binding.
fn fold_operator(units: &mut Vec<Unit>, op: Combinator) -> anyhow::Result<()> {
    let token = match op {
        Combinator::And => Token::And,
        Combinator::Or => Token::Or,
    };

    while let Some(i) = units
        .iter()
        .position(|u| matches!(u, Unit::Tok(t) if *t == token))
    {
        if i == 0 || i + 1 == units.len() {
            bail!("'{}' needs an expression on both sides", op.symbol());
        }
        if is_operator(&units[i - 1]) || is_operator(&units[i + 1]) {
            bail!("'{}' is adjacent to another operator", op.symbol());
        }

        let right = units.remove(i + 1);
        units.remove(i);
        let left = units.remove(i - 1);

        let combined = FilterExpr::Combine {
            op,
            left: Box::new(into_expr(left)?),
            right: Box::new(into_expr(right)?),
        };
        units.insert(i - 1, Unit::Expr(combined));
    }
    Ok(())
}

fn into_expr(unit: Unit) -> anyhow::Result<FilterExpr> {
    match unit {
        Unit::Expr(expr) => Ok(expr),
        Unit::Tok(Token::Text(text)) => parse_atomic(&text),
        Unit::Tok(token) => bail!("misplaced {:?} token", token),
    }
}

fn is_open(unit: &Unit) -> bool {
    matches!(unit, Unit::Tok(Token::Open))
}

fn is_close(unit: &Unit) -> bool {
    matches!(unit, Unit::Tok(Token::Close))
}

fn is_operator(unit: &Unit) -> bool {
    matches!(unit, Unit::Tok(Token::And | Token::Or))
}

/// Parse one atomic predicate, e.g. `!kind.new.starts_with:Usd`:
/// optional `!`, an element selector, and a predicate. String predicates
/// take everything after the first `:` as their verbatim argument.
fn parse_atomic(text: &str) -> anyhow::Result<FilterExpr> {
    let (negated, rest) = match text.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if rest.is_empty() {
        bail!("'!' negates nothing");
    }

    let (element, rest) = if let Some(rest) = rest.strip_prefix("type.") {
        (Element::Type, rest)
    } else if let Some(rest) = rest.strip_prefix("kind.old.") {
        (Element::KindOld, rest)
    } else if let Some(rest) = rest.strip_prefix("kind.new.") {
        (Element::KindNew, rest)
    } else {
        bail!("{:?} does not select 'type', 'kind.old' or 'kind.new'", text);
    };

    let predicate = if let Some(logical) = LogicalPredicate::from_name(rest) {
        if element != Element::Type {
            bail!("'{}' applies to 'type', not '{}'", rest, element.name());
        }
        Predicate::Logical(logical)
    } else if let Some((pred, argument)) = split_string_predicate(rest) {
        Predicate::String(pred, argument.to_string())
    } else {
        bail!("unknown predicate in {:?}", text);
    };

    Ok(FilterExpr::Atom(AtomicFilter {
        negated,
        element,
        predicate,
    }))
}

fn split_string_predicate(rest: &str) -> Option<(StringPredicate, &str)> {
    StringPredicate::ALL.iter().find_map(|&pred| {
        rest.strip_prefix(pred.name())
            .and_then(|tail| tail.strip_prefix(':'))
            .map(|argument| (pred, argument))
    })
}
