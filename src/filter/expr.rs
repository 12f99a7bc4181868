use crate::snapshot::CANONICAL_NAMESPACE;

/// Which value of a candidate type an atomic predicate inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Type,
    KindOld,
    KindNew,
}

impl Element {
    pub fn name(self) -> &'static str {
        match self {
            Element::Type => "type",
            Element::KindOld => "kind.old",
            Element::KindNew => "kind.new",
        }
    }
}

/// Predicates over a type's diff state. Only meaningful on `type`; the
/// parser rejects them on kind elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalPredicate {
    IsAdded,
    IsRemoved,
    IsPxr,
    IsStl,
    ChangedKind,
}

impl LogicalPredicate {
    pub fn from_name(name: &str) -> Option<LogicalPredicate> {
        match name {
            "is_added" => Some(LogicalPredicate::IsAdded),
            "is_removed" => Some(LogicalPredicate::IsRemoved),
            "is_pxr" => Some(LogicalPredicate::IsPxr),
            "is_stl" => Some(LogicalPredicate::IsStl),
            "changed_kind" => Some(LogicalPredicate::ChangedKind),
            _ => None,
        }
    }
}

/// Case-sensitive string comparisons; each carries a verbatim argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringPredicate {
    Is,
    StartsWith,
    EndsWith,
    Contains,
}

impl StringPredicate {
    pub const ALL: [StringPredicate; 4] = [
        StringPredicate::Is,
        StringPredicate::StartsWith,
        StringPredicate::EndsWith,
        StringPredicate::Contains,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StringPredicate::Is => "is",
            StringPredicate::StartsWith => "starts_with",
            StringPredicate::EndsWith => "ends_with",
            StringPredicate::Contains => "contains",
        }
    }

    fn apply(self, value: &str, argument: &str) -> bool {
        match self {
            StringPredicate::Is => value == argument,
            StringPredicate::StartsWith => value.starts_with(argument),
            StringPredicate::EndsWith => value.ends_with(argument),
            StringPredicate::Contains => value.contains(argument),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Logical(LogicalPredicate),
    String(StringPredicate, String),
}

/// One parsed atomic predicate, e.g. `!kind.new.starts_with:Usd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicFilter {
    pub negated: bool,
    pub element: Element,
    pub predicate: Predicate,
}

/// Operator joining two subexpressions. `&` binds tighter than `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn symbol(self) -> char {
        match self {
            Combinator::And => '&',
            Combinator::Or => '|',
        }
    }
}

/// A compiled filter expression. Compiled once per run and evaluated for
/// every candidate type; evaluation cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    /// The empty filter. Matches every type.
    True,
    Atom(AtomicFilter),
    Combine {
        op: Combinator,
        left: Box<FilterExpr>,
        right: Box<FilterExpr>,
    },
}

/// Declaration keywords a type name may carry ahead of its namespace.
const DECL_PREFIXES: [&str; 5] = ["class ", "struct ", "enum ", "union ", ""];

const STL_NAMESPACE: &str = "std::";

impl FilterExpr {
    /// Evaluate against one type and its old/new classification. A kind is
    /// None when the snapshot does not contain the type; None never equals
    /// a concrete kind.
    pub fn matches(&self, old_kind: Option<&str>, new_kind: Option<&str>, type_name: &str) -> bool {
        match self {
            FilterExpr::True => true,
            FilterExpr::Atom(atom) => atom.matches(old_kind, new_kind, type_name),
            FilterExpr::Combine { op, left, right } => {
                // Atoms are pure, so both sides are evaluated outright.
                let l = left.matches(old_kind, new_kind, type_name);
                let r = right.matches(old_kind, new_kind, type_name);
                match op {
                    Combinator::And => l && r,
                    Combinator::Or => l || r,
                }
            }
        }
    }
}

impl AtomicFilter {
    fn matches(&self, old_kind: Option<&str>, new_kind: Option<&str>, type_name: &str) -> bool {
        let value = match (self.element, &self.predicate) {
            (Element::Type, Predicate::Logical(logical)) => match logical {
                LogicalPredicate::IsAdded => old_kind.is_none() && new_kind.is_some(),
                LogicalPredicate::IsRemoved => old_kind.is_some() && new_kind.is_none(),
                LogicalPredicate::IsPxr => in_namespace(type_name, CANONICAL_NAMESPACE),
                LogicalPredicate::IsStl => in_namespace(type_name, STL_NAMESPACE),
                LogicalPredicate::ChangedKind => old_kind != new_kind,
            },
            (Element::Type, Predicate::String(pred, argument)) => pred.apply(type_name, argument),
            // A string predicate on an absent kind matches nothing.
            (Element::KindOld, Predicate::String(pred, argument)) => {
                old_kind.is_some_and(|kind| pred.apply(kind, argument))
            }
            (Element::KindNew, Predicate::String(pred, argument)) => {
                new_kind.is_some_and(|kind| pred.apply(kind, argument))
            }
            (Element::KindOld | Element::KindNew, Predicate::Logical(_)) => {
                unreachable!("logical predicate on a kind element survived parsing")
            }
        };

        if self.negated { !value } else { value }
    }
}

/// True when the type name, minus an optional declaration keyword, starts
/// with the given namespace marker.
fn in_namespace(type_name: &str, namespace: &str) -> bool {
    DECL_PREFIXES.iter().any(|prefix| {
        type_name
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(namespace))
    })
}
