//! The diff engine: reporting passes over two catalog snapshots.
//!
//! Each pass walks its own slice of the type universe and produces an
//! ordered block of lines; no pass reads another pass's state. Types
//! present only in the old snapshot, only in the new one, and in both are
//! covered by the type-diff and moved-types passes with no overlap.

use crate::filter::FilterExpr;
use crate::snapshot::Snapshot;
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;

/// The closed set of reporting passes. Pass dispatch is an exhaustive
/// match, so an unrecognized pass cannot get past argument parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[value(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportPass {
    DiffKinds,
    DiffTypes,
    MovedTypesSummary,
    MovedTypes,
    AllTypes,
}

impl ReportPass {
    /// Every pass, in default execution order.
    pub const ALL: [ReportPass; 5] = [
        ReportPass::DiffKinds,
        ReportPass::DiffTypes,
        ReportPass::MovedTypesSummary,
        ReportPass::MovedTypes,
        ReportPass::AllTypes,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ReportPass::DiffKinds => "Difference of kinds:",
            ReportPass::DiffTypes => "Difference of types:",
            ReportPass::MovedTypesSummary => "Moved types summary:",
            ReportPass::MovedTypes => "Moved types:",
            ReportPass::AllTypes => "All types:",
        }
    }
}

/// One pass's output: its title and the ordered body lines.
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub pass: ReportPass,
    pub title: String,
    pub lines: Vec<String>,
}

/// Runs reporting passes over an old and a new snapshot, consulting the
/// compiled filter once per candidate type.
pub struct DiffEngine<'a> {
    old: &'a Snapshot,
    new: &'a Snapshot,
    filter: &'a FilterExpr,
}

impl<'a> DiffEngine<'a> {
    pub fn new(old: &'a Snapshot, new: &'a Snapshot, filter: &'a FilterExpr) -> DiffEngine<'a> {
        DiffEngine { old, new, filter }
    }

    /// Run one pass and collect its report.
    pub fn run(&self, pass: ReportPass) -> PassReport {
        let lines = match pass {
            ReportPass::DiffKinds => self.diff_kinds(),
            ReportPass::DiffTypes => self.diff_types(),
            ReportPass::MovedTypesSummary => self.moved_types_summary(),
            ReportPass::MovedTypes => self.moved_types(),
            ReportPass::AllTypes => self.all_types(),
        };
        PassReport {
            pass,
            title: pass.title().to_string(),
            lines,
        }
    }

    fn matches(&self, type_name: &str) -> bool {
        self.filter
            .matches(self.old.kind_of(type_name), self.new.kind_of(type_name), type_name)
    }

    /// Kinds present in exactly one snapshot, with the number of types each
    /// classifies. The filter does not apply: kinds have no per-type diff
    /// state to filter on.
    fn diff_kinds(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for kind in self.new.kinds() {
            if !self.old.contains_kind(kind) {
                lines.push(format!(
                    "  Added kind {}. ({} values)",
                    kind,
                    self.new.kind_population(kind)
                ));
            }
        }
        for kind in self.old.kinds() {
            if !self.new.contains_kind(kind) {
                lines.push(format!(
                    "  Removed kind {}. ({} values)",
                    kind,
                    self.old.kind_population(kind)
                ));
            }
        }
        lines
    }

    /// Types present in exactly one snapshot, with the present side's kind.
    fn diff_types(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (type_name, kind) in self.new.entries() {
            if !self.old.contains_type(type_name) && self.matches(type_name) {
                lines.push(format!("  Added type {}: {}", type_name, kind));
            }
        }
        for (type_name, kind) in self.old.entries() {
            if !self.new.contains_type(type_name) && self.matches(type_name) {
                lines.push(format!("  Removed type {}: {}", type_name, kind));
            }
        }
        lines
    }

    /// Types present in both snapshots, grouped and sorted by their
    /// (old kind, new kind) pair. Ends with a blank separator line.
    fn moved_types_summary(&self) -> Vec<String> {
        let mut moves: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        for (type_name, old_kind) in self.old.entries() {
            let Some(new_kind) = self.new.kind_of(type_name) else {
                continue;
            };
            if self.matches(type_name) {
                *moves.entry((old_kind, new_kind)).or_insert(0) += 1;
            }
        }

        let mut lines = Vec::new();
        for ((old_kind, new_kind), count) in moves {
            if old_kind == new_kind {
                lines.push(format!("  Stay at {}: {} types", old_kind, count));
            } else {
                lines.push(format!("  Move from {} -> {}: {} types", old_kind, new_kind, count));
            }
        }
        lines.push(String::new());
        lines
    }

    /// Types present in both snapshots whose kind changed, one per line.
    fn moved_types(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (type_name, old_kind) in self.old.entries() {
            let Some(new_kind) = self.new.kind_of(type_name) else {
                continue;
            };
            if self.matches(type_name) && old_kind != new_kind {
                lines.push(format!("  Move from {} -> {}: {}", old_kind, new_kind, type_name));
            }
        }
        lines
    }

    /// Every matching type in the new snapshot with its kind, then the
    /// match count.
    fn all_types(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut matched = 0usize;
        for (type_name, kind) in self.new.entries() {
            if self.matches(type_name) {
                matched += 1;
                lines.push(format!("  {}: {}", type_name, kind));
            }
        }
        lines.push(format!("{} types matched", matched));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::compile;
    use crate::snapshot::parse_snapshot;
    use pretty_assertions::assert_eq;

    fn snapshot(text: &str) -> Snapshot {
        parse_snapshot(text, "test").unwrap()
    }

    fn run(old: &Snapshot, new: &Snapshot, filter: &str, pass: ReportPass) -> PassReport {
        let filter = compile(filter).unwrap();
        DiffEngine::new(old, new, &filter).run(pass)
    }

    #[test]
    fn kind_diff_reports_added_and_removed_kinds_with_counts() {
        let old = snapshot("Foo; Bar;\nBaz; Bar;\n");
        let new = snapshot("Foo; Qux;\nQuux; Bar;\n");

        let report = run(&old, &new, "", ReportPass::DiffKinds);
        assert_eq!(report.title, "Difference of kinds:");
        // Bar survives via Quux, so only Qux is new.
        assert_eq!(report.lines, vec!["  Added kind Qux. (1 values)"]);
    }

    #[test]
    fn kind_diff_reports_removed_kinds_from_the_old_side() {
        let old = snapshot("A; gone;\nB; gone;\nC; kept;\n");
        let new = snapshot("C; kept;\n");

        let report = run(&old, &new, "", ReportPass::DiffKinds);
        assert_eq!(report.lines, vec!["  Removed kind gone. (2 values)"]);
    }

    #[test]
    fn kind_diff_ignores_the_filter() {
        let old = snapshot("A; gone;\n");
        let new = snapshot("B; fresh;\n");

        // A filter matching no type at all must not suppress kind lines.
        let report = run(&old, &new, "type.is:nothing", ReportPass::DiffKinds);
        assert_eq!(
            report.lines,
            vec![
                "  Added kind fresh. (1 values)",
                "  Removed kind gone. (1 values)",
            ]
        );
    }

    #[test]
    fn type_diff_reports_added_and_removed_types() {
        let old = snapshot("Foo; Bar;\nBaz; Bar;\n");
        let new = snapshot("Foo; Qux;\nQuux; Bar;\n");

        let report = run(&old, &new, "", ReportPass::DiffTypes);
        assert_eq!(report.title, "Difference of types:");
        assert_eq!(
            report.lines,
            vec!["  Added type Quux: Bar", "  Removed type Baz: Bar"]
        );
    }

    #[test]
    fn type_diff_applies_the_filter_per_type() {
        let old = snapshot("Baz; Bar;\nstd::old_thing; Bar;\n");
        let new = snapshot("Quux; Bar;\nstd::vector<int>; Bar;\n");

        let report = run(&old, &new, "type.is_stl", ReportPass::DiffTypes);
        assert_eq!(
            report.lines,
            vec![
                "  Added type std::vector<int>: Bar",
                "  Removed type std::old_thing: Bar",
            ]
        );

        let added_only = run(&old, &new, "type.is_added", ReportPass::DiffTypes);
        assert_eq!(
            added_only.lines,
            vec!["  Added type Quux: Bar", "  Added type std::vector<int>: Bar"]
        );
    }

    #[test]
    fn moved_summary_groups_by_kind_pair_and_ends_with_a_separator() {
        let old = snapshot("A; x;\nB; x;\nC; x;\nD; y;\n");
        let new = snapshot("A; y;\nB; y;\nC; x;\nD; y;\n");

        let report = run(&old, &new, "", ReportPass::MovedTypesSummary);
        assert_eq!(report.title, "Moved types summary:");
        assert_eq!(
            report.lines,
            vec![
                "  Stay at x: 1 types",
                "  Move from x -> y: 2 types",
                "  Stay at y: 1 types",
                "",
            ]
        );
    }

    #[test]
    fn moved_summary_skips_types_absent_from_either_side() {
        let old = snapshot("OnlyOld; x;\nShared; x;\n");
        let new = snapshot("OnlyNew; x;\nShared; y;\n");

        let report = run(&old, &new, "", ReportPass::MovedTypesSummary);
        assert_eq!(report.lines, vec!["  Move from x -> y: 1 types", ""]);
    }

    #[test]
    fn moved_detail_lists_each_type_whose_kind_changed() {
        let old = snapshot("Foo; Bar;\nBaz; Bar;\n");
        let new = snapshot("Foo; Qux;\nQuux; Bar;\n");

        let report = run(&old, &new, "", ReportPass::MovedTypes);
        assert_eq!(report.title, "Moved types:");
        assert_eq!(report.lines, vec!["  Move from Bar -> Qux: Foo"]);
    }

    #[test]
    fn moved_detail_respects_the_filter() {
        let old = snapshot("Foo; Bar;\nstd::string; Bar;\n");
        let new = snapshot("Foo; Qux;\nstd::string; Qux;\n");

        let report = run(&old, &new, "!type.is_stl", ReportPass::MovedTypes);
        assert_eq!(report.lines, vec!["  Move from Bar -> Qux: Foo"]);
    }

    #[test]
    fn all_types_walks_the_new_snapshot_and_counts_matches() {
        let old = snapshot("Foo; Bar;\nBaz; Bar;\n");
        let new = snapshot("Foo; Qux;\nQuux; Bar;\n");

        let report = run(&old, &new, "", ReportPass::AllTypes);
        assert_eq!(report.title, "All types:");
        assert_eq!(
            report.lines,
            vec!["  Foo: Qux", "  Quux: Bar", "2 types matched"]
        );
    }

    #[test]
    fn all_types_count_reflects_the_filter() {
        let old = snapshot("");
        let new = snapshot("Foo; a;\nBar; a;\nBaz; b;\n");

        let report = run(&old, &new, "kind.new.is:a", ReportPass::AllTypes);
        assert_eq!(
            report.lines,
            vec!["  Bar: a", "  Foo: a", "2 types matched"]
        );
    }

    #[test]
    fn diff_and_moved_passes_partition_the_type_universe() {
        let old = snapshot("OnlyOld; x;\nStays; x;\nMoves; x;\n");
        let new = snapshot("OnlyNew; y;\nStays; x;\nMoves; y;\n");

        let filter = compile("").unwrap();
        let engine = DiffEngine::new(&old, &new, &filter);

        let type_diff = engine.run(ReportPass::DiffTypes).lines.len();
        // Summary line count minus the separator equals the kind-pair count;
        // the pair population covers every shared type.
        let summary = engine.run(ReportPass::MovedTypesSummary);
        assert_eq!(summary.lines.last(), Some(&String::new()));
        assert_eq!(type_diff, 2); // OnlyNew added, OnlyOld removed
        assert_eq!(
            summary.lines,
            vec![
                "  Stay at x: 1 types",
                "  Move from x -> y: 1 types",
                "",
            ]
        );
    }

    #[test]
    fn added_stl_filter_matches_only_new_std_types() {
        let old = snapshot("std::old; a;\nKept; a;\n");
        let new = snapshot("std::vector<int>; a;\nstd::old; a;\nKept; a;\nFresh; a;\n");

        let report = run(&old, &new, "type.is_added & type.is_stl", ReportPass::AllTypes);
        assert_eq!(report.lines, vec!["  std::vector<int>: a", "1 types matched"]);
    }

    #[test]
    fn run_covers_every_pass_with_its_title() {
        let old = snapshot("Foo; Bar;\n");
        let new = snapshot("Foo; Bar;\n");
        let filter = compile("").unwrap();
        let engine = DiffEngine::new(&old, &new, &filter);

        let titles: Vec<String> = ReportPass::ALL
            .iter()
            .map(|&pass| engine.run(pass).title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Difference of kinds:",
                "Difference of types:",
                "Moved types summary:",
                "Moved types:",
                "All types:",
            ]
        );
    }
}
