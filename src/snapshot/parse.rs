use crate::snapshot::record::{Snapshot, SymbolRecord};
use anyhow::{Context, bail};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Canonical spelling substituted for every versioned namespace alias.
pub const CANONICAL_NAMESPACE: &str = "PXR_NS";

/// Versioned spellings of the internal namespace. Catalogs taken against
/// different library revisions disagree on these, so every occurrence is
/// rewritten to [`CANONICAL_NAMESPACE`] while loading.
const NAMESPACE_ALIASES: [&str; 4] = [
    "pxrInternal_v0_24__pxrReserved__",
    "pxrInternal_v0_24_11__pxrReserved__",
    "pxrInternal_v0_25_2__pxrReserved__",
    "pxrInternal_v0_25_5__pxrReserved__",
];

/// Parse catalog text into a snapshot.
///
/// Expected line shape:
///
/// class PXR_NS::UsdStage; importedAsValue;
///
/// The type runs up to the first `"; "` and the kind up to the trailing
/// `;`, so kinds may themselves contain the separator. Catalog writers
/// emit nothing else, which makes every non-matching line fatal; `origin`
/// names the input in those errors.
pub fn parse_snapshot(text: &str, origin: &str) -> anyhow::Result<Snapshot> {
    let line_re = Regex::new(r"^(.*?); (.+);$")?;
    let alias_re = Regex::new(&NAMESPACE_ALIASES.join("|"))?;

    let mut records = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;

        let caps = match line_re.captures(line) {
            Some(c) => c,
            None => {
                bail!(
                    "catalog parse error at {}:{}: cannot parse line: {:?}",
                    origin,
                    lno,
                    line
                );
            }
        };

        records.push(SymbolRecord {
            type_name: normalize_namespace(&alias_re, caps.get(1).unwrap().as_str()),
            kind_name: normalize_namespace(&alias_re, caps.get(2).unwrap().as_str()),
        });
    }

    Ok(Snapshot::from_records(records))
}

/// Read and parse one catalog file.
pub fn load_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read catalog file {}", path.display()))?;
    parse_snapshot(&text, &path.display().to_string())
}

fn normalize_namespace(alias_re: &Regex, value: &str) -> String {
    alias_re.replace_all(value, CANONICAL_NAMESPACE).into_owned()
}
