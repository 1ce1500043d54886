use super::{record_row, ReportTableRenderer, LOG_PERMUTATIONS};
use crate::{config::PackageEntry, record::ReportRecord};
use std::{fs, path::Path};

const HEADER: &str = "| `hash` | `perm` | `time` | `throughput` | `proof_size` | `peak_mem` |";
const SEPARATOR: &str = "| - | - | - | - | - | - |";
const BLANK_ROW: &str = "| | | | | | |";

fn write_report(root: &Path, package: &str, name: &str, contents: &str) {
    let dir = root.join(package).join("report");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), contents).unwrap();
}

fn placeholder_row(hash: &str, log_permutations: u32) -> String {
    format!("| `{hash}` | <code>2<sup>{log_permutations}</sup></code> | `-` | `-` | `-` | `-` |")
}

#[test]
pub fn row_format() {
    let record = ReportRecord {
        time: "1.23s".to_string(),
        throughput: "831.50/s".to_string(),
        proof_size: "512.00KB".to_string(),
        peak_mem: "1.20GB".to_string(),
    };

    assert_eq!(
        record_row("keccak", 12, &record),
        "| `keccak` | <code>2<sup>12</sup></code> | `1.23s` | `831.50/s` | `512.00KB` | `1.20GB` |"
    );
    assert_eq!(
        record_row("keccak", 20, &ReportRecord::placeholder()),
        placeholder_row("keccak", 20)
    );
}

#[test]
pub fn single_hash_without_reports() {
    let dir = tempfile::tempdir().unwrap();
    let renderer =
        ReportTableRenderer::new(vec![PackageEntry::new("binius", ["keccak"])]).with_root(dir.path());

    let mut expected = vec![
        String::new(),
        "<!-- binius -->".to_string(),
        String::new(),
        HEADER.to_string(),
        SEPARATOR.to_string(),
    ];
    expected.extend(LOG_PERMUTATIONS.map(|lp| placeholder_row("keccak", lp)));
    expected.push(String::new());

    assert_eq!(renderer.render("4"), expected);
}

#[test]
pub fn eleven_rows_per_hash() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = ReportTableRenderer::new(vec![PackageEntry::new(
        "plonky3",
        ["blake3", "keccak", "poseidon2"],
    )])
    .with_root(dir.path());

    let lines = renderer.render("4");

    for hash in ["blake3", "keccak", "poseidon2"] {
        let prefix = format!("| `{hash}` |");
        assert_eq!(
            lines.iter().filter(|line| line.starts_with(&prefix)).count(),
            11
        );
    }
}

#[test]
pub fn blank_rows_only_between_hashes() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = ReportTableRenderer::new(vec![PackageEntry::new(
        "plonky3",
        ["blake3", "keccak", "poseidon2"],
    )])
    .with_root(dir.path());

    let lines = renderer.render("4");
    let blank_rows = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| *line == BLANK_ROW)
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>();

    // leading blank, comment, blank, header, separator, then 11 rows per hash
    assert_eq!(blank_rows, vec![5 + 11, 5 + 11 + 1 + 11]);
    assert_eq!(lines[4], SEPARATOR);
    assert_eq!(lines[lines.len() - 2], placeholder_row("poseidon2", 20));
    assert_eq!(lines[lines.len() - 1], "");
}

#[test]
pub fn reads_reports_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    write_report(
        dir.path(),
        "stwo",
        "t8_blake2s_lp15",
        "Time: 2.50s\nThroughput: 13.11K/s\nProof size: 96.00KB\nPeak mem: 2.31GB\n",
    );
    // written for another thread count, must not be picked up
    write_report(
        dir.path(),
        "stwo",
        "t4_blake2s_lp16",
        "Time: 9s\nThroughput: 1/s\nProof size: 1\nPeak mem: 1\n",
    );

    let renderer =
        ReportTableRenderer::new(vec![PackageEntry::new("stwo", ["blake2s"])]).with_root(dir.path());
    let lines = renderer.render("8");

    for (lp, line) in LOG_PERMUTATIONS.zip(lines[5..16].iter()) {
        if lp == 15 {
            assert_eq!(
                line,
                "| `blake2s` | <code>2<sup>15</sup></code> | `2.50s` | `13.11K/s` | `96.00KB` | `2.31GB` |"
            );
        } else {
            assert_eq!(*line, placeholder_row("blake2s", lp));
        }
    }
}

#[test]
pub fn strictness_decides_on_extended_reports() {
    let dir = tempfile::tempdir().unwrap();
    write_report(
        dir.path(),
        "binius",
        "t4_groestl_lp10",
        "Time: 1s\nThroughput: 2/s\nProof size: 3KB\nPeak mem: 4MB\nNote: partial\n",
    );

    let catalog = vec![PackageEntry::new("binius", ["groestl"])];
    let lenient = ReportTableRenderer::new(catalog.clone()).with_root(dir.path());
    let strict = lenient.clone().strict_line_count(true);

    assert_eq!(
        lenient.render("4")[5],
        "| `groestl` | <code>2<sup>10</sup></code> | `1s` | `2/s` | `3KB` | `4MB` |"
    );
    assert_eq!(strict.render("4")[5], placeholder_row("groestl", 10));
}

#[test]
pub fn truncated_report_is_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    write_report(
        dir.path(),
        "binius",
        "t4_keccak_lp11",
        "Time: 1s\nThroughput: 2/s\n",
    );

    for strict in [false, true] {
        let renderer = ReportTableRenderer::new(vec![PackageEntry::new("binius", ["keccak"])])
            .with_root(dir.path())
            .strict_line_count(strict);

        assert_eq!(renderer.render("4")[6], placeholder_row("keccak", 11));
    }
}

#[test]
pub fn packages_in_catalog_order() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = ReportTableRenderer::new(vec![
        PackageEntry::new("stwo", ["poseidon2"]),
        PackageEntry::new("binius", ["keccak"]),
    ])
    .with_root(dir.path());

    let lines = renderer.render("4");
    let comments = lines
        .iter()
        .filter(|line| line.starts_with("<!--"))
        .cloned()
        .collect::<Vec<_>>();

    assert_eq!(comments, vec!["<!-- stwo -->", "<!-- binius -->"]);
    // each block: comment, blank, header, separator, 11 rows, blank
    assert_eq!(lines.len(), 1 + 2 * (4 + 11 + 1));
    assert_eq!(lines[1 + 16], "<!-- binius -->");
    assert_eq!(lines[16], "");
}

#[test]
pub fn package_without_hashes_renders_header() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = ReportTableRenderer::new(vec![PackageEntry::new("hashcaster", Vec::<String>::new())])
        .with_root(dir.path());

    assert_eq!(
        renderer.render("4"),
        vec![
            String::new(),
            "<!-- hashcaster -->".to_string(),
            String::new(),
            HEADER.to_string(),
            SEPARATOR.to_string(),
            String::new(),
        ]
    );
}

#[test]
pub fn empty_catalog_renders_leading_blank_line() {
    assert_eq!(ReportTableRenderer::new(Vec::new()).render("4"), vec![String::new()]);
}

#[test]
pub fn dash_values_are_rendered_as_read() {
    let dir = tempfile::tempdir().unwrap();
    write_report(
        dir.path(),
        "binius",
        "t4_keccak_lp10",
        "Time: -\nThroughput: -\nProof size: -\nPeak mem: -\n",
    );
    write_report(
        dir.path(),
        "binius",
        "t4_keccak_lp11",
        "Time: -\nThroughput: -\nProof size: 1KB\nPeak mem: -\n",
    );

    let renderer = ReportTableRenderer::new(vec![PackageEntry::new("binius", ["keccak"])])
        .with_root(dir.path())
        .strict_line_count(true);
    let lines = renderer.render("4");

    assert_eq!(lines[5], placeholder_row("keccak", 10));
    assert_eq!(
        lines[6],
        "| `keccak` | <code>2<sup>11</sup></code> | `-` | `-` | `1KB` | `-` |"
    );
}
