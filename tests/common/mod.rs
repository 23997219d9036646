#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Output directory: tests/output/<case>/, created fresh.
pub fn output_dir(case: &str) -> PathBuf {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = PathBuf::from("tests/output").join(case);
    fs::remove_dir_all(&dir).ok();
    fs::create_dir_all(&dir).expect("create test output dir");
    dir
}

/// Write a markdown planning note holding `topics` in an `ODAI_LIST` block.
pub fn write_note(dir: &Path, topics: &[&str]) -> PathBuf {
    let items: Vec<String> = topics.iter().map(|t| format!("    \"{t}\",")).collect();
    let body = format!(
        "# Card game plan\n\nRules go here.\n\n```python\nODAI_LIST = [\n{}\n]\n```\n",
        items.join("\n")
    );
    let path = dir.join("plan.md");
    fs::write(&path, body).expect("write note");
    path
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("C:\\Windows\\Fonts"),
    ];
    if let Ok(home) = std::env::var("HOME") {
        dirs.push(PathBuf::from(home).join(".local/share/fonts"));
    }
    dirs
}

fn usable_font(path: &Path) -> bool {
    let Ok(data) = fs::read(path) else {
        return false;
    };
    let Ok(face) = ttf_parser::Face::parse(&data, 0) else {
        return false;
    };
    "Topic 123".chars().all(|c| c == ' ' || face.glyph_index(c).is_some())
}

/// A TrueType/OpenType font with Latin glyphs. `ODAI_TEST_FONT` wins,
/// otherwise the system font directories are scanned.
pub fn find_test_font() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("ODAI_TEST_FONT") {
        return Some(PathBuf::from(p));
    }
    let mut stack = font_dirs();
    let mut candidates = Vec::new();
    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if matches!(
                path.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase())
                    .as_deref(),
                Some("ttf" | "otf")
            ) {
                candidates.push(path);
            }
        }
    }
    candidates.sort();
    candidates.into_iter().find(|p| usable_font(p))
}

/// Number of page objects in a PDF produced by this crate.
pub fn count_pages(pdf: &[u8]) -> usize {
    let needle = b"/Type /Page";
    pdf.windows(needle.len() + 1)
        .filter(|w| &w[..needle.len()] == needle && w[needle.len()] != b's')
        .count()
}

/// Value of the page tree's `/Count` entry.
pub fn page_tree_count(pdf: &[u8]) -> Option<usize> {
    let text = String::from_utf8_lossy(pdf);
    let start = text.find("/Count ")? + "/Count ".len();
    let digits: String = text[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Width and height of the first `/MediaBox` in the file.
pub fn first_mediabox(pdf: &[u8]) -> Option<(f32, f32)> {
    let text = String::from_utf8_lossy(pdf);
    let start = text.find("/MediaBox [")? + "/MediaBox [".len();
    let end = start + text[start..].find(']')?;
    let nums: Vec<f32> = text[start..end]
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    if nums.len() == 4 {
        Some((nums[2] - nums[0], nums[3] - nums[1]))
    } else {
        None
    }
}
