use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::Error;

/// A font file that parsed successfully and is ready to embed.
pub(crate) struct FontSource {
    pub(crate) path: PathBuf,
    pub(crate) data: Vec<u8>,
    pub(crate) face_index: u32,
}

pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    pub(crate) char_to_gid: HashMap<char, u16>,
    pub(crate) char_widths_1000: HashMap<char, f32>,
    pub(crate) ascender_ratio: f32,
    pub(crate) descender_ratio: f32,
}

impl FontEntry {
    /// Advance width of `text` in points. Characters without a glyph count as zero.
    pub(crate) fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_widths_1000.get(&ch).copied().unwrap_or(0.0) * font_size / 1000.0)
            .sum()
    }
}

fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    // 1. User-configured directories via ODAI_FONTS env var
    if let Ok(val) = std::env::var("ODAI_FONTS") {
        let sep = if cfg!(windows) { ';' } else { ':' };
        for part in val.split(sep) {
            let trimmed = part.trim();
            if !trimmed.is_empty() {
                dirs.push(PathBuf::from(trimmed));
            }
        }
    }

    // 2. Platform-specific system font directories
    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

/// Walk the font directories looking for a file called exactly `file_name`.
fn search_font_dirs(file_name: &str) -> Option<PathBuf> {
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut stack: Vec<PathBuf> = font_directories();
    stack.reverse();
    while let Some(dir) = stack.pop() {
        if !visited.insert(dir.clone()) {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        let mut subdirs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                subdirs.push(path);
            } else if path.file_name().and_then(|n| n.to_str()) == Some(file_name) {
                return Some(path);
            }
        }
        stack.extend(subdirs);
    }
    None
}

fn is_font_collection(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc"))
}

/// Resolve the requested font. A path that exists is used as-is; a bare file
/// name that does not exist in the working directory is looked up in the font
/// directories.
pub(crate) fn resolve_font_path(requested: &Path) -> Result<PathBuf, Error> {
    if requested.is_file() {
        return Ok(requested.to_path_buf());
    }
    let bare = requested.parent().is_none_or(|p| p.as_os_str().is_empty());
    if bare
        && let Some(name) = requested.to_str()
        && let Some(found) = search_font_dirs(name)
    {
        log::debug!("Font {} resolved to {}", name, found.display());
        return Ok(found);
    }
    Err(Error::FontNotFound(requested.to_path_buf()))
}

/// Find, read and parse the font. Any failure here happens before a single
/// page is laid out.
pub(crate) fn load_font(requested: &Path) -> Result<FontSource, Error> {
    let path = resolve_font_path(requested)?;
    let data = std::fs::read(&path).map_err(|source| Error::FontUnreadable {
        path: path.clone(),
        source,
    })?;
    if is_font_collection(&path) {
        log::debug!(
            "{} is a collection of {} faces, using the first",
            path.display(),
            ttf_parser::fonts_in_collection(&data).unwrap_or(1),
        );
    }
    let face_index = 0;
    Face::parse(&data, face_index).map_err(|e| Error::FontInvalid {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    Ok(FontSource {
        path,
        data,
        face_index,
    })
}

fn postscript_name(face: &Face) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
        .find_map(|name| name.to_string())
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

/// Embed the font as a CIDFont (Type0 composite) with Identity-H encoding,
/// subsetted to the characters in `used_chars`.
pub(crate) fn register_font(
    pdf: &mut Pdf,
    font: &FontSource,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &HashSet<char>,
) -> Result<FontEntry, Error> {
    let t0 = std::time::Instant::now();
    let face = Face::parse(&font.data, font.face_index).map_err(|e| Error::FontInvalid {
        path: font.path.clone(),
        reason: e.to_string(),
    })?;

    let font_ref = alloc();
    let descriptor_ref = alloc();
    let data_ref = alloc();

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    let mut chars: Vec<char> = used_chars.iter().copied().collect();
    chars.sort_unstable();

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut original_gids = HashMap::new();
    let mut remapped_gids = HashMap::new();
    let mut char_widths_1000 = HashMap::new();
    let mut missing = Vec::new();
    for ch in chars {
        let Some(gid) = face.glyph_index(ch) else {
            missing.push(ch);
            continue;
        };
        original_gids.insert(ch, gid.0);
        remapped_gids.insert(ch, remapper.remap(gid.0));
        let w = face
            .glyph_hor_advance(gid)
            .map(|adv| adv as f32 / units * 1000.0)
            .unwrap_or(0.0);
        char_widths_1000.insert(ch, w);
    }
    if !missing.is_empty() {
        let list: String = missing.iter().collect();
        log::warn!(
            "{} has no glyph for {} character(s): {list}",
            font.path.display(),
            missing.len(),
        );
    }

    let (font_data, char_to_gid) =
        match subsetter::subset(&font.data, font.face_index, &remapper) {
            Ok(data) => (data, remapped_gids),
            Err(e) => {
                log::warn!(
                    "Font subsetting failed for {}: {e}; embedding the full font",
                    font.path.display()
                );
                (font.data.clone(), original_gids)
            }
        };

    let data_len = i32::try_from(font_data.len()).map_err(|_| Error::FontInvalid {
        path: font.path.clone(),
        reason: "font program too large to embed".to_string(),
    })?;
    pdf.stream(data_ref, &font_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = postscript_name(&face)
        .or_else(|| {
            font.path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "CardFont".to_string())
        .replace(' ', "");

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        let mut gid_widths: Vec<(u16, f32)> = char_to_gid
            .iter()
            .map(|(ch, &gid)| (gid, char_widths_1000.get(ch).copied().unwrap_or(0.0)))
            .collect();
        gid_widths.sort_by_key(|&(gid, _)| gid);
        gid_widths.dedup_by_key(|&mut (gid, _)| gid);
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    for (&ch, &gid) in &char_to_gid {
        cmap.pair(gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    log::debug!(
        "register_font: {} ({} glyphs, {} bytes) → {:.1}ms",
        ps_name,
        char_to_gid.len(),
        font_data.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(FontEntry {
        pdf_name,
        font_ref,
        char_to_gid,
        char_widths_1000,
        ascender_ratio: face.ascender() as f32 / units,
        descender_ratio: face.descender() as f32 / units,
    })
}
