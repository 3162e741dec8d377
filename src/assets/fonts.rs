use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

/// Font loading options.
///
/// No face ships with the crate: the default family must come from `dirs` or the host. With
/// neither, text layers are omitted from renders and reported as issues.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontOpts {
    /// Directories scanned (non-recursively) for `.ttf`, `.otf` and `.ttc` files.
    pub dirs: Vec<PathBuf>,
    /// Also load the fonts installed on the host.
    pub system_fonts: bool,
    /// Family tried when a requested family cannot be found.
    pub default_family: String,
}

impl Default for FontOpts {
    fn default() -> Self {
        Self {
            dirs: vec![PathBuf::from("assets/fonts")],
            system_fonts: true,
            default_family: "Montserrat".to_owned(),
        }
    }
}

/// A face picked for a requested family.
#[derive(Clone, Debug)]
pub struct ResolvedFace {
    /// Raw font file bytes (shared).
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection file.
    pub index: u32,
    /// Content hash of the face (bytes and index), computed once per loaded face.
    pub key: u64,
    /// Family name as requested by the layer.
    pub requested: String,
    /// Family name of the face actually used.
    pub resolved: String,
    /// Whether `resolved` differs from `requested`.
    pub fell_back: bool,
}

/// Font faces available to the text renderer, backed by a `fontdb` database.
///
/// Family lookup is case-insensitive and also matches PostScript names and font file stems
/// (`Montserrat-ExtraBold`). Unknown families fall back to the configured default family, then
/// to any sans-serif face, then to the first loaded face.
pub struct FontLibrary {
    db: usvg::fontdb::Database,
    default_family: String,
    bytes_cache: RwLock<HashMap<usvg::fontdb::ID, (Arc<Vec<u8>>, u64)>>,
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("faces", &self.db.len())
            .field("default_family", &self.default_family)
            .finish()
    }
}

impl FontLibrary {
    /// Build the library from `opts`.
    #[tracing::instrument(skip(opts))]
    pub fn load(opts: &FontOpts) -> Self {
        let mut db = usvg::fontdb::Database::new();
        if opts.system_fonts {
            db.load_system_fonts();
        }
        for dir in &opts.dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "font library loaded");
        Self::from_database(db, opts.default_family.clone())
    }

    /// Library with no faces; every text layer resolves to nothing.
    pub fn empty() -> Self {
        Self::from_database(usvg::fontdb::Database::new(), String::new())
    }

    fn from_database(db: usvg::fontdb::Database, default_family: String) -> Self {
        Self {
            db,
            default_family,
            bytes_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Add a font from memory.
    pub fn add_font_data(&mut self, bytes: Vec<u8>) {
        self.db.load_font_data(bytes);
    }

    /// Number of loaded faces.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Whether no faces are loaded.
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Every distinct family name, sorted.
    pub fn families(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .db
            .faces()
            .filter_map(|f| f.families.first().map(|(name, _)| name.clone()))
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Pick a face for `family`. `None` only when the library holds no usable face.
    pub fn resolve(&self, family: &str) -> Option<ResolvedFace> {
        let (id, exact) = match self.find_family(family) {
            Some(id) => (id, true),
            None => (self.fallback_face()?, false),
        };
        let face = self.db.face(id)?;
        let resolved = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| face.post_script_name.clone());
        let index = face.index;
        let (bytes, key) = self.face_bytes(id, index)?;
        Some(ResolvedFace {
            bytes,
            index,
            key,
            requested: family.to_owned(),
            fell_back: !exact,
            resolved,
        })
    }

    fn find_family(&self, family: &str) -> Option<usvg::fontdb::ID> {
        let wanted = family.trim();
        if wanted.is_empty() {
            return None;
        }
        let by_name = self.db.faces().find(|f| {
            f.families
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(wanted))
                || f.post_script_name.eq_ignore_ascii_case(wanted)
        });
        if let Some(face) = by_name {
            return Some(face.id);
        }

        let stem = Path::new(wanted)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(wanted);
        self.db
            .faces()
            .find(|f| match &f.source {
                usvg::fontdb::Source::File(path) | usvg::fontdb::Source::SharedFile(path, _) => {
                    path.file_stem()
                        .and_then(|s| s.to_str())
                        .is_some_and(|s| s.eq_ignore_ascii_case(stem))
                }
                usvg::fontdb::Source::Binary(_) => false,
            })
            .map(|f| f.id)
    }

    fn fallback_face(&self) -> Option<usvg::fontdb::ID> {
        if let Some(id) = self.find_family(&self.default_family) {
            return Some(id);
        }
        let families = [
            usvg::fontdb::Family::SansSerif,
            usvg::fontdb::Family::Serif,
            usvg::fontdb::Family::Monospace,
        ];
        let query = usvg::fontdb::Query {
            families: &families,
            weight: usvg::fontdb::Weight::NORMAL,
            stretch: usvg::fontdb::Stretch::Normal,
            style: usvg::fontdb::Style::Normal,
        };
        if let Some(id) = self.db.query(&query) {
            return Some(id);
        }
        self.db.faces().next().map(|f| f.id)
    }

    fn face_bytes(&self, id: usvg::fontdb::ID, index: u32) -> Option<(Arc<Vec<u8>>, u64)> {
        if let Ok(cache) = self.bytes_cache.read()
            && let Some((bytes, key)) = cache.get(&id)
        {
            return Some((Arc::clone(bytes), *key));
        }
        let bytes = Arc::new(self.db.with_face_data(id, |data, _| data.to_vec())?);
        let key = xxhash_rust::xxh3::xxh3_64(&bytes) ^ u64::from(index);
        if let Ok(mut cache) = self.bytes_cache.write() {
            cache.insert(id, (Arc::clone(&bytes), key));
        }
        Some((bytes, key))
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::debug!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
