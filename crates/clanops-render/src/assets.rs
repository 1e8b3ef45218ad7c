//! Operator portrait lookup.
//!
//! Candidate generation is pure ([`candidate_file_names`]); touching the
//! filesystem is confined to [`probe`] behind the [`FileProbe`] trait.

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::{Path, PathBuf},
    sync::RwLock,
};
use tracing::{debug, trace};

const BUNDLED_ALIASES: &str = include_str!("../assets/operator_aliases.json");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Probed in order; relative paths resolve against the working directory.
    pub search_dirs: Vec<PathBuf>,
    /// Extra alias entries, applied over the bundled table.
    pub aliases: BTreeMap<String, String>,
    pub use_bundled_aliases: bool,
    /// Without a leading dot, e.g. `png` or `png.jpeg`.
    pub extensions: Vec<String>,
    pub cache: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            search_dirs: [
                "images/operators",
                "image/operators",
                "assets/images/operators",
                "assets/image/operators",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
            aliases: BTreeMap::new(),
            use_bundled_aliases: true,
            extensions: ["png", "jpeg", "jpg", "png.jpeg", "png.jpg"]
                .into_iter()
                .map(String::from)
                .collect(),
            cache: true,
        }
    }
}

/// Lowercased, then reduced to `[a-z0-9]`.
pub fn canonical_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

fn loose_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Alias lookup keyed both by the literal (lowercased) alias and by its
/// canonical form. Literal entries win over derived canonical ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    pub fn from_entries<'a, I>(raw: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)> + Clone,
    {
        let mut entries = HashMap::new();
        for (alias, file) in raw.clone() {
            entries.insert(loose_key(alias), file.clone());
        }
        for (alias, file) in raw {
            let key = canonical_key(alias);
            if !key.is_empty() {
                entries.entry(key).or_insert_with(|| file.clone());
            }
        }
        Self { entries }
    }

    pub fn bundled() -> Self {
        Self::from_entries(&bundled_aliases())
    }

    pub fn from_config(config: &AssetConfig) -> Self {
        let mut raw = if config.use_bundled_aliases {
            bundled_aliases()
        } else {
            BTreeMap::new()
        };
        raw.extend(config.aliases.clone());
        Self::from_entries(&raw)
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&canonical_key(name))
            .or_else(|| self.entries.get(&loose_key(name)))
            .map(String::as_str)
    }
}

fn bundled_aliases() -> BTreeMap<String, String> {
    // The bundled table is compiled in; a broken file is caught by the tests below.
    serde_json::from_str(BUNDLED_ALIASES).unwrap_or_default()
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && !name.starts_with("..")
}

/// Ordered file names to try for `name`: the alias target verbatim, then the
/// canonical key with each extension, then the raw name with each extension.
pub fn candidate_file_names(name: &str, aliases: &AliasTable, extensions: &[String]) -> Vec<String> {
    let mut out: Vec<String> = vec![];
    let mut push = |candidate: String| {
        if is_plain_file_name(&candidate) && !out.contains(&candidate) {
            out.push(candidate);
        }
    };

    if let Some(file) = aliases.lookup(name) {
        push(file.to_string());
    }
    let key = canonical_key(name);
    if !key.is_empty() {
        for ext in extensions {
            push(format!("{key}.{ext}"));
        }
    }
    if !name.is_empty() {
        for ext in extensions {
            push(format!("{name}.{ext}"));
        }
    }
    out
}

pub trait FileProbe {
    fn is_file(&self, path: &Path) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

impl FileProbe for HashSet<PathBuf> {
    fn is_file(&self, path: &Path) -> bool {
        self.contains(path)
    }
}

/// First existing `dir/candidate`, directories outermost.
pub fn probe<P: FileProbe + ?Sized>(dirs: &[PathBuf], candidates: &[String], probe: &P) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| candidates.iter().map(move |file| dir.join(file)))
        .find(|path| {
            let hit = probe.is_file(path);
            trace!(path = %path.display(), hit, "probed portrait candidate");
            hit
        })
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum AssetResolution {
    Found(PathBuf),
    NotFound,
}

impl AssetResolution {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(path),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Resolves operator names to portrait files. Configuration is fixed at
/// construction; the optional cache is the only mutable state.
#[derive(Debug)]
pub struct AssetResolver<P = FsProbe> {
    search_dirs: Vec<PathBuf>,
    extensions: Vec<String>,
    aliases: AliasTable,
    probe: P,
    cache: Option<RwLock<HashMap<String, AssetResolution>>>,
}

impl AssetResolver<FsProbe> {
    pub fn new(config: &AssetConfig) -> Self {
        Self::with_probe(config, FsProbe)
    }
}

impl<P: FileProbe> AssetResolver<P> {
    pub fn with_probe(config: &AssetConfig, probe: P) -> Self {
        Self {
            search_dirs: config.search_dirs.clone(),
            extensions: config.extensions.clone(),
            aliases: AliasTable::from_config(config),
            probe,
            cache: config.cache.then(|| RwLock::new(HashMap::new())),
        }
    }

    pub fn candidates(&self, name: &str) -> Vec<String> {
        candidate_file_names(name, &self.aliases, &self.extensions)
    }

    pub fn resolve(&self, name: &str) -> AssetResolution {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.read().ok().and_then(|c| c.get(name).cloned()) {
                return hit;
            }
        }

        let resolution = match probe(&self.search_dirs, &self.candidates(name), &self.probe) {
            Some(path) => AssetResolution::Found(path),
            None => {
                debug!(operator = name, "no portrait found");
                AssetResolution::NotFound
            }
        };

        if let Some(cache) = &self.cache {
            // a poisoned cache only costs a re-probe next time
            if let Ok(mut guard) = cache.write() {
                guard.insert(name.to_string(), resolution.clone());
            }
        }
        resolution
    }
}
