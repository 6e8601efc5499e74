use std::{
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

/// Track names extracted when no other table is given, with their output files.
pub const DEFAULT_TARGETS: &[(&str, &str)] = &[
    ("PART GUITAR", "guitar.txt"),
    ("PART BASS", "bass.txt"),
    ("PART DRUMS", "drums.txt"),
    ("PART VOCALS", "vocals.txt"),
    ("BEAT", "beat.txt"),
    ("EVENTS", "events.txt"),
];

/// One entry of a [`TargetMap`]: a track name and the file its notes go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Exact track name to look for
    pub name: String,
    /// Output file, relative to the output directory unless absolute
    pub file: PathBuf,
}

/// Errors parsing a `NAME=FILE` target.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TargetParseError {
    /// No `=` separating the name from the file.
    #[error("expected NAME=FILE, got {0:?}")]
    MissingSeparator(String),
    /// The name part is empty.
    #[error("track name is empty in {0:?}")]
    EmptyName(String),
    /// The file part is empty.
    #[error("output file is empty in {0:?}")]
    EmptyFile(String),
}

impl FromStr for Target {
    type Err = TargetParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // names may contain '=' less often than paths do, so split on the last one
        let Some((name, file)) = s.rsplit_once('=') else {
            return Err(TargetParseError::MissingSeparator(s.to_owned()));
        };
        if name.is_empty() {
            return Err(TargetParseError::EmptyName(s.to_owned()));
        }
        if file.is_empty() {
            return Err(TargetParseError::EmptyFile(s.to_owned()));
        }
        Ok(Self {
            name: name.to_owned(),
            file: PathBuf::from(file),
        })
    }
}

#[doc = r#"
Maps track names to the files their notes are written to.

Entries keep insertion order; inserting an existing name replaces its file.

# Example
```rust
# use midi_tracks::prelude::*;
let mut targets = TargetMap::default();
assert_eq!(targets.get("BEAT").unwrap().to_str(), Some("beat.txt"));

targets.insert("PART KEYS", "keys.txt");
assert!(targets.get("PART KEYS").is_some());
```
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMap {
    entries: Vec<Target>,
}

impl Default for TargetMap {
    fn default() -> Self {
        let mut map = Self::empty();
        for (name, file) in DEFAULT_TARGETS {
            map.insert(*name, *file);
        }
        map
    }
}

impl TargetMap {
    /// A map with no entries.
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace the file for `name`.
    pub fn insert(&mut self, name: impl Into<String>, file: impl Into<PathBuf>) {
        self.push(Target {
            name: name.into(),
            file: file.into(),
        });
    }

    /// Add or replace a parsed target.
    pub fn push(&mut self, target: Target) {
        match self.entries.iter_mut().find(|t| t.name == target.name) {
            Some(existing) => existing.file = target.file,
            None => self.entries.push(target),
        }
    }

    /// The output file for `name`.
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.file.as_path())
    }

    /// All entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<Target> for TargetMap {
    fn extend<I: IntoIterator<Item = Target>>(&mut self, iter: I) {
        for target in iter {
            self.push(target);
        }
    }
}

#[test]
fn parse_target() {
    use pretty_assertions::assert_eq;
    let target: Target = "PART GUITAR=out/guitar.csv".parse().unwrap();
    assert_eq!(target.name, "PART GUITAR");
    assert_eq!(target.file, PathBuf::from("out/guitar.csv"));

    assert_eq!(
        "PART GUITAR".parse::<Target>(),
        Err(TargetParseError::MissingSeparator("PART GUITAR".to_owned()))
    );
    assert_eq!(
        "=x.txt".parse::<Target>(),
        Err(TargetParseError::EmptyName("=x.txt".to_owned()))
    );
    assert_eq!(
        "BEAT=".parse::<Target>(),
        Err(TargetParseError::EmptyFile("BEAT=".to_owned()))
    );
}

#[test]
fn insert_replaces() {
    use pretty_assertions::assert_eq;
    let mut targets = TargetMap::default();
    let before = targets.len();
    targets.insert("BEAT", "tempo.txt");
    assert_eq!(targets.len(), before);
    assert_eq!(targets.get("BEAT"), Some(Path::new("tempo.txt")));
    assert_eq!(targets.get("beat"), None);
}
