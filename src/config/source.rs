//! Layered key/value settings: defaults, then the `.env` file, then the
//! process environment. Later layers win.

use super::{ConfigError, Key};
use std::{collections::BTreeMap, fmt, fs, io, path::Path};

/// Layer that supplied a key's final value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Default,
    File,
    Environment,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Default => "default",
            Source::File => "file",
            Source::Environment => "environment",
        };
        f.write_str(name)
    }
}

/// Where each resolved key came from. Keys that nothing supplied are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance(BTreeMap<Key, Source>);

impl Provenance {
    pub fn get(&self, key: Key) -> Option<Source> {
        self.0.get(&key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, Source)> + '_ {
        self.0.iter().map(|(key, source)| (*key, *source))
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    source: Source,
}

/// Mutable builder used while loading; never escapes the loader.
#[derive(Debug, Clone, Default)]
pub(crate) struct Settings {
    entries: BTreeMap<Key, Entry>,
}

impl Settings {
    pub(crate) fn with_defaults() -> Self {
        let mut settings = Self::default();
        for key in Key::ALL {
            if let Some(value) = key.default_value() {
                settings.set(key, value.to_string(), Source::Default);
            }
        }
        settings
    }

    fn set(&mut self, key: Key, value: String, source: Source) {
        self.entries.insert(key, Entry { value, source });
    }

    /// Overlay entries from an env-style file.
    ///
    /// Returns `Ok(false)` when there is no file at `path`: the file or its
    /// directory is missing, the "directory" is a plain file, or `path` is
    /// itself a directory. Unrecognized keys are skipped.
    pub(crate) fn merge_env_file(&mut self, path: &Path) -> Result<bool, ConfigError> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => return Ok(false),
            Ok(_) => {}
            Err(e) if is_missing(&e) => return Ok(false),
            Err(source) => {
                return Err(ConfigError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }

        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(e)) if is_missing(&e) => return Ok(false),
            Err(e) => return Err(file_error(path, e)),
        };

        for item in iter {
            let (name, value) = item.map_err(|e| file_error(path, e))?;
            if let Some(key) = Key::from_file_name(&name) {
                self.set(key, value, Source::File);
            }
        }

        Ok(true)
    }

    /// Overlay recognized variables from an environment snapshot.
    ///
    /// Names must match exactly; empty values count as unset.
    pub(crate) fn merge_env<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in vars {
            let Some(key) = Key::from_env_name(name.as_ref()) else {
                continue;
            };
            let value = value.into();
            if value.is_empty() {
                continue;
            }
            self.set(key, value, Source::Environment);
        }
    }

    /// Raw value, or an empty string when nothing supplied the key.
    pub(crate) fn text(&self, key: Key) -> String {
        self.entries
            .get(&key)
            .map(|entry| entry.value.clone())
            .unwrap_or_default()
    }

    /// Decimal integer with optional sign, no surrounding whitespace.
    /// An empty value reads as zero.
    pub(crate) fn integer(&self, key: Key) -> Result<i64, ConfigError> {
        let raw = self.text(key);
        if raw.is_empty() {
            return Ok(0);
        }
        raw.parse().map_err(|_| invalid_value(key, raw))
    }

    /// Accepts `true`/`false`/`t`/`f` in any case, plus `1` and `0`.
    /// An empty value reads as `false`.
    pub(crate) fn boolean(&self, key: Key) -> Result<bool, ConfigError> {
        let raw = self.text(key);
        match parse_bool(&raw) {
            Some(value) => Ok(value),
            None => Err(invalid_value(key, raw)),
        }
    }

    pub(crate) fn provenance(&self) -> Provenance {
        Provenance(
            self.entries
                .iter()
                .map(|(key, entry)| (*key, entry.source))
                .collect(),
        )
    }
}

pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "" | "0" => Some(false),
        "1" => Some(true),
        s if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("t") => Some(true),
        s if s.eq_ignore_ascii_case("false") || s.eq_ignore_ascii_case("f") => Some(false),
        _ => None,
    }
}

fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

fn invalid_value(key: Key, value: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.name(),
        value,
        expected: key.kind().describe(),
    }
}

fn file_error(path: &Path, err: dotenvy::Error) -> ConfigError {
    match err {
        dotenvy::Error::LineParse(content, position) => ConfigError::Parse {
            path: path.to_path_buf(),
            content,
            position,
        },
        dotenvy::Error::Io(source) => ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        },
        other => ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: io::Error::other(other.to_string()),
        },
    }
}
