//! Book name lookup table.
//!
//! Maps every recognized spelling or abbreviation of a scripture book to its
//! canonical slug. Lookups are case-insensitive; several names may point at
//! the same slug.
//!
//! ## Book Table Files
//!
//! A custom table can replace the built-in Portuguese one:
//!
//! ```toml
//! [books.genesis]
//! names = ["Gênesis", "Genesis", "Gn"]
//!
//! [books.joao]
//! names = ["João", "Joao", "Jo"]
//! ```
//!
//! Numbered names written with a space (`"1 Coríntios"`) are also registered
//! without it (`"1Coríntios"`), since both spellings are common in prose.
//!
//! The built-in table leaves out abbreviations that are also everyday
//! Portuguese words (`Os`, `Na`, `Am`). Lookup is case-insensitive, so "os 12
//! apóstolos" would otherwise link to Oséias 12.

use crate::config::ReferencesConfig;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookIndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Book table has no names for '{0}'")]
    EmptyBook(String),
}

/// Case-insensitive book name → slug table.
#[derive(Debug, Clone, Default)]
pub struct BookIndex {
    entries: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BookTable {
    books: BTreeMap<String, BookEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BookEntry {
    names: Vec<String>,
}

impl BookIndex {
    /// Build an index from `(name, slug)` pairs. Later duplicates win.
    pub fn from_entries<N, S>(entries: impl IntoIterator<Item = (N, S)>) -> Self
    where
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for (name, slug) in entries {
            for variant in name_variants(name.as_ref()) {
                map.insert(variant.to_lowercase(), slug.as_ref().to_string());
            }
        }
        Self { entries: map }
    }

    /// Parse a TOML book table (see module docs for the format).
    pub fn from_toml_str(content: &str) -> Result<Self, BookIndexError> {
        let table: BookTable = toml::from_str(content)?;
        if let Some((slug, _)) = table.books.iter().find(|(_, b)| b.names.is_empty()) {
            return Err(BookIndexError::EmptyBook(slug.clone()));
        }
        Ok(Self::from_entries(table.books.iter().flat_map(|(slug, book)| {
            book.names.iter().map(move |name| (name.as_str(), slug.as_str()))
        })))
    }

    /// Load a TOML book table from disk.
    pub fn load(path: &Path) -> Result<Self, BookIndexError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve the index named by the `[references]` config.
    ///
    /// An empty `books` path selects the built-in table; relative paths are
    /// taken from `base_dir` (the content root).
    pub fn from_config(config: &ReferencesConfig, base_dir: &Path) -> Result<Self, BookIndexError> {
        if config.books.is_empty() {
            Ok(Self::portuguese())
        } else {
            Self::load(&base_dir.join(&config.books))
        }
    }

    /// The built-in Brazilian Portuguese table (66 books, common abbreviations).
    pub fn portuguese() -> Self {
        Self::from_entries(
            PORTUGUESE_BOOKS
                .iter()
                .flat_map(|(slug, names)| names.iter().map(move |name| (*name, *slug))),
        )
    }

    /// Case-insensitive lookup of a name or abbreviation.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_lowercase()).map(String::as_str)
    }

    /// All registered names (lowercased), in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `"1 Samuel"` → `["1 Samuel", "1Samuel"]`; anything else → itself.
fn name_variants(name: &str) -> Vec<String> {
    let name = name.trim();
    let mut variants = vec![name.to_string()];
    if let Some((prefix, rest)) = name.split_once(' ')
        && !prefix.is_empty()
        && prefix.chars().all(|c| c.is_ascii_digit())
    {
        variants.push(format!("{prefix}{}", rest.trim_start()));
    }
    variants
}

const PORTUGUESE_BOOKS: &[(&str, &[&str])] = &[
    ("genesis", &["Gênesis", "Genesis", "Gn"]),
    ("exodo", &["Êxodo", "Exodo", "Êx", "Ex"]),
    ("levitico", &["Levítico", "Levitico", "Lv"]),
    ("numeros", &["Números", "Numeros", "Nm"]),
    ("deuteronomio", &["Deuteronômio", "Deuteronomio", "Dt"]),
    ("josue", &["Josué", "Josue", "Js"]),
    ("juizes", &["Juízes", "Juizes", "Jz"]),
    ("rute", &["Rute", "Rt"]),
    ("1-samuel", &["1 Samuel", "1 Sm"]),
    ("2-samuel", &["2 Samuel", "2 Sm"]),
    ("1-reis", &["1 Reis", "1 Rs"]),
    ("2-reis", &["2 Reis", "2 Rs"]),
    ("1-cronicas", &["1 Crônicas", "1 Cronicas", "1 Cr"]),
    ("2-cronicas", &["2 Crônicas", "2 Cronicas", "2 Cr"]),
    ("esdras", &["Esdras", "Ed"]),
    ("neemias", &["Neemias", "Ne"]),
    ("ester", &["Ester", "Et"]),
    ("jo", &["Jó"]),
    ("salmos", &["Salmos", "Salmo", "Sl"]),
    ("proverbios", &["Provérbios", "Proverbios", "Pv"]),
    ("eclesiastes", &["Eclesiastes", "Ec"]),
    ("cantares", &["Cânticos", "Canticos", "Cantares", "Ct"]),
    ("isaias", &["Isaías", "Isaias", "Is"]),
    ("jeremias", &["Jeremias", "Jr"]),
    ("lamentacoes", &["Lamentações", "Lamentacoes", "Lm"]),
    ("ezequiel", &["Ezequiel", "Ez"]),
    ("daniel", &["Daniel", "Dn"]),
    ("oseias", &["Oséias", "Oseias"]),
    ("joel", &["Joel", "Jl"]),
    ("amos", &["Amós", "Amos"]),
    ("obadias", &["Obadias", "Ob"]),
    ("jonas", &["Jonas", "Jn"]),
    ("miqueias", &["Miquéias", "Miqueias", "Mq"]),
    ("naum", &["Naum"]),
    ("habacuque", &["Habacuque", "Hc"]),
    ("sofonias", &["Sofonias", "Sf"]),
    ("ageu", &["Ageu", "Ag"]),
    ("zacarias", &["Zacarias", "Zc"]),
    ("malaquias", &["Malaquias", "Ml"]),
    ("mateus", &["Mateus", "Mt"]),
    ("marcos", &["Marcos", "Mc"]),
    ("lucas", &["Lucas", "Lc"]),
    ("joao", &["João", "Joao", "Jo"]),
    ("atos", &["Atos", "At"]),
    ("romanos", &["Romanos", "Rm"]),
    ("1-corintios", &["1 Coríntios", "1 Corintios", "1 Co"]),
    ("2-corintios", &["2 Coríntios", "2 Corintios", "2 Co"]),
    ("galatas", &["Gálatas", "Galatas", "Gl"]),
    ("efesios", &["Efésios", "Efesios", "Ef"]),
    ("filipenses", &["Filipenses", "Fp"]),
    ("colossenses", &["Colossenses", "Cl"]),
    ("1-tessalonicenses", &["1 Tessalonicenses", "1 Ts"]),
    ("2-tessalonicenses", &["2 Tessalonicenses", "2 Ts"]),
    ("1-timoteo", &["1 Timóteo", "1 Timoteo", "1 Tm"]),
    ("2-timoteo", &["2 Timóteo", "2 Timoteo", "2 Tm"]),
    ("tito", &["Tito", "Tt"]),
    ("filemom", &["Filemom", "Fm"]),
    ("hebreus", &["Hebreus", "Hb"]),
    ("tiago", &["Tiago", "Tg"]),
    ("1-pedro", &["1 Pedro", "1 Pe"]),
    ("2-pedro", &["2 Pedro", "2 Pe"]),
    ("1-joao", &["1 João", "1 Joao", "1 Jo"]),
    ("2-joao", &["2 João", "2 Joao", "2 Jo"]),
    ("3-joao", &["3 João", "3 Joao", "3 Jo"]),
    ("judas", &["Judas", "Jd"]),
    ("apocalipse", &["Apocalipse", "Ap"]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lookup_is_case_insensitive() {
        let index = BookIndex::from_entries([("João", "joao")]);
        assert_eq!(index.lookup("joão"), Some("joao"));
        assert_eq!(index.lookup("JOÃO"), Some("joao"));
        assert_eq!(index.lookup("Joao"), None);
    }

    #[test]
    fn aliases_share_a_slug() {
        let index = BookIndex::from_entries([("João", "joao"), ("Jo", "joao")]);
        assert_eq!(index.lookup("jo"), index.lookup("joão"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn numbered_names_register_compact_variant() {
        let index = BookIndex::from_entries([("1 Coríntios", "1-corintios")]);
        assert_eq!(index.lookup("1 coríntios"), Some("1-corintios"));
        assert_eq!(index.lookup("1coríntios"), Some("1-corintios"));
    }

    #[test]
    fn portuguese_table_covers_canon() {
        let index = BookIndex::portuguese();
        let slugs: std::collections::HashSet<&str> =
            index.names().filter_map(|n| index.lookup(n)).collect();
        assert_eq!(slugs.len(), 66);
        assert_eq!(index.lookup("Gn"), Some("genesis"));
        assert_eq!(index.lookup("Jó"), Some("jo"));
        assert_eq!(index.lookup("Jo"), Some("joao"));
        assert_eq!(index.lookup("1Jo"), Some("1-joao"));
        assert_eq!(index.lookup("Ap"), Some("apocalipse"));
    }

    #[test]
    fn portuguese_table_skips_common_words() {
        let index = BookIndex::portuguese();
        for word in ["os", "Os", "na", "Na", "am"] {
            assert_eq!(index.lookup(word), None, "{word}");
        }
        assert_eq!(index.lookup("Oséias"), Some("oseias"));
        assert_eq!(index.lookup("naum"), Some("naum"));
        assert_eq!(index.lookup("Amós"), Some("amos"));
    }

    #[test]
    fn parse_toml_table() {
        let index = BookIndex::from_toml_str(
            r#"
[books.genesis]
names = ["Genesis", "Gen"]

[books.john]
names = ["John", "Jn"]
"#,
        )
        .unwrap();
        assert_eq!(index.lookup("gen"), Some("genesis"));
        assert_eq!(index.lookup("JN"), Some("john"));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn toml_table_rejects_empty_names() {
        let result = BookIndex::from_toml_str(
            r#"
[books.genesis]
names = []
"#,
        );
        assert!(matches!(result, Err(BookIndexError::EmptyBook(slug)) if slug == "genesis"));
    }

    #[test]
    fn toml_table_rejects_unknown_keys() {
        let result = BookIndex::from_toml_str(
            r#"
[books.genesis]
names = ["Genesis"]
alias = "Gen"
"#,
        );
        assert!(matches!(result, Err(BookIndexError::Toml(_))));
    }

    #[test]
    fn from_config_defaults_to_builtin() {
        let tmp = TempDir::new().unwrap();
        let config = ReferencesConfig::default();
        let index = BookIndex::from_config(&config, tmp.path()).unwrap();
        assert_eq!(index.lookup("Mateus"), Some("mateus"));
    }

    #[test]
    fn from_config_loads_relative_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("books.toml"),
            "[books.john]\nnames = [\"John\"]\n",
        )
        .unwrap();
        let config = ReferencesConfig {
            books: "books.toml".to_string(),
            ..ReferencesConfig::default()
        };
        let index = BookIndex::from_config(&config, tmp.path()).unwrap();
        assert_eq!(index.lookup("john"), Some("john"));
        assert_eq!(index.lookup("Mateus"), None);
    }

    #[test]
    fn from_config_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let config = ReferencesConfig {
            books: "missing.toml".to_string(),
            ..ReferencesConfig::default()
        };
        let result = BookIndex::from_config(&config, tmp.path());
        assert!(matches!(result, Err(BookIndexError::Io(_))));
    }
}
