//! Embedded catalogue of published CRC models.
//!
//! The catalogue ships inside the binary as a text asset. Each line is
//! `id|params|check|description` where `params` is a [`CrcModel`] parameter
//! string and `check` is the CRC of `"123456789"`.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::{CrcModel, Error, Result};

const CATALOGUE: &str = include_str!("../assets/catalogue.txt");

/// The input every catalogue check value is computed over.
pub const CHECK_INPUT: &[u8] = b"123456789";

/// One named CRC model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    /// Canonical name, e.g. `CRC-16/XMODEM`.
    pub id: String,
    /// Parameters.
    pub model: CrcModel,
    /// CRC of [`CHECK_INPUT`].
    pub check: u64,
    /// Human readable description.
    pub description: String,
}

/// A list of named CRC models.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,
}

impl Catalogue {
    /// The catalogue embedded in this crate.
    ///
    /// Parsed once; a malformed asset is reported as [`Error::Catalogue`]
    /// on every call.
    pub fn builtin() -> Result<&'static Catalogue> {
        static BUILTIN: OnceLock<std::result::Result<Catalogue, (String, String)>> =
            OnceLock::new();

        BUILTIN
            .get_or_init(|| {
                Catalogue::parse(CATALOGUE).map_err(|e| match e {
                    Error::Catalogue { entry, reason } => (entry, reason),
                    other => ("<catalogue>".to_string(), other.to_string()),
                })
            })
            .as_ref()
            .map_err(|(entry, reason)| Error::Catalogue {
                entry: entry.clone(),
                reason: reason.clone(),
            })
    }

    /// Parse catalogue text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let entry = parse_entry(line).map_err(|reason| Error::Catalogue {
                entry: format!("line {} ({})", index + 1, line.split('|').next().unwrap_or(line)),
                reason,
            })?;

            if !seen.insert(entry.id.to_ascii_uppercase()) {
                return Err(Error::Catalogue {
                    entry: format!("line {} ({})", index + 1, entry.id),
                    reason: "duplicate id".to_string(),
                });
            }
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    /// All entries in catalogue order.
    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }

    /// Entries whose width is exactly `width`.
    pub fn with_width(&self, width: u32) -> impl Iterator<Item = &CatalogueEntry> {
        self.entries.iter().filter(move |e| e.model.width() == width)
    }

    /// Look up an entry by id, ignoring case.
    pub fn get(&self, id: &str) -> Option<&CatalogueEntry> {
        self.entries.iter().find(|e| e.id.eq_ignore_ascii_case(id))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entry(line: &str) -> std::result::Result<CatalogueEntry, String> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    let [id, params, check, description] = fields.as_slice() else {
        return Err(format!("expected 4 '|' separated fields, got {}", fields.len()));
    };

    if id.is_empty() {
        return Err("empty id".to_string());
    }

    let model = params.parse::<CrcModel>().map_err(|e| e.to_string())?;
    let check = u64::from_str_radix(check, 16).map_err(|_| format!("check {check:?} is not hex"))?;
    if check & !model.mask() != 0 {
        return Err(format!("check {check:#x} does not fit in {} bits", model.width()));
    }

    Ok(CatalogueEntry {
        id: id.to_string(),
        model,
        check,
        description: description.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute, Crc};

    #[test]
    fn test_builtin_loads() {
        let catalogue = Catalogue::builtin().unwrap();
        assert!(catalogue.len() > 90);
        assert!(catalogue.get("crc-32/iso-hdlc").is_some());
        assert!(catalogue.get("CRC-99/NOPE").is_none());
    }

    #[test]
    fn test_every_entry_reproduces_its_check_value() {
        for entry in Catalogue::builtin().unwrap().entries() {
            assert_eq!(compute(&entry.model, CHECK_INPUT), entry.check, "{}", entry.id);
            assert_eq!(Crc::new(entry.model.clone()).checksum(CHECK_INPUT), entry.check, "{}", entry.id);
        }
    }

    #[test]
    fn test_with_width() {
        let catalogue = Catalogue::builtin().unwrap();
        let widths: Vec<u32> = catalogue.with_width(16).map(|e| e.model.width()).collect();
        assert!(widths.len() > 20);
        assert!(widths.iter().all(|&w| w == 16));
        assert_eq!(catalogue.with_width(9).count(), 0);
    }

    #[test]
    fn test_malformed_entry_names_the_line() {
        let text = "# header\nCRC-8/OK|8,07,00,false,false,00|f4|fine\nCRC-8/BAD|8,07,00,maybe,false,00|f4|broken\n";
        match Catalogue::parse(text) {
            Err(Error::Catalogue { entry, reason }) => {
                assert!(entry.contains("line 3"));
                assert!(entry.contains("CRC-8/BAD"));
                assert!(reason.contains("refIn"));
            }
            other => panic!("expected catalogue error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_and_short_entries_are_rejected() {
        let dup = "A|8,07,00,false,false,00|f4|x\na|8,07,00,false,false,00|f4|y\n";
        assert!(matches!(Catalogue::parse(dup), Err(Error::Catalogue { .. })));

        let short = "A|8,07,00,false,false,00|f4\n";
        assert!(matches!(Catalogue::parse(short), Err(Error::Catalogue { .. })));

        let wide_check = "A|8,07,00,false,false,00|1f4|x\n";
        assert!(matches!(Catalogue::parse(wide_check), Err(Error::Catalogue { .. })));
    }
}
