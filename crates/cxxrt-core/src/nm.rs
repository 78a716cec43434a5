//! Parser for BSD-format `nm` symbol listings.
//!
//! Accepts what `llvm-nm` and GNU `nm` print for objects and archives:
//!
//! ```text
//! codec.o:
//!          U _Znwm
//! 00000010 T encode
//! 00000020 W _ZdlPv
//! ```
//!
//! and the `-A` form (`libshim.a:shim.o: 00000000 T _Znwm`). Lines that fit
//! neither shape are skipped, so arbitrary input never fails the parse.

/// How an object relates to a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// `U`: referenced, must be resolved at link time.
    Undefined,
    /// `w`/`v`: weak reference, resolves to null when absent.
    WeakUndefined,
    /// Global strong definition (`T`, `D`, `B`, `R`, ...).
    Defined,
    /// `W`/`V`: weak definition, duplicates are tolerated.
    WeakDefined,
    /// Lowercase type letter: local to its object.
    Local,
}

impl SymbolKind {
    /// Map an `nm` type letter. `None` for letters that carry no linkage
    /// meaning here (`?`, `-`, digits).
    #[must_use]
    pub fn from_type_char(c: char) -> Option<Self> {
        match c {
            'U' => Some(Self::Undefined),
            'w' | 'v' => Some(Self::WeakUndefined),
            'W' | 'V' => Some(Self::WeakDefined),
            c if c.is_ascii_uppercase() => Some(Self::Defined),
            c if c.is_ascii_lowercase() => Some(Self::Local),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_definition(self) -> bool {
        matches!(self, Self::Defined | Self::WeakDefined)
    }

    #[must_use]
    pub const fn is_strong_definition(self) -> bool {
        matches!(self, Self::Defined)
    }
}

/// One symbol line attributed to the object that listed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub object: String,
    pub name: String,
    pub kind: SymbolKind,
}

/// Parse an `nm` listing. `default_object` labels lines that appear before any
/// `file:` header.
#[must_use]
pub fn parse_listing(default_object: &str, text: &str) -> Vec<SymbolEntry> {
    let mut object = default_object.to_string();
    let mut entries = Vec::new();

    for raw in text.lines() {
        let line = raw.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        // Object header: "codec.o:" or "libshim.a[shim.o]:"
        if let Some(header) = line.strip_suffix(':')
            && !header.contains(char::is_whitespace)
        {
            object = header.to_string();
            continue;
        }

        // -A form: "<object>: <symbol line>"
        let (line_object, body) = match line.rsplit_once(": ") {
            Some((prefix, rest)) if !prefix.contains(char::is_whitespace) => {
                (Some(prefix), rest)
            }
            _ => (None, line),
        };

        if let Some((kind, name)) = parse_symbol_line(body) {
            entries.push(SymbolEntry {
                object: line_object.map_or_else(|| object.clone(), str::to_string),
                name: name.to_string(),
                kind,
            });
        }
    }

    entries
}

fn parse_symbol_line(body: &str) -> Option<(SymbolKind, &str)> {
    let mut fields = body.split_whitespace();
    let first = fields.next()?;
    let second = fields.next()?;
    let third = fields.next();
    if fields.next().is_some() {
        return None;
    }

    let (type_field, name) = match third {
        Some(name) => {
            if !first.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            (second, name)
        }
        None => (first, second),
    };

    let mut chars = type_field.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    SymbolKind::from_type_char(c).map(|kind| (kind, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_llvm_nm_object_listing() {
        let text = "\
         U _Znwm
         U __cxa_pure_virtual
00000010 T encode
00000020 t helper
         w __cxa_uncaught_exceptions
";
        let entries = parse_listing("codec.o", text);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].name, "_Znwm");
        assert_eq!(entries[0].kind, SymbolKind::Undefined);
        assert_eq!(entries[0].object, "codec.o");
        assert_eq!(entries[2].kind, SymbolKind::Defined);
        assert_eq!(entries[3].kind, SymbolKind::Local);
        assert_eq!(entries[4].kind, SymbolKind::WeakUndefined);
    }

    #[test]
    fn headers_switch_objects() {
        let text = "\
a.o:
00000000 T _Znwm

b.o:
00000000 W _Znwm
";
        let entries = parse_listing("archive", text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].object, "a.o");
        assert_eq!(entries[1].object, "b.o");
        assert_eq!(entries[1].kind, SymbolKind::WeakDefined);
    }

    #[test]
    fn print_file_name_form() {
        let text = "libcxxrt.a:shim.o: 0000000000000000 T __cxa_throw\n";
        let entries = parse_listing("unused", text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].object, "libcxxrt.a:shim.o");
        assert_eq!(entries[0].name, "__cxa_throw");
    }

    #[test]
    fn skips_malformed_lines() {
        let text = "\
garbage line with many words in it
zz T not_hex_address
         UU two_letters
00000000 ? odd
";
        assert!(parse_listing("x.o", text).is_empty());
    }

    #[test]
    fn definition_predicates() {
        assert!(SymbolKind::Defined.is_strong_definition());
        assert!(SymbolKind::WeakDefined.is_definition());
        assert!(!SymbolKind::WeakDefined.is_strong_definition());
        assert!(!SymbolKind::Undefined.is_definition());
        assert_eq!(SymbolKind::from_type_char('R'), Some(SymbolKind::Defined));
        assert_eq!(SymbolKind::from_type_char('-'), None);
    }
}
