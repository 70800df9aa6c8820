use std::collections::BTreeMap;

use crate::palette::{strip_ansi, Palette};
use crate::schema::VcsSchema;
use crate::types::AnsiString;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub counts: BTreeMap<char, usize>,
    pub rendered: AnsiString,
}

/// Every code in the schema is present in `counts`, zero or not. Lines may
/// carry color escapes; the marker is read from the stripped line so colored
/// and plain output count the same.
pub fn aggregate<'a, I>(lines: I, schema: &VcsSchema, palette: Palette) -> StatusSummary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<char, usize> =
        schema.codes.iter().map(|entry| (entry.code, 0)).collect();

    for line in lines {
        let plain = strip_ansi(line);
        if plain.trim().is_empty() {
            continue;
        }
        let marker: String = plain.chars().take(schema.marker_width).collect();
        for entry in schema.codes {
            if marker.contains(entry.code) {
                if let Some(count) = counts.get_mut(&entry.code) {
                    *count += 1;
                }
            }
        }
    }

    let rendered = render_counts(&counts, schema, palette);
    StatusSummary { counts, rendered }
}

pub fn render_counts(
    counts: &BTreeMap<char, usize>,
    schema: &VcsSchema,
    palette: Palette,
) -> AnsiString {
    let mut plain = Vec::new();
    let mut colored = Vec::new();
    for entry in schema.codes {
        let count = counts.get(&entry.code).copied().unwrap_or(0);
        if count == 0 {
            continue;
        }
        let pair = format!("{}:{}", entry.glyph, count);
        colored.push(palette.paint(entry.accent, &pair));
        plain.push(pair);
    }

    AnsiString {
        plain: plain.join(" "),
        colored: colored.join(" "),
    }
}
