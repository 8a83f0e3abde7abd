// textguard/src/ui/diff_viewer.rs
//! Line diff between the input and the filtered text.

use std::io::{self, Write};

use diffy::{create_patch, Line as DiffLine};

use crate::ui::output_format::paint;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Writes a line-oriented diff: removed lines in red, added lines in green.
pub fn print_diff<W: Write>(
    original: &str,
    filtered: &str,
    writer: &mut W,
    theme_map: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    let patch = create_patch(original, filtered);

    writeln!(writer, "{}", paint("--- Diff View ---", ThemeEntry::DiffHeader, theme_map, enable_colors))?;

    let mut changed = false;
    for hunk in patch.hunks() {
        for line in hunk.lines() {
            match line {
                DiffLine::Delete(s) => {
                    changed = true;
                    let text = format!("- {}", s.trim_end_matches(['\r', '\n']));
                    writeln!(writer, "{}", paint(&text, ThemeEntry::DiffRemoved, theme_map, enable_colors))?;
                }
                DiffLine::Insert(s) => {
                    changed = true;
                    let text = format!("+ {}", s.trim_end_matches(['\r', '\n']));
                    writeln!(writer, "{}", paint(&text, ThemeEntry::DiffAdded, theme_map, enable_colors))?;
                }
                DiffLine::Context(s) => {
                    writeln!(writer, "  {}", s.trim_end_matches(['\r', '\n']))?;
                }
            }
        }
    }

    if !changed {
        writeln!(writer, "No changes.")?;
    }

    writeln!(writer, "{}", paint("-----------------", ThemeEntry::DiffHeader, theme_map, enable_colors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemeStyle;

    fn render(original: &str, filtered: &str) -> String {
        let mut buf = Vec::new();
        print_diff(original, filtered, &mut buf, &ThemeStyle::default_theme_map(), false).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn shows_removed_and_added_lines() {
        let out = render("keep\n<b>bold</b>\n", "keep\nbold\n");
        assert!(out.contains("- <b>bold</b>\n"));
        assert!(out.contains("+ bold\n"));
        assert!(out.contains("  keep\n"));
    }

    #[test]
    fn identical_text_reports_no_changes() {
        let out = render("same\n", "same\n");
        assert!(out.contains("No changes."));
        assert!(!out.contains("\n- "));
    }
}
