//! Palette command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::color::format_hex_color;
use crate::palette::{Category, ColorTable, GlobalColor};

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the palette command
pub fn run_palette(file: Option<&Path>) -> ExitCode {
    let (name, table) = match file {
        Some(path) => match ColorTable::load(path) {
            Ok(table) => (path.display().to_string(), table),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        },
        None => ("built-in".to_string(), ColorTable::builtin()),
    };

    print!("{}", describe(&name, &table));
    ExitCode::from(EXIT_SUCCESS)
}

/// Human-readable palette summary.
fn describe(name: &str, table: &ColorTable) -> String {
    let mut out = format!("Palette: {}\n\n", name);
    for category in Category::ALL {
        out.push_str(&format!("  {:<8} {}\n", category, table.len(category)));
    }

    out.push_str("\nGlobals:\n");
    let missing = table.missing_globals();
    for global in GlobalColor::ALL {
        if missing.contains(&global) {
            out.push_str(&format!("  {:<8} (missing, drawn transparent)\n", global.name()));
        } else {
            out.push_str(&format!("  {:<8} {}\n", global.name(), format_hex_color(table.global(global))));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_describe_lists_missing_globals() {
        let mut table = ColorTable::new();
        table.set_global(GlobalColor::Sky, Rgba([132, 170, 248, 255]));
        table.set_block(0, Rgba([151, 107, 75, 255]));

        let text = describe("test", &table);
        assert!(text.starts_with("Palette: test"));
        assert!(text.contains("Sky      #84AAF8FF"));
        assert!(text.contains("Lava     (missing, drawn transparent)"));
    }

    #[test]
    fn test_describe_builtin() {
        let text = describe("built-in", &ColorTable::builtin());
        assert!(!text.contains("missing"));
    }
}
