//! External tool availability check.

use console::style;

use crate::extract::check_tools;

/// Report which external extraction tools are installed.
pub fn cmd_check() -> anyhow::Result<()> {
    println!("{} Checking external tools...", style("→").cyan());

    let mut missing = false;
    for (tool, available) in check_tools() {
        if available {
            println!("  {} {}", style("✓").green(), tool);
        } else {
            missing = true;
            println!("  {} {} (not found in PATH)", style("✗").red(), tool);
        }
    }

    if missing {
        println!("  PDF extraction needs poppler-utils; image OCR needs tesseract-ocr.");
    }
    Ok(())
}
