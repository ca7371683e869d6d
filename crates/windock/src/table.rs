use windock_core::{AffinityCache, DisplayInfo};

pub fn print_displays_table(displays: &[DisplayInfo]) {
    let name_width = displays
        .iter()
        .map(|d| d.name().chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 40);
    let id_width = 10;
    let bounds_width = 24;
    let primary_width = 7;

    println!(
        "┌{}┬{}┬{}┬{}┐",
        "─".repeat(id_width + 2),
        "─".repeat(name_width + 2),
        "─".repeat(bounds_width + 2),
        "─".repeat(primary_width + 2),
    );
    println!(
        "│ {:<id_width$} │ {:<name_width$} │ {:<bounds_width$} │ {:<primary_width$} │",
        "ID", "Name", "Bounds", "Primary",
    );
    println!(
        "├{}┼{}┼{}┼{}┤",
        "─".repeat(id_width + 2),
        "─".repeat(name_width + 2),
        "─".repeat(bounds_width + 2),
        "─".repeat(primary_width + 2),
    );
    for display in displays {
        println!(
            "│ {:<id_width$} │ {} │ {} │ {:<primary_width$} │",
            display.id(),
            truncate(display.name(), name_width),
            truncate(&display.visible().to_string(), bounds_width),
            if display.is_primary() { "yes" } else { "" },
        );
    }
    println!(
        "└{}┴{}┴{}┴{}┘",
        "─".repeat(id_width + 2),
        "─".repeat(name_width + 2),
        "─".repeat(bounds_width + 2),
        "─".repeat(primary_width + 2),
    );
}

/// One row per cache entry: key kind, key, display.
pub fn print_affinity_table(cache: &AffinityCache) {
    let rows: Vec<(&str, String, u32)> = cache
        .by_window_id()
        .iter()
        .map(|(id, display)| ("window-id", id.to_string(), *display))
        .chain(
            cache
                .by_process_window()
                .iter()
                .map(|(key, display)| ("pid#number", key.clone(), *display)),
        )
        .chain(
            cache
                .by_bundle()
                .iter()
                .map(|(bundle, display)| ("bundle", bundle.clone(), *display)),
        )
        .collect();

    let kind_width = 10;
    let key_width = rows
        .iter()
        .map(|(_, key, _)| key.chars().count())
        .max()
        .unwrap_or(3)
        .clamp(3, 50);
    let display_width = 10;

    println!(
        "┌{}┬{}┬{}┐",
        "─".repeat(kind_width + 2),
        "─".repeat(key_width + 2),
        "─".repeat(display_width + 2),
    );
    println!(
        "│ {:<kind_width$} │ {:<key_width$} │ {:<display_width$} │",
        "Key Type", "Key", "Display",
    );
    println!(
        "├{}┼{}┼{}┤",
        "─".repeat(kind_width + 2),
        "─".repeat(key_width + 2),
        "─".repeat(display_width + 2),
    );
    for (kind, key, display) in &rows {
        println!(
            "│ {:<kind_width$} │ {} │ {:<display_width$} │",
            kind,
            truncate(key, key_width),
            display,
        );
    }
    println!(
        "└{}┴{}┴{}┘",
        "─".repeat(kind_width + 2),
        "─".repeat(key_width + 2),
        "─".repeat(display_width + 2),
    );
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) so multi-byte titles and bundle
/// names are never split inside a character.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
