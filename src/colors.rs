/// Bucket name for repos without a language and for the folded long tail
pub const OTHER_LANGUAGE: &str = "Other";
pub const DEFAULT_COLOR: &str = "#8b949e";

/// GitHub language colors (top 20)
const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("TypeScript", "#3178c6"),
    ("JavaScript", "#f1e05a"),
    ("Python", "#3572a5"),
    ("Rust", "#dea584"),
    ("Go", "#00add8"),
    ("Java", "#b07219"),
    ("C++", "#f34b7d"),
    ("C", "#555555"),
    ("Ruby", "#701516"),
    ("Swift", "#f05138"),
    ("Kotlin", "#a97bff"),
    ("Dart", "#00b4ab"),
    ("Shell", "#89e051"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("Vue", "#41b883"),
    ("Lua", "#000080"),
    ("Zig", "#ec915c"),
    ("Elixir", "#6e4a7e"),
    ("Haskell", "#5e5086"),
    (OTHER_LANGUAGE, DEFAULT_COLOR),
];

pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}
