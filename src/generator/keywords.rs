/// Code-drill languages: mode bucket key and display name. Each key doubles
/// as a separate highscore/leaderboard bucket.
pub const CODE_LANGUAGES: &[(&str, &str)] = &[
    ("py", "Python"),
    ("js", "JavaScript"),
    ("cpp", "C++"),
    ("rs", "Rust"),
    ("java", "Java"),
];

const PY: &[&str] = &[
    "def", "class", "import", "from", "return", "async", "await", "list", "dict", "tuple",
    "lambda", "with", "yield",
];

const JS: &[&str] = &[
    "function", "const", "let", "var", "return", "async", "await", "import", "export", "class",
    "extends", "promise", "typeof",
];

const CPP: &[&str] = &[
    "int", "float", "double", "std", "string", "vector", "include", "namespace", "template",
    "nullptr", "override", "constexpr",
];

const RS: &[&str] = &[
    "fn", "let", "mut", "impl", "trait", "enum", "struct", "match", "use", "crate", "pub", "where",
];

const JAVA: &[&str] = &[
    "public", "class", "static", "void", "new", "return", "extends", "implements", "package",
    "import", "final", "interface",
];

pub fn is_code_mode(key: &str) -> bool {
    CODE_LANGUAGES.iter().any(|(k, _)| *k == key)
}

pub fn display_name(key: &str) -> Option<&'static str> {
    CODE_LANGUAGES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, name)| *name)
}

/// Keyword drill items for a code language key; empty for unknown keys.
pub fn keywords_for(key: &str) -> Vec<String> {
    let list: &[&str] = match key {
        "py" => PY,
        "js" => JS,
        "cpp" => CPP,
        "rs" => RS,
        "java" => JAVA,
        _ => &[],
    };
    list.iter().map(|s| s.to_string()).collect()
}
