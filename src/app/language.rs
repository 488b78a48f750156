use std::path::Path;

/// Extension (lowercase, with the dot) to fence tag.
const LANGUAGE_HINTS: &[(&str, &str)] = &[
    (".py", "python"),
    (".js", "javascript"),
    (".jsx", "javascript"),
    (".ts", "typescript"),
    (".tsx", "typescript"),
    (".html", "html"),
    (".css", "css"),
    (".scss", "scss"),
    (".json", "json"),
    (".yaml", "yaml"),
    (".yml", "yaml"),
    (".md", "markdown"),
    (".sh", "bash"),
    (".java", "java"),
    (".cs", "csharp"),
    (".cpp", "cpp"),
    (".c", "c"),
    (".h", "c"),
    (".hpp", "cpp"),
    (".go", "go"),
    (".php", "php"),
    (".rb", "ruby"),
    (".rs", "rust"),
    (".swift", "swift"),
    (".kt", "kotlin"),
    (".kts", "kotlin"),
    (".sql", "sql"),
    (".xml", "xml"),
    (".dockerfile", "dockerfile"),
    (".txt", "text"),
];

/// Best-effort fence tag for a file name. Empty means "no hint".
pub fn language_hint(file_name: &str) -> &'static str {
    let Some(ext) = Path::new(file_name).extension() else {
        return "";
    };
    let key = format!(".{}", ext.to_string_lossy().to_lowercase());
    LANGUAGE_HINTS
        .iter()
        .find(|(e, _)| *e == key)
        .map(|(_, tag)| *tag)
        .unwrap_or("")
}
