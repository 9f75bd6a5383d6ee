// Alternate notations for a reconstructed `$.` path
pub const DEFAULT_JS_ROOT: &str = "obj";

/// `$.a.b[0].c` -> `.a.b[0].c`
pub fn to_jq(path: &str) -> String {
    match path.strip_prefix("$.") {
        Some(rest) => format!(".{}", rest),
        None => path.to_string(),
    }
}

/// `$.a.b[0].c` -> `obj.a.b[0].c`
pub fn to_js(path: &str, root: &str) -> String {
    match path.strip_prefix("$.") {
        Some(rest) => format!("{}.{}", root, rest),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_jq() {
        assert_eq!(to_jq("$.a.b[0].c"), ".a.b[0].c");
        assert_eq!(to_jq("$.ts"), ".ts");
    }

    #[test]
    fn test_to_js() {
        assert_eq!(to_js("$.a.b[0].c", DEFAULT_JS_ROOT), "obj.a.b[0].c");
        assert_eq!(to_js("$.ts", "data"), "data.ts");
    }

    #[test]
    fn test_unprefixed_path_untouched() {
        assert_eq!(to_jq("a.b"), "a.b");
        assert_eq!(to_js("a.b", "obj"), "a.b");
    }
}
