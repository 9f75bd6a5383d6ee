// JSON path reconstruction - rebuild `$.a.b[2]` style locators by scanning raw
// braces and brackets backwards. No parser: malformed or partial JSON is fine,
// but quotes and braces inside string values can throw the nesting count off.
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref KEY_REGEX: Regex = Regex::new(r#"^"([^"]+)"\s*:"#).unwrap();
}

/// Key of a `"key":` token starting exactly at byte `pos`
fn key_at(text: &str, pos: usize) -> Option<&str> {
    if text.as_bytes().get(pos) != Some(&b'"') {
        return None;
    }
    KEY_REGEX
        .captures(&text[pos..])
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Last byte index the backward walks start from
fn walk_start(text: &str, offset: usize) -> Option<usize> {
    if text.is_empty() {
        return None;
    }
    Some(offset.min(text.len() - 1))
}

/// Index of the array element containing `offset`, counted as the number of
/// commas between the nearest unmatched `[` and `offset`. Commas inside nested
/// objects are counted too.
pub fn infer_array_index(text: &str, offset: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut item_index = 0usize;

    for i in (0..=walk_start(text, offset)?).rev() {
        match bytes[i] {
            b']' => depth += 1,
            b'[' => {
                if depth == 0 {
                    return Some(item_index);
                }
                depth -= 1;
            }
            b',' if depth == 0 => item_index += 1,
            _ => {}
        }
    }

    None
}

/// Reconstruct the path of the value at byte `offset`, e.g. `$.createdAt` or
/// `$.events[3]`. Returns `None` when no key precedes the value within the
/// enclosing object.
pub fn infer_json_path(text: &str, offset: usize) -> Option<String> {
    let start = walk_start(text, offset)?;
    let bytes = text.as_bytes();
    let mut keys: Vec<&str> = Vec::new();
    let mut depth = 0usize;

    for i in (0..=start).rev() {
        match bytes[i] {
            b'}' => depth += 1,
            b'{' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            _ => {}
        }

        if depth == 0 {
            if let Some(key) = key_at(text, i) {
                keys.push(key);
            }
        }
    }

    if keys.is_empty() {
        return None;
    }

    // Collected back to front
    keys.reverse();
    let mut segments: Vec<String> = keys.into_iter().map(str::to_string).collect();

    if let Some(index) = infer_array_index(text, offset) {
        if let Some(last) = segments.last_mut() {
            last.push_str(&format!("[{}]", index));
        }
    }

    Some(format!("$.{}", segments.join(".")))
}
