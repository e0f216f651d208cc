// JSON path helpers - tolerant dot-path extraction from API responses
//
// Backend responses nest payloads under `data` and are not entirely
// consistent about types (ids and counts arrive as numbers or numeric
// strings). Lookups never panic; a missing intermediate key yields `None`.

use serde_json::Value;

enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

fn classify(piece: &str) -> Segment<'_> {
    match piece.parse::<usize>() {
        Ok(index) => Segment::Index(index),
        Err(_) => Segment::Key(piece),
    }
}

/// Splits one dot-separated piece into key/index segments, expanding
/// bracket suffixes: `events[0]` becomes `Key("events"), Index(0)`.
fn push_segments<'a>(piece: &'a str, out: &mut Vec<Segment<'a>>) {
    let head_end = piece.find('[').unwrap_or(piece.len());
    let (head, mut brackets) = piece.split_at(head_end);
    if !head.is_empty() {
        out.push(classify(head));
    }
    while let Some(stripped) = brackets.strip_prefix('[') {
        match stripped.find(']') {
            Some(end) => {
                out.push(classify(&stripped[..end]));
                brackets = &stripped[end + 1..];
            }
            None => {
                // Unterminated bracket: keep the raw text as a key so the
                // lookup fails softly instead of panicking.
                out.push(Segment::Key(stripped));
                break;
            }
        }
    }
}

fn parse_path(path: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    for piece in path.split('.') {
        push_segments(piece, &mut segments);
    }
    segments
}

/// Resolves a dot path against a JSON value.
///
/// Both `data.0.shipment_status` and `data[0].shipment_status` spellings are
/// accepted. Returns `None` when any intermediate key or index is missing.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in parse_path(path) {
        current = match segment {
            Segment::Key(key) => current.get(key)?,
            Segment::Index(index) => current.get(index)?,
        };
    }
    Some(current)
}

/// Length of the array at `path`, or 0 when missing or not an array.
pub fn array_len(root: &Value, path: &str) -> usize {
    lookup(root, path)
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// Numeric coercion for fields the backend sometimes returns as strings.
pub fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
