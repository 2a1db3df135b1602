/// Weight used when a name carries no parseable `(w<number>)` token.
pub const DEFAULT_WEIGHT: f64 = 1.0;

const TOKEN_OPEN: &str = "(w";
const TOKEN_CLOSE: char = ')';

/// Extract the blend weight embedded in a layer name.
///
/// Scans for `(w`, takes everything up to the next `)` and tries to parse it as a float. A token
/// that does not parse is skipped and scanning resumes right after its `(w`, so
/// `"(wbad) (w2)"` yields `2.0`. Surrounding whitespace inside the token is ignored. Returns
/// [`DEFAULT_WEIGHT`] when nothing parses; malformed tokens are never an error.
pub fn parse_weight(name: &str) -> f64 {
    let mut from = 0;
    while let Some(rel) = name[from..].find(TOKEN_OPEN) {
        let start = from + rel + TOKEN_OPEN.len();
        from = start;
        let Some(len) = name[start..].find(TOKEN_CLOSE) else {
            continue;
        };
        if let Ok(w) = name[start..start + len].trim().parse::<f64>() {
            return w;
        }
    }
    DEFAULT_WEIGHT
}

/// Whether a parsed weight lets the layer take part in blending.
///
/// Non-positive and non-finite weights exclude the layer.
pub fn is_contributing(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/layer/weight.rs"]
mod tests;
