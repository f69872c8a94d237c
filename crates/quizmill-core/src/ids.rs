use std::cmp::Ordering;

/// A question id split into digit and non-digit runs for comparison.
#[derive(Debug, PartialEq, Eq)]
enum IdToken<'a> {
    Number(&'a str),
    Text(&'a str),
}

fn tokenize(id: &str) -> Vec<IdToken<'_>> {
    let mut tokens = Vec::new();
    let bytes = id.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        let is_digit = bytes[start].is_ascii_digit();
        let mut end = start + 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() == is_digit {
            end += 1;
        }
        let run = &id[start..end];
        tokens.push(if is_digit {
            IdToken::Number(run)
        } else {
            IdToken::Text(run)
        });
        start = end;
    }
    tokens
}

/// Compare two digit runs numerically without parsing (immune to overflow).
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Natural (numeric-aware) ordering of question ids.
///
/// Digit runs compare as numbers, everything else compares
/// case-insensitively, so `"2" < "10"`, `"3" < "3.1"` and `"12" < "12a"`.
/// Used for output iteration; insertion order is irrelevant.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ta = tokenize(a);
    let tb = tokenize(b);

    for (x, y) in ta.iter().zip(tb.iter()) {
        let ord = match (x, y) {
            (IdToken::Number(x), IdToken::Number(y)) => cmp_digits(x, y),
            (IdToken::Text(x), IdToken::Text(y)) => {
                x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase())
            }
            // Numbers sort before text so "12" < "12a" pairs with "12a" < "13"
            (IdToken::Number(_), IdToken::Text(_)) => Ordering::Less,
            (IdToken::Text(_), IdToken::Number(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    // "12" vs "12a": the shorter token stream sorts first; break remaining
    // ties on the raw strings so the ordering stays total.
    ta.len().cmp(&tb.len()).then_with(|| a.cmp(b))
}
