use std::collections::HashMap;

/// Lowercase `text` and replace every run of two or more whitespace characters
/// with a single space. A lone whitespace character is kept as it is.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut chars = lowered.chars().peekable();
    while let Some(ch) = chars.next() {
        if !ch.is_whitespace() {
            out.push(ch);
            continue;
        }
        if chars.peek().is_some_and(|next| next.is_whitespace()) {
            while chars.next_if(|next| next.is_whitespace()).is_some() {}
            out.push(' ');
        } else {
            out.push(ch);
        }
    }
    out
}

/// Every character n-gram of normalized `text` with length in `min_n..=max_n`,
/// shortest lengths first.
#[must_use]
pub fn char_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let chars: Vec<char> = normalize_text(text).chars().collect();
    let mut out = Vec::new();
    for n in min_n..=max_n {
        if n == 0 || n > chars.len() {
            continue;
        }
        out.extend(chars.windows(n).map(|w| w.iter().collect::<String>()));
    }
    out
}

/// Raw n-gram counts for one document.
pub(crate) fn term_counts(text: &str, min_n: usize, max_n: usize) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for gram in char_ngrams(text, min_n, max_n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}
