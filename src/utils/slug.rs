use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Derive a URL slug: lowercase, Vietnamese diacritics stripped,
/// runs of non-alphanumerics collapsed to single hyphens.
/// Idempotent: slugify(slugify(x)) == slugify(x).
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();

    // NFD decomposition separates base letters from combining marks.
    // đ/Đ does not decompose, so map it explicitly.
    let stripped: String = lowered
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' => 'd',
            _ => c,
        })
        .collect();

    let mut slug = String::with_capacity(stripped.len());
    let mut last_hyphen = true; // suppress leading hyphen
    for c in stripped.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Candidate slugs for disambiguation: base, base-1, base-2, ...
pub fn slug_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    (0..).map(move |i| {
        if i == 0 {
            base.to_string()
        } else {
            format!("{}-{}", base, i)
        }
    })
}
