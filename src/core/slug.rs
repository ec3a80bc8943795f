/// Slug used when a question text contains nothing sluggable
const FALLBACK_SLUG: &str = "question";

/// Maximum slug length, matching the `questions.slug` column
pub const MAX_SLUG_LEN: usize = 255;

/// Turn question text into a url slug
///
/// Lowercases, folds common Latin accents to ASCII, drops everything else
/// that is not alphanumeric and collapses separators into single dashes.
/// Never returns an empty string.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let folded = fold_accent(c);
        if let Some(ascii) = folded {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push_str(ascii);
        } else if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
        // other punctuation is dropped without separating words
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// First free slug for `base` given a predicate telling which are taken
///
/// Returns `base` itself, then `base-2`, `base-3`, ...
pub fn unique_slug<F>(base: &str, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !is_taken(base) {
        return base.to_string();
    }

    let mut n = 2u32;
    loop {
        let suffix = format!("-{}", n);
        let mut stem = base.to_string();
        stem.truncate(MAX_SLUG_LEN.saturating_sub(suffix.len()));
        while stem.ends_with('-') {
            stem.pop();
        }
        let candidate = format!("{}{}", stem, suffix);
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn fold_accent(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hallo?"), "hallo");
        assert_eq!(slugify("Do you like  long walks?"), "do-you-like-long-walks");
        assert_eq!(slugify("  --Trim me--  "), "trim-me");
    }

    #[test]
    fn test_slugify_accents() {
        assert_eq!(slugify("Magst du Käse über alles?"), "magst-du-kase-uber-alles");
        assert_eq!(slugify("Straße"), "strasse");
    }

    #[test]
    fn test_slugify_never_empty() {
        assert_eq!(slugify("???"), "question");
        assert_eq!(slugify(""), "question");
    }

    #[test]
    fn test_unique_slug_suffixes() {
        let taken = ["hallo", "hallo-2"];
        let slug = unique_slug("hallo", |s| taken.contains(&s));
        assert_eq!(slug, "hallo-3");
        assert_eq!(unique_slug("fresh", |s| taken.contains(&s)), "fresh");
    }

    #[test]
    fn test_unique_slug_truncation_drops_trailing_dash() {
        // 252 letters, a dash at the cut point, then more letters
        let base = format!("{}-bb", "a".repeat(252));
        assert_eq!(base.len(), MAX_SLUG_LEN);

        let slug = unique_slug(&base, |s| s == base);
        assert_eq!(slug, format!("{}-2", "a".repeat(252)));
        assert!(!slug.contains("--"));
        assert!(slug.len() <= MAX_SLUG_LEN);
    }
}
