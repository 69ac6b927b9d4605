/// Generates a URL-friendly slug from a project name: lowercase, drop
/// anything that is not alphanumeric/space/hyphen, turn runs of spaces and
/// hyphens into a single hyphen, trim hyphens at both ends.
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
        // anything else is stripped
    }

    slug
}
