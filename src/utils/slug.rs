/// Lowercase ASCII slug: runs of anything but letters and digits become one `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("untitled");
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn collapses_separators() {
        assert_eq!(slugify("  Desk Lamp -- Pro 2 "), "desk-lamp-pro-2");
        assert_eq!(slugify("USB/C & HDMI"), "usb-c-hdmi");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(slugify("Café Lámpara"), "caf-l-mpara");
    }

    #[test]
    fn never_empty() {
        assert_eq!(slugify("!!!"), "untitled");
    }
}
