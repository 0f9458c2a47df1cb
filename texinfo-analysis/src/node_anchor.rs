//! HTML identifiers makeinfo assigns to nodes
//!
//! Words of the node name are joined with `-`; every code unit that is not an ASCII letter or
//! digit becomes `_00` followed by its hex value. When the result does not start with a letter,
//! its first character is replaced by `g_t_00` and that character's hex value.
//!
//! Commands inside node names are not expanded, so names like `@code{foo}` produce anchors
//! that differ from makeinfo's.

pub fn node_anchor(node_name: &str) -> String {
    let expanded = node_name
        .split_whitespace()
        .map(expand_word)
        .collect::<Vec<_>>()
        .join("-");

    let mut chars = expanded.chars();
    match chars.next() {
        None => expanded,
        Some(first) if first.is_ascii_alphabetic() => expanded,
        Some(first) => format!("g_t_00{:x}{}", u32::from(first), chars.as_str()),
    }
}

fn expand_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for ch in word.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in ch.encode_utf16(&mut units) {
            out.push_str(&format!("_00{:x}", unit));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Top", "Top")]
    #[case("Getting Started", "Getting-Started")]
    #[case("  Spaced \t out  ", "Spaced-out")]
    #[case("Files & Dirs", "Files-_0026-Dirs")]
    #[case("a.b", "a_002eb")]
    #[case("1 Intro", "g_t_0031-Intro")]
    #[case("_x", "g_t_005f005fx")]
    #[case("café", "caf_00e9")]
    #[case("", "")]
    fn expands_node_names(#[case] name: &str, #[case] anchor: &str) {
        assert_eq!(node_anchor(name), anchor);
    }
}
