use std::collections::HashSet;

const KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use", "where",
    "while", "async", "await", "dyn",
];

/// Convert a raw host identifier to a PascalCase type name.
///
/// `event`, `press-release` and `Event Tickets` all become `Event`,
/// `PressRelease`, `EventTickets`.
pub fn to_type_name(raw: &str) -> String {
    raw.split(|c: char| c == '_' || c == '-' || c == ' ' || c == '.')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Normalize a raw identifier (snake/kebab case, label, mixed case) into a
/// snake_case member name.
///
/// Dots are stripped, other separators and invalid characters fold to `_`,
/// case boundaries in mixed-case input are split, runs of `_` collapse, and a
/// leading digit is guarded with `_`.
pub fn to_member_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_lower = false;
    for c in raw.chars() {
        if c == '.' {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() {
                if prev_lower {
                    out.push('_');
                }
                out.push(c.to_ascii_lowercase());
                prev_lower = false;
            } else {
                out.push(c);
                prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            }
        } else {
            out.push('_');
            prev_lower = false;
        }
    }
    // Collapse runs and trim the edges
    let mut collapsed = String::with_capacity(out.len());
    let mut prev_underscore = false;
    for c in out.chars() {
        if c == '_' {
            if !prev_underscore && !collapsed.is_empty() {
                collapsed.push('_');
            }
            prev_underscore = true;
        } else {
            collapsed.push(c);
            prev_underscore = false;
        }
    }
    while collapsed.ends_with('_') {
        collapsed.pop();
    }
    if collapsed.is_empty() {
        collapsed.push('_');
    }
    if collapsed.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
        collapsed.insert(0, '_');
    }
    collapsed
}

/// Escape Rust keywords with a raw identifier prefix.
pub fn escape_keyword(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Resolve `name` against every member name assigned so far.
///
/// The first occurrence keeps the unsuffixed name; later collisions receive
/// `_1`, `_2`, … in order of appearance.
pub fn unique_member_name(seen: &mut HashSet<String>, name: &str) -> String {
    if seen.insert(name.to_string()) {
        return name.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{name}_{counter}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_type_name() {
        assert_eq!(to_type_name("event"), "Event");
        assert_eq!(to_type_name("press-release"), "PressRelease");
        assert_eq!(to_type_name("team_member"), "TeamMember");
        assert_eq!(to_type_name("Event Tickets"), "EventTickets");
    }

    #[test]
    fn test_to_member_name_separators() {
        assert_eq!(to_member_name("event_category"), "event_category");
        assert_eq!(to_member_name("sub-title"), "sub_title");
        assert_eq!(to_member_name("Location"), "location");
        assert_eq!(to_member_name("Ticket Price"), "ticket_price");
    }

    #[test]
    fn test_to_member_name_strips_dots() {
        assert_eq!(to_member_name("meta.key"), "metakey");
    }

    #[test]
    fn test_to_member_name_case_boundaries() {
        assert_eq!(to_member_name("eventCategory"), "event_category");
        assert_eq!(to_member_name("dateCreate"), "date_create");
    }

    #[test]
    fn test_to_member_name_guards() {
        assert_eq!(to_member_name("2nd_stage"), "_2nd_stage");
        assert_eq!(to_member_name("--"), "_");
        assert_eq!(to_member_name("a__b"), "a_b");
    }

    #[test]
    fn test_escape_keyword() {
        assert_eq!(escape_keyword("type"), "r#type");
        assert_eq!(escape_keyword("location"), "location");
    }

    #[test]
    fn test_unique_member_name_suffix_order() {
        let mut seen = HashSet::new();
        assert_eq!(unique_member_name(&mut seen, "location"), "location");
        assert_eq!(unique_member_name(&mut seen, "location"), "location_1");
        assert_eq!(unique_member_name(&mut seen, "location"), "location_2");
    }
}
