//! Depth-first linearization of a section tree into report rows

use crate::types::{Node, Section, Series};

/// One visited node: a section header (`series == None`) or a data row
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord<'a> {
    pub depth: usize,
    pub label: String,
    pub series: Option<&'a Series>,
}

impl FlatRecord<'_> {
    pub fn is_header(&self) -> bool {
        self.series.is_none()
    }
}

/// Flatten the members of `section`, starting at depth 0.
///
/// Members are visited in insertion order; a nested section yields its own
/// header record followed by its members one level deeper.
pub fn flatten(section: &Section) -> Vec<FlatRecord<'_>> {
    let mut records = Vec::new();
    flatten_into(section, 0, &mut records);
    records
}

/// Number of records `flatten` would emit, without building labels
pub fn record_count(section: &Section) -> usize {
    section
        .iter()
        .map(|(_, node)| match node {
            Node::Leaf(_) => 1,
            Node::Section(child) => 1 + record_count(child),
        })
        .sum()
}

fn flatten_into<'a>(section: &'a Section, depth: usize, out: &mut Vec<FlatRecord<'a>>) {
    for (key, node) in section.iter() {
        let label = humanize_key(key);
        match node {
            Node::Leaf(series) => out.push(FlatRecord {
                depth,
                label,
                series: Some(series),
            }),
            Node::Section(child) => {
                out.push(FlatRecord {
                    depth,
                    label,
                    series: None,
                });
                flatten_into(child, depth + 1, out);
            }
        }
    }
}

/// `"ebitda_margin"` → `"Ebitda Margin"`
///
/// Underscores become spaces; each run of letters is capitalized on its first
/// letter and lowercased after it (so `"pp&e"` becomes `"Pp&E"`).
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_is_letter = false;
    for ch in key.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}
