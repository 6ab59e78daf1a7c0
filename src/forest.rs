use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One entry in a taxonomy tree. `parent` is the only link; depth is derived
/// by walking parent ids, never stored.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Term {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent: Option<u64>,
}

#[derive(thiserror::Error, Debug)]
pub enum ForestError {
    #[error("term not found: {0}")]
    TermNotFound(u64),
    #[error("parent term not found: {0}")]
    ParentNotFound(u64),
    #[error("duplicate slug: {0}")]
    DuplicateSlug(String),
    #[error("moving term {0} under {1} would create a cycle")]
    WouldCycle(u64, u64),
}

pub fn get_term(terms: &[Term], id: u64) -> Option<&Term> {
    terms.iter().find(|t| t.id == id)
}

/// Ancestor ids of `id`, nearest first. A missing id yields an empty chain
/// (a term deleted out from under us reads as a root). The walk keeps a
/// visited set so a corrupted state file with a parent cycle terminates.
pub fn ancestor_chain(terms: &[Term], id: u64) -> Vec<u64> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut next = get_term(terms, id).and_then(|t| t.parent);
    while let Some(pid) = next {
        if !seen.insert(pid) {
            break;
        }
        out.push(pid);
        next = get_term(terms, pid).and_then(|t| t.parent);
    }
    out
}

/// Resolve a user-supplied key to a term: numeric id first, then slug, then
/// display name. Returns None when nothing matches; callers decide whether
/// that is an error or a pass-through.
pub fn resolve_term<'a>(terms: &'a [Term], key: &str) -> Option<&'a Term> {
    if let Ok(id) = key.parse::<u64>() {
        if let Some(t) = get_term(terms, id) {
            return Some(t);
        }
    }
    terms
        .iter()
        .find(|t| t.slug == key)
        .or_else(|| terms.iter().find(|t| t.name == key))
}

pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            dash = false;
        } else if !dash && !out.is_empty() {
            out.push('-');
            dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn next_id(terms: &[Term]) -> u64 {
    terms.iter().map(|t| t.id).max().unwrap_or(0) + 1
}

pub fn add_term(
    terms: &mut Vec<Term>,
    name: &str,
    slug: Option<&str>,
    parent: Option<u64>,
) -> Result<Term, ForestError> {
    if let Some(pid) = parent {
        if get_term(terms, pid).is_none() {
            return Err(ForestError::ParentNotFound(pid));
        }
    }
    let slug = match slug {
        Some(s) => s.to_string(),
        None => slugify(name),
    };
    if terms.iter().any(|t| t.slug == slug) {
        return Err(ForestError::DuplicateSlug(slug));
    }
    let term = Term {
        id: next_id(terms),
        name: name.to_string(),
        slug,
        parent,
    };
    terms.push(term.clone());
    Ok(term)
}

pub fn reparent(terms: &mut [Term], id: u64, new_parent: Option<u64>) -> Result<(), ForestError> {
    if get_term(terms, id).is_none() {
        return Err(ForestError::TermNotFound(id));
    }
    if let Some(pid) = new_parent {
        if get_term(terms, pid).is_none() {
            return Err(ForestError::ParentNotFound(pid));
        }
        if pid == id || ancestor_chain(terms, pid).contains(&id) {
            return Err(ForestError::WouldCycle(id, pid));
        }
    }
    for t in terms.iter_mut() {
        if t.id == id {
            t.parent = new_parent;
        }
    }
    Ok(())
}

/// Remove a term; its children are promoted to the removed term's parent so
/// the rest of the subtree stays attached.
pub fn remove_term(terms: &mut Vec<Term>, id: u64) -> Result<Term, ForestError> {
    let idx = terms
        .iter()
        .position(|t| t.id == id)
        .ok_or(ForestError::TermNotFound(id))?;
    let removed = terms.remove(idx);
    for t in terms.iter_mut() {
        if t.parent == Some(id) {
            t.parent = removed.parent;
        }
    }
    Ok(removed)
}

pub fn term_depths(terms: &[Term]) -> BTreeMap<u64, u32> {
    terms
        .iter()
        .map(|t| (t.id, ancestor_chain(terms, t.id).len() as u32))
        .collect()
}
