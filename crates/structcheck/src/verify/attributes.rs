//! Attribute name comparison

use std::fmt;

use indexmap::IndexMap;

use crate::verify::AttributeOrder;
use crate::xml::Node;

/// Why two attribute lists were judged different
///
/// Only used for diagnostics; callers see a plain attribute error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum AttributeMismatch {
    /// One side has attributes, the other has none
    Presence { candidate: usize, template: usize },
    /// Names differ at the same position
    Name {
        position: usize,
        candidate: String,
        template: String,
    },
    /// One list ran out before the other
    Count { candidate: usize, template: usize },
    /// Unordered comparison found a name the template does not declare
    Unexpected { name: String },
}

impl fmt::Display for AttributeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Presence {
                candidate,
                template,
            }
            | Self::Count {
                candidate,
                template,
            } => write!(f, "{candidate} attribute(s) where template has {template}"),
            Self::Name {
                position,
                candidate,
                template,
            } => write!(
                f,
                "attribute #{position} is '{candidate}', template expects '{template}'"
            ),
            Self::Unexpected { name } => write!(f, "attribute '{name}' not in template"),
        }
    }
}

/// Compare the attribute names of two elements; values are ignored
pub(crate) fn compare(
    candidate: &Node,
    template: &Node,
    order: AttributeOrder,
) -> Result<(), AttributeMismatch> {
    let candidate = candidate.attributes();
    let template = template.attributes();

    match (candidate.is_empty(), template.is_empty()) {
        (true, true) => return Ok(()),
        (false, false) => {}
        _ => {
            return Err(AttributeMismatch::Presence {
                candidate: candidate.len(),
                template: template.len(),
            })
        }
    }

    match order {
        AttributeOrder::Strict => compare_in_order(candidate, template),
        AttributeOrder::Any => compare_as_sets(candidate, template),
    }
}

fn compare_in_order(
    candidate: &IndexMap<String, String>,
    template: &IndexMap<String, String>,
) -> Result<(), AttributeMismatch> {
    let mut candidate_names = candidate.keys();
    let mut template_names = template.keys();
    let mut position = 0usize;

    loop {
        position += 1;
        match (candidate_names.next(), template_names.next()) {
            (Some(c), Some(t)) if c == t => {}
            (Some(c), Some(t)) => {
                return Err(AttributeMismatch::Name {
                    position,
                    candidate: c.clone(),
                    template: t.clone(),
                })
            }
            (None, None) => return Ok(()),
            _ => {
                return Err(AttributeMismatch::Count {
                    candidate: candidate.len(),
                    template: template.len(),
                })
            }
        }
    }
}

fn compare_as_sets(
    candidate: &IndexMap<String, String>,
    template: &IndexMap<String, String>,
) -> Result<(), AttributeMismatch> {
    if let Some(name) = candidate.keys().find(|name| !template.contains_key(*name)) {
        return Err(AttributeMismatch::Unexpected { name: name.clone() });
    }
    // names are unique per element, so equal length plus inclusion means equal sets
    if candidate.len() != template.len() {
        return Err(AttributeMismatch::Count {
            candidate: candidate.len(),
            template: template.len(),
        });
    }
    Ok(())
}
