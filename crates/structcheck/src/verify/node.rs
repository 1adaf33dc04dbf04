//! Synchronized preorder walk over two element trees

use tracing::{debug, trace};

use crate::verify::{attributes, Divergence, ErrorKind, VerifyConfig};
use crate::xml::{Document, NodeId};

/// Compare the subtree (and following siblings) of `candidate` with `template`
///
/// Nodes are visited in preorder: the node itself, then its children, then
/// its next sibling. A pending stack stands in for recursion so that the
/// walk order, and with it the first reported divergence, is the same as
/// the recursive definition while document depth cannot overflow the stack.
pub(crate) fn compare(
    candidate_doc: &Document,
    candidate: Option<NodeId>,
    template_doc: &Document,
    template: Option<NodeId>,
    config: &VerifyConfig,
) -> Result<(), Divergence> {
    let mut pending = vec![(candidate, template)];
    let mut visited = 0usize;

    while let Some((candidate_id, template_id)) = pending.pop() {
        let candidate_node = candidate_id.and_then(|id| candidate_doc.get(id));
        let template_node = template_id.and_then(|id| template_doc.get(id));

        let (c, t) = match (candidate_node, template_node) {
            (None, None) => continue,
            (Some(c), Some(t)) => (c, t),
            (Some(_), None) => {
                let location = candidate_id.map(|id| candidate_doc.path(id));
                debug!(?location, "candidate has an element the template lacks");
                return Err(Divergence::new(ErrorKind::NodeAvailability, location));
            }
            (None, Some(_)) => {
                let location = template_id.map(|id| template_doc.path(id));
                debug!(?location, "candidate is missing a template element");
                return Err(Divergence::new(ErrorKind::NodeAvailability, location));
            }
        };
        visited += 1;
        trace!(name = c.name(), "compare");

        if c.name() != t.name() {
            debug!(candidate = c.name(), template = t.name(), "tag name differs");
            return Err(Divergence::new(
                ErrorKind::NodeName,
                candidate_id.map(|id| candidate_doc.path(id)),
            ));
        }

        if let Err(reason) = attributes::compare(c, t, config.attribute_order) {
            debug!(%reason, name = c.name(), "attribute names differ");
            return Err(Divergence::new(
                ErrorKind::Attribute,
                candidate_id.map(|id| candidate_doc.path(id)),
            ));
        }

        pending.push((c.next_sibling(), t.next_sibling()));
        pending.push((c.first_child(), t.first_child()));
    }

    trace!(visited, "trees match");
    Ok(())
}

/// Element at which verification starts
pub(crate) fn designated_root(document: &Document, root: Option<&str>) -> Option<NodeId> {
    match root {
        Some(name) => document.root_named(name),
        None => document.root_node().map(|_| document.root()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Parser;

    fn doc(input: &str) -> Document {
        match Parser::new(input.as_bytes()).parse() {
            Ok(doc) => doc,
            Err(err) => panic!("fixture does not parse: {err}"),
        }
    }

    fn run(candidate: &str, template: &str) -> Result<(), Divergence> {
        let c = doc(candidate);
        let t = doc(template);
        compare(&c, Some(c.root()), &t, Some(t.root()), &VerifyConfig::default())
    }

    fn kind_and_location(result: Result<(), Divergence>) -> Option<(ErrorKind, Option<String>)> {
        result
            .err()
            .map(|d| (d.kind(), d.location().map(str::to_string)))
    }

    #[test]
    fn test_both_absent_is_a_match() {
        let c = doc("<Project/>");
        let t = doc("<Project/>");
        assert_eq!(compare(&c, None, &t, None, &VerifyConfig::default()), Ok(()));
    }

    #[test]
    fn test_one_side_absent() {
        let c = doc("<Project/>");
        let t = doc("<Project/>");
        let config = VerifyConfig::default();
        let missing_candidate = compare(&c, None, &t, Some(t.root()), &config);
        let missing_template = compare(&c, Some(c.root()), &t, None, &config);
        assert_eq!(
            missing_candidate.err().map(|d| d.kind()),
            Some(ErrorKind::NodeAvailability)
        );
        assert_eq!(
            missing_template.err().map(|d| d.kind()),
            Some(ErrorKind::NodeAvailability)
        );
    }

    #[test]
    fn test_missing_sibling_reports_template_location() {
        let result = run("<Project><Name/></Project>", "<Project><Name/><Version/></Project>");
        assert_eq!(
            kind_and_location(result),
            Some((
                ErrorKind::NodeAvailability,
                Some("/Project/Version".to_string())
            ))
        );
    }

    #[test]
    fn test_extra_child_reports_candidate_location() {
        let result = run(
            "<Project><Name><Short/></Name></Project>",
            "<Project><Name/></Project>",
        );
        assert_eq!(
            kind_and_location(result),
            Some((
                ErrorKind::NodeAvailability,
                Some("/Project/Name/Short".to_string())
            ))
        );
    }

    #[test]
    fn test_children_are_checked_before_siblings() {
        // both the nested <A> child and the <B> sibling diverge; preorder
        // reaches the child first
        let result = run(
            "<Project><Name><X/></Name><B/></Project>",
            "<Project><Name><A/></Name><C/></Project>",
        );
        assert_eq!(
            kind_and_location(result),
            Some((ErrorKind::NodeName, Some("/Project/Name/X".to_string())))
        );
    }

    #[test]
    fn test_name_check_precedes_attribute_check() {
        let result = run("<Project><Nam x=\"\"/></Project>", "<Project><Name/></Project>");
        assert_eq!(
            kind_and_location(result).map(|(kind, _)| kind),
            Some(ErrorKind::NodeName)
        );
    }

    #[test]
    fn test_deep_trees_do_not_overflow() {
        let depth = 50_000;
        let input = format!("{}{}", "<n>".repeat(depth), "</n>".repeat(depth));
        let parse = |s: &str| Parser::with_config(s.as_bytes(), crate::xml::Config::unlimited()).parse();
        match (parse(&input), parse(&input)) {
            (Ok(c), Ok(t)) => {
                let result = compare(&c, Some(c.root()), &t, Some(t.root()), &VerifyConfig::default());
                assert_eq!(result, Ok(()));
            }
            _ => panic!("deep fixture does not parse"),
        }
    }

    #[test]
    fn test_designated_root() {
        let d = doc("<Project/>");
        assert_eq!(designated_root(&d, None), Some(d.root()));
        assert_eq!(designated_root(&d, Some("Project")), Some(d.root()));
        assert_eq!(designated_root(&d, Some("Workspace")), None);
    }
}
