//! Opacity-based highlighting keyed by CSS-safe class tokens

use adt_core::{Host, NodeId, Selector, ToolkitConfig};

use crate::error::Result;

/// Turn a label into a class token: every space becomes `__`.
///
/// Labels that already contain `__` do not survive a round trip through
/// [`decode`].
pub fn encode(key: &str) -> String {
    key.replace(' ', "__")
}

/// Inverse of [`encode`]
pub fn decode(token: &str) -> String {
    token.replace("__", " ")
}

/// Emphasize the elements under `root` matching `selector` whose class list
/// contains `encode(key)`, dimming the others. With `key = None` every
/// matched element goes back to full opacity.
///
/// Returns the number of matched elements.
pub fn highlight_selection(
    host: &Host,
    root: NodeId,
    selector: &str,
    key: Option<&str>,
    duration_ms: u64,
) -> Result<usize> {
    let selector = Selector::parse(selector)?;
    let dim = ToolkitConfig::current().highlight_dim_opacity;
    let token = key.map(encode);

    let targets: Vec<(NodeId, f32)> = {
        let doc = host.document();
        doc.select_all(root, &selector)?
            .into_iter()
            .map(|id| {
                let opacity = match &token {
                    Some(token) if !doc.node(id).is_some_and(|n| n.has_class(token)) => dim,
                    _ => 1.0,
                };
                (id, opacity)
            })
            .collect()
    };

    for (id, opacity) in &targets {
        host.transition_opacity(*id, *opacity, duration_ms)?;
    }
    tracing::trace!(matched = targets.len(), key = ?key, "highlight");
    Ok(targets.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_replaces_spaces() {
        assert_eq!(encode("foo bar"), "foo__bar");
        assert_eq!(encode(""), "");
        assert_eq!(encode("a b c"), "a__b__c");
    }

    #[test]
    fn decode_inverts_encode() {
        for key in ["foo bar", "", "plain", " leading", "two  spaces"] {
            assert_eq!(decode(&encode(key)), key);
        }
    }
}
