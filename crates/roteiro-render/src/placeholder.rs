//! Placeholder token substitution.

use crate::node::{NodeStyle, RenderNode};

/// Mask rendered in place of the CPF token: the operator never sees the
/// document number inside the script text.
pub const CPF_MASK: &str = "***.***.***-**";

const OPERATOR_TOKEN: &str = "[Nome do operador]";
const CUSTOMER_TOKEN: &str = "[Primeiro nome do cliente]";
// Older scripts saved the token with a lowercase initial; both spellings
// must keep substituting.
const CUSTOMER_TOKEN_LEGACY: &str = "[primeiro nome do cliente]";
const CPF_TOKEN: &str = "[CPF do cliente]";

/// Runtime values substituted into the script text.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    /// Name of the operator running the call.
    pub operator_name: String,
    /// First name of the customer on the line.
    pub customer_first_name: String,
}

impl Placeholders {
    /// The token table in substitution order.
    fn substitutions(&self) -> [(&'static str, &str); 4] {
        [
            (OPERATOR_TOKEN, self.operator_name.as_str()),
            (CUSTOMER_TOKEN, self.customer_first_name.as_str()),
            (CUSTOMER_TOKEN_LEGACY, self.customer_first_name.as_str()),
            (CPF_TOKEN, CPF_MASK),
        ]
    }
}

/// Substitute every placeholder token in `content`, emitting plain nodes
/// for the text between tokens and an emphasized node per substituted
/// value. An empty runtime value drops the token without emitting a node.
pub(crate) fn substitute(content: &str, placeholders: &Placeholders, out: &mut Vec<RenderNode>) {
    let table = placeholders.substitutions();
    let mut rest = content;

    loop {
        // Earliest token wins; ties resolve in table order.
        let next = table
            .iter()
            .filter_map(|(token, value)| rest.find(token).map(|at| (at, *token, *value)))
            .min_by_key(|(at, ..)| *at);

        let Some((at, token, value)) = next else {
            push_plain(rest, out);
            return;
        };

        push_plain(&rest[..at], out);
        if !value.is_empty() {
            out.push(RenderNode::Styled {
                text: value.to_owned(),
                style: NodeStyle::emphasis(),
            });
        }
        rest = &rest[at + token.len()..];
    }
}

/// Emit `text` as plain nodes, splitting literal newlines into breaks.
pub(crate) fn push_plain(text: &str, out: &mut Vec<RenderNode>) {
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push(RenderNode::Break);
        }
        if !line.is_empty() {
            out.push(RenderNode::Plain {
                text: line.to_owned(),
            });
        }
    }
}

/// Emit `text` with `style`, splitting literal newlines into breaks so a
/// styled range spanning lines keeps its style on every line.
pub(crate) fn push_styled(text: &str, style: &NodeStyle, out: &mut Vec<RenderNode>) {
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push(RenderNode::Break);
        }
        if !line.is_empty() {
            out.push(RenderNode::Styled {
                text: line.to_owned(),
                style: style.clone(),
            });
        }
    }
}
