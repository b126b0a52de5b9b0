//! Effective style resolution.
//!
//! Walks a tree and replaces every authored or keyword color with its cascaded RGBA value, so
//! that the rasterizer only ever sees `ColorValue::Resolved`. Inheritance follows CSS: `color`
//! inherits, border colors default to the effective text color, backgrounds default to
//! transparent, and an unparseable declaration is ignored as if it had not been written.

use crate::foundation::core::Rgba8;
use crate::render::tree::{ColorValue, Content, Node};

/// Pin every color-related property in `root` to an explicit value. Returns how many properties
/// were written.
pub fn resolve_effective_styles(root: &mut Node) -> usize {
    let mut pinned = 0;
    resolve_node(root, Rgba8::BLACK, &mut pinned);
    tracing::trace!(pinned, "effective colors pinned");
    pinned
}

/// Overwrite the root background with `color`, forced opaque.
pub fn force_root_background(root: &mut Node, color: Rgba8) {
    root.style.background = Some(ColorValue::Resolved(color.opaque()));
}

/// Return `true` when no authored or keyword colors remain anywhere in the tree.
pub fn is_fully_resolved(root: &Node) -> bool {
    let mut ok = true;
    let pinned = |c: &Option<ColorValue>| c.as_ref().is_none_or(|c| c.resolved().is_some());
    root.walk(&mut |n, _| {
        let s = &n.style;
        ok &= pinned(&s.color)
            && pinned(&s.background)
            && pinned(&s.border_color.top)
            && pinned(&s.border_color.right)
            && pinned(&s.border_color.bottom)
            && pinned(&s.border_color.left);
        if let Content::Text(spans) = &n.content {
            ok &= spans.iter().all(|sp| pinned(&sp.color));
        }
    });
    ok
}

fn resolve_node(node: &mut Node, inherited: Rgba8, pinned: &mut usize) {
    let current = cascade(node.style.color.as_ref(), inherited);
    node.style.color = Some(ColorValue::Resolved(current));
    *pinned += 1;

    if let Some(bg) = node.style.background.take() {
        node.style.background = match bg {
            ColorValue::Css(css) => css.parse().ok().map(ColorValue::Resolved),
            resolved @ ColorValue::Resolved(_) => Some(resolved),
        };
        *pinned += usize::from(node.style.background.is_some());
    }

    for side in node.style.border_color.each_mut() {
        let resolved = cascade(side.as_ref(), current);
        *side = Some(ColorValue::Resolved(resolved));
        *pinned += 1;
    }

    if let Content::Text(spans) = &mut node.content {
        for span in spans {
            let resolved = cascade(span.color.as_ref(), current);
            span.color = Some(ColorValue::Resolved(resolved));
            *pinned += 1;
        }
    }

    for child in &mut node.children {
        resolve_node(child, current, pinned);
    }
}

/// Resolve one declared value. `fallback` is used when nothing (valid) was declared.
fn cascade(declared: Option<&ColorValue>, fallback: Rgba8) -> Rgba8 {
    match declared {
        None => fallback,
        Some(ColorValue::Resolved(c)) => *c,
        Some(ColorValue::Css(css)) => match css.parse() {
            Ok(c) => c,
            Err(err) => {
                tracing::debug!(%err, "ignoring invalid color declaration");
                fallback
            }
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/resolve.rs"]
mod tests;
