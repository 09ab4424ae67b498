use std::mem;

use tracing::debug;

use crate::parse::TokenTree;

/// Whether `left` and `right` end up in the same multiplicative region.
///
/// `*` always binds. A `-` binds to whatever follows it but never to what
/// precedes it, so it starts a new signed term. `+` separates terms and bare
/// juxtaposition multiplies.
fn binds(left: &TokenTree, right: &TokenTree) -> bool {
    match (left, right) {
        (TokenTree::Mult, _) | (_, TokenTree::Mult) => true,
        (TokenTree::Minus, _) => true,
        (_, TokenTree::Minus) => false,
        (TokenTree::Plus, _) | (_, TokenTree::Plus) => false,
        _ => true,
    }
}

impl TokenTree {
    /// Resolves a `List` into a leaf, `Sum` or `Product`. Anything else is
    /// already resolved and comes back unchanged.
    pub fn resolve(self) -> TokenTree {
        match self {
            TokenTree::List(children) => resolve(children),
            other => other,
        }
    }
}

/// Turns one group's flat token sequence into a sum of products.
///
/// Nested groups are resolved first and then treated as single factors.
/// Operator markers are consumed: `+` and `-` only draw term boundaries, and
/// every `-` that binds forward leaves a `-1` factor in front of the factor
/// it negates. A `+` right after `-` or `*` is a unary plus and is dropped.
///
/// Recurses once per nesting level.
pub fn resolve(tokens: Vec<TokenTree>) -> TokenTree {
    let mut resolved: Vec<TokenTree> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let unary_plus = token == TokenTree::Plus
            && matches!(resolved.last(), Some(TokenTree::Minus | TokenTree::Mult));
        if !unary_plus {
            resolved.push(token.resolve());
        }
    }
    let tokens = resolved;

    // bound[i] relates tokens[i] and tokens[i + 1]
    let bound: Vec<bool> = tokens
        .windows(2)
        .map(|pair| binds(&pair[0], &pair[1]))
        .collect();
    let negate: Vec<bool> = (0..tokens.len())
        .map(|i| i > 0 && bound[i - 1] && tokens[i - 1] == TokenTree::Minus)
        .collect();

    let mut sum = Vec::new();
    let mut region = Vec::new();
    for (i, token) in tokens.into_iter().enumerate() {
        if negate[i] {
            region.push(TokenTree::number(-1));
        }
        if !token.is_operator() {
            region.push(token);
        }
        if !bound.get(i).copied().unwrap_or(false) {
            close_region(&mut region, &mut sum);
        }
    }

    if sum.len() == 1 {
        sum.pop().unwrap_or(TokenTree::Sum(Vec::new()))
    } else {
        TokenTree::Sum(sum)
    }
}

fn close_region(region: &mut Vec<TokenTree>, sum: &mut Vec<TokenTree>) {
    let factor = match region.len() {
        0 => return,
        1 => region.remove(0),
        _ => TokenTree::Product(mem::take(region)),
    };
    debug!(%factor, "closed region");
    sum.push(factor);
}
